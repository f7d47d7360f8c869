// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Command Line
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `sof` command: compute a sum of fractions from CSV tables, convert
//! single quantities, and inspect nuclide canonicalization.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sof_engine::{
    load_limits, load_samples, write_results_csv, AliasMap, AuditInputs, AuditRecord, InputFile,
    SofEngine,
};
use sof_types::config::{SessionConfig, SofOptions};
use sof_types::error::SofResult;
use sof_types::models::{Banner, SofReport};
use sof_units::{convert_to, display_quantity, format_significant, parse_quantity, UnitRegistry};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sof")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sum-of-fractions compliance check for radionuclide mixtures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the SOF of a samples table against a limits table
    Compute {
        /// Samples CSV (nuclide, value, unit[, sigma, note, batch_id])
        #[arg(long, value_name = "FILE")]
        samples: PathBuf,

        /// Limits CSV (nuclide, limit_value, limit_unit[, category, rule_name, ...])
        #[arg(long, value_name = "FILE")]
        limits: PathBuf,

        /// Alias table (CSV or JSON); takes precedence over SOF_ALIAS_PATH
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        /// Options JSON; overrides SOF_CONFIG
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory searched for default alias files
        #[arg(long, value_name = "DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Restrict limits to one category
        #[arg(long)]
        category: Option<String>,

        /// Report duplicate nuclide rows separately
        #[arg(long)]
        no_combine: bool,

        /// Fail when a nuclide has no limit instead of counting it as zero
        #[arg(long)]
        strict_missing: bool,

        /// Lower edge of the amber band, in (0, 1]
        #[arg(long)]
        warn_threshold: Option<f64>,

        /// Significant figures for display
        #[arg(long)]
        sigfigs: Option<usize>,

        /// Skip failing rows and report them instead of aborting
        #[arg(long)]
        lenient: bool,

        /// Write the per-nuclide results table here
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Write the JSON audit record here
        #[arg(long, value_name = "FILE")]
        audit: Option<PathBuf>,

        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Exit with status 2 when the total exceeds 1
        #[arg(long)]
        fail_on_exceed: bool,
    },

    /// Convert one quantity between units
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,

        /// One-sigma uncertainty in the source unit
        #[arg(long)]
        sigma: Option<f64>,

        #[arg(long, default_value_t = 4)]
        sigfigs: usize,
    },

    /// Show how nuclide names canonicalize
    Canon {
        #[arg(required = true)]
        names: Vec<String>,

        /// Alias table (CSV or JSON); takes precedence over SOF_ALIAS_PATH
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        #[arg(long, value_name = "DIR", default_value = "data")]
        data_dir: PathBuf,
    },

    /// List the curated base units
    Units,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compute {
            samples,
            limits,
            aliases,
            config,
            data_dir,
            category,
            no_combine,
            strict_missing,
            warn_threshold,
            sigfigs,
            lenient,
            out,
            audit,
            json,
            fail_on_exceed,
        } => {
            let request = ComputeRequest {
                samples,
                limits,
                aliases,
                config,
                data_dir,
                category,
                no_combine,
                strict_missing,
                warn_threshold,
                sigfigs,
                lenient,
                out,
                audit,
                json,
            };
            run_compute(&request).map(|report| {
                if fail_on_exceed && !report.summary.pass_limit {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            })
        }
        Commands::Convert {
            value,
            from,
            to,
            sigma,
            sigfigs,
        } => run_convert(value, &from, &to, sigma, sigfigs).map(|()| ExitCode::SUCCESS),
        Commands::Canon {
            names,
            aliases,
            data_dir,
        } => run_canon(&names, aliases, &data_dir).map(|()| ExitCode::SUCCESS),
        Commands::Units => {
            run_units();
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "sof failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

struct ComputeRequest {
    samples: PathBuf,
    limits: PathBuf,
    aliases: Option<PathBuf>,
    config: Option<PathBuf>,
    data_dir: PathBuf,
    category: Option<String>,
    no_combine: bool,
    strict_missing: bool,
    warn_threshold: Option<f64>,
    sigfigs: Option<usize>,
    lenient: bool,
    out: Option<PathBuf>,
    audit: Option<PathBuf>,
    json: bool,
}

/// Environment first, then the config file, then explicit flags.
fn session(req: &ComputeRequest) -> SofResult<SessionConfig> {
    let mut session = SessionConfig::from_env()?;
    if let Some(path) = &req.config {
        session.options = SofOptions::from_file(path)?;
    }
    if req.aliases.is_some() {
        session.alias_path = req.aliases.clone();
    }

    let options = &mut session.options;
    if req.category.is_some() {
        options.category = req.category.clone();
    }
    if req.no_combine {
        options.combine_duplicates = false;
    }
    if req.strict_missing {
        options.treat_missing_as_zero = false;
    }
    if let Some(w) = req.warn_threshold {
        options.warn_threshold = w;
    }
    if let Some(s) = req.sigfigs {
        options.display_sigfigs = s;
    }
    options.validate()?;
    Ok(session)
}

fn run_compute(req: &ComputeRequest) -> SofResult<SofReport> {
    let session = session(req)?;
    let options = &session.options;
    let aliases = AliasMap::load_session(&session, &req.data_dir)?;
    let samples = load_samples(&req.samples)?;
    let limits = load_limits(&req.limits)?;

    let registry = UnitRegistry::standard();
    let engine = SofEngine::new(&registry, &aliases);
    let report = if req.lenient {
        let run = engine.compute_collecting(&samples, &limits, options)?;
        for rejected in run.rejected() {
            if let Some(err) = &rejected.error {
                eprintln!("skipped: {err}");
            }
        }
        run.report
    } else {
        engine.compute(&samples, &limits, options)?
    };

    if req.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, options.display_sigfigs);
    }

    if let Some(out) = &req.out {
        write_results_csv(out, &report, options.display_sigfigs)?;
    }
    if let Some(audit_path) = &req.audit {
        let inputs = AuditInputs {
            samples: Some(InputFile::from_path(&req.samples)?),
            limits: Some(InputFile::from_path(&req.limits)?),
            aliases: aliases
                .sources()
                .iter()
                .map(InputFile::from_path)
                .collect::<SofResult<Vec<_>>>()?,
        };
        AuditRecord::new(&report, options, inputs).write(audit_path)?;
    }
    Ok(report)
}

fn print_report(report: &SofReport, sigfigs: usize) {
    let fmt = |v: f64| format_significant(v, sigfigs);
    println!(
        "{:<14} {:>14} {:>14} {:<12} {:>10} {:>10}",
        "nuclide", "conc", "limit", "unit", "fraction", "sigma"
    );
    for row in &report.rows {
        let limit = row.limit_value.map(fmt).unwrap_or_else(|| "-".to_string());
        let sigma = row.fraction_sigma.map(fmt).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:>14} {:>14} {:<12} {:>10} {:>10}",
            row.nuclide,
            fmt(row.concentration),
            limit,
            row.unit,
            fmt(row.fraction),
            sigma
        );
    }

    let s = &report.summary;
    let banner = match s.banner {
        Banner::Green => "GREEN",
        Banner::Amber => "AMBER",
        Banner::Red => "RED",
    };
    let total = match s.sof_sigma {
        Some(sigma) => format!("{} ± {}", fmt(s.sof_total), fmt(sigma)),
        None => fmt(s.sof_total),
    };
    println!();
    println!(
        "SOF = {total}  [{banner}]  {}  margin {}",
        if s.pass_limit { "PASS" } else { "FAIL" },
        fmt(s.margin_to_1)
    );
    println!("rule: {}", s.rule_name);
    if let Some(category) = &s.category {
        println!("category: {category}");
    }
    if !report.missing_limits.is_empty() {
        println!("missing limits: {}", report.missing_limits.join(", "));
    }
    if !report.unmapped_aliases.is_empty() {
        println!("unmapped names: {}", report.unmapped_aliases.join(", "));
    }
}

fn run_convert(value: f64, from: &str, to: &str, sigma: Option<f64>, sigfigs: usize) -> SofResult<()> {
    let registry = UnitRegistry::standard();
    let q = parse_quantity(&registry, value, from, sigma)?;
    let out = convert_to(&registry, &q, to)?;
    println!("{}", display_quantity(&out, sigfigs));
    Ok(())
}

fn run_canon(names: &[String], aliases: Option<PathBuf>, data_dir: &Path) -> SofResult<()> {
    let mut session = SessionConfig::from_env()?;
    if aliases.is_some() {
        session.alias_path = aliases;
    }
    let map = AliasMap::load_session(&session, data_dir)?;
    for name in names {
        let c = map.canonicalize(name);
        println!("{name}\t{}\t{:?}", c.name, c.source);
    }
    Ok(())
}

fn run_units() {
    let registry = UnitRegistry::standard();
    for unit in registry.base_units() {
        let prefix = if unit.prefixable { "prefixable" } else { "" };
        println!(
            "{:<8} {:<18} {:>12} {}",
            unit.symbol,
            unit.dimension.to_string(),
            format_significant(unit.scale, 6),
            prefix
        );
    }
    println!("blocked: {}", sof_units::BLOCKED_SYMBOLS.join(", "));
}
