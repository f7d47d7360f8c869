// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Results Export
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::io::Write;
use std::path::Path;

use sof_types::error::SofResult;
use sof_types::models::{NuclideResult, SofReport};
use sof_units::format_significant;
use tracing::info;

pub const RESULTS_HEADER: [&str; 7] = [
    "nuclide",
    "conc",
    "limit",
    "fraction",
    "fraction_sigma",
    "allowed_additional",
    "flags",
];

fn with_unit(value: f64, unit: &str, sigfigs: usize) -> String {
    format!("{} {unit}", format_significant(value, sigfigs))
}

fn flags(row: &NuclideResult) -> String {
    let mut flags = Vec::new();
    if row.missing_limit {
        flags.push("missing_limit");
    }
    if row.raw_names.len() > 1 {
        flags.push("combined");
    }
    flags.join(";")
}

fn record(row: &NuclideResult, sigfigs: usize) -> [String; 7] {
    let fmt = |v: f64| format_significant(v, sigfigs);
    let conc = match row.concentration_sigma {
        Some(s) => format!("{} ± {} {}", fmt(row.concentration), fmt(s), row.unit),
        None => with_unit(row.concentration, &row.unit, sigfigs),
    };
    [
        row.nuclide.clone(),
        conc,
        row.limit_value
            .map(|l| with_unit(l, &row.unit, sigfigs))
            .unwrap_or_default(),
        fmt(row.fraction),
        row.fraction_sigma.map(fmt).unwrap_or_default(),
        row.allowed_additional
            .map(|a| with_unit(a, &row.unit, sigfigs))
            .unwrap_or_default(),
        flags(row),
    ]
}

/// One line per nuclide, display values rounded to `sigfigs`.
pub fn write_results<W: Write>(writer: W, report: &SofReport, sigfigs: usize) -> SofResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(RESULTS_HEADER)?;
    for row in &report.rows {
        wtr.write_record(record(row, sigfigs))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the results table to `path`, creating parent directories.
pub fn write_results_csv(path: impl AsRef<Path>, report: &SofReport, sigfigs: usize) -> SofResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_results(std::fs::File::create(path)?, report, sigfigs)?;
    info!(path = %path.display(), rows = report.rows.len(), "wrote results CSV");
    Ok(())
}
