// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — CSV Pipeline Integration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Load the bundled example tables, compute, export, audit.

use std::path::PathBuf;

use sof_engine::{
    load_limits, load_samples, write_results_csv, AliasMap, AuditInputs, AuditRecord, InputFile,
    SofEngine,
};
use sof_types::config::{SessionConfig, SofOptions};
use sof_types::error::SofError;
use sof_types::models::Banner;
use sof_units::UnitRegistry;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn soil() -> SofOptions {
    SofOptions {
        category: Some("Soil".to_string()),
        ..SofOptions::default()
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[test]
fn test_example_site_report() {
    let dir = data_dir();
    let samples = load_samples(dir.join("example_samples.csv")).unwrap();
    let limits = load_limits(dir.join("example_limits.csv")).unwrap();
    let aliases = AliasMap::from_path(dir.join("nuclide_aliases.csv")).unwrap();
    let registry = UnitRegistry::standard();
    let report = SofEngine::new(&registry, &aliases)
        .compute(&samples, &limits, &soil())
        .unwrap();

    let cs = report.row("Cs-137").unwrap();
    assert!(close(cs.concentration, 0.5));
    assert!(close(cs.concentration_sigma.unwrap(), 0.001_325f64.sqrt()));
    assert_eq!(cs.raw_names, vec!["Cs137", "Cesium-137"]);

    let co = report.row("Co-60").unwrap();
    assert!(close(co.fraction, 0.925));

    assert!(close(report.row("Sr-90").unwrap().fraction, 0.12));
    assert!(close(report.row("H-3").unwrap().fraction, 0.015));

    assert!(close(report.summary.sof_total, 1.56));
    assert_eq!(report.summary.banner, Banner::Red);
    assert_eq!(report.summary.rule_name, "Site release criteria");
    assert_eq!(report.unmapped_aliases, vec!["gross alpha"]);
    assert_eq!(report.missing_limits, vec!["gross alpha"]);
}

#[test]
fn test_unfiltered_limits_have_duplicates() {
    let dir = data_dir();
    let samples = load_samples(dir.join("example_samples.csv")).unwrap();
    let limits = load_limits(dir.join("example_limits.csv")).unwrap();
    let err = sof_engine::compute(&samples, &limits, &AliasMap::new(), &SofOptions::default())
        .unwrap_err();
    assert!(matches!(err, SofError::DuplicateLimit { ref nuclides } if nuclides == &["Cs-137"]));
}

#[test]
fn test_results_and_audit_written() {
    let dir = data_dir();
    let out = tempfile::tempdir().unwrap();
    let samples_path = dir.join("example_samples.csv");
    let limits_path = dir.join("example_limits.csv");

    let config = SessionConfig {
        alias_path: None,
        options: soil(),
    };
    let aliases = AliasMap::load_session(&config, &dir).unwrap();
    assert!(!aliases.is_empty());

    let samples = load_samples(&samples_path).unwrap();
    let limits = load_limits(&limits_path).unwrap();
    let report = sof_engine::compute(&samples, &limits, &aliases, &config.options).unwrap();

    let results_path = out.path().join("reports").join("results.csv");
    write_results_csv(&results_path, &report, config.options.display_sigfigs).unwrap();

    let mut rdr = csv::Reader::from_path(&results_path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers[0], "nuclide");
    assert_eq!(headers.len(), 7);
    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), report.rows.len());
    let alpha = rows.iter().find(|r| &r[0] == "gross alpha").unwrap();
    assert_eq!(&alpha[6], "missing_limit");

    let inputs = AuditInputs {
        samples: Some(InputFile::from_path(&samples_path).unwrap()),
        limits: Some(InputFile::from_path(&limits_path).unwrap()),
        aliases: aliases
            .sources()
            .iter()
            .map(|p| InputFile::from_path(p).unwrap())
            .collect(),
    };
    let audit_path = out.path().join("audit.json");
    AuditRecord::new(&report, &config.options, inputs)
        .write(&audit_path)
        .unwrap();

    let audit: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&audit_path).unwrap()).unwrap();
    assert_eq!(audit["sof_summary"]["pass_limit"], false);
    assert_eq!(audit["sof_summary"]["banner"], "red");
    assert_eq!(audit["options"]["category"], "Soil");
    assert_eq!(audit["inputs"]["samples"]["sha256"].as_str().unwrap().len(), 64);
    assert_eq!(audit["inputs"]["aliases"].as_array().unwrap().len(), 1);
}

#[test]
fn test_collecting_run_over_edited_table() {
    let out = tempfile::tempdir().unwrap();
    let samples_path = out.path().join("samples.csv");
    std::fs::write(
        &samples_path,
        "nuclide,value,unit\nCs-137,0.2,Bq/g\nCo-60,40,cpm\nH-3,10,Bq/g\n",
    )
    .unwrap();
    let limits = load_limits(data_dir().join("example_limits.csv")).unwrap();
    let samples = load_samples(&samples_path).unwrap();

    let registry = UnitRegistry::standard();
    let aliases = AliasMap::new();
    let run = SofEngine::new(&registry, &aliases)
        .compute_collecting(&samples, &limits, &soil())
        .unwrap();

    let rejected: Vec<_> = run.rejected().collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].row, 2);
    assert_eq!(rejected[0].nuclide, "Co-60");
    assert!(close(run.report.summary.sof_total, 0.3));
}
