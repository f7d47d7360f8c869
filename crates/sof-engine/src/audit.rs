// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Audit Record
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! JSON audit trail: what was computed, from which inputs (by SHA-256),
//! under which options and assumptions.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sof_types::config::SofOptions;
use sof_types::error::SofResult;
use sof_types::models::{Banner, SofReport};
use tracing::info;

/// A file read by the computation, fingerprinted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    pub sha256: String,
}

impl InputFile {
    pub fn from_path(path: impl AsRef<Path>) -> SofResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(InputFile {
            path: path.to_path_buf(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditInputs {
    pub samples: Option<InputFile>,
    pub limits: Option<InputFile>,
    #[serde(default)]
    pub aliases: Vec<InputFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub sof_total: f64,
    pub sof_sigma: Option<f64>,
    pub pass_limit: bool,
    pub margin_to_1: f64,
    pub category: Option<String>,
    pub rule_name: String,
    pub warn_threshold: f64,
    pub banner: Banner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub app_version: String,
    pub sof_summary: AuditSummary,
    pub inputs: AuditInputs,
    pub options: SofOptions,
    pub unmapped_aliases: Vec<String>,
    pub missing_limits: Vec<String>,
    pub assumptions: Vec<String>,
}

fn assumptions(options: &SofOptions) -> Vec<String> {
    let mut out = vec![
        "Counts units (counts, cpm, cps) are rejected; no efficiency or geometry \
         correction is applied."
            .to_string(),
        "dpm/100 cm^2 is normalized to per m^2; sigma is rescaled with the value."
            .to_string(),
        "Sample values are converted to each limit's unit before division.".to_string(),
        "Fraction uncertainties combine in quadrature; correlations are ignored.".to_string(),
    ];
    out.push(if options.combine_duplicates {
        "Rows of the same canonical nuclide are summed before division.".to_string()
    } else {
        "Rows of the same canonical nuclide are reported separately.".to_string()
    });
    out.push(if options.treat_missing_as_zero {
        "Nuclides without a limit contribute zero and are listed as missing.".to_string()
    } else {
        "A nuclide without a limit aborts the computation.".to_string()
    });
    out
}

impl AuditRecord {
    pub fn new(report: &SofReport, options: &SofOptions, inputs: AuditInputs) -> Self {
        let s = &report.summary;
        AuditRecord {
            timestamp: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            sof_summary: AuditSummary {
                sof_total: s.sof_total,
                sof_sigma: s.sof_sigma,
                pass_limit: s.pass_limit,
                margin_to_1: s.margin_to_1,
                category: s.category.clone(),
                rule_name: s.rule_name.clone(),
                warn_threshold: s.warn_threshold,
                banner: s.banner,
            },
            inputs,
            options: options.clone(),
            unmapped_aliases: report.unmapped_aliases.clone(),
            missing_limits: report.missing_limits.clone(),
            assumptions: assumptions(options),
        }
    }

    /// Pretty JSON at `path`, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> SofResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), "wrote audit record");
        Ok(())
    }
}
