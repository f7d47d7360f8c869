// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Models
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// One measured sample, as read from the samples table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub nuclide: String,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl SampleRow {
    pub fn new(nuclide: &str, value: f64, unit: &str) -> Self {
        SampleRow {
            nuclide: nuclide.trim().to_string(),
            value,
            unit: unit.to_string(),
            sigma: None,
            note: None,
            batch_id: None,
        }
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
}

/// One regulatory limit, as read from the limits table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitRow {
    pub nuclide: String,
    pub limit_value: f64,
    pub limit_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_rev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl LimitRow {
    pub fn new(nuclide: &str, limit_value: f64, limit_unit: &str) -> Self {
        LimitRow {
            nuclide: nuclide.trim().to_string(),
            limit_value,
            limit_unit: limit_unit.to_string(),
            category: None,
            rule_name: None,
            note: None,
            rule_rev: None,
            provenance: None,
        }
    }
}

/// Status banner shown alongside the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Green,
    Amber,
    Red,
}

impl Banner {
    /// Red above 1, amber in `[warn_threshold, 1]`, green below the threshold.
    pub fn classify(sof_total: f64, warn_threshold: f64) -> Self {
        if sof_total > 1.0 {
            Banner::Red
        } else if sof_total >= warn_threshold {
            Banner::Amber
        } else {
            Banner::Green
        }
    }
}

/// Per-nuclide line of a SOF report. All values are in the limit unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuclideResult {
    /// Canonical nuclide identifier.
    pub nuclide: String,
    /// Raw sample names that fed this line.
    pub raw_names: Vec<String>,
    /// Measured concentration, converted to `unit` when a limit exists.
    pub concentration: f64,
    pub concentration_sigma: Option<f64>,
    pub unit: String,
    pub limit_value: Option<f64>,
    pub fraction: f64,
    pub fraction_sigma: Option<f64>,
    /// `max(0, (1 - sof_total) * limit)`; absent when no limit matched.
    pub allowed_additional: Option<f64>,
    pub missing_limit: bool,
}

/// Aggregate outcome of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofSummary {
    pub sof_total: f64,
    pub sof_sigma: Option<f64>,
    pub pass_limit: bool,
    pub margin_to_1: f64,
    pub banner: Banner,
    pub warn_threshold: f64,
    pub rule_name: String,
    pub category: Option<String>,
}

impl SofSummary {
    pub fn from_fractions(
        fractions: &[f64],
        sigmas: &[Option<f64>],
        warn_threshold: f64,
        rule_name: String,
        category: Option<String>,
    ) -> Self {
        let sof_total: f64 = fractions.iter().sum();
        let known: Vec<f64> = sigmas.iter().flatten().copied().collect();
        let sof_sigma = if known.is_empty() {
            None
        } else {
            Some(known.iter().map(|s| s * s).sum::<f64>().sqrt())
        };
        SofSummary {
            sof_total,
            sof_sigma,
            pass_limit: sof_total <= 1.0,
            margin_to_1: 1.0 - sof_total,
            banner: Banner::classify(sof_total, warn_threshold),
            warn_threshold,
            rule_name,
            category,
        }
    }
}

/// Full result of a SOF computation. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofReport {
    pub rows: Vec<NuclideResult>,
    pub summary: SofSummary,
    /// Raw names that neither the alias table nor the canonical pattern mapped.
    pub unmapped_aliases: Vec<String>,
    /// Canonical nuclides that had no limit row.
    pub missing_limits: Vec<String>,
}

impl SofReport {
    pub fn row(&self, nuclide: &str) -> Option<&NuclideResult> {
        self.rows.iter().find(|r| r.nuclide == nuclide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_bands() {
        assert_eq!(Banner::classify(0.95, 0.90), Banner::Amber);
        assert_eq!(Banner::classify(1.0, 0.90), Banner::Amber);
        assert_eq!(Banner::classify(0.90, 0.90), Banner::Amber);
        assert_eq!(Banner::classify(0.5, 0.90), Banner::Green);
        assert_eq!(Banner::classify(1.0001, 0.90), Banner::Red);
    }

    #[test]
    fn test_summary_over_limit() {
        let s = SofSummary::from_fractions(
            &[0.4, 0.7],
            &[None, None],
            0.9,
            "10 CFR 20".to_string(),
            None,
        );
        assert!((s.sof_total - 1.1).abs() < 1e-12);
        assert!(!s.pass_limit);
        assert!((s.margin_to_1 + 0.1).abs() < 1e-12);
        assert_eq!(s.banner, Banner::Red);
        assert!(s.sof_sigma.is_none());
    }

    #[test]
    fn test_summary_sigma_quadrature() {
        let s = SofSummary::from_fractions(
            &[0.1, 0.2, 0.3],
            &[Some(0.03), None, Some(0.04)],
            0.9,
            String::new(),
            None,
        );
        assert!((s.sof_sigma.unwrap() - 0.05).abs() < 1e-12);
        assert_eq!(s.banner, Banner::Green);
    }

    #[test]
    fn test_sample_row_trims_nuclide() {
        let row = SampleRow::new("  Cs-137 ", 1.0, "Bq/g").with_sigma(0.1);
        assert_eq!(row.nuclide, "Cs-137");
        assert_eq!(row.sigma, Some(0.1));
    }
}
