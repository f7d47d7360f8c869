// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{ALIAS_PATH_ENV, CONFIG_PATH_ENV};
use crate::error::{SofError, SofResult};

/// Options for a single SOF computation.
/// Every field is optional in JSON; absent fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofOptions {
    /// Sum rows of the same canonical nuclide after conversion (default: true).
    #[serde(default = "default_combine_duplicates")]
    pub combine_duplicates: bool,
    /// Samples without a limit contribute 0 instead of failing (default: true).
    #[serde(default = "default_treat_missing_as_zero")]
    pub treat_missing_as_zero: bool,
    /// Lower edge of the amber banner band (default: 0.9).
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: f64,
    /// Significant figures used for display strings (default: 4).
    #[serde(default = "default_display_sigfigs")]
    pub display_sigfigs: usize,
    /// Restrict the limits table to one category (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_combine_duplicates() -> bool {
    true
}
fn default_treat_missing_as_zero() -> bool {
    true
}
fn default_warn_threshold() -> f64 {
    0.9
}
fn default_display_sigfigs() -> usize {
    4
}

impl Default for SofOptions {
    fn default() -> Self {
        SofOptions {
            combine_duplicates: default_combine_duplicates(),
            treat_missing_as_zero: default_treat_missing_as_zero(),
            warn_threshold: default_warn_threshold(),
            display_sigfigs: default_display_sigfigs(),
            category: None,
        }
    }
}

impl SofOptions {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> SofResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&contents)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> SofResult<()> {
        if !self.warn_threshold.is_finite()
            || self.warn_threshold <= 0.0
            || self.warn_threshold > 1.0
        {
            return Err(SofError::Config(format!(
                "warn_threshold must lie in (0, 1], got {}",
                self.warn_threshold
            )));
        }
        if self.display_sigfigs == 0 {
            return Err(SofError::Config(
                "display_sigfigs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Session-level configuration: where the alias table lives and which
/// options apply. Resolved once at start-up and passed down explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_path: Option<PathBuf>,
    #[serde(default)]
    pub options: SofOptions,
}

impl SessionConfig {
    /// Build from `SOF_CONFIG` (options JSON) and `SOF_ALIAS_PATH`.
    pub fn from_env() -> SofResult<Self> {
        let options = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => SofOptions::from_file(PathBuf::from(path))?,
            _ => SofOptions::default(),
        };
        let alias_path = std::env::var_os(ALIAS_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Ok(SessionConfig {
            alias_path,
            options,
        })
    }
}
