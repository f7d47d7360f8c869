// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Unit String Normalizer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rewrites free-form unit strings into a canonical token structure.
//!
//! Rules, in order:
//! 1. trim, unify micro signs (`µ`, `μ`) to `u`, rewrite the word `per` to `/`,
//!    drop whitespace;
//! 2. exponents: `**`, `²`/`³` and a bare trailing `2`/`3` all become `^n`;
//! 3. `<activity>/100cm^2` is the surface idiom;
//! 4. `<a>/<b>` is a compound unit;
//! 5. anything else is a plain unit.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sof_types::error::{SofError, SofResult};

static RE_PER_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\s+per\s+").ok());

static RE_SURFACE_IDIOM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<activity>[^/]+)/100(?i:cm)\^?2$").ok());

static RE_BARE_EXPONENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<base>[A-Za-z]+)(?P<exp>[23])$").ok());

/// A unit string after syntactic normalization, before registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedUnit {
    /// A single symbol or name, e.g. `uSv`, `Bq`, `picocurie`.
    Plain(String),
    /// `<numerator>/<denominator>`, e.g. `uSv/h`, `Bq/g`, `dpm/cm^2`.
    Compound {
        numerator: String,
        denominator: String,
    },
    /// `<activity>/100cm^2` surface contamination notation.
    SurfaceIdiom { activity: String },
}

impl NormalizedUnit {
    /// Symbol tokens that must each resolve in the registry.
    pub fn components(&self) -> Vec<&str> {
        match self {
            NormalizedUnit::Plain(s) => vec![s.as_str()],
            NormalizedUnit::Compound {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
            NormalizedUnit::SurfaceIdiom { activity } => vec![activity.as_str()],
        }
    }
}

impl fmt::Display for NormalizedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedUnit::Plain(s) => f.write_str(s),
            NormalizedUnit::Compound {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
            NormalizedUnit::SurfaceIdiom { activity } => write!(f, "{activity}/100cm^2"),
        }
    }
}

/// Rules 1 and 2: whitespace, micro signs, `per`, exponent spelling.
pub fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut s = match RE_PER_WORD.as_ref() {
        Some(re) => re.replace_all(trimmed, "/").into_owned(),
        None => trimmed.to_string(),
    };
    s = s.replace(['\u{00B5}', '\u{03BC}'], "u");
    s = s.replace('\u{00B2}', "^2").replace('\u{00B3}', "^3");
    s.retain(|c| !c.is_whitespace());
    s.replace("**", "^")
}

/// Canonical exponent spelling for one symbol token (`cm2` → `cm^2`).
fn canonical_token(token: &str) -> String {
    match RE_BARE_EXPONENT.as_ref().and_then(|re| re.captures(token)) {
        Some(caps) => format!("{}^{}", &caps["base"], &caps["exp"]),
        None => token.to_string(),
    }
}

/// Rules 3 to 5 applied to an already cleaned string.
/// `raw` is only used to name the input in errors.
pub fn classify(cleaned: &str, raw: &str) -> SofResult<NormalizedUnit> {
    let unrecognized = || SofError::UnrecognizedUnit {
        token: raw.trim().to_string(),
    };
    if cleaned.is_empty() {
        return Err(unrecognized());
    }

    let parts: Vec<&str> = cleaned.split('/').collect();
    let parts: Vec<String> = parts.iter().map(|p| canonical_token(p)).collect();
    let rejoined = parts.join("/");

    if let Some(caps) = RE_SURFACE_IDIOM
        .as_ref()
        .and_then(|re| re.captures(&rejoined))
    {
        return Ok(NormalizedUnit::SurfaceIdiom {
            activity: caps["activity"].to_string(),
        });
    }

    match parts.as_slice() {
        [single] if !single.is_empty() => Ok(NormalizedUnit::Plain(single.clone())),
        [num, den] if !num.is_empty() && !den.is_empty() => Ok(NormalizedUnit::Compound {
            numerator: num.clone(),
            denominator: den.clone(),
        }),
        _ => Err(unrecognized()),
    }
}

pub fn normalize(raw: &str) -> SofResult<NormalizedUnit> {
    classify(&clean(raw), raw)
}
