// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Unit Registry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Curated radiological unit set.
//!
//! Every unit carries a scale factor to the base unit of its dimension
//! (Bq, Sv, Sv/h, s, Bq/m², ...). Counts-based symbols are known to the
//! registry only so that they can be refused.

use std::collections::HashMap;
use std::fmt;

use sof_types::constants::{
    BQ_PER_CI, BQ_PER_DPM, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SV_PER_REM,
    SURFACE_IDIOM_TO_M2,
};
use sof_types::dimension::Dimension;
use sof_types::error::{SofError, SofResult};

use crate::normalize::{self, NormalizedUnit};

/// Symbols that denote detector counts. They are never converted.
pub const BLOCKED_SYMBOLS: [&str; 4] = ["counts", "count", "cpm", "cps"];

/// A resolved unit: immutable symbol, dimension and scale to base.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub symbol: String,
    pub dimension: Dimension,
    /// Multiply a value in this unit by `scale` to get the base unit.
    pub scale: f64,
}

impl Unit {
    pub fn new(symbol: impl Into<String>, dimension: Dimension, scale: f64) -> Self {
        Unit {
            symbol: symbol.into(),
            dimension,
            scale,
        }
    }

    /// Factor taking a value in `self` to a value in `target`.
    pub fn factor_to(&self, target: &Unit) -> f64 {
        self.scale / target.scale
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// Registry entry for an unprefixed unit.
#[derive(Debug, Clone)]
pub struct BaseUnit {
    pub symbol: &'static str,
    pub dimension: Dimension,
    pub scale: f64,
    /// Accepts SI prefixes (`kBq`, `uSv`, `pCi`, ...).
    pub prefixable: bool,
    /// Lower-case long names, singular.
    pub names: &'static [&'static str],
}

/// SI prefix in symbol and long-name form.
#[derive(Debug, Clone, Copy)]
pub struct Prefix {
    pub symbol: &'static str,
    pub name: &'static str,
    pub factor: f64,
}

const PREFIXES: [Prefix; 8] = [
    Prefix { symbol: "T", name: "tera", factor: 1e12 },
    Prefix { symbol: "G", name: "giga", factor: 1e9 },
    Prefix { symbol: "M", name: "mega", factor: 1e6 },
    Prefix { symbol: "k", name: "kilo", factor: 1e3 },
    Prefix { symbol: "m", name: "milli", factor: 1e-3 },
    Prefix { symbol: "u", name: "micro", factor: 1e-6 },
    Prefix { symbol: "n", name: "nano", factor: 1e-9 },
    Prefix { symbol: "p", name: "pico", factor: 1e-12 },
];

fn base(
    symbol: &'static str,
    dimension: Dimension,
    scale: f64,
    prefixable: bool,
    names: &'static [&'static str],
) -> BaseUnit {
    BaseUnit {
        symbol,
        dimension,
        scale,
        prefixable,
        names,
    }
}

/// Read-only unit table, built once per session and passed by reference.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<BaseUnit>,
    by_symbol: HashMap<&'static str, usize>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitRegistry {
    /// The curated radiological unit set.
    pub fn standard() -> Self {
        use Dimension::*;
        let units = vec![
            // Activity
            base("Bq", Activity, 1.0, true, &["becquerel"]),
            base("Ci", Activity, BQ_PER_CI, true, &["curie"]),
            base("dpm", Activity, BQ_PER_DPM, false, &["disintegrations_per_minute"]),
            base("dps", Activity, 1.0, false, &["disintegrations_per_second"]),
            // Dose
            base("Sv", Dose, 1.0, true, &["sievert"]),
            base("rem", Dose, SV_PER_REM, true, &["rem"]),
            // Time
            base("s", Time, 1.0, false, &["second", "sec"]),
            base("min", Time, SECONDS_PER_MINUTE, false, &["minute"]),
            base("h", Time, SECONDS_PER_HOUR, false, &["hour", "hr"]),
            base("d", Time, SECONDS_PER_DAY, false, &["day"]),
            // Mass, volume, area (denominators of concentrations)
            base("g", Mass, 1e-3, true, &["gram"]),
            base("L", Volume, 1e-3, true, &["liter", "litre"]),
            base("l", Volume, 1e-3, true, &[]),
            base("m^3", Volume, 1.0, false, &["meter^3", "metre^3"]),
            base("cm^3", Volume, 1e-6, false, &["centimeter^3", "centimetre^3", "cc"]),
            base("m^2", Area, 1.0, false, &["meter^2", "metre^2"]),
            base("cm^2", Area, 1e-4, false, &["centimeter^2", "centimetre^2"]),
            base("mm^2", Area, 1e-6, false, &["millimeter^2", "millimetre^2"]),
        ];
        let by_symbol = units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.symbol, i))
            .collect();
        UnitRegistry { units, by_symbol }
    }

    /// True for counts-like symbols, any case, with or without a plural `s`.
    pub fn is_blocked(symbol: &str) -> bool {
        let lower = symbol.to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(lower.as_str());
        BLOCKED_SYMBOLS.contains(&lower.as_str()) || BLOCKED_SYMBOLS.contains(&singular)
    }

    /// Normalize `raw` and refuse counts units before anything else happens.
    pub fn normalize_checked(&self, raw: &str) -> SofResult<NormalizedUnit> {
        let cleaned = normalize::clean(raw);
        if cleaned.split('/').any(Self::is_blocked) {
            return Err(SofError::BlockedUnit {
                unit: raw.trim().to_string(),
            });
        }
        normalize::classify(&cleaned, raw)
    }

    /// Resolve a single symbol or long name.
    pub fn lookup(&self, token: &str) -> SofResult<Unit> {
        if Self::is_blocked(token) {
            return Err(SofError::BlockedUnit {
                unit: token.to_string(),
            });
        }
        if let Some(&idx) = self.by_symbol.get(token) {
            let b = &self.units[idx];
            return Ok(Unit::new(b.symbol, b.dimension, b.scale));
        }
        for prefix in &PREFIXES {
            if let Some(rest) = token.strip_prefix(prefix.symbol) {
                if let Some(b) = self.prefixable(rest) {
                    return Ok(Unit::new(
                        format!("{}{}", prefix.symbol, b.symbol),
                        b.dimension,
                        prefix.factor * b.scale,
                    ));
                }
            }
        }
        self.lookup_name(token).ok_or_else(|| SofError::UnrecognizedUnit {
            token: token.to_string(),
        })
    }

    fn prefixable(&self, symbol: &str) -> Option<&BaseUnit> {
        self.by_symbol
            .get(symbol)
            .map(|&i| &self.units[i])
            .filter(|b| b.prefixable)
    }

    /// Case-insensitive long names (`microsievert`, `hours`) and bare
    /// symbols in the wrong case (`BQ`). Prefixed symbols stay case-sensitive.
    fn lookup_name(&self, token: &str) -> Option<Unit> {
        let lower = token.to_lowercase();
        let mut stems = vec![lower.as_str()];
        if let Some(singular) = lower.strip_suffix('s') {
            stems.push(singular);
        }
        for stem in stems {
            for b in &self.units {
                if b.symbol.to_lowercase() == stem || b.names.contains(&stem) {
                    return Some(Unit::new(b.symbol, b.dimension, b.scale));
                }
            }
            for prefix in &PREFIXES {
                let Some(rest) = stem.strip_prefix(prefix.name) else {
                    continue;
                };
                if let Some(b) = self
                    .units
                    .iter()
                    .find(|b| b.prefixable && b.names.contains(&rest))
                {
                    return Some(Unit::new(
                        format!("{}{}", prefix.symbol, b.symbol),
                        b.dimension,
                        prefix.factor * b.scale,
                    ));
                }
            }
        }
        None
    }

    /// Resolve a normalized unit. The surface idiom resolves to its
    /// per-100 cm² unit, i.e. `activity scale × 100` relative to Bq/m².
    pub fn resolve(&self, normalized: &NormalizedUnit) -> SofResult<Unit> {
        match normalized {
            NormalizedUnit::Plain(token) => self.lookup(token),
            NormalizedUnit::Compound {
                numerator,
                denominator,
            } => {
                let num = self.lookup(numerator)?;
                let den = self.lookup(denominator)?;
                let dimension = num.dimension.per(den.dimension).ok_or_else(|| {
                    SofError::UnrecognizedUnit {
                        token: normalized.to_string(),
                    }
                })?;
                // Dose rate is based on Sv/h rather than Sv/s.
                let den_scale = if dimension == Dimension::DoseRate {
                    den.scale / SECONDS_PER_HOUR
                } else {
                    den.scale
                };
                Ok(Unit::new(
                    format!("{}/{}", num.symbol, den.symbol),
                    dimension,
                    num.scale / den_scale,
                ))
            }
            NormalizedUnit::SurfaceIdiom { activity } => {
                let act = self.activity(activity)?;
                Ok(Unit::new(
                    format!("{}/100cm^2", act.symbol),
                    Dimension::SurfaceActivity,
                    act.scale * SURFACE_IDIOM_TO_M2,
                ))
            }
        }
    }

    /// `<activity>/m^2`, the unit surface-idiom quantities are stored in.
    pub fn surface_per_m2(&self, activity: &str) -> SofResult<Unit> {
        let act = self.activity(activity)?;
        Ok(Unit::new(
            format!("{}/m^2", act.symbol),
            Dimension::SurfaceActivity,
            act.scale,
        ))
    }

    fn activity(&self, token: &str) -> SofResult<Unit> {
        let unit = self.lookup(token)?;
        if unit.dimension != Dimension::Activity {
            return Err(SofError::UnrecognizedUnit {
                token: format!("{token}/100cm^2"),
            });
        }
        Ok(unit)
    }

    /// Normalize, apply the counts gate and resolve.
    pub fn resolve_str(&self, raw: &str) -> SofResult<Unit> {
        let normalized = self.normalize_checked(raw)?;
        self.resolve(&normalized)
    }

    /// All unprefixed units, for listings.
    pub fn base_units(&self) -> &[BaseUnit] {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> UnitRegistry {
        UnitRegistry::standard()
    }

    #[test]
    fn test_prefixed_symbols() {
        let r = reg();
        let kbq = r.lookup("kBq").unwrap();
        assert_eq!(kbq.dimension, Dimension::Activity);
        assert!((kbq.scale - 1e3).abs() < 1e-9);

        let pci = r.lookup("pCi").unwrap();
        assert!((pci.scale - 0.037).abs() < 1e-15);

        let mrem = r.lookup("mrem").unwrap();
        assert_eq!(mrem.dimension, Dimension::Dose);
        assert!((mrem.scale - 1e-5).abs() < 1e-18);
    }

    #[test]
    fn test_prefix_case_matters() {
        let r = reg();
        assert!((r.lookup("MBq").unwrap().scale - 1e6).abs() < 1e-6);
        assert!((r.lookup("mBq").unwrap().scale - 1e-3).abs() < 1e-15);
    }

    #[test]
    fn test_unprefixable_units_reject_prefix() {
        let r = reg();
        assert!(matches!(
            r.lookup("kdpm"),
            Err(SofError::UnrecognizedUnit { .. })
        ));
        // "min" is minutes, not milli-inches.
        assert_eq!(r.lookup("min").unwrap().dimension, Dimension::Time);
    }

    #[test]
    fn test_long_names() {
        let r = reg();
        assert_eq!(r.lookup("becquerel").unwrap().symbol, "Bq");
        assert_eq!(r.lookup("Microsieverts").unwrap().symbol, "uSv");
        assert_eq!(r.lookup("picocurie").unwrap().symbol, "pCi");
        assert_eq!(r.lookup("hours").unwrap().symbol, "h");
        assert_eq!(r.lookup("meter^2").unwrap().symbol, "m^2");
        assert_eq!(r.lookup("BQ").unwrap().symbol, "Bq");
    }

    #[test]
    fn test_blocked_detection() {
        for s in ["counts", "COUNT", "cpm", "CPS", "Cpms", "Counts"] {
            assert!(UnitRegistry::is_blocked(s), "{s}");
        }
        for s in ["Bq", "dpm", "dps", "Ci", "s"] {
            assert!(!UnitRegistry::is_blocked(s), "{s}");
        }
    }

    #[test]
    fn test_blocked_gate_runs_first() {
        let r = reg();
        for raw in ["cpm", "counts/min", "counts per minute", "cps/100 cm^2", "count/s/x"] {
            match r.resolve_str(raw) {
                Err(SofError::BlockedUnit { unit }) => assert_eq!(unit, raw),
                other => panic!("Expected BlockedUnit for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_dose_rate_scale() {
        let r = reg();
        let usv_h = r.resolve_str("uSv/h").unwrap();
        assert_eq!(usv_h.dimension, Dimension::DoseRate);
        assert!((usv_h.scale - 1e-6).abs() < 1e-18);
        let sv_min = r.resolve_str("Sv/min").unwrap();
        assert!((sv_min.scale - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_concentration_dimensions() {
        let r = reg();
        assert_eq!(
            r.resolve_str("Bq/g").unwrap().dimension,
            Dimension::MassActivity
        );
        assert_eq!(
            r.resolve_str("pCi/L").unwrap().dimension,
            Dimension::VolumeActivity
        );
        assert_eq!(
            r.resolve_str("MBq/h").unwrap().dimension,
            Dimension::ActivityRate
        );
        assert_eq!(
            r.resolve_str("dpm/cm^2").unwrap().dimension,
            Dimension::SurfaceActivity
        );
    }

    #[test]
    fn test_surface_idiom_units() {
        let r = reg();
        let idiom = r.resolve_str("dpm/100 cm^2").unwrap();
        assert_eq!(idiom.symbol, "dpm/100cm^2");
        assert!((idiom.scale - 100.0 / 60.0).abs() < 1e-12);

        let per_m2 = r.surface_per_m2("dpm").unwrap();
        assert_eq!(per_m2.symbol, "dpm/m^2");
        assert!((per_m2.scale - 1.0 / 60.0).abs() < 1e-15);

        assert!(matches!(
            r.resolve_str("Sv/100 cm^2"),
            Err(SofError::UnrecognizedUnit { .. })
        ));
    }

    #[test]
    fn test_meaningless_compound_rejected() {
        let r = reg();
        match r.resolve_str("Sv/m^2") {
            Err(SofError::UnrecognizedUnit { token }) => assert_eq!(token, "Sv/m^2"),
            other => panic!("Expected UnrecognizedUnit, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_symbol_named() {
        match reg().resolve_str("furlong/fortnight") {
            Err(SofError::UnrecognizedUnit { token }) => assert_eq!(token, "furlong"),
            other => panic!("Expected UnrecognizedUnit, got {other:?}"),
        }
    }
}
