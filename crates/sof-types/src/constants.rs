// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Becquerel per curie (exact by definition).
pub const BQ_PER_CI: f64 = 3.7e10;

/// Becquerel per disintegration per minute.
pub const BQ_PER_DPM: f64 = 1.0 / 60.0;

/// Sievert per rem.
pub const SV_PER_REM: f64 = 0.01;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Square centimetres per square metre.
pub const CM2_PER_M2: f64 = 10_000.0;

/// Reference area of the surface contamination idiom (`dpm/100 cm^2`) [cm²].
pub const SURFACE_IDIOM_AREA_CM2: f64 = 100.0;

/// Factor taking a per-100 cm² value to a per-m² value.
pub const SURFACE_IDIOM_TO_M2: f64 = CM2_PER_M2 / SURFACE_IDIOM_AREA_CM2;

/// Environment variable naming the nuclide alias file.
pub const ALIAS_PATH_ENV: &str = "SOF_ALIAS_PATH";

/// Environment variable naming a JSON options file.
pub const CONFIG_PATH_ENV: &str = "SOF_CONFIG";

/// Rule name reported when no matched limit row names one.
pub const UNSPECIFIED_RULE: &str = "(unspecified)";
