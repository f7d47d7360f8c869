// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — SOF Units
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Unit registry, unit-string normalization, quantity parsing and
//! conversion for the curated radiological unit set.

pub mod convert;
pub mod format;
pub mod normalize;
pub mod quantity;
pub mod registry;

pub use convert::{combine, convert_to, convert_to_unit};
pub use format::{display_quantity, format_significant};
pub use normalize::{normalize, NormalizedUnit};
pub use quantity::{parse_quantity, Quantity};
pub use registry::{Unit, UnitRegistry, BLOCKED_SYMBOLS};
