// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Unit Converter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Same-dimension conversion and duplicate combination.
//!
//! All curated units are ratio-scale, so conversion is the single linear
//! factor `source.scale / target.scale`, applied to value and sigma alike.

use sof_types::error::{SofError, SofResult};

use crate::quantity::Quantity;
use crate::registry::{Unit, UnitRegistry};

/// Convert `q` to the unit named by `target`.
/// The target goes through the same normalization and counts gate as parsing.
pub fn convert_to(registry: &UnitRegistry, q: &Quantity, target: &str) -> SofResult<Quantity> {
    let target_unit = registry.resolve_str(target)?;
    convert_to_unit(q, &target_unit)
}

/// Convert `q` to an already resolved unit.
pub fn convert_to_unit(q: &Quantity, target: &Unit) -> SofResult<Quantity> {
    let source = q.unit();
    if source.dimension != target.dimension {
        return Err(SofError::DimensionMismatch {
            from: source.symbol.clone(),
            from_dim: source.dimension,
            to: target.symbol.clone(),
            to_dim: target.dimension,
        });
    }
    q.rescaled(source.factor_to(target), target.clone())
}

/// Sum quantities in the unit of the first one; sigmas add in quadrature.
///
/// Missing sigmas count as zero. The result carries no sigma only when no
/// input had one.
pub fn combine(quantities: &[Quantity]) -> SofResult<Quantity> {
    let Some(first) = quantities.first() else {
        return Err(SofError::InvalidValue {
            what: "combination".to_string(),
            value: "no quantities".to_string(),
        });
    };
    let unit = first.unit().clone();

    let mut total = 0.0;
    let mut variance = 0.0;
    let mut any_sigma = false;
    for q in quantities {
        let converted = convert_to_unit(q, &unit)?;
        total += converted.value();
        if let Some(s) = converted.sigma() {
            variance += s * s;
            any_sigma = true;
        }
    }

    let sigma = any_sigma.then(|| variance.sqrt());
    Quantity::new(total, unit, sigma)
}
