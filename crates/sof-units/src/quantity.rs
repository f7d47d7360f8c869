// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Quantity Parser
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Typed measurement values with optional 1-σ uncertainty.

use std::fmt;

use sof_types::constants::SURFACE_IDIOM_TO_M2;
use sof_types::dimension::Dimension;
use sof_types::error::{SofError, SofResult};

use crate::normalize::NormalizedUnit;
use crate::registry::{Unit, UnitRegistry};

/// A value in a resolved unit. `sigma`, when present, is in the same unit.
/// Immutable: conversion builds a new quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: f64,
    unit: Unit,
    sigma: Option<f64>,
}

impl Quantity {
    /// Checked constructor: value finite, sigma finite and non-negative.
    pub fn new(value: f64, unit: Unit, sigma: Option<f64>) -> SofResult<Self> {
        if !value.is_finite() {
            return Err(SofError::InvalidValue {
                what: format!("value for unit '{}'", unit.symbol),
                value: value.to_string(),
            });
        }
        if let Some(s) = sigma {
            if !s.is_finite() || s < 0.0 {
                return Err(SofError::InvalidValue {
                    what: format!("sigma for unit '{}'", unit.symbol),
                    value: s.to_string(),
                });
            }
        }
        Ok(Quantity { value, unit, sigma })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    /// Value expressed in the base unit of the dimension.
    pub fn to_base(&self) -> f64 {
        self.value * self.unit.scale
    }

    /// Same value and sigma multiplied by `factor`, relabelled as `unit`.
    /// Fails when the scaled value or sigma leaves the finite range.
    pub(crate) fn rescaled(&self, factor: f64, unit: Unit) -> SofResult<Quantity> {
        Quantity::new(
            self.value * factor,
            unit,
            self.sigma.map(|s| s * factor.abs()),
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sigma {
            Some(s) => write!(f, "{} ± {} {}", self.value, s, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

/// Parse a measurement into a [`Quantity`].
///
/// Counts units are refused before any scaling. The surface idiom
/// (`<activity>/100 cm^2`) is normalized here: value and sigma are scaled
/// by 10 000 / 100 and the unit becomes `<activity>/m^2`.
pub fn parse_quantity(
    registry: &UnitRegistry,
    value: f64,
    unit: &str,
    sigma: Option<f64>,
) -> SofResult<Quantity> {
    let normalized = registry.normalize_checked(unit)?;
    match normalized {
        NormalizedUnit::SurfaceIdiom { activity } => {
            let per_m2 = registry.surface_per_m2(&activity)?;
            let q = Quantity::new(value, per_m2.clone(), sigma)?;
            q.rescaled(SURFACE_IDIOM_TO_M2, per_m2)
        }
        other => {
            let resolved = registry.resolve(&other)?;
            Quantity::new(value, resolved, sigma)
        }
    }
}
