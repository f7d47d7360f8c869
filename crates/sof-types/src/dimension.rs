// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Dimensions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Unit families of the curated radiological unit set.
//!
//! Units convert only within a single dimension. Composite dimensions are
//! formed by dividing an activity or dose unit by a time, area, mass or
//! volume unit; see [`Dimension::per`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Base Bq.
    Activity,
    /// Base Sv.
    Dose,
    /// Base Sv/h.
    DoseRate,
    /// Base s.
    Time,
    /// Base Bq/m².
    SurfaceActivity,
    /// Base Bq/kg.
    MassActivity,
    /// Base Bq/m³.
    VolumeActivity,
    /// Base Bq/s.
    ActivityRate,
    /// Base kg. Mostly seen as a denominator.
    Mass,
    /// Base m³.
    Volume,
    /// Base m².
    Area,
}

impl Dimension {
    /// Symbol of the base unit every scale factor of this dimension refers to.
    pub fn base_symbol(self) -> &'static str {
        match self {
            Dimension::Activity => "Bq",
            Dimension::Dose => "Sv",
            Dimension::DoseRate => "Sv/h",
            Dimension::Time => "s",
            Dimension::SurfaceActivity => "Bq/m^2",
            Dimension::MassActivity => "Bq/kg",
            Dimension::VolumeActivity => "Bq/m^3",
            Dimension::ActivityRate => "Bq/s",
            Dimension::Mass => "kg",
            Dimension::Volume => "m^3",
            Dimension::Area => "m^2",
        }
    }

    /// Composite dimension of `self / denominator`, if the pair is meaningful.
    pub fn per(self, denominator: Dimension) -> Option<Dimension> {
        match (self, denominator) {
            (Dimension::Dose, Dimension::Time) => Some(Dimension::DoseRate),
            (Dimension::Activity, Dimension::Time) => Some(Dimension::ActivityRate),
            (Dimension::Activity, Dimension::Area) => Some(Dimension::SurfaceActivity),
            (Dimension::Activity, Dimension::Mass) => Some(Dimension::MassActivity),
            (Dimension::Activity, Dimension::Volume) => Some(Dimension::VolumeActivity),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Activity => "activity",
            Dimension::Dose => "dose",
            Dimension::DoseRate => "dose rate",
            Dimension::Time => "time",
            Dimension::SurfaceActivity => "surface activity",
            Dimension::MassActivity => "mass activity",
            Dimension::VolumeActivity => "volume activity",
            Dimension::ActivityRate => "activity rate",
            Dimension::Mass => "mass",
            Dimension::Volume => "volume",
            Dimension::Area => "area",
        };
        f.write_str(name)
    }
}
