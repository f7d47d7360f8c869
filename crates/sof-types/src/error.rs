use thiserror::Error;

use crate::dimension::Dimension;

#[derive(Error, Debug)]
pub enum SofError {
    #[error("Unrecognized unit '{token}'")]
    UnrecognizedUnit { token: String },

    #[error(
        "Counts unit '{unit}' is blocked: counts (cpm/cps) require a detector efficiency \
         and geometry correction to become activity. Pre-convert to dpm or Bq and re-run"
    )]
    BlockedUnit { unit: String },

    #[error("Invalid {what}: {value}")]
    InvalidValue { what: String, value: String },

    #[error("Cannot convert '{from}' ({from_dim}) to '{to}' ({to_dim}): incompatible dimensions")]
    DimensionMismatch {
        from: String,
        from_dim: Dimension,
        to: String,
        to_dim: Dimension,
    },

    #[error("Limit not found for nuclide '{nuclide}'")]
    MissingLimit { nuclide: String },

    #[error("Non-positive limit for {nuclide}: {value} {unit}")]
    NonPositiveLimit {
        nuclide: String,
        value: f64,
        unit: String,
    },

    #[error("Limits table has multiple rows for canonical nuclide(s): {}", nuclides.join(", "))]
    DuplicateLimit { nuclides: Vec<String> },

    #[error("No limits found for category '{category}'")]
    CategoryNotFound { category: String },

    #[error("{table} table is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Row {row} ({nuclide}): {source}")]
    Row {
        row: usize,
        nuclide: String,
        #[source]
        source: Box<SofError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SofError {
    /// Attach the 1-based data row and nuclide a failure belongs to.
    pub fn at_row(self, row: usize, nuclide: impl Into<String>) -> Self {
        SofError::Row {
            row,
            nuclide: nuclide.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through any row context.
    pub fn root(&self) -> &SofError {
        match self {
            SofError::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type SofResult<T> = Result<T, SofError>;
