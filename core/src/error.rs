use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    // ── Configuration errors: raised before the first random draw ──
    #[error("Catalog '{catalog}' is empty")]
    EmptyCatalog { catalog: &'static str },

    #[error("Catalog '{catalog}' has no entries for '{key}'")]
    IncompleteCatalog { catalog: &'static str, key: String },

    #[error("Day horizon must be at least 1, got {days}")]
    NonPositiveHorizon { days: u32 },

    #[error("Invalid date range for '{field}': {start} is after {end}")]
    InvalidDateRange {
        field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // ── Output errors ──────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// True for the fatal configuration taxonomy. These are never retried;
    /// the run is rejected before generation starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyCatalog { .. }
                | Self::IncompleteCatalog { .. }
                | Self::NonPositiveHorizon { .. }
                | Self::InvalidDateRange { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
