/// Error types for the forecast grid engine
use thiserror::Error;

/// Errors raised by a scoring oracle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Segment metadata cannot be scored (e.g. zero distance)
    #[error("invalid segment {segment}: {reason}")]
    InvalidSegment { segment: String, reason: String },

    /// A weather snapshot carried unusable values
    #[error("invalid conditions: {0}")]
    InvalidConditions(String),
}

/// Main error type for grid construction
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Hour window bounds are out of range or inverted
    #[error("min and max must be in the range [0-23] with min < max but got min={min} max={max}")]
    InvalidWindow { min: u32, max: u32 },

    /// Padded grid did not contain 7 or 8 days
    #[error("{climb}: expected 8 (/7) days worth of data and got {found}")]
    DayCount { climb: String, found: usize },

    /// A padded day did not contain one slot per hour in the window
    #[error("{climb}: expected each day to have {expected} hours of data but {day} had {found}")]
    HourCount {
        climb: String,
        day: String,
        expected: usize,
        found: usize,
    },

    /// Another climb earlier in the input already owns this page slug
    #[error("{climb}: slug {slug} is already used by {owner}")]
    DuplicateSlug {
        climb: String,
        slug: String,
        owner: String,
    },

    /// The scoring oracle rejected a cell
    #[error("{climb}: failed to score conditions at {time}")]
    Oracle {
        climb: String,
        time: String,
        #[source]
        source: OracleError,
    },
}

impl ForecastError {
    /// Name of the climb this error belongs to, if any.
    pub fn climb(&self) -> Option<&str> {
        match self {
            ForecastError::InvalidWindow { .. } => None,
            ForecastError::DayCount { climb, .. }
            | ForecastError::HourCount { climb, .. }
            | ForecastError::DuplicateSlug { climb, .. }
            | ForecastError::Oracle { climb, .. } => Some(climb),
        }
    }
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
