use thiserror::Error;

use crate::domain::utils::id::{CamperId, ClassId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write CSV export: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid class catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid camper roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("No feasible schedule found: {failed} of {attempted} trials failed")]
    NoFeasibleSchedule { attempted: usize, failed: usize },

    #[error("Too many failed trials: {failed} of {attempted} failed (allowed ratio {max_ratio})")]
    TooManyFailedTrials { attempted: usize, failed: usize, max_ratio: f64 },

    #[error("Search was cancelled before any trial completed")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single trial. The driver discards the trial and moves on,
/// these never reach the caller directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error("Ranking of camper {camper} exhausted before three eligible choices were found")]
    ChoiceExhausted { camper: CamperId },

    #[error("Camper {camper} could not be placed in {class} or any lower ranked class")]
    EnrollmentExhausted { camper: CamperId, class: ClassId },

    #[error("No period instance exists for non-eliminated class {class}")]
    MissingPeriodInstance { class: ClassId },

    #[error("Schedule invariant violated: {0}")]
    InvariantViolation(String),
}

pub type TrialResult<T> = std::result::Result<T, TrialError>;
