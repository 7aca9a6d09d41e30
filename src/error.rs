//! Error types for configuration and input records.
//!
//! The statistics and solver functions never fail; these errors surface only
//! where settings or exam snapshots enter the crate.

use thiserror::Error;

use crate::models::ExamStatus;

/// Grading settings that the engine refuses to work with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max grade must be positive")]
    ZeroMaxGrade,

    #[error("pass threshold must be positive")]
    ZeroPassThreshold,

    #[error("pass threshold {threshold} exceeds max grade {max_grade}")]
    ThresholdAboveMax { threshold: u32, max_grade: u32 },

    #[error("target average {0} is outside the 110 scale")]
    TargetOutOfRange(f64),
}

/// Malformed exam rows or grade pins.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("exam '{name}' has zero credits")]
    ZeroCredits { name: String },

    #[error("exam '{name}' has an invalid grade '{value}'")]
    InvalidGrade { name: String, value: String },

    #[error("exam '{name}' has grade {grade} above the maximum of {max_grade}")]
    GradeAboveMax {
        name: String,
        grade: f64,
        max_grade: u32,
    },

    #[error("exam '{name}' is {status}, only planned exams can be pinned")]
    PinNotPlanned { name: String, status: ExamStatus },

    #[error("invalid exam id '{0}'")]
    InvalidId(String),

    #[error("grade pin '{0}' must look like <id>=<grade>")]
    MalformedPin(String),

    #[error("grade pin for {id} has an invalid grade '{value}'")]
    InvalidPinGrade { id: String, value: String },

    #[error("duplicate exam id {0}")]
    DuplicateId(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
