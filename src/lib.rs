//! Grade statistics and target-grade planning for a personal exam tracker.
//!
//! Everything here is a pure function of an exam snapshot and a
//! [`GradingConfig`]; results are recomputed on every call.

pub mod calculator;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod records;
pub mod report;
pub mod target;

pub use config::GradingConfig;
pub use models::{AggregateStatistics, ExamId, ExamRecord, ExamStatus, FixedGrades, RequiredGrades};
pub use target::{required_grades_for_target, TargetPlan};
