use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identity of an exam record.
///
/// Only equality and hashing are meaningful; ids are never ordered or shown
/// as anything but their raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(Uuid);

impl ExamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExamId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ExamId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ExamId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Passed,
    Failed,
    Planned,
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExamStatus::Passed => "passed",
            ExamStatus::Failed => "failed",
            ExamStatus::Planned => "planned",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: ExamId,
    pub name: String,
    pub credits: u32,
    pub status: ExamStatus,
    pub grade: Option<f64>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ExamRecord {
    pub fn passed(name: &str, credits: u32, grade: f64) -> Self {
        Self::new(name, credits, ExamStatus::Passed, Some(grade))
    }

    pub fn planned(name: &str, credits: u32) -> Self {
        Self::new(name, credits, ExamStatus::Planned, None)
    }

    pub fn new(name: &str, credits: u32, status: ExamStatus, grade: Option<f64>) -> Self {
        Self {
            id: ExamId::new(),
            name: name.to_string(),
            credits,
            status,
            grade,
            date: None,
            notes: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Grade of a passed exam, or `None` when the exam does not take part in
    /// averages (not passed, or passed before the grade was recorded).
    pub fn counted_grade(&self) -> Option<f64> {
        match self.status {
            ExamStatus::Passed => self.grade,
            _ => None,
        }
    }
}

/// User-pinned grades for planned exams.
pub type FixedGrades = HashMap<ExamId, f64>;

/// Grade each planned exam needs, keyed by exam id.
pub type RequiredGrades = HashMap<ExamId, f64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub planned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub earned_credits: u32,
    pub remaining_credits: u32,
    pub simple_average: f64,
    pub weighted_average: f64,
    pub simple_average_110: f64,
    pub weighted_average_110: f64,
    pub progress_percentage: f64,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedAverage {
    pub native: f64,
    pub scaled: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionForecast {
    pub estimated_completion: NaiveDate,
    pub months_remaining: f64,
    pub credits_per_month: f64,
    pub exams_per_month: f64,
    pub credits_needed: u32,
    pub exams_planned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceScenario {
    pub exams_per_month: u32,
    pub months_remaining: f64,
    pub estimated_completion: Option<NaiveDate>,
}
