use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::RecordError;
use crate::models::{ExamId, ExamRecord, ExamStatus, FixedGrades};

pub fn load_exams(csv_path: &Path) -> Result<Vec<ExamRecord>, RecordError> {
    let reader = csv::Reader::from_path(csv_path)?;
    let exams = read_rows(reader)?;
    tracing::info!(count = exams.len(), path = %csv_path.display(), "loaded exam records");
    Ok(exams)
}

pub fn read_exams<R: Read>(input: R) -> Result<Vec<ExamRecord>, RecordError> {
    read_rows(csv::Reader::from_reader(input))
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<ExamRecord>, RecordError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<String>,
        name: String,
        credits: u32,
        status: ExamStatus,
        grade: Option<f64>,
        date: Option<NaiveDate>,
        notes: Option<String>,
    }

    let mut exams = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        if row.credits == 0 {
            return Err(RecordError::ZeroCredits { name: row.name });
        }

        let id = match row.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<ExamId>()
                .map_err(|_| RecordError::InvalidId(raw.to_string()))?,
            _ => ExamId::new(),
        };

        if !seen.insert(id) {
            return Err(RecordError::DuplicateId(id.to_string()));
        }

        if let Some(grade) = row.grade {
            if !grade.is_finite() || grade < 0.0 {
                return Err(RecordError::InvalidGrade {
                    name: row.name,
                    value: grade.to_string(),
                });
            }
        }

        if row.status == ExamStatus::Passed && row.grade.is_none() {
            tracing::debug!(exam = %row.name, "passed exam has no grade yet");
        }

        exams.push(ExamRecord {
            id,
            name: row.name,
            credits: row.credits,
            status: row.status,
            grade: row.grade,
            date: row.date,
            notes: row.notes.filter(|note| !note.is_empty()),
        });
    }

    Ok(exams)
}

/// Reject recorded grades above the top of the grading scale.
pub fn check_grade_range(exams: &[ExamRecord], max_grade: u32) -> Result<(), RecordError> {
    match exams
        .iter()
        .find(|exam| exam.grade.is_some_and(|grade| grade > max_grade as f64))
    {
        Some(exam) => Err(RecordError::GradeAboveMax {
            name: exam.name.clone(),
            grade: exam.grade.unwrap_or_default(),
            max_grade,
        }),
        None => Ok(()),
    }
}

/// Parse `<exam>=<grade>` pins, where `<exam>` is an exam id or its exact
/// name. Only planned exams can be pinned.
pub fn parse_pins(pins: &[String], exams: &[ExamRecord]) -> Result<FixedGrades, RecordError> {
    let mut fixed = FixedGrades::new();

    for pin in pins {
        let (key, value) = pin
            .split_once('=')
            .ok_or_else(|| RecordError::MalformedPin(pin.clone()))?;
        let key = key.trim();

        let exam = match key.parse::<ExamId>() {
            Ok(id) => exams.iter().find(|exam| exam.id == id),
            Err(_) => exams.iter().find(|exam| exam.name == key),
        }
        .ok_or_else(|| RecordError::InvalidId(key.to_string()))?;

        if exam.status != ExamStatus::Planned {
            return Err(RecordError::PinNotPlanned {
                name: exam.name.clone(),
                status: exam.status,
            });
        }

        let grade = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|grade| grade.is_finite())
            .ok_or_else(|| RecordError::InvalidPinGrade {
                id: key.to_string(),
                value: value.to_string(),
            })?;

        fixed.insert(exam.id, grade);
    }

    Ok(fixed)
}
