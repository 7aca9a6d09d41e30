use crate::config::{GradingConfig, DEGREE_SCALE};
use crate::models::{AggregateStatistics, ExamRecord, ExamStatus, StatusCounts};

/// Credits of every passed exam, whether or not its grade is recorded yet.
pub fn total_earned_credits(exams: &[ExamRecord]) -> u32 {
    exams
        .iter()
        .filter(|exam| exam.status == ExamStatus::Passed)
        .map(|exam| exam.credits)
        .sum()
}

pub fn remaining_credits(exams: &[ExamRecord], total_required: u32) -> u32 {
    total_required.saturating_sub(total_earned_credits(exams))
}

pub fn simple_average(exams: &[ExamRecord]) -> f64 {
    let grades: Vec<f64> = exams.iter().filter_map(ExamRecord::counted_grade).collect();

    if grades.is_empty() {
        return 0.0;
    }

    grades.iter().sum::<f64>() / grades.len() as f64
}

pub fn weighted_average(exams: &[ExamRecord]) -> f64 {
    let (weighted_sum, credits) = graded_totals(exams);

    if credits == 0 {
        return 0.0;
    }

    weighted_sum / credits as f64
}

/// Σ(grade × credits) and Σ credits over passed exams with a grade.
pub(crate) fn graded_totals(exams: &[ExamRecord]) -> (f64, u32) {
    exams
        .iter()
        .filter_map(|exam| exam.counted_grade().map(|grade| (grade, exam.credits)))
        .fold((0.0, 0), |(sum, credits), (grade, exam_credits)| {
            (sum + grade * exam_credits as f64, credits + exam_credits)
        })
}

pub fn convert_to_scale(grade: f64, source_max: u32, target_scale: f64) -> f64 {
    grade / source_max as f64 * target_scale
}

pub fn to_110(grade: f64, max_grade: u32) -> f64 {
    convert_to_scale(grade, max_grade, DEGREE_SCALE)
}

/// Inverse of [`to_110`]: a 110-scale average expressed in native grades.
pub fn from_110(average_110: f64, max_grade: u32) -> f64 {
    average_110 / DEGREE_SCALE * max_grade as f64
}

/// Share of the program completed, in percent.
///
/// Returns 0.0 when `total_required` is zero. Values above 100 are kept.
pub fn progress_percentage(earned_credits: u32, total_required: u32) -> f64 {
    if total_required == 0 {
        return 0.0;
    }
    earned_credits as f64 / total_required as f64 * 100.0
}

pub fn status_counts(exams: &[ExamRecord]) -> StatusCounts {
    exams
        .iter()
        .fold(StatusCounts::default(), |mut counts, exam| {
            match exam.status {
                ExamStatus::Passed => counts.passed += 1,
                ExamStatus::Failed => counts.failed += 1,
                ExamStatus::Planned => counts.planned += 1,
            }
            counts
        })
}

impl AggregateStatistics {
    pub fn compute(exams: &[ExamRecord], config: &GradingConfig) -> Self {
        let earned_credits = total_earned_credits(exams);
        let simple_average = simple_average(exams);
        let weighted_average = weighted_average(exams);

        let stats = Self {
            earned_credits,
            remaining_credits: config.total_credits.saturating_sub(earned_credits),
            simple_average,
            weighted_average,
            simple_average_110: to_110(simple_average, config.max_grade),
            weighted_average_110: to_110(weighted_average, config.max_grade),
            progress_percentage: progress_percentage(earned_credits, config.total_credits),
            counts: status_counts(exams),
        };
        tracing::debug!(exams = exams.len(), ?stats, "computed aggregate statistics");
        stats
    }
}
