//! Required grades for planned exams.
//!
//! The solver works in closed form: the burden left after passed and pinned
//! exams is spread evenly per credit across the free planned exams, then
//! clamped into `[pass_threshold, max_grade]`. A clamp makes the target
//! unreachable, which [`TargetPlan`] reports by re-projecting the average from
//! the assigned grades instead of trusting the request.

use serde::Serialize;

use crate::calculator::{graded_totals, to_110};
use crate::config::GradingConfig;
use crate::models::{
    ExamId, ExamRecord, ExamStatus, FixedGrades, ProjectedAverage, RequiredGrades,
};

const REACHED_TOLERANCE: f64 = 1e-9;

/// Grade every planned exam needs so the credit-weighted average over passed
/// and planned exams lands on `target_native`.
///
/// Pinned exams in `fixed` keep their grade verbatim; pins for ids that are
/// not in `planned_exams` are ignored. Every remaining exam receives the same
/// clamped grade.
pub fn required_grades_for_target(
    all_exams: &[ExamRecord],
    planned_exams: &[ExamRecord],
    target_native: f64,
    config: &GradingConfig,
    fixed: &FixedGrades,
) -> RequiredGrades {
    let mut required = RequiredGrades::new();

    if planned_exams.is_empty() {
        return required;
    }

    let (passed_sum, passed_credits) = graded_totals(all_exams);
    let planned_credits: u32 = planned_exams.iter().map(|exam| exam.credits).sum();
    let total_credits = passed_credits + planned_credits;

    let mut remaining_sum = target_native * total_credits as f64 - passed_sum;
    let mut free_credits = planned_credits;
    let mut free_exams = Vec::new();

    for exam in planned_exams {
        match fixed.get(&exam.id) {
            Some(&grade) => {
                required.insert(exam.id, grade);
                remaining_sum -= grade * exam.credits as f64;
                free_credits -= exam.credits;
            }
            None => free_exams.push(exam.id),
        }
    }

    if free_credits > 0 {
        let per_credit = remaining_sum / free_credits as f64;
        let floor = config.pass_threshold as f64;
        let ceiling = config.max_grade as f64;
        let grade = per_credit.max(floor).min(ceiling);

        if grade != per_credit {
            tracing::debug!(
                unclamped = per_credit,
                assigned = grade,
                "required grade clamped, target not reachable"
            );
        }

        for id in free_exams {
            required.insert(id, grade);
        }
    }

    required
}

/// Weighted average obtained by treating `grades` as the results of the
/// planned exams. Planned exams without an entry in `grades` are skipped.
pub fn projected_average(
    all_exams: &[ExamRecord],
    planned_exams: &[ExamRecord],
    grades: &RequiredGrades,
    config: &GradingConfig,
) -> ProjectedAverage {
    let (passed_sum, passed_credits) = graded_totals(all_exams);
    let (planned_sum, planned_credits) = planned_exams
        .iter()
        .filter_map(|exam| grades.get(&exam.id).map(|grade| (*grade, exam.credits)))
        .fold((0.0, 0), |(sum, credits), (grade, exam_credits)| {
            (sum + grade * exam_credits as f64, credits + exam_credits)
        });

    let credits = passed_credits + planned_credits;
    let native = if credits == 0 {
        0.0
    } else {
        (passed_sum + planned_sum) / credits as f64
    };

    ProjectedAverage {
        native,
        scaled: to_110(native, config.max_grade),
    }
}

/// A solved target together with the average it actually produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPlan {
    pub target_110: f64,
    pub target_native: f64,
    pub fixed: FixedGrades,
    pub grades: RequiredGrades,
    pub projected: ProjectedAverage,
    pub reachable: bool,
}

impl TargetPlan {
    /// Solve for the configured target using every planned exam in `exams`.
    pub fn solve(exams: &[ExamRecord], config: &GradingConfig, fixed: FixedGrades) -> Self {
        let planned = planned_exams(exams);
        let target_native = config.target_native();
        let grades = required_grades_for_target(exams, &planned, target_native, config, &fixed);
        let projected = projected_average(exams, &planned, &grades, config);
        let reachable =
            planned.is_empty() || (projected.native - target_native).abs() < REACHED_TOLERANCE;

        tracing::debug!(
            planned = planned.len(),
            pinned = fixed.len(),
            target_native,
            projected = projected.native,
            reachable,
            "solved target plan"
        );

        Self {
            target_110: config.target_average,
            target_native,
            fixed,
            grades,
            projected,
            reachable,
        }
    }

    /// Re-solve with one more exam pinned to `grade`, keeping earlier pins.
    pub fn pin(
        &self,
        exams: &[ExamRecord],
        config: &GradingConfig,
        exam_id: ExamId,
        grade: f64,
    ) -> Self {
        let mut fixed = self.fixed.clone();
        fixed.insert(exam_id, grade);
        Self::solve(exams, config, fixed)
    }

    pub fn is_pinned(&self, exam_id: &ExamId) -> bool {
        self.fixed.contains_key(exam_id)
    }
}

fn planned_exams(exams: &[ExamRecord]) -> Vec<ExamRecord> {
    exams
        .iter()
        .filter(|exam| exam.status == ExamStatus::Planned)
        .cloned()
        .collect()
}
