use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::GradingConfig;
use crate::forecast;
use crate::models::{AggregateStatistics, ExamRecord, ExamStatus};
use crate::target::TargetPlan;

pub fn build_report(
    exams: &[ExamRecord],
    config: &GradingConfig,
    plan: &TargetPlan,
    today: NaiveDate,
) -> String {
    let stats = AggregateStatistics::compute(exams, config);
    let mut output = String::new();

    let _ = writeln!(output, "# Academic Progress Report");
    let _ = writeln!(
        output,
        "Generated on {} (grades out of {}, pass at {})",
        today, config.max_grade, config.pass_threshold
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Progress");
    let _ = writeln!(
        output,
        "- Credits: {} of {} ({:.1}%), {} remaining",
        stats.earned_credits,
        config.total_credits,
        stats.progress_percentage,
        stats.remaining_credits
    );
    let _ = writeln!(
        output,
        "- Exams: {} passed, {} failed, {} planned",
        stats.counts.passed, stats.counts.failed, stats.counts.planned
    );
    let _ = writeln!(
        output,
        "- Simple average: {:.2}/{} ({:.2}/110)",
        stats.simple_average, config.max_grade, stats.simple_average_110
    );
    let _ = writeln!(
        output,
        "- Weighted average: {:.2}/{} ({:.2}/110)",
        stats.weighted_average, config.max_grade, stats.weighted_average_110
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Target {:.0}/110", plan.target_110);

    let planned: Vec<&ExamRecord> = exams
        .iter()
        .filter(|exam| exam.status == ExamStatus::Planned)
        .collect();

    if planned.is_empty() {
        let _ = writeln!(output, "No planned exams to calculate required grades for.");
    } else {
        let _ = writeln!(
            output,
            "Required weighted average on remaining exams to reach {:.2}/{}:",
            plan.target_native, config.max_grade
        );
        for exam in planned {
            if let Some(grade) = plan.grades.get(&exam.id) {
                let marker = if plan.is_pinned(&exam.id) { " (pinned)" } else { "" };
                let _ = writeln!(
                    output,
                    "- {} ({} credits): {:.2}{}",
                    exam.name, exam.credits, grade, marker
                );
            }
        }
        let _ = writeln!(
            output,
            "Projected final average: {:.2}/110",
            plan.projected.scaled
        );
        if !plan.reachable {
            let _ = writeln!(
                output,
                "Target not reachable within the grading scale."
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Completion Forecast");

    match forecast::completion_forecast(exams, config.total_credits, today) {
        Some(prediction) => {
            let _ = writeln!(
                output,
                "- At {:.1} credits per month: {} ({:.1} months)",
                prediction.credits_per_month,
                prediction.estimated_completion,
                prediction.months_remaining
            );
            for scenario in forecast::pace_scenarios(exams, config.total_credits, today)
                .into_iter()
                .flatten()
            {
                let eta = scenario
                    .estimated_completion
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "never".to_string());
                let _ = writeln!(
                    output,
                    "- At {} exams per month: {} ({:.1} months)",
                    scenario.exams_per_month, eta, scenario.months_remaining
                );
            }
        }
        None => {
            let _ = writeln!(output, "No dated passed exams to measure pace from.");
        }
    }

    let mut recent: Vec<&ExamRecord> = exams
        .iter()
        .filter(|exam| exam.status == ExamStatus::Passed && exam.date.is_some())
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Exams");

    if recent.is_empty() {
        let _ = writeln!(output, "No dated exams recorded.");
    } else {
        for exam in recent.iter().take(5) {
            let grade = exam
                .grade
                .map(|grade| format!("{grade:.0}"))
                .unwrap_or_else(|| "grade pending".to_string());
            let _ = writeln!(
                output,
                "- {} on {}: {}",
                exam.name,
                exam.date.map(|date| date.to_string()).unwrap_or_default(),
                grade
            );
        }
    }

    output
}
