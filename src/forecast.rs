use chrono::{Duration, NaiveDate};

use crate::calculator::{remaining_credits, total_earned_credits};
use crate::models::{CompletionForecast, ExamRecord, ExamStatus, PaceScenario};

pub const DAYS_PER_MONTH: f64 = 30.44;
const MIN_MONTHLY_PACE: f64 = 0.1;

/// Extrapolate the completion date from the pace kept so far.
///
/// The study period starts at the earliest dated passed exam. Returns `None`
/// when no passed exam carries a date.
pub fn completion_forecast(
    exams: &[ExamRecord],
    total_required: u32,
    today: NaiveDate,
) -> Option<CompletionForecast> {
    let start = first_passed_date(exams)?;

    let study_days = (today - start).num_days().max(1);
    let study_months = study_days as f64 / DAYS_PER_MONTH;

    let earned = total_earned_credits(exams);
    let passed_count = count(exams, ExamStatus::Passed);
    let credits_per_month = match earned as f64 / study_months {
        pace if pace > 0.0 => pace,
        _ => MIN_MONTHLY_PACE,
    };
    let exams_per_month = passed_count as f64 / study_months;

    let credits_needed = remaining_credits(exams, total_required);
    let months_remaining = credits_needed as f64 / credits_per_month;

    Some(CompletionForecast {
        estimated_completion: months_from(today, months_remaining)?,
        months_remaining,
        credits_per_month,
        exams_per_month,
        credits_needed,
        exams_planned: count(exams, ExamStatus::Planned),
    })
}

/// Completion dates at one, two and three exams per month.
///
/// Like [`completion_forecast`], returns `None` when no passed exam carries a
/// date.
pub fn pace_scenarios(
    exams: &[ExamRecord],
    total_required: u32,
    today: NaiveDate,
) -> Option<Vec<PaceScenario>> {
    first_passed_date(exams)?;

    let credits_needed = remaining_credits(exams, total_required) as f64;
    let credits_per_exam = average_exam_credits(exams)?;

    let scenarios = (1..=3)
        .map(|exams_per_month| {
            let monthly = credits_per_exam * exams_per_month as f64;
            let months_remaining = if monthly > 0.0 {
                credits_needed / monthly
            } else {
                f64::INFINITY
            };
            PaceScenario {
                exams_per_month,
                months_remaining,
                estimated_completion: months_from(today, months_remaining),
            }
        })
        .collect();

    Some(scenarios)
}

fn first_passed_date(exams: &[ExamRecord]) -> Option<NaiveDate> {
    exams
        .iter()
        .filter(|exam| exam.status == ExamStatus::Passed)
        .filter_map(|exam| exam.date)
        .min()
}

/// Mean credits of planned exams, else of passed exams.
fn average_exam_credits(exams: &[ExamRecord]) -> Option<f64> {
    let mean_for = |status: ExamStatus| {
        let credits: Vec<u32> = exams
            .iter()
            .filter(|exam| exam.status == status)
            .map(|exam| exam.credits)
            .collect();
        if credits.is_empty() {
            None
        } else {
            Some(credits.iter().sum::<u32>() as f64 / credits.len() as f64)
        }
    };

    mean_for(ExamStatus::Planned).or_else(|| mean_for(ExamStatus::Passed))
}

fn count(exams: &[ExamRecord], status: ExamStatus) -> usize {
    exams.iter().filter(|exam| exam.status == status).count()
}

fn months_from(today: NaiveDate, months: f64) -> Option<NaiveDate> {
    if !months.is_finite() {
        return None;
    }
    let days = (months * DAYS_PER_MONTH) as i64;
    today.checked_add_signed(Duration::try_days(days)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn needs_a_dated_passed_exam() {
        let exams = vec![
            ExamRecord::passed("Analysis I", 9, 24.0),
            ExamRecord::planned("Algebra", 6).with_date(date(2026, 6, 1)),
        ];
        assert!(completion_forecast(&exams, 180, date(2026, 10, 1)).is_none());
    }

    #[test]
    fn extrapolates_from_pace() {
        let today = date(2026, 10, 1);
        let start = today - Duration::days(305);
        let exams = vec![
            ExamRecord::passed("Analysis I", 30, 24.0).with_date(start),
            ExamRecord::passed("Programming", 30, 28.0).with_date(today),
            ExamRecord::planned("Algebra", 6),
        ];

        let forecast = completion_forecast(&exams, 120, today).unwrap();
        let months = 305.0 / DAYS_PER_MONTH;
        assert!((forecast.credits_per_month - 60.0 / months).abs() < 1e-9);
        assert!((forecast.exams_per_month - 2.0 / months).abs() < 1e-9);
        assert_eq!(forecast.credits_needed, 60);
        assert_eq!(forecast.exams_planned, 1);
        assert!((forecast.months_remaining - months).abs() < 1e-9);
        let days_out = (forecast.estimated_completion - today).num_days();
        assert!((304..=305).contains(&days_out));
    }

    #[test]
    fn one_day_span_uses_real_pace() {
        let today = date(2026, 10, 1);
        let exams = vec![ExamRecord::passed("Analysis I", 6, 27.0).with_date(today - Duration::days(1))];

        let forecast = completion_forecast(&exams, 180, today).unwrap();
        assert!((forecast.credits_per_month - 6.0 * DAYS_PER_MONTH).abs() < 1e-9);
        assert!((forecast.exams_per_month - DAYS_PER_MONTH).abs() < 1e-9);
        assert!((forecast.months_remaining - 174.0 / (6.0 * DAYS_PER_MONTH)).abs() < 1e-9);
    }

    #[test]
    fn ungraded_pace_falls_back_to_minimum() {
        let today = date(2026, 10, 1);
        let exams = vec![
            ExamRecord::new("Seminar", 0, ExamStatus::Passed, Some(30.0)).with_date(date(2026, 1, 1)),
        ];
        let forecast = completion_forecast(&exams, 12, today).unwrap();
        assert_eq!(forecast.credits_per_month, MIN_MONTHLY_PACE);
        assert!((forecast.months_remaining - 120.0).abs() < 1e-9);
    }

    #[test]
    fn finished_program_completes_today() {
        let today = date(2026, 10, 1);
        let exams = vec![ExamRecord::passed("Everything", 180, 27.0).with_date(date(2024, 10, 1))];
        let forecast = completion_forecast(&exams, 180, today).unwrap();
        assert_eq!(forecast.credits_needed, 0);
        assert_eq!(forecast.estimated_completion, today);
    }

    #[test]
    fn scenarios_use_planned_credit_mean() {
        let today = date(2026, 10, 1);
        let exams = vec![
            ExamRecord::passed("Analysis I", 12, 24.0).with_date(date(2026, 2, 1)),
            ExamRecord::planned("Algebra", 6),
            ExamRecord::planned("Networks", 12),
        ];

        let scenarios = pace_scenarios(&exams, 48, today).unwrap();
        assert_eq!(scenarios.len(), 3);
        assert!((scenarios[0].months_remaining - 4.0).abs() < 1e-9);
        assert!((scenarios[1].months_remaining - 2.0).abs() < 1e-9);
        assert_eq!(scenarios[2].exams_per_month, 3);
        assert!(scenarios[0].estimated_completion.unwrap() > today);
    }

    #[test]
    fn scenarios_fall_back_to_passed_credit_mean() {
        let exams = vec![
            ExamRecord::passed("Analysis I", 6, 24.0).with_date(date(2026, 2, 1)),
            ExamRecord::passed("Programming", 12, 28.0),
        ];
        let scenarios = pace_scenarios(&exams, 36, date(2026, 10, 1)).unwrap();
        assert!((scenarios[0].months_remaining - 2.0).abs() < 1e-9);
    }

    #[test]
    fn scenarios_need_a_dated_passed_exam() {
        let exams = vec![
            ExamRecord::passed("Analysis I", 9, 24.0),
            ExamRecord::planned("Algebra", 6),
        ];
        assert!(pace_scenarios(&exams, 180, date(2026, 10, 1)).is_none());
        assert!(pace_scenarios(&[], 12, date(2026, 10, 1)).is_none());
    }
}
