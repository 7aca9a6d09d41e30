use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};

use exam_tracker::config::GradingConfig;
use exam_tracker::models::{AggregateStatistics, ExamRecord, ExamStatus};
use exam_tracker::target::TargetPlan;
use exam_tracker::{forecast, records, report};

#[derive(Parser)]
#[command(name = "exam-tracker", version)]
#[command(about = "Grade statistics and target planning for your exams", long_about = None)]
struct Cli {
    #[command(flatten)]
    grading: GradingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GradingArgs {
    /// TOML file with grading settings
    #[arg(long, global = true, env = "EXAM_TRACKER_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    max_grade: Option<u32>,
    #[arg(long, global = true)]
    pass_threshold: Option<u32>,
    #[arg(long, global = true)]
    total_credits: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show credit totals, averages and progress
    Stats {
        #[arg(long)]
        exams: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Compute the grades planned exams need to reach a target average
    Target {
        #[arg(long)]
        exams: PathBuf,
        /// Target average on the 110 scale
        #[arg(long)]
        target: Option<f64>,
        /// Pin an exam grade as <id-or-name>=<grade>; repeatable
        #[arg(long = "fix")]
        fix: Vec<String>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Estimate the completion date from the current pace
    Forecast {
        #[arg(long)]
        exams: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        exams: PathBuf,
        /// Target average on the 110 scale
        #[arg(long)]
        target: Option<f64>,
        #[arg(long = "fix")]
        fix: Vec<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

impl GradingArgs {
    fn resolve(&self, target: Option<f64>) -> anyhow::Result<GradingConfig> {
        let mut config = GradingConfig::load_or_default(self.config.as_deref())?;

        if let Some(value) = self.max_grade {
            config.max_grade = value;
        }
        if let Some(value) = self.pass_threshold {
            config.pass_threshold = value;
        }
        if let Some(value) = self.total_credits {
            config.total_credits = value;
        }
        if let Some(value) = target {
            config.target_average = value;
        }

        config.validate().context("invalid grading settings")?;
        Ok(config)
    }
}

fn load_exams(path: &Path, config: &GradingConfig) -> anyhow::Result<Vec<ExamRecord>> {
    let exams = records::load_exams(path)
        .with_context(|| format!("failed to read exams from {}", path.display()))?;
    records::check_grade_range(&exams, config.max_grade)
        .with_context(|| format!("invalid grades in {}", path.display()))?;
    Ok(exams)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exam_tracker=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { exams, format } => {
            let config = cli.grading.resolve(None)?;
            let exams = load_exams(&exams, &config)?;
            let stats = AggregateStatistics::compute(&exams, &config);

            match format {
                Format::Json => print_json(&stats)?,
                Format::Text => {
                    println!(
                        "Credits: {} / {} ({:.1}%)",
                        stats.earned_credits, config.total_credits, stats.progress_percentage
                    );
                    println!("Remaining credits: {}", stats.remaining_credits);
                    println!(
                        "Exams: {} passed, {} failed, {} planned",
                        stats.counts.passed, stats.counts.failed, stats.counts.planned
                    );
                    println!(
                        "Simple average: {:.2} ({:.2}/110)",
                        stats.simple_average, stats.simple_average_110
                    );
                    println!(
                        "Weighted average: {:.2} ({:.2}/110)",
                        stats.weighted_average, stats.weighted_average_110
                    );
                }
            }
        }
        Commands::Target {
            exams,
            target,
            fix,
            format,
        } => {
            let config = cli.grading.resolve(target)?;
            let exams = load_exams(&exams, &config)?;
            let fixed = records::parse_pins(&fix, &exams)?;
            let plan = TargetPlan::solve(&exams, &config, fixed);

            if let Format::Json = format {
                print_json(&plan)?;
                return Ok(());
            }

            if plan.grades.is_empty() {
                println!("No planned exams to calculate required grades for.");
                return Ok(());
            }

            println!(
                "Target {:.0}/110 needs a weighted average of {:.2}/{}:",
                plan.target_110, plan.target_native, config.max_grade
            );
            for exam in exams.iter().filter(|exam| exam.status == ExamStatus::Planned) {
                if let Some(grade) = plan.grades.get(&exam.id) {
                    let marker = if plan.is_pinned(&exam.id) { " (pinned)" } else { "" };
                    println!("- {} ({} credits): {:.2}{}", exam.name, exam.credits, grade, marker);
                }
            }
            println!("Projected final average: {:.2}/110", plan.projected.scaled);
            if !plan.reachable {
                tracing::warn!(
                    requested = plan.target_110,
                    projected = plan.projected.scaled,
                    "target average is out of reach"
                );
                println!("Target not reachable within the grading scale.");
            }
        }
        Commands::Forecast { exams, format } => {
            let config = cli.grading.resolve(None)?;
            let exams = load_exams(&exams, &config)?;
            let today = Utc::now().date_naive();
            let prediction = forecast::completion_forecast(&exams, config.total_credits, today);
            let scenarios = forecast::pace_scenarios(&exams, config.total_credits, today);

            if let Format::Json = format {
                print_json(&serde_json::json!({
                    "forecast": prediction,
                    "scenarios": scenarios,
                }))?;
                return Ok(());
            }

            match prediction {
                Some(prediction) => println!(
                    "Estimated completion {} ({:.1} months at {:.1} credits/month, {} credits left)",
                    prediction.estimated_completion,
                    prediction.months_remaining,
                    prediction.credits_per_month,
                    prediction.credits_needed
                ),
                None => println!("No dated passed exams to measure pace from."),
            }
            for scenario in scenarios.into_iter().flatten() {
                let eta = scenario
                    .estimated_completion
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "- {} exams/month: {} ({:.1} months)",
                    scenario.exams_per_month, eta, scenario.months_remaining
                );
            }
        }
        Commands::Report {
            exams,
            target,
            fix,
            out,
        } => {
            let config = cli.grading.resolve(target)?;
            let exams = load_exams(&exams, &config)?;
            let fixed = records::parse_pins(&fix, &exams)?;
            let plan = TargetPlan::solve(&exams, &config, fixed);
            let report = report::build_report(&exams, &config, &plan, Utc::now().date_naive());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
