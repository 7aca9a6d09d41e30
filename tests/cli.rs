//! CLI integration tests using assert_cmd.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXAMS: &str = "\
id,name,credits,status,grade,date,notes
,Databases,6,passed,28,2026-01-15,
,Physics,6,passed,,,grade pending
,Chemistry,6,failed,,2026-02-01,
,Networks,9,planned,,,
,Compilers,6,planned,,,
";

fn tracker() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("exam-tracker").unwrap();
    cmd.env_remove("EXAM_TRACKER_CONFIG");
    cmd
}

fn write_exams(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("exams.csv");
    fs::write(&path, EXAMS).unwrap();
    path
}

#[test]
fn stats_prints_credits_and_averages() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .arg("stats")
        .arg("--exams")
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("Credits: 12 / 180 (6.7%)"))
        .stdout(predicate::str::contains("Weighted average: 28.00"))
        .stdout(predicate::str::contains("2 passed, 1 failed, 2 planned"));
}

#[test]
fn stats_json_reports_progress() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    let output = tracker()
        .args(["stats", "--format", "json", "--total-credits", "24", "--exams"])
        .arg(&exams)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["earned_credits"], 12);
    assert_eq!(stats["progress_percentage"], 50.0);
}

#[test]
fn target_spreads_required_grade() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["target", "--target", "99", "--exams"])
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("- Networks (9 credits): 26.60"))
        .stdout(predicate::str::contains("- Compilers (6 credits): 26.60"))
        .stdout(predicate::str::contains("Projected final average: 99.00/110"));
}

#[test]
fn target_honours_pins() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["target", "--target", "99", "--fix", "Networks=30", "--exams"])
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("- Networks (9 credits): 30.00 (pinned)"))
        .stdout(predicate::str::contains("- Compilers (6 credits): 21.50"));
}

#[test]
fn target_flags_unreachable_average() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["target", "--target", "110", "--exams"])
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("Target not reachable"));
}

#[test]
fn config_file_sets_grading_scale() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);
    let config = dir.path().join("grading.toml");
    fs::write(&config, "total_credits = 12\n").unwrap();

    tracker()
        .arg("stats")
        .arg("--config")
        .arg(&config)
        .arg("--exams")
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("Credits: 12 / 12 (100.0%)"));
}

#[test]
fn threshold_above_max_fails_fast() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["stats", "--pass-threshold", "31", "--exams"])
        .arg(&exams)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grading settings"));
}

#[test]
fn missing_exam_file_fails() {
    tracker()
        .args(["stats", "--exams", "/nonexistent/exams.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read exams"));
}

#[test]
fn report_writes_markdown() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);
    let out = dir.path().join("report.md");

    tracker()
        .arg("report")
        .arg("--exams")
        .arg(&exams)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let report = fs::read_to_string(&out).unwrap();
    assert!(report.contains("# Academic Progress Report"));
    assert!(report.contains("## Target 100/110"));
}

#[test]
fn forecast_lists_pace_scenarios() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .arg("forecast")
        .arg("--exams")
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated completion"))
        .stdout(predicate::str::contains("3 exams/month"));
}

#[test]
fn forecast_without_dates_skips_scenarios() {
    let dir = TempDir::new().unwrap();
    let exams = dir.path().join("undated.csv");
    fs::write(
        &exams,
        "id,name,credits,status,grade,date,notes\n,Databases,6,passed,28,,\n,Networks,9,planned,,,\n",
    )
    .unwrap();

    tracker()
        .arg("forecast")
        .arg("--exams")
        .arg(&exams)
        .assert()
        .success()
        .stdout(predicate::str::contains("No dated passed exams"))
        .stdout(predicate::str::contains("exams/month").not());
}

#[test]
fn report_accepts_target_override() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);
    let out = dir.path().join("report.md");

    tracker()
        .args(["report", "--target", "99", "--out"])
        .arg(&out)
        .arg("--exams")
        .arg(&exams)
        .assert()
        .success();

    let report = fs::read_to_string(&out).unwrap();
    assert!(report.contains("## Target 99/110"));
    assert!(report.contains("- Networks (9 credits): 26.60"));
}

#[test]
fn pin_on_passed_exam_is_rejected() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["target", "--fix", "Databases=25", "--exams"])
        .arg(&exams)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only planned exams can be pinned"));
}

#[test]
fn nan_grade_row_is_rejected() {
    let dir = TempDir::new().unwrap();
    let exams = dir.path().join("nan.csv");
    fs::write(
        &exams,
        "id,name,credits,status,grade,date,notes\n,Databases,6,passed,NaN,,\n",
    )
    .unwrap();

    tracker()
        .arg("stats")
        .arg("--exams")
        .arg(&exams)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grade"));
}

#[test]
fn grade_above_scale_is_rejected() {
    let dir = TempDir::new().unwrap();
    let exams = write_exams(&dir);

    tracker()
        .args(["stats", "--max-grade", "25", "--pass-threshold", "15", "--exams"])
        .arg(&exams)
        .assert()
        .failure()
        .stderr(predicate::str::contains("above the maximum of 25"));
}
