//! Integration tests for the cooper binary.
//!
//! These tests verify end-to-end behavior including:
//! - Roster management
//! - Evaluation metrics output and validation messages
//! - Test recording, history and prefill from the previous test
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cooper"));
    cmd.arg("--data-dir").arg(data_dir).arg("--locale").arg("pt-BR");
    cmd
}

fn add_student(data_dir: &Path, name: &str, birth_date: &str, gender: &str) {
    cli(data_dir)
        .args(["student", "add", "--name", name])
        .args(["--birth-date", birth_date, "--gender", gender])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added student"));
}

fn evaluate(data_dir: &Path, student: &str) -> Command {
    let mut cmd = cli(data_dir);
    cmd.args(["evaluate", "--student", student, "--date", "2025-06-01"]);
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("cooper"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cooper test performance evaluations"));
}

#[test]
fn test_student_add_and_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");
    add_student(data_dir, "Maria Alves", "1985-11-02", "feminino");

    assert!(data_dir.join("students.json").exists());

    cli(data_dir)
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[JP] João Pereira"))
        .stdout(predicate::str::contains("Maria Alves"))
        .stdout(predicate::str::contains("feminino"));
}

#[test]
fn test_toggle_hides_student_from_default_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "Rui Costa", "1970-01-15", "male");

    cli(data_dir)
        .args(["student", "toggle", "rui costa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inactive"));

    cli(data_dir)
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No students found"));

    cli(data_dir)
        .args(["student", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rui Costa"))
        .stdout(predicate::str::contains("[inactive]"));
}

#[test]
fn test_dry_run_shows_metrics_without_recording() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    evaluate(data_dir, "João Pereira")
        .args(["--distance", "2800", "--heart-rate", "180", "--weight", "70"])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("VO2 max:        51.3"))
        .stdout(predicate::str::contains("Muito Bom"))
        .stdout(predicate::str::contains("98-117 bpm"))
        .stdout(predicate::str::contains("1176 kcal"))
        .stdout(predicate::str::contains("3592 ml/min"))
        .stdout(predicate::str::contains("2.800 m in 12:00"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("tests.jsonl").exists());
}

#[test]
fn test_english_locale_labels() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    Command::new(assert_cmd::cargo::cargo_bin!("cooper"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--locale", "en"])
        .args(["evaluate", "--student", "João Pereira", "--date", "2025-06-01"])
        .args(["--distance", "2800", "--heart-rate", "180", "--weight", "70"])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Very Good"))
        .stdout(predicate::str::contains("Active Recovery"))
        .stdout(predicate::str::contains("2,800 m"));
}

#[test]
fn test_invalid_input_reports_fields_and_records_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    evaluate(data_dir, "João Pereira")
        .args(["--distance", "0", "--heart-rate", "250"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Distância deve ser maior que zero"))
        .stderr(predicate::str::contains(
            "Frequência cardíaca deve estar entre 40 e 220 bpm",
        ))
        .stderr(predicate::str::contains("Peso é obrigatório"))
        .stderr(predicate::str::contains("Duração").not());

    assert!(!data_dir.join("tests.jsonl").exists());
}

#[test]
fn test_unknown_student_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    evaluate(data_dir, "Ninguém")
        .args(["--distance", "2800", "--heart-rate", "180", "--weight", "70"])
        .assert()
        .failure();
}

#[test]
fn test_recorded_test_prefills_next_and_shows_in_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "Maria Alves", "1985-11-02", "feminino");

    evaluate(data_dir, "Maria Alves")
        .args(["--distance", "2300", "--heart-rate", "172", "--weight", "61.5"])
        .args(["--observations", "pista molhada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test recorded"));

    // weight and heart rate come from the previous test
    evaluate(data_dir, "Maria Alves")
        .args(["--distance", "2450"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test recorded"));

    let content = fs::read_to_string(data_dir.join("tests.jsonl")).expect("Failed to read tests");
    let records: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["weight"], 61.5);
    assert_eq!(records[1]["heart_rate"], 172.0);
    assert_eq!(records[1]["observations"], "pista molhada");
    assert_eq!(records[1]["test_type"], "performance");
    assert_eq!(records[1]["temperature"], 20.0);

    cli(data_dir)
        .args(["history", "--student", "Maria Alves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Avaliação de Performance"))
        .stdout(predicate::str::contains("2.450 m"))
        .stdout(predicate::str::contains("2.300 m"))
        .stdout(predicate::str::contains("pista molhada"));
}

#[test]
fn test_backdated_evaluation_keeps_its_date() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "Maria Alves", "1985-11-02", "feminino");

    cli(data_dir)
        .args(["evaluate", "--student", "Maria Alves", "--date", "2020-05-05"])
        .args(["--distance", "2300", "--heart-rate", "172", "--weight", "61"])
        .assert()
        .success();

    let content = fs::read_to_string(data_dir.join("tests.jsonl")).expect("Failed to read tests");
    let record: serde_json::Value =
        serde_json::from_str(content.trim()).expect("valid JSON line");
    let test_date = record["test_date"].as_str().expect("test_date string");
    assert!(test_date.starts_with("2020-05-05"), "got {}", test_date);

    cli(data_dir)
        .args(["history", "--student", "Maria Alves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2020-05-05"));
}

#[test]
fn test_fractional_heart_rate_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    evaluate(data_dir, "João Pereira")
        .args(["--distance", "2800", "--heart-rate", "150.5", "--weight", "70"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("número inteiro"));

    assert!(!data_dir.join("tests.jsonl").exists());
}

#[test]
fn test_grouped_distance_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    evaluate(data_dir, "João Pereira")
        .args(["--distance", "2.800", "--heart-rate", "180", "--weight", "70"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("separador"));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "Rui Costa", "1970-01-15", "male");

    cli(data_dir)
        .args(["history", "--student", "Rui Costa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tests recorded"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_student(data_dir, "João Pereira", "2000-03-10", "masculino");

    for distance in ["2600", "2800"] {
        evaluate(data_dir, "João Pereira")
            .args(["--distance", distance, "--heart-rate", "180", "--weight", "70"])
            .assert()
            .success();
    }

    cli(data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 tests"));

    let csv = fs::read_to_string(data_dir.join("tests.csv")).expect("Failed to read CSV");
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("id,student_id,test_type"));
    assert!(csv.contains("very_good"));

    // a second export replaces the file instead of appending to it
    cli(data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 tests"));

    let again = fs::read_to_string(data_dir.join("tests.csv")).expect("Failed to read CSV");
    assert_eq!(again.lines().count(), 3);
    assert_eq!(again, csv);
}

#[test]
fn test_export_without_tests() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to export"));

    assert!(!data_dir.join("tests.csv").exists());
}
