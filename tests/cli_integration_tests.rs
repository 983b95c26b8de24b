//! CLI integration tests - run the rxplan binary end to end
//!
//! Skipped during coverage builds; the library paths are covered by the
//! other test files.

#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn rxplan() -> Command {
    let mut cmd = Command::cargo_bin("rxplan").unwrap();
    cmd.env_remove("RXPLAN_SHEET")
        .env_remove("RXPLAN_SPECTRA_DIR")
        .env_remove("RXPLAN_AMINE_MASS_UNIT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// One block, two amines, three reactions
fn write_planner(path: &Path) {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("Recipes").unwrap();

    ws.write_string(0, 0, "Experiment Block #").unwrap();
    ws.write_string(1, 0, "Amine").unwrap();
    ws.write_number(0, 1, 1.0).unwrap();

    for (col, name) in [(1u16, "Benzylamine"), (2u16, "Aniline")] {
        ws.write_string(1, col, name).unwrap();
        ws.write_number(3, col, 100.0).unwrap();
        ws.write_number(7, col, 50.0).unwrap();
        ws.write_string(13, col, "Benzaldehyde").unwrap();
        ws.write_number(15, col, 106.12).unwrap();
    }
    ws.write_string(28, 1, "Furfural").unwrap();
    ws.write_number(30, 1, 96.08).unwrap();

    ws.write_string(1, 3, "MeCN").unwrap();

    workbook.save(path).unwrap();
}

fn write_empty_planner(path: &Path) {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("Recipes").unwrap();
    ws.write_string(1, 0, "Amine").unwrap();
    ws.write_string(1, 1, "MeCN").unwrap();
    workbook.save(path).unwrap();
}

fn planner_in(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("planner.xlsx");
    write_planner(&path);
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    rxplan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_cli_version() {
    rxplan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_si_help_mentions_mass_unit() {
    rxplan()
        .args(["si", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--amine-mass-unit"))
        .stdout(predicate::str::contains("--spectra-dir"));
}

#[test]
fn test_invalid_mass_unit_rejected() {
    rxplan()
        .args(["si", "table.csv", "--amine-mass-unit", "kg"])
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// EXTRACT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_extract_writes_table() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);
    let output = dir.path().join("data").join("output").join("reactions.csv");

    rxplan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction Complete"))
        .stdout(predicate::str::contains("3 reactions"));

    let table = std::fs::read_to_string(&output).unwrap();
    let mut lines = table.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("Experiment_Block,Amine_Name,Amine_MW_g_mol"));
    assert_eq!(lines.count(), 3);
    assert!(table.contains("1,Aniline,100.0,50.0,"));
}

#[test]
fn test_extract_xlsx_output() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);
    let output = dir.path().join("reactions.xlsx");

    rxplan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn test_extract_empty_sheet_warns_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.xlsx");
    write_empty_planner(&input);
    let output = dir.path().join("reactions.csv");

    rxplan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No reactions were extracted"));

    assert!(!output.exists());
}

#[test]
fn test_extract_missing_workbook_fails() {
    let dir = TempDir::new().unwrap();

    rxplan()
        .arg("extract")
        .arg(dir.path().join("absent.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workbook not found"));
}

#[test]
fn test_extract_wrong_sheet_fails() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);

    rxplan()
        .arg("extract")
        .arg(&input)
        .args(["--sheet", "Plate"])
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sheet 'Plate' not found"));
}

#[test]
fn test_extract_sheet_from_env() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);

    rxplan()
        .env("RXPLAN_SHEET", "Plate")
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sheet 'Plate' not found"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SI AND RUN
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_si_from_extracted_table() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);
    let table = dir.path().join("reactions.csv");
    let document = dir.path().join("SI.docx");

    rxplan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&table)
        .assert()
        .success();

    rxplan()
        .arg("si")
        .arg(&table)
        .arg("-o")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("SI Document Complete"))
        .stdout(predicate::str::contains("Blocks:    1"))
        .stdout(predicate::str::contains("Reactions: 3"));

    assert!(document.exists());
}

#[test]
fn test_si_from_xlsx_table() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);
    let table = dir.path().join("reactions.xlsx");
    let document = dir.path().join("SI.docx");

    rxplan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&table)
        .assert()
        .success();

    rxplan()
        .arg("si")
        .arg(&table)
        .arg("-o")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reactions: 3"));

    assert!(document.exists());
}

#[test]
fn test_si_rejects_foreign_table() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("other.csv");
    std::fs::write(&table, "name,value\nx,1\n").unwrap();

    rxplan()
        .arg("si")
        .arg(&table)
        .arg("-o")
        .arg(dir.path().join("SI.docx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing columns"));
}

#[test]
fn test_run_writes_both_outputs() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);
    let out_dir = dir.path().join("output");

    rxplan()
        .arg("run")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("extracted_reaction_data.csv").exists());
    assert!(out_dir.join("SI_Stock_Solutions.docx").exists());
}

#[test]
fn test_run_empty_sheet_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.xlsx");
    write_empty_planner(&input);
    let out_dir = dir.path().join("output");

    rxplan()
        .arg("run")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No reactions were extracted"));

    assert!(!out_dir.exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_json() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);

    let output = rxplan()
        .arg("inspect")
        .arg(&input)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sheet"], "Recipes");
    assert_eq!(report["reactions"], 3);
    assert_eq!(report["scan"][0]["amine"], "Benzylamine");
    assert_eq!(report["scan"][0]["strides"], 2);
    assert_eq!(report["scan"][2]["verdict"], "solvent_marker");
}

#[test]
fn test_inspect_table() {
    let dir = TempDir::new().unwrap();
    let input = planner_in(&dir);

    rxplan()
        .arg("inspect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheets:   Recipes"))
        .stdout(predicate::str::contains("solvent/control"))
        .stdout(predicate::str::contains("Reactions:"));
}
