// Integration tests for the qccheck command-line contract: exit codes,
// --json stdout shape, and report files.
//
// Run with: cargo test -p qccheck-cli --test cli_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

const TRAVELER_TXT: &str = "\
PRODUCTION TRAVELER
Job: 12345
Assembly: PCA-1234-A  Rev F
Seq 20  Install board VGN-54321-1234 into unit INF-4321
Seq 30  Final inspection
";

const IMAGE_JSON: &str = r#"{"board_serials": ["54321_1234"], "unit_serials": ["4321"], "flight_status": "FLIGHT"}"#;

const BOM_JSON: &str = r#"{"job_numbers": ["12345"], "part_numbers": ["PCA-1234-A"], "revisions": ["F"]}"#;

const BOM_WRONG_JOB_JSON: &str = r#"{"job_numbers": ["99999"], "part_numbers": ["PCA-1234-A"], "revisions": ["F"]}"#;

fn qccheck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qccheck"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn run_args(args: &[&str]) -> Output {
    qccheck().args(args).output().expect("qccheck")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn document_block(id: &str, role: &str, file: &str, format: &str) -> String {
    format!("\n[[documents]]\nid = \"{id}\"\nrole = \"{role}\"\nfile = \"{file}\"\nformat = \"{format}\"\n")
}

/// Write the three documents plus a config listing `documents` into `dir`.
fn write_run(dir: &Path, bom_json: &str, documents: &[(&str, &str, &str, &str)]) -> String {
    std::fs::write(dir.join("traveler.txt"), TRAVELER_TXT).unwrap();
    std::fs::write(dir.join("image.json"), IMAGE_JSON).unwrap();
    std::fs::write(dir.join("bom.json"), bom_json).unwrap();

    let mut config = String::from("name = \"Job 12345\"\n");
    for (id, role, file, format) in documents {
        config.push_str(&document_block(id, role, file, format));
    }
    let path = dir.join("job.qc.toml");
    std::fs::write(&path, config).unwrap();
    path.to_str().unwrap().to_string()
}

const ALL_DOCS: [(&str, &str, &str, &str); 3] = [
    ("traveler", "traveler", "traveler.txt", "text"),
    ("photo", "image", "image.json", "fields"),
    ("bom", "bom", "bom.json", "fields"),
];

// ===========================================================================
// qccheck run
// ===========================================================================

#[test]
fn run_pass_exits_zero_with_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), BOM_JSON, &ALL_DOCS);

    let output = run_args(&["run", &config, "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["verdict"], "pass");
    assert_eq!(report["meta"]["config_name"], "Job 12345");
    assert_eq!(report["summary"]["failed"], 0);
    assert!(report["results"].as_array().unwrap().len() >= 7);
    assert!(stderr(&output).contains("verdict pass"));
}

#[test]
fn run_fail_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), BOM_WRONG_JOB_JSON, &ALL_DOCS);

    let output = run_args(&["run", &config]);
    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Job number mismatch"));
    assert!(output.stdout.is_empty());
}

#[test]
fn run_warning_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), BOM_JSON, &[ALL_DOCS[0], ALL_DOCS[2]]);

    let output = run_args(&["run", &config]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Product Image"));
}

#[test]
fn run_writes_report_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), BOM_JSON, &ALL_DOCS);
    let json_path = dir.path().join("report.json");
    let csv_path = dir.path().join("findings.csv");

    let output = run_args(&[
        "run",
        &config,
        "--output",
        json_path.to_str().unwrap(),
        "--csv",
        csv_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(report["verdict"], "pass");

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("category,status,description,expected_value,actual_value,details,source_documents")
    );
    assert!(lines.next().unwrap().starts_with("job_number,pass,"));
}

#[test]
fn run_rejects_second_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut docs = ALL_DOCS.to_vec();
    docs.push(("photo-2", "image", "image.json", "fields"));
    let config = write_run(dir.path(), BOM_JSON, &docs);

    let output = run_args(&["run", &config]);
    assert_eq!(output.status.code(), Some(5));
    let err = stderr(&output);
    assert!(err.contains("error:"));
    assert!(err.contains("'photo' and 'photo-2'"));
    assert!(err.contains("hint:"));
}

#[test]
fn run_missing_document_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut docs = ALL_DOCS.to_vec();
    docs.push(("bom-2", "bom", "missing.json", "fields"));
    let config = write_run(dir.path(), BOM_JSON, &docs);

    let output = run_args(&["run", &config]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("missing.json"));
}

#[test]
fn run_malformed_field_bag_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), "{ not json", &ALL_DOCS);

    let output = run_args(&["run", &config]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("document 'bom'"));
}

// ===========================================================================
// qccheck validate
// ===========================================================================

#[test]
fn validate_lists_documents() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_run(dir.path(), BOM_JSON, &ALL_DOCS);

    let output = run_args(&["validate", &config]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("valid: \"Job 12345\" (3 documents"));
    assert!(err.contains("bill_of_materials"));
}

#[test]
fn validate_rejects_bad_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.qc.toml");
    std::fs::write(&path, "name = \"x\"\n[matching]\nfuzzy_threshold = 3.0\n").unwrap();

    let output = run_args(&["validate", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("fuzzy_threshold"));
}

// ===========================================================================
// Field utilities
// ===========================================================================

#[test]
fn extract_traveler_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("traveler.txt");
    std::fs::write(&path, TRAVELER_TXT).unwrap();

    let output = run_args(&["extract", path.to_str().unwrap(), "--role", "traveler"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let fields: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(fields["job_numbers"], serde_json::json!(["12345"]));
    assert_eq!(fields["part_numbers"], serde_json::json!(["PCA-1234-A"]));
    assert_eq!(fields["seq_20"]["unit_serials"], serde_json::json!(["INF-4321"]));
}

#[test]
fn normalize_board_serial() {
    let output = run_args(&["normalize", "board_serial", "54321_1234"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["normalized"], "VGN-54321-1234");
    assert_eq!(out["note"]["changed"], true);
    let changes = out["note"]["changes"].as_array().unwrap();
    assert!(changes.contains(&serde_json::json!("prefix added")));
}

#[test]
fn normalize_unknown_field_is_usage_error() {
    let output = run_args(&["normalize", "colour", "red"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn compare_json_reports_closest_candidates() {
    let output = run_args(&[
        "compare",
        "part_number",
        "--left",
        "PCA-1234-A,DRW-0042-B",
        "--right",
        "pca_1234_a1,drw-0042-b",
        "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["comparison"]["matches"], serde_json::json!(["DRW-0042-B"]));
    assert_eq!(out["comparison"]["match_percentage"], 50.0);
    assert_eq!(out["closest"][0]["item"], "PCA-1234-A");
    assert_eq!(out["closest"][0]["candidate"], "PCA-1234-A1");
}

#[test]
fn compare_rejects_bad_threshold() {
    let output = run_args(&["compare", "job", "--left", "1", "--right", "1", "--threshold", "1.5"]);
    assert_eq!(output.status.code(), Some(2));
}
