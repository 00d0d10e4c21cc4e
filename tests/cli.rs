use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn diagtrack(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diagtrack"))
        .current_dir(dir)
        .env_remove("FORCE_COLOR")
        .env_remove("CLICOLOR_FORCE")
        .arg("--no-config")
        .args(args)
        .output()
        .expect("diagtrack runs")
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .expect("CSV written")
        .split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| line.split(';').map(str::to_string).collect())
        .collect()
}

struct ReportRun {
    output: Output,
    simple: Vec<Vec<String>>,
    detailed: Vec<Vec<String>>,
    _dir: TempDir,
}

fn run_report(payload: Value, extra: &[&str]) -> ReportRun {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.json");
    std::fs::write(&input, payload.to_string()).unwrap();

    let mut args = vec![
        "report",
        "--input",
        "in.json",
        "--out-simple",
        "simple.csv",
        "--out-detailed",
        "detailed.csv",
    ];
    args.extend_from_slice(extra);
    let output = diagtrack(dir.path(), &args);

    let simple_path = dir.path().join("simple.csv");
    let detailed_path = dir.path().join("detailed.csv");
    ReportRun {
        simple: if simple_path.exists() { read_csv(&simple_path) } else { Vec::new() },
        detailed: if detailed_path.exists() { read_csv(&detailed_path) } else { Vec::new() },
        output,
        _dir: dir,
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn merge_dedups_across_document_shapes() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.json"),
        json!([{"source": "clangd", "message": "m1", "file": "a.c"}]).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.json"),
        json!({"diagnostics": [{"source": "clangd", "message": "m1", "file": "a.c"}]}).to_string(),
    )
    .unwrap();

    let output = diagtrack(
        dir.path(),
        &["merge", "--inputs", "a.json,b.json", "--output", "out/merged.json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("diagnostics_in=2"));
    assert!(stdout.contains("diagnostics_out=1"));

    let merged: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("out/merged.json")).unwrap())
            .unwrap();
    assert_eq!(merged, json!([{"source": "clangd", "message": "m1", "file": "a.c"}]));
}

#[test]
fn merge_from_directory_is_idempotent() {
    let dir = tempdir().unwrap();
    let exports = dir.path().join("exports");
    std::fs::create_dir_all(&exports).unwrap();
    std::fs::write(
        exports.join("project-problems-1.json"),
        json!([
            {"resource": "a.c", "startLineNumber": 1, "startColumn": 1, "message": "m"},
            {"resource": "b.c", "message": "n"}
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        exports.join("project-problems-2.json"),
        json!({"problems": [
            {"file": "a.c", "range": {"start": {"line": 1, "character": 1}}, "message": "m"}
        ]})
        .to_string(),
    )
    .unwrap();

    let first = diagtrack(
        dir.path(),
        &["merge", "--inputs-dir", "exports", "--glob", "project-problems-*.json", "--output", "once.json"],
    );
    assert!(first.status.success(), "{}", stderr(&first));
    let second = diagtrack(
        dir.path(),
        &["merge", "--inputs", "once.json,once.json", "--output", "twice.json"],
    );
    assert!(second.status.success(), "{}", stderr(&second));

    let once = std::fs::read_to_string(dir.path().join("once.json")).unwrap();
    let twice = std::fs::read_to_string(dir.path().join("twice.json")).unwrap();
    assert_eq!(once, twice);
    let parsed: Vec<Value> = serde_json::from_str(&once).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn merge_without_inputs_is_distinguishable() {
    let dir = tempdir().unwrap();
    let output = diagtrack(
        dir.path(),
        &["merge", "--inputs", "missing.json", "--output", "merged.json"],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("merged.json").exists());
}

#[test]
fn report_sanitizes_formula_cells() {
    let run = run_report(
        json!({"diagnostics": [{
            "source": "clangd",
            "message": "=2+2",
            "file": "@danger.c",
            "code": {"value": "+SUM(A1)"}
        }]}),
        &[],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert_eq!(run.simple[1][2], "'@danger.c");
    assert_eq!(run.detailed[1][2], "'@danger.c");
    assert_eq!(run.detailed[1][5], "'+SUM(A1)");
    assert_eq!(run.detailed[1][7], "'=2+2");
}

#[test]
fn report_writes_day_and_version_in_both_tables() {
    let run = run_report(
        json!({"diagnostics": [
            {"source": "clangd", "message": "ok", "file": "a.c", "code": "unused-includes"}
        ]}),
        &["--day", "2026-01-01", "--version", "release-42"],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert_eq!(run.simple[0], vec!["day", "version", "file", "count"]);
    assert_eq!(run.simple[1], vec!["2026-01-01", "release-42", "a.c", "1"]);
    assert_eq!(
        run.detailed[0],
        vec!["day", "version", "file", "line", "column", "code", "source", "message"]
    );
    assert_eq!(&run.detailed[1][0..2], &["2026-01-01", "release-42"]);
}

#[test]
fn report_max_items_limits_output() {
    let run = run_report(
        json!({"diagnostics": [
            {"source": "clangd", "message": "m1", "file": "a.c"},
            {"source": "clangd", "message": "m2", "file": "b.c"},
            {"source": "clangd", "message": "m3", "file": "c.c"}
        ]}),
        &["--max-items", "2"],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert_eq!(run.detailed.len(), 3);
}

#[test]
fn report_counts_invalid_items() {
    let run = run_report(
        json!({"diagnostics": [
            {"source": "clangd", "message": "ok", "file": "a.c"},
            {"source": 123, "message": "bad-source", "file": "b.c"},
            {"source": "clangd", "message": null, "file": "c.c"}
        ]}),
        &[],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert!(stderr(&run.output).contains("2 diagnostic(s) skipped"));
    assert_eq!(run.detailed.len(), 2);
}

#[test]
fn quiet_report_still_warns_about_invalid_items() {
    let run = run_report(
        json!([
            {"source": "clangd", "message": "ok", "file": "a.c"},
            {"source": "clangd", "file": "b.c"}
        ]),
        &["-q"],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert!(run.output.stdout.is_empty());
    assert!(stderr(&run.output).contains("1 diagnostic(s) skipped"));
}

#[test]
fn piped_merge_status_line_is_plain() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), "[]").unwrap();

    let output = diagtrack(dir.path(), &["merge", "--inputs", "a.json", "--output", "m.json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("OK: inputs=1 read_ok=1 read_fail=0"), "{stdout:?}");
    assert!(!stdout.contains('\x1b'));
}

#[test]
fn report_tolerates_malformed_positions() {
    let run = run_report(
        json!({"diagnostics": [
            {"source": "clangd", "message": "bad position", "file": "a.c",
             "startLineNumber": "abc", "startColumn": "not-an-int"},
            {"source": "clangd", "message": "bad range", "file": "b.c",
             "range": {"start": {"line": "x", "character": "y"}}}
        ]}),
        &[],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));
    assert_eq!(run.detailed.len(), 3);
    for row in &run.detailed[1..] {
        assert_eq!(row[3], "");
        assert_eq!(row[4], "");
    }
}

#[test]
fn report_rejects_negative_cap() {
    let run = run_report(json!([]), &["--max-items", "-1"]);
    assert_eq!(run.output.status.code(), Some(2));
    assert!(run.detailed.is_empty());
}

#[test]
fn report_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("in.json"), "{broken").unwrap();
    let output = diagtrack(
        dir.path(),
        &["report", "--input", "in.json", "--out-simple", "s.csv", "--out-detailed", "d.csv"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn charts_from_report_output() {
    let run = run_report(
        json!([
            {"source": "clangd", "message": "m1", "file": "a.c", "code": "unused-includes"},
            {"source": "clangd", "message": "m2", "file": "a.c", "code": "unused-includes"},
            {"source": "clangd", "message": "m3", "file": "b.c"}
        ]),
        &["--day", "2026-01-01"],
    );
    assert!(run.output.status.success(), "{}", stderr(&run.output));

    let dir = run._dir.path();
    let output = diagtrack(dir, &["charts", "--input-csv", "detailed.csv", "--out-dir", "charts", "--top-n", "5"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let summary = std::fs::read_to_string(dir.join("charts/summary.md")).unwrap();
    assert!(summary.contains("- Total diagnostics: **3**"));
    assert!(summary.contains("| a.c | 2 | 66.67% |"));
    assert!(summary.contains("| 2026-01-01 | 3 | 100.00% |"));
    let files_svg = std::fs::read_to_string(dir.join("charts/02_top_files.svg")).unwrap();
    assert!(files_svg.contains("Top 5 files"));
}

#[test]
fn charts_reject_tables_without_required_columns() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("t.csv"), "file;count\r\na.c;1\r\n").unwrap();
    let output = diagtrack(dir.path(), &["charts", "--input-csv", "t.csv"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("missing columns"));
}
