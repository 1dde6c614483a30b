use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn svki_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("svki");
    path
}

/// Build a project tree with one valid state file, one truncated state
/// file, current audit artifacts with findings, docs with a decision
/// record, and a historical snapshot.
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let state_dir = root.join(".svk/state");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(
        state_dir.join("verification.json"),
        r#"{
            "skill": "verification",
            "version": "2.0.0",
            "updated_at": "2026-03-10T09:30:00Z",
            "phases": {
                "plan": { "status": "complete" },
                "execute": { "status": "in_progress" },
                "report": { "status": "pending" }
            },
            "checks_passed": 3,
            "checks_failed": 1,
            "checks_pending": 2
        }"#,
    )
    .unwrap();
    // Truncated mid-write; status must skip it rather than fail.
    fs::write(state_dir.join("doc-suite.json"), r#"{"skill": "doc-su"#).unwrap();

    let audit_dir = root.join("audits/current");
    fs::create_dir_all(audit_dir.join("findings")).unwrap();
    fs::write(
        audit_dir.join("report.md"),
        "# Security Audit Report\n\nTwo findings in the payment subsystem.",
    )
    .unwrap();
    fs::write(
        audit_dir.join("findings/001-replay.md"),
        "# Replay attack on payment webhook\nSeverity: HIGH\nThe payment webhook accepts...",
    )
    .unwrap();
    fs::write(
        audit_dir.join("findings/002-logging.md"),
        "# Tokens in payment logs\nSeverity: LOW\nThe payment service logs bearer tokens...",
    )
    .unwrap();
    fs::create_dir_all(root.join("audits/history/2026-02-01")).unwrap();
    fs::write(
        root.join("audits/history/2026-02-01/report.md"),
        "# Security Audit Report (archived)\n\nNo findings.",
    )
    .unwrap();

    let docs_dir = root.join("docs");
    fs::create_dir_all(docs_dir.join("decisions")).unwrap();
    fs::write(
        docs_dir.join("architecture.md"),
        "# Architecture\n\nThe ingest service fans out to workers.\n\nEach worker owns a queue partition.",
    )
    .unwrap();
    fs::write(
        docs_dir.join("decisions/0007-queue-backend.md"),
        "# 0007: Queue backend\n\nStatus: accepted\n\nWe chose a partitioned queue over a broker.",
    )
    .unwrap();

    let config_content = format!(
        r#"[project]
root = "{}"

[server]
bind = "127.0.0.1:7431"

[search]
max_matches_per_file = 5
context_lines = 1
"#,
        root.display()
    );
    let config_path = root.join("svk.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_svki(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = svki_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run svki binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_status_shows_current_phase_and_skips_broken_state() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_svki(&config_path, &["status"]);
    assert!(
        success,
        "status failed: stdout={}, stderr={}",
        stdout, stderr
    );

    // The valid state file is summarized...
    assert!(stdout.contains("verification"));
    assert!(stdout.contains("execute"));
    assert!(stdout.contains("in_progress"));
    assert!(stdout.contains("3 passed, 1 failed, 2 pending"));
    assert!(stdout.contains("/svk:verify execute --resume"));

    // ...the truncated one is skipped with a warning, not a failure.
    assert!(!stdout.contains("doc-suite"));
    assert!(stderr.contains("Warning"));
    assert!(stderr.contains("doc-suite.json"));
}

#[test]
fn test_status_empty_project_prints_notice() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("svk.toml");
    fs::write(
        &config_path,
        format!("[project]\nroot = \"{}\"\n", tmp.path().display()),
    )
    .unwrap();

    let (stdout, _, success) = run_svki(&config_path, &["status"]);
    assert!(success, "status on an empty project should succeed");
    assert!(stdout.contains("No SVK state found"));
    assert!(stdout.contains("/svk:doc-suite survey"));
}

#[test]
fn test_audit_report_from_current() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_svki(&config_path, &["audit", "security-audit"]);
    assert!(success, "audit failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Two findings in the payment subsystem."));
}

#[test]
fn test_audit_previous_reads_latest_snapshot() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_svki(
        &config_path,
        &["audit", "security-audit", "--audit", "previous"],
    );
    assert!(success);
    assert!(stdout.contains("archived"));
}

#[test]
fn test_audit_previous_without_history_suggests_start_command() {
    let (_tmp, config_path) = setup_test_env();

    // verification has no history snapshots in the fixture.
    let (stdout, _, success) = run_svki(
        &config_path,
        &["audit", "verification", "--audit", "previous"],
    );
    assert!(success, "a missing previous run is a notice, not an error");
    assert!(stdout.contains("No previous verification run"));
    assert!(stdout.contains("/svk:verify plan"));
}

#[test]
fn test_audit_findings_filters_conjunctively() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_svki(
        &config_path,
        &[
            "audit",
            "security-audit",
            "--type",
            "findings",
            "--subsystem",
            "payment",
            "--severity",
            "high",
        ],
    );
    assert!(success);
    assert!(stdout.contains("1 finding(s)"));
    assert!(stdout.contains("001-replay.md"));
    assert!(!stdout.contains("002-logging.md"));
}

#[test]
fn test_audit_unknown_skill_is_notice_not_error() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_svki(&config_path, &["audit", "mystery"]);
    assert!(success);
    assert!(stdout.contains("Unknown skill"));
}

#[test]
fn test_audit_unknown_document_type_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_svki(
        &config_path,
        &["audit", "security-audit", "--type", "summary"],
    );
    assert!(!success, "an unknown document type must be a hard error");
    assert!(stderr.contains("Unknown document type"));
}

#[test]
fn test_search_reports_line_numbers_and_context() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_svki(&config_path, &["search", "worker"]);
    assert!(
        success,
        "search failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("docs/architecture.md"));
    assert!(stdout.contains("line 3"));
    assert!(stdout.contains("fans out to workers"));
}

#[test]
fn test_search_scope_decisions_excludes_other_docs() {
    let (_tmp, config_path) = setup_test_env();

    // "queue" appears in both docs/architecture.md and the decision record.
    let (stdout, _, success) = run_svki(
        &config_path,
        &["search", "queue", "--scope", "decisions"],
    );
    assert!(success);
    assert!(stdout.contains("0007-queue-backend.md"));
    assert!(!stdout.contains("architecture.md"));
}

#[test]
fn test_search_no_results_prints_notice() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_svki(&config_path, &["search", "zebra-xylophone"]);
    assert!(success, "an empty result set is a notice, not an error");
    assert!(stdout.contains("No results for \"zebra-xylophone\""));
}

#[test]
fn test_search_empty_query_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_svki(&config_path, &["search", "   "]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"));
}

#[test]
fn test_search_unknown_scope_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_svki(
        &config_path,
        &["search", "queue", "--scope", "everything"],
    );
    assert!(!success);
    assert!(stderr.contains("Unknown search scope"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    // No svk.toml anywhere; status in an empty cwd-rooted project should
    // still run on built-in defaults rather than fail.
    let tmp = TempDir::new().unwrap();
    let binary = svki_binary();
    let output = Command::new(&binary)
        .current_dir(tmp.path())
        .args(["status"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No SVK state found"));
}
