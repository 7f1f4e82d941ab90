use predicates::prelude::*;
use std::path::{Path, PathBuf};
use assert_cmd::Command;
use tempfile::TempDir;

const MISSING_BINARY: &str = "gemini-mcp-test-no-such-binary";

fn gemini_mcp_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gemini-mcp"));
    cmd.env_remove("GEMINI_MCP_LOG");
    cmd
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn offline_config(dir: &Path) -> PathBuf {
    write_config(dir, &format!("[gemini]\nbinary = \"{MISSING_BINARY}\"\n"))
}

#[test]
fn test_cli_help() {
    gemini_mcp_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP server"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("review"));
}

#[test]
fn test_cli_version() {
    gemini_mcp_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-mcp"));
}

#[test]
fn test_invalid_subcommand() {
    gemini_mcp_cmd().arg("invalid-command").assert().failure();
}

#[test]
fn test_config_where() {
    gemini_mcp_cmd()
        .args(["config", "where", "--config", "/tmp/custom.toml"])
        .assert()
        .success()
        .stdout("/tmp/custom.toml\n");
}

#[test]
fn test_config_init_writes_loadable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_arg = path.to_str().unwrap();

    gemini_mcp_cmd()
        .args(["config", "init", "--config", path_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(path.exists());

    gemini_mcp_cmd()
        .args(["config", "init", "--config", path_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    gemini_mcp_cmd()
        .args(["status", "config", "--json", "--config", path_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"gemini-2.5-pro\""));
}

#[test]
fn test_missing_explicit_config_fails() {
    gemini_mcp_cmd()
        .args(["status", "templates", "--config", "/nonexistent/gemini-mcp.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_status_templates() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    gemini_mcp_cmd()
        .args(["status", "templates", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("bug_analysis"))
        .stdout(predicate::str::contains("code_review"));
}

#[test]
fn test_unopenable_log_file_falls_back_to_stderr() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    let log_file = dir.path().join("missing-dir").join("server.log");

    gemini_mcp_cmd()
        .args(["status", "templates", "--verbose", "--config", config.to_str().unwrap()])
        .args(["--log-file", log_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("code_review"))
        .stderr(predicate::str::contains("Failed to open log file"))
        .stderr(predicate::str::contains("Loaded tool context"));
}

#[test]
fn test_status_config_applies_overrides() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "max_context_files = 5\n");

    gemini_mcp_cmd()
        .args(["status", "config", "--json", "--sandbox", "--model", "gemini-2.5-flash"])
        .args(["--config", config.to_str().unwrap()])
        .env("GEMINI_MCP_GEMINI__TIMEOUT_SECS", "42")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"gemini-2.5-flash\""))
        .stdout(predicate::str::contains("\"sandbox\": true"))
        .stdout(predicate::str::contains("\"timeout_secs\": 42"))
        .stdout(predicate::str::contains("\"max_context_files\": 5"));
}

#[test]
fn test_status_check_without_cli() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    gemini_mcp_cmd()
        .args(["status", "check", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("CLI available   ✗"))
        .stdout(predicate::str::contains(MISSING_BINARY));
}

#[test]
fn test_review_failure_prints_envelope() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let code = dir.path().join("main.py");
    std::fs::write(&code, "print('hi')\n").unwrap();

    gemini_mcp_cmd()
        .args(["review", "--json", "--config", config.to_str().unwrap()])
        .args(["--file", code.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"rating\": \"Failed\""))
        .stdout(predicate::str::contains("Error during review"))
        .stdout(predicate::str::contains("```python"));
}

#[test]
fn test_output_file_receives_result() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let plan = dir.path().join("plan.md");
    std::fs::write(&plan, "# Plan\nAdd OAuth login.\n").unwrap();
    let text_out = dir.path().join("review.txt");
    let json_out = dir.path().join("review.json");

    gemini_mcp_cmd()
        .args(["feature", "--config", config.to_str().unwrap()])
        .args(["--file", plan.to_str().unwrap(), "-o", text_out.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Output saved to"));
    let saved = std::fs::read_to_string(&text_out).unwrap();
    assert!(saved.contains("Feature plan review"));
    assert!(saved.contains("Error during feature plan review"));

    gemini_mcp_cmd()
        .args(["feature", "--json", "--config", config.to_str().unwrap()])
        .args(["--file", plan.to_str().unwrap(), "--output", json_out.to_str().unwrap()])
        .assert()
        .failure();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(saved["metadata"]["status"], serde_json::json!("Failed"));
}

#[test]
fn test_debug_flag_reaches_gemini_options() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    gemini_mcp_cmd()
        .args(["status", "config", "--json", "--debug"])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"debug\": true"));
}

#[test]
fn test_explain_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    gemini_mcp_cmd()
        .args(["explain", "--show-prompts", "--level", "basic"])
        .args(["--config", config.to_str().unwrap()])
        .write_stdin("fn main() {}\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error during code explanation"))
        .stdout(predicate::str::contains("Prompt sent to Gemini"))
        .stdout(predicate::str::contains("fn main() {}"));
}

#[test]
fn test_oversized_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        &format!("max_file_size_mb = 0.00001\n\n[gemini]\nbinary = \"{MISSING_BINARY}\"\n"),
    );
    let code = dir.path().join("big.rs");
    std::fs::write(&code, "x".repeat(64)).unwrap();

    gemini_mcp_cmd()
        .args(["review", "--config", config.to_str().unwrap()])
        .args(["--file", code.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("byte limit"));
}

#[test]
fn test_bug_limits_context_files() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        &format!("max_context_files = 1\n\n[gemini]\nbinary = \"{MISSING_BINARY}\"\n"),
    );
    let a = dir.path().join("a.rs");
    let b = dir.path().join("b.rs");
    std::fs::write(&a, "fn a() {}").unwrap();
    std::fs::write(&b, "fn b() {}").unwrap();

    gemini_mcp_cmd()
        .args(["bug", "-d", "crash", "--config", config.to_str().unwrap()])
        .args(["--code-file", a.to_str().unwrap(), "--code-file", b.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Too many context files"));
}

#[test]
fn test_serve_answers_over_stdio() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    gemini_mcp_cmd()
        .args(["serve", "--config", config.to_str().unwrap()])
        .write_stdin(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/read","params":{"uri":"gemini://status"}}"#,
            "\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""protocolVersion":"2024-11-05""#))
        .stdout(predicate::str::contains(r#"\"cli_available\": false"#));
}
