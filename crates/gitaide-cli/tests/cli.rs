//! Tests for the `gitaide` binary.
//!
//! Each test gets its own config directory and working directory; the
//! assistant is replaced by a small shell script via `provider_program`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

struct Sandbox {
    config: TempDir,
    work: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            config: tempfile::tempdir().unwrap(),
            work: tempfile::tempdir().unwrap(),
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gitaide"))
            .args(args)
            .current_dir(self.work.path())
            .env("GITAIDE_CONFIG_DIR", self.config.path())
            .env_remove("GITAIDE_PROVIDER")
            .env_remove("GITAIDE_MODEL")
            .env_remove("GITAIDE_TIMEOUT")
            .env_remove("GITAIDE_EXIT_COMMAND")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .output()
            .unwrap()
    }

    fn settings_path(&self) -> PathBuf {
        self.config.path().join("settings.json")
    }

    /// Install `script` as the assistant program.
    #[cfg(unix)]
    fn fake_assistant(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.config.path().join("fake-assistant");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let out = self.run(&["config", "set", "provider_program", path.to_str().unwrap()]);
        assert!(out.status.success(), "{}", stderr(&out));
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn exit_code(out: &Output) -> Option<i32> {
    out.status.code()
}

#[test]
fn config_path_honors_config_dir() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["config", "path"]);
    assert!(out.status.success());
    assert_eq!(Path::new(stdout(&out).trim()), sandbox.settings_path());
}

#[test]
fn config_set_then_show_json() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["config", "set", "provider", "gemini"]).status.success());
    assert!(sandbox.run(&["config", "set", "base_branch", "develop"]).status.success());

    let out = sandbox.run(&["config", "show", "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["provider"], "gemini");
    assert_eq!(json["base_branch"], "develop");

    // Flags win over the file for this invocation only
    let out = sandbox.run(&["--provider", "codex", "config", "show", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["provider"], "codex");
}

#[test]
fn invalid_setting_exits_with_config_code() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["config", "set", "timeout_secs", "0"]);
    assert_eq!(exit_code(&out), Some(78));
    assert!(stderr(&out).contains("Timeout must be between"));
    assert!(!sandbox.settings_path().exists());
}

#[test]
fn usage_errors_exit_with_two() {
    let sandbox = Sandbox::new();
    assert_eq!(exit_code(&sandbox.run(&["--provider", "copilot", "doctor"])), Some(2));
    assert_eq!(exit_code(&sandbox.run(&["release", "one.two"])), Some(2));
}

#[test]
fn missing_cwd_is_a_config_error() {
    let sandbox = Sandbox::new();
    let missing = sandbox.work.path().join("missing");
    let out = sandbox.run(&["-C", missing.to_str().unwrap(), "config", "path"]);
    assert_eq!(exit_code(&out), Some(78));
}

#[cfg(unix)]
#[test]
fn ask_streams_assistant_output() {
    let sandbox = Sandbox::new();
    // claude is invoked as: <program> -p <prompt> --output-format text
    sandbox.fake_assistant(r#"echo "assistant says: $2""#);

    let out = sandbox.run(&["ask", "what", "changed?"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "assistant says: what changed?\n");
}

#[cfg(unix)]
#[test]
fn ask_without_streaming_prints_at_the_end() {
    let sandbox = Sandbox::new();
    sandbox.fake_assistant(r#"echo "one"; echo "two""#);

    let out = sandbox.run(&["--no-stream", "ask", "hi"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "one\ntwo\n");
}

#[cfg(unix)]
#[test]
fn assistant_timeout_exits_with_124() {
    let sandbox = Sandbox::new();
    sandbox.fake_assistant("sleep 30");

    let started = std::time::Instant::now();
    let out = sandbox.run(&["--timeout", "1", "ask", "hang"]);
    assert_eq!(exit_code(&out), Some(124), "{}", stderr(&out));
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}

#[cfg(unix)]
#[test]
fn assistant_failure_reports_stderr() {
    let sandbox = Sandbox::new();
    sandbox.fake_assistant("echo 'quota exceeded' >&2; exit 3");

    let out = sandbox.run(&["ask", "anything"]);
    assert_eq!(exit_code(&out), Some(1));
    assert!(stderr(&out).contains("quota exceeded"));
}

#[test]
fn missing_assistant_exits_with_69() {
    let sandbox = Sandbox::new();
    let set = sandbox.run(&["config", "set", "provider_program", "gitaide-missing-assistant"]);
    assert!(set.status.success());

    let out = sandbox.run(&["ask", "hello"]);
    assert_eq!(exit_code(&out), Some(69));
    assert!(stderr(&out).contains("npm install -g @anthropic-ai/claude-code"));
}

#[test]
fn release_without_assistant_updates_changelog() {
    let sandbox = Sandbox::new();
    if which_git().is_none() {
        return;
    }
    let git = |args: &[&str]| {
        let status = Command::new("git")
            .args(args)
            .current_dir(sandbox.work.path())
            .stdout(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success());
    };
    git(&["init", "-q"]);
    std::fs::write(
        sandbox.work.path().join("CHANGELOG.md"),
        "# Changelog\n\n## [Unreleased]\n- Added standups\n",
    )
    .unwrap();

    let out = sandbox.run(&["release", "v1.2.0", "--date", "2026-10-16", "--no-assistant"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let changelog = std::fs::read_to_string(sandbox.work.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.contains("## [Unreleased]\n\n## [1.2.0] - 2026-10-16\n- Added standups"));
}

#[test]
fn review_with_nothing_staged_skips_the_assistant() {
    let sandbox = Sandbox::new();
    if which_git().is_none() {
        return;
    }
    let status = Command::new("git")
        .args(["init", "-q"])
        .current_dir(sandbox.work.path())
        .status()
        .unwrap();
    assert!(status.success());
    // An assistant that would fail if it were called
    let set = sandbox.run(&["config", "set", "provider_program", "gitaide-missing-assistant"]);
    assert!(set.status.success());

    let out = sandbox.run(&["review", "--staged"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("No changes to review"));
}

fn which_git() -> Option<()> {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .ok()
        .filter(std::process::ExitStatus::success)
        .map(|_| ())
}
