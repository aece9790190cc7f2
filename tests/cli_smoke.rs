//! Smoke tests for the `config-overlay` binary.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SECTIONS: &str = r#"
[global]
ConnectionStringName = "valueabc"
SomeCount = 5
SomePath = 'C:\temp\mypath'

[jonDevAppSettingTest]
SomeCount = 7
"#;

const APP_SETTINGS: &str = r#"
myoverridekey = "jonDevAppSettingTest"
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("sections.toml"), SECTIONS).unwrap();
        fs::write(dir.path().join("app.toml"), APP_SETTINGS).unwrap();
        fs::write(dir.path().join("settings.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        run_in(self.dir.path(), &self.path("settings.toml"), args)
    }
}

fn run_in(cwd: &Path, settings: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_config-overlay"));
    cmd.current_dir(cwd).arg("--settings").arg(settings).args(args);
    for (name, _) in std::env::vars() {
        if name.starts_with("CONFIG_OVERLAY_") {
            cmd.env_remove(name);
        }
    }
    cmd.env_remove("RUST_LOG")
        .output()
        .expect("failed to start binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn resolve_app_setting_prints_override() {
    let ws = Workspace::new();
    let sections = ws.path("sections.toml");
    let app = ws.path("app.toml");
    let output = ws.run(&[
        "resolve",
        "--sections",
        sections.to_str().unwrap(),
        "--app-settings",
        app.to_str().unwrap(),
        "--mode",
        "app-setting",
        "myoverridekey",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    assert!(out.contains("SomeCount = 7"), "got: {out}");
    assert!(out.contains("ConnectionStringName = \"valueabc\""), "got: {out}");
}

#[test]
fn resolve_inline_app_setting_as_json() {
    let ws = Workspace::new();
    let sections = ws.path("sections.toml");
    let output = ws.run(&[
        "resolve",
        "--sections",
        sections.to_str().unwrap(),
        "--app-setting",
        "myoverridekey=jonDevAppSettingTest",
        "--format",
        "json",
        "--explain",
        "myoverridekey",
    ]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["SomeCount"], 7);
    assert_eq!(value["SomePath"], r"C:\temp\mypath");

    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("applied section 'jonDevAppSettingTest'"), "stderr: {err}");
}

#[test]
fn resolve_without_match_prints_global() {
    let ws = Workspace::new();
    let sections = ws.path("sections.toml");
    let output = ws.run(&[
        "resolve",
        "--sections",
        sections.to_str().unwrap(),
        "--mode",
        "machine-name",
    ]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("SomeCount = 5"));
}

#[test]
fn resolve_missing_global_fails() {
    let ws = Workspace::new();
    let sections = ws.path("sections.toml");
    let output = ws.run(&[
        "resolve",
        "--sections",
        sections.to_str().unwrap(),
        "--global",
        "nothere",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nothere"));
}

#[test]
fn sections_lists_names() {
    let ws = Workspace::new();
    let sections = ws.path("sections.toml");
    let output = ws.run(&["sections", "--sections", sections.to_str().unwrap()]);

    assert!(output.status.success());
    let names: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(names, vec!["global", "jonDevAppSettingTest"]);
}

#[test]
fn settings_file_supplies_sources() {
    let ws = Workspace::new();
    let settings = ws.path("custom.toml");
    fs::write(
        &settings,
        format!(
            "[resolver]\noverride_type = \"app-setting-key\"\noverride_key = \"myoverridekey\"\n\n[sources]\nsections_file = {:?}\napp_settings_file = {:?}\n",
            ws.path("sections.toml"),
            ws.path("app.toml"),
        ),
    )
    .unwrap();

    let output = run_in(ws.dir.path(), &settings, &["resolve"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("SomeCount = 7"));
}
