//! Integration tests for the kiosk-setup binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command with its user config directory redirected into `home`.
fn kiosk_setup(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("kiosk-setup"));
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("HOME", home.path())
        .env("CI", "true")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = home.path().join("kiosk.yml");
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    kiosk_setup(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browser kiosk"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    kiosk_setup(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn list_shows_steps_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let output = kiosk_setup(&home).arg("list").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let first = stdout.find("update-index").unwrap();
    let last = stdout.find("reboot").unwrap();
    assert!(first < last);
    Ok(())
}

#[test]
fn list_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let output = kiosk_setup(&home).args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(steps.as_array().map(Vec::len), Some(13));
    assert_eq!(steps[5]["id"], "autostart");
    Ok(())
}

#[test]
fn config_shows_explicit_layer() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let path = write_config(&home, "display:\n  output: HDMI-A-2\n");

    kiosk_setup(&home)
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("kiosk.yml"))
        .stdout(predicate::str::contains("HDMI-A-2"));
    Ok(())
}

#[test]
fn missing_config_exits_with_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    kiosk_setup(&home)
        .args(["config", "--config"])
        .arg(home.path().join("missing.yml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.yml"));
    Ok(())
}

#[test]
fn invalid_config_exits_with_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let path = write_config(&home, "kiosk:\n  url: dashboard.local\n");

    kiosk_setup(&home)
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("kiosk.url"));
    Ok(())
}

#[test]
fn unknown_step_is_rejected_before_any_change() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    kiosk_setup(&home)
        .args(["run", "--dry-run", "--only", "bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown step id(s): bogus"));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    kiosk_setup(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiosk-setup"));
    Ok(())
}

#[test]
fn probe_json_reports_fallbacks() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let yaml = format!(
        "paths:\n  edid: [\"{}\"]\nbrowser:\n  paths: []\n  default_path: /opt/kiosk/chromium\ncommands:\n  package_query: \"false\"\n",
        home.path().join("edid").display()
    );
    let path = write_config(&home, &yaml);

    let output = kiosk_setup(&home)
        .arg("probe")
        .arg("--json")
        .arg("--config")
        .arg(&path)
        .env("PATH", home.path())
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["display_modes"]["status"], "fallback");
    assert_eq!(report["browser_binary"]["value"], "/opt/kiosk/chromium");
    Ok(())
}
