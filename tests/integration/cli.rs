use predicates::prelude::*;

use crate::common::TestSandbox;

#[test]
fn test_help_lists_commands() {
    let sandbox = TestSandbox::new();
    sandbox
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let sandbox = TestSandbox::new();
    sandbox.cmd().args(["-v", "-q", "config", "path"]).assert().failure();
}

#[test]
fn test_config_path_follows_environment() {
    let sandbox = TestSandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(sandbox.config_path().to_string_lossy().as_ref()));
}

#[test]
fn test_config_flag_overrides_environment() {
    let sandbox = TestSandbox::new();
    let other = sandbox.path().join("elsewhere.json");
    sandbox
        .cmd()
        .arg("--config")
        .arg(&other)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.json"));
}

#[test]
fn test_config_show_without_file_shows_defaults() {
    let sandbox = TestSandbox::new();
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("showing defaults"))
        .stdout(predicate::str::contains("\"ThemeKey\": \"CoolGray\""));
    assert!(!sandbox.config_path().exists());
}

#[test]
fn test_config_reset_writes_defaults() {
    let sandbox = TestSandbox::new();
    sandbox.write_config(r#"{ "ThemeKey": "Light", "EditorFontSize": 99 }"#);

    sandbox.cmd().args(["config", "reset"]).assert().success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(sandbox.config_path()).unwrap()).unwrap();
    assert_eq!(json["ThemeKey"], "CoolGray");
    assert_eq!(json["EditorFontSize"], 14.0);

    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_config_validate_reports_each_invalid_field() {
    let sandbox = TestSandbox::new();
    sandbox.write_config(r#"{ "AccentColor": "purple", "EditorFontSize": 200 }"#);

    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("AccentColor"))
        .stdout(predicate::str::contains("EditorFontSize"))
        .stderr(predicate::str::contains("2 invalid setting(s)"));

    // Validation never rewrites the file.
    let content = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert!(content.contains("purple"));
}

#[test]
fn test_config_validate_rejects_unparsable_file() {
    let sandbox = TestSandbox::new();
    sandbox.write_config("{ \"ThemeKey\": ");

    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_config_validate_without_file() {
    let sandbox = TestSandbox::new();
    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults are in use"));
}

#[test]
fn test_startup_check_respects_disabled_auto_update() {
    let sandbox = TestSandbox::new();
    sandbox.write_config(r#"{ "AutoUpdateEnabled": false }"#);

    sandbox
        .cmd()
        .args(["check", "--startup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Automatic updates are disabled"));
}

#[test]
fn test_startup_check_shows_previous_failure_once() {
    let sandbox = TestSandbox::new();
    sandbox.write_config(r#"{ "AutoUpdateEnabled": false }"#);
    sandbox.write_report("verify: missing LocresStudio after extraction\n");

    sandbox
        .cmd()
        .args(["check", "--startup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Previous Update Failed"))
        .stdout(predicate::str::contains("verify: missing LocresStudio"));
    assert!(!sandbox.report_path().exists());

    sandbox
        .cmd()
        .args(["check", "--startup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Previous Update Failed").not());
}

#[test]
fn test_no_update_env_skips_startup_check() {
    let sandbox = TestSandbox::new();
    sandbox.write_report("timeout: process 1 was still running");

    sandbox
        .cmd()
        .env("LOCRES_STUDIO_NO_UPDATE", "1")
        .args(["check", "--startup"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    // Nothing ran, so the report is still waiting for the next launch.
    assert!(sandbox.report_path().exists());
}
