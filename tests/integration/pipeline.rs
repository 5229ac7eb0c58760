//! A whole update: check, download, verify, hand off, install.

use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

use locres_studio::config::AppConfig;
use locres_studio::test_utils::{FakeRegistry, RecordingHandoff, RecordingHost, zip_bytes};
use locres_studio::upgrade::{
    CheckKind, CheckOutcome, ChecksumPolicy, ChecksumVerifier, Platform, ScriptFlavor,
    UpdateChecker, UpdatePaths, UpdateSettings, VersionTag, WatchdogScript,
};

use crate::common::tools_available;

const LATEST: &str = "v1.4.0";

fn asset_url() -> String {
    Platform::from_parts("linux", "x86_64").unwrap().download_url(&VersionTag::new(LATEST))
}

fn checksums_url() -> String {
    format!("https://github.com/AcTePuKc/LocresStudio/releases/download/{LATEST}/checksums.txt")
}

fn archive() -> Vec<u8> {
    zip_bytes(&[
        ("LocresStudio", b"#!/bin/sh\nexit 0\n"),
        ("version.txt", LATEST.as_bytes()),
        ("Assets/", b""),
        ("Assets/strings.json", b"{}"),
    ])
}

#[tokio::test]
async fn test_startup_update_is_installed_by_watchdog() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let paths = UpdatePaths::rooted(temp.path());
    std::fs::write(&paths.version_file, "v1.3.0\n").unwrap();

    let body = archive();
    let digest = {
        let file = temp.path().join("expected.zip");
        std::fs::write(&file, &body).unwrap();
        ChecksumVerifier::compute_sha256(&file).await.unwrap()
    };
    let registry = FakeRegistry::with_latest(LATEST)
        .with_asset(asset_url(), body)
        .with_text(checksums_url(), format!("{digest}  LocresStudio-{LATEST}-linux-x64.zip\n"));

    let config = AppConfig {
        updater: UpdateSettings {
            checksum_policy: ChecksumPolicy::Require,
            watchdog_timeout_secs: 5,
            ..UpdateSettings::default()
        },
        ..AppConfig::default()
    };
    let mut checker =
        UpdateChecker::new(registry, RecordingHost::new(), RecordingHandoff::new(), paths.clone())
            .with_config(&config)
            .with_target("linux", "x86_64");

    let outcome = checker.check(CheckKind::Startup).await;
    assert_eq!(
        outcome,
        CheckOutcome::HandedOff {
            version: VersionTag::new(LATEST)
        }
    );
    assert_eq!(checker.host().prompt_count(), 0);

    let mut request = checker.handoff().requests().remove(0);
    assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    assert_eq!(request.manifest.len(), 3);

    // Play the part of the exiting editor.
    let mut editor = Command::new("true").spawn().unwrap();
    request.pid = editor.id();
    editor.wait().unwrap();

    let script = WatchdogScript::render(ScriptFlavor::Shell, &request)
        .unwrap()
        .write_to(&paths.script_dir)
        .await
        .unwrap();
    assert!(Command::new("bash").arg(&script).status().unwrap().success());

    assert_eq!(
        std::fs::read_to_string(paths.install_dir.join("version.txt")).unwrap(),
        LATEST
    );
    assert!(paths.install_dir.join("Assets/strings.json").exists());
    assert!(!paths.download.exists());
    assert!(!paths.report_file.exists());
}
