//! The rendered bash watchdog, run for real against a temp install.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use locres_studio::test_utils::zip_bytes;
use locres_studio::upgrade::archive::ArchiveManifest;
use locres_studio::upgrade::{HandoffRequest, ScriptFlavor, WatchdogLauncher, WatchdogScript};

use crate::common::tools_available;

const RELAUNCH_MARKER: &str = "relaunched";
const EDITOR_STUB: &[u8] = b"#!/bin/sh\ntouch \"$(dirname \"$0\")/relaunched\"\n";

/// A process id that is guaranteed not to be running any more.
fn exited_pid() -> u32 {
    let mut child = Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    pid
}

/// Write a release archive into `root` and describe the handoff for it.
fn stage(root: &Path, pid: u32, archive: &[u8], manifest: &[&str]) -> HandoffRequest {
    let install_dir = root.join("install");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::create_dir_all(root.join("config")).unwrap();
    let archive_path = root.join("update.zip");
    std::fs::write(&archive_path, archive).unwrap();

    HandoffRequest {
        pid,
        executable: install_dir.join("LocresStudio"),
        install_dir,
        archive: archive_path,
        manifest: ArchiveManifest::from_entries(manifest.iter().map(|s| (*s).to_string())),
        report_file: root.join("config").join("update-report.txt"),
        poll_interval: Duration::from_secs(1),
        timeout: Some(Duration::from_secs(2)),
    }
}

fn release_archive() -> Vec<u8> {
    zip_bytes(&[
        ("LocresStudio", EDITOR_STUB),
        ("lib/", b""),
        ("lib/libSkiaSharp.so", b"native"),
    ])
}

async fn write_script(root: &Path, request: &HandoffRequest) -> PathBuf {
    WatchdogScript::render(ScriptFlavor::Shell, request)
        .unwrap()
        .write_to(&root.join("tmp"))
        .await
        .unwrap()
}

fn run(script: &Path) -> ExitStatus {
    Command::new("bash").arg(script).status().unwrap()
}

fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    condition()
}

#[tokio::test]
async fn test_installs_and_relaunches_after_exit() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let request = stage(
        temp.path(),
        exited_pid(),
        &release_archive(),
        &["LocresStudio", "lib/libSkiaSharp.so"],
    );
    let script = write_script(temp.path(), &request).await;

    assert!(run(&script).success());

    assert_eq!(
        std::fs::read(request.install_dir.join("lib/libSkiaSharp.so")).unwrap(),
        b"native"
    );
    assert!(!request.archive.exists());
    assert!(!request.report_file.exists());
    assert!(!script.exists());
    assert!(wait_until(Duration::from_secs(10), || {
        request.install_dir.join(RELAUNCH_MARKER).exists()
    }));
}

#[tokio::test]
async fn test_gives_up_while_editor_is_running() {
    if !tools_available(&["bash"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let pid = std::process::id();
    let request = stage(temp.path(), pid, &release_archive(), &["LocresStudio"]);
    let script = write_script(temp.path(), &request).await;

    assert!(!run(&script).success());

    let report = std::fs::read_to_string(&request.report_file).unwrap();
    assert!(report.starts_with(&format!("timeout: process {pid}")), "{report}");
    assert!(request.archive.exists());
    assert!(!request.executable.exists());
    assert!(!script.exists());
}

#[tokio::test]
async fn test_reports_missing_entries() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let request = stage(
        temp.path(),
        exited_pid(),
        &release_archive(),
        &["LocresStudio", "lib/libHarfBuzzSharp.so"],
    );
    let script = write_script(temp.path(), &request).await;

    assert!(!run(&script).success());

    let report = std::fs::read_to_string(&request.report_file).unwrap();
    assert!(report.contains("verify: missing lib/libHarfBuzzSharp.so"), "{report}");
    assert!(request.archive.exists());
    assert!(!request.install_dir.join(RELAUNCH_MARKER).exists());
}

#[tokio::test]
async fn test_reports_broken_archive() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let request = stage(temp.path(), exited_pid(), b"definitely not a zip", &["LocresStudio"]);
    let script = write_script(temp.path(), &request).await;

    assert!(!run(&script).success());

    let report = std::fs::read_to_string(&request.report_file).unwrap();
    assert!(report.starts_with("extract:"), "{report}");
    assert!(!script.exists());
}

#[tokio::test]
async fn test_paths_with_spaces_and_quotes() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Locres Studio's \"files\"");
    let request = stage(&root, exited_pid(), &release_archive(), &["LocresStudio"]);
    let script = write_script(&root, &request).await;

    assert!(run(&script).success());
    assert!(request.install_dir.join("LocresStudio").exists());
    assert!(!request.archive.exists());
}

#[tokio::test]
async fn test_launcher_runs_script_detached() {
    if !tools_available(&["bash", "unzip"]) {
        return;
    }
    let temp = TempDir::new().unwrap();
    let request = stage(temp.path(), exited_pid(), &release_archive(), &["LocresStudio"]);
    let launcher = WatchdogLauncher::new(ScriptFlavor::Shell, temp.path().join("tmp"));

    let script = launcher.launch(&request).await.unwrap();

    let expected_name = format!("locres-studio-update-{}.sh", request.pid);
    assert_eq!(script.file_name().unwrap().to_string_lossy(), expected_name);
    assert!(wait_until(Duration::from_secs(10), || {
        request.install_dir.join(RELAUNCH_MARKER).exists() && !script.exists()
    }));
    assert!(!request.archive.exists());
}
