//! Logging setup for the binary.
//!
//! Diagnostics go through `tracing` to stderr. Panics are additionally
//! appended to `Logs/crashlog.txt` in the config directory so users can attach
//! them to bug reports.

use std::fs::OpenOptions;
use std::io::Write;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Directory under the config dir holding crash logs.
pub const LOG_DIR: &str = "Logs";
/// Crash log file name.
pub const CRASH_LOG_FILE: &str = "crashlog.txt";

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used, and `None` turns
/// logging down to errors only. Calling this more than once is harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.is_empty() => EnvFilter::new(value),
        _ => EnvFilter::new(level.unwrap_or("error")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `<config dir>/Logs/crashlog.txt`.
pub fn crash_log_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_DIR).join(CRASH_LOG_FILE)
}

/// Append every panic to the crash log, then run the previous hook.
pub fn install_crash_log(config_dir: &Path) {
    let path = crash_log_path(config_dir);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = append_crash_entry(&path, &format_crash_entry(info));
        previous(info);
    }));
}

fn format_crash_entry(info: &PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    let location =
        info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();

    crash_entry(chrono::Local::now(), &payload, &location)
}

fn crash_entry(at: chrono::DateTime<chrono::Local>, message: &str, location: &str) -> String {
    format!("[{}] {} ({})\n", at.format("%Y-%m-%d %H:%M:%S"), message, location)
}

/// Failures here are returned but ignored by the hook.
fn append_crash_entry(path: &Path, entry: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())
}
