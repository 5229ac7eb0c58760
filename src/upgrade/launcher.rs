//! Hands the downloaded archive to a detached watchdog script.
//!
//! The running editor cannot overwrite its own files, so installation is
//! delegated: a batch (Windows) or bash (Linux) script waits for the editor's
//! process to exit, extracts the archive over the install directory, checks
//! every archive entry landed, deletes the archive, relaunches the editor and
//! deletes itself. Anything that goes wrong is written to a report file that
//! the next launch of the editor shows to the user.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tera::{Context, Tera};
use tokio::fs;
use tracing::{debug, info};

use crate::constants::WATCHDOG_SCRIPT_NAME;
use crate::core::UpdateError;
use crate::upgrade::archive::ArchiveManifest;
use crate::upgrade::platform::OsToken;

const SHELL_TEMPLATE: &str = r#"#!/bin/bash
# Generated by LocresStudio. Waits for the editor to exit, installs the
# downloaded release over the install directory and restarts the editor.
PID={{ pid }}
ARCHIVE={{ archive }}
INSTALL_DIR={{ install_dir }}
EXECUTABLE={{ executable }}
REPORT={{ report }}
POLL_SECS={{ poll_secs }}
TIMEOUT_SECS={{ timeout_secs }}
MANIFEST=(
{%- for file in manifest %}
    {{ file }}
{%- endfor %}
)

fail() {
    echo "$1" > "$REPORT"
    rm -f -- "$0"
    exit 1
}

waited=0
while kill -0 "$PID" 2> /dev/null; do
    if [ "$TIMEOUT_SECS" -gt 0 ] && [ "$waited" -ge "$TIMEOUT_SECS" ]; then
        fail "timeout: process $PID was still running after $TIMEOUT_SECS seconds; the update was not installed"
    fi
    sleep "$POLL_SECS"
    waited=$((waited + POLL_SECS))
done

unzip -o -q "$ARCHIVE" -d "$INSTALL_DIR" || fail "extract: unzip could not extract $ARCHIVE"

for entry in "${MANIFEST[@]}"; do
    [ -e "$INSTALL_DIR/$entry" ] || fail "verify: missing $entry after extraction"
done

rm -f -- "$ARCHIVE"
chmod +x "$EXECUTABLE" 2> /dev/null
nohup "$EXECUTABLE" > /dev/null 2>&1 &
rm -f -- "$0"
exit 0
"#;

const BATCH_TEMPLATE: &str = r#"@echo off
rem Generated by LocresStudio. Waits for the editor to exit, installs the
rem downloaded release over the install directory and restarts the editor.
setlocal
set "PID={{ pid }}"
set "ARCHIVE={{ archive }}"
set "INSTALL_DIR={{ install_dir }}"
set "EXECUTABLE={{ executable }}"
set "REPORT={{ report }}"
set /a WAITED=0

:wait
tasklist /fi "PID eq %PID%" 2>nul | find "%PID%" >nul
if errorlevel 1 goto install
if {{ timeout_secs }} GTR 0 if %WAITED% GEQ {{ timeout_secs }} (
    set "REASON=timeout: process %PID% was still running after {{ timeout_secs }} seconds; the update was not installed"
    goto fail
)
ping -n {{ ping_count }} 127.0.0.1 >nul
set /a WAITED+={{ poll_secs }}
goto wait

:install
powershell -NoProfile -NonInteractive -Command "Expand-Archive -LiteralPath '{{ archive_ps }}' -DestinationPath '{{ install_dir_ps }}' -Force"
if errorlevel 1 (
    set "REASON=extract: Expand-Archive could not extract %ARCHIVE%"
    goto fail
)
{% for file in manifest -%}
if not exist "%INSTALL_DIR%\{{ file }}" (
    set "REASON=verify: missing {{ file }} after extraction"
    goto fail
)
{% endfor -%}
del "%ARCHIVE%"
start "" "%EXECUTABLE%"
(goto) 2>nul & del "%~f0"
exit /b 0

:fail
setlocal EnableDelayedExpansion
>"!REPORT!" echo(!REASON!
endlocal
(goto) 2>nul & del "%~f0"
exit /b 1
"#;

/// Which script language the watchdog is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    Batch,
    Shell,
}

impl ScriptFlavor {
    pub fn for_os(os: OsToken) -> Self {
        match os {
            OsToken::Windows => Self::Batch,
            OsToken::Linux => Self::Shell,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Batch => "bat",
            Self::Shell => "sh",
        }
    }

    /// External programs the script needs on `PATH`.
    pub fn required_tools(self) -> &'static [&'static str] {
        match self {
            Self::Batch => &["cmd", "powershell"],
            Self::Shell => &["bash", "unzip"],
        }
    }
}

/// Everything the watchdog needs to take over.
#[derive(Debug, Clone)]
pub struct HandoffRequest {
    /// Process the watchdog waits on before touching any file.
    pub pid: u32,
    pub executable: PathBuf,
    pub install_dir: PathBuf,
    pub archive: PathBuf,
    pub manifest: ArchiveManifest,
    pub report_file: PathBuf,
    pub poll_interval: Duration,
    /// Give up waiting after this long; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl HandoffRequest {
    fn poll_secs(&self) -> u64 {
        self.poll_interval.as_secs().max(1)
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout.map_or(0, |t| t.as_secs().max(1))
    }
}

/// A rendered watchdog script.
#[derive(Debug, Clone)]
pub struct WatchdogScript {
    flavor: ScriptFlavor,
    pid: u32,
    contents: String,
}

impl WatchdogScript {
    pub fn render(flavor: ScriptFlavor, request: &HandoffRequest) -> Result<Self, UpdateError> {
        let mut context = Context::new();
        context.insert("pid", &request.pid);
        context.insert("poll_secs", &request.poll_secs());
        // ping waits about a second between echoes and needs no console.
        context.insert("ping_count", &(request.poll_secs() + 1));
        context.insert("timeout_secs", &request.timeout_secs());

        let template = match flavor {
            ScriptFlavor::Shell => {
                context.insert("archive", &shell_quote_path(&request.archive));
                context.insert("install_dir", &shell_quote_path(&request.install_dir));
                context.insert("executable", &shell_quote_path(&request.executable));
                context.insert("report", &shell_quote_path(&request.report_file));
                let manifest: Vec<String> =
                    request.manifest.files().iter().map(|f| shell_quote(f)).collect();
                context.insert("manifest", &manifest);
                SHELL_TEMPLATE
            }
            ScriptFlavor::Batch => {
                context.insert("archive", &batch_escape_path(&request.archive));
                context.insert("install_dir", &batch_escape_path(&request.install_dir));
                context.insert("executable", &batch_escape_path(&request.executable));
                context.insert("report", &batch_escape_path(&request.report_file));
                context.insert("archive_ps", &powershell_quote_path(&request.archive));
                context.insert("install_dir_ps", &powershell_quote_path(&request.install_dir));
                let manifest: Vec<String> =
                    request.manifest.windows_paths().iter().map(|f| batch_escape(f)).collect();
                context.insert("manifest", &manifest);
                BATCH_TEMPLATE
            }
        };

        let mut tera = Tera::default();
        let rendered = tera.render_str(template, &context)?;
        let contents = match flavor {
            ScriptFlavor::Batch => rendered.replace('\n', "\r\n"),
            ScriptFlavor::Shell => rendered,
        };

        Ok(Self {
            flavor,
            pid: request.pid,
            contents,
        })
    }

    pub fn flavor(&self) -> ScriptFlavor {
        self.flavor
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// `locres-studio-update-{pid}.{bat,sh}`.
    pub fn file_name(&self) -> String {
        format!("{WATCHDOG_SCRIPT_NAME}-{}.{}", self.pid, self.flavor.extension())
    }

    /// Write the script into `dir`, executable on Unix.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, UpdateError> {
        fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.contents).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).await?;
        }

        debug!("Wrote watchdog script to {}", path.display());
        Ok(path)
    }
}

/// Transfers control to whatever installs the update.
pub trait ProcessHandoff {
    /// Start the installer for `request`.
    ///
    /// The production implementation terminates this process on success, so
    /// an `Ok` return is only observed from test doubles.
    fn hand_off(&self, request: &HandoffRequest) -> impl Future<Output = Result<(), UpdateError>>;
}

/// [`ProcessHandoff`] that spawns a detached watchdog script and exits.
pub struct WatchdogLauncher {
    flavor: ScriptFlavor,
    script_dir: PathBuf,
}

impl WatchdogLauncher {
    pub fn new(flavor: ScriptFlavor, script_dir: impl Into<PathBuf>) -> Self {
        Self {
            flavor,
            script_dir: script_dir.into(),
        }
    }

    /// Fail with [`UpdateError::MissingTool`] unless every tool the script
    /// runs is on `PATH`.
    pub fn preflight(&self) -> Result<(), UpdateError> {
        for tool in self.flavor.required_tools() {
            if which::which(tool).is_err() {
                return Err(UpdateError::MissingTool {
                    tool: (*tool).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Write and start the watchdog without exiting. Returns the script path.
    pub async fn launch(&self, request: &HandoffRequest) -> Result<PathBuf, UpdateError> {
        self.preflight()?;

        if let Some(report_dir) = request.report_file.parent() {
            fs::create_dir_all(report_dir).await?;
        }

        let script = WatchdogScript::render(self.flavor, request)?;
        let path = script.write_to(&self.script_dir).await?;

        let mut command = self.command(&path);
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        detach(&mut command);
        command.spawn().map_err(|e| UpdateError::LaunchFailed {
            reason: format!("{}: {e}", path.display()),
        })?;

        info!("Watchdog started for process {}", request.pid);
        Ok(path)
    }

    fn command(&self, script: &Path) -> Command {
        match self.flavor {
            ScriptFlavor::Shell => {
                let mut command = Command::new("bash");
                command.arg(script);
                command
            }
            ScriptFlavor::Batch => batch_command(script),
        }
    }
}

impl ProcessHandoff for WatchdogLauncher {
    async fn hand_off(&self, request: &HandoffRequest) -> Result<(), UpdateError> {
        self.launch(request).await?;
        info!("Exiting so the update can be installed");
        std::process::exit(0)
    }
}

#[cfg(windows)]
fn batch_command(script: &Path) -> Command {
    use std::os::windows::process::CommandExt;
    let mut command = Command::new("cmd");
    command.raw_arg(format!("/d /c \"\"{}\"\"", script.display()));
    command
}

#[cfg(not(windows))]
fn batch_command(script: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/d").arg("/c").arg(script);
    command
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}

/// Single-quote a value for bash.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn shell_quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Escape a value for use inside a quoted batch `set` or `if exist`.
pub fn batch_escape(value: &str) -> String {
    value.replace('%', "%%")
}

fn batch_escape_path(path: &Path) -> String {
    batch_escape(&path.to_string_lossy())
}

/// Body of a PowerShell single-quoted string.
fn powershell_quote_path(path: &Path) -> String {
    batch_escape(&path.to_string_lossy().replace('\'', "''"))
}
