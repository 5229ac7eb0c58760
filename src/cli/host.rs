use colored::Colorize;
use std::cell::Cell;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::upgrade::{Host, ManualChoice, Notification, Severity, UnsavedChoice};

/// [`Host`] for the terminal: dialogs read a line from stdin, notifications
/// are printed.
///
/// There is no real document behind it. `--unsaved` makes it report unsaved
/// changes, and saving always succeeds.
pub struct TerminalHost {
    unsaved: Cell<bool>,
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(unsaved: bool, assume_yes: bool) -> Self {
        Self {
            unsaved: Cell::new(unsaved),
            assume_yes,
        }
    }
}

impl Host for TerminalHost {
    fn has_unsaved_changes(&self) -> bool {
        self.unsaved.get()
    }

    async fn save(&self) -> Result<(), String> {
        self.unsaved.set(false);
        println!("{}", "Document saved".green());
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        let title = match notification.severity {
            Severity::Information => notification.title.cyan().bold(),
            Severity::Success => notification.title.green().bold(),
            Severity::Warning => notification.title.yellow().bold(),
            Severity::Error => notification.title.red().bold(),
        };
        println!("{title}: {}", notification.message);
    }

    async fn prompt_update(&self, version: &str) -> ManualChoice {
        if self.assume_yes {
            return ManualChoice::Update;
        }
        let question = format!("A new version {version} is available. Update now? [y/N] ");
        read_answer(&question).await.map_or(ManualChoice::Cancel, |a| parse_manual_answer(&a))
    }

    async fn prompt_unsaved_changes(&self) -> UnsavedChoice {
        if self.assume_yes {
            return UnsavedChoice::SaveAndUpdate;
        }
        let question = "You have unsaved changes. Save before updating?\n  \
                        [s] Save & Update  [a] Update Anyway  [c] Cancel: ";
        read_answer(question).await.map_or(UnsavedChoice::Cancel, |a| parse_unsaved_answer(&a))
    }
}

/// Anything but an explicit yes cancels.
pub fn parse_manual_answer(answer: &str) -> ManualChoice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "u" | "update" => ManualChoice::Update,
        _ => ManualChoice::Cancel,
    }
}

pub fn parse_unsaved_answer(answer: &str) -> UnsavedChoice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "s" | "save" => UnsavedChoice::SaveAndUpdate,
        "a" | "anyway" => UnsavedChoice::UpdateAnyway,
        _ => UnsavedChoice::Cancel,
    }
}

/// `None` on EOF or a read error.
async fn read_answer(question: &str) -> Option<String> {
    print!("{question}");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}
