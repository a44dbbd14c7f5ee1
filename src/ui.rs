// UI layer: terminal prompts and styling built on `dialoguer`, `indicatif`
// and `crossterm`. Nothing here talks to the panel; the command handlers
// call into these helpers around their panel calls.

use std::io;
use std::time::Duration;

use crossterm::style::Stylize;
use dialoguer::{Password, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::PanelError;
use crate::select::Chooser;

/// `Chooser` backed by an interactive `dialoguer::Select`.
///
/// Arrow keys and Enter pick an entry. Esc/`q` and Ctrl-C both count as a
/// cancellation.
#[derive(Debug, Default)]
pub struct TerminalChooser;

impl Chooser for TerminalChooser {
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, PanelError> {
        let picked = Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt();
        match picked {
            Ok(picked) => Ok(picked),
            // The terminal backend reports Ctrl-C in raw mode as Interrupted.
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(PanelError::Prompt(e)),
        }
    }
}

/// Ask for the API key with hidden input.
pub fn prompt_api_key() -> Result<String, PanelError> {
    match Password::new().with_prompt("API Key").interact() {
        Ok(key) => Ok(key),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(PanelError::SelectionCancelled),
        Err(e) => Err(PanelError::Prompt(e)),
    }
}

/// Run `f` while a spinner with `message` is shown on stderr. The spinner
/// draws nothing when stderr is not a terminal.
pub fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// Red, bold: a handled failure.
pub fn failure(message: &str) -> String {
    message.red().bold().to_string()
}

/// Green, bold: the command did what was asked.
pub fn success(message: &str) -> String {
    message.green().bold().to_string()
}

/// Bold report line.
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{label:<26}{value}").bold().to_string()
}
