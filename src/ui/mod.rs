//! Presentation layer.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for headless provisioning (defaults, config answers,
//!   `KIOSK_PROMPT_<KEY>` environment overrides)
//! - [`MockUI`] for tests
//! - Prompts, spinners and the [`ProgressSystem`] decorator
//!
//! The provisioning engine never talks to the terminal. Steps describe their
//! questions as [`Prompt`] data and receive resolved answers.
//!
//! # Example
//!
//! ```
//! use kiosk_setup::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("kiosk-setup");
//! ui.success("Provisioning complete");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus, UiEvent};
pub use non_interactive::{prompt_overrides, NonInteractiveUI, PROMPT_ENV_PREFIX};
pub use output::OutputMode;
pub use progress::{format_duration, ProgressSystem};
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, KioskTheme, Tone};

use std::time::Duration;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Announce a step with its position (e.g., "[3/13] compositor").
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// A question to put to the user, as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Unique key for the prompt (used for answers and overrides).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// A yes/no question.
    pub fn confirm(key: impl Into<String>, question: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        }
    }

    /// A free-text question.
    pub fn input(
        key: impl Into<String>,
        question: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            prompt_type: PromptType::Input,
            default: Some(default.into()),
        }
    }

    /// A pick-one question; the default is the first option.
    pub fn select(key: impl Into<String>, question: impl Into<String>, values: &[String]) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            default: values.first().cloned(),
            prompt_type: PromptType::Select {
                options: values
                    .iter()
                    .map(|v| PromptOption {
                        label: v.clone(),
                        value: v.clone(),
                    })
                    .collect(),
            },
        }
    }

    /// Environment variable that answers this prompt non-interactively.
    ///
    /// `autostart.url` becomes `KIOSK_PROMPT_AUTOSTART_URL`.
    pub fn env_key(&self) -> String {
        let normalized: String = self
            .key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", PROMPT_ENV_PREFIX, normalized)
    }

    /// Convert a textual answer into a result of this prompt's type.
    pub fn parse_answer(&self, answer: &str) -> PromptResult {
        match self.prompt_type {
            PromptType::Confirm => PromptResult::Bool(is_truthy(answer)),
            _ => PromptResult::String(answer.to_string()),
        }
    }
}

/// Accepts the usual spellings of "yes".
pub fn is_truthy(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}

/// The type of prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
}

impl PromptResult {
    /// Get as string, suitable for step parameters.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }
}

/// End-of-run figures shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that ran to completion.
    pub completed: usize,
    /// Steps the user declined.
    pub declined: usize,
    /// Ids of steps that failed.
    pub failed_steps: Vec<String>,
    /// Warnings raised while running.
    pub warnings: usize,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl RunSummary {
    /// Whether every accepted step completed.
    pub fn success(&self) -> bool {
        self.failed_steps.is_empty()
    }

    /// One-line status, e.g. `completed with 1 failure`.
    pub fn status_line(&self) -> String {
        match self.failed_steps.len() {
            0 => "completed".to_string(),
            1 => "completed with 1 failure".to_string(),
            n => format!("completed with {} failures", n),
        }
    }
}
