//! Non-interactive UI for headless provisioning.

use std::collections::HashMap;

use crate::error::{KioskError, Result};

use super::progress::format_duration;
use super::{OutputMode, Prompt, PromptResult, RunSummary, SpinnerHandle, UserInterface};

/// Prefix of the environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "KIOSK_PROMPT_";

/// `KIOSK_PROMPT_*` variables from the process environment.
pub fn prompt_overrides() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
        .collect()
}

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `KIOSK_PROMPT_<KEY>` environment variables,
/// falling back to the prompt's default. Config-file answers arrive as
/// prompt defaults, so an environment override beats them too.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI reading overrides from the environment.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            env_overrides: prompt_overrides(),
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_warnings() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(value) = self.env_overrides.get(&prompt.env_key()) {
            return Ok(prompt.parse_answer(value));
        }
        if let Some(default) = &prompt.default {
            return Ok(prompt.parse_answer(default));
        }

        Err(KioskError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value); set {} or answers.{}",
                prompt.key,
                prompt.env_key(),
                prompt.key
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            println!("[{}/{}] {}", current, total, title);
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        let line = format!(
            "Provisioning {} ({} completed, {} declined, {})",
            summary.status_line(),
            summary.completed,
            summary.declined,
            format_duration(summary.duration)
        );
        if summary.success() {
            if self.mode.shows_status() {
                println!("\n✓ {}", line);
            }
        } else {
            eprintln!("\n✗ {}", line);
            eprintln!("  Failed: {}", summary.failed_steps.join(", "));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints spinner outcomes as plain lines.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  ○ {}", msg);
        }
    }
}
