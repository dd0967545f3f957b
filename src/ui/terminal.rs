//! Interactive terminal UI.

use console::Term;

use crate::error::Result;

use super::progress::format_duration;
use super::{
    prompt_user, KioskTheme, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, PromptResult,
    RunSummary, SpinnerHandle, UserInterface,
};

const RERUN_HINT: &str = "Re-running is safe: completed changes are detected and skipped.";

/// Operator-facing UI on a real terminal.
///
/// Prompts go through dialoguer; everything else is written line by line to
/// stdout, filtered by the output mode.
pub struct TerminalUI {
    term: Term,
    theme: KioskTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: KioskTheme::detect(),
            mode,
        }
    }

    /// Write `text` when `visible`. A closed stdout is not worth failing for.
    fn emit(&self, visible: bool, text: &str) {
        if visible {
            let _ = self.term.write_line(text);
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.emit(self.mode.shows_status(), msg);
    }

    fn success(&mut self, msg: &str) {
        self.emit(self.mode.shows_status(), &self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        self.emit(self.mode.shows_warnings(), &self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        self.emit(true, &self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(if self.mode.shows_spinners() {
            ProgressSpinner::new(message, self.theme.clone())
        } else {
            ProgressSpinner::hidden()
        })
    }

    fn show_header(&mut self, title: &str) {
        let header = format!("\n{}\n", self.theme.format_header(title));
        self.emit(self.mode.shows_status(), &header);
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        let step = format!("\n{}", self.theme.format_step(current, total, title));
        self.emit(self.mode.shows_status(), &step);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        let counts = self.theme.dim(&format!(
            "({} completed, {} declined, {})",
            summary.completed,
            summary.declined,
            format_duration(summary.duration)
        ));
        let headline = format!("Provisioning {} {}", summary.status_line(), counts);

        if summary.success() {
            let line = format!("\n{}", self.theme.format_success(&headline));
            self.emit(self.mode.shows_status(), &line);
            return;
        }

        // Failures are always shown, whatever the output mode.
        self.emit(true, &format!("\n{}", self.theme.format_error(&headline)));
        for step in &summary.failed_steps {
            self.emit(true, &format!("    {}", self.theme.dim(step)));
        }
        self.emit(true, &format!("  {}", self.theme.dim(RERUN_HINT)));
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Pick the UI: dialoguer prompts on a TTY, defaults and overrides otherwise.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_request_gets_headless_ui() {
        let ui = create_ui(false, OutputMode::Quiet);
        assert!(!ui.is_interactive());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn terminal_ui_mode_can_change() {
        let mut ui = TerminalUI::new(OutputMode::Normal);
        ui.set_output_mode(OutputMode::Silent);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }
}
