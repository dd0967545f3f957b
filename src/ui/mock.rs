//! Scripted UI for tests.
//!
//! `MockUI` records everything shown to the operator as a flat list of
//! [`UiEvent`]s and answers prompts from scripted responses, falling back to
//! each prompt's default. Spinners it hands out write into the same log, so a
//! test can assert on the order of steps, spinners and messages.
//!
//! # Example
//!
//! ```
//! use kiosk_setup::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("autostart.url", "https://dashboard.local");
//!
//! let answer = ui
//!     .prompt(&Prompt::input("autostart.url", "URL?", "https://example.com"))
//!     .unwrap();
//! assert_eq!(answer.as_string(), "https://dashboard.local");
//! assert_eq!(ui.prompts_shown(), ["autostart.url"]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, RunSummary, SpinnerHandle, UserInterface};

/// One thing the UI was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Message(String),
    Success(String),
    Warning(String),
    Error(String),
    Header(String),
    Step {
        current: usize,
        total: usize,
        title: String,
    },
    SpinnerStarted(String),
    SpinnerFinished {
        status: SpinnerStatus,
        message: String,
    },
    Prompted(String),
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

type EventLog = Rc<RefCell<Vec<UiEvent>>>;

/// Recording [`UserInterface`] with scripted prompt answers.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    events: EventLog,
    summaries: Vec<RunSummary>,
    responses: HashMap<String, String>,
    queued: HashMap<String, VecDeque<String>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Answer every prompt keyed `key` with `response`.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.responses.insert(key.to_string(), response.to_string());
    }

    /// Answer the next prompts keyed `key` with `responses`, in order.
    ///
    /// Once the queue runs dry the fixed response (or the default) applies.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.queued.insert(
            key.to_string(),
            responses.into_iter().map(str::to_string).collect(),
        );
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    fn collect<F>(&self, pick: F) -> Vec<String>
    where
        F: Fn(&UiEvent) -> Option<&String>,
    {
        self.events.borrow().iter().filter_map(|e| pick(e).cloned()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn successes(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Success(m) => Some(m),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Warning(m) => Some(m),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Error(m) => Some(m),
            _ => None,
        })
    }

    pub fn headers(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Header(m) => Some(m),
            _ => None,
        })
    }

    /// Spinner messages that were started.
    pub fn spinners(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::SpinnerStarted(m) => Some(m),
            _ => None,
        })
    }

    /// Prompt keys in the order they were asked.
    pub fn prompts_shown(&self) -> Vec<String> {
        self.collect(|e| match e {
            UiEvent::Prompted(key) => Some(key),
            _ => None,
        })
    }

    /// Step announcements as (current, total, title).
    pub fn steps(&self) -> Vec<(usize, usize, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Step {
                    current,
                    total,
                    title,
                } => Some((*current, *total, title.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.successes().iter().any(|m| m.contains(needle))
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|m| m.contains(needle))
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.errors().iter().any(|m| m.contains(needle))
    }

    fn record(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }

    fn scripted(&mut self, key: &str) -> Option<String> {
        self.queued
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.responses.get(key).cloned())
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.record(UiEvent::Message(msg.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.record(UiEvent::Success(msg.to_string()));
    }

    fn warning(&mut self, msg: &str) {
        self.record(UiEvent::Warning(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.record(UiEvent::Error(msg.to_string()));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.record(UiEvent::Prompted(prompt.key.clone()));

        let answer = self.scripted(&prompt.key).or_else(|| prompt.default.clone());
        Ok(match (answer, &prompt.prompt_type) {
            (Some(answer), _) => prompt.parse_answer(&answer),
            (None, PromptType::Confirm) => PromptResult::Bool(false),
            (None, _) => PromptResult::String(String::new()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.record(UiEvent::SpinnerStarted(message.to_string()));
        Box::new(MockSpinner {
            events: Rc::clone(&self.events),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.record(UiEvent::Header(title.to_string()));
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        self.record(UiEvent::Step {
            current,
            total,
            title: title.to_string(),
        });
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner that reports its outcome into the owning [`MockUI`]'s log.
#[derive(Debug)]
pub struct MockSpinner {
    events: EventLog,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        self.events.borrow_mut().push(UiEvent::SpinnerFinished {
            status,
            message: msg.to_string(),
        });
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_output_by_kind() {
        let mut ui = MockUI::new();
        ui.message("Probing");
        ui.success("Done");
        ui.warning("Fallback used");
        ui.error("Failed");

        assert!(ui.has_message("Probing"));
        assert!(ui.has_success("Done"));
        assert!(ui.has_warning("Fallback"));
        assert!(ui.has_error("Failed"));
        assert!(!ui.has_message("Done"));
    }

    #[test]
    fn confirm_response_parsed_as_bool() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("splash", "yes");
        let result = ui.prompt(&Prompt::confirm("splash", "Splash?", false)).unwrap();
        assert_eq!(result, PromptResult::Bool(true));
    }

    #[test]
    fn queued_responses_come_first() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("k", "fixed");
        ui.queue_prompt_responses("k", vec!["one", "two"]);
        let prompt = Prompt::input("k", "?", "default");

        let answers: Vec<String> = (0..3).map(|_| ui.prompt(&prompt).unwrap().as_string()).collect();
        assert_eq!(answers, vec!["one", "two", "fixed"]);
    }

    #[test]
    fn falls_back_to_prompt_default() {
        let mut ui = MockUI::new();
        let result = ui.prompt(&Prompt::confirm("upgrade", "Upgrade?", true)).unwrap();
        assert_eq!(result, PromptResult::Bool(true));
    }

    #[test]
    fn spinner_outcome_lands_in_the_log_in_order() {
        let mut ui = MockUI::new();
        ui.show_step(1, 13, "update-index");
        let mut spinner = ui.start_spinner("Updating package index");
        spinner.finish_success("done");

        assert_eq!(ui.steps(), [(1, 13, "update-index".to_string())]);
        assert_eq!(ui.spinners(), ["Updating package index"]);
        assert_eq!(
            ui.events().last(),
            Some(&UiEvent::SpinnerFinished {
                status: SpinnerStatus::Success,
                message: "done".to_string(),
            })
        );
    }
}
