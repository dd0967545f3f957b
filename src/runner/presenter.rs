//! [`Presenter`] backed by a [`UserInterface`].

use std::collections::HashMap;

use super::sequencer::{Presenter, RunProgress, StepStatus};
use crate::error::Result;
use crate::ui::{is_truthy, Prompt, PromptResult, UserInterface};

/// Asks the user through a [`UserInterface`] and reports progress to it.
///
/// Pre-seeded answers replace a prompt's built-in default, so they are what
/// the user sees preselected, what `--yes` takes and what a non-interactive
/// run falls back to after its environment overrides. Under `--yes` the
/// environment overrides still win over the default.
pub struct UiPresenter<'u> {
    ui: &'u mut dyn UserInterface,
    assume_yes: bool,
    answers: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl<'u> UiPresenter<'u> {
    pub fn new(ui: &'u mut dyn UserInterface) -> Self {
        Self {
            ui,
            assume_yes: false,
            answers: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Take every prompt's default without asking.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Answers keyed by prompt key.
    pub fn with_answers(mut self, answers: HashMap<String, String>) -> Self {
        self.answers = answers;
        self
    }

    /// `KIOSK_PROMPT_<KEY>` values consulted before defaults under `--yes`.
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    fn ask(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let seeded;
        let prompt = match self.answers.get(&prompt.key) {
            Some(answer) => {
                seeded = Prompt {
                    default: Some(answer.clone()),
                    ..prompt.clone()
                };
                &seeded
            }
            None => prompt,
        };

        if self.assume_yes {
            let answer = self
                .overrides
                .get(&prompt.env_key())
                .or(prompt.default.as_ref());
            if let Some(answer) = answer {
                return Ok(prompt.parse_answer(answer));
            }
        }
        self.ui.prompt(prompt)
    }
}

impl Presenter for UiPresenter<'_> {
    fn confirm(&mut self, gate: &Prompt) -> Result<bool> {
        Ok(match self.ask(gate)? {
            PromptResult::Bool(accepted) => accepted,
            PromptResult::String(answer) => is_truthy(&answer),
        })
    }

    fn answer(&mut self, prompt: &Prompt) -> Result<String> {
        Ok(self.ask(prompt)?.as_string())
    }

    fn progress(&mut self, event: RunProgress<'_>) {
        match event {
            RunProgress::StepStarting {
                title,
                index,
                total,
            } => self.ui.show_step(index, total, title),
            RunProgress::StepRunning { .. } => {}
            RunProgress::StepFinished { record } => match record.status {
                StepStatus::Completed => {
                    if let Some(report) = &record.report {
                        for warning in &report.warnings {
                            self.ui.warning(warning);
                        }
                        if self.ui.output_mode().shows_details() {
                            for change in &report.changes {
                                self.ui.message(&format!(
                                    "  {}: {}",
                                    change.path.display(),
                                    change.outcome
                                ));
                            }
                        }
                        for note in &report.notes {
                            self.ui.message(&format!("  {}", note));
                        }
                    }
                    self.ui.success(record.title);
                }
                StepStatus::Failed => {
                    let error = record.error.as_deref().unwrap_or("unknown error");
                    self.ui.error(&format!("{} failed: {}", record.title, error));
                }
                StepStatus::Declined => {
                    if self.ui.output_mode().shows_details() {
                        self.ui.message(&format!("Skipped {}", record.title));
                    }
                }
                StepStatus::Pending | StepStatus::Running => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};

    #[test]
    fn confirm_uses_scripted_answer() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("splash", "no");
        let mut presenter = UiPresenter::new(&mut ui);

        let gate = Prompt::confirm("splash", "Splash?", true);
        assert!(!presenter.confirm(&gate).unwrap());
    }

    #[test]
    fn assume_yes_takes_defaults_without_prompting() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("reboot", "yes");
        {
            let mut presenter = UiPresenter::new(&mut ui).assume_yes(true);
            let gate = Prompt::confirm("reboot", "Reboot?", false);
            assert!(!presenter.confirm(&gate).unwrap());

            let url = Prompt::input("autostart.url", "URL", "https://example.com");
            assert_eq!(presenter.answer(&url).unwrap(), "https://example.com");
        }
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn seeded_answer_replaces_default() {
        let mut ui = MockUI::new();
        let answers: HashMap<String, String> =
            [("autostart.url".to_string(), "https://board.local".to_string())]
                .into_iter()
                .collect();
        let mut presenter = UiPresenter::new(&mut ui)
            .assume_yes(true)
            .with_answers(answers);

        let url = Prompt::input("autostart.url", "URL", "https://example.com");
        assert_eq!(presenter.answer(&url).unwrap(), "https://board.local");
    }

    #[test]
    fn assume_yes_still_honors_environment_overrides() {
        let mut ui = MockUI::new();
        let answers: HashMap<String, String> =
            [("autostart.url".to_string(), "https://board.local".to_string())]
                .into_iter()
                .collect();
        let overrides: HashMap<String, String> = [
            ("KIOSK_PROMPT_AUTOSTART_URL".to_string(), "https://env.local".to_string()),
            ("KIOSK_PROMPT_REBOOT".to_string(), "yes".to_string()),
        ]
        .into_iter()
        .collect();
        {
            let mut presenter = UiPresenter::new(&mut ui)
                .assume_yes(true)
                .with_answers(answers)
                .with_overrides(overrides);

            let url = Prompt::input("autostart.url", "URL", "https://example.com");
            assert_eq!(presenter.answer(&url).unwrap(), "https://env.local");
            assert!(presenter
                .confirm(&Prompt::confirm("reboot", "Reboot?", false))
                .unwrap());
        }
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn scripted_answer_wins_over_seeded_default() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("reboot", "yes");
        let answers: HashMap<String, String> =
            [("reboot".to_string(), "no".to_string())].into_iter().collect();
        let mut presenter = UiPresenter::new(&mut ui).with_answers(answers);

        assert!(presenter
            .confirm(&Prompt::confirm("reboot", "Reboot?", false))
            .unwrap());
    }

    #[test]
    fn starting_event_shows_step_counter() {
        let mut ui = MockUI::with_mode(OutputMode::Normal);
        {
            let mut presenter = UiPresenter::new(&mut ui);
            presenter.progress(RunProgress::StepStarting {
                title: "Install browser",
                index: 4,
                total: 13,
            });
        }
        assert_eq!(ui.steps(), &[(4, 13, "Install browser".to_string())]);
    }
}
