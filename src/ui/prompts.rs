//! Interactive prompts backed by dialoguer.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{KioskError, Result};

use super::{is_truthy, Prompt, PromptOption, PromptResult, PromptType};

fn map_dialoguer_err(e: dialoguer::Error) -> KioskError {
    KioskError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style(String::new()),
        ..ColorfulTheme::default()
    }
}

/// Ask one prompt on `term`.
///
/// Confirm prompts without a default lean towards yes; select prompts
/// preselect the option whose value equals the default.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    let answer = match &prompt.prompt_type {
        PromptType::Confirm => Confirm::with_theme(&theme)
            .with_prompt(&prompt.question)
            .default(prompt.default.as_deref().map_or(true, is_truthy))
            .interact_on(term)
            .map(PromptResult::Bool),
        PromptType::Input => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);
            if let Some(default) = &prompt.default {
                input = input.default(default.clone());
            }
            input.interact_text_on(term).map(PromptResult::String)
        }
        PromptType::Select { options } => return select(&theme, prompt, options, term),
    };
    answer.map_err(map_dialoguer_err)
}

fn select(
    theme: &ColorfulTheme,
    prompt: &Prompt,
    options: &[PromptOption],
    term: &Term,
) -> Result<PromptResult> {
    if options.is_empty() {
        return Err(KioskError::ConfigValidationError {
            message: format!("prompt '{}' has no options", prompt.key),
        });
    }
    let preselected = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| &o.value == d))
        .unwrap_or(0);
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();

    let chosen = Select::with_theme(theme)
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(preselected)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;
    Ok(PromptResult::String(options[chosen].value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_without_options_is_rejected() {
        let prompt = Prompt::select("resolution.mode", "Mode?", &[]);
        let err = prompt_user(&prompt, &Term::stdout()).unwrap_err();
        assert!(err.to_string().contains("resolution.mode"));
    }

    #[test]
    fn dialoguer_io_error_maps_to_io() {
        let err = map_dialoguer_err(dialoguer::Error::IO(std::io::Error::other("closed")));
        assert!(matches!(err, KioskError::Io(_)));
    }
}
