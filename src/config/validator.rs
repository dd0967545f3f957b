//! Configuration validation.
//!
//! Catches configurations that would make a probe or a step meaningless
//! before any step runs.

use crate::config::schema::KioskConfig;
use crate::error::{KioskError, Result};

/// Validate a merged configuration.
pub fn validate(config: &KioskConfig) -> Result<()> {
    let errors = validation_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(KioskError::ConfigValidationError {
            message: errors.join("; "),
        })
    }
}

/// Collect every validation problem instead of stopping at the first.
pub fn validation_errors(config: &KioskConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.packages.browser.is_empty() {
        errors.push("packages.browser must list at least one candidate".to_string());
    }
    if config.browser.commands.is_empty() {
        errors.push("browser.commands must list at least one command name".to_string());
    }
    if config.browser.commands.iter().any(|c| c.contains(char::is_whitespace)) {
        errors.push("browser.commands entries must be bare command names".to_string());
    }
    if config.display.output.trim().is_empty() {
        errors.push("display.output must not be empty".to_string());
    }
    if !config.kiosk.url.contains("://") {
        errors.push(format!(
            "kiosk.url '{}' must include a scheme (e.g. https://)",
            config.kiosk.url
        ));
    }
    if config.kiosk.network_timeout == 0 {
        errors.push("kiosk.network_timeout must be greater than zero".to_string());
    }
    if config.paths.compositor_dir.is_absolute() {
        errors.push("paths.compositor_dir must be relative to the home directory".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&KioskConfig::default()).is_ok());
    }

    #[test]
    fn empty_browser_candidates_rejected() {
        let mut config = KioskConfig::default();
        config.packages.browser.clear();
        let errors = validation_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("packages.browser"));
    }

    #[test]
    fn url_without_scheme_rejected() {
        let mut config = KioskConfig::default();
        config.kiosk.url = "example.com".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn multiple_errors_are_joined() {
        let mut config = KioskConfig::default();
        config.display.output = " ".to_string();
        config.kiosk.network_timeout = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("display.output"));
        assert!(err.contains("network_timeout"));
    }

    #[test]
    fn absolute_compositor_dir_rejected() {
        let mut config = KioskConfig::default();
        config.paths.compositor_dir = "/etc/labwc".into();
        assert!(validate(&config).is_err());
    }
}
