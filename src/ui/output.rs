//! Output verbosity.
//!
//! The mode type is shared with the config schema (`settings.default_output`).

use std::str::FromStr;

pub use crate::config::OutputMode;

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows per-directive detail.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal | Self::Quiet)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows warnings.
    pub fn shows_warnings(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("QUIET".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("loud".parse::<OutputMode>().is_err());
    }

    #[test]
    fn quiet_keeps_spinners_and_warnings() {
        assert!(OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Quiet.shows_warnings());
        assert!(!OutputMode::Quiet.shows_status());
    }

    #[test]
    fn silent_shows_nothing() {
        let mode = OutputMode::Silent;
        assert!(!mode.shows_spinners());
        assert!(!mode.shows_status());
        assert!(!mode.shows_warnings());
        assert!(!mode.shows_details());
    }
}
