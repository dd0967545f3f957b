//! Capability probing with graceful fallback.
//!
//! Each probe walks an ordered candidate list and returns the first viable
//! choice as a [`Resolved`] value. No probe fails the run: package and
//! binary probes fall back to a best guess with a warning, and the EDID
//! probe falls back to a fixed list of common display modes.

pub mod binary;
pub mod capability;
pub mod edid;
pub mod package;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::KioskConfig;
use crate::environment::EnvironmentFacts;

pub use binary::{is_executable, probe_binary, resolve_tool_path, BinaryCandidates};
pub use capability::{first_viable, Resolved};
pub use edid::{parse_modes, probe_modes, EdidDecoder, ExternalDecoder, FALLBACK_MODES};
pub use package::{probe_package, AptCache, PackageIndex};

/// Every probe result for one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    pub browser_package: Resolved<String>,
    pub browser_binary: Resolved<PathBuf>,
    pub display_modes: Resolved<Vec<String>>,
}

impl CapabilityReport {
    /// Warnings from every probe that fell back.
    pub fn warnings(&self) -> Vec<&str> {
        [
            self.browser_package.warning(),
            self.browser_binary.warning(),
            self.display_modes.warning(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Locate the browser binary described by `config`.
pub fn probe_browser_binary(config: &KioskConfig, facts: &EnvironmentFacts) -> Resolved<PathBuf> {
    let candidates = BinaryCandidates {
        commands: &config.browser.commands,
        paths: &config.browser.paths,
        default: &config.browser.default_path,
    };
    probe_binary(&candidates, &facts.path_entries)
}

/// Run every probe.
pub fn probe_all(
    config: &KioskConfig,
    facts: &EnvironmentFacts,
    index: &dyn PackageIndex,
    decoder: &dyn EdidDecoder,
) -> CapabilityReport {
    CapabilityReport {
        browser_package: probe_package(index, &config.packages.browser),
        browser_binary: probe_browser_binary(config, facts),
        display_modes: probe_modes(&config.paths.edid, decoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use tempfile::TempDir;

    struct EmptyIndex;

    impl PackageIndex for EmptyIndex {
        fn has_package(&self, _name: &str) -> bool {
            false
        }
    }

    struct NoDecoder;

    impl EdidDecoder for NoDecoder {
        fn decode(&self, _raw: &[u8]) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn bare_machine_reports_three_fallbacks() {
        let temp = TempDir::new().unwrap();
        let mut config = KioskConfig::default();
        config.browser.paths = vec![temp.path().join("chromium")];
        config.paths.edid = vec![temp.path().join("edid")];
        let facts = EnvironmentFacts::new("pi", temp.path().to_path_buf())
            .with_path_entries(vec![temp.path().to_path_buf()]);

        let report = probe_all(&config, &facts, &EmptyIndex, &NoDecoder);

        assert_eq!(report.warnings().len(), 3);
        assert_eq!(
            report.browser_package.value().map(String::as_str),
            Some("chromium")
        );
        assert_eq!(
            report.browser_binary.value(),
            Some(&config.browser.default_path)
        );
        assert_eq!(
            report.display_modes.value().and_then(|m| m.first()).map(String::as_str),
            Some("1920x1080@60")
        );
    }
}
