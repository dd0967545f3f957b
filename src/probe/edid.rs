//! Display-mode discovery from the monitor's EDID block.
//!
//! The raw descriptor is read from the first readable DRM connector path and
//! piped through an external decoder (`edid-decode`). Mode lines in its
//! output look like `1920x1080 60.000000 Hz`; integer and fractional rates
//! are both accepted and kept as printed.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::capability::Resolved;
use crate::error::Result;
use crate::shell::{execute, CommandOptions};

/// Modes offered when the EDID cannot be read or yields nothing.
pub const FALLBACK_MODES: &[&str] = &[
    "1920x1080@60",
    "1600x900@60",
    "1280x1024@60",
    "1280x720@60",
    "1024x768@60",
    "800x600@60",
];

static MODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,5})x(\d{3,5})[^\d\r\n]*?(\d+(?:\.\d+)?)\s*Hz")
        .expect("MODE_PATTERN must compile")
});

/// Turns a raw EDID block into decoder text.
pub trait EdidDecoder {
    fn decode(&self, raw: &[u8]) -> Result<String>;
}

/// Runs an external decoder with the raw block on stdin.
#[derive(Debug, Clone)]
pub struct ExternalDecoder {
    command: String,
}

impl ExternalDecoder {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl EdidDecoder for ExternalDecoder {
    fn decode(&self, raw: &[u8]) -> Result<String> {
        let options = CommandOptions::with_stdin(raw);
        // edid-decode exits non-zero on conformity warnings while still
        // printing every mode, so only the output matters here.
        let result = execute(&self.command, &options)?;
        if !result.success {
            tracing::debug!(
                "{} exited with {:?}; parsing its output anyway",
                self.command,
                result.exit_code
            );
        }
        Ok(result.stdout)
    }
}

/// Extract `WxH@rate` modes in output order, without duplicates.
pub fn parse_modes(decoded: &str) -> Vec<String> {
    let mut modes: Vec<String> = Vec::new();
    for line in decoded.lines() {
        for caps in MODE_PATTERN.captures_iter(line) {
            let mode = format!("{}x{}@{}", &caps[1], &caps[2], &caps[3]);
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
    }
    modes
}

fn fallback(reason: String) -> Resolved<Vec<String>> {
    Resolved::Fallback {
        value: FALLBACK_MODES.iter().map(|m| m.to_string()).collect(),
        reason,
    }
}

/// Probe the connected display's supported modes.
///
/// Never fails: an unreadable descriptor, a decoder error or an empty
/// parse all yield [`FALLBACK_MODES`].
pub fn probe_modes(paths: &[PathBuf], decoder: &dyn EdidDecoder) -> Resolved<Vec<String>> {
    let Some((path, raw)) = paths.iter().find_map(|p| match fs::read(p) {
        Ok(bytes) if !bytes.is_empty() => Some((p, bytes)),
        _ => None,
    }) else {
        return fallback("no readable EDID found; offering common modes".to_string());
    };

    tracing::debug!("Reading EDID from {} ({} bytes)", path.display(), raw.len());

    let decoded = match decoder.decode(&raw) {
        Ok(text) => text,
        Err(e) => return fallback(format!("EDID decoder failed: {}", e)),
    };

    let modes = parse_modes(&decoded);
    if modes.is_empty() {
        fallback(format!("EDID at {} listed no modes", path.display()))
    } else {
        Resolved::found(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KioskError;
    use tempfile::TempDir;

    struct FixedDecoder(&'static str);

    impl EdidDecoder for FixedDecoder {
        fn decode(&self, _raw: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingDecoder;

    impl EdidDecoder for FailingDecoder {
        fn decode(&self, _raw: &[u8]) -> Result<String> {
            Err(KioskError::CommandFailed {
                command: "edid-decode".to_string(),
                code: None,
            })
        }
    }

    fn edid_file(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("card1-HDMI-A-1/edid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, [0x00u8, 0xff, 0xff, 0xff]).unwrap();
        path
    }

    #[test]
    fn parses_fractional_and_integer_rates() {
        let modes = parse_modes("  1920x1080 60.00 Hz\n  1280x720 59.94 Hz\n  1024x768 75 Hz\n");
        assert_eq!(modes, vec!["1920x1080@60.00", "1280x720@59.94", "1024x768@75"]);
    }

    #[test]
    fn parses_edid_decode_detail_lines() {
        let text = "    DTD 1:  1920x1080   60.000000 Hz  16:9    67.500 kHz 148.500000 MHz (native)\n\
                    \x20   DMT 0x04:   640x480    59.940476 Hz   4:3    31.469 kHz  25.175000 MHz\n";
        assert_eq!(
            parse_modes(text),
            vec!["1920x1080@60.000000", "640x480@59.940476"]
        );
    }

    #[test]
    fn duplicate_modes_reported_once() {
        let modes = parse_modes("1920x1080 60.00 Hz\nVIC 16: 1920x1080 60.00 Hz\n");
        assert_eq!(modes, vec!["1920x1080@60.00"]);
    }

    #[test]
    fn ignores_lines_without_modes() {
        assert!(parse_modes("Block 0, Base EDID:\n  Manufacturer: DEL\n").is_empty());
    }

    #[test]
    fn scenario_decoded_modes_in_order() {
        let temp = TempDir::new().unwrap();
        let path = edid_file(&temp);
        let decoder = FixedDecoder("1920x1080 60.00 Hz\n1280x720 59.94 Hz\n");

        let resolved = probe_modes(&[path], &decoder);
        assert_eq!(
            resolved,
            Resolved::found(vec!["1920x1080@60.00".to_string(), "1280x720@59.94".to_string()])
        );
    }

    #[test]
    fn first_readable_path_is_used() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("card0-HDMI-A-1/edid");
        fs::create_dir_all(empty.parent().unwrap()).unwrap();
        fs::write(&empty, b"").unwrap();
        let good = edid_file(&temp);

        let resolved = probe_modes(
            &[temp.path().join("missing/edid"), empty, good],
            &FixedDecoder("800x600 60 Hz"),
        );
        assert!(resolved.is_found());
    }

    #[test]
    fn no_readable_edid_falls_back() {
        let temp = TempDir::new().unwrap();
        let resolved = probe_modes(&[temp.path().join("missing")], &FixedDecoder("1920x1080 60 Hz"));

        assert!(resolved.is_fallback());
        assert_eq!(resolved.value().map(Vec::len), Some(FALLBACK_MODES.len()));
    }

    #[test]
    fn empty_decode_falls_back() {
        let temp = TempDir::new().unwrap();
        let resolved = probe_modes(&[edid_file(&temp)], &FixedDecoder("garbage"));
        assert!(resolved.is_fallback());
    }

    #[test]
    fn decoder_failure_falls_back() {
        let temp = TempDir::new().unwrap();
        let resolved = probe_modes(&[edid_file(&temp)], &FailingDecoder);
        assert!(resolved.warning().unwrap().contains("decoder"));
    }

    #[test]
    fn external_decoder_pipes_stdin() {
        let decoded = ExternalDecoder::new("cat").decode(b"1280x720 50 Hz").unwrap();
        assert_eq!(parse_modes(&decoded), vec!["1280x720@50"]);
    }
}
