//! Configuration schema definitions.
//!
//! Every literal path, package name and command line the provisioning steps
//! use lives here, so an OS image with different names only needs a config
//! file, not a rebuild. Every field has a default; an empty file is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure for `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Global settings
    pub settings: Settings,

    /// Target file locations
    pub paths: PathsConfig,

    /// Package lists per step
    pub packages: PackagesConfig,

    /// Browser discovery and launch flags
    pub browser: BrowserConfig,

    /// Display output settings
    pub display: DisplayConfig,

    /// Kiosk launch defaults
    pub kiosk: KioskDefaults,

    /// External command lines
    pub commands: CommandsConfig,

    /// Pre-seeded prompt answers keyed by prompt key
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub answers: HashMap<String, String>,
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,

    /// Command prefix used for writes and commands outside the user's home
    pub elevate: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_output: OutputMode::Normal,
            elevate: vec!["sudo".to_string()],
        }
    }
}

/// Output verbosity mode as written in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// Locations of the files the steps mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Kernel command line (single line of space-separated tokens)
    pub boot_cmdline: PathBuf,

    /// Firmware config (key=value lines)
    pub firmware_config: PathBuf,

    /// greetd configuration
    pub greetd_config: PathBuf,

    /// Compositor configuration directory, relative to the user's home
    pub compositor_dir: PathBuf,

    /// CEC remote keymap
    pub cec_keymap: PathBuf,

    /// systemd unit loading the CEC keymap
    pub cec_unit: PathBuf,

    /// EDID descriptor candidates, in preference order
    pub edid: Vec<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            boot_cmdline: PathBuf::from("/boot/firmware/cmdline.txt"),
            firmware_config: PathBuf::from("/boot/firmware/config.txt"),
            greetd_config: PathBuf::from("/etc/greetd/config.toml"),
            compositor_dir: PathBuf::from(".config/labwc"),
            cec_keymap: PathBuf::from("/etc/rc_keymaps/kiosk-cec.toml"),
            cec_unit: PathBuf::from("/etc/systemd/system/kiosk-cec.service"),
            edid: [
                "/sys/class/drm/card1-HDMI-A-1/edid",
                "/sys/class/drm/card0-HDMI-A-1/edid",
                "/sys/class/drm/card2-HDMI-A-1/edid",
                "/sys/class/drm/card1-HDMI-A-2/edid",
                "/sys/class/drm/card0-HDMI-A-2/edid",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

/// Package names installed by each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Wayland compositor and helpers
    pub compositor: Vec<String>,

    /// Browser package candidates, canonical name first
    pub browser: Vec<String>,

    /// Display manager
    pub display_manager: Vec<String>,

    /// Boot splash
    pub splash: Vec<String>,

    /// Key injection tool used to hide the cursor
    pub cursor: Vec<String>,

    /// HDMI-CEC tooling
    pub cec: Vec<String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            compositor: strings(&["labwc", "wlr-randr", "seatd"]),
            browser: strings(&["chromium", "chromium-browser"]),
            display_manager: strings(&["greetd"]),
            splash: strings(&["plymouth", "plymouth-themes"]),
            cursor: strings(&["wtype"]),
            cec: strings(&["v4l-utils"]),
        }
    }
}

/// Browser discovery and launch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Command names looked up on PATH (all count as the same browser)
    pub commands: Vec<String>,

    /// Absolute paths tried when PATH lookup fails
    pub paths: Vec<PathBuf>,

    /// Best-guess path when nothing is found
    pub default_path: PathBuf,

    /// Flags placed before `--kiosk`
    pub flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            commands: strings(&["chromium", "chromium-browser"]),
            paths: [
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/usr/lib/chromium/chromium",
                "/snap/bin/chromium",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            default_path: PathBuf::from("/usr/bin/chromium"),
            flags: strings(&[
                "--noerrdialogs",
                "--disable-infobars",
                "--no-first-run",
                "--ozone-platform=wayland",
                "--enable-features=OverlayScrollbar",
                "--start-maximized",
            ]),
        }
    }
}

/// Display output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// DRM connector name (e.g. HDMI-A-1)
    pub output: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output: "HDMI-A-1".to_string(),
        }
    }
}

/// Defaults offered when prompting for kiosk launch parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskDefaults {
    /// Page opened in kiosk mode
    pub url: String,

    /// Seconds to wait for the network before launching anyway
    pub network_timeout: u32,

    /// Keyboard layout offered by the keyboard step
    pub keyboard_layout: String,
}

impl Default for KioskDefaults {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            network_timeout: 30,
            keyboard_layout: "us".to_string(),
        }
    }
}

/// External command lines. Package names and arguments are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Refresh the package index (privileged)
    pub update_index: String,

    /// Upgrade installed packages (privileged)
    pub upgrade: String,

    /// Install packages (privileged)
    pub install: String,

    /// Remove unused packages (privileged)
    pub autoremove: String,

    /// Clean the package cache (privileged)
    pub clean: String,

    /// Read-only package existence query
    pub package_query: String,

    /// Enable a service (privileged)
    pub enable_service: String,

    /// Set the default boot target (privileged)
    pub set_default_target: String,

    /// Decode a raw EDID read from stdin
    pub edid_decode: String,

    /// Set the display mode in a running session
    pub set_mode: String,

    /// Reboot the machine (privileged)
    pub reboot: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            update_index: "apt-get update".to_string(),
            upgrade: "apt-get upgrade -y".to_string(),
            install: "apt-get install -y --no-install-recommends".to_string(),
            autoremove: "apt-get autoremove -y".to_string(),
            clean: "apt-get clean".to_string(),
            package_query: "apt-cache show --no-all-versions".to_string(),
            enable_service: "systemctl enable".to_string(),
            set_default_target: "systemctl set-default".to_string(),
            edid_decode: "edid-decode".to_string(),
            set_mode: "wlr-randr".to_string(),
            reboot: "reboot".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: KioskConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, KioskConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let yaml = r#"
packages:
  browser: [chromium-browser]
"#;
        let config: KioskConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.packages.browser, vec!["chromium-browser"]);
        assert_eq!(config.packages.compositor, vec!["labwc", "wlr-randr", "seatd"]);
    }

    #[test]
    fn output_mode_is_lowercase() {
        let yaml = "settings:\n  default_output: quiet\n";
        let config: KioskConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.settings.default_output, OutputMode::Quiet);
    }

    #[test]
    fn canonical_browser_package_comes_first() {
        let config = KioskConfig::default();
        assert_eq!(config.packages.browser[0], "chromium");
    }

    #[test]
    fn answers_are_parsed() {
        let yaml = "answers:\n  autostart.url: https://dashboard.local\n";
        let config: KioskConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.answers.get("autostart.url").map(String::as_str),
            Some("https://dashboard.local")
        );
    }

    #[test]
    fn default_config_serializes_without_answers() {
        let yaml = serde_yaml::to_string(&KioskConfig::default()).unwrap();
        assert!(!yaml.contains("answers"));
        assert!(yaml.contains("boot_cmdline"));
    }
}
