//! Payload templates embedded at compile time.

use include_dir::{include_dir, Dir};

use crate::config::{render, TemplateVars};
use crate::error::{KioskError, Result};

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

pub const GREETD_CONFIG: &str = "greetd-config.toml";
pub const COMPOSITOR_RC: &str = "labwc-rc.xml";
pub const HIDE_CURSOR_KEYBIND: &str = "hide-cursor-keybind.xml";
pub const CEC_KEYMAP: &str = "cec-keymap.toml";
pub const CEC_UNIT: &str = "kiosk-cec.service";
pub const NETWORK_WAIT: &str = "network-wait.sh";

/// Raw contents of an embedded template.
pub fn template(name: &str) -> Result<&'static str> {
    let path = format!("templates/{}", name);
    let file = TEMPLATES_DIR
        .get_file(name)
        .ok_or_else(|| KioskError::ConfigNotFound {
            path: path.clone().into(),
        })?;

    file.contents_utf8()
        .ok_or_else(|| KioskError::ConfigParseError {
            path: path.into(),
            message: "Invalid UTF-8".to_string(),
        })
}

/// Render an embedded template with `vars`.
pub fn render_template(name: &str, vars: &TemplateVars) -> Result<String> {
    render(template(name)?, vars)
}

/// Build template variables from pairs.
pub fn vars<const N: usize>(pairs: [(&str, &str); N]) -> TemplateVars {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Names of every embedded template.
pub fn template_names() -> Vec<String> {
    let mut names: Vec<String> = TEMPLATES_DIR
        .files()
        .filter_map(|f| f.path().file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
