//! The kiosk step catalog.
//!
//! Steps run in the order [`catalog`] returns them. Each one only talks to
//! the machine through its [`StepContext`], so the whole catalog runs
//! against temporary directories and a recording system runner in tests.

use std::path::Path;

use super::payload::{
    render_template, template, vars, CEC_KEYMAP, CEC_UNIT, COMPOSITOR_RC, GREETD_CONFIG,
    HIDE_CURSOR_KEYBIND, NETWORK_WAIT,
};
use super::{ProvisioningStep, StepContext, StepParams, StepReport};
use crate::config::KioskConfig;
use crate::directive::Directive;
use crate::error::{KioskError, Result};
use crate::probe::{probe_browser_binary, probe_modes, probe_package, FALLBACK_MODES};
use crate::shell::shell_quote;
use crate::system::SystemTask;
use crate::ui::Prompt;

const AUTOSTART: &str = "autostart";
const ENVIRONMENT: &str = "environment";
const RC_XML: &str = "rc.xml";

const SESSION_COMMAND: &str = "labwc";
const DISPLAY_MANAGER_SERVICE: &str = "greetd";
const GRAPHICAL_TARGET: &str = "graphical.target";

const SPLASH_TOKENS: &[&str] = &["quiet", "splash", "plymouth.ignore-serial-consoles"];
const KEYBOARD_ANCHOR: &str = "</keyboard>";
const HIDE_CURSOR_MARKER: &str = r#"name="HideCursor""#;
const HIDE_CURSOR_TRIGGER: &str = "wtype -M logo -k h -m logo &";

/// Every step, in execution order.
pub fn catalog() -> Vec<Box<dyn ProvisioningStep>> {
    vec![
        Box::new(UpdateIndex),
        Box::new(Upgrade),
        Box::new(Compositor),
        Box::new(Browser),
        Box::new(DisplayManager),
        Box::new(Autostart),
        Box::new(KeyboardLayout),
        Box::new(Splash),
        Box::new(Resolution),
        Box::new(HideCursor),
        Box::new(HdmiCec),
        Box::new(Cleanup),
        Box::new(Reboot),
    ]
}

/// Look up a step by id.
pub fn find_step(id: &str) -> Option<Box<dyn ProvisioningStep>> {
    catalog().into_iter().find(|s| s.id() == id)
}

fn param_key(step: &str, name: &str) -> String {
    format!("{}.{}", step, name)
}

fn step_failed(step: &str, message: impl Into<String>) -> KioskError {
    KioskError::StepFailed {
        step: step.to_string(),
        message: message.into(),
    }
}

/// Host part of a `scheme://host[:port]/path` URL.
pub fn url_host(url: &str) -> Option<&str> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or("")
    } else {
        host_port.split(':').next().unwrap_or("")
    };
    (!host.is_empty()).then_some(host)
}

/// Kernel `video=` mode for a probed `WxH@rate` mode.
///
/// The kernel only takes integer refresh rates, so `59.94` becomes `60`.
pub fn kernel_mode(mode: &str) -> Option<String> {
    let (size, rate) = mode.split_once('@')?;
    let (width, height) = size.split_once('x')?;
    width.parse::<u32>().ok()?;
    height.parse::<u32>().ok()?;
    let rate: f64 = rate.parse().ok()?;
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    Some(format!("{}x{}@{}", width, height, rate.round() as u32))
}

/// The browser launch line for the autostart file.
pub fn launch_command(binary: &Path, flags: &[String], incognito: bool, url: &str) -> String {
    let mut parts = vec![binary.display().to_string(), "--kiosk".to_string()];
    parts.extend(flags.iter().cloned());
    if incognito {
        parts.push("--incognito".to_string());
    }
    parts.push(shell_quote(url));
    parts.push("&".to_string());
    parts.join(" ")
}

/// Every spelling of the launch line that counts as already present.
pub fn launch_markers(config: &KioskConfig, binary: &Path) -> Vec<String> {
    let mut markers: Vec<String> = config
        .browser
        .commands
        .iter()
        .map(|c| format!("{} --kiosk", c))
        .collect();
    let resolved = format!("{} --kiosk", binary.display());
    if !markers.contains(&resolved) {
        markers.push(resolved);
    }
    markers
}

struct UpdateIndex;

impl ProvisioningStep for UpdateIndex {
    fn id(&self) -> &'static str {
        "update-index"
    }

    fn title(&self) -> &'static str {
        "Refresh package index"
    }

    fn question(&self) -> &'static str {
        "Update the package index?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        ctx.run_task(SystemTask::UpdateIndex)?;
        Ok(StepReport::new())
    }
}

struct Upgrade;

impl ProvisioningStep for Upgrade {
    fn id(&self) -> &'static str {
        "upgrade"
    }

    fn title(&self) -> &'static str {
        "Upgrade installed packages"
    }

    fn question(&self) -> &'static str {
        "Upgrade installed packages?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        ctx.run_task(SystemTask::Upgrade)?;
        Ok(StepReport::new())
    }
}

struct Compositor;

impl ProvisioningStep for Compositor {
    fn id(&self) -> &'static str {
        "compositor"
    }

    fn title(&self) -> &'static str {
        "Install Wayland compositor"
    }

    fn question(&self) -> &'static str {
        "Install the Wayland compositor?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        ctx.install(&ctx.config.packages.compositor)?;
        Ok(StepReport::new())
    }
}

struct Browser;

impl ProvisioningStep for Browser {
    fn id(&self) -> &'static str {
        "browser"
    }

    fn title(&self) -> &'static str {
        "Install browser"
    }

    fn question(&self) -> &'static str {
        "Install the browser?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        let mut report = StepReport::new();
        let package = report.resolve(
            "browser package",
            probe_package(ctx.packages, &ctx.config.packages.browser),
        )?;
        ctx.install(std::slice::from_ref(&package))?;
        report.note(format!("installed {}", package));
        Ok(report)
    }
}

struct DisplayManager;

impl ProvisioningStep for DisplayManager {
    fn id(&self) -> &'static str {
        "display-manager"
    }

    fn title(&self) -> &'static str {
        "Configure autologin"
    }

    fn question(&self) -> &'static str {
        "Install greetd and log in to the compositor automatically?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        let mut report = StepReport::new();
        ctx.install(&ctx.config.packages.display_manager)?;

        let contents = render_template(
            GREETD_CONFIG,
            &vars([("session", SESSION_COMMAND), ("user", ctx.facts.user.as_str())]),
        )?;
        let directive = Directive::overwrite(&ctx.config.paths.greetd_config, contents);
        ctx.apply(&mut report, directive)?;

        ctx.run_task(SystemTask::EnableService(DISPLAY_MANAGER_SERVICE.to_string()))?;
        ctx.run_task(SystemTask::SetDefaultTarget(GRAPHICAL_TARGET.to_string()))?;
        Ok(report)
    }
}

struct Autostart;

impl Autostart {
    const ID: &'static str = "autostart";
}

impl ProvisioningStep for Autostart {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn title(&self) -> &'static str {
        "Launch browser on login"
    }

    fn question(&self) -> &'static str {
        "Start the browser in kiosk mode when the compositor starts?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn parameters(&self, ctx: &StepContext<'_>) -> Vec<Prompt> {
        vec![
            Prompt::input(param_key(Self::ID, "url"), "Kiosk URL", &ctx.config.kiosk.url),
            Prompt::confirm(
                param_key(Self::ID, "incognito"),
                "Open the browser in incognito mode?",
                false,
            ),
            Prompt::confirm(
                param_key(Self::ID, "wait-for-network"),
                "Wait for the network before launching?",
                true,
            ),
            Prompt::input(
                param_key(Self::ID, "timeout"),
                "Network wait timeout (seconds)",
                ctx.config.kiosk.network_timeout.to_string(),
            ),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>, params: &StepParams) -> Result<StepReport> {
        let url = params.text(Self::ID, "url")?.trim();
        let host = url_host(url)
            .ok_or_else(|| step_failed(Self::ID, format!("'{}' is not a URL with a scheme", url)))?;

        let mut report = StepReport::new();
        let binary = report.resolve(
            "browser binary",
            probe_browser_binary(ctx.config, ctx.facts),
        )?;
        let launch = launch_command(&binary, &ctx.config.browser.flags, params.flag("incognito"), url);

        let payload = if params.flag("wait-for-network") {
            let timeout: u32 = params.parse(Self::ID, "timeout")?;
            if timeout == 0 {
                return Err(step_failed(Self::ID, "network timeout must be at least 1 second"));
            }
            render_template(
                NETWORK_WAIT,
                &vars([
                    ("timeout", timeout.to_string().as_str()),
                    ("host", shell_quote(host).as_str()),
                    ("launch", launch.as_str()),
                ]),
            )?
        } else {
            launch
        };

        let directive = Directive::line(ctx.compositor_file(AUTOSTART), payload)
            .with_markers(launch_markers(ctx.config, &binary));
        ctx.apply(&mut report, directive)?;
        Ok(report)
    }
}

struct KeyboardLayout;

impl KeyboardLayout {
    const ID: &'static str = "keyboard-layout";
}

impl ProvisioningStep for KeyboardLayout {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn title(&self) -> &'static str {
        "Set keyboard layout"
    }

    fn question(&self) -> &'static str {
        "Set the compositor keyboard layout?"
    }

    fn default_answer(&self) -> bool {
        false
    }

    fn parameters(&self, ctx: &StepContext<'_>) -> Vec<Prompt> {
        vec![Prompt::input(
            param_key(Self::ID, "layout"),
            "Keyboard layout (e.g. us, de, gb)",
            &ctx.config.kiosk.keyboard_layout,
        )]
    }

    fn run(&self, ctx: &StepContext<'_>, params: &StepParams) -> Result<StepReport> {
        let layout = params.text(Self::ID, "layout")?.trim();
        if layout.is_empty() || layout.contains(char::is_whitespace) {
            return Err(step_failed(Self::ID, format!("invalid layout '{}'", layout)));
        }

        let mut report = StepReport::new();
        let directive = Directive::replace_line(
            ctx.compositor_file(ENVIRONMENT),
            r"^\s*XKB_DEFAULT_LAYOUT=",
            format!("XKB_DEFAULT_LAYOUT={}", layout),
        )?;
        ctx.apply(&mut report, directive)?;
        Ok(report)
    }
}

struct Splash;

impl ProvisioningStep for Splash {
    fn id(&self) -> &'static str {
        "splash"
    }

    fn title(&self) -> &'static str {
        "Quiet boot splash"
    }

    fn question(&self) -> &'static str {
        "Show a splash screen instead of boot messages?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        let mut report = StepReport::new();
        ctx.install(&ctx.config.packages.splash)?;

        for token in SPLASH_TOKENS {
            let directive = Directive::token(&ctx.config.paths.boot_cmdline, *token)?;
            ctx.apply(&mut report, directive)?;
        }

        let firmware = Directive::replace_line(
            &ctx.config.paths.firmware_config,
            r"^\s*disable_splash=",
            "disable_splash=1",
        )?;
        ctx.apply(&mut report, firmware)?;
        Ok(report)
    }
}

struct Resolution;

impl Resolution {
    const ID: &'static str = "resolution";
}

impl ProvisioningStep for Resolution {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn title(&self) -> &'static str {
        "Force display resolution"
    }

    fn question(&self) -> &'static str {
        "Force a display resolution?"
    }

    fn default_answer(&self) -> bool {
        false
    }

    fn parameters(&self, ctx: &StepContext<'_>) -> Vec<Prompt> {
        let modes = probe_modes(&ctx.config.paths.edid, ctx.edid);
        let question = if modes.is_found() {
            "Display mode"
        } else {
            "Display mode (EDID unavailable, common modes)"
        };
        let options = modes
            .into_value()
            .unwrap_or_else(|| FALLBACK_MODES.iter().map(|m| m.to_string()).collect());
        vec![Prompt::select(param_key(Self::ID, "mode"), question, &options)]
    }

    fn run(&self, ctx: &StepContext<'_>, params: &StepParams) -> Result<StepReport> {
        let mode = params.text(Self::ID, "mode")?.trim();
        let kernel = kernel_mode(mode)
            .ok_or_else(|| step_failed(Self::ID, format!("'{}' is not a WxH@rate mode", mode)))?;
        let output = &ctx.config.display.output;
        let set_mode = &ctx.config.commands.set_mode;

        let mut report = StepReport::new();
        let cmdline = Directive::replace_token(
            &ctx.config.paths.boot_cmdline,
            &format!("^video={}:", regex::escape(output)),
            format!("video={}:{}", output, kernel),
        )?;
        ctx.apply(&mut report, cmdline)?;

        let autostart = Directive::replace_line(
            ctx.compositor_file(AUTOSTART),
            &format!(
                r"^\s*{}\s+--output\s+{}(\s|$)",
                regex::escape(set_mode),
                regex::escape(output)
            ),
            format!("{} --output {} --mode {}Hz &", set_mode, output, mode),
        )?;
        ctx.apply(&mut report, autostart)?;

        if ctx.facts.wayland_session {
            ctx.run_task(SystemTask::SetDisplayMode {
                output: output.clone(),
                mode: mode.to_string(),
            })?;
        } else {
            report.note(format!("{} takes effect after the next reboot", mode));
        }
        Ok(report)
    }
}

struct HideCursor;

impl ProvisioningStep for HideCursor {
    fn id(&self) -> &'static str {
        "hide-cursor"
    }

    fn title(&self) -> &'static str {
        "Hide mouse cursor"
    }

    fn question(&self) -> &'static str {
        "Hide the mouse cursor after login?"
    }

    fn default_answer(&self) -> bool {
        false
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        let mut report = StepReport::new();
        ctx.install(&ctx.config.packages.cursor)?;

        let keybind = template(HIDE_CURSOR_KEYBIND)?;
        let seeded = render_template(COMPOSITOR_RC, &vars([("keybind", keybind.trim_end())]))?;
        let rc = Directive::markup_insert(ctx.compositor_file(RC_XML), KEYBOARD_ANCHOR, keybind)
            .with_markers([HIDE_CURSOR_MARKER])
            .with_template(seeded);
        ctx.apply(&mut report, rc)?;

        ctx.apply(
            &mut report,
            Directive::line(ctx.compositor_file(AUTOSTART), HIDE_CURSOR_TRIGGER),
        )?;
        Ok(report)
    }
}

struct HdmiCec;

impl HdmiCec {
    const ID: &'static str = "hdmi-cec";
}

impl ProvisioningStep for HdmiCec {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn title(&self) -> &'static str {
        "TV remote control (HDMI-CEC)"
    }

    fn question(&self) -> &'static str {
        "Use the TV remote to control the browser over HDMI-CEC?"
    }

    fn default_answer(&self) -> bool {
        false
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        let paths = &ctx.config.paths;
        let unit = paths
            .cec_unit
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                step_failed(
                    Self::ID,
                    format!("{} does not name a unit file", paths.cec_unit.display()),
                )
            })?;

        let mut report = StepReport::new();
        ctx.install(&ctx.config.packages.cec)?;

        let keymap = Directive::overwrite(&paths.cec_keymap, template(CEC_KEYMAP)?);
        ctx.apply(&mut report, keymap)?;

        let keymap_path = paths.cec_keymap.display().to_string();
        let contents = render_template(CEC_UNIT, &vars([("keymap", keymap_path.as_str())]))?;
        ctx.apply(&mut report, Directive::overwrite(&paths.cec_unit, contents))?;

        ctx.run_task(SystemTask::EnableService(unit))?;
        Ok(report)
    }
}

struct Cleanup;

impl ProvisioningStep for Cleanup {
    fn id(&self) -> &'static str {
        "cleanup"
    }

    fn title(&self) -> &'static str {
        "Clean up packages"
    }

    fn question(&self) -> &'static str {
        "Remove unused packages and clean the package cache?"
    }

    fn default_answer(&self) -> bool {
        true
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        ctx.run_task(SystemTask::Autoremove)?;
        ctx.run_task(SystemTask::CleanCache)?;
        Ok(StepReport::new())
    }
}

struct Reboot;

impl ProvisioningStep for Reboot {
    fn id(&self) -> &'static str {
        "reboot"
    }

    fn title(&self) -> &'static str {
        "Reboot"
    }

    fn question(&self) -> &'static str {
        "Reboot now?"
    }

    fn default_answer(&self) -> bool {
        false
    }

    fn run(&self, ctx: &StepContext<'_>, _params: &StepParams) -> Result<StepReport> {
        ctx.run_task(SystemTask::Reboot)?;
        Ok(StepReport::new())
    }
}
