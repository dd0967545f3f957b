//! Terminal styling.
//!
//! Every line the terminal UI prints is one of a handful of tones; the theme
//! maps a tone to a glyph and, when colors are on, a `console` style.

use console::Style;

/// The kinds of line the UI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Skipped,
    Header,
}

impl Tone {
    fn glyph(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Error => "✗",
            Tone::Skipped => "○",
            Tone::Header => "▣",
        }
    }

    fn style(self) -> Style {
        match self {
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red().bold(),
            Tone::Skipped => Style::new().dim(),
            Tone::Header => Style::new().cyan().bold(),
        }
    }
}

/// Glyphs and optional colors for terminal output.
#[derive(Debug, Clone, Default)]
pub struct KioskTheme {
    colored: bool,
}

impl KioskTheme {
    /// Colored theme.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Glyphs only (non-TTY, `NO_COLOR` or `--no-color`).
    pub fn plain() -> Self {
        Self { colored: false }
    }

    pub fn for_colors(colors: bool) -> Self {
        Self { colored: colors }
    }

    /// Theme for stdout as it is right now.
    pub fn detect() -> Self {
        Self::for_colors(should_use_colors() && console::colors_enabled())
    }

    fn paint(&self, style: Style, text: String) -> String {
        if self.colored {
            style.apply_to(text).to_string()
        } else {
            text
        }
    }

    /// `msg` prefixed with the tone's glyph.
    pub fn format(&self, tone: Tone, msg: &str) -> String {
        self.paint(tone.style(), format!("{} {}", tone.glyph(), msg))
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.format(Tone::Success, msg)
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.format(Tone::Warning, msg)
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.format(Tone::Error, msg)
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        self.format(Tone::Skipped, msg)
    }

    pub fn format_header(&self, title: &str) -> String {
        self.format(Tone::Header, title)
    }

    /// Secondary text such as durations and hints.
    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text.to_string())
    }

    /// A step title with its counter, e.g. `[3/13] compositor`.
    pub fn format_step(&self, current: usize, total: usize, title: &str) -> String {
        format!(
            "{} {}",
            self.dim(&format!("[{}/{}]", current, total)),
            self.paint(Style::new().bold(), title.to_string())
        )
    }
}

/// Whether stdout should get colors at all.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}
