//! Progress display around blocking system tasks.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::system::{SystemRunner, SystemTask};

use super::{KioskTheme, OutputMode, ProgressSpinner, SpinnerHandle};

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// Wraps a [`SystemRunner`] with a spinner for long-running tasks.
///
/// The inner call still blocks; the spinner animates on its own ticker
/// thread and has no influence on the result.
pub struct ProgressSystem<R: SystemRunner> {
    inner: R,
    mode: OutputMode,
    theme: KioskTheme,
}

impl<R: SystemRunner> ProgressSystem<R> {
    pub fn new(inner: R, mode: OutputMode, theme: KioskTheme) -> Self {
        Self { inner, mode, theme }
    }

    fn spinner(&self, task: &SystemTask) -> ProgressSpinner {
        if task.is_long_running() && self.mode.shows_spinners() {
            ProgressSpinner::new(&format!("{}...", task), self.theme.clone())
        } else {
            ProgressSpinner::hidden()
        }
    }
}

impl<R: SystemRunner> SystemRunner for ProgressSystem<R> {
    fn run(&self, task: &SystemTask) -> Result<()> {
        let mut spinner = self.spinner(task);
        let start = Instant::now();
        let result = self.inner.run(task);
        let elapsed = format_duration(start.elapsed());

        match &result {
            Ok(()) => spinner.finish_success(&format!("{} ({})", task, elapsed)),
            Err(_) => spinner.finish_error(&format!("{} failed ({})", task, elapsed)),
        }
        result
    }
}
