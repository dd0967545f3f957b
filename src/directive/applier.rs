//! Applies directives through a [`FileWriter`].

use super::model::{ApplyOutcome, Directive};
use super::writer::FileWriter;
use crate::error::Result;

/// Ensures directives are present exactly once in their targets.
///
/// Each application is a self-contained read-modify-write against the
/// target's current contents.
pub struct Applier<'a> {
    writer: &'a dyn FileWriter,
}

impl<'a> Applier<'a> {
    pub fn new(writer: &'a dyn FileWriter) -> Self {
        Self { writer }
    }

    /// Apply one directive.
    ///
    /// A missing anchor is not an error: it comes back as
    /// [`ApplyOutcome::AnchorMissing`] with the file untouched.
    pub fn apply(&self, directive: &Directive) -> Result<ApplyOutcome> {
        let current = self.writer.read(&directive.target)?;
        let plan = directive.plan(current.as_deref());

        if let Some(contents) = &plan.contents {
            self.writer
                .write(&directive.target, contents, directive.scope)?;
        }

        match &plan.outcome {
            ApplyOutcome::AnchorMissing { anchor } => tracing::warn!(
                "Anchor '{}' not found in {}; left unchanged",
                anchor,
                directive.target.display()
            ),
            outcome => tracing::debug!("{}: {}", directive.target.display(), outcome),
        }

        Ok(plan.outcome)
    }

    /// Apply several directives in order, stopping at the first error.
    pub fn apply_all(&self, directives: &[Directive]) -> Result<Vec<ApplyOutcome>> {
        directives.iter().map(|d| self.apply(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::writer::{DryRunWriter, HostWriter};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scenario_empty_autostart() {
        let temp = TempDir::new().unwrap();
        let autostart = temp.path().join("autostart");
        fs::write(&autostart, "").unwrap();

        let writer = HostWriter::direct();
        let applier = Applier::new(&writer);
        let directive = Directive::line(&autostart, "launch-cmd --kiosk URL");

        assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Created);
        assert_eq!(fs::read_to_string(&autostart).unwrap(), "launch-cmd --kiosk URL");

        assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Skipped);
        assert_eq!(fs::read_to_string(&autostart).unwrap(), "launch-cmd --kiosk URL");
    }

    #[test]
    fn missing_anchor_does_not_create_file() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("rc.xml");

        let writer = HostWriter::direct();
        let outcome = Applier::new(&writer)
            .apply(&Directive::markup_insert(&rc, "</keyboard>", "<keybind/>"))
            .unwrap();

        assert!(outcome.is_warning());
        assert!(!rc.exists());
    }

    #[test]
    fn dry_run_layers_directives_on_one_file() {
        let temp = TempDir::new().unwrap();
        let autostart = temp.path().join("autostart");

        let writer = DryRunWriter::new(HostWriter::direct());
        let applier = Applier::new(&writer);
        let outcomes = applier
            .apply_all(&[
                Directive::line(&autostart, "chromium --kiosk https://a"),
                Directive::line(&autostart, "wtype -M logo -k h"),
            ])
            .unwrap();

        assert_eq!(outcomes, vec![ApplyOutcome::Created, ApplyOutcome::Appended]);
        assert!(!autostart.exists());
        assert_eq!(
            writer.staged_contents(&autostart).as_deref(),
            Some("chromium --kiosk https://a\nwtype -M logo -k h")
        );
    }
}
