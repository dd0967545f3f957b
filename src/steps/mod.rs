//! Provisioning steps.
//!
//! A [`ProvisioningStep`] is one optional unit of work. Its user-facing
//! question, default answer and sub-parameters are plain data; its
//! [`run`](ProvisioningStep::run) receives already-resolved parameters and
//! performs probing, directive application and system tasks through the
//! [`StepContext`].

pub mod catalog;
pub mod payload;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::KioskConfig;
use crate::directive::{Applier, ApplyOutcome, Directive};
use crate::environment::EnvironmentFacts;
use crate::error::{KioskError, Result};
use crate::probe::{EdidDecoder, PackageIndex, Resolved};
use crate::system::{SystemRunner, SystemTask};
use crate::ui::{is_truthy, Prompt};

pub use catalog::{catalog, find_step};

/// One user-gated unit of provisioning work.
pub trait ProvisioningStep {
    /// Stable identifier, also the key of the gating prompt.
    fn id(&self) -> &'static str;

    /// Short human-readable title.
    fn title(&self) -> &'static str;

    /// The accept/decline question.
    fn question(&self) -> &'static str;

    /// Answer used when the user just presses enter (or with `--yes`).
    fn default_answer(&self) -> bool;

    /// Sub-parameters asked after the step is accepted.
    ///
    /// Prompt keys are `<step id>.<parameter>`. Implementations may probe the
    /// system to build the options.
    fn parameters(&self, _ctx: &StepContext<'_>) -> Vec<Prompt> {
        Vec::new()
    }

    /// Perform the step.
    fn run(&self, ctx: &StepContext<'_>, params: &StepParams) -> Result<StepReport>;

    /// The gating prompt for this step.
    fn gate(&self) -> Prompt {
        Prompt::confirm(self.id(), self.question(), self.default_answer())
    }
}

/// Everything a step may touch, passed explicitly.
pub struct StepContext<'a> {
    pub facts: &'a EnvironmentFacts,
    pub config: &'a KioskConfig,
    pub applier: Applier<'a>,
    pub system: &'a dyn SystemRunner,
    pub packages: &'a dyn PackageIndex,
    pub edid: &'a dyn EdidDecoder,
}

impl<'a> StepContext<'a> {
    /// Path inside the compositor config directory of the invoking user.
    pub fn compositor_file(&self, name: &str) -> PathBuf {
        self.facts
            .home_path(&self.config.paths.compositor_dir)
            .join(name)
    }

    /// Apply a directive and record its outcome in `report`.
    ///
    /// Targets outside the user's home are written with privileges.
    pub fn apply(&self, report: &mut StepReport, directive: Directive) -> Result<ApplyOutcome> {
        let scope = self.facts.write_scope(directive.target());
        let directive = directive.with_scope(scope);
        let outcome = self.applier.apply(&directive)?;
        report.record(directive.target(), &outcome);
        Ok(outcome)
    }

    /// Run a system task.
    pub fn run_task(&self, task: SystemTask) -> Result<()> {
        self.system.run(&task)
    }

    /// Install packages, skipping the call when the list is empty.
    pub fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        self.run_task(SystemTask::Install(packages.to_vec()))
    }
}

/// Resolved sub-parameter values, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepParams {
    values: BTreeMap<String, String>,
}

impl StepParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Required text parameter.
    pub fn text(&self, step: &str, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| KioskError::StepFailed {
            step: step.to_string(),
            message: format!("missing parameter '{}'", name),
        })
    }

    /// Boolean parameter; absent means false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).map(is_truthy).unwrap_or(false)
    }

    /// Parsed parameter.
    pub fn parse<T: FromStr>(&self, step: &str, name: &str) -> Result<T> {
        let raw = self.text(step, name)?;
        raw.trim().parse().map_err(|_| KioskError::StepFailed {
            step: step.to_string(),
            message: format!("parameter '{}' has invalid value '{}'", name, raw),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A file a step touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub outcome: ApplyOutcome,
}

/// What a completed step did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub changes: Vec<FileChange>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

impl StepReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directive outcome; anchor problems become warnings.
    pub fn record(&mut self, path: &Path, outcome: &ApplyOutcome) {
        if let ApplyOutcome::AnchorMissing { anchor } = outcome {
            self.warnings.push(format!(
                "{}: '{}' not found; left unchanged",
                path.display(),
                anchor
            ));
        }
        self.changes.push(FileChange {
            path: path.to_path_buf(),
            outcome: outcome.clone(),
        });
    }

    /// Surface a probe fallback as a warning and return its value.
    pub fn resolve<T>(&mut self, what: &str, resolved: Resolved<T>) -> Result<T> {
        if let Some(reason) = resolved.warning() {
            self.warnings.push(reason.to_string());
        }
        resolved.into_value().ok_or_else(|| KioskError::ProbeUnresolved {
            what: what.to_string(),
            message: "no candidates configured".to_string(),
        })
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    /// Number of files actually written.
    pub fn files_written(&self) -> usize {
        self.changes.iter().filter(|c| c.outcome.wrote()).count()
    }
}
