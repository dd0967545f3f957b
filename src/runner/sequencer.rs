//! The provisioning sequencer.
//!
//! Steps run strictly one after another. Every step is gated by a decision
//! from the [`Presenter`]; an accepted step that fails is recorded and the
//! sequence moves on. Only a presenter error (for example an interrupted
//! prompt) stops the run early.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{KioskError, Result};
use crate::steps::{ProvisioningStep, StepContext, StepParams, StepReport};
use crate::ui::{Prompt, RunSummary};

/// Lifecycle of one step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Declined,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    /// Whether the step reached a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Declined | Self::Completed | Self::Failed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Declined => "declined",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// What happened to one step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub id: &'static str,
    pub title: &'static str,
    pub status: StepStatus,
    /// Present once the step completed.
    pub report: Option<StepReport>,
    /// Present once the step failed.
    pub error: Option<String>,
    pub duration: Duration,
}

impl StepRecord {
    fn pending(step: &dyn ProvisioningStep) -> Self {
        Self {
            id: step.id(),
            title: step.title(),
            status: StepStatus::Pending,
            report: None,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Warnings raised by a completed step.
    pub fn warnings(&self) -> &[String] {
        self.report
            .as_ref()
            .map(|r| r.warnings.as_slice())
            .unwrap_or(&[])
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<StepRecord>,
    pub duration: Duration,
}

impl RunReport {
    pub fn record(&self, id: &str) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Ids of failed steps, in run order.
    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.records
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .map(|r| r.id)
            .collect()
    }

    pub fn success(&self) -> bool {
        self.count(StepStatus::Failed) == 0
    }

    /// 0 when every accepted step completed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            completed: self.count(StepStatus::Completed),
            declined: self.count(StepStatus::Declined),
            failed_steps: self.failed_steps().iter().map(|s| s.to_string()).collect(),
            warnings: self.records.iter().map(|r| r.warnings().len()).sum(),
            duration: self.duration,
        }
    }
}

/// Progress events emitted while the sequence runs.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step is about to be offered to the user.
    StepStarting {
        title: &'a str,
        index: usize,
        total: usize,
    },
    /// An accepted step is about to run.
    StepRunning { id: &'a str },
    /// A step reached a final state.
    StepFinished { record: &'a StepRecord },
}

/// Supplies decisions and observes progress.
///
/// Keeps every interactive concern out of the sequencer.
pub trait Presenter {
    /// Accept or decline a step.
    fn confirm(&mut self, gate: &Prompt) -> Result<bool>;

    /// Answer one sub-parameter prompt.
    fn answer(&mut self, prompt: &Prompt) -> Result<String>;

    fn progress(&mut self, _event: RunProgress<'_>) {}
}

/// Step selection from `--only` / `--skip`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only offer these steps.
    pub only: HashSet<String>,
    /// Never offer these steps.
    pub skip: HashSet<String>,
}

impl RunOptions {
    /// Keep the steps the options select, in their original order.
    ///
    /// Unknown ids are a configuration error so a typo never silently
    /// turns into an empty run.
    pub fn select(
        &self,
        steps: Vec<Box<dyn ProvisioningStep>>,
    ) -> Result<Vec<Box<dyn ProvisioningStep>>> {
        let known: HashSet<&str> = steps.iter().map(|s| s.id()).collect();
        let mut unknown: Vec<&str> = self
            .only
            .iter()
            .chain(self.skip.iter())
            .map(String::as_str)
            .filter(|id| !known.contains(id))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            unknown.dedup();
            return Err(KioskError::ConfigValidationError {
                message: format!("unknown step id(s): {}", unknown.join(", ")),
            });
        }

        Ok(steps
            .into_iter()
            .filter(|s| self.only.is_empty() || self.only.contains(s.id()))
            .filter(|s| !self.skip.contains(s.id()))
            .collect())
    }
}

/// Runs an ordered list of steps against one context.
pub struct Sequencer<'a> {
    steps: Vec<Box<dyn ProvisioningStep>>,
    ctx: StepContext<'a>,
}

impl<'a> Sequencer<'a> {
    pub fn new(steps: Vec<Box<dyn ProvisioningStep>>, ctx: StepContext<'a>) -> Self {
        Self { steps, ctx }
    }

    pub fn steps(&self) -> &[Box<dyn ProvisioningStep>] {
        &self.steps
    }

    /// Run every step once, in order.
    pub fn run(&self, presenter: &mut dyn Presenter) -> Result<RunReport> {
        let start = Instant::now();
        let total = self.steps.len();
        let mut records = Vec::with_capacity(total);

        for (index, step) in self.steps.iter().enumerate() {
            let step = step.as_ref();
            let mut record = StepRecord::pending(step);

            presenter.progress(RunProgress::StepStarting {
                title: record.title,
                index: index + 1,
                total,
            });

            match self.decide(step, presenter)? {
                None => {
                    debug!("Step {} declined", record.id);
                    record.status = StepStatus::Declined;
                }
                Some(params) => {
                    record.status = StepStatus::Running;
                    presenter.progress(RunProgress::StepRunning { id: record.id });
                    info!("Running step {}", record.id);

                    let step_start = Instant::now();
                    let outcome = step.run(&self.ctx, &params);
                    record.duration = step_start.elapsed();

                    match outcome {
                        Ok(report) => {
                            info!(
                                "Step {} completed ({} file(s) written)",
                                record.id,
                                report.files_written()
                            );
                            record.status = StepStatus::Completed;
                            record.report = Some(report);
                        }
                        Err(e) => {
                            warn!("Step {} failed: {}", record.id, e);
                            record.status = StepStatus::Failed;
                            record.error = Some(e.to_string());
                        }
                    }
                }
            }

            presenter.progress(RunProgress::StepFinished { record: &record });
            records.push(record);
        }

        Ok(RunReport {
            records,
            duration: start.elapsed(),
        })
    }

    /// Gate the step, then collect its parameters. `None` means declined.
    fn decide(
        &self,
        step: &dyn ProvisioningStep,
        presenter: &mut dyn Presenter,
    ) -> Result<Option<StepParams>> {
        if !presenter.confirm(&step.gate())? {
            return Ok(None);
        }

        let prefix = format!("{}.", step.id());
        let mut params = StepParams::new();
        for prompt in step.parameters(&self.ctx) {
            let value = presenter.answer(&prompt)?;
            let name = prompt.key.strip_prefix(&prefix).unwrap_or(&prompt.key);
            params.insert(name, value);
        }
        Ok(Some(params))
    }
}
