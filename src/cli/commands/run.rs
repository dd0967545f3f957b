//! Run command implementation.
//!
//! The `kiosk-setup run` command offers every selected step in order and
//! reports how the sequence went.

use crate::cli::args::RunArgs;
use crate::config::{ConfigPaths, KioskConfig};
use crate::directive::{Applier, DryRunWriter, FileWriter, HostWriter};
use crate::environment::EnvironmentFacts;
use crate::error::Result;
use crate::probe::{AptCache, ExternalDecoder};
use crate::runner::{RunOptions, RunReport, Sequencer, UiPresenter};
use crate::steps::{catalog, StepContext};
use crate::system::{DryRunSystem, ShellRunner, SystemRunner};
use crate::ui::{prompt_overrides, KioskTheme, ProgressSystem, UserInterface};

use super::dispatcher::{load_for, Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    config_paths: ConfigPaths,
    args: RunArgs,
    facts: Option<EnvironmentFacts>,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config_paths: ConfigPaths, args: RunArgs) -> Self {
        Self {
            config_paths,
            args,
            facts: None,
        }
    }

    /// Use these facts instead of gathering them from the process.
    pub fn with_facts(mut self, facts: EnvironmentFacts) -> Self {
        self.facts = Some(facts);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            only: self.args.only.iter().cloned().collect(),
            skip: self.args.skip.iter().cloned().collect(),
        }
    }

    fn sequence(
        &self,
        ui: &mut dyn UserInterface,
        facts: &EnvironmentFacts,
        config: &KioskConfig,
        writer: &dyn FileWriter,
        system: &dyn SystemRunner,
    ) -> Result<RunReport> {
        let index = AptCache::new(config.commands.package_query.clone());
        let decoder = ExternalDecoder::new(config.commands.edid_decode.clone());
        let ctx = StepContext {
            facts,
            config,
            applier: Applier::new(writer),
            system,
            packages: &index,
            edid: &decoder,
        };

        let steps = self.options().select(catalog())?;
        let mut presenter = UiPresenter::new(ui)
            .assume_yes(self.args.yes)
            .with_answers(config.answers.clone())
            .with_overrides(prompt_overrides());
        Sequencer::new(steps, ctx).run(&mut presenter)
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_for(&self.config_paths, ui)?;
        // Reject unknown step ids before anything else happens.
        self.options().select(catalog())?;

        let facts = match &self.facts {
            Some(facts) => facts.clone(),
            None => EnvironmentFacts::gather(),
        };
        facts.ensure_not_root()?;
        tracing::debug!("Environment: {:?}", facts);

        let elevate = config.settings.elevate.clone();
        let shell = ShellRunner::new(config.commands.clone(), elevate.clone());
        let host = HostWriter::new(elevate);

        let report = if self.args.dry_run {
            ui.show_header("Kiosk provisioning (dry run)");
            let writer = DryRunWriter::new(host);
            let system = DryRunSystem::new(shell);
            let report = self.sequence(ui, &facts, &config, &writer, &system)?;

            let staged = writer.staged_writes();
            if staged.is_empty() {
                ui.message("[dry-run] no files would change");
            }
            for write in staged {
                ui.message(&format!(
                    "[dry-run] would write {} ({} bytes)",
                    write.path.display(),
                    write.bytes
                ));
            }
            report
        } else {
            ui.show_header("Kiosk provisioning");
            let system = ProgressSystem::new(shell, ui.output_mode(), KioskTheme::detect());
            self.sequence(ui, &facts, &config, &host, &system)?
        };

        ui.show_run_summary(&report.summary());

        if report.success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(report.exit_code()))
        }
    }
}
