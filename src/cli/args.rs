//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// kiosk-setup - Turn a single-board computer into a browser kiosk.
#[derive(Debug, Parser)]
#[command(name = "kiosk-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extra config file merged over the system and user layers
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the provisioning sequence (default if no command specified)
    Run(RunArgs),

    /// List the provisioning steps in order
    List(ListArgs),

    /// Show what the capability probes resolve on this machine
    Probe(ProbeArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Accept every step's default answer and parameter defaults
    #[arg(short, long)]
    pub yes: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Evaluate every change without writing files or running commands
    #[arg(long)]
    pub dry_run: bool,

    /// Run only specified steps (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip specified steps (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `probe` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProbeArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::parse_from(["kiosk-setup"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_parses_step_lists() {
        let cli = Cli::parse_from([
            "kiosk-setup",
            "run",
            "--yes",
            "--only",
            "browser,autostart",
            "--skip",
            "reboot",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.yes);
                assert_eq!(args.only, vec!["browser", "autostart"]);
                assert_eq!(args.skip, vec!["reboot"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["kiosk-setup", "probe", "--json", "--no-color", "-c", "x.yml"]);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }
}
