//! kiosk-setup - Turn a single-board computer into a browser kiosk.
//!
//! kiosk-setup walks an operator through a fixed, ordered sequence of
//! provisioning steps. Each step is a yes/no gate followed by a handful of
//! idempotent file edits and package or service operations, so the whole
//! sequence can be re-run on a machine that is already set up.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration loading and validation
//! - [`directive`] - Idempotent file edits and the writers that apply them
//! - [`environment`] - Facts about the invoking user and session
//! - [`error`] - Error types and result aliases
//! - [`probe`] - Capability probes with graceful fallback
//! - [`runner`] - The provisioning sequencer and its presenters
//! - [`shell`] - Shell command execution
//! - [`steps`] - The provisioning step catalog and file payloads
//! - [`system`] - Package, service and power operations
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use kiosk_setup::directive::{ApplyOutcome, Applier, Directive, HostWriter};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join("autostart");
//! let directive = Directive::line(&target, "chromium --kiosk https://example.com &");
//!
//! let writer = HostWriter::direct();
//! let applier = Applier::new(&writer);
//! assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Created);
//! assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Skipped);
//! ```

pub mod cli;
pub mod config;
pub mod directive;
pub mod environment;
pub mod error;
pub mod probe;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod system;
pub mod ui;

pub use error::{KioskError, Result};
