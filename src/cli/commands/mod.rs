//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which owns the discovered config layers.

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod list;
pub mod probe;
pub mod run;

pub use dispatcher::{load_for, Command, CommandDispatcher, CommandResult};
