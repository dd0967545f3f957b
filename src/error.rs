//! Error types for kiosk provisioning.
//!
//! This module defines [`KioskError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe and anchor problems degrade to warnings inside a step
//! - Write and command failures fail the current step only
//! - [`KioskError::RunningAsRoot`] is the one error that aborts a whole run

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No candidate satisfied a capability probe.
    #[error("Could not resolve {what}: {message}")]
    ProbeUnresolved { what: String, message: String },

    /// A structured insertion point is missing from the target file.
    #[error("Anchor '{anchor}' not found in {path}; file left unchanged")]
    TargetMissingAnchor { path: PathBuf, anchor: String },

    /// Insufficient privilege to write a target file.
    #[error("Cannot write {path}: {message}")]
    WriteDenied { path: PathBuf, message: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A directive that could never converge.
    #[error("Invalid directive for {path}: {message}")]
    InvalidDirective { path: PathBuf, message: String },

    /// A provisioning step failed.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// The tool was started with superuser privileges.
    #[error("Refusing to run as root; run as the kiosk user (sudo is used where needed)")]
    RunningAsRoot,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KioskError {
    /// Process exit code for an error that ends the program.
    ///
    /// Configuration problems exit with 2, a root invocation with 3 and
    /// everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => 2,
            Self::RunningAsRoot => 3,
            _ => 1,
        }
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, KioskError>;
