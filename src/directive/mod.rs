//! Idempotent configuration-file mutation.
//!
//! A [`Directive`] pairs a target file with a presence predicate and a
//! payload. The [`Applier`] reads the target, evaluates the predicate and
//! then appends, replaces in place, or skips. Applying the same directive
//! twice leaves the file exactly as a single application did.
//!
//! Four strategies cover the file formats a kiosk image touches:
//!
//! | Constructor | Format | Absent | Different |
//! |---|---|---|---|
//! | [`Directive::token`], [`Directive::line`] | token list, line list | append | n/a |
//! | [`Directive::replace_token`], [`Directive::replace_line`] | key=value | append | replace matching units |
//! | [`Directive::markup_insert`] | markup | insert before anchor | n/a |
//! | [`Directive::overwrite`] | wholly owned files | write | write |
//!
//! # Example
//!
//! ```
//! use kiosk_setup::directive::{Applier, ApplyOutcome, Directive, HostWriter};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let cmdline = temp.path().join("cmdline.txt");
//! std::fs::write(&cmdline, "console=tty1 rootwait\n").unwrap();
//!
//! let writer = HostWriter::direct();
//! let applier = Applier::new(&writer);
//! let quiet = Directive::token(&cmdline, "quiet").unwrap();
//!
//! assert_eq!(applier.apply(&quiet).unwrap(), ApplyOutcome::Appended);
//! assert_eq!(applier.apply(&quiet).unwrap(), ApplyOutcome::Skipped);
//! ```

pub mod applier;
pub mod model;
pub mod text;
pub mod writer;

pub use applier::Applier;
pub use model::{ApplyOutcome, Directive, DirectiveKind, Layout, Plan, Presence, WriteScope};
pub use writer::{DryRunWriter, FileWriter, HostWriter, StagedWrite};
