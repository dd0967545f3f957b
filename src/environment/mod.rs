//! Environment facts consumed by the provisioning engine.
//!
//! The current user, home directory, privilege level and session state are
//! read once into an [`EnvironmentFacts`] value and passed explicitly to every
//! probe and step.

pub mod facts;

pub use facts::EnvironmentFacts;
