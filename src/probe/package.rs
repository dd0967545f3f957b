//! Package-name resolution against the repository index.

use super::capability::{first_viable, Resolved};
use crate::shell::{execute, shell_quote, CommandOptions};

/// Read-only view of the package repository.
pub trait PackageIndex {
    /// Whether `name` is known to the repository index.
    fn has_package(&self, name: &str) -> bool;
}

/// Queries the index with `apt-cache show` (or any configured equivalent).
#[derive(Debug, Clone)]
pub struct AptCache {
    query: String,
}

impl AptCache {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl PackageIndex for AptCache {
    fn has_package(&self, name: &str) -> bool {
        let command = format!("{} {}", self.query, shell_quote(name));
        match execute(&command, &CommandOptions::default()) {
            Ok(result) => result.success && !result.stdout.trim().is_empty(),
            Err(e) => {
                tracing::debug!("Package query '{}' could not run: {}", command, e);
                false
            }
        }
    }
}

/// Choose the first package in `candidates` known to `index`.
///
/// If none is known, the first candidate is returned as a fallback so the
/// caller can still attempt the install and report the failure.
pub fn probe_package(index: &dyn PackageIndex, candidates: &[String]) -> Resolved<String> {
    let resolved = first_viable(candidates, |name| index.has_package(name));
    match candidates.first() {
        Some(first) => resolved.or_fallback(
            first.clone(),
            format!(
                "none of [{}] found in the package index; trying '{}'",
                candidates.join(", "),
                first
            ),
        ),
        None => resolved,
    }
}
