//! Ranked-candidate resolution.

use serde::Serialize;
use std::fmt;

/// Outcome of a capability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolved<T> {
    /// A candidate passed its test.
    Found { value: T },
    /// No candidate passed; a documented default stands in.
    Fallback { value: T, reason: String },
    /// No candidate passed and there is nothing to fall back to.
    Unresolved,
}

impl<T> Resolved<T> {
    pub fn found(value: T) -> Self {
        Self::Found { value }
    }

    /// The chosen value, whether found or fallen back to.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Found { value } | Self::Fallback { value, .. } => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Found { value } | Self::Fallback { value, .. } => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Reason the fallback was used, for surfacing to the user.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Replace an unresolved result with `value`.
    pub fn or_fallback(self, value: T, reason: impl Into<String>) -> Self {
        match self {
            Self::Unresolved => Self::Fallback {
                value,
                reason: reason.into(),
            },
            resolved => resolved,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolved<U> {
        match self {
            Self::Found { value } => Resolved::Found { value: f(value) },
            Self::Fallback { value, reason } => Resolved::Fallback {
                value: f(value),
                reason,
            },
            Self::Unresolved => Resolved::Unresolved,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { value } => write!(f, "{}", value),
            Self::Fallback { value, .. } => write!(f, "{} (fallback)", value),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Return the first candidate for which `test` succeeds.
///
/// Candidate order encodes preference.
pub fn first_viable<T, F>(candidates: &[T], mut test: F) -> Resolved<T>
where
    T: Clone + fmt::Debug,
    F: FnMut(&T) -> bool,
{
    for candidate in candidates {
        if test(candidate) {
            tracing::debug!("Probe accepted {:?}", candidate);
            return Resolved::found(candidate.clone());
        }
        tracing::debug!("Probe rejected {:?}", candidate);
    }
    Resolved::Unresolved
}
