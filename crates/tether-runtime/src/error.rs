#![forbid(unsafe_code)]

//! Registry error taxonomy.
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | [`RegistryError::InvalidState`] | register / unregister | Registry already disposed; nothing was attached |
//! | [`RegistryError::Attach`] | register | Source refused the attach; nothing was recorded |
//! | [`RegistryError::UnknownSubscription`] | unregister | Id not (or no longer) held by this registry |
//! | [`RegistryError::Detach`] | unregister | Entry removed, but its detach failed |
//! | [`DisposeError`] | dispose | One or more detaches failed; all were attempted |

use std::fmt;

use tether_core::{KindId, SourceError};

use crate::registry::SubscriptionId;

/// One detach that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachFailure {
    pub id: SubscriptionId,
    pub kind: KindId,
    /// Label of the source the callback was attached to.
    pub source: String,
    pub error: SourceError,
}

impl fmt::Display for DetachFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to detach '{}' subscription {} from '{}': {}",
            self.kind, self.id, self.source, self.error
        )
    }
}

impl std::error::Error for DetachFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Errors from registration and early removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry was already disposed.
    InvalidState { registry: String },
    /// The source refused to attach the callback.
    Attach {
        registry: String,
        kind: KindId,
        error: SourceError,
    },
    /// No subscription with this id is held.
    UnknownSubscription(SubscriptionId),
    /// The subscription was removed but detaching it failed.
    Detach(DetachFailure),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { registry } => {
                write!(f, "registry '{registry}' is disposed")
            }
            Self::Attach {
                registry,
                kind,
                error,
            } => write!(f, "registry '{registry}' could not attach '{kind}': {error}"),
            Self::UnknownSubscription(id) => write!(f, "unknown subscription {id}"),
            Self::Detach(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Attach { error, .. } => Some(error),
            Self::Detach(failure) => Some(failure),
            Self::InvalidState { .. } | Self::UnknownSubscription(_) => None,
        }
    }
}

/// Aggregate of every detach that failed during one `dispose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposeError {
    pub registry: String,
    /// Number of detaches attempted (successful and failed).
    pub attempted: usize,
    /// Failures in detach order.
    pub failures: Vec<DetachFailure>,
}

impl DisposeError {
    /// Number of subscriptions that were detached cleanly.
    #[must_use]
    pub fn detached(&self) -> usize {
        self.attempted.saturating_sub(self.failures.len())
    }
}

impl fmt::Display for DisposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registry '{}': {} of {} detaches failed",
            self.registry,
            self.failures.len(),
            self.attempted
        )?;
        if let Some(first) = self.failures.first() {
            write!(f, " (first: {first})")?;
        }
        Ok(())
    }
}

impl std::error::Error for DisposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tether_core::{Click, EventKind, ListenerId};

    fn failure() -> DetachFailure {
        DetachFailure {
            id: SubscriptionId::new(2),
            kind: Click::id(),
            source: "ok-button".into(),
            error: SourceError::Destroyed {
                source: "ok-button".into(),
            },
        }
    }

    #[test]
    fn detach_failure_display_and_source() {
        let failure = failure();
        assert_eq!(
            failure.to_string(),
            "failed to detach 'click' subscription #2 from 'ok-button': \
             event source 'ok-button' was destroyed"
        );
        assert!(failure.source().is_some());
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::InvalidState {
            registry: "panel".into(),
        };
        assert_eq!(err.to_string(), "registry 'panel' is disposed");
        assert!(err.source().is_none());

        let err = RegistryError::Attach {
            registry: "panel".into(),
            kind: Click::id(),
            error: SourceError::UnknownListener {
                source: "ok".into(),
                kind: Click::id(),
                id: ListenerId::new(1),
            },
        };
        assert!(err.to_string().starts_with("registry 'panel' could not attach 'click'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn dispose_error_counts() {
        let err = DisposeError {
            registry: "panel".into(),
            attempted: 3,
            failures: vec![failure()],
        };
        assert_eq!(err.detached(), 2);
        assert!(err.to_string().starts_with("registry 'panel': 1 of 3 detaches failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn detached_never_underflows() {
        let err = DisposeError {
            registry: "panel".into(),
            attempted: 0,
            failures: vec![failure(), failure()],
        };
        assert_eq!(err.detached(), 0);
    }
}
