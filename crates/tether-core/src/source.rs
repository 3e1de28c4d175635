#![forbid(unsafe_code)]

//! The event-source capability.
//!
//! Anything that can attach and detach a callback for an [`EventKind`] is an
//! [`EventSource`]. Attaching hands back a [`ListenerId`]; that id, together
//! with the kind, is all a caller needs to undo the attach later.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Destroyed source | Host tore the source down | `attach`/`detach` return `SourceError::Destroyed` |
//! | Dropped source | Last strong reference released | holders of a `Weak` report `SourceError::Dropped` |
//! | Panicking detach | Source bug | callers that catch the unwind report `SourceError::Panicked` |
//! | Stale id | Id already detached, or never issued for that kind | `detach` returns `SourceError::UnknownListener` |

use std::fmt;
use std::rc::Rc;

use crate::event::{EventKind, KindId};

/// A listener callback, shared so sources can invoke it outside their own
/// borrow.
pub type Callback<P> = Rc<dyn Fn(&P)>;

/// Handle identifying one attached callback on one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors reported by an event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source was destroyed by its host.
    Destroyed { source: String },
    /// The source value itself no longer exists. Reported by holders of a
    /// weak back-reference, never by a live source.
    Dropped { source: String },
    /// The detach call panicked. Reported by callers that contain the panic.
    Panicked { source: String, message: String },
    /// No listener with this id is attached for this kind.
    UnknownListener {
        source: String,
        kind: KindId,
        id: ListenerId,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destroyed { source } => write!(f, "event source '{source}' was destroyed"),
            Self::Dropped { source } => write!(f, "event source '{source}' was dropped"),
            Self::Panicked { source, message } => {
                write!(f, "event source '{source}' panicked during detach: {message}")
            }
            Self::UnknownListener { source, kind, id } => {
                write!(f, "no '{kind}' listener {id} attached to '{source}'")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// An object that supports attaching and detaching callbacks per event kind.
pub trait EventSource {
    /// Diagnostic label of this source.
    fn label(&self) -> &str;

    /// Attach `callback` for kind `K`.
    fn attach<K: EventKind>(&self, callback: Callback<K::Payload>)
    -> Result<ListenerId, SourceError>;

    /// Detach the listener previously returned by `attach::<K>`.
    fn detach<K: EventKind>(&self, id: ListenerId) -> Result<(), SourceError>;
}

/// A source that emits [`ValueChanged<T>`](crate::event::ValueChanged).
pub trait ValueSource<T>: EventSource {
    /// Current value.
    fn value(&self) -> T;
}
