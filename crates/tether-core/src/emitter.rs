#![forbid(unsafe_code)]

//! Reference event source: a named listener table keyed by event kind.
//!
//! # Design
//!
//! [`Emitter`] keeps one flat list of listeners in registration order. Each
//! entry stores its [`KindId`] next to a type-erased [`Callback`]; dispatch
//! filters by kind and downcasts back to `Callback<K::Payload>`.
//!
//! # Invariants
//!
//! 1. Listeners of a kind are invoked in registration order.
//! 2. A [`ListenerId`] is issued once per emitter and never reused.
//! 3. Detaching an id removes exactly one entry; detaching it again fails.
//! 4. After [`Emitter::destroy`] the table is empty and stays empty.
//!
//! # Failure Modes
//!
//! - **Re-entrant attach/detach**: callbacks are cloned out of the table
//!   before dispatch, so a listener may attach or detach during `emit`. A
//!   listener detached mid-dispatch still receives the event being delivered.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use crate::event::{EventKind, KindId};
use crate::source::{Callback, EventSource, ListenerId, SourceError};

struct Listener {
    id: ListenerId,
    kind: KindId,
    /// Holds a `Callback<K::Payload>` for `kind`.
    callback: Box<dyn Any>,
}

struct EmitterInner {
    listeners: Vec<Listener>,
    next_id: u64,
    destroyed: bool,
}

/// Single-threaded event source with per-kind listener lists.
pub struct Emitter {
    label: String,
    inner: RefCell<EmitterInner>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Emitter")
            .field("label", &self.label)
            .field("listener_count", &inner.listeners.len())
            .field("destroyed", &inner.destroyed)
            .finish()
    }
}

impl Emitter {
    /// Create an empty emitter.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            inner: RefCell::new(EmitterInner {
                listeners: Vec::new(),
                next_id: 0,
                destroyed: false,
            }),
        }
    }

    /// Deliver `payload` to every listener of kind `K`.
    ///
    /// Returns the number of listeners invoked. A destroyed emitter delivers
    /// nothing.
    pub fn emit<K: EventKind>(&self, payload: &K::Payload) -> usize {
        let callbacks: Vec<Callback<K::Payload>> = {
            let inner = self.inner.borrow();
            if inner.destroyed {
                return 0;
            }
            let kind = K::id();
            inner
                .listeners
                .iter()
                .filter(|listener| listener.kind == kind)
                .filter_map(|listener| {
                    listener
                        .callback
                        .downcast_ref::<Callback<K::Payload>>()
                        .cloned()
                })
                .collect()
        };

        for callback in &callbacks {
            callback(payload);
        }
        callbacks.len()
    }

    /// Total number of attached listeners across all kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of attached listeners for kind `K`.
    #[must_use]
    pub fn listener_count_of<K: EventKind>(&self) -> usize {
        let kind = K::id();
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Tear the source down: drop every listener and refuse further use.
    pub fn destroy(&self) {
        let dropped = {
            let mut inner = self.inner.borrow_mut();
            inner.destroyed = true;
            std::mem::take(&mut inner.listeners)
        };
        #[cfg(feature = "tracing")]
        crate::debug!(
            source = %self.label,
            listeners = dropped.len(),
            "event source destroyed"
        );
        // Callbacks may own values whose drop re-enters this emitter.
        drop(dropped);
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    fn destroyed_error(&self) -> SourceError {
        SourceError::Destroyed {
            source: self.label.clone(),
        }
    }
}

impl EventSource for Emitter {
    fn label(&self) -> &str {
        &self.label
    }

    fn attach<K: EventKind>(
        &self,
        callback: Callback<K::Payload>,
    ) -> Result<ListenerId, SourceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return Err(self.destroyed_error());
        }
        inner.next_id += 1;
        let id = ListenerId::new(inner.next_id);
        inner.listeners.push(Listener {
            id,
            kind: K::id(),
            callback: Box::new(callback),
        });
        #[cfg(feature = "tracing")]
        crate::trace!(
            source = %self.label,
            kind = K::NAME,
            listener = id.get(),
            "listener attached"
        );
        Ok(id)
    }

    fn detach<K: EventKind>(&self, id: ListenerId) -> Result<(), SourceError> {
        let kind = K::id();
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return Err(self.destroyed_error());
            }
            let Some(index) = inner
                .listeners
                .iter()
                .position(|listener| listener.id == id && listener.kind == kind)
            else {
                return Err(SourceError::UnknownListener {
                    source: self.label.clone(),
                    kind,
                    id,
                });
            };
            inner.listeners.remove(index)
        };
        #[cfg(feature = "tracing")]
        crate::trace!(
            source = %self.label,
            kind = K::NAME,
            listener = removed.id.get(),
            "listener detached"
        );
        drop(removed);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
