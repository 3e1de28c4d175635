#![forbid(unsafe_code)]

//! Value-holding event source with change notification and version tracking.
//!
//! # Design
//!
//! [`ValueField<T>`] pairs a value of type `T` with an [`Emitter`]. When the
//! value changes (determined by `PartialEq`), listeners of
//! [`ValueChanged<T>`] receive a [`ChangeEvent`] carrying the previous and new
//! value, in registration order.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: the value borrow is released before listeners run,
//!   so a listener may call `set()` again. The nested change is delivered
//!   before the outer dispatch finishes.
//! - **Destroyed field**: after `destroy()` the value can still be read and
//!   written but nothing is emitted.

use std::cell::RefCell;
use std::fmt;

use crate::emitter::Emitter;
use crate::event::{ChangeEvent, EventKind, ValueChanged};
use crate::source::{Callback, EventSource, ListenerId, SourceError, ValueSource};

struct ValueState<T> {
    value: T,
    version: u64,
}

/// A value with change notification, usable as an [`EventSource`].
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. `set_without_notify` bumps the version but emits nothing.
pub struct ValueField<T> {
    emitter: Emitter,
    state: RefCell<ValueState<T>>,
}

impl<T: fmt::Debug> fmt::Debug for ValueField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ValueField")
            .field("label", &self.emitter.label())
            .field("value", &state.value)
            .field("version", &state.version)
            .field("listener_count", &self.emitter.listener_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ValueField<T> {
    /// Create a field with the given initial value at version 0.
    #[must_use]
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            emitter: Emitter::new(label),
            state: RefCell::new(ValueState { value, version: 0 }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.state.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.borrow().value)
    }

    /// Set a new value, notifying listeners if it differs from the current one.
    pub fn set(&self, value: T) {
        let Some(previous) = self.replace(value) else {
            return;
        };
        let event = ChangeEvent::new(previous, self.get());
        self.emitter.emit::<ValueChanged<T>>(&event);
    }

    /// Set a new value without notifying listeners.
    pub fn set_without_notify(&self, value: T) {
        let _ = self.replace(value);
    }

    /// Modify the value in place. Listeners are notified only if the value
    /// changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Number of attached listeners across all kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.emitter.listener_count()
    }

    /// Tear the field down; see [`Emitter::destroy`].
    pub fn destroy(&self) {
        self.emitter.destroy();
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.emitter.is_destroyed()
    }

    /// Swap in `value`, returning the previous value if it changed.
    fn replace(&self, value: T) -> Option<T> {
        let mut state = self.state.borrow_mut();
        if state.value == value {
            return None;
        }
        state.version += 1;
        Some(std::mem::replace(&mut state.value, value))
    }
}

impl<T: Clone + PartialEq + 'static> EventSource for ValueField<T> {
    fn label(&self) -> &str {
        self.emitter.label()
    }

    fn attach<K: EventKind>(
        &self,
        callback: Callback<K::Payload>,
    ) -> Result<ListenerId, SourceError> {
        self.emitter.attach::<K>(callback)
    }

    fn detach<K: EventKind>(&self, id: ListenerId) -> Result<(), SourceError> {
        self.emitter.detach::<K>(id)
    }
}

impl<T: Clone + PartialEq + 'static> ValueSource<T> for ValueField<T> {
    fn value(&self) -> T {
        self.get()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
