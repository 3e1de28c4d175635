#![forbid(unsafe_code)]

//! Scoped callback registry.
//!
//! A [`CallbackRegistry`] attaches callbacks to any number of
//! [`EventSource`]s and remembers, for each attach, how to undo it. A single
//! [`dispose`](CallbackRegistry::dispose) later detaches everything it
//! installed.
//!
//! # Design
//!
//! Each subscription keeps only a boxed `FnOnce` undo closure. The closure
//! captures a `Weak` reference to the source, the kind, and the
//! [`ListenerId`] returned by `attach`, so the collection is homogeneous while
//! registration stays fully typed at the call site. The user callback itself
//! lives only in the source's listener table.
//!
//! # Invariants
//!
//! 1. An entry is recorded only after its attach succeeded.
//! 2. An entry leaves the sequence before (or as) its detach runs, so no
//!    detach ever runs twice.
//! 3. `dispose` detaches oldest first and is idempotent.
//! 4. Once disposed, every registration fails with
//!    [`RegistryError::InvalidState`] without touching the source.
//! 5. The registry never keeps a source alive.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Stale source | Source destroyed or dropped before dispose | Collected into [`DisposeError`]; remaining detaches still run |
//! | Panicking source | A source's `detach` panics | Unwind contained, reported as `SourceError::Panicked`; remaining detaches still run |
//! | Use after dispose | Registration on an inert registry | `InvalidState`, no attach |
//! | Forgotten dispose | Registry dropped while populated | `Drop` disposes (configurable) and logs a warning |

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tether_core::{
    Callback, ChangeEvent, EventKind, EventSource, KindId, ListenerId, SourceError, ValueChanged,
    ValueSource,
};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{DetachFailure, DisposeError, RegistryError};

/// Identifies one subscription within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type DetachFn = Box<dyn FnOnce() -> Result<(), SourceError>>;

/// One installed callback.
struct Subscription {
    id: SubscriptionId,
    kind: KindId,
    source: String,
    detach: DetachFn,
}

impl Subscription {
    /// Run the undo closure. A panic inside the source's `detach` is
    /// contained and reported as [`SourceError::Panicked`].
    fn run_detach(self) -> Result<(), DetachFailure> {
        let detach = self.detach;
        let result = match catch_unwind(AssertUnwindSafe(detach)) {
            Ok(result) => result,
            Err(payload) => Err(SourceError::Panicked {
                source: self.source.clone(),
                message: panic_message(&*payload),
            }),
        };
        result.map_err(|error| DetachFailure {
            id: self.id,
            kind: self.kind,
            source: self.source,
            error,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Owner of a scope's live subscriptions.
///
/// Create one per logical scope (panel, feature module), register during the
/// scope's setup, and call [`dispose`](Self::dispose) when the scope ends.
/// A disposed registry is inert and must be replaced, not reused.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use tether_core::{Click, ClickEvent, Emitter};
/// use tether_runtime::CallbackRegistry;
///
/// let button = Rc::new(Emitter::new("ok-button"));
/// let mut registry = CallbackRegistry::new("dialog");
/// registry
///     .register_callback::<Click, _>(&button, |ev: &ClickEvent| {
///         assert_eq!(ev.click_count, 1);
///     })
///     .unwrap();
///
/// button.emit::<Click>(&ClickEvent::primary((0, 0)));
/// registry.dispose().unwrap();
/// assert_eq!(button.listener_count(), 0);
/// ```
pub struct CallbackRegistry {
    config: RegistryConfig,
    subscriptions: Vec<Subscription>,
    next_id: u64,
    disposed: bool,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("label", &self.config.label)
            .field("subscriptions", &self.subscriptions.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl CallbackRegistry {
    /// Create an empty registry with default configuration.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_config(RegistryConfig::new(label))
    }

    /// Create an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            subscriptions: Vec::new(),
            next_id: 0,
            disposed: false,
        }
    }

    /// Attach `handler` to `source` for kind `K` and record how to undo it.
    pub fn register_callback<K, S>(
        &mut self,
        source: &Rc<S>,
        handler: impl Fn(&K::Payload) + 'static,
    ) -> Result<SubscriptionId, RegistryError>
    where
        K: EventKind,
        S: EventSource + 'static,
    {
        let callback: Callback<K::Payload> = Rc::new(handler);
        self.install::<K, S>(source, callback)
    }

    /// Like [`register_callback`](Self::register_callback) for handlers that
    /// ignore the payload.
    pub fn register_callback_no_payload<K, S>(
        &mut self,
        source: &Rc<S>,
        handler: impl Fn() + 'static,
    ) -> Result<SubscriptionId, RegistryError>
    where
        K: EventKind,
        S: EventSource + 'static,
    {
        let callback: Callback<K::Payload> = Rc::new(move |_: &K::Payload| handler());
        self.install::<K, S>(source, callback)
    }

    /// Attach a [`ValueChanged<T>`] handler to a value source.
    pub fn register_value_changed_callback<T, S>(
        &mut self,
        source: &Rc<S>,
        handler: impl Fn(&ChangeEvent<T>) + 'static,
    ) -> Result<SubscriptionId, RegistryError>
    where
        T: 'static,
        S: ValueSource<T> + 'static,
    {
        let callback: Callback<ChangeEvent<T>> = Rc::new(handler);
        self.install::<ValueChanged<T>, S>(source, callback)
    }

    fn install<K, S>(
        &mut self,
        source: &Rc<S>,
        callback: Callback<K::Payload>,
    ) -> Result<SubscriptionId, RegistryError>
    where
        K: EventKind,
        S: EventSource + 'static,
    {
        self.ensure_live()?;

        let listener: ListenerId = source
            .attach::<K>(callback)
            .map_err(|error| RegistryError::Attach {
                registry: self.config.label.clone(),
                kind: K::id(),
                error,
            })?;

        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let label = source.label().to_owned();
        let weak = Rc::downgrade(source);
        let dropped_label = label.clone();
        let detach: DetachFn = Box::new(move || match weak.upgrade() {
            Some(source) => source.detach::<K>(listener),
            None => Err(SourceError::Dropped {
                source: dropped_label,
            }),
        });

        debug!(
            registry = %self.config.label,
            subscription = id.get(),
            kind = K::NAME,
            source = %label,
            "callback registered"
        );
        self.subscriptions.push(Subscription {
            id,
            kind: K::id(),
            source: label,
            detach,
        });
        Ok(id)
    }

    /// Detach one subscription ahead of disposal.
    ///
    /// The entry is removed even if its detach fails, so a later `dispose`
    /// never retries it.
    pub fn unregister(&mut self, id: SubscriptionId) -> Result<(), RegistryError> {
        self.ensure_live()?;
        let Some(index) = self.subscriptions.iter().position(|sub| sub.id == id) else {
            return Err(RegistryError::UnknownSubscription(id));
        };
        let subscription = self.subscriptions.remove(index);
        debug!(
            registry = %self.config.label,
            subscription = id.get(),
            kind = subscription.kind.name(),
            "callback unregistered"
        );
        subscription.run_detach().map_err(RegistryError::Detach)
    }

    /// Detach every recorded subscription, oldest first, and mark the
    /// registry disposed.
    ///
    /// A failing detach does not stop the others. All failures are returned
    /// together once every detach has been attempted. Calling `dispose` again
    /// is a no-op that returns `Ok(())`.
    pub fn dispose(&mut self) -> Result<(), DisposeError> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let subscriptions = std::mem::take(&mut self.subscriptions);
        let attempted = subscriptions.len();
        let failures: Vec<DetachFailure> = subscriptions
            .into_iter()
            .filter_map(|subscription| subscription.run_detach().err())
            .collect();

        for failure in &failures {
            warn!(
                registry = %self.config.label,
                subscription = failure.id.get(),
                kind = failure.kind.name(),
                source = %failure.source,
                error = %failure.error,
                "detach failed during dispose"
            );
        }
        debug!(
            registry = %self.config.label,
            attempted,
            failed = failures.len(),
            "registry disposed"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DisposeError {
                registry: self.config.label.clone(),
                attempted,
                failures,
            })
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether `id` is still held by this registry.
    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions.iter().any(|sub| sub.id == id)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.config.label
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn ensure_live(&self) -> Result<(), RegistryError> {
        if self.disposed {
            return Err(RegistryError::InvalidState {
                registry: self.config.label.clone(),
            });
        }
        Ok(())
    }
}

impl Drop for CallbackRegistry {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if !self.config.dispose_on_drop {
            if self.config.warn_on_undisposed_drop && !self.subscriptions.is_empty() {
                warn!(
                    registry = %self.config.label,
                    subscriptions = self.subscriptions.len(),
                    "registry dropped without dispose; callbacks stay attached"
                );
            }
            return;
        }
        if self.config.warn_on_undisposed_drop && !self.subscriptions.is_empty() {
            warn!(
                registry = %self.config.label,
                subscriptions = self.subscriptions.len(),
                "registry dropped without dispose; detaching"
            );
        }
        if let Err(err) = self.dispose() {
            warn!(registry = %self.config.label, error = %err, "dispose on drop incomplete");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use tether_core::{
        Click, ClickEvent, Emitter, FocusEvent, FocusIn, FocusOut, ValueField,
    };

    /// Source that records attach/detach calls and can be told to fail.
    struct RecordingSource {
        label: String,
        log: Rc<RefCell<Vec<String>>>,
        inner: Emitter,
        fail_detach: Cell<bool>,
        panic_detach: Cell<bool>,
    }

    impl RecordingSource {
        fn new(label: &str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Self> {
            Rc::new(Self {
                label: label.to_string(),
                log: Rc::clone(log),
                inner: Emitter::new(label),
                fail_detach: Cell::new(false),
                panic_detach: Cell::new(false),
            })
        }
    }

    impl EventSource for RecordingSource {
        fn label(&self) -> &str {
            &self.label
        }

        fn attach<K: EventKind>(
            &self,
            callback: Callback<K::Payload>,
        ) -> Result<ListenerId, SourceError> {
            let id = self.inner.attach::<K>(callback)?;
            self.log
                .borrow_mut()
                .push(format!("attach {} {}", self.label, K::NAME));
            Ok(id)
        }

        fn detach<K: EventKind>(&self, id: ListenerId) -> Result<(), SourceError> {
            self.log
                .borrow_mut()
                .push(format!("detach {} {}", self.label, K::NAME));
            if self.panic_detach.get() {
                panic!("detach exploded on {}", self.label);
            }
            if self.fail_detach.get() {
                return Err(SourceError::Destroyed {
                    source: self.label.clone(),
                });
            }
            self.inner.detach::<K>(id)
        }
    }

    fn detaches(log: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
        log.borrow()
            .iter()
            .filter(|line| line.starts_with("detach"))
            .cloned()
            .collect()
    }

    #[test]
    fn dispose_detaches_every_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = RecordingSource::new("a", &log);
        let b = RecordingSource::new("b", &log);
        let mut registry = CallbackRegistry::new("panel");

        registry.register_callback::<Click, _>(&a, |_| {}).unwrap();
        registry.register_callback::<FocusIn, _>(&a, |_| {}).unwrap();
        registry.register_callback::<Click, _>(&b, |_| {}).unwrap();
        assert_eq!(registry.len(), 3);

        registry.dispose().unwrap();
        assert_eq!(detaches(&log).len(), 3);
        assert!(registry.is_empty());
        assert!(registry.is_disposed());
        assert_eq!(a.inner.listener_count(), 0);
        assert_eq!(b.inner.listener_count(), 0);
    }

    #[test]
    fn detach_order_matches_attach_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = RecordingSource::new("a", &log);
        let b = RecordingSource::new("b", &log);
        let mut registry = CallbackRegistry::new("panel");

        registry.register_callback::<FocusOut, _>(&b, |_| {}).unwrap();
        registry.register_callback::<Click, _>(&a, |_| {}).unwrap();
        registry.register_callback::<FocusIn, _>(&b, |_| {}).unwrap();
        registry.dispose().unwrap();

        assert_eq!(
            detaches(&log),
            vec!["detach b focus-out", "detach a click", "detach b focus-in"]
        );
    }

    #[test]
    fn second_dispose_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = RecordingSource::new("a", &log);
        let mut registry = CallbackRegistry::new("panel");
        registry.register_callback::<Click, _>(&a, |_| {}).unwrap();

        registry.dispose().unwrap();
        registry.dispose().unwrap();
        assert_eq!(detaches(&log).len(), 1);
    }

    #[test]
    fn dispose_with_no_registrations() {
        let mut registry = CallbackRegistry::new("empty");
        assert!(registry.dispose().is_ok());
        assert!(registry.is_disposed());
    }

    #[test]
    fn register_after_dispose_fails_without_attach() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = RecordingSource::new("a", &log);
        let field = Rc::new(ValueField::new("volume", 0u8));
        let mut registry = CallbackRegistry::new("panel");
        registry.dispose().unwrap();

        let err = registry
            .register_callback::<Click, _>(&a, |_| {})
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidState { .. }));
        assert!(matches!(
            registry.register_callback_no_payload::<Click, _>(&a, || {}),
            Err(RegistryError::InvalidState { .. })
        ));
        assert!(matches!(
            registry.register_value_changed_callback(&field, |_: &ChangeEvent<u8>| {}),
            Err(RegistryError::InvalidState { .. })
        ));
        assert!(log.borrow().is_empty());
        assert_eq!(field.listener_count(), 0);
    }

    #[test]
    fn failed_detach_does_not_stop_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = RecordingSource::new("first", &log);
        let second = RecordingSource::new("second", &log);
        let third = RecordingSource::new("third", &log);
        let mut registry = CallbackRegistry::new("panel");

        registry.register_callback::<Click, _>(&first, |_| {}).unwrap();
        let failing = registry.register_callback::<Click, _>(&second, |_| {}).unwrap();
        registry.register_callback::<Click, _>(&third, |_| {}).unwrap();
        second.fail_detach.set(true);

        let err = registry.dispose().unwrap_err();
        assert_eq!(
            detaches(&log),
            vec!["detach first click", "detach second click", "detach third click"]
        );
        assert_eq!(err.attempted, 3);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].id, failing);
        assert_eq!(err.failures[0].source, "second");
        assert_eq!(first.inner.listener_count(), 0);
        assert_eq!(third.inner.listener_count(), 0);
        assert!(registry.is_empty());
        assert!(registry.is_disposed());
    }

    #[test]
    fn panicking_detach_does_not_stop_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = RecordingSource::new("first", &log);
        let second = RecordingSource::new("second", &log);
        let third = RecordingSource::new("third", &log);
        let mut registry = CallbackRegistry::new("panel");

        registry.register_callback::<Click, _>(&first, |_| {}).unwrap();
        let panicking = registry.register_callback::<Click, _>(&second, |_| {}).unwrap();
        registry.register_callback::<Click, _>(&third, |_| {}).unwrap();
        second.panic_detach.set(true);

        let err = registry.dispose().unwrap_err();
        assert_eq!(detaches(&log).len(), 3);
        assert_eq!(err.attempted, 3);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].id, panicking);
        assert!(matches!(
            err.failures[0].error,
            SourceError::Panicked { ref source, ref message }
                if source == "second" && message == "detach exploded on second"
        ));
        assert_eq!(first.inner.listener_count(), 0);
        assert_eq!(third.inner.listener_count(), 0);
        assert!(registry.is_empty());
        assert!(registry.is_disposed());
    }

    #[test]
    fn panicking_detach_in_unregister_is_reported() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let source = RecordingSource::new("flaky", &log);
        let mut registry = CallbackRegistry::new("panel");
        let id = registry.register_callback::<Click, _>(&source, |_| {}).unwrap();
        source.panic_detach.set(true);

        let err = registry.unregister(id).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Detach(DetachFailure {
                error: SourceError::Panicked { .. },
                ..
            })
        ));
        assert!(!registry.contains(id));
        assert!(registry.dispose().is_ok());
    }

    #[test]
    fn no_payload_overload_detaches_once() {
        let button = Rc::new(Emitter::new("ok"));
        let clicks = Rc::new(Cell::new(0u32));
        let clicks_clone = Rc::clone(&clicks);
        let mut registry = CallbackRegistry::new("panel");

        registry
            .register_callback_no_payload::<Click, _>(&button, move || {
                clicks_clone.set(clicks_clone.get() + 1);
            })
            .unwrap();
        registry
            .register_callback::<Click, _>(&button, |_: &ClickEvent| {})
            .unwrap();

        button.emit::<Click>(&ClickEvent::primary((2, 2)));
        assert_eq!(clicks.get(), 1);
        assert_eq!(button.listener_count_of::<Click>(), 2);

        registry.dispose().unwrap();
        assert_eq!(button.listener_count(), 0);
        button.emit::<Click>(&ClickEvent::primary((2, 2)));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn click_and_value_changed_on_two_sources() {
        let button = Rc::new(Emitter::new("apply"));
        let slider = Rc::new(ValueField::new("volume", 10i32));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CallbackRegistry::new("settings");

        let seen_click = Rc::clone(&seen);
        registry
            .register_callback::<Click, _>(&button, move |ev: &ClickEvent| {
                seen_click.borrow_mut().push(format!("click x={}", ev.position.x));
            })
            .unwrap();
        let seen_value = Rc::clone(&seen);
        registry
            .register_value_changed_callback(&slider, move |ev: &ChangeEvent<i32>| {
                seen_value
                    .borrow_mut()
                    .push(format!("volume {}->{}", ev.previous, ev.new));
            })
            .unwrap();

        button.emit::<Click>(&ClickEvent::primary((4, 0)));
        slider.set(11);
        assert_eq!(*seen.borrow(), vec!["click x=4", "volume 10->11"]);

        registry.dispose().unwrap();
        assert_eq!(button.listener_count(), 0);
        assert_eq!(slider.listener_count(), 0);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unregister_removes_and_detaches() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        let first = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        let second = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();

        registry.unregister(first).unwrap();
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
        assert_eq!(button.listener_count(), 1);

        registry.dispose().unwrap();
        assert_eq!(button.listener_count(), 0);
    }

    #[test]
    fn unregister_unknown_or_twice() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        let id = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();

        registry.unregister(id).unwrap();
        assert_eq!(
            registry.unregister(id),
            Err(RegistryError::UnknownSubscription(id))
        );
        assert_eq!(
            registry.unregister(SubscriptionId::new(99)),
            Err(RegistryError::UnknownSubscription(SubscriptionId::new(99)))
        );
    }

    #[test]
    fn unregister_after_dispose_is_invalid_state() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        let id = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        registry.dispose().unwrap();

        assert!(matches!(
            registry.unregister(id),
            Err(RegistryError::InvalidState { .. })
        ));
    }

    #[test]
    fn unregister_reports_detach_failure_and_forgets_entry() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        let id = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        button.destroy();

        let err = registry.unregister(id).unwrap_err();
        assert!(matches!(err, RegistryError::Detach(ref failure) if failure.id == id));
        assert!(registry.is_empty());
        assert!(registry.dispose().is_ok());
    }

    #[test]
    fn attach_failure_records_nothing() {
        let button = Rc::new(Emitter::new("ok"));
        button.destroy();
        let mut registry = CallbackRegistry::new("panel");

        let err = registry
            .register_callback::<Click, _>(&button, |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Attach {
                error: SourceError::Destroyed { .. },
                ..
            }
        ));
        assert!(registry.is_empty());
        assert!(registry.dispose().is_ok());
    }

    #[test]
    fn dropped_source_is_reported_not_panicked() {
        let button = Rc::new(Emitter::new("ok"));
        let keep = Rc::new(Emitter::new("cancel"));
        let mut registry = CallbackRegistry::new("panel");
        registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        registry.register_callback::<Click, _>(&keep, |_| {}).unwrap();
        drop(button);

        let err = registry.dispose().unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert!(matches!(
            err.failures[0].error,
            SourceError::Dropped { ref source } if source == "ok"
        ));
        assert_eq!(keep.listener_count(), 0);
    }

    #[test]
    fn registry_does_not_keep_source_alive() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        assert_eq!(Rc::strong_count(&button), 1);
        registry.dispose().unwrap();
    }

    #[test]
    fn registry_does_not_hold_the_callback() {
        let button = Rc::new(Emitter::new("ok"));
        let token = Rc::new(());
        let token_clone = Rc::clone(&token);
        let mut registry = CallbackRegistry::new("panel");
        registry
            .register_callback::<Click, _>(&button, move |_| {
                let _ = &token_clone;
            })
            .unwrap();
        assert_eq!(Rc::strong_count(&token), 2);

        button.destroy();
        // Only the source held the callback.
        assert_eq!(Rc::strong_count(&token), 1);
        let _ = registry.dispose();
    }

    #[test]
    fn drop_disposes_when_configured() {
        let button = Rc::new(Emitter::new("ok"));
        {
            let mut registry = CallbackRegistry::new("panel");
            registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
            assert_eq!(button.listener_count(), 1);
        }
        assert_eq!(button.listener_count(), 0);
    }

    #[test]
    fn drop_leaves_callbacks_when_disabled() {
        let button = Rc::new(Emitter::new("ok"));
        {
            let mut registry = CallbackRegistry::with_config(
                RegistryConfig::new("panel").with_dispose_on_drop(false),
            );
            registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        }
        assert_eq!(button.listener_count(), 1);
    }

    #[test]
    fn subscription_ids_are_monotonic() {
        let button = Rc::new(Emitter::new("ok"));
        let mut registry = CallbackRegistry::new("panel");
        let a = registry.register_callback::<Click, _>(&button, |_| {}).unwrap();
        let b = registry
            .register_callback::<FocusIn, _>(&button, |_: &FocusEvent| {})
            .unwrap();
        assert_eq!(a, SubscriptionId::new(1));
        assert!(b > a);
        assert_eq!(b.to_string(), "#2");
    }

    #[test]
    fn debug_format() {
        let registry = CallbackRegistry::new("panel");
        let dbg = format!("{registry:?}");
        assert!(dbg.contains("CallbackRegistry"));
        assert!(dbg.contains("panel"));
        assert!(dbg.contains("disposed"));
    }
}
