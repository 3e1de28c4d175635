#![forbid(unsafe_code)]

//! Core: event kinds, payloads, and the event-source capability.
//!
//! # Role in Tether
//! `tether-core` defines what an event source is. The runtime
//! (`tether-runtime`) builds its scoped callback registry on top of the
//! [`EventSource`] trait and never needs to know concrete source types.
//!
//! # Primary responsibilities
//! - **EventKind**: type-level event categories with typed payloads.
//! - **EventSource**: attach/detach capability any host object can implement.
//! - **Emitter / ValueField**: reference sources used by hosts and tests.
//! - **Logging**: `tracing` re-exports and optional JSON subscriber setup.

pub mod emitter;
pub mod event;
pub mod logging;
pub mod source;
pub mod value;

pub use emitter::Emitter;
pub use event::{
    ChangeEvent, Click, ClickEvent, EventKind, FocusEvent, FocusIn, FocusOut, KindId,
    PointerButton, Position, ValueChanged,
};
pub use source::{Callback, EventSource, ListenerId, SourceError, ValueSource};
pub use value::ValueField;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
