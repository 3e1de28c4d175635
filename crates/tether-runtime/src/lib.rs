#![forbid(unsafe_code)]

//! Runtime: scoped callback registration and hosting.
//!
//! # Role in Tether
//! `tether-runtime` owns the lifetimes. A [`CallbackRegistry`] groups every
//! callback a scope attaches so one `dispose` detaches them all, [`Global`]
//! provides lazily created process-wide instances, and [`TaskHost`] runs
//! cooperative tasks for callers that cannot schedule work themselves.
//!
//! # Key components
//! - [`registry`]: subscriptions and their undo closures.
//! - [`config`]: registry configuration and environment overrides.
//! - [`error`]: registration, removal, and disposal errors.
//! - [`global`]: `OnceLock`-backed singletons.
//! - [`task_host`]: host-driven tick loop.

pub mod config;
pub mod error;
pub mod global;
pub mod registry;
pub mod task_host;

pub use config::RegistryConfig;
pub use error::{DetachFailure, DisposeError, RegistryError};
pub use global::Global;
pub use registry::{CallbackRegistry, SubscriptionId};
pub use task_host::{
    HostContext, Task, TaskContext, TaskHandle, TaskHost, TaskHostError, TaskStep, TickReport,
};

/// Install the JSON subscriber (requires the `tracing-json` feature).
#[cfg(feature = "tracing-json")]
pub use tether_core::logging::init_json_logging;
