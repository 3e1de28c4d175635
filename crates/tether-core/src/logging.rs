#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! crate code can write `crate::debug!(..)` without naming the backend. The
//! `tracing-json` feature adds [`init_json_logging`], which installs a global
//! JSON subscriber filtered by [`LOG_ENV_VAR`].

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable holding an `EnvFilter` directive (e.g. `tether=debug`).
pub const LOG_ENV_VAR: &str = "TETHER_LOG";

/// Errors from logging setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingInitError {
    /// Neither the environment nor the fallback produced a valid filter.
    InvalidFilter(String),
    /// A global subscriber was already installed.
    AlreadyInstalled(String),
}

impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::AlreadyInstalled(msg) => write!(f, "global subscriber already set: {msg}"),
        }
    }
}

impl std::error::Error for LoggingInitError {}

/// Install a JSON subscriber as the global default.
///
/// The filter comes from [`LOG_ENV_VAR`] when set and valid, otherwise from
/// `fallback_directive`.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(fallback_directive: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(fallback_directive))
        .map_err(|err| LoggingInitError::InvalidFilter(err.to_string()))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LoggingInitError::AlreadyInstalled(err.to_string()))
}
