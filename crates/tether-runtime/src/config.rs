#![forbid(unsafe_code)]

//! Registry configuration.
//!
//! [`RegistryConfig`] is built explicitly by the owning scope. Environment
//! overrides are read only through [`RegistryConfig::from_env`] (or the
//! injectable [`RegistryConfig::from_env_with`] used by tests).

/// `TETHER_DISPOSE_ON_DROP`: dispose undisposed registries when dropped.
pub const DISPOSE_ON_DROP_ENV: &str = "TETHER_DISPOSE_ON_DROP";
/// `TETHER_WARN_UNDISPOSED`: log a warning when that happens.
pub const WARN_UNDISPOSED_ENV: &str = "TETHER_WARN_UNDISPOSED";

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration for a [`CallbackRegistry`](crate::registry::CallbackRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Label used in logs and errors (e.g. the owning panel's name).
    pub label: String,
    /// Run `dispose` from `Drop` if the owner never called it.
    ///
    /// When disabled, dropping an undisposed registry leaves its callbacks
    /// attached.
    pub dispose_on_drop: bool,
    /// Emit a `warn` event when `Drop` has to dispose a non-empty registry.
    pub warn_on_undisposed_drop: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            label: String::from("registry"),
            dispose_on_drop: true,
            warn_on_undisposed_drop: true,
        }
    }
}

impl RegistryConfig {
    /// Default configuration with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Default configuration with overrides from the process environment.
    #[must_use]
    pub fn from_env(label: impl Into<String>) -> Self {
        Self::from_env_with(label, |key| std::env::var(key).ok())
    }

    /// Default configuration with overrides from a custom lookup.
    #[must_use]
    pub fn from_env_with<F>(label: impl Into<String>, get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(label);
        if let Some(value) = get_env(DISPOSE_ON_DROP_ENV) {
            config.dispose_on_drop = env_flag(&value);
        }
        if let Some(value) = get_env(WARN_UNDISPOSED_ENV) {
            config.warn_on_undisposed_drop = env_flag(&value);
        }
        config
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_dispose_on_drop(mut self, enabled: bool) -> Self {
        self.dispose_on_drop = enabled;
        self
    }

    #[must_use]
    pub fn with_warn_on_undisposed_drop(mut self, enabled: bool) -> Self {
        self.warn_on_undisposed_drop = enabled;
        self
    }
}
