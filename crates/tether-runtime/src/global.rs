#![forbid(unsafe_code)]

//! Lazily created, process-wide instances.
//!
//! [`Global<T>`] backs a `static` and creates its value on first access. The
//! creation goes through [`OnceLock`], so concurrent first accesses run the
//! initializer exactly once and every caller observes the same instance.
//!
//! Prefer passing explicit context objects where the call graph allows it;
//! `Global` exists for access points that must be reachable from anywhere.
//!
//! ```
//! use tether_runtime::Global;
//!
//! struct Settings {
//!     theme: &'static str,
//! }
//!
//! static SETTINGS: Global<Settings> = Global::new(|| Settings { theme: "dark" });
//!
//! assert!(!SETTINGS.is_initialized());
//! assert_eq!(SETTINGS.instance().theme, "dark");
//! assert!(SETTINGS.is_initialized());
//! ```

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

/// A process-wide instance of `T`, created on first access.
pub struct Global<T> {
    cell: OnceLock<T>,
    init: fn() -> T,
}

impl<T> Global<T> {
    /// Declare a global whose value is produced by `init` on first access.
    #[must_use]
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            cell: OnceLock::new(),
            init,
        }
    }

    /// The instance, creating it if this is the first access.
    pub fn instance(&self) -> &T {
        self.cell.get_or_init(|| {
            debug!(
                instance = std::any::type_name::<T>(),
                "creating global instance"
            );
            (self.init)()
        })
    }

    /// The instance if it has already been created.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Global<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Global")
            .field("instance", &self.cell.get())
            .finish()
    }
}
