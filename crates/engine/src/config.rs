//! Engine configuration
//!
//! Small and declarative: a user name attached to mutation log events and
//! the error-report capacity. Loadable from TOML:
//!
//! ```toml
//! user_name = "calib-shift"
//! max_held_errors = 100
//! ```

use condb_core::{Error, Result, MAX_HELD_ERRORS};
use serde::{Deserialize, Serialize};

/// Configuration for [`Database`](crate::Database) and
/// [`MemoryProvider`](crate::MemoryProvider)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// User name recorded on mutation log events; empty means anonymous
    pub user_name: String,
    /// Capacity of the provider error report
    pub max_held_errors: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            user_name: String::new(),
            max_held_errors: MAX_HELD_ERRORS,
        }
    }
}

impl DatabaseConfig {
    /// Parse a TOML configuration string
    ///
    /// Missing keys take their defaults; unknown keys are rejected so a
    /// typo does not silently configure nothing.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Internal {
            message: format!("bad configuration: {e}"),
        })
    }
}
