//! Runtime Configuration
//!
//! A [`RuntimeConfig`] is fixed when a [`Runtime`](crate::Runtime) is built.
//! It can be assembled in code or loaded from JSON:
//!
//! ```rust
//! use lattice_reactivity::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_json(r#"{ "max_run_depth": 64 }"#).unwrap();
//! assert_eq!(config.max_run_depth, Some(64));
//! ```

use serde::Deserialize;

use crate::error::Result;

/// Tunables for a reactive runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Maximum number of effect runs that may be nested inside each other.
    ///
    /// `None` leaves runs unguarded: an effect that re-triggers itself keeps
    /// recursing until the stack is exhausted. With a limit, the run that
    /// would exceed it fails with [`Error::RunDepthExceeded`](crate::Error).
    pub max_run_depth: Option<usize>,
}

impl RuntimeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nested run limit.
    pub fn with_max_run_depth(mut self, depth: usize) -> Self {
        self.max_run_depth = Some(depth);
        self
    }

    /// Parse a configuration from a JSON document.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unguarded() {
        assert_eq!(RuntimeConfig::new().max_run_depth, None);
    }

    #[test]
    fn builder_sets_depth() {
        let config = RuntimeConfig::new().with_max_run_depth(8);
        assert_eq!(config.max_run_depth, Some(8));
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = RuntimeConfig::from_json("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        assert!(RuntimeConfig::from_json(r#"{ "batch": true }"#).is_err());
    }
}
