//! Error types for the reactivity kernel.
//!
//! Tracking and triggering add very few failure modes of their own. Writes and
//! deletes that change nothing are not errors, they simply trigger nothing.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the reactive runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Only structured values can be wrapped. `kind` names what was passed.
    #[error("cannot wrap a {kind} value: only objects can be made reactive")]
    InvalidTarget { kind: &'static str },

    /// A write or delete was attempted through a readonly wrapper.
    #[error("cannot {operation} key `{key}`: target is readonly")]
    ReadonlyTarget {
        operation: &'static str,
        key: String,
    },

    /// An effect run would nest deeper than the configured limit.
    #[error("effect run depth exceeded the configured limit of {limit}")]
    RunDepthExceeded { limit: usize },

    /// The runtime configuration could not be parsed.
    #[error("invalid runtime configuration: {0}")]
    Config(#[from] serde_json::Error),
}
