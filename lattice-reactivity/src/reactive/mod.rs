//! Reactive Primitives
//!
//! This module implements effect tracking and the interception layer that
//! makes plain objects observable.
//!
//! # Concepts
//!
//! ## Effects
//!
//! An Effect is a function that re-runs whenever data it read changes. While
//! it runs it is the runtime's active effect, and every tracked read files it
//! as a dependent of the `(object, key)` pair that was read.
//!
//! ## Reactive Wrappers
//!
//! A wrapper sits over a raw object. Reads through it track, writes through
//! it trigger. Object-valued properties come back wrapped, so nested data is
//! observable without wrapping it up front.
//!
//! ## Runtime
//!
//! The Runtime owns the dependency graph and the active-effect stack. It is
//! an explicit handle: separate runtimes are separate reactive domains.
//!
//! # Implementation Notes
//!
//! Tracking is automatic: reading a property consults the runtime for an
//! active effect and, if there is one, records the dependency. Triggering is
//! synchronous and unbatched: every dependent re-runs before the write
//! returns.

mod context;
mod effect;
mod proxy;
mod runtime;

pub use effect::{Effect, EffectId};
pub use proxy::{
    is_reactive, is_readonly, to_raw, ProxyKind, Reactive, IS_REACTIVE_KEY, IS_READONLY_KEY,
};
pub use runtime::Runtime;
