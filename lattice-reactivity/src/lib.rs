//! Lattice Reactivity
//!
//! This crate provides the dependency-tracking kernel beneath the Lattice
//! reactive UI framework. It implements:
//!
//! - Effects that re-run when data they read changes
//! - A dependency graph from observed object and key to dependent effects
//! - Reactive wrappers that track reads and trigger on writes, including
//!   on-demand wrapping of nested objects
//!
//! It contains no scheduling, batching or rendering. Richer primitives
//! (computed values, watchers, component updates) are built on top.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `value`: Plain data objects and values
//! - `graph`: The object -> key -> effects index
//! - `reactive`: Effects, the runtime, and reactive wrappers
//! - `shared`: Predicates used by both layers
//! - `config` / `error`: Runtime configuration and error types
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! use lattice_reactivity::Runtime;
//! use serde_json::json;
//!
//! let runtime = Runtime::new();
//! let state = runtime.reactive(json!({ "count": 0 })).unwrap();
//!
//! let seen = Arc::new(AtomicI64::new(-1));
//! let (reader, sink) = (state.clone(), seen.clone());
//! runtime
//!     .effect(move || {
//!         let count = reader.get("count").and_then(|v| v.as_f64()).unwrap_or(-1.0);
//!         sink.store(count as i64, Ordering::SeqCst);
//!     })
//!     .unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 0);
//!
//! // The write re-runs the effect before it returns.
//! state.set("count", 1).unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod reactive;
pub mod shared;
pub mod value;

pub use config::RuntimeConfig;
pub use error::{Error, Result};
pub use reactive::{
    is_reactive, is_readonly, to_raw, Effect, EffectId, ProxyKind, Reactive, Runtime,
    IS_REACTIVE_KEY, IS_READONLY_KEY,
};
pub use value::{Object, ObjectId, Value, WeakObject};
