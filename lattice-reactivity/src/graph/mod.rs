//! Dependency Graph
//!
//! This module holds the subscription graph that tracking builds and
//! triggering reads.
//!
//! # Overview
//!
//! The graph is a two-level index:
//!
//! - The outer level is keyed by observed object identity. Structurally equal
//!   objects are unrelated targets.
//! - The inner level is keyed by [`TrackKey`]: a property name, or the
//!   object's key set as a whole.
//! - Each leaf is a [`Dep`], the insertion-ordered set of effects that read
//!   that key.
//!
//! Entries are created lazily on the first tracked read and are never removed
//! while their object is alive. Objects are held weakly, so once the last
//! handle to an object is dropped its entries become unreachable and are
//! swept out.

mod dep;
mod target_map;

pub use dep::{Dep, TrackKey};
pub use target_map::TargetMap;
