//! Reactive Wrappers
//!
//! A [`Reactive`] wraps a raw [`Object`] and routes every property access
//! through the runtime that created it:
//!
//! - `get` reads the raw property, tracks `(object, key)` for the active
//!   effect and wraps object-valued results on the way out.
//! - `set` writes the raw property, then triggers dependents of the key.
//! - `delete` removes the raw property and triggers only if it was there.
//!
//! Nested objects are wrapped when they are read, not when the outer object
//! is wrapped, so the wrapper tree follows the access pattern and cyclic data
//! needs no special handling. The runtime caches one wrapper per raw object
//! and kind, so reading the same nested object twice yields the same wrapper
//! for as long as a handle to it is alive.
//!
//! A readonly wrapper answers reads without tracking and refuses writes.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::warn;

use crate::error::{Error, Result};
use crate::graph::TrackKey;
use crate::shared::has_own;
use crate::value::{Object, ObjectId, Value};

use super::runtime::Runtime;

/// Marker key that reads as `true` on reactive wrappers.
pub const IS_REACTIVE_KEY: &str = "__v_isReactive";

/// Marker key that reads as `true` on readonly wrappers.
pub const IS_READONLY_KEY: &str = "__v_isReadonly";

/// Smallest cache size at which dead wrappers are swept.
const MIN_SWEEP_LEN: usize = 64;

/// The interception behavior of a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    /// Reads track, writes trigger.
    Reactive,
    /// Reads do not track, writes are rejected.
    Readonly,
}

struct ProxyInner {
    raw: Object,
    kind: ProxyKind,
    runtime: Runtime,
}

/// An intercepting wrapper over a raw object.
///
/// Cloning shares the wrapper; equality is wrapper identity.
#[derive(Clone)]
pub struct Reactive {
    inner: Arc<ProxyInner>,
}

impl Reactive {
    /// The wrapper's interception behavior.
    pub fn kind(&self) -> ProxyKind {
        self.inner.kind
    }

    /// Whether reads through this wrapper are tracked.
    pub fn is_reactive(&self) -> bool {
        self.flag(IS_REACTIVE_KEY).unwrap_or(false)
    }

    pub fn is_readonly(&self) -> bool {
        self.flag(IS_READONLY_KEY).unwrap_or(false)
    }

    /// The raw object behind the wrapper. Accesses through it are untracked.
    pub fn to_raw(&self) -> Object {
        self.inner.raw.clone()
    }

    /// The runtime this wrapper reports to.
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    /// Whether both handles are the same wrapper.
    pub fn ptr_eq(&self, other: &Reactive) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read a property.
    ///
    /// Marker keys are answered before the raw object is consulted and are
    /// never tracked. Any other key is tracked, present or not, so adding it
    /// later re-runs the reader. Object values come back wrapped with the
    /// same kind as `self`.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(flag) = self.flag(key) {
            return Some(Value::Bool(flag));
        }

        let value = self.inner.raw.get(key);
        if self.kind() == ProxyKind::Reactive {
            self.runtime().track_key(&self.inner.raw, TrackKey::from(key));
        }

        value.map(|value| match value {
            Value::Object(nested) => Value::Reactive(self.runtime().proxy(nested, self.kind())),
            other => other,
        })
    }

    /// Whether `key` is an own property. Tracked like a read of `key`.
    pub fn has(&self, key: &str) -> bool {
        let present = has_own(&self.inner.raw, key);
        if self.kind() == ProxyKind::Reactive {
            self.runtime().track_key(&self.inner.raw, TrackKey::from(key));
        }
        present
    }

    /// Own keys in insertion order. Tracks the key set.
    pub fn keys(&self) -> Vec<String> {
        self.track_iteration();
        self.inner.raw.keys()
    }

    /// Number of own keys. Tracks the key set.
    pub fn len(&self) -> usize {
        self.track_iteration();
        self.inner.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write a property and re-run every effect that read it.
    ///
    /// Dependents run synchronously, before this call returns. Adding a key
    /// that was not present also re-runs effects that read the key set.
    /// Errors come from the re-runs (see [`RuntimeConfig`]) or from writing
    /// through a readonly wrapper.
    ///
    /// [`RuntimeConfig`]: crate::RuntimeConfig
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.ensure_writable("set", key)?;

        let raw = &self.inner.raw;
        let added = !has_own(raw, key);
        raw.insert(key, value);

        self.runtime().trigger_key(raw, &TrackKey::from(key))?;
        if added {
            self.runtime().trigger_key(raw, &TrackKey::Iterate)?;
        }
        Ok(())
    }

    /// Remove a property. Returns whether it was present.
    ///
    /// Removing an absent key changes nothing and re-runs nothing.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.ensure_writable("delete", key)?;

        let raw = &self.inner.raw;
        let had_key = has_own(raw, key);
        let removed = raw.remove(key).is_some();
        if !(had_key && removed) {
            return Ok(false);
        }

        self.runtime().trigger_key(raw, &TrackKey::from(key))?;
        self.runtime().trigger_key(raw, &TrackKey::Iterate)?;
        Ok(true)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match key {
            IS_REACTIVE_KEY => Some(self.kind() == ProxyKind::Reactive),
            IS_READONLY_KEY => Some(self.kind() == ProxyKind::Readonly),
            _ => None,
        }
    }

    fn track_iteration(&self) {
        if self.kind() == ProxyKind::Reactive {
            self.runtime().track_key(&self.inner.raw, TrackKey::Iterate);
        }
    }

    fn ensure_writable(&self, operation: &'static str, key: &str) -> Result<()> {
        if self.kind() == ProxyKind::Readonly {
            warn!(
                target_id = %self.inner.raw.id(),
                key,
                operation,
                "write through readonly wrapper rejected"
            );
            return Err(Error::ReadonlyTarget {
                operation,
                key: key.to_owned(),
            });
        }
        Ok(())
    }
}

impl PartialEq for Reactive {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Reactive {}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("kind", &self.inner.kind)
            .field("raw", &self.inner.raw)
            .finish()
    }
}

/// Whether `value` is a reactive wrapper.
///
/// Primitives, raw objects and readonly wrappers are not.
pub fn is_reactive(value: &Value) -> bool {
    value.as_reactive().is_some_and(Reactive::is_reactive)
}

/// Whether `value` is a readonly wrapper.
pub fn is_readonly(value: &Value) -> bool {
    value.as_reactive().is_some_and(Reactive::is_readonly)
}

/// `value` with any wrapper replaced by its raw object.
pub fn to_raw(value: &Value) -> Value {
    value.clone().into_raw()
}

/// One weakly held wrapper per (raw object, kind).
#[derive(Debug)]
pub(crate) struct ProxyCache {
    proxies: DashMap<(ObjectId, ProxyKind), Weak<ProxyInner>>,
    sweep_at: AtomicUsize,
}

impl Default for ProxyCache {
    fn default() -> Self {
        Self {
            proxies: DashMap::new(),
            sweep_at: AtomicUsize::new(MIN_SWEEP_LEN),
        }
    }
}

impl ProxyCache {
    /// Return the live wrapper for `raw`, or create and cache one.
    pub(crate) fn get_or_create(&self, runtime: &Runtime, raw: Object, kind: ProxyKind) -> Reactive {
        let key = (raw.id(), kind);
        let cached = self.proxies.get(&key).and_then(|weak| weak.upgrade());
        if let Some(inner) = cached {
            if inner.raw.ptr_eq(&raw) {
                return Reactive { inner };
            }
        }

        if self.proxies.len() >= self.sweep_at.load(Ordering::Relaxed) {
            self.proxies.retain(|_, weak| weak.strong_count() > 0);
            self.sweep_at
                .store((self.proxies.len() * 2).max(MIN_SWEEP_LEN), Ordering::Relaxed);
        }

        let reactive = Reactive {
            inner: Arc::new(ProxyInner {
                raw,
                kind,
                runtime: runtime.clone(),
            }),
        };
        self.proxies.insert(key, Arc::downgrade(&reactive.inner));
        reactive
    }

    /// Number of cached wrappers that are still alive.
    pub(crate) fn live(&self) -> usize {
        self.proxies
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(runtime: &Runtime) -> Reactive {
        runtime
            .reactive(json!({ "count": 0, "nested": { "x": 1 } }))
            .unwrap()
    }

    #[test]
    fn marker_reads_true_without_raw_property() {
        let runtime = Runtime::new();
        let state = state(&runtime);

        assert!(!state.to_raw().contains_key(IS_REACTIVE_KEY));
        assert_eq!(state.get(IS_REACTIVE_KEY), Some(Value::Bool(true)));
        assert_eq!(state.get(IS_READONLY_KEY), Some(Value::Bool(false)));
        assert!(state.is_reactive());
        assert!(!state.is_readonly());
    }

    #[test]
    fn marker_read_is_not_tracked() {
        let runtime = Runtime::new();
        let state = state(&runtime);

        let reader = state.clone();
        runtime
            .effect(move || {
                reader.get(IS_REACTIVE_KEY);
            })
            .unwrap();

        assert_eq!(runtime.dependent_count(&state.to_raw(), IS_REACTIVE_KEY), 0);
        assert_eq!(runtime.tracked_targets(), 0);
    }

    #[test]
    fn get_returns_plain_values_and_none() {
        let runtime = Runtime::new();
        let state = state(&runtime);

        assert_eq!(state.get("count"), Some(Value::Number(0.0)));
        assert_eq!(state.get("missing"), None);
    }

    #[test]
    fn nested_reads_return_cached_wrapper() {
        let runtime = Runtime::new();
        let state = state(&runtime);

        let first = state.get("nested").unwrap();
        let second = state.get("nested").unwrap();

        assert!(is_reactive(&first));
        assert_eq!(first, second);
        assert_eq!(runtime.reactive(to_raw(&first)).unwrap(), *first.as_reactive().unwrap());
    }

    #[test]
    fn set_stores_raw_object_for_wrappers() {
        let runtime = Runtime::new();
        let state = state(&runtime);
        let other = runtime.reactive(json!({ "y": 2 })).unwrap();

        state.set("other", other.clone()).unwrap();

        let stored = state.to_raw().get("other").unwrap();
        assert!(stored.as_object().unwrap().ptr_eq(&other.to_raw()));
        assert_eq!(state.get("other"), Some(Value::Reactive(other)));
    }

    #[test]
    fn delete_reports_presence() {
        let runtime = Runtime::new();
        let state = state(&runtime);

        assert!(state.delete("count").unwrap());
        assert!(!state.delete("count").unwrap());
        assert!(!state.has("count"));
    }

    #[test]
    fn readonly_rejects_writes_and_skips_tracking() {
        let runtime = Runtime::new();
        let view = runtime.readonly(json!({ "a": 1, "nested": {} })).unwrap();

        assert!(view.is_readonly());
        assert!(!view.is_reactive());
        assert!(!is_reactive(&Value::Reactive(view.clone())));

        let reader = view.clone();
        runtime
            .effect(move || {
                reader.get("a");
                reader.keys();
            })
            .unwrap();
        assert_eq!(runtime.tracked_targets(), 0);

        let nested = view.get("nested").unwrap();
        assert!(is_readonly(&nested));

        assert!(matches!(
            view.set("a", 2),
            Err(Error::ReadonlyTarget { operation: "set", .. })
        ));
        assert!(matches!(
            view.delete("a"),
            Err(Error::ReadonlyTarget { operation: "delete", .. })
        ));
        assert_eq!(view.get("a"), Some(Value::Number(1.0)));
    }

    #[test]
    fn predicates_on_primitives_and_raw_objects() {
        assert!(!is_reactive(&Value::Null));
        assert!(!is_reactive(&Value::Number(1.0)));
        assert!(!is_reactive(&Value::from("__v_isReactive")));

        let shaped: Object = [(IS_REACTIVE_KEY, true)].into_iter().collect();
        assert!(!is_reactive(&Value::Object(shaped)));
    }

    #[test]
    fn cache_forgets_dropped_wrappers() {
        let runtime = Runtime::new();
        let raw = Object::new();

        let wrapper = runtime.reactive(raw.clone()).unwrap();
        assert_eq!(runtime.live_wrappers(), 1);

        drop(wrapper);
        assert_eq!(runtime.live_wrappers(), 0);

        let again = runtime.reactive(raw.clone()).unwrap();
        assert!(again.to_raw().ptr_eq(&raw));
    }
}
