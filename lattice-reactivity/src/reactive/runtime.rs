//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects effects with the
//! objects they observe. It owns the dependency graph, the stack of running
//! effects and the wrapper cache.
//!
//! # How It Works
//!
//! 1. [`Runtime::run`] makes an effect active for the duration of its
//!    function.
//!
//! 2. A tracked read calls [`Runtime::track`], which files the active effect
//!    under `(object, key)`. Reads with no active effect record nothing.
//!
//! 3. A write calls [`Runtime::trigger`], which re-runs every effect filed
//!    under `(object, key)`, synchronously and in the order they were first
//!    tracked.
//!
//! # Isolation
//!
//! A runtime is an explicit, cloneable handle rather than a global. Effects
//! and wrappers belong to the runtime that created them, so independent
//! runtimes never see each other's reads or writes.
//!
//! # Threading
//!
//! All state sits behind locks, so a `Runtime` is `Send + Sync`. The active
//! effect is kept per thread: a read on one thread is never attributed to an
//! effect running on another. No lock is held while an effect body runs, so
//! effects may freely read, write and create other effects.
//!
//! # Recursion
//!
//! An effect whose run writes a key it depends on triggers itself again,
//! nested inside the current run. Without
//! [`RuntimeConfig::max_run_depth`] nothing stops this and the thread
//! eventually overflows its stack.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::graph::{TargetMap, TrackKey};
use crate::value::{Object, Value};

use super::context::{ActiveStack, ReactiveContext};
use super::effect::Effect;
use super::proxy::{ProxyCache, ProxyKind, Reactive};

struct RuntimeInner {
    config: RuntimeConfig,
    targets: Mutex<TargetMap>,
    active: ActiveStack,
    proxies: ProxyCache,
}

/// An independent tracking context.
///
/// Cloning the handle shares the context.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                config,
                targets: Mutex::new(TargetMap::new()),
                active: ActiveStack::new(),
                proxies: ProxyCache::default(),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Whether both handles refer to the same runtime.
    pub fn ptr_eq(&self, other: &Runtime) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------------

    /// Register `run` as an effect and run it once immediately.
    pub fn effect<F>(&self, run: F) -> Result<Effect>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let effect = Effect::new(run);
        debug!(effect = %effect.id(), "effect created");
        self.run(&effect)?;
        Ok(effect)
    }

    /// Run `effect` with it as the active effect.
    ///
    /// The previously active effect, if any, is active again once the run
    /// returns, including when the effect panics.
    pub fn run(&self, effect: &Effect) -> Result<()> {
        let limit = self.inner.config.max_run_depth;
        let _ctx = match ReactiveContext::enter(&self.inner.active, effect, limit) {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!(effect = %effect.id(), %err, "effect run refused");
                return Err(err);
            }
        };

        effect.invoke();
        Ok(())
    }

    /// The effect currently running on the calling thread, if any.
    pub fn active_effect(&self) -> Option<Effect> {
        self.inner.active.current()
    }

    /// Whether reads would currently be tracked.
    pub fn is_tracking(&self) -> bool {
        self.inner.active.depth() > 0
    }

    // ------------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------------

    /// Record that the active effect depends on `key` of `target`.
    ///
    /// Does nothing outside an effect run. Tracking the same pair twice
    /// leaves a single edge.
    pub fn track(&self, target: &Object, key: &str) {
        self.track_key(target, TrackKey::from(key));
    }

    pub(crate) fn track_key(&self, target: &Object, key: TrackKey) {
        let Some(effect) = self.inner.active.current() else {
            return;
        };

        trace!(target_id = %target.id(), %key, effect = %effect.id(), "track");
        self.inner.targets.lock().track(target, key, &effect);
    }

    /// Re-run every effect that depends on `key` of `target`.
    ///
    /// A pair that was never tracked is a no-op and creates no entry. The
    /// first failing re-run stops the walk and its error is returned.
    pub fn trigger(&self, target: &Object, key: &str) -> Result<()> {
        self.trigger_key(target, &TrackKey::from(key))
    }

    pub(crate) fn trigger_key(&self, target: &Object, key: &TrackKey) -> Result<()> {
        let dependents = self.inner.targets.lock().dependents(target, key);
        let Some(effects) = dependents else {
            return Ok(());
        };

        trace!(target_id = %target.id(), %key, count = effects.len(), "trigger");
        for effect in &effects {
            self.run(effect)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Wrapping
    // ------------------------------------------------------------------------

    /// Wrap an object so reads track and writes trigger.
    ///
    /// Wrapping a wrapper of this runtime returns it unchanged, and a
    /// readonly wrapper is returned as is so it cannot be made writable.
    /// Primitives are rejected with [`Error::InvalidTarget`].
    pub fn reactive(&self, value: impl Into<Value>) -> Result<Reactive> {
        self.wrap(value.into(), ProxyKind::Reactive)
    }

    /// Wrap an object so reads are untracked and writes are rejected.
    pub fn readonly(&self, value: impl Into<Value>) -> Result<Reactive> {
        self.wrap(value.into(), ProxyKind::Readonly)
    }

    fn wrap(&self, value: Value, kind: ProxyKind) -> Result<Reactive> {
        match value {
            Value::Object(raw) => Ok(self.proxy(raw, kind)),
            Value::Reactive(existing)
                if existing.kind() == kind && existing.runtime().ptr_eq(self) =>
            {
                Ok(existing)
            }
            // A readonly view stays readonly.
            Value::Reactive(existing) if existing.kind() == ProxyKind::Readonly => Ok(existing),
            Value::Reactive(existing) => Ok(self.proxy(existing.to_raw(), kind)),
            other => Err(Error::InvalidTarget { kind: other.kind() }),
        }
    }

    pub(crate) fn proxy(&self, raw: Object, kind: ProxyKind) -> Reactive {
        self.inner.proxies.get_or_create(self, raw, kind)
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Number of effects depending on `key` of `target`.
    pub fn dependent_count(&self, target: &Object, key: &str) -> usize {
        self.inner
            .targets
            .lock()
            .dependent_count(target, &TrackKey::from(key))
    }

    /// Number of live objects with at least one tracked key.
    pub fn tracked_targets(&self) -> usize {
        self.inner.targets.lock().live_targets()
    }

    /// Number of wrappers handed out that are still alive.
    pub fn live_wrappers(&self) -> usize {
        self.inner.proxies.live()
    }

    /// Drop dependency entries of objects that have been collected.
    ///
    /// This also happens on its own as new objects are tracked. Returns how
    /// many targets were removed.
    pub fn purge(&self) -> usize {
        let removed = self.inner.targets.lock().purge();
        if removed > 0 {
            debug!(removed, "purged collected targets");
        }
        removed
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("depth", &self.inner.active.depth())
            .field("tracked_targets", &self.tracked_targets())
            .finish()
    }
}
