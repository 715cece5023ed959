//! Effect Implementation
//!
//! An Effect is a side-effecting computation that re-runs whenever data it
//! read during a previous run is written.
//!
//! # How Effects Work
//!
//! 1. [`Runtime::effect`](super::Runtime::effect) creates the effect and runs
//!    it immediately to establish initial dependencies.
//!
//! 2. While it runs, the effect is the runtime's active effect, so every
//!    tracked read registers it in the dependency graph.
//!
//! 3. When a tracked property is written, the effect runs again,
//!    synchronously, before the write returns.
//!
//! # Limitations
//!
//! Dependencies are never cleared between runs and effects cannot be
//! disposed. An effect keeps firing for every key it has ever read for as
//! long as the target object is alive.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Unique identifier for an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

impl EffectId {
    /// Generate a new unique effect ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across runtimes.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

struct EffectInner {
    id: EffectId,
    run: Box<dyn Fn() + Send + Sync>,
    run_count: AtomicUsize,
}

/// A handle to a registered unit of work.
///
/// Cloning the handle shares the effect; equality and hashing use its
/// identity.
///
/// # Example
///
/// ```rust
/// use lattice_reactivity::Runtime;
///
/// let runtime = Runtime::new();
/// let state = runtime.reactive(serde_json::json!({ "count": 0 })).unwrap();
///
/// let reader = state.clone();
/// let effect = runtime
///     .effect(move || {
///         reader.get("count");
///     })
///     .unwrap();
///
/// state.set("count", 1).unwrap();
/// assert_eq!(effect.run_count(), 2);
/// ```
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectInner>,
}

impl Effect {
    /// Create an effect around `run` without running it.
    ///
    /// Use [`Runtime::run`](super::Runtime::run) to run it with tracking.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(EffectInner {
                id: EffectId::new(),
                run: Box::new(run),
                run_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Get the effect's unique ID.
    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }

    /// Whether both handles refer to the same effect.
    pub fn ptr_eq(&self, other: &Effect) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Call the wrapped function. The caller sets up tracking.
    pub(crate) fn invoke(&self) {
        self.inner.run_count.fetch_add(1, Ordering::SeqCst);
        (self.inner.run)();
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Effect {}

impl Hash for Effect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.inner.id)
            .field("run_count", &self.run_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn effect_ids_are_unique() {
        let id1 = EffectId::new();
        let id2 = EffectId::new();
        let id3 = EffectId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn new_effect_does_not_run() {
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();

        let effect = Effect::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(effect.run_count(), 0);
    }

    #[test]
    fn invoke_calls_function_and_counts() {
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();

        let effect = Effect::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        effect.invoke();
        effect.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(effect.run_count(), 2);
    }

    #[test]
    fn effect_clone_shares_state() {
        let effect1 = Effect::new(|| {});
        let effect2 = effect1.clone();

        assert_eq!(effect1, effect2);
        assert!(effect1.ptr_eq(&effect2));

        effect1.invoke();
        assert_eq!(effect2.run_count(), 1);
    }

    #[test]
    fn distinct_effects_are_not_equal() {
        assert_ne!(Effect::new(|| {}), Effect::new(|| {}));
    }
}
