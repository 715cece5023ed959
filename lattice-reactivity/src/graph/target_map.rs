//! Target Map
//!
//! The two-level index from observed object to property key to [`Dep`].
//!
//! Objects are keyed by identity and held weakly. A weak handle keeps the
//! allocation (not the properties) alive, so an [`ObjectId`] present in the
//! map cannot be reused by a different object. Entries whose object has died
//! are unreachable by lookups and are swept out as the map grows.

use std::collections::HashMap;

use crate::reactive::Effect;
use crate::value::{Object, ObjectId, WeakObject};

use super::dep::{Dep, TrackKey};

/// Smallest map size at which a sweep of dead targets is attempted.
const MIN_SWEEP_LEN: usize = 32;

/// Dependencies recorded against one target object.
#[derive(Debug)]
struct TargetDeps {
    target: WeakObject,
    keys: HashMap<TrackKey, Dep>,
}

/// Object identity -> key -> dependent effects.
#[derive(Debug)]
pub struct TargetMap {
    targets: HashMap<ObjectId, TargetDeps>,
    /// Size at which the next insertion sweeps dead targets.
    sweep_at: usize,
}

impl Default for TargetMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetMap {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
            sweep_at: MIN_SWEEP_LEN,
        }
    }

    /// Record that `effect` depends on `key` of `target`.
    ///
    /// Creates intermediate entries as needed. Returns `false` if the edge
    /// already existed.
    pub fn track(&mut self, target: &Object, key: TrackKey, effect: &Effect) -> bool {
        let id = target.id();
        if !self.targets.contains_key(&id) && self.targets.len() >= self.sweep_at {
            self.purge();
            self.sweep_at = (self.targets.len() * 2).max(MIN_SWEEP_LEN);
        }

        let entry = self.targets.entry(id).or_insert_with(|| TargetDeps {
            target: target.downgrade(),
            keys: HashMap::new(),
        });
        debug_assert!(entry.target.refers_to(target));

        entry.keys.entry(key).or_default().insert(effect.clone())
    }

    /// Snapshot of the effects depending on `key` of `target`.
    ///
    /// Never creates entries. `None` means nothing was ever tracked there.
    pub fn dependents(&self, target: &Object, key: &TrackKey) -> Option<Vec<Effect>> {
        self.targets
            .get(&target.id())
            .and_then(|entry| entry.keys.get(key))
            .map(Dep::snapshot)
    }

    /// Number of effects depending on `key` of `target`.
    pub fn dependent_count(&self, target: &Object, key: &TrackKey) -> usize {
        self.targets
            .get(&target.id())
            .and_then(|entry| entry.keys.get(key))
            .map_or(0, Dep::len)
    }

    /// Number of targets whose object is still alive.
    pub fn live_targets(&self) -> usize {
        self.targets
            .values()
            .filter(|entry| entry.target.is_alive())
            .count()
    }

    /// Drop the entries of every target that has been collected.
    ///
    /// Returns how many targets were removed.
    pub fn purge(&mut self) -> usize {
        let before = self.targets.len();
        self.targets.retain(|_, entry| entry.target.is_alive());
        before - self.targets.len()
    }

    /// Total number of entries, including dead ones not yet purged.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
