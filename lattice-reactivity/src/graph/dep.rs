//! Dependency sets and the keys they are filed under.

use std::fmt;

use indexmap::IndexSet;

use crate::reactive::Effect;

/// What a dependency was recorded against on a target object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackKey {
    /// A single property.
    Property(String),
    /// The object's key set, read by iteration and length queries.
    Iterate,
}

impl From<&str> for TrackKey {
    fn from(key: &str) -> Self {
        TrackKey::Property(key.to_owned())
    }
}

impl From<String> for TrackKey {
    fn from(key: String) -> Self {
        TrackKey::Property(key)
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKey::Property(key) => f.write_str(key),
            TrackKey::Iterate => f.write_str("<iterate>"),
        }
    }
}

/// The effects that depend on one (object, key) pair.
///
/// Each effect appears at most once; iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dep {
    effects: IndexSet<Effect>,
}

impl Dep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect. Returns `false` if it was already present.
    pub fn insert(&mut self, effect: Effect) -> bool {
        self.effects.insert(effect)
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Copy of the current members, in insertion order.
    ///
    /// Triggering iterates a snapshot so effects may track again while the
    /// set is being walked.
    pub fn snapshot(&self) -> Vec<Effect> {
        self.effects.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dep_deduplicates_effects() {
        let effect = Effect::new(|| {});
        let mut dep = Dep::new();

        assert!(dep.insert(effect.clone()));
        assert!(!dep.insert(effect.clone()));
        assert_eq!(dep.len(), 1);
        assert!(dep.contains(&effect));
    }

    #[test]
    fn dep_preserves_insertion_order() {
        let first = Effect::new(|| {});
        let second = Effect::new(|| {});
        let third = Effect::new(|| {});

        let mut dep = Dep::new();
        dep.insert(second.clone());
        dep.insert(first.clone());
        dep.insert(third.clone());
        dep.insert(second.clone());

        let ids: Vec<_> = dep.snapshot().iter().map(Effect::id).collect();
        assert_eq!(ids, vec![second.id(), first.id(), third.id()]);
    }

    #[test]
    fn track_key_display() {
        assert_eq!(TrackKey::from("count").to_string(), "count");
        assert_eq!(TrackKey::Iterate.to_string(), "<iterate>");
    }
}
