//! Reactive Context
//!
//! The reactive context tracks which effect is currently running, so reads
//! can be attributed to it.
//!
//! # Implementation
//!
//! Each runtime owns one stack of running effects per thread. Entering a run
//! pushes the effect on the calling thread's stack; the returned guard pops
//! it when dropped. The top of that stack is the active effect, so a read on
//! one thread is never attributed to an effect running on another. Nested
//! runs (an effect triggered by a write made inside another effect) push on
//! top, and once they finish the outer effect is active again, so its
//! remaining reads are still attributed to it.
//!
//! Popping happens in `Drop`, which keeps the stack balanced even if an
//! effect panics.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::error::{Error, Result};

use super::effect::{Effect, EffectId};

type EffectStack = SmallVec<[Effect; 4]>;

/// Effects currently running on one runtime, per thread.
#[derive(Debug, Default)]
pub(crate) struct ActiveStack {
    threads: Mutex<HashMap<ThreadId, EffectStack>>,
}

impl ActiveStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The innermost effect running on the calling thread, if any.
    pub(crate) fn current(&self) -> Option<Effect> {
        self.threads
            .lock()
            .get(&thread::current().id())
            .and_then(|stack| stack.last().cloned())
    }

    /// Number of runs currently nested on the calling thread.
    pub(crate) fn depth(&self) -> usize {
        self.threads
            .lock()
            .get(&thread::current().id())
            .map_or(0, |stack| stack.len())
    }

    fn pop(&self) -> Option<Effect> {
        let mut threads = self.threads.lock();
        let id = thread::current().id();
        let stack = threads.get_mut(&id)?;
        let popped = stack.pop();
        if stack.is_empty() {
            threads.remove(&id);
        }
        popped
    }
}

/// Guard that keeps an effect active until dropped.
pub(crate) struct ReactiveContext<'a> {
    stack: &'a ActiveStack,
    effect_id: EffectId,
}

impl<'a> ReactiveContext<'a> {
    /// Make `effect` the active effect of `stack` on the calling thread.
    ///
    /// Fails without pushing if the stack is already `limit` runs deep.
    pub(crate) fn enter(
        stack: &'a ActiveStack,
        effect: &Effect,
        limit: Option<usize>,
    ) -> Result<Self> {
        let mut threads = stack.threads.lock();
        let effects = threads.entry(thread::current().id()).or_default();
        if let Some(limit) = limit {
            if effects.len() >= limit {
                return Err(Error::RunDepthExceeded { limit });
            }
        }
        effects.push(effect.clone());

        Ok(Self {
            stack,
            effect_id: effect.id(),
        })
    }
}

impl Drop for ReactiveContext<'_> {
    fn drop(&mut self) {
        let popped = self.stack.pop();

        // Guards are scoped, so they always unwind in push order.
        if let Some(effect) = popped {
            debug_assert_eq!(
                effect.id(),
                self.effect_id,
                "ReactiveContext mismatch: expected {:?}, got {:?}",
                self.effect_id,
                effect.id()
            );
        }
    }
}
