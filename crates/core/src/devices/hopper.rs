//! Device input buffers
//!
//! A hopper queues ingredients waiting to be processed, in arrival order. Its
//! [`CapacityPolicy`] decides how many it may hold; pushing onto a full hopper
//! evicts the oldest entry so the newest one is always kept.

use crate::core_types::Ingredient;
use std::collections::VecDeque;
use tracing::debug;

/// How many ingredients a hopper may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// At most this many (never less than one)
    AtMost(usize),
    Unbounded,
}

impl CapacityPolicy {
    /// Whether holding `count` items respects this policy
    #[inline]
    pub fn allows(self, count: usize) -> bool {
        match self {
            CapacityPolicy::AtMost(max) => count <= max.max(1),
            CapacityPolicy::Unbounded => true,
        }
    }
}

/// Bounded FIFO of ingredients with oldest-first eviction
#[derive(Debug, Clone)]
pub struct Hopper {
    items: VecDeque<Ingredient>,
    policy: CapacityPolicy,
}

impl Hopper {
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            items: VecDeque::new(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the current item count respects the policy
    pub fn is_valid_number_of_items(&self) -> bool {
        self.policy.allows(self.items.len())
    }

    /// Queue `ingredient`, evicting the oldest entry if the hopper is full
    ///
    /// The evicted ingredient is returned terminated.
    pub fn push(&mut self, ingredient: Ingredient) -> Option<Ingredient> {
        let evicted = if self.policy.allows(self.items.len() + 1) {
            None
        } else {
            self.items.pop_front().map(|mut oldest| {
                debug!(name = %oldest.name(), "hopper full, evicting oldest ingredient");
                oldest.terminate();
                oldest
            })
        };
        self.items.push_back(ingredient);
        evicted
    }

    /// Take every queued ingredient, oldest first
    pub fn drain(&mut self) -> Vec<Ingredient> {
        self.items.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Queued ingredients, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.items.iter()
    }
}
