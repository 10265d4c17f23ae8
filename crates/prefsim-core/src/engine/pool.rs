//! The set of items not yet shown to the simulated user.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::EngineError;
use crate::types::ItemId;

/// Ordered candidate pool. Shrinks by one per step; removed items never return.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    items: Vec<ItemId>,
}

impl CandidatePool {
    /// Pool holding every item `0..n`.
    pub fn full(n: usize) -> Self {
        Self {
            items: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }

    /// Item at a position in the pool's order.
    pub fn get(&self, position: usize) -> Option<ItemId> {
        self.items.get(position).copied()
    }

    /// Uniform random draw from the remaining items.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ItemId> {
        self.items.choose(rng).copied()
    }

    /// Remove `item`, keeping the order of the others.
    pub fn remove(&mut self, item: ItemId) -> Result<(), EngineError> {
        let position = self
            .items
            .iter()
            .position(|&i| i == item)
            .ok_or(EngineError::NotInPool(item))?;
        self.items.remove(position);
        Ok(())
    }
}
