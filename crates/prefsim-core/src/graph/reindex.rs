//! Rewrite preference pairs over a contiguous index space.
//!
//! Covariance and kernel matrices are indexed by position `0..k`, so pairs
//! over sparse item ids are mapped through a bijection on the ids they use.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{ItemId, PreferenceGraph, PreferencePair};

/// Pairs rewritten over `0..ids.len()`, plus the sorted original ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReindexedGraph {
    /// Pairs over contiguous positions
    pub pairs: Vec<PreferencePair>,

    /// `ids[position]` is the original item id
    pub ids: Vec<ItemId>,
}

impl ReindexedGraph {
    /// Original item id at a contiguous position.
    pub fn original(&self, position: usize) -> Option<ItemId> {
        self.ids.get(position).copied()
    }

    /// Map the contiguous pairs back to original item ids.
    pub fn restore(&self) -> PreferenceGraph {
        self.pairs
            .iter()
            .map(|p| PreferencePair::new(self.ids[p.winner], self.ids[p.loser]))
            .collect()
    }

    /// Number of distinct items referenced.
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }
}

/// Build the id→position bijection over the referenced ids and rewrite the pairs.
pub fn reindex(graph: &PreferenceGraph) -> ReindexedGraph {
    let ids = graph.nodes();
    let position: HashMap<ItemId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let pairs = graph
        .iter()
        .map(|p| PreferencePair::new(position[&p.winner], position[&p.loser]))
        .collect();

    ReindexedGraph { pairs, ids }
}
