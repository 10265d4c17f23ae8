//! Core data types shared by the graph builder, the model and the engine.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an item (movie, product, sample, class label).
pub type ItemId = usize;

/// An ordered `(winner, loser)` pair: the winner's utility exceeds the loser's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PreferencePair {
    pub winner: ItemId,
    pub loser: ItemId,
}

impl PreferencePair {
    pub fn new(winner: ItemId, loser: ItemId) -> Self {
        Self { winner, loser }
    }
}

impl From<(ItemId, ItemId)> for PreferencePair {
    fn from((winner, loser): (ItemId, ItemId)) -> Self {
        Self { winner, loser }
    }
}

/// Append-only collection of preference pairs.
///
/// Duplicate pairs are kept: repeated evidence counts as evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceGraph {
    pairs: Vec<PreferencePair>,
}

impl PreferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, pair: PreferencePair) {
        self.pairs.push(pair);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PreferencePair> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[PreferencePair] {
        &self.pairs
    }

    /// Sorted distinct item ids referenced by at least one pair.
    pub fn nodes(&self) -> Vec<ItemId> {
        let set: BTreeSet<ItemId> = self
            .pairs
            .iter()
            .flat_map(|p| [p.winner, p.loser])
            .collect();
        set.into_iter().collect()
    }

    /// Winner of the first pair, used as the coarse label of ranking data.
    pub fn top(&self) -> Option<ItemId> {
        self.pairs.first().map(|p| p.winner)
    }
}

impl From<Vec<PreferencePair>> for PreferenceGraph {
    fn from(pairs: Vec<PreferencePair>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<PreferencePair> for PreferenceGraph {
    fn from_iter<I: IntoIterator<Item = PreferencePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl Extend<PreferencePair> for PreferenceGraph {
    fn extend<I: IntoIterator<Item = PreferencePair>>(&mut self, iter: I) {
        self.pairs.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PreferenceGraph {
    type Item = &'a PreferencePair;
    type IntoIter = std::slice::Iter<'a, PreferencePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Aligned feature rows, preference graphs and coarse labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceDataset {
    /// One feature row per user or sample
    pub features: Array2<f64>,

    /// One preference graph per row
    pub graphs: Vec<PreferenceGraph>,

    /// One label per row (top-ranked item or true class)
    pub labels: Vec<ItemId>,
}

impl PreferenceDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of feature columns.
    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len() {
            return;
        }
        self.features = self.features.slice(ndarray::s![..n, ..]).to_owned();
        self.graphs.truncate(n);
        self.labels.truncate(n);
    }
}

/// Feature table of the items a simulated user can be shown, one row per item.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    features: Array2<f64>,
}

impl ItemCatalog {
    pub fn new(features: Array2<f64>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }

    /// Number of features per item.
    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    pub fn item(&self, id: ItemId) -> ArrayView1<'_, f64> {
        self.features.row(id)
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Rows for `ids`, in the given order.
    pub fn select(&self, ids: &[ItemId]) -> Array2<f64> {
        self.features.select(ndarray::Axis(0), ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_graph_keeps_duplicates() {
        let mut g = PreferenceGraph::with_capacity(3);
        g.push(PreferencePair::new(1, 2));
        g.push(PreferencePair::new(1, 2));
        g.extend([PreferencePair::new(2, 7)]);
        assert_eq!(g.len(), 3);
        assert_eq!(g.nodes(), vec![1, 2, 7]);
        assert_eq!(g.top(), Some(1));
    }

    #[test]
    fn test_pair_serializes_with_names() {
        let json = serde_json::to_string(&PreferencePair::new(5, 2)).unwrap();
        assert_eq!(json, r#"{"winner":5,"loser":2}"#);
    }

    #[test]
    fn test_dataset_truncate() {
        let mut ds = PreferenceDataset {
            features: array![[1.0], [2.0], [3.0]],
            graphs: vec![PreferenceGraph::new(); 3],
            labels: vec![0, 1, 2],
        };
        ds.truncate(2);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features.nrows(), 2);
        ds.truncate(10);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_catalog_select_preserves_order() {
        let catalog = ItemCatalog::new(array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]);
        let rows = catalog.select(&[2, 0]);
        assert_eq!(rows, array![[4.0, 5.0], [0.0, 1.0]]);
        assert_eq!(catalog.item(1), array![2.0, 3.0]);
    }
}
