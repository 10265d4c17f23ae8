//! Pairwise edges from total rankings and from class labels.

use crate::types::{ItemId, PreferenceGraph, PreferencePair};

/// Every pair of positions `i < j` yields `(ranking[i], ranking[j])`.
///
/// Quadratic: a ranking of length L produces L·(L−1)/2 pairs.
pub fn all_edges(ranking: &[ItemId]) -> PreferenceGraph {
    let n = ranking.len();
    let mut graph = PreferenceGraph::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, &winner) in ranking.iter().enumerate() {
        for &loser in &ranking[i + 1..] {
            graph.push(PreferencePair::new(winner, loser));
        }
    }
    graph
}

/// Consecutive pairs only: `(ranking[i], ranking[i+1])`.
pub fn linear_edges(ranking: &[ItemId]) -> PreferenceGraph {
    ranking
        .windows(2)
        .map(|w| PreferencePair::new(w[0], w[1]))
        .collect()
}

/// Label-ranking reduction: the true class beats every other label.
///
/// `labels` is the set of distinct labels present in the dataset, sorted.
pub fn label_preferences(label: ItemId, labels: &[ItemId]) -> PreferenceGraph {
    labels
        .iter()
        .filter(|&&other| other != label)
        .map(|&other| PreferencePair::new(label, other))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(g: &PreferenceGraph) -> Vec<(ItemId, ItemId)> {
        g.iter().map(|p| (p.winner, p.loser)).collect()
    }

    #[test]
    fn test_all_edges_small_ranking() {
        let g = all_edges(&[5, 2, 9]);
        assert_eq!(pairs(&g), vec![(5, 2), (5, 9), (2, 9)]);
    }

    #[test]
    fn test_all_edges_degenerate() {
        assert!(all_edges(&[]).is_empty());
        assert!(all_edges(&[4]).is_empty());
    }

    #[test]
    fn test_all_edges_count() {
        let ranking: Vec<ItemId> = (0..10).rev().collect();
        assert_eq!(all_edges(&ranking).len(), 45);
    }

    #[test]
    fn test_linear_edges() {
        let g = linear_edges(&[3, 1, 4, 0]);
        assert_eq!(pairs(&g), vec![(3, 1), (1, 4), (4, 0)]);
        assert!(linear_edges(&[7]).is_empty());
    }

    #[test]
    fn test_label_preferences() {
        let g = label_preferences(2, &[0, 1, 2, 3]);
        assert_eq!(pairs(&g), vec![(2, 0), (2, 1), (2, 3)]);
    }
}
