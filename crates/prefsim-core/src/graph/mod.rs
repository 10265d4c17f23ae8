//! Preference graph construction.
//!
//! Turns total rankings, comparison strings and class labels into lists of
//! `(winner, loser)` pairs, rewrites them over contiguous indices, and
//! prepares train/test partitions of whole datasets.

pub mod comparison;
pub mod edges;
pub mod loader;
pub mod reindex;
pub mod split;

pub use comparison::{comparison_pairs, decode_letters, parse_groups};
pub use edges::{all_edges, label_preferences, linear_edges};
pub use loader::{load_transposed_csv, DatasetKind, InstanceDataset, InstanceSet, SvmlightSet};
pub use reindex::{reindex, ReindexedGraph};
pub use split::{min_max_rescale, train_test_split, DEFAULT_TRAIN_FRACTION};
