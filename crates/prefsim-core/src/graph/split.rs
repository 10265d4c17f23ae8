//! Random train/test partition with per-partition min-max rescaling.

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::PreferenceDataset;

/// Share of rows used for training in the reference experiments.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.6;

/// Rescale each column to `[0, 1]` using the column's own min and max.
///
/// Constant columns map to 0.
pub fn min_max_rescale(features: &mut Array2<f64>) {
    for mut column in features.axis_iter_mut(Axis(1)) {
        let (min, max) = column
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let range = max - min;
        let scale = if range > 0.0 { range } else { 1.0 };
        column.mapv_inplace(|x| (x - min) / scale);
    }
}

fn subset(dataset: &PreferenceDataset, rows: &[usize]) -> PreferenceDataset {
    let mut features = dataset.features.select(Axis(0), rows);
    min_max_rescale(&mut features);
    PreferenceDataset {
        features,
        graphs: rows.iter().map(|&i| dataset.graphs[i].clone()).collect(),
        labels: rows.iter().map(|&i| dataset.labels[i]).collect(),
    }
}

/// Shuffle the rows and split them at `floor(train_fraction * n)`.
///
/// The training and test feature tables are each rescaled with their own
/// column statistics; no statistics are shared between the two.
pub fn train_test_split<R: Rng + ?Sized>(
    dataset: &PreferenceDataset,
    train_fraction: f64,
    rng: &mut R,
) -> (PreferenceDataset, PreferenceDataset) {
    let n = dataset.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let cut = ((train_fraction * n as f64).floor() as usize).min(n);
    let (train_rows, test_rows) = order.split_at(cut);

    tracing::debug!(
        "Split {} rows into {} train / {} test",
        n,
        train_rows.len(),
        test_rows.len()
    );

    (subset(dataset, train_rows), subset(dataset, test_rows))
}
