//! Dummy encoding of raw table columns into a dense feature matrix.

use std::collections::BTreeSet;

use ndarray::Array2;

/// One selected column: either its parsed numbers or its categorical levels.
pub(super) enum Column {
    Numeric(Vec<f64>),
    Categorical { values: Vec<String>, levels: Vec<String> },
}

impl Column {
    /// Numeric when every value parses as a number, categorical otherwise.
    pub(super) fn build(raw: Vec<String>) -> Self {
        let parsed: Option<Vec<f64>> = raw.iter().map(|v| v.parse::<f64>().ok()).collect();
        match parsed {
            Some(numbers) => Column::Numeric(numbers),
            None => {
                let levels: BTreeSet<String> = raw.iter().cloned().collect();
                Column::Categorical {
                    values: raw,
                    levels: levels.into_iter().collect(),
                }
            }
        }
    }

    fn width(&self) -> usize {
        match self {
            Column::Numeric(_) => 1,
            Column::Categorical { levels, .. } => levels.len(),
        }
    }
}

/// Numeric columns first, then the indicator columns, mirroring the usual
/// dummy-encoding layout.
pub(super) fn encode(columns: Vec<Column>, rows: usize) -> Array2<f64> {
    let width: usize = columns.iter().map(Column::width).sum();
    let mut features = Array2::<f64>::zeros((rows, width));

    let (numeric, categorical): (Vec<_>, Vec<_>) = columns
        .into_iter()
        .partition(|c| matches!(c, Column::Numeric(_)));

    let mut offset = 0;
    for column in numeric.into_iter().chain(categorical) {
        match column {
            Column::Numeric(values) => {
                for (r, v) in values.into_iter().enumerate() {
                    features[[r, offset]] = v;
                }
                offset += 1;
            }
            Column::Categorical { values, levels } => {
                for (r, v) in values.iter().enumerate() {
                    if let Ok(level) = levels.binary_search(v) {
                        features[[r, offset + level]] = 1.0;
                    }
                }
                offset += levels.len();
            }
        }
    }

    features
}
