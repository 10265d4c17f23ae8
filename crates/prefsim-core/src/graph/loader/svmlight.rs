//! Sparse svmlight classification files reduced to label rankings.

use std::collections::BTreeSet;
use std::path::Path;

use ndarray::Array2;

use crate::error::DatasetResult;
use crate::graph::edges::label_preferences;
use crate::types::{ItemId, PreferenceDataset};

use super::{parse_error, read_file};

/// One parsed line: raw class label and `(zero-based column, value)` entries.
type SparseRow = (i64, Vec<(usize, f64)>);

fn parse_line(path: &Path, line_no: usize, line: &str, n_features: usize) -> DatasetResult<SparseRow> {
    let mut tokens = line.split_whitespace();
    let label_tok = tokens
        .next()
        .ok_or_else(|| parse_error(path, line_no, "missing label"))?;
    let label = label_tok
        .parse::<f64>()
        .map_err(|_| parse_error(path, line_no, format!("bad label {label_tok:?}")))? as i64;

    let mut entries = Vec::new();
    for tok in tokens {
        if tok.starts_with('#') {
            break;
        }
        let (idx, value) = tok
            .split_once(':')
            .ok_or_else(|| parse_error(path, line_no, format!("bad entry {tok:?}")))?;
        let idx: usize = idx
            .parse()
            .map_err(|_| parse_error(path, line_no, format!("bad index {idx:?}")))?;
        if idx == 0 || idx > n_features {
            return Err(parse_error(
                path,
                line_no,
                format!("index {idx} outside 1..={n_features}"),
            ));
        }
        let value: f64 = value
            .parse()
            .map_err(|_| parse_error(path, line_no, format!("bad value {value:?}")))?;
        entries.push((idx - 1, value));
    }

    Ok((label, entries))
}

pub(super) fn load(
    path: &Path,
    n_features: usize,
    label_offset: usize,
) -> DatasetResult<PreferenceDataset> {
    let content = read_file(path)?;

    let mut rows = Vec::new();
    let mut labels: Vec<ItemId> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (raw, entries) = parse_line(path, i + 1, line, n_features)?;
        let label = usize::try_from(raw - label_offset as i64)
            .map_err(|_| parse_error(path, i + 1, format!("label {raw} below {label_offset}")))?;
        rows.push(entries);
        labels.push(label);
    }

    let mut features = Array2::<f64>::zeros((rows.len(), n_features));
    for (r, entries) in rows.iter().enumerate() {
        for &(c, v) in entries {
            features[[r, c]] = v;
        }
    }

    // Every class present anywhere in the file is a rival label.
    let label_set: Vec<ItemId> = labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let graphs = labels
        .iter()
        .map(|&c| label_preferences(c, &label_set))
        .collect();

    Ok(PreferenceDataset {
        features,
        graphs,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.scale-0");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_one_based_labels() {
        let (_dir, path) = write("1 1:0.5 3:-1\n3 2:1 # comment\n2 \n");
        let ds = load(&path, 3, 1).unwrap();

        assert_eq!(ds.labels, vec![0, 2, 1]);
        assert_eq!(ds.features.row(0).to_vec(), vec![0.5, 0.0, -1.0]);
        assert_eq!(ds.features.row(2).to_vec(), vec![0.0, 0.0, 0.0]);

        let pairs: Vec<(usize, usize)> = ds.graphs[1].iter().map(|p| (p.winner, p.loser)).collect();
        assert_eq!(pairs, vec![(2, 0), (2, 1)]);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let (_dir, path) = write("1 4:1\n");
        let err = load(&path, 3, 1).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_rejects_label_below_offset() {
        let (_dir, path) = write("0 1:1\n");
        assert!(load(&path, 3, 1).is_err());
    }
}
