//! Item feature catalogs stored one feature per row, one item per column.

use std::path::Path;

use ndarray::Array2;

use crate::error::DatasetResult;
use crate::types::ItemCatalog;

use super::{csv_error, open_csv, parse_error, record_line};

/// Read a headerless comma-delimited matrix whose columns are items and
/// transpose it.
pub fn load_transposed_csv(path: &Path) -> DatasetResult<ItemCatalog> {
    let mut reader = open_csv(path, false)?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record_line(&record);
        let row = record
            .iter()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| parse_error(path, line, format!("bad number {tok:?}")))
            })
            .collect::<DatasetResult<Vec<f64>>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(parse_error(
                    path,
                    line,
                    format!("expected {} columns, found {}", first.len(), row.len()),
                ));
            }
        }
        rows.push(row);
    }

    let n_features = rows.len();
    let n_items = rows.first().map(Vec::len).unwrap_or(0);
    let features = Array2::from_shape_fn((n_items, n_features), |(item, f)| rows[f][item]);

    tracing::debug!("Loaded catalog {:?}: {} items x {} features", path, n_items, n_features);
    Ok(ItemCatalog::new(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;
    use ndarray::array;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Vt.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_transposes() {
        let (_dir, path) = write("1,2,3\n4,5,6\n");

        let catalog = load_transposed_csv(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.dim(), 2);
        assert_eq!(catalog.item(2), array![3.0, 6.0]);
    }

    #[test]
    fn test_quoted_and_padded_numbers() {
        let (_dir, path) = write("\"1.5\", 2 ,-3e-1\n4,\"5\",6\n");

        let catalog = load_transposed_csv(&path).unwrap();
        assert_eq!(catalog.item(0), array![1.5, 4.0]);
        assert_eq!(catalog.item(2), array![-0.3, 6.0]);
    }

    #[test]
    fn test_ragged_matrix_is_rejected() {
        let (_dir, path) = write("1,2,3\n4,5\n");
        let err = load_transposed_csv(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_bad_number_reports_line() {
        let (_dir, path) = write("1,2\n3,x\n");
        let err = load_transposed_csv(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load_transposed_csv(Path::new("/nonexistent/Vt.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }
}
