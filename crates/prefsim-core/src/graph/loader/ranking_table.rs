//! Comma-delimited tables whose last column is a comparison string.
//!
//! Used by the movies, german election and algae datasets. Feature columns
//! are picked per dataset; numeric columns are copied, other columns are
//! one-hot encoded (one indicator column per distinct value).

use std::path::Path;

use crate::error::DatasetResult;
use crate::graph::comparison::comparison_pairs;
use crate::types::{PreferenceDataset, PreferenceGraph};

use super::encoding::{encode, Column};
use super::{csv_error, open_csv, parse_error, record_line};

/// Which header columns become user features.
#[derive(Debug, Clone, Copy)]
pub enum ColumnSelection<'a> {
    /// Exactly these columns, in this order
    Named(&'a [&'a str]),
    /// Every column except these
    Excluding(&'a [&'a str]),
    /// Every column except the last `n`
    DropLast(usize),
}

impl ColumnSelection<'_> {
    fn resolve(&self, header: &[&str], path: &Path) -> DatasetResult<Vec<usize>> {
        match *self {
            Self::Named(names) => names
                .iter()
                .map(|name| {
                    header
                        .iter()
                        .position(|h| h == name)
                        .ok_or_else(|| parse_error(path, 1, format!("missing column {name:?}")))
                })
                .collect(),
            Self::Excluding(names) => Ok((0..header.len())
                .filter(|&i| !names.contains(&header[i]))
                .collect()),
            Self::DropLast(n) => Ok((0..header.len().saturating_sub(n)).collect()),
        }
    }
}

/// Load a ranking table: header record, then one record per user.
pub(super) fn load(path: &Path, selection: &ColumnSelection<'_>) -> DatasetResult<PreferenceDataset> {
    let mut reader = open_csv(path, true)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    if headers.is_empty() {
        return Err(parse_error(path, 1, "missing header"));
    }
    let header: Vec<&str> = headers.iter().collect();
    let selected = selection.resolve(&header, path)?;

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); selected.len()];
    let mut graphs = Vec::new();
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line_no = record_line(&record);
        if record.len() != header.len() {
            return Err(parse_error(
                path,
                line_no,
                format!("expected {} fields, found {}", header.len(), record.len()),
            ));
        }

        let ranking = &record[record.len() - 1];
        let graph: PreferenceGraph = comparison_pairs(ranking)
            .map_err(|e| parse_error(path, line_no, e.to_string()))?;
        let top = graph
            .top()
            .ok_or_else(|| parse_error(path, line_no, format!("ranking {ranking:?} has no preferences")))?;

        for (column, &idx) in raw_columns.iter_mut().zip(&selected) {
            column.push(record[idx].to_string());
        }
        graphs.push(graph);
        labels.push(top);
    }

    let columns: Vec<Column> = raw_columns.into_iter().map(Column::build).collect();
    let features = encode(columns, labels.len());

    Ok(PreferenceDataset {
        features,
        graphs,
        labels,
    })
}
