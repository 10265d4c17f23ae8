//! Sushi preference data: user attributes plus one total order per user.

use std::path::Path;

use ndarray::Array2;

use crate::error::DatasetResult;
use crate::graph::edges::all_edges;
use crate::types::{ItemId, PreferenceDataset};

use super::{parse_error, read_file};

/// User attribute file shared by both sushi variants.
const USER_FILE: &str = "sushi3.udata";

/// Parse the `.order` file: one header line, then `<id> <len> <item>...`.
fn read_orders(path: &Path) -> DatasetResult<Vec<Vec<ItemId>>> {
    let content = read_file(path)?;
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, line)| {
            line.split_whitespace()
                .skip(2)
                .map(|tok| {
                    tok.parse::<ItemId>()
                        .map_err(|_| parse_error(path, i + 1, format!("bad item id {tok:?}")))
                })
                .collect()
        })
        .collect()
}

/// Parse the tab-separated user file, dropping the leading user id column.
fn read_users(path: &Path) -> DatasetResult<Vec<Vec<f64>>> {
    let content = read_file(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, line)| {
            line.split('\t')
                .skip(1)
                .map(|tok| {
                    tok.trim()
                        .parse::<f64>()
                        .map_err(|_| parse_error(path, i + 1, format!("bad attribute {tok:?}")))
                })
                .collect()
        })
        .collect()
}

pub(super) fn load(data_dir: &Path, order_file: &str) -> DatasetResult<PreferenceDataset> {
    let users_path = data_dir.join(USER_FILE);
    let orders_path = data_dir.join(order_file);

    let users = read_users(&users_path)?;
    let orders = read_orders(&orders_path)?;

    let rows = users.len().min(orders.len());
    let width = users.first().map(Vec::len).unwrap_or(0);

    let mut features = Array2::<f64>::zeros((rows, width));
    let mut graphs = Vec::with_capacity(rows);
    let mut labels = Vec::with_capacity(rows);

    for (r, (attrs, order)) in users.iter().zip(&orders).enumerate() {
        if attrs.len() != width {
            return Err(parse_error(
                &users_path,
                r + 1,
                format!("expected {width} attributes, found {}", attrs.len()),
            ));
        }
        for (c, &v) in attrs.iter().enumerate() {
            features[[r, c]] = v;
        }

        let graph = all_edges(order);
        let top = graph
            .top()
            .ok_or_else(|| parse_error(&orders_path, r + 2, "order has fewer than two items"))?;
        graphs.push(graph);
        labels.push(top);
    }

    Ok(PreferenceDataset {
        features,
        graphs,
        labels,
    })
}
