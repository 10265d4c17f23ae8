//! Regression tables used for instance preference learning.
//!
//! Each set is a headerless `<name>.data` file plus a `<name>.domain` file
//! naming one column per line (`name: type`). One column is the real-valued
//! target; the others become features. An instance beats another when its
//! target is higher.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ndarray::{Array1, Array2, Axis};

use crate::error::{ConfigError, DatasetError, DatasetResult};
use crate::graph::split::min_max_rescale;
use crate::types::{ItemId, PreferenceGraph, PreferencePair};

use super::encoding::{encode, Column};
use super::{csv_error, open_csv, parse_error, read_file, record_line};

/// Regression datasets read as instance tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSet {
    Abalone,
    Housing,
    Machine,
    Pyrim,
    RWpbc,
    Triazines,
}

impl InstanceSet {
    pub const ALL: [InstanceSet; 6] = [
        Self::Abalone,
        Self::Housing,
        Self::Machine,
        Self::Pyrim,
        Self::RWpbc,
        Self::Triazines,
    ];

    /// Resolve a set name; unknown names are a configuration error.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|set| set.name() == name)
            .ok_or_else(|| ConfigError::UnknownDataset(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Abalone => "abalone",
            Self::Housing => "housing",
            Self::Machine => "machine",
            Self::Pyrim => "pyrim",
            Self::RWpbc => "r_wpbc",
            Self::Triazines => "triazines",
        }
    }

    /// Column holding the value instances are ranked by.
    pub fn target(self) -> &'static str {
        match self {
            Self::Abalone => "rings",
            Self::Housing | Self::Machine => "class",
            Self::Pyrim | Self::Triazines => "activity",
            Self::RWpbc => "Time",
        }
    }

    /// Read `<name>.domain` and `<name>.data` from `data_dir`.
    ///
    /// Features and target are rescaled to `[0, 1]` over the whole file
    /// before keeping the first `max_rows` rows.
    pub fn load(self, data_dir: &Path, max_rows: Option<usize>) -> DatasetResult<InstanceDataset> {
        tracing::info!("Loading instance set {} from {:?}", self.name(), data_dir);

        let domain_path = data_dir.join(format!("{}.domain", self.name()));
        let columns = read_domain(&domain_path)?;
        let target = columns
            .iter()
            .position(|c| c == self.target())
            .ok_or_else(|| parse_error(&domain_path, 0, format!("no target column {:?}", self.target())))?;

        let data_path = data_dir.join(format!("{}.data", self.name()));
        let mut dataset = read_data(&data_path, &columns, target)?;
        dataset.truncate(max_rows.unwrap_or(usize::MAX));
        if dataset.is_empty() {
            return Err(DatasetError::Empty(self.name().to_string()));
        }

        tracing::info!(
            "Instance set {}: {} rows x {} features",
            self.name(),
            dataset.len(),
            dataset.dim()
        );
        Ok(dataset)
    }
}

impl fmt::Display for InstanceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstanceSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Feature rows with one scaled target value each.
#[derive(Debug, Clone)]
pub struct InstanceDataset {
    pub features: Array2<f64>,
    pub targets: Array1<f64>,
}

impl InstanceDataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len() {
            return;
        }
        self.features = self.features.slice(ndarray::s![..n, ..]).to_owned();
        self.targets = self.targets.slice(ndarray::s![..n]).to_owned();
    }

    /// Preferences among `rows`: each pair of rows with distinct targets
    /// yields one edge toward the higher target. Equal targets give no edge.
    pub fn preferences(&self, rows: &[ItemId]) -> PreferenceGraph {
        let mut graph = PreferenceGraph::new();
        for (i, &a) in rows.iter().enumerate() {
            for &b in &rows[i + 1..] {
                let (ta, tb) = (self.targets[a], self.targets[b]);
                if ta > tb {
                    graph.push(PreferencePair::new(a, b));
                } else if tb > ta {
                    graph.push(PreferencePair::new(b, a));
                }
            }
        }
        graph
    }
}

/// Column names from a domain file, whitespace removed.
fn read_domain(path: &Path) -> DatasetResult<Vec<String>> {
    let content = read_file(path)?;
    let columns: Vec<String> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            l.split(':')
                .next()
                .unwrap_or_default()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect()
        })
        .collect();
    if columns.is_empty() {
        return Err(parse_error(path, 1, "no columns declared"));
    }
    Ok(columns)
}

fn read_data(path: &Path, columns: &[String], target: usize) -> DatasetResult<InstanceDataset> {
    let mut reader = open_csv(path, false)?;

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
    let mut targets = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record_line(&record);
        if record.len() != columns.len() {
            return Err(parse_error(
                path,
                line,
                format!("expected {} fields, found {}", columns.len(), record.len()),
            ));
        }

        let value = &record[target];
        let value: f64 = value
            .parse()
            .map_err(|_| parse_error(path, line, format!("target {value:?} is not a number")))?;
        targets.push(value);
        for (column, field) in raw_columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let feature_columns: Vec<Column> = raw_columns
        .into_iter()
        .enumerate()
        .filter(|&(i, _)| i != target)
        .map(|(_, raw)| Column::build(raw))
        .collect();
    let mut features = encode(feature_columns, targets.len());
    min_max_rescale(&mut features);

    let mut targets = Array1::from(targets).insert_axis(Axis(1));
    min_max_rescale(&mut targets);

    Ok(InstanceDataset {
        features,
        targets: targets.remove_axis(Axis(1)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn write_set(domain: &str, data: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abalone.domain"), domain).unwrap();
        std::fs::write(dir.path().join("abalone.data"), data).unwrap();
        dir
    }

    #[test]
    fn test_load_moves_target_out_and_rescales() {
        let dir = write_set(
            "sex: M, F, I.\nlength: continuous.\nrings: continuous.\n",
            "M,0.5,15\nF,0.25,5\nI,0.75,10\n",
        );
        let ds = InstanceSet::Abalone.load(dir.path(), None).unwrap();

        // length, then sex=F, sex=I, sex=M
        assert_eq!(
            ds.features,
            array![[0.5, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 0.0], [1.0, 0.0, 1.0, 0.0]]
        );
        assert_eq!(ds.targets, array![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_max_rows_applies_after_scaling() {
        let dir = write_set("x:\nrings:\n", "0,1\n10,3\n5,2\n");
        let ds = InstanceSet::Abalone.load(dir.path(), Some(2)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features.column(0).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_missing_target_column_is_reported() {
        let dir = write_set("x:\ny:\n", "1,2\n");
        let err = InstanceSet::Abalone.load(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("rings"), "{err}");
    }

    #[test]
    fn test_non_numeric_target_is_fatal() {
        let dir = write_set("x:\nrings:\n", "1,2\n3,many\n");
        let err = InstanceSet::Abalone.load(dir.path(), None).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_preferences_follow_targets() {
        let ds = InstanceDataset {
            features: Array2::zeros((4, 1)),
            targets: array![0.2, 0.9, 0.2, 0.5],
        };
        let pairs: Vec<(usize, usize)> = ds
            .preferences(&[0, 1, 2, 3])
            .iter()
            .map(|p| (p.winner, p.loser))
            .collect();
        assert_eq!(pairs, vec![(1, 0), (3, 0), (1, 2), (1, 3), (3, 2)]);
    }

    #[test]
    fn test_names_round_trip() {
        for set in InstanceSet::ALL {
            assert_eq!(set.name().parse::<InstanceSet>().unwrap(), set);
        }
        assert!(InstanceSet::from_name("diabetes").is_err());
    }
}
