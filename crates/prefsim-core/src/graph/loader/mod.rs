//! Dataset loaders producing features, preference graphs and labels.
//!
//! Each supported dataset is a [`DatasetKind`] variant, resolved once from
//! its name. All variants share one contract: read the raw files under a
//! data directory and return an aligned [`PreferenceDataset`].

mod catalog;
mod encoding;
mod instance;
mod ranking_table;
mod sushi;
mod svmlight;

pub use catalog::load_transposed_csv;
pub use instance::{InstanceDataset, InstanceSet};
pub use ranking_table::ColumnSelection;

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, DatasetError, DatasetResult};
use crate::types::PreferenceDataset;

/// Multi-class datasets stored in svmlight format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvmlightSet {
    Dna,
    Letter,
    Mnist,
    Satimage,
    Segment,
    Usps,
    Waveform,
}

impl SvmlightSet {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dna => "dna",
            Self::Letter => "letter",
            Self::Mnist => "mnist",
            Self::Satimage => "satimage",
            Self::Segment => "segment",
            Self::Usps => "usps",
            Self::Waveform => "waveform",
        }
    }

    /// Dense width of the feature vectors.
    pub fn n_features(self) -> usize {
        match self {
            Self::Dna => 180,
            Self::Letter => 16,
            Self::Mnist => 772,
            Self::Satimage => 36,
            Self::Segment => 19,
            Self::Usps => 256,
            Self::Waveform => 40,
        }
    }

    /// Offset subtracted from raw labels to make them zero-based.
    fn label_offset(self) -> usize {
        match self {
            Self::Waveform => 0,
            _ => 1,
        }
    }
}

/// Every dataset the harness knows how to turn into preference graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// Sushi preferences over 10 items
    SushiA,
    /// Sushi preferences over 100 items
    SushiB,
    /// Top-7 movie rankings
    Movies,
    /// German election rankings, 2005
    German2005,
    /// German election rankings, 2009
    German2009,
    /// Algae frequency rankings
    Algae,
    /// Classification data reduced to label rankings
    Svmlight(SvmlightSet),
}

impl DatasetKind {
    /// All supported datasets, in display order.
    pub const ALL: [DatasetKind; 13] = [
        Self::SushiA,
        Self::SushiB,
        Self::Movies,
        Self::German2005,
        Self::German2009,
        Self::Algae,
        Self::Svmlight(SvmlightSet::Dna),
        Self::Svmlight(SvmlightSet::Letter),
        Self::Svmlight(SvmlightSet::Mnist),
        Self::Svmlight(SvmlightSet::Satimage),
        Self::Svmlight(SvmlightSet::Segment),
        Self::Svmlight(SvmlightSet::Usps),
        Self::Svmlight(SvmlightSet::Waveform),
    ];

    /// Resolve a dataset name; unknown names are a configuration error.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigError::UnknownDataset(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SushiA => "sushia",
            Self::SushiB => "sushib",
            Self::Movies => "movies",
            Self::German2005 => "german2005",
            Self::German2009 => "german2009",
            Self::Algae => "algae",
            Self::Svmlight(set) => set.name(),
        }
    }

    /// Number of distinct labels (ranked items or classes).
    pub fn n_labels(self) -> usize {
        match self {
            Self::SushiA => 10,
            Self::SushiB => 100,
            Self::Movies | Self::Algae => 7,
            Self::German2005 | Self::German2009 => 5,
            Self::Svmlight(SvmlightSet::Dna) | Self::Svmlight(SvmlightSet::Waveform) => 3,
            Self::Svmlight(SvmlightSet::Letter) => 26,
            Self::Svmlight(SvmlightSet::Mnist) | Self::Svmlight(SvmlightSet::Usps) => 10,
            Self::Svmlight(SvmlightSet::Satimage) => 6,
            Self::Svmlight(SvmlightSet::Segment) => 7,
        }
    }

    /// Read the dataset from `data_dir`, keeping at most `max_rows` rows.
    pub fn load(self, data_dir: &Path, max_rows: Option<usize>) -> DatasetResult<PreferenceDataset> {
        tracing::info!("Loading dataset {} from {:?}", self.name(), data_dir);

        let mut dataset = match self {
            Self::SushiA => sushi::load(data_dir, "sushi3a.5000.10.order")?,
            Self::SushiB => sushi::load(data_dir, "sushi3b.5000.10.order")?,
            Self::Movies => ranking_table::load(
                &data_dir.join("top7movies.txt"),
                &ColumnSelection::Named(&["gender", "age", "latitude", "longitude", "occupations"]),
            )?,
            Self::German2005 | Self::German2009 => ranking_table::load(
                &data_dir.join(format!("{}.txt", self.name())),
                &ColumnSelection::Excluding(&["State", "Region", "ranking"]),
            )?,
            Self::Algae => {
                ranking_table::load(&data_dir.join("algae.txt"), &ColumnSelection::DropLast(2))?
            }
            Self::Svmlight(set) => svmlight::load(
                &data_dir.join(format!("{}.scale-0", set.name())),
                set.n_features(),
                set.label_offset(),
            )?,
        };

        if let Some(n) = max_rows {
            dataset.truncate(n);
        }
        if dataset.is_empty() {
            return Err(DatasetError::Empty(self.name().to_string()));
        }

        tracing::info!(
            "Dataset {}: {} rows x {} features, {} preference pairs",
            self.name(),
            dataset.len(),
            dataset.dim(),
            dataset.graphs.iter().map(|g| g.len()).sum::<usize>(),
        );
        Ok(dataset)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Read a whole dataset file, attaching the path to I/O failures.
pub(crate) fn read_file(path: &Path) -> DatasetResult<String> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Open a comma-delimited file with trimmed fields and ragged rows allowed,
/// so callers can report field-count mismatches with their own context.
pub(crate) fn open_csv(path: &Path, has_headers: bool) -> DatasetResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))
}

/// 1-based line on which a record starts.
pub(crate) fn record_line(record: &csv::StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

/// Map a csv failure to a read error (I/O) or a parse error with its line.
pub(crate) fn csv_error(path: &Path, err: csv::Error) -> DatasetError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DatasetError::Read {
            path: path.to_path_buf(),
            source,
        },
        _ => parse_error(path, line, message),
    }
}

/// Build a parse error for a 1-based line number.
pub(crate) fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> DatasetError {
    DatasetError::Parse {
        path: PathBuf::from(path),
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trip() {
        for kind in DatasetKind::ALL {
            assert_eq!(DatasetKind::from_name(kind.name()).unwrap(), kind);
        }
        assert_eq!(
            "waveform".parse::<DatasetKind>().unwrap(),
            DatasetKind::Svmlight(SvmlightSet::Waveform)
        );
    }

    #[test]
    fn test_unknown_dataset_is_config_error() {
        let err = DatasetKind::from_name("iris").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDataset(ref n) if n == "iris"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetKind::Algae.load(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("algae.txt"));
    }

    #[test]
    fn test_load_truncates_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("waveform.scale-0"),
            "0 1:0.5\n1 2:0.25\n2 1:1\n0 3:1\n",
        )
        .unwrap();

        let ds = DatasetKind::Svmlight(SvmlightSet::Waveform)
            .load(dir.path(), Some(2))
            .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dim(), 40);
        assert_eq!(ds.labels, vec![0, 1]);
        // Label set comes from the whole file, so each row still beats two labels.
        assert_eq!(ds.graphs[0].len(), 2);
    }
}
