//! The `prefsim dataset` command: build and inspect preference graphs.

use clap::Args;
use prefsim_core::graph::{reindex, train_test_split};
use prefsim_core::{Config, DatasetKind, PreferenceDataset, ReindexedGraph, ReportWriter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Arguments for the `dataset` command.
#[derive(Args, Debug)]
pub struct DatasetArgs {
    /// Dataset name (sushia, sushib, movies, german2005, german2009, algae, dna, letter,
    /// mnist, satimage, segment, usps, waveform)
    #[arg(required = true, value_parser = parse_kind)]
    pub name: DatasetKind,

    /// Directory holding the raw dataset files (defaults to `general.data_dir`)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep only the first N rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of rows used for training
    #[arg(long)]
    pub train_fraction: Option<f64>,

    /// Write the reindexed graph of every row as JSON Lines to this file
    #[arg(long)]
    pub pairs: Option<PathBuf>,
}

fn parse_kind(name: &str) -> Result<DatasetKind, String> {
    DatasetKind::from_name(&name.to_lowercase()).map_err(|e| e.to_string())
}

/// Shape of one partition.
#[derive(Debug, Serialize)]
pub struct PartitionSummary {
    pub rows: usize,
    pub pairs: usize,
    /// Label → number of rows carrying it
    pub labels: BTreeMap<usize, usize>,
}

impl PartitionSummary {
    fn of(dataset: &PreferenceDataset) -> Self {
        let mut labels = BTreeMap::new();
        for &label in &dataset.labels {
            *labels.entry(label).or_insert(0) += 1;
        }
        Self {
            rows: dataset.len(),
            pairs: dataset.graphs.iter().map(|g| g.len()).sum(),
            labels,
        }
    }
}

/// Summary printed to stdout.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub dataset: String,
    pub dim: usize,
    pub n_labels: usize,
    pub seed: u64,
    pub train: PartitionSummary,
    pub test: PartitionSummary,
}

/// One line of the `--pairs` output.
#[derive(Debug, Serialize)]
struct GraphRecord<'a> {
    split: &'a str,
    row: usize,
    label: usize,
    #[serde(flatten)]
    graph: ReindexedGraph,
}

/// Execute the dataset command.
pub fn execute(args: DatasetArgs, config: Config) -> anyhow::Result<()> {
    let data_dir = match &args.data_dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned()),
        None => config.data_dir(),
    };
    let max_rows = args.rows.or(config.dataset.max_rows);
    let train_fraction = args.train_fraction.unwrap_or(config.dataset.train_fraction);
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        anyhow::bail!("--train-fraction must be between 0.0 and 1.0 (exclusive), got {train_fraction}");
    }
    let seed = args.seed.unwrap_or(config.general.seed);

    let dataset = args.name.load(&data_dir, max_rows)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let (train, test) = train_test_split(&dataset, train_fraction, &mut rng);

    let summary = DatasetSummary {
        dataset: args.name.to_string(),
        dim: dataset.dim(),
        n_labels: args.name.n_labels(),
        seed,
        train: PartitionSummary::of(&train),
        test: PartitionSummary::of(&test),
    };
    tracing::info!(
        "{}: {} train / {} test rows",
        summary.dataset,
        summary.train.rows,
        summary.test.rows
    );

    if let Some(path) = &args.pairs {
        let file = BufWriter::new(File::create(path)?);
        let mut writer = ReportWriter::new(file, prefsim_core::OutputFormat::JsonLines, false);
        for (split, part) in [("train", &train), ("test", &test)] {
            for (row, (graph, &label)) in part.graphs.iter().zip(&part.labels).enumerate() {
                writer.write(&GraphRecord {
                    split,
                    row,
                    label,
                    graph: reindex(graph),
                })?;
            }
        }
        writer.flush()?;
        tracing::info!("Wrote {} graphs to {:?}", writer.written(), path);
    }

    if config.output.pretty {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DatasetArgs,
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let cli = TestCli::try_parse_from(["prefsim", "Waveform"]).unwrap();
        assert_eq!(cli.args.name, DatasetKind::from_name("waveform").unwrap());
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!(TestCli::try_parse_from(["prefsim", "iris"]).is_err());
    }

    #[test]
    fn test_execute_writes_reindexed_pairs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("waveform.scale-0"),
            "0 1:0.5 2:0.1\n1 1:0.2 3:0.7\n2 2:0.9\n1 1:0.4\n0 4:0.3\n",
        )
        .unwrap();
        let pairs = dir.path().join("pairs.jsonl");

        let cli = TestCli::try_parse_from([
            "prefsim",
            "waveform",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--train-fraction",
            "0.6",
            "--pairs",
            pairs.to_str().unwrap(),
        ])
        .unwrap();
        execute(cli.args, Config::default()).unwrap();

        let content = std::fs::read_to_string(&pairs).unwrap();
        let records: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 5);
        assert_eq!(records.iter().filter(|r| r["split"] == "train").count(), 3);
        // Three classes: each row prefers its own label over the other two
        for record in &records {
            assert_eq!(record["pairs"].as_array().unwrap().len(), 2);
            assert_eq!(record["ids"].as_array().unwrap().len(), 3);
        }
    }

    #[test]
    fn test_execute_rejects_bad_fraction() {
        for fraction in ["1.5", "1.0", "0.0"] {
            let cli =
                TestCli::try_parse_from(["prefsim", "dna", "--train-fraction", fraction]).unwrap();
            let err = execute(cli.args, Config::default()).unwrap_err();
            assert!(err.to_string().contains("exclusive"), "{err}");
        }
    }
}
