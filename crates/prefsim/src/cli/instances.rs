//! The `prefsim instances` command: regression tables as instance preferences.

use clap::Args;
use prefsim_core::graph::{reindex, InstanceSet};
use prefsim_core::{Config, ReportWriter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Arguments for the `instances` command.
#[derive(Args, Debug)]
pub struct InstancesArgs {
    /// Set name (abalone, housing, machine, pyrim, r_wpbc, triazines)
    #[arg(required = true, value_parser = parse_set)]
    pub name: InstanceSet,

    /// Directory holding `<name>.data` and `<name>.domain` (defaults to `general.data_dir`)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep only the first N rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Instances drawn for the training batch
    #[arg(long, default_value = "200")]
    pub batch: usize,

    /// Seed for drawing the batch
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the batch's reindexed preferences as JSON to this file
    #[arg(long)]
    pub pairs: Option<PathBuf>,
}

fn parse_set(name: &str) -> Result<InstanceSet, String> {
    InstanceSet::from_name(name).map_err(|e| e.to_string())
}

/// Summary printed to stdout.
#[derive(Debug, Serialize)]
pub struct InstancesSummary {
    pub dataset: String,
    pub target: String,
    pub rows: usize,
    pub dim: usize,
    pub batch: usize,
    pub pairs: usize,
}

/// Execute the instances command.
pub fn execute(args: InstancesArgs, config: Config) -> anyhow::Result<()> {
    let data_dir = match &args.data_dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned()),
        None => config.data_dir(),
    };
    let seed = args.seed.unwrap_or(config.general.seed);
    if args.batch < 2 {
        anyhow::bail!("--batch must be at least 2, got {}", args.batch);
    }

    let dataset = args.name.load(&data_dir, args.rows.or(config.dataset.max_rows))?;

    let mut rows: Vec<usize> = (0..dataset.len()).collect();
    rows.shuffle(&mut StdRng::seed_from_u64(seed));
    rows.truncate(args.batch);
    let graph = dataset.preferences(&rows);

    let summary = InstancesSummary {
        dataset: args.name.to_string(),
        target: args.name.target().to_string(),
        rows: dataset.len(),
        dim: dataset.dim(),
        batch: rows.len(),
        pairs: graph.len(),
    };
    tracing::info!(
        "{}: batch of {} instances, {} preferences",
        summary.dataset,
        summary.batch,
        summary.pairs
    );

    if let Some(path) = &args.pairs {
        let file = BufWriter::new(File::create(path)?);
        let mut writer = ReportWriter::new(file, prefsim_core::OutputFormat::Json, false);
        writer.write(&reindex(&graph))?;
        writer.flush()?;
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
        args: InstancesArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["prefsim", "machine"]).unwrap();
        assert_eq!(cli.args.name, InstanceSet::Machine);
        assert_eq!(cli.args.batch, 200);
    }

    #[test]
    fn test_execute_writes_batch_preferences() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pyrim.domain"), "a: continuous.\nactivity: continuous.\n").unwrap();
        std::fs::write(dir.path().join("pyrim.data"), "0.1,1\n0.2,2\n0.3,3\n0.4,3\n").unwrap();
        let pairs = dir.path().join("pairs.json");

        let cli = TestCli::try_parse_from([
            "prefsim",
            "pyrim",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--pairs",
            pairs.to_str().unwrap(),
        ])
        .unwrap();
        execute(cli.args, Config::default()).unwrap();

        let graph: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&pairs).unwrap()).unwrap();
        // Six row pairs, one tie between the two rows with activity 3
        assert_eq!(graph["pairs"].as_array().unwrap().len(), 5);
        assert_eq!(graph["ids"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_batch_of_one_is_rejected() {
        let cli = TestCli::try_parse_from(["prefsim", "pyrim", "--batch", "1"]).unwrap();
        assert!(execute(cli.args, Config::default()).is_err());
    }
}
