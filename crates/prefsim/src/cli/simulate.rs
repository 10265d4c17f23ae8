//! The `prefsim simulate` command: suggestion loop versus random baseline.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use prefsim_core::graph::load_transposed_csv;
use prefsim_core::{Config, RegretSummary, ReportWriter, Simulator, UserReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::types::{resolve_format, OutputFormat};

/// Arguments for the `simulate` command.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Item feature catalog, one item per column (defaults to `dataset.catalog` in the data dir)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Number of suggestion steps per user
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Steps after which the model is frozen and only exploited
    #[arg(long, conflicts_with = "no_burnin")]
    pub burnin: Option<usize>,

    /// Keep refitting the model on every step
    #[arg(long)]
    pub no_burnin: bool,

    /// Number of simulated users
    #[arg(short, long)]
    pub users: Option<usize>,

    /// Base seed; user `i` runs with `seed + i`
    #[arg(long)]
    pub seed: Option<u64>,

    /// Kernel bandwidth (gamma)
    #[arg(long)]
    pub bandwidth: Option<f64>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write only the mean cumulative regret curves
    #[arg(long)]
    pub summary: bool,
}

impl SimulateArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(horizon) = self.horizon {
            config.simulation.horizon = horizon;
        }
        if self.no_burnin {
            config.simulation.burnin = None;
        } else if let Some(burnin) = self.burnin {
            config.simulation.burnin = Some(burnin);
        }
        if let Some(users) = self.users {
            config.simulation.users = users;
        }
        if let Some(seed) = self.seed {
            config.general.seed = seed;
        }
        if let Some(bandwidth) = self.bandwidth {
            config.model.bandwidth = bandwidth;
        }
    }
}

/// Execute the simulate command.
pub fn execute(args: SimulateArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let catalog_path = match &args.catalog {
        Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned()),
        None => config.catalog_path(),
    };
    let catalog = load_transposed_csv(&catalog_path)?;
    tracing::info!(
        "Loaded {} items x {} features from {:?}",
        catalog.len(),
        catalog.dim(),
        catalog_path
    );

    let format = resolve_format(args.format, &config.output.format);
    let pretty = config.output.pretty;
    let users = config.simulation.users;
    let base_seed = config.general.seed;
    let simulator = Simulator::new(config, catalog)?;

    let progress = create_progress_bar(users as u64);
    let mut reports: Vec<UserReport> = Vec::with_capacity(users);
    for user in 0..users {
        let seed = base_seed.wrapping_add(user as u64);
        progress.set_message(format!("user {user}"));
        let report = simulator.run_user(user, seed)?;
        tracing::debug!(
            "User {}: suggestion regret {:.3}, baseline regret {:.3}",
            user,
            report.suggestion.regret.total(),
            report.baseline.regret.total()
        );
        reports.push(report);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let summary = RegretSummary::from_reports(&reports);
    if let Some(summary) = &summary {
        tracing::info!(
            "Mean cumulative regret over {} users: suggestion {:.3}, random {:.3}",
            summary.users,
            summary.final_suggestion(),
            summary.final_baseline()
        );
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = ReportWriter::new(sink, format, pretty);
    if args.summary {
        if let Some(summary) = &summary {
            writer.write(summary)?;
        }
    } else {
        writer.write_all(&reports)?;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Wrote {} records to {:?}", writer.written(), path);
    }
    Ok(())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SimulateArgs,
    }

    fn parse(argv: &[&str]) -> SimulateArgs {
        TestCli::parse_from(std::iter::once("prefsim").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = parse(&[]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.simulation.horizon, 100);
        assert_eq!(config.simulation.burnin, Some(20));
        assert_eq!(config.general.seed, 211);
        assert!(!args.summary);
    }

    #[test]
    fn test_overrides_apply() {
        let args = parse(&["--horizon", "30", "--burnin", "10", "-u", "5", "--seed", "7"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.simulation.horizon, 30);
        assert_eq!(config.simulation.burnin, Some(10));
        assert_eq!(config.simulation.users, 5);
        assert_eq!(config.general.seed, 7);
    }

    #[test]
    fn test_no_burnin_clears_burnin() {
        let args = parse(&["--no-burnin"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.simulation.burnin, None);
    }

    #[test]
    fn test_burnin_conflicts_with_no_burnin() {
        let result = TestCli::try_parse_from(["prefsim", "--burnin", "5", "--no-burnin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.csv");
        // 2 features x 12 items, one item per column
        let row = |f: fn(usize) -> f64| {
            (0..12).map(|i| f(i).to_string()).collect::<Vec<_>>().join(",")
        };
        std::fs::write(
            &catalog,
            format!(
                "{}\n{}\n",
                row(|i| i as f64 / 12.0),
                row(|i| ((i * 5) % 12) as f64 / 12.0)
            ),
        )
        .unwrap();
        let output = dir.path().join("out.json");

        let args = parse(&[
            "--catalog",
            catalog.to_str().unwrap(),
            "--horizon",
            "6",
            "--burnin",
            "5",
            "--users",
            "2",
            "--bandwidth",
            "1.0",
            "--summary",
            "--output",
            output.to_str().unwrap(),
        ]);
        execute(args, Config::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["users"], 2);
        assert_eq!(written["suggestion"].as_array().unwrap().len(), 6);
    }
}
