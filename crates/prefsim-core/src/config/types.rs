//! Sub-configuration structs with defaults matching the reference experiments.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the raw dataset files
    pub data_dir: PathBuf,

    /// Seed for the run's random generator
    pub seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./Data"),
            seed: 211,
        }
    }
}

/// Sequential suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of suggestion steps per simulated user
    pub horizon: usize,

    /// Step at which the fitted model is frozen. `None` refits at every step.
    pub burnin: Option<usize>,

    /// Standard deviation of the noise added to observed rewards
    pub reward_noise: f64,

    /// Standard deviation of the latent utility vector drawn per user
    pub theta_scale: f64,

    /// Number of simulated users (independent runs)
    pub users: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 100,
            burnin: Some(20),
            reward_noise: 1.0,
            theta_scale: 10.0,
            users: 1,
        }
    }
}

/// Preference model hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Gaussian kernel bandwidth `K` in `exp(-K/2 * ||x - y||^2)`
    pub bandwidth: f64,

    /// Noise scale of the probit likelihood
    pub sigma: f64,

    /// Newton step tolerance used by the suggestion loop
    pub tolerance: f64,

    /// Upper bound on Newton iterations per fit
    pub max_iterations: usize,

    /// Diagonal jitter added to the kernel covariance
    pub jitter: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bandwidth: 1.0 / 30.0,
            sigma: 1.0,
            tolerance: 1e-2,
            max_iterations: 100,
            jitter: 1e-6,
        }
    }
}

/// Dataset preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Share of rows assigned to the training partition
    pub train_fraction: f64,

    /// Truncate datasets to this many rows (all rows when unset)
    pub max_rows: Option<usize>,

    /// Item feature catalog used by `simulate`, relative to `general.data_dir`
    pub catalog: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.6,
            max_rows: None,
            catalog: "Vt.csv".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl"
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}
