//! prefsim core - preference-graph construction and sequential suggestion.
//!
//! Simulates a user with a hidden linear utility over item features, shows
//! them one unseen item per step, learns from the noisy pairwise preferences
//! their rewards imply, and measures cumulative regret against an oracle.
//!
//! # Architecture
//!
//! ```text
//! raw dataset → graph (pairs, labels) → model (MAP, Σ⁻¹) → kernel (scores) → engine (loop, regret)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prefsim_core::{Config, Simulator};
//! use rand::SeedableRng;
//!
//! let config = Config::load()?;
//! let catalog = prefsim_core::graph::load_transposed_csv(&config.catalog_path())?;
//! let simulator = Simulator::new(config, catalog)?;
//! let report = simulator.run_user(0, 211)?;
//! println!("regret: {}", report.suggestion.regret.total());
//! ```

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod kernel;
pub mod math;
pub mod model;
pub mod output;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use engine::{SimulatedUser, SimulationRun, SuggestionEngine};
pub use error::{ConfigError, DatasetError, EngineError, ModelError, PredictError, PrefsimError, Result};
pub use graph::{DatasetKind, InstanceSet, ReindexedGraph};
pub use kernel::{GaussianKernel, KernelPredictor};
pub use model::{LaplaceLearner, PreferenceLearner, Posterior};
pub use output::{OutputFormat, RegretSummary, ReportWriter, UserReport};
pub use types::{ItemCatalog, ItemId, PreferenceDataset, PreferenceGraph, PreferencePair};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs both policies for simulated users over one item catalog.
pub struct Simulator {
    config: Config,
    catalog: ItemCatalog,
}

impl Simulator {
    /// Validate the configuration against the catalog.
    pub fn new(config: Config, catalog: ItemCatalog) -> Result<Self> {
        config.validate()?;
        if config.simulation.horizon > catalog.len() {
            return Err(ConfigError::ValidationError(format!(
                "simulation.horizon ({}) exceeds the catalog size ({})",
                config.simulation.horizon,
                catalog.len()
            ))
            .into());
        }
        tracing::debug!("Initializing prefsim v{}", VERSION);
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Draw a user from `seed` and run the suggestion loop, then the random
    /// baseline on the same user.
    pub fn run_user(&self, user: usize, seed: u64) -> Result<UserReport> {
        let sim = &self.config.simulation;
        let mut rng = StdRng::seed_from_u64(seed);
        let simulated = SimulatedUser::draw(self.catalog.dim(), sim.theta_scale, &mut rng)?;

        let learner = LaplaceLearner::new(&self.config.model);
        let predictor = KernelPredictor::new(learner.kernel());
        let mut engine = SuggestionEngine::new(&self.catalog, learner, predictor, sim);
        let suggestion = engine.run(&simulated, &mut rng)?;

        let baseline = engine::random_baseline(
            &self.catalog,
            &simulated,
            sim.horizon,
            sim.reward_noise,
            &mut rng,
        )?;

        Ok(UserReport {
            user,
            seed,
            suggestion,
            baseline,
        })
    }
}
