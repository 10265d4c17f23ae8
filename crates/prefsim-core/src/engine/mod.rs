//! Sequential suggestion against a simulated user.
//!
//! A user is a latent utility vector `theta`; showing item `x` yields the
//! noisy reward `theta · x + ε`. The engine picks one unseen item per step,
//! turns the rewards observed so far into preference pairs, and records
//! regret against the best item still available.

mod baseline;
mod pool;
pub mod regret;
mod suggestion;

pub use baseline::{random_baseline, BaselineRun};
pub use pool::CandidatePool;
pub use regret::{best_achievable, RegretTrace};
pub use suggestion::{update_preferences, Phase, SimulationRun, SuggestionEngine};

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::ConfigError;

/// Steps picked uniformly at random before any model is fitted.
pub const COLD_START_STEPS: usize = 3;

/// Gaussian sampler for `N(0, std_dev)`.
///
/// Negative, NaN and infinite deviations are rejected.
pub(crate) fn gaussian(std_dev: f64, what: &str) -> Result<Normal<f64>, ConfigError> {
    if !(std_dev >= 0.0 && std_dev.is_finite()) {
        return Err(ConfigError::ValidationError(format!(
            "{what} must be a finite value >= 0, got {std_dev}"
        )));
    }
    Normal::new(0.0, std_dev)
        .map_err(|e| ConfigError::ValidationError(format!("{what} = {std_dev}: {e}")))
}

/// A simulated user: the hidden utility vector behind every reward.
#[derive(Debug, Clone)]
pub struct SimulatedUser {
    theta: Array1<f64>,
}

impl SimulatedUser {
    pub fn new(theta: Array1<f64>) -> Self {
        Self { theta }
    }

    /// Draw `theta ~ N(0, scale²·I)` of the given dimension.
    pub fn draw<R: Rng + ?Sized>(dim: usize, scale: f64, rng: &mut R) -> Result<Self, ConfigError> {
        let normal = gaussian(scale, "simulation.theta_scale")?;
        let theta = Array1::from_shape_fn(dim, |_| normal.sample(rng));
        Ok(Self { theta })
    }

    pub fn theta(&self) -> ArrayView1<'_, f64> {
        self.theta.view()
    }

    /// Noiseless utility of an item.
    pub fn utility(&self, features: ArrayView1<f64>) -> f64 {
        self.theta.dot(&features)
    }
}
