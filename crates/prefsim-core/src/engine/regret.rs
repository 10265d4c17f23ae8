//! Regret against an oracle that knows the user's true utility.

use serde::Serialize;

use crate::types::{ItemCatalog, ItemId};

use super::SimulatedUser;

/// Noiseless utility of the best item still in `pool`.
///
/// Must be taken before the step's selection is removed.
pub fn best_achievable(user: &SimulatedUser, catalog: &ItemCatalog, pool: &[ItemId]) -> f64 {
    pool.iter()
        .map(|&i| user.utility(catalog.item(i)))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Per-step regret and its running sum, one entry per time step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegretTrace {
    instantaneous: Vec<f64>,
    cumulative: Vec<f64>,
}

impl RegretTrace {
    pub fn with_capacity(horizon: usize) -> Self {
        Self {
            instantaneous: Vec::with_capacity(horizon),
            cumulative: Vec::with_capacity(horizon),
        }
    }

    /// Append `best - reward` and return it.
    ///
    /// Negative when reward noise lifts the observed reward above the best
    /// noiseless value.
    pub fn record(&mut self, best: f64, reward: f64) -> f64 {
        let regret = best - reward;
        let total = self.total() + regret;
        self.instantaneous.push(regret);
        self.cumulative.push(total);
        regret
    }

    pub fn len(&self) -> usize {
        self.instantaneous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instantaneous.is_empty()
    }

    /// Cumulative regret so far (0 before the first step).
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn instantaneous(&self) -> &[f64] {
        &self.instantaneous
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}
