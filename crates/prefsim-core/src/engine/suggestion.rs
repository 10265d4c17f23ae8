//! The three-phase suggestion loop.
//!
//! - cold start (`t < 3`): uniform random pick, no fit
//! - training (`3 <= t < burnin`): refit on all pairs so far, then predict
//! - exploitation (`t >= burnin`): predict with the last fit

use ndarray::{s, Array2};
use rand::Rng;
use rand_distr::Distribution;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{EngineError, Result};
use crate::kernel::KernelPredictor;
use crate::model::{PreferenceLearner, Posterior};
use crate::types::{ItemCatalog, ItemId, PreferenceGraph, PreferencePair};

use super::pool::CandidatePool;
use super::regret::{best_achievable, RegretTrace};
use super::{gaussian, SimulatedUser, COLD_START_STEPS};

/// Policy active at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ColdStart,
    Training,
    Exploitation,
}

/// Everything one simulated user produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    /// Item selected at each step
    pub items: Vec<ItemId>,

    /// Observed (noisy) reward at each step
    pub rewards: Vec<f64>,

    /// Preferences between observations, indexed by time step
    pub pairs: PreferenceGraph,

    /// Regret against the best remaining item
    pub regret: RegretTrace,

    /// Phase of each step
    pub phases: Vec<Phase>,

    /// Number of model fits performed
    pub refits: usize,
}

/// Compare the reward at `t` against the rewards at `0..t-1` (exclusive).
///
/// The observation at `t - 1` is not compared. Ties go to the newer
/// observation.
pub fn update_preferences(t: usize, rewards: &[f64], pairs: &mut PreferenceGraph) {
    if t == 0 {
        return;
    }
    for i in 0..t - 1 {
        if rewards[i] > rewards[t] {
            pairs.push(PreferencePair::new(i, t));
        } else {
            pairs.push(PreferencePair::new(t, i));
        }
    }
}

/// Instances and posterior of the most recent fit.
struct FittedState {
    instances: Array2<f64>,
    posterior: Posterior,
}

/// Drives one simulated user through `horizon` suggestion steps.
pub struct SuggestionEngine<'a, L> {
    catalog: &'a ItemCatalog,
    learner: L,
    predictor: KernelPredictor,
    horizon: usize,
    burnin: Option<usize>,
    reward_noise: f64,
    fitted: Option<FittedState>,
    refits: usize,
}

impl<'a, L: PreferenceLearner> SuggestionEngine<'a, L> {
    pub fn new(
        catalog: &'a ItemCatalog,
        learner: L,
        predictor: KernelPredictor,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            catalog,
            learner,
            predictor,
            horizon: config.horizon,
            burnin: config.burnin,
            reward_noise: config.reward_noise,
            fitted: None,
            refits: 0,
        }
    }

    pub fn learner(&self) -> &L {
        &self.learner
    }

    fn phase(&self, t: usize) -> Phase {
        if t < COLD_START_STEPS {
            Phase::ColdStart
        } else if self.burnin.map_or(true, |b| t < b) {
            Phase::Training
        } else {
            Phase::Exploitation
        }
    }

    /// Pick the item for step `t` under the active phase.
    fn select<R: Rng + ?Sized>(
        &mut self,
        t: usize,
        phase: Phase,
        history: &Array2<f64>,
        pairs: &PreferenceGraph,
        pool: &CandidatePool,
        rng: &mut R,
    ) -> Result<ItemId> {
        if phase == Phase::ColdStart {
            return Ok(pool.choose(rng).ok_or(EngineError::PoolExhausted(t))?);
        }

        if phase == Phase::Training {
            let instances = history.slice(s![..t, ..]).to_owned();
            let posterior = self.learner.fit(instances.view(), pairs.as_slice())?;
            self.refits += 1;
            self.fitted = Some(FittedState {
                instances,
                posterior,
            });
        }

        let fitted = self.fitted.as_ref().ok_or(EngineError::NoFittedModel(t))?;
        let candidates = self.catalog.select(pool.as_slice());
        let prediction = self.predictor.predict(
            fitted.instances.view(),
            fitted.posterior.mode.view(),
            fitted.posterior.inverse_covariance.view(),
            candidates.view(),
        )?;

        Ok(pool
            .get(prediction.index)
            .ok_or(EngineError::PoolExhausted(t))?)
    }

    /// Run the full horizon for `user`.
    ///
    /// Any failure (fit, prediction, pool) aborts the run.
    pub fn run<R: Rng + ?Sized>(&mut self, user: &SimulatedUser, rng: &mut R) -> Result<SimulationRun> {
        let horizon = self.horizon;
        if horizon > self.catalog.len() {
            return Err(EngineError::PoolExhausted(self.catalog.len()).into());
        }

        let noise = gaussian(self.reward_noise, "simulation.reward_noise")?;
        let mut pool = CandidatePool::full(self.catalog.len());
        let mut history = Array2::<f64>::zeros((horizon, self.catalog.dim()));
        let mut items = Vec::with_capacity(horizon);
        let mut rewards = Vec::with_capacity(horizon);
        let mut phases = Vec::with_capacity(horizon);
        let mut pairs = PreferenceGraph::with_capacity(horizon * horizon.saturating_sub(1) / 2);
        let mut regret = RegretTrace::with_capacity(horizon);

        self.fitted = None;
        self.refits = 0;

        tracing::info!(
            "Starting suggestion run: {} items, horizon {}, burnin {:?}",
            self.catalog.len(),
            horizon,
            self.burnin
        );

        for t in 0..horizon {
            let phase = self.phase(t);
            if phase == Phase::Exploitation && phases.last() == Some(&Phase::Training) {
                tracing::info!("Freezing model at step {t} after {} fits", self.refits);
            }

            let item = self.select(t, phase, &history, &pairs, &pool, rng)?;
            let reward = user.utility(self.catalog.item(item)) + noise.sample(rng);
            let best = best_achievable(user, self.catalog, pool.as_slice());
            let step_regret = regret.record(best, reward);
            pool.remove(item)?;
            history.row_mut(t).assign(&self.catalog.item(item));
            items.push(item);
            rewards.push(reward);
            phases.push(phase);
            update_preferences(t, &rewards, &mut pairs);

            tracing::debug!(
                step = t,
                ?phase,
                item,
                reward,
                regret = step_regret,
                "suggestion step"
            );
        }

        tracing::info!(
            "Run finished: cumulative regret {:.3}, {} pairs, {} fits",
            regret.total(),
            pairs.len(),
            self.refits
        );

        Ok(SimulationRun {
            items,
            rewards,
            pairs,
            regret,
            phases,
            refits: self.refits,
        })
    }
}
