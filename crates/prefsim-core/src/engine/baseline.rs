//! Uniform-random policy with the same reward and regret accounting.

use rand::Rng;
use rand_distr::Distribution;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::types::{ItemCatalog, ItemId};

use super::pool::CandidatePool;
use super::regret::{best_achievable, RegretTrace};
use super::{gaussian, SimulatedUser};

/// Outcome of the random policy for one user.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineRun {
    pub items: Vec<ItemId>,
    pub rewards: Vec<f64>,
    pub regret: RegretTrace,
}

/// Show `horizon` distinct items picked uniformly at random.
pub fn random_baseline<R: Rng + ?Sized>(
    catalog: &ItemCatalog,
    user: &SimulatedUser,
    horizon: usize,
    reward_noise: f64,
    rng: &mut R,
) -> Result<BaselineRun> {
    let noise = gaussian(reward_noise, "simulation.reward_noise")?;
    let mut pool = CandidatePool::full(catalog.len());
    let mut items = Vec::with_capacity(horizon);
    let mut rewards = Vec::with_capacity(horizon);
    let mut regret = RegretTrace::with_capacity(horizon);

    for t in 0..horizon {
        let item = pool.choose(rng).ok_or(EngineError::PoolExhausted(t))?;
        let reward = user.utility(catalog.item(item)) + noise.sample(rng);
        regret.record(best_achievable(user, catalog, pool.as_slice()), reward);
        pool.remove(item)?;
        items.push(item);
        rewards.push(reward);
    }

    tracing::debug!("Random baseline: cumulative regret {:.3}", regret.total());
    Ok(BaselineRun {
        items,
        rewards,
        regret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, PrefsimError};
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_baseline_shapes() {
        let catalog = ItemCatalog::new(Array2::from_shape_fn((8, 2), |(i, j)| (i + j) as f64));
        let user = SimulatedUser::new(array![1.0, 0.5]);
        let run = random_baseline(&catalog, &user, 8, 1.0, &mut StdRng::seed_from_u64(5)).unwrap();

        let mut items = run.items.clone();
        items.sort_unstable();
        assert_eq!(items, (0..8).collect::<Vec<_>>());
        assert_eq!(run.regret.len(), 8);
    }

    #[test]
    fn test_baseline_expected_regret_is_non_negative() {
        let catalog = ItemCatalog::new(Array2::from_shape_fn((6, 1), |(i, _)| i as f64));
        let user = SimulatedUser::new(array![1.0]);
        let mut rng = StdRng::seed_from_u64(42311);

        let runs = 400;
        let mut mean_first_step = 0.0;
        for _ in 0..runs {
            let run = random_baseline(&catalog, &user, 3, 1.0, &mut rng).unwrap();
            mean_first_step += run.regret.instantaneous()[0] / runs as f64;
        }
        // Noiseless expectation is 5 - 2.5
        assert!(mean_first_step > 2.0 && mean_first_step < 3.0, "{mean_first_step}");
    }

    #[test]
    fn test_baseline_rejects_negative_noise() {
        let catalog = ItemCatalog::new(Array2::zeros((4, 1)));
        let user = SimulatedUser::new(array![1.0]);
        let err = random_baseline(&catalog, &user, 2, -1.0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PrefsimError::Config(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_baseline_rejects_long_horizon() {
        let catalog = ItemCatalog::new(Array2::zeros((2, 1)));
        let user = SimulatedUser::new(array![1.0]);
        let err = random_baseline(&catalog, &user, 3, 0.0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PrefsimError::Engine(EngineError::PoolExhausted(2))));
    }
}
