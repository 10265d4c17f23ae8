//! Property tests for the suggestion loop with a stand-in learner.

use ndarray::{Array1, Array2, ArrayView2};
use prefsim_core::config::SimulationConfig;
use prefsim_core::engine::{random_baseline, Phase, SimulatedUser};
use prefsim_core::{
    GaussianKernel, ItemCatalog, KernelPredictor, ModelError, Posterior, PreferenceLearner,
    PreferencePair, SuggestionEngine,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Scores instances by their first feature so predictions vary between steps.
struct FirstFeatureLearner {
    fits: usize,
}

impl PreferenceLearner for FirstFeatureLearner {
    fn fit(&mut self, instances: ArrayView2<f64>, _pairs: &[PreferencePair]) -> Result<Posterior, ModelError> {
        self.fits += 1;
        let n = instances.nrows();
        Ok(Posterior {
            mode: instances.column(0).to_owned(),
            inverse_covariance: Array2::eye(n),
            iterations: 1,
        })
    }
}

fn catalog(n: usize, seed: u64) -> ItemCatalog {
    let mut x = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    ItemCatalog::new(Array2::from_shape_fn((n, 3), |_| {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (x >> 11) as f64 / (1u64 << 53) as f64
    }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Items are distinct, so the pool ends at n - T, and the phases follow the schedule.
    #[test]
    fn pool_shrinks_one_per_step(
        n in 5usize..30,
        horizon_frac in 0.1f64..1.0,
        burnin in proptest::option::of(4usize..12),
        seed in any::<u64>(),
    ) {
        let horizon = ((n as f64 * horizon_frac) as usize).max(1);
        let catalog = catalog(n, seed);
        let config = SimulationConfig { horizon, burnin, ..SimulationConfig::default() };
        let mut engine = SuggestionEngine::new(
            &catalog,
            FirstFeatureLearner { fits: 0 },
            KernelPredictor::new(GaussianKernel::new(1.0)),
            &config,
        );
        let user = SimulatedUser::new(Array1::from(vec![1.0, -1.0, 0.5]));
        let run = engine.run(&user, &mut StdRng::seed_from_u64(seed)).unwrap();

        let mut items = run.items.clone();
        items.sort_unstable();
        items.dedup();
        prop_assert_eq!(items.len(), horizon);
        prop_assert_eq!(n - items.len(), n - horizon);

        let training_steps = run.phases.iter().filter(|&&p| p == Phase::Training).count();
        prop_assert_eq!(run.refits, training_steps);
        prop_assert_eq!(engine.learner().fits, training_steps);
        for (t, phase) in run.phases.iter().enumerate() {
            let expected = if t < 3 {
                Phase::ColdStart
            } else if burnin.map_or(true, |b| t < b) {
                Phase::Training
            } else {
                Phase::Exploitation
            };
            prop_assert_eq!(*phase, expected);
        }
    }

    /// The noiseless random policy never has negative regret.
    #[test]
    fn noiseless_baseline_regret_is_non_negative(n in 2usize..25, seed in any::<u64>()) {
        let catalog = catalog(n, seed);
        let user = SimulatedUser::new(Array1::from(vec![0.5, 2.0, -1.0]));
        let run = random_baseline(&catalog, &user, n, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(run.regret.instantaneous().iter().all(|&r| r >= -1e-12));
    }
}
