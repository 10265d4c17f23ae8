//! Preference learning from pairwise comparisons.
//!
//! The suggestion loop only needs two artifacts from a fitted model: the
//! posterior mode over training instances and the inverse prior covariance.
//! [`PreferenceLearner`] is that boundary; [`LaplaceLearner`] is the
//! Gaussian-process implementation used by default.

mod laplace;

pub use laplace::{LaplaceLearner, MapEstimate, PreferenceModel, DEFAULT_TOLERANCE};

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::ModelError;
use crate::types::PreferencePair;

/// Artifacts of one fit, sized by the number of training instances.
#[derive(Debug, Clone)]
pub struct Posterior {
    /// MAP estimate of each instance's latent utility
    pub mode: Array1<f64>,

    /// Inverse of the prior kernel covariance over the instances
    pub inverse_covariance: Array2<f64>,

    /// Newton iterations spent
    pub iterations: usize,
}

/// Fits a utility model from instance features and preference pairs.
///
/// Pairs index rows of `instances`. Implementations refit from scratch on
/// every call.
pub trait PreferenceLearner {
    fn fit(
        &mut self,
        instances: ArrayView2<f64>,
        pairs: &[PreferencePair],
    ) -> Result<Posterior, ModelError>;
}
