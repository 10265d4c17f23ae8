//! Gaussian-process preference learning with a probit likelihood.
//!
//! Latent utilities `f` over the training instances get a prior
//! `N(0, Σ)` with `Σ = k(X, X) + jitter·I`. Each pair `(w, l)` contributes
//! `Φ((f_w − f_l) / (√2 σ))`. The MAP estimate minimizes
//! `S(f) = −Σ ln Φ(z) + ½ fᵀ Σ⁻¹ f` by Newton-Raphson; the Hessian
//! `Σ⁻¹ + Λ` is positive definite, so each step is a Cholesky solve.

use std::f64::consts::{PI, SQRT_2};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use statrs::function::erf::erfc;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::kernel::GaussianKernel;
use crate::math::{cholesky, cholesky_inverse, cholesky_solve, max_abs};
use crate::types::PreferencePair;

use super::{PreferenceLearner, Posterior};

/// Newton step tolerance when the caller does not relax it.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Below this `z` the normal CDF underflows; use the asymptotic ratio.
const ASYMPTOTIC_Z: f64 = -30.0;

/// `φ(z) / Φ(z)` for the standard normal.
fn inverse_mills(z: f64) -> f64 {
    if z < ASYMPTOTIC_Z {
        return -z - 1.0 / z;
    }
    let pdf = (-0.5 * z * z).exp() / (2.0 * PI).sqrt();
    let cdf = 0.5 * erfc(-z / SQRT_2);
    pdf / cdf
}

/// Result of a MAP computation.
#[derive(Debug, Clone)]
pub struct MapEstimate {
    /// Posterior mode
    pub mode: Array1<f64>,

    /// Newton iterations performed
    pub iterations: usize,
}

/// A preference model bound to one training table and one set of pairs.
#[derive(Debug, Clone)]
pub struct PreferenceModel {
    pairs: Vec<PreferencePair>,
    sigma: f64,
    inverse_covariance: Array2<f64>,

    /// Stop when the largest Newton step component falls below this
    pub tolerance: f64,

    /// Give up after this many Newton steps
    pub max_iterations: usize,
}

impl PreferenceModel {
    /// Build the prior covariance over `instances` and invert it.
    pub fn new(
        instances: ArrayView2<f64>,
        pairs: &[PreferencePair],
        kernel: GaussianKernel,
        sigma: f64,
        jitter: f64,
    ) -> Result<Self, ModelError> {
        let n = instances.nrows();
        if let Some(p) = pairs.iter().find(|p| p.winner >= n || p.loser >= n) {
            return Err(ModelError::PairOutOfRange {
                winner: p.winner,
                loser: p.loser,
                instances: n,
            });
        }

        let mut covariance = kernel.matrix(instances, instances);
        for i in 0..n {
            covariance[[i, i]] += jitter;
        }
        let factor = cholesky(covariance.view()).map_err(|pivot| ModelError::NotPositiveDefinite {
            matrix: "prior covariance",
            pivot,
        })?;

        Ok(Self {
            pairs: pairs.to_vec(),
            sigma,
            inverse_covariance: cholesky_inverse(factor.view()),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: 100,
        })
    }

    /// Number of training instances.
    pub fn len(&self) -> usize {
        self.inverse_covariance.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inverse_covariance(&self) -> ArrayView2<'_, f64> {
        self.inverse_covariance.view()
    }

    /// Gradient and Hessian of the negative log posterior at `f`.
    fn derivatives(&self, f: ArrayView1<f64>) -> (Array1<f64>, Array2<f64>) {
        let scale = 1.0 / (SQRT_2 * self.sigma);

        let mut gradient = self.inverse_covariance.dot(&f);
        let mut hessian = self.inverse_covariance.clone();

        for p in &self.pairs {
            let (w, l) = (p.winner, p.loser);
            let z = scale * (f[w] - f[l]);
            let r = inverse_mills(z);

            gradient[w] -= scale * r;
            gradient[l] += scale * r;

            let curvature = scale * scale * (r * r + z * r);
            hessian[[w, w]] += curvature;
            hessian[[l, l]] += curvature;
            hessian[[w, l]] -= curvature;
            hessian[[l, w]] -= curvature;
        }

        (gradient, hessian)
    }

    /// Posterior mode by Newton-Raphson from `initial`.
    pub fn compute_map(&self, initial: ArrayView1<f64>) -> Result<MapEstimate, ModelError> {
        if initial.len() != self.len() {
            return Err(ModelError::InitialLength {
                expected: self.len(),
                found: initial.len(),
            });
        }

        let mut f = initial.to_owned();
        let mut step_size = f64::INFINITY;

        for iteration in 1..=self.max_iterations {
            let (gradient, hessian) = self.derivatives(f.view());
            let factor = cholesky(hessian.view()).map_err(|pivot| {
                ModelError::NotPositiveDefinite {
                    matrix: "posterior Hessian",
                    pivot,
                }
            })?;
            let step = cholesky_solve(factor.view(), gradient.view());
            f -= &step;

            if f.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::NonFinite { iteration });
            }

            step_size = max_abs(step.view());
            if step_size < self.tolerance {
                tracing::trace!("MAP converged after {iteration} iterations");
                return Ok(MapEstimate {
                    mode: f,
                    iterations: iteration,
                });
            }
        }

        Err(ModelError::DidNotConverge {
            iterations: self.max_iterations,
            step: step_size,
        })
    }
}

/// Refits a [`PreferenceModel`] on every call, starting MAP from zeros.
#[derive(Debug, Clone)]
pub struct LaplaceLearner {
    kernel: GaussianKernel,
    sigma: f64,
    jitter: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl LaplaceLearner {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            kernel: GaussianKernel::new(config.bandwidth),
            sigma: config.sigma,
            jitter: config.jitter,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
        }
    }

    pub fn kernel(&self) -> GaussianKernel {
        self.kernel
    }
}

impl PreferenceLearner for LaplaceLearner {
    fn fit(
        &mut self,
        instances: ArrayView2<f64>,
        pairs: &[PreferencePair],
    ) -> Result<Posterior, ModelError> {
        let mut model = PreferenceModel::new(instances, pairs, self.kernel, self.sigma, self.jitter)?;
        model.tolerance = self.tolerance;
        model.max_iterations = self.max_iterations;

        let estimate = model.compute_map(Array1::zeros(model.len()).view())?;
        tracing::debug!(
            "Fitted preference model: {} instances, {} pairs, {} Newton steps",
            model.len(),
            pairs.len(),
            estimate.iterations
        );

        Ok(Posterior {
            mode: estimate.mode,
            inverse_covariance: model.inverse_covariance,
            iterations: estimate.iterations,
        })
    }
}
