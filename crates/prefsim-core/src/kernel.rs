//! Gaussian kernel and kernel-regression scoring of unrated candidates.
//!
//! Given the posterior mode `m` over training instances and the inverse
//! prior covariance `C⁻¹`, each candidate `x*` scores
//! `Σ_j (C⁻¹ m)_j · k(x*, instance_j)`. No optimization happens here.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::Serialize;

use crate::error::PredictError;
use crate::math::squared_distance;

/// Gaussian kernel `k(x, y) = exp(-K/2 · ||x - y||²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    bandwidth: f64,
}

impl GaussianKernel {
    pub fn new(bandwidth: f64) -> Self {
        Self { bandwidth }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn eval(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (-self.bandwidth / 2.0 * squared_distance(x, y)).exp()
    }

    /// Kernel matrix between the rows of `a` and the rows of `b`.
    pub fn matrix(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
        Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| self.eval(a.row(i), b.row(j)))
    }
}

/// Outcome of scoring a candidate set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Position of the best candidate in the candidate ordering
    pub index: usize,

    /// Score of every candidate, in candidate order
    pub scores: Vec<f64>,
}

impl Prediction {
    pub fn best_score(&self) -> f64 {
        self.scores[self.index]
    }
}

/// Scores candidates by kernel-weighted combination of a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct KernelPredictor {
    kernel: GaussianKernel,
}

impl KernelPredictor {
    pub fn new(kernel: GaussianKernel) -> Self {
        Self { kernel }
    }

    /// Regression weights `beta = C⁻¹ · m`.
    pub fn weights(
        mode: ArrayView1<f64>,
        inverse_covariance: ArrayView2<f64>,
    ) -> Result<Array1<f64>, PredictError> {
        let n = mode.len();
        if inverse_covariance.dim() != (n, n) {
            return Err(PredictError::DimensionMismatch {
                what: "inverse covariance",
                expected: n,
                found: inverse_covariance.nrows(),
            });
        }
        Ok(inverse_covariance.dot(&mode))
    }

    /// Score every candidate row and return the argmax.
    ///
    /// Ties go to the first candidate in order.
    pub fn predict(
        &self,
        instances: ArrayView2<f64>,
        mode: ArrayView1<f64>,
        inverse_covariance: ArrayView2<f64>,
        candidates: ArrayView2<f64>,
    ) -> Result<Prediction, PredictError> {
        if candidates.nrows() == 0 {
            return Err(PredictError::NoCandidates);
        }
        if mode.len() != instances.nrows() {
            return Err(PredictError::DimensionMismatch {
                what: "posterior mode",
                expected: instances.nrows(),
                found: mode.len(),
            });
        }
        if candidates.ncols() != instances.ncols() {
            return Err(PredictError::DimensionMismatch {
                what: "candidate features",
                expected: instances.ncols(),
                found: candidates.ncols(),
            });
        }

        let beta = Self::weights(mode, inverse_covariance)?;
        let gram = self.kernel.matrix(candidates, instances);
        let scores = gram.dot(&beta).to_vec();

        let mut index = 0;
        for (i, &s) in scores.iter().enumerate() {
            if s > scores[index] {
                index = i;
            }
        }

        Ok(Prediction { index, scores })
    }
}
