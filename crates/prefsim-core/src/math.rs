//! Shared math utilities: distances and dense Cholesky routines.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Squared Euclidean distance between two equally sized vectors.
pub fn squared_distance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Lower-triangular Cholesky factor `L` with `A = L * L^T`.
///
/// Returns the index of the failing pivot when `A` is not positive definite.
pub fn cholesky(a: ArrayView2<f64>) -> Result<Array2<f64>, usize> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }

            if i == j {
                if !(sum > 0.0) || !sum.is_finite() {
                    return Err(i);
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Solve `L * L^T * x = b` given the Cholesky factor `L`.
pub fn cholesky_solve(l: ArrayView2<f64>, b: ArrayView1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[[i, j]] * y[j];
        }
        y[i] = sum / l[[i, i]];
    }

    // Back substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[[j, i]] * x[j];
        }
        x[i] = sum / l[[i, i]];
    }

    x
}

/// Inverse of `A = L * L^T` from its Cholesky factor, symmetrized.
pub fn cholesky_inverse(l: ArrayView2<f64>) -> Array2<f64> {
    let n = l.nrows();
    let mut inv = Array2::<f64>::zeros((n, n));
    let mut e = Array1::<f64>::zeros(n);

    for col in 0..n {
        e.fill(0.0);
        e[col] = 1.0;
        let x = cholesky_solve(l, e.view());
        inv.column_mut(col).assign(&x);
    }

    // Round-off leaves the two triangles slightly apart.
    (&inv + &inv.t()) * 0.5
}

/// Largest absolute entry, 0 for an empty vector.
pub fn max_abs(v: ArrayView1<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_squared_distance() {
        let d = squared_distance(array![0.0, 3.0].view(), array![4.0, 0.0].view());
        assert!((d - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_identity() {
        let a = Array2::<f64>::eye(3);
        let l = cholesky(a.view()).unwrap();
        assert_eq!(l, Array2::<f64>::eye(3));
    }

    #[test]
    fn test_cholesky_reconstructs_matrix() {
        let a = array![[4.0, 2.0, 0.4], [2.0, 5.0, 1.0], [0.4, 1.0, 3.0]];
        let l = cholesky(a.view()).unwrap();
        let back = l.dot(&l.t());
        for (x, y) in back.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        assert_eq!(cholesky(a.view()).unwrap_err(), 1);
    }

    #[test]
    fn test_cholesky_solve_and_inverse() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let l = cholesky(a.view()).unwrap();

        let x = cholesky_solve(l.view(), array![1.0, 2.0].view());
        let ax = a.dot(&x);
        assert!((ax[0] - 1.0).abs() < 1e-12);
        assert!((ax[1] - 2.0).abs() < 1e-12);

        let inv = cholesky_inverse(l.view());
        let id = a.dot(&inv);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(array![1.0, -3.5, 2.0].view()), 3.5);
        assert_eq!(max_abs(Array1::<f64>::zeros(0).view()), 0.0);
    }
}
