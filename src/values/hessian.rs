//! Hessian (curvature matrix) of a set of correlated values.

use nalgebra::DMatrix;
use ndarray::Array2;

use super::{CorrelatedValues, FIXED_VALUE, FREE_VALUE};
use crate::config::CovarianceConfig;
use crate::utils::matrix_convert::{gather_principal, scatter_principal};

impl CorrelatedValues {
    /// Get the Hessian matrix, the inverse of the covariance.
    ///
    /// Only the parameters that are neither free nor fixed take part in the
    /// inversion. Their rows and columns are gathered in order, inverted, and
    /// scattered back. The diagonal element of a free (fixed) parameter is
    /// the reciprocal of the free (fixed) sentinel, and its other entries are
    /// zero. The result is cached until the covariance changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use recon_state::CorrelatedValues;
    ///
    /// let mut v = CorrelatedValues::new(2);
    /// v.set_covariance_value(0, 0, 4.0).unwrap();
    /// assert_eq!(v.hessian()[[0, 0]], 0.25);
    /// ```
    pub fn hessian(&self) -> &Array2<f64> {
        self.hessian
            .get_or_init(|| compute_hessian(&self.covariance, &CovarianceConfig::default()))
    }
}

fn compute_hessian(covariance: &Array2<f64>, config: &CovarianceConfig) -> Array2<f64> {
    let dim = covariance.nrows();
    let mut hessian = Array2::zeros((dim, dim));

    let constrained: Vec<usize> = (0..dim)
        .filter(|&i| {
            let variance = covariance[[i, i]];
            !CorrelatedValues::is_free_variance(variance) && !CorrelatedValues::is_fixed_variance(variance)
        })
        .collect();

    if !constrained.is_empty() {
        let reduced = gather_principal(covariance, &constrained);
        let inverse = invert(reduced, config);
        scatter_principal(&mut hessian, &constrained, &inverse);
    }

    for i in 0..dim {
        let variance = covariance[[i, i]];
        if CorrelatedValues::is_free_variance(variance) {
            hessian[[i, i]] = 1.0 / FREE_VALUE as f64;
        }
        if CorrelatedValues::is_fixed_variance(variance) {
            hessian[[i, i]] = 1.0 / FIXED_VALUE as f64;
        }
    }
    hessian
}

fn invert(reduced: DMatrix<f64>, config: &CovarianceConfig) -> DMatrix<f64> {
    let n = reduced.nrows();
    if let Some(inverse) = reduced.clone().try_inverse() {
        return inverse;
    }
    tracing::warn!(size = n, "singular constrained covariance, using the pseudo-inverse");
    match reduced.pseudo_inverse(config.pseudo_inverse_epsilon) {
        Ok(inverse) => inverse,
        Err(reason) => {
            tracing::warn!(size = n, reason, "pseudo-inverse failed, Hessian block left at zero");
            DMatrix::zeros(n, n)
        }
    }
}
