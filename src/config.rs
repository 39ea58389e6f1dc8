//! Configuration options for covariance checks.
//!
//! This module defines the tolerances used when validating a covariance matrix
//! and when inverting the constrained part of a covariance to build the Hessian.

use serde::{Deserialize, Serialize};

/// Tolerances used by [`CorrelatedValues`](crate::CorrelatedValues).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CovarianceConfig {
    /// Relative tolerance allowed between the two halves of an off-diagonal
    /// pair before the matrix is considered asymmetric. Default: `f32::EPSILON`
    pub symmetry_tolerance: f64,

    /// Singular value cutoff used by the pseudo-inverse when the constrained
    /// covariance cannot be inverted directly. Default: 1e-12
    pub pseudo_inverse_epsilon: f64,
}

impl Default for CovarianceConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: f64::from(f32::EPSILON),
            pseudo_inverse_epsilon: 1e-12,
        }
    }
}
