//! Tri-state view of a parameter's constraint.

use serde::{Deserialize, Serialize};

use super::{CorrelatedValues, FIXED_VALUE, FREE_VALUE};

/// How a single parameter is constrained.
///
/// The covariance stores this as a sentinel variance; this enum is the
/// decoded view of one diagonal element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParameterStatus {
    /// Unconstrained, not yet fit.
    Free,
    /// Held constant, without uncertainty.
    Fixed,
    /// Fit with the given variance.
    Constrained(f64),
}

impl ParameterStatus {
    /// Decode a variance.
    pub fn from_variance(variance: f64) -> Self {
        if CorrelatedValues::is_free_variance(variance) {
            ParameterStatus::Free
        } else if CorrelatedValues::is_fixed_variance(variance) {
            ParameterStatus::Fixed
        } else {
            ParameterStatus::Constrained(variance)
        }
    }

    /// Encode as the variance stored in a covariance matrix.
    pub fn variance(&self) -> f64 {
        match *self {
            ParameterStatus::Free => FREE_VALUE as f64,
            ParameterStatus::Fixed => FIXED_VALUE as f64,
            ParameterStatus::Constrained(variance) => variance,
        }
    }

    /// Is the parameter unconstrained?
    pub fn is_free(&self) -> bool {
        matches!(self, ParameterStatus::Free)
    }

    /// Is the parameter held constant?
    pub fn is_fixed(&self) -> bool {
        matches!(self, ParameterStatus::Fixed)
    }
}
