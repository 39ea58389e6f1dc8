//! # Correlated Values
//!
//! This module provides [`CorrelatedValues`], a vector of parameter values
//! together with their symmetric covariance matrix. It is the storage used by
//! every reconstruction state, and it can also be used on its own to propagate
//! uncertainties through simple arithmetic:
//!
//! ```
//! use recon_state::CorrelatedValues;
//!
//! let x = CorrelatedValues::with_uncertainty(3.0, 2.0);
//! let y = CorrelatedValues::with_uncertainty(4.0, 3.0);
//!
//! let sum = (&x + &y).unwrap();
//! assert_eq!(sum.scalar_value().unwrap(), 7.0);
//! assert!((sum.scalar_uncertainty().unwrap() - 13f64.sqrt()).abs() < 1e-6);
//!
//! let shifted = &x + 1.0;
//! assert_eq!(shifted.scalar_value().unwrap(), 4.0);
//! ```
//!
//! ## Free and fixed parameters
//!
//! A parameter is *free* (unconstrained) when its variance is larger than
//! [`FREE_THRESHOLD`], and *fixed* (held constant) when its variance is
//! smaller than [`FIXED_THRESHOLD`]. The sentinel variances written by
//! [`CorrelatedValues::set_free`] and [`CorrelatedValues::set_fixed`] are
//! single precision constants that must be reproduced bit-for-bit to read
//! previously fitted data. They widen exactly into the `f64` storage.

mod arithmetic;
mod correlated;
mod hessian;
mod status;

pub use correlated::CorrelatedValues;
pub use status::ParameterStatus;

/// The variance assigned to a free parameter: `sqrt(f32::MAX)`, about 1.8e19.
pub const FREE_VALUE: f32 = 1.844_674_3e19;

/// Variances above this value mark a parameter as free.
pub const FREE_THRESHOLD: f32 = (0.1 * FREE_VALUE as f64) as f32;

/// The variance assigned to a fixed parameter, about 5.4e-20.
pub const FIXED_VALUE: f32 = (1.0 / FREE_VALUE as f64) as f32;

/// Variances below this value mark a parameter as fixed.
pub const FIXED_THRESHOLD: f32 = (1.0 / FREE_THRESHOLD as f64) as f32;
