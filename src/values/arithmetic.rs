//! Arithmetic on correlated values.
//!
//! The operations are defined element by element, like vector arithmetic, and
//! propagate the covariance with simplified rules:
//!
//! ```text
//! X+Y == [x1,x2]+[y1,y2] --> [x1+y1,x2+y2]
//! cov(X+Y) = cov(X) + cov(Y)
//! cov(X-Y) = cov(X) + cov(Y)
//! cov(A+X) = cov(X)
//! cov(A*X) = A*cov(X)
//! cov(X*Y)(i,j) = |cov(X)(i,j)*yi*yj + cov(Y)(i,j)*xi*xj|
//! cov(A/X)(i,j) = A*cov(X)(i,j)/(xi*xi*xj*xj)
//! X/Y = X*(1/Y)
//! ```
//!
//! The rules are exact only for independent, index aligned operands. The type
//! hash of the operands is not compared; only the dimensions are.
//!
//! Operations between two objects can fail, so the operators return a
//! [`Result`]:
//!
//! ```
//! use recon_state::CorrelatedValues;
//!
//! let x = CorrelatedValues::with_uncertainty(3.0, 2.0);
//! let y = CorrelatedValues::new(2);
//! assert!((&x * &y).is_err());
//! ```

use std::ops::{Add, Div, Mul, Sub};

use super::CorrelatedValues;
use crate::error::{ReconError, Result};

impl CorrelatedValues {
    /// Add two objects element by element. The covariances are summed.
    pub fn checked_add(&self, rhs: &CorrelatedValues) -> Result<CorrelatedValues> {
        self.check_same_dimensions(rhs)?;
        let mut result = self.clone();
        result.values = &self.values + &rhs.values;
        result.covariance = &self.covariance + &rhs.covariance;
        result.invalidate();
        Ok(result)
    }

    /// Subtract two objects element by element. The covariances are summed.
    pub fn checked_sub(&self, rhs: &CorrelatedValues) -> Result<CorrelatedValues> {
        self.check_same_dimensions(rhs)?;
        let mut result = self.clone();
        result.values = &self.values - &rhs.values;
        result.covariance = &self.covariance + &rhs.covariance;
        result.invalidate();
        Ok(result)
    }

    /// Multiply two objects element by element (the "zip" of the vectors).
    ///
    /// The covariance is propagated with the two term delta rule, and the
    /// absolute value is taken so that the variances stay non-negative.
    pub fn checked_mul(&self, rhs: &CorrelatedValues) -> Result<CorrelatedValues> {
        self.check_same_dimensions(rhs)?;
        let dim = self.dimensions();
        let mut result = self.clone();
        for i in 0..dim {
            let (xi, yi) = (self.values[i], rhs.values[i]);
            result.values[i] = xi * yi;
            for j in i..dim {
                let (xj, yj) = (self.values[j], rhs.values[j]);
                let cov = self.covariance[[i, j]] * yi * yj + rhs.covariance[[i, j]] * xi * xj;
                result.covariance[[i, j]] = cov.abs();
                result.covariance[[j, i]] = cov.abs();
            }
        }
        result.invalidate();
        Ok(result)
    }

    /// Divide two objects element by element, as `self * (1/rhs)`.
    pub fn checked_div(&self, rhs: &CorrelatedValues) -> Result<CorrelatedValues> {
        self.checked_mul(&rhs.divide_into(1.0))
    }

    /// Add a constant to every value. The covariance is unchanged.
    pub fn shift(&self, a: f64) -> CorrelatedValues {
        let mut result = self.clone();
        result.values.mapv_inplace(|x| x + a);
        result
    }

    /// Subtract every value from a constant. The covariance is unchanged.
    pub fn subtract_from(&self, a: f64) -> CorrelatedValues {
        let mut result = self.clone();
        result.values.mapv_inplace(|x| a - x);
        result
    }

    /// Multiply every value and every covariance element by a constant.
    pub fn scale(&self, a: f64) -> CorrelatedValues {
        let mut result = self.clone();
        result.values.mapv_inplace(|x| a * x);
        result.covariance.mapv_inplace(|c| a * c);
        result.invalidate();
        result
    }

    /// Divide a constant by every value.
    pub fn divide_into(&self, a: f64) -> CorrelatedValues {
        let dim = self.dimensions();
        let mut result = self.clone();
        for i in 0..dim {
            let xi = self.values[i];
            result.values[i] = a / xi;
            for j in 0..dim {
                let xj = self.values[j];
                result.covariance[[i, j]] = a * self.covariance[[i, j]] / (xi * xi * xj * xj);
            }
        }
        result.invalidate();
        result
    }

    fn check_same_dimensions(&self, rhs: &CorrelatedValues) -> Result<()> {
        if self.dimensions() != rhs.dimensions() {
            return Err(ReconError::dimensions(self.dimensions(), rhs.dimensions()));
        }
        Ok(())
    }
}

macro_rules! fallible_binary_op {
    ($trait_name:ident, $method:ident, $checked:ident) => {
        impl $trait_name<&CorrelatedValues> for &CorrelatedValues {
            type Output = Result<CorrelatedValues>;

            fn $method(self, rhs: &CorrelatedValues) -> Self::Output {
                self.$checked(rhs)
            }
        }

        impl $trait_name<CorrelatedValues> for CorrelatedValues {
            type Output = Result<CorrelatedValues>;

            fn $method(self, rhs: CorrelatedValues) -> Self::Output {
                self.$checked(&rhs)
            }
        }
    };
}

fallible_binary_op!(Add, add, checked_add);
fallible_binary_op!(Sub, sub, checked_sub);
fallible_binary_op!(Mul, mul, checked_mul);
fallible_binary_op!(Div, div, checked_div);

macro_rules! scalar_op {
    ($trait_name:ident, $method:ident, |$x:ident, $a:ident| $value_rhs:expr, |$y:ident, $b:ident| $scalar_lhs:expr) => {
        impl $trait_name<f64> for &CorrelatedValues {
            type Output = CorrelatedValues;

            fn $method(self, $a: f64) -> CorrelatedValues {
                let $x = self;
                $value_rhs
            }
        }

        impl $trait_name<f64> for CorrelatedValues {
            type Output = CorrelatedValues;

            fn $method(self, a: f64) -> CorrelatedValues {
                <&CorrelatedValues as $trait_name<f64>>::$method(&self, a)
            }
        }

        impl $trait_name<&CorrelatedValues> for f64 {
            type Output = CorrelatedValues;

            fn $method(self, $y: &CorrelatedValues) -> CorrelatedValues {
                let $b = self;
                $scalar_lhs
            }
        }

        impl $trait_name<CorrelatedValues> for f64 {
            type Output = CorrelatedValues;

            fn $method(self, x: CorrelatedValues) -> CorrelatedValues {
                <f64 as $trait_name<&CorrelatedValues>>::$method(self, &x)
            }
        }
    };
}

scalar_op!(Add, add, |x, a| x.shift(a), |x, a| x.shift(a));
scalar_op!(Sub, sub, |x, a| x.shift(-a), |x, a| x.subtract_from(a));
scalar_op!(Mul, mul, |x, a| x.scale(a), |x, a| x.scale(a));
scalar_op!(Div, div, |x, a| x.scale(1.0 / a), |x, a| x.divide_into(a));
