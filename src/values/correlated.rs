//! The correlated values vector.
//!
//! A [`CorrelatedValues`] holds N values and an N×N symmetric covariance. The
//! number of degrees of freedom and the Hessian are cached and rebuilt on the
//! first read after any covariance mutation.

use std::cell::{Cell, OnceCell};

use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use super::status::ParameterStatus;
use super::{FIXED_THRESHOLD, FIXED_VALUE, FREE_THRESHOLD, FREE_VALUE};
use crate::config::CovarianceConfig;
use crate::error::{ReconError, Result};

/// A vector of values and the covariance between them.
///
/// The covariance is kept symmetric: [`set_covariance_value`] writes both
/// `(i, j)` and `(j, i)`. The caches are not thread safe; a
/// `CorrelatedValues` is `!Sync` and callers that share one must serialize
/// access themselves.
///
/// [`set_covariance_value`]: CorrelatedValues::set_covariance_value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredValues")]
pub struct CorrelatedValues {
    /// The parameter values
    pub(super) values: Array1<f64>,

    /// The symmetric covariance of the values
    pub(super) covariance: Array2<f64>,

    /// A semi-unique hash of the field definitions
    type_hash: u32,

    /// Cached number of constrained parameters
    #[serde(skip)]
    ndof: Cell<Option<usize>>,

    /// Cached inverse of the constrained covariance
    #[serde(skip)]
    pub(super) hessian: OnceCell<Array2<f64>>,
}

/// The persisted fields, checked before they become a [`CorrelatedValues`].
#[derive(Deserialize)]
struct StoredValues {
    values: Array1<f64>,
    covariance: Array2<f64>,
    type_hash: u32,
}

impl TryFrom<StoredValues> for CorrelatedValues {
    type Error = ReconError;

    fn try_from(stored: StoredValues) -> Result<Self> {
        let mut result = Self::from_covariance(stored.values, stored.covariance)?;
        result.type_hash = stored.type_hash;
        Ok(result)
    }
}

impl Default for CorrelatedValues {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialEq for CorrelatedValues {
    fn eq(&self, other: &Self) -> bool {
        self.type_hash == other.type_hash
            && self.values == other.values
            && self.covariance == other.covariance
    }
}

impl CorrelatedValues {
    /// Create `n` values with every parameter free.
    ///
    /// # Examples
    ///
    /// ```
    /// use recon_state::CorrelatedValues;
    ///
    /// let v = CorrelatedValues::new(3);
    /// assert_eq!(v.dimensions(), 3);
    /// assert!(v.is_free(2).unwrap());
    /// ```
    pub fn new(n: usize) -> Self {
        let mut covariance = Array2::zeros((n, n));
        covariance.diag_mut().fill(FREE_VALUE as f64);
        Self::from_parts(Array1::zeros(n), covariance)
    }

    /// Create a one dimensional value with an uncertainty. The variance is the
    /// uncertainty squared.
    pub fn with_uncertainty(value: f64, uncertainty: f64) -> Self {
        let values = Array1::from_elem(1, value);
        let covariance = Array2::from_elem((1, 1), uncertainty * uncertainty);
        let result = Self::from_parts(values, covariance);
        result.ndof.set(Some(1));
        result
    }

    /// Create values without any uncertainty. The covariance is zero, so every
    /// parameter is fixed.
    pub fn from_values(values: Array1<f64>) -> Self {
        let n = values.len();
        Self::from_parts(values, Array2::zeros((n, n)))
    }

    /// Create values with independent uncertainties. The uncertainties are the
    /// square roots of the diagonal of the covariance.
    ///
    /// # Errors
    ///
    /// * `ReconError::Construction` if the two arrays differ in length
    pub fn from_uncertainties(values: Array1<f64>, uncertainties: &Array1<f64>) -> Result<Self> {
        if uncertainties.len() != values.len() {
            tracing::debug!(
                values = values.len(),
                uncertainties = uncertainties.len(),
                "mismatched number of elements"
            );
            return Err(ReconError::Construction(format!(
                "{} values but {} uncertainties",
                values.len(),
                uncertainties.len()
            )));
        }
        let mut covariance = Array2::zeros((values.len(), values.len()));
        for (i, sigma) in uncertainties.iter().enumerate() {
            covariance[[i, i]] = sigma * sigma;
        }
        Ok(Self::from_parts(values, covariance))
    }

    /// Create values from a full covariance matrix.
    ///
    /// # Errors
    ///
    /// * `ReconError::Construction` if the covariance is not N×N for N values
    pub fn from_covariance(values: Array1<f64>, covariance: Array2<f64>) -> Result<Self> {
        let n = values.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            tracing::debug!(
                values = n,
                rows = covariance.nrows(),
                cols = covariance.ncols(),
                "mismatch between element count and covariance shape"
            );
            return Err(ReconError::Construction(format!(
                "{} values but a {}x{} covariance",
                n,
                covariance.nrows(),
                covariance.ncols()
            )));
        }
        Ok(Self::from_parts(values, covariance))
    }

    fn from_parts(values: Array1<f64>, covariance: Array2<f64>) -> Self {
        Self {
            values,
            covariance,
            type_hash: 0,
            ndof: Cell::new(None),
            hessian: OnceCell::new(),
        }
    }

    /// Return the number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Return the vector of values.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Return the covariance matrix.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Replace all of the values.
    ///
    /// # Errors
    ///
    /// * `ReconError::Range` if the new vector has a different dimension
    pub fn set_values(&mut self, values: Array1<f64>) -> Result<()> {
        if values.len() != self.dimensions() {
            return Err(ReconError::dimensions(self.dimensions(), values.len()));
        }
        self.values = values;
        Ok(())
    }

    /// Replace the whole covariance matrix. The matrix is taken as given; use
    /// [`validate`](Self::validate) to symmetrize it.
    ///
    /// # Errors
    ///
    /// * `ReconError::Range` if the matrix is not N×N
    pub fn set_covariance(&mut self, covariance: Array2<f64>) -> Result<()> {
        let n = self.dimensions();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(ReconError::dimensions(n, covariance.nrows().max(covariance.ncols())));
        }
        self.covariance = covariance;
        self.invalidate();
        Ok(())
    }

    /// Get the value of a parameter.
    pub fn value(&self, i: usize) -> Result<f64> {
        self.check_index(i)?;
        Ok(self.values[i])
    }

    /// Set the value of a parameter.
    pub fn set_value(&mut self, i: usize, value: f64) -> Result<()> {
        self.check_index(i)?;
        self.values[i] = value;
        Ok(())
    }

    /// Get one element of the covariance.
    pub fn covariance_value(&self, i: usize, j: usize) -> Result<f64> {
        self.check_cell(i, j)?;
        Ok(self.covariance[[i, j]])
    }

    /// Set one element of the covariance. Both `(i, j)` and `(j, i)` are
    /// written, and the cached NDOF and Hessian are dropped.
    pub fn set_covariance_value(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_cell(i, j)?;
        self.put_covariance(i, j, value);
        Ok(())
    }

    /// Get the uncertainty (standard error) on a parameter. This ignores the
    /// correlations with other parameters. A non-positive variance is
    /// returned unchanged.
    pub fn uncertainty(&self, i: usize) -> Result<f64> {
        let variance = self.covariance_value(i, i)?;
        Ok(if variance > 0.0 { variance.sqrt() } else { variance })
    }

    /// Get the value of a one dimensional object.
    pub fn scalar_value(&self) -> Result<f64> {
        self.check_scalar()?;
        self.value(0)
    }

    /// Set the value of a one dimensional object.
    pub fn set_scalar_value(&mut self, value: f64) -> Result<()> {
        self.check_scalar()?;
        self.set_value(0, value)
    }

    /// Get the uncertainty of a one dimensional object.
    pub fn scalar_uncertainty(&self) -> Result<f64> {
        self.check_scalar()?;
        self.uncertainty(0)
    }

    /// Set the uncertainty of a one dimensional object.
    pub fn set_scalar_uncertainty(&mut self, uncertainty: f64) -> Result<()> {
        self.check_scalar()?;
        self.set_covariance_value(0, 0, uncertainty * uncertainty)
    }

    /// Return the number of degrees of freedom: the number of parameters that
    /// are neither free nor fixed. The count is cached until the covariance
    /// changes.
    pub fn ndof(&self) -> usize {
        if let Some(ndof) = self.ndof.get() {
            return ndof;
        }
        let ndof = self
            .covariance
            .diag()
            .iter()
            .filter(|&&variance| !Self::is_free_variance(variance) && !Self::is_fixed_variance(variance))
            .count();
        self.ndof.set(Some(ndof));
        ndof
    }

    /// Override the number of degrees of freedom. The override lasts until the
    /// next covariance mutation.
    pub fn set_ndof(&mut self, ndof: usize) {
        self.ndof.set(Some(ndof));
    }

    /// Get the type hash.
    pub fn type_hash(&self) -> u32 {
        self.type_hash
    }

    /// Set the type hash from a space separated list of field names.
    ///
    /// The hash is a coarse compatibility tag. Arithmetic does not check it.
    pub fn set_type(&mut self, fields: &str) {
        self.type_hash = type_hash(fields);
    }

    /// Mark a parameter as fixed. Every correlation with the parameter is
    /// removed.
    pub fn set_fixed(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        self.isolate(i, FIXED_VALUE as f64);
        Ok(())
    }

    /// Check if a parameter is fixed.
    pub fn is_fixed(&self, i: usize) -> Result<bool> {
        self.check_index(i)?;
        Ok(Self::is_fixed_variance(self.covariance[[i, i]]))
    }

    /// Check if a variance means that a parameter is fixed.
    pub fn is_fixed_variance(variance: f64) -> bool {
        variance < FIXED_THRESHOLD as f64
    }

    /// Mark a parameter as free. Every correlation with the parameter is
    /// removed.
    pub fn set_free(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        self.isolate(i, FREE_VALUE as f64);
        Ok(())
    }

    /// Check if a parameter is free.
    pub fn is_free(&self, i: usize) -> Result<bool> {
        self.check_index(i)?;
        Ok(Self::is_free_variance(self.covariance[[i, i]]))
    }

    /// Check if a variance means that a parameter is free.
    pub fn is_free_variance(variance: f64) -> bool {
        variance > FREE_THRESHOLD as f64
    }

    /// Get the constraint status of a parameter.
    pub fn status(&self, i: usize) -> Result<ParameterStatus> {
        self.check_index(i)?;
        Ok(ParameterStatus::from_variance(self.covariance[[i, i]]))
    }

    /// Apply a constraint status to a parameter. `Free` and `Fixed` behave
    /// like [`set_free`](Self::set_free) and [`set_fixed`](Self::set_fixed);
    /// `Constrained` only writes the variance.
    pub fn set_status(&mut self, i: usize, status: ParameterStatus) -> Result<()> {
        match status {
            ParameterStatus::Free => self.set_free(i),
            ParameterStatus::Fixed => self.set_fixed(i),
            ParameterStatus::Constrained(variance) => self.set_covariance_value(i, i, variance),
        }
    }

    /// Collapse the vector into one value. The variance of the sum includes
    /// every correlation: `sum(diag) + 2 * sum(i<j, cov(i,j))`.
    pub fn sum(&self) -> CorrelatedValues {
        let n = self.dimensions();
        let value = self.values.sum();
        let mut variance = 0.0;
        for i in 0..n {
            variance += self.covariance[[i, i]];
            for j in (i + 1)..n {
                variance += 2.0 * self.covariance[[i, j]];
            }
        }
        Self::from_parts(Array1::from_elem(1, value), Array2::from_elem((1, 1), variance))
    }

    /// Make sure the covariance matrix is symmetric, using the default
    /// tolerance. See [`validate_with`](Self::validate_with).
    pub fn validate(&mut self, fix: bool) -> bool {
        self.validate_with(fix, &CovarianceConfig::default())
    }

    /// Check that the covariance matrix is symmetric within the relative
    /// tolerance of `config`. Returns whether the matrix was already valid.
    ///
    /// With `fix` set, free and fixed parameters have their correlations
    /// cleared, and every off-diagonal pair is replaced by its average. The
    /// caches are dropped if anything changed. An empty object is never
    /// valid.
    pub fn validate_with(&mut self, fix: bool, config: &CovarianceConfig) -> bool {
        let dim = self.dimensions();
        if dim < 1 {
            return false;
        }
        let mut changed = false;
        if fix {
            for i in 0..dim {
                let variance = self.covariance[[i, i]];
                let sentinel = if Self::is_fixed_variance(variance) {
                    FIXED_VALUE as f64
                } else if Self::is_free_variance(variance) {
                    FREE_VALUE as f64
                } else {
                    continue;
                };
                let correlated = (0..dim)
                    .any(|j| j != i && (self.covariance[[i, j]] != 0.0 || self.covariance[[j, i]] != 0.0));
                if correlated || variance != sentinel {
                    self.clear_row(i, sentinel);
                    changed = true;
                }
            }
        }

        let mut ok = true;
        for i in 0..dim {
            for j in (i + 1)..dim {
                let upper = self.covariance[[i, j]];
                let lower = self.covariance[[j, i]];
                let mag = 0.5 * (upper + lower);
                let tolerance = 2.0 * config.symmetry_tolerance * mag.abs();
                if (upper - mag).abs() > tolerance || (lower - mag).abs() > tolerance {
                    ok = false;
                }
                if fix && upper != lower {
                    self.covariance[[i, j]] = mag;
                    self.covariance[[j, i]] = mag;
                    changed = true;
                }
            }
        }

        if changed {
            tracing::debug!(dim, symmetric = ok, "covariance corrected");
            self.invalidate();
        }
        ok
    }

    /// Drop the cached NDOF and Hessian.
    pub(crate) fn invalidate(&mut self) {
        self.ndof.set(None);
        self.hessian = OnceCell::new();
    }

    /// Read a value whose index is known to be in range.
    pub(crate) fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Write a value whose index is known to be in range.
    pub(crate) fn put(&mut self, i: usize, value: f64) {
        self.values[i] = value;
    }

    /// Read a covariance element whose indices are known to be in range.
    pub(crate) fn get_covariance(&self, i: usize, j: usize) -> f64 {
        self.covariance[[i, j]]
    }

    /// Write a covariance element (and its mirror) whose indices are known to
    /// be in range.
    pub(crate) fn put_covariance(&mut self, i: usize, j: usize, value: f64) {
        self.covariance[[i, j]] = value;
        self.covariance[[j, i]] = value;
        self.invalidate();
    }

    /// Copy `size` values and the covariance block between them from
    /// `source`, starting at `from` there and at `to` here. Cross terms with
    /// parameters outside the block are left untouched.
    pub(crate) fn copy_block_from(&mut self, source: &CorrelatedValues, from: usize, to: usize, size: usize) {
        self.values
            .slice_mut(s![to..to + size])
            .assign(&source.values.slice(s![from..from + size]));
        self.covariance
            .slice_mut(s![to..to + size, to..to + size])
            .assign(&source.covariance.slice(s![from..from + size, from..from + size]));
        self.invalidate();
    }

    /// Copy of the square covariance block starting at `offset`.
    pub(crate) fn covariance_block(&self, offset: usize, size: usize) -> Array2<f64> {
        self.covariance
            .slice(s![offset..offset + size, offset..offset + size])
            .to_owned()
    }

    /// Overwrite the square covariance block starting at `offset`.
    pub(crate) fn put_covariance_block(&mut self, offset: usize, block: &Array2<f64>) {
        let size = block.nrows();
        self.covariance
            .slice_mut(s![offset..offset + size, offset..offset + size])
            .assign(block);
        self.invalidate();
    }

    fn isolate(&mut self, i: usize, sentinel: f64) {
        self.clear_row(i, sentinel);
        self.invalidate();
    }

    fn clear_row(&mut self, i: usize, sentinel: f64) {
        self.covariance.row_mut(i).fill(0.0);
        self.covariance.column_mut(i).fill(0.0);
        self.covariance[[i, i]] = sentinel;
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.dimensions() {
            return Err(ReconError::index(i, self.dimensions()));
        }
        Ok(())
    }

    fn check_cell(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.dimensions() || j >= self.dimensions() {
            return Err(ReconError::cell(i, j, self.dimensions()));
        }
        Ok(())
    }

    fn check_scalar(&self) -> Result<()> {
        if self.dimensions() != 1 {
            tracing::debug!(dim = self.dimensions(), "not one dimensional");
            return Err(ReconError::Range(format!(
                "expected one dimension, found {}",
                self.dimensions()
            )));
        }
        Ok(())
    }
}

/// Hash a field definition string.
///
/// This is the 32 bit Fowler/Noll/Vo hash with the FNV-1 prime and offset,
/// multiplying before folding in each byte. Existing fitted data carry hashes
/// computed this way.
pub(crate) fn type_hash(fields: &str) -> u32 {
    const PRIME: u32 = 0x0100_0193;
    const OFFSET: u32 = 0x811c_9dc5;
    fields
        .bytes()
        .fold(OFFSET, |hash, byte| hash.wrapping_mul(PRIME) ^ u32::from(byte))
}
