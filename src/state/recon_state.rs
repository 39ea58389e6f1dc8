//! The runtime state: a schema with the correlated values laid out by it.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::block::{BlockKind, Bundle, Capabilities};
use super::schema::Schema;
use crate::error::{ReconError, Result};
use crate::values::{CorrelatedValues, ParameterStatus};

/// A reconstruction state.
///
/// The dimension is fixed by the schema when the state is created and the
/// values are never resized. The type hash of the values is built from the
/// schema's field names.
///
/// Only the schema and the values are persisted. Loading checks the
/// dimension against the schema and rebuilds the capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredState")]
pub struct ReconState {
    schema: Schema,
    #[serde(skip_serializing)]
    capabilities: Capabilities,
    values: CorrelatedValues,
}

#[derive(Deserialize)]
struct StoredState {
    schema: Schema,
    values: CorrelatedValues,
}

impl TryFrom<StoredState> for ReconState {
    type Error = ReconError;

    fn try_from(stored: StoredState) -> Result<Self> {
        Self::with_values(stored.schema, stored.values)
    }
}

impl ReconState {
    /// Create a state with every parameter free.
    pub fn new(schema: Schema) -> Self {
        let mut values = CorrelatedValues::new(schema.dimension());
        values.set_type(&schema.type_name());
        let capabilities = schema.capabilities();
        Self {
            schema,
            capabilities,
            values,
        }
    }

    /// Wrap existing values, such as the result of a projection.
    ///
    /// # Errors
    ///
    /// * `ReconError::Range` if the dimension differs from the schema
    pub fn with_values(schema: Schema, values: CorrelatedValues) -> Result<Self> {
        if values.dimensions() != schema.dimension() {
            return Err(ReconError::dimensions(schema.dimension(), values.dimensions()));
        }
        Ok(Self::from_parts(schema, values))
    }

    /// Callers guarantee that the dimensions agree.
    pub(crate) fn from_parts(schema: Schema, mut values: CorrelatedValues) -> Self {
        values.set_type(&schema.type_name());
        let capabilities = schema.capabilities();
        Self {
            schema,
            capabilities,
            values,
        }
    }

    /// The layout of the state.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The blocks and bundles the state exposes.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Does the state expose a block?
    pub fn supports(&self, kind: BlockKind) -> bool {
        self.capabilities.supports_block(kind)
    }

    /// Does the state expose a bundle?
    pub fn supports_bundle(&self, bundle: Bundle) -> bool {
        self.capabilities.supports_bundle(bundle)
    }

    /// Offset of a block, or `None` when the state does not expose it.
    pub fn block_offset(&self, kind: BlockKind) -> Option<usize> {
        if !self.supports(kind) {
            return None;
        }
        self.schema.offset_of(kind)
    }

    /// Offset of a bundle, or `None` when the state does not expose it.
    pub fn bundle_offset(&self, bundle: Bundle) -> Option<usize> {
        if !self.supports_bundle(bundle) {
            return None;
        }
        self.schema.bundle_offset(bundle)
    }

    /// Space separated field names, as hashed into the type tag.
    pub fn type_name(&self) -> String {
        self.schema.type_name()
    }

    /// Number of parameters.
    pub fn dimension(&self) -> usize {
        self.values.dimensions()
    }

    /// The underlying values and covariance.
    pub fn values(&self) -> &CorrelatedValues {
        &self.values
    }

    /// Unwrap the values.
    pub fn into_values(self) -> CorrelatedValues {
        self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut CorrelatedValues {
        &mut self.values
    }

    /// See [`CorrelatedValues::value`].
    pub fn value(&self, i: usize) -> Result<f64> {
        self.values.value(i)
    }

    /// See [`CorrelatedValues::set_value`].
    pub fn set_value(&mut self, i: usize, value: f64) -> Result<()> {
        self.values.set_value(i, value)
    }

    /// See [`CorrelatedValues::covariance_value`].
    pub fn covariance_value(&self, i: usize, j: usize) -> Result<f64> {
        self.values.covariance_value(i, j)
    }

    /// See [`CorrelatedValues::set_covariance_value`].
    pub fn set_covariance_value(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.values.set_covariance_value(i, j, value)
    }

    /// See [`CorrelatedValues::uncertainty`].
    pub fn uncertainty(&self, i: usize) -> Result<f64> {
        self.values.uncertainty(i)
    }

    /// See [`CorrelatedValues::is_free`].
    pub fn is_free(&self, i: usize) -> Result<bool> {
        self.values.is_free(i)
    }

    /// See [`CorrelatedValues::set_free`].
    pub fn set_free(&mut self, i: usize) -> Result<()> {
        self.values.set_free(i)
    }

    /// See [`CorrelatedValues::is_fixed`].
    pub fn is_fixed(&self, i: usize) -> Result<bool> {
        self.values.is_fixed(i)
    }

    /// See [`CorrelatedValues::set_fixed`].
    pub fn set_fixed(&mut self, i: usize) -> Result<()> {
        self.values.set_fixed(i)
    }

    /// See [`CorrelatedValues::status`].
    pub fn status(&self, i: usize) -> Result<ParameterStatus> {
        self.values.status(i)
    }

    /// See [`CorrelatedValues::set_status`].
    pub fn set_status(&mut self, i: usize, status: ParameterStatus) -> Result<()> {
        self.values.set_status(i, status)
    }

    /// See [`CorrelatedValues::ndof`].
    pub fn ndof(&self) -> usize {
        self.values.ndof()
    }

    /// See [`CorrelatedValues::set_ndof`].
    pub fn set_ndof(&mut self, ndof: usize) {
        self.values.set_ndof(ndof)
    }

    /// See [`CorrelatedValues::hessian`].
    pub fn hessian(&self) -> &Array2<f64> {
        self.values.hessian()
    }

    /// See [`CorrelatedValues::validate`].
    pub fn validate(&mut self, fix: bool) -> bool {
        self.values.validate(fix)
    }
}
