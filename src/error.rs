use thiserror::Error;

/// Error types for the recon-state library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    /// An index was outside of the parameter vector or covariance matrix, or
    /// two operands of an arithmetic operation had different dimensions.
    #[error("Range error: {0}")]
    Range(String),

    /// The arrays used to build a set of correlated values did not agree in
    /// size.
    #[error("Construction error: {0}")]
    Construction(String),

    /// A node was added to a ledger with a state of the wrong composition.
    #[error("Wrong state type: {0}")]
    WrongStateType(String),

    /// A node was added to a ledger without an associated object.
    #[error("Object missing: {0}")]
    MissingObject(String),
}

/// Result type alias for recon-state operations.
pub type Result<T> = std::result::Result<T, ReconError>;

impl ReconError {
    /// Build a range error for an element index.
    pub(crate) fn index(index: usize, dim: usize) -> Self {
        tracing::debug!(index, dim, "out of bounds element index");
        ReconError::Range(format!("element index {} (dim is {})", index, dim))
    }

    /// Build a range error for a covariance index pair.
    pub(crate) fn cell(i: usize, j: usize, dim: usize) -> Self {
        tracing::debug!(i, j, dim, "out of bounds covariance index");
        ReconError::Range(format!("covariance index ({},{}) (dim is {})", i, j, dim))
    }

    /// Build a range error for operands with mismatched dimensions.
    pub(crate) fn dimensions(lhs: usize, rhs: usize) -> Self {
        tracing::debug!(lhs, rhs, "dimension mismatch");
        ReconError::Range(format!("dimensions mismatch: {} != {}", lhs, rhs))
    }
}
