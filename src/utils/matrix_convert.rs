//! Matrix conversion utilities for the recon-state library.
//!
//! This module moves data between the ndarray storage used by
//! [`CorrelatedValues`](crate::CorrelatedValues) and the nalgebra matrices
//! used for inversion. The gather/scatter helpers move a principal
//! sub-matrix, selected by a list of row/column indices, between the two
//! representations.

use nalgebra::DMatrix;
use ndarray::Array2;

/// Gather the principal sub-matrix of `arr` selected by `indices`.
///
/// Element `(a, b)` of the result is `arr[[indices[a], indices[b]]]`. The
/// indices keep their given order.
pub fn gather_principal(arr: &Array2<f64>, indices: &[usize]) -> DMatrix<f64> {
    let n = indices.len();
    DMatrix::from_fn(n, n, |a, b| arr[[indices[a], indices[b]]])
}

/// Scatter a reduced matrix back into the principal positions of `target`.
///
/// This is the inverse of [`gather_principal`]; entries of `target` outside
/// of the selected rows and columns are untouched.
pub fn scatter_principal(target: &mut Array2<f64>, indices: &[usize], reduced: &DMatrix<f64>) {
    for (a, &i) in indices.iter().enumerate() {
        for (b, &j) in indices.iter().enumerate() {
            target[[i, j]] = reduced[(a, b)];
        }
    }
}
