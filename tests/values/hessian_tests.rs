use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recon_state::{CorrelatedValues, FREE_VALUE};

use crate::test_helpers::{is_identity, random_covariance};

#[test]
fn test_default_hessian_is_zero() {
    let v = CorrelatedValues::new(4);
    for &h in v.hessian().iter() {
        assert_abs_diff_eq!(h, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_unit_diagonal_gives_identity() {
    let mut v = CorrelatedValues::new(4);
    for i in 0..4 {
        v.set_covariance_value(i, i, 1.0).unwrap();
    }
    assert!(is_identity(v.hessian(), 1e-5));
}

#[test]
fn test_free_and_fixed_entries_invert() {
    let mut v = CorrelatedValues::new(3);
    v.set_fixed(1).unwrap();
    let product = v.hessian().dot(v.covariance());
    assert!(is_identity(&product, 1e-5));
}

#[test]
fn test_zero_covariance_means_fixed() {
    // A literal zero variance reads as fixed, whose curvature is huge.
    let v = CorrelatedValues::from_values(ndarray::array![1.0, 2.0]);
    assert_relative_eq!(v.hessian()[[0, 0]], FREE_VALUE as f64, max_relative = 1e-6);
    assert_eq!(v.hessian()[[0, 1]], 0.0);
}

#[test]
fn property_hessian_inverts_constrained_block() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    for n in 2..8 {
        let cov = random_covariance(n, &mut rng);
        let mut v = CorrelatedValues::from_covariance(ndarray::Array1::zeros(n), cov).unwrap();
        v.set_free(0).unwrap();
        v.set_fixed(n - 1).unwrap();

        let product: Array2<f64> = v.hessian().dot(v.covariance());
        assert!(is_identity(&product, 1e-6), "H*C is not the identity for n = {}", n);
    }
}

#[test]
fn test_hessian_follows_mutation() {
    crate::test_helpers::init_tracing();
    let mut v = CorrelatedValues::new(2);
    v.set_covariance_value(0, 0, 2.0).unwrap();
    v.set_covariance_value(1, 1, 2.0).unwrap();
    assert_abs_diff_eq!(v.hessian()[[1, 1]], 0.5, epsilon = 1e-12);

    v.set_covariance_value(0, 1, 2.0).unwrap();
    // Singular now; the pseudo-inverse keeps the result finite.
    assert!(v.hessian().iter().all(|h| h.is_finite()));
    assert_abs_diff_eq!(v.hessian()[[0, 1]], 0.125, epsilon = 1e-9);
}
