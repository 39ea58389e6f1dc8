use approx::assert_relative_eq;
use ndarray::array;
use recon_state::{CorrelatedValues, ReconError};

#[test]
fn test_sum_of_independent_values() {
    let x = CorrelatedValues::with_uncertainty(3.0, 2.0);
    let y = CorrelatedValues::with_uncertainty(4.0, 3.0);
    let z = (&x + &y).unwrap();
    assert_relative_eq!(z.scalar_value().unwrap(), 7.0);
    assert_relative_eq!(z.scalar_uncertainty().unwrap(), 3.6056, epsilon = 1e-4);
    assert_relative_eq!(z.scalar_uncertainty().unwrap(), 13f64.sqrt(), epsilon = 1e-6);
}

#[test]
fn test_scalar_shift_keeps_uncertainty() {
    let u = CorrelatedValues::with_uncertainty(3.0, 2.0);
    let plus = &u + 1.0;
    assert_eq!(plus.scalar_value().unwrap(), 4.0);
    assert_eq!(plus.scalar_uncertainty().unwrap(), 2.0);

    let minus = 1.0 - &u;
    assert_eq!(minus.scalar_value().unwrap(), -2.0);
    assert_eq!(minus.scalar_uncertainty().unwrap(), 2.0);
}

#[test]
fn test_vector_operations_are_elementwise() {
    let x = CorrelatedValues::from_uncertainties(array![1.0, 2.0, 3.0], &array![0.1, 0.2, 0.3]).unwrap();
    let y = CorrelatedValues::from_uncertainties(array![4.0, 5.0, 6.0], &array![0.4, 0.5, 0.6]).unwrap();

    let diff = (&y - &x).unwrap();
    assert_eq!(diff.values(), &array![3.0, 3.0, 3.0]);
    assert_relative_eq!(diff.covariance_value(1, 1).unwrap(), 0.04 + 0.25, epsilon = 1e-12);

    let product = (&x * &y).unwrap();
    assert_eq!(product.values(), &array![4.0, 10.0, 18.0]);
    // 0.01*16 + 0.16*1
    assert_relative_eq!(product.covariance_value(0, 0).unwrap(), 0.32, epsilon = 1e-12);

    let ratio = (y.clone() / x.clone()).unwrap();
    assert_relative_eq!(ratio.value(2).unwrap(), 2.0);
}

#[test]
fn test_mismatched_dimensions_fail() {
    let x = CorrelatedValues::new(3);
    let y = CorrelatedValues::new(4);
    match &x * &y {
        Err(ReconError::Range(msg)) => assert!(msg.contains("3 != 4")),
        other => panic!("Expected a range error, got {:?}", other),
    }
    assert!(x.checked_div(&y).is_err());
}

#[test]
fn test_sum_collapses_with_correlations() {
    let v = CorrelatedValues::from_covariance(array![1.0, 1.0], array![[1.0, -0.5], [-0.5, 1.0]]).unwrap();
    let s = v.sum();
    assert_eq!(s.scalar_value().unwrap(), 2.0);
    assert_relative_eq!(s.covariance_value(0, 0).unwrap(), 1.0);
}
