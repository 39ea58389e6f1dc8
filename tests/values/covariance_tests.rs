use approx::assert_relative_eq;
use ndarray::array;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use recon_state::{CorrelatedValues, ParameterStatus, ReconError};

#[test]
fn test_sized_values_start_free() {
    for n in [1, 2, 7, 20] {
        let v = CorrelatedValues::new(n);
        assert_eq!(v.dimensions(), n);
        for i in 0..n {
            assert!(v.is_free(i).unwrap());
            assert!(!v.is_fixed(i).unwrap());
        }
    }
}

#[test]
fn test_free_and_fixed_clear_row_and_column() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let n = 5;
    let cov = crate::test_helpers::random_covariance(n, &mut rng);
    let mut v = CorrelatedValues::from_covariance(array![0.0, 1.0, 2.0, 3.0, 4.0], cov).unwrap();

    v.set_fixed(2).unwrap();
    assert!(v.is_fixed(2).unwrap());
    assert!(!v.is_free(2).unwrap());
    for j in (0..n).filter(|&j| j != 2) {
        assert_eq!(v.covariance_value(2, j).unwrap(), 0.0);
        assert_eq!(v.covariance_value(j, 2).unwrap(), 0.0);
    }

    v.set_free(2).unwrap();
    assert!(v.is_free(2).unwrap());
    assert!(!v.is_fixed(2).unwrap());

    v.set_free(4).unwrap();
    for j in 0..4 {
        assert_eq!(v.covariance_value(4, j).unwrap(), 0.0);
    }
    assert_eq!(v.ndof(), 3);
}

#[test]
fn property_set_covariance_is_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..20 {
        let n = rng.gen_range(1..12);
        let mut v = CorrelatedValues::new(n);
        for _ in 0..30 {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            v.set_covariance_value(i, j, rng.gen_range(-5.0..5.0)).unwrap();
        }
        for i in 0..n {
            for j in 0..n {
                assert_eq!(v.covariance_value(i, j).unwrap(), v.covariance_value(j, i).unwrap());
            }
        }
        assert!(v.validate(false));
    }
}

#[test]
fn test_out_of_range_indices() {
    let mut v = CorrelatedValues::new(4);
    assert!(matches!(v.value(4), Err(ReconError::Range(_))));
    assert!(matches!(v.set_value(usize::MAX, 0.0), Err(ReconError::Range(_))));
    assert!(matches!(v.covariance_value(4, 4), Err(ReconError::Range(_))));
    assert!(matches!(v.set_fixed(10), Err(ReconError::Range(_))));
    assert!(matches!(v.status(4), Err(ReconError::Range(_))));
}

#[test]
fn test_construction_errors() {
    let err = CorrelatedValues::from_uncertainties(array![1.0, 2.0, 3.0], &array![1.0, 2.0]).unwrap_err();
    assert!(matches!(err, ReconError::Construction(_)));
    assert!(err.to_string().contains("3 values but 2 uncertainties"));

    let err = CorrelatedValues::from_covariance(array![1.0], array![[1.0, 0.0], [0.0, 1.0]]).unwrap_err();
    assert!(matches!(err, ReconError::Construction(_)));
}

#[test]
fn test_value_with_uncertainty() {
    let u = CorrelatedValues::with_uncertainty(3.0, 2.0);
    assert_eq!(u.scalar_value().unwrap(), 3.0);
    assert_eq!(u.scalar_uncertainty().unwrap(), 2.0);
    assert_eq!(u.covariance_value(0, 0).unwrap(), 4.0);

    let mut w = u.clone();
    w.set_scalar_value(-1.0).unwrap();
    w.set_scalar_uncertainty(0.5).unwrap();
    assert_relative_eq!(w.covariance_value(0, 0).unwrap(), 0.25);
    assert!(matches!(CorrelatedValues::new(2).scalar_uncertainty(), Err(ReconError::Range(_))));
}

#[test]
fn test_status_roundtrip_through_covariance() {
    let mut v = CorrelatedValues::from_uncertainties(array![1.0, 2.0, 3.0], &array![1.0, 1.0, 1.0]).unwrap();
    v.set_covariance_value(0, 1, 0.3).unwrap();
    v.set_status(1, ParameterStatus::Free).unwrap();
    assert_eq!(v.status(1).unwrap(), ParameterStatus::Free);
    assert_eq!(v.covariance_value(0, 1).unwrap(), 0.0);
    assert_eq!(v.status(0).unwrap(), ParameterStatus::Constrained(1.0));
}
