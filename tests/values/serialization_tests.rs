use ndarray::array;
use recon_state::{CorrelatedValues, CovarianceConfig, TrackState, FIXED_VALUE, FREE_VALUE};

#[test]
fn test_sentinels_survive_json() {
    let mut v = CorrelatedValues::from_uncertainties(array![1.0, 2.0, 3.0], &array![1.0, 1.0, 1.0]).unwrap();
    v.set_free(0).unwrap();
    v.set_fixed(2).unwrap();
    v.set_type("A B C ");

    let json = serde_json::to_string(&v).unwrap();
    let back: CorrelatedValues = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
    assert_eq!((back.covariance_value(0, 0).unwrap() as f32).to_bits(), FREE_VALUE.to_bits());
    assert_eq!((back.covariance_value(2, 2).unwrap() as f32).to_bits(), FIXED_VALUE.to_bits());
    assert!(back.is_free(0).unwrap());
    assert!(back.is_fixed(2).unwrap());
    assert_eq!(back.ndof(), 1);
}

#[test]
fn test_state_and_config_roundtrip() {
    let track = TrackState::new();
    let json = serde_json::to_string(&track).unwrap();
    let back: TrackState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, track);

    let config = CovarianceConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<CovarianceConfig>(&json).unwrap(), config);
}
