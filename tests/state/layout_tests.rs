use approx::assert_relative_eq;
use nalgebra::Vector4;
use recon_state::state::{layout_offset, SchemaBuilder};
use recon_state::{
    BlockKind, Bundle, ClusterState, EDepositBlock, PidState, PositionBlock, ReconState, Schema, ShowerState,
    StateLayout, TrackState, VertexState,
};

#[test]
fn test_offsets_follow_declared_order() {
    for a in BlockKind::ALL {
        for b in BlockKind::ALL.into_iter().filter(|&b| b != a) {
            let schema = Schema::builder().block(a).block(b).build();
            assert_eq!(schema.offset_of(a), Some(0));
            assert_eq!(schema.offset_of(b), Some(a.size()));
            assert_eq!(schema.dimension(), a.size() + b.size());
        }
    }
}

#[test]
fn test_typed_layouts() {
    let expected: [(&str, &[BlockKind], usize); 5] = [
        (ClusterState::NAME, ClusterState::BLOCKS, 5),
        (ShowerState::NAME, ShowerState::BLOCKS, 9),
        (TrackState::NAME, TrackState::BLOCKS, 10),
        (VertexState::NAME, VertexState::BLOCKS, 4),
        (PidState::NAME, PidState::BLOCKS, 9),
    ];
    for (name, blocks, dimension) in expected {
        let schema = Schema::from_blocks(blocks);
        assert_eq!(schema.dimension(), dimension, "{}", name);
        assert_eq!(ReconState::new(schema).dimension(), dimension, "{}", name);
    }
    assert_eq!(layout_offset(ShowerState::BLOCKS, BlockKind::Cone), 8);
}

#[test]
fn test_capabilities_of_typed_states() {
    let track = TrackState::new();
    assert!(track.supports(BlockKind::Curvature));
    assert!(!track.supports(BlockKind::Momentum));
    assert!(track.supports_bundle(Bundle::PositionDirectionCurvature));

    let pid = PidState::new();
    assert!(pid.supports_bundle(Bundle::PositionDirection));
    assert!(!pid.supports_bundle(Bundle::PositionDirectionCurvature));

    let vertex = VertexState::new();
    assert!(!vertex.supports_bundle(Bundle::PositionDirection));
}

#[test]
fn test_runtime_state_matches_typed_state() {
    let schema = SchemaBuilder::default()
        .block(BlockKind::EDeposit)
        .block(BlockKind::Position)
        .build();
    let state = ReconState::new(schema);
    let mut cluster = ClusterState::try_from(state).unwrap();
    cluster.set_edeposit(4.2);
    cluster.set_edeposit_variance(0.04);
    cluster.set_position(&Vector4::new(0.0, 1.0, 2.0, 3.0));
    assert_eq!(cluster.value(0).unwrap(), 4.2);
    assert_relative_eq!(cluster.uncertainty(0).unwrap(), 0.2);
    assert_eq!(cluster.ndof(), 1);
}

#[test]
fn test_type_hash_tracks_layout() {
    let track = TrackState::new();
    let shower = ShowerState::new();
    assert_ne!(track.values().type_hash(), shower.values().type_hash());
    assert_eq!(track.values().type_hash(), TrackState::new().values().type_hash());
}
