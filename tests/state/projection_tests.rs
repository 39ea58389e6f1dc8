use nalgebra::{Vector3, Vector4};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use recon_state::{
    project, project_with_bundles, BlockKind, Bundle, ClusterState, DirectionBlock, PidState, PositionBlock,
    ReconState, Schema, ShowerState, StateLayout, TrackState, VertexState,
};

fn randomize(state: &mut ReconState, rng: &mut ChaCha8Rng) {
    let n = state.dimension();
    for i in 0..n {
        state.set_value(i, rng.gen_range(-10.0..10.0)).unwrap();
        state.set_covariance_value(i, i, rng.gen_range(0.1..2.0)).unwrap();
        for j in (i + 1)..n {
            state.set_covariance_value(i, j, rng.gen_range(-0.05..0.05)).unwrap();
        }
    }
}

#[test]
fn property_projection_onto_own_schema() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut states: Vec<ReconState> = vec![
        ClusterState::new().into(),
        ShowerState::new().into(),
        TrackState::new().into(),
        VertexState::new().into(),
        PidState::new().into(),
    ];
    for state in states.iter_mut() {
        randomize(state, &mut rng);
        let projected = project(state, state.schema());
        assert_eq!(projected.values(), state.values().values());
        assert_eq!(projected.type_hash(), state.values().type_hash());
        for slot in state.schema().slots() {
            for i in 0..slot.kind.size() {
                for j in 0..slot.kind.size() {
                    let (a, b) = (slot.offset + i, slot.offset + j);
                    assert_eq!(
                        projected.covariance_value(a, b).unwrap(),
                        state.covariance_value(a, b).unwrap()
                    );
                }
            }
        }
    }
}

#[test]
fn test_vertex_as_track() {
    let mut vertex = VertexState::new();
    vertex.set_position(&Vector4::new(1.0, 2.0, 3.0, 4.0));
    vertex.set_position_variance(&Vector4::new(1.0, 1.0, 1.0, 1.0));

    let as_track = project(&vertex, &TrackState::schema());
    let free: Vec<bool> = (0..as_track.dimensions()).map(|i| as_track.is_free(i).unwrap()).collect();
    assert_eq!(
        free,
        vec![true, false, false, false, false, true, true, true, true, true]
    );
}

#[test]
fn test_track_to_pid_keeps_cross_covariance_only_with_bundles() {
    let mut track = TrackState::new();
    track.set_position(&Vector4::new(0.0, 0.0, 0.0, 0.0));
    track.set_direction(&Vector3::new(0.0, 1.0, 0.0));
    track.set_position_variance(&Vector4::new(1.0, 1.0, 1.0, 1.0));
    track.set_direction_variance(&Vector3::new(0.1, 0.1, 0.1));
    track
        .set_covariance_value(TrackState::POSITION_INDEX + 1, TrackState::DIRECTION_INDEX + 1, 0.2)
        .unwrap();

    let generic = project(&track, &PidState::schema());
    let bundled = project_with_bundles(&track, &PidState::schema(), &[Bundle::PositionDirection]);
    let (a, b) = (PidState::POSITION_INDEX + 1, PidState::DIRECTION_INDEX + 1);
    assert_eq!(generic.covariance_value(a, b).unwrap(), 0.0);
    assert_eq!(bundled.covariance_value(a, b).unwrap(), 0.2);
    assert_eq!(generic.values(), bundled.values());
}

#[test]
fn test_each_block_projects_alone() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut track: ReconState = TrackState::new().into();
    randomize(&mut track, &mut rng);
    for kind in BlockKind::ALL {
        let single = project(&track, &Schema::single(kind));
        assert_eq!(single.dimensions(), kind.size());
        match track.block_offset(kind) {
            Some(offset) => assert_eq!(single.value(0).unwrap(), track.value(offset).unwrap()),
            None => assert!((0..kind.size()).all(|i| single.is_free(i).unwrap())),
        }
    }
}
