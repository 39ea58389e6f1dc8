use std::rc::Rc;

use recon_state::{
    BlockKind, NodeLedger, ReconError, ReconNode, ReconState, Schema, ShowerState, StateLayout, TrackState,
};

struct Cluster {
    hits: usize,
}

fn track_snapshot() -> Rc<ReconState> {
    Rc::new(TrackState::new().into_inner())
}

#[test]
fn test_push_without_object_fails() {
    let mut ledger: NodeLedger<Cluster> = NodeLedger::new(TrackState::schema());
    let err = ledger
        .push(ReconNode::new(Some(track_snapshot()), None, 0.0))
        .unwrap_err();
    assert!(matches!(err, ReconError::MissingObject(_)));
    assert_eq!(ledger.len(), 0);
}

#[test]
fn test_push_with_wrong_state_fails() {
    let mut ledger = NodeLedger::for_layout::<TrackState>();
    let shower = Rc::new(ShowerState::new().into_inner());
    let err = ledger
        .push(ReconNode::new(Some(shower), Some(Rc::new(Cluster { hits: 3 })), 0.0))
        .unwrap_err();
    match err {
        ReconError::WrongStateType(msg) => assert!(msg.contains("Cone")),
        other => panic!("Expected WrongStateType, got {:?}", other),
    }
    assert!(ledger.is_empty());
}

#[test]
fn test_valid_push_grows_by_one() {
    let mut ledger = NodeLedger::for_layout::<TrackState>();
    let object = Rc::new(Cluster { hits: 12 });
    for k in 0..5 {
        let before = ledger.len();
        ledger
            .push(ReconNode::new(Some(track_snapshot()), Some(object.clone()), k as f64))
            .unwrap();
        assert_eq!(ledger.len(), before + 1);
    }
    let qualities: Vec<f64> = (&ledger).into_iter().map(|node| node.quality()).collect();
    assert_eq!(qualities, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert!(ledger.iter().all(|node| node.object().unwrap().hits == 12));
}

#[test]
fn test_runtime_schema_ledger() {
    let schema = Schema::from_blocks(&[BlockKind::Position, BlockKind::Direction]);
    let mut ledger = NodeLedger::new(schema.clone());
    let state = Rc::new(ReconState::new(schema));
    ledger
        .push(ReconNode::new(Some(state.clone()), Some(Rc::new(Cluster { hits: 1 })), 0.0))
        .unwrap();
    assert!(Rc::ptr_eq(ledger.get(0).unwrap().state().unwrap(), &state));
    assert!(ledger.get(1).is_none());
}
