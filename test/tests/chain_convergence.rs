//! Chain topology convergence across peers.
//! Node spawns and registry batches travel on independent streams, so an
//! observer may see either first. Whatever the order, every peer must end up
//! with the same nodes at the same indices, all attached at the same poses.

use proptest::prelude::*;

use convoy_peer::PeerEvent;
use convoy_shared::{NodeKind, NodeState};
use convoy_test::{assert_chains_converged, count_events, TestSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn observers_attach_nodes_in_registry_order() {
    init_logging();
    let mut session = TestSession::with_peers(3);

    let ids = session.build_chain(
        0,
        &[
            (NodeKind::Engine, 1),
            (NodeKind::Cargo, 2),
            (NodeKind::Turret, 1),
        ],
    );

    assert_chains_converged!(session);
    for index in 0..session.len() {
        let chain = session.peer(index).chain();
        assert!(chain.is_fully_attached());
        for (position, id) in ids.iter().enumerate() {
            assert_eq!(chain.index_of(id), Some(position));
            assert_eq!(chain.node(id).map(|node| node.state()), Some(NodeState::Attached));
        }
        assert_eq!(chain.predecessor(&ids[1]), Some(ids[0]));
        assert_eq!(chain.successor(&ids[1]), Some(ids[2]));
    }

    let events = session.take_events(1);
    assert_eq!(
        count_events(&events, |event| matches!(event, PeerEvent::NodeAttached { .. })),
        3
    );
}

#[test]
fn node_rear_socket_anchors_its_successor() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Cargo, 1)]);

    let chain = session.peer(1).chain();
    let engine = chain.node(&ids[0]).expect("engine present");
    let cargo = chain.node(&ids[1]).expect("cargo present");
    let rear = engine.rear_pose().expect("engine is attached");
    assert!(cargo.pose().abs_diff_eq(&rear, 1e-4));
}

#[test]
fn appends_beyond_max_length_are_refused() {
    init_logging();
    let mut session = TestSession::with_peers(1);
    let max_length = session.peer(0).chain().config().max_length;
    for _ in 0..max_length {
        session
            .peer_mut(0)
            .append_node(NodeKind::Cargo, 1)
            .expect("room for another node");
    }

    assert!(session.peer_mut(0).append_node(NodeKind::Cargo, 1).is_err());
    assert_eq!(session.peer(0).chain().len(), max_length);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn chain_converges_under_any_delivery_order(
        seed in any::<u64>(),
        nodes in prop::collection::vec((0i32..4, 1u8..=3), 1..8),
        tick_between in any::<bool>(),
    ) {
        let mut session = TestSession::shuffled(seed);
        for _ in 0..3 {
            session.add_peer();
        }

        for (code, level) in nodes.iter().copied() {
            let kind = NodeKind::from_code(code).expect("valid node code");
            session.peer_mut(0).append_node(kind, level).expect("authority appends");
            if tick_between {
                session.tick();
            }
        }
        session.settle();

        // A late joiner converges too.
        session.add_peer();
        session.settle();

        prop_assert_eq!(session.peer(0).chain().len(), nodes.len());
        assert_chains_converged!(session);
    }
}
