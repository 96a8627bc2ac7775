//! Late joiners and authority migration.
//! A peer joining mid-session rebuilds the chain from the persisted registry
//! and the buffered spawns; a peer handed authority takes over broadcasting
//! the shared entities and may reshape the chain.

use convoy_peer::PeerEvent;
use convoy_shared::{DamageOutcome, NodeKind, Resolution};
use convoy_test::{assert_chains_converged, count_events, TestSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn late_joiner_rebuilds_chain_and_socket_contents() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let ids = session.build_chain(
        0,
        &[
            (NodeKind::Engine, 1),
            (NodeKind::Cargo, 2),
            (NodeKind::Turret, 1),
        ],
    );
    session
        .peer_mut(0)
        .inventory_mut()
        .insert(0, "Coal")
        .expect("free slot");
    session
        .peer_mut(0)
        .interact_socket(ids[1], 1, 0)
        .expect("authority deposits");
    let enemy = session.peer_mut(0).spawn_enemy(80).expect("authority spawns");
    session.peer_mut(0).request_damage(enemy, 30).expect("enemy is known");
    session.settle();

    let joiner = session.add_peer();
    session.settle();
    // Replicated fields reach the joiner with the next full-state resend.
    session.tick_n(32);

    assert_chains_converged!(session);
    let peer = session.peer(joiner);
    assert!(peer.late_join_complete());
    assert_eq!(peer.chain().len(), 3);
    assert!(peer.chain().is_fully_attached());
    let sockets = peer
        .prediction()
        .slots(&ids[1])
        .expect("cargo has sockets")
        .committed_items();
    assert_eq!(sockets, vec!["", "Coal", ""]);
    assert_eq!(peer.health(&enemy).map(|h| h.current()), Some(50));

    let events = session.take_events(joiner);
    let completions: Vec<&PeerEvent> = events
        .iter()
        .filter(|event| matches!(event, PeerEvent::LateJoinComplete { .. }))
        .collect();
    assert_eq!(completions, vec![&PeerEvent::LateJoinComplete { node_count: 3 }]);
}

#[test]
fn despawned_entities_are_not_replayed_to_joiners() {
    init_logging();
    let mut session = TestSession::with_peers(1);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Cargo, 1)]);
    let enemy = session.peer_mut(0).spawn_enemy(10).expect("authority spawns");
    session.settle();
    assert_eq!(session.session().buffered_count(), 3);

    session.peer_mut(0).despawn(&enemy).expect("authority despawns");
    session.peer_mut(0).despawn(&ids[1]).expect("authority despawns");
    session.settle();
    assert_eq!(session.session().buffered_count(), 1);

    let joiner = session.add_peer();
    session.settle();

    let peer = session.peer(joiner);
    assert_eq!(peer.entity_ids(), vec![ids[0]]);
    assert_eq!(peer.chain().len(), 1);
}

#[test]
fn new_authority_takes_over_shared_entities() {
    init_logging();
    let mut session = TestSession::with_peers(3);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Cargo, 1)]);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");
    session.settle();

    session.remove_peer(0);
    session.migrate_authority(1);
    session.settle();

    assert!(session.peer(1).is_authority());
    assert_eq!(session.peer(2).authority(), Some(session.peer_id(1)));

    assert_eq!(
        session.peer_mut(1).request_damage(enemy, 60),
        Ok(Resolution::Applied(DamageOutcome::Damaged))
    );
    let appended = session
        .peer_mut(1)
        .append_node(NodeKind::Turret, 2)
        .expect("new authority appends");
    session.settle();

    assert_eq!(session.peer(2).health(&enemy).map(|h| h.current()), Some(40));
    for index in 1..session.len() {
        let chain = session.peer(index).chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.entity_at(0), Some(ids[0]));
        assert_eq!(chain.entity_at(2), Some(appended));
        assert!(chain.is_fully_attached());
    }

    let events = session.take_events(2);
    assert_eq!(
        count_events(&events, |event| matches!(
            event,
            PeerEvent::AuthorityChanged { authority: Some(_) }
        )),
        1
    );
}

#[test]
fn peers_leaving_take_their_own_entities_with_them() {
    init_logging();
    let mut session = TestSession::with_peers(3);
    let player = session.peer_mut(2).spawn_player().expect("peer spawns");
    session.settle();
    assert!(session.peer(1).entity(&player).is_some());

    session.remove_peer(2);
    session.settle();

    assert!(session.peer(0).entity(&player).is_none());
    assert!(session.peer(1).entity(&player).is_none());
    assert_eq!(session.session().buffered_count(), 0);

    // A later joiner never sees it.
    let joiner = session.add_peer();
    session.settle();
    assert!(session.peer(joiner).entity(&player).is_none());
}
