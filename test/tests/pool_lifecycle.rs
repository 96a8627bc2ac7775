//! Pooled spawning and despawning.
//! Prefabs with a pool hand instances back on despawn and reuse them on the
//! next spawn; prefabs without one are built and dropped every time.

use convoy_peer::PeerEvent;
use convoy_shared::{DespawnOutcome, NodeKind, Prefab};
use convoy_test::{count_events, TestSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn despawned_enemies_are_reused_on_every_peer() {
    init_logging();
    let mut session = TestSession::with_peers(2);

    let first = session.peer_mut(0).spawn_enemy(60).expect("authority spawns");
    session.peer_mut(0).request_damage(first, 50).expect("enemy is known");
    session.settle();
    session.peer_mut(0).despawn(&first).expect("authority despawns");
    session.settle();

    for index in 0..session.len() {
        let stats = session
            .peer(index)
            .pools()
            .stats(&Prefab::Enemy)
            .expect("enemies are pooled");
        assert_eq!(stats.created, 1);
        assert_eq!(stats.idle, 1);
        let events = session.take_events(index);
        assert!(events.contains(&PeerEvent::Despawned {
            entity: first,
            outcome: DespawnOutcome::Pooled,
        }));
    }

    let second = session.peer_mut(0).spawn_enemy(60).expect("authority spawns");
    session.settle();
    session.tick_n(32);

    assert_ne!(first, second);
    for index in 0..session.len() {
        let peer = session.peer(index);
        let stats = peer.pools().stats(&Prefab::Enemy).expect("enemies are pooled");
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused, 1);
        assert_eq!(stats.idle, 0);
        assert!(peer.pools().is_live(&second));
        assert!(!peer.pools().is_live(&first));

        // A reused instance starts over at full health.
        let health = peer.health(&second).expect("enemy present");
        assert_eq!(health.current(), 60);
        assert!(!health.is_dead());
    }
}

#[test]
fn players_are_not_pooled() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let player = session.peer_mut(1).spawn_player().expect("peer spawns");
    session.settle();

    assert!(!session.peer(1).pools().has_pool(&Prefab::Player));
    session.peer_mut(1).despawn(&player).expect("owner despawns");
    session.settle();

    for index in 0..session.len() {
        assert!(session.peer(index).entity(&player).is_none());
        let events = session.take_events(index);
        assert!(events.contains(&PeerEvent::Despawned {
            entity: player,
            outcome: DespawnOutcome::Destroyed,
        }));
    }
}

#[test]
fn every_node_kind_has_its_own_pool() {
    init_logging();
    let mut session = TestSession::with_peers(1);
    let kinds = [
        NodeKind::Engine,
        NodeKind::Cargo,
        NodeKind::Turret,
        NodeKind::Radar,
    ];
    let ids = session.build_chain(0, &kinds.map(|kind| (kind, 1)));

    session.peer_mut(0).despawn(&ids[0]).expect("authority despawns");
    session.settle();

    let peer = session.peer(0);
    for kind in kinds {
        let stats = peer
            .pools()
            .stats(&Prefab::Node(kind))
            .expect("nodes are pooled");
        assert_eq!(stats.idle, 1, "{:?} pool", kind);
    }
    assert_eq!(peer.pools().live_count(), 0);

    let events = session.take_events(0);
    assert_eq!(
        count_events(&events, |event| matches!(event, PeerEvent::Despawned { .. })),
        4
    );
}
