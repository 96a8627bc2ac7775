//! Damage resolution through the deciding peer.
//! Only the authority (or the owner of a self-owned entity) ever mutates
//! health; everyone else forwards a request and mirrors the broadcast.

use convoy_peer::{PeerError, PeerEvent};
use convoy_shared::{DamageOutcome, EntityOwner, Resolution, SendTarget, HEALTH_CURRENT};
use convoy_test::{count_events, TestSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn deaths(events: &[PeerEvent]) -> usize {
    count_events(events, |event| {
        matches!(event, PeerEvent::DeathConfirmed { .. })
    })
}

#[test]
fn lethal_damage_clamps_to_zero_and_confirms_death_once() {
    init_logging();
    let mut session = TestSession::with_peers(3);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");
    session.settle();

    assert_eq!(
        session.peer_mut(0).request_damage(enemy, 70),
        Ok(Resolution::Applied(DamageOutcome::Damaged))
    );
    session.settle();
    for index in 0..session.len() {
        assert_eq!(session.peer(index).health(&enemy).map(|h| h.current()), Some(30));
        session.take_events(index);
    }

    let resolution = session
        .peer_mut(1)
        .request_damage(enemy, 40)
        .expect("enemy is known");
    assert!(matches!(
        resolution,
        Resolution::Forwarded {
            to: SendTarget::Authority,
            ..
        }
    ));
    // The requester never touches its mirror.
    assert_eq!(session.peer(1).health(&enemy).map(|h| h.current()), Some(30));

    session.settle();
    for index in 0..session.len() {
        let health = session.peer(index).health(&enemy).expect("enemy present");
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
        let events = session.take_events(index);
        assert_eq!(deaths(&events), 1, "peer {} death count", index);
    }

    // Hitting a dead entity changes nothing and announces nothing.
    assert_eq!(
        session.peer_mut(0).request_damage(enemy, 10),
        Ok(Resolution::Applied(DamageOutcome::AlreadyDead))
    );
    session.settle();
    for index in 0..session.len() {
        assert_eq!(deaths(&session.take_events(index)), 0);
    }
}

#[test]
fn unchanged_resends_do_not_report_changes() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");
    session.settle();
    session.peer_mut(0).request_damage(enemy, 5).expect("enemy is known");
    session.settle();

    let events = session.take_events(1);
    assert_eq!(
        count_events(&events, |event| matches!(
            event,
            PeerEvent::FieldChanged { field, .. } if *field == HEALTH_CURRENT
        )),
        1
    );

    // Spans several full-state resends.
    session.tick_n(100);
    let events = session.take_events(1);
    assert_eq!(
        count_events(&events, |event| matches!(event, PeerEvent::FieldChanged { .. })),
        0
    );
    assert_eq!(session.peer(1).health(&enemy).map(|h| h.current()), Some(95));
}

#[test]
fn self_owned_entities_are_decided_by_their_owner() {
    init_logging();
    let mut session = TestSession::with_peers(3);
    let player = session.peer_mut(1).spawn_player().expect("peer spawns");
    session.settle();

    let owner = EntityOwner::Peer(session.peer_id(1));
    for index in 0..session.len() {
        assert_eq!(
            session.peer(index).entity(&player).map(|entity| entity.owner()),
            Some(owner)
        );
    }

    // Even the authority forwards to the owner.
    let resolution = session
        .peer_mut(0)
        .request_damage(player, 25)
        .expect("player is known");
    assert_eq!(
        resolution,
        Resolution::Forwarded {
            rpc: convoy_shared::Rpc::RequestDamage {
                entity: player,
                amount: 25
            },
            to: SendTarget::Peer(session.peer_id(1)),
        }
    );
    assert_eq!(session.peer(0).health(&player).map(|h| h.current()), Some(100));

    session.peer_mut(2).request_damage(player, 25).expect("player is known");
    session.settle();

    for index in 0..session.len() {
        assert_eq!(session.peer(index).health(&player).map(|h| h.current()), Some(50));
    }
}

#[test]
fn observers_cannot_spawn_shared_entities() {
    init_logging();
    let mut session = TestSession::with_peers(2);

    assert_eq!(
        session.peer_mut(1).spawn_enemy(10),
        Err(PeerError::NotAuthority {
            operation: "spawn enemies"
        })
    );
    let enemy = session.peer_mut(0).spawn_enemy(10).expect("authority spawns");
    session.settle();
    assert!(matches!(
        session.peer_mut(1).despawn(&enemy),
        Err(PeerError::NotAuthority { .. })
    ));
    assert!(session.peer(1).entity(&enemy).is_some());
}

#[test]
fn damage_requests_without_an_authority_are_dropped() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");
    session.settle();

    session.remove_peer(0);
    session.settle();
    assert_eq!(session.peer(1).authority(), None);

    assert_eq!(
        session.peer_mut(1).request_damage(enemy, 10),
        Ok(Resolution::Dropped)
    );
    assert_eq!(session.peer(1).health(&enemy).map(|h| h.current()), Some(100));

    let events = session.take_events(1);
    assert!(events.contains(&PeerEvent::PeerLeft {
        peer: session.peer_id(0)
    }));
    assert!(events.contains(&PeerEvent::AuthorityChanged { authority: None }));
}
