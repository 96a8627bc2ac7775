//! Timed turret attacks.
//! A scheduled shot fires after the turret's attack delay, resolves its
//! damage through the authority and announces a muzzle flash to everyone.

use convoy_peer::{PeerError, PeerEvent};
use convoy_shared::{EffectKind, NodeKind, Pose};
use convoy_test::{count_events, TestSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn turret_shot_lands_after_its_delay() {
    init_logging();
    let mut session = TestSession::with_peers(2);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Turret, 1)]);
    let turret = ids[1];
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");
    session.settle();
    session.take_events(1);

    let stats = NodeKind::Turret.behavior().stats(1);
    // Observers may fire too; the damage is forwarded to the authority.
    session
        .peer_mut(1)
        .schedule_turret_attack(turret, enemy)
        .expect("turret can attack");
    assert_eq!(session.peer(1).pending_tasks(), 1);

    session.tick_n(stats.attack_delay_ticks as usize - 1);
    assert_eq!(session.peer(0).health(&enemy).map(|h| h.current()), Some(100));

    session.tick();
    session.settle();
    assert_eq!(session.peer(1).pending_tasks(), 0);
    for index in 0..session.len() {
        assert_eq!(
            session.peer(index).health(&enemy).map(|h| h.current()),
            Some(100 - stats.attack_damage)
        );
    }

    let events = session.take_events(0);
    assert_eq!(
        count_events(&events, |event| matches!(
            event,
            PeerEvent::EffectSpawned {
                effect: EffectKind::MuzzleFlash,
                ..
            }
        )),
        1
    );
}

#[test]
fn only_registered_turrets_can_attack() {
    init_logging();
    let mut session = TestSession::with_peers(1);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Turret, 1)]);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");

    assert!(matches!(
        session.peer_mut(0).schedule_turret_attack(ids[0], enemy),
        Err(PeerError::CannotAttack { .. })
    ));
    assert!(matches!(
        session.peer_mut(0).schedule_turret_attack(enemy, ids[0]),
        Err(PeerError::NotANode { .. })
    ));
    assert_eq!(session.peer(0).pending_tasks(), 0);
}

#[test]
fn despawning_the_target_cancels_the_shot() {
    init_logging();
    let mut session = TestSession::with_peers(1);
    let ids = session.build_chain(0, &[(NodeKind::Engine, 1), (NodeKind::Turret, 1)]);
    let enemy = session.peer_mut(0).spawn_enemy(100).expect("authority spawns");

    session
        .peer_mut(0)
        .schedule_turret_attack(ids[1], enemy)
        .expect("turret can attack");
    session.peer_mut(0).despawn(&enemy).expect("authority despawns");
    assert_eq!(session.peer(0).pending_tasks(), 0);

    session.tick_n(64);
    let events = session.take_events(0);
    assert_eq!(
        count_events(&events, |event| matches!(event, PeerEvent::EffectSpawned { .. })),
        0
    );
}

#[test]
fn effects_reach_every_peer() {
    init_logging();
    let mut session = TestSession::with_peers(3);
    let pose = Pose::IDENTITY;

    session.peer_mut(2).spawn_effect(EffectKind::Explosion, pose);
    session.settle();

    for index in 0..session.len() {
        let events = session.take_events(index);
        assert!(events.contains(&PeerEvent::EffectSpawned {
            effect: EffectKind::Explosion,
            pose,
        }));
    }
}
