use boss_arena::compute::init_state;
use boss_arena::config::Encounter;
use boss_arena::entities::*;

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq, so equality comparisons must work
    assert_eq!(GamePhase::Battle, GamePhase::Battle);
    assert_ne!(GamePhase::Intro, GamePhase::Battle);
    assert_eq!(ProjectileOwner::Player, ProjectileOwner::Player);
    assert_ne!(ProjectileOwner::Player, ProjectileOwner::Boss);
    assert_ne!(ProjectileKind::Egg, ProjectileKind::Orb);

    let kind = ProjectileKind::Fireball;
    assert_eq!(kind.clone(), ProjectileKind::Fireball);
}

#[test]
fn only_victory_and_defeat_are_terminal() {
    assert!(!GamePhase::Approach.is_terminal());
    assert!(!GamePhase::Intro.is_terminal());
    assert!(!GamePhase::Battle.is_terminal());
    assert!(GamePhase::Victory.is_terminal());
    assert!(GamePhase::Defeat.is_terminal());
}

#[test]
fn boss_phase_orders_and_numbers() {
    assert!(BossPhase::One < BossPhase::Two);
    assert!(BossPhase::Two < BossPhase::Three);
    assert_eq!(BossPhase::One.number(), 1);
    assert_eq!(BossPhase::Three.number(), 3);
    assert_eq!(BossPhase::Two.index(), 1);
}

#[test]
fn horizontal_axis_cancels_opposite_keys() {
    let none = InputState::default();
    let left = InputState { left: true, ..InputState::default() };
    let right = InputState { right: true, ..InputState::default() };
    let both = InputState { left: true, right: true, ..InputState::default() };
    assert_eq!(none.horizontal_axis(), 0.0);
    assert_eq!(left.horizontal_axis(), -1.0);
    assert_eq!(right.horizontal_axis(), 1.0);
    assert_eq!(both.horizontal_axis(), 0.0);
}

#[test]
fn up_doubles_as_jump() {
    assert!(InputState { up: true, ..InputState::default() }.wants_jump());
    assert!(InputState { jump: true, ..InputState::default() }.wants_jump());
    assert!(!InputState { down: true, ..InputState::default() }.wants_jump());
}

#[test]
fn body_edges_and_centre() {
    let b = Body::at(10.0, 20.0, 16.0, 8.0);
    assert_eq!(b.bottom(), 28.0);
    assert_eq!(b.center_x(), 18.0);
    assert_eq!(b.center_y(), 24.0);
    assert_eq!(b.vx, 0.0);
    assert!(!b.on_ground);
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(&Encounter::castle()).unwrap();
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.body.x = 99.0;
    cloned.boss.health = 1;
    cloned.projectiles.push(Projectile {
        id: 0,
        owner: ProjectileOwner::Boss,
        kind: ProjectileKind::Fireball,
        x: 5.0,
        y: 5.0,
        vx: 0.0,
        vy: 0.0,
        radius: 4.0,
        lifetime: 10,
        motion: ProjectileMotion::Linear,
        margin: 0.0,
    });

    assert_eq!(cloned.projectiles.len(), 1);
    assert_eq!(original.player.body.x, 32.0);
    assert_eq!(original.boss.health, 12);
    assert!(original.projectiles.is_empty());
}
