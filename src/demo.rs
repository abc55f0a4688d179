/// Demo-mode autopilot: produces an `InputState` from the current state so
/// the game can play itself (headless runs, attract mode).
///
/// Movement is chosen first, then stepped once to see where the hero will
/// be when the attack resolves.  A throw is only released if a dry run of
/// its arc meets the boss before it expires.

use crate::collision::{bodies_touch, body_hit_by, in_bounds, HitShape};
use crate::compute::{step_player, thrown_projectile};
use crate::config::{Encounter, PlayerAttack, ThrowParams};
use crate::entities::{Body, GamePhase, GameState, InputState, Player, ProjectileOwner};
use crate::physics::step_projectile;

/// Hostile projectiles closer than this make a grounded hero jump.
const THREAT_RADIUS: f32 = 28.0;
/// Distance kept from the boss when throwing.
const THROW_RANGE: f32 = 48.0;
const DEAD_ZONE: f32 = 4.0;

pub fn autopilot(state: &GameState, encounter: &Encounter) -> InputState {
    if state.phase != GamePhase::Battle {
        return InputState::default();
    }

    let hero = &state.player.body;
    let boss = &state.boss.body;
    let boss_to_right = boss.center_x() > hero.center_x();
    let facing_boss = state.player.facing_right == boss_to_right;
    let throwing = matches!(encounter.hero.attack, PlayerAttack::Throw(_));

    // Throws need the hero turned toward the boss; a melee strike does not.
    let dx = standoff_x(state, encounter) - hero.center_x();
    let (left, right) = if dx.abs() > DEAD_ZONE {
        (dx < 0.0, dx > 0.0)
    } else if throwing && !facing_boss {
        (!boss_to_right, boss_to_right)
    } else {
        (false, false)
    };

    let threatened = state.projectiles_of(ProjectileOwner::Boss).any(|p| {
        HitShape::Circle {
            radius: THREAT_RADIUS,
        }
        .contains(hero.center_x(), hero.center_y(), p.x, p.y)
    });
    let movement = InputState {
        left,
        right,
        jump: hero.on_ground && (threatened || boss_overhead(state, encounter)),
        ..InputState::default()
    };

    let next = step_player(&state.player, encounter, &movement);
    let attack = next.attack_cooldown == 0
        && match encounter.hero.attack {
            PlayerAttack::Throw(throw) => {
                state.projectiles_of(ProjectileOwner::Player).count() < throw.max_active
                    && throw_connects(state, encounter, &next, &throw)
            }
            PlayerAttack::Melee { reach } => {
                state.boss.invulnerable_timer == 0 && bodies_touch(&next.body, reach, boss)
            }
        };

    InputState { attack, ..movement }
}

/// Centre x the hero heads for: `THROW_RANGE` off the boss on the side it
/// already occupies, or the other side when that is outside the world.
/// Melee heroes stand under the boss.
fn standoff_x(state: &GameState, encounter: &Encounter) -> f32 {
    let boss_x = state.boss.body.center_x();
    let standoff = match encounter.hero.attack {
        PlayerAttack::Throw(_) => THROW_RANGE,
        PlayerAttack::Melee { .. } => 0.0,
    };
    let side = if state.player.body.center_x() < boss_x { -1.0 } else { 1.0 };
    let half = state.player.body.width / 2.0;
    let goal = boss_x + side * standoff;
    if goal < half || goal > encounter.world.width - half {
        boss_x - side * standoff
    } else {
        goal
    }
}

/// Is the boss above anything the hero can hit without leaving the
/// ground?  A throw reaches the apex of its arc plus the hurtbox.
fn boss_overhead(state: &GameState, encounter: &Encounter) -> bool {
    let boss_y = state.boss.body.center_y();
    match encounter.hero.attack {
        PlayerAttack::Throw(throw) => {
            let release = thrown_projectile(&state.player, &throw, 0);
            let rise = if throw.speed_y < 0.0 && throw.gravity > 0.0 {
                throw.speed_y * throw.speed_y / (2.0 * throw.gravity)
            } else {
                0.0
            };
            boss_y < release.y - rise - encounter.boss.hurtbox.vertical_reach()
        }
        PlayerAttack::Melee { reach } => {
            boss_y < state.player.body.center_y() - reach.vertical_reach()
        }
    }
}

/// Fly a throw from `thrower` frame by frame and report whether it meets
/// the boss, assuming the boss holds its current horizontal velocity.
fn throw_connects(
    state: &GameState,
    encounter: &Encounter,
    thrower: &Player,
    throw: &ThrowParams,
) -> bool {
    let boss = &state.boss;
    let world = encounter.world;
    let mut shot = thrown_projectile(thrower, throw, 0);

    for t in 1..=throw.lifetime {
        shot = step_projectile(&shot, &encounter.platforms, encounter.landing_tolerance);
        if shot.lifetime == 0 || !in_bounds(shot.x, shot.y, world.width, world.height, shot.margin)
        {
            return false;
        }
        let ahead = Body {
            x: boss.body.x + boss.body.vx * t as f32,
            ..boss.body
        };
        if t >= boss.invulnerable_timer && body_hit_by(&ahead, encounter.boss.hurtbox, &shot) {
            return true;
        }
    }
    false
}
