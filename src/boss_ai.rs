/// Boss behaviour: phase escalation, movement patterns and attack volleys.

use std::f32::consts::PI;

use rand::Rng;

use crate::config::Encounter;
use crate::entities::{
    Boss, BossPhase, Projectile, ProjectileKind, ProjectileMotion, ProjectileOwner,
};
use crate::physics::{apply_gravity, clamp_horizontal, clamp_to_floor, integrate, resolve_landing};

// ── Tables ────────────────────────────────────────────────────────────────────

/// One phase's volley: an angular offset per projectile and the frames
/// between volleys.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackPattern {
    pub offsets: Vec<f32>,
    pub cooldown: u32,
}

impl AttackPattern {
    pub fn new(offsets: &[f32], cooldown: u32) -> Self {
        AttackPattern {
            offsets: offsets.to_vec(),
            cooldown,
        }
    }
}

/// Per-phase volleys plus the shape of every projectile the boss fires.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackTable {
    pub phases: [AttackPattern; 3],
    pub kind: ProjectileKind,
    pub speed: f32,
    pub radius: f32,
    pub lifetime: u32,
    pub margin: f32,
}

impl AttackTable {
    pub fn pattern(&self, phase: BossPhase) -> &AttackPattern {
        &self.phases[phase.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossMovement {
    /// Run at the player for `chase_frames` out of every `cycle_frames`,
    /// hop around at random for the rest.
    Chase {
        speed_per_phase: f32,
        chase_frames: u64,
        cycle_frames: u64,
        jump_chance: f32,
        jump_power: f32,
    },
    /// Float back and forth, `half_period` frames each way.
    Pace { speed: f32, half_period: u64 },
    /// Sinusoidal drift that widens with each phase; settles on `rest_y`.
    Sway {
        frequency: f32,
        amplitude_per_phase: f32,
        rest_y: f32,
    },
}

// ── Phase escalation ─────────────────────────────────────────────────────────

/// Two thirds of max health or less is phase two, one third or less is
/// phase three.  Integer arithmetic keeps the thresholds exact.
pub fn phase_for_health(health: u32, max_health: u32) -> BossPhase {
    let scaled = health as u64 * 3;
    let max = max_health as u64;
    if scaled <= max {
        BossPhase::Three
    } else if scaled <= max * 2 {
        BossPhase::Two
    } else {
        BossPhase::One
    }
}

/// Never steps back, even if handed a higher health than before.
pub fn advance_phase(current: BossPhase, health: u32, max_health: u32) -> BossPhase {
    current.max(phase_for_health(health, max_health))
}

/// Re-derive the boss phase.  Returns the new phase if it changed; the
/// attack timer is shortened to the new phase's cooldown when it was
/// waiting longer than that.
pub fn escalate(boss: &Boss, table: &AttackTable) -> (Boss, Option<BossPhase>) {
    let phase = advance_phase(boss.phase, boss.health, boss.max_health);
    if phase == boss.phase {
        return (boss.clone(), None);
    }
    let cooldown = table.pattern(phase).cooldown;
    let boss = Boss {
        phase,
        attack_timer: boss.attack_timer.min(cooldown),
        ..boss.clone()
    };
    (boss, Some(phase))
}

// ── Attacks ───────────────────────────────────────────────────────────────────

/// Absolute angles of a volley: each offset applied to the facing
/// direction (0 rad right, π rad left).
pub fn fan_angles(facing_right: bool, offsets: &[f32]) -> Vec<f32> {
    let base = if facing_right { 0.0 } else { PI };
    offsets.iter().map(|offset| base + offset).collect()
}

/// Count the attack timer down one frame.  When it runs out, returns the
/// angles to fire and rearms the timer with the current phase's cooldown.
pub fn countdown_attack(boss: &Boss, table: &AttackTable) -> (Boss, Option<Vec<f32>>) {
    let timer = boss.attack_timer.saturating_sub(1);
    if timer > 0 {
        return (
            Boss {
                attack_timer: timer,
                ..boss.clone()
            },
            None,
        );
    }
    let pattern = table.pattern(boss.phase);
    let angles = fan_angles(boss.facing_right, &pattern.offsets);
    (
        Boss {
            attack_timer: pattern.cooldown,
            ..boss.clone()
        },
        Some(angles),
    )
}

/// Build the projectiles of a volley, fired from the boss centre.  Ids are
/// assigned sequentially from `first_id`.
pub fn spawn_volley(
    boss: &Boss,
    table: &AttackTable,
    angles: &[f32],
    first_id: u64,
) -> Vec<Projectile> {
    let cx = boss.body.center_x();
    let cy = boss.body.center_y();
    angles
        .iter()
        .enumerate()
        .map(|(i, angle)| Projectile {
            id: first_id + i as u64,
            owner: ProjectileOwner::Boss,
            kind: table.kind,
            x: cx,
            y: cy,
            vx: angle.cos() * table.speed,
            vy: angle.sin() * table.speed,
            radius: table.radius,
            lifetime: table.lifetime,
            motion: ProjectileMotion::Linear,
            margin: table.margin,
        })
        .collect()
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Pick this frame's velocity and facing.  `target_x` is the player's x.
pub fn steer(boss: &Boss, movement: BossMovement, target_x: f32, rng: &mut impl Rng) -> Boss {
    let mut b = boss.clone();
    let phase = boss.phase.number() as f32;
    match movement {
        BossMovement::Chase {
            speed_per_phase,
            chase_frames,
            cycle_frames,
            jump_chance,
            jump_power,
        } => {
            if boss.clock % cycle_frames.max(1) < chase_frames {
                b.facing_right = target_x >= boss.body.x;
                let speed = speed_per_phase * phase;
                b.body.vx = if b.facing_right { speed } else { -speed };
            } else if boss.body.on_ground && rng.gen::<f32>() < jump_chance {
                b.body.vy = jump_power;
            }
        }
        BossMovement::Pace { speed, half_period } => {
            let half = half_period.max(1);
            b.body.vx = if boss.clock % (half * 2) < half { speed } else { -speed };
            b.facing_right = b.body.vx > 0.0;
        }
        BossMovement::Sway {
            frequency,
            amplitude_per_phase,
            ..
        } => {
            b.body.vx = (boss.clock as f32 * frequency).sin() * amplitude_per_phase * phase;
            b.facing_right = target_x > boss.body.x;
        }
    }
    b
}

/// Full per-frame boss update: timers, steering, gravity, integration and
/// world constraints.  Attacks are handled separately by `countdown_attack`.
pub fn update_boss(boss: &Boss, encounter: &Encounter, target_x: f32, rng: &mut impl Rng) -> Boss {
    let params = &encounter.boss;
    let ticked = Boss {
        clock: boss.clock + 1,
        invulnerable_timer: boss.invulnerable_timer.saturating_sub(1),
        hit_flash: boss.hit_flash.saturating_sub(1),
        ..boss.clone()
    };
    let mut b = steer(&ticked, params.movement, target_x, rng);

    let mut body = b.body;
    if let Some(gravity) = params.gravity {
        body.vy = apply_gravity(body.vy, gravity);
    }
    body = integrate(body);
    if params.gravity.is_some() {
        body = resolve_landing(body, &encounter.platforms, encounter.landing_tolerance);
    }
    if let BossMovement::Sway { rest_y, .. } = params.movement {
        if body.y > rest_y {
            body.y = rest_y;
            body.vy = 0.0;
            body.on_ground = true;
        }
    }
    body = clamp_horizontal(body, encounter.world.width, params.edge);
    body = clamp_to_floor(body, encounter.world.height);

    b.body = body;
    b
}
