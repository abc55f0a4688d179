/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` plus the static `Encounter` (and, where needed, an RNG
/// handle) and returns a brand-new `GameState`.  Side effects are limited
/// to the injected RNG.

use rand::Rng;
use tracing::{debug, trace};

use crate::boss_ai::{countdown_attack, escalate, spawn_volley, update_boss};
use crate::collision::{bodies_touch, body_hit_by, in_bounds};
use crate::config::{Encounter, PlayerAttack, ThrowParams};
use crate::entities::{
    Body, Boss, BossPhase, FrameEvent, GamePhase, GameState, InputState, Player, Projectile,
    ProjectileMotion, ProjectileOwner,
};
use crate::error::ConfigError;
use crate::phase::{can_transition, duration, opening_phase, step_timer, PhaseStep};
use crate::physics::{
    apply_gravity, clamp_horizontal, clamp_to_floor, horizontal_velocity, integrate,
    resolve_landing, step_projectile, EdgeBehavior,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state for an encounter.  Fails if the encounter is
/// not playable (no platforms, zero health, ...).
pub fn init_state(encounter: &Encounter) -> Result<GameState, ConfigError> {
    encounter.validate()?;

    let hero = &encounter.hero;
    let boss = &encounter.boss;
    let (phase, phase_timer) = opening_phase(&encounter.timers);

    Ok(GameState {
        player: Player {
            body: Body::at(hero.spawn.0, hero.spawn.1, hero.width, hero.height),
            facing_right: true,
            lives: hero.lives,
            invincible_timer: 0,
            attack_cooldown: 0,
        },
        boss: Boss {
            body: Body {
                on_ground: boss.gravity.is_none(),
                ..Body::at(boss.spawn.0, boss.spawn.1, boss.width, boss.height)
            },
            facing_right: true,
            health: boss.max_health,
            max_health: boss.max_health,
            phase: BossPhase::One,
            attack_timer: boss.attacks.pattern(BossPhase::One).cooldown,
            invulnerable_timer: 0,
            hit_flash: 0,
            clock: 0,
        },
        projectiles: Vec::new(),
        phase,
        phase_timer,
        frame: 0,
        next_projectile_id: 0,
        events: Vec::new(),
        finished: false,
    })
}

// ── Player ───────────────────────────────────────────────────────────────────

/// One frame of hero movement: horizontal control, jump, gravity,
/// integration, landing and world bounds.
pub fn step_player(player: &Player, encounter: &Encounter, input: &InputState) -> Player {
    let hero = &encounter.hero;
    let axis = input.horizontal_axis();
    let mut body = player.body;

    let facing_right = if axis > 0.0 {
        true
    } else if axis < 0.0 {
        false
    } else {
        player.facing_right
    };

    body.vx = horizontal_velocity(hero.control, body.vx, axis);

    if input.wants_jump() && body.on_ground {
        body.vy = match hero.run_jump {
            Some(run) if body.vx.abs() > run.threshold => run.power,
            _ => hero.jump_power,
        };
        body.on_ground = false;
    }

    body.vy = apply_gravity(body.vy, hero.gravity);
    body = integrate(body);
    body = resolve_landing(body, &encounter.platforms, encounter.landing_tolerance);
    body = clamp_horizontal(body, encounter.world.width, EdgeBehavior::Clamp);
    body = clamp_to_floor(body, encounter.world.height);

    Player {
        body,
        facing_right,
        invincible_timer: player.invincible_timer.saturating_sub(1),
        attack_cooldown: player.attack_cooldown.saturating_sub(1),
        ..player.clone()
    }
}

/// The projectile a throw releases this frame.
pub fn thrown_projectile(player: &Player, throw: &ThrowParams, id: u64) -> Projectile {
    let body = &player.body;
    let (x, y) = if throw.from_leading_edge {
        let x = if player.facing_right { body.x + body.width } else { body.x };
        (x, body.center_y())
    } else {
        (body.x, body.y)
    };
    Projectile {
        id,
        owner: ProjectileOwner::Player,
        kind: throw.kind,
        x,
        y,
        vx: if player.facing_right { throw.speed_x } else { -throw.speed_x },
        vy: throw.speed_y,
        radius: throw.radius,
        lifetime: throw.lifetime,
        motion: ProjectileMotion::Ballistic {
            gravity: throw.gravity,
            restitution: throw.restitution,
            friction: throw.friction,
        },
        margin: throw.margin,
    }
}

/// Take one point of health off the boss and start its invulnerability
/// and flash timers.
pub fn damage_boss(boss: &Boss, encounter: &Encounter) -> Boss {
    Boss {
        health: boss.health.saturating_sub(1),
        invulnerable_timer: encounter.boss.invulnerable_frames,
        hit_flash: encounter.boss.hit_flash_frames,
        ..boss.clone()
    }
}

/// Take one life off the hero unless it is still invincible.
pub fn damage_player(player: &Player, encounter: &Encounter) -> Option<Player> {
    if player.invincible_timer > 0 || player.lives == 0 {
        return None;
    }
    Some(Player {
        lives: player.lives - 1,
        invincible_timer: encounter.hero.invincible_frames,
        ..player.clone()
    })
}

/// Attack if the hero is ready.  Throws are refused when the hero already
/// has `max_active` projectiles out; the cooldown is not spent then.
pub fn player_attack(state: &GameState, encounter: &Encounter) -> GameState {
    if state.phase != GamePhase::Battle || state.player.attack_cooldown > 0 {
        return state.clone();
    }
    let cooldown = encounter.hero.attack_cooldown;

    match encounter.hero.attack {
        PlayerAttack::Throw(throw) => {
            let active = state.projectiles_of(ProjectileOwner::Player).count();
            if active >= throw.max_active {
                let mut events = state.events.clone();
                events.push(FrameEvent::ProjectileDeclined {
                    owner: ProjectileOwner::Player,
                });
                return GameState {
                    events,
                    ..state.clone()
                };
            }
            let mut projectiles = state.projectiles.clone();
            projectiles.push(thrown_projectile(&state.player, &throw, state.next_projectile_id));
            GameState {
                player: Player {
                    attack_cooldown: cooldown,
                    ..state.player.clone()
                },
                projectiles,
                next_projectile_id: state.next_projectile_id + 1,
                ..state.clone()
            }
        }
        PlayerAttack::Melee { reach } => {
            let player = Player {
                attack_cooldown: cooldown,
                ..state.player.clone()
            };
            let boss = &state.boss;
            let connects = boss.invulnerable_timer == 0
                && !boss.is_defeated()
                && bodies_touch(&state.player.body, reach, &boss.body);
            if !connects {
                return GameState {
                    player,
                    ..state.clone()
                };
            }
            let boss = damage_boss(boss, encounter);
            let mut events = state.events.clone();
            events.push(FrameEvent::BossDamaged {
                health: boss.health,
            });
            GameState {
                player,
                boss,
                events,
                ..state.clone()
            }
        }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Move every projectile, burn a frame of lifetime, and drop those that
/// expired or left the world.
pub fn advance_projectiles(projectiles: &[Projectile], encounter: &Encounter) -> Vec<Projectile> {
    let world = encounter.world;
    projectiles
        .iter()
        .map(|p| step_projectile(p, &encounter.platforms, encounter.landing_tolerance))
        .filter(|p| p.lifetime > 0 && in_bounds(p.x, p.y, world.width, world.height, p.margin))
        .collect()
}

/// Player projectiles against the boss, boss projectiles against the hero.
/// A projectile is consumed by its first hit; a projectile that meets an
/// invulnerable boss passes through.
fn resolve_hits(state: &GameState, encounter: &Encounter) -> GameState {
    let mut boss = state.boss.clone();
    let mut player = state.player.clone();
    let mut events = state.events.clone();
    let mut survivors = Vec::with_capacity(state.projectiles.len());

    for projectile in &state.projectiles {
        let consumed = match projectile.owner {
            ProjectileOwner::Player => {
                let hit = !boss.is_defeated()
                    && boss.invulnerable_timer == 0
                    && body_hit_by(&boss.body, encounter.boss.hurtbox, projectile);
                if hit {
                    boss = damage_boss(&boss, encounter);
                    events.push(FrameEvent::BossDamaged {
                        health: boss.health,
                    });
                }
                hit
            }
            ProjectileOwner::Boss => {
                let hit = body_hit_by(&player.body, encounter.hero.hitbox, projectile);
                if hit {
                    if let Some(hurt) = damage_player(&player, encounter) {
                        player = hurt;
                        events.push(FrameEvent::PlayerDamaged {
                            lives: player.lives,
                        });
                    }
                }
                hit
            }
        };
        if !consumed {
            survivors.push(projectile.clone());
        }
    }

    GameState {
        player,
        boss,
        projectiles: survivors,
        events,
        ..state.clone()
    }
}

// ── Phase transitions ────────────────────────────────────────────────────────

fn enter_phase(state: &GameState, to: GamePhase, encounter: &Encounter) -> GameState {
    let from = state.phase;
    if !can_transition(from, to) {
        debug!(?from, ?to, "ignoring backward phase transition");
        return state.clone();
    }
    debug!(?from, ?to, frame = state.frame, "phase change");
    let mut events = state.events.clone();
    events.push(FrameEvent::PhaseChanged { from, to });

    let projectiles = if to == GamePhase::Victory {
        state
            .projectiles
            .iter()
            .filter(|p| p.owner != ProjectileOwner::Boss)
            .cloned()
            .collect()
    } else {
        state.projectiles.clone()
    };

    GameState {
        phase: to,
        phase_timer: duration(to, &encounter.timers),
        projectiles,
        events,
        ..state.clone()
    }
}

fn step_timed_phase(state: &GameState, encounter: &Encounter) -> GameState {
    match step_timer(state.phase, state.phase_timer) {
        PhaseStep::Stay { timer } => GameState {
            phase_timer: timer,
            ..state.clone()
        },
        PhaseStep::Advance(next) => enter_phase(state, next, encounter),
        PhaseStep::Finished => {
            debug!(phase = ?state.phase, frame = state.frame, "session finished");
            let mut events = state.events.clone();
            events.push(FrameEvent::SessionFinished);
            GameState {
                phase_timer: 0,
                finished: true,
                events,
                ..state.clone()
            }
        }
    }
}

// ── Battle frame ─────────────────────────────────────────────────────────────

fn battle_frame(
    state: &GameState,
    encounter: &Encounter,
    input: &InputState,
    rng: &mut impl Rng,
) -> GameState {
    // ── 1. Hero moves, then attacks ──────────────────────────────────────────
    let moved = GameState {
        player: step_player(&state.player, encounter, input),
        ..state.clone()
    };
    let mut s = if input.attack {
        player_attack(&moved, encounter)
    } else {
        moved
    };

    // ── 2. Boss moves ────────────────────────────────────────────────────────
    s.boss = update_boss(&s.boss, encounter, s.player.body.x, rng);

    // ── 3. Escalate, then maybe fire ─────────────────────────────────────────
    let table = &encounter.boss.attacks;
    let (boss, changed) = escalate(&s.boss, table);
    s.boss = boss;
    if let Some(phase) = changed {
        debug!(phase = phase.number(), health = s.boss.health, "boss phase change");
        s.events.push(FrameEvent::BossPhaseChanged { phase });
    }

    if !s.boss.is_defeated() {
        let (boss, volley) = countdown_attack(&s.boss, table);
        s.boss = boss;
        if let Some(angles) = volley {
            s = fire_volley(&s, encounter, &angles);
        }
    }

    // ── 4. Projectiles move and expire before any hit is checked ─────────────
    s.projectiles = advance_projectiles(&s.projectiles, encounter);

    // ── 5. Hits ──────────────────────────────────────────────────────────────
    s = resolve_hits(&s, encounter);
    let (boss, changed) = escalate(&s.boss, table);
    s.boss = boss;
    if let Some(phase) = changed {
        debug!(phase = phase.number(), health = s.boss.health, "boss phase change");
        s.events.push(FrameEvent::BossPhaseChanged { phase });
    }

    // ── 6. Knockouts ─────────────────────────────────────────────────────────
    if s.boss.is_defeated() {
        s.events.push(FrameEvent::BossDefeated);
        return enter_phase(&s, GamePhase::Victory, encounter);
    }
    if s.player.lives == 0 {
        s.events.push(FrameEvent::PlayerDefeated);
        return enter_phase(&s, GamePhase::Defeat, encounter);
    }
    s
}

/// Add a boss volley, truncated to the encounter's projectile cap.
fn fire_volley(state: &GameState, encounter: &Encounter, angles: &[f32]) -> GameState {
    let outstanding = state.projectiles_of(ProjectileOwner::Boss).count();
    let room = encounter.max_boss_projectiles.saturating_sub(outstanding);
    let allowed = &angles[..angles.len().min(room)];

    let mut events = state.events.clone();
    if allowed.len() < angles.len() {
        debug!(
            wanted = angles.len(),
            fired = allowed.len(),
            outstanding,
            "boss volley truncated at projectile cap"
        );
        events.push(FrameEvent::ProjectileDeclined {
            owner: ProjectileOwner::Boss,
        });
    }
    if allowed.is_empty() {
        return GameState {
            events,
            ..state.clone()
        };
    }

    let volley = spawn_volley(
        &state.boss,
        &encounter.boss.attacks,
        allowed,
        state.next_projectile_id,
    );
    events.push(FrameEvent::BossAttack {
        count: volley.len(),
    });
    let mut projectiles = state.projectiles.clone();
    projectiles.extend(volley);

    GameState {
        projectiles,
        next_projectile_id: state.next_projectile_id + allowed.len() as u64,
        events,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Input only matters during Battle.  A finished session is returned
/// unchanged apart from its cleared event list.
pub fn tick(
    state: &GameState,
    encounter: &Encounter,
    input: &InputState,
    rng: &mut impl Rng,
) -> GameState {
    let base = GameState {
        events: Vec::new(),
        ..state.clone()
    };
    if state.finished {
        return base;
    }
    let base = GameState {
        frame: state.frame + 1,
        ..base
    };
    trace!(frame = base.frame, phase = ?base.phase, "tick");

    match base.phase {
        GamePhase::Battle => battle_frame(&base, encounter, input, rng),
        _ => step_timed_phase(&base, encounter),
    }
}
