/// Hard-coded encounters.
///
/// Every boss fight runs on the same simulation core; an `Encounter`
/// carries everything that differs between them: level geometry, hero
/// handling, boss behaviour, timers and tuning constants.

use std::str::FromStr;

use crate::boss_ai::{AttackPattern, AttackTable, BossMovement};
use crate::collision::HitShape;
use crate::entities::{Platform, ProjectileKind, Rect};
use crate::error::ConfigError;
use crate::phase::PhaseTimers;
use crate::physics::{EdgeBehavior, Gravity, HorizontalControl};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterKind {
    Castle,
    Arena,
    Bridge,
}

impl EncounterKind {
    pub const ALL: [EncounterKind; 3] = [
        EncounterKind::Castle,
        EncounterKind::Arena,
        EncounterKind::Bridge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EncounterKind::Castle => "castle",
            EncounterKind::Arena => "arena",
            EncounterKind::Bridge => "bridge",
        }
    }
}

impl FromStr for EncounterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncounterKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownEncounter { name: s.to_string() })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

/// A thrown projectile attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowParams {
    pub kind: ProjectileKind,
    /// Horizontal speed, signed by facing at launch.
    pub speed_x: f32,
    pub speed_y: f32,
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    pub radius: f32,
    pub lifetime: u32,
    pub margin: f32,
    /// Launch from the hero's leading edge at mid-height instead of the
    /// top-left corner.
    pub from_leading_edge: bool,
    pub max_active: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerAttack {
    Throw(ThrowParams),
    /// Hit the boss directly when its centre is inside `reach`, measured
    /// from the hero's centre.
    Melee { reach: HitShape },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunJump {
    /// |vx| above which the stronger jump is used.
    pub threshold: f32,
    pub power: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroParams {
    pub spawn: (f32, f32),
    pub width: f32,
    pub height: f32,
    pub control: HorizontalControl,
    pub gravity: Gravity,
    pub jump_power: f32,
    pub run_jump: Option<RunJump>,
    pub lives: u32,
    pub invincible_frames: u32,
    /// Where boss projectiles hurt, centred on the hero.
    pub hitbox: HitShape,
    pub attack: PlayerAttack,
    pub attack_cooldown: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossParams {
    pub spawn: (f32, f32),
    pub width: f32,
    pub height: f32,
    pub max_health: u32,
    /// `None` for a floating boss.
    pub gravity: Option<Gravity>,
    pub movement: BossMovement,
    pub edge: EdgeBehavior,
    /// Where player projectiles hurt, centred on the boss.
    pub hurtbox: HitShape,
    pub invulnerable_frames: u32,
    pub hit_flash_frames: u32,
    pub attacks: AttackTable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Encounter {
    pub kind: EncounterKind,
    pub title: &'static str,
    pub world: World,
    pub platforms: Vec<Platform>,
    /// Depth of the band below a platform top that still counts as a
    /// landing.
    pub landing_tolerance: f32,
    pub timers: PhaseTimers,
    pub hero: HeroParams,
    pub boss: BossParams,
    pub max_boss_projectiles: usize,
}

// ── Presets ───────────────────────────────────────────────────────────────────

const WORLD: World = World {
    width: 256.0,
    height: 240.0,
};

fn throne_room_platforms() -> Vec<Platform> {
    vec![
        Rect::new(0.0, 200.0, 256.0, 40.0),  // floor
        Rect::new(32.0, 160.0, 48.0, 8.0),   // left ledge
        Rect::new(176.0, 160.0, 48.0, 8.0),  // right ledge
        Rect::new(96.0, 120.0, 64.0, 8.0),   // centre ledge
    ]
}

impl Encounter {
    pub fn from_kind(kind: EncounterKind) -> Self {
        match kind {
            EncounterKind::Castle => Encounter::castle(),
            EncounterKind::Arena => Encounter::arena(),
            EncounterKind::Bridge => Encounter::bridge(),
        }
    }

    /// Throne room: the boss looms in from the background, chases and hops,
    /// and is brought down with thrown eggs.
    pub fn castle() -> Self {
        Encounter {
            kind: EncounterKind::Castle,
            title: "THRONE ROOM",
            world: WORLD,
            platforms: throne_room_platforms(),
            landing_tolerance: 10.0,
            timers: PhaseTimers {
                // scale 0.1 → 3.0 at 0.008 per frame
                approach: Some(363),
                intro: 120,
                victory: 180,
                defeat: 180,
            },
            hero: HeroParams {
                spawn: (32.0, 100.0),
                width: 16.0,
                height: 16.0,
                control: HorizontalControl::Direct { speed: 2.5 },
                gravity: Gravity {
                    accel: 0.4,
                    max_fall: 10.0,
                },
                jump_power: -8.5,
                run_jump: None,
                lives: 3,
                invincible_frames: 120,
                hitbox: HitShape::AxisBox {
                    half_width: 12.0,
                    half_height: 12.0,
                },
                attack: PlayerAttack::Throw(ThrowParams {
                    kind: ProjectileKind::Egg,
                    speed_x: 5.0,
                    speed_y: -4.0,
                    gravity: 0.32,
                    restitution: 0.7,
                    friction: 0.9,
                    radius: 6.0,
                    lifetime: 120,
                    margin: 50.0,
                    from_leading_edge: false,
                    max_active: 4,
                }),
                attack_cooldown: 15,
            },
            boss: BossParams {
                spawn: (200.0, 100.0),
                width: 32.0,
                height: 32.0,
                max_health: 12,
                gravity: Some(Gravity {
                    accel: 0.4,
                    max_fall: 10.0,
                }),
                movement: BossMovement::Chase {
                    speed_per_phase: 0.75,
                    chase_frames: 90,
                    cycle_frames: 180,
                    jump_chance: 0.02,
                    jump_power: -7.0,
                },
                edge: EdgeBehavior::Bounce,
                hurtbox: HitShape::AxisBox {
                    half_width: 20.0,
                    half_height: 20.0,
                },
                invulnerable_frames: 0,
                hit_flash_frames: 10,
                attacks: AttackTable {
                    phases: [
                        AttackPattern::new(&[0.0], 120),
                        AttackPattern::new(&[-0.3, 0.0, 0.3], 90),
                        AttackPattern::new(&[-0.8, -0.4, 0.0, 0.4, 0.8], 60),
                    ],
                    kind: ProjectileKind::Fireball,
                    speed: 3.0,
                    radius: 4.0,
                    lifetime: 180,
                    margin: 0.0,
                },
            },
            max_boss_projectiles: 48,
        }
    }

    /// Arena: momentum-based running, bouncing fireballs, and a floating
    /// boss that shrugs off hits for half a second after each one.
    pub fn arena() -> Self {
        Encounter {
            kind: EncounterKind::Arena,
            title: "KOOPA ARENA",
            world: WORLD,
            platforms: throne_room_platforms(),
            landing_tolerance: 10.0,
            timers: PhaseTimers {
                approach: None,
                intro: 180,
                victory: 180,
                defeat: 180,
            },
            hero: HeroParams {
                spawn: (32.0, 100.0),
                width: 12.0,
                height: 16.0,
                control: HorizontalControl::Accelerated {
                    accel: 0.5,
                    max_speed: 2.5,
                    friction: 0.85,
                },
                gravity: Gravity {
                    accel: 0.35,
                    max_fall: 6.0,
                },
                jump_power: -7.0,
                run_jump: Some(RunJump {
                    threshold: 2.0,
                    power: -8.5,
                }),
                lives: 3,
                invincible_frames: 120,
                hitbox: HitShape::AxisBox {
                    half_width: 10.0,
                    half_height: 10.0,
                },
                attack: PlayerAttack::Throw(ThrowParams {
                    kind: ProjectileKind::Fireball,
                    speed_x: 3.5,
                    speed_y: -2.0,
                    gravity: 0.25,
                    restitution: 0.8,
                    friction: 1.0,
                    radius: 4.0,
                    lifetime: 240,
                    margin: 16.0,
                    from_leading_edge: true,
                    max_active: 4,
                }),
                attack_cooldown: 18,
            },
            boss: BossParams {
                spawn: (200.0, 100.0),
                width: 24.0,
                height: 24.0,
                max_health: 6,
                gravity: None,
                movement: BossMovement::Pace {
                    speed: 1.0,
                    half_period: 60,
                },
                edge: EdgeBehavior::Clamp,
                hurtbox: HitShape::Circle { radius: 15.0 },
                invulnerable_frames: 30,
                hit_flash_frames: 30,
                attacks: AttackTable {
                    phases: [
                        AttackPattern::new(&[0.0], 150),
                        AttackPattern::new(&[-0.25, 0.0, 0.25], 120),
                        AttackPattern::new(&[-0.8, -0.4, 0.0, 0.4, 0.8], 90),
                    ],
                    kind: ProjectileKind::Fireball,
                    speed: 2.5,
                    radius: 4.0,
                    lifetime: 180,
                    margin: 0.0,
                },
            },
            max_boss_projectiles: 32,
        }
    }

    /// Moonlit bridge: a single floor, a swaying drake and close-range
    /// strikes.
    pub fn bridge() -> Self {
        Encounter {
            kind: EncounterKind::Bridge,
            title: "MOONLIT BRIDGE",
            world: WORLD,
            platforms: vec![Rect::new(0.0, 200.0, 256.0, 8.0)],
            landing_tolerance: 8.0,
            timers: PhaseTimers {
                approach: None,
                intro: 180,
                victory: 180,
                defeat: 180,
            },
            hero: HeroParams {
                spawn: (40.0, 160.0),
                width: 8.0,
                height: 16.0,
                control: HorizontalControl::Direct { speed: 2.0 },
                gravity: Gravity {
                    accel: 0.3,
                    max_fall: 10.0,
                },
                jump_power: -7.0,
                run_jump: None,
                lives: 3,
                invincible_frames: 90,
                hitbox: HitShape::AxisBox {
                    half_width: 6.0,
                    half_height: 6.0,
                },
                attack: PlayerAttack::Melee {
                    reach: HitShape::AxisBox {
                        half_width: 20.0,
                        half_height: 16.0,
                    },
                },
                attack_cooldown: 20,
            },
            boss: BossParams {
                spawn: (180.0, 100.0),
                width: 24.0,
                height: 24.0,
                max_health: 12,
                gravity: Some(Gravity {
                    accel: 0.3,
                    max_fall: 10.0,
                }),
                movement: BossMovement::Sway {
                    frequency: 0.02,
                    amplitude_per_phase: 1.0,
                    rest_y: 120.0,
                },
                edge: EdgeBehavior::Clamp,
                hurtbox: HitShape::AxisBox {
                    half_width: 12.0,
                    half_height: 12.0,
                },
                invulnerable_frames: 0,
                hit_flash_frames: 10,
                attacks: AttackTable {
                    phases: [
                        AttackPattern::new(&[0.0], 90),
                        AttackPattern::new(&[-0.2, 0.0, 0.2], 90),
                        AttackPattern::new(&[-0.4, -0.2, 0.0, 0.2, 0.4], 90),
                    ],
                    kind: ProjectileKind::Orb,
                    speed: 2.0,
                    radius: 3.0,
                    lifetime: 180,
                    margin: 0.0,
                },
            },
            max_boss_projectiles: 32,
        }
    }

    // ── Validation ───────────────────────────────────────────────────────────

    /// Reject encounters the simulation cannot run sensibly.  Called by
    /// `compute::init_state` before any frame is simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let World { width, height } = self.world;
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::WorldSize { width, height });
        }
        if self.platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }
        if self.hero.lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        if self.boss.max_health == 0 {
            return Err(ConfigError::ZeroBossHealth);
        }

        self.check_spawn("hero", self.hero.spawn, self.hero.width, self.hero.height)?;
        self.check_spawn("boss", self.boss.spawn, self.boss.width, self.boss.height)?;

        self.check_control()?;
        if let HorizontalControl::Accelerated { max_speed, .. } = self.hero.control {
            let terminal = self.hero.control.terminal_speed();
            if terminal <= max_speed {
                return Err(ConfigError::UnreachableMaxSpeed { max_speed, terminal });
            }
        }

        let attacks = &self.boss.attacks;
        if attacks.lifetime == 0 {
            return Err(ConfigError::ZeroProjectileLifetime);
        }
        if let PlayerAttack::Throw(throw) = self.hero.attack {
            if throw.lifetime == 0 {
                return Err(ConfigError::ZeroProjectileLifetime);
            }
        }

        let mut previous: Option<u32> = None;
        for (i, pattern) in attacks.phases.iter().enumerate() {
            let phase = i as u8 + 1;
            if pattern.offsets.is_empty() {
                return Err(ConfigError::EmptyAttackPattern { phase });
            }
            if pattern.cooldown == 0 {
                return Err(ConfigError::ZeroAttackCooldown { phase });
            }
            if let Some(previous) = previous {
                if pattern.cooldown > previous {
                    return Err(ConfigError::CooldownIncreases {
                        phase,
                        cooldown: pattern.cooldown,
                        previous,
                    });
                }
            }
            previous = Some(pattern.cooldown);
        }

        Ok(())
    }

    /// Speeds and acceleration strictly positive, friction in `[0, 1)`.
    /// Written so NaN fails every test.
    fn check_control(&self) -> Result<(), ConfigError> {
        let bad = |field: &'static str, value: f32| -> Result<(), ConfigError> {
            Err(ConfigError::BadControl { field, value })
        };
        match self.hero.control {
            HorizontalControl::Direct { speed } if !(speed > 0.0) => bad("speed", speed),
            HorizontalControl::Accelerated {
                accel,
                max_speed,
                friction,
            } => {
                if !(accel > 0.0) {
                    bad("accel", accel)
                } else if !(max_speed > 0.0) {
                    bad("max_speed", max_speed)
                } else if !(0.0..1.0).contains(&friction) {
                    bad("friction", friction)
                } else {
                    Ok(())
                }
            }
            HorizontalControl::Direct { .. } => Ok(()),
        }
    }

    fn check_spawn(
        &self,
        entity: &'static str,
        (x, y): (f32, f32),
        w: f32,
        h: f32,
    ) -> Result<(), ConfigError> {
        let inside =
            x >= 0.0 && y >= 0.0 && x + w <= self.world.width && y + h <= self.world.height;
        if inside {
            Ok(())
        } else {
            Err(ConfigError::SpawnOutsideWorld { entity, x, y })
        }
    }
}
