use std::fmt;

/// Reasons an encounter cannot start a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NoPlatforms,
    WorldSize { width: f32, height: f32 },
    ZeroBossHealth,
    ZeroLives,
    EmptyAttackPattern { phase: u8 },
    ZeroAttackCooldown { phase: u8 },
    CooldownIncreases { phase: u8, cooldown: u32, previous: u32 },
    ZeroProjectileLifetime,
    SpawnOutsideWorld { entity: &'static str, x: f32, y: f32 },
    UnreachableMaxSpeed { max_speed: f32, terminal: f32 },
    BadControl { field: &'static str, value: f32 },
    UnknownEncounter { name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlatforms => write!(f, "encounter has no platforms"),
            Self::WorldSize { width, height } => {
                write!(f, "world size must be positive, got {width}x{height}")
            }
            Self::ZeroBossHealth => write!(f, "boss max health must be at least 1"),
            Self::ZeroLives => write!(f, "hero must start with at least one life"),
            Self::EmptyAttackPattern { phase } => {
                write!(f, "attack pattern for phase {phase} has no projectiles")
            }
            Self::ZeroAttackCooldown { phase } => {
                write!(f, "attack cooldown for phase {phase} must be non-zero")
            }
            Self::CooldownIncreases {
                phase,
                cooldown,
                previous,
            } => write!(
                f,
                "attack cooldown for phase {phase} ({cooldown}) is longer than the previous phase ({previous})"
            ),
            Self::ZeroProjectileLifetime => write!(f, "projectile lifetime must be non-zero"),
            Self::SpawnOutsideWorld { entity, x, y } => {
                write!(f, "{entity} spawn ({x}, {y}) lies outside the world")
            }
            Self::UnreachableMaxSpeed {
                max_speed,
                terminal,
            } => write!(
                f,
                "accelerated control settles at {terminal:.3} and never reaches max speed {max_speed}"
            ),
            Self::BadControl { field, value } => {
                write!(f, "hero control {field} out of range, got {value}")
            }
            Self::UnknownEncounter { name } => {
                write!(f, "unknown encounter '{name}' (expected castle, arena or bridge)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
