/// All game entity types: pure data, no logic.

// ── Phases ────────────────────────────────────────────────────────────────────

/// Top-level session phase.  Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// The boss looms in from the background.  Presentation only.
    Approach,
    /// Title card before the fight.  Presentation only.
    Intro,
    /// The only phase in which input affects entities.
    Battle,
    Victory,
    Defeat,
}

impl GamePhase {
    /// Victory and Defeat never lead anywhere else.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Boss escalation stage, derived from remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    pub fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    /// Index into per-phase tables.
    pub fn index(self) -> usize {
        self.number() as usize - 1
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, top-left anchored, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Static level geometry.
pub type Platform = Rect;

/// Anything that moves under physics: position, velocity and a bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn at(x: f32, y: f32, width: f32, height: f32) -> Self {
        Body {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            on_ground: false,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Which logical keys are held this frame.  Read-only to the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
    pub interact: bool,
    pub quit: bool,
}

impl InputState {
    /// -1.0, 0.0 or 1.0.  Opposite keys cancel out.
    pub fn horizontal_axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn wants_jump(&self) -> bool {
        self.jump || self.up
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Fireball,
    Egg,
    Orb,
}

/// How a projectile moves between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileMotion {
    /// Straight line at constant velocity.
    Linear,
    /// Falls under `gravity` and bounces off platform tops, keeping
    /// `restitution` of its vertical speed and `friction` of its horizontal.
    Ballistic {
        gravity: f32,
        restitution: f32,
        friction: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub owner: ProjectileOwner,
    pub kind: ProjectileKind,
    /// Centre position.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Frames left before the projectile expires.
    pub lifetime: u32,
    pub motion: ProjectileMotion,
    /// How far past the world edges the projectile may travel before it is
    /// discarded.
    pub margin: f32,
}

// ── Player & boss ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub facing_right: bool,
    pub lives: u32,
    /// Frames of damage immunity left.
    pub invincible_timer: u32,
    /// Frames until the next attack is allowed.
    pub attack_cooldown: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub body: Body,
    pub facing_right: bool,
    pub health: u32,
    pub max_health: u32,
    pub phase: BossPhase,
    /// Frames until the next attack volley.
    pub attack_timer: u32,
    pub invulnerable_timer: u32,
    /// Frames of the white hit flash left.  Presentation only.
    pub hit_flash: u32,
    /// Battle frames elapsed; drives the movement pattern.
    pub clock: u64,
}

impl Boss {
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

// ── Frame events ──────────────────────────────────────────────────────────────

/// Something that happened during a single `tick`.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    BossPhaseChanged { phase: BossPhase },
    BossAttack { count: usize },
    BossDamaged { health: u32 },
    PlayerDamaged { lives: u32 },
    /// A spawn was refused because its owner is at the projectile cap.
    ProjectileDeclined { owner: ProjectileOwner },
    BossDefeated,
    PlayerDefeated,
    SessionFinished,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything that changes during a session.  Static level data lives in
/// `config::Encounter` and is passed alongside.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub boss: Boss,
    pub projectiles: Vec<Projectile>,
    pub phase: GamePhase,
    /// Countdown for timed phases; unused during Battle.
    pub phase_timer: u32,
    pub frame: u64,
    pub next_projectile_id: u64,
    /// Events produced by the most recent tick.
    pub events: Vec<FrameEvent>,
    /// Set once a terminal phase has run out its timer.
    pub finished: bool,
}

impl GameState {
    pub fn projectiles_of(&self, owner: ProjectileOwner) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(move |p| p.owner == owner)
    }
}
