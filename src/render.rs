/// Render snapshot handed to whatever draws the game.
///
/// The simulation never draws.  Once per frame the caller builds a
/// `RenderFrame` from the state and hands it to a `RenderSink`.

use std::convert::Infallible;

use crate::config::Encounter;
use crate::entities::{BossPhase, GamePhase, GameState, Platform, ProjectileKind, ProjectileOwner};
use crate::phase::progress;

/// Frames per animation step (fireball colour cycling, walk cycle).
const ANIM_STEP: u64 = 6;
const ANIM_FRAMES: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Boss,
    Projectile {
        owner: ProjectileOwner,
        kind: ProjectileKind,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteView {
    pub kind: SpriteKind,
    /// Top-left corner in world units.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing_right: bool,
    /// Blink or hit-flash is on this frame.
    pub flashing: bool,
    pub anim_frame: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudView {
    pub lives: u32,
    pub boss_health: u32,
    pub boss_max_health: u32,
    pub boss_phase: BossPhase,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    pub frame: u64,
    pub title: &'static str,
    pub phase: GamePhase,
    /// 0.0 → 1.0 across a timed phase (approach zoom, intro growth, ...).
    pub phase_progress: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub platforms: Vec<Platform>,
    /// Player first, then boss, then projectiles in spawn order.
    pub sprites: Vec<SpriteView>,
    pub hud: HudView,
}

/// Anything that can present a frame.
pub trait RenderSink {
    type Error;

    fn present(&mut self, frame: &RenderFrame) -> Result<(), Self::Error>;
}

/// Recording sink: keeps every frame.
impl RenderSink for Vec<RenderFrame> {
    type Error = Infallible;

    fn present(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        self.push(frame.clone());
        Ok(())
    }
}

pub fn build_render_frame(state: &GameState, encounter: &Encounter) -> RenderFrame {
    let anim_frame = ((state.frame / ANIM_STEP) % ANIM_FRAMES) as u8;
    let player = &state.player;
    let boss = &state.boss;

    let mut sprites = Vec::with_capacity(2 + state.projectiles.len());

    sprites.push(SpriteView {
        kind: SpriteKind::Player,
        x: player.body.x,
        y: player.body.y,
        width: player.body.width,
        height: player.body.height,
        facing_right: player.facing_right,
        flashing: player.invincible_timer > 0 && player.invincible_timer % 4 < 2,
        anim_frame: if player.body.vx == 0.0 { 0 } else { anim_frame },
    });

    // The boss is gone once it has been beaten.
    if state.phase != GamePhase::Victory {
        sprites.push(SpriteView {
            kind: SpriteKind::Boss,
            x: boss.body.x,
            y: boss.body.y,
            width: boss.body.width,
            height: boss.body.height,
            facing_right: boss.facing_right,
            flashing: boss.hit_flash > 0 && boss.hit_flash % 4 < 2,
            anim_frame: boss.phase.index() as u8,
        });
    }

    for p in &state.projectiles {
        sprites.push(SpriteView {
            kind: SpriteKind::Projectile {
                owner: p.owner,
                kind: p.kind,
            },
            x: p.x - p.radius,
            y: p.y - p.radius,
            width: p.radius * 2.0,
            height: p.radius * 2.0,
            facing_right: p.vx >= 0.0,
            flashing: false,
            anim_frame,
        });
    }

    RenderFrame {
        frame: state.frame,
        title: encounter.title,
        phase: state.phase,
        phase_progress: progress(state.phase, state.phase_timer, &encounter.timers),
        world_width: encounter.world.width,
        world_height: encounter.world.height,
        platforms: encounter.platforms.clone(),
        sprites,
        hud: HudView {
            lives: player.lives,
            boss_health: boss.health,
            boss_max_health: boss.max_health,
            boss_phase: boss.phase,
        },
    }
}
