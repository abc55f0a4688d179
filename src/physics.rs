/// Fixed-timestep motion.
///
/// One call per frame at 60 Hz; velocities are in units per frame and
/// positions advance by a plain Euler step.  Every function takes a value
/// and returns the updated value.

use crate::collision::{lands_on, projectile_strikes_top};
use crate::entities::{Body, Platform, Projectile, ProjectileMotion};

/// Below this speed an un-driven accelerated body stops outright.
const STOP_EPSILON: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    /// Added to vy every frame.
    pub accel: f32,
    /// Terminal downward speed.
    pub max_fall: f32,
}

/// How held left/right keys turn into horizontal velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HorizontalControl {
    /// Velocity is the input axis times `speed`; no momentum.
    Direct { speed: f32 },
    /// Velocity decays by `friction`, gains `accel` in the input direction
    /// and is clamped to `max_speed`.
    Accelerated {
        accel: f32,
        max_speed: f32,
        friction: f32,
    },
}

impl HorizontalControl {
    /// Speed a held direction settles at if nothing clamped it.
    pub fn terminal_speed(&self) -> f32 {
        match *self {
            HorizontalControl::Direct { speed } => speed,
            HorizontalControl::Accelerated {
                accel, friction, ..
            } => {
                if friction >= 1.0 {
                    f32::INFINITY
                } else {
                    accel / (1.0 - friction)
                }
            }
        }
    }
}

/// What happens when a body touches a side wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeBehavior {
    Clamp,
    /// Clamp and reverse horizontal velocity.
    Bounce,
}

pub fn horizontal_velocity(control: HorizontalControl, vx: f32, axis: f32) -> f32 {
    match control {
        HorizontalControl::Direct { speed } => axis * speed,
        HorizontalControl::Accelerated {
            accel,
            max_speed,
            friction,
        } => {
            let next = (vx * friction + axis * accel).clamp(-max_speed, max_speed);
            if axis == 0.0 && next.abs() < STOP_EPSILON {
                0.0
            } else {
                next
            }
        }
    }
}

pub fn apply_gravity(vy: f32, gravity: Gravity) -> f32 {
    (vy + gravity.accel).min(gravity.max_fall)
}

pub fn integrate(body: Body) -> Body {
    Body {
        x: body.x + body.vx,
        y: body.y + body.vy,
        ..body
    }
}

/// Snap the body onto the first platform it is landing on.  Clears
/// `on_ground` first so walking off a ledge is noticed.
pub fn resolve_landing(body: Body, platforms: &[Platform], tolerance: f32) -> Body {
    let mut out = Body {
        on_ground: false,
        ..body
    };
    for platform in platforms {
        if lands_on(&out, platform, tolerance) {
            out.y = platform.top() - out.height;
            out.vy = 0.0;
            out.on_ground = true;
        }
    }
    out
}

/// Keep the body inside `[0, world_width - width]`.
pub fn clamp_horizontal(body: Body, world_width: f32, edge: EdgeBehavior) -> Body {
    let max_x = world_width - body.width;
    let hit_wall = body.x < 0.0 || body.x > max_x;
    let x = body.x.clamp(0.0, max_x.max(0.0));
    let vx = if hit_wall && edge == EdgeBehavior::Bounce {
        -body.vx
    } else {
        body.vx
    };
    Body { x, vx, ..body }
}

/// Last-resort floor: a body that fell through everything stands on the
/// bottom of the world.
pub fn clamp_to_floor(body: Body, world_height: f32) -> Body {
    let floor = world_height - body.height;
    if body.y > floor {
        Body {
            y: floor,
            vy: 0.0,
            on_ground: true,
            ..body
        }
    } else {
        body
    }
}

/// Advance a projectile one frame: move, bounce if ballistic, and burn one
/// frame of lifetime.
pub fn step_projectile(
    projectile: &Projectile,
    platforms: &[Platform],
    tolerance: f32,
) -> Projectile {
    let mut p = Projectile {
        x: projectile.x + projectile.vx,
        y: projectile.y + projectile.vy,
        lifetime: projectile.lifetime.saturating_sub(1),
        ..projectile.clone()
    };

    if let ProjectileMotion::Ballistic {
        gravity,
        restitution,
        friction,
    } = p.motion
    {
        p.vy += gravity;
        for platform in platforms {
            if projectile_strikes_top(&p, platform, tolerance) {
                p.y = platform.top() - p.radius;
                p.vy = -p.vy.abs() * restitution;
                p.vx *= friction;
            }
        }
    }

    p
}
