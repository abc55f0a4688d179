/// Proximity tests.  All discrete: nothing here sweeps along a path, so a
/// fast projectile can skip over a thin target between two frames.

use crate::entities::{Body, Platform, Projectile};

/// Shape of a hit test centred on one point and tested against another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitShape {
    /// Hit when the Euclidean distance is below `radius`.
    Circle { radius: f32 },
    /// Hit when both axis distances are below their half extents.
    AxisBox { half_width: f32, half_height: f32 },
}

impl HitShape {
    pub fn contains(&self, cx: f32, cy: f32, px: f32, py: f32) -> bool {
        let dx = px - cx;
        let dy = py - cy;
        match *self {
            HitShape::Circle { radius } => dx * dx + dy * dy < radius * radius,
            HitShape::AxisBox {
                half_width,
                half_height,
            } => dx.abs() < half_width && dy.abs() < half_height,
        }
    }

    /// Furthest vertical offset that can still register.
    pub fn vertical_reach(&self) -> f32 {
        match *self {
            HitShape::Circle { radius } => radius,
            HitShape::AxisBox { half_height, .. } => half_height,
        }
    }
}

/// Does `shape`, centred on `body`, reach the projectile's centre?
pub fn body_hit_by(body: &Body, shape: HitShape, projectile: &Projectile) -> bool {
    shape.contains(body.center_x(), body.center_y(), projectile.x, projectile.y)
}

/// Does `shape`, centred on `a`, reach the centre of `b`?
pub fn bodies_touch(a: &Body, shape: HitShape, b: &Body) -> bool {
    shape.contains(a.center_x(), a.center_y(), b.center_x(), b.center_y())
}

/// Landing test: horizontal overlap, bottom edge inside the band
/// `[top, top + tolerance]`, and not moving upward.
pub fn lands_on(body: &Body, platform: &Platform, tolerance: f32) -> bool {
    body.x + body.width > platform.x
        && body.x < platform.right()
        && body.bottom() >= platform.top()
        && body.bottom() <= platform.top() + tolerance
        && body.vy >= 0.0
}

/// Bounce test for a falling projectile: its lowest point is inside the
/// landing band and its centre is over the platform.
pub fn projectile_strikes_top(
    projectile: &Projectile,
    platform: &Platform,
    tolerance: f32,
) -> bool {
    let bottom = projectile.y + projectile.radius;
    projectile.x > platform.x
        && projectile.x < platform.right()
        && bottom >= platform.top()
        && bottom <= platform.top() + tolerance
        && projectile.vy > 0.0
}

/// Whether a point is inside the world grown by `margin` on every side.
pub fn in_bounds(x: f32, y: f32, width: f32, height: f32, margin: f32) -> bool {
    x >= -margin && x <= width + margin && y >= -margin && y <= height + margin
}
