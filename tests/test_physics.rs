use boss_arena::entities::*;
use boss_arena::physics::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn floor() -> Vec<Platform> {
    vec![Rect::new(0.0, 200.0, 256.0, 40.0)]
}

const ARENA_RUN: HorizontalControl = HorizontalControl::Accelerated {
    accel: 0.5,
    max_speed: 2.5,
    friction: 0.85,
};

// ── Gravity ───────────────────────────────────────────────────────────────────

#[test]
fn gravity_accumulates_then_clamps() {
    let g = Gravity {
        accel: 0.4,
        max_fall: 10.0,
    };
    assert!(approx(apply_gravity(0.0, g), 0.4));
    assert!(approx(apply_gravity(-8.5, g), -8.1));
    assert_eq!(apply_gravity(9.8, g), 10.0);
    assert_eq!(apply_gravity(10.0, g), 10.0);
}

#[test]
fn fall_speed_never_exceeds_max() {
    let g = Gravity {
        accel: 0.35,
        max_fall: 6.0,
    };
    let mut vy = -7.0;
    for _ in 0..200 {
        vy = apply_gravity(vy, g);
        assert!(vy <= 6.0);
    }
    assert_eq!(vy, 6.0);
}

// ── Horizontal control ────────────────────────────────────────────────────────

#[test]
fn direct_control_has_no_momentum() {
    let control = HorizontalControl::Direct { speed: 2.5 };
    assert_eq!(horizontal_velocity(control, 1.3, -1.0), -2.5);
    assert_eq!(horizontal_velocity(control, -2.5, 1.0), 2.5);
    assert_eq!(horizontal_velocity(control, 2.5, 0.0), 0.0);
}

#[test]
fn held_direction_reaches_max_speed_exactly() {
    let mut vx = 0.0;
    let mut reached_at = None;
    for frame in 1..=12 {
        let next = horizontal_velocity(ARENA_RUN, vx, 1.0);
        assert!(next >= vx, "speed must not drop while held");
        vx = next;
        if vx == 2.5 && reached_at.is_none() {
            reached_at = Some(frame);
        }
    }
    assert!(reached_at.is_some(), "2.5 not reached within 12 frames");

    // Holding on keeps it pinned.
    for _ in 0..30 {
        vx = horizontal_velocity(ARENA_RUN, vx, 1.0);
        assert_eq!(vx, 2.5);
    }
}

#[test]
fn released_direction_decays_to_rest() {
    let mut vx = 2.5;
    let mut previous = vx;
    for _ in 0..40 {
        vx = horizontal_velocity(ARENA_RUN, vx, 0.0);
        assert!(vx <= previous);
        previous = vx;
    }
    assert_eq!(vx, 0.0);
}

#[test]
fn terminal_speed_of_accelerated_control() {
    assert!(approx(ARENA_RUN.terminal_speed(), 0.5 / 0.15));
    assert_eq!(HorizontalControl::Direct { speed: 2.0 }.terminal_speed(), 2.0);
    let frictionless = HorizontalControl::Accelerated {
        accel: 0.5,
        max_speed: 2.5,
        friction: 1.0,
    };
    assert!(frictionless.terminal_speed().is_infinite());
}

// ── Integration & landing ─────────────────────────────────────────────────────

#[test]
fn integrate_adds_velocity() {
    let body = Body {
        vx: 1.5,
        vy: -2.0,
        ..Body::at(10.0, 20.0, 16.0, 16.0)
    };
    let moved = integrate(body);
    assert_eq!(moved.x, 11.5);
    assert_eq!(moved.y, 18.0);
}

#[test]
fn landing_snaps_to_platform_top() {
    let body = Body {
        vy: 3.0,
        ..Body::at(10.0, 186.0, 16.0, 16.0)
    };
    let landed = resolve_landing(body, &floor(), 10.0);
    assert!(landed.on_ground);
    assert_eq!(landed.vy, 0.0);
    assert_eq!(landed.y, 184.0);
    assert_eq!(landed.bottom(), 200.0);
}

#[test]
fn rising_body_passes_through() {
    let body = Body {
        vy: -1.0,
        ..Body::at(10.0, 186.0, 16.0, 16.0)
    };
    let out = resolve_landing(body, &floor(), 10.0);
    assert!(!out.on_ground);
    assert_eq!(out.y, 186.0);
    assert_eq!(out.vy, -1.0);
}

#[test]
fn body_below_tolerance_band_does_not_land() {
    // bottom at 211, band is [200, 210]
    let body = Body {
        vy: 4.0,
        ..Body::at(10.0, 195.0, 16.0, 16.0)
    };
    let out = resolve_landing(body, &floor(), 10.0);
    assert!(!out.on_ground);
    assert_eq!(out.y, 195.0);
}

#[test]
fn no_horizontal_overlap_no_landing() {
    let ledge = vec![Rect::new(32.0, 160.0, 48.0, 8.0)];
    let body = Body {
        vy: 1.0,
        ..Body::at(80.0, 145.0, 16.0, 16.0)
    };
    assert!(!resolve_landing(body, &ledge, 10.0).on_ground);
}

#[test]
fn walking_off_a_ledge_clears_on_ground() {
    let ledge = vec![Rect::new(32.0, 160.0, 48.0, 8.0)];
    let body = Body {
        on_ground: true,
        ..Body::at(100.0, 144.0, 16.0, 16.0)
    };
    assert!(!resolve_landing(body, &ledge, 10.0).on_ground);
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[test]
fn clamp_keeps_body_inside_walls() {
    let left = Body {
        vx: -2.0,
        ..Body::at(-5.0, 0.0, 16.0, 16.0)
    };
    let out = clamp_horizontal(left, 256.0, EdgeBehavior::Clamp);
    assert_eq!(out.x, 0.0);
    assert_eq!(out.vx, -2.0);

    let right = Body::at(250.0, 0.0, 16.0, 16.0);
    assert_eq!(clamp_horizontal(right, 256.0, EdgeBehavior::Clamp).x, 240.0);
}

#[test]
fn bounce_reverses_on_wall_contact() {
    let body = Body {
        vx: 1.5,
        ..Body::at(250.0, 0.0, 32.0, 32.0)
    };
    let out = clamp_horizontal(body, 256.0, EdgeBehavior::Bounce);
    assert_eq!(out.x, 224.0);
    assert_eq!(out.vx, -1.5);

    let inside = Body {
        vx: 1.5,
        ..Body::at(100.0, 0.0, 32.0, 32.0)
    };
    assert_eq!(clamp_horizontal(inside, 256.0, EdgeBehavior::Bounce).vx, 1.5);
}

#[test]
fn world_floor_catches_falling_body() {
    let body = Body {
        vy: 10.0,
        ..Body::at(10.0, 230.0, 16.0, 16.0)
    };
    let out = clamp_to_floor(body, 240.0);
    assert_eq!(out.y, 224.0);
    assert_eq!(out.vy, 0.0);
    assert!(out.on_ground);
}

// ── Projectiles ───────────────────────────────────────────────────────────────

fn projectile(motion: ProjectileMotion) -> Projectile {
    Projectile {
        id: 7,
        owner: ProjectileOwner::Player,
        kind: ProjectileKind::Fireball,
        x: 50.0,
        y: 195.0,
        vx: 2.0,
        vy: 3.0,
        radius: 4.0,
        lifetime: 10,
        motion,
        margin: 16.0,
    }
}

#[test]
fn linear_projectile_moves_and_ages() {
    let p = step_projectile(&projectile(ProjectileMotion::Linear), &[], 10.0);
    assert_eq!(p.x, 52.0);
    assert_eq!(p.y, 198.0);
    assert_eq!(p.vx, 2.0);
    assert_eq!(p.vy, 3.0);
    assert_eq!(p.lifetime, 9);
    assert_eq!(p.id, 7);
}

#[test]
fn lifetime_saturates_at_zero() {
    let mut p = projectile(ProjectileMotion::Linear);
    p.lifetime = 0;
    assert_eq!(step_projectile(&p, &[], 10.0).lifetime, 0);
}

#[test]
fn ballistic_projectile_bounces_off_platform_top() {
    let motion = ProjectileMotion::Ballistic {
        gravity: 0.25,
        restitution: 0.8,
        friction: 0.9,
    };
    let p = step_projectile(&projectile(motion), &floor(), 10.0);
    // moved to y=198, bottom 202 is inside the landing band
    assert_eq!(p.y, 196.0);
    assert!(approx(p.vy, -3.25 * 0.8));
    assert!(approx(p.vx, 1.8));
}

#[test]
fn ballistic_projectile_in_the_air_just_falls() {
    let motion = ProjectileMotion::Ballistic {
        gravity: 0.25,
        restitution: 0.8,
        friction: 0.9,
    };
    let mut start = projectile(motion);
    start.y = 100.0;
    let p = step_projectile(&start, &floor(), 10.0);
    assert_eq!(p.y, 103.0);
    assert!(approx(p.vy, 3.25));
    assert_eq!(p.vx, 2.0);
}
