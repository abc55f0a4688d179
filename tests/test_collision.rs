use boss_arena::collision::*;
use boss_arena::entities::*;

fn shot_at(x: f32, y: f32) -> Projectile {
    Projectile {
        id: 0,
        owner: ProjectileOwner::Player,
        kind: ProjectileKind::Egg,
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: 6.0,
        lifetime: 60,
        motion: ProjectileMotion::Linear,
        margin: 0.0,
    }
}

#[test]
fn circle_is_strict_on_its_rim() {
    let circle = HitShape::Circle { radius: 15.0 };
    // 9-12-15 triangle: exactly on the rim
    assert!(!circle.contains(0.0, 0.0, 9.0, 12.0));
    assert!(circle.contains(0.0, 0.0, 9.0, 11.0));
    assert!(circle.contains(0.0, 0.0, 0.0, 0.0));
}

#[test]
fn axis_box_checks_each_axis() {
    let shape = HitShape::AxisBox {
        half_width: 12.0,
        half_height: 12.0,
    };
    assert!(shape.contains(100.0, 100.0, 111.9, 88.1));
    assert!(!shape.contains(100.0, 100.0, 112.0, 100.0));
    assert!(!shape.contains(100.0, 100.0, 100.0, 87.0));

    let wide = HitShape::AxisBox {
        half_width: 20.0,
        half_height: 16.0,
    };
    assert!(wide.contains(0.0, 0.0, -19.0, 15.0));
    assert!(!wide.contains(0.0, 0.0, -19.0, 16.0));
}

#[test]
fn hit_tests_are_centred_on_the_body() {
    // 32x32 boss, centre (216, 116)
    let boss = Body::at(200.0, 100.0, 32.0, 32.0);
    let hurtbox = HitShape::AxisBox {
        half_width: 20.0,
        half_height: 20.0,
    };
    assert!(body_hit_by(&boss, hurtbox, &shot_at(216.0, 116.0)));
    assert!(body_hit_by(&boss, hurtbox, &shot_at(197.0, 100.0)));
    assert!(!body_hit_by(&boss, hurtbox, &shot_at(195.0, 116.0)));
}

#[test]
fn bodies_touch_compares_centres() {
    let hero = Body::at(188.0, 104.0, 8.0, 16.0); // centre (192, 112)
    let boss = Body::at(180.0, 100.0, 24.0, 24.0); // centre (192, 112)
    let reach = HitShape::AxisBox {
        half_width: 20.0,
        half_height: 16.0,
    };
    assert!(bodies_touch(&hero, reach, &boss));

    let far = Body::at(140.0, 104.0, 8.0, 16.0);
    assert!(!bodies_touch(&far, reach, &boss));
}

#[test]
fn lands_on_requires_downward_or_resting_motion() {
    let ledge = Rect::new(32.0, 160.0, 48.0, 8.0);
    let resting = Body::at(40.0, 144.0, 16.0, 16.0);
    assert!(lands_on(&resting, &ledge, 10.0));

    let rising = Body {
        vy: -0.5,
        ..resting
    };
    assert!(!lands_on(&rising, &ledge, 10.0));

    let above = Body::at(40.0, 143.0, 16.0, 16.0);
    assert!(!lands_on(&above, &ledge, 10.0));
}

#[test]
fn projectile_only_strikes_top_while_falling() {
    let floor = Rect::new(0.0, 200.0, 256.0, 40.0);
    let mut p = shot_at(50.0, 196.0);
    p.vy = 1.0;
    assert!(projectile_strikes_top(&p, &floor, 10.0));

    p.vy = -1.0;
    assert!(!projectile_strikes_top(&p, &floor, 10.0));

    p.vy = 1.0;
    p.y = 190.0; // bottom at 196, above the top
    assert!(!projectile_strikes_top(&p, &floor, 10.0));
}

#[test]
fn in_bounds_honours_margin() {
    assert!(in_bounds(0.0, 0.0, 256.0, 240.0, 0.0));
    assert!(in_bounds(256.0, 240.0, 256.0, 240.0, 0.0));
    assert!(!in_bounds(-0.1, 10.0, 256.0, 240.0, 0.0));
    assert!(in_bounds(-40.0, 10.0, 256.0, 240.0, 50.0));
    assert!(!in_bounds(-51.0, 10.0, 256.0, 240.0, 50.0));
    assert!(!in_bounds(10.0, 257.0, 256.0, 240.0, 16.0));
}
