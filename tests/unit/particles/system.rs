use super::*;
use rand::SeedableRng;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn single(kind: ShapeKind, position: Point, velocity: Vec2, motion: MotionConfig) -> ParticleSystem {
    ParticleSystem {
        shapes: vec![Shape {
            kind,
            position,
            velocity,
            radius: None,
        }],
        motion,
        visual: VisualModel::AmplitudeDriven,
        rng: rng(0),
    }
}

#[test]
fn spawn_ranges() {
    for seed in 0..20 {
        let sys = ParticleSystem::quadrant(rng(seed));
        assert_eq!(sys.len(), 10);
        for s in sys.shapes() {
            assert!((0.0..1.0).contains(&s.position.x));
            assert!((0.0..1.0).contains(&s.position.y));
            assert!(s.velocity.x.abs() <= 0.05 && s.velocity.y.abs() <= 0.05);
            assert_eq!(s.radius, None);
        }
    }
}

#[test]
fn amplitude_driven_spawns_circles_with_radii() {
    let sys = ParticleSystem::amplitude_driven(rng(7));
    assert_eq!(sys.len(), 15);
    for s in sys.shapes() {
        assert_eq!(s.kind, ShapeKind::Circle);
        let r = s.radius.unwrap();
        assert!((0.02..0.04).contains(&r), "radius {r}");
    }
}

#[test]
fn quadrant_spawn_uses_every_kind() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..20 {
        for s in ParticleSystem::quadrant(rng(seed)).shapes() {
            seen.insert(s.kind);
        }
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn same_seed_same_simulation() {
    let mut a = ParticleSystem::amplitude_driven(rng(42));
    let mut b = ParticleSystem::amplitude_driven(rng(42));
    for i in 0..50 {
        let t = f64::from(i) / 24.0;
        assert_eq!(a.step(t, 0.3), b.step(t, 0.3));
    }
}

#[test]
fn clamped_motion_stays_in_unit_square() {
    for seed in 0..10 {
        let mut sys = ParticleSystem::amplitude_driven(rng(seed));
        for i in 0..2_000 {
            let sprites = sys.step(f64::from(i) / 24.0, 0.5);
            for s in &sprites {
                assert!((0.0..=1.0).contains(&s.position.x));
                assert!((0.0..=1.0).contains(&s.position.y));
            }
            for s in sys.shapes() {
                assert!(s.velocity.x.abs() <= 0.02 && s.velocity.y.abs() <= 0.02);
            }
        }
    }
}

#[test]
fn crossing_a_boundary_flips_velocity_sign() {
    for (motion, seed) in [
        (MotionConfig::AMPLITUDE_DRIVEN, 3),
        (MotionConfig::QUADRANT, 4),
    ] {
        let mut sys = ParticleSystem::new(
            SpawnConfig {
                count: 40,
                kinds: &ShapeKind::ALL,
                radius: None,
            },
            motion,
            VisualModel::Oscillating,
            rng(seed),
        );
        let mut crossings = 0;
        for _ in 0..500 {
            let before = sys.shapes().to_vec();
            sys.step(0.0, 0.0);
            for (b, a) in before.iter().zip(sys.shapes()) {
                for (p0, v0, v1) in [
                    (b.position.x, b.velocity.x, a.velocity.x),
                    (b.position.y, b.velocity.y, a.velocity.y),
                ] {
                    if !(0.0..=1.0).contains(&p0) {
                        continue;
                    }
                    let moved = p0 + v0;
                    if moved > 1.0 {
                        crossings += 1;
                        assert!(v0 > 0.0 && v1 <= 0.0, "v0={v0} v1={v1}");
                    } else if moved < 0.0 {
                        crossings += 1;
                        assert!(v0 < 0.0 && v1 >= 0.0, "v0={v0} v1={v1}");
                    }
                }
            }
        }
        assert!(crossings > 0);
    }
}

#[test]
fn clamp_policy_pins_position_to_edge() {
    let mut sys = single(
        ShapeKind::Circle,
        Point::new(0.99, 0.5),
        Vec2::new(0.02, 0.0),
        MotionConfig::AMPLITUDE_DRIVEN,
    );
    sys.step(0.0, 0.0);
    let s = &sys.shapes()[0];
    assert_eq!(s.position.x, 1.0);
    assert!(s.velocity.x < 0.0);
}

#[test]
fn reflect_policy_does_not_clamp() {
    let mut sys = single(
        ShapeKind::Bar,
        Point::new(0.98, 0.02),
        Vec2::new(0.05, -0.04),
        MotionConfig::QUADRANT,
    );
    sys.step(0.0, 0.0);
    let s = &sys.shapes()[0];
    assert!((s.position.x - 1.03).abs() < 1e-12);
    assert!((s.position.y + 0.02).abs() < 1e-12);
    assert_eq!(s.velocity, Vec2::new(-0.05, 0.04));

    // Already pointing inward: stays inward and drifts back.
    sys.step(0.0, 0.0);
    let s = &sys.shapes()[0];
    assert_eq!(s.velocity, Vec2::new(-0.05, 0.04));
    assert!(s.position.x < 1.0 && s.position.y > 0.0);
}

#[test]
fn oscillating_visuals_follow_time() {
    let sys = ParticleSystem::quadrant(rng(1));
    let at0 = sys.sprites(0.0, 0.9);
    for s in &at0 {
        assert!((s.size - 1.0).abs() < 1e-12);
        assert_eq!(s.color, Rgb::new(1.0, 0.5, 1.0));
        assert_eq!(s.alpha, 0.7);
    }
    let t = std::f64::consts::PI;
    let s = &sys.sprites(t, 0.0)[0];
    assert!((s.size - (1.0 + 0.5 * (0.1 * t).sin())).abs() < 1e-12);
    assert!(s.color.r.abs() < 1e-12);
}

#[test]
fn amplitude_visuals_follow_amplitude() {
    let sys = ParticleSystem::amplitude_driven(rng(1));
    let loud = sys.sprites(2.0, 1.0);
    assert_eq!(loud[0].color, Rgb::new(0.0, 0.5, 1.0));
    assert!((loud[2].size - (1.0 + 0.5 * (2.0f64 * 3.0 * 0.2).sin())).abs() < 1e-12);

    assert_eq!(sys.sprites(2.0, 5.0), loud);
    let silent = sys.sprites(2.0, f64::NAN);
    assert!(silent.iter().all(|s| s.size == 1.0 && s.color == Rgb::new(1.0, 0.5, 0.0)));
}
