use crate::foundation::core::{Point, Rgb, Vec2};
use crate::particles::{BoundaryPolicy, MotionConfig, Shape, ShapeKind, ShapeSprite, VisualModel};
use rand::Rng;
use rand::rngs::StdRng;
use std::ops::Range;

/// Initial speed bound per axis.
const SPAWN_SPEED: f64 = 0.05;
const SPRITE_ALPHA: f64 = 0.7;

/// How shapes are created.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnConfig {
    /// Number of shapes.
    pub count: usize,
    /// Kinds drawn uniformly at spawn. Must not be empty.
    pub kinds: &'static [ShapeKind],
    /// Uniform range for circle radii; `None` leaves radii to the renderer.
    pub radius: Option<Range<f64>>,
}

impl SpawnConfig {
    /// Ten shapes of any kind.
    pub fn quadrant() -> Self {
        Self {
            count: 10,
            kinds: &ShapeKind::ALL,
            radius: None,
        }
    }

    /// Fifteen circles with radii in `[0.02, 0.04)`.
    pub fn amplitude_driven() -> Self {
        Self {
            count: 15,
            kinds: &[ShapeKind::Circle],
            radius: Some(0.02..0.04),
        }
    }
}

/// Fixed-size shape collection advanced once per rendered frame.
#[derive(Debug)]
pub struct ParticleSystem {
    shapes: Vec<Shape>,
    motion: MotionConfig,
    visual: VisualModel,
    rng: StdRng,
}

impl ParticleSystem {
    /// Spawn `spawn.count` shapes: kind uniform over `spawn.kinds`, position uniform in `[0,1]²`,
    /// velocity components uniform in `[-0.05, 0.05)`.
    pub fn new(spawn: SpawnConfig, motion: MotionConfig, visual: VisualModel, mut rng: StdRng) -> Self {
        let shapes = (0..spawn.count)
            .map(|_| {
                let kind = if spawn.kinds.is_empty() {
                    ShapeKind::Circle
                } else {
                    spawn.kinds[rng.gen_range(0..spawn.kinds.len())]
                };
                let position = Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                let velocity = Vec2::new(
                    rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED),
                    rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED),
                );
                let radius = match (&spawn.radius, kind) {
                    (Some(r), ShapeKind::Circle) if r.start < r.end => {
                        Some(rng.gen_range(r.clone()))
                    }
                    (Some(r), ShapeKind::Circle) => Some(r.start),
                    _ => None,
                };
                Shape {
                    kind,
                    position,
                    velocity,
                    radius,
                }
            })
            .collect();

        Self {
            shapes,
            motion,
            visual,
            rng,
        }
    }

    /// Ten reflecting shapes with oscillating visuals, for one quadrant.
    pub fn quadrant(rng: StdRng) -> Self {
        Self::new(
            SpawnConfig::quadrant(),
            MotionConfig::QUADRANT,
            VisualModel::Oscillating,
            rng,
        )
    }

    /// Fifteen clamped circles with amplitude-driven visuals.
    pub fn amplitude_driven(rng: StdRng) -> Self {
        Self::new(
            SpawnConfig::amplitude_driven(),
            MotionConfig::AMPLITUDE_DRIVEN,
            VisualModel::AmplitudeDriven,
            rng,
        )
    }

    /// Current shapes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// `true` when the system holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Advance every shape one frame, then return the sprites to draw at time `t`.
    pub fn step(&mut self, t: f64, amplitude: f64) -> Vec<ShapeSprite> {
        let motion = self.motion;
        for shape in &mut self.shapes {
            shape.position += shape.velocity;

            if motion.jitter > 0.0 {
                let j = motion.jitter;
                shape.velocity.x += self.rng.gen_range(-j..=j);
                shape.velocity.y += self.rng.gen_range(-j..=j);
            }
            if let Some(max) = motion.max_speed {
                shape.velocity.x = shape.velocity.x.clamp(-max, max);
                shape.velocity.y = shape.velocity.y.clamp(-max, max);
            }

            bounce(&mut shape.position.x, &mut shape.velocity.x, motion.boundary);
            bounce(&mut shape.position.y, &mut shape.velocity.y, motion.boundary);
        }
        self.sprites(t, amplitude)
    }

    /// Sprites for the current state at time `t`, without advancing.
    pub fn sprites(&self, t: f64, amplitude: f64) -> Vec<ShapeSprite> {
        let amp = if amplitude.is_finite() {
            amplitude.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                let (size, color) = match self.visual {
                    VisualModel::Oscillating => (
                        1.0 + 0.5 * (0.1 * t).sin(),
                        Rgb::new(1.0 - (0.5 * t).sin().abs(), 0.5, (0.5 * t).cos().abs()),
                    ),
                    VisualModel::AmplitudeDriven => (
                        1.0 + 0.5 * (t * (i as f64 + 1.0) * 0.2).sin() * amp,
                        Rgb::new(1.0 - amp, 0.5, amp),
                    ),
                };
                ShapeSprite {
                    kind: shape.kind,
                    position: shape.position,
                    radius: shape.radius,
                    size,
                    color,
                    alpha: SPRITE_ALPHA,
                }
            })
            .collect()
    }
}

/// Turn the velocity inward when `pos` is outside `[0,1]`; clamp the position under
/// [`BoundaryPolicy::Clamp`].
fn bounce(pos: &mut f64, vel: &mut f64, policy: BoundaryPolicy) {
    if *pos < 0.0 {
        *vel = vel.abs();
    } else if *pos > 1.0 {
        *vel = -vel.abs();
    } else {
        return;
    }
    if policy == BoundaryPolicy::Clamp {
        *pos = pos.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/system.rs"]
mod tests;
