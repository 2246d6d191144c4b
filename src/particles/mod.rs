//! Shape simulation inside the unit square.

pub(crate) mod system;

use crate::foundation::core::{Point, Rgb, Vec2};

/// Geometric primitive a shape is drawn as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Filled circle.
    Circle,
    /// Vertical bar rising from the bottom edge.
    Bar,
    /// Short slanted line segment.
    Line,
    /// Filled triangle hanging from its apex.
    Triangle,
}

impl ShapeKind {
    /// Every kind.
    pub const ALL: [ShapeKind; 4] = [Self::Circle, Self::Bar, Self::Line, Self::Triangle];
}

/// One simulated shape. Positions live in `[0,1]²` with y pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// What to draw.
    pub kind: ShapeKind,
    /// Current position.
    pub position: Point,
    /// Per-frame displacement.
    pub velocity: Vec2,
    /// Circle radius in unit-height coordinates, when fixed at spawn.
    pub radius: Option<f64>,
}

/// What happens when a shape leaves the unit square on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Point the velocity back inside and clamp the position into `[0,1]`.
    Clamp,
    /// Point the velocity back inside and leave the position where it is.
    Reflect,
}

/// Kinematic rules for a [`system::ParticleSystem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Half-width of the uniform velocity jitter added per axis each step; `0` disables it.
    pub jitter: f64,
    /// Component-wise velocity limit applied after jitter.
    pub max_speed: Option<f64>,
    /// Boundary handling.
    pub boundary: BoundaryPolicy,
}

impl MotionConfig {
    /// Free drift with reflection and no position clamp.
    pub const QUADRANT: Self = Self {
        jitter: 0.0,
        max_speed: None,
        boundary: BoundaryPolicy::Reflect,
    };

    /// Jittered, speed-limited motion clamped to the unit square.
    pub const AMPLITUDE_DRIVEN: Self = Self {
        jitter: 0.0005,
        max_speed: Some(0.02),
        boundary: BoundaryPolicy::Clamp,
    };
}

/// How sprite size and color are derived each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualModel {
    /// Size and color oscillate with time only.
    Oscillating,
    /// Size pulses with time, shape index and amplitude; color follows amplitude.
    AmplitudeDriven,
}

/// Drawable state of one shape for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSprite {
    /// What to draw.
    pub kind: ShapeKind,
    /// Position in `[0,1]²` (may sit slightly outside under [`BoundaryPolicy::Reflect`]).
    pub position: Point,
    /// Fixed radius from spawn, if any.
    pub radius: Option<f64>,
    /// Size multiplier, oscillating around 1.
    pub size: f64,
    /// Fill color.
    pub color: Rgb,
    /// Opacity.
    pub alpha: f64,
}
