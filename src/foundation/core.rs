use crate::foundation::error::{VizError, VizResult};

pub use kurbo::{Point, Vec2};

/// Absolute 0-based frame index in clip timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> VizResult<Self> {
        if den == 0 {
            return Err(VizError::input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(VizError::input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate, e.g. `Fps::integer(24)`.
    pub fn integer(fps: u32) -> VizResult<Self> {
        Self::new(fps, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame count, rounding to the nearest frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Every rendered frame has this size (a 16x9 figure at 100 dpi).
pub const FRAME_CANVAS: Canvas = Canvas {
    width: 1600,
    height: 900,
};

/// Sampling plan for one clip: how long it is and how often a frame is taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipTiming {
    /// Clip length in seconds.
    pub duration_secs: f64,
    /// Output frame rate.
    pub fps: Fps,
}

impl ClipTiming {
    /// Create a timing plan. `duration_secs` must be finite and non-negative.
    pub fn new(duration_secs: f64, fps: Fps) -> VizResult<Self> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(VizError::input(format!(
                "clip duration must be finite and >= 0, got {duration_secs}"
            )));
        }
        Ok(Self { duration_secs, fps })
    }

    /// Number of frames in the clip, `round(duration * fps)`.
    pub fn frame_count(self) -> u64 {
        self.fps.secs_to_frames_round(self.duration_secs)
    }

    /// Timeline position of `frame` in seconds (`index / fps`).
    pub fn time_at(self, frame: FrameIndex) -> f64 {
        self.fps.frames_to_secs(frame.0)
    }
}

/// Straight (non-premultiplied) RGB color with channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Construct from float channels (not clamped until conversion).
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Construct from a packed `0xRRGGBB` value.
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as f64 / 255.0,
            g: ((v >> 8) & 0xff) as f64 / 255.0,
            b: (v & 0xff) as f64 / 255.0,
        }
    }

    /// Component-wise linear interpolation; `t` is clamped to `0..=1`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Convert to straight-alpha RGBA8 with the given opacity.
    pub fn to_rgba8(self, alpha: f64) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(alpha)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
