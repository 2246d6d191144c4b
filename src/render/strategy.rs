use crate::analysis::AudioAnalysis;
use crate::foundation::error::{VizError, VizResult};
use crate::mood::label::MoodLabel;
use crate::render::frame::Frame;
use crate::render::gradient::GradientRenderer;
use crate::render::quadrant::QuadrantRenderer;
use crate::render::spectral::SpectralRenderer;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Produces one frame per requested timestamp.
///
/// Timestamps are expected in increasing order within `[0, duration)`; each call advances the
/// renderer's shapes by one step. Only the shapes persist between calls.
pub trait FrameRenderer {
    /// Which strategy this renderer implements.
    fn strategy(&self) -> StrategyKind;

    /// Render the frame at `t` seconds.
    fn render(&mut self, t: f64) -> VizResult<Frame>;
}

/// The interchangeable rendering strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Four themed quadrants with drifting mixed shapes.
    Quadrant,
    /// Amplitude-colored background, spectrogram underlay, reactive circles.
    Spectral,
    /// Flowing three-channel gradient with reactive circles.
    Gradient,
}

impl StrategyKind {
    /// Every strategy, in selection order.
    pub const ALL: [StrategyKind; 3] = [Self::Quadrant, Self::Spectral, Self::Gradient];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quadrant => "quadrant",
            Self::Spectral => "spectral",
            Self::Gradient => "gradient",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                VizError::input(format!(
                    "unknown strategy '{s}' (expected quadrant, spectral or gradient)"
                ))
            })
    }
}

/// Construct the renderer for `kind`. Particle systems are seeded from `rng`.
pub fn renderer_for<'a>(
    kind: StrategyKind,
    analysis: &'a AudioAnalysis,
    mood: MoodLabel,
    rng: &mut StdRng,
) -> VizResult<Box<dyn FrameRenderer + 'a>> {
    analysis.validate()?;
    Ok(match kind {
        StrategyKind::Quadrant => Box::new(QuadrantRenderer::new(analysis, mood, rng)?),
        StrategyKind::Spectral => Box::new(SpectralRenderer::new(analysis, mood, fork(rng))?),
        StrategyKind::Gradient => Box::new(GradientRenderer::new(analysis, mood, fork(rng))?),
    })
}

/// Independent child generator.
pub(crate) fn fork(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.next_u64())
}

#[cfg(test)]
#[path = "../../tests/unit/render/strategy.rs"]
mod tests;
