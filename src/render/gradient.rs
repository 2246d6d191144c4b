use crate::analysis::AudioAnalysis;
use crate::foundation::core::{FRAME_CANVAS, Rgb};
use crate::foundation::error::VizResult;
use crate::foundation::math::{unit_cos, unit_sin};
use crate::mood::label::MoodLabel;
use crate::mood::palette::{ColorPair, MoodPalette, SchemeLayout};
use crate::particles::system::ParticleSystem;
use crate::render::frame::Frame;
use crate::render::raster::{ImagePaint, Surface};
use crate::render::spectral::CIRCLE_RADIUS;
use crate::render::strategy::{FrameRenderer, StrategyKind};
use rand::rngs::StdRng;

/// Angular speed of the flow.
const FLOW_SPEED: f64 = 0.5;
/// Phase offsets of the red, green and blue channels.
const CHANNEL_PHASE: [f64; 3] = [0.0, 1.0, 2.0];
/// Phase added across the full frame width.
const SPREAD: f64 = std::f64::consts::FRAC_PI_2;

/// Flowing three-channel gradient with fifteen reactive circles on top.
pub(crate) struct GradientRenderer<'a> {
    analysis: &'a AudioAnalysis,
    pair: ColorPair,
    system: ParticleSystem,
    surface: Surface,
}

impl<'a> GradientRenderer<'a> {
    pub(crate) fn new(analysis: &'a AudioAnalysis, mood: MoodLabel, rng: StdRng) -> VizResult<Self> {
        Ok(Self {
            analysis,
            pair: MoodPalette::lookup(mood, SchemeLayout::Single).pair(0),
            system: ParticleSystem::amplitude_driven(rng),
            surface: Surface::new(FRAME_CANVAS.width, FRAME_CANVAS.height)?,
        })
    }

    /// Gradient color at horizontal position `x` in `[0, 1]` and time `t`.
    fn color_at(&self, t: f64, x: f64) -> Rgb {
        let flow = (FLOW_SPEED * t).sin();
        let p = flow + x * SPREAD;
        let base = Rgb::new(
            unit_sin(p + CHANNEL_PHASE[0]),
            unit_cos(p + CHANNEL_PHASE[1]),
            unit_sin(p + CHANNEL_PHASE[2]),
        );
        base.lerp(self.pair.blend(unit_sin(flow)), 0.5)
    }

    /// One-pixel-high strip of the gradient, one texel per output column.
    fn strip(&self, t: f64) -> VizResult<ImagePaint> {
        let w = self.surface.width();
        let rgb = (0..w)
            .flat_map(|x| {
                let c = self.color_at(t, f64::from(x) / f64::from(w.max(2) - 1));
                let [r, g, b, _] = c.to_rgba8(1.0);
                [r, g, b]
            })
            .collect::<Vec<_>>();
        ImagePaint::from_rgb8(&rgb, w, 1)
    }
}

impl FrameRenderer for GradientRenderer<'_> {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::Gradient
    }

    fn render(&mut self, t: f64) -> VizResult<Frame> {
        let amplitude = f64::from(self.analysis.amplitude_at(t)?);
        let strip = self.strip(t)?;
        let sprites = self.system.step(t, amplitude);

        let (w, h) = (
            f64::from(self.surface.width()),
            f64::from(self.surface.height()),
        );
        self.surface.begin();
        self.surface.fill_background(self.color_at(t, 0.5));
        self.surface.fill_image(&strip, 0.0, 0.0, w, h);
        self.surface.draw_sprites(&sprites, CIRCLE_RADIUS);

        let mut frame = Frame::new(FRAME_CANVAS.width, FRAME_CANVAS.height);
        self.surface.finish_into(&mut frame, 0, 0)?;
        Ok(frame)
    }
}
