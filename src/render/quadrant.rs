use crate::analysis::AudioAnalysis;
use crate::foundation::core::{FRAME_CANVAS, Rgb};
use crate::foundation::error::VizResult;
use crate::foundation::math::{unit_cos, unit_sin};
use crate::mood::label::MoodLabel;
use crate::mood::palette::{ColorScheme, MoodPalette, SchemeLayout};
use crate::particles::system::ParticleSystem;
use crate::render::frame::Frame;
use crate::render::raster::Surface;
use crate::render::strategy::{FrameRenderer, StrategyKind, fork};
use rand::rngs::StdRng;

/// Circle radius for shapes spawned without one, in quadrant-height units.
const CIRCLE_RADIUS: f64 = 0.0275;
/// Angular speed of the background flow.
const FLOW_SPEED: f64 = 0.3;

/// Four quadrants, each with its own color pair, flowing tint and ten drifting shapes.
///
/// Quadrant `i` sits at column `i % 2` and row `i / 2`, counted from the bottom-left.
pub(crate) struct QuadrantRenderer<'a> {
    analysis: &'a AudioAnalysis,
    scheme: ColorScheme,
    systems: Vec<ParticleSystem>,
    surface: Surface,
}

impl<'a> QuadrantRenderer<'a> {
    pub(crate) fn new(
        analysis: &'a AudioAnalysis,
        mood: MoodLabel,
        rng: &mut StdRng,
    ) -> VizResult<Self> {
        let scheme = MoodPalette::lookup(mood, SchemeLayout::Quadrants);
        let systems = (0..scheme.len())
            .map(|_| ParticleSystem::quadrant(fork(rng)))
            .collect();
        Ok(Self {
            analysis,
            scheme,
            systems,
            surface: Surface::new(FRAME_CANVAS.width / 2, FRAME_CANVAS.height / 2)?,
        })
    }

    fn background(&self, t: f64, i: usize) -> Rgb {
        let phase = (FLOW_SPEED * t).sin() + i as f64;
        let flow = Rgb::new(unit_sin(phase), unit_cos(phase), unit_sin(phase));
        let tint = self.scheme.pair(i).blend(unit_sin(phase));
        flow.lerp(tint, 0.5)
    }
}

impl FrameRenderer for QuadrantRenderer<'_> {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::Quadrant
    }

    fn render(&mut self, t: f64) -> VizResult<Frame> {
        let amplitude = f64::from(self.analysis.amplitude_at(t)?);
        let mut frame = Frame::new(FRAME_CANVAS.width, FRAME_CANVAS.height);
        let (qw, qh) = (self.surface.width(), self.surface.height());

        for i in 0..self.systems.len() {
            let background = self.background(t, i);
            let sprites = self.systems[i].step(t, amplitude);
            let x0 = (i as u32 % 2) * qw;
            let y0 = if i < 2 { qh } else { 0 };

            self.surface.begin();
            self.surface.fill_background(background);
            self.surface.draw_sprites(&sprites, CIRCLE_RADIUS);
            self.surface.finish_into(&mut frame, x0, y0)?;
        }
        Ok(frame)
    }
}
