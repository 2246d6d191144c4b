use crate::analysis::AudioAnalysis;
use crate::foundation::core::{FRAME_CANVAS, Rgb};
use crate::foundation::error::VizResult;
use crate::mood::label::MoodLabel;
use crate::mood::palette::{ColorPair, MoodPalette, SchemeLayout};
use crate::particles::system::ParticleSystem;
use crate::render::frame::Frame;
use crate::render::raster::Surface;
use crate::render::spectrum::Spectrogram;
use crate::render::strategy::{FrameRenderer, StrategyKind};
use rand::rngs::StdRng;

/// Fallback circle radius, in frame-height units.
pub(crate) const CIRCLE_RADIUS: f64 = 0.03;

/// Background color for amplitude `amplitude`: red when loud, blue when quiet, tinted by `pair`.
pub(crate) fn amplitude_background(amplitude: f64, pair: ColorPair) -> Rgb {
    let f = (amplitude * 10.0).clamp(0.0, 1.0);
    Rgb::new(f, 0.0, 1.0 - f).lerp(pair.blend(f), 0.5)
}

/// Amplitude-colored background, spectrogram revealed over the clip, fifteen reactive circles.
pub(crate) struct SpectralRenderer<'a> {
    analysis: &'a AudioAnalysis,
    pair: ColorPair,
    system: ParticleSystem,
    spectrogram: Spectrogram,
    surface: Surface,
}

impl<'a> SpectralRenderer<'a> {
    pub(crate) fn new(analysis: &'a AudioAnalysis, mood: MoodLabel, rng: StdRng) -> VizResult<Self> {
        let spectrogram = Spectrogram::build(analysis, FRAME_CANVAS.width as usize);
        tracing::debug!(columns = spectrogram.columns(), "spectrogram ready");
        Ok(Self {
            analysis,
            pair: MoodPalette::lookup(mood, SchemeLayout::Single).pair(0),
            system: ParticleSystem::amplitude_driven(rng),
            spectrogram,
            surface: Surface::new(FRAME_CANVAS.width, FRAME_CANVAS.height)?,
        })
    }
}

impl FrameRenderer for SpectralRenderer<'_> {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::Spectral
    }

    fn render(&mut self, t: f64) -> VizResult<Frame> {
        let amplitude = f64::from(self.analysis.amplitude_at(t)?);
        let underlay = self.spectrogram.visible_image(t)?;
        let sprites = self.system.step(t, amplitude);

        let (w, h) = (
            f64::from(self.surface.width()),
            f64::from(self.surface.height()),
        );
        self.surface.begin();
        self.surface
            .fill_background(amplitude_background(amplitude, self.pair));
        if let Some((image, share)) = underlay {
            self.surface.fill_image(&image, 0.0, 0.0, w * share, h);
        }
        self.surface.draw_sprites(&sprites, CIRCLE_RADIUS);

        let mut frame = Frame::new(FRAME_CANVAS.width, FRAME_CANVAS.height);
        self.surface.finish_into(&mut frame, 0, 0)?;
        Ok(frame)
    }
}
