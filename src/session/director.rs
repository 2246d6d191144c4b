use crate::analysis::AudioAnalysis;
use crate::encode::clip::encode_clip;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::core::{ClipTiming, FRAME_CANVAS, Fps};
use crate::foundation::error::{VizError, VizResult};
use crate::mood::label::MoodLabel;
use crate::render::strategy::{StrategyKind, renderer_for};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Options for [`VisualizationDirector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectorOpts {
    /// Seed for strategy selection and particle spawning; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for DirectorOpts {
    fn default() -> Self {
        Self {
            seed: None,
            overwrite: true,
        }
    }
}

/// Outcome of one render job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderReport {
    /// Strategy that drew the clip.
    pub strategy: StrategyKind,
    /// Frames handed to the sink.
    pub frames: u64,
    /// Clip length in seconds.
    pub duration_secs: f64,
}

/// Picks a rendering strategy per job and drives it across the clip into an encoder.
#[derive(Debug)]
pub struct VisualizationDirector {
    opts: DirectorOpts,
    rng: StdRng,
}

impl VisualizationDirector {
    /// Create a director; all randomness of its jobs derives from `opts.seed`.
    pub fn new(opts: DirectorOpts) -> Self {
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { opts, rng }
    }

    /// Options this director was created with.
    pub fn opts(&self) -> &DirectorOpts {
        &self.opts
    }

    /// Draw a strategy uniformly from [`StrategyKind::ALL`].
    pub fn select_strategy(&mut self) -> StrategyKind {
        StrategyKind::ALL[self.rng.gen_range(0..StrategyKind::ALL.len())]
    }

    /// Render a visualization video for `analysis` and `mood` to `out_path`.
    ///
    /// The source audio is cut to the analysed window, so audio and video have the same length.
    /// A partially written file is left for the caller on failure.
    #[tracing::instrument(
        skip(self, analysis, audio_file, out_path),
        fields(audio = %audio_file.display(), out = %out_path.display())
    )]
    pub fn render_video(
        &mut self,
        audio_file: &Path,
        analysis: &AudioAnalysis,
        mood: MoodLabel,
        target_fps: u32,
        out_path: &Path,
    ) -> VizResult<PathBuf> {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out_path.to_path_buf(),
            overwrite: self.opts.overwrite,
        });
        let audio = AudioInputConfig {
            path: audio_file.to_path_buf(),
            offset_secs: analysis.offset_secs,
        };
        self.render_into(analysis, mood, target_fps, Some(audio), &mut sink)?;
        Ok(out_path.to_path_buf())
    }

    /// Select a strategy and stream `round(duration * target_fps)` frames into `sink`.
    ///
    /// The analysis is validated before the sink sees anything.
    #[tracing::instrument(skip(self, analysis, audio, sink), fields(mood = %mood))]
    pub fn render_into(
        &mut self,
        analysis: &AudioAnalysis,
        mood: MoodLabel,
        target_fps: u32,
        audio: Option<AudioInputConfig>,
        sink: &mut dyn FrameSink,
    ) -> VizResult<RenderReport> {
        let mut strategy = None;
        let result = self.run(analysis, mood, target_fps, audio, sink, &mut strategy);
        match &result {
            Ok(report) => tracing::info!(
                strategy = %report.strategy,
                frames = report.frames,
                duration_secs = report.duration_secs,
                "render complete"
            ),
            Err(e) => tracing::error!(
                stage = %e.stage(),
                mood = %mood,
                strategy = strategy.map_or("none", StrategyKind::as_str),
                error = %e,
                "render failed"
            ),
        }
        result
    }

    fn run(
        &mut self,
        analysis: &AudioAnalysis,
        mood: MoodLabel,
        target_fps: u32,
        audio: Option<AudioInputConfig>,
        sink: &mut dyn FrameSink,
        strategy_out: &mut Option<StrategyKind>,
    ) -> VizResult<RenderReport> {
        analysis.validate()?;
        let fps = Fps::integer(target_fps)
            .map_err(|_| VizError::input(format!("target fps must be > 0, got {target_fps}")))?;
        let timing = ClipTiming::new(analysis.duration_secs(), fps)?;

        let strategy = self.select_strategy();
        *strategy_out = Some(strategy);
        tracing::info!(
            strategy = %strategy,
            duration_secs = timing.duration_secs,
            frames = timing.frame_count(),
            "strategy selected"
        );

        let mut renderer = renderer_for(strategy, analysis, mood, &mut self.rng)?;
        let frames = encode_clip(
            &mut |t| renderer.render(t),
            timing,
            FRAME_CANVAS,
            audio,
            sink,
        )?;

        Ok(RenderReport {
            strategy,
            frames,
            duration_secs: timing.duration_secs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/director.rs"]
mod tests;
