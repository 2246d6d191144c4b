use crate::analysis::AudioAnalysis;
use crate::analysis::beats::estimate_beats;
use crate::analysis::decode::decode_mono_f32;
use crate::foundation::error::{VizError, VizResult};
use std::path::Path;

/// Produces an [`AudioAnalysis`] for a window of an audio file.
pub trait AudioAnalyzer {
    /// Analyse `[start_secs, end_secs)` of `path`; `end_secs = None` means "to the end".
    fn analyze(
        &mut self,
        path: &Path,
        start_secs: f64,
        end_secs: Option<f64>,
    ) -> VizResult<AudioAnalysis>;
}

/// Options for [`FfmpegAnalyzer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzerOpts {
    /// Decode sample rate in Hz.
    pub sample_rate: u32,
    /// Longest window accepted, in seconds. `None` disables the limit.
    pub max_duration_secs: Option<f64>,
}

impl Default for AnalyzerOpts {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            max_duration_secs: Some(300.0),
        }
    }
}

/// Analyzer that decodes through the system `ffmpeg` and estimates tempo and beats in-process.
#[derive(Clone, Debug, Default)]
pub struct FfmpegAnalyzer {
    opts: AnalyzerOpts,
}

impl FfmpegAnalyzer {
    /// Create an analyzer with the given options.
    pub fn new(opts: AnalyzerOpts) -> Self {
        Self { opts }
    }

    fn window(&self, start_secs: f64, end_secs: Option<f64>) -> VizResult<Option<f64>> {
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(VizError::input(format!(
                "start time must be finite and >= 0, got {start_secs}"
            )));
        }
        let duration = match end_secs {
            Some(end) if !end.is_finite() || end <= start_secs => {
                return Err(VizError::input(format!(
                    "end time {end} must be greater than start time {start_secs}"
                )));
            }
            Some(end) => Some(end - start_secs),
            None => None,
        };
        if let Some(max) = self.opts.max_duration_secs
            && let Some(d) = duration
            && d > max
        {
            return Err(VizError::input(format!(
                "requested window of {d:.3}s exceeds the {max:.0}s limit"
            )));
        }
        Ok(duration)
    }
}

impl AudioAnalyzer for FfmpegAnalyzer {
    #[tracing::instrument(skip(self))]
    fn analyze(
        &mut self,
        path: &Path,
        start_secs: f64,
        end_secs: Option<f64>,
    ) -> VizResult<AudioAnalysis> {
        let duration = self.window(start_secs, end_secs)?;
        let sample_rate = self.opts.sample_rate;
        let samples = decode_mono_f32(path, sample_rate, start_secs, duration)?;

        let decoded_secs = samples.len() as f64 / f64::from(sample_rate);
        if let Some(max) = self.opts.max_duration_secs
            && decoded_secs > max + 1.0 / f64::from(sample_rate)
        {
            return Err(VizError::input(format!(
                "decoded audio of {decoded_secs:.3}s exceeds the {max:.0}s limit"
            )));
        }

        let beats = estimate_beats(&samples, sample_rate);
        tracing::debug!(
            samples = samples.len(),
            tempo_bpm = beats.tempo_bpm,
            beats = beats.beat_times.len(),
            "audio analysed"
        );

        let analysis =
            AudioAnalysis::new(samples, sample_rate, beats.tempo_bpm, beats.beat_times)
                .with_offset(start_secs);
        analysis.validate()?;
        Ok(analysis)
    }
}
