//! Audio features consumed by the renderer, and the analyzer collaborator that produces them.

pub(crate) mod analyzer;
pub(crate) mod beats;
pub(crate) mod decode;
pub(crate) mod stft;

use crate::foundation::error::{VizError, VizResult};

/// Features extracted from one audio window.
///
/// `samples` is mono PCM in `-1..=1`; `samples[0]` sits at `offset_secs` in the source file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioAnalysis {
    /// Mono PCM samples.
    pub samples: Vec<f32>,
    /// Samples per second, must be > 0.
    pub sample_rate: u32,
    /// Estimated tempo in beats per minute (0 when unknown).
    pub tempo_bpm: f64,
    /// Beat timestamps in seconds relative to `samples[0]`, non-decreasing.
    pub beat_times: Vec<f64>,
    /// Position of `samples[0]` in the source file, in seconds.
    #[serde(default)]
    pub offset_secs: f64,
}

impl AudioAnalysis {
    /// Analysis of a window that starts at the beginning of the source.
    pub fn new(samples: Vec<f32>, sample_rate: u32, tempo_bpm: f64, beat_times: Vec<f64>) -> Self {
        Self {
            samples,
            sample_rate,
            tempo_bpm,
            beat_times,
            offset_secs: 0.0,
        }
    }

    /// Set the source position of the first sample.
    pub fn with_offset(mut self, offset_secs: f64) -> Self {
        self.offset_secs = offset_secs;
        self
    }

    /// Length of the analysed window, `len(samples) / sample_rate`.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Reject analyses the renderer cannot work with.
    pub fn validate(&self) -> VizResult<()> {
        if self.sample_rate == 0 {
            return Err(VizError::input("sample_rate must be > 0"));
        }
        if self.samples.is_empty() {
            return Err(VizError::input("sample buffer is empty (duration = 0)"));
        }
        if let Some(i) = self.samples.iter().position(|s| !s.is_finite()) {
            return Err(VizError::input(format!("sample {i} is not finite")));
        }
        if !self.tempo_bpm.is_finite() || self.tempo_bpm < 0.0 {
            return Err(VizError::input(format!(
                "tempo must be finite and >= 0, got {}",
                self.tempo_bpm
            )));
        }
        if !self.offset_secs.is_finite() || self.offset_secs < 0.0 {
            return Err(VizError::input(format!(
                "offset must be finite and >= 0, got {}",
                self.offset_secs
            )));
        }
        let mut prev = f64::NEG_INFINITY;
        for &b in &self.beat_times {
            if !b.is_finite() || b < prev {
                return Err(VizError::input(
                    "beat timestamps must be finite and non-decreasing",
                ));
            }
            prev = b;
        }
        Ok(())
    }

    /// Sample index for time `t`: `round(t * sample_rate)` clamped to the last sample.
    pub fn sample_index(&self, t: f64) -> VizResult<usize> {
        if !t.is_finite() || t < 0.0 {
            return Err(VizError::index(format!("sample lookup at invalid time {t}")));
        }
        let last = self
            .samples
            .len()
            .checked_sub(1)
            .ok_or_else(|| VizError::index("sample lookup into empty buffer"))?;
        let raw = (t * f64::from(self.sample_rate)).round();
        Ok((raw as usize).min(last))
    }

    /// Instantaneous magnitude `|samples[sample_index(t)]|`.
    pub fn amplitude_at(&self, t: f64) -> VizResult<f32> {
        let idx = self.sample_index(t)?;
        self.samples
            .get(idx)
            .map(|s| s.abs())
            .ok_or_else(|| VizError::index(format!("sample index {idx} out of bounds")))
    }
}
