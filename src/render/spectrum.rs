use crate::analysis::AudioAnalysis;
use crate::analysis::stft::{HOP, N_FFT, Stft};
use crate::foundation::core::Rgb;
use crate::foundation::error::{VizError, VizResult};
use crate::render::raster::ImagePaint;

/// Number of log-spaced frequency bands.
pub(crate) const BANDS: usize = 128;
const MIN_HZ: f64 = 30.0;
/// Quietest level shown, relative to the loudest visible cell.
const FLOOR_DB: f32 = -80.0;

/// Inferno-like colormap stops, evenly spaced from quiet to loud.
const INFERNO: [u32; 9] = [
    0x000004, 0x1F0C48, 0x550F6D, 0x88226A, 0xBA3655, 0xE35933, 0xF98C0A, 0xF9C932, 0xFCFFA4,
];

/// Log-frequency magnitude spectrogram of a whole clip, revealed left to right as time advances.
#[derive(Clone, Debug)]
pub(crate) struct Spectrogram {
    columns: usize,
    /// Column-major band magnitudes, `[column][band]`, band 0 lowest.
    cells: Vec<f32>,
    /// Center sample of the last STFT frame folded into each column.
    column_end: Vec<usize>,
    sample_rate: u32,
}

impl Spectrogram {
    /// Analyse the whole sample buffer, grouping STFT frames so there are at most `max_columns`
    /// columns.
    pub(crate) fn build(analysis: &AudioAnalysis, max_columns: usize) -> Self {
        let stft = Stft::magnitudes(&analysis.samples, N_FFT, HOP);
        let sample_rate = analysis.sample_rate;
        if stft.n_frames == 0 || max_columns == 0 || sample_rate == 0 {
            return Self {
                columns: 0,
                cells: Vec::new(),
                column_end: Vec::new(),
                sample_rate,
            };
        }

        let bands = band_bins(&stft, sample_rate);
        let group = stft.n_frames.div_ceil(max_columns);
        let columns = stft.n_frames.div_ceil(group);

        let mut cells = vec![0.0f32; columns * BANDS];
        let mut column_end = Vec::with_capacity(columns);
        for c in 0..columns {
            let first = c * group;
            let last = ((c + 1) * group).min(stft.n_frames);
            let col = &mut cells[c * BANDS..(c + 1) * BANDS];
            for f in first..last {
                let frame = stft.frame(f);
                for (cell, &(lo, hi)) in col.iter_mut().zip(&bands) {
                    let bins = &frame[lo..hi];
                    *cell += bins.iter().sum::<f32>() / bins.len() as f32;
                }
            }
            let n = (last - first) as f32;
            col.iter_mut().for_each(|v| *v /= n);
            column_end.push((last - 1) * stft.hop);
        }

        Self {
            columns,
            cells,
            column_end,
            sample_rate,
        }
    }

    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    /// Number of columns whose audio lies strictly before `round(t * sample_rate)`.
    pub(crate) fn visible_columns(&self, t: f64) -> VizResult<usize> {
        if !t.is_finite() || t < 0.0 {
            return Err(VizError::index(format!("spectrum lookup at invalid time {t}")));
        }
        let cutoff = (t * f64::from(self.sample_rate)).round() as usize;
        Ok(self.column_end.partition_point(|&end| end < cutoff))
    }

    /// Visible part as an image (low frequencies at the bottom) and the share of the clip
    /// width it covers. `None` before the first column is revealed.
    pub(crate) fn visible_image(&self, t: f64) -> VizResult<Option<(ImagePaint, f64)>> {
        let visible = self.visible_columns(t)?;
        if visible == 0 {
            return Ok(None);
        }
        let cells = &self.cells[..visible * BANDS];
        let peak = cells.iter().copied().fold(0.0f32, f32::max);

        let mut rgb = vec![0u8; visible * BANDS * 3];
        for c in 0..visible {
            for band in 0..BANDS {
                let m = cells[c * BANDS + band];
                let db = if peak > 0.0 && m > 0.0 {
                    (20.0 * (m / peak).log10()).max(FLOOR_DB)
                } else {
                    FLOOR_DB
                };
                let level = f64::from((db - FLOOR_DB) / -FLOOR_DB);
                let row = BANDS - 1 - band;
                let i = (row * visible + c) * 3;
                let [r, g, b, _] = colormap(level).to_rgba8(1.0);
                rgb[i..i + 3].copy_from_slice(&[r, g, b]);
            }
        }

        let image = ImagePaint::from_rgb8(&rgb, visible as u32, BANDS as u32)?;
        Ok(Some((image, visible as f64 / self.columns as f64)))
    }
}

/// FFT bin range `[lo, hi)` for each log-spaced band between `MIN_HZ` and Nyquist. Bands
/// narrower than one bin take the bin nearest their center.
fn band_bins(stft: &Stft, sample_rate: u32) -> Vec<(usize, usize)> {
    let nyquist = f64::from(sample_rate) / 2.0;
    let bin_hz = stft.bin_hz(1, sample_rate);
    let top = stft.n_bins;
    let lo_hz = MIN_HZ.min(nyquist / 2.0);
    let ratio = nyquist / lo_hz;
    let edge = |k: usize| lo_hz * ratio.powf(k as f64 / BANDS as f64);

    (0..BANDS)
        .map(|k| {
            let (f0, f1) = (edge(k), edge(k + 1));
            let lo = ((f0 / bin_hz).ceil() as usize).min(top - 1);
            let hi = if k + 1 == BANDS {
                top
            } else {
                ((f1 / bin_hz).ceil() as usize).min(top)
            };
            if hi > lo {
                (lo, hi)
            } else {
                let center = (((f0 * f1).sqrt() / bin_hz).round() as usize).min(top - 1);
                (center, center + 1)
            }
        })
        .collect()
}

fn colormap(level: f64) -> Rgb {
    let x = level.clamp(0.0, 1.0) * (INFERNO.len() - 1) as f64;
    let i = (x.floor() as usize).min(INFERNO.len() - 2);
    Rgb::hex(INFERNO[i]).lerp(Rgb::hex(INFERNO[i + 1]), x - i as f64)
}
