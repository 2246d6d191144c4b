use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Analysis window length in samples.
pub(crate) const N_FFT: usize = 2048;
/// Distance between consecutive analysis frames in samples.
pub(crate) const HOP: usize = 512;

/// Magnitude short-time Fourier transform, frames stored row-major as `[frame][bin]`.
#[derive(Clone, Debug)]
pub(crate) struct Stft {
    pub(crate) n_frames: usize,
    pub(crate) n_bins: usize,
    pub(crate) n_fft: usize,
    pub(crate) hop: usize,
    mags: Vec<f32>,
}

impl Stft {
    /// Centered STFT: the signal is zero-padded by `n_fft / 2` on both sides so frame `i` is
    /// centered on sample `i * hop`.
    pub(crate) fn magnitudes(samples: &[f32], n_fft: usize, hop: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        if samples.is_empty() || n_fft == 0 || hop == 0 {
            return Self {
                n_frames: 0,
                n_bins,
                n_fft,
                hop,
                mags: Vec::new(),
            };
        }

        let n_frames = 1 + samples.len() / hop;
        let pad = n_fft / 2;
        let window = (0..n_fft)
            .map(|i| hann_window(i, n_fft))
            .collect::<Vec<_>>();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let mut buf = vec![Complex::new(0.0f32, 0.0); n_fft];
        let mut mags = Vec::with_capacity(n_frames * n_bins);

        for frame in 0..n_frames {
            let start = (frame * hop) as isize - pad as isize;
            for (i, slot) in buf.iter_mut().enumerate() {
                let src = start + i as isize;
                let s = if src >= 0 {
                    samples.get(src as usize).copied().unwrap_or(0.0)
                } else {
                    0.0
                };
                *slot = Complex::new(s * window[i], 0.0);
            }
            fft.process(&mut buf);
            mags.extend(buf[..n_bins].iter().map(|c| c.norm()));
        }

        Self {
            n_frames,
            n_bins,
            n_fft,
            hop,
            mags,
        }
    }

    pub(crate) fn frame(&self, i: usize) -> &[f32] {
        let start = i * self.n_bins;
        &self.mags[start..start + self.n_bins]
    }

    /// Center frequency of `bin` in Hz.
    pub(crate) fn bin_hz(&self, bin: usize, sample_rate: u32) -> f64 {
        bin as f64 * f64::from(sample_rate) / self.n_fft as f64
    }
}

/// Periodic Hann window.
pub(crate) fn hann_window(index: usize, size: usize) -> f32 {
    0.5 - 0.5 * ((2.0 * PI * index as f32) / size as f32).cos()
}
