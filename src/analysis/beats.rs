use crate::analysis::stft::{HOP, N_FFT, Stft};

const MIN_BPM: f64 = 60.0;
const MAX_BPM: f64 = 200.0;
const PRIOR_CENTER_BPM: f64 = 120.0;
/// Width of the log-normal tempo prior, in octaves.
const PRIOR_OCTAVES: f64 = 1.0;
/// Penalty for deviating from the estimated period between consecutive beats.
const TIGHTNESS: f64 = 100.0;

/// Tempo and beat positions estimated from a mono signal.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BeatEstimate {
    pub(crate) tempo_bpm: f64,
    pub(crate) beat_times: Vec<f64>,
}

impl BeatEstimate {
    fn none() -> Self {
        Self {
            tempo_bpm: 0.0,
            beat_times: Vec::new(),
        }
    }
}

/// Spectral-flux onsets, prior-weighted autocorrelation tempo, dynamic-programming beats.
pub(crate) fn estimate_beats(samples: &[f32], sample_rate: u32) -> BeatEstimate {
    if sample_rate == 0 {
        return BeatEstimate::none();
    }
    let stft = Stft::magnitudes(samples, N_FFT, HOP);
    let onset = onset_envelope(&stft);
    if onset.len() < 4 {
        return BeatEstimate::none();
    }

    let frame_rate = f64::from(sample_rate) / HOP as f64;
    let Some(period) = estimate_period(&onset, frame_rate) else {
        return BeatEstimate::none();
    };

    let beats = track_beats(&onset, period);
    BeatEstimate {
        tempo_bpm: 60.0 * frame_rate / period,
        beat_times: beats
            .into_iter()
            .map(|f| f as f64 / frame_rate)
            .collect(),
    }
}

/// Mean positive log-magnitude increase per frame, normalized to unit standard deviation.
/// Empty when the signal is silent.
fn onset_envelope(stft: &Stft) -> Vec<f64> {
    if stft.n_frames == 0 {
        return Vec::new();
    }
    let compress = |m: f32| (1.0 + 10.0 * f64::from(m)).ln();

    let mut env = vec![0.0f64; stft.n_frames];
    for i in 1..stft.n_frames {
        let prev = stft.frame(i - 1);
        let cur = stft.frame(i);
        let flux = cur
            .iter()
            .zip(prev)
            .map(|(&c, &p)| (compress(c) - compress(p)).max(0.0))
            .sum::<f64>();
        env[i] = flux / stft.n_bins as f64;
    }

    let n = env.len() as f64;
    let mean = env.iter().sum::<f64>() / n;
    let var = env.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std <= 1e-9 {
        return Vec::new();
    }
    env.iter_mut().for_each(|v| *v /= std);
    env
}

/// Beat period in frames (fractional), or `None` when no lag in the tempo range fits.
fn estimate_period(onset: &[f64], frame_rate: f64) -> Option<f64> {
    let n = onset.len();
    let lag_min = ((60.0 * frame_rate / MAX_BPM).floor() as usize).max(1);
    let lag_max = ((60.0 * frame_rate / MIN_BPM).ceil() as usize).min(n.saturating_sub(2));
    if lag_min + 1 >= lag_max {
        return None;
    }

    let ac = (0..=lag_max + 1)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let sum = onset[..n - lag]
                .iter()
                .zip(&onset[lag..])
                .map(|(a, b)| a * b)
                .sum::<f64>();
            sum / (n - lag) as f64
        })
        .collect::<Vec<_>>();

    let prior = |lag: f64| {
        let bpm = 60.0 * frame_rate / lag;
        let octaves = (bpm / PRIOR_CENTER_BPM).log2() / PRIOR_OCTAVES;
        (-0.5 * octaves * octaves).exp()
    };

    let mut best: Option<(usize, f64)> = None;
    for lag in lag_min..=lag_max {
        let score = ac[lag] * prior(lag as f64);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((lag, score));
        }
    }
    let (lag, score) = best?;
    if score <= 0.0 {
        return None;
    }

    // Parabolic refinement around the integer peak.
    let (a, b, c) = (ac[lag - 1], ac[lag], ac[lag + 1]);
    let denom = a - 2.0 * b + c;
    let shift = if denom < 0.0 {
        (0.5 * (a - c) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };
    Some(lag as f64 + shift)
}

/// Dynamic-programming beat tracker: every beat maximizes onset strength plus the best
/// predecessor score, penalized by log-deviation from `period`.
fn track_beats(onset: &[f64], period: f64) -> Vec<usize> {
    let n = onset.len();
    let local = local_score(onset, period);

    let mut cum = vec![0.0f64; n];
    let mut back: Vec<Option<usize>> = vec![None; n];
    let reach_far = (2.0 * period).round() as usize;
    let reach_near = ((period / 2.0).round() as usize).max(1);

    for i in 0..n {
        let mut best: Option<(usize, f64)> = None;
        if i >= reach_near {
            let lo = i.saturating_sub(reach_far);
            for j in lo..=i - reach_near {
                let dev = ((i - j) as f64 / period).ln();
                let s = cum[j] - TIGHTNESS * dev * dev;
                if best.is_none_or(|(_, bs)| s > bs) {
                    best = Some((j, s));
                }
            }
        }
        match best {
            Some((j, s)) if s > 0.0 => {
                cum[i] = local[i] + s;
                back[i] = Some(j);
            }
            _ => cum[i] = local[i],
        }
    }

    // Last beat: strongest cumulative score within the final period.
    let tail = n.saturating_sub(period.round() as usize).min(n - 1);
    let mut last = tail;
    for i in tail..n {
        if cum[i] > cum[last] {
            last = i;
        }
    }

    let mut beats = vec![last];
    let mut cur = last;
    while let Some(prev) = back[cur] {
        beats.push(prev);
        cur = prev;
    }
    beats.reverse();
    trim_weak_edges(beats, &local)
}

/// Onsets smoothed with a Gaussian whose width follows the period.
fn local_score(onset: &[f64], period: f64) -> Vec<f64> {
    let half = period.round().max(1.0) as isize;
    let kernel = (-half..=half)
        .map(|k| {
            let x = k as f64 * 32.0 / period;
            (-0.5 * x * x).exp()
        })
        .collect::<Vec<_>>();

    let n = onset.len() as isize;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(ki, w)| {
                    let src = i + ki as isize - half;
                    if (0..n).contains(&src) {
                        onset[src as usize] * w
                    } else {
                        0.0
                    }
                })
                .sum()
        })
        .collect()
}

/// Drop leading and trailing beats whose local score is below half the RMS.
fn trim_weak_edges(beats: Vec<usize>, local: &[f64]) -> Vec<usize> {
    if beats.is_empty() {
        return beats;
    }
    let rms = (beats.iter().map(|&b| local[b] * local[b]).sum::<f64>() / beats.len() as f64).sqrt();
    let threshold = 0.5 * rms;
    let start = beats
        .iter()
        .position(|&b| local[b] >= threshold)
        .unwrap_or(beats.len());
    let end = beats
        .iter()
        .rposition(|&b| local[b] >= threshold)
        .map(|e| e + 1)
        .unwrap_or(start);
    beats[start..end.max(start)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clicks every 22 hops (~117.45 BPM at 22050 Hz).
    fn click_track(secs: f64, sr: u32, spacing: usize) -> Vec<f32> {
        let n = (secs * f64::from(sr)) as usize;
        let mut out = vec![0.0f32; n];
        let mut pos = spacing;
        while pos + 64 < n {
            for k in 0..64 {
                out[pos + k] = if k % 2 == 0 { 0.9 } else { -0.9 };
            }
            pos += spacing;
        }
        out
    }

    #[test]
    fn silence_has_no_tempo_or_beats() {
        let est = estimate_beats(&vec![0.0; 22_050 * 2], 22_050);
        assert_eq!(est, BeatEstimate::none());
    }

    #[test]
    fn tiny_input_has_no_tempo() {
        assert_eq!(estimate_beats(&[0.1, -0.1], 22_050), BeatEstimate::none());
        assert_eq!(estimate_beats(&[0.1; 100], 0), BeatEstimate::none());
    }

    #[test]
    fn click_track_tempo_and_spacing() {
        let sr = 22_050;
        let spacing = 22 * HOP;
        let expected_bpm = 60.0 * f64::from(sr) / spacing as f64;
        let expected_gap = spacing as f64 / f64::from(sr);

        let est = estimate_beats(&click_track(10.0, sr, spacing), sr);
        assert!(
            (est.tempo_bpm - expected_bpm).abs() < 4.0,
            "tempo {} vs {}",
            est.tempo_bpm,
            expected_bpm
        );
        assert!(est.beat_times.len() >= 12, "beats: {:?}", est.beat_times);
        assert!(est.beat_times.windows(2).all(|w| w[0] <= w[1]));

        let gaps = est
            .beat_times
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect::<Vec<_>>();
        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        assert!((mean_gap - expected_gap).abs() < 0.03, "mean gap {mean_gap}");
    }
}
