use super::*;
use crate::encode::sink::InMemorySink;

fn director(seed: u64) -> VisualizationDirector {
    VisualizationDirector::new(DirectorOpts {
        seed: Some(seed),
        ..DirectorOpts::default()
    })
}

fn analysis(secs: f64) -> AudioAnalysis {
    let sr = 22_050;
    let n = (secs * f64::from(sr)) as usize;
    let samples = (0..n).map(|i| (i as f32 * 0.01).sin() * 0.4).collect();
    AudioAnalysis::new(samples, sr, 120.0, vec![0.25])
}

#[test]
fn default_opts_overwrite_with_entropy_seed() {
    let opts = DirectorOpts::default();
    assert_eq!(opts.seed, None);
    assert!(opts.overwrite);
    assert_eq!(VisualizationDirector::new(opts.clone()).opts(), &opts);
}

#[test]
fn strategy_selection_is_uniform() {
    let mut d = director(2024);
    let trials = 3_000;
    let mut counts = [0u32; 3];
    for _ in 0..trials {
        let k = d.select_strategy();
        let i = StrategyKind::ALL.iter().position(|s| *s == k).unwrap();
        counts[i] += 1;
    }
    let expected = f64::from(trials) / 3.0;
    let chi2 = counts
        .iter()
        .map(|&c| (f64::from(c) - expected).powi(2) / expected)
        .sum::<f64>();
    // 2 degrees of freedom, p = 0.001.
    assert!(chi2 < 13.8, "chi2 = {chi2}, counts = {counts:?}");
}

#[test]
fn same_seed_same_strategy_sequence() {
    let mut a = director(11);
    let mut b = director(11);
    let xs = (0..20).map(|_| a.select_strategy()).collect::<Vec<_>>();
    let ys = (0..20).map(|_| b.select_strategy()).collect::<Vec<_>>();
    assert_eq!(xs, ys);
}

#[test]
fn invalid_fps_is_input_error_before_sink() {
    let mut sink = InMemorySink::new();
    let err = director(1)
        .render_into(&analysis(0.25), MoodLabel::Joy, 0, None, &mut sink)
        .unwrap_err();
    assert!(matches!(err, VizError::Input(_)));
    assert!(sink.config().is_none());
}

#[test]
fn clip_shorter_than_one_frame_is_encoding_error() {
    let mut sink = InMemorySink::new();
    // 0.01 s at 24 fps rounds to zero frames.
    let err = director(1)
        .render_into(&analysis(0.01), MoodLabel::Joy, 24, None, &mut sink)
        .unwrap_err();
    assert!(matches!(err, VizError::Encoding(_)));
    assert_eq!(err.stage(), crate::foundation::error::Stage::Encode);
}

#[test]
fn seeded_renders_are_reproducible() {
    let a = analysis(0.25);
    let mut s1 = InMemorySink::new();
    let mut s2 = InMemorySink::new();
    let r1 = director(77)
        .render_into(&a, MoodLabel::Surprise, 24, None, &mut s1)
        .unwrap();
    let r2 = director(77)
        .render_into(&a, MoodLabel::Surprise, 24, None, &mut s2)
        .unwrap();
    assert_eq!(r1, r2);
    assert_eq!(r1.frames, 6);
    assert_eq!(s1.records(), s2.records());
}
