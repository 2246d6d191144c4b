use super::*;
use crate::foundation::core::FRAME_CANVAS;

fn analysis(secs: f64) -> AudioAnalysis {
    let sr = 22_050;
    let n = (secs * f64::from(sr)) as usize;
    let samples = (0..n)
        .map(|i| (i as f32 * 0.02).sin() * (0.2 + 0.6 * (i as f32 / n as f32)))
        .collect();
    AudioAnalysis::new(samples, sr, 120.0, vec![0.5, 1.0, 1.5])
}

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[test]
fn names_parse_case_insensitively() {
    for k in StrategyKind::ALL {
        assert_eq!(k.to_string().parse::<StrategyKind>().unwrap(), k);
    }
    assert_eq!(
        " Spectral ".parse::<StrategyKind>().unwrap(),
        StrategyKind::Spectral
    );
    assert!(matches!(
        "plasma".parse::<StrategyKind>(),
        Err(VizError::Input(_))
    ));
}

#[test]
fn empty_analysis_is_rejected_before_rendering() {
    let empty = AudioAnalysis::new(Vec::new(), 22_050, 0.0, Vec::new());
    for k in StrategyKind::ALL {
        let res = renderer_for(k, &empty, MoodLabel::Joy, &mut seeded(1));
        assert!(matches!(res, Err(VizError::Input(_))));
    }
}

#[test]
fn every_strategy_renders_fixed_size_frames_through_the_clip_end() {
    let a = analysis(1.0);
    for k in StrategyKind::ALL {
        let mut r = renderer_for(k, &a, MoodLabel::Joy, &mut seeded(2)).unwrap();
        assert_eq!(r.strategy(), k);
        // The last frame time and a time past the buffer both clamp to the final sample.
        for t in [0.0, 0.5, 1.0 - 1.0 / 24.0, 1.0, 3.0] {
            let f = r.render(t).unwrap();
            assert_eq!((f.width(), f.height()), (FRAME_CANVAS.width, FRAME_CANVAS.height));
            assert_eq!(f.data().len(), 1600 * 900 * 3);
        }
    }
}

#[test]
fn invalid_time_is_index_error() {
    let a = analysis(0.5);
    for k in StrategyKind::ALL {
        let mut r = renderer_for(k, &a, MoodLabel::Neutral, &mut seeded(3)).unwrap();
        assert!(matches!(r.render(f64::NAN), Err(VizError::Index(_))));
        assert!(matches!(r.render(-0.5), Err(VizError::Index(_))));
    }
}

#[test]
fn same_seed_renders_identical_frames() {
    let a = analysis(0.5);
    for k in StrategyKind::ALL {
        let mut x = renderer_for(k, &a, MoodLabel::Anger, &mut seeded(9)).unwrap();
        let mut y = renderer_for(k, &a, MoodLabel::Anger, &mut seeded(9)).unwrap();
        for i in 0..3 {
            let t = f64::from(i) / 24.0;
            assert_eq!(x.render(t).unwrap(), y.render(t).unwrap(), "{k}");
        }
    }
}

#[test]
fn frames_change_over_time() {
    let a = analysis(1.0);
    for k in StrategyKind::ALL {
        let mut r = renderer_for(k, &a, MoodLabel::Surprise, &mut seeded(4)).unwrap();
        let first = r.render(0.0).unwrap();
        let later = r.render(0.75).unwrap();
        assert_ne!(first, later, "{k}");
    }
}

#[test]
fn mood_changes_the_picture() {
    let a = analysis(0.5);
    for k in StrategyKind::ALL {
        let joy = renderer_for(k, &a, MoodLabel::Joy, &mut seeded(5))
            .unwrap()
            .render(0.25)
            .unwrap();
        let fear = renderer_for(k, &a, MoodLabel::Fear, &mut seeded(5))
            .unwrap()
            .render(0.25)
            .unwrap();
        assert_ne!(joy, fear, "{k}");
    }
}

#[test]
fn spectral_underlay_fills_from_the_left() {
    let a = analysis(2.0);
    let mut r = renderer_for(StrategyKind::Spectral, &a, MoodLabel::Neutral, &mut seeded(6)).unwrap();
    let at_start = r.render(0.0).unwrap();
    let midway = r.render(1.0).unwrap();
    // Bottom-left corner: flat background at t = 0, spectrogram once revealed.
    assert_ne!(at_start.pixel(2, 897), midway.pixel(2, 897));
    // Far right stays background halfway through (sampled on rows a circle cannot span).
    let expected = crate::render::spectral::amplitude_background(
        f64::from(a.amplitude_at(1.0).unwrap()),
        crate::mood::palette::MoodPalette::lookup(
            MoodLabel::Neutral,
            crate::mood::palette::SchemeLayout::Single,
        )
        .pair(0),
    )
    .to_rgba8(1.0);
    let matching = [2, 220, 440, 660, 880]
        .into_iter()
        .filter(|&y| {
            let px = midway.pixel(1598, y).unwrap();
            (0..3).all(|c| px[c].abs_diff(expected[c]) <= 2)
        })
        .count();
    assert!(matching >= 3, "only {matching} background rows");
}
