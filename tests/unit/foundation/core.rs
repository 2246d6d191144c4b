use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    assert_eq!(Fps::integer(24).unwrap().as_f64(), 24.0);
}

#[test]
fn clip_frame_count_rounds_to_nearest() {
    let fps = Fps::integer(24).unwrap();
    assert_eq!(ClipTiming::new(2.0, fps).unwrap().frame_count(), 48);
    // 1.02s * 24 = 24.48 -> 24
    assert_eq!(ClipTiming::new(1.02, fps).unwrap().frame_count(), 24);
    // 1.03s * 24 = 24.72 -> 25
    assert_eq!(ClipTiming::new(1.03, fps).unwrap().frame_count(), 25);
    assert_eq!(ClipTiming::new(0.0, fps).unwrap().frame_count(), 0);
}

#[test]
fn clip_rejects_non_finite_duration() {
    let fps = Fps::integer(30).unwrap();
    assert!(ClipTiming::new(f64::NAN, fps).is_err());
    assert!(ClipTiming::new(-1.0, fps).is_err());
}

#[test]
fn time_at_is_index_over_fps() {
    let timing = ClipTiming::new(2.0, Fps::new(30000, 1001).unwrap()).unwrap();
    let t = timing.time_at(FrameIndex(30));
    assert!((t - 30.0 * 1001.0 / 30000.0).abs() < 1e-12);
}

#[test]
fn rgb_hex_and_lerp() {
    let gold = Rgb::hex(0xFFD700);
    assert_eq!(gold.to_rgba8(1.0), [255, 215, 0, 255]);

    let mid = Rgb::new(0.0, 0.0, 0.0).lerp(Rgb::new(1.0, 1.0, 1.0), 0.5);
    assert!((mid.r - 0.5).abs() < 1e-12);

    // t outside 0..=1 is clamped.
    let end = Rgb::new(0.0, 0.0, 0.0).lerp(Rgb::new(1.0, 0.5, 0.25), 3.0);
    assert_eq!(end, Rgb::new(1.0, 0.5, 0.25));

    assert_eq!(Rgb::new(2.0, -1.0, 0.5).to_rgba8(0.5), [255, 0, 128, 128]);
}
