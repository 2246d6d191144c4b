use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
}

#[test]
fn unit_waves_stay_in_unit_range() {
    for i in 0..1000 {
        let x = f64::from(i) * 0.037 - 10.0;
        assert!((0.0..=1.0).contains(&unit_sin(x)));
        assert!((0.0..=1.0).contains(&unit_cos(x)));
    }
    assert!((unit_sin(0.0) - 0.5).abs() < 1e-12);
    assert!((unit_cos(0.0) - 1.0).abs() < 1e-12);
}
