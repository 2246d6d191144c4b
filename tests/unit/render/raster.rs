use super::*;
use crate::foundation::core::Point;

fn close(a: [u8; 3], b: [u8; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

fn sprite(kind: ShapeKind, x: f64, y: f64, size: f64, radius: Option<f64>) -> ShapeSprite {
    ShapeSprite {
        kind,
        position: Point::new(x, y),
        radius,
        size,
        color: Rgb::new(1.0, 1.0, 1.0),
        alpha: 1.0,
    }
}

fn render(surface: &mut Surface, draw: impl FnOnce(&mut Surface)) -> Frame {
    let mut frame = Frame::new(surface.width(), surface.height());
    surface.begin();
    surface.fill_background(Rgb::new(0.0, 0.0, 0.0));
    draw(surface);
    surface.finish_into(&mut frame, 0, 0).unwrap();
    frame
}

#[test]
fn surface_rejects_bad_dimensions() {
    assert!(matches!(Surface::new(0, 10), Err(VizError::Render(_))));
    assert!(matches!(Surface::new(70_000, 10), Err(VizError::Render(_))));
}

#[test]
fn background_covers_everything() {
    let mut s = Surface::new(8, 4).unwrap();
    let mut frame = Frame::new(8, 4);
    s.begin();
    s.fill_background(Rgb::new(1.0, 0.0, 0.0));
    s.finish_into(&mut frame, 0, 0).unwrap();
    for y in 0..4 {
        for x in 0..8 {
            assert!(close(frame.pixel(x, y).unwrap(), [255, 0, 0]));
        }
    }
}

#[test]
fn bar_rises_from_bottom_edge() {
    let mut s = Surface::new(100, 100).unwrap();
    let frame = render(&mut s, |s| {
        s.draw_sprites(&[sprite(ShapeKind::Bar, 0.1, 0.9, 0.5, None)], 0.03);
    });
    assert!(close(frame.pixel(12, 80).unwrap(), [255, 255, 255]));
    assert!(close(frame.pixel(12, 20).unwrap(), [0, 0, 0]));
    assert!(close(frame.pixel(50, 80).unwrap(), [0, 0, 0]));
}

#[test]
fn circle_is_centered_on_position() {
    let mut s = Surface::new(100, 100).unwrap();
    let frame = render(&mut s, |s| {
        s.draw_sprites(&[sprite(ShapeKind::Circle, 0.5, 0.25, 1.0, Some(0.1))], 0.03);
    });
    // y = 0.25 maps to row 75.
    assert!(close(frame.pixel(50, 75).unwrap(), [255, 255, 255]));
    assert!(close(frame.pixel(50, 25).unwrap(), [0, 0, 0]));
    assert!(close(frame.pixel(5, 5).unwrap(), [0, 0, 0]));
}

#[test]
fn translucent_sprites_blend_with_background() {
    let mut s = Surface::new(20, 20).unwrap();
    let mut translucent = sprite(ShapeKind::Circle, 0.5, 0.5, 1.0, Some(0.4));
    translucent.alpha = 0.5;
    let frame = render(&mut s, |s| s.draw_sprites(&[translucent], 0.03));
    let px = frame.pixel(10, 10).unwrap();
    assert!(px[0] > 100 && px[0] < 155, "{px:?}");
}

#[test]
fn surfaces_composite_at_offsets() {
    let mut left = Surface::new(4, 2).unwrap();
    let mut right = Surface::new(4, 2).unwrap();
    let mut frame = Frame::new(8, 2);
    left.begin();
    left.fill_background(Rgb::new(1.0, 0.0, 0.0));
    left.finish_into(&mut frame, 0, 0).unwrap();
    right.begin();
    right.fill_background(Rgb::new(0.0, 0.0, 1.0));
    right.finish_into(&mut frame, 4, 0).unwrap();

    assert!(close(frame.pixel(3, 1).unwrap(), [255, 0, 0]));
    assert!(close(frame.pixel(4, 0).unwrap(), [0, 0, 255]));
    assert!(right.finish_into(&mut frame, 5, 0).is_err());
}

#[test]
fn image_paint_stretches_over_target() {
    let img = ImagePaint::from_rgb8(&[255, 0, 0, 0, 0, 255], 2, 1).unwrap();
    assert!(ImagePaint::from_rgb8(&[0; 5], 2, 1).is_err());

    let mut s = Surface::new(10, 10).unwrap();
    let frame = render(&mut s, |s| s.fill_image(&img, 0.0, 0.0, 10.0, 10.0));
    let l = frame.pixel(1, 5).unwrap();
    let r = frame.pixel(8, 5).unwrap();
    assert!(l[0] > 200 && l[2] < 50, "{l:?}");
    assert!(r[2] > 200 && r[0] < 50, "{r:?}");
}
