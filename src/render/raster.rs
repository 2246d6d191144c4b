use crate::foundation::core::Rgb;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::mul_div255_u8;
use crate::particles::{ShapeKind, ShapeSprite};
use crate::render::frame::Frame;
use std::sync::Arc;
use vello_cpu::kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _};

/// Bar width in unit coordinates.
const BAR_WIDTH: f64 = 0.05;
/// Horizontal run of a line segment in unit coordinates.
const LINE_RUN: f64 = 0.1;
/// Line thickness in pixels.
const LINE_WIDTH_PX: f64 = 2.8;
/// Half the base of a triangle in unit coordinates.
const TRIANGLE_HALF_BASE: f64 = 0.05;

/// Image paint plus its pixel size.
#[derive(Clone)]
pub(crate) struct ImagePaint {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl ImagePaint {
    /// Build an opaque image paint from tightly packed RGB8 rows.
    pub(crate) fn from_rgb8(rgb: &[u8], width: u32, height: u32) -> VizResult<Self> {
        let (w, h) = dims_u16(width, height)?;
        if rgb.len() != width as usize * height as usize * 3 {
            return Err(VizError::render("image paint byte length mismatch"));
        }
        let pixels = rgb
            .chunks_exact(3)
            .map(|px| vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: 255,
            })
            .collect::<Vec<_>>();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, false);
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        })
    }
}

/// Reusable CPU raster target for one region of a frame.
///
/// Drawing uses unit coordinates: `(0, 0)` is the bottom-left corner and `(1, 1)` the top-right.
pub(crate) struct Surface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    width: u16,
    height: u16,
}

impl Surface {
    pub(crate) fn new(width: u32, height: u32) -> VizResult<Self> {
        let (w, h) = dims_u16(width, height)?;
        if w == 0 || h == 0 {
            return Err(VizError::render("surface dimensions must be non-zero"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            width: w,
            height: h,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub(crate) fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Start a new picture.
    pub(crate) fn begin(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.ctx.set_paint_transform(Affine::IDENTITY);
    }

    /// Cover the whole surface with an opaque color.
    pub(crate) fn fill_background(&mut self, color: Rgb) {
        self.ctx.set_transform(Affine::IDENTITY);
        self.set_color(color, 1.0);
        self.ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    /// Stretch `image` over the pixel rectangle `[x0, x1) × [y0, y1)` (y down).
    pub(crate) fn fill_image(&mut self, image: &ImagePaint, x0: f64, y0: f64, x1: f64, y1: f64) {
        if image.width == 0 || image.height == 0 || x1 <= x0 || y1 <= y0 {
            return;
        }
        let sx = (x1 - x0) / f64::from(image.width);
        let sy = (y1 - y0) / f64::from(image.height);
        self.ctx.set_transform(
            Affine::translate((x0, y0)) * Affine::scale_non_uniform(sx, sy),
        );
        self.ctx.set_paint(image.paint.clone());
        self.ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
    }

    /// Draw every sprite in order. Circles without a spawn radius use `default_radius`.
    pub(crate) fn draw_sprites(&mut self, sprites: &[ShapeSprite], default_radius: f64) {
        self.ctx.set_transform(Affine::IDENTITY);
        for sprite in sprites {
            self.set_color(sprite.color, sprite.alpha);
            let path = self.sprite_path(sprite, default_radius);
            self.ctx.fill_path(&path);
        }
    }

    fn sprite_path(&self, sprite: &ShapeSprite, default_radius: f64) -> BezPath {
        let (x, y) = (sprite.position.x, sprite.position.y);
        let size = sprite.size.max(0.0);
        match sprite.kind {
            ShapeKind::Circle => {
                let r_px = sprite.radius.unwrap_or(default_radius) * f64::from(self.height)
                    * size.sqrt();
                let circle = Circle::new(self.to_px(x, y), r_px);
                let mut p = BezPath::new();
                for el in circle.path_elements(0.1) {
                    p.push(el);
                }
                p
            }
            ShapeKind::Bar => self.polygon(&[
                (x, 0.0),
                (x + BAR_WIDTH, 0.0),
                (x + BAR_WIDTH, size),
                (x, size),
            ]),
            ShapeKind::Line => {
                let a = self.to_px(x, y);
                let b = self.to_px(x + LINE_RUN, y + size);
                let (dx, dy) = (b.x - a.x, b.y - a.y);
                let len = dx.hypot(dy).max(1e-9);
                let (nx, ny) = (
                    -dy / len * LINE_WIDTH_PX / 2.0,
                    dx / len * LINE_WIDTH_PX / 2.0,
                );
                let mut p = BezPath::new();
                p.move_to((a.x + nx, a.y + ny));
                p.line_to((b.x + nx, b.y + ny));
                p.line_to((b.x - nx, b.y - ny));
                p.line_to((a.x - nx, a.y - ny));
                p.close_path();
                p
            }
            ShapeKind::Triangle => self.polygon(&[
                (x, y),
                (x + TRIANGLE_HALF_BASE, y + size),
                (x - TRIANGLE_HALF_BASE, y + size),
            ]),
        }
    }

    fn polygon(&self, unit_points: &[(f64, f64)]) -> BezPath {
        let mut p = BezPath::new();
        for (i, &(ux, uy)) in unit_points.iter().enumerate() {
            let pt = self.to_px(ux, uy);
            if i == 0 {
                p.move_to(pt);
            } else {
                p.line_to(pt);
            }
        }
        p.close_path();
        p
    }

    fn to_px(&self, ux: f64, uy: f64) -> Point {
        Point::new(
            ux * f64::from(self.width),
            (1.0 - uy) * f64::from(self.height),
        )
    }

    fn set_color(&mut self, color: Rgb, alpha: f64) {
        let [r, g, b, a] = color.to_rgba8(alpha);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    }

    /// Rasterize the picture and composite it over `frame` with its top-left corner at `(x0, y0)`.
    pub(crate) fn finish_into(&mut self, frame: &mut Frame, x0: u32, y0: u32) -> VizResult<()> {
        if x0 + self.width() > frame.width() || y0 + self.height() > frame.height() {
            return Err(VizError::render(format!(
                "surface {}x{} at ({x0}, {y0}) does not fit a {}x{} frame",
                self.width,
                self.height,
                frame.width(),
                frame.height()
            )));
        }
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        let frame_w = frame.width() as usize;
        let src_w = usize::from(self.width);
        let src = self.pixmap.data_as_u8_slice();
        let dst = frame.data_mut();
        for row in 0..usize::from(self.height) {
            let src_row = &src[row * src_w * 4..(row + 1) * src_w * 4];
            let dst_start = ((y0 as usize + row) * frame_w + x0 as usize) * 3;
            let dst_row = &mut dst[dst_start..dst_start + src_w * 3];
            for (s, d) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(3)) {
                let inv = 255 - u16::from(s[3]);
                for c in 0..3 {
                    d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
                }
            }
        }
        Ok(())
    }
}

fn dims_u16(width: u32, height: u32) -> VizResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VizError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VizError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
