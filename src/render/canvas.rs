//! Drawing surface for one ticket render.
//!
//! A [`Canvas`] wraps an RGBA buffer of fixed dimensions and offers the
//! handful of operations the compositor needs: stretched backgrounds,
//! alpha overlays, baseline-anchored text, a rotated caption, and the
//! subscriber badge circle. Each canvas is owned by exactly one ticket
//! pipeline and dropped once its PNG stream is written out.

use ab_glyph::{Font, FontArc, ScaleFont, point};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage, imageops};

use crate::error::BoletoError;
use crate::render::font;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Horizontal anchoring for text draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge of the text.
    Left,
    /// `x` is the center of the text.
    Center,
}

/// Fixed-size RGBA surface.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// New surface initialized to opaque white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, WHITE),
        }
    }

    fn transparent(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    /// Stretch `src` over the whole surface, ignoring its aspect ratio.
    pub fn draw_stretched(&mut self, src: &DynamicImage) {
        let resized = src
            .resize_exact(self.img.width(), self.img.height(), imageops::FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(&mut self.img, &resized, 0, 0);
    }

    /// Alpha-blend `src` onto the surface with its top-left at (x, y).
    pub fn overlay(&mut self, src: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.img, src, x, y);
    }

    /// Draw one line of text with its baseline at `baseline_y`.
    ///
    /// Returns the advance-sum width of the drawn text.
    pub fn draw_text(
        &mut self,
        font: &FontArc,
        px: f32,
        color: Rgba<u8>,
        align: Align,
        x: f32,
        baseline_y: f32,
        text: &str,
    ) -> f32 {
        let scaled = font.as_scaled(px);
        let width = font::line_width(font, px, text);
        let mut caret = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
        };

        for ch in text.chars() {
            let glyph_id = font.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(px, point(caret, baseline_y));
            caret += scaled.h_advance(glyph_id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px_x = gx as i32 + bounds.min.x as i32;
                    let px_y = gy as i32 + bounds.min.y as i32;
                    self.blend_pixel(px_x, px_y, color, coverage);
                });
            }
        }

        width
    }

    /// Draw text rotated 90° counter-clockwise (reading bottom-to-top),
    /// centered on (cx, cy).
    pub fn draw_text_rotated_ccw(
        &mut self,
        font: &FontArc,
        px: f32,
        color: Rgba<u8>,
        cx: f32,
        cy: f32,
        text: &str,
    ) {
        let metrics = font::LineMetrics::of(font, px);
        let width = font::line_width(font, px, text).ceil().max(1.0) as u32;
        let height = metrics.line_height().ceil().max(1.0) as u32;

        // Rasterize onto a transparent strip, then rotate the strip.
        let mut strip = Canvas::transparent(width, height);
        strip.draw_text(font, px, color, Align::Left, 0.0, metrics.ascent, text);
        let rotated = imageops::rotate270(&strip.img);

        let x = (cx - rotated.width() as f32 / 2.0).round() as i64;
        let y = (cy - rotated.height() as f32 / 2.0).round() as i64;
        self.overlay(&rotated, x, y);
    }

    /// Fill a circle of radius `r` centered on (cx, cy).
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
        self.paint_ring(cx, cy, 0.0, r, color);
    }

    /// Stroke a circle outline of the given line width.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, line_width: f32, color: Rgba<u8>) {
        self.paint_ring(cx, cy, r - line_width / 2.0, r + line_width / 2.0, color);
    }

    fn paint_ring(&mut self, cx: f32, cy: f32, inner: f32, outer: f32, color: Rgba<u8>) {
        let x0 = (cx - outer).floor().max(0.0) as u32;
        let y0 = (cy - outer).floor().max(0.0) as u32;
        let x1 = ((cx + outer).ceil() as u32).min(self.img.width().saturating_sub(1));
        let y1 = ((cy + outer).ceil() as u32).min(self.img.height().saturating_sub(1));

        for y in y0..=y1 {
            for x in x0..=x1 {
                // Sample at pixel centers.
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= inner && dist <= outer {
                    self.img.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Source-over blend of `color` at the given coverage.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
        if coverage <= 0.0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }

        let sa = coverage.clamp(0.0, 1.0);
        let dst = self.img.get_pixel_mut(x, y);
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for i in 0..3 {
            let s = color.0[i] as f32;
            let d = dst.0[i] as f32;
            dst.0[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
        }
        dst.0[3] = (out_a * 255.0).round() as u8;
    }

    /// Encode the surface as a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>, BoletoError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                self.img.as_raw(),
                self.img.width(),
                self.img.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BoletoError::Image(format!("PNG encode failed: {e}")))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_opaque_white() {
        let canvas = Canvas::new(10, 10);
        assert_eq!(*canvas.image().get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.image().get_pixel(9, 9), WHITE);
    }

    #[test]
    fn test_fill_circle_covers_center() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_circle(20.0, 20.0, 10.0, BLACK);
        assert_eq!(*canvas.image().get_pixel(20, 20), BLACK);
        // Well outside the radius stays white.
        assert_eq!(*canvas.image().get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_stroke_circle_leaves_center_untouched() {
        let mut canvas = Canvas::new(40, 40);
        canvas.stroke_circle(20.0, 20.0, 10.0, 1.0, BLACK);
        assert_eq!(*canvas.image().get_pixel(20, 20), WHITE);
        // A point on the ring is painted.
        assert_eq!(*canvas.image().get_pixel(29, 20), BLACK);
    }

    #[test]
    fn test_overlay_clips_at_borders() {
        let mut canvas = Canvas::new(10, 10);
        let patch = RgbaImage::from_pixel(4, 4, BLACK);
        canvas.overlay(&patch, -2, -2);
        canvas.overlay(&patch, 8, 8);
        assert_eq!(*canvas.image().get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.image().get_pixel(9, 9), BLACK);
        assert_eq!(*canvas.image().get_pixel(5, 5), WHITE);
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let canvas = Canvas::new(16, 8);
        let bytes = canvas.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 8);
    }
}
