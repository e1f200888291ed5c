use euclid::default::Point2D;

use crate::{
    canvas::Canvas,
    color::Argb,
    paint::{Paint, PaintStyle},
    text::ParagraphLayout,
    typeface::GlyphBitmap,
};

/// Software canvas backed by a row-major ARGB pixel buffer.
///
/// Fill glyphs are blended from the face's coverage bitmaps. Stroke glyphs
/// dilate that coverage with a disc of radius `width / 2`, which matches a
/// round-joined outline centered on the contour.
pub struct CpuCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl CpuCanvas {
    /// Creates a transparent canvas.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width.saturating_mul(height);
        Self {
            width,
            height,
            pixels: vec![Argb::TRANSPARENT.0; len],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fills every pixel with `color`.
    pub fn clear(&mut self, color: Argb) {
        self.pixels.fill(color.0);
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Argb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Argb(self.pixels[y * self.width + x]))
    }

    /// Row-major packed ARGB pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixels as straight RGBA bytes, e.g. for an image encoder.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            let c = Argb(p);
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    fn blit(&mut self, bitmap: &GlyphBitmap, left: f32, top: f32, color: Argb) {
        let origin_x = left.floor() as isize;
        let origin_y = top.floor() as isize;

        for row in 0..bitmap.height {
            let iy = origin_y + row as isize;
            if iy < 0 || iy as usize >= self.height {
                continue;
            }
            for col in 0..bitmap.width {
                let coverage = bitmap.coverage[row * bitmap.width + col];
                if coverage == 0 {
                    continue;
                }
                let ix = origin_x + col as isize;
                if ix < 0 || ix as usize >= self.width {
                    continue;
                }
                let idx = iy as usize * self.width + ix as usize;
                self.pixels[idx] = blend_over(Argb(self.pixels[idx]), color, coverage).0;
            }
        }
    }
}

impl Canvas for CpuCanvas {
    fn draw_paragraph(&mut self, layout: &ParagraphLayout, origin: Point2D<f32>, paint: &Paint) {
        let Some(typeface) = paint.typeface.as_ref() else {
            log::warn!("Draw called with a paint that has no typeface.");
            return;
        };
        let face = typeface.face();
        let px = paint.text_size;

        for line in layout.lines() {
            for glyph in &line.glyphs {
                let Some(mut bitmap) = face.rasterize(glyph.glyph, px) else {
                    continue;
                };
                if let PaintStyle::Stroke { width, .. } = paint.style {
                    bitmap = dilate(&bitmap, width / 2.0);
                }

                // glyph bitmaps are anchored on the baseline with Y up
                let left = origin.x + line.offset_x + glyph.x + bitmap.xmin as f32;
                let top = origin.y + line.baseline - (bitmap.ymin as f32 + bitmap.height as f32);
                self.blit(&bitmap, left, top, paint.color);
            }
        }
    }
}

/// Grows coverage by `radius` pixels in every direction (disc kernel).
fn dilate(bitmap: &GlyphBitmap, radius: f32) -> GlyphBitmap {
    if radius <= 0.0 {
        return bitmap.clone();
    }
    let reach = radius.ceil() as usize;
    let r2 = radius * radius;
    let width = bitmap.width + 2 * reach;
    let height = bitmap.height + 2 * reach;
    let mut coverage = vec![0u8; width * height];

    for sy in 0..bitmap.height {
        for sx in 0..bitmap.width {
            let src = bitmap.coverage[sy * bitmap.width + sx];
            if src == 0 {
                continue;
            }
            for dy in 0..=2 * reach {
                let oy = dy as f32 - reach as f32;
                for dx in 0..=2 * reach {
                    let ox = dx as f32 - reach as f32;
                    if ox * ox + oy * oy > r2 {
                        continue;
                    }
                    let idx = (sy + dy) * width + (sx + dx);
                    coverage[idx] = coverage[idx].max(src);
                }
            }
        }
    }

    GlyphBitmap {
        width,
        height,
        xmin: bitmap.xmin - reach as i32,
        ymin: bitmap.ymin - reach as i32,
        coverage,
    }
}

/// Source-over compositing of `color` at `coverage` onto `dst`.
fn blend_over(dst: Argb, color: Argb, coverage: u8) -> Argb {
    let sa = color.alpha() as f32 / 255.0 * coverage as f32 / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.alpha() as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Argb::from_argb(
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        channel(color.red(), dst.red()),
        channel(color.green(), dst.green()),
        channel(color.blue(), dst.blue()),
    )
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{style::Alignment, test_support::mono_paint};

    fn block(size: usize) -> GlyphBitmap {
        GlyphBitmap {
            width: size,
            height: size,
            xmin: 0,
            ymin: 0,
            coverage: vec![255; size * size],
        }
    }

    #[test]
    fn test_dilate_grows_by_radius() {
        let grown = dilate(&block(2), 1.0);
        assert_eq!((grown.width, grown.height), (4, 4));
        assert_eq!((grown.xmin, grown.ymin), (-1, -1));
        // disc of radius 1 does not reach the diagonal corners
        assert_eq!(grown.coverage[0], 0);
        assert_eq!(grown.coverage[1], 255);
        assert_eq!(grown.coverage[5], 255);
    }

    #[test]
    fn test_dilate_zero_radius_is_identity() {
        assert_eq!(dilate(&block(3), 0.0), block(3));
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(Argb::TRANSPARENT, Argb::BLACK, 255), Argb::BLACK);
        assert_eq!(blend_over(Argb::WHITE, Argb::BLACK, 0), Argb::WHITE);
        let half = blend_over(Argb::WHITE, Argb::BLACK, 128);
        assert_eq!(half.alpha(), 255);
        assert!((half.red() as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_fill_over_stroke() {
        let mut fill = mono_paint(10.0);
        fill.color = Argb(0xFFFF_0000);
        let mut stroke = fill.clone();
        stroke.style = PaintStyle::round_stroke(4.0);
        stroke.color = Argb(0xFF00_00FF);

        let layout = ParagraphLayout::build("I", &fill, 20.0, Alignment::Start).unwrap();
        let stroke_layout = ParagraphLayout::build("I", &stroke, 20.0, Alignment::Start).unwrap();

        let mut canvas = CpuCanvas::new(20, 20);
        let origin = Point2D::new(4.0, 4.0);
        canvas.draw_paragraph(&stroke_layout, origin, &stroke);
        canvas.draw_paragraph(&layout, origin, &fill);

        // MonoFace glyph: 5x7 block sitting on the baseline at y = 4 + 8
        let inside = canvas.pixel(6, 8).unwrap();
        assert_eq!(inside, Argb(0xFFFF_0000));
        // just left of the glyph only the outline is painted
        let outline = canvas.pixel(3, 8).unwrap();
        assert_eq!(outline, Argb(0xFF00_00FF));
        assert_eq!(canvas.pixel(15, 8).unwrap(), Argb::TRANSPARENT);
    }

    #[test]
    fn test_rgba_export() {
        let mut canvas = CpuCanvas::new(1, 1);
        canvas.clear(Argb(0x8011_2233));
        assert_eq!(canvas.to_rgba8(), vec![0x11, 0x22, 0x33, 0x80]);
    }
}
