use crate::{color::Argb, typeface::Typeface};

/// How glyph outlines are painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke {
        /// Outline thickness in pixels, centered on the glyph contour.
        /// Joins and caps are round.
        width: f32,
    },
}

impl PaintStyle {
    /// The outline style used for the stroke layer.
    pub fn round_stroke(width: f32) -> Self {
        Self::Stroke { width }
    }

    /// Whether this style paints the outline layer.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Self::Stroke { .. })
    }
}

/// Text paint: typeface, size and how glyphs are colored.
///
/// The paint style influences shaping only through the typeface and size;
/// a fill and a stroke paint with the same typeface and size break text
/// into identical lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub style: PaintStyle,
    pub color: Argb,
    pub text_size: f32,
    pub typeface: Option<Typeface>,
}

impl Paint {
    /// Fill paint without a typeface or size yet.
    pub fn fill(color: Argb) -> Self {
        Self {
            style: PaintStyle::Fill,
            color,
            text_size: 0.0,
            typeface: None,
        }
    }

    /// Round-joined outline paint of `width` pixels.
    pub fn stroke(color: Argb, width: f32) -> Self {
        Self {
            style: PaintStyle::round_stroke(width),
            color,
            text_size: 0.0,
            typeface: None,
        }
    }

    /// Updates the outline width; no-op for a fill paint.
    pub fn set_stroke_width(&mut self, width: f32) {
        if let PaintStyle::Stroke { width: w, .. } = &mut self.style {
            *w = width;
        }
    }

    /// Outline width, `0.0` for a fill paint.
    pub fn stroke_width(&self) -> f32 {
        match self.style {
            PaintStyle::Fill => 0.0,
            PaintStyle::Stroke { width, .. } => width,
        }
    }
}
