use std::sync::Arc;

use euclid::default::Size2D;

use crate::{
    color::Argb,
    config::StrokeTextConfig,
    error::LayoutError,
    measure::{self, Constraint, ParagraphMeasurer, ScaledMetrics},
    paint::Paint,
    props::{Prop, PropValue},
    style::{Alignment, Invalidation, TextStyleState},
    text::ParagraphLayout,
    typeface::{FontResolver, TypefaceCache},
};

/// Size estimate for the host's abstract layout pass.
///
/// Runs before any [`crate::StrokeTextRenderer`] exists and keeps its own
/// copy of the style. Line-limit overflow is clipped here, never ellipsized.
pub struct LayoutEstimator {
    style: TextStyleState,
    config: StrokeTextConfig,
    fonts: Arc<dyn FontResolver>,
    typefaces: TypefaceCache,
    paint: Paint,
}

impl LayoutEstimator {
    /// Creates an estimator with the default style.
    pub fn new(fonts: Arc<dyn FontResolver>, config: StrokeTextConfig) -> Self {
        Self {
            style: TextStyleState::with_default_family(config.default_font_family.clone()),
            config,
            fonts,
            typefaces: TypefaceCache::new(),
            paint: Paint::fill(Argb::BLACK),
        }
    }

    /// Current style inputs.
    pub fn style(&self) -> &TextStyleState {
        &self.style
    }

    /// Applies one property update.
    pub fn apply(&mut self, prop: Prop) -> Invalidation {
        self.style.apply(prop)
    }

    /// Applies a raw host property; malformed updates are logged and ignored.
    pub fn apply_raw(&mut self, name: &str, value: PropValue) -> Invalidation {
        Prop::from_raw_lossy(name, value).map_or(Invalidation::None, |prop| self.apply(prop))
    }

    /// Proposes a size for the current style under the given constraints.
    pub fn estimate(&mut self, width: Constraint, height: Constraint) -> Size2D<u32> {
        let metrics = ScaledMetrics::new(&self.style, &self.config);
        let prepared = self.prepare_paint(&metrics);

        let mut measurer = ClipMeasurer {
            content: &self.style.content,
            paint: &self.paint,
            max_lines: self.style.max_lines,
            ready: prepared.clone(),
        };
        let result = prepared.and_then(|()| {
            measure::measure(
                &self.style.content,
                &metrics,
                &self.config,
                width,
                height,
                &mut measurer,
            )
        });

        let size = match result {
            Ok(m) => m.size,
            Err(e) => {
                log::warn!("Estimate fell back to a minimal size: {e}");
                measure::fallback(
                    &self.style.content,
                    &metrics,
                    &self.config,
                    width,
                    height,
                    &mut measurer,
                )
                .size
            }
        };
        log::debug!(
            "estimate({width:?}, {height:?}) -> {}x{}",
            size.width,
            size.height
        );
        size
    }

    fn prepare_paint(&mut self, metrics: &ScaledMetrics) -> Result<(), LayoutError> {
        self.paint.text_size = metrics.font_size;
        if self.style.content.is_empty() {
            return Ok(());
        }
        let typeface = self
            .typefaces
            .get_or_resolve(&self.style.font_family, self.fonts.as_ref())
            .ok_or_else(|| LayoutError::TypefaceUnavailable(self.style.font_family.clone()))?;
        self.paint.typeface = Some(typeface);
        Ok(())
    }
}

/// Lays out the full content and clips its height at the line limit.
struct ClipMeasurer<'a> {
    content: &'a str,
    paint: &'a Paint,
    max_lines: u32,
    ready: Result<(), LayoutError>,
}

impl ParagraphMeasurer for ClipMeasurer<'_> {
    fn line_advance(&mut self, line: &str) -> Result<f32, LayoutError> {
        self.ready.clone()?;
        let typeface = self
            .paint
            .typeface
            .as_ref()
            .ok_or_else(|| LayoutError::TypefaceUnavailable(String::new()))?;
        Ok(typeface.measure_text(line, self.paint.text_size))
    }

    fn layout_at(&mut self, break_width: u32) -> Result<Size2D<f32>, LayoutError> {
        self.ready.clone()?;
        // alignment only moves lines inside the box, never changes its size
        let layout =
            ParagraphLayout::build(self.content, self.paint, break_width as f32, Alignment::Start)?;
        let max_lines = self.max_lines as usize;
        let height = if max_lines > 0 && layout.line_count() > max_lines {
            layout.line_top(max_lines)
        } else {
            layout.height()
        };
        Ok(Size2D::new(layout.width(), height))
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mono_fonts, no_fonts};

    fn estimator() -> LayoutEstimator {
        LayoutEstimator::new(mono_fonts(), StrokeTextConfig::default())
    }

    fn with_text(text: &str) -> LayoutEstimator {
        let mut e = estimator();
        e.apply(Prop::Text(Some(text.into())));
        e
    }

    #[test]
    fn test_short_text_unconstrained() {
        // "Hi" is 14px wide, below the 100px natural width minimum
        let mut e = with_text("Hi");
        let size = e.estimate(Constraint::unspecified(), Constraint::unspecified());
        assert_eq!(size, Size2D::new(102, 16));
    }

    #[test]
    fn test_empty_text_is_floor_for_any_constraint() {
        let mut e = estimator();
        for (w, h) in [
            (Constraint::unspecified(), Constraint::unspecified()),
            (Constraint::exact(300.0), Constraint::exact(300.0)),
            (Constraint::at_most(5.0), Constraint::at_most(5.0)),
        ] {
            assert_eq!(e.estimate(w, h), Size2D::new(30, 16));
        }
    }

    #[test]
    fn test_line_limit_clips_height() {
        let mut e = with_text("A\nB\nC");
        e.apply(Prop::NumberOfLines(Some(2)));
        let size = e.estimate(Constraint::exact(100.0), Constraint::unspecified());
        assert_eq!(size, Size2D::new(102, 30));

        e.apply(Prop::NumberOfLines(Some(0)));
        let size = e.estimate(Constraint::exact(100.0), Constraint::unspecified());
        assert_eq!(size, Size2D::new(102, 44));
    }

    #[test]
    fn test_wrapping_under_at_most() {
        // 217px on one line; at most 100 wraps after each long word
        let mut e = with_text("aaaaaaaaa bbbbbbbbb ccccccccc d");
        let size = e.estimate(Constraint::at_most(100.0), Constraint::unspecified());
        assert_eq!(size.width, 102);
        assert_eq!(size.height, 3 * 14 + 2);
    }

    #[test]
    fn test_stroke_width_grows_both_axes() {
        let mut e = with_text("Hello stroke");
        let thin = e.estimate(Constraint::unspecified(), Constraint::unspecified());
        e.apply(Prop::StrokeWidth(Some(3.0)));
        let thick = e.estimate(Constraint::unspecified(), Constraint::unspecified());
        assert!(thick.width > thin.width);
        assert!(thick.height > thin.height);
    }

    #[test]
    fn test_density_scales_lengths() {
        let config = StrokeTextConfig::default().with_density(2.0);
        let mut e = LayoutEstimator::new(mono_fonts(), config);
        e.apply(Prop::Text(Some("Hi".into())));
        // font 28px, stroke 2px: line 28 + padding 4
        let size = e.estimate(Constraint::unspecified(), Constraint::unspecified());
        assert_eq!(size, Size2D::new(104, 32));
    }

    #[test]
    fn test_missing_font_falls_back() {
        let mut e = LayoutEstimator::new(no_fonts(), StrokeTextConfig::default());
        e.apply(Prop::Text(Some("Hi".into())));
        let size = e.estimate(Constraint::unspecified(), Constraint::unspecified());
        assert_eq!(size, Size2D::new(100, 34));
    }

    #[test]
    fn test_raw_props() {
        let mut e = estimator();
        assert_eq!(e.apply_raw("text", "x".into()), Invalidation::Relayout);
        assert_eq!(e.apply_raw("text", PropValue::Int(3)), Invalidation::None);
        assert_eq!(e.apply_raw("bogus", PropValue::Null), Invalidation::None);
        assert_eq!(e.style().content, "x");
    }
}
