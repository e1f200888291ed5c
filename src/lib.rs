//! # stroke-text
//!
//! Outlined text views: a fill glyph layer painted over a stroke glyph layer.
//!
//! ## Overview
//!
//! The crate provides two components built on one measurement algorithm:
//!
//! *   [`LayoutEstimator`] answers the host's abstract layout pass, before a
//!     real view exists.
//! *   [`StrokeTextRenderer`] is the on-screen component. It answers the native
//!     measurement query, keeps its layouts cached per break width and paints
//!     stroke-then-fill through a [`canvas::Canvas`].
//!
//! Both reserve room for the outline around the glyphs and report identical
//! sizes for identical styles. Fonts come from a [`FontSystem`], which loads
//! them through `fontdb` and rasterizes them with `fontdue`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stroke_text::{
//!     CpuCanvas, FontSystem, StrokeTextConfig, StrokeTextRenderer,
//!     measure::Constraint, props::Prop,
//! };
//!
//! // 1. Load fonts
//! let fonts = FontSystem::with_system_fonts();
//!
//! // 2. Create the component and feed it properties
//! let mut renderer = StrokeTextRenderer::new(fonts, StrokeTextConfig::default());
//! renderer.apply(Prop::Text(Some("Hello".into())));
//! renderer.apply(Prop::StrokeWidth(Some(3.0)));
//!
//! // 3. Measure, then draw at the assigned size
//! let size = renderer.measure(Constraint::unspecified(), Constraint::unspecified());
//! let mut canvas = CpuCanvas::new(size.width as usize, size.height as usize);
//! renderer.draw(&mut canvas, size);
//! ```
//!
//! ## Features
//!
//! *   **Stroke-aware sizing**: outline padding on both axes, a minimum size floor.
//! *   **Line limits**: clipped in the estimate, optionally ellipsized on screen.
//! *   **Silent recovery**: font or layout failures degrade to a fallback size.
//! *   **Font Management**: system fonts, font files and generic family fallback.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod estimator;
pub mod font_storage;
pub mod font_system;
pub mod measure;
pub mod paint;
pub mod props;
pub mod renderer;
pub mod style;
pub mod text;
pub mod typeface;

// common re-exports
pub use canvas::{Canvas, CpuCanvas};
pub use color::{Argb, parse_color};
pub use config::StrokeTextConfig;
pub use estimator::LayoutEstimator;
pub use font_storage::FontStorage;
pub use font_system::FontSystem;
pub use renderer::{DrawOutcome, StrokeTextRenderer};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;

#[cfg(test)]
pub(crate) mod test_support {
    //! Deterministic fonts, resolvers and canvases for unit tests.

    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use euclid::default::Point2D;

    use crate::{
        canvas::Canvas,
        color::Argb,
        paint::Paint,
        text::ParagraphLayout,
        typeface::{FontFace, FontResolver, GlyphBitmap, LineMetrics, Typeface},
    };

    /// Every glyph advances `px / 2`; ascent `0.8 px`, descent `0.2 px`, so
    /// a line is exactly `px` tall. Glyphs rasterize to solid blocks.
    #[derive(Default)]
    pub struct MonoFace;

    impl FontFace for MonoFace {
        fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
            Some(LineMetrics {
                ascent: 0.8 * px,
                descent: -0.2 * px,
                line_gap: 0.0,
            })
        }

        fn glyph_index(&self, ch: char) -> u16 {
            ch as u16
        }

        fn advance(&self, _glyph: u16, px: f32) -> f32 {
            px / 2.0
        }

        fn rasterize(&self, glyph: u16, px: f32) -> Option<GlyphBitmap> {
            if char::from_u32(glyph as u32).is_none_or(char::is_whitespace) {
                return None;
            }
            let width = (px / 2.0).ceil() as usize;
            let height = (px * 0.7).ceil() as usize;
            Some(GlyphBitmap {
                width,
                height,
                xmin: 0,
                ymin: 0,
                coverage: vec![255; width * height],
            })
        }
    }

    /// Advances like [`MonoFace`] but has no vertical metrics.
    struct NoMetricsFace;

    impl FontFace for NoMetricsFace {
        fn line_metrics(&self, _px: f32) -> Option<LineMetrics> {
            None
        }

        fn glyph_index(&self, ch: char) -> u16 {
            ch as u16
        }

        fn advance(&self, _glyph: u16, px: f32) -> f32 {
            px / 2.0
        }
    }

    pub fn mono_typeface() -> Typeface {
        Typeface::new("mono", Arc::new(MonoFace))
    }

    pub fn mono_paint(px: f32) -> Paint {
        let mut paint = Paint::fill(Argb::BLACK);
        paint.text_size = px;
        paint.typeface = Some(mono_typeface());
        paint
    }

    pub fn no_metrics_paint(px: f32) -> Paint {
        let mut paint = Paint::fill(Argb::BLACK);
        paint.text_size = px;
        paint.typeface = Some(Typeface::new("broken", Arc::new(NoMetricsFace)));
        paint
    }

    /// Resolves the listed families to one shared [`MonoFace`] and counts lookups.
    pub struct CountingResolver {
        families: Vec<String>,
        face: Arc<dyn FontFace>,
        calls: AtomicUsize,
    }

    impl CountingResolver {
        pub fn new(families: &[&str]) -> Self {
            Self {
                families: families.iter().map(|f| f.to_string()).collect(),
                face: Arc::new(MonoFace),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl FontResolver for CountingResolver {
        fn resolve(&self, family: &str) -> Option<Typeface> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.families
                .iter()
                .any(|f| f == family)
                .then(|| Typeface::new(family, self.face.clone()))
        }
    }

    /// Resolves any family to [`MonoFace`] while available; starts unavailable.
    #[derive(Default)]
    pub struct ToggleResolver {
        available: AtomicBool,
    }

    impl ToggleResolver {
        pub fn set_available(&self, available: bool) {
            self.available.store(available, Ordering::Relaxed);
        }
    }

    impl FontResolver for ToggleResolver {
        fn resolve(&self, family: &str) -> Option<Typeface> {
            self.available
                .load(Ordering::Relaxed)
                .then(|| Typeface::new(family, Arc::new(MonoFace)))
        }
    }

    pub fn mono_fonts() -> Arc<dyn FontResolver> {
        let fonts = ToggleResolver::default();
        fonts.set_available(true);
        Arc::new(fonts)
    }

    pub fn no_fonts() -> Arc<dyn FontResolver> {
        Arc::new(ToggleResolver::default())
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct DrawCall {
        pub stroke: bool,
        pub stroke_width: f32,
        pub origin: Point2D<f32>,
        pub text: String,
        pub lines: usize,
        pub color: Argb,
    }

    #[derive(Default)]
    pub struct RecordingCanvas {
        pub calls: Vec<DrawCall>,
    }

    impl Canvas for RecordingCanvas {
        fn draw_paragraph(&mut self, layout: &ParagraphLayout, origin: Point2D<f32>, paint: &Paint) {
            self.calls.push(DrawCall {
                stroke: paint.style.is_stroke(),
                stroke_width: paint.stroke_width(),
                origin,
                text: layout.text().to_string(),
                lines: layout.line_count(),
                color: paint.color,
            });
        }
    }
}
