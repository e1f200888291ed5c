use std::sync::Arc;

use euclid::default::{Point2D, Size2D};

use crate::{
    canvas::Canvas,
    color::Argb,
    config::StrokeTextConfig,
    error::LayoutError,
    measure::{self, Constraint, ParagraphMeasurer, ScaledMetrics},
    paint::Paint,
    props::{Prop, PropValue},
    style::{Alignment, Invalidation, TextStyleState},
    text::{ParagraphLayout, truncate_run},
    typeface::{FontResolver, TypefaceCache},
};

/// Fill and stroke layouts of one run, built at the same break width.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidText {
    /// The run both layouts were built from, truncated at the line limit.
    pub run: String,
    pub fill: ParagraphLayout,
    pub stroke: ParagraphLayout,
}

impl LaidText {
    /// Unpadded paragraph size, height clipped at `max_lines`.
    pub fn size(&self, max_lines: u32) -> Size2D<f32> {
        let max_lines = max_lines as usize;
        let height = if max_lines > 0 && self.fill.line_count() > max_lines {
            self.fill.line_top(max_lines)
        } else {
            self.fill.height()
        };
        Size2D::new(self.fill.width(), height)
    }
}

/// Result of the last layout build.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutOutcome {
    /// Content is empty; there is nothing to draw.
    Empty,
    Laid(LaidText),
    /// Layout failed; the size reported in its place.
    Fallback { width: u32, height: u32 },
}

/// Derived layouts keyed by the style revision and the width they were built at.
#[derive(Clone, Debug)]
pub struct LayoutCache {
    outcome: LayoutOutcome,
    built_width: Option<u32>,
    dirty: bool,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self {
            outcome: LayoutOutcome::Empty,
            built_width: None,
            dirty: true,
        }
    }
}

impl LayoutCache {
    /// Whether a request at `width` must rebuild the layouts.
    pub fn needs_rebuild(&self, width: u32) -> bool {
        self.dirty || self.built_width != Some(width)
    }

    /// Marks the cached layouts stale after a style change.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Replaces the cached outcome. A fallback stays dirty so the next
    /// request retries the layout.
    pub fn store(&mut self, outcome: LayoutOutcome, width: u32) {
        self.dirty = matches!(outcome, LayoutOutcome::Fallback { .. });
        self.outcome = outcome;
        self.built_width = Some(width);
    }

    /// The cached outcome, possibly stale.
    pub fn outcome(&self) -> &LayoutOutcome {
        &self.outcome
    }

    /// Width the cached outcome was built at.
    pub fn built_width(&self) -> Option<u32> {
        self.built_width
    }

    /// Whether the style changed since the last successful build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// What a [`StrokeTextRenderer::draw`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOutcome {
    /// Both layers were painted at `origin`.
    Drawn { origin: Point2D<f32> },
    /// Content is empty.
    NothingToDraw,
    /// Bounds had a zero dimension; the host should lay the view out again.
    RelayoutRequested,
    /// Layout failed; retried on the next measure or draw.
    LayoutUnavailable,
}

/// The on-screen stroke text component.
///
/// Answers the native measurement query with the same algorithm as
/// [`crate::LayoutEstimator`], then paints the stroke layout and the fill
/// layout on top of it. When `ellipsis` is set, a run longer than the line
/// limit is shortened and ends in the configured ellipsis.
pub struct StrokeTextRenderer {
    style: TextStyleState,
    config: StrokeTextConfig,
    fonts: Arc<dyn FontResolver>,
    typefaces: TypefaceCache,
    fill_paint: Paint,
    stroke_paint: Paint,
    cache: LayoutCache,
    measured: Option<Size2D<u32>>,
    bounds: Size2D<u32>,
}

impl StrokeTextRenderer {
    /// Creates a renderer with the default style.
    pub fn new(fonts: Arc<dyn FontResolver>, config: StrokeTextConfig) -> Self {
        let style = TextStyleState::with_default_family(config.default_font_family.clone());
        let fill_paint = Paint::fill(style.fill_color);
        let stroke_paint = Paint::stroke(style.stroke_color, 0.0);
        Self {
            style,
            config,
            fonts,
            typefaces: TypefaceCache::new(),
            fill_paint,
            stroke_paint,
            cache: LayoutCache::default(),
            measured: None,
            bounds: Size2D::zero(),
        }
    }

    /// Current style inputs.
    pub fn style(&self) -> &TextStyleState {
        &self.style
    }

    /// The layout cache, for inspecting rebuild state.
    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Current layouts, if the last build succeeded with non-empty content.
    pub fn layouts(&self) -> Option<&LaidText> {
        match self.cache.outcome() {
            LayoutOutcome::Laid(laid) => Some(laid),
            _ => None,
        }
    }

    /// Size returned by the last [`Self::measure`].
    pub fn measured_size(&self) -> Option<Size2D<u32>> {
        self.measured
    }

    /// Last bounds assigned by the host.
    pub fn bounds(&self) -> Size2D<u32> {
        self.bounds
    }

    /// Color of the fill layer.
    pub fn fill_color(&self) -> Argb {
        self.fill_paint.color
    }

    /// Color of the stroke layer.
    pub fn stroke_color(&self) -> Argb {
        self.stroke_paint.color
    }

    /// Applies one property update and invalidates what it affects.
    pub fn apply(&mut self, prop: Prop) -> Invalidation {
        let invalidation = self.style.apply(prop);
        match invalidation {
            Invalidation::Relayout => self.cache.invalidate(),
            Invalidation::Repaint => {
                self.fill_paint.color = self.style.fill_color;
                self.stroke_paint.color = self.style.stroke_color;
            }
            Invalidation::None => {}
        }
        invalidation
    }

    /// Applies a raw host property; malformed updates are logged and ignored.
    pub fn apply_raw(&mut self, name: &str, value: PropValue) -> Invalidation {
        Prop::from_raw_lossy(name, value).map_or(Invalidation::None, |prop| self.apply(prop))
    }

    /// Native measurement pass. Reuses layouts cached at the same break width.
    pub fn measure(&mut self, width: Constraint, height: Constraint) -> Size2D<u32> {
        let metrics = ScaledMetrics::new(&self.style, &self.config);
        let prepared = self.prepare_paints(&metrics);

        let mut measurer = RenderMeasurer {
            style: &self.style,
            config: &self.config,
            fill: &self.fill_paint,
            stroke: &self.stroke_paint,
            cache: &mut self.cache,
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
                log::warn!("Measure fell back to a minimal size: {e}");
                let fallback = measure::fallback(
                    &self.style.content,
                    &metrics,
                    &self.config,
                    width,
                    height,
                    &mut measurer,
                );
                self.cache.store(
                    LayoutOutcome::Fallback {
                        width: fallback.size.width,
                        height: fallback.size.height,
                    },
                    fallback.break_width,
                );
                fallback.size
            }
        };
        log::debug!(
            "measure({width:?}, {height:?}) -> {}x{}",
            size.width,
            size.height
        );
        self.measured = Some(size);
        size
    }

    /// Host assigned final bounds. Rebuilds right away when the width is new.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.bounds = Size2D::new(width, height);
        if width > 0 && self.cache.needs_rebuild(width) {
            self.rebuild(width);
        }
    }

    /// Paints the stroke layer, then the fill layer, at the same origin.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, bounds: Size2D<u32>) -> DrawOutcome {
        if bounds.width == 0 || bounds.height == 0 {
            log::debug!("Skipping draw at {}x{}", bounds.width, bounds.height);
            return DrawOutcome::RelayoutRequested;
        }
        self.bounds = bounds;
        if self.cache.needs_rebuild(bounds.width) {
            self.rebuild(bounds.width);
        }

        let laid = match self.cache.outcome() {
            LayoutOutcome::Laid(laid) => laid,
            LayoutOutcome::Empty => return DrawOutcome::NothingToDraw,
            LayoutOutcome::Fallback { .. } => return DrawOutcome::LayoutUnavailable,
        };

        let inset = ScaledMetrics::new(&self.style, &self.config).edge_inset();
        let origin = draw_origin(
            self.style.alignment,
            bounds,
            laid.size(self.style.max_lines),
            inset,
        );
        canvas.draw_paragraph(&laid.stroke, origin, &self.stroke_paint);
        canvas.draw_paragraph(&laid.fill, origin, &self.fill_paint);
        DrawOutcome::Drawn { origin }
    }

    fn rebuild(&mut self, width: u32) {
        let metrics = ScaledMetrics::new(&self.style, &self.config);
        let outcome = self.prepare_paints(&metrics).and_then(|()| {
            build_text(
                &self.style,
                &self.config,
                &self.fill_paint,
                &self.stroke_paint,
                width,
            )
        });
        match outcome {
            Ok(outcome) => self.cache.store(outcome, width),
            Err(e) => {
                log::warn!("Layout at width {width} failed: {e}");
                let height = measure::trunc_px(metrics.font_size) + self.config.fallback_extra_height;
                self.cache
                    .store(LayoutOutcome::Fallback { width, height }, width);
            }
        }
    }

    /// Brings both paints in line with the style and resolves the typeface.
    fn prepare_paints(&mut self, metrics: &ScaledMetrics) -> Result<(), LayoutError> {
        self.fill_paint.text_size = metrics.font_size;
        self.fill_paint.color = self.style.fill_color;
        self.stroke_paint.text_size = metrics.font_size;
        self.stroke_paint.color = self.style.stroke_color;
        self.stroke_paint.set_stroke_width(metrics.stroke_width);
        if self.style.content.is_empty() {
            return Ok(());
        }

        let typeface = self
            .typefaces
            .get_or_resolve(&self.style.font_family, self.fonts.as_ref());
        self.fill_paint.typeface = typeface.clone();
        self.stroke_paint.typeface = typeface;
        if self.fill_paint.typeface.is_none() {
            return Err(LayoutError::TypefaceUnavailable(
                self.style.font_family.clone(),
            ));
        }
        Ok(())
    }
}

/// Builds both layouts of the possibly truncated run at `width`.
fn build_text(
    style: &TextStyleState,
    config: &StrokeTextConfig,
    fill: &Paint,
    stroke: &Paint,
    width: u32,
) -> Result<LayoutOutcome, LayoutError> {
    if style.content.is_empty() {
        return Ok(LayoutOutcome::Empty);
    }
    let typeface = fill
        .typeface
        .as_ref()
        .ok_or_else(|| LayoutError::TypefaceUnavailable(style.font_family.clone()))?;

    let break_width = width as f32;
    let full = ParagraphLayout::build(&style.content, fill, break_width, style.alignment)?;
    let ellipsis = style.ellipsis.then_some(config.ellipsis.as_str());
    let (run, fill_layout) = match truncate_run(&full, style.max_lines, ellipsis, typeface) {
        Some(run) => {
            let layout = ParagraphLayout::build(&run, fill, break_width, style.alignment)?;
            (run, layout)
        }
        None => (style.content.clone(), full),
    };
    let stroke_layout = ParagraphLayout::build(&run, stroke, break_width, style.alignment)?;

    log::debug!(
        "Built {} line(s) at width {width}",
        fill_layout.line_count()
    );
    Ok(LayoutOutcome::Laid(LaidText {
        run,
        fill: fill_layout,
        stroke: stroke_layout,
    }))
}

struct RenderMeasurer<'a> {
    style: &'a TextStyleState,
    config: &'a StrokeTextConfig,
    fill: &'a Paint,
    stroke: &'a Paint,
    cache: &'a mut LayoutCache,
}

impl ParagraphMeasurer for RenderMeasurer<'_> {
    fn line_advance(&mut self, line: &str) -> Result<f32, LayoutError> {
        let typeface = self
            .fill
            .typeface
            .as_ref()
            .ok_or_else(|| LayoutError::TypefaceUnavailable(self.style.font_family.clone()))?;
        Ok(typeface.measure_text(line, self.fill.text_size))
    }

    fn layout_at(&mut self, break_width: u32) -> Result<Size2D<f32>, LayoutError> {
        if self.cache.needs_rebuild(break_width) {
            let outcome = build_text(self.style, self.config, self.fill, self.stroke, break_width)?;
            self.cache.store(outcome, break_width);
        }
        match self.cache.outcome() {
            LayoutOutcome::Laid(laid) => Ok(laid.size(self.style.max_lines)),
            _ => Ok(Size2D::zero()),
        }
    }
}

/// Top-left of the paragraph inside `bounds`, keeping `inset` from each edge.
pub fn draw_origin(
    alignment: Alignment,
    bounds: Size2D<u32>,
    layout: Size2D<f32>,
    inset: f32,
) -> Point2D<f32> {
    let width = bounds.width as f32;
    let height = bounds.height as f32;
    let x = match alignment {
        Alignment::Start => inset,
        Alignment::Center => inset.max((width - layout.width) / 2.0),
        Alignment::End => inset.max(width - layout.width - inset),
    };
    let y = inset.max((height - layout.height) / 2.0);
    Point2D::new(x, y)
}
