//! Size negotiation shared by both measurement passes.
//!
//! [`measure`] is the only place the break width, line limit, stroke padding
//! and minimum size are combined. [`crate::LayoutEstimator`] and
//! [`crate::StrokeTextRenderer`] differ only in the [`ParagraphMeasurer`]
//! they plug in, which keeps their results identical for the same style.

use euclid::default::Size2D;

use crate::{config::StrokeTextConfig, error::LayoutError, style::TextStyleState};

/// How a host constraint bounds one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureMode {
    Exact,
    AtMost,
    Unspecified,
}

/// One axis of the host's size constraint, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    pub mode: MeasureMode,
    pub value: f32,
}

impl Constraint {
    /// The axis must be exactly `value` pixels.
    pub fn exact(value: f32) -> Self {
        Self {
            mode: MeasureMode::Exact,
            value,
        }
    }

    /// The axis may be at most `value` pixels.
    pub fn at_most(value: f32) -> Self {
        Self {
            mode: MeasureMode::AtMost,
            value,
        }
    }

    /// The axis is unconstrained.
    pub fn unspecified() -> Self {
        Self {
            mode: MeasureMode::Unspecified,
            value: 0.0,
        }
    }

    /// Hosts report a zero (or garbage) value before their first real pass;
    /// such a constraint carries no information.
    pub fn normalized(self) -> Self {
        match self.mode {
            MeasureMode::Unspecified => self,
            _ if self.value.is_finite() && self.value > 0.0 => self,
            _ => Self::unspecified(),
        }
    }

    /// Constraint value in whole pixels, truncated.
    pub fn px(&self) -> u32 {
        trunc_px(self.value)
    }
}

/// Style lengths converted to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledMetrics {
    pub font_size: f32,
    pub stroke_width: f32,
    /// Two-sided room reserved for the outline: `2 * stroke_width`.
    pub stroke_padding: f32,
    /// Explicit natural width; `0.0` derives it from content.
    pub custom_width: f32,
}

impl ScaledMetrics {
    /// Scales the style's lengths by the configured density.
    pub fn new(style: &TextStyleState, config: &StrokeTextConfig) -> Self {
        let stroke_width = config.density.scale(style.stroke_width);
        Self {
            font_size: config.density.scale(style.font_size),
            stroke_width,
            stroke_padding: 2.0 * stroke_width,
            custom_width: config.density.scale(style.custom_width),
        }
    }

    /// Smallest size either pass ever reports.
    pub fn min_size(&self) -> Size2D<u32> {
        Size2D::new(
            trunc_px(2.0 * self.font_size + self.stroke_padding),
            trunc_px(self.font_size + self.stroke_padding),
        )
    }

    /// Size reported for empty content.
    pub fn empty_size(&self) -> Size2D<u32> {
        let min = self.min_size();
        let padding = trunc_px(self.stroke_padding);
        Size2D::new(min.width.max(padding), min.height.max(padding))
    }

    /// Distance kept between the outline and each view edge when drawing.
    pub fn edge_inset(&self) -> f32 {
        self.stroke_width
    }
}

/// The pass-specific half of a measurement.
pub trait ParagraphMeasurer {
    /// Advance of `line` set on a single line.
    fn line_advance(&mut self, line: &str) -> Result<f32, LayoutError>;

    /// Lays the content out at `break_width` with the line limit applied and
    /// returns the laid paragraph's `(width, height)`.
    fn layout_at(&mut self, break_width: u32) -> Result<Size2D<f32>, LayoutError>;
}

/// Result of [`measure`] or [`fallback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub size: Size2D<u32>,
    /// Width the paragraph was broken at; `0` for empty content.
    pub break_width: u32,
}

/// Width the content wants when nothing constrains it.
pub fn natural_width(
    content: &str,
    metrics: &ScaledMetrics,
    config: &StrokeTextConfig,
    measurer: &mut dyn ParagraphMeasurer,
) -> Result<u32, LayoutError> {
    if metrics.custom_width > 0.0 {
        return Ok(trunc_px(metrics.custom_width));
    }

    let mut widest: f32 = 0.0;
    for line in content.split('\n').filter(|line| !line.is_empty()) {
        widest = widest.max(measurer.line_advance(line)?);
    }
    Ok(config
        .min_natural_width
        .max(ceil_px(widest + metrics.stroke_padding)))
}

/// Width the paragraph is broken at, given the natural width.
pub fn break_width(width: Constraint, natural: u32) -> u32 {
    let width = width.normalized();
    match width.mode {
        MeasureMode::Exact => width.px(),
        MeasureMode::AtMost => natural.min(width.px()),
        MeasureMode::Unspecified => natural,
    }
}

/// Computes the size to report for `content` under the given constraints.
pub fn measure(
    content: &str,
    metrics: &ScaledMetrics,
    config: &StrokeTextConfig,
    width: Constraint,
    height: Constraint,
    measurer: &mut dyn ParagraphMeasurer,
) -> Result<Measurement, LayoutError> {
    if content.is_empty() {
        return Ok(Measurement {
            size: metrics.empty_size(),
            break_width: 0,
        });
    }

    let width = width.normalized();
    let break_at = match width.mode {
        MeasureMode::Exact => width.px(),
        _ => break_width(width, natural_width(content, metrics, config, measurer)?),
    };

    let laid = measurer.layout_at(break_at)?;
    let measured = Size2D::new(
        ceil_px(laid.width + metrics.stroke_padding),
        ceil_px(laid.height + metrics.stroke_padding),
    );

    Ok(Measurement {
        size: finish(measured, metrics, height),
        break_width: break_at,
    })
}

/// Deterministic size used when the paragraph could not be laid out.
///
/// Width follows the regular break width derivation (the content-derived
/// natural width degrades to `config.min_natural_width` when it cannot be
/// measured either); height is the font size plus a fixed allowance.
pub fn fallback(
    content: &str,
    metrics: &ScaledMetrics,
    config: &StrokeTextConfig,
    width: Constraint,
    height: Constraint,
    measurer: &mut dyn ParagraphMeasurer,
) -> Measurement {
    if content.is_empty() {
        return Measurement {
            size: metrics.empty_size(),
            break_width: 0,
        };
    }

    let natural = natural_width(content, metrics, config, measurer)
        .unwrap_or_else(|_| config.min_natural_width);
    let width = break_width(width, natural);
    let height_px = trunc_px(metrics.font_size) + config.fallback_extra_height;

    Measurement {
        size: finish(Size2D::new(width, height_px), metrics, height),
        break_width: width,
    }
}

fn finish(size: Size2D<u32>, metrics: &ScaledMetrics, height: Constraint) -> Size2D<u32> {
    let height = height.normalized();
    let constrained_height = match height.mode {
        MeasureMode::Exact => height.px(),
        MeasureMode::AtMost => size.height.min(height.px()),
        MeasureMode::Unspecified => size.height,
    };
    let min = metrics.min_size();
    Size2D::new(
        size.width.max(min.width),
        constrained_height.max(min.height),
    )
}

pub(crate) fn trunc_px(value: f32) -> u32 {
    if value.is_finite() { value.max(0.0) as u32 } else { 0 }
}

pub(crate) fn ceil_px(value: f32) -> u32 {
    trunc_px(value.ceil())
}
