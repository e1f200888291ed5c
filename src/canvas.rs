pub mod cpu_canvas;

pub use cpu_canvas::CpuCanvas;

use euclid::default::Point2D;

use crate::{paint::Paint, text::ParagraphLayout};

/// Drawing primitive the renderer paints through.
///
/// `origin` is the top-left of the paragraph box in canvas pixels, Y axis
/// pointing down. Implementations paint every line of `layout` with `paint`
/// and must not reorder calls: later calls paint over earlier ones.
pub trait Canvas {
    fn draw_paragraph(&mut self, layout: &ParagraphLayout, origin: Point2D<f32>, paint: &Paint);
}
