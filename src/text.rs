/// Line breaking and the measured paragraph representation.
pub mod paragraph;
/// Line-limit truncation of a text run, optionally with an ellipsis.
pub mod truncate;

pub use paragraph::{LineSpan, ParagraphLayout, PositionedGlyph};
pub use truncate::truncate_run;
