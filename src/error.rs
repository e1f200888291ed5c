//! Error types shared by the layout, color and property code.
//!
//! None of these ever reach the host: the components recover from each of
//! them locally. They exist so the internal steps can propagate with `?`.

use thiserror::Error;

/// Failure while shaping or breaking a paragraph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Neither the requested family nor the sans-serif fallback resolved.
    #[error("no typeface available for family `{0}`")]
    TypefaceUnavailable(String),

    /// The face has no horizontal line metrics at the requested size.
    #[error("typeface provides no horizontal line metrics")]
    MissingLineMetrics,

    /// Font size is zero, negative or not finite.
    #[error("invalid font size: {0}")]
    InvalidFontSize(f32),
}

/// Failure while reading a color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("unsupported color format: `{0}`")]
    UnsupportedFormat(String),

    #[error("invalid hex color: `{0}`")]
    InvalidHex(String),

    #[error("invalid color channel `{channel}` in `{input}`")]
    InvalidChannel { input: String, channel: String },
}

/// Failure while converting a raw host property into a typed [`crate::props::Prop`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropError {
    #[error("unknown property `{0}`")]
    UnknownProp(String),

    #[error("property `{name}` expects a {expected} value")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
    },
}
