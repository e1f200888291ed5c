use crate::{
    color::{Argb, parse_color_or},
    props::Prop,
};

pub const DEFAULT_FONT_SIZE: f32 = 14.0;
pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Horizontal placement of each line inside the paragraph, and of the
/// paragraph inside the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    Start,
    #[default]
    Center,
    End,
}

impl Alignment {
    /// Maps the host's `align` value; unknown or absent values center.
    pub fn from_prop(value: Option<&str>) -> Self {
        match value {
            Some("left") => Self::Start,
            Some("right") => Self::End,
            _ => Self::Center,
        }
    }
}

/// What the host must do after a property update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Invalidation {
    /// Value unchanged.
    #[default]
    None,
    /// Only paint changed; redraw with the current layouts.
    Repaint,
    /// Size may change; measure again, then redraw.
    Relayout,
}

/// Style inputs of one stroke text component.
///
/// Lengths are in scale-independent units. Every numeric field is kept
/// non-negative and a `None` update restores the field's default.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyleState {
    pub content: String,
    pub font_size: f32,
    pub stroke_width: f32,
    pub font_family: String,
    /// `0` means unlimited.
    pub max_lines: u32,
    /// `0.0` means the width is derived from content.
    pub custom_width: f32,
    pub alignment: Alignment,
    pub ellipsis: bool,
    pub fill_color: Argb,
    pub stroke_color: Argb,
    default_family: String,
}

impl Default for TextStyleState {
    fn default() -> Self {
        Self::with_default_family(DEFAULT_FONT_FAMILY)
    }
}

impl TextStyleState {
    pub fn with_default_family(family: impl Into<String>) -> Self {
        let family = family.into();
        Self {
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_family: family.clone(),
            max_lines: 0,
            custom_width: 0.0,
            alignment: Alignment::Center,
            ellipsis: false,
            fill_color: Argb::BLACK,
            stroke_color: Argb::WHITE,
            default_family: family,
        }
    }

    /// Applies one property update.
    pub fn apply(&mut self, prop: Prop) -> Invalidation {
        match prop {
            Prop::Text(v) => self.set_text(v),
            Prop::FontSize(v) => self.set_font_size(v),
            Prop::StrokeWidth(v) => self.set_stroke_width(v),
            Prop::Color(v) => self.set_fill_color(v.as_deref()),
            Prop::StrokeColor(v) => self.set_stroke_color(v.as_deref()),
            Prop::FontFamily(v) => self.set_font_family(v),
            Prop::Align(v) => self.set_alignment(Alignment::from_prop(v.as_deref())),
            Prop::NumberOfLines(v) => self.set_max_lines(v),
            Prop::Ellipsis(v) => self.set_ellipsis(v),
            Prop::Width(v) => self.set_custom_width(v),
        }
    }

    pub fn set_text(&mut self, text: Option<String>) -> Invalidation {
        let text = text.unwrap_or_default();
        replace(&mut self.content, text, Invalidation::Relayout)
    }

    pub fn set_font_size(&mut self, size: Option<f32>) -> Invalidation {
        let size = sanitize_length(size, DEFAULT_FONT_SIZE);
        replace(&mut self.font_size, size, Invalidation::Relayout)
    }

    pub fn set_stroke_width(&mut self, width: Option<f32>) -> Invalidation {
        let width = sanitize_length(width, DEFAULT_STROKE_WIDTH);
        replace(&mut self.stroke_width, width, Invalidation::Relayout)
    }

    pub fn set_custom_width(&mut self, width: Option<f32>) -> Invalidation {
        let width = sanitize_length(width, 0.0);
        replace(&mut self.custom_width, width, Invalidation::Relayout)
    }

    pub fn set_font_family(&mut self, family: Option<String>) -> Invalidation {
        let family = family.unwrap_or_else(|| self.default_family.clone());
        replace(&mut self.font_family, family, Invalidation::Relayout)
    }

    pub fn set_max_lines(&mut self, lines: Option<i32>) -> Invalidation {
        let lines = lines.unwrap_or(0).max(0) as u32;
        replace(&mut self.max_lines, lines, Invalidation::Relayout)
    }

    pub fn set_ellipsis(&mut self, ellipsis: Option<bool>) -> Invalidation {
        replace(&mut self.ellipsis, ellipsis.unwrap_or(false), Invalidation::Relayout)
    }

    /// Lines are positioned inside the paragraph, so alignment rebuilds it.
    pub fn set_alignment(&mut self, alignment: Alignment) -> Invalidation {
        replace(&mut self.alignment, alignment, Invalidation::Relayout)
    }

    pub fn set_fill_color(&mut self, color: Option<&str>) -> Invalidation {
        let color = color.map_or(Argb::BLACK, |c| parse_color_or(c, Argb::BLACK));
        replace(&mut self.fill_color, color, Invalidation::Repaint)
    }

    pub fn set_stroke_color(&mut self, color: Option<&str>) -> Invalidation {
        let color = color.map_or(Argb::WHITE, |c| parse_color_or(c, Argb::WHITE));
        replace(&mut self.stroke_color, color, Invalidation::Repaint)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T, on_change: Invalidation) -> Invalidation {
    if *slot == value {
        return Invalidation::None;
    }
    *slot = value;
    on_change
}

fn sanitize_length(value: Option<f32>, default: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v.max(0.0),
        Some(v) => {
            log::warn!("Non-finite length {v}; using {default}");
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = TextStyleState::default();
        assert_eq!(style.content, "");
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.stroke_width, 1.0);
        assert_eq!(style.font_family, "sans-serif");
        assert_eq!(style.max_lines, 0);
        assert_eq!(style.custom_width, 0.0);
        assert_eq!(style.alignment, Alignment::Center);
        assert!(!style.ellipsis);
        assert_eq!(style.fill_color, Argb::BLACK);
        assert_eq!(style.stroke_color, Argb::WHITE);
    }

    #[test]
    fn test_equal_value_is_noop() {
        let mut style = TextStyleState::default();
        assert_eq!(style.set_text(Some("hi".into())), Invalidation::Relayout);
        assert_eq!(style.set_text(Some("hi".into())), Invalidation::None);
        assert_eq!(style.set_font_size(Some(14.0)), Invalidation::None);
        assert_eq!(style.set_fill_color(Some("#000000")), Invalidation::None);
    }

    #[test]
    fn test_none_resets_to_default() {
        let mut style = TextStyleState::with_default_family("Roboto");
        style.set_text(Some("abc".into()));
        style.set_font_family(Some("Serif".into()));
        style.set_max_lines(Some(3));
        style.set_stroke_color(Some("#123456"));

        assert_eq!(style.set_text(None), Invalidation::Relayout);
        assert_eq!(style.content, "");
        style.set_font_family(None);
        assert_eq!(style.font_family, "Roboto");
        style.set_max_lines(None);
        assert_eq!(style.max_lines, 0);
        assert_eq!(style.set_stroke_color(None), Invalidation::Repaint);
        assert_eq!(style.stroke_color, Argb::WHITE);
    }

    #[test]
    fn test_numeric_fields_stay_non_negative() {
        let mut style = TextStyleState::default();
        style.set_stroke_width(Some(-3.0));
        assert_eq!(style.stroke_width, 0.0);
        style.set_max_lines(Some(-1));
        assert_eq!(style.max_lines, 0);
        style.set_font_size(Some(f32::NAN));
        assert_eq!(style.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_color_changes_only_repaint() {
        let mut style = TextStyleState::default();
        assert_eq!(style.set_fill_color(Some("#ff0000")), Invalidation::Repaint);
        assert_eq!(style.fill_color, Argb(0xFFFF_0000));
        // malformed stroke color falls back to white, which is already set
        assert_eq!(style.set_stroke_color(Some("bogus")), Invalidation::None);
        assert_eq!(style.stroke_color, Argb::WHITE);
    }

    #[test]
    fn test_alignment_mapping() {
        assert_eq!(Alignment::from_prop(Some("left")), Alignment::Start);
        assert_eq!(Alignment::from_prop(Some("right")), Alignment::End);
        assert_eq!(Alignment::from_prop(Some("center")), Alignment::Center);
        assert_eq!(Alignment::from_prop(Some("justify")), Alignment::Center);
        assert_eq!(Alignment::from_prop(None), Alignment::Center);
    }
}
