/// Conversion from scale-independent units to device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    /// Pixels per scale-independent unit (display density times the user's font scale).
    pub scaled_density: f32,
}

impl Default for Density {
    fn default() -> Self {
        Self {
            scaled_density: 1.0,
        }
    }
}

impl Density {
    pub fn new(scaled_density: f32) -> Self {
        Self { scaled_density }
    }

    /// Converts a length in scale-independent units to pixels.
    pub fn scale(&self, value: f32) -> f32 {
        value * self.scaled_density
    }
}

/// Tunables shared by [`crate::LayoutEstimator`] and [`crate::StrokeTextRenderer`].
///
/// Both components must be built from equal configs, otherwise the two
/// measurement passes disagree on size.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeTextConfig {
    pub density: Density,
    /// Lower bound, in pixels, of the width derived from content.
    pub min_natural_width: u32,
    /// Added to the scaled font size to form the height used when layout fails.
    pub fallback_extra_height: u32,
    /// Appended to a run truncated at its line limit.
    pub ellipsis: String,
    pub default_font_family: String,
}

impl Default for StrokeTextConfig {
    fn default() -> Self {
        Self {
            density: Density::default(),
            min_natural_width: 100,
            fallback_extra_height: 20,
            ellipsis: "\u{2026}".to_string(),
            default_font_family: "sans-serif".to_string(),
        }
    }
}

impl StrokeTextConfig {
    pub fn with_density(mut self, scaled_density: f32) -> Self {
        self.density = Density::new(scaled_density);
        self
    }
}
