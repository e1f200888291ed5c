use std::{collections::HashMap, fmt, sync::Arc};

/// Vertical metrics of one line of text, Y axis pointing up.
///
/// `descent` is negative below the baseline, matching `fontdue`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        (self.ascent - self.descent + self.line_gap).max(0.0)
    }
}

impl From<fontdue::LineMetrics> for LineMetrics {
    fn from(m: fontdue::LineMetrics) -> Self {
        Self {
            ascent: m.ascent,
            descent: m.descent,
            line_gap: m.line_gap,
        }
    }
}

/// Coverage bitmap of a single glyph.
///
/// `xmin`/`ymin` locate the bottom-left corner of the bitmap relative to the
/// glyph origin on the baseline, Y axis pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub coverage: Vec<u8>,
}

/// The shaping and measurement primitive text layout is built on.
///
/// Implemented for [`fontdue::Font`]; anything that can report advances and
/// line metrics can stand in for it.
pub trait FontFace: Send + Sync {
    fn line_metrics(&self, px: f32) -> Option<LineMetrics>;

    fn glyph_index(&self, ch: char) -> u16;

    fn advance(&self, glyph: u16, px: f32) -> f32;

    fn kerning(&self, _left: u16, _right: u16, _px: f32) -> Option<f32> {
        None
    }

    fn rasterize(&self, _glyph: u16, _px: f32) -> Option<GlyphBitmap> {
        None
    }
}

impl FontFace for fontdue::Font {
    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        self.horizontal_line_metrics(px).map(Into::into)
    }

    fn glyph_index(&self, ch: char) -> u16 {
        self.lookup_glyph_index(ch)
    }

    fn advance(&self, glyph: u16, px: f32) -> f32 {
        self.metrics_indexed(glyph, px).advance_width
    }

    fn kerning(&self, left: u16, right: u16, px: f32) -> Option<f32> {
        self.horizontal_kern_indexed(left, right, px)
    }

    fn rasterize(&self, glyph: u16, px: f32) -> Option<GlyphBitmap> {
        let (metrics, coverage) = self.rasterize_indexed(glyph, px);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }
        Some(GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        })
    }
}

/// A resolved font face plus the family name it was requested under.
#[derive(Clone)]
pub struct Typeface {
    family: Arc<str>,
    face: Arc<dyn FontFace>,
}

impl Typeface {
    /// Wraps `face` under the family name it was requested as.
    pub fn new(family: impl Into<Arc<str>>, face: Arc<dyn FontFace>) -> Self {
        Self {
            family: family.into(),
            face,
        }
    }

    /// Family name the typeface was requested under.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The underlying face.
    pub fn face(&self) -> &dyn FontFace {
        self.face.as_ref()
    }

    /// Sum of kerned advances of `text` laid out on a single line.
    pub fn measure_text(&self, text: &str, px: f32) -> f32 {
        let face = self.face();
        let mut width = 0.0;
        let mut prev: Option<u16> = None;
        for ch in text.chars() {
            let glyph = face.glyph_index(ch);
            if let Some(left) = prev {
                width += face.kerning(left, glyph, px).unwrap_or(0.0);
            }
            width += face.advance(glyph, px);
            prev = Some(glyph);
        }
        width
    }

    /// Whether both handles share one face.
    pub fn ptr_eq(&self, other: &Typeface) -> bool {
        Arc::ptr_eq(&self.face, &other.face)
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Typeface {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.ptr_eq(other)
    }
}

/// Platform font lookup. May be slow; results are cached per component.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, family: &str) -> Option<Typeface>;
}

/// Family name to typeface map owned by a single component instance.
///
/// Only successful lookups are stored, so a font registered after a miss
/// is picked up on the next request.
#[derive(Default)]
pub struct TypefaceCache {
    entries: HashMap<String, Typeface, fxhash::FxBuildHasher>,
}

impl TypefaceCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached typeface for `family`, resolving it on a miss.
    pub fn get_or_resolve(&mut self, family: &str, resolver: &dyn FontResolver) -> Option<Typeface> {
        if let Some(typeface) = self.entries.get(family) {
            return Some(typeface.clone());
        }

        let Some(typeface) = resolver.resolve(family) else {
            log::warn!("No typeface resolved for family `{family}`");
            return None;
        };
        log::debug!("Resolved typeface for family `{family}`");
        self.entries.insert(family.to_string(), typeface.clone());
        Some(typeface)
    }

    /// Returns the number of cached families.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached typeface.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingResolver, MonoFace};

    #[test]
    fn test_measure_text_sums_advances() {
        let typeface = Typeface::new("mono", Arc::new(MonoFace::default()));
        // MonoFace advances half the pixel size per char
        assert_eq!(typeface.measure_text("Hi", 14.0), 14.0);
        assert_eq!(typeface.measure_text("", 14.0), 0.0);
    }

    #[test]
    fn test_cache_resolves_once_per_family() {
        let resolver = CountingResolver::new(&["sans-serif", "serif"]);
        let mut cache = TypefaceCache::new();

        let a = cache.get_or_resolve("sans-serif", &resolver).unwrap();
        let b = cache.get_or_resolve("sans-serif", &resolver).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.family(), "sans-serif");
        assert_eq!(resolver.calls(), 1);

        cache.get_or_resolve("serif", &resolver).unwrap();
        assert_eq!(resolver.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_does_not_store_misses() {
        let resolver = CountingResolver::new(&[]);
        let mut cache = TypefaceCache::new();

        assert!(cache.get_or_resolve("missing", &resolver).is_none());
        assert!(cache.get_or_resolve("missing", &resolver).is_none());
        assert_eq!(resolver.calls(), 2);
        assert!(cache.is_empty());
    }
}
