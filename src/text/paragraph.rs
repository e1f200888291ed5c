use crate::{
    error::LayoutError,
    paint::{Paint, PaintStyle},
    style::Alignment,
    typeface::FontFace,
};

/// Slack for width comparisons so a line measured at exactly the break
/// width is not wrapped by float noise.
const WRAP_EPSILON: f32 = 1e-3;

/// A line-broken, measured text run at a fixed break width.
///
/// **Y-axis goes down**, origin at the top-left of the paragraph box.
/// The paragraph box is `width` wide (the break width it was built at, not
/// the widest line) and `height` tall.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphLayout {
    text: String,
    width: f32,
    height: f32,
    text_size: f32,
    alignment: Alignment,
    style: PaintStyle,
    lines: Vec<LineSpan>,
}

/// One line of a [`ParagraphLayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset past the line, trailing whitespace included, line feed excluded.
    pub end: usize,
    /// Byte offset past the last non-whitespace character.
    pub visible_end: usize,
    /// Advance width of `start..visible_end`.
    pub advance: f32,
    /// Alignment offset of the line inside the paragraph box.
    pub offset_x: f32,
    pub top: f32,
    pub baseline: f32,
    pub bottom: f32,
    /// Glyphs of `start..visible_end`, `x` relative to the line's left edge.
    pub glyphs: Vec<PositionedGlyph>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub ch: char,
    pub glyph: u16,
    pub x: f32,
}

impl ParagraphLayout {
    /// Breaks `text` into lines no wider than `width` using `paint`'s
    /// typeface and size.
    ///
    /// Line feeds always end a line. Otherwise lines break after whitespace;
    /// a word wider than `width` on its own is split between characters,
    /// keeping at least one character per line. Whitespace at the end of a
    /// line hangs past the break width and is not counted in its advance.
    pub fn build(
        text: &str,
        paint: &Paint,
        width: f32,
        alignment: Alignment,
    ) -> Result<Self, LayoutError> {
        let typeface = paint
            .typeface
            .as_ref()
            .ok_or_else(|| LayoutError::TypefaceUnavailable(String::new()))?;
        let px = paint.text_size;
        if !px.is_finite() || px <= 0.0 {
            return Err(LayoutError::InvalidFontSize(px));
        }
        let face = typeface.face();
        let metrics = face
            .line_metrics(px)
            .ok_or(LayoutError::MissingLineMetrics)?;
        let line_height = metrics.line_height();
        let width = width.max(0.0);

        let mut breaker = LineBreaker {
            face,
            px,
            limit: width + WRAP_EPSILON,
            lines: Vec::new(),
        };
        let mut offset = 0;
        for segment in text.split('\n') {
            breaker.break_segment(segment, offset);
            offset += segment.len() + 1;
        }

        let mut lines = breaker.lines;
        for (index, line) in lines.iter_mut().enumerate() {
            line.top = index as f32 * line_height;
            line.baseline = line.top + metrics.ascent;
            line.bottom = line.top + line_height;
            line.offset_x = match alignment {
                Alignment::Start => 0.0,
                Alignment::Center => ((width - line.advance) / 2.0).max(0.0),
                Alignment::End => (width - line.advance).max(0.0),
            };
        }

        Ok(Self {
            text: text.to_string(),
            width,
            height: lines.len() as f32 * line_height,
            text_size: px,
            alignment,
            style: paint.style,
            lines,
        })
    }

    /// The run the layout was built from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Break width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Sum of all line heights.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Font size in pixels.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Alignment the line offsets were computed for.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Style of the paint the layout was built with.
    pub fn paint_style(&self) -> PaintStyle {
        self.style
    }

    /// Lines in reading order.
    pub fn lines(&self) -> &[LineSpan] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Top of line `index`; `line_count()` and beyond give the paragraph height.
    pub fn line_top(&self, index: usize) -> f32 {
        self.lines
            .get(index)
            .map(|line| line.top)
            .unwrap_or(self.height)
    }

    /// Visible text of line `index`.
    pub fn line_text(&self, index: usize) -> Option<&str> {
        self.lines
            .get(index)
            .map(|line| &self.text[line.start..line.visible_end])
    }

    /// Widest line advance.
    pub fn content_width(&self) -> f32 {
        self.lines
            .iter()
            .map(|line| line.advance)
            .fold(0.0, f32::max)
    }
}

/// Per-character shaping data for one newline-free segment.
struct Cluster {
    byte: usize,
    ch: char,
    glyph: u16,
    /// Kerning against the previous character of the segment.
    kern_before: f32,
    /// End of the previous character's advance, relative to the segment start.
    pen: f32,
}

struct LineBreaker<'a> {
    face: &'a dyn FontFace,
    px: f32,
    limit: f32,
    lines: Vec<LineSpan>,
}

impl LineBreaker<'_> {
    fn break_segment(&mut self, segment: &str, offset: usize) {
        let clusters = self.shape(segment, offset);
        let end_byte = offset + segment.len();
        // pen position past the last cluster
        let pen_end = clusters.last().map_or(0.0, |last| {
            last.pen + last.kern_before + self.face.advance(last.glyph, self.px)
        });
        let seg = Segment {
            clusters: &clusters,
            pen_end,
            end_byte,
        };

        if clusters.is_empty() {
            self.push_line(&seg, 0, 0);
            return;
        }

        let count = clusters.len();
        let mut line_start = 0;
        let mut line_has_word = false;
        let mut i = 0;

        while i < count {
            if clusters[i].ch.is_whitespace() {
                i += 1;
                continue;
            }

            let mut word_end = i;
            while word_end < count && !clusters[word_end].ch.is_whitespace() {
                word_end += 1;
            }

            if seg.width(line_start, word_end) <= self.limit {
                line_has_word = true;
                i = word_end;
                continue;
            }

            if line_has_word {
                self.push_line(&seg, line_start, i);
                line_start = i;
                line_has_word = false;
                if seg.width(line_start, word_end) <= self.limit {
                    line_has_word = true;
                    i = word_end;
                    continue;
                }
            }

            // The word does not fit on an empty line: split it between characters.
            loop {
                let mut split = i + 1;
                while split < word_end && seg.width(line_start, split + 1) <= self.limit {
                    split += 1;
                }
                if split == word_end {
                    line_has_word = true;
                    i = word_end;
                    break;
                }
                self.push_line(&seg, line_start, split);
                line_start = split;
                i = split;
            }
        }

        self.push_line(&seg, line_start, count);
    }

    fn shape(&self, segment: &str, offset: usize) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = Vec::with_capacity(segment.len());
        let mut pen = 0.0;
        let mut prev: Option<u16> = None;
        for (byte, ch) in segment.char_indices() {
            let glyph = self.face.glyph_index(ch);
            let kern_before = prev
                .and_then(|left| self.face.kerning(left, glyph, self.px))
                .unwrap_or(0.0);
            if let Some(last) = clusters.last() {
                pen = last.pen + last.kern_before + self.face.advance(last.glyph, self.px);
            }
            clusters.push(Cluster {
                byte: offset + byte,
                ch,
                glyph,
                kern_before,
                pen,
            });
            prev = Some(glyph);
        }
        clusters
    }

    /// Emits clusters `from..to` of the segment as one line.
    fn push_line(&mut self, seg: &Segment<'_>, from: usize, to: usize) {
        let clusters = seg.clusters;
        let mut visible_to = to;
        while visible_to > from && clusters[visible_to - 1].ch.is_whitespace() {
            visible_to -= 1;
        }

        let start = seg.byte_at(from);
        let end = seg.byte_at(to);
        let visible_end = seg.byte_at(visible_to);

        let glyphs = if from < visible_to {
            let origin = seg.origin(from);
            clusters[from..visible_to]
                .iter()
                .map(|c| PositionedGlyph {
                    ch: c.ch,
                    glyph: c.glyph,
                    x: c.pen + c.kern_before - origin,
                })
                .collect()
        } else {
            Vec::new()
        };

        self.lines.push(LineSpan {
            start,
            end,
            visible_end,
            advance: seg.width(from, visible_to),
            offset_x: 0.0,
            top: 0.0,
            baseline: 0.0,
            bottom: 0.0,
            glyphs,
        });
    }
}

struct Segment<'a> {
    clusters: &'a [Cluster],
    pen_end: f32,
    end_byte: usize,
}

impl Segment<'_> {
    fn byte_at(&self, index: usize) -> usize {
        self.clusters
            .get(index)
            .map_or(self.end_byte, |c| c.byte)
    }

    /// Where the glyph at `index` lands when it starts a line; kerning
    /// against the previous line's last glyph is dropped.
    fn origin(&self, index: usize) -> f32 {
        self.clusters
            .get(index)
            .map_or(self.pen_end, |c| c.pen + c.kern_before)
    }

    /// End of the advance of the character before `index`.
    fn pen_at(&self, index: usize) -> f32 {
        self.clusters.get(index).map_or(self.pen_end, |c| c.pen)
    }

    /// Advance width of clusters `from..to` laid out as one line.
    fn width(&self, from: usize, to: usize) -> f32 {
        if to <= from {
            return 0.0;
        }
        (self.pen_at(to) - self.origin(from)).max(0.0)
    }
}
