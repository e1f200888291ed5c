use crate::{text::ParagraphLayout, typeface::Typeface};

/// Cuts the run `layout` was built from so it keeps at most `max_lines` lines.
///
/// Returns `None` when no cut is needed (`max_lines == 0` means unlimited).
/// The run ends at the end of the last permitted line, without that line's
/// line feed. With an `ellipsis`, the last line is shortened until it plus
/// the ellipsis fits `layout.width()`; when even the bare ellipsis does not
/// fit, the line is cut without one.
pub fn truncate_run(
    layout: &ParagraphLayout,
    max_lines: u32,
    ellipsis: Option<&str>,
    typeface: &Typeface,
) -> Option<String> {
    let max_lines = max_lines as usize;
    if max_lines == 0 || layout.line_count() <= max_lines {
        return None;
    }

    let text = layout.text();
    let last = &layout.lines()[max_lines - 1];
    let clipped = || text[..last.end].to_string();

    let Some(ellipsis) = ellipsis.filter(|e| !e.is_empty()) else {
        return Some(clipped());
    };

    let px = layout.text_size();
    let limit = layout.width();
    let tail = &text[last.start..last.end];
    let fits = |prefix: &str| {
        let mut candidate = String::with_capacity(prefix.len() + ellipsis.len());
        candidate.push_str(prefix.trim_end());
        candidate.push_str(ellipsis);
        typeface.measure_text(&candidate, px) <= limit
    };

    if !fits("") {
        log::debug!("Ellipsis wider than {limit}px; clipping without it");
        return Some(clipped());
    }

    let mut boundaries: Vec<usize> = tail.char_indices().map(|(idx, _)| idx).collect();
    boundaries.push(tail.len());

    // largest prefix that still fits together with the ellipsis
    let mut lo = 0usize;
    let mut hi = boundaries.len() - 1;
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if fits(&tail[..boundaries[mid]]) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let mut run = String::with_capacity(last.start + boundaries[lo] + ellipsis.len());
    run.push_str(&text[..last.start]);
    run.push_str(tail[..boundaries[lo]].trim_end());
    run.push_str(ellipsis);
    Some(run)
}
