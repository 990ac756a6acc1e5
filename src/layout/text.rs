use crate::text_metrics;

// Used when no font can be loaded; close to an average sans-serif advance.
const FALLBACK_CHAR_WIDTH: f64 = 0.56;
const FONT_STEP: f64 = 0.9;

pub(super) fn text_width(text: &str, font_size: f64, font_family: &str) -> f64 {
    match text_metrics::measure_text_width(text, font_size as f32, font_family) {
        Some(width) => width as f64,
        None => text.chars().count() as f64 * font_size * FALLBACK_CHAR_WIDTH,
    }
}

/// Largest font size, starting at `max_size` and shrinking geometrically,
/// at which every line fits `max_width` and the block fits `max_height`.
/// `None` when even `min_size` is too big.
pub(super) fn fit_font_size(
    lines: &[String],
    max_width: f64,
    max_height: f64,
    max_size: f64,
    min_size: f64,
    line_height: f64,
    font_family: &str,
) -> Option<f64> {
    if lines.is_empty() || max_width <= 0.0 || max_height <= 0.0 {
        return None;
    }
    let mut size = max_size;
    loop {
        let height = lines.len() as f64 * size * line_height;
        let fits = height <= max_height
            && lines
                .iter()
                .all(|line| text_width(line, size, font_family) <= max_width);
        if fits {
            return Some(size);
        }
        if size <= min_size {
            return None;
        }
        size = (size * FONT_STEP).max(min_size);
    }
}

/// Drops trailing lines until the block fits; the name line is kept last.
pub(super) fn fit_lines(
    lines: &[String],
    max_width: f64,
    max_height: f64,
    max_size: f64,
    min_size: f64,
    line_height: f64,
    font_family: &str,
) -> Option<(Vec<String>, f64)> {
    let mut kept = lines.to_vec();
    while !kept.is_empty() {
        if let Some(size) = fit_font_size(
            &kept,
            max_width,
            max_height,
            max_size,
            min_size,
            line_height,
            font_family,
        ) {
            return Some((kept, size));
        }
        kept.pop();
    }
    None
}
