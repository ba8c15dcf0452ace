use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Rounds to two decimal places, mapping non-finite input to `0.0`.
pub fn round_2(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    (v * 100.0).round() / 100.0
}

/// A usage percentage: rounded, never negative.
pub fn non_negative_percent(v: f64) -> f64 {
    round_2(v).max(0.0)
}

/// A share of a whole: rounded and clamped into `[0, 100]`.
pub fn bounded_percent(v: f64) -> f64 {
    non_negative_percent(v).min(100.0)
}

pub fn ratio_percent(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}
