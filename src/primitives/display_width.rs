//! Display width of terminal text
//!
//! Layout must be computed in terminal columns, not chars: CJK names and
//! emoji take two columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[inline]
pub fn char_width(c: char) -> usize {
    // None for control characters
    c.width().unwrap_or(0)
}

#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

/// Cut `s` to at most `max_width` columns, ending in `…` when shortened
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if str_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max_width - 1 {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Center `s` in a field of `width` columns
pub fn center_in_width(s: &str, width: usize) -> String {
    let text = truncate_to_width(s, width);
    let used = str_width(&text);
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
