//! Column-width text fitting: truncate, align, wrap.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `max` columns, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate, then pad to exactly `columns` according to `align`.
pub fn align(text: &str, columns: usize, align: Align) -> String {
    let text = truncate(text, columns);
    let gap = columns.saturating_sub(width(&text));
    let (left, right) = match align {
        Align::Left => (0, gap),
        Align::Right => (gap, 0),
        Align::Center => (gap / 2, gap - gap / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Drop the first `columns` display columns of `text`.
pub fn skip_columns(text: &str, columns: usize) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        if used >= columns {
            return &text[i..];
        }
        used += c.width().unwrap_or(0);
    }
    ""
}

/// Greedy word wrap. Words longer than a line are truncated.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if columns == 0 {
        return lines;
    }
    let mut line = String::new();
    for word in text.split_whitespace() {
        let word = truncate(word, columns);
        let needed = if line.is_empty() {
            width(&word)
        } else {
            width(&line) + 1 + width(&word)
        };
        if needed > columns && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Blue Monday", 11), "Blue Monday");
        assert_eq!(truncate("Blue Monday", 6), "Blue …");
        assert_eq!(truncate("Blue Monday", 1), "…");
        assert_eq!(truncate("Blue", 0), "");
        // Wide glyphs count as two columns.
        assert_eq!(width(&truncate("日本語のタイトル", 5)), 5);
    }

    #[test]
    fn align_pads_to_width() {
        assert_eq!(align("ab", 5, Align::Left), "ab   ");
        assert_eq!(align("ab", 5, Align::Right), "   ab");
        assert_eq!(align("ab", 5, Align::Center), " ab  ");
        assert_eq!(align("abcdef", 4, Align::Right), "abc…");
    }

    #[test]
    fn skip_and_wrap() {
        assert_eq!(skip_columns("hello", 2), "llo");
        assert_eq!(skip_columns("hi", 5), "");
        assert_eq!(
            wrap("Delete playlist [road trip] from the library?", 20),
            ["Delete playlist", "[road trip] from the", "library?"]
        );
    }
}
