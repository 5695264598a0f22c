//! Text fitting for terminal cells
//!
//! Width is measured in terminal columns with `unicode-width`, so wide
//! (CJK, emoji) characters count as two.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Take leading characters of `s` that fit in `max_width` columns
fn take_width(s: &str, max_width: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = char_width(c);
        if used + w > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    (out, used)
}

/// Replace control characters such as newlines with spaces.
///
/// A raw newline inside a terminal line moves the cursor down in raw mode.
pub fn single_line(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_control) {
        Cow::Owned(
            s.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

/// Truncate a string to fit within `max_width` columns.
///
/// The result is always one line. Appends `..` when anything is cut; below
/// three columns the string is simply clipped.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let s = single_line(s);
    let s = s.as_ref();
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return take_width(s, max_width).0;
    }
    let (mut out, _) = take_width(s, max_width - 2);
    out.push_str("..");
    out
}

/// Left-align `s` in exactly `width` columns, truncating if needed
pub fn pad_right(s: &str, width: usize) -> String {
    let fitted = truncate_string(s, width);
    let fill = width.saturating_sub(display_width(&fitted));
    format!("{fitted}{}", " ".repeat(fill))
}

/// Center `s` in exactly `width` columns, truncating if needed
pub fn center(s: &str, width: usize) -> String {
    let fitted = truncate_string(s, width);
    let fill = width.saturating_sub(display_width(&fitted));
    let left = fill / 2;
    format!("{}{fitted}{}", " ".repeat(left), " ".repeat(fill - left))
}

/// Wrap text into lines of at most `width` columns.
///
/// Breaks at whitespace where possible and splits words longer than a line.
/// Embedded newlines start new lines. Always returns at least one line.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in s.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            let mut word_width = display_width(&word);

            let gap = usize::from(!line.is_empty());
            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(&word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            while word_width > width {
                let (head, head_width) = take_width(&word, width);
                if head_width == 0 {
                    break;
                }
                word = word[head.len()..].to_string();
                word_width = display_width(&word);
                lines.push(head);
            }

            line_width = word_width;
            line = word;
        }

        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn f_truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn f_truncate_string_long() {
        let result = truncate_string("hello world", 8);
        assert_eq!(result, "hello ..");
        assert_eq!(display_width(&result), 8);
    }

    #[test]
    fn f_truncate_string_very_short_max() {
        assert_eq!(truncate_string("hello", 2), "he");
        assert_eq!(truncate_string("hello", 0), "");
    }

    #[test]
    fn f_truncate_wide_chars() {
        // each ideograph is two columns
        let result = truncate_string("日本語テキスト", 7);
        assert!(display_width(&result) <= 7, "FALSIFIED: got {result}");
        assert!(result.ends_with(".."));
    }

    #[test]
    fn f_single_line_cells_have_no_control_chars() {
        assert_eq!(truncate_string("line1\nline2", 20), "line1 line2");
        assert_eq!(center("a\r\nb", 6), " a  b ");
        assert_eq!(pad_right("x\ty", 4), "x y ");
        assert!(matches!(single_line("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn f_display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn f_display_width_unicode() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn f_pad_right() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
    }

    #[test]
    fn f_center_even_and_odd() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("-", 3), " - ");
    }

    #[test]
    fn f_center_truncates() {
        assert_eq!(center("abcdefgh", 5), "abc..");
    }

    #[test]
    fn f_wrap_text_words() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn f_wrap_text_long_word() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn f_wrap_text_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn f_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn f_wrap_lines_fit_width() {
        for line in wrap_text("Widget deluxe with extended warranty and 日本語", 7) {
            assert!(display_width(&line) <= 7, "FALSIFIED: {line:?} too wide");
        }
    }
}
