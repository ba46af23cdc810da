//! Grapheme width, visible width, truncation and wrapping.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::ansi::ansi_len_at;

const TAB_WIDTH: usize = 3;
const ANSI_RESET: &str = "\x1b[0m";

pub fn grapheme_segments(text: &str) -> unicode_segmentation::Graphemes<'_> {
    UnicodeSegmentation::graphemes(text, true)
}

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme == "\t" {
        return TAB_WIDTH;
    }
    UnicodeWidthStr::width(grapheme)
}

/// Display width of `input`, ignoring ANSI escape sequences.
pub fn visible_width(input: &str) -> usize {
    let mut width = 0;
    for_each_segment(input, |segment| {
        if let Segment::Grapheme(grapheme) = segment {
            width += grapheme_width(grapheme);
        }
    });
    width
}

/// Truncate to at most `max_width` columns, appending `ellipsis` when cut.
///
/// Escape sequences before the cut are kept and a reset is emitted before the
/// ellipsis so styles do not leak.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let target_width = max_width.saturating_sub(visible_width(ellipsis));
    if target_width == 0 {
        return ellipsis.chars().take(max_width).collect();
    }

    let mut truncated = String::new();
    let mut current_width = 0;
    let mut done = false;
    for_each_segment(text, |segment| match segment {
        Segment::Ansi(code) => {
            if !done {
                truncated.push_str(code);
            }
        }
        Segment::Grapheme(grapheme) => {
            if done {
                return;
            }
            let width = grapheme_width(grapheme);
            if current_width + width > target_width {
                done = true;
                return;
            }
            truncated.push_str(grapheme);
            current_width += width;
        }
    });

    truncated.push_str(ANSI_RESET);
    truncated.push_str(ellipsis);
    truncated
}

/// Right-pad with spaces up to `width` columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = visible_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - current))
}

/// Greedy word wrap of plain text. Words longer than `width` are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = visible_width(word);
            if line_width > 0 && line_width + 1 + word_width <= width {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
                continue;
            }
            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }
            for grapheme in grapheme_segments(word) {
                let g_width = grapheme_width(grapheme);
                if line_width + g_width > width && line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += g_width;
            }
        }
        lines.push(line);
    }
    lines
}

enum Segment<'a> {
    Ansi(&'a str),
    Grapheme(&'a str),
}

fn for_each_segment<'a>(input: &'a str, mut f: impl FnMut(Segment<'a>)) {
    let mut idx = 0;
    while idx < input.len() {
        if let Some(len) = ansi_len_at(input, idx) {
            f(Segment::Ansi(&input[idx..idx + len]));
            idx += len;
            continue;
        }
        let end = next_ansi_or_end(input, idx);
        for grapheme in grapheme_segments(&input[idx..end]) {
            f(Segment::Grapheme(grapheme));
        }
        idx = end;
    }
}

fn next_ansi_or_end(input: &str, mut idx: usize) -> usize {
    while idx < input.len() {
        if ansi_len_at(input, idx).is_some() {
            break;
        }
        match input[idx..].chars().next() {
            Some(ch) => idx += ch.len_utf8(),
            None => break,
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::{pad_to_width, truncate_to_width, visible_width, wrap_words};

    #[test]
    fn ansi_ignored_in_width() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
        assert_eq!(visible_width("日本"), 4);
    }

    #[test]
    fn truncate_returns_original_when_shorter() {
        assert_eq!(truncate_to_width("hello", 6, "..."), "hello");
    }

    #[test]
    fn truncate_adds_ellipsis_and_reset() {
        let truncated = truncate_to_width("hello", 4, "...");
        assert_eq!(truncated, "h\x1b[0m...");
        assert_eq!(visible_width(&truncated), 4);
    }

    #[test]
    fn truncate_handles_small_max_width() {
        assert_eq!(truncate_to_width("hello", 2, "..."), "..");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn wrap_breaks_on_words_and_long_tokens() {
        assert_eq!(wrap_words("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_words("a\n\nb", 5), vec!["a", "", "b"]);
    }
}
