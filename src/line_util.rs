//! Stateless line helpers shared by detectors and handlers.
//!
//! Widths are measured per code point with `unicode-width`; grapheme clusters
//! are not considered.

use unicode_width::UnicodeWidthChar;

/// Placeholder for a hard line break while a block is treated as one line.
///
/// A private-use code point. Blocks that already contain it are never
/// reflowed, so every sentinel in a handler's text stands for a line break.
pub const SENTINEL: char = '\u{E000}';

/// True only for the Unicode "space separator" (`Zs`) category.
///
/// Tabs and line breaks are handled separately by the callers.
#[must_use]
pub fn is_horizontal_space(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Whitespace a line may be broken at or trimmed of.
#[inline]
#[must_use]
pub fn is_wrap_space(ch: char) -> bool {
    ch == '\t' || is_horizontal_space(ch)
}

/// Columns occupied by `ch` on a wrapped line.
#[must_use]
pub fn char_columns(ch: char) -> usize {
    match ch {
        SENTINEL => 0,
        '\t' => 1,
        _ => UnicodeWidthChar::width(ch).unwrap_or(0),
    }
}

/// Columns occupied by `text`.
#[must_use]
pub fn columns(text: &str) -> usize {
    text.chars().map(char_columns).sum()
}

/// The longest whitespace prefix of `line`.
#[must_use]
pub fn indentation(line: &str) -> &str {
    &line[..line.len() - ltrim(line).len()]
}

/// Columns of an indentation string, tabs counting `tab_width` columns.
#[must_use]
pub fn indentation_width(indent: &str, tab_width: usize) -> usize {
    indent.chars().fold(0, |acc, ch| {
        acc + if ch == '\t' {
            tab_width
        } else {
            char_columns(ch)
        }
    })
}

#[must_use]
pub fn ltrim(text: &str) -> &str {
    text.trim_start_matches(is_wrap_space)
}

#[must_use]
pub fn rtrim(text: &str) -> &str {
    text.trim_end_matches(is_wrap_space)
}

/// Whether `line` holds nothing that [`ltrim`] would keep.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    ltrim(line).is_empty()
}

/// Byte extent of one line inside a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First byte of the line.
    pub start: usize,
    /// End of the content, before the delimiter.
    pub end: usize,
    /// Start of the following line (`end` plus the delimiter length).
    pub next: usize,
}

/// Split `text` at `\n`, `\r\n` and `\r`.
///
/// Always yields at least one line; a trailing delimiter yields a final empty
/// line, matching how editors count lines.
#[must_use]
pub fn line_ranges(text: &str) -> Vec<LineRange> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        let delimiter = match bytes[idx] {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            _ => {
                idx += 1;
                continue;
            }
        };
        lines.push(LineRange {
            start,
            end: idx,
            next: idx + delimiter,
        });
        idx += delimiter;
        start = idx;
    }
    lines.push(LineRange {
        start,
        end: text.len(),
        next: text.len(),
    });
    lines
}

/// Find where the line starting at `search_from` should end.
///
/// Returns `text.len()` when the rest fits into `max_width` columns. Otherwise
/// the scan remembers the last whitespace after `search_from` and returns it
/// once `max_width` columns have been passed. A word longer than the limit is
/// not split: the break then lands on the next whitespace, or the end of the
/// text when none follows.
///
/// Returns `None` when `search_from` is past the end or inside a character.
///
/// # Examples
///
/// ```
/// use hardwrap::line_util::line_break_position;
///
/// assert_eq!(line_break_position("aaaa bbbb", 0, 4), Some(4));
/// assert_eq!(line_break_position("aaaa bbbb", 0, 9), Some(9));
/// assert_eq!(line_break_position("aaaaaaaa bb", 0, 4), Some(8));
/// ```
#[must_use]
pub fn line_break_position(text: &str, search_from: usize, max_width: usize) -> Option<usize> {
    let rest = text.get(search_from..)?;
    if columns(rest) <= max_width {
        return Some(text.len());
    }

    let mut last_space = None;
    let mut width = 0;
    for (idx, ch) in rest.char_indices() {
        if idx > 0 && is_wrap_space(ch) {
            if width > max_width {
                return Some(search_from + idx);
            }
            last_space = Some(search_from + idx);
        }
        width += char_columns(ch);
        if width > max_width && last_space.is_some() {
            return last_space;
        }
    }
    Some(text.len())
}
