//! The text transformations a handler runs, as pure functions.
//!
//! Every step takes block-local text together with an optional reference
//! offset and returns the new text with the reference moved to the same
//! logical position. Offsets are bytes relative to the block start.

use std::borrow::Cow;

use crate::{
    error::ReflowError,
    line_util::{SENTINEL, is_blank, line_break_position, line_ranges, ltrim, rtrim},
    span::PendingEdit,
};

/// Output of one transformation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub reference: Option<usize>,
}

/// Indentation and width used to lay out a single line.
#[derive(Debug, Clone, Copy)]
pub struct WrapShape<'a> {
    /// Prefix of the first output line.
    pub first_indent: &'a str,
    /// Prefix of every continuation line.
    pub indent: &'a str,
    /// Columns available after the prefix.
    pub width: usize,
    pub delimiter: &'a str,
}

/// Replace every run of line breaks with a single [`SENTINEL`].
///
/// ```
/// use hardwrap::handler::transform::collapse_line_breaks;
///
/// assert_eq!(collapse_line_breaks("a\r\n\nb"), "a\u{E000}b");
/// assert_eq!(collapse_line_breaks("plain"), "plain");
/// ```
#[must_use]
pub fn collapse_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + SENTINEL.len_utf8());
    let mut in_break = false;
    for ch in text.chars() {
        if matches!(ch, '\r' | '\n') {
            if !in_break {
                out.push(SENTINEL);
            }
            in_break = true;
        } else {
            out.push(ch);
            in_break = false;
        }
    }
    Cow::Owned(out)
}

/// Splice a block-local edit into `text`.
///
/// References before the edit stay put; any other reference ends up right
/// after the inserted text or shifts by the size difference.
///
/// # Errors
/// Returns [`ReflowError::EditOutsideBlock`] when the edited range does not
/// lie inside `text` on character boundaries.
pub fn apply_edit(
    text: &str,
    reference: Option<usize>,
    edit: &PendingEdit,
) -> Result<Transformed, ReflowError> {
    let outside = || ReflowError::EditOutsideBlock {
        offset: edit.offset,
        deleted: edit.deleted_length,
    };
    let range = edit.range().ok_or_else(outside)?;
    if range.end > text.len()
        || !text.is_char_boundary(range.start)
        || !text.is_char_boundary(range.end)
    {
        return Err(outside());
    }

    let inserted = collapse_line_breaks(&edit.inserted_text);
    let mut out = String::with_capacity(text.len() - range.len() + inserted.len());
    out.push_str(&text[..range.start]);
    out.push_str(&inserted);
    out.push_str(&text[range.end..]);

    let reference = reference.map(|r| {
        if r < range.start {
            r
        } else if r >= range.end {
            r - range.len() + inserted.len()
        } else {
            range.start + inserted.len()
        }
    });
    Ok(Transformed {
        text: out,
        reference,
    })
}

/// Join the lines of `text` into one line.
///
/// Indentation is stripped from every line after the first, trailing
/// whitespace is trimmed at each join and exactly one space is inserted
/// there. Blank lines vanish. Trailing whitespace of the final line is kept.
#[must_use]
pub fn convert_to_single_line(text: &str, reference: Option<usize>) -> Transformed {
    let ranges = line_ranges(text);
    let last = ranges.len() - 1;
    let mut out = String::with_capacity(text.len());
    let mut mapped = None;

    for (idx, range) in ranges.iter().enumerate() {
        let owned = reference.filter(|&r| r >= range.start && (r < range.next || idx == last));
        let line = &text[range.start..range.end];
        if is_blank(line) {
            if owned.is_some() {
                mapped = Some(out.len());
            }
            continue;
        }

        if !out.is_empty() {
            let trimmed = rtrim(&out).len();
            out.truncate(trimmed);
            // A caret in trimmed whitespace stays after the joining space.
            mapped = mapped.map(|m: usize| if m > trimmed { trimmed + 1 } else { m });
            out.push(' ');
        }

        let content = if idx == 0 { line } else { ltrim(line) };
        let lead = line.len() - content.len();
        if let Some(r) = owned {
            mapped = Some(out.len() + (r - range.start).saturating_sub(lead).min(content.len()));
        }
        out.push_str(content);
    }

    Transformed {
        text: out,
        reference: mapped,
    }
}

/// Break a single line into lines of at most `shape.width` columns.
///
/// Segments are separated by `shape.delimiter`, trimmed at the break and
/// prefixed with the indentation. A [`SENTINEL`] ends its segment and takes
/// the place of the whitespace before it. A word wider than the limit keeps
/// a line of its own.
#[must_use]
pub fn wrap_single_line(line: &str, reference: Option<usize>, shape: WrapShape<'_>) -> Transformed {
    if ltrim(line).is_empty() {
        return Transformed {
            text: format!("{}{line}", shape.first_indent),
            reference: reference.map(|r| shape.first_indent.len() + r.min(line.len())),
        };
    }

    let mut out = String::with_capacity(line.len() + shape.first_indent.len());
    let mut mapped = None;
    let mut pos = 0;
    let mut first = true;

    while pos < line.len() {
        let start = line.len() - ltrim(&line[pos..]).len();
        let mut brk = line_break_position(line, start, shape.width).unwrap_or(line.len());
        let forced = line[start..brk].find(SENTINEL);
        if let Some(idx) = forced {
            brk = start + idx + SENTINEL.len_utf8();
        }
        if ltrim(&line[brk..]).is_empty() {
            brk = line.len();
        }
        let is_last = brk == line.len();
        // `tail` holds the sentinel of a forced break and anything after it.
        let (body, tail) = match forced {
            Some(idx) => (rtrim(&line[start..start + idx]), &line[start + idx..brk]),
            None if is_last => (&line[start..brk], ""),
            None => (rtrim(&line[start..brk]), ""),
        };

        let indent = if first { shape.first_indent } else { shape.indent };
        if !first {
            out.push_str(shape.delimiter);
        }
        if !(body.is_empty() && is_blank(indent)) {
            out.push_str(indent);
        }
        // A caret at a soft break stays at the end of the line.
        if mapped.is_none()
            && let Some(r) =
                reference.filter(|&r| r < brk || is_last || (r == brk && forced.is_none()))
        {
            let rel = r.saturating_sub(start);
            mapped = Some(
                out.len()
                    + match forced {
                        Some(idx) if rel >= idx => body.len() + (rel - idx).min(tail.len()),
                        _ => rel.min(body.len()),
                    },
            );
        }
        out.push_str(body);
        out.push_str(tail);

        first = false;
        pos = brk;
    }

    Transformed {
        text: out,
        reference: mapped,
    }
}

/// Expand every [`SENTINEL`] into line delimiters so that one blank line
/// separates the text around it.
///
/// A sentinel already followed by `delimiter` becomes one delimiter; any
/// other sentinel becomes two.
#[must_use]
pub fn replace_internal_sentinels(
    text: &str,
    reference: Option<usize>,
    delimiter: &str,
) -> Transformed {
    if !text.contains(SENTINEL) {
        return Transformed {
            text: text.to_owned(),
            reference,
        };
    }

    let mut out = String::with_capacity(text.len() + 2 * delimiter.len());
    let mut added = 0;
    let mut removed = 0;
    let mut rest = text;
    let mut consumed = 0;
    while let Some(idx) = rest.find(SENTINEL) {
        out.push_str(&rest[..idx]);
        let after = idx + SENTINEL.len_utf8();
        let copies = if rest[after..].starts_with(delimiter) { 1 } else { 2 };
        for _ in 0..copies {
            out.push_str(delimiter);
        }
        if reference.is_some_and(|r| consumed + after <= r) {
            added += copies * delimiter.len();
            removed += SENTINEL.len_utf8();
        }
        consumed += after;
        rest = &rest[after..];
    }
    out.push_str(rest);

    Transformed {
        text: out,
        reference: reference.map(|r| r + added - removed),
    }
}

/// Steps 3 to 5 of the pipeline: join, wrap, expand sentinels.
#[must_use]
pub fn reflow(text: &str, reference: Option<usize>, shape: WrapShape<'_>) -> Transformed {
    let single = convert_to_single_line(text, reference);
    let wrapped = wrap_single_line(&single.text, single.reference, shape);
    replace_internal_sentinels(&wrapped.text, wrapped.reference, shape.delimiter)
}
