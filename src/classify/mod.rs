//! Lexical categories of structured text.
//!
//! Detectors only need to know which category an offset belongs to, so the
//! scanner is reached through [`ContentClassifier`]. [`LineClassifier`] is a
//! line-based scanner for reStructuredText-flavoured markup used by the CLI
//! and the tests; hosts with their own tokenizer implement the trait directly.

mod fence;

use std::sync::LazyLock;

use regex::Regex;

pub use fence::{FenceTracker, fence_marker};

use crate::line_util::{LineRange, columns, indentation, is_blank, line_ranges, rtrim};

/// Matches source directives whose indented body is code.
static SOURCE_DIRECTIVE_RE: LazyLock<Regex> = lazy_regex!(
    r"^[ \t]*\.\.[ \t]+(?:code-block|code|sourcecode)::",
    "source directive regex should compile",
);

/// Matches grid table borders such as `+----+----+` or `+====+`.
static GRID_BORDER_RE: LazyLock<Regex> = lazy_regex!(
    r"^[ \t]*\+[-=+]+[ \t]*$",
    "grid border regex should compile",
);

/// Content category of a region of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Ordinary paragraphs and list items.
    Text,
    /// Indented block introduced by a paragraph ending in `::`.
    LiteralBlock,
    /// A title together with its underline and optional overline.
    SectionHeading,
    /// Grid table borders and `|` rows.
    Table,
    /// Fenced code or the body of a source directive.
    SourceBlock,
}

impl Category {
    /// Whether blocks of this category may be rewrapped.
    #[must_use]
    pub fn is_reflowable(self) -> bool {
        matches!(self, Self::Text)
    }
}

/// Maps buffer offsets to content categories.
pub trait ContentClassifier {
    fn content_type_at(&self, offset: usize) -> Option<Category>;
}

/// Per-line categories computed from a text snapshot.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    line_starts: Vec<usize>,
    categories: Vec<Category>,
    len: usize,
}

impl LineClassifier {
    /// Scan `text` once and remember the category of every line.
    #[must_use]
    pub fn scan(text: &str) -> Self {
        let ranges = line_ranges(text);
        let lines: Vec<&str> = ranges.iter().map(|r| &text[r.start..r.end]).collect();
        let mut categories = vec![Category::Text; lines.len()];
        let mut fence = FenceTracker::new();
        let mut idx = 0;

        while idx < lines.len() {
            let line = lines[idx];
            if fence.observe(line) || fence.in_fence() {
                categories[idx] = Category::SourceBlock;
                idx += 1;
                continue;
            }
            if is_blank(line) {
                idx += 1;
                continue;
            }

            let indent = columns(indentation(line));
            if SOURCE_DIRECTIVE_RE.is_match(line) {
                let end = indented_body_end(&lines, idx, indent);
                categories[idx..end].fill(Category::SourceBlock);
                idx = end;
                continue;
            }
            if is_table_line(line) {
                categories[idx] = Category::Table;
                idx += 1;
                continue;
            }
            if let Some(end) = heading_end(&lines, idx) {
                categories[idx..end].fill(Category::SectionHeading);
                idx = end;
                continue;
            }
            if rtrim(line).ends_with("::") && lines.get(idx + 1).is_some_and(|l| is_blank(l)) {
                let end = indented_body_end(&lines, idx, indent);
                categories[idx + 1..end].fill(Category::LiteralBlock);
                idx = end.max(idx + 1);
                continue;
            }
            idx += 1;
        }

        Self {
            line_starts: ranges.iter().map(|r: &LineRange| r.start).collect(),
            categories,
            len: text.len(),
        }
    }

    /// Category of a whole line.
    #[must_use]
    pub fn line_category(&self, line: usize) -> Option<Category> {
        self.categories.get(line).copied()
    }
}

impl ContentClassifier for LineClassifier {
    fn content_type_at(&self, offset: usize) -> Option<Category> {
        if offset > self.len {
            return None;
        }
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .checked_sub(1)?;
        self.line_category(line)
    }
}

/// Exclusive end of the block indented deeper than `base` after `idx`.
///
/// Blank lines inside the body belong to it; trailing ones do not.
fn indented_body_end(lines: &[&str], idx: usize, base: usize) -> usize {
    let mut end = idx + 1;
    let mut cursor = idx + 1;
    while let Some(line) = lines.get(cursor) {
        if is_blank(line) {
            cursor += 1;
            continue;
        }
        if columns(indentation(line)) <= base {
            break;
        }
        cursor += 1;
        end = cursor;
    }
    end
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|') || GRID_BORDER_RE.is_match(line)
}

/// A line made of one repeated ASCII punctuation character.
fn is_adornment(line: &str) -> bool {
    if !indentation(line).is_empty() {
        return false;
    }
    let trimmed = rtrim(line);
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_punctuation() && trimmed.len() >= 2 && chars.all(|c| c == first)
}

/// Exclusive end of a section heading starting at `idx`, if one starts there.
fn heading_end(lines: &[&str], idx: usize) -> Option<usize> {
    let line = lines[idx];
    if is_adornment(line) {
        let title = lines.get(idx + 1)?;
        let under = lines.get(idx + 2)?;
        let same_style = rtrim(under) == rtrim(line);
        return (!is_blank(title) && same_style).then_some(idx + 3);
    }
    if !indentation(line).is_empty() {
        return None;
    }
    let under = lines.get(idx + 1)?;
    (is_adornment(under) && columns(rtrim(under)) >= columns(rtrim(line))).then_some(idx + 2)
}

#[cfg(test)]
mod tests;
