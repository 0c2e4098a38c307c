//! List item detection.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{BlockDetector, indent_of, is_text_line};
use crate::{
    buffer::TextBuffer,
    classify::ContentClassifier,
    config::DEFAULT_TAB_WIDTH,
    handler::LIST_HANDLER_TYPE,
    line_util::{indentation_width, is_blank},
    span::BlockSpan,
};

/// Bullet markers: `*`, `-`, `+`, auto-numbered `#`/`#.` and `1.`/`1)`.
static BULLET_RE: LazyLock<Regex> = lazy_regex!(
    r"^([ \t]*)((?:[-*+]|#\.?|\d{1,9}[.)])[ \t]+)(.*)$",
    "bullet pattern regex should compile",
);

/// The parts of a list item's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet<'a> {
    pub indent: &'a str,
    /// Marker including the whitespace after it, e.g. `"* "` or `"10. "`.
    pub marker: &'a str,
    pub text: &'a str,
}

impl Bullet<'_> {
    /// Bytes taken by indentation and marker.
    #[must_use]
    pub fn prefix_len(&self) -> usize {
        self.indent.len() + self.marker.len()
    }

    /// Column where the item's text starts; continuation lines align here.
    #[must_use]
    pub fn text_column(&self, tab_width: usize) -> usize {
        indentation_width(self.indent, tab_width) + indentation_width(self.marker, tab_width)
    }
}

/// Split `line` into indentation, bullet marker and text.
///
/// ```
/// use hardwrap::detect::parse_bullet;
///
/// let bullet = parse_bullet("  - item").expect("bullet");
/// assert_eq!((bullet.indent, bullet.marker, bullet.text), ("  ", "- ", "item"));
/// assert!(parse_bullet("-not a bullet").is_none());
/// ```
#[must_use]
pub fn parse_bullet(line: &str) -> Option<Bullet<'_>> {
    let cap = BULLET_RE.captures(line)?;
    Some(Bullet {
        indent: cap.get(1)?.as_str(),
        marker: cap.get(2)?.as_str(),
        text: cap.get(3)?.as_str(),
    })
}

/// Claims the lines of one list item: its bullet line plus continuation
/// lines up to the next item, a blank line or a dedent.
#[derive(Debug, Clone, Copy)]
pub struct ListBlockDetector {
    tab_width: usize,
}

impl Default for ListBlockDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl ListBlockDetector {
    pub const PRIORITY: i32 = 10;

    #[must_use]
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    /// Walk upward to the bullet line that owns `base_line`.
    fn find_item_start(
        &self,
        buffer: &dyn TextBuffer,
        base_line: usize,
        base_indent: usize,
        classifier: Option<&dyn ContentClassifier>,
    ) -> Option<usize> {
        let mut line = base_line;
        loop {
            let text = buffer.line_text(line)?;
            if is_blank(&text) || !is_text_line(buffer, classifier, line) {
                return None;
            }
            let indent = indent_of(&text, self.tab_width);
            if indent > base_indent {
                // A nested block sits between us and any bullet above.
                return None;
            }
            if parse_bullet(&text).is_some() {
                return Some(line);
            }
            if indent < base_indent {
                return None;
            }
            line = line.checked_sub(1)?;
        }
    }

    /// Walk downward over continuation lines.
    ///
    /// Starts at `base_last_line`; the lines an edit spans are claimed even
    /// when one of them opens another item, so deleting across a bullet joins
    /// the two items.
    fn find_item_end(
        &self,
        buffer: &dyn TextBuffer,
        base_last_line: usize,
        base_indent: usize,
        classifier: Option<&dyn ContentClassifier>,
    ) -> usize {
        let mut last = base_last_line;
        while last + 1 < buffer.line_count() {
            let next = last + 1;
            let Some(text) = buffer.line_text(next) else {
                break;
            };
            if is_blank(&text)
                || parse_bullet(&text).is_some()
                || indent_of(&text, self.tab_width) < base_indent
                || !is_text_line(buffer, classifier, next)
            {
                break;
            }
            last = next;
        }
        last
    }
}

impl BlockDetector for ListBlockDetector {
    fn detector_type(&self) -> &'static str {
        "list"
    }

    fn handler_type(&self) -> &'static str {
        LIST_HANDLER_TYPE
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn find_block(
        &self,
        buffer: &dyn TextBuffer,
        base_first_line: usize,
        base_last_line: usize,
        classifier: Option<&dyn ContentClassifier>,
    ) -> Option<BlockSpan> {
        let base = buffer.line_text(base_first_line)?;
        if is_blank(&base) {
            return None;
        }
        let base_indent = indent_of(&base, self.tab_width);
        let Some(first) = self.find_item_start(buffer, base_first_line, base_indent, classifier)
        else {
            trace!(line = base_first_line, "no bullet above base line");
            return None;
        };
        let last = self.find_item_end(
            buffer,
            base_last_line.max(base_first_line),
            base_indent,
            classifier,
        );
        BlockSpan::from_lines(buffer, first, last)
    }
}
