//! Block detection: which lines form the paragraph being edited.
//!
//! Each detector scans outward from the edited lines while a similarity
//! predicate holds. Several detectors may claim the same region; the engine
//! keeps the one with the lowest [`BlockDetector::priority`].

mod default;
mod list;

pub use default::DefaultBlockDetector;
pub use list::{Bullet, ListBlockDetector, parse_bullet};

use crate::{
    buffer::TextBuffer,
    classify::{Category, ContentClassifier},
    line_util::{indentation, indentation_width},
    span::BlockSpan,
};

/// Finds the extent of the block enclosing a range of lines.
pub trait BlockDetector: Send + Sync {
    /// Name used in logs and [`WrapResult`](crate::span::WrapResult).
    fn detector_type(&self) -> &'static str;

    /// Registry key of the handler that wraps blocks found by this detector.
    fn handler_type(&self) -> &'static str;

    /// Lower values win when several detectors match.
    fn priority(&self) -> i32;

    /// Find the block containing `base_first_line..=base_last_line`.
    fn find_block(
        &self,
        buffer: &dyn TextBuffer,
        base_first_line: usize,
        base_last_line: usize,
        classifier: Option<&dyn ContentClassifier>,
    ) -> Option<BlockSpan>;
}

impl std::fmt::Debug for dyn BlockDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDetector")
            .field("type", &self.detector_type())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Walking direction of a block scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
}

/// Walk from `start` while `similar` accepts the next line; returns the last
/// accepted line.
pub(crate) fn walk(
    buffer: &dyn TextBuffer,
    start: usize,
    direction: Direction,
    mut similar: impl FnMut(usize) -> bool,
) -> usize {
    let mut current = start;
    loop {
        let next = match direction {
            Direction::Up => current.checked_sub(1),
            Direction::Down => Some(current + 1).filter(|&n| n < buffer.line_count()),
        };
        match next {
            Some(line) if similar(line) => current = line,
            _ => return current,
        }
    }
}

/// Indentation width of `line`.
pub(crate) fn indent_of(line: &str, tab_width: usize) -> usize {
    indentation_width(indentation(line), tab_width)
}

/// Category of `line`, looked up at its first non-blank character.
pub(crate) fn line_category(
    buffer: &dyn TextBuffer,
    classifier: &dyn ContentClassifier,
    line: usize,
) -> Option<Category> {
    let text = buffer.line_text(line)?;
    let offset = buffer.line_offset(line)? + indentation(&text).len();
    classifier.content_type_at(offset)
}

/// Whether `line` is reflowable text, treating a missing classifier as yes.
pub(crate) fn is_text_line(
    buffer: &dyn TextBuffer,
    classifier: Option<&dyn ContentClassifier>,
    line: usize,
) -> bool {
    classifier.is_none_or(|c| line_category(buffer, c, line).is_some_and(Category::is_reflowable))
}
