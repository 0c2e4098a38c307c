//! Value types exchanged between the engine, detectors and handlers.

use std::ops::Range;

use crate::buffer::TextBuffer;

/// A contiguous run of lines and the bytes they occupy.
///
/// `offset` and `length` are derived from the line range against the buffer
/// as it is before the pending edit; they are stale as soon as the buffer
/// changes. `length` stops before the delimiter of `last_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub offset: usize,
    pub length: usize,
    pub first_line: usize,
    pub last_line: usize,
}

impl BlockSpan {
    /// Resolve the byte extent of `first_line..=last_line`.
    ///
    /// Returns `None` when either line is outside the buffer or the range is
    /// reversed.
    #[must_use]
    pub fn from_lines(buffer: &dyn TextBuffer, first_line: usize, last_line: usize) -> Option<Self> {
        if first_line > last_line {
            return None;
        }
        let offset = buffer.line_offset(first_line)?;
        let last_start = buffer.line_offset(last_line)?;
        let end = last_start + buffer.line_text(last_line)?.len();
        Some(Self {
            offset,
            length: end - offset,
            first_line,
            last_line,
        })
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Whether the span includes every line of `first..=last`.
    #[must_use]
    pub fn covers_lines(&self, first: usize, last: usize) -> bool {
        self.first_line <= first && last <= self.last_line
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.last_line - self.first_line + 1
    }
}

/// One buffer mutation as presented to the engine before it is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub offset: usize,
    pub deleted_length: usize,
    pub inserted_text: String,
}

impl PendingEdit {
    pub fn new(offset: usize, deleted_length: usize, inserted_text: impl Into<String>) -> Self {
        Self {
            offset,
            deleted_length,
            inserted_text: inserted_text.into(),
        }
    }

    /// Typing or pasting at `offset` without removing anything.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    /// Removing `length` bytes at `offset`.
    #[must_use]
    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, String::new())
    }

    /// An edit that changes nothing; used to rewrap a block in place.
    #[must_use]
    pub fn noop(offset: usize) -> Self {
        Self::new(offset, 0, String::new())
    }

    /// End of the replaced range in pre-edit coordinates.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.deleted_length)
    }

    #[must_use]
    pub fn range(&self) -> Option<Range<usize>> {
        self.end().map(|end| self.offset..end)
    }

    #[must_use]
    pub fn is_pure_insertion(&self) -> bool {
        self.deleted_length == 0
    }

    /// The caret reference handed to a handler before the edit is applied.
    ///
    /// A pure insertion anchors the caret at the edit point; applying the edit
    /// then moves it past the typed text. A replacement anchors it at the end
    /// of the replaced range, which the edit maps onto
    /// `offset + inserted_text.len()`, so the caret follows what was
    /// inserted.
    #[must_use]
    pub fn caret_reference(&self) -> usize {
        if self.is_pure_insertion() {
            self.offset
        } else {
            self.offset.saturating_add(self.deleted_length)
        }
    }

    /// Where the caret sits once the edit is committed, before any rewrap.
    #[must_use]
    pub fn caret_after(&self) -> usize {
        self.offset + self.inserted_text.len()
    }

    /// Re-express the edit relative to a block starting at `base`.
    #[must_use]
    pub fn relative_to(&self, base: usize) -> Option<Self> {
        Some(Self {
            offset: self.offset.checked_sub(base)?,
            deleted_length: self.deleted_length,
            inserted_text: self.inserted_text.clone(),
        })
    }
}

/// What a successful reflow changed, for callers that keep line-indexed
/// state such as folding markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapResult {
    pub detector_type: &'static str,
    pub handler_type: &'static str,
    pub first_line_before: usize,
    pub last_line_before: usize,
    pub last_line_after: usize,
    /// Caret position after the rewrite.
    pub caret_offset: usize,
    /// Bytes that were replaced, in pre-edit coordinates.
    pub replaced: Range<usize>,
}
