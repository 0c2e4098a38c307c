//! Text buffer abstraction the engine edits through.
//!
//! All offsets are UTF-8 byte offsets. Lines are zero-based and end at `\n`,
//! `\r\n` or `\r`; a buffer ending in a delimiter has a final empty line.

use std::ops::Range;

use ropey::Rope;

use crate::error::ReflowError;

/// The buffer operations a host editor must supply.
pub trait TextBuffer {
    /// Total length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn line_count(&self) -> usize;

    /// Line containing `offset`; `len()` maps to the last line.
    fn line_of_offset(&self, offset: usize) -> Option<usize>;

    /// Byte offset where `line` starts.
    fn line_offset(&self, line: usize) -> Option<usize>;

    /// Text of `line` without its delimiter.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Text of a byte range; `None` when the range is out of bounds or splits
    /// a character.
    fn text_range(&self, range: Range<usize>) -> Option<String>;

    /// Delimiter used for lines the engine creates.
    fn line_delimiter(&self) -> &str;

    /// Replace a byte range atomically.
    ///
    /// # Errors
    /// Returns [`ReflowError::InvalidRange`] when the range does not resolve;
    /// the buffer is left untouched in that case.
    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), ReflowError>;
}

/// Rope-backed buffer for local editing.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    delimiter: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document, adopting the first delimiter found in `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            delimiter: detect_delimiter(text).to_string(),
        }
    }

    /// Override the delimiter used for new lines.
    #[must_use]
    pub fn with_line_delimiter(mut self, delimiter: &str) -> Self {
        delimiter.clone_into(&mut self.delimiter);
        self
    }

    /// The whole document as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char index for a byte offset that sits on a character boundary.
    fn char_index(&self, byte: usize) -> Option<usize> {
        if byte > self.rope.len_bytes() {
            return None;
        }
        let idx = self.rope.byte_to_char(byte);
        (self.rope.char_to_byte(idx) == byte).then_some(idx)
    }

    fn char_range(&self, range: &Range<usize>) -> Option<Range<usize>> {
        if range.start > range.end {
            return None;
        }
        Some(self.char_index(range.start)?..self.char_index(range.end)?)
    }
}

impl TextBuffer for Document {
    fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_of_offset(&self, offset: usize) -> Option<usize> {
        (offset <= self.rope.len_bytes()).then(|| self.rope.byte_to_line(offset))
    }

    fn line_offset(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_byte(line))
    }

    fn line_text(&self, line: usize) -> Option<String> {
        let mut text = self.rope.get_line(line)?.to_string();
        let content = strip_delimiter(&text).len();
        text.truncate(content);
        Some(text)
    }

    fn text_range(&self, range: Range<usize>) -> Option<String> {
        let chars = self.char_range(&range)?;
        Some(self.rope.slice(chars).to_string())
    }

    fn line_delimiter(&self) -> &str {
        &self.delimiter
    }

    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), ReflowError> {
        let chars = self.char_range(&range).ok_or(ReflowError::InvalidRange {
            start: range.start,
            end: range.end,
        })?;
        let start = chars.start;
        self.rope.remove(chars);
        self.rope.insert(start, text);
        Ok(())
    }
}

/// First delimiter appearing in `text`, `\n` when there is none.
#[must_use]
pub fn detect_delimiter(text: &str) -> &'static str {
    match text.find(['\r', '\n']) {
        Some(idx) if text[idx..].starts_with("\r\n") => "\r\n",
        Some(idx) if text[idx..].starts_with('\r') => "\r",
        _ => "\n",
    }
}

fn strip_delimiter(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}
