//! Wrapping handlers: rewrite a detected block to the configured width.
//!
//! A handler is driven in a fixed order for each keystroke:
//! [`setup`](WrappingHandler::setup), [`apply_edit`](WrappingHandler::apply_edit)
//! and [`wrap`](WrappingHandler::wrap). The steps themselves live in
//! [`transform`] as pure functions; handlers decide how indentation and
//! bullets frame them.

mod default;
mod list;
pub mod transform;

pub use default::DefaultWrappingHandler;
pub use list::ListWrappingHandler;

use self::transform::WrapShape;
use crate::{
    buffer::TextBuffer,
    error::ReflowError,
    line_util::SENTINEL,
    span::{BlockSpan, PendingEdit},
};

/// Registry key of [`DefaultWrappingHandler`].
pub const DEFAULT_HANDLER_TYPE: &str = "default";

/// Registry key of [`ListWrappingHandler`].
pub const LIST_HANDLER_TYPE: &str = "list";

/// Width settings for one [`WrappingHandler::wrap`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapLayout {
    pub max_width: usize,
    pub tab_width: usize,
}

impl WrapLayout {
    /// Columns left for text after an indentation of `indent_columns`.
    ///
    /// Never zero, so a deep indentation still makes progress one word per
    /// line.
    #[must_use]
    pub fn available(&self, indent_columns: usize) -> usize {
        self.max_width.saturating_sub(indent_columns).max(1)
    }
}

/// Rewrites one block at a time.
///
/// Implementations keep per-invocation state between the steps, so one
/// instance must not serve two blocks at once.
pub trait WrappingHandler: Send {
    /// Key under which the handler is registered.
    fn handler_type(&self) -> &'static str;

    /// Snapshot the block text and the caret reference.
    ///
    /// # Errors
    /// [`ReflowError::StaleSpan`] when `span` does not match `buffer`; list
    /// handlers also reject blocks without a bullet.
    fn setup(
        &mut self,
        buffer: &dyn TextBuffer,
        span: &BlockSpan,
        reference: usize,
    ) -> Result<(), ReflowError>;

    /// Splice the pending edit into the snapshot.
    ///
    /// # Errors
    /// [`ReflowError::EditOutsideBlock`] when the edit leaves the block and
    /// [`ReflowError::HandlerNotReady`] before `setup`.
    fn apply_edit(&mut self, edit: &PendingEdit) -> Result<(), ReflowError>;

    /// Join, rewrap and expand paragraph breaks; returns the replacement
    /// text for the whole span.
    ///
    /// # Errors
    /// [`ReflowError::HandlerNotReady`] before `setup`.
    fn wrap(&mut self, layout: WrapLayout) -> Result<String, ReflowError>;

    /// Caret position in buffer coordinates after the last step.
    fn reference_offset(&self) -> Option<usize>;
}

/// Block text and caret reference shared by the handler implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContent {
    pub span: BlockSpan,
    pub text: String,
    pub delimiter: String,
    /// Caret reference relative to `span.offset`.
    pub reference: Option<usize>,
}

impl BlockContent {
    /// Read the block text for `span` from `buffer`.
    ///
    /// # Errors
    /// Returns [`ReflowError::StaleSpan`] when the span boundaries no longer
    /// line up with the buffer's lines and [`ReflowError::ReservedCharacter`]
    /// when the block already contains [`SENTINEL`].
    pub fn capture(
        buffer: &dyn TextBuffer,
        span: &BlockSpan,
        reference: usize,
    ) -> Result<Self, ReflowError> {
        let stale = || ReflowError::StaleSpan {
            offset: span.offset,
            end: span.end(),
        };
        let last_end = buffer
            .line_offset(span.last_line)
            .zip(buffer.line_text(span.last_line))
            .map(|(start, text)| start + text.len());
        if buffer.line_offset(span.first_line) != Some(span.offset) || last_end != Some(span.end()) {
            return Err(stale());
        }
        let text = buffer.text_range(span.range()).ok_or_else(stale)?;
        if let Some(idx) = text.find(SENTINEL) {
            return Err(ReflowError::ReservedCharacter {
                offset: span.offset + idx,
            });
        }
        let reference = reference
            .checked_sub(span.offset)
            .filter(|&r| r <= text.len());
        Ok(Self {
            span: *span,
            text,
            delimiter: buffer.line_delimiter().to_owned(),
            reference,
        })
    }

    /// Apply an edit given in buffer coordinates.
    ///
    /// # Errors
    /// Returns [`ReflowError::EditOutsideBlock`] when the edit does not fit
    /// and [`ReflowError::ReservedCharacter`] when it inserts [`SENTINEL`].
    pub fn apply_edit(&mut self, edit: &PendingEdit) -> Result<(), ReflowError> {
        if let Some(idx) = edit.inserted_text.find(SENTINEL) {
            return Err(ReflowError::ReservedCharacter {
                offset: edit.offset + idx,
            });
        }
        let outside = || ReflowError::EditOutsideBlock {
            offset: edit.offset,
            deleted: edit.deleted_length,
        };
        let local = edit.relative_to(self.span.offset).ok_or_else(outside)?;
        let edited = transform::apply_edit(&self.text, self.reference, &local)
            .map_err(|_| outside())?;
        self.text = edited.text;
        self.reference = edited.reference;
        Ok(())
    }

    /// Keep the first `prefix_len` bytes verbatim and reflow the rest.
    ///
    /// A reference inside the prefix stays where it is. Returns the new block
    /// text, which also replaces the snapshot.
    pub fn reflow_after(
        &mut self,
        prefix_len: usize,
        first_indent: &str,
        indent: &str,
        width: usize,
    ) -> String {
        let in_prefix = self.reference.filter(|&r| r < prefix_len);
        let body_reference = self
            .reference
            .filter(|&r| r >= prefix_len)
            .map(|r| r - prefix_len);
        let shape = WrapShape {
            first_indent,
            indent,
            width,
            delimiter: &self.delimiter,
        };
        let body = transform::reflow(&self.text[prefix_len..], body_reference, shape);

        let mut text = String::with_capacity(prefix_len + body.text.len());
        text.push_str(&self.text[..prefix_len]);
        text.push_str(&body.text);
        self.reference = in_prefix.or(body.reference.map(|r| r + prefix_len));
        self.text.clone_from(&text);
        text
    }

    /// The reference in buffer coordinates.
    #[must_use]
    pub fn absolute_reference(&self) -> Option<usize> {
        self.reference.map(|r| self.span.offset + r)
    }
}

/// The first line of `text`, without its delimiter.
fn first_line(text: &str) -> &str {
    text.find(['\r', '\n']).map_or(text, |end| &text[..end])
}

#[cfg(test)]
mod tests;
