//! Paragraph handler.

use tracing::trace;

use super::{BlockContent, DEFAULT_HANDLER_TYPE, WrapLayout, WrappingHandler, first_line};
use crate::{
    buffer::TextBuffer,
    error::ReflowError,
    line_util::{indentation, indentation_width, is_blank, line_ranges},
    span::{BlockSpan, PendingEdit},
};

/// Rewraps a paragraph, repeating its first line's indentation on every
/// output line.
#[derive(Debug, Clone, Default)]
pub struct DefaultWrappingHandler {
    block: Option<BlockContent>,
}

impl DefaultWrappingHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn block_mut(&mut self) -> Result<&mut BlockContent, ReflowError> {
        self.block
            .as_mut()
            .ok_or(ReflowError::HandlerNotReady(DEFAULT_HANDLER_TYPE))
    }
}

/// Indentation of the first non-blank line of `text`.
fn block_indent(text: &str) -> &str {
    line_ranges(text)
        .into_iter()
        .map(|r| &text[r.start..r.end])
        .find(|line| !is_blank(line))
        .map_or("", indentation)
}

impl WrappingHandler for DefaultWrappingHandler {
    fn handler_type(&self) -> &'static str {
        DEFAULT_HANDLER_TYPE
    }

    fn setup(
        &mut self,
        buffer: &dyn TextBuffer,
        span: &BlockSpan,
        reference: usize,
    ) -> Result<(), ReflowError> {
        self.block = None;
        let block = BlockContent::capture(buffer, span, reference)?;
        trace!(lines = span.line_count(), "paragraph captured");
        self.block = Some(block);
        Ok(())
    }

    fn apply_edit(&mut self, edit: &PendingEdit) -> Result<(), ReflowError> {
        self.block_mut()?.apply_edit(edit)
    }

    fn wrap(&mut self, layout: WrapLayout) -> Result<String, ReflowError> {
        let block = self.block_mut()?;
        // Indentation comes from the edited text; the first line keeps its
        // own verbatim.
        let indent = block_indent(&block.text).to_owned();
        let prefix_len = if is_blank(first_line(&block.text)) {
            0
        } else {
            indent.len()
        };
        let first_indent = if prefix_len == 0 { indent.as_str() } else { "" };
        let width = layout.available(indentation_width(&indent, layout.tab_width));
        trace!(indent = indent.len(), width, "paragraph indent");
        Ok(block.reflow_after(prefix_len, first_indent, &indent, width))
    }

    fn reference_offset(&self) -> Option<usize> {
        self.block.as_ref()?.absolute_reference()
    }
}
