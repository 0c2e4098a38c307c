//! List item handler.

use tracing::trace;

use super::{BlockContent, LIST_HANDLER_TYPE, WrapLayout, WrappingHandler, first_line};
use crate::{
    buffer::TextBuffer,
    detect::parse_bullet,
    error::ReflowError,
    span::{BlockSpan, PendingEdit},
};

/// Rewraps a list item, keeping the bullet on the first line and aligning
/// continuation lines under the item text.
#[derive(Debug, Clone, Default)]
pub struct ListWrappingHandler {
    block: Option<BlockContent>,
}

impl ListWrappingHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn block_mut(&mut self) -> Result<&mut BlockContent, ReflowError> {
        self.block
            .as_mut()
            .ok_or(ReflowError::HandlerNotReady(LIST_HANDLER_TYPE))
    }
}

impl WrappingHandler for ListWrappingHandler {
    fn handler_type(&self) -> &'static str {
        LIST_HANDLER_TYPE
    }

    fn setup(
        &mut self,
        buffer: &dyn TextBuffer,
        span: &BlockSpan,
        reference: usize,
    ) -> Result<(), ReflowError> {
        self.block = None;
        let block = BlockContent::capture(buffer, span, reference)?;
        let line = first_line(&block.text);
        if parse_bullet(line).is_none() {
            return Err(ReflowError::MalformedListItem(line.to_owned()));
        }
        self.block = Some(block);
        Ok(())
    }

    fn apply_edit(&mut self, edit: &PendingEdit) -> Result<(), ReflowError> {
        self.block_mut()?.apply_edit(edit)
    }

    fn wrap(&mut self, layout: WrapLayout) -> Result<String, ReflowError> {
        let block = self.block_mut()?;
        // The edit may have touched the bullet, so parse the edited text.
        let line = first_line(&block.text);
        let bullet =
            parse_bullet(line).ok_or_else(|| ReflowError::MalformedListItem(line.to_owned()))?;
        let prefix_len = bullet.prefix_len();
        let text_column = bullet.text_column(layout.tab_width);
        trace!(prefix = prefix_len, text_column, "list item parsed");

        let continuation = " ".repeat(text_column);
        Ok(block.reflow_after(prefix_len, "", &continuation, layout.available(text_column)))
    }

    fn reference_offset(&self) -> Option<usize> {
        self.block.as_ref()?.absolute_reference()
    }
}
