//! Fallback detector for plain paragraphs.

use tracing::trace;

use super::{BlockDetector, Direction, indent_of, line_category, walk};
use crate::{
    buffer::TextBuffer,
    classify::ContentClassifier,
    config::DEFAULT_TAB_WIDTH,
    handler::DEFAULT_HANDLER_TYPE,
    line_util::is_blank,
    span::BlockSpan,
};

/// Groups neighbouring non-blank lines of equal indentation and category.
#[derive(Debug, Clone, Copy)]
pub struct DefaultBlockDetector {
    tab_width: usize,
}

impl Default for DefaultBlockDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl DefaultBlockDetector {
    pub const PRIORITY: i32 = 100;

    #[must_use]
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }
}

impl BlockDetector for DefaultBlockDetector {
    fn detector_type(&self) -> &'static str {
        "default"
    }

    fn handler_type(&self) -> &'static str {
        DEFAULT_HANDLER_TYPE
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
        let base_category = match classifier {
            Some(c) => {
                let category = line_category(buffer, c, base_first_line)?;
                if !category.is_reflowable() {
                    trace!(line = base_first_line, ?category, "base line is not reflowable");
                    return None;
                }
                Some(category)
            }
            None => None,
        };

        let similar = |line: usize| {
            let Some(text) = buffer.line_text(line) else {
                return false;
            };
            !is_blank(&text)
                && indent_of(&text, self.tab_width) == base_indent
                && classifier.is_none_or(|c| line_category(buffer, c, line) == base_category)
        };

        // Lines strictly between the base lines belong to the edit and are
        // claimed unchecked.
        let first = walk(buffer, base_first_line, Direction::Up, similar);
        let last = walk(buffer, base_last_line.max(base_first_line), Direction::Down, similar);
        BlockSpan::from_lines(buffer, first, last)
    }
}
