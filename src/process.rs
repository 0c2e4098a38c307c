//! Driving the engine over a [`Document`].
//!
//! These helpers stand in for the host editor: they rebuild the classifier
//! from the current text before each step and commit edits the engine
//! declines.

use tracing::{debug, trace};

use crate::{
    buffer::{Document, TextBuffer},
    classify::LineClassifier,
    config::ReflowConfig,
    engine::HardLineWrap,
    error::ReflowError,
    line_util::is_blank,
    span::{PendingEdit, WrapResult},
};

/// What one keystroke did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystrokeOutcome {
    /// Caret position once the keystroke is committed.
    pub caret: usize,
    /// The rewrap, when one happened.
    pub wrap: Option<WrapResult>,
}

/// Commit `edit`, rewrapping the surrounding block when the engine claims it.
///
/// # Errors
/// Returns [`ReflowError::InvalidRange`] when the engine declines and the
/// edit itself does not fit the document.
pub fn apply_keystroke(
    engine: &HardLineWrap,
    document: &mut Document,
    edit: &PendingEdit,
    width: usize,
) -> Result<KeystrokeOutcome, ReflowError> {
    let classifier = LineClassifier::scan(&document.text());
    if let Some(result) = engine.wrap_region(document, Some(&classifier), edit, width) {
        return Ok(KeystrokeOutcome {
            caret: result.caret_offset,
            wrap: Some(result),
        });
    }

    let range = edit.range().ok_or(ReflowError::InvalidRange {
        start: edit.offset,
        end: usize::MAX,
    })?;
    document.replace(range, &edit.inserted_text)?;
    trace!(offset = edit.offset, "edit committed without rewrap");
    Ok(KeystrokeOutcome {
        caret: edit.caret_after(),
        wrap: None,
    })
}

/// Rewrap every reflowable block of `document` once, top to bottom.
///
/// Returns the number of blocks rewritten.
pub fn reflow_document(engine: &HardLineWrap, document: &mut Document, width: usize) -> usize {
    let mut classifier = LineClassifier::scan(&document.text());
    let mut rewritten = 0;
    let mut line = 0;
    while line < document.line_count() {
        let (Some(text), Some(offset)) = (document.line_text(line), document.line_offset(line))
        else {
            break;
        };
        if is_blank(&text) {
            line += 1;
            continue;
        }
        let edit = PendingEdit::noop(offset);
        match engine.try_wrap_region(document, Some(&classifier), &edit, width) {
            Ok(Some(result)) => {
                rewritten += 1;
                line = result.last_line_after + 1;
                classifier = LineClassifier::scan(&document.text());
            }
            Ok(None) => line += 1,
            Err(err) => {
                debug!(line, %err, "block left as is");
                line += 1;
            }
        }
    }
    rewritten
}

/// Rewrap every reflowable block of `text` with `config`.
///
/// ```
/// use hardwrap::{config::ReflowConfig, process::reflow_text};
///
/// let out = reflow_text("one two\nthree four five", &ReflowConfig::with_width(12));
/// assert_eq!(out, "one two\nthree four\nfive");
/// ```
#[must_use]
pub fn reflow_text(text: &str, config: &ReflowConfig) -> String {
    let engine = HardLineWrap::new(*config);
    let mut document = Document::new(text);
    reflow_document(&engine, &mut document, config.max_line_width);
    document.text()
}
