//! The hard line wrap engine.
//!
//! [`HardLineWrap`] turns one pending edit into at most one block rewrite:
//! it works out which lines the edit touches, lets every detector propose a
//! block, hands the winning block to its handler and commits the result with
//! a single [`TextBuffer::replace`].

use tracing::{debug, trace, warn};

use crate::{
    buffer::TextBuffer,
    classify::ContentClassifier,
    config::{ReflowConfig, effective_width},
    detect::{BlockDetector, DefaultBlockDetector, ListBlockDetector},
    error::ReflowError,
    handler::{DefaultWrappingHandler, ListWrappingHandler, WrapLayout, WrappingHandler},
    registry::HandlerRegistry,
    span::{BlockSpan, PendingEdit, WrapResult},
};

/// Detectors, handlers and settings for rewrapping blocks on every edit.
#[derive(Debug)]
pub struct HardLineWrap {
    detectors: Vec<Box<dyn BlockDetector>>,
    registry: HandlerRegistry,
    config: ReflowConfig,
}

impl Default for HardLineWrap {
    fn default() -> Self {
        Self::new(ReflowConfig::default())
    }
}

impl HardLineWrap {
    /// An engine with the list and paragraph detectors and their handlers.
    #[must_use]
    pub fn new(config: ReflowConfig) -> Self {
        let mut engine = Self::empty(config);
        engine.add_detector(Box::new(ListBlockDetector::new(config.tab_width)));
        engine.add_detector(Box::new(DefaultBlockDetector::new(config.tab_width)));
        engine.register_handler(Box::new(ListWrappingHandler::new()));
        engine.register_handler(Box::new(DefaultWrappingHandler::new()));
        engine
    }

    /// An engine without detectors or handlers.
    #[must_use]
    pub fn empty(config: ReflowConfig) -> Self {
        Self {
            detectors: Vec::new(),
            registry: HandlerRegistry::new(),
            config,
        }
    }

    /// Add a detector. Among detectors of equal priority the one added first
    /// wins.
    pub fn add_detector(&mut self, detector: Box<dyn BlockDetector>) {
        self.detectors.push(detector);
    }

    pub fn register_handler(&mut self, handler: Box<dyn WrappingHandler>) {
        self.registry.register(handler);
    }

    #[must_use]
    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Pick the block enclosing `first_line..=last_line`.
    ///
    /// Spans that do not cover the whole line range are ignored; of the rest
    /// the detector with the lowest priority wins.
    #[must_use]
    pub fn detect(
        &self,
        buffer: &dyn TextBuffer,
        classifier: Option<&dyn ContentClassifier>,
        first_line: usize,
        last_line: usize,
    ) -> Option<(&dyn BlockDetector, BlockSpan)> {
        let mut best: Option<(&dyn BlockDetector, BlockSpan)> = None;
        for detector in &self.detectors {
            let Some(span) = detector.find_block(buffer, first_line, last_line, classifier) else {
                continue;
            };
            if !span.covers_lines(first_line, last_line) {
                trace!(
                    detector = detector.detector_type(),
                    first = span.first_line,
                    last = span.last_line,
                    "span does not cover the edit"
                );
                continue;
            }
            if best.is_none_or(|(current, _)| detector.priority() < current.priority()) {
                best = Some((detector.as_ref(), span));
            }
        }
        best
    }

    /// Rewrap the block touched by `edit`, committing the edit with it.
    ///
    /// Returns `Ok(None)` when wrapping is disabled or no detector claims the
    /// edited lines; the buffer is untouched in that case and the caller
    /// commits the edit itself. On error the buffer is untouched as well.
    ///
    /// # Errors
    /// Any [`ReflowError`] raised while resolving the edit, running the
    /// handler or committing the replacement.
    pub fn try_wrap_region(
        &self,
        buffer: &mut dyn TextBuffer,
        classifier: Option<&dyn ContentClassifier>,
        edit: &PendingEdit,
        max_width: usize,
    ) -> Result<Option<WrapResult>, ReflowError> {
        if !self.config.wrap_mode.rewrites_buffer() {
            return Ok(None);
        }
        let width = effective_width(max_width);
        let invalid = || ReflowError::InvalidRange {
            start: edit.offset,
            end: edit.offset.saturating_add(edit.deleted_length),
        };
        let end = edit.end().ok_or_else(invalid)?;
        let first_line = buffer.line_of_offset(edit.offset).ok_or_else(invalid)?;
        let last_line = buffer.line_of_offset(end).ok_or_else(invalid)?;

        let Some((detector, span)) = self.detect(&*buffer, classifier, first_line, last_line) else {
            trace!(first_line, last_line, "no block claims the edit");
            return Ok(None);
        };
        let handler_type = detector.handler_type();
        debug!(
            detector = detector.detector_type(),
            handler = handler_type,
            first = span.first_line,
            last = span.last_line,
            "block selected"
        );

        let layout = WrapLayout {
            max_width: width,
            tab_width: self.config.tab_width,
        };
        let (text, reference) = self.registry.with_handler(handler_type, |handler| {
            handler.setup(&*buffer, &span, edit.caret_reference())?;
            handler.apply_edit(edit)?;
            let text = handler.wrap(layout)?;
            Ok((text, handler.reference_offset()))
        })?;

        buffer.replace(span.range(), &text)?;
        let delimiter = buffer.line_delimiter();
        let result = WrapResult {
            detector_type: detector.detector_type(),
            handler_type,
            first_line_before: span.first_line,
            last_line_before: span.last_line,
            last_line_after: span.first_line + text.matches(delimiter).count(),
            caret_offset: reference.unwrap_or(span.offset + text.len()),
            replaced: span.range(),
        };
        debug!(
            lines = result.last_line_after - result.first_line_before + 1,
            caret = result.caret_offset,
            "block rewrapped"
        );
        Ok(Some(result))
    }

    /// [`try_wrap_region`](Self::try_wrap_region) with failures logged and
    /// reported as "no wrap".
    pub fn wrap_region(
        &self,
        buffer: &mut dyn TextBuffer,
        classifier: Option<&dyn ContentClassifier>,
        edit: &PendingEdit,
        max_width: usize,
    ) -> Option<WrapResult> {
        match self.try_wrap_region(buffer, classifier, edit, max_width) {
            Ok(result) => result,
            Err(err) => {
                warn!(offset = edit.offset, %err, "reflow skipped");
                None
            }
        }
    }
}
