//! Hard line wrapping for a structured-text editor.
//!
//! On every edit the [`HardLineWrap`] engine finds the paragraph or list item
//! under the caret, rewraps it to the configured width in a single buffer
//! replacement and reports where the caret lands. Blocks are found by
//! [`detect::BlockDetector`]s and rewritten by [`handler::WrappingHandler`]s;
//! [`process`] drives the engine over an in-memory [`Document`].

#[macro_use]
mod macros;

pub mod buffer;
pub mod classify;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod handler;
pub mod line_util;
pub mod process;
pub mod registry;
pub mod span;

pub use buffer::{Document, TextBuffer};
pub use classify::{Category, ContentClassifier, LineClassifier};
pub use config::{ReflowConfig, WrapMode};
pub use engine::HardLineWrap;
pub use error::ReflowError;
pub use process::{KeystrokeOutcome, apply_keystroke, reflow_document, reflow_text};
pub use span::{BlockSpan, PendingEdit, WrapResult};
