//! Failure taxonomy of the reflow pipeline.
//!
//! Every variant is local and recoverable: the engine reacts to any of them by
//! leaving the buffer untouched and letting the plain edit through.

use thiserror::Error;

/// Reasons a reflow request was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflowError {
    /// The computed block no longer resolves against the buffer.
    #[error("block span {offset}..{end} no longer matches the buffer")]
    StaleSpan { offset: usize, end: usize },

    /// The pending edit does not fit inside the detected block.
    #[error("edit at offset {offset} deleting {deleted} bytes falls outside the block")]
    EditOutsideBlock { offset: usize, deleted: usize },

    /// A detector named a handler type nobody registered.
    #[error("no wrapping handler registered for type `{0}`")]
    NoHandlerRegistered(String),

    /// The first line of a list block carries no parseable bullet.
    #[error("`{0}` does not start with a list bullet")]
    MalformedListItem(String),

    /// A handler lock was poisoned by a panic in an earlier operation.
    #[error("wrapping handler `{0}` is poisoned")]
    HandlerPoisoned(String),

    /// A byte range lies outside the buffer or splits a character.
    #[error("range {start}..{end} is outside the buffer or splits a character")]
    InvalidRange { start: usize, end: usize },

    /// The block or the inserted text already holds the line break
    /// placeholder, which the pipeline could not tell apart from a real break.
    #[error("text at offset {offset} contains the reserved character U+E000")]
    ReservedCharacter { offset: usize },

    /// A handler step ran before `setup`.
    #[error("wrapping handler `{0}` used before setup")]
    HandlerNotReady(&'static str),
}
