//! Fenced source block tracking.

use std::sync::LazyLock;

use regex::Regex;

// Capture: indent, fence run of 3+ backticks/tildes, info string.
static FENCE_RE: LazyLock<Regex> = lazy_regex!(
    r"^([ \t]*)(`{3,}|~{3,})([^\r\n]*)$",
    "fence pattern regex should compile",
);

/// Return the fence marker if `line` opens or closes a fenced block.
///
/// ```
/// use hardwrap::classify::fence_marker;
/// assert_eq!(fence_marker("```rust"), Some("```"));
/// assert_eq!(fence_marker("  ~~~~"), Some("~~~~"));
/// assert!(fence_marker("not a fence").is_none());
/// ```
#[must_use]
pub fn fence_marker(line: &str) -> Option<&str> {
    FENCE_RE
        .captures(line)
        .and_then(|cap| cap.get(2))
        .map(|m| m.as_str())
}

/// Tracks whether a line scan is inside a fenced source block.
///
/// A fence closes only on a run of the same character at least as long as
/// the opening one.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line; returns `true` when it is a fence line.
    pub fn observe(&mut self, line: &str) -> bool {
        let Some(marker) = fence_marker(line) else {
            return false;
        };
        let marker_ch = marker.chars().next().unwrap_or('`');
        let marker_len = marker.chars().count();

        match self.open {
            Some((ch, len)) if ch == marker_ch && marker_len >= len => self.open = None,
            Some(_) => {}
            None => self.open = Some((marker_ch, marker_len)),
        }
        true
    }

    #[must_use]
    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }
}
