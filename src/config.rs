//! Reflow configuration.

/// Width used when the configured one is too small to be meaningful.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Widths at or below this value fall back to [`DEFAULT_LINE_WIDTH`].
pub const LINE_WIDTH_FLOOR: usize = 8;

/// Columns a tab occupies when measuring indentation.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// How the editor wraps long lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WrapMode {
    /// Lines are left alone.
    Off,
    /// Blocks are rewritten into the buffer on every edit.
    #[default]
    Hard,
    /// Wrapping happens at display time only; the buffer is never touched.
    Soft,
}

impl WrapMode {
    /// Whether this mode makes the engine rewrite buffer text.
    #[must_use]
    pub fn rewrites_buffer(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// Settings shared by the detectors, handlers and the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflowConfig {
    pub max_line_width: usize,
    pub wrap_mode: WrapMode,
    pub tab_width: usize,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            max_line_width: DEFAULT_LINE_WIDTH,
            wrap_mode: WrapMode::default(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl ReflowConfig {
    /// Build a hard-wrapping configuration for `max_line_width` columns.
    #[must_use]
    pub fn with_width(max_line_width: usize) -> Self {
        Self {
            max_line_width,
            ..Self::default()
        }
    }

    /// The configured width after applying the floor.
    #[must_use]
    pub fn line_width(&self) -> usize {
        effective_width(self.max_line_width)
    }
}

/// Clamp a requested width, replacing values at or below
/// [`LINE_WIDTH_FLOOR`] with [`DEFAULT_LINE_WIDTH`].
///
/// ```
/// use hardwrap::config::effective_width;
/// assert_eq!(effective_width(20), 20);
/// assert_eq!(effective_width(3), 80);
/// ```
#[must_use]
pub fn effective_width(width: usize) -> usize {
    if width <= LINE_WIDTH_FLOOR {
        DEFAULT_LINE_WIDTH
    } else {
        width
    }
}
