//! Bounded lookup windows.
//!
//! Context detection never scans a whole document: completion looks at a
//! fixed trailing window and word lookup at a fixed symmetric window. The
//! bounds trade completeness on very long tokens for a per-query cost that
//! is independent of document size.

/// Default trailing context examined by completion, in characters.
pub const DEFAULT_COMPLETION_WINDOW: usize = 7500;

/// Default lookbehind/lookahead for word extraction, in characters.
pub const DEFAULT_WORD_WINDOW: usize = 50;

/// Window configuration for a workspace's queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    /// Trailing context for completion strategy detection.
    pub completion_window: usize,
    /// Word extraction bound for hover, definition, and prefix fallback.
    pub word_window: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            completion_window: DEFAULT_COMPLETION_WINDOW,
            word_window: DEFAULT_WORD_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_windows() {
        let limits = AnalysisLimits::default();
        assert_eq!(limits.completion_window, 7500);
        assert_eq!(limits.word_window, 50);
    }
}
