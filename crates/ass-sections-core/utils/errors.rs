//! Core error type for the override-tag engine
//!
//! Provides the `CoreError` enum returned by combinator application and
//! style value parsing. Follows the same rules as the rest of the workspace:
//!
//! - Use `thiserror` for structured error handling (no `anyhow`)
//! - Carry enough context to be shown to the script author verbatim
//! - Keep variants cheap to clone so they can cross the script boundary

use thiserror::Error;

/// Main error type for core engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A combinator was applied to a tag whose parameter count differs
    /// from the number of operands the combinator carries
    #[error("{combinator} expects {expected} parameter(s) but the tag has {actual}")]
    ArityMismatch {
        combinator: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Colour in style notation could not be parsed
    #[error("Invalid color format: {0}")]
    InvalidColor(String),
}

impl CoreError {
    /// Create an arity mismatch error
    #[must_use]
    pub const fn arity(combinator: &'static str, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            combinator,
            expected,
            actual,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;
