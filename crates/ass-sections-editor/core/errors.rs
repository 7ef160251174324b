//! Error types for the ass-sections-editor crate
//!
//! Provides the main `EditorError` enum that wraps `CoreError` from
//! ass-sections-core and adds the failures of an editing pass:
//! - Script faults (compile and runtime) that abort the whole pass
//! - Host document lookups that fail
//! - Line property names and values rejected by `modify_line`

use ass_sections_core::CoreError;
use core::fmt;
use thiserror::Error;

/// Main error type for ass-sections-editor operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Errors from ass-sections-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// User script could not be compiled
    #[error("Script failed to compile: {message}")]
    ScriptCompile { message: String },

    /// User script raised an error while running on a section
    #[error("Script error on line {line}, section {section}: {message}")]
    ScriptRuntime {
        line: usize,
        section: usize,
        message: String,
    },

    /// Document line index out of range
    #[error("Line not found: {index} (document has {count} lines)")]
    LineNotFound { index: usize, count: usize },

    /// `modify_line` named a property lines do not have
    #[error("Unknown line property: {name}")]
    UnknownLineProperty { name: String },

    /// Value cannot be stored in a line property
    #[error("Invalid value for line property {property}: {value}")]
    InvalidPropertyValue { property: String, value: String },

    /// Pass cancelled by the host
    #[error("Operation cancelled")]
    Cancelled,
}

impl EditorError {
    /// Create a script compile error
    pub fn compile<T: fmt::Display>(message: T) -> Self {
        Self::ScriptCompile {
            message: message.to_string(),
        }
    }

    /// Create a script runtime error for a line and 1-based section index
    pub fn runtime<T: fmt::Display>(line: usize, section: usize, message: T) -> Self {
        Self::ScriptRuntime {
            line,
            section,
            message: message.to_string(),
        }
    }

    /// Create an invalid property value error
    pub fn invalid_value<P: fmt::Display, V: fmt::Display>(property: P, value: V) -> Self {
        Self::InvalidPropertyValue {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    /// Attribute an error raised inside a script call to its line and section
    ///
    /// Script faults and cancellation pass through unchanged; anything else
    /// becomes a runtime fault carrying its message.
    #[must_use]
    pub fn into_script_fault(self, line: usize, section: usize) -> Self {
        match self {
            Self::ScriptCompile { .. } | Self::ScriptRuntime { .. } | Self::Cancelled => self,
            other => Self::runtime(line, section, other),
        }
    }

    /// Check whether the error is a script fault
    pub const fn is_script_fault(&self) -> bool {
        matches!(self, Self::ScriptCompile { .. } | Self::ScriptRuntime { .. })
    }

    /// Check whether the host cancelled the pass
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_are_transparent() {
        let err: EditorError = CoreError::arity("add", 2, 1).into();
        assert_eq!(err.to_string(), "add expects 2 parameter(s) but the tag has 1");
    }

    #[test]
    fn script_fault_attribution() {
        let err = EditorError::from(CoreError::arity("append", 1, 2)).into_script_fault(4, 2);
        assert_eq!(
            err,
            EditorError::runtime(4, 2, "append expects 1 parameter(s) but the tag has 2")
        );
        assert!(err.is_script_fault());

        let compile = EditorError::compile("unexpected symbol").into_script_fault(1, 1);
        assert!(matches!(compile, EditorError::ScriptCompile { .. }));
        assert!(EditorError::Cancelled.into_script_fault(1, 1).is_cancellation());
    }

    #[test]
    fn messages_include_context() {
        let err = EditorError::runtime(7, 3, "boom");
        assert_eq!(err.to_string(), "Script error on line 7, section 3: boom");
        let err = EditorError::LineNotFound { index: 9, count: 2 };
        assert_eq!(err.to_string(), "Line not found: 9 (document has 2 lines)");
    }
}
