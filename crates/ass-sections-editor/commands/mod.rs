//! Host-facing commands
//!
//! A command bundles an editing pass with the bookkeeping a host expects
//! around it: an undo checkpoint on success, and a user-visible message plus
//! cancellation of the operation when the pass fails.

pub mod apply;

pub use apply::ApplySectionsCommand;

/// Metadata a host uses to list a command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandInfo {
    /// Command identifier
    pub id: String,
    /// Human-readable command name
    pub name: String,
    /// Command description
    pub description: String,
    /// Command category for organization
    pub category: String,
}

impl CommandInfo {
    /// Create command metadata in the `General` category
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: "General".to_string(),
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}
