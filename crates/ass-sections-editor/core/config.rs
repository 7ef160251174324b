//! Configuration for an apply-to-sections pass

/// Settings for [`ApplySectionsCommand`](crate::commands::ApplySectionsCommand)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyConfig {
    /// Maximum number of selection entries visited in one pass
    ///
    /// Stops scripts that duplicate every line from growing the selection
    /// forever.
    pub selection_cap: usize,

    /// Label of the undo checkpoint recorded after a successful pass
    pub undo_label: String,

    /// Whether to report progress to the host before each line
    pub report_progress: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            selection_cap: 1000,
            undo_label: "Apply to sections".to_string(),
            report_progress: true,
        }
    }
}

impl ApplyConfig {
    /// Set the selection cap
    #[must_use]
    pub const fn with_selection_cap(mut self, cap: usize) -> Self {
        self.selection_cap = cap;
        self
    }

    /// Set the undo checkpoint label
    #[must_use]
    pub fn with_undo_label(mut self, label: impl Into<String>) -> Self {
        self.undo_label = label.into();
        self
    }

    /// Enable or disable progress reports
    #[must_use]
    pub const fn with_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }
}
