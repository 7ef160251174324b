//! Host document capability
//!
//! The editing pass never owns subtitle storage. It reads and writes lines,
//! looks up styles and reports back through [`DocumentHost`], which a GUI or
//! file-backed editor implements. [`MemoryDocument`] is a complete in-memory
//! host that also records every report for inspection.
//!
//! Line indices are 1-based document positions, the numbering scripts see
//! as `li`.

use crate::core::errors::{EditorError, Result};
use crate::core::line::Line;
use ahash::AHashMap;
use ass_sections_core::{Frame, Margins, Style};

/// Capabilities the editing pass needs from a subtitle document
pub trait DocumentHost {
    /// Line at a 1-based index
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LineNotFound`] when the index is out of range.
    fn line(&self, index: usize) -> Result<Line>;

    /// Replace the line at a 1-based index
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LineNotFound`] when the index is out of range.
    fn set_line(&mut self, index: usize, line: Line) -> Result<()>;

    /// Insert a line so it ends up at a 1-based index
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LineNotFound`] when the index is beyond one past
    /// the last line.
    fn insert_line(&mut self, index: usize, line: Line) -> Result<()>;

    /// Number of lines in the document
    fn line_count(&self) -> usize;

    /// Style by name
    fn style(&self, name: &str) -> Option<Style>;

    /// Script resolution lines are positioned against
    fn frame_size(&self) -> Frame;

    /// Style a line renders with
    ///
    /// Falls back to the document's `Default` style, then to built-in
    /// defaults.
    fn style_for_line(&self, line: &Line) -> Style {
        self.style(&line.style)
            .or_else(|| self.style("Default"))
            .unwrap_or_default()
    }

    /// Margins in effect for a line; non-zero line margins win
    fn effective_margins(&self, line: &Line, style: &Style) -> Margins {
        Margins::effective(line.margin_l, line.margin_r, line.margin_v, style)
    }

    /// Progress of the pass in `0.0..=1.0`
    fn report_progress(&mut self, _fraction: f64) {}

    /// Record an undo point covering everything since the last one
    fn mark_undo_checkpoint(&mut self, _label: &str) {}

    /// Show a message to the user
    fn log_message(&mut self, _message: &str) {}

    /// Abort the running operation
    fn cancel_operation(&mut self) {}

    /// Whether the user asked to stop the pass
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// In-memory document recording host interactions
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    lines: Vec<Line>,
    styles: AHashMap<String, Style>,
    frame: Frame,
    progress: Vec<f64>,
    undo_checkpoints: Vec<String>,
    messages: Vec<String>,
    cancelled: bool,
    cancel_requested: bool,
}

impl MemoryDocument {
    /// Empty document with a 640x480 frame and no styles
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            styles: AHashMap::new(),
            frame: Frame::default(),
            progress: Vec::new(),
            undo_checkpoints: Vec::new(),
            messages: Vec::new(),
            cancelled: false,
            cancel_requested: false,
        }
    }

    /// Document holding the given lines
    pub fn from_lines<I: IntoIterator<Item = Line>>(lines: I) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Add or replace a style
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.insert(style.name.clone(), style);
        self
    }

    /// Set the script resolution
    #[must_use]
    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Append a line
    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// All lines in document order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Texts of all lines in document order
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// Progress fractions reported so far
    pub fn progress(&self) -> &[f64] {
        &self.progress
    }

    /// Undo checkpoint labels recorded so far
    pub fn undo_checkpoints(&self) -> &[String] {
        &self.undo_checkpoints
    }

    /// Messages logged to the user
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether the pass called [`DocumentHost::cancel_operation`]
    pub const fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Simulate the user pressing cancel
    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    fn slot(&self, index: usize) -> Result<usize> {
        if (1..=self.lines.len()).contains(&index) {
            Ok(index - 1)
        } else {
            Err(EditorError::LineNotFound {
                index,
                count: self.lines.len(),
            })
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentHost for MemoryDocument {
    fn line(&self, index: usize) -> Result<Line> {
        Ok(self.lines[self.slot(index)?].clone())
    }

    fn set_line(&mut self, index: usize, line: Line) -> Result<()> {
        let slot = self.slot(index)?;
        self.lines[slot] = line;
        Ok(())
    }

    fn insert_line(&mut self, index: usize, line: Line) -> Result<()> {
        if index == 0 || index > self.lines.len() + 1 {
            return Err(EditorError::LineNotFound {
                index,
                count: self.lines.len(),
            });
        }
        self.lines.insert(index - 1, line);
        Ok(())
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn style(&self, name: &str) -> Option<Style> {
        self.styles.get(name).cloned()
    }

    fn frame_size(&self) -> Frame {
        self.frame
    }

    fn report_progress(&mut self, fraction: f64) {
        self.progress.push(fraction);
    }

    fn mark_undo_checkpoint(&mut self, label: &str) {
        self.undo_checkpoints.push(label.to_string());
    }

    fn log_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn cancel_operation(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_requested
    }
}
