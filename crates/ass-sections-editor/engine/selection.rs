//! Selection driver
//!
//! Walks the selection with an explicit 1-based cursor. The selection may
//! grow while it is walked: duplicating a line inserts the copy into the
//! document right after it and into the selection right after the cursor,
//! so the copy is visited next. Every stored index past the insertion point
//! shifts by one in the same step, in both the live selection and the
//! output selection collected through `select()`.

use crate::core::{ApplyConfig, DocumentHost, EditorError, Result};
use crate::engine::line::LineDriver;
use crate::script::SectionScript;

/// Selection being walked, plus the output selection built by `select()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSelection {
    active: Vec<usize>,
    output: Vec<usize>,
    cursor: usize,
    selected_any: bool,
}

impl WorkingSelection {
    /// Start walking `selection` from its first entry
    pub fn new(selection: &[usize]) -> Self {
        Self {
            active: selection.to_vec(),
            output: Vec::new(),
            cursor: 1,
            selected_any: false,
        }
    }

    /// 1-based position of the entry being visited
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current number of entries, including inserted ones
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Document line at the cursor, `None` once past the end
    pub fn current(&self) -> Option<usize> {
        self.active.get(self.cursor - 1).copied()
    }

    /// Move to the next entry
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Entries of the live selection
    pub fn entries(&self) -> &[usize] {
        &self.active
    }

    /// Entries collected through `select()`
    pub fn output(&self) -> &[usize] {
        &self.output
    }

    /// Record that a copy of line `li` was inserted at `li + 1`
    pub fn record_duplicate(&mut self, li: usize) {
        for index in self.active.iter_mut().chain(self.output.iter_mut()) {
            if *index > li {
                *index += 1;
            }
        }
        let at = self.cursor.min(self.active.len());
        self.active.insert(at, li + 1);
    }

    /// Add line `li` to the output selection
    pub fn select(&mut self, li: usize) {
        self.selected_any = true;
        if !self.output.contains(&li) {
            self.output.push(li);
        }
    }

    /// Selection to hand back: the collected one when `select()` was used,
    /// otherwise the input unchanged
    pub fn finish(self, input: &[usize]) -> Vec<usize> {
        if self.selected_any {
            self.output
        } else {
            input.to_vec()
        }
    }
}

/// Run `script` over every section of the selected lines
///
/// Visits entries while the cursor is within the selection, re-reading its
/// length each time, and stops silently after `config.selection_cap`
/// entries. Lines processed before a failure keep their changes.
///
/// # Errors
///
/// Returns the first script fault or host error, or
/// [`EditorError::Cancelled`] when the host asks to stop.
pub fn apply_to_selection<D, S>(
    config: &ApplyConfig,
    document: &mut D,
    selection: &[usize],
    script: &mut S,
) -> Result<Vec<usize>>
where
    D: DocumentHost + ?Sized,
    S: SectionScript + ?Sized,
{
    let mut working = WorkingSelection::new(selection);

    while let Some(li) = working.current() {
        let i = working.cursor();
        if i > config.selection_cap {
            log::warn!(
                "selection cap of {} reached, {} entries left unvisited",
                config.selection_cap,
                working.len() - i + 1
            );
            break;
        }
        if document.is_cancelled() {
            log::debug!("pass cancelled before entry {i}");
            return Err(EditorError::Cancelled);
        }
        if config.report_progress {
            document.report_progress(i as f64 / working.len() as f64);
        }

        log::debug!("processing line {li} (entry {i} of {})", working.len());
        LineDriver::new(i, li).run(document, &mut working, script)?;
        working.advance();
    }

    Ok(working.finish(selection))
}
