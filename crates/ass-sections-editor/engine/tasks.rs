//! Deferred line-level tasks
//!
//! Scripts run once per section, but selecting, duplicating and changing
//! line fields must happen once per line. Such calls are queued while the
//! first section runs and executed after every section has finished.
//! Duplications run before everything else so the copy is taken from the
//! line as it was before the pass.

use crate::core::LineProperty;
use ass_sections_core::Combinator;

/// A queued line-level effect
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Add the line to the output selection
    Select,
    /// Insert a copy of the original line right after it
    Duplicate,
    /// Apply a combinator to a line property
    ModifyLine {
        property: LineProperty,
        combinator: Combinator,
    },
}

/// Execution class of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    RunsFirst,
    RunsNormal,
}

impl DeferredTask {
    pub const fn priority(&self) -> TaskPriority {
        match self {
            Self::Duplicate => TaskPriority::RunsFirst,
            Self::Select | Self::ModifyLine { .. } => TaskPriority::RunsNormal,
        }
    }
}

/// Tasks queued for one line, kept in two ordered lists
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    first: Vec<DeferredTask>,
    normal: Vec<DeferredTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task behind others of the same priority
    pub fn push(&mut self, task: DeferredTask) {
        match task.priority() {
            TaskPriority::RunsFirst => self.first.push(task),
            TaskPriority::RunsNormal => self.normal.push(task),
        }
    }

    pub fn len(&self) -> usize {
        self.first.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.normal.is_empty()
    }
}

impl IntoIterator for TaskQueue {
    type Item = DeferredTask;
    type IntoIter = std::iter::Chain<std::vec::IntoIter<DeferredTask>, std::vec::IntoIter<DeferredTask>>;

    /// Tasks in execution order: every `RunsFirst` task, then the rest
    fn into_iter(self) -> Self::IntoIter {
        self.first.into_iter().chain(self.normal)
    }
}
