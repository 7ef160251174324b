//! Editing pass over a selection
//!
//! - [`selection`] walks the selected lines and tracks inserted copies
//! - [`line`] drives one line through segmentation, scripting and write-back
//! - [`tasks`] holds line-level effects deferred until every section ran

pub mod line;
pub mod selection;
pub mod tasks;

pub use line::{LineDriver, LinePhase};
pub use selection::{apply_to_selection, WorkingSelection};
pub use tasks::{DeferredTask, TaskPriority, TaskQueue};
