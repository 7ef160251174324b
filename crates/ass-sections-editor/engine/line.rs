//! Per-line pass
//!
//! A [`LineDriver`] takes one selected line through a fixed sequence of
//! phases: segment the text, resolve the line's starting state, run the
//! script once per section, execute the queued line-level tasks, then
//! reassemble the text and write the line back.

use crate::core::{DocumentHost, Result};
use crate::engine::selection::WorkingSelection;
use crate::engine::tasks::{DeferredTask, TaskQueue};
use crate::script::{ScriptBindings, SectionContext, SectionScript};
use ass_sections_core::state::{default_state, resolve_origin, resolve_position, Geometry, PositionContext};
use ass_sections_core::{PropertyState, SegmentedLine, StateResolver};
use core::fmt;

/// Phase a line is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePhase {
    Segmenting,
    ResolvingDefaults,
    /// Running the script on a 1-based section
    PerSectionScript(usize),
    RunningDeferredTasks,
    Reassembling,
    WritingBack,
    Done,
}

impl fmt::Display for LinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segmenting => f.write_str("segmenting"),
            Self::ResolvingDefaults => f.write_str("resolving defaults"),
            Self::PerSectionScript(j) => write!(f, "script on section {j}"),
            Self::RunningDeferredTasks => f.write_str("running deferred tasks"),
            Self::Reassembling => f.write_str("reassembling"),
            Self::WritingBack => f.write_str("writing back"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Drives a single selected line through the pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDriver {
    i: usize,
    li: usize,
    phase: LinePhase,
}

impl LineDriver {
    /// Driver for selection entry `i` pointing at document line `li`
    pub const fn new(i: usize, li: usize) -> Self {
        Self {
            i,
            li,
            phase: LinePhase::Segmenting,
        }
    }

    pub const fn phase(&self) -> LinePhase {
        self.phase
    }

    fn enter(&mut self, phase: LinePhase) {
        log::trace!("line {}: {} -> {}", self.li, self.phase, phase);
        self.phase = phase;
    }

    /// Run every phase for this line
    ///
    /// # Errors
    ///
    /// Host errors propagate unchanged. Failures inside the script or a
    /// queued task become
    /// [`EditorError::ScriptRuntime`](crate::core::EditorError::ScriptRuntime)
    /// for this line, which is then left as it was.
    pub fn run<D, S>(&mut self, document: &mut D, selection: &mut WorkingSelection, script: &mut S) -> Result<()>
    where
        D: DocumentHost + ?Sized,
        S: SectionScript + ?Sized,
    {
        let li = self.li;
        let original = document.line(li)?;
        let mut segmented = SegmentedLine::parse(&original.text);

        self.enter(LinePhase::ResolvingDefaults);
        let style = document.style_for_line(&original);
        let frame = document.frame_size();
        let ctx = PositionContext {
            frame,
            margins: document.effective_margins(&original, &style),
            alignment: style.alignment,
        };
        let geometry = Geometry {
            frame,
            pos: resolve_position(&segmented, &ctx),
            org: resolve_origin(&segmented, &ctx),
        };
        let mut resolver = StateResolver::new(default_state(&style, &geometry)?);
        for name in segmented.reset_targets() {
            match document.style(&name) {
                Some(target) => resolver.add_reset_style(name, default_state(&target, &geometry)?),
                None => log::debug!("line {li}: reset to unknown style {name:?}"),
            }
        }

        let mut tasks = TaskQueue::new();
        let mut inherited: PropertyState = resolver.defaults().clone();
        for (index, section) in segmented.sections_mut().iter_mut().enumerate() {
            let j = index + 1;
            self.enter(LinePhase::PerSectionScript(j));
            let ctx = SectionContext {
                i: self.i,
                li,
                j,
                pos: geometry.pos,
                org: geometry.org,
            };
            let mut bindings = ScriptBindings::new(ctx, section, &inherited, &resolver, &mut tasks);
            script
                .run(&mut bindings)
                .map_err(|err| err.into_script_fault(li, j))?;
            inherited = bindings.into_state();
        }

        self.enter(LinePhase::RunningDeferredTasks);
        let mut updated = original.clone();
        for task in tasks {
            log::debug!("line {li}: running {task:?}");
            match task {
                DeferredTask::Duplicate => {
                    document.insert_line(li + 1, original.clone())?;
                    selection.record_duplicate(li);
                }
                DeferredTask::Select => selection.select(li),
                DeferredTask::ModifyLine { property, combinator } => updated
                    .apply(property, &combinator)
                    .map_err(|err| err.into_script_fault(li, 1))?,
            }
        }

        self.enter(LinePhase::Reassembling);
        updated.text = segmented.reassemble();

        self.enter(LinePhase::WritingBack);
        document.set_line(li, updated)?;
        self.enter(LinePhase::Done);
        Ok(())
    }
}
