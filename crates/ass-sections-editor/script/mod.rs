//! Script interface
//!
//! A script runs once for every section of every selected line. It sees the
//! section through [`ScriptBindings`]: the loop indices, the line's resolved
//! position and origin, the section's state, text and markup, and the
//! operations that change them. Line-level calls (`select`, `duplicate` and
//! `modify_line`) take effect once per line; calls from sections after the
//! first are ignored.
//!
//! Native scripts are plain closures. With the `lua` feature, [`lua`]
//! compiles Lua source into scripts with the same bindings.

#[cfg(feature = "lua")]
pub mod lua;

use crate::core::{LineProperty, Result};
use crate::engine::tasks::{DeferredTask, TaskQueue};
use ass_sections_core::{Combinator, PropertyState, Section, SectionEditor, StateResolver, TagValue};

/// Loop indices and geometry exposed to a script
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionContext {
    /// 1-based position in the selection
    pub i: usize,
    /// 1-based document line
    pub li: usize,
    /// 1-based section within the line
    pub j: usize,
    pub pos: (f64, f64),
    pub org: (f64, f64),
}

/// Everything a script can read and change for one section
#[derive(Debug)]
pub struct ScriptBindings<'a> {
    ctx: SectionContext,
    editor: SectionEditor<'a>,
    tasks: &'a mut TaskQueue,
}

impl<'a> ScriptBindings<'a> {
    pub fn new(
        ctx: SectionContext,
        section: &'a mut Section,
        inherited: &'a PropertyState,
        resolver: &'a StateResolver,
        tasks: &'a mut TaskQueue,
    ) -> Self {
        Self {
            ctx,
            editor: SectionEditor::new(section, inherited, resolver),
            tasks,
        }
    }

    pub const fn i(&self) -> usize {
        self.ctx.i
    }

    pub const fn li(&self) -> usize {
        self.ctx.li
    }

    pub const fn j(&self) -> usize {
        self.ctx.j
    }

    /// Resolved position of the line
    pub const fn pos(&self) -> (f64, f64) {
        self.ctx.pos
    }

    /// Resolved rotation origin of the line
    pub const fn org(&self) -> (f64, f64) {
        self.ctx.org
    }

    /// Resolved state of the section
    pub const fn state(&self) -> &PropertyState {
        self.editor.state()
    }

    pub fn text(&self) -> &str {
        self.editor.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.editor.set_text(text);
    }

    /// Markup block, braces included
    pub fn tag(&self) -> &str {
        self.editor.markup()
    }

    pub fn set_tag(&mut self, markup: &str) {
        self.editor.set_markup(markup);
    }

    /// Current values of a tag
    pub fn get(&self, tag: &str) -> Vec<TagValue> {
        self.editor.get(tag)
    }

    /// Transform a tag's value in this section
    ///
    /// # Errors
    ///
    /// Returns the combinator's arity error.
    pub fn modify(&mut self, tag: &str, combinator: &Combinator) -> Result<()> {
        self.editor.modify(tag, combinator)?;
        Ok(())
    }

    /// Strip tags from this section's markup
    pub fn remove<S: AsRef<str>>(&mut self, tags: &[S]) {
        self.editor.remove(tags);
    }

    /// Append literal tag text to this section's markup
    pub fn insert(&mut self, literal: &str) {
        self.editor.insert(literal);
    }

    /// Add the line to the output selection
    pub fn select(&mut self) {
        self.once_per_line("select", DeferredTask::Select);
    }

    /// Insert a copy of the unmodified line after it
    pub fn duplicate(&mut self) {
        self.once_per_line("duplicate", DeferredTask::Duplicate);
    }

    /// Transform a line property once the sections are done
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownLineProperty`](crate::core::EditorError::UnknownLineProperty)
    /// when called from the first section with a name lines do not have.
    pub fn modify_line(&mut self, property: &str, combinator: &Combinator) -> Result<()> {
        if self.ctx.j != 1 {
            log::trace!("line {}: modify_line ignored in section {}", self.ctx.li, self.ctx.j);
            return Ok(());
        }
        let property: LineProperty = property.parse()?;
        self.tasks.push(DeferredTask::ModifyLine {
            property,
            combinator: combinator.clone(),
        });
        Ok(())
    }

    /// Consume the bindings, yielding the state the next section inherits
    pub fn into_state(self) -> PropertyState {
        self.editor.into_state()
    }

    fn once_per_line(&mut self, call: &str, task: DeferredTask) {
        if self.ctx.j == 1 {
            self.tasks.push(task);
        } else {
            log::trace!("line {}: {call} ignored in section {}", self.ctx.li, self.ctx.j);
        }
    }
}

/// Code run on every section
pub trait SectionScript {
    /// Run on one section
    ///
    /// # Errors
    ///
    /// Any error aborts the pass.
    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<()>;
}

impl<F> SectionScript for F
where
    F: FnMut(&mut ScriptBindings<'_>) -> Result<()>,
{
    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<()> {
        self(bindings)
    }
}

/// Pin a closure to the script signature
///
/// Closures passed straight to a generic bound often fail to infer the
/// higher-ranked argument lifetime; routing them through here fixes it.
pub fn script_fn<F>(f: F) -> F
where
    F: FnMut(&mut ScriptBindings<'_>) -> Result<()>,
{
    f
}

/// Turns script source into runnable scripts
pub trait ScriptEngine {
    type Script: SectionScript;

    /// Compile source text
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ScriptCompile`](crate::core::EditorError::ScriptCompile)
    /// when the source is rejected.
    fn compile(&self, source: &str) -> Result<Self::Script>;
}
