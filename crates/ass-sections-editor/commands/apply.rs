//! The apply-to-sections command

use crate::commands::CommandInfo;
use crate::core::{ApplyConfig, DocumentHost, EditorError, Result};
use crate::engine::apply_to_selection;
use crate::script::{ScriptEngine, SectionScript};

/// Runs a script over every section of the selected lines
#[derive(Debug, Clone, Default)]
pub struct ApplySectionsCommand {
    config: ApplyConfig,
}

impl ApplySectionsCommand {
    pub const ID: &'static str = "apply-to-sections";
    pub const NAME: &'static str = "Apply to sections";
    pub const DESCRIPTION: &'static str =
        "Run a script on every override section of the selected lines";

    /// Command with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Command with a custom configuration
    pub const fn with_config(config: ApplyConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Metadata for command palettes and menus
    pub fn info() -> CommandInfo {
        CommandInfo::new(Self::ID, Self::NAME, Self::DESCRIPTION).with_category("Editing")
    }

    /// Run a script over `selection` and return the new selection
    ///
    /// On success an undo checkpoint covering the whole pass is recorded. On
    /// failure the error is shown through the host, the operation is
    /// cancelled and lines already processed keep their changes.
    ///
    /// # Errors
    ///
    /// Returns the first script fault or host error, or
    /// [`EditorError::Cancelled`] when the user stopped the pass.
    pub fn run<D, S>(&self, document: &mut D, selection: &[usize], script: &mut S) -> Result<Vec<usize>>
    where
        D: DocumentHost + ?Sized,
        S: SectionScript + ?Sized,
    {
        log::info!("{}: {} selected line(s)", Self::NAME, selection.len());
        match apply_to_selection(&self.config, document, selection, script) {
            Ok(selected) => {
                document.mark_undo_checkpoint(&self.config.undo_label);
                Ok(selected)
            }
            Err(err) => Err(self.abort(document, err)),
        }
    }

    /// Compile `source` with `engine`, then [`run`](Self::run) it
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), plus [`EditorError::ScriptCompile`] when the
    /// source does not compile. Nothing is changed in that case.
    pub fn run_source<E, D>(
        &self,
        engine: &E,
        source: &str,
        document: &mut D,
        selection: &[usize],
    ) -> Result<Vec<usize>>
    where
        E: ScriptEngine + ?Sized,
        D: DocumentHost + ?Sized,
    {
        let mut script = engine.compile(source).map_err(|err| self.abort(document, err))?;
        self.run(document, selection, &mut script)
    }

    fn abort<D: DocumentHost + ?Sized>(&self, document: &mut D, err: EditorError) -> EditorError {
        if err.is_cancellation() {
            log::info!("{} cancelled", Self::NAME);
        } else {
            log::error!("{} failed: {err}", Self::NAME);
            document.log_message(&err.to_string());
            document.cancel_operation();
        }
        err
    }
}
