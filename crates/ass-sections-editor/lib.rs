//! # ASS Sections Editor
//!
//! Apply-to-sections editing pass for ASS subtitle documents, built on
//! `ass-sections-core`.
//!
//! A user script runs once for every section of every selected line. It
//! reads the section's resolved override state and rewrites tags, text or
//! markup; line-level requests (selecting, duplicating, changing line
//! fields) are deferred until all sections of the line have run.
//!
//! ## Features
//!
//! - **Host-agnostic**: the pass talks to the document through
//!   [`DocumentHost`]; [`MemoryDocument`] is a ready in-memory host
//! - **Native scripts**: any closure over [`ScriptBindings`]
//! - **Lua scripts**: sandboxed Lua 5.4 behind the `lua` feature
//! - **Fault handling**: the first script error aborts the pass, is shown
//!   through the host and cancels the operation
//!
//! ## Quick Start
//!
//! ```rust
//! use ass_sections_core::combinator::multiply;
//! use ass_sections_editor::script::script_fn;
//! use ass_sections_editor::{ApplySectionsCommand, Line, MemoryDocument, ScriptBindings};
//!
//! let mut doc = MemoryDocument::from_lines([Line::dialogue("{\\fs20}small {\\i1}slanted")]);
//! let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify("fs", &multiply([2.0])));
//!
//! let selection = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script)?;
//! assert_eq!(selection, vec![1]);
//! assert_eq!(doc.texts(), ["{\\fs40}small {\\i1\\fs80}slanted"]);
//! # Ok::<(), ass_sections_editor::EditorError>(())
//! ```

#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod commands;
pub mod core;
pub mod engine;
pub mod script;

pub use commands::{ApplySectionsCommand, CommandInfo};
pub use crate::core::{ApplyConfig, DocumentHost, EditorError, Line, LineProperty, MemoryDocument, Result};
pub use engine::{apply_to_selection, DeferredTask, LineDriver, LinePhase, TaskQueue, WorkingSelection};
pub use script::{script_fn, ScriptBindings, ScriptEngine, SectionContext, SectionScript};

#[cfg(feature = "lua")]
pub use script::lua::{LuaCombinator, LuaEngine, LuaScript};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
