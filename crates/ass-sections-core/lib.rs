//! # ASS Sections Core
//!
//! Override-tag engine for editing ASS subtitle lines one *section* at a
//! time, where a section is a run of text sharing the same override state.
//!
//! ## Features
//!
//! - **Segmentation**: split a line into `(markup, text)` sections and
//!   reassemble it byte-for-byte when nothing changed
//! - **State resolution**: style defaults, line geometry and cumulative
//!   overrides folded left to right, with `\r` resets and shorthand fan-out
//! - **Targeted mutation**: rewrite the last top-level occurrence of a tag,
//!   append when the value is only inherited, remove tags without breaking
//!   enclosing transitions
//! - **Combinators**: `add`, `multiply`, `replace` and `append` as values
//!
//! ## Quick Start
//!
//! ```rust
//! use ass_sections_core::combinator::add;
//! use ass_sections_core::state::{default_state, Geometry, StateResolver};
//! use ass_sections_core::{Frame, SectionEditor, SegmentedLine, Style};
//!
//! let geometry = Geometry { frame: Frame::new(1920.0, 1080.0), pos: (960.0, 1070.0), org: (960.0, 1070.0) };
//! let resolver = StateResolver::new(default_state(&Style::default(), &geometry)?);
//!
//! let mut line = SegmentedLine::parse("{\\fs30}Big {\\i1}and slanted");
//! let mut inherited = resolver.defaults().clone();
//! for section in line.sections_mut() {
//!     let mut editor = SectionEditor::new(section, &inherited, &resolver);
//!     editor.modify("fs", &add([5.0]))?;
//!     inherited = editor.into_state();
//! }
//! assert_eq!(line.reassemble(), "{\\fs35}Big {\\i1\\fs40}and slanted");
//! # Ok::<(), ass_sections_core::CoreError>(())
//! ```

#![deny(unsafe_code)]

pub mod combinator;
pub mod edit;
pub mod state;
pub mod style;
pub mod tags;
pub mod utils;
pub mod values;

pub use combinator::Combinator;
pub use edit::SectionEditor;
pub use state::{PropertyState, StateResolver};
pub use style::{Frame, Margins, Style};
pub use tags::{Section, SegmentedLine};
pub use utils::{CoreError, Result};
pub use values::TagValue;

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
