//! Host-facing data model and capabilities
//!
//! Lines, the document capability the pass runs against, configuration and
//! the crate's error type.

pub mod config;
pub mod document;
pub mod errors;
pub mod line;

pub use config::ApplyConfig;
pub use document::{DocumentHost, MemoryDocument};
pub use errors::{EditorError, Result};
pub use line::{Line, LineProperty};
