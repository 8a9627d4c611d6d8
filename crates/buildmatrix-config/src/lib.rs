//! KDL build matrix configuration for buildmatrix.
//!
//! This crate handles:
//! - Parsing build matrix documents (builds.kdl)
//! - Merging common settings with per-build overrides
//! - Compiler flags for the module next to the document
//! - Registering resolved builds with a registrar

pub mod document;
pub mod error;
pub mod evaluate;
pub mod merge;
pub mod patch;

pub use document::{
    BuildEntry, ConfigDocument, DEFAULT_CONFIG, Settings, default_document, load_document,
    parse_document,
};
pub use error::{ConfigError, ConfigResult};
pub use evaluate::{EvalContext, evaluate, resolve_all, resolve_one};
