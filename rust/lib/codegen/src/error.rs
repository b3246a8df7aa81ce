use std::path::PathBuf;

use thiserror::Error;

/// Failures that surface from a compile.
///
/// Recoverable conditions (missing surface directories, malformed field
/// payloads, dangling schema references) are absorbed where they are
/// detected and never construct one of these.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The schema document could not be read or parsed. Fatal: nothing
    /// can be generated without it.
    #[error("schema storage failure at {path}: {message}")]
    Storage { path: PathBuf, message: String },

    /// An artifact could not be written. Sibling artifacts are still
    /// attempted; the first of these is returned once all are done.
    #[error("artifact write failure at {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// An emitter refused the document outright.
    #[error("{target} emission failed: {message}")]
    Emit { target: String, message: String },
}
