//! Apex schema compiler.
//!
//! Takes a declarative API description (`apex.json`: endpoints, named
//! field schemas, operations) and regenerates source artifacts for every
//! configured target surface: a TypeScript API layer per client surface
//! and a Go routing/handler layer for the server tree. Generation is a
//! pure one-way transform — the document is never written back, and every
//! run is a full, idempotent overwrite of the generated files.

pub mod compiler;
pub mod emit;
pub mod error;
pub mod layout;
pub mod model;
pub mod plan;
pub mod resolve;
pub mod storage;
pub mod transport;

pub use compiler::Compiler;
pub use error::CompileError;
pub use layout::ProjectLayout;
pub use model::ApexDocument;

use crate::plan::Plan;

/// Emitter trait - implement this for each target surface.
pub trait Emitter {
    fn emit(&self, doc: &ApexDocument, plan: &Plan) -> anyhow::Result<GeneratedCode>;
    fn target(&self) -> &str;
}

pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
}

/// One generated artifact. `path` is relative to the surface root the
/// emitter is being written into.
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
