//! Compiler driver: load the document, build the plan, run every
//! emitter, substitute the base address.
//!
//! Compiles are serialized behind one lock and work from an owned
//! snapshot of the document, so a concurrent schema edit can never be
//! observed half-applied. Artifact failures are best-effort: each write
//! is attempted and logged independently, and the first failure is
//! returned once all attempts are done.

use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, error, info};

use crate::emit::{GoServerEmitter, TypeScriptEmitter};
use crate::error::CompileError;
use crate::layout::ProjectLayout;
use crate::plan::Plan;
use crate::{storage, transport, Emitter, GeneratedCode};

pub struct Compiler {
    layout: ProjectLayout,
    lock: Mutex<()>,
}

impl Compiler {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            lock: Mutex::new(()),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Run a full regeneration for the project. Idempotent: every
    /// artifact is a whole-file overwrite.
    pub fn compile(&self) -> Result<(), CompileError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let doc = storage::load_document(&self.layout.document_path())?;
        let plan = Plan::build(&doc);
        let port = self.layout.port();

        let mut first_err: Option<CompileError> = None;

        let client = TypeScriptEmitter;
        for surface in self.layout.surfaces() {
            let dir = self.layout.surface_dir(surface.name);
            if !surface.exists {
                debug!(
                    "skipping {} surface, directory missing: {}",
                    surface.name,
                    dir.display()
                );
                continue;
            }

            info!("generating {} artifacts in {}", client.target(), dir.display());
            match client.emit(&doc, &plan) {
                Ok(code) => write_artifacts(&dir, &code, &mut first_err),
                Err(e) => record(
                    &mut first_err,
                    CompileError::Emit {
                        target: client.target().to_string(),
                        message: e.to_string(),
                    },
                ),
            }

            let request = dir.join("src/api/request.ts");
            if let Err(e) = transport::update_base_url(&request, &port) {
                record(&mut first_err, e);
            }
        }

        let server = GoServerEmitter;
        let server_dir = self.layout.server_dir();
        if server_dir.is_dir() {
            info!(
                "generating {} artifacts in {}",
                server.target(),
                server_dir.display()
            );
            match server.emit(&doc, &plan) {
                Ok(code) => write_artifacts(&server_dir, &code, &mut first_err),
                Err(e) => record(
                    &mut first_err,
                    CompileError::Emit {
                        target: server.target().to_string(),
                        message: e.to_string(),
                    },
                ),
            }
        } else {
            debug!(
                "skipping server generation, directory missing: {}",
                server_dir.display()
            );
        }

        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

/// Write every generated file under `base`, best-effort. Failures are
/// logged and the first one is recorded; later files are still written.
fn write_artifacts(base: &Path, code: &GeneratedCode, first_err: &mut Option<CompileError>) {
    for file in &code.files {
        let path = base.join(&file.path);
        match write_file(&path, &file.content) {
            Ok(()) => debug!("wrote {}", path.display()),
            Err(e) => record(first_err, e),
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), CompileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CompileError::Write {
            path: path.to_path_buf(),
            message: format!("failed to create parent directory: {}", e),
        })?;
    }
    std::fs::write(path, content).map_err(|e| CompileError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn record(first_err: &mut Option<CompileError>, err: CompileError) {
    error!("{}", err);
    if first_err.is_none() {
        *first_err = Some(err);
    }
}
