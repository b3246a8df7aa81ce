//! Project directory layout: client surfaces, server tree, schema
//! document, and the configured dev-server port.
//!
//! The layout is an external collaborator from the compiler's point of
//! view: it only ever checks what exists and reads the port, it never
//! scaffolds surfaces.

use std::path::{Path, PathBuf};

use tracing::warn;

/// The client surfaces a project may carry. Each is a subdirectory under
/// `clients/`; a surface that was never scaffolded simply doesn't exist.
pub const CLIENT_SURFACES: [&str; 3] = ["web", "mobile", "desktop"];

pub const DEFAULT_PORT: &str = "8080";

/// One client surface and whether its directory exists.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceStatus {
    pub name: &'static str,
    pub exists: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the apex document.
    pub fn document_path(&self) -> PathBuf {
        self.root.join("apex.json")
    }

    /// Directory of one client surface.
    pub fn surface_dir(&self, surface: &str) -> PathBuf {
        self.root.join("clients").join(surface)
    }

    /// Root of the server source tree.
    pub fn server_dir(&self) -> PathBuf {
        self.root.join("server")
    }

    /// Existence of every known client surface.
    pub fn surfaces(&self) -> Vec<SurfaceStatus> {
        CLIENT_SURFACES
            .iter()
            .map(|name| SurfaceStatus {
                name,
                exists: self.surface_dir(name).is_dir(),
            })
            .collect()
    }

    /// The configured dev-server port, read from `PORT=` in the server
    /// tree's `.env` file. Falls back to 8080 when the file or the key
    /// is missing.
    pub fn port(&self) -> String {
        let env_path = self.server_dir().join(".env");
        let content = match std::fs::read_to_string(&env_path) {
            Ok(content) => content,
            Err(_) => {
                warn!(
                    "no .env at {}, using default port {}",
                    env_path.display(),
                    DEFAULT_PORT
                );
                return DEFAULT_PORT.to_string();
            }
        };

        for line in content.lines() {
            if let Some(port) = line.trim().strip_prefix("PORT=") {
                return port.trim().to_string();
            }
        }

        warn!(
            "PORT= not found in {}, using default {}",
            env_path.display(),
            DEFAULT_PORT
        );
        DEFAULT_PORT.to_string()
    }
}
