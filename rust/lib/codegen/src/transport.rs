//! Base-address substitution in the request transport module.
//!
//! The transport file (`request.ts`) ships with the client scaffold and
//! may be hand-edited; only the one `const BASE_URL = '...'` assignment
//! is rewritten, everything else survives unmodified.

use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::error::CompileError;

const BASE_URL_PATTERN: &str = r#"const BASE_URL\s*=\s*['"].*?['"]"#;

/// Rewrite the BASE_URL assignment in `path` to point at the configured
/// local port.
pub fn update_base_url(path: &Path, port: &str) -> Result<(), CompileError> {
    let input = std::fs::read_to_string(path).map_err(|e| CompileError::Write {
        path: path.to_path_buf(),
        message: format!("failed to read transport module: {}", e),
    })?;

    let re = Regex::new(BASE_URL_PATTERN).map_err(|e| CompileError::Write {
        path: path.to_path_buf(),
        message: format!("bad substitution pattern: {}", e),
    })?;

    let assignment = format!("const BASE_URL = 'http://localhost:{}'", port);
    let updated = re.replace_all(&input, NoExpand(&assignment));

    std::fs::write(path, updated.as_bytes()).map_err(|e| CompileError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!("updated BASE_URL in {} to port {}", path.display(), port);
    Ok(())
}
