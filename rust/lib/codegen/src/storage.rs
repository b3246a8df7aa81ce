//! Loading the apex document from project storage.

use std::path::Path;

use tracing::{debug, info};

use crate::error::CompileError;
use crate::model::ApexDocument;

/// Read and parse the apex document. Any failure here is fatal for the
/// compile: with no document there is nothing to translate.
pub fn load_document(path: &Path) -> Result<ApexDocument, CompileError> {
    debug!("loading apex document from {}", path.display());

    let data = std::fs::read(path).map_err(|e| CompileError::Storage {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let doc: ApexDocument = serde_json::from_slice(&data).map_err(|e| CompileError::Storage {
        path: path.to_path_buf(),
        message: format!("invalid document: {}", e),
    })?;

    info!(
        "loaded apex document: {} endpoints, {} schemas, {} operations",
        doc.endpoints.len(),
        doc.schemas.len(),
        doc.operations.len()
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apex.json");
        std::fs::write(
            &path,
            r#"{"endpoints": [], "schemas": [{"name": "Widget", "fields": {"name": "string"}}], "operations": []}"#,
        )
        .unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.schemas.len(), 1);
        assert_eq!(doc.schemas[0].name, "Widget");
    }

    #[test]
    fn missing_document_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("apex.json")).unwrap_err();
        assert!(matches!(err, CompileError::Storage { .. }));
    }

    #[test]
    fn unparsable_document_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apex.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, CompileError::Storage { .. }));
    }
}
