use std::path::Path;

use compio::fs;
use serde_json::Value;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Loosely-typed contents of a `york.json` structure file. The document is
/// kept as a raw JSON value; shape validation happens when the project tree
/// is built from it.
#[derive(Debug, Clone)]
pub struct StructureDocument {
    value: Value,
}

impl StructureDocument {
    pub async fn read(path: &Path) -> Result<Self, StructureDocumentError> {
        debug!(
            "Opening structure file: {}",
            path.best_effort_path_display()
        );
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read structure file: {} bytes", bytes.len());

        String::from_utf8_lossy(&bytes).as_ref().try_into()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl TryFrom<&str> for StructureDocument {
    type Error = StructureDocumentError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let value = serde_json::from_str(contents).context(ParseSnafu)?;
        Ok(StructureDocument { value })
    }
}

#[derive(Debug, Snafu)]
pub enum StructureDocumentError {
    #[snafu(display("Failed to read the structure file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the structure file"))]
    ParseError { source: serde_json::Error },
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[compio::test]
    async fn document_returns_error_on_nonexistent_file() {
        let result = StructureDocument::read(Path::new("nonexistent.json")).await;

        assert!(matches!(result, Err(StructureDocumentError::ReadError { .. })));
    }

    #[compio::test]
    async fn document_reads_structure_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        std::io::Write::write_all(&mut file, br#"{"src": ["main.go"]}"#).unwrap();

        let document = StructureDocument::read(file.path()).await.unwrap();

        assert!(document.value().is_object());
    }

    #[test]
    fn document_returns_error_on_invalid_json() {
        let invalid_json = r#"{"src": ["unclosed"#;

        let result: Result<StructureDocument, _> = invalid_json.try_into();

        assert!(matches!(result, Err(StructureDocumentError::ParseError { .. })));
    }

    #[test]
    fn document_returns_error_on_empty_file() {
        let result: Result<StructureDocument, _> = "".try_into();

        assert!(matches!(result, Err(StructureDocumentError::ParseError { .. })));
    }

    #[test]
    fn document_accepts_any_json_value_shape() {
        // Shape validation is deferred to the tree builder; a bare string or
        // even a number is still a well-formed document.
        let string_doc: Result<StructureDocument, _> = r#""notes.txt""#.try_into();
        let number_doc: Result<StructureDocument, _> = "42".try_into();

        assert!(string_doc.unwrap().value().is_string());
        assert!(number_doc.unwrap().value().is_number());
    }
}
