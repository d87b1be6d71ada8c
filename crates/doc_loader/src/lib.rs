//! # Document Loader
//!
//! Declaration document loading and parsing.
//!
//! Responsibilities:
//! - Parse TOML/JSON declaration documents
//! - Run the validator on everything it hands out as "loaded"
//! - Read renderer options
//!
//! # Example
//!
//! ```no_run
//! use doc_loader::DocumentLoader;
//! use std::path::Path;
//!
//! let doc = DocumentLoader::load_from_path(Path::new("main.toml")).unwrap();
//! println!("Namespace: {}", doc.namespace);
//! ```

mod parser;

pub use contracts::{DeclarationBatch, DeclarationDocument, RenderOptions};
pub use parser::DocumentFormat;

use contracts::ContractError;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Declaration document loader
///
/// Provides static methods to load documents from files or strings.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load and validate a document from file path
    ///
    /// Format is detected from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure (every violation, not just the first)
    pub fn load_from_path(path: &Path) -> Result<DeclarationDocument, ContractError> {
        let document = Self::parse_from_path(path)?;
        interop_engine::validate(&document)?;
        Ok(document)
    }

    /// Load and validate a document from string
    pub fn load_from_str(
        content: &str,
        format: DocumentFormat,
    ) -> Result<DeclarationDocument, ContractError> {
        let document = Self::parse_from_str(content, format)?;
        interop_engine::validate(&document)?;
        Ok(document)
    }

    /// Parse a document from file path without validating it
    pub fn parse_from_path(path: &Path) -> Result<DeclarationDocument, ContractError> {
        Self::read_as(path)
    }

    /// Parse a document from string without validating it
    pub fn parse_from_str(
        content: &str,
        format: DocumentFormat,
    ) -> Result<DeclarationDocument, ContractError> {
        parser::parse(content, format)
    }

    /// Load several documents as one batch
    ///
    /// Validates the batch as a whole, so duplicate namespaces across files
    /// are reported too.
    pub fn load_batch<P: AsRef<Path>>(paths: &[P]) -> Result<DeclarationBatch, ContractError> {
        let mut batch = DeclarationBatch::default();
        for path in paths {
            batch.push(Self::parse_from_path(path.as_ref())?);
        }
        interop_engine::validate_batch(&batch)?;
        Ok(batch)
    }

    /// Load renderer options; missing keys take their defaults
    pub fn load_render_options(path: &Path) -> Result<RenderOptions, ContractError> {
        Self::read_as(path)
    }

    /// Serialize a document to TOML string
    pub fn to_toml(document: &DeclarationDocument) -> Result<String, ContractError> {
        toml::to_string_pretty(document)
            .map_err(|e| ContractError::document_serialize(format!("TOML serialize error: {e}")))
    }

    /// Serialize a document to JSON string
    pub fn to_json(document: &DeclarationDocument) -> Result<String, ContractError> {
        serde_json::to_string_pretty(document)
            .map_err(|e| ContractError::document_serialize(format!("JSON serialize error: {e}")))
    }
}

impl DocumentLoader {
    /// Infer format from file extension
    fn detect_format(path: &Path) -> Result<DocumentFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::document_parse("cannot determine file format from extension")
        })?;

        DocumentFormat::from_extension(ext).ok_or_else(|| {
            ContractError::document_parse(format!("unsupported document format: .{ext}"))
        })
    }

    fn read_as<T: DeserializeOwned>(path: &Path) -> Result<T, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, bytes = content.len(), "read document file");
        parser::parse(&content, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ViolationReason;
    use std::io::Write;

    const JWT_TOML: &str = r#"
namespace = "Main"

[[flags]]
name = "currentJwt"
type = { kind = "string" }
nullable = true

[[ports]]
name = "logout"
direction = "subscribe"
value = { kind = "empty" }

[[ports]]
name = "newJwt"
direction = "subscribe"
value = { kind = "string" }
"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_str_toml() {
        let result = DocumentLoader::load_from_str(JWT_TOML, DocumentFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let doc = result.unwrap();
        assert_eq!(doc.namespace.to_string(), "Main");
        assert_eq!(doc.ports.len(), 2);
    }

    #[test]
    fn test_round_trip_toml() {
        let doc = DocumentLoader::load_from_str(JWT_TOML, DocumentFormat::Toml).unwrap();
        let serialized = DocumentLoader::to_toml(&doc).unwrap();
        let doc2 = DocumentLoader::load_from_str(&serialized, DocumentFormat::Toml).unwrap();
        assert_eq!(doc, doc2);
    }

    #[test]
    fn test_round_trip_json() {
        let doc = DocumentLoader::load_from_str(JWT_TOML, DocumentFormat::Toml).unwrap();
        let json = DocumentLoader::to_json(&doc).unwrap();
        let doc2 = DocumentLoader::load_from_str(&json, DocumentFormat::Json).unwrap();
        assert_eq!(doc, doc2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
namespace = "Main"

[[flags]]
name = "currentJwt"
type = { kind = "string" }

[[flags]]
name = "currentJwt"
type = { kind = "number" }

[[ports]]
name = "newJwt"
direction = "subscribe"
value = { kind = "string" }

[[ports]]
name = "newJwt"
direction = "send"
value = { kind = "string" }
"#;
        let err = DocumentLoader::load_from_str(content, DocumentFormat::Toml).unwrap_err();
        let violations = err.violations().expect("validation error");
        assert_eq!(violations.len(), 2, "got: {violations:?}");
        assert!(matches!(
            violations[0].reason,
            ViolationReason::DuplicateFlag { .. }
        ));
        assert!(matches!(
            violations[1].reason,
            ViolationReason::ConflictingPortDirection { .. }
        ));
    }

    #[test]
    fn test_parse_skips_validation() {
        let content = "namespace = \"\"";
        assert!(DocumentLoader::parse_from_str(content, DocumentFormat::Toml).is_ok());
        assert!(DocumentLoader::load_from_str(content, DocumentFormat::Toml).is_err());
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let file = write_temp(".toml", JWT_TOML);
        let doc = DocumentLoader::load_from_path(file.path()).unwrap();
        assert_eq!(doc.flags.len(), 1);
    }

    #[test]
    fn test_load_from_path_unsupported_extension() {
        let file = write_temp(".yaml", JWT_TOML);
        let err = DocumentLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported document format"), "got: {err}");
    }

    #[test]
    fn test_load_batch_reports_duplicate_namespace() {
        let a = write_temp(".toml", JWT_TOML);
        let b = write_temp(".toml", JWT_TOML);
        let err = DocumentLoader::load_batch(&[a.path(), b.path()]).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].reason,
            ViolationReason::DuplicateNamespace { .. }
        ));
    }

    #[test]
    fn test_load_render_options() {
        let file = write_temp(".toml", "module_name = \"App\"\n");
        let options = DocumentLoader::load_render_options(file.path()).unwrap();
        assert_eq!(options.module_name, "App");
        assert_eq!(options.node_type, "HTMLElement");
    }
}
