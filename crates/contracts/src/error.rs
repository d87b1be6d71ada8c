//! Layered error definitions
//!
//! Categorized by source: document parsing / schema validation / io

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::DocPath;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Document Errors =====
    /// Document or render options could not be parsed
    #[error("document parse error: {message}")]
    DocumentParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document could not be serialized
    #[error("document serialize error: {message}")]
    DocumentSerialize { message: String },

    // ===== Validation Errors =====
    /// Document breaks one or more structural invariants
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create document parse error
    pub fn document_parse(message: impl Into<String>) -> Self {
        Self::DocumentParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create document serialize error
    pub fn document_serialize(message: impl Into<String>) -> Self {
        Self::DocumentSerialize {
            message: message.into(),
        }
    }

    /// Collected schema violations, if this is a validation error
    pub fn violations(&self) -> Option<&[SchemaViolation]> {
        match self {
            Self::Validation(errors) => Some(errors.violations()),
            _ => None,
        }
    }
}

/// Why a document node is invalid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationReason {
    // ===== Naming Errors =====
    #[error("namespace path must not be empty")]
    EmptyNamespace,

    #[error("`{name}` is not a valid identifier")]
    InvalidIdentifier { name: String },

    #[error("duplicate flag `{name}`")]
    DuplicateFlag { name: String },

    #[error("duplicate port `{name}`")]
    DuplicatePort { name: String },

    /// Same port name declared with both directions
    #[error("port `{name}` is declared as both send and subscribe")]
    ConflictingPortDirection { name: String },

    #[error("duplicate field `{name}`")]
    DuplicateField { name: String },

    /// Two documents of one batch share a namespace path
    #[error("namespace `{namespace}` is declared by more than one document")]
    DuplicateNamespace { namespace: String },

    // ===== Descriptor Errors =====
    #[error("duplicate literal \"{value}\"")]
    DuplicateLiteral { value: String },

    #[error("duplicate tag \"{tag}\"")]
    DuplicateTag { tag: String },

    #[error("literal union must have at least one member")]
    EmptyLiteralUnion,

    #[error("tagged union must have at least one variant")]
    EmptyTaggedUnion,

    #[error("tag value must not be empty")]
    EmptyTag,

    /// Variant field reuses the union's discriminator name
    #[error("field `{name}` collides with the union discriminator")]
    DiscriminatorCollision { name: String },

    /// `null` added to something that already accepts it
    #[error("type is already nullable")]
    RedundantNullable,
}

/// One structural defect, located by its path inside the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[error("schema violation at '{path}': {reason}")]
pub struct SchemaViolation {
    pub path: DocPath,
    pub reason: ViolationReason,
}

impl SchemaViolation {
    pub fn new(path: DocPath, reason: ViolationReason) -> Self {
        Self { path, reason }
    }
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    violations: Vec<SchemaViolation>,
}

impl ValidationErrors {
    pub fn new(violations: Vec<SchemaViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_vec(self) -> Vec<SchemaViolation> {
        self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "document failed validation with {} violation(s)",
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = SchemaViolation;
    type IntoIter = std::vec::IntoIter<SchemaViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

/// Outcome of validating a document or batch
pub type ValidationResult = Result<(), ValidationErrors>;
