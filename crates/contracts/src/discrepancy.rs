//! Discrepancy - one structural difference between two documents
//!
//! Comparison output, never an error: a diff run that finds differences
//! still completes normally.

use serde::Serialize;
use std::fmt;

use crate::{DocPath, Ident, NamespacePath, PortDirection};

/// Difference found at `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub path: DocPath,
    pub kind: DiscrepancyKind,
}

impl Discrepancy {
    pub fn new(path: DocPath, kind: DiscrepancyKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// What differs
///
/// "Missing" means present in the expected document only, "extra" means
/// present in the actual document only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum DiscrepancyKind {
    NamespaceMismatch {
        expected: NamespacePath,
        actual: NamespacePath,
    },
    MissingFlag(Ident),
    ExtraFlag(Ident),
    MissingPort(Ident),
    ExtraPort(Ident),
    DirectionMismatch {
        expected: PortDirection,
        actual: PortDirection,
    },
    /// Descriptors of different kinds; nothing below is compared
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    NullabilityMismatch {
        expected: bool,
        actual: bool,
    },
    MissingField(Ident),
    ExtraField(Ident),
    LiteralSetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },
    TagSetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },
    DiscriminatorMismatch {
        expected: Ident,
        actual: Ident,
    },
}

fn nullability(nullable: bool) -> &'static str {
    if nullable {
        "nullable"
    } else {
        "required"
    }
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespaceMismatch { expected, actual } => {
                write!(f, "namespace mismatch: expected `{expected}`, found `{actual}`")
            }
            Self::MissingFlag(name) => write!(f, "missing flag: {name}"),
            Self::ExtraFlag(name) => write!(f, "extra flag: {name}"),
            Self::MissingPort(name) => write!(f, "missing port: {name}"),
            Self::ExtraPort(name) => write!(f, "extra port: {name}"),
            Self::DirectionMismatch { expected, actual } => {
                write!(f, "direction mismatch: expected {expected}, found {actual}")
            }
            Self::KindMismatch { expected, actual } => {
                write!(f, "type mismatch: expected {expected}, found {actual}")
            }
            Self::NullabilityMismatch { expected, actual } => write!(
                f,
                "nullability mismatch: expected {}, found {}",
                nullability(*expected),
                nullability(*actual)
            ),
            Self::MissingField(name) => write!(f, "missing field: {name}"),
            Self::ExtraField(name) => write!(f, "extra field: {name}"),
            Self::LiteralSetMismatch { missing, extra } => {
                write!(f, "literal set mismatch: missing {missing:?}, extra {extra:?}")
            }
            Self::TagSetMismatch { missing, extra } => {
                write!(f, "tag set mismatch: missing {missing:?}, extra {extra:?}")
            }
            Self::DiscriminatorMismatch { expected, actual } => {
                write!(f, "discriminator mismatch: expected `{expected}`, found `{actual}`")
            }
        }
    }
}
