//! # Interop Engine
//!
//! Pure operations over declaration documents.
//!
//! Responsibilities:
//! - `validate`: collect every structural violation of a document or batch
//! - `diff`: lazy, restartable pre-order comparison of two documents
//! - `render`: deterministic declaration-file text
//!
//! ## Example
//!
//! ```
//! use contracts::{DeclarationDocument, Field, PortDecl, TypeDescriptor};
//! use interop_engine::{diff, render, validate};
//!
//! let doc = DeclarationDocument::new("Main")
//!     .with_flag(Field::nullable("currentJwt", TypeDescriptor::String))
//!     .with_port(PortDecl::subscribe("newJwt", TypeDescriptor::String));
//!
//! assert!(validate(&doc).is_ok());
//! assert!(diff(&doc, &doc).is_empty());
//! assert!(render(&doc).unwrap().contains("newJwt: {"));
//! ```

mod diff;
mod render;
mod validate;

pub use diff::{diff, Diff, DiffIter};
pub use render::{render, render_batch, render_with};
pub use validate::{validate, validate_batch};

// Re-export contracts types
pub use contracts::{Discrepancy, DiscrepancyKind, SchemaViolation, ValidationErrors, ValidationResult};
