//! # Contracts
//!
//! Frozen data contracts for port/flag declaration documents, shared by every
//! crate of the workspace. Business crates depend on this crate only;
//! reverse dependencies are prohibited.
//!
//! ## Model
//! - `DeclarationDocument`: namespace path + flags + ports
//! - `TypeDescriptor`: recursive payload shape
//! - `SchemaViolation` / `Discrepancy`: validator and differ output, both
//!   located by a `DocPath`

mod discrepancy;
mod document;
mod error;
mod ident;
mod namespace;
mod path;
mod render_options;

pub use discrepancy::*;
pub use document::*;
pub use error::*;
pub use ident::Ident;
pub use namespace::NamespacePath;
pub use path::{DocPath, PathSegment};
pub use render_options::*;
