//! DeclarationDocument - generator output contract
//!
//! Describes the flag/port interface of one program module: where it lives
//! (namespace path), what it is initialized with (flags), and which channels
//! it exposes to host code (ports).
//!
//! Flags, ports, fields, variants and literals are kept as ordered sequences
//! rather than maps, so a producer that emits a name twice yields a document
//! the validator can report on instead of one where the duplicate vanished.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Ident, NamespacePath};

/// Discriminator field name used when a tagged union does not name one
pub const DEFAULT_DISCRIMINATOR: &str = "tag";

/// One declaration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationDocument {
    /// Location inside the rendered module (e.g. `Foo.Bar.Main`)
    pub namespace: NamespacePath,

    /// Initialization-time inputs
    #[serde(default)]
    pub flags: Vec<Field>,

    /// Communication channels with host code
    #[serde(default)]
    pub ports: Vec<PortDecl>,
}

impl DeclarationDocument {
    /// Empty document at `namespace`
    pub fn new(namespace: impl Into<NamespacePath>) -> Self {
        Self {
            namespace: namespace.into(),
            flags: Vec::new(),
            ports: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: Field) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_port(mut self, port: PortDecl) -> Self {
        self.ports.push(port);
        self
    }

    /// First flag named `name`
    pub fn flag(&self, name: &str) -> Option<&Field> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// First port named `name`
    pub fn port(&self, name: &str) -> Option<&PortDecl> {
        self.ports.iter().find(|p| p.name == name)
    }
}

/// Named, typed slot: a flag, an object field or a variant field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: Ident,

    #[serde(rename = "type")]
    pub ty: TypeDescriptor,

    /// Whether `null` is accepted in addition to `ty`
    #[serde(default)]
    pub nullable: bool,
}

impl Field {
    pub fn required(name: impl Into<Ident>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    pub fn nullable(name: impl Into<Ident>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    /// Type without any null wrapper, and whether null is accepted
    ///
    /// The field flag and a `Nullable` descriptor mean the same thing.
    pub fn unwrapped(&self) -> (&TypeDescriptor, bool) {
        let (ty, wrapped) = self.ty.split_nullable();
        (ty, wrapped || self.nullable)
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    /// Outbound: host code hands a single value over, fire-and-forget
    Send,
    /// Inbound: host code registers a callback invoked once per value
    Subscribe,
}

impl PortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDecl {
    pub name: Ident,

    pub direction: PortDirection,

    /// Payload carried by the port
    pub value: TypeDescriptor,
}

impl PortDecl {
    pub fn send(name: impl Into<Ident>, value: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Send,
            value,
        }
    }

    pub fn subscribe(name: impl Into<Ident>, value: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Subscribe,
            value,
        }
    }
}

/// Structural description of an accepted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    String,
    Number,
    Boolean,
    Null,

    /// Closed set of string literals
    Literals { literals: Vec<String> },

    /// Fixed field set
    Object {
        #[serde(default)]
        fields: Vec<Field>,
    },

    /// Homogeneous list
    Array { elements: Box<TypeDescriptor> },

    /// String-keyed dictionary
    Record { values: Box<TypeDescriptor> },

    /// Closed set of variants told apart by the discriminator field
    TaggedUnion {
        #[serde(default = "default_discriminator")]
        discriminator: Ident,
        variants: Vec<Variant>,
    },

    /// Payload without information (`Record<string, never>`)
    Empty,

    /// Wrapped type or null
    Nullable { of: Box<TypeDescriptor> },
}

fn default_discriminator() -> Ident {
    Ident::from(DEFAULT_DISCRIMINATOR)
}

impl TypeDescriptor {
    pub fn literals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Literals {
            literals: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Self::Object { fields }
    }

    pub fn array(elements: TypeDescriptor) -> Self {
        Self::Array {
            elements: Box::new(elements),
        }
    }

    pub fn record(values: TypeDescriptor) -> Self {
        Self::Record {
            values: Box::new(values),
        }
    }

    /// Tagged union discriminated by `tag`
    pub fn tagged_union(variants: Vec<Variant>) -> Self {
        Self::TaggedUnion {
            discriminator: default_discriminator(),
            variants,
        }
    }

    pub fn nullable(of: TypeDescriptor) -> Self {
        Self::Nullable { of: Box::new(of) }
    }

    /// Inner type and whether null is accepted on top of it
    pub fn split_nullable(&self) -> (&TypeDescriptor, bool) {
        match self {
            Self::Nullable { of } => (&**of, true),
            other => (other, false),
        }
    }

    /// Short name of the descriptor kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Literals { .. } => "literal union",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Record { .. } => "record",
            Self::TaggedUnion { .. } => "tagged union",
            Self::Empty => "empty",
            Self::Nullable { .. } => "nullable",
        }
    }
}

/// One arm of a tagged union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Discriminator value selecting this arm
    pub tag: String,

    /// Fields carried in addition to the discriminator
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Variant {
    pub fn new(tag: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }
}

/// Documents produced by one generation run
///
/// Rendered together into a single declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationBatch {
    #[serde(default)]
    pub documents: Vec<DeclarationDocument>,
}

impl DeclarationBatch {
    pub fn new(documents: Vec<DeclarationDocument>) -> Self {
        Self { documents }
    }

    pub fn push(&mut self, document: DeclarationDocument) {
        self.documents.push(document);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclarationDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl From<DeclarationDocument> for DeclarationBatch {
    fn from(document: DeclarationDocument) -> Self {
        Self {
            documents: vec![document],
        }
    }
}

impl<'a> IntoIterator for &'a DeclarationBatch {
    type Item = &'a DeclarationDocument;
    type IntoIter = std::slice::Iter<'a, DeclarationDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
