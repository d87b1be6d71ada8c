//! DocPath - location of a node inside a declaration document
//!
//! Rendered as `ports.sendNotification.value.options.badge`. Array elements
//! append `[]`, record values append `[*]`, union variants without a usable
//! tag append their position (`[0]`).

use serde::{Serialize, Serializer};
use std::fmt;

use crate::{Ident, NamespacePath};

/// One step of a `DocPath`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named child: `flags`, a port name, a field name, a variant tag
    Key(Ident),
    /// Element type of an array
    Elements,
    /// Value type of a record
    Values,
    /// Positional child, for variants whose tag cannot name them
    Index(usize),
}

/// Path from the document root to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    /// Empty path (the document itself)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// New path with `key` appended
    pub fn child(&self, key: impl Into<Ident>) -> Self {
        self.with(PathSegment::Key(key.into()))
    }

    /// New path pointing at the element type of an array
    pub fn elements(&self) -> Self {
        self.with(PathSegment::Elements)
    }

    /// New path pointing at the value type of a record
    pub fn values(&self) -> Self {
        self.with(PathSegment::Values)
    }

    /// New path pointing at the `index`-th child
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// Path re-rooted under a namespace, used to tell documents of a batch apart
    pub fn under(&self, namespace: &NamespacePath) -> Self {
        let mut segments: Vec<PathSegment> = namespace
            .segments()
            .iter()
            .cloned()
            .map(PathSegment::Key)
            .collect();
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<document>");
        }

        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i != 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Elements => f.write_str("[]")?,
                PathSegment::Values => f.write_str("[*]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for DocPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
