//! NamespacePath - dotted location of a declaration document
//!
//! `Foo.Bar.Main` nests the document three namespaces deep inside the
//! rendered module. Kept flat as an ordered sequence of identifiers so
//! diagnostics can point at a segment by index.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::Ident;

/// Ordered sequence of namespace identifiers
///
/// Serialized as the dotted string (`"Foo.Bar.Main"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath(Vec<Ident>);

impl NamespacePath {
    pub fn new(segments: Vec<Ident>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[Ident] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for NamespacePath {
    type Err = Infallible;

    /// Split on `.`
    ///
    /// Never fails: an empty string yields an empty path and `A..B` yields an
    /// empty segment. Both are reported later by the validator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self(s.split('.').map(Ident::from).collect()))
    }
}

impl From<&str> for NamespacePath {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(path) => path,
            Err(never) => match never {},
        }
    }
}

impl<I: Into<Ident>> FromIterator<I> for NamespacePath {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl Serialize for NamespacePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NamespacePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}
