//! Type identities and source references
//!
//! A [`TypeIdentity`] names one declared type and is the key every
//! population dictionary is indexed by. A [`SourceRef`] is an opaque handle
//! to the declaration site an item came from; the resolver only threads it
//! through to diagnostics.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a declared type: simple name plus optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    pub name: String,
}

impl TypeIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Fully qualified name, `Namespace.Name` when a namespace is present.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}.{}", namespace, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}.{}", namespace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for TypeIdentity {
    type Err = Error;

    /// Parse `Namespace.Name` or a bare `Name`. The namespace is everything
    /// before the last dot.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidIdentity(s.to_string()));
        }

        match s.rsplit_once('.') {
            Some((namespace, name)) => {
                if namespace.is_empty() || name.is_empty() {
                    return Err(Error::InvalidIdentity(s.to_string()));
                }
                Ok(Self::namespaced(namespace, name))
            }
            None => Ok(Self::new(s)),
        }
    }
}

/// Opaque reference to a declaration site: the attribute a record came from,
/// optionally narrowed to one named argument, optionally narrowed further to
/// one position within a list argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub attribute: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl SourceRef {
    pub fn attribute(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            argument: None,
            index: None,
        }
    }

    /// Narrow this reference to a named argument.
    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Narrow this reference to one position within a list argument.
    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attribute)?;
        if let Some(argument) = &self.argument {
            write!(f, ".{argument}")?;
        }
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}
