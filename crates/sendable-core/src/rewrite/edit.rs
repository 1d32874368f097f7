//! Edits a pass can apply to a declaration

use rowan::GreenNode;
use std::fmt;
use thiserror::Error;

use super::{attribute, clause, modifier};
use crate::cst::ast::Decl;
use crate::cst::make;
use crate::cst::trivia::Trivia;

/// A conformance added to inheritance clauses
///
/// `attribute` wraps the entry, as in `@unchecked Sendable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    pub name: String,
    pub attribute: Option<String>,
}

impl Marker {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: None,
        }
    }

    pub fn unchecked(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: Some(attribute.into()),
        }
    }

    pub fn is_attributed(&self) -> bool {
        self.attribute.is_some()
    }

    /// Type node for a new clause entry
    pub(crate) fn to_type(&self, leading: &Trivia, trailing: &Trivia) -> GreenNode {
        match &self.attribute {
            Some(attribute) => make::attributed_type(attribute, &self.name, leading, trailing),
            None => make::simple_type(&self.name, leading, trailing),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(f, "@{attribute} {}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// The declaration shape does not fit the editor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

impl ShapeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Append a marker to the inheritance clause, creating the clause if needed
    InheritType(Marker),
    /// Add a modifier keyword such as `final`
    AddModifier(String),
    /// Prepend an attribute such as `@MainActor`
    AddAttribute(String),
}

impl Edit {
    /// Apply the edit to `decl`
    ///
    /// Returns `Ok(None)` when the declaration already carries what the edit
    /// would add. The returned node replaces `decl` in its parent.
    pub fn apply(&self, decl: &Decl) -> Result<Option<GreenNode>, ShapeError> {
        match self {
            Self::InheritType(marker) => clause::inherit_type(decl, marker),
            Self::AddModifier(keyword) => modifier::add_modifier(decl, keyword),
            Self::AddAttribute(name) => attribute::add_attribute(decl, name),
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InheritType(marker) => write!(f, "inherit {marker}"),
            Self::AddModifier(keyword) => write!(f, "add modifier {keyword}"),
            Self::AddAttribute(name) => write!(f, "add attribute @{name}"),
        }
    }
}
