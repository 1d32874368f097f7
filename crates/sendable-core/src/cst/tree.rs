//! Owned, thread-safe handle on a parsed source unit

use rowan::GreenNode;
use std::fmt;

use super::SwiftSyntaxNode;
use super::ast::{AstNode, SourceFile};

/// An immutable syntax tree
///
/// Wraps the green root, which is `Send + Sync` and cheap to clone. Red views
/// are created on demand with [`SyntaxTree::root`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    green: GreenNode,
}

impl SyntaxTree {
    pub fn new(green: GreenNode) -> Self {
        Self { green }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn into_green(self) -> GreenNode {
        self.green
    }

    pub fn root(&self) -> SwiftSyntaxNode {
        SwiftSyntaxNode::new_root(self.green.clone())
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.root())
    }

    /// Source text of the whole tree
    pub fn print(&self) -> String {
        self.root().text().to_string()
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
