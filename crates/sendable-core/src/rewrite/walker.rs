//! Bottom-up declaration walk
//!
//! Members are rewritten before the declaration that holds them, and the
//! policy is asked about the declaration with its rewritten members in place.
//! Function bodies and other opaque items are never entered.

use rowan::{GreenNode, GreenNodeData, NodeOrToken};
use tracing::{debug, trace};

use super::edit::Edit;
use super::policy::{DeclPolicy, should_apply};
use super::{find_child_node, owned_children};
use crate::cst::ast::{AstNode, Decl};
use crate::cst::{SwiftSyntaxKind, SwiftSyntaxNode};
use crate::error::SendableError;
use crate::result::Result;

pub(crate) struct Walker<'a> {
    pass: &'a str,
    policy: &'a dyn DeclPolicy,
    edit: &'a Edit,
    edits: usize,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(pass: &'a str, policy: &'a dyn DeclPolicy, edit: &'a Edit) -> Self {
        Self {
            pass,
            policy,
            edit,
            edits: 0,
        }
    }

    /// Number of declarations edited so far
    pub(crate) fn edits(&self) -> usize {
        self.edits
    }

    /// Rewrite the declarations of a source file or member list
    ///
    /// Returns `None` when nothing changed.
    pub(crate) fn rewrite_items(&mut self, list: &GreenNodeData) -> Result<Option<GreenNode>> {
        let mut replaced = Vec::new();
        for (index, child) in list.children().enumerate() {
            let Some(node) = child.into_node() else {
                continue;
            };
            let is_decl = SwiftSyntaxKind::from_raw(node.kind().0).is_some_and(SwiftSyntaxKind::is_decl);
            if !is_decl {
                continue;
            }
            if let Some(rewritten) = self.rewrite_decl(node)? {
                replaced.push((index, rewritten));
            }
        }

        if replaced.is_empty() {
            return Ok(None);
        }
        let mut items = owned_children(list);
        for (index, node) in replaced {
            items[index] = NodeOrToken::Node(node);
        }
        Ok(Some(GreenNode::new(list.kind(), items)))
    }

    fn rewrite_decl(&mut self, green: &GreenNodeData) -> Result<Option<GreenNode>> {
        let current = self.rewrite_members(green)?;
        let intermediate = current.clone().unwrap_or_else(|| green.to_owned());
        let Some(decl) = Decl::cast(SwiftSyntaxNode::new_root(intermediate)) else {
            return Ok(current);
        };
        if !should_apply(self.policy, &decl) {
            return Ok(current);
        }

        match self.edit.apply(&decl) {
            Ok(Some(edited)) => {
                self.edits += 1;
                debug!("Pass '{}': {} on {}", self.pass, self.edit, describe(&decl));
                Ok(Some(edited))
            }
            Ok(None) => {
                trace!("Pass '{}': {} already has it", self.pass, describe(&decl));
                Ok(current)
            }
            Err(err) => Err(SendableError::structural(
                self.pass,
                describe(&decl),
                err.to_string(),
            )),
        }
    }

    fn rewrite_members(&mut self, green: &GreenNodeData) -> Result<Option<GreenNode>> {
        if green.kind() == SwiftSyntaxKind::FunctionDecl.into() {
            return Ok(None);
        }
        let Some((block_index, block)) = find_child_node(green, SwiftSyntaxKind::MemberBlock) else {
            return Ok(None);
        };
        let Some((list_index, list)) = find_child_node(block, SwiftSyntaxKind::MemberList) else {
            return Ok(None);
        };
        let Some(list) = self.rewrite_items(list)? else {
            return Ok(None);
        };
        let block = block.replace_child(list_index, NodeOrToken::Node(list));
        Ok(Some(green.replace_child(block_index, NodeOrToken::Node(block))))
    }
}

/// `class Cache`, `extension Array`, ...
fn describe(decl: &Decl) -> String {
    match decl.name() {
        Some(name) => format!("{} {name}", decl.kind()),
        None => format!("unnamed {}", decl.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;
    use crate::error::ErrorKind;
    use crate::rewrite::edit::Marker;
    use crate::rewrite::policies::{AttributePolicy, PlainMarkerPolicy};
    use crate::cst::ast::DeclKind;

    fn walk(source: &str, policy: &dyn DeclPolicy, edit: &Edit) -> Result<(String, usize)> {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        let mut walker = Walker::new("test", policy, edit);
        let printed = match walker.rewrite_items(tree.green())? {
            Some(green) => SwiftSyntaxNode::new_root(green).text().to_string(),
            None => tree.print(),
        };
        Ok((printed, walker.edits()))
    }

    #[test]
    fn test_nested_declarations_are_rewritten() {
        let source = "public struct Outer {\n    public struct A {}\n    public enum B {}\n    struct Hidden {}\n}\n";
        let (printed, edits) = walk(
            source,
            &PlainMarkerPolicy::default(),
            &Edit::InheritType(Marker::plain("Sendable")),
        )
        .unwrap();
        assert_eq!(
            printed,
            "public struct Outer: Sendable {\n    public struct A: Sendable {}\n    public enum B: Sendable {}\n    struct Hidden {}\n}\n"
        );
        assert_eq!(edits, 3);
    }

    #[test]
    fn test_declined_declarations_are_still_entered() {
        let source = "actor Store {\n    public struct Snapshot {}\n}\nextension Store {\n    public enum Event {}\n}\n";
        let (printed, _) = walk(
            source,
            &PlainMarkerPolicy::default(),
            &Edit::InheritType(Marker::plain("Sendable")),
        )
        .unwrap();
        assert_eq!(
            printed,
            "actor Store {\n    public struct Snapshot: Sendable {}\n}\nextension Store {\n    public enum Event: Sendable {}\n}\n"
        );
    }

    #[test]
    fn test_function_bodies_are_not_entered() {
        let source = "public func make() {\n    struct Local {}\n}\n";
        let policy = AttributePolicy::new(vec![DeclKind::Struct], None);
        let (printed, edits) =
            walk(source, &policy, &Edit::AddAttribute("frozen".into())).unwrap();
        assert_eq!(printed, source);
        assert_eq!(edits, 0);
    }

    #[test]
    fn test_shape_errors_name_pass_and_declaration() {
        let policy = AttributePolicy::new(vec![DeclKind::Function], None);
        let err = walk(
            "func run() {}\n",
            &policy,
            &Edit::InheritType(Marker::plain("Sendable")),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInvariant);
        assert!(err.to_string().contains("function run"));
    }
}
