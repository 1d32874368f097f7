//! Attribute list editing

use rowan::{GreenNode, NodeOrToken};

use super::edit::ShapeError;
use super::{find_child_node, owned_children};
use crate::cst::SwiftSyntaxKind;
use crate::cst::ast::{AstNode, Decl};
use crate::cst::make;
use crate::cst::trivia::{Trivia, leading_trivia, with_leading_trivia};

/// Prepend `@name` to the declaration
///
/// The declaration's leading trivia moves in front of the new attribute, so
/// doc comments stay above it.
pub(crate) fn add_attribute(decl: &Decl, name: &str) -> Result<Option<GreenNode>, ShapeError> {
    if decl.has_attribute(name) {
        return Ok(None);
    }
    if decl.keyword_token().is_none() {
        return Err(ShapeError::new("declaration without a keyword"));
    }

    let green = decl.syntax().green();
    let leading = leading_trivia(&green);
    let stripped = with_leading_trivia(&green, &Trivia::empty());
    let attribute = make::attribute(name, &leading, &Trivia::spaces(1));

    let rebuilt = match find_child_node(&stripped, SwiftSyntaxKind::AttributeList) {
        Some((index, list)) => {
            let mut items = owned_children(list);
            items.insert(0, NodeOrToken::Node(attribute));
            let list = GreenNode::new(list.kind(), items);
            stripped.replace_child(index, NodeOrToken::Node(list))
        }
        None => {
            let mut items = owned_children(&stripped);
            items.insert(0, NodeOrToken::Node(make::attribute_list(vec![attribute])));
            GreenNode::new(stripped.kind(), items)
        }
    };
    Ok(Some(rebuilt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{SwiftSyntaxNode, parse_swift};

    fn add_main_actor(source: &str) -> Option<String> {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        let decl = tree.source_file().unwrap().decls().next().unwrap();
        let decl = Decl::cast(SwiftSyntaxNode::new_root(decl.syntax().green().into_owned())).unwrap();
        add_attribute(&decl, "MainActor")
            .unwrap()
            .map(|g| SwiftSyntaxNode::new_root(g).text().to_string())
    }

    #[test]
    fn test_prepends_to_existing_attributes() {
        assert_eq!(
            add_main_actor("@objc public class Obj {}").unwrap(),
            "@MainActor @objc public class Obj {}"
        );
    }

    #[test]
    fn test_creates_attribute_list() {
        assert_eq!(
            add_main_actor("public func run() {}").unwrap(),
            "@MainActor public func run() {}"
        );
        assert_eq!(
            add_main_actor("struct Obj {}").unwrap(),
            "@MainActor struct Obj {}"
        );
    }

    #[test]
    fn test_doc_comment_stays_above() {
        assert_eq!(
            add_main_actor("\n/// A view model\nfinal class Model {}").unwrap(),
            "\n/// A view model\n@MainActor final class Model {}"
        );
    }

    #[test]
    fn test_existing_attribute_is_not_duplicated() {
        assert_eq!(add_main_actor("@MainActor class Obj {}"), None);
    }
}
