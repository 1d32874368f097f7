//! Constructors for freshly synthesized syntax
//!
//! Every factory takes the leading and trailing trivia the new syntax should
//! carry, so callers decide layout explicitly. The shapes produced here match
//! what the parser builds for the same text.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use super::SwiftSyntaxKind;
use super::trivia::{GreenElement, Trivia};

pub fn token(kind: SwiftSyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

pub fn node(kind: SwiftSyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

/// `leading` + token + `trailing`
fn surrounded(
    kind: SwiftSyntaxKind,
    text: &str,
    leading: &Trivia,
    trailing: &Trivia,
) -> Vec<GreenElement> {
    let mut elements = leading.to_green();
    elements.push(token(kind, text));
    elements.extend(trailing.to_green());
    elements
}

/// `Name`
pub fn simple_type(name: &str, leading: &Trivia, trailing: &Trivia) -> GreenNode {
    node(
        SwiftSyntaxKind::SimpleType,
        surrounded(SwiftSyntaxKind::Ident, name, leading, trailing),
    )
}

/// `@attribute Name`
pub fn attributed_type(
    attribute_name: &str,
    name: &str,
    leading: &Trivia,
    trailing: &Trivia,
) -> GreenNode {
    let attributes = attribute_list(vec![attribute(attribute_name, leading, &Trivia::spaces(1))]);
    let base = simple_type(name, &Trivia::empty(), trailing);
    node(
        SwiftSyntaxKind::AttributedType,
        vec![NodeOrToken::Node(attributes), NodeOrToken::Node(base)],
    )
}

/// A clause entry, optionally followed by a comma with `comma_trailing`
pub fn inherited_type(ty: GreenNode, comma_trailing: Option<&Trivia>) -> GreenNode {
    let mut children = vec![NodeOrToken::Node(ty)];
    if let Some(trailing) = comma_trailing {
        children.extend(surrounded(
            SwiftSyntaxKind::Comma,
            ",",
            &Trivia::empty(),
            trailing,
        ));
    }
    node(SwiftSyntaxKind::InheritedType, children)
}

/// `: entries`
pub fn inheritance_clause(colon_trailing: &Trivia, entries: Vec<GreenNode>) -> GreenNode {
    let list = node(
        SwiftSyntaxKind::InheritedTypeList,
        entries.into_iter().map(NodeOrToken::Node).collect(),
    );
    let mut children = surrounded(
        SwiftSyntaxKind::Colon,
        ":",
        &Trivia::empty(),
        colon_trailing,
    );
    children.push(NodeOrToken::Node(list));
    node(SwiftSyntaxKind::InheritanceClause, children)
}

/// `@name`
pub fn attribute(name: &str, leading: &Trivia, trailing: &Trivia) -> GreenNode {
    let mut children = leading.to_green();
    children.push(token(SwiftSyntaxKind::At, "@"));
    children.push(token(SwiftSyntaxKind::Ident, name));
    children.extend(trailing.to_green());
    node(SwiftSyntaxKind::Attribute, children)
}

pub fn attribute_list(attributes: Vec<GreenNode>) -> GreenNode {
    node(
        SwiftSyntaxKind::AttributeList,
        attributes.into_iter().map(NodeOrToken::Node).collect(),
    )
}

/// A modifier keyword such as `final`
pub fn modifier(keyword: &str, leading: &Trivia, trailing: &Trivia) -> GreenNode {
    node(
        SwiftSyntaxKind::Modifier,
        surrounded(SwiftSyntaxKind::Ident, keyword, leading, trailing),
    )
}

pub fn modifier_list(modifiers: Vec<GreenNode>) -> GreenNode {
    node(
        SwiftSyntaxKind::ModifierList,
        modifiers.into_iter().map(NodeOrToken::Node).collect(),
    )
}
