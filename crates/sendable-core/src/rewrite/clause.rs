//! Inheritance clause editing
//!
//! A new entry is always appended after the last one. The separator in front
//! of it copies the layout the author already uses:
//!
//! - entries on their own lines: the new entry goes on its own line with the
//!   indentation of the previous last entry
//! - last entry on the same line as the one before it: the trivia after the
//!   comma in front of the last entry, or a single space when the clause has
//!   only one entry
//!
//! Whatever followed the previous last entry (a space before `{`, a trailing
//! comment) moves behind the new entry, so the text after the clause is left
//! exactly as it was.

use rowan::{GreenNode, GreenNodeData, NodeOrToken};

use super::edit::{Marker, ShapeError};
use super::{find_child_node, owned_children};
use crate::cst::SwiftSyntaxKind;
use crate::cst::ast::{AstNode, Decl, DeclKind};
use crate::cst::make;
use crate::cst::trivia::{
    GreenElementRef, Trivia, leading_trivia, trailing_range, trailing_trivia, trivia_in,
    with_trailing_trivia,
};

pub(crate) fn inherit_type(decl: &Decl, marker: &Marker) -> Result<Option<GreenNode>, ShapeError> {
    if !decl.kind().is_nominal() {
        return Err(ShapeError::new("a function has no inheritance clause"));
    }
    if decl.inherits(&marker.name) {
        return Ok(None);
    }

    let green = decl.syntax().green();
    let updated = match decl.inheritance_clause() {
        Some(clause) => {
            let appended = append_entry(&clause.syntax().green(), marker)?;
            green.replace_child(clause.syntax().index(), NodeOrToken::Node(appended))
        }
        None => synthesize_clause(decl, &green, marker)?,
    };
    Ok(Some(updated))
}

fn append_entry(clause: &GreenNodeData, marker: &Marker) -> Result<GreenNode, ShapeError> {
    let (list_index, list) = find_child_node(clause, SwiftSyntaxKind::InheritedTypeList)
        .ok_or_else(|| ShapeError::new("inheritance clause without a type list"))?;

    let entries: Vec<(usize, &GreenNodeData)> = list
        .children()
        .enumerate()
        .filter_map(|(i, child)| {
            child
                .into_node()
                .filter(|n| n.kind() == SwiftSyntaxKind::InheritedType.into())
                .map(|n| (i, n))
        })
        .collect();
    let Some(&(last_index, last)) = entries.last() else {
        return Err(ShapeError::new("inheritance clause without entries"));
    };
    if comma_index(last).is_some() {
        return Err(ShapeError::new("inheritance clause ends with a comma"));
    }

    let leading = leading_trivia(last).indentation();
    let trailing = trailing_trivia(last);
    let separator = if leading.contains_newline() {
        Trivia::empty()
    } else if let Some(&(_, previous)) = entries.iter().rev().nth(1) {
        comma_trailing(previous).without_comments()
    } else {
        Trivia::spaces(1)
    };

    let stripped = with_trailing_trivia(last, &Trivia::empty());
    let mut terminated = owned_children(&stripped);
    terminated.push(make::token(SwiftSyntaxKind::Comma, ","));
    terminated.extend(separator.to_green());

    let entry = make::inherited_type(marker.to_type(&leading, &trailing), None);
    let mut items = owned_children(list);
    items[last_index] = NodeOrToken::Node(GreenNode::new(last.kind(), terminated));
    items.insert(last_index + 1, NodeOrToken::Node(entry));

    let list = GreenNode::new(list.kind(), items);
    Ok(clause.replace_child(list_index, NodeOrToken::Node(list)))
}

/// Insert `: Marker` after the name, generic parameters or extended type
fn synthesize_clause(
    decl: &Decl,
    green: &GreenNodeData,
    marker: &Marker,
) -> Result<GreenNode, ShapeError> {
    let children: Vec<GreenElementRef<'_>> = green.children().collect();
    let mut rebuilt = owned_children(green);

    let anchor = if decl.kind() == DeclKind::Extension {
        let extended = decl
            .extended_type()
            .ok_or_else(|| ShapeError::new("extension without an extended type"))?;
        Some(extended.syntax().index())
    } else {
        decl.generic_params().map(|g| g.index())
    };

    match anchor {
        Some(index) => {
            let node = children
                .get(index)
                .and_then(|c| c.into_node())
                .ok_or_else(|| ShapeError::new("clause anchor is not a node"))?;
            let clause = new_clause(marker, trailing_trivia(node));
            rebuilt[index] = NodeOrToken::Node(with_trailing_trivia(node, &Trivia::empty()));
            rebuilt.insert(index + 1, NodeOrToken::Node(clause));
        }
        None => {
            let name = decl
                .name_token()
                .ok_or_else(|| ShapeError::new("declaration without a name"))?;
            let range = trailing_range(&children, name.index());
            let clause = new_clause(marker, trivia_in(&children, range.clone()));
            rebuilt.splice(range, [NodeOrToken::Node(clause)]);
        }
    }

    Ok(GreenNode::new(green.kind(), rebuilt))
}

/// The anchor's trailing trivia ends up behind the new entry
fn new_clause(marker: &Marker, trailing: Trivia) -> GreenNode {
    let entry = make::inherited_type(marker.to_type(&Trivia::empty(), &trailing), None);
    make::inheritance_clause(&Trivia::spaces(1), vec![entry])
}

fn comma_index(entry: &GreenNodeData) -> Option<usize> {
    entry.children().position(|c| {
        c.into_token()
            .is_some_and(|t| t.kind() == SwiftSyntaxKind::Comma.into())
    })
}

fn comma_trailing(entry: &GreenNodeData) -> Trivia {
    let children: Vec<GreenElementRef<'_>> = entry.children().collect();
    match comma_index(entry) {
        Some(index) => trivia_in(&children, trailing_range(&children, index)),
        None => Trivia::empty(),
    }
}
