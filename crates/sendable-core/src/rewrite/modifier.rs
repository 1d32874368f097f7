//! Modifier list editing

use rowan::{GreenNode, GreenNodeData, NodeOrToken};

use super::edit::ShapeError;
use super::owned_children;
use crate::cst::ast::{AstNode, Decl};
use crate::cst::make;
use crate::cst::trivia::{GreenElementRef, Trivia, leading_range, trailing_trivia, trivia_in};

/// Add `keyword` after the existing modifiers
///
/// Without modifiers the new one takes the declaration keyword's place at the
/// start of the line, leading comments included.
pub(crate) fn add_modifier(decl: &Decl, keyword: &str) -> Result<Option<GreenNode>, ShapeError> {
    if decl.has_modifier(keyword) {
        return Ok(None);
    }
    let green = decl.syntax().green();

    let Some(modifiers) = decl.modifiers() else {
        let keyword_token = decl
            .keyword_token()
            .ok_or_else(|| ShapeError::new("declaration without a keyword"))?;
        let children: Vec<GreenElementRef<'_>> = green.children().collect();
        let range = leading_range(&children, keyword_token.index());
        let modifier = make::modifier(
            keyword,
            &trivia_in(&children, range.clone()),
            &Trivia::spaces(1),
        );
        let mut rebuilt = owned_children(&green);
        rebuilt.splice(range, [NodeOrToken::Node(make::modifier_list(vec![modifier]))]);
        return Ok(Some(GreenNode::new(green.kind(), rebuilt)));
    };

    let list = modifiers.syntax().green();
    let existing: Vec<&GreenNodeData> = list.children().filter_map(|c| c.into_node()).collect();
    let (Some(first), Some(last)) = (existing.first(), existing.last()) else {
        return Err(ShapeError::new("empty modifier list"));
    };

    // `public\nclass` keeps the line break in front of the keyword
    let (leading, trailing) = if trailing_trivia(last).is_empty() {
        (Trivia::spaces(1), Trivia::empty())
    } else {
        let spacing = trailing_trivia(first).without_comments();
        if spacing.is_empty() {
            (Trivia::empty(), Trivia::spaces(1))
        } else {
            (Trivia::empty(), spacing)
        }
    };

    let mut items = owned_children(&list);
    items.push(NodeOrToken::Node(make::modifier(keyword, &leading, &trailing)));
    let rebuilt = GreenNode::new(list.kind(), items);
    Ok(Some(green.replace_child(
        modifiers.syntax().index(),
        NodeOrToken::Node(rebuilt),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{SwiftSyntaxNode, parse_swift};

    fn add_final(source: &str) -> Option<String> {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        let decl = tree.source_file().unwrap().decls().next().unwrap();
        let decl = Decl::cast(SwiftSyntaxNode::new_root(decl.syntax().green().into_owned())).unwrap();
        add_modifier(&decl, "final")
            .unwrap()
            .map(|g| SwiftSyntaxNode::new_root(g).text().to_string())
    }

    #[test]
    fn test_appends_after_existing_modifiers() {
        assert_eq!(
            add_final("public class Obj: Sendable {}").unwrap(),
            "public final class Obj: Sendable {}"
        );
        assert_eq!(
            add_final("@objc public  class Obj {}").unwrap(),
            "@objc public  final  class Obj {}"
        );
    }

    #[test]
    fn test_takes_keyword_position_without_modifiers() {
        assert_eq!(
            add_final("\n/// Doc\nclass Obj {}").unwrap(),
            "\n/// Doc\nfinal class Obj {}"
        );
        assert_eq!(
            add_final("@MainActor\nclass Obj {}").unwrap(),
            "@MainActor\nfinal class Obj {}"
        );
    }

    #[test]
    fn test_line_break_after_modifiers_is_kept() {
        assert_eq!(
            add_final("public\nclass Obj {}").unwrap(),
            "public final\nclass Obj {}"
        );
    }

    #[test]
    fn test_existing_modifier_is_not_duplicated() {
        assert_eq!(add_final("public final class Obj {}"), None);
    }
}
