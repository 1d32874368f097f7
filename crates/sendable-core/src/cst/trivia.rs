//! Trivia values and trivia surgery on green trees
//!
//! The parser attaches trivia to tokens the way Swift tooling does: a token's
//! trailing trivia runs up to, but not including, the next line break, and
//! everything from that line break up to the next token is that token's
//! leading trivia. Trivia tokens are stored as siblings of the token they
//! belong to, so a node's leading trivia is found by descending into its first
//! child and its trailing trivia by descending into its last.
//!
//! [`Trivia`] is a plain value; the `with_*` functions build new green nodes
//! and never touch the input tree.

use rowan::{GreenNode, GreenNodeData, GreenToken, GreenTokenData, NodeOrToken, TextSize};
use std::fmt;
use std::ops::Range;

use super::SwiftSyntaxKind;

/// Owned green element
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;
/// Borrowed green element
pub type GreenElementRef<'a> = NodeOrToken<&'a GreenNodeData, &'a GreenTokenData>;

/// One piece of trivia
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriviaPiece {
    Whitespace(String),
    Newline(String),
    LineComment(String),
    BlockComment(String),
}

impl TriviaPiece {
    pub fn from_token(kind: SwiftSyntaxKind, text: &str) -> Option<Self> {
        let piece = match kind {
            SwiftSyntaxKind::Whitespace => Self::Whitespace(text.to_string()),
            SwiftSyntaxKind::Newline => Self::Newline(text.to_string()),
            SwiftSyntaxKind::LineComment => Self::LineComment(text.to_string()),
            SwiftSyntaxKind::BlockComment => Self::BlockComment(text.to_string()),
            _ => return None,
        };
        Some(piece)
    }

    pub fn kind(&self) -> SwiftSyntaxKind {
        match self {
            Self::Whitespace(_) => SwiftSyntaxKind::Whitespace,
            Self::Newline(_) => SwiftSyntaxKind::Newline,
            Self::LineComment(_) => SwiftSyntaxKind::LineComment,
            Self::BlockComment(_) => SwiftSyntaxKind::BlockComment,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Whitespace(text)
            | Self::Newline(text)
            | Self::LineComment(text)
            | Self::BlockComment(text) => text,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind().is_comment()
    }
}

/// Ordered run of trivia pieces
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trivia {
    pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `count` spaces; zero yields empty trivia
    pub fn spaces(count: usize) -> Self {
        if count == 0 {
            return Self::empty();
        }
        Self {
            pieces: vec![TriviaPiece::Whitespace(" ".repeat(count))],
        }
    }

    pub fn from_pieces(pieces: Vec<TriviaPiece>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn push(&mut self, piece: TriviaPiece) {
        self.pieces.push(piece);
    }

    pub fn extend(&mut self, other: Trivia) {
        self.pieces.extend(other.pieces);
    }

    pub fn contains_newline(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| matches!(p, TriviaPiece::Newline(_)))
    }

    pub fn has_comments(&self) -> bool {
        self.pieces.iter().any(TriviaPiece::is_comment)
    }

    /// Same trivia with comments dropped
    pub fn without_comments(&self) -> Self {
        Self {
            pieces: self
                .pieces
                .iter()
                .filter(|p| !p.is_comment())
                .cloned()
                .collect(),
        }
    }

    /// The line break and indentation directly in front of a token
    ///
    /// For trivia without a line break this is the whitespace alone.
    pub fn indentation(&self) -> Self {
        let start = self
            .pieces
            .iter()
            .rposition(|p| matches!(p, TriviaPiece::Newline(_)))
            .unwrap_or(0);
        Self {
            pieces: self.pieces[start..]
                .iter()
                .filter(|p| !p.is_comment())
                .cloned()
                .collect(),
        }
    }

    /// Green tokens for every piece, in order
    pub fn to_green(&self) -> Vec<GreenElement> {
        self.pieces
            .iter()
            .map(|p| NodeOrToken::Token(GreenToken::new(p.kind().into(), p.text())))
            .collect()
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            f.write_str(piece.text())?;
        }
        Ok(())
    }
}

pub(crate) fn kind_of(element: &GreenElementRef<'_>) -> SwiftSyntaxKind {
    let raw = match element {
        NodeOrToken::Node(node) => node.kind(),
        NodeOrToken::Token(token) => token.kind(),
    };
    SwiftSyntaxKind::from_raw(raw.0).unwrap_or(SwiftSyntaxKind::Error)
}

pub(crate) fn is_trivia_element(element: &GreenElementRef<'_>) -> bool {
    element.as_token().is_some() && kind_of(element).is_trivia()
}

/// Nodes without text carry no tokens worth attaching trivia to
fn is_empty_node(element: &GreenElementRef<'_>) -> bool {
    element
        .as_node()
        .is_some_and(|n| n.text_len() == TextSize::from(0))
}

pub(crate) fn to_owned_element(element: GreenElementRef<'_>) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

fn trivia_of(elements: &[GreenElementRef<'_>]) -> Trivia {
    let pieces = elements
        .iter()
        .filter_map(|e| e.as_token())
        .filter_map(|t| {
            let kind = SwiftSyntaxKind::from_raw(t.kind().0)?;
            TriviaPiece::from_token(kind, t.text())
        })
        .collect();
    Trivia::from_pieces(pieces)
}

/// Trivia in front of the first token of `node`
pub fn leading_trivia(node: &GreenNodeData) -> Trivia {
    let children: Vec<_> = node.children().collect();
    let mut trivia = Trivia::empty();
    for child in &children {
        if is_trivia_element(child) {
            trivia.extend(trivia_of(std::slice::from_ref(child)));
        } else if is_empty_node(child) {
            continue;
        } else {
            if let NodeOrToken::Node(inner) = child {
                trivia.extend(leading_trivia(inner));
            }
            break;
        }
    }
    trivia
}

/// Trivia after the last token of `node`
pub fn trailing_trivia(node: &GreenNodeData) -> Trivia {
    let children: Vec<_> = node.children().collect();
    let mut pieces = Vec::new();
    for child in children.iter().rev() {
        if is_trivia_element(child) {
            let mut own = trivia_of(std::slice::from_ref(child)).pieces;
            own.append(&mut pieces);
            pieces = own;
        } else if is_empty_node(child) {
            continue;
        } else {
            if let NodeOrToken::Node(inner) = child {
                let mut inner = trailing_trivia(inner).pieces;
                inner.append(&mut pieces);
                pieces = inner;
            }
            break;
        }
    }
    Trivia::from_pieces(pieces)
}

/// Copy of `node` whose first token has `trivia` as its leading trivia
pub fn with_leading_trivia(node: &GreenNodeData, trivia: &Trivia) -> GreenNode {
    let children: Vec<_> = node.children().collect();
    let content = children
        .iter()
        .position(|c| !is_trivia_element(c) && !is_empty_node(c))
        .unwrap_or(children.len());
    let has_own_trivia = children[..content].iter().any(is_trivia_element);

    if !has_own_trivia
        && let Some(NodeOrToken::Node(first)) = children.get(content)
    {
        let replaced = with_leading_trivia(first, trivia);
        return node.replace_child(content, NodeOrToken::Node(replaced));
    }

    let mut rebuilt: Vec<GreenElement> = children[..content]
        .iter()
        .filter(|c| !is_trivia_element(c))
        .map(|c| to_owned_element(*c))
        .collect();
    rebuilt.extend(trivia.to_green());
    rebuilt.extend(children[content..].iter().map(|c| to_owned_element(*c)));
    GreenNode::new(node.kind(), rebuilt)
}

/// Copy of `node` whose last token has `trivia` as its trailing trivia
pub fn with_trailing_trivia(node: &GreenNodeData, trivia: &Trivia) -> GreenNode {
    let children: Vec<_> = node.children().collect();
    let content_end = children
        .iter()
        .rposition(|c| !is_trivia_element(c) && !is_empty_node(c))
        .map(|i| i + 1)
        .unwrap_or(0);
    let has_own_trivia = children[content_end..].iter().any(is_trivia_element);

    if !has_own_trivia
        && content_end > 0
        && let NodeOrToken::Node(last) = children[content_end - 1]
    {
        let replaced = with_trailing_trivia(last, trivia);
        return node.replace_child(content_end - 1, NodeOrToken::Node(replaced));
    }

    let mut rebuilt: Vec<GreenElement> = children[..content_end]
        .iter()
        .map(|c| to_owned_element(*c))
        .collect();
    rebuilt.extend(trivia.to_green());
    rebuilt.extend(
        children[content_end..]
            .iter()
            .filter(|c| !is_trivia_element(c))
            .map(|c| to_owned_element(*c)),
    );
    GreenNode::new(node.kind(), rebuilt)
}

/// Indices of the trivia siblings trailing the token at `index`
///
/// Stops in front of the first line break: that belongs to the next token.
pub(crate) fn trailing_range(children: &[GreenElementRef<'_>], index: usize) -> Range<usize> {
    let start = index + 1;
    let mut end = start;
    while end < children.len()
        && is_trivia_element(&children[end])
        && kind_of(&children[end]) != SwiftSyntaxKind::Newline
    {
        end += 1;
    }
    start..end
}

/// Indices of the trivia siblings leading the token at `index`
///
/// When a significant token precedes the run inside the same node, the part
/// of the run before the first line break is that token's trailing trivia.
pub(crate) fn leading_range(children: &[GreenElementRef<'_>], index: usize) -> Range<usize> {
    let mut start = index;
    while start > 0 && is_trivia_element(&children[start - 1]) {
        start -= 1;
    }
    let preceded_by_token = start > 0 && children[start - 1].as_token().is_some();
    if preceded_by_token {
        while start < index && kind_of(&children[start]) != SwiftSyntaxKind::Newline {
            start += 1;
        }
    }
    start..index
}

/// Trivia of the given sibling range
pub(crate) fn trivia_in(children: &[GreenElementRef<'_>], range: Range<usize>) -> Trivia {
    trivia_of(&children[range])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;

    fn first_decl(source: &str) -> GreenNode {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        tree.root()
            .first_child()
            .map(|n| n.green().into_owned())
            .unwrap()
    }

    #[test]
    fn test_leading_and_trailing_trivia_of_declaration() {
        let decl = first_decl("\n  /// Doc\n  public struct A {} // tail\n");
        assert_eq!(leading_trivia(&decl).to_string(), "\n  /// Doc\n  ");
        assert_eq!(trailing_trivia(&decl).to_string(), " // tail");
    }

    #[test]
    fn test_with_leading_trivia_replaces_deep_trivia() {
        let decl = first_decl("\n  public struct A {}");
        let replaced = with_leading_trivia(&decl, &Trivia::spaces(1));
        assert_eq!(rowan_text(&replaced), " public struct A {}");
    }

    #[test]
    fn test_with_trailing_trivia_replaces_deep_trivia() {
        let decl = first_decl("struct A {}   // c");
        let replaced = with_trailing_trivia(&decl, &Trivia::empty());
        assert_eq!(rowan_text(&replaced), "struct A {}");
    }

    #[test]
    fn test_indentation_keeps_last_line_break() {
        let trivia = Trivia::from_pieces(vec![
            TriviaPiece::Newline("\n".into()),
            TriviaPiece::LineComment("// note".into()),
            TriviaPiece::Newline("\n".into()),
            TriviaPiece::Whitespace("    ".into()),
        ]);
        assert_eq!(trivia.indentation().to_string(), "\n    ");
        assert!(trivia.has_comments());
        assert_eq!(trivia.without_comments().to_string(), "\n\n    ");
    }

    #[test]
    fn test_spaces() {
        assert!(Trivia::spaces(0).is_empty());
        assert_eq!(Trivia::spaces(2).to_string(), "  ");
    }

    fn rowan_text(node: &GreenNode) -> String {
        crate::cst::SwiftSyntaxNode::new_root(node.clone())
            .text()
            .to_string()
    }
}
