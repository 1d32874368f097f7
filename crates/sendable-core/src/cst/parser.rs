//! Declaration-surface parser for Swift
//!
//! Builds a lossless CST that models exactly what the rewrite engine needs:
//! attributes, modifiers, nominal type declarations with their generic
//! parameters, inheritance clause, where clause and member block, plus
//! functions and stored/computed properties. Everything else (statements,
//! initializers, enum cases, directives) becomes an opaque item whose
//! bracketed regions are consumed as balanced groups.
//!
//! The parser never fails. Malformed input still yields a tree whose text is
//! the input, together with the [`SyntaxError`]s that were found.

use rowan::{TextRange, TextSize};
use std::fmt;
use std::ops::Range;

use super::SwiftSyntaxKind;
use super::builder::CstBuilder;
use super::lexer::{CstToken, lex_with_trivia};
use super::tree::SyntaxTree;

/// Words that act as declaration modifiers when followed by a declaration
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "package",
    "open",
    "static",
    "final",
    "override",
    "required",
    "convenience",
    "lazy",
    "weak",
    "unowned",
    "mutating",
    "nonmutating",
    "dynamic",
    "optional",
    "indirect",
    "prefix",
    "postfix",
    "infix",
    "nonisolated",
    "distributed",
    "isolated",
    "consuming",
    "borrowing",
];

/// Contextual words that start a declaration on their own
const DECL_WORDS: &[&str] = &["associatedtype", "operator", "precedencegroup", "macro"];

/// A parse or lex error with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Parse Swift source into a lossless tree
///
/// # Example
///
/// ```rust
/// use sendable_core::cst::parse_swift;
///
/// let source = "public struct Obj: Codable {\n    var name: String\n}\n";
/// let (tree, errors) = parse_swift(source);
/// assert!(errors.is_empty());
/// assert_eq!(tree.print(), source);
/// ```
pub fn parse_swift(source: &str) -> (SyntaxTree, Vec<SyntaxError>) {
    let (tokens, lex_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    let (green, parse_errors) = parser.finish();

    let index = LineIndex::new(source);
    let mut errors: Vec<SyntaxError> = lex_errors
        .into_iter()
        .map(|e| index.error(e.message, e.span))
        .chain(
            parse_errors
                .into_iter()
                .map(|(message, span)| index.error(message, span)),
        )
        .collect();
    errors.sort_by_key(|e| e.range.start());

    (SyntaxTree::new(green), errors)
}

/// Byte offset to line/column mapping
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    fn error(&self, message: String, span: Range<usize>) -> SyntaxError {
        let line = self.line_starts.partition_point(|&s| s <= span.start);
        let line_start = self.line_starts[line - 1];
        let column = self
            .source
            .get(line_start..span.start)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;
        SyntaxError {
            message,
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
            line,
            column,
        }
    }
}

/// A significant token together with the trivia attached to it
#[derive(Debug, Clone)]
struct Lexeme {
    kind: SwiftSyntaxKind,
    /// Index into the token stream; `None` for end of input
    token: Option<usize>,
    leading: Range<usize>,
    trailing: Range<usize>,
}

/// Attach trivia to significant tokens
fn group_lexemes(tokens: &[CstToken]) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut pending = 0;
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_trivia() {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < tokens.len()
            && tokens[end].is_trivia()
            && tokens[end].kind != SwiftSyntaxKind::Newline
        {
            end += 1;
        }
        lexemes.push(Lexeme {
            kind: tokens[i].kind,
            token: Some(i),
            leading: pending..i,
            trailing: i + 1..end,
        });
        pending = end;
        i = end;
    }
    lexemes.push(Lexeme {
        kind: SwiftSyntaxKind::Eof,
        token: None,
        leading: pending..tokens.len(),
        trailing: tokens.len()..tokens.len(),
    });
    lexemes
}

/// What an item turns out to be after looking past its attributes and modifiers
enum Head {
    Nominal {
        node: SwiftSyntaxKind,
        keyword: SwiftSyntaxKind,
    },
    Function,
    Variable,
    Other,
}

struct Parser<'t> {
    tokens: &'t [CstToken],
    lexemes: Vec<Lexeme>,
    pos: usize,
    builder: CstBuilder,
    errors: Vec<(String, Range<usize>)>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [CstToken]) -> Self {
        Self {
            tokens,
            lexemes: group_lexemes(tokens),
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (rowan::GreenNode, Vec<(String, Range<usize>)>) {
        (self.builder.finish(), self.errors)
    }

    // ------------------------------------------------------------------
    // Token stream access
    // ------------------------------------------------------------------

    fn kind_at(&self, index: usize) -> SwiftSyntaxKind {
        self.lexemes
            .get(index)
            .map(|l| l.kind)
            .unwrap_or(SwiftSyntaxKind::Eof)
    }

    fn text_at(&self, index: usize) -> &str {
        self.lexemes
            .get(index)
            .and_then(|l| l.token)
            .map(|t| self.tokens[t].text.as_str())
            .unwrap_or("")
    }

    fn current(&self) -> SwiftSyntaxKind {
        self.kind_at(self.pos)
    }

    fn at(&self, kind: SwiftSyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SwiftSyntaxKind::Eof)
    }

    fn span_at(&self, index: usize) -> Range<usize> {
        let end_of_input = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        self.lexemes
            .get(index)
            .and_then(|l| l.token)
            .map(|t| self.tokens[t].span.clone())
            .unwrap_or(end_of_input..end_of_input)
    }

    /// Whether a line break separates the lexeme from the previous one
    fn newline_before_at(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        self.lexemes.get(index).is_some_and(|l| {
            self.tokens[l.leading.clone()]
                .iter()
                .any(|t| t.kind == SwiftSyntaxKind::Newline)
        })
    }

    /// No trivia at all between the lexeme and the previous one
    fn adjacent_at(&self, index: usize) -> bool {
        index > 0
            && self.lexemes[index].leading.is_empty()
            && self.lexemes[index - 1].trailing.is_empty()
    }

    fn is_word_at(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        kind == SwiftSyntaxKind::Ident || SwiftSyntaxKind::from_keyword(self.text_at(index)) == Some(kind)
    }

    fn error(&mut self, message: impl Into<String>) {
        let span = self.span_at(self.pos);
        self.errors.push((message.into(), span));
    }

    /// Emit the current lexeme with its trivia
    fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Emit the current lexeme under a different kind
    fn bump_as(&mut self, kind: SwiftSyntaxKind) {
        let Some(lexeme) = self.lexemes.get(self.pos).cloned() else {
            return;
        };
        let tokens = self.tokens;
        for trivia in &tokens[lexeme.leading] {
            self.builder.token(trivia.kind, &trivia.text);
        }
        match lexeme.token {
            Some(index) => self.builder.token(kind, &tokens[index].text),
            None => self.builder.token(SwiftSyntaxKind::Eof, ""),
        }
        for trivia in &tokens[lexeme.trailing] {
            self.builder.token(trivia.kind, &trivia.text);
        }
        if self.pos < self.lexemes.len() {
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    fn is_actor_keyword_at(&self, index: usize) -> bool {
        self.kind_at(index) == SwiftSyntaxKind::Ident
            && self.text_at(index) == "actor"
            && self.kind_at(index + 1) == SwiftSyntaxKind::Ident
    }

    fn is_modifier_at(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        let candidate = match kind {
            SwiftSyntaxKind::Ident => MODIFIERS.contains(&self.text_at(index)),
            SwiftSyntaxKind::ClassKw => true,
            _ => false,
        };
        if !candidate {
            return false;
        }

        let next = self.modifier_end(index);
        match self.kind_at(next) {
            SwiftSyntaxKind::StructKw
            | SwiftSyntaxKind::EnumKw
            | SwiftSyntaxKind::ProtocolKw
            | SwiftSyntaxKind::ExtensionKw
            | SwiftSyntaxKind::FuncKw
            | SwiftSyntaxKind::VarKw
            | SwiftSyntaxKind::LetKw
            | SwiftSyntaxKind::InitKw
            | SwiftSyntaxKind::DeinitKw
            | SwiftSyntaxKind::SubscriptKw
            | SwiftSyntaxKind::TypealiasKw
            | SwiftSyntaxKind::CaseKw
            | SwiftSyntaxKind::ImportKw => true,
            SwiftSyntaxKind::ClassKw => kind != SwiftSyntaxKind::ClassKw,
            SwiftSyntaxKind::Ident => {
                let text = self.text_at(next);
                self.is_actor_keyword_at(next)
                    || MODIFIERS.contains(&text)
                    || DECL_WORDS.contains(&text)
            }
            _ => false,
        }
    }

    /// Index after a modifier and its `(set)`-style detail
    fn modifier_end(&self, index: usize) -> usize {
        let next = index + 1;
        if self.kind_at(next) == SwiftSyntaxKind::LParen && self.adjacent_at(next) {
            self.group_end(next)
        } else {
            next
        }
    }

    /// Index after an attribute starting at `@`
    fn attribute_end(&self, index: usize) -> usize {
        let mut next = index + 1;
        if !self.is_word_at(next) {
            return next;
        }
        next += 1;
        if self.kind_at(next) == SwiftSyntaxKind::LParen && self.adjacent_at(next) {
            next = self.group_end(next);
        }
        next
    }

    /// Index after the bracket group opening at `index`
    fn group_end(&self, index: usize) -> usize {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket | SwiftSyntaxKind::LBrace => {
                    depth += 1
                }
                SwiftSyntaxKind::RParen | SwiftSyntaxKind::RBracket | SwiftSyntaxKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                SwiftSyntaxKind::Eof => return i,
                _ => {}
            }
            i += 1;
        }
    }

    /// Index after the angle group opening at `index`, if it closes cleanly
    fn angle_end(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SwiftSyntaxKind::LAngle => depth += 1,
                SwiftSyntaxKind::RAngle => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    i = self.group_end(i);
                    continue;
                }
                SwiftSyntaxKind::Eof
                | SwiftSyntaxKind::LBrace
                | SwiftSyntaxKind::RBrace
                | SwiftSyntaxKind::Semicolon => return None,
                _ => {}
            }
            i += 1;
        }
    }

    fn scan_head(&self) -> Head {
        let mut i = self.pos;
        while self.kind_at(i) == SwiftSyntaxKind::At {
            i = self.attribute_end(i);
        }
        while self.is_modifier_at(i) {
            i = self.modifier_end(i);
        }

        let nominal = |node, keyword| Head::Nominal { node, keyword };
        match self.kind_at(i) {
            SwiftSyntaxKind::StructKw => nominal(SwiftSyntaxKind::StructDecl, SwiftSyntaxKind::StructKw),
            SwiftSyntaxKind::EnumKw => nominal(SwiftSyntaxKind::EnumDecl, SwiftSyntaxKind::EnumKw),
            SwiftSyntaxKind::ClassKw => nominal(SwiftSyntaxKind::ClassDecl, SwiftSyntaxKind::ClassKw),
            SwiftSyntaxKind::ProtocolKw => {
                nominal(SwiftSyntaxKind::ProtocolDecl, SwiftSyntaxKind::ProtocolKw)
            }
            SwiftSyntaxKind::ExtensionKw => {
                nominal(SwiftSyntaxKind::ExtensionDecl, SwiftSyntaxKind::ExtensionKw)
            }
            SwiftSyntaxKind::Ident if self.is_actor_keyword_at(i) => {
                nominal(SwiftSyntaxKind::ActorDecl, SwiftSyntaxKind::ActorKw)
            }
            SwiftSyntaxKind::FuncKw => Head::Function,
            SwiftSyntaxKind::VarKw | SwiftSyntaxKind::LetKw => Head::Variable,
            _ => Head::Other,
        }
    }

    fn is_decl_start_at(&self, index: usize) -> bool {
        match self.kind_at(index) {
            SwiftSyntaxKind::At
            | SwiftSyntaxKind::PoundKeyword
            | SwiftSyntaxKind::StructKw
            | SwiftSyntaxKind::EnumKw
            | SwiftSyntaxKind::ClassKw
            | SwiftSyntaxKind::ProtocolKw
            | SwiftSyntaxKind::ExtensionKw
            | SwiftSyntaxKind::FuncKw
            | SwiftSyntaxKind::VarKw
            | SwiftSyntaxKind::LetKw
            | SwiftSyntaxKind::InitKw
            | SwiftSyntaxKind::DeinitKw
            | SwiftSyntaxKind::SubscriptKw
            | SwiftSyntaxKind::TypealiasKw
            | SwiftSyntaxKind::CaseKw
            | SwiftSyntaxKind::ImportKw => true,
            SwiftSyntaxKind::Ident => {
                self.is_actor_keyword_at(index)
                    || self.is_modifier_at(index)
                    || DECL_WORDS.contains(&self.text_at(index))
            }
            _ => false,
        }
    }

    /// End of input, the enclosing `}`, or a declaration on a new line
    fn at_item_end(&self) -> bool {
        match self.current() {
            SwiftSyntaxKind::Eof | SwiftSyntaxKind::RBrace => true,
            _ => self.newline_before_at(self.pos) && self.is_decl_start_at(self.pos),
        }
    }

    fn is_type_stop_at(&self, index: usize, stops: &[SwiftSyntaxKind]) -> bool {
        let kind = self.kind_at(index);
        stops.contains(&kind)
            || matches!(kind, SwiftSyntaxKind::Eof | SwiftSyntaxKind::RBrace)
            || (kind != SwiftSyntaxKind::At
                && self.newline_before_at(index)
                && self.is_decl_start_at(index))
    }

    /// `Name`, `Module.Name` or `Name<Args>` followed by a stop
    fn is_simple_type_at(&self, stops: &[SwiftSyntaxKind]) -> bool {
        let mut i = self.pos;
        if self.kind_at(i) != SwiftSyntaxKind::Ident {
            return false;
        }
        i += 1;
        while self.kind_at(i) == SwiftSyntaxKind::Dot && self.kind_at(i + 1) == SwiftSyntaxKind::Ident
        {
            i += 2;
        }
        if self.kind_at(i) == SwiftSyntaxKind::LAngle {
            match self.angle_end(i) {
                Some(end) => i = end,
                None => return false,
            }
        }
        self.is_type_stop_at(i, stops)
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn parse_source_file(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::SourceFile);
        while !self.at_eof() {
            if self.at(SwiftSyntaxKind::RBrace) {
                self.error("unexpected `}`");
                self.builder.start_node(SwiftSyntaxKind::Error);
                self.bump();
                self.builder.finish_node();
                continue;
            }
            self.parse_item();
        }
        self.bump(); // EOF
        self.builder.finish_node();
    }

    fn parse_item(&mut self) {
        match self.scan_head() {
            Head::Nominal { node, keyword } => self.parse_nominal(node, keyword),
            Head::Function => self.parse_function(),
            Head::Variable => self.parse_variable(),
            Head::Other => self.parse_other(),
        }
    }

    fn parse_decl_prefix(&mut self) {
        if self.at(SwiftSyntaxKind::At) {
            self.parse_attribute_list();
        }
        if self.is_modifier_at(self.pos) {
            self.parse_modifier_list();
        }
    }

    fn parse_attribute_list(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::AttributeList);
        while self.at(SwiftSyntaxKind::At) {
            self.builder.start_node(SwiftSyntaxKind::Attribute);
            self.bump();
            if self.is_word_at(self.pos) {
                self.bump();
                if self.at(SwiftSyntaxKind::LParen) && self.adjacent_at(self.pos) {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup);
                }
            } else {
                self.error("expected attribute name");
            }
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_modifier_list(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::ModifierList);
        while self.is_modifier_at(self.pos) {
            self.builder.start_node(SwiftSyntaxKind::Modifier);
            self.bump();
            if self.at(SwiftSyntaxKind::LParen) && self.adjacent_at(self.pos) {
                self.parse_group(SwiftSyntaxKind::BalancedGroup);
            }
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    /// struct, enum, class, actor, protocol or extension
    fn parse_nominal(&mut self, node: SwiftSyntaxKind, keyword: SwiftSyntaxKind) {
        self.builder.start_node(node);
        self.parse_decl_prefix();
        self.bump_as(keyword);

        if node == SwiftSyntaxKind::ExtensionDecl {
            let stops = [
                SwiftSyntaxKind::Colon,
                SwiftSyntaxKind::WhereKw,
                SwiftSyntaxKind::LBrace,
            ];
            if !self.parse_type(&stops) {
                self.error("expected extended type");
            }
        } else {
            if self.at(SwiftSyntaxKind::Ident) {
                self.bump();
            } else {
                self.error("expected declaration name");
            }
            if self.at(SwiftSyntaxKind::LAngle) {
                self.parse_angle_group(SwiftSyntaxKind::GenericParamClause);
            }
        }

        if self.at(SwiftSyntaxKind::Colon) {
            self.parse_inheritance_clause();
        }
        if self.at(SwiftSyntaxKind::WhereKw) {
            self.parse_where_clause();
        }
        if self.at(SwiftSyntaxKind::LBrace) {
            self.parse_member_block();
        } else {
            self.error("expected `{`");
        }

        self.builder.finish_node();
    }

    fn parse_inheritance_clause(&mut self) {
        let stops = [
            SwiftSyntaxKind::Comma,
            SwiftSyntaxKind::LBrace,
            SwiftSyntaxKind::WhereKw,
        ];
        self.builder.start_node(SwiftSyntaxKind::InheritanceClause);
        self.bump(); // :
        self.builder.start_node(SwiftSyntaxKind::InheritedTypeList);
        loop {
            if self.is_type_stop_at(self.pos, &stops) {
                self.error("expected type");
                break;
            }
            self.builder.start_node(SwiftSyntaxKind::InheritedType);
            self.parse_type(&stops);
            let more = self.at(SwiftSyntaxKind::Comma);
            if more {
                self.bump();
            }
            self.builder.finish_node();
            if !more {
                break;
            }
        }
        self.builder.finish_node();
        self.builder.finish_node();
    }

    /// Returns false when there was no type to parse
    fn parse_type(&mut self, stops: &[SwiftSyntaxKind]) -> bool {
        if self.is_type_stop_at(self.pos, stops) {
            return false;
        }

        if self.at(SwiftSyntaxKind::At) {
            self.builder.start_node(SwiftSyntaxKind::AttributedType);
            self.parse_attribute_list();
            if !self.parse_type(stops) {
                self.error("expected type");
            }
            self.builder.finish_node();
            return true;
        }

        if self.is_simple_type_at(stops) {
            self.builder.start_node(SwiftSyntaxKind::SimpleType);
            self.bump();
            while self.at(SwiftSyntaxKind::Dot) && self.kind_at(self.pos + 1) == SwiftSyntaxKind::Ident {
                self.bump();
                self.bump();
            }
            if self.at(SwiftSyntaxKind::LAngle) {
                self.parse_angle_group(SwiftSyntaxKind::BalancedGroup);
            }
            self.builder.finish_node();
            return true;
        }

        self.builder.start_node(SwiftSyntaxKind::OtherType);
        while !self.is_type_stop_at(self.pos, stops) {
            match self.current() {
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup)
                }
                SwiftSyntaxKind::LAngle => self.parse_angle_group(SwiftSyntaxKind::BalancedGroup),
                SwiftSyntaxKind::RParen | SwiftSyntaxKind::RBracket => {
                    self.error("unexpected closing bracket");
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
        true
    }

    fn parse_where_clause(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::GenericWhereClause);
        self.bump(); // where
        while !self.at(SwiftSyntaxKind::LBrace) && !self.at_item_end() {
            match self.current() {
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup)
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    fn parse_member_block(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::MemberBlock);
        self.bump(); // {
        self.builder.start_node(SwiftSyntaxKind::MemberList);
        while !self.at(SwiftSyntaxKind::RBrace) && !self.at_eof() {
            self.parse_item();
        }
        self.builder.finish_node();
        if self.at(SwiftSyntaxKind::RBrace) {
            self.bump();
        } else {
            self.error("expected `}`");
        }
        self.builder.finish_node();
    }

    fn parse_function(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::FunctionDecl);
        self.parse_decl_prefix();
        self.bump(); // func
        if !self.at_item_end()
            && !self.at(SwiftSyntaxKind::LParen)
            && !self.at(SwiftSyntaxKind::LBrace)
        {
            self.bump(); // name
        }
        while !self.at_item_end() {
            match self.current() {
                SwiftSyntaxKind::LBrace => {
                    self.parse_group(SwiftSyntaxKind::CodeBlock);
                    break;
                }
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup)
                }
                SwiftSyntaxKind::RParen | SwiftSyntaxKind::RBracket => {
                    self.error("unexpected closing bracket");
                    self.bump();
                }
                SwiftSyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    /// `var`/`let` with one pattern binding per comma-separated entry
    fn parse_variable(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::VariableDecl);
        self.parse_decl_prefix();
        self.bump(); // var / let

        self.builder.start_node(SwiftSyntaxKind::PatternBinding);
        let mut seen_initializer = false;
        let mut angle_depth = 0usize;
        while !self.at_item_end() {
            match self.current() {
                SwiftSyntaxKind::Comma if angle_depth == 0 => {
                    self.bump();
                    self.builder.finish_node();
                    self.builder.start_node(SwiftSyntaxKind::PatternBinding);
                    seen_initializer = false;
                }
                SwiftSyntaxKind::Eq => {
                    seen_initializer = true;
                    angle_depth = 0;
                    self.bump();
                }
                SwiftSyntaxKind::LAngle if !seen_initializer => {
                    angle_depth += 1;
                    self.bump();
                }
                SwiftSyntaxKind::RAngle if !seen_initializer && angle_depth > 0 => {
                    angle_depth -= 1;
                    self.bump();
                }
                SwiftSyntaxKind::LBrace => {
                    let kind = if !seen_initializer || self.starts_observers() {
                        SwiftSyntaxKind::AccessorBlock
                    } else {
                        SwiftSyntaxKind::CodeBlock
                    };
                    self.parse_group(kind);
                }
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup)
                }
                SwiftSyntaxKind::RParen | SwiftSyntaxKind::RBracket => {
                    self.error("unexpected closing bracket");
                    self.bump();
                }
                SwiftSyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
        self.builder.finish_node();
    }

    /// `{ willSet ... }` or `{ didSet ... }` after an initializer
    fn starts_observers(&self) -> bool {
        self.kind_at(self.pos + 1) == SwiftSyntaxKind::Ident
            && matches!(self.text_at(self.pos + 1), "willSet" | "didSet")
    }

    /// Anything else: kept verbatim up to the next item boundary
    fn parse_other(&mut self) {
        self.builder.start_node(SwiftSyntaxKind::OtherDecl);
        let line_mode = self.at(SwiftSyntaxKind::PoundKeyword);
        let start = self.pos;
        self.parse_decl_prefix();
        if self.pos == start {
            self.parse_opaque_element();
        }
        loop {
            let done = if line_mode {
                self.at_eof() || self.at(SwiftSyntaxKind::RBrace) || self.newline_before_at(self.pos)
            } else {
                self.at_item_end()
            };
            if done {
                break;
            }
            if self.at(SwiftSyntaxKind::Semicolon) {
                self.bump();
                break;
            }
            self.parse_opaque_element();
        }
        self.builder.finish_node();
    }

    fn parse_opaque_element(&mut self) {
        match self.current() {
            SwiftSyntaxKind::LBrace => self.parse_group(SwiftSyntaxKind::CodeBlock),
            SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                self.parse_group(SwiftSyntaxKind::BalancedGroup)
            }
            SwiftSyntaxKind::RParen | SwiftSyntaxKind::RBracket => {
                self.error("unexpected closing bracket");
                self.bump();
            }
            _ => self.bump(),
        }
    }

    /// Balanced `(...)`, `[...]` or `{...}` with nested groups of any shape
    fn parse_group(&mut self, kind: SwiftSyntaxKind) {
        self.builder.start_node(kind);
        let mut stack = vec![closing(self.current())];
        self.bump();
        while let Some(&expected) = stack.last() {
            match self.current() {
                SwiftSyntaxKind::Eof => {
                    self.error(format!("expected `{}`", closing_text(expected)));
                    break;
                }
                open @ (SwiftSyntaxKind::LParen
                | SwiftSyntaxKind::LBracket
                | SwiftSyntaxKind::LBrace) => {
                    stack.push(closing(open));
                    self.bump();
                }
                close @ (SwiftSyntaxKind::RParen
                | SwiftSyntaxKind::RBracket
                | SwiftSyntaxKind::RBrace) => {
                    if close == expected {
                        stack.pop();
                        self.bump();
                    } else if stack.contains(&close) {
                        self.error(format!("expected `{}`", closing_text(expected)));
                        while stack.last() != Some(&close) {
                            stack.pop();
                        }
                    } else if close == SwiftSyntaxKind::RBrace {
                        // Belongs to an enclosing block
                        self.error(format!("expected `{}`", closing_text(expected)));
                        break;
                    } else {
                        self.error(format!("unexpected `{}`", closing_text(close)));
                        self.bump();
                    }
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    /// `<...>`; gives up at braces so a stray `<` cannot swallow a body
    fn parse_angle_group(&mut self, kind: SwiftSyntaxKind) {
        self.builder.start_node(kind);
        self.bump(); // <
        let mut depth = 1usize;
        loop {
            match self.current() {
                SwiftSyntaxKind::LAngle => {
                    depth += 1;
                    self.bump();
                }
                SwiftSyntaxKind::RAngle => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        break;
                    }
                }
                SwiftSyntaxKind::LParen | SwiftSyntaxKind::LBracket => {
                    self.parse_group(SwiftSyntaxKind::BalancedGroup)
                }
                SwiftSyntaxKind::Eof
                | SwiftSyntaxKind::LBrace
                | SwiftSyntaxKind::RBrace
                | SwiftSyntaxKind::Semicolon => {
                    self.error("expected `>`");
                    break;
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }
}

fn closing(open: SwiftSyntaxKind) -> SwiftSyntaxKind {
    match open {
        SwiftSyntaxKind::LParen => SwiftSyntaxKind::RParen,
        SwiftSyntaxKind::LBracket => SwiftSyntaxKind::RBracket,
        SwiftSyntaxKind::LBrace => SwiftSyntaxKind::RBrace,
        other => other,
    }
}

fn closing_text(kind: SwiftSyntaxKind) -> &'static str {
    match kind {
        SwiftSyntaxKind::RParen => ")",
        SwiftSyntaxKind::RBracket => "]",
        SwiftSyntaxKind::RBrace => "}",
        _ => "?",
    }
}
