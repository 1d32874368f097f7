//! CST-aware lexer that preserves all trivia
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts always reproduces the source, even when the input is malformed.
//! Malformed constructs (unterminated strings and block comments) are reported
//! as [`LexerError`]s alongside the tokens.

use crate::cst::SwiftSyntaxKind;
use std::ops::Range;

/// Byte range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: SwiftSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: SwiftSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex Swift source, preserving whitespace, newlines and comments as tokens
///
/// `lex_with_trivia(s).0.iter().map(|t| &t.text).collect::<String>() == s`
/// holds for every input.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(current) = self.peek() {
            let start = self.pos;
            let kind = match current {
                '\n' => {
                    self.bump();
                    SwiftSyntaxKind::Newline
                }
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    SwiftSyntaxKind::Newline
                }
                c if is_inline_whitespace(c) => {
                    self.eat_while(is_inline_whitespace);
                    SwiftSyntaxKind::Whitespace
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    SwiftSyntaxKind::LineComment
                }
                '/' if self.peek_nth(1) == Some('*') => self.block_comment(),
                c if is_ident_start(c) => {
                    self.eat_while(is_ident_continue);
                    SwiftSyntaxKind::from_keyword(&self.input[start..self.pos])
                        .unwrap_or(SwiftSyntaxKind::Ident)
                }
                '`' => self.backticked_ident(),
                c if c.is_ascii_digit() => self.number(),
                '"' => {
                    self.string(0);
                    SwiftSyntaxKind::StringLiteral
                }
                '#' => self.pound(),
                '-' if self.peek_nth(1) == Some('>') => {
                    self.bump();
                    self.bump();
                    SwiftSyntaxKind::Arrow
                }
                '.' if self.peek_nth(1) == Some('.') => {
                    self.eat_while(|c| c == '.');
                    if self.peek() == Some('<') {
                        self.bump();
                    }
                    SwiftSyntaxKind::Operator
                }
                c if is_operator_char(c) => {
                    self.operator_run();
                    SwiftSyntaxKind::Operator
                }
                c => {
                    self.bump();
                    punctuation(c).unwrap_or(SwiftSyntaxKind::Unknown)
                }
            };
            self.push(kind, start);
        }
    }

    fn push(&mut self, kind: SwiftSyntaxKind, start: usize) {
        self.tokens.push(CstToken::new(
            kind,
            &self.input[start..self.pos],
            start..self.pos,
        ));
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn at_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    /// `/* ... */` with nesting
    fn block_comment(&mut self) -> SwiftSyntaxKind {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            if self.at_str("/*") {
                self.pos += 2;
                depth += 1;
            } else if self.at_str("*/") {
                self.pos += 2;
                depth -= 1;
            } else if self.bump().is_none() {
                self.errors.push(LexerError::new(
                    "unterminated block comment",
                    start..self.pos,
                ));
                break;
            }
        }
        SwiftSyntaxKind::BlockComment
    }

    fn backticked_ident(&mut self) -> SwiftSyntaxKind {
        let rest = &self.input[self.pos + 1..];
        let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
        match rest[..line_end].find('`') {
            Some(close) if close > 0 => {
                self.pos += close + 2;
                SwiftSyntaxKind::Ident
            }
            _ => {
                self.bump();
                SwiftSyntaxKind::Unknown
            }
        }
    }

    fn number(&mut self) -> SwiftSyntaxKind {
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        }
        let text = &self.input[..self.pos];
        if (text.ends_with('e') || text.ends_with('E') || text.ends_with('p') || text.ends_with('P'))
            && matches!(self.peek(), Some('+' | '-'))
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.bump();
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        }
        SwiftSyntaxKind::Number
    }

    /// `#if`, `#selector`, or a raw string `#"..."#`
    fn pound(&mut self) -> SwiftSyntaxKind {
        let hashes = self.input[self.pos..]
            .chars()
            .take_while(|&c| c == '#')
            .count();
        if self.input[self.pos + hashes..].starts_with('"') {
            self.pos += hashes;
            self.string(hashes);
            return SwiftSyntaxKind::StringLiteral;
        }

        self.bump();
        if self.peek().is_some_and(is_ident_start) {
            self.eat_while(is_ident_continue);
            SwiftSyntaxKind::PoundKeyword
        } else {
            SwiftSyntaxKind::Unknown
        }
    }

    /// String literal starting at the opening quote; `hashes` raw delimiters
    /// have already been consumed
    fn string(&mut self, hashes: usize) {
        let start = self.pos.saturating_sub(hashes);
        let multiline = self.at_str("\"\"\"");
        self.pos += if multiline { 3 } else { 1 };
        let closing = format!("{}{}", if multiline { "\"\"\"" } else { "\"" }, "#".repeat(hashes));
        let escape = format!("\\{}", "#".repeat(hashes));

        loop {
            let Some(c) = self.peek() else {
                self.errors.push(LexerError::new(
                    "unterminated string literal",
                    start..self.pos,
                ));
                return;
            };
            if !multiline && (c == '\n' || c == '\r') {
                self.errors.push(LexerError::new(
                    "unterminated string literal",
                    start..self.pos,
                ));
                return;
            }
            if self.at_str(&closing) {
                self.pos += closing.len();
                return;
            }
            if self.at_str(&escape) {
                self.pos += escape.len();
                if self.peek() == Some('(') {
                    self.bump();
                    self.interpolation();
                } else {
                    self.bump();
                }
                continue;
            }
            self.bump();
        }
    }

    /// Body of `\( ... )` up to and including the matching `)`
    fn interpolation(&mut self) {
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    depth += 1;
                    self.bump();
                }
                ')' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                '"' => self.string(0),
                '#' if self.input[self.pos..].trim_start_matches('#').starts_with('"') => {
                    let hashes = self.input[self.pos..]
                        .chars()
                        .take_while(|&c| c == '#')
                        .count();
                    self.pos += hashes;
                    self.string(hashes);
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn operator_run(&mut self) {
        while let Some(c) = self.peek() {
            if !is_operator_char(c) || self.at_str("//") || self.at_str("/*") {
                break;
            }
            if c == '-' && self.peek_nth(1) == Some('>') {
                break;
            }
            self.bump();
        }
    }
}

fn is_inline_whitespace(c: char) -> bool {
    c != '\n' && c != '\r' && (c.is_whitespace() || c == '\u{FEFF}')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '~')
}

fn punctuation(c: char) -> Option<SwiftSyntaxKind> {
    let kind = match c {
        '@' => SwiftSyntaxKind::At,
        ':' => SwiftSyntaxKind::Colon,
        ',' => SwiftSyntaxKind::Comma,
        ';' => SwiftSyntaxKind::Semicolon,
        '.' => SwiftSyntaxKind::Dot,
        '(' => SwiftSyntaxKind::LParen,
        ')' => SwiftSyntaxKind::RParen,
        '{' => SwiftSyntaxKind::LBrace,
        '}' => SwiftSyntaxKind::RBrace,
        '[' => SwiftSyntaxKind::LBracket,
        ']' => SwiftSyntaxKind::RBracket,
        '<' => SwiftSyntaxKind::LAngle,
        '>' => SwiftSyntaxKind::RAngle,
        '=' => SwiftSyntaxKind::Eq,
        '?' => SwiftSyntaxKind::Question,
        '!' => SwiftSyntaxKind::Bang,
        '\\' => SwiftSyntaxKind::Backslash,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use SwiftSyntaxKind::*;

    fn kinds(source: &str) -> Vec<SwiftSyntaxKind> {
        lex_with_trivia(source).0.into_iter().map(|t| t.kind).collect()
    }

    fn assert_lossless(source: &str) {
        let (tokens, _) = lex_with_trivia(source);
        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("public struct Obj: Codable {}"),
            vec![
                Ident, Whitespace, StructKw, Whitespace, Ident, Colon, Whitespace, Ident,
                Whitespace, LBrace, RBrace
            ]
        );
    }

    #[test]
    fn test_contextual_words_stay_identifiers() {
        assert_eq!(kinds("actor final open"), vec![Ident, Whitespace, Ident, Whitespace, Ident]);
    }

    #[test]
    fn test_comments_and_newlines() {
        assert_eq!(
            kinds("// a\r\n/* b /* c */ */\n"),
            vec![LineComment, Newline, BlockComment, Newline]
        );
    }

    #[test]
    fn test_string_with_interpolation_and_braces() {
        let (tokens, errors) = lex_with_trivia(r#"let s = "a \("}") {""#);
        assert!(errors.is_empty());
        let strings: Vec<_> = tokens.iter().filter(|t| t.kind == StringLiteral).collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text, r#""a \("}") {""#);
    }

    #[test]
    fn test_multiline_and_raw_strings() {
        let source = "\"\"\"\n{ \"quoted\" }\n\"\"\" + #\"raw \" {\"#";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        assert_eq!(tokens.iter().filter(|t| t.kind == StringLiteral).count(), 2);
        assert!(!tokens.iter().any(|t| t.kind == LBrace));
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let (tokens, errors) = lex_with_trivia("let a = \"oops\nlet b = 1");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("string"));
        assert!(tokens.iter().any(|t| t.kind == LetKw && t.span.start > 10));
    }

    #[test]
    fn test_unterminated_block_comment_is_reported() {
        let (_, errors) = lex_with_trivia("/* never closed");
        assert_eq!(errors.len(), 1);
        assert_lossless("/* never closed");
    }

    #[test]
    fn test_arrow_and_ranges() {
        assert_eq!(kinds("->"), vec![Arrow]);
        assert_eq!(kinds("0..<5"), vec![Number, Operator, Number]);
        assert_eq!(kinds("a-b"), vec![Ident, Operator, Ident]);
    }

    #[test]
    fn test_pound_keywords() {
        assert_eq!(kinds("#if DEBUG"), vec![PoundKeyword, Whitespace, Ident]);
        assert_eq!(kinds("#"), vec![Unknown]);
    }

    #[test]
    fn test_backticked_identifier() {
        assert_eq!(kinds("`class`"), vec![Ident]);
        assert_eq!(kinds("`"), vec![Unknown]);
    }

    #[test]
    fn test_lossless_on_odd_input() {
        for source in [
            "",
            "\u{FEFF}struct A {}",
            "}}}{{{",
            "\"\\(",
            "#####",
            "let π = 3.14e-2 // ünïcödé",
            "`unterminated\n",
            "/* /* nested */",
        ] {
            assert_lossless(source);
        }
    }
}
