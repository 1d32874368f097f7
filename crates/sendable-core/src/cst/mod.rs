//! Concrete Syntax Tree (CST) for Swift source
//!
//! A lossless syntax tree built on Rowan. The tree keeps every byte of the
//! input, including whitespace and comments, so that rewritten files differ
//! from their originals only where an edit was made.
//!
//! ## Architecture
//!
//! - **Green tree**: immutable, position-independent, `Send + Sync` storage.
//!   Edits build new green nodes and share every untouched subtree.
//! - **Red tree**: on-demand view with parent pointers, wrapped by the typed
//!   API in [`ast`].
//!
//! ## Trivia handling
//!
//! - **Trailing trivia**: everything after a token up to the next line break
//! - **Leading trivia**: the rest, up to the next token
//!
//! The end of input is an empty `Eof` token that owns the final trivia, which
//! gives `parse(source).print() == source` for any input.
//!
//! ## Example
//!
//! ```rust
//! use sendable_core::cst::{SwiftSyntaxKind, parse_swift};
//!
//! let source = "struct Point { var x: Int } // 2D\n";
//! let (tree, errors) = parse_swift(source);
//! assert!(errors.is_empty());
//! assert_eq!(tree.print(), source);
//!
//! let comments = tree
//!     .root()
//!     .descendants_with_tokens()
//!     .filter(|e| e.kind() == SwiftSyntaxKind::LineComment)
//!     .count();
//! assert_eq!(comments, 1);
//! ```

mod builder;
mod language;
mod lexer;
mod parser;
mod syntax_kind;
mod tree;

pub mod ast;
pub mod make;
pub mod round_trip;
pub mod trivia;

pub use builder::CstBuilder;
pub use language::{SwiftLanguage, SwiftSyntaxElement, SwiftSyntaxNode, SwiftSyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{SyntaxError, parse_swift};
pub use round_trip::{DifferenceKind, RoundTripValidator, ValidationResult};
pub use syntax_kind::SwiftSyntaxKind;
pub use tree::SyntaxTree;
pub use trivia::{Trivia, TriviaPiece};
