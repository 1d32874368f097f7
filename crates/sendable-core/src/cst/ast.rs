//! Typed AST layer over the CST
//!
//! Ergonomic wrappers over raw syntax nodes. Each wrapper is a cheap handle on
//! a red node and is created with [`AstNode::cast`].
//!
//! # Example
//!
//! ```rust
//! use sendable_core::cst::{parse_swift, ast::DeclKind};
//!
//! let (tree, _) = parse_swift("public final class Box: Codable {}");
//! let decl = tree.source_file().unwrap().decls().next().unwrap();
//!
//! assert_eq!(decl.kind(), DeclKind::Class);
//! assert_eq!(decl.name().unwrap(), "Box");
//! assert!(decl.has_modifier("final"));
//! assert!(decl.inherits("Codable"));
//! ```

use std::fmt;

use super::{SwiftSyntaxKind, SwiftSyntaxNode, SwiftSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SwiftSyntaxKind) -> bool;
    fn cast(node: SwiftSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SwiftSyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SwiftSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SwiftSyntaxKind) -> bool {
                matches!(kind, $(SwiftSyntaxKind::$kind)|+)
            }

            fn cast(node: SwiftSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SwiftSyntaxNode {
                &self.syntax
            }
        }
    };
}

fn child<N: AstNode>(parent: &SwiftSyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

/// Direct, non-trivia tokens of a node
fn tokens(parent: &SwiftSyntaxNode) -> impl Iterator<Item = SwiftSyntaxToken> + '_ {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
}

fn token_of_kind(parent: &SwiftSyntaxNode, kind: SwiftSyntaxKind) -> Option<SwiftSyntaxToken> {
    tokens(parent).find(|t| t.kind() == kind)
}

/// Source text of a node without its surrounding trivia
fn significant_text(node: &SwiftSyntaxNode) -> String {
    let mut significant = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia());
    let Some(first) = significant.next() else {
        return String::new();
    };
    let last = significant.last().unwrap_or_else(|| first.clone());
    let start = first.text_range().start() - node.text_range().start();
    let end = last.text_range().end() - node.text_range().start();
    node.text()
        .slice(start..end)
        .to_string()
}

// ============================================================================
// Source file
// ============================================================================

ast_node!(
    /// Root of a parsed file
    SourceFile,
    SourceFile
);

impl SourceFile {
    /// Top-level declarations the rewrite engine cares about
    pub fn decls(&self) -> impl Iterator<Item = Decl> + use<> {
        self.syntax.children().filter_map(Decl::cast)
    }

    /// Every top-level item, including opaque ones
    pub fn items(&self) -> impl Iterator<Item = SwiftSyntaxNode> + use<> {
        self.syntax.children()
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// The declaration kinds policies are asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Struct,
    Enum,
    Class,
    Actor,
    Protocol,
    Extension,
    Function,
}

impl DeclKind {
    pub fn from_syntax_kind(kind: SwiftSyntaxKind) -> Option<Self> {
        let kind = match kind {
            SwiftSyntaxKind::StructDecl => Self::Struct,
            SwiftSyntaxKind::EnumDecl => Self::Enum,
            SwiftSyntaxKind::ClassDecl => Self::Class,
            SwiftSyntaxKind::ActorDecl => Self::Actor,
            SwiftSyntaxKind::ProtocolDecl => Self::Protocol,
            SwiftSyntaxKind::ExtensionDecl => Self::Extension,
            SwiftSyntaxKind::FunctionDecl => Self::Function,
            _ => return None,
        };
        Some(kind)
    }

    /// Keyword spelling, also used in configuration
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Class => "class",
            Self::Actor => "actor",
            Self::Protocol => "protocol",
            Self::Extension => "extension",
            Self::Function => "function",
        }
    }

    /// Kinds that can carry an inheritance clause
    pub fn is_nominal(self) -> bool {
        self != Self::Function
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

ast_node!(
    /// struct, enum, class, actor, protocol, extension or function
    Decl,
    StructDecl | EnumDecl | ClassDecl | ActorDecl | ProtocolDecl | ExtensionDecl | FunctionDecl
);

impl Decl {
    pub fn kind(&self) -> DeclKind {
        // can_cast only admits declaration kinds
        DeclKind::from_syntax_kind(self.syntax.kind()).unwrap_or(DeclKind::Function)
    }

    /// `struct`, `class`, `func`, ...
    pub fn keyword_token(&self) -> Option<SwiftSyntaxToken> {
        tokens(&self.syntax).find(|t| {
            matches!(
                t.kind(),
                SwiftSyntaxKind::StructKw
                    | SwiftSyntaxKind::EnumKw
                    | SwiftSyntaxKind::ClassKw
                    | SwiftSyntaxKind::ActorKw
                    | SwiftSyntaxKind::ProtocolKw
                    | SwiftSyntaxKind::ExtensionKw
                    | SwiftSyntaxKind::FuncKw
            )
        })
    }

    /// The declared name; `None` for extensions, whose name is a type
    pub fn name_token(&self) -> Option<SwiftSyntaxToken> {
        if self.kind() == DeclKind::Extension {
            return None;
        }
        let keyword = self.keyword_token()?;
        let name = tokens(&self.syntax).find(|t| t.index() > keyword.index())?;
        match self.kind() {
            DeclKind::Function => Some(name),
            _ => (name.kind() == SwiftSyntaxKind::Ident).then_some(name),
        }
    }

    /// Extended type of an extension
    pub fn extended_type(&self) -> Option<TypeRef> {
        if self.kind() != DeclKind::Extension {
            return None;
        }
        child(&self.syntax)
    }

    /// Declared name, or the extended type for extensions
    pub fn name(&self) -> Option<String> {
        match self.kind() {
            DeclKind::Extension => self.extended_type().map(|t| significant_text(t.syntax())),
            _ => self.name_token().map(|t| t.text().to_string()),
        }
    }

    pub fn attributes(&self) -> Option<AttributeList> {
        child(&self.syntax)
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        child(&self.syntax)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers().is_some_and(|m| m.contains(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().is_some_and(|a| a.contains(name))
    }

    pub fn generic_params(&self) -> Option<SwiftSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::GenericParamClause)
    }

    pub fn inheritance_clause(&self) -> Option<InheritanceClause> {
        child(&self.syntax)
    }

    pub fn member_block(&self) -> Option<MemberBlock> {
        child(&self.syntax)
    }

    /// Direct members; empty for functions and bodiless declarations
    pub fn members(&self) -> Vec<SwiftSyntaxNode> {
        self.member_block()
            .map(|b| b.members().collect())
            .unwrap_or_default()
    }

    /// Property declarations among the direct members
    pub fn variables(&self) -> Vec<VariableDecl> {
        self.members()
            .into_iter()
            .filter_map(VariableDecl::cast)
            .collect()
    }

    /// Whether the inheritance clause lists `name`
    pub fn inherits(&self, name: &str) -> bool {
        self.inheritance_clause().is_some_and(|c| c.contains(name))
    }
}

ast_node!(
    /// `{ members }`
    MemberBlock,
    MemberBlock
);

impl MemberBlock {
    pub fn members(&self) -> impl Iterator<Item = SwiftSyntaxNode> + use<> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::MemberList)
            .into_iter()
            .flat_map(|list| list.children())
    }

    pub fn l_brace(&self) -> Option<SwiftSyntaxToken> {
        token_of_kind(&self.syntax, SwiftSyntaxKind::LBrace)
    }

    pub fn r_brace(&self) -> Option<SwiftSyntaxToken> {
        token_of_kind(&self.syntax, SwiftSyntaxKind::RBrace)
    }
}

// ============================================================================
// Inheritance clause
// ============================================================================

ast_node!(
    /// `: A, B`
    InheritanceClause,
    InheritanceClause
);

impl InheritanceClause {
    pub fn colon(&self) -> Option<SwiftSyntaxToken> {
        token_of_kind(&self.syntax, SwiftSyntaxKind::Colon)
    }

    pub fn entries(&self) -> impl Iterator<Item = InheritedType> + use<> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::InheritedTypeList)
            .into_iter()
            .flat_map(|list| list.children())
            .filter_map(InheritedType::cast)
    }

    /// Whether an entry names `name`, looking through one attribute level
    pub fn contains(&self, name: &str) -> bool {
        self.entries()
            .any(|e| e.base_name().as_deref() == Some(name))
    }
}

ast_node!(
    /// One entry of an inheritance clause, including its trailing comma
    InheritedType,
    InheritedType
);

impl InheritedType {
    pub fn type_ref(&self) -> Option<TypeRef> {
        child(&self.syntax)
    }

    pub fn comma(&self) -> Option<SwiftSyntaxToken> {
        token_of_kind(&self.syntax, SwiftSyntaxKind::Comma)
    }

    pub fn base_name(&self) -> Option<String> {
        self.type_ref().and_then(|t| t.base_name())
    }
}

ast_node!(
    /// A type in the positions the parser understands
    TypeRef,
    SimpleType | AttributedType | OtherType
);

impl TypeRef {
    /// Name used for duplicate detection
    ///
    /// `Module.Name<Args>` yields `Name`; `@attr Name` yields `Name`; any other
    /// shape yields its text.
    pub fn base_name(&self) -> Option<String> {
        match self.syntax.kind() {
            SwiftSyntaxKind::SimpleType => tokens(&self.syntax)
                .filter(|t| t.kind() == SwiftSyntaxKind::Ident)
                .last()
                .map(|t| t.text().trim_matches('`').to_string()),
            SwiftSyntaxKind::AttributedType => self.inner().and_then(|t| t.base_name()),
            _ => {
                let text = significant_text(&self.syntax);
                (!text.is_empty()).then_some(text)
            }
        }
    }

    pub fn is_attributed(&self) -> bool {
        self.syntax.kind() == SwiftSyntaxKind::AttributedType
    }

    pub fn attributes(&self) -> Option<AttributeList> {
        if self.is_attributed() {
            child(&self.syntax)
        } else {
            None
        }
    }

    /// The type under the attributes of an attributed type
    pub fn inner(&self) -> Option<TypeRef> {
        if self.is_attributed() {
            child(&self.syntax)
        } else {
            None
        }
    }
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

ast_node!(AttributeList, AttributeList);

impl AttributeList {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + use<> {
        self.syntax.children().filter_map(Attribute::cast)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes().any(|a| a.name().as_deref() == Some(name))
    }
}

ast_node!(
    /// `@name` with optional arguments
    Attribute,
    Attribute
);

impl Attribute {
    pub fn name(&self) -> Option<String> {
        tokens(&self.syntax)
            .nth(1)
            .map(|t| t.text().to_string())
    }

    pub fn arguments(&self) -> Option<SwiftSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::BalancedGroup)
    }
}

ast_node!(ModifierList, ModifierList);

impl ModifierList {
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + use<> {
        self.syntax.children().filter_map(Modifier::cast)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers().any(|m| m.name().as_deref() == Some(name))
    }
}

ast_node!(
    /// `public`, `final`, `private(set)`, ...
    Modifier,
    Modifier
);

impl Modifier {
    pub fn name(&self) -> Option<String> {
        tokens(&self.syntax).next().map(|t| t.text().to_string())
    }

    /// `(set)` in `private(set)`
    pub fn detail(&self) -> Option<SwiftSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::BalancedGroup)
    }
}

// ============================================================================
// Properties
// ============================================================================

ast_node!(
    /// `var`/`let` declaration
    VariableDecl,
    VariableDecl
);

impl VariableDecl {
    pub fn keyword_token(&self) -> Option<SwiftSyntaxToken> {
        tokens(&self.syntax)
            .find(|t| matches!(t.kind(), SwiftSyntaxKind::VarKw | SwiftSyntaxKind::LetKw))
    }

    pub fn is_var(&self) -> bool {
        self.keyword_token()
            .is_some_and(|t| t.kind() == SwiftSyntaxKind::VarKw)
    }

    pub fn attributes(&self) -> Option<AttributeList> {
        child(&self.syntax)
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        child(&self.syntax)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers().is_some_and(|m| m.contains(name))
    }

    pub fn bindings(&self) -> impl Iterator<Item = PatternBinding> + use<> {
        self.syntax.children().filter_map(PatternBinding::cast)
    }

    /// Type-level storage (`static var`, `class var`)
    pub fn is_type_member(&self) -> bool {
        self.has_modifier("static") || self.has_modifier("class")
    }
}

ast_node!(
    /// One `pattern: Type = value { accessors }` entry
    PatternBinding,
    PatternBinding
);

impl PatternBinding {
    /// Binding name for simple identifier patterns
    pub fn name(&self) -> Option<String> {
        tokens(&self.syntax)
            .next()
            .filter(|t| t.kind() == SwiftSyntaxKind::Ident)
            .map(|t| t.text().to_string())
    }

    /// Getter/setter or observer block
    pub fn accessor_block(&self) -> Option<SwiftSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SwiftSyntaxKind::AccessorBlock)
    }

    pub fn has_accessor(&self) -> bool {
        self.accessor_block().is_some()
    }

    pub fn has_initializer(&self) -> bool {
        token_of_kind(&self.syntax, SwiftSyntaxKind::Eq).is_some()
    }
}
