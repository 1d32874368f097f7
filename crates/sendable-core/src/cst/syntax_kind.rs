//! Syntax kinds for the Swift declaration surface
//!
//! Every token and node in the CST carries one of these kinds. Discriminants
//! are contiguous from zero so they map directly onto `rowan::SyntaxKind`.

/// All token and node kinds produced by the lexer and parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SwiftSyntaxKind {
    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------
    /// Run of spaces and tabs
    Whitespace = 0,
    /// A single line break (`\n`, `\r\n` or `\r`)
    Newline,
    /// `// ...` up to the end of the line
    LineComment,
    /// `/* ... */`, possibly nested and spanning lines
    BlockComment,

    // ------------------------------------------------------------------
    // Keywords
    // ------------------------------------------------------------------
    StructKw,
    EnumKw,
    ClassKw,
    /// `actor` is contextual; the parser promotes the identifier in
    /// declaration position
    ActorKw,
    ProtocolKw,
    ExtensionKw,
    FuncKw,
    VarKw,
    LetKw,
    WhereKw,
    InitKw,
    DeinitKw,
    SubscriptKw,
    TypealiasKw,
    CaseKw,
    ImportKw,

    // ------------------------------------------------------------------
    // Literals and names
    // ------------------------------------------------------------------
    Ident,
    Number,
    StringLiteral,
    /// `#if`, `#endif`, `#available`, `#Preview`, ...
    PoundKeyword,

    // ------------------------------------------------------------------
    // Punctuation
    // ------------------------------------------------------------------
    At,
    Colon,
    Comma,
    Semicolon,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Eq,
    Question,
    Bang,
    Arrow,
    Backslash,
    /// Run of other operator characters (`+`, `&&`, `...`, `~`)
    Operator,
    /// A character the lexer does not understand
    Unknown,
    /// End of input; owns the trailing trivia of the file
    Eof,

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------
    SourceFile,
    StructDecl,
    EnumDecl,
    ClassDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
    FunctionDecl,
    VariableDecl,
    PatternBinding,
    AccessorBlock,
    /// Any item the engine does not look inside
    OtherDecl,
    AttributeList,
    Attribute,
    ModifierList,
    Modifier,
    GenericParamClause,
    InheritanceClause,
    InheritedTypeList,
    InheritedType,
    /// `Name`, `Module.Name`, `Name<Args>`
    SimpleType,
    /// `@unchecked Name`
    AttributedType,
    /// Any other type shape (`A & B`, `~Copyable`, `any P`)
    OtherType,
    GenericWhereClause,
    MemberBlock,
    MemberList,
    /// Balanced `{ ... }` whose content is opaque
    CodeBlock,
    /// Balanced `( ... )`, `[ ... ]` or `< ... >` whose content is opaque
    BalancedGroup,
    Error,
}

impl SwiftSyntaxKind {
    /// Every kind in discriminant order
    pub const ALL: &'static [SwiftSyntaxKind] = &[
        Self::Whitespace,
        Self::Newline,
        Self::LineComment,
        Self::BlockComment,
        Self::StructKw,
        Self::EnumKw,
        Self::ClassKw,
        Self::ActorKw,
        Self::ProtocolKw,
        Self::ExtensionKw,
        Self::FuncKw,
        Self::VarKw,
        Self::LetKw,
        Self::WhereKw,
        Self::InitKw,
        Self::DeinitKw,
        Self::SubscriptKw,
        Self::TypealiasKw,
        Self::CaseKw,
        Self::ImportKw,
        Self::Ident,
        Self::Number,
        Self::StringLiteral,
        Self::PoundKeyword,
        Self::At,
        Self::Colon,
        Self::Comma,
        Self::Semicolon,
        Self::Dot,
        Self::LParen,
        Self::RParen,
        Self::LBrace,
        Self::RBrace,
        Self::LBracket,
        Self::RBracket,
        Self::LAngle,
        Self::RAngle,
        Self::Eq,
        Self::Question,
        Self::Bang,
        Self::Arrow,
        Self::Backslash,
        Self::Operator,
        Self::Unknown,
        Self::Eof,
        Self::SourceFile,
        Self::StructDecl,
        Self::EnumDecl,
        Self::ClassDecl,
        Self::ActorDecl,
        Self::ProtocolDecl,
        Self::ExtensionDecl,
        Self::FunctionDecl,
        Self::VariableDecl,
        Self::PatternBinding,
        Self::AccessorBlock,
        Self::OtherDecl,
        Self::AttributeList,
        Self::Attribute,
        Self::ModifierList,
        Self::Modifier,
        Self::GenericParamClause,
        Self::InheritanceClause,
        Self::InheritedTypeList,
        Self::InheritedType,
        Self::SimpleType,
        Self::AttributedType,
        Self::OtherType,
        Self::GenericWhereClause,
        Self::MemberBlock,
        Self::MemberList,
        Self::CodeBlock,
        Self::BalancedGroup,
        Self::Error,
    ];

    /// Look up a kind by its raw discriminant
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Reserved words recognized by the lexer
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "struct" => Self::StructKw,
            "enum" => Self::EnumKw,
            "class" => Self::ClassKw,
            "protocol" => Self::ProtocolKw,
            "extension" => Self::ExtensionKw,
            "func" => Self::FuncKw,
            "var" => Self::VarKw,
            "let" => Self::LetKw,
            "where" => Self::WhereKw,
            "init" => Self::InitKw,
            "deinit" => Self::DeinitKw,
            "subscript" => Self::SubscriptKw,
            "typealias" => Self::TypealiasKw,
            "case" => Self::CaseKw,
            "import" => Self::ImportKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Node kinds for the declarations the rewrite engine walks
    pub fn is_decl(self) -> bool {
        matches!(
            self,
            Self::StructDecl
                | Self::EnumDecl
                | Self::ClassDecl
                | Self::ActorDecl
                | Self::ProtocolDecl
                | Self::ExtensionDecl
                | Self::FunctionDecl
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::SimpleType | Self::AttributedType | Self::OtherType
        )
    }
}

impl From<SwiftSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SwiftSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
