//! SyntaxKind enum - all token and node kinds in the IDL syntax tree.
//!
//! Token kinds come first, grouped so that range checks can classify them;
//! node kinds follow. `Identifier` doubles as the node kind for enumerators.

use serde::Serialize;

/// The kind of a syntax token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,

    // Literals
    OctalLiteral,
    DecimalLiteral,
    HexLiteral,
    FloatLiteral,
    ExponentFloatLiteral,
    FixedPtLiteral,
    CharLiteral,
    WideCharLiteral,
    StringLiteral,
    WideStringLiteral,

    Identifier,

    // Punctuation
    SemicolonToken,
    OpenBraceToken,
    CloseBraceToken,
    ColonToken,
    CommaToken,
    ColonColonToken,
    OpenParenToken,
    CloseParenToken,
    EqualsToken,
    BarToken,
    CaretToken,
    AmpersandToken,
    GreaterThanGreaterThanToken,
    LessThanLessThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    TildeToken,
    LessThanToken,
    GreaterThanToken,
    OpenBracketToken,
    CloseBracketToken,

    // Keywords
    AbstractKeyword,
    AnyKeyword,
    AttributeKeyword,
    BooleanKeyword,
    CaseKeyword,
    CharKeyword,
    ConstKeyword,
    ContextKeyword,
    CustomKeyword,
    DefaultKeyword,
    DoubleKeyword,
    EnumKeyword,
    ExceptionKeyword,
    FactoryKeyword,
    FalseKeyword,
    FixedKeyword,
    FloatKeyword,
    InKeyword,
    InoutKeyword,
    InterfaceKeyword,
    LocalKeyword,
    LongKeyword,
    ModuleKeyword,
    NativeKeyword,
    ObjectKeyword,
    OctetKeyword,
    OnewayKeyword,
    OutKeyword,
    PrivateKeyword,
    PublicKeyword,
    RaisesKeyword,
    ReadonlyKeyword,
    SequenceKeyword,
    ShortKeyword,
    StringKeyword,
    StructKeyword,
    SupportsKeyword,
    SwitchKeyword,
    TrueKeyword,
    TruncatableKeyword,
    TypedefKeyword,
    UnionKeyword,
    UnsignedKeyword,
    ValueBaseKeyword,
    ValuetypeKeyword,
    VoidKeyword,
    WcharKeyword,
    WstringKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    Specification,
    Module,
    Interface,
    InterfaceHeader,
    ForwardDecl,
    Value,
    ValueHeader,
    ValueAbsDecl,
    ValueBoxDecl,
    ValueForwardDecl,
    ValueInheritanceSpec,
    StateMember,
    InitDeclarator,
    Const,
    TypeDef,
    /// `native Name;`. Its one `SimpleDeclarator` child names the opaque
    /// type and has no type expression of its own.
    Native,
    SimpleDeclarator,
    ArrayDeclarator,
    StructType,
    UnionType,
    UnionMember,
    EnumType,
    Member,
    Attribute,
    Exception,
    Operation,
    Parameter,
}

impl SyntaxKind {
    pub const FIRST_LITERAL: SyntaxKind = SyntaxKind::OctalLiteral;
    pub const LAST_LITERAL: SyntaxKind = SyntaxKind::WideStringLiteral;
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::SemicolonToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::CloseBracketToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AbstractKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::WstringKeyword;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::Specification;
    pub const LAST_NODE: SyntaxKind = SyntaxKind::Parameter;
}

impl SyntaxKind {
    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    /// Whether this kind is a keyword token.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Whether this kind is a punctuation token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.in_range(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    /// Whether this kind is a literal token.
    #[inline]
    pub fn is_literal(self) -> bool {
        self.in_range(Self::FIRST_LITERAL, Self::LAST_LITERAL)
    }

    /// Whether this kind is an integer literal token.
    #[inline]
    pub fn is_integer_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::OctalLiteral | SyntaxKind::DecimalLiteral | SyntaxKind::HexLiteral
        )
    }

    /// Whether this kind is a floating point literal token.
    #[inline]
    pub fn is_float_literal(self) -> bool {
        matches!(self, SyntaxKind::FloatLiteral | SyntaxKind::ExponentFloatLiteral)
    }

    /// Whether this kind is a quoted literal whose value is escape-decoded.
    #[inline]
    pub fn is_quoted_literal(self) -> bool {
        self.in_range(SyntaxKind::CharLiteral, SyntaxKind::WideStringLiteral)
    }

    /// Whether this kind is a token (as opposed to a tree node).
    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < Self::FIRST_NODE as u16
    }

    /// Whether this kind is a tree node. `Identifier` counts, since
    /// enumerators are stored as identifier nodes.
    #[inline]
    pub fn is_node(self) -> bool {
        self.in_range(Self::FIRST_NODE, Self::LAST_NODE) || self == SyntaxKind::Identifier
    }

    /// Whether this node kind declares a type.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::TypeDef
                | SyntaxKind::StructType
                | SyntaxKind::UnionType
                | SyntaxKind::EnumType
                | SyntaxKind::Native
        )
    }

    /// Whether this node kind is one of the value type forms.
    pub fn is_value_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::Value
                | SyntaxKind::ValueAbsDecl
                | SyntaxKind::ValueBoxDecl
                | SyntaxKind::ValueForwardDecl
        )
    }

    /// Whether this node kind is a declarator.
    pub fn is_declarator(self) -> bool {
        matches!(self, SyntaxKind::SimpleDeclarator | SyntaxKind::ArrayDeclarator)
    }

    /// Get the text of a keyword token.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::AbstractKeyword => Some("abstract"),
            SyntaxKind::AnyKeyword => Some("any"),
            SyntaxKind::AttributeKeyword => Some("attribute"),
            SyntaxKind::BooleanKeyword => Some("boolean"),
            SyntaxKind::CaseKeyword => Some("case"),
            SyntaxKind::CharKeyword => Some("char"),
            SyntaxKind::ConstKeyword => Some("const"),
            SyntaxKind::ContextKeyword => Some("context"),
            SyntaxKind::CustomKeyword => Some("custom"),
            SyntaxKind::DefaultKeyword => Some("default"),
            SyntaxKind::DoubleKeyword => Some("double"),
            SyntaxKind::EnumKeyword => Some("enum"),
            SyntaxKind::ExceptionKeyword => Some("exception"),
            SyntaxKind::FactoryKeyword => Some("factory"),
            SyntaxKind::FalseKeyword => Some("FALSE"),
            SyntaxKind::FixedKeyword => Some("fixed"),
            SyntaxKind::FloatKeyword => Some("float"),
            SyntaxKind::InKeyword => Some("in"),
            SyntaxKind::InoutKeyword => Some("inout"),
            SyntaxKind::InterfaceKeyword => Some("interface"),
            SyntaxKind::LocalKeyword => Some("local"),
            SyntaxKind::LongKeyword => Some("long"),
            SyntaxKind::ModuleKeyword => Some("module"),
            SyntaxKind::NativeKeyword => Some("native"),
            SyntaxKind::ObjectKeyword => Some("Object"),
            SyntaxKind::OctetKeyword => Some("octet"),
            SyntaxKind::OnewayKeyword => Some("oneway"),
            SyntaxKind::OutKeyword => Some("out"),
            SyntaxKind::PrivateKeyword => Some("private"),
            SyntaxKind::PublicKeyword => Some("public"),
            SyntaxKind::RaisesKeyword => Some("raises"),
            SyntaxKind::ReadonlyKeyword => Some("readonly"),
            SyntaxKind::SequenceKeyword => Some("sequence"),
            SyntaxKind::ShortKeyword => Some("short"),
            SyntaxKind::StringKeyword => Some("string"),
            SyntaxKind::StructKeyword => Some("struct"),
            SyntaxKind::SupportsKeyword => Some("supports"),
            SyntaxKind::SwitchKeyword => Some("switch"),
            SyntaxKind::TrueKeyword => Some("TRUE"),
            SyntaxKind::TruncatableKeyword => Some("truncatable"),
            SyntaxKind::TypedefKeyword => Some("typedef"),
            SyntaxKind::UnionKeyword => Some("union"),
            SyntaxKind::UnsignedKeyword => Some("unsigned"),
            SyntaxKind::ValueBaseKeyword => Some("ValueBase"),
            SyntaxKind::ValuetypeKeyword => Some("valuetype"),
            SyntaxKind::VoidKeyword => Some("void"),
            SyntaxKind::WcharKeyword => Some("wchar"),
            SyntaxKind::WstringKeyword => Some("wstring"),
            _ => None,
        }
    }

    /// Look up a keyword by its exact (case-sensitive) text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "abstract" => Some(SyntaxKind::AbstractKeyword),
            "any" => Some(SyntaxKind::AnyKeyword),
            "attribute" => Some(SyntaxKind::AttributeKeyword),
            "boolean" => Some(SyntaxKind::BooleanKeyword),
            "case" => Some(SyntaxKind::CaseKeyword),
            "char" => Some(SyntaxKind::CharKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "context" => Some(SyntaxKind::ContextKeyword),
            "custom" => Some(SyntaxKind::CustomKeyword),
            "default" => Some(SyntaxKind::DefaultKeyword),
            "double" => Some(SyntaxKind::DoubleKeyword),
            "enum" => Some(SyntaxKind::EnumKeyword),
            "exception" => Some(SyntaxKind::ExceptionKeyword),
            "factory" => Some(SyntaxKind::FactoryKeyword),
            "FALSE" => Some(SyntaxKind::FalseKeyword),
            "fixed" => Some(SyntaxKind::FixedKeyword),
            "float" => Some(SyntaxKind::FloatKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "inout" => Some(SyntaxKind::InoutKeyword),
            "interface" => Some(SyntaxKind::InterfaceKeyword),
            "local" => Some(SyntaxKind::LocalKeyword),
            "long" => Some(SyntaxKind::LongKeyword),
            "module" => Some(SyntaxKind::ModuleKeyword),
            "native" => Some(SyntaxKind::NativeKeyword),
            "Object" => Some(SyntaxKind::ObjectKeyword),
            "octet" => Some(SyntaxKind::OctetKeyword),
            "oneway" => Some(SyntaxKind::OnewayKeyword),
            "out" => Some(SyntaxKind::OutKeyword),
            "private" => Some(SyntaxKind::PrivateKeyword),
            "public" => Some(SyntaxKind::PublicKeyword),
            "raises" => Some(SyntaxKind::RaisesKeyword),
            "readonly" => Some(SyntaxKind::ReadonlyKeyword),
            "sequence" => Some(SyntaxKind::SequenceKeyword),
            "short" => Some(SyntaxKind::ShortKeyword),
            "string" => Some(SyntaxKind::StringKeyword),
            "struct" => Some(SyntaxKind::StructKeyword),
            "supports" => Some(SyntaxKind::SupportsKeyword),
            "switch" => Some(SyntaxKind::SwitchKeyword),
            "TRUE" => Some(SyntaxKind::TrueKeyword),
            "truncatable" => Some(SyntaxKind::TruncatableKeyword),
            "typedef" => Some(SyntaxKind::TypedefKeyword),
            "union" => Some(SyntaxKind::UnionKeyword),
            "unsigned" => Some(SyntaxKind::UnsignedKeyword),
            "ValueBase" => Some(SyntaxKind::ValueBaseKeyword),
            "valuetype" => Some(SyntaxKind::ValuetypeKeyword),
            "void" => Some(SyntaxKind::VoidKeyword),
            "wchar" => Some(SyntaxKind::WcharKeyword),
            "wstring" => Some(SyntaxKind::WstringKeyword),
            _ => None,
        }
    }

    /// Get the text of a punctuation token.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::ColonColonToken => Some("::"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::GreaterThanGreaterThanToken => Some(">>"),
            SyntaxKind::LessThanLessThanToken => Some("<<"),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            _ => None,
        }
    }

    /// Human-readable description used in "expected ..." messages:
    /// quoted text for fixed tokens, a category name otherwise.
    pub fn describe(self) -> String {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            return format!("'{}'", text);
        }
        match self {
            SyntaxKind::EndOfFileToken => "end of input".to_string(),
            SyntaxKind::Identifier => "identifier".to_string(),
            SyntaxKind::OctalLiteral => "octal literal".to_string(),
            SyntaxKind::DecimalLiteral => "decimal literal".to_string(),
            SyntaxKind::HexLiteral => "hexadecimal literal".to_string(),
            SyntaxKind::FloatLiteral | SyntaxKind::ExponentFloatLiteral => {
                "floating point literal".to_string()
            }
            SyntaxKind::FixedPtLiteral => "fixed point literal".to_string(),
            SyntaxKind::CharLiteral => "character literal".to_string(),
            SyntaxKind::WideCharLiteral => "wide character literal".to_string(),
            SyntaxKind::StringLiteral => "string literal".to_string(),
            SyntaxKind::WideStringLiteral => "wide string literal".to_string(),
            other => format!("{:?}", other),
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
