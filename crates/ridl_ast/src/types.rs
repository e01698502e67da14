//! Type expressions, constant expressions and scoped names.
//!
//! These are immutable values built by the parser. A `TypeExpr` is shared by
//! every declarator of one declaration through an `Arc`.

use crate::syntax_kind::SyntaxKind;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Scoped names
// ============================================================================

/// A possibly-qualified name such as `A::B` or `::A::B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ScopedName {
    /// Whether the name started with `::`.
    pub absolute: bool,
    pub parts: Vec<String>,
}

impl ScopedName {
    pub fn new(absolute: bool, parts: Vec<String>) -> Self {
        Self { absolute, parts }
    }

    /// A single unqualified identifier.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            absolute: false,
            parts: vec![name.into()],
        }
    }

    /// The last component.
    pub fn last(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "::")?;
        }
        write!(f, "{}", self.parts.join("::"))
    }
}

// ============================================================================
// Constant expressions
// ============================================================================

/// A literal as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// The token kind chosen by the scanner (e.g. `HexLiteral`,
    /// `WideStringLiteral`, `TrueKeyword`).
    pub kind: SyntaxKind,
    /// Raw source text, quotes and prefixes included.
    pub text: String,
    /// Escape-decoded contents for quoted literals, the raw text otherwise.
    pub value: String,
}

impl Literal {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            value: value.into(),
        }
    }

    /// Interpret an integer literal. Returns `None` for other kinds or when
    /// the value does not fit in 64 bits.
    pub fn as_integer(&self) -> Option<u64> {
        match self.kind {
            SyntaxKind::DecimalLiteral => self.text.parse().ok(),
            SyntaxKind::HexLiteral => u64::from_str_radix(&self.text[2..], 16).ok(),
            SyntaxKind::OctalLiteral => u64::from_str_radix(&self.text, 8).ok(),
            _ => None,
        }
    }
}

/// A constant expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ConstExpr {
    Literal(Literal),
    Name(ScopedName),
    Unary {
        op: SyntaxKind,
        operand: Box<ConstExpr>,
    },
    Binary {
        op: SyntaxKind,
        left: Box<ConstExpr>,
        right: Box<ConstExpr>,
    },
    Paren {
        inner: Box<ConstExpr>,
    },
}

impl fmt::Display for ConstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstExpr::Literal(lit) => write!(f, "{}", lit.text),
            ConstExpr::Name(name) => write!(f, "{}", name),
            ConstExpr::Unary { op, operand } => {
                write!(f, "{}{}", op.punctuation_text().unwrap_or("?"), operand)
            }
            ConstExpr::Binary { op, left, right } => {
                write!(f, "{} {} {}", left, op.punctuation_text().unwrap_or("?"), right)
            }
            ConstExpr::Paren { inner } => write!(f, "({})", inner),
        }
    }
}

// ============================================================================
// Type expressions
// ============================================================================

/// The discriminant of a type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    Boolean,
    Char,
    WChar,
    Octet,
    Short,
    Long,
    LongLong,
    UnsignedShort,
    UnsignedLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    String,
    WString,
    Fixed,
    Sequence,
    Any,
    Object,
    ValueBase,
    Enum,
    Struct,
    Union,
    Scoped,
}

impl TypeKind {
    /// The IDL spelling of this discriminant.
    pub fn discriminant(self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Boolean => "boolean",
            TypeKind::Char => "char",
            TypeKind::WChar => "wchar",
            TypeKind::Octet => "octet",
            TypeKind::Short => "short",
            TypeKind::Long => "long",
            TypeKind::LongLong => "long long",
            TypeKind::UnsignedShort => "unsigned short",
            TypeKind::UnsignedLong => "unsigned long",
            TypeKind::UnsignedLongLong => "unsigned long long",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::LongDouble => "long double",
            TypeKind::String => "string",
            TypeKind::WString => "wstring",
            TypeKind::Fixed => "fixed",
            TypeKind::Sequence => "sequence",
            TypeKind::Any => "any",
            TypeKind::Object => "Object",
            TypeKind::ValueBase => "ValueBase",
            TypeKind::Enum => "enum",
            TypeKind::Struct => "struct",
            TypeKind::Union => "union",
            TypeKind::Scoped => "scoped name",
        }
    }

    /// Whether this is one of the base types named by a keyword.
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            TypeKind::String
                | TypeKind::WString
                | TypeKind::Fixed
                | TypeKind::Sequence
                | TypeKind::Enum
                | TypeKind::Struct
                | TypeKind::Union
                | TypeKind::Scoped
        )
    }
}

/// An immutable type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeExpr {
    pub kind: TypeKind,
    /// Display name without array dimensions, e.g. `sequence<long, 10>`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<Arc<TypeExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<ConstExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digits: Option<ConstExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ConstExpr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<ConstExpr>,
}

impl TypeExpr {
    fn bare(kind: TypeKind, name: String) -> Self {
        Self {
            kind,
            name,
            element: None,
            bound: None,
            digits: None,
            scale: None,
            dims: Vec::new(),
        }
    }

    /// A base type named by keywords (`long`, `unsigned short`, `Object`, ...).
    pub fn primitive(kind: TypeKind) -> Self {
        debug_assert!(kind.is_primitive());
        Self::bare(kind, kind.discriminant().to_string())
    }

    /// `string` or `wstring`, optionally bounded.
    pub fn string(kind: TypeKind, bound: Option<ConstExpr>) -> Self {
        debug_assert!(matches!(kind, TypeKind::String | TypeKind::WString));
        let name = match &bound {
            Some(b) => format!("{}<{}>", kind.discriminant(), b),
            None => kind.discriminant().to_string(),
        };
        Self {
            bound,
            ..Self::bare(kind, name)
        }
    }

    /// `fixed<digits, scale>`.
    pub fn fixed(digits: ConstExpr, scale: ConstExpr) -> Self {
        let name = format!("fixed<{}, {}>", digits, scale);
        Self {
            digits: Some(digits),
            scale: Some(scale),
            ..Self::bare(TypeKind::Fixed, name)
        }
    }

    /// Bare `fixed`, as allowed for the type of a constant.
    pub fn fixed_const() -> Self {
        Self::bare(TypeKind::Fixed, TypeKind::Fixed.discriminant().to_string())
    }

    /// `sequence<element>` or `sequence<element, bound>`.
    pub fn sequence(element: Arc<TypeExpr>, bound: Option<ConstExpr>) -> Self {
        let name = match &bound {
            Some(b) => format!("sequence<{}, {}>", element, b),
            None => format!("sequence<{}>", element),
        };
        Self {
            element: Some(element),
            bound,
            ..Self::bare(TypeKind::Sequence, name)
        }
    }

    /// A reference to a declared type by scoped name.
    pub fn scoped(name: &ScopedName) -> Self {
        Self::bare(TypeKind::Scoped, name.to_string())
    }

    /// An inline struct, union or enum, referred to by its name.
    pub fn constructed(kind: TypeKind, name: impl Into<String>) -> Self {
        debug_assert!(matches!(kind, TypeKind::Struct | TypeKind::Union | TypeKind::Enum));
        Self::bare(kind, name.into())
    }

    /// A copy of this type carrying array dimensions.
    pub fn with_dims(&self, dims: Vec<ConstExpr>) -> Self {
        Self {
            dims,
            ..self.clone()
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for dim in &self.dims {
            write!(f, "[{}]", dim)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> ConstExpr {
        ConstExpr::Literal(Literal::new(SyntaxKind::DecimalLiteral, text, text))
    }

    #[test]
    fn test_scoped_name_display() {
        let name = ScopedName::new(true, vec!["A".into(), "B".into()]);
        assert_eq!(name.to_string(), "::A::B");
        assert_eq!(name.last(), "B");
        assert_eq!(ScopedName::simple("X").to_string(), "X");
    }

    #[test]
    fn test_type_display_names() {
        let long = Arc::new(TypeExpr::primitive(TypeKind::Long));
        assert_eq!(long.to_string(), "long");
        assert_eq!(TypeExpr::primitive(TypeKind::UnsignedLongLong).name, "unsigned long long");
        assert_eq!(TypeExpr::string(TypeKind::String, Some(int("10"))).to_string(), "string<10>");
        assert_eq!(TypeExpr::sequence(long.clone(), None).to_string(), "sequence<long>");
        assert_eq!(TypeExpr::fixed(int("5"), int("2")).to_string(), "fixed<5, 2>");
        let arr = long.with_dims(vec![int("3"), int("4")]);
        assert_eq!(arr.to_string(), "long[3][4]");
        assert_eq!(arr.name, "long");
    }

    #[test]
    fn test_const_expr_display() {
        let expr = ConstExpr::Binary {
            op: SyntaxKind::PlusToken,
            left: Box::new(int("1")),
            right: Box::new(ConstExpr::Paren {
                inner: Box::new(ConstExpr::Unary {
                    op: SyntaxKind::MinusToken,
                    operand: Box::new(int("2")),
                }),
            }),
        };
        assert_eq!(expr.to_string(), "1 + (-2)");
    }

    #[test]
    fn test_literal_as_integer() {
        assert_eq!(Literal::new(SyntaxKind::HexLiteral, "0x1F", "0x1F").as_integer(), Some(31));
        assert_eq!(Literal::new(SyntaxKind::OctalLiteral, "017", "017").as_integer(), Some(15));
        assert_eq!(Literal::new(SyntaxKind::OctalLiteral, "0", "0").as_integer(), Some(0));
        assert_eq!(Literal::new(SyntaxKind::StringLiteral, "\"a\"", "a").as_integer(), None);
    }
}
