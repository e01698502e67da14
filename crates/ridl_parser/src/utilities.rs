//! Parser utility functions.
//!
//! The `*_START` tables list the tokens a production can begin with. They are
//! what an error reports as expected when none of a production's alternatives
//! applies.

use ridl_ast::syntax_kind::SyntaxKind;

/// Keywords that begin a base type.
pub const BASE_TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::FloatKeyword,
    SyntaxKind::DoubleKeyword,
    SyntaxKind::LongKeyword,
    SyntaxKind::ShortKeyword,
    SyntaxKind::UnsignedKeyword,
    SyntaxKind::CharKeyword,
    SyntaxKind::WcharKeyword,
    SyntaxKind::BooleanKeyword,
    SyntaxKind::OctetKeyword,
    SyntaxKind::AnyKeyword,
    SyntaxKind::ObjectKeyword,
    SyntaxKind::ValueBaseKeyword,
];

pub const DEFINITION_START: &[SyntaxKind] = &[
    SyntaxKind::TypedefKeyword,
    SyntaxKind::StructKeyword,
    SyntaxKind::UnionKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::NativeKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::ExceptionKeyword,
    SyntaxKind::AbstractKeyword,
    SyntaxKind::LocalKeyword,
    SyntaxKind::InterfaceKeyword,
    SyntaxKind::ModuleKeyword,
    SyntaxKind::CustomKeyword,
    SyntaxKind::ValuetypeKeyword,
];

pub const EXPORT_START: &[SyntaxKind] = &[
    SyntaxKind::TypedefKeyword,
    SyntaxKind::StructKeyword,
    SyntaxKind::UnionKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::NativeKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::ExceptionKeyword,
    SyntaxKind::ReadonlyKeyword,
    SyntaxKind::AttributeKeyword,
    SyntaxKind::OnewayKeyword,
    SyntaxKind::VoidKeyword,
    SyntaxKind::StringKeyword,
    SyntaxKind::WstringKeyword,
    SyntaxKind::Identifier,
    SyntaxKind::ColonColonToken,
];

pub const VALUE_ELEMENT_EXTRA: &[SyntaxKind] = &[
    SyntaxKind::PublicKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::FactoryKeyword,
];

pub const TEMPLATE_TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::SequenceKeyword,
    SyntaxKind::StringKeyword,
    SyntaxKind::WstringKeyword,
    SyntaxKind::FixedKeyword,
];

pub const SCOPED_NAME_START: &[SyntaxKind] = &[SyntaxKind::Identifier, SyntaxKind::ColonColonToken];

pub const CONSTRUCTED_TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::StructKeyword,
    SyntaxKind::UnionKeyword,
    SyntaxKind::EnumKeyword,
];

pub const PARAM_TYPE_EXTRA: &[SyntaxKind] = &[SyntaxKind::StringKeyword, SyntaxKind::WstringKeyword];

pub const SWITCH_TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::LongKeyword,
    SyntaxKind::ShortKeyword,
    SyntaxKind::UnsignedKeyword,
    SyntaxKind::CharKeyword,
    SyntaxKind::WcharKeyword,
    SyntaxKind::BooleanKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::Identifier,
    SyntaxKind::ColonColonToken,
];

pub const CONST_TYPE_START: &[SyntaxKind] = &[
    SyntaxKind::LongKeyword,
    SyntaxKind::ShortKeyword,
    SyntaxKind::UnsignedKeyword,
    SyntaxKind::CharKeyword,
    SyntaxKind::WcharKeyword,
    SyntaxKind::BooleanKeyword,
    SyntaxKind::FloatKeyword,
    SyntaxKind::DoubleKeyword,
    SyntaxKind::StringKeyword,
    SyntaxKind::WstringKeyword,
    SyntaxKind::FixedKeyword,
    SyntaxKind::OctetKeyword,
    SyntaxKind::Identifier,
    SyntaxKind::ColonColonToken,
];

pub const PRIMARY_EXPRESSION_START: &[SyntaxKind] = &[
    SyntaxKind::Identifier,
    SyntaxKind::ColonColonToken,
    SyntaxKind::DecimalLiteral,
    SyntaxKind::OctalLiteral,
    SyntaxKind::HexLiteral,
    SyntaxKind::FloatLiteral,
    SyntaxKind::ExponentFloatLiteral,
    SyntaxKind::FixedPtLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::WideCharLiteral,
    SyntaxKind::StringLiteral,
    SyntaxKind::WideStringLiteral,
    SyntaxKind::TrueKeyword,
    SyntaxKind::FalseKeyword,
    SyntaxKind::OpenParenToken,
];

pub const UNARY_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::MinusToken,
    SyntaxKind::PlusToken,
    SyntaxKind::TildeToken,
];

pub const PARAM_MODES: &[SyntaxKind] = &[
    SyntaxKind::InKeyword,
    SyntaxKind::OutKeyword,
    SyntaxKind::InoutKeyword,
];

/// Check if a token kind can start a type specifier, constructed types included.
pub fn can_start_type_spec(kind: SyntaxKind) -> bool {
    can_start_simple_type_spec(kind) || CONSTRUCTED_TYPE_START.contains(&kind)
}

pub fn can_start_simple_type_spec(kind: SyntaxKind) -> bool {
    BASE_TYPE_START.contains(&kind)
        || TEMPLATE_TYPE_START.contains(&kind)
        || SCOPED_NAME_START.contains(&kind)
}

/// Check if a token kind can start the return type of an operation.
pub fn can_start_op_type_spec(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::VoidKeyword || can_start_param_type_spec(kind)
}

pub fn can_start_param_type_spec(kind: SyntaxKind) -> bool {
    BASE_TYPE_START.contains(&kind)
        || PARAM_TYPE_EXTRA.contains(&kind)
        || SCOPED_NAME_START.contains(&kind)
}

pub fn can_start_export(kind: SyntaxKind) -> bool {
    EXPORT_START.contains(&kind) || BASE_TYPE_START.contains(&kind)
}

/// Tokens that begin a type specifier, in reporting order.
pub fn type_spec_start() -> Vec<SyntaxKind> {
    let mut kinds = BASE_TYPE_START.to_vec();
    kinds.extend_from_slice(TEMPLATE_TYPE_START);
    kinds.extend_from_slice(SCOPED_NAME_START);
    kinds.extend_from_slice(CONSTRUCTED_TYPE_START);
    kinds
}

pub fn simple_type_spec_start() -> Vec<SyntaxKind> {
    let mut kinds = BASE_TYPE_START.to_vec();
    kinds.extend_from_slice(TEMPLATE_TYPE_START);
    kinds.extend_from_slice(SCOPED_NAME_START);
    kinds
}

pub fn param_type_spec_start() -> Vec<SyntaxKind> {
    let mut kinds = BASE_TYPE_START.to_vec();
    kinds.extend_from_slice(PARAM_TYPE_EXTRA);
    kinds.extend_from_slice(SCOPED_NAME_START);
    kinds
}

pub fn export_start() -> Vec<SyntaxKind> {
    let mut kinds = EXPORT_START.to_vec();
    kinds.extend_from_slice(BASE_TYPE_START);
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_starters() {
        assert!(DEFINITION_START.contains(&SyntaxKind::ModuleKeyword));
        assert!(DEFINITION_START.contains(&SyntaxKind::ValuetypeKeyword));
        assert!(!DEFINITION_START.contains(&SyntaxKind::LongKeyword));
        assert!(!DEFINITION_START.contains(&SyntaxKind::AttributeKeyword));
    }

    #[test]
    fn test_type_spec_starters() {
        assert!(can_start_type_spec(SyntaxKind::LongKeyword));
        assert!(can_start_type_spec(SyntaxKind::SequenceKeyword));
        assert!(can_start_type_spec(SyntaxKind::StructKeyword));
        assert!(can_start_type_spec(SyntaxKind::ColonColonToken));
        assert!(!can_start_type_spec(SyntaxKind::VoidKeyword));
        assert!(!can_start_simple_type_spec(SyntaxKind::EnumKeyword));
    }

    #[test]
    fn test_operation_and_parameter_types() {
        assert!(can_start_op_type_spec(SyntaxKind::VoidKeyword));
        assert!(can_start_param_type_spec(SyntaxKind::WstringKeyword));
        assert!(!can_start_param_type_spec(SyntaxKind::SequenceKeyword));
        assert!(!can_start_param_type_spec(SyntaxKind::VoidKeyword));
    }

    #[test]
    fn test_start_tables_have_no_duplicates() {
        for table in [type_spec_start(), param_type_spec_start(), export_start()] {
            let mut sorted: Vec<u16> = table.iter().map(|&k| k as u16).collect();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), table.len());
        }
    }
}
