//! Operator precedence for constant expressions.

use ridl_ast::syntax_kind::SyntaxKind;

/// Binary operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    BitwiseOr = 1,
    BitwiseXor = 2,
    BitwiseAnd = 3,
    Shift = 4,
    Additive = 5,
    Multiplicative = 6,
}

/// Get the binary operator precedence for a given token kind.
///
/// Tokens that are not binary operators yield `Lowest`, which ends any
/// operator loop.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::GreaterThanGreaterThanToken | SyntaxKind::LessThanLessThanToken => {
            OperatorPrecedence::Shift
        }
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        _ => OperatorPrecedence::Lowest,
    }
}

/// Every binary operator, in the order the grammar lists them.
pub const BINARY_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::BarToken,
    SyntaxKind::CaretToken,
    SyntaxKind::AmpersandToken,
    SyntaxKind::GreaterThanGreaterThanToken,
    SyntaxKind::LessThanLessThanToken,
    SyntaxKind::PlusToken,
    SyntaxKind::MinusToken,
    SyntaxKind::AsteriskToken,
    SyntaxKind::SlashToken,
    SyntaxKind::PercentToken,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        let levels: Vec<OperatorPrecedence> = BINARY_OPERATORS
            .iter()
            .map(|&k| get_binary_operator_precedence(k))
            .collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert!(levels.iter().all(|&p| p > OperatorPrecedence::Lowest));
    }

    #[test]
    fn test_non_operators_are_lowest() {
        assert_eq!(get_binary_operator_precedence(SyntaxKind::TildeToken), OperatorPrecedence::Lowest);
        assert_eq!(get_binary_operator_precedence(SyntaxKind::GreaterThanToken), OperatorPrecedence::Lowest);
    }
}
