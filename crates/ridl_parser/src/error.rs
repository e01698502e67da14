//! Errors reported by the parser.

use ridl_ast::syntax_kind::SyntaxKind;
use ridl_core::text::{LineAndColumn, TextSpan};
use ridl_diagnostics::{messages, Diagnostic};
use ridl_scanner::{LexError, SourceError, Token};
use std::fmt;
use thiserror::Error;

/// The first error that stopped a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Lexical(#[from] LexError),
    #[error("{0}")]
    Syntax(SyntaxError),
    #[error(transparent)]
    Io(#[from] SourceError),
    #[error("{position}: declarations are nested more than {limit} levels deep")]
    NestingTooDeep {
        limit: usize,
        span: TextSpan,
        position: LineAndColumn,
    },
}

impl ParseError {
    /// Source location of the error, if it has one.
    pub fn position(&self) -> Option<LineAndColumn> {
        match self {
            ParseError::Lexical(e) => Some(e.position),
            ParseError::Syntax(e) => Some(e.found.position()),
            ParseError::Io(_) => None,
            ParseError::NestingTooDeep { position, .. } => Some(*position),
        }
    }

    /// Convert into a located diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Lexical(e) => e.to_diagnostic(),
            ParseError::Syntax(e) => e.to_diagnostic(),
            ParseError::Io(e) => Diagnostic::new(&messages::CANNOT_READ_SOURCE_0, &[&e.to_string()]),
            ParseError::NestingTooDeep {
                limit,
                span,
                position,
            } => Diagnostic::at(*span, *position, &messages::NESTING_TOO_DEEP_0, &[&limit.to_string()])
                .with_help("raise the limit with --max-depth"),
        }
    }
}

/// An unexpected token, together with every kind that would have let the
/// parse go further at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub found: Token,
    pub expected: Vec<SyntaxKind>,
}

impl SyntaxError {
    /// Human readable list of the expected kinds.
    pub fn expected_text(&self) -> String {
        let names: Vec<String> = self.expected.iter().map(|k| k.describe()).collect();
        match names.len() {
            0 => "a declaration".to_string(),
            1 => names[0].clone(),
            _ => format!("one of {}", names.join(", ")),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let expected = self.expected_text();
        let position = self.found.position();
        if self.found.is_eof() {
            Diagnostic::at(
                self.found.span,
                position,
                &messages::UNEXPECTED_END_OF_INPUT_EXPECTED_0,
                &[&expected],
            )
        } else {
            Diagnostic::at(
                self.found.span,
                position,
                &messages::UNEXPECTED_TOKEN_0_EXPECTED_1,
                &[&self.found.text, &expected],
            )
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.found.position(), self.to_diagnostic().message_text)
    }
}

impl std::error::Error for SyntaxError {}
