//! Tokens and lexical errors produced by the scanner.

use ridl_ast::syntax_kind::SyntaxKind;
use ridl_core::text::{LineAndColumn, TextSpan};
use ridl_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use serde::Serialize;
use std::fmt;

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The source text of the token, quotes and prefixes included.
    pub text: String,
    /// Escape-decoded contents for quoted literals; equal to `text` otherwise.
    pub value: String,
    pub span: TextSpan,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextSpan, position: LineAndColumn) -> Self {
        Self {
            kind,
            text: String::new(),
            value: String::new(),
            span,
            line: position.line,
            column: position.column,
        }
    }

    /// Set the source text; the value follows it unless set separately.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.value = self.text.clone();
        self
    }

    pub fn with_value(mut self, value: String) -> Self {
        self.value = value;
        self
    }

    pub fn position(&self) -> LineAndColumn {
        LineAndColumn::new(self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == SyntaxKind::EndOfFileToken
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            f.write_str("end of input")
        } else {
            f.write_str(&self.text)
        }
    }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    InvalidCharacter(char),
    UnterminatedString,
    UnterminatedChar,
    UnterminatedComment,
    InvalidEscape(String),
    BadCharLiteral,
    HexDigitExpected,
    ExponentDigitExpected,
}

/// A fatal lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: TextSpan,
    pub position: LineAndColumn,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: TextSpan, position: LineAndColumn) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }

    fn message(&self) -> (&'static DiagnosticMessage, String) {
        match &self.kind {
            LexErrorKind::InvalidCharacter(ch) => (&messages::INVALID_CHARACTER_0, ch.escape_default().to_string()),
            LexErrorKind::UnterminatedString => (&messages::UNTERMINATED_STRING_LITERAL, String::new()),
            LexErrorKind::UnterminatedChar => (&messages::UNTERMINATED_CHARACTER_LITERAL, String::new()),
            LexErrorKind::UnterminatedComment => (&messages::ASTERISK_SLASH_EXPECTED, String::new()),
            LexErrorKind::InvalidEscape(seq) => (&messages::INVALID_ESCAPE_SEQUENCE_0, seq.clone()),
            LexErrorKind::BadCharLiteral => (&messages::CHARACTER_LITERAL_MUST_CONTAIN_ONE_CHARACTER, String::new()),
            LexErrorKind::HexDigitExpected => (&messages::HEXADECIMAL_DIGIT_EXPECTED, String::new()),
            LexErrorKind::ExponentDigitExpected => (&messages::DIGIT_EXPECTED_IN_EXPONENT, String::new()),
        }
    }

    /// Convert into a located diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, arg) = self.message();
        Diagnostic::at(self.span, self.position, message, &[&arg])
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.to_diagnostic().message_text)
    }
}

impl std::error::Error for LexError {}
