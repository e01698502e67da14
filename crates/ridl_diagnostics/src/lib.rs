//! ridl_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! This module defines every diagnostic the IDL front end can produce. Codes
//! in the 1000 range are lexical (bad characters, unterminated literals),
//! codes in the 2000 range are syntactic and the 3000 range belongs to the
//! command-line driver. A realized [`Diagnostic`] carries
//! its location and implements [`miette::Diagnostic`] so that callers can
//! render it against the source text.

use miette::{LabeledSpan, Severity, SourceSpan};
use ridl_core::text::{LineAndColumn, TextSpan};
use std::fmt;

/// A diagnostic message template with a code.
///
/// Every diagnostic is an error: lexing and parsing stop at the first one.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002, 2001).
    pub code: u32,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The source text span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// 1-based line and column of the span start.
    pub position: Option<LineAndColumn>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// Optional hint shown below the message.
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            position: None,
            message_text: format_message(message.message, args),
            code: message.code,
            help: None,
        }
    }

    /// Create a new diagnostic anchored at a span.
    pub fn at(
        span: TextSpan,
        position: LineAndColumn,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            span: Some(span),
            position: Some(position),
            ..Self::new(message, args)
        }
    }

    /// Attach the file name this diagnostic belongs to.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a hint.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(pos) = self.position {
                write!(f, ":{}", pos)?;
            }
            write!(f, ": ")?;
        } else if let Some(pos) = self.position {
            write!(f, "{}: ", pos)?;
        }
        write!(f, "error IDL{}: {}", self.code, self.message_text)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("IDL{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h.as_str()) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let source_span = SourceSpan::from((span.start as usize, span.length.max(1) as usize));
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("here".to_string()),
            source_span,
        ))))
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated across several inputs.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.span.map(|s| s.start).cmp(&b.span.map(|s| s.start)))
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // ========================================================================
    // Source and scanner errors (1000-1099)
    // ========================================================================
    pub const CANNOT_READ_SOURCE_0: DiagnosticMessage = diag!(1000, "Cannot read source: {0}.");
    pub const INVALID_CHARACTER_0: DiagnosticMessage = diag!(1001, "Invalid character '{0}'.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, "Unterminated string literal.");
    pub const UNTERMINATED_CHARACTER_LITERAL: DiagnosticMessage = diag!(1003, "Unterminated character literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1004, "'*/' expected.");
    pub const INVALID_ESCAPE_SEQUENCE_0: DiagnosticMessage = diag!(1005, "Invalid escape sequence '{0}'.");
    pub const CHARACTER_LITERAL_MUST_CONTAIN_ONE_CHARACTER: DiagnosticMessage = diag!(1006, "A character literal must contain exactly one character.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1007, "Hexadecimal digit expected.");
    pub const DIGIT_EXPECTED_IN_EXPONENT: DiagnosticMessage = diag!(1008, "Digit expected in exponent.");

    // ========================================================================
    // Parser errors (2000-2099)
    // ========================================================================
    pub const UNEXPECTED_TOKEN_0_EXPECTED_1: DiagnosticMessage = diag!(2001, "Unexpected token '{0}'; expected {1}.");
    pub const UNEXPECTED_END_OF_INPUT_EXPECTED_0: DiagnosticMessage = diag!(2002, "Unexpected end of input; expected {0}.");
    pub const NESTING_TOO_DEEP_0: DiagnosticMessage = diag!(2003, "Declarations are nested more than {0} levels deep.");

    // ========================================================================
    // Driver errors (3000-3099)
    // ========================================================================
    pub const CANNOT_READ_CONFIGURATION_FILE_0_1: DiagnosticMessage = diag!(3001, "Cannot read configuration file '{0}': {1}.");
    pub const CANNOT_SERIALIZE_TREE_0: DiagnosticMessage = diag!(3002, "Cannot serialize syntax tree: {0}.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;

    #[test]
    fn test_format_message() {
        let msg = format_message("'{0}' expected.", &[";"]);
        assert_eq!(msg, "';' expected.");
    }

    #[test]
    fn test_format_message_multiple_args() {
        let msg = format_message("Unexpected token '{0}'; expected {1}.", &["}", "';'"]);
        assert_eq!(msg, "Unexpected token '}'; expected ';'.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::at(
            TextSpan::new(10, 1),
            LineAndColumn::new(2, 5),
            &messages::INVALID_CHARACTER_0,
            &["$"],
        )
        .with_file("a.idl");
        let display = diag.to_string();
        assert_eq!(display, "a.idl:2:5: error IDL1001: Invalid character '$'.");
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::NESTING_TOO_DEEP_0, &["256"]);
        assert!(diag.file.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 2003);
        assert_eq!(diag.to_string(), "error IDL2003: Declarations are nested more than 256 levels deep.");
        assert!(diag.labels().is_none());
    }

    #[test]
    fn test_miette_code_and_label() {
        let diag = Diagnostic::at(
            TextSpan::new(4, 0),
            LineAndColumn::new(1, 5),
            &messages::UNTERMINATED_STRING_LITERAL,
            &[],
        )
        .with_help("close the literal with '\"'");
        assert_eq!(diag.code().map(|c| c.to_string()).as_deref(), Some("IDL1002"));
        assert_eq!(diag.severity(), Some(Severity::Error));
        let labels: Vec<_> = diag.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
        assert!(diag.help().is_some());
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());
        collection.add(
            Diagnostic::at(TextSpan::new(10, 1), LineAndColumn::new(1, 11), &messages::INVALID_CHARACTER_0, &["@"])
                .with_file("b.idl"),
        );
        collection.add(
            Diagnostic::at(TextSpan::new(5, 1), LineAndColumn::new(1, 6), &messages::INVALID_CHARACTER_0, &["$"])
                .with_file("a.idl"),
        );
        collection.sort();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.diagnostics()[0].file.as_deref(), Some("a.idl"));
        assert_eq!(collection.diagnostics()[1].file.as_deref(), Some("b.idl"));
    }
}
