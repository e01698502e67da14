//! Furthest-failure error tracking.
//!
//! Every time the parser checks the current token against a kind and the
//! check fails, the reporter notes the token index and the kind. Checks made
//! while speculating count as well. When the parse finally fails, the error
//! names the token at the furthest index reached together with every kind
//! that was tried there.

use crate::error::{ParseError, SyntaxError};
use indexmap::IndexSet;
use ridl_ast::syntax_kind::SyntaxKind;
use ridl_scanner::Token;

#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    furthest: Option<usize>,
    expected: IndexSet<SyntaxKind>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `kind` was expected at token index `pos`.
    pub fn note(&mut self, pos: usize, kind: SyntaxKind) {
        match self.furthest {
            Some(furthest) if pos < furthest => {}
            Some(furthest) if pos == furthest => {
                self.expected.insert(kind);
            }
            _ => {
                self.furthest = Some(pos);
                self.expected.clear();
                self.expected.insert(kind);
            }
        }
    }

    pub fn note_all(&mut self, pos: usize, kinds: &[SyntaxKind]) {
        for &kind in kinds {
            self.note(pos, kind);
        }
    }

    /// Token index of the furthest failed check, if any check failed.
    pub fn furthest(&self) -> Option<usize> {
        self.furthest
    }

    pub fn expected(&self) -> &IndexSet<SyntaxKind> {
        &self.expected
    }
}

/// Build the error for an unexpected `current_token`.
pub fn make_error(current_token: Token, expected_kinds: &IndexSet<SyntaxKind>) -> ParseError {
    ParseError::Syntax(SyntaxError {
        found: current_token,
        expected: expected_kinds.iter().copied().collect(),
    })
}
