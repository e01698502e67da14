//! Token buffering for backtracking.
//!
//! Tokens are pulled from the scanner on demand and kept, so the parser can
//! save a cursor, look arbitrarily far ahead and rewind. A lexical error ends
//! the stream: it is stored and an `Unknown` token stands in for the bad
//! input, which no production accepts.

use ridl_ast::syntax_kind::SyntaxKind;
use ridl_core::text::TextPos;
use ridl_scanner::{LexError, Scanner, Token};

pub struct TokenBuffer {
    scanner: Scanner,
    tokens: Vec<Token>,
    cursor: usize,
    lex_error: Option<LexError>,
    exhausted: bool,
}

impl TokenBuffer {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            tokens: Vec::new(),
            cursor: 0,
            lex_error: None,
            exhausted: false,
        }
    }

    fn fill_to(&mut self, index: usize) {
        while self.tokens.len() <= index && !self.exhausted {
            match self.scanner.next_token() {
                Ok(token) => {
                    self.exhausted = token.is_eof();
                    self.tokens.push(token);
                }
                Err(err) => {
                    let text = self.scanner.source().slice(err.span.start, err.span.end()).to_string();
                    let sentinel = Token::new(SyntaxKind::Unknown, err.span, err.position).with_text(text);
                    self.lex_error = Some(err);
                    self.exhausted = true;
                    self.tokens.push(sentinel);
                }
            }
        }
    }

    /// The token at `index`; past the end of the stream, the final token.
    pub fn token_at(&mut self, index: usize) -> &Token {
        self.fill_to(index);
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn current(&mut self) -> &Token {
        self.token_at(self.cursor)
    }

    pub fn current_kind(&mut self) -> SyntaxKind {
        self.current().kind
    }

    /// Kind of the token `n` places after the current one.
    pub fn peek_kind(&mut self, n: usize) -> SyntaxKind {
        self.token_at(self.cursor + n).kind
    }

    /// Consume the current token. The end of the stream is never consumed.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof() && token.kind != SyntaxKind::Unknown {
            self.cursor += 1;
        }
        token
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// End offset of the last consumed token.
    pub fn previous_end(&mut self) -> TextPos {
        match self.cursor.checked_sub(1) {
            Some(index) => self.token_at(index).span.end(),
            None => 0,
        }
    }

    pub fn take_lex_error(&mut self) -> Option<LexError> {
        self.lex_error.take()
    }

    pub fn text_len(&self) -> TextPos {
        self.scanner.source().text().len() as TextPos
    }
}
