//! The IDL scanner/lexer.
//!
//! Converts source text into tokens on demand. Whitespace, comments and
//! preprocessor directive lines are skipped; everything else must form a
//! token or the scan fails with a [`LexError`].

use crate::char_codes::*;
use crate::source::CharSource;
use crate::token::{LexError, LexErrorKind, Token};
use ridl_ast::syntax_kind::SyntaxKind;
use ridl_core::text::{TextPos, TextSpan};

/// The scanner converts IDL source text into tokens.
pub struct Scanner {
    source: CharSource,
    /// Start of the token being scanned.
    token_start: TextPos,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(text: &str) -> Self {
        Self::from_source(CharSource::new(text))
    }

    pub fn from_source(source: CharSource) -> Self {
        Self {
            source,
            token_start: 0,
        }
    }

    pub fn source(&self) -> &CharSource {
        &self.source
    }

    /// Scan the next token. At end of input this returns an
    /// `EndOfFileToken`, as often as it is called.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        self.token_start = self.source.pos();

        let Some(ch) = self.source.next_char() else {
            return Ok(self.finish(SyntaxKind::EndOfFileToken));
        };

        let kind = match ch {
            ';' => SyntaxKind::SemicolonToken,
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            ',' => SyntaxKind::CommaToken,
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '=' => SyntaxKind::EqualsToken,
            '|' => SyntaxKind::BarToken,
            '^' => SyntaxKind::CaretToken,
            '&' => SyntaxKind::AmpersandToken,
            '+' => SyntaxKind::PlusToken,
            '-' => SyntaxKind::MinusToken,
            '*' => SyntaxKind::AsteriskToken,
            '/' => SyntaxKind::SlashToken,
            '%' => SyntaxKind::PercentToken,
            '~' => SyntaxKind::TildeToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            ':' => self.pick(':', SyntaxKind::ColonColonToken, SyntaxKind::ColonToken),
            '<' => self.pick('<', SyntaxKind::LessThanLessThanToken, SyntaxKind::LessThanToken),
            '>' => self.pick(
                '>',
                SyntaxKind::GreaterThanGreaterThanToken,
                SyntaxKind::GreaterThanToken,
            ),
            '\'' => return self.scan_char_literal(false),
            '"' => return self.scan_string_literal(false),
            'L' if self.source.peek() == Some('\'') => {
                self.source.next_char();
                return self.scan_char_literal(true);
            }
            'L' if self.source.peek() == Some('"') => {
                self.source.next_char();
                return self.scan_string_literal(true);
            }
            c if is_identifier_start(c) => self.scan_identifier(),
            c if is_digit(c) => self.scan_number(c)?,
            '.' if self.source.peek().is_some_and(is_digit) => self.scan_after_point()?,
            other => return Err(self.error(LexErrorKind::InvalidCharacter(other))),
        };
        Ok(self.finish(kind))
    }

    /// Build the token spanning from `token_start` to the cursor.
    fn finish(&self, kind: SyntaxKind) -> Token {
        let end = self.source.pos();
        Token::new(
            kind,
            TextSpan::from_bounds(self.token_start, end),
            self.source.position_of(self.token_start),
        )
        .with_text(self.source.slice(self.token_start, end))
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(
            kind,
            TextSpan::from_bounds(self.token_start, self.source.pos()),
            self.source.position_of(self.token_start),
        )
    }

    /// Consume `next` if it follows, choosing the two-character kind.
    fn pick(&mut self, next: char, double: SyntaxKind, single: SyntaxKind) -> SyntaxKind {
        if self.source.peek() == Some(next) {
            self.source.next_char();
            double
        } else {
            single
        }
    }

    /// Consume characters while `pred` holds; returns how many.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.source.peek().is_some_and(&pred) {
            self.source.next_char();
            count += 1;
        }
        count
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.source.peek() {
                Some(c) if is_white_space(c) => {
                    self.source.next_char();
                }
                Some('/') => match self.source.peek_nth(1) {
                    Some('/') => self.source.skip_line(),
                    Some('*') => {
                        self.token_start = self.source.pos();
                        self.source.next_char();
                        self.source.next_char();
                        if !self.source.skip_past("*/") {
                            return Err(self.error(LexErrorKind::UnterminatedComment));
                        }
                    }
                    _ => return Ok(()),
                },
                // Line markers and #pragma/#include left by the preprocessor.
                Some('#') if self.source.at_line_start() => self.source.skip_line(),
                _ => return Ok(()),
            }
        }
    }

    // ========================================================================
    // Identifiers and numbers
    // ========================================================================

    fn scan_identifier(&mut self) -> SyntaxKind {
        self.eat_while(is_identifier_part);
        let text = self.source.slice(self.token_start, self.source.pos());
        SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_number(&mut self, first: char) -> Result<SyntaxKind, LexError> {
        if first == '0' && matches!(self.source.peek(), Some('x' | 'X')) {
            self.source.next_char();
            if self.eat_while(is_hex_digit) == 0 {
                return Err(self.error(LexErrorKind::HexDigitExpected));
            }
            return Ok(SyntaxKind::HexLiteral);
        }

        let rest = self.eat_while(is_digit);
        match self.source.peek() {
            Some('.') => {
                self.source.next_char();
                self.scan_after_point()
            }
            Some(c) if is_exponent_marker(c) => {
                self.scan_exponent()?;
                Ok(SyntaxKind::ExponentFloatLiteral)
            }
            Some(c) if is_fixed_suffix(c) => {
                self.source.next_char();
                Ok(SyntaxKind::FixedPtLiteral)
            }
            _ if first == '0' => {
                // An octal literal ends at the first non-octal digit, which
                // starts the next token.
                let digits = self.source.slice(self.token_start + 1, self.source.pos());
                let octal = digits.chars().take_while(|&c| is_octal_digit(c)).count();
                self.source.push_back(rest - octal);
                Ok(SyntaxKind::OctalLiteral)
            }
            _ => Ok(SyntaxKind::DecimalLiteral),
        }
    }

    /// Scan the fraction of a floating point or fixed point literal, the
    /// decimal point already consumed.
    fn scan_after_point(&mut self) -> Result<SyntaxKind, LexError> {
        self.eat_while(is_digit);
        match self.source.peek() {
            Some(c) if is_exponent_marker(c) => {
                self.scan_exponent()?;
                Ok(SyntaxKind::FloatLiteral)
            }
            Some(c) if is_fixed_suffix(c) => {
                self.source.next_char();
                Ok(SyntaxKind::FixedPtLiteral)
            }
            _ => Ok(SyntaxKind::FloatLiteral),
        }
    }

    fn scan_exponent(&mut self) -> Result<(), LexError> {
        self.source.next_char();
        if matches!(self.source.peek(), Some('+' | '-')) {
            self.source.next_char();
        }
        if self.eat_while(is_digit) == 0 {
            return Err(self.error(LexErrorKind::ExponentDigitExpected));
        }
        Ok(())
    }

    // ========================================================================
    // Quoted literals
    // ========================================================================

    fn scan_char_literal(&mut self, wide: bool) -> Result<Token, LexError> {
        let value = match self.source.next_char() {
            None | Some('\n' | '\r') => return Err(self.error(LexErrorKind::UnterminatedChar)),
            Some('\'') => return Err(self.error(LexErrorKind::BadCharLiteral)),
            Some('\\') => match self.scan_escape(wide)? {
                Some(c) => c,
                None => return Err(self.error(LexErrorKind::UnterminatedChar)),
            },
            Some(c) => c,
        };
        match self.source.next_char() {
            Some('\'') => {}
            None | Some('\n' | '\r') => return Err(self.error(LexErrorKind::UnterminatedChar)),
            Some(_) => return Err(self.error(LexErrorKind::BadCharLiteral)),
        }
        let kind = if wide {
            SyntaxKind::WideCharLiteral
        } else {
            SyntaxKind::CharLiteral
        };
        Ok(self.finish(kind).with_value(value.to_string()))
    }

    fn scan_string_literal(&mut self, wide: bool) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.source.next_char() {
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
                Some('\n' | '\r') => {
                    self.source.push_back(1);
                    return Err(self.error(LexErrorKind::UnterminatedString));
                }
                Some('"') => break,
                Some('\\') => match self.scan_escape(wide)? {
                    Some(c) => value.push(c),
                    None => return Err(self.error(LexErrorKind::UnterminatedString)),
                },
                Some(c) => value.push(c),
            }
        }
        let kind = if wide {
            SyntaxKind::WideStringLiteral
        } else {
            SyntaxKind::StringLiteral
        };
        Ok(self.finish(kind).with_value(value))
    }

    /// Decode an escape sequence, the backslash already consumed. Returns
    /// `None` when the input ends right after the backslash.
    fn scan_escape(&mut self, wide: bool) -> Result<Option<char>, LexError> {
        let escape_start = self.source.pos() - 1;
        let Some(ch) = self.source.next_char() else {
            return Ok(None);
        };
        if let Some(c) = simple_escape(ch) {
            return Ok(Some(c));
        }

        let value = match ch {
            '0'..='7' => {
                let mut value = ch as u32 - '0' as u32;
                for _ in 0..2 {
                    match self.source.peek() {
                        Some(d) if is_octal_digit(d) => {
                            self.source.next_char();
                            value = value * 8 + (d as u32 - '0' as u32);
                        }
                        _ => break,
                    }
                }
                value
            }
            'x' => self.scan_hex_escape(usize::MAX).ok_or_else(|| self.invalid_escape(escape_start))??,
            'u' if wide => self.scan_hex_escape(4).ok_or_else(|| self.invalid_escape(escape_start))??,
            _ => return Err(self.invalid_escape(escape_start)),
        };
        char::from_u32(value).map(Some).ok_or_else(|| self.invalid_escape(escape_start))
    }

    fn invalid_escape(&self, escape_start: TextPos) -> LexError {
        let seq = self.source.slice(escape_start, self.source.pos());
        LexError::new(
            LexErrorKind::InvalidEscape(seq.escape_default().to_string()),
            TextSpan::from_bounds(escape_start, self.source.pos()),
            self.source.position_of(escape_start),
        )
    }

    /// Read up to `max` hex digits. `None` means the value overflowed;
    /// `Some(Err)` means there was no digit at all.
    fn scan_hex_escape(&mut self, max: usize) -> Option<Result<u32, LexError>> {
        let digits_start = self.source.pos();
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(d) = self.source.peek().and_then(|c| c.to_digit(16)) else {
                break;
            };
            self.source.next_char();
            value = value.checked_mul(16)?.checked_add(d)?;
            count += 1;
        }
        if count == 0 {
            return Some(Err(LexError::new(
                LexErrorKind::HexDigitExpected,
                TextSpan::empty(digits_start),
                self.source.position_of(digits_start),
            )));
        }
        Some(Ok(value))
    }
}

/// Scan all of `text`, ending with the `EndOfFileToken`.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        tokenize(text)
            .expect("scan")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_eof_repeats() {
        let mut scanner = Scanner::new("  ");
        assert_eq!(scanner.next_token().unwrap().kind, SyntaxKind::EndOfFileToken);
        assert_eq!(scanner.next_token().unwrap().kind, SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_octal_stops_at_non_octal_digit() {
        let tokens = tokenize("0779").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::OctalLiteral);
        assert_eq!(tokens[0].text, "077");
        assert_eq!(tokens[1].kind, SyntaxKind::DecimalLiteral);
        assert_eq!(tokens[1].text, "9");
    }

    #[test]
    fn test_wide_prefix_only_before_quote() {
        assert_eq!(
            kinds("L Lx L'a'"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::WideCharLiteral,
                SyntaxKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn test_hex_escape_overflow_is_invalid() {
        let err = tokenize("\"\\x123456789\"").unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::InvalidEscape(_)));
    }

    #[test]
    fn test_hash_mid_line_is_invalid() {
        let err = tokenize("module # x").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidCharacter('#'));
    }
}
