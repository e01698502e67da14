//! Character source feeding the scanner.
//!
//! Holds the whole input as validated UTF-8 and hands it out one character
//! at a time. Positions are byte offsets; the line map turns them into
//! 1-based line/column pairs.

use ridl_core::text::{LineAndColumn, LineMap, TextPos};
use std::io::Read;

/// Failure to obtain source text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("source is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// A pull-based character stream over in-memory text.
#[derive(Debug, Clone)]
pub struct CharSource {
    text: String,
    pos: usize,
    line_map: LineMap,
}

impl CharSource {
    /// Create a source over an in-memory string.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_map = LineMap::new(&text);
        Self {
            text,
            pos: 0,
            line_map,
        }
    }

    /// Read the whole of `reader` and validate it as UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, SourceError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Validate `bytes` as UTF-8 and create a source over them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SourceError> {
        let text = simdutf8::compat::from_utf8(bytes).map_err(|e| SourceError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        Ok(Self::new(text))
    }

    /// Consume and return the next character; `None` at end of input.
    #[inline]
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.text[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Look at the next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Look `n` characters past the next one (`peek_nth(0) == peek()`).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    /// Un-read the last `n` characters.
    pub fn push_back(&mut self, n: usize) {
        for _ in 0..n {
            match self.text[..self.pos].chars().next_back() {
                Some(ch) => self.pos -= ch.len_utf8(),
                None => break,
            }
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> TextPos {
        self.pos as TextPos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The complete source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source text between two byte offsets.
    pub fn slice(&self, start: TextPos, end: TextPos) -> &str {
        &self.text[start as usize..end as usize]
    }

    /// 1-based line and column of a byte offset.
    pub fn position_of(&self, pos: TextPos) -> LineAndColumn {
        self.line_map.line_and_column_of(pos)
    }

    /// Whether only spaces and tabs separate the cursor from the start of
    /// its line.
    pub fn at_line_start(&self) -> bool {
        let line = self.line_map.line_of(self.pos());
        let start = self.line_map.line_start(line) as usize;
        self.text.as_bytes()[start..self.pos]
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }

    /// Advance to the next `\n` (left unconsumed) or to end of input.
    pub fn skip_line(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        self.pos += memchr::memchr(b'\n', rest).unwrap_or(rest.len());
    }

    /// Advance past the next occurrence of `needle`. Returns false and moves
    /// to end of input when there is none.
    pub fn skip_past(&mut self, needle: &str) -> bool {
        let rest = &self.text.as_bytes()[self.pos..];
        match memchr::memmem::find(rest, needle.as_bytes()) {
            Some(i) => {
                self.pos += i + needle.len();
                true
            }
            None => {
                self.pos = self.text.len();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_char_and_push_back() {
        let mut src = CharSource::new("ab");
        assert_eq!(src.next_char(), Some('a'));
        assert_eq!(src.next_char(), Some('b'));
        assert_eq!(src.next_char(), None);
        src.push_back(2);
        assert_eq!(src.pos(), 0);
        assert_eq!(src.peek(), Some('a'));
        src.push_back(5);
        assert_eq!(src.pos(), 0);
    }

    #[test]
    fn test_positions_across_crlf() {
        let mut src = CharSource::new("a\r\nbc\nd");
        for _ in 0..4 {
            src.next_char();
        }
        assert_eq!(src.position_of(src.pos()), LineAndColumn::new(2, 2));
        src.skip_line();
        src.next_char();
        assert_eq!(src.position_of(src.pos()), LineAndColumn::new(3, 1));
    }

    #[test]
    fn test_skip_past() {
        let mut src = CharSource::new("comment */x");
        assert!(src.skip_past("*/"));
        assert_eq!(src.peek(), Some('x'));
        let mut src = CharSource::new("never closed");
        assert!(!src.skip_past("*/"));
        assert!(src.is_eof());
    }

    #[test]
    fn test_at_line_start() {
        let mut src = CharSource::new("x\n  #pragma");
        assert!(src.at_line_start());
        src.next_char();
        assert!(!src.at_line_start());
        src.next_char();
        src.next_char();
        src.next_char();
        assert!(src.at_line_start());
    }

    #[test]
    fn test_from_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = b"module \xff";
        match CharSource::from_reader(bytes) {
            Err(SourceError::InvalidUtf8 { offset }) => assert_eq!(offset, 7),
            other => panic!("expected utf-8 error, got {:?}", other),
        }
        let ok = CharSource::from_reader(&b"module M {};"[..]).expect("valid");
        assert_eq!(ok.text(), "module M {};");
    }
}
