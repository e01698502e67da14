//! ridl_scanner: Lexer/tokenizer for IDL source code.
//!
//! Produces tokens on demand from a [`CharSource`], with support for:
//! - All IDL keywords and punctuation, longest match first
//! - Octal, decimal, hex, floating point and fixed point literals
//! - Narrow and wide character and string literals with escapes
//! - Line and block comments and preprocessor directive lines

mod char_codes;
mod scanner;
mod source;
mod token;

pub use scanner::{tokenize, Scanner};
pub use source::{CharSource, SourceError};
pub use token::{LexError, LexErrorKind, Token};
