//! ridl_parser: Recursive descent parser for OMG IDL.
//!
//! Parses the token stream from the scanner into an arena-allocated AST.
//! Parsing stops at the first error; see [`ParseError`].

mod buffer;
mod error;
mod options;
mod parser;
mod precedence;
mod reporter;
mod utilities;

pub use error::{ParseError, SyntaxError};
pub use options::{ParserOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use reporter::{make_error, ErrorReporter};

use ridl_ast::Ast;
use ridl_scanner::CharSource;
use std::io::Read;

/// Parse IDL source text with default options.
pub fn parse(text: &str) -> Result<Ast, ParseError> {
    Parser::new(text).parse_unit()
}

pub fn parse_with_options(text: &str, options: ParserOptions) -> Result<Ast, ParseError> {
    Parser::with_options(text, options).parse_unit()
}

/// Read a UTF-8 stream to its end and parse it.
pub fn parse_reader(reader: impl Read) -> Result<Ast, ParseError> {
    let source = CharSource::from_reader(reader)?;
    Parser::from_source(source, ParserOptions::default()).parse_unit()
}
