//! ridl_ast: Abstract Syntax Tree definitions for the IDL front end.
//!
//! This module defines the single tagged node type, the SyntaxKind enum,
//! type and constant expressions, the finalization steps the parser applies
//! while assembling the tree, and ways to walk and print it.

pub mod dump;
pub mod finalize;
pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
