//! ridl_core: Core utilities for the ridl IDL front end.
//!
//! Provides source positions, the line map used to turn byte offsets into
//! line/column pairs, and the index arena that owns AST nodes.

pub mod arena;
pub mod text;

// Re-export commonly used types
pub use arena::{Arena, Idx};
pub use text::{LineAndColumn, LineMap, TextSpan};
