//! Source positions carried by every raw and typed AST node.
//!
//! Lexing lives outside this crate, so `Position` does not retain source
//! text the way the wider compiler's `lexer::Span` does; it only keeps the
//! line/column pair a caller can re-render against its own source buffer.

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
