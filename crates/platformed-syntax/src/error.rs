//! Syntax error types.

use std::fmt;

/// A 1-based line/column position in a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute the position of a byte offset in `source`.
    ///
    /// Columns count characters, not bytes.
    pub fn of(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors produced while tokenizing or building the token tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unterminated string literal at {at}")]
    UnterminatedString { at: Position },

    #[error("unterminated template literal at {at}")]
    UnterminatedTemplate { at: Position },

    #[error("unterminated comment at {at}")]
    UnterminatedComment { at: Position },

    #[error("unterminated regular expression at {at}")]
    UnterminatedRegex { at: Position },

    /// Only surfaced through [`crate::lexer::embedded_expressions`]; ordinary
    /// tokenization falls back to reading `<` as an operator.
    #[error("malformed JSX element at {at}")]
    InvalidJsx { at: Position },

    #[error("unexpected '{found}' at {at}, expected '{expected}'")]
    MismatchedDelimiter {
        found: char,
        expected: char,
        at: Position,
    },

    #[error("unexpected closing '{found}' at {at}")]
    UnexpectedClose { found: char, at: Position },

    #[error("unclosed '{open}' opened at {at}")]
    Unclosed { open: char, at: Position },
}

/// Result type alias for syntax operations.
pub type Result<T> = std::result::Result<T, SyntaxError>;
