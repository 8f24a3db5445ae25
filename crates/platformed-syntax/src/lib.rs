//! Token-level syntax support for platformed JavaScript and TypeScript sources.
//!
//! This crate does not build an AST. It lexes source text into tokens, nests
//! them by bracket pairs into a token tree, and prints runs of nodes back out
//! as normalized source. That is enough structure to find call expressions,
//! read object-literal arguments and regenerate the chosen values.
//!
//! ## Modules
//!
//! - [`lexer`]: JS/TS/JSX tokenizer with byte spans
//! - [`tree`]: Bracket-nested token trees
//! - [`printer`]: Expression regeneration with substitution hooks
//! - [`literal`]: Static values of string and number literals
//! - [`span`]: Byte ranges into source text
//! - [`error`]: Syntax errors with line/column positions

pub mod error;
pub mod lexer;
pub mod literal;
pub mod printer;
pub mod span;
pub mod tree;

pub use error::{Position, SyntaxError};
pub use lexer::{embedded_expressions, tokenize, Delim, Dialect, Spacing, Token, TokenKind};
pub use printer::{opens_block, print_expression, Context, Indent, Substitute, Substitution, Verbatim};
pub use span::Span;
pub use tree::{nodes_span, split_top_level, Group, Node, SourceTree};
