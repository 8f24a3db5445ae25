//! Regeneration of expression source from token trees.
//!
//! Printing normalizes layout rather than reproducing the input: comments
//! are gone, runs of whitespace collapse to one space, object literals are
//! laid out one property per line and statement blocks keep their line
//! breaks. A [`Substitute`] hook may replace any run of sibling nodes, which
//! is how conditional calls nested inside a printed value get resolved.

use std::convert::Infallible;
use std::fmt;

use crate::lexer::{Delim, Spacing, Token, TokenKind};
use crate::tree::{split_top_level, Group, Node};

/// Indentation of a printed line: the host line's own leading whitespace
/// followed by two spaces per nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent<'a> {
    base: &'a str,
    level: usize,
}

impl<'a> Indent<'a> {
    pub const UNIT: &'static str = "  ";

    pub fn new(base: &'a str) -> Self {
        Self { base, level: 0 }
    }

    /// The leading whitespace of the line containing `offset`.
    pub fn of_line(source: &'a str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = &source[line_start..];
        let width = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        Self::new(&line[..width])
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn deeper(self) -> Self {
        Self {
            level: self.level + 1,
            ..self
        }
    }
}

impl fmt::Display for Indent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base)?;
        for _ in 0..self.level {
            f.write_str(Self::UNIT)?;
        }
        Ok(())
    }
}

/// Replacement text for `consumed` sibling nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub consumed: usize,
    pub text: String,
}

/// Hook consulted by the printer before each node is printed.
pub trait Substitute<'s> {
    type Error;

    /// Offer replacement text for the nodes starting at `siblings[index]`.
    fn substitute(
        &mut self,
        siblings: &[Node<'s>],
        index: usize,
        indent: Indent<'_>,
        context: Context,
    ) -> Result<Option<Substitution>, Self::Error>;

    /// Offer a rewritten text for a template literal or JSX token.
    fn rewrite_token(
        &mut self,
        token: &Token<'s>,
        indent: Indent<'_>,
    ) -> Result<Option<String>, Self::Error> {
        let _ = (token, indent);
        Ok(None)
    }
}

/// A hook that never substitutes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl<'s> Substitute<'s> for Verbatim {
    type Error = Infallible;

    fn substitute(
        &mut self,
        _siblings: &[Node<'s>],
        _index: usize,
        _indent: Indent<'_>,
        _context: Context,
    ) -> Result<Option<Substitution>, Infallible> {
        Ok(None)
    }
}

/// Print `nodes` as one expression whose first line continues a line
/// indented by `indent`.
pub fn print_expression<'s, H>(
    nodes: &[Node<'s>],
    indent: Indent<'_>,
    hook: &mut H,
) -> Result<String, H::Error>
where
    H: Substitute<'s>,
{
    let mut printer = Printer {
        hook,
        out: String::new(),
    };
    printer.nodes(nodes, indent, Context::Expression)?;
    Ok(printer.out)
}

/// What a run of sibling nodes is a part of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Expression position: line breaks carry no meaning.
    Expression,
    /// Statement list: line breaks may terminate statements.
    Statements,
}

/// Keywords after which `{` starts an expression rather than a block.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "yield",
    "await",
    "in",
    "of",
    "void",
    "delete",
    "case",
    "throw",
    "instanceof",
    "as",
    "satisfies",
    "const",
    "let",
    "var",
    "default",
];

/// Whether a `{` preceded by `prev` opens a statement block (function or
/// class body, control-flow body) rather than an object literal.
pub fn opens_block(prev: Option<&Node<'_>>, context: Context) -> bool {
    match prev {
        None => context == Context::Statements,
        Some(Node::Group(group)) => match group.delim {
            Delim::Paren => true,
            Delim::Brace => context == Context::Statements,
            Delim::Bracket => false,
        },
        Some(Node::Leaf(token)) => match token.kind {
            TokenKind::Punct => matches!(token.text, "=>" | ";"),
            TokenKind::Ident => !EXPRESSION_KEYWORDS.contains(&token.text),
            _ => false,
        },
    }
}

struct Printer<'h, H> {
    hook: &'h mut H,
    out: String,
}

impl<'s, H: Substitute<'s>> Printer<'_, H> {
    fn nodes(&mut self, nodes: &[Node<'s>], indent: Indent<'_>, context: Context) -> Result<(), H::Error> {
        let mut index = 0;
        while index < nodes.len() {
            self.separate(nodes[index].spacing(), index == 0, indent, context);
            if let Some(substitution) = self.hook.substitute(nodes, index, indent, context)? {
                self.out.push_str(&substitution.text);
                index += substitution.consumed.max(1);
                continue;
            }
            self.node(nodes, index, indent, context)?;
            index += 1;
        }
        Ok(())
    }

    fn separate(&mut self, spacing: Spacing, first: bool, indent: Indent<'_>, context: Context) {
        match (context, first, spacing) {
            (Context::Expression, true, _) | (_, false, Spacing::None) => {}
            (Context::Expression, false, _) | (Context::Statements, false, Spacing::Space) => self.out.push(' '),
            (Context::Statements, _, _) => {
                self.out.push('\n');
                self.push_indent(indent);
            }
        }
    }

    fn push_indent(&mut self, indent: Indent<'_>) {
        self.out.push_str(&indent.to_string());
    }

    fn node(&mut self, nodes: &[Node<'s>], index: usize, indent: Indent<'_>, context: Context) -> Result<(), H::Error> {
        match &nodes[index] {
            Node::Leaf(token) => {
                if token.has_embedded_expressions() {
                    if let Some(text) = self.hook.rewrite_token(token, indent)? {
                        self.out.push_str(&text);
                        return Ok(());
                    }
                }
                self.out.push_str(token.text);
            }
            Node::Group(group) => {
                let prev = index.checked_sub(1).map(|i| &nodes[i]);
                match group.delim {
                    Delim::Brace if opens_block(prev, context) => self.block(group, indent)?,
                    Delim::Brace => self.object(group, indent)?,
                    Delim::Paren | Delim::Bracket => {
                        self.out.push(group.delim.open_char());
                        self.nodes(&group.children, indent, Context::Expression)?;
                        self.out.push(group.delim.close_char());
                    }
                }
            }
        }
        Ok(())
    }

    fn block(&mut self, group: &Group<'s>, indent: Indent<'_>) -> Result<(), H::Error> {
        if group.children.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        self.nodes(&group.children, indent.deeper(), Context::Statements)?;
        self.out.push('\n');
        self.push_indent(indent);
        self.out.push('}');
        Ok(())
    }

    fn object(&mut self, group: &Group<'s>, indent: Indent<'_>) -> Result<(), H::Error> {
        let properties: Vec<_> = split_top_level(&group.children, ",")
            .into_iter()
            .filter(|property| !property.is_empty())
            .collect();
        if properties.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        let inner = indent.deeper();
        self.out.push('{');
        for (i, property) in properties.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push('\n');
            self.push_indent(inner);
            self.nodes(property, inner, Context::Expression)?;
        }
        self.out.push('\n');
        self.push_indent(indent);
        self.out.push('}');
        Ok(())
    }
}
