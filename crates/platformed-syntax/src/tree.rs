//! Token trees: tokens nested by their bracket pairs.
//!
//! The tree is the structural view every pass works on. Brackets are always
//! balanced in a successfully built tree, so a call's argument list or an
//! object literal is one [`Group`] node regardless of what it contains.

use crate::error::{Position, Result, SyntaxError};
use crate::lexer::{tokenize_span, Delim, Dialect, Spacing, Token, TokenKind};
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'s> {
    Leaf(Token<'s>),
    Group(Group<'s>),
}

/// A bracketed run of nodes, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'s> {
    pub delim: Delim,
    pub open: Token<'s>,
    pub close: Token<'s>,
    pub children: Vec<Node<'s>>,
}

impl Group<'_> {
    pub fn span(&self) -> Span {
        self.open.span.join(self.close.span)
    }

    /// The span between the delimiters.
    pub fn inner_span(&self) -> Span {
        Span::new(self.open.span.end, self.close.span.start)
    }
}

impl<'s> Node<'s> {
    pub fn span(&self) -> Span {
        match self {
            Node::Leaf(token) => token.span,
            Node::Group(group) => group.span(),
        }
    }

    /// The first token of the node: the leaf itself or a group's opening delimiter.
    pub fn first_token(&self) -> &Token<'s> {
        match self {
            Node::Leaf(token) => token,
            Node::Group(group) => &group.open,
        }
    }

    pub fn spacing(&self) -> Spacing {
        self.first_token().spacing
    }

    pub fn as_leaf(&self) -> Option<&Token<'s>> {
        match self {
            Node::Leaf(token) => Some(token),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group<'s>> {
        match self {
            Node::Group(group) => Some(group),
            Node::Leaf(_) => None,
        }
    }

    /// The group, if this node is one delimited by `delim`.
    pub fn as_delimited(&self, delim: Delim) -> Option<&Group<'s>> {
        self.as_group().filter(|group| group.delim == delim)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.as_leaf().is_some_and(|token| token.is_ident(name))
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.as_leaf().is_some_and(|token| token.is_punct(punct))
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.as_leaf().is_some_and(|token| token.kind == kind)
    }
}

/// A parsed source text (or region of one).
#[derive(Debug, Clone)]
pub struct SourceTree<'s> {
    source: &'s str,
    nodes: Vec<Node<'s>>,
}

impl<'s> SourceTree<'s> {
    /// Tokenize and nest a whole source text.
    pub fn parse(source: &'s str, dialect: &Dialect) -> Result<Self> {
        Self::parse_span(source, Span::new(0, source.len()), dialect)
    }

    /// Tokenize and nest one region of `source`, such as an expression hole
    /// inside a template literal. Spans stay relative to the whole source.
    pub fn parse_span(source: &'s str, span: Span, dialect: &Dialect) -> Result<Self> {
        let tokens = tokenize_span(source, span, dialect)?;
        let nodes = nest(source, tokens)?;
        Ok(Self { source, nodes })
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn nodes(&self) -> &[Node<'s>] {
        &self.nodes
    }
}

fn nest<'s>(source: &'s str, tokens: Vec<Token<'s>>) -> Result<Vec<Node<'s>>> {
    let mut stack: Vec<(Delim, Token<'s>, Vec<Node<'s>>)> = Vec::new();
    let mut current: Vec<Node<'s>> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Open(delim) => {
                stack.push((delim, token, std::mem::take(&mut current)));
            }
            TokenKind::Close(delim) => {
                let Some((open_delim, open, parent)) = stack.pop() else {
                    return Err(SyntaxError::UnexpectedClose {
                        found: delim.close_char(),
                        at: Position::of(source, token.span.start),
                    });
                };
                if open_delim != delim {
                    return Err(SyntaxError::MismatchedDelimiter {
                        found: delim.close_char(),
                        expected: open_delim.close_char(),
                        at: Position::of(source, token.span.start),
                    });
                }
                let children = std::mem::replace(&mut current, parent);
                current.push(Node::Group(Group {
                    delim,
                    open,
                    close: token,
                    children,
                }));
            }
            _ => current.push(Node::Leaf(token)),
        }
    }

    if let Some((delim, open, _)) = stack.pop() {
        return Err(SyntaxError::Unclosed {
            open: delim.open_char(),
            at: Position::of(source, open.span.start),
        });
    }
    Ok(current)
}

/// Split `nodes` on top-level occurrences of the punctuator `separator`.
///
/// Separators nested inside groups are not considered. A trailing separator
/// yields a final empty segment.
pub fn split_top_level<'a, 's>(nodes: &'a [Node<'s>], separator: &str) -> Vec<&'a [Node<'s>]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (index, node) in nodes.iter().enumerate() {
        if node.is_punct(separator) {
            segments.push(&nodes[start..index]);
            start = index + 1;
        }
    }
    segments.push(&nodes[start..]);
    segments
}

/// Span covered by a non-empty run of sibling nodes.
pub fn nodes_span(nodes: &[Node<'_>]) -> Option<Span> {
    let first = nodes.first()?.span();
    let last = nodes.last()?.span();
    Some(first.join(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceTree<'_> {
        SourceTree::parse(src, &Dialect::default()).unwrap()
    }

    #[test]
    fn groups_nest() {
        let tree = parse("f(a, [b, { c }])");
        assert_eq!(tree.nodes().len(), 2);
        let call = tree.nodes()[1].as_delimited(Delim::Paren).unwrap();
        assert_eq!(call.children.len(), 3);
        let list = call.children[2].as_delimited(Delim::Bracket).unwrap();
        assert!(list.children[2].as_delimited(Delim::Brace).is_some());
    }

    #[test]
    fn group_spans() {
        let src = "x({ a: 1 })";
        let tree = parse(src);
        let call = tree.nodes()[1].as_group().unwrap();
        assert_eq!(call.span().slice(src), "({ a: 1 })");
        assert_eq!(call.inner_span().slice(src), "{ a: 1 }");
    }

    #[test]
    fn mismatched_delimiter() {
        let err = SourceTree::parse("f(a]", &Dialect::default()).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::MismatchedDelimiter {
                found: ']',
                expected: ')',
                ..
            }
        ));
    }

    #[test]
    fn unclosed_and_unexpected() {
        let err = SourceTree::parse("{ a", &Dialect::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::Unclosed { open: '{', .. }));
        let err = SourceTree::parse("a }", &Dialect::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedClose { found: '}', .. }));
    }

    #[test]
    fn split_on_top_level_commas() {
        let tree = parse("a, f(b, c), d,");
        let segments = split_top_level(tree.nodes(), ",");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1].len(), 2);
        assert!(segments[3].is_empty());
    }

    #[test]
    fn span_of_node_run() {
        let src = "a + f(b)";
        let tree = parse(src);
        assert_eq!(nodes_span(tree.nodes()).unwrap().slice(src), "a + f(b)");
        assert!(nodes_span(&[]).is_none());
    }
}
