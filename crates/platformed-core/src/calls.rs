//! Conditional-call resolution.
//!
//! A conditional call is the marker function applied to a single object
//! literal, optionally with one type-argument list:
//!
//! ```text
//! platformed({ ios: IosButton, common: Button })
//! platformed<Theme>({ android: dark, common: light })
//! ```
//!
//! Every call site is replaced by the regenerated source of the value keyed
//! by the target platform, or by the fallback platform when the target has
//! no key. Calls are found structurally in the token tree, so calls inside
//! comments or strings are never touched, while calls inside template
//! substitutions and JSX expression containers are.

use indexmap::IndexMap;
use platformed_syntax::literal::{number_key, string_value};
use platformed_syntax::{
    embedded_expressions, nodes_span, opens_block, print_expression, split_top_level, Context,
    Delim, Dialect, Group, Indent, Node, SourceTree, Spacing, Span, Substitute, Substitution,
    SyntaxError, Token, TokenKind,
};
use tracing::debug;

use crate::config::SpecializerConfig;
use crate::edit::{apply_edits, Edit};
use crate::error::{Result, SpecializeError};
use crate::platform::{PlatformRegistry, COMMON_PLATFORM};

/// A matched `callee<T>({ ... })` among a run of sibling nodes.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a, 's> {
    pub callee: &'s str,
    pub object: &'a Group<'s>,
    pub span: Span,
    /// Number of sibling nodes the call covers.
    pub consumed: usize,
}

/// A property value of the conditional call's object argument.
#[derive(Debug, Clone, Copy)]
pub enum PropertyValue<'a, 's> {
    /// `key: value`, or the key itself for shorthand properties.
    Expression(&'a [Node<'s>]),
    /// `key(params) { body }`, emitted as a function expression.
    Method {
        keyword: &'static str,
        function: &'a [Node<'s>],
    },
}

/// Output of [`resolve_calls`].
#[derive(Debug, Clone)]
pub struct ResolvedCalls {
    pub code: String,
    /// Call sites replaced, nested ones included.
    pub resolved: usize,
}

/// Replace every conditional call to one of `callees` in `code`.
pub fn resolve_calls(
    code: &str,
    callees: &[String],
    config: &SpecializerConfig,
    module: &str,
) -> Result<ResolvedCalls> {
    if !callees.iter().any(|callee| code.contains(callee.as_str())) {
        return Ok(ResolvedCalls {
            code: code.to_string(),
            resolved: 0,
        });
    }

    let tree = SourceTree::parse(code, &config.dialect).map_err(|source| SpecializeError::Syntax {
        module: module.to_string(),
        source,
    })?;
    let mut resolver = CallResolver::new(code, &config.registry, &config.dialect, module, callees);
    let mut edits = Vec::new();
    resolver.collect(tree.nodes(), Context::Statements, &mut edits)?;

    Ok(ResolvedCalls {
        code: apply_edits(code, edits),
        resolved: resolver.resolved,
    })
}

/// Finds conditional calls in token trees over one source text and
/// produces their replacements.
pub struct CallResolver<'r, 's> {
    source: &'s str,
    registry: &'r PlatformRegistry,
    dialect: &'r Dialect,
    module: &'r str,
    callees: &'r [String],
    resolved: usize,
}

impl<'r, 's> CallResolver<'r, 's> {
    pub fn new(
        source: &'s str,
        registry: &'r PlatformRegistry,
        dialect: &'r Dialect,
        module: &'r str,
        callees: &'r [String],
    ) -> Self {
        Self {
            source,
            registry,
            dialect,
            module,
            callees,
            resolved: 0,
        }
    }

    pub fn resolved(&self) -> usize {
        self.resolved
    }

    fn structural(&self, detail: String) -> SpecializeError {
        SpecializeError::Structural {
            module: self.module.to_string(),
            detail,
        }
    }

    fn syntax(&self, source: SyntaxError) -> SpecializeError {
        SpecializeError::Syntax {
            module: self.module.to_string(),
            source,
        }
    }

    /// Match a conditional call starting at `siblings[index]`.
    ///
    /// Member accesses (`obj.platformed(...)`), function declarations and
    /// method definitions named like the callee are not calls. A call whose
    /// arguments are anything but one object literal is an error.
    pub fn match_call<'a>(&self, siblings: &'a [Node<'s>], index: usize) -> Result<Option<CallSite<'a, 's>>> {
        let Some(callee) = siblings[index]
            .as_leaf()
            .filter(|token| token.kind == TokenKind::Ident)
            .filter(|token| self.callees.iter().any(|name| name == token.text))
        else {
            return Ok(None);
        };
        if let Some(prev) = index.checked_sub(1).map(|i| &siblings[i]) {
            if prev.is_punct(".") || prev.is_punct("?.") || prev.is_ident("function") {
                return Ok(None);
            }
        }

        let mut cursor = index + 1;
        if self.dialect.typescript && siblings.get(cursor).is_some_and(|n| n.is_punct("<")) {
            let Some(close) = closing_angle(siblings, cursor) else {
                return Ok(None);
            };
            cursor = close + 1;
        }
        let Some(arguments) = siblings.get(cursor).and_then(|n| n.as_delimited(Delim::Paren)) else {
            return Ok(None);
        };
        if siblings
            .get(cursor + 1)
            .is_some_and(|n| n.as_delimited(Delim::Brace).is_some())
        {
            return Ok(None);
        }

        let object = single_object_argument(arguments).ok_or_else(|| {
            self.structural(format!(
                "{}() call must have exactly one object literal argument, found `{}`",
                callee.text,
                arguments.span().slice(self.source)
            ))
        })?;
        Ok(Some(CallSite {
            callee: callee.text,
            object,
            span: callee.span.join(arguments.span()),
            consumed: cursor + 1 - index,
        }))
    }

    /// The call's properties by key. A repeated key keeps its last value.
    pub fn properties<'a>(&self, call: &CallSite<'a, 's>) -> Result<IndexMap<String, PropertyValue<'a, 's>>> {
        let mut properties = IndexMap::new();
        let segments = split_top_level(&call.object.children, ",");
        let count = segments.len();
        for (i, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                if i + 1 == count {
                    break;
                }
                return Err(self.structural(format!("{}() call contains an empty property", call.callee)));
            }
            let (key, value) = self.property(call.callee, segment)?;
            properties.insert(key, value);
        }
        Ok(properties)
    }

    fn property<'a>(&self, callee: &str, segment: &'a [Node<'s>]) -> Result<(String, PropertyValue<'a, 's>)> {
        if segment[0].is_punct("...") {
            return Err(self.structural(format!(
                "{callee}() call contains an object with spread element. Only explicit properties are supported"
            )));
        }

        // `get`, `set` and `async` are modifiers only when a key follows them.
        let is_modifier = |i: usize, name: &str| {
            segment[i].is_ident(name)
                && segment
                    .get(i + 1)
                    .is_some_and(|n| !n.is_punct(":") && n.as_delimited(Delim::Paren).is_none())
        };
        if is_modifier(0, "get") || is_modifier(0, "set") {
            return Err(self.structural(format!(
                "{callee}() call contains an accessor property. Only explicit properties are supported"
            )));
        }

        let mut cursor = 0;
        let is_async = is_modifier(0, "async");
        if is_async {
            cursor += 1;
        }
        let generator = segment.get(cursor).is_some_and(|n| n.is_punct("*"));
        if generator {
            cursor += 1;
        }

        let unsupported = || {
            self.structural(format!(
                "{callee}() call contains an unsupported property `{}`",
                nodes_span(segment).map_or("", |span| span.slice(self.source))
            ))
        };
        let key_node = segment.get(cursor).ok_or_else(unsupported)?;
        let key = self.key(callee, key_node)?;
        let rest = &segment[cursor + 1..];
        let modified = is_async || generator;

        let value = match rest {
            [] if !modified && key_node.is_kind(TokenKind::Ident) => {
                PropertyValue::Expression(&segment[cursor..cursor + 1])
            }
            [colon, value @ ..] if colon.is_punct(":") && !modified && !value.is_empty() => {
                PropertyValue::Expression(value)
            }
            [params, .., body]
                if params.as_delimited(Delim::Paren).is_some()
                    && body.as_delimited(Delim::Brace).is_some() =>
            {
                let keyword = match (is_async, generator) {
                    (false, false) => "function",
                    (true, false) => "async function",
                    (false, true) => "function*",
                    (true, true) => "async function*",
                };
                PropertyValue::Method {
                    keyword,
                    function: rest,
                }
            }
            _ => return Err(unsupported()),
        };
        Ok((key, value))
    }

    fn key(&self, callee: &str, node: &Node<'s>) -> Result<String> {
        let non_literal = || self.structural(format!("{callee}() call contains a non-literal key"));
        let literal = |token: &Token<'_>| match token.kind {
            TokenKind::String => string_value(token.text),
            TokenKind::Number => number_key(token.text),
            _ => None,
        };
        match node {
            Node::Leaf(token) if token.kind == TokenKind::Ident => Ok(token.text.to_string()),
            Node::Leaf(token) => literal(token).ok_or_else(non_literal),
            Node::Group(group) if group.delim == Delim::Bracket => match group.children.as_slice() {
                [Node::Leaf(token)] => literal(token).ok_or_else(non_literal),
                _ => Err(non_literal()),
            },
            Node::Group(_) => Err(non_literal()),
        }
    }

    /// Regenerated replacement text for `call`, found at `siblings[index]`.
    fn resolve(
        &mut self,
        call: &CallSite<'_, 's>,
        siblings: &[Node<'s>],
        index: usize,
        context: Context,
        indent: Indent<'_>,
    ) -> Result<String> {
        let properties = self.properties(call)?;
        let target = self.registry.target();
        let (platform, value) = match properties.get(target) {
            Some(value) => (target, *value),
            None => match properties.get(COMMON_PLATFORM) {
                Some(value) => (COMMON_PLATFORM, *value),
                None => {
                    return Err(SpecializeError::Coverage {
                        platform: target.to_string(),
                        module: self.module.to_string(),
                        content: call.object.inner_span().slice(self.source).to_string(),
                    })
                }
            },
        };

        let text = match value {
            PropertyValue::Expression(nodes) => print_expression(nodes, indent, self)?,
            PropertyValue::Method { keyword, function } => {
                format!("{keyword} {}", print_expression(function, indent, self)?)
            }
        };
        self.resolved += 1;
        debug!(module = self.module, callee = call.callee, platform, "resolved conditional call");

        if needs_parens(&value, siblings, index, call.consumed, context) {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    fn collect(&mut self, nodes: &[Node<'s>], context: Context, edits: &mut Vec<Edit>) -> Result<()> {
        let mut index = 0;
        while index < nodes.len() {
            if let Some(call) = self.match_call(nodes, index)? {
                let indent = Indent::of_line(self.source, call.span.start);
                let text = self.resolve(&call, nodes, index, context, indent)?;
                edits.push(Edit::replace(call.span, text));
                index += call.consumed;
                continue;
            }
            match &nodes[index] {
                Node::Group(group) => {
                    let prev = index.checked_sub(1).map(|i| &nodes[i]);
                    let inner = if group.delim == Delim::Brace && opens_block(prev, context) {
                        Context::Statements
                    } else {
                        Context::Expression
                    };
                    self.collect(&group.children, inner, edits)?;
                }
                Node::Leaf(token) if token.has_embedded_expressions() => {
                    self.collect_embedded(token, edits)?;
                }
                Node::Leaf(_) => {}
            }
            index += 1;
        }
        Ok(())
    }

    /// Resolve calls inside the expression holes of a template literal or
    /// JSX element.
    fn collect_embedded(&mut self, token: &Token<'s>, edits: &mut Vec<Edit>) -> Result<()> {
        if !self.callees.iter().any(|callee| token.text.contains(callee.as_str())) {
            return Ok(());
        }
        let holes = embedded_expressions(self.source, token, self.dialect).map_err(|e| self.syntax(e))?;
        for hole in holes {
            let tree = SourceTree::parse_span(self.source, hole, self.dialect).map_err(|e| self.syntax(e))?;
            self.collect(tree.nodes(), Context::Expression, edits)?;
        }
        Ok(())
    }
}

impl<'s> Substitute<'s> for CallResolver<'_, 's> {
    type Error = SpecializeError;

    fn substitute(
        &mut self,
        siblings: &[Node<'s>],
        index: usize,
        indent: Indent<'_>,
        context: Context,
    ) -> Result<Option<Substitution>> {
        let Some(call) = self.match_call(siblings, index)? else {
            return Ok(None);
        };
        let text = self.resolve(&call, siblings, index, context, indent)?;
        Ok(Some(Substitution {
            consumed: call.consumed,
            text,
        }))
    }

    fn rewrite_token(&mut self, token: &Token<'s>, _indent: Indent<'_>) -> Result<Option<String>> {
        let mut edits = Vec::new();
        self.collect_embedded(token, &mut edits)?;
        if edits.is_empty() {
            return Ok(None);
        }
        let base = token.span.start;
        let rebased = edits
            .into_iter()
            .map(|edit| {
                let span = Span::new(edit.span.start - base, edit.span.end - base);
                Edit::replace(span, edit.replacement)
            })
            .collect();
        Ok(Some(apply_edits(token.text, rebased)))
    }
}

/// Punctuators that cannot appear in a type-argument list, so a `<` followed
/// by one of them before its `>` is a comparison.
const NOT_IN_TYPE_ARGUMENTS: &[&str] = &[
    ";", "&&", "||", "??", "==", "===", "!=", "!==", "=", "<=", "+", "-", "/", "%",
];

/// Index of the `>` closing the type-argument list opened at `open`.
fn closing_angle(siblings: &[Node<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, node) in siblings.iter().enumerate().skip(open) {
        let Some(token) = node.as_leaf() else {
            continue;
        };
        if token.kind != TokenKind::Punct {
            continue;
        }
        match token.text {
            "<" => depth += 1,
            ">" => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            text if NOT_IN_TYPE_ARGUMENTS.contains(&text) => return None,
            _ => {}
        }
    }
    None
}

fn single_object_argument<'a, 's>(arguments: &'a Group<'s>) -> Option<&'a Group<'s>> {
    let mut segments = split_top_level(&arguments.children, ",");
    if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    match segments.as_slice() {
        [[node]] => node.as_delimited(Delim::Brace),
        _ => None,
    }
}

/// Keywords that turn the identifier-led chain after them into something
/// other than a primary expression.
const OPERATOR_KEYWORDS: &[&str] = &[
    "new", "typeof", "void", "delete", "await", "yield", "async", "function", "class", "in",
    "instanceof",
];

/// Whether `nodes` print as one operand: a literal, a bracketed group, or an
/// identifier followed by member accesses, calls, indexing and tagged
/// templates.
fn is_atomic(nodes: &[Node<'_>], next: Option<&Node<'_>>) -> bool {
    match nodes {
        [Node::Leaf(token)] => token.kind != TokenKind::Number || !next.is_some_and(|n| n.is_punct(".")),
        [Node::Group(group)] => group.delim != Delim::Brace,
        [Node::Leaf(first), rest @ ..] => {
            if first.kind != TokenKind::Ident || OPERATOR_KEYWORDS.contains(&first.text) {
                return false;
            }
            let mut i = 0;
            while i < rest.len() {
                let node = &rest[i];
                if node.is_punct(".") || node.is_punct("?.") {
                    if !rest.get(i + 1).is_some_and(|n| n.is_kind(TokenKind::Ident)) {
                        return false;
                    }
                    i += 2;
                } else if node.as_delimited(Delim::Paren).is_some()
                    || node.as_delimited(Delim::Bracket).is_some()
                    || node.is_kind(TokenKind::Template)
                {
                    i += 1;
                } else {
                    return false;
                }
            }
            true
        }
        _ => false,
    }
}

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", "&=", "|=", "^=", "&&=", "||=", "??=",
];

fn is_safe_before(siblings: &[Node<'_>], index: usize) -> bool {
    let Some(prev) = index.checked_sub(1).map(|i| &siblings[i]) else {
        return true;
    };
    if prev.as_delimited(Delim::Brace).is_some() {
        return true;
    }
    let Some(token) = prev.as_leaf() else {
        return false;
    };
    match token.kind {
        TokenKind::Ident => matches!(token.text, "return" | "throw" | "case"),
        TokenKind::Punct if token.text == "=" => {
            // `>=`, `>>=` and `>>>=` are lexed with a separate `>`.
            let glued_to_angle = index >= 2
                && siblings[index - 2].is_punct(">")
                && token.spacing == Spacing::None;
            !glued_to_angle
        }
        TokenKind::Punct => {
            matches!(token.text, "," | ";" | "=>" | "?" | ":" | "...")
                || ASSIGNMENT_OPERATORS.contains(&token.text)
        }
        _ => false,
    }
}

fn is_safe_after(next: Option<&Node<'_>>) -> bool {
    next.map_or(true, |n| n.is_punct(";") || n.is_punct(",") || n.is_punct(":"))
}

/// Whether the substituted value needs parentheses to keep its meaning in
/// the place of the call at `siblings[index]`.
fn needs_parens(
    value: &PropertyValue<'_, '_>,
    siblings: &[Node<'_>],
    index: usize,
    consumed: usize,
    context: Context,
) -> bool {
    let prev = index.checked_sub(1).map(|i| &siblings[i]);
    let next = siblings.get(index + consumed);
    let statement_start = match prev {
        None => context == Context::Statements,
        Some(node) => {
            node.is_punct(";")
                || (context == Context::Statements && node.as_delimited(Delim::Brace).is_some())
        }
    };

    let nodes = match value {
        PropertyValue::Method { .. } => return statement_start,
        PropertyValue::Expression(nodes) => *nodes,
    };
    let starts_with_object = nodes
        .first()
        .is_some_and(|n| n.as_delimited(Delim::Brace).is_some());
    if starts_with_object {
        return statement_start || prev.is_some_and(|n| n.is_punct("=>"));
    }
    let starts_with_declaration_keyword = match nodes {
        [first, ..] if first.is_ident("function") || first.is_ident("class") => true,
        [first, second, ..] => first.is_ident("async") && second.is_ident("function"),
        _ => false,
    };
    if starts_with_declaration_keyword {
        return statement_start;
    }
    if is_atomic(nodes, next) {
        return false;
    }
    !(is_safe_before(siblings, index) && is_safe_after(next))
}
