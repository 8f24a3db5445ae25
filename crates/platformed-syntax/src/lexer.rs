//! Tokenizer for JavaScript and TypeScript sources, with optional JSX.
//!
//! The lexer produces a flat stream of tokens carrying byte spans. Comments
//! are dropped, but the whitespace they stood for is recorded on the next
//! token as [`Spacing`] so that printing never glues two statements together.
//! Template literals, regular expressions and JSX elements are scanned whole
//! and surface as single opaque tokens; [`embedded_expressions`] recovers the
//! expression holes inside them.

use crate::error::{Position, Result, SyntaxError};
use crate::span::Span;

/// Grammar extensions enabled on top of plain JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Accept TypeScript type-argument lists on calls and `import type`.
    pub typescript: bool,
    /// Scan `<Tag ...>` in operand position as a JSX element.
    pub jsx: bool,
}

impl Dialect {
    pub const fn javascript() -> Self {
        Self {
            typescript: false,
            jsx: false,
        }
    }

    pub const fn typescript_jsx() -> Self {
        Self {
            typescript: true,
            jsx: true,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::typescript_jsx()
    }
}

/// Bracket pairs that nest in the token tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    Paren,
    Bracket,
    Brace,
}

impl Delim {
    pub fn open_char(self) -> char {
        match self {
            Delim::Paren => '(',
            Delim::Bracket => '[',
            Delim::Brace => '{',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delim::Paren => ')',
            Delim::Bracket => ']',
            Delim::Brace => '}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers, keywords and `#private` names.
    Ident,
    String,
    Number,
    /// A whole template literal, substitutions included.
    Template,
    Regex,
    /// A whole JSX element or fragment.
    Jsx,
    Punct,
    Open(Delim),
    Close(Delim),
}

/// Whitespace (comments included) preceding a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Spacing {
    #[default]
    None,
    Space,
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    pub span: Span,
    pub spacing: Spacing,
}

impl Token<'_> {
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    /// Whether this token can contain `${...}` or `{...}` expression holes.
    pub fn has_embedded_expressions(&self) -> bool {
        matches!(self.kind, TokenKind::Template | TokenKind::Jsx)
    }
}

/// Multi-character punctuators, longest first. `>` is always scanned on its
/// own so that nested type arguments such as `A<B<C>>` close one at a time.
const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", "**=", "<<=", "&&=", "||=", "??=", "=>", "==", "!=", "<=", "<<", "&&",
    "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**",
];

/// Keywords after which `/` and `<` begin an operand instead of an operator.
const OPERAND_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Tokenize a whole source text.
pub fn tokenize<'s>(source: &'s str, dialect: &Dialect) -> Result<Vec<Token<'s>>> {
    tokenize_span(source, Span::new(0, source.len()), dialect)
}

/// Tokenize the `span` region of `source`. Token spans stay relative to the
/// whole of `source`.
pub fn tokenize_span<'s>(source: &'s str, span: Span, dialect: &Dialect) -> Result<Vec<Token<'s>>> {
    let mut lexer = Lexer::new(source, span, *dialect);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Spans of the expression holes directly inside `token`: the `${...}`
/// substitutions of a template literal or the `{...}` containers of a JSX
/// element. Holes nested inside those holes are not listed.
pub fn embedded_expressions(source: &str, token: &Token<'_>, dialect: &Dialect) -> Result<Vec<Span>> {
    let mut lexer = Lexer::new(source, token.span, *dialect);
    match token.kind {
        TokenKind::Template => lexer.scan_template()?,
        TokenKind::Jsx => lexer.scan_jsx_element()?,
        _ => return Ok(Vec::new()),
    }
    Ok(lexer.holes)
}

fn is_ident_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch == '#' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '$' || ch == '_' || ch == '\u{200c}' || ch == '\u{200d}' || ch.is_alphanumeric()
}

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    end: usize,
    dialect: Dialect,
    prev: Option<(TokenKind, &'s str)>,
    /// Outermost expression holes seen so far.
    holes: Vec<Span>,
    hole_depth: usize,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str, span: Span, dialect: Dialect) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: span.start,
            end: span.end.min(source.len()),
            dialect,
            prev: None,
            holes: Vec::new(),
            hole_depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        let index = self.pos + n;
        (index < self.end).then(|| self.bytes[index])
    }

    fn current_char(&self) -> Option<char> {
        if self.pos < self.end {
            self.source[self.pos..self.end].chars().next()
        } else {
            None
        }
    }

    fn position(&self, offset: usize) -> Position {
        Position::of(self.source, offset)
    }

    fn next_token(&mut self) -> Result<Option<Token<'s>>> {
        let spacing = self.skip_trivia()?;
        if self.pos >= self.end {
            return Ok(None);
        }
        let start = self.pos;
        let kind = self.scan_token()?;
        let text = &self.source[start..self.pos];
        self.prev = Some((kind, text));
        Ok(Some(Token {
            kind,
            text,
            span: Span::new(start, self.pos),
            spacing,
        }))
    }

    fn skip_trivia(&mut self) -> Result<Spacing> {
        let mut spacing = Spacing::None;
        if self.pos == 0 && self.source.starts_with("#!") {
            self.skip_line();
            spacing = Spacing::Space;
        }
        while let Some(byte) = self.peek() {
            match byte {
                b'\n' => {
                    spacing = Spacing::Newline;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    spacing = spacing.max(Spacing::Space);
                    self.pos += 1;
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    self.skip_line();
                    spacing = spacing.max(Spacing::Space);
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let Some(close) = self.source[start + 2..self.end].find("*/") else {
                        return Err(SyntaxError::UnterminatedComment {
                            at: self.position(start),
                        });
                    };
                    let comment_end = start + 2 + close + 2;
                    let multiline = self.source[start..comment_end].contains('\n');
                    spacing = spacing.max(if multiline {
                        Spacing::Newline
                    } else {
                        Spacing::Space
                    });
                    self.pos = comment_end;
                }
                0x80..=0xff => {
                    let Some(ch) = self.current_char() else { break };
                    if !ch.is_whitespace() {
                        break;
                    }
                    let line_break = matches!(ch, '\u{2028}' | '\u{2029}');
                    spacing = spacing.max(if line_break {
                        Spacing::Newline
                    } else {
                        Spacing::Space
                    });
                    self.pos += ch.len_utf8();
                }
                _ => break,
            }
        }
        Ok(spacing)
    }

    fn skip_line(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn scan_token(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let ch = self.current_char().unwrap_or('\0');
        let kind = match ch {
            '(' | ')' | '[' | ']' | '{' | '}' => {
                self.pos += 1;
                match ch {
                    '(' => TokenKind::Open(Delim::Paren),
                    ')' => TokenKind::Close(Delim::Paren),
                    '[' => TokenKind::Open(Delim::Bracket),
                    ']' => TokenKind::Close(Delim::Bracket),
                    '{' => TokenKind::Open(Delim::Brace),
                    _ => TokenKind::Close(Delim::Brace),
                }
            }
            '\'' | '"' => {
                self.scan_string(ch as u8)?;
                TokenKind::String
            }
            '`' => {
                self.scan_template()?;
                TokenKind::Template
            }
            '0'..='9' => {
                self.scan_number();
                TokenKind::Number
            }
            '.' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.scan_number();
                TokenKind::Number
            }
            '/' if self.operand_expected() => {
                if self.scan_regex().is_ok() {
                    TokenKind::Regex
                } else {
                    self.pos = start;
                    self.scan_punct();
                    TokenKind::Punct
                }
            }
            '<' if self.dialect.jsx && self.operand_expected() && self.jsx_ahead() => {
                let prev = self.prev;
                let holes = self.holes.len();
                match self.scan_jsx_element() {
                    Ok(()) => TokenKind::Jsx,
                    Err(_) => {
                        // Type parameters and assertions such as `<T,>(x) => x`.
                        self.pos = start;
                        self.prev = prev;
                        self.holes.truncate(holes);
                        self.scan_punct();
                        TokenKind::Punct
                    }
                }
            }
            c if is_ident_start(c) => {
                self.scan_ident(c);
                TokenKind::Ident
            }
            _ => {
                self.scan_punct();
                TokenKind::Punct
            }
        };
        Ok(kind)
    }

    /// Whether the previous token leaves us expecting an operand, which is
    /// what separates `/re/` from division and `<Tag>` from less-than.
    fn operand_expected(&self) -> bool {
        let Some((kind, text)) = self.prev else {
            return true;
        };
        match kind {
            TokenKind::Ident => OPERAND_KEYWORDS.contains(&text),
            TokenKind::Punct => !matches!(text, "++" | "--"),
            TokenKind::Open(_) | TokenKind::Close(Delim::Brace) => true,
            TokenKind::Close(_)
            | TokenKind::String
            | TokenKind::Number
            | TokenKind::Template
            | TokenKind::Regex
            | TokenKind::Jsx => false,
        }
    }

    fn scan_string(&mut self, quote: u8) -> Result<()> {
        let start = self.pos;
        self.pos += 1;
        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => {
                    let crlf = self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n');
                    self.pos += if crlf { 3 } else { 2 };
                }
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(SyntaxError::UnterminatedString {
            at: self.position(start),
        })
    }

    fn scan_template(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 1;
        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'$' if self.peek_at(1) == Some(b'{') => {
                    let open = self.pos + 1;
                    self.pos += 2;
                    self.skip_braced_expression(open)?;
                }
                _ => self.pos += 1,
            }
        }
        Err(SyntaxError::UnterminatedTemplate {
            at: self.position(start),
        })
    }

    /// Skip an expression hole whose `{` at `open` has already been consumed.
    fn skip_braced_expression(&mut self, open: usize) -> Result<()> {
        let outermost = self.hole_depth == 0;
        let saved = self.prev.take();
        self.hole_depth += 1;
        let result = self.skip_to_matching_brace(open);
        self.hole_depth -= 1;
        self.prev = saved;
        let close = result?;
        if outermost {
            self.holes.push(Span::new(open + 1, close));
        }
        Ok(())
    }

    /// Consume tokens up to and including the `}` matching `open`, returning
    /// the offset of that `}`.
    fn skip_to_matching_brace(&mut self, open: usize) -> Result<usize> {
        let mut depth = 0usize;
        while let Some(token) = self.next_token()? {
            match token.kind {
                TokenKind::Open(Delim::Brace) => depth += 1,
                TokenKind::Close(Delim::Brace) if depth == 0 => return Ok(token.span.start),
                TokenKind::Close(Delim::Brace) => depth -= 1,
                _ => {}
            }
        }
        Err(SyntaxError::Unclosed {
            open: '{',
            at: self.position(open),
        })
    }

    fn scan_number(&mut self) {
        let radix_prefixed = self.peek() == Some(b'0')
            && matches!(
                self.peek_at(1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            );
        let mut seen_dot = false;
        let mut prev = 0u8;
        while let Some(byte) = self.peek() {
            let accept = match byte {
                b'.' if !seen_dot && !radix_prefixed => {
                    seen_dot = true;
                    true
                }
                b'+' | b'-' => !radix_prefixed && matches!(prev, b'e' | b'E'),
                b => b.is_ascii_alphanumeric() || b == b'_',
            };
            if !accept {
                break;
            }
            prev = byte;
            self.pos += 1;
        }
    }

    fn scan_regex(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(SyntaxError::UnterminatedRegex {
                        at: self.position(start),
                    })
                }
                Some(b'\\') => self.pos += 2,
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        while self.peek().is_some_and(|b| b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        Ok(())
    }

    fn scan_ident(&mut self, first: char) {
        self.pos += first.len_utf8();
        while let Some(ch) = self.current_char() {
            if !is_ident_continue(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_punct(&mut self) {
        let rest = &self.source[self.pos..self.end];
        for punct in PUNCTUATORS {
            if rest.starts_with(punct) {
                // `a?.5:b` is a conditional, not optional chaining.
                if *punct == "?." && rest.as_bytes().get(2).is_some_and(u8::is_ascii_digit) {
                    continue;
                }
                self.pos += punct.len();
                return;
            }
        }
        self.pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
    }

    fn jsx_ahead(&self) -> bool {
        matches!(self.peek_at(1), Some(b) if b == b'>' || b == b'_' || b == b'$' || b.is_ascii_alphabetic())
    }

    fn invalid_jsx(&self, element: usize) -> SyntaxError {
        SyntaxError::InvalidJsx {
            at: self.position(element),
        }
    }

    fn skip_jsx_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn scan_jsx_name(&mut self) -> &'s str {
        let start = self.pos;
        if self
            .peek()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_' || b == b'$')
        {
            while self.peek().is_some_and(|b| {
                b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b':' | b'-')
            }) {
                self.pos += 1;
            }
        }
        &self.source[start..self.pos]
    }

    fn scan_jsx_element(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 1;
        self.skip_jsx_whitespace();
        if self.peek() == Some(b'>') {
            self.pos += 1;
            return self.scan_jsx_children("", start);
        }
        let name = self.scan_jsx_name();
        if name.is_empty() {
            return Err(self.invalid_jsx(start));
        }
        loop {
            self.skip_jsx_whitespace();
            match self.peek() {
                None => return Err(self.invalid_jsx(start)),
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some(b'>') => {
                    self.pos += 1;
                    return self.scan_jsx_children(name, start);
                }
                Some(b'{') => {
                    let open = self.pos;
                    self.pos += 1;
                    self.skip_braced_expression(open)?;
                }
                Some(_) => {
                    if self.scan_jsx_name().is_empty() {
                        return Err(self.invalid_jsx(start));
                    }
                    self.skip_jsx_whitespace();
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.skip_jsx_whitespace();
                        self.scan_jsx_attribute_value(start)?;
                    }
                }
            }
        }
    }

    fn scan_jsx_attribute_value(&mut self, element: usize) -> Result<()> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                while let Some(byte) = self.peek() {
                    self.pos += 1;
                    if byte == quote {
                        return Ok(());
                    }
                }
                Err(self.invalid_jsx(element))
            }
            Some(b'{') => {
                let open = self.pos;
                self.pos += 1;
                self.skip_braced_expression(open)
            }
            Some(b'<') => self.scan_jsx_element(),
            _ => Err(self.invalid_jsx(element)),
        }
    }

    fn scan_jsx_children(&mut self, name: &str, element: usize) -> Result<()> {
        loop {
            match self.peek() {
                None => return Err(self.invalid_jsx(element)),
                Some(b'<') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    self.skip_jsx_whitespace();
                    let closing = self.scan_jsx_name();
                    self.skip_jsx_whitespace();
                    if closing != name || self.peek() != Some(b'>') {
                        return Err(self.invalid_jsx(element));
                    }
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'<') => self.scan_jsx_element()?,
                Some(b'{') => {
                    let open = self.pos;
                    self.pos += 1;
                    self.skip_braced_expression(open)?;
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src, &Dialect::default())
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn tokenize_simple_declaration() {
        let tokens = kinds("const a = platformed({ ios: 'x' });");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Ident, "const"),
                (TokenKind::Ident, "a"),
                (TokenKind::Punct, "="),
                (TokenKind::Ident, "platformed"),
                (TokenKind::Open(Delim::Paren), "("),
                (TokenKind::Open(Delim::Brace), "{"),
                (TokenKind::Ident, "ios"),
                (TokenKind::Punct, ":"),
                (TokenKind::String, "'x'"),
                (TokenKind::Close(Delim::Brace), "}"),
                (TokenKind::Close(Delim::Paren), ")"),
                (TokenKind::Punct, ";"),
            ]
        );
    }

    #[test]
    fn comments_become_spacing() {
        let tokens = tokenize("a/* x */b // tail\nc/*\n*/d", &Dialect::default()).unwrap();
        let spacing: Vec<_> = tokens.iter().map(|t| (t.text, t.spacing)).collect();
        assert_eq!(
            spacing,
            vec![
                ("a", Spacing::None),
                ("b", Spacing::Space),
                ("c", Spacing::Newline),
                ("d", Spacing::Newline),
            ]
        );
    }

    #[test]
    fn commented_call_produces_no_tokens() {
        assert!(kinds("// platformed({ fake: true })").is_empty());
    }

    #[test]
    fn regex_versus_division() {
        assert_eq!(
            kinds("x = /a[/]b/g.test(s)")[2],
            (TokenKind::Regex, "/a[/]b/g")
        );
        let division = kinds("a / b / c");
        assert_eq!(division[1], (TokenKind::Punct, "/"));
        assert_eq!(division[3], (TokenKind::Punct, "/"));
    }

    #[test]
    fn template_with_nested_braces_is_one_token() {
        let tokens = kinds("`a ${ { b: `c${d}` }.b } e` + 1");
        assert_eq!(tokens[0].0, TokenKind::Template);
        assert_eq!(tokens[1], (TokenKind::Punct, "+"));
    }

    #[test]
    fn jsx_element_is_one_token() {
        let src = "const el = <View style={{ a: 1 }}>Don't {x > 1 ? <A /> : null}</View>;";
        let tokens = kinds(src);
        assert_eq!(tokens[3].0, TokenKind::Jsx);
        assert!(tokens[3].1.ends_with("</View>"));
        assert_eq!(tokens[4], (TokenKind::Punct, ";"));
    }

    #[test]
    fn jsx_fragment() {
        let tokens = kinds("return <>text</>;");
        assert_eq!(tokens[1], (TokenKind::Jsx, "<>text</>"));
    }

    #[test]
    fn generic_arrow_falls_back_to_punct() {
        let tokens = kinds("const f = <T,>(x: T) => x;");
        assert_eq!(tokens[3], (TokenKind::Punct, "<"));
        assert_eq!(tokens[4], (TokenKind::Ident, "T"));
    }

    #[test]
    fn jsx_disabled_reads_less_than() {
        let tokens: Vec<_> = tokenize("x = <A />", &Dialect::javascript())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(tokens[2], TokenKind::Punct);
    }

    #[test]
    fn nested_type_arguments_close_separately() {
        let tokens = kinds("f<A<B>>(x)");
        assert_eq!(tokens[5], (TokenKind::Punct, ">"));
        assert_eq!(tokens[6], (TokenKind::Punct, ">"));
    }

    #[test]
    fn optional_chaining_versus_conditional() {
        assert_eq!(kinds("a?.b")[1], (TokenKind::Punct, "?."));
        assert_eq!(kinds("a?.5:1")[1], (TokenKind::Punct, "?"));
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("1.5e-3")[0], (TokenKind::Number, "1.5e-3"));
        assert_eq!(kinds("0xFF_FF")[0], (TokenKind::Number, "0xFF_FF"));
        assert_eq!(kinds(".5")[0], (TokenKind::Number, ".5"));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("const a = 'oops\n';", &Dialect::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::UnterminatedString { .. }));
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let err = tokenize("a /* b", &Dialect::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::UnterminatedComment { .. }));
    }

    #[test]
    fn tokenize_span_keeps_absolute_offsets() {
        let src = "xx(a + b)yy";
        let tokens = tokenize_span(src, Span::new(3, 8), &Dialect::default()).unwrap();
        assert_eq!(tokens[0].span, Span::new(3, 4));
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn embedded_expressions_of_template_and_jsx() {
        let src = "`a${x}b${ {y: `${z}`} }`";
        let tokens = tokenize(src, &Dialect::default()).unwrap();
        let holes = embedded_expressions(src, &tokens[0], &Dialect::default()).unwrap();
        let texts: Vec<_> = holes.iter().map(|s| s.slice(src)).collect();
        assert_eq!(texts, vec!["x", " {y: `${z}`} "]);

        let src = "<A b={1}>{c}<B>{d}</B></A>";
        let tokens = tokenize(src, &Dialect::default()).unwrap();
        let holes = embedded_expressions(src, &tokens[0], &Dialect::default()).unwrap();
        let texts: Vec<_> = holes.iter().map(|s| s.slice(src)).collect();
        assert_eq!(texts, vec!["1", "c", "d"]);
    }

    #[test]
    fn hashbang_is_skipped() {
        assert_eq!(kinds("#!/usr/bin/env node\nx")[0], (TokenKind::Ident, "x"));
    }
}
