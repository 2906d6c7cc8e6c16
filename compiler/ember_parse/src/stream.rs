//! Cursor over one level of the token tree, plus the parser's combinators.
//!
//! A [`Stream`] only ever sees the nodes of a single level; entering a
//! bracket group creates a child stream over its contents with
//! [`Stream::sub`]. Both share the caller's [`Issues`] sink, so diagnostics
//! from any depth land in one place.

use crate::recovery::TokenSet;
use ember_diagnostic::{Code, Issues};
use ember_ir::ast::Ident;
use ember_ir::{Name, Span, StringInterner, Token, TokenGroup, TokenKind, TokenNode};

/// Source text and interner shared by every stream of one parse.
#[derive(Copy, Clone)]
pub struct Src<'t> {
    pub text: &'t str,
    pub interner: &'t StringInterner,
}

pub struct Stream<'t, 'i> {
    nodes: &'t [TokenNode],
    pos: usize,
    /// Zero-width span where this level ends.
    end: Span,
    /// Span of the last consumed node.
    last: Span,
    src: Src<'t>,
    issues: &'i mut Issues,
}

/// Output of [`Stream::comma_list`].
pub struct CommaList<T> {
    pub items: Vec<T>,
    /// A trailing `..` terminator was present.
    pub rest: bool,
}

impl<'t, 'i> Stream<'t, 'i> {
    pub fn new(nodes: &'t [TokenNode], end: Span, src: Src<'t>, issues: &'i mut Issues) -> Self {
        Stream {
            nodes,
            pos: 0,
            end,
            last: Span::point(end.chunk, nodes.first().map_or(end.start, |n| n.span().start)),
            src,
            issues,
        }
    }

    /// Child stream over a group's contents, ending at its closer.
    pub fn sub<'s>(&'s mut self, group: &'t TokenGroup) -> Stream<'t, 's> {
        Stream {
            nodes: &group.contents,
            pos: 0,
            end: Span::point(group.close.span.chunk, group.close.span.start),
            last: group.open.span,
            src: self.src,
            issues: &mut *self.issues,
        }
    }

    // === Lookahead ===

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.nodes.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<&'t TokenNode> {
        self.nodes.get(self.pos)
    }

    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&'t TokenNode> {
        self.nodes.get(self.pos + n)
    }

    /// Kind of the next plain token; `None` at the end or before a group.
    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        match self.peek()? {
            TokenNode::Token(token) => Some(token.kind),
            TokenNode::Group(_) => None,
        }
    }

    /// Kind of the next node, counting a group as its opener.
    #[inline]
    pub fn peek_any_kind(&self) -> Option<TokenKind> {
        self.peek().map(TokenNode::kind)
    }

    #[inline]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Next node is a group opened by `open`.
    #[inline]
    pub fn at_group(&self, open: TokenKind) -> bool {
        matches!(self.peek(), Some(TokenNode::Group(g)) if g.open.kind == open)
    }

    #[inline]
    pub fn at_set(&self, set: TokenSet) -> bool {
        self.peek_any_kind().is_some_and(|kind| set.contains(kind))
    }

    /// Zero-width span at the next node, or at the end of this level.
    pub fn here(&self) -> Span {
        match self.peek() {
            Some(node) => {
                let span = node.span();
                Span::point(span.chunk, span.start)
            }
            None => self.end,
        }
    }

    /// Span of the last consumed node.
    #[inline]
    pub fn last(&self) -> Span {
        self.last
    }

    /// From `start` through the last consumed node.
    #[inline]
    pub fn span_from(&self, start: Span) -> Span {
        start.merge(self.last)
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    // === Consumption ===

    pub fn next(&mut self) -> Option<&'t TokenNode> {
        let node = self.nodes.get(self.pos)?;
        self.pos += 1;
        self.last = node.span();
        Some(node)
    }

    /// Consume the next token if it is a plain `kind` token.
    pub fn match_(&mut self, kind: TokenKind) -> Option<Token> {
        match self.peek() {
            Some(TokenNode::Token(token)) if token.kind == kind => {
                self.next();
                Some(*token)
            }
            _ => None,
        }
    }

    /// Consume the next token if its kind is any of `kinds`.
    pub fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        match self.peek() {
            Some(TokenNode::Token(token)) if kinds.contains(&token.kind) => {
                self.next();
                Some(*token)
            }
            _ => None,
        }
    }

    /// Consume a `kind` token or raise `code` and return a virtual one in
    /// its place, so callers always get a token.
    pub fn match_or(&mut self, kind: TokenKind, code: Code) -> Token {
        if let Some(token) = self.match_(kind) {
            return token;
        }
        let here = self.here();
        self.raise(code, here);
        Token::virtual_at(kind, here)
    }

    /// Consume the next node if it is a group opened by `open`.
    pub fn match_group(&mut self, open: TokenKind) -> Option<&'t TokenGroup> {
        match self.peek() {
            Some(TokenNode::Group(group)) if group.open.kind == open => {
                self.next();
                Some(group)
            }
            _ => None,
        }
    }

    /// Skip nodes until one whose kind is in `set` (not consumed) or the end.
    pub fn skip_until(&mut self, set: TokenSet) {
        while !self.at_end() && !self.at_set(set) {
            self.next();
        }
    }

    /// Report the first leftover node, if any, and skip the rest.
    pub fn finish(&mut self) {
        if let Some(node) = self.peek() {
            let span = node.span();
            self.raise(Code::UnexpectedToken, span);
            self.pos = self.nodes.len();
        }
    }

    // === Text and diagnostics ===

    #[inline]
    pub fn raise(&mut self, code: Code, span: Span) {
        self.issues.raise(code, span);
    }

    #[inline]
    pub fn text(&self, span: Span) -> &'t str {
        self.src.text.get(span.to_range()).unwrap_or("")
    }

    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.src.interner.intern(text)
    }

    /// Identifier named by a token, dropping `prefix_len` sigil bytes.
    pub fn ident_of(&self, token: Token, prefix_len: u32) -> Ident {
        let span = Span::new(
            token.span.chunk,
            (token.span.start + prefix_len).min(token.span.end),
            token.span.end,
        );
        Ident::new(self.intern(self.text(span)), span)
    }

    /// Consume an identifier, or raise `code` and return an empty one.
    /// Reserved keywords are accepted as identifiers after reporting them.
    pub fn ident_or(&mut self, code: Code) -> Ident {
        if let Some(token) = self.match_(TokenKind::Ident) {
            return self.ident_of(token, 0);
        }
        if let Some(TokenNode::Token(token)) = self.peek() {
            if token.kind.is_reserved() {
                let token = *token;
                self.next();
                self.raise(Code::ReservedKeyword, token.span);
                return self.ident_of(token, 0);
            }
        }
        let here = self.here();
        self.raise(code, here);
        Ident::new(Name::EMPTY, here)
    }

    // === Combinators ===

    /// Parse `open item, item, ... terminator? close` from `group`.
    ///
    /// A trailing comma is fine. When `rest` is true a final `..` is
    /// accepted as a terminator; elsewhere `..` raises `RestNotAllowed`.
    /// `empty` is raised for a list with no items (and no terminator).
    /// After a malformed item the list resynchronises at the next comma.
    pub fn comma_list<T>(
        &mut self,
        group: &'t TokenGroup,
        empty: Option<Code>,
        rest: bool,
        mut item: impl FnMut(&mut Stream<'t, '_>) -> T,
    ) -> CommaList<T> {
        let mut sub = self.sub(group);
        let mut list = CommaList {
            items: Vec::new(),
            rest: false,
        };
        while !sub.at_end() {
            if let Some(dots) = sub.match_(TokenKind::DotDot) {
                if rest {
                    list.rest = true;
                    sub.match_(TokenKind::Comma);
                    sub.finish();
                    break;
                }
                sub.raise(Code::RestNotAllowed, dots.span);
                sub.match_(TokenKind::Comma);
                continue;
            }
            let before = sub.position();
            list.items.push(item(&mut sub));
            if sub.at_end() || sub.match_(TokenKind::Comma).is_some() {
                continue;
            }
            if sub.position() != before {
                let here = sub.here();
                sub.raise(Code::ExpectedComma, here);
            }
            sub.skip_until(TokenSet::new().with(TokenKind::Comma));
            sub.match_(TokenKind::Comma);
        }
        if let Some(code) = empty {
            if list.items.is_empty() && !list.rest {
                let at = sub.here();
                sub.raise(code, at);
            }
        }
        list
    }
}

#[cfg(test)]
mod tests;
