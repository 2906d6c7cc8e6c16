//! The lexer's output: tokens nested by bracket pairs.

use crate::{SourceMap, Span, Token, TokenKind};
use std::fmt::Write;

/// One element of a token level: a single token or a bracketed group.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TokenNode {
    Token(Token),
    Group(TokenGroup),
}

/// A bracket pair and everything between.
///
/// `close` is a zero-width virtual token when the source never closed the
/// group; the lexer reports that as `MismatchedOpeningParen`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenGroup {
    pub open: Token,
    pub close: Token,
    pub contents: Vec<TokenNode>,
}

/// Root level of a lexed chunk.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenTree {
    pub nodes: Vec<TokenNode>,
    /// Zero-width span at end of input, the anchor for "expected X" issues
    /// at the root level.
    pub end: Span,
}

impl TokenNode {
    /// Kind of the token, or of the group's opener.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.first_token().kind
    }

    /// The token itself, or the group's opener.
    #[inline]
    pub fn first_token(&self) -> Token {
        match self {
            TokenNode::Token(token) => *token,
            TokenNode::Group(group) => group.open,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TokenNode::Token(token) => token.span,
            TokenNode::Group(group) => group.span(),
        }
    }

    #[inline]
    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            TokenNode::Group(group) => Some(group),
            TokenNode::Token(_) => None,
        }
    }
}

impl TokenGroup {
    #[inline]
    pub fn span(&self) -> Span {
        self.open.span.merge(self.close.span)
    }

    /// Closed by the right kind of bracket actually present in the source.
    pub fn is_balanced(&self) -> bool {
        !self.close.is_virtual() && self.open.kind.closing() == Some(self.close.kind)
    }

    /// Span strictly between the brackets.
    pub fn inner_span(&self) -> Span {
        Span::new(
            self.open.span.chunk,
            self.open.span.end,
            self.close.span.start.max(self.open.span.end),
        )
    }
}

impl TokenTree {
    /// Visit every token, groups contributing opener then contents then closer.
    pub fn for_each_token(&self, mut f: impl FnMut(Token)) {
        fn walk(nodes: &[TokenNode], f: &mut impl FnMut(Token)) {
            for node in nodes {
                match node {
                    TokenNode::Token(token) => f(*token),
                    TokenNode::Group(group) => {
                        f(group.open);
                        walk(&group.contents, f);
                        f(group.close);
                    }
                }
            }
        }
        walk(&self.nodes, &mut f);
    }

    /// Indented listing of the tree, one token per line.
    pub fn dump(&self, sources: &SourceMap) -> String {
        fn line(out: &mut String, depth: usize, token: Token, sources: &SourceMap) {
            let text = sources.slice(token.span);
            let _ = write!(out, "{:indent$}{:?} {:?}", "", token.kind, token.span, indent = depth * 2);
            if !text.is_empty() && !token.kind.is_open_bracket() && !token.kind.is_close_bracket() {
                let _ = write!(out, " {text:?}");
            }
            if token.is_virtual() {
                out.push_str(" (virtual)");
            }
            out.push('\n');
        }
        fn walk(out: &mut String, depth: usize, nodes: &[TokenNode], sources: &SourceMap) {
            for node in nodes {
                match node {
                    TokenNode::Token(token) => line(out, depth, *token, sources),
                    TokenNode::Group(group) => {
                        line(out, depth, group.open, sources);
                        walk(out, depth + 1, &group.contents, sources);
                        line(out, depth, group.close, sources);
                    }
                }
            }
        }
        let mut out = String::new();
        walk(&mut out, 0, &self.nodes, sources);
        out
    }
}

#[cfg(test)]
mod tests;
