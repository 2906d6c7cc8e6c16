#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{ChunkId, TokenFlags};
use pretty_assertions::assert_eq;

const C: ChunkId = ChunkId::from_raw(0);

fn tok(kind: TokenKind, start: u32, end: u32) -> Token {
    Token::new(kind, Span::new(C, start, end))
}

fn sample() -> TokenTree {
    // f(a)
    TokenTree {
        nodes: vec![
            TokenNode::Token(tok(TokenKind::Ident, 0, 1)),
            TokenNode::Group(TokenGroup {
                open: tok(TokenKind::LParen, 1, 2).with_flags(TokenFlags::GLUED),
                close: tok(TokenKind::RParen, 3, 4),
                contents: vec![TokenNode::Token(tok(TokenKind::Ident, 2, 3))],
            }),
        ],
        end: Span::point(C, 4),
    }
}

#[test]
fn group_span_covers_brackets() {
    let tree = sample();
    let group = tree.nodes[1].as_group().unwrap();
    assert_eq!(group.span(), Span::new(C, 1, 4));
    assert_eq!(group.inner_span(), Span::new(C, 2, 3));
    assert!(group.is_balanced());
    assert_eq!(tree.nodes[1].kind(), TokenKind::LParen);
    assert!(tree.nodes[1].first_token().is_glued());
}

#[test]
fn virtual_close_is_unbalanced() {
    let group = TokenGroup {
        open: tok(TokenKind::LBracket, 0, 1),
        close: Token::virtual_at(TokenKind::RBracket, Span::point(C, 1)),
        contents: Vec::new(),
    };
    assert!(!group.is_balanced());
}

#[test]
fn for_each_token_visits_in_source_order() {
    let mut kinds = Vec::new();
    sample().for_each_token(|t| kinds.push(t.kind));
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen
        ]
    );
}

#[test]
fn dump_indents_group_contents() {
    let mut map = SourceMap::new();
    map.add("t", "f(a)");
    let dump = sample().dump(&map);
    assert_eq!(
        dump,
        "Ident 0..1 \"f\"\nLParen 1..2\n  Ident 2..3 \"a\"\nRParen 3..4\n"
    );
}
