#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ember_ir::{ChunkId, TokenTree};
use pretty_assertions::assert_eq;

const C: ChunkId = ChunkId::from_raw(0);

fn lexed(source: &str) -> TokenTree {
    let mut issues = Issues::new();
    let tree = ember_lexer::lex(source, C, &mut issues);
    assert!(issues.is_ok(), "{issues:?}");
    tree
}

fn with_stream<R>(source: &str, f: impl FnOnce(&mut Stream<'_, '_>) -> R) -> (R, Vec<Code>) {
    let tree = lexed(source);
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let src = Src {
        text: source,
        interner: &interner,
    };
    let mut stream = Stream::new(&tree.nodes, tree.end, src, &mut issues);
    let result = f(&mut stream);
    (result, issues.codes())
}

fn int_item(s: &mut Stream<'_, '_>) -> Option<u32> {
    s.match_(TokenKind::Int).map(|t| s.text(t.span).parse().unwrap())
}

#[test]
fn match_consumes_only_matching_token() {
    let ((a, b, c), codes) = with_stream("x ;", |s| {
        let a = s.match_(TokenKind::Semi).is_some();
        let b = s.match_any(&[TokenKind::Int, TokenKind::Ident]).is_some();
        let c = s.match_(TokenKind::Semi).is_some();
        (a, b, c)
    });
    assert_eq!((a, b, c), (false, true, true));
    assert!(codes.is_empty());
}

#[test]
fn match_or_synthesizes_virtual_token() {
    let (token, codes) = with_stream("x", |s| {
        s.next();
        s.match_or(TokenKind::Semi, Code::ExpectedSemicolon)
    });
    assert!(token.is_virtual());
    assert_eq!(token.kind, TokenKind::Semi);
    assert_eq!(token.span, Span::point(C, 1));
    assert_eq!(codes, vec![Code::ExpectedSemicolon]);
}

#[test]
fn match_does_not_enter_groups() {
    let (found, _) = with_stream("(a)", |s| {
        let plain = s.match_(TokenKind::LParen).is_some();
        let group = s.match_group(TokenKind::LParen).is_some();
        (plain, group)
    });
    assert_eq!(found, (false, true));
}

#[test]
fn comma_list_accepts_trailing_comma() {
    let (items, codes) = with_stream("(1, 2, 3,)", |s| {
        let group = s.match_group(TokenKind::LParen).unwrap();
        s.comma_list(group, None, false, int_item).items
    });
    assert_eq!(items, vec![Some(1), Some(2), Some(3)]);
    assert!(codes.is_empty());
}

#[test]
fn comma_list_rest_terminator() {
    let (list, codes) = with_stream("[1, ..]", |s| {
        let group = s.match_group(TokenKind::LBracket).unwrap();
        let list = s.comma_list(group, None, true, int_item);
        (list.items.len(), list.rest)
    });
    assert_eq!(list, (1, true));
    assert!(codes.is_empty());
}

#[test]
fn comma_list_rejects_rest_when_not_allowed() {
    let (count, codes) = with_stream("[1, .., 2]", |s| {
        let group = s.match_group(TokenKind::LBracket).unwrap();
        s.comma_list(group, None, false, int_item).items.len()
    });
    assert_eq!(count, 2);
    assert_eq!(codes, vec![Code::RestNotAllowed]);
}

#[test]
fn comma_list_reports_empty() {
    let (_, codes) = with_stream("<>", |s| {
        let group = s.match_group(TokenKind::LAngle);
        assert!(group.is_none());
    });
    assert!(codes.is_empty());

    let (_, codes) = with_stream("()", |s| {
        let group = s.match_group(TokenKind::LParen).unwrap();
        s.comma_list(group, Some(Code::EmptyTypeArgs), false, int_item);
    });
    assert_eq!(codes, vec![Code::EmptyTypeArgs]);
}

#[test]
fn comma_list_resyncs_at_comma() {
    let (items, codes) = with_stream("(1 x y, 2)", |s| {
        let group = s.match_group(TokenKind::LParen).unwrap();
        s.comma_list(group, None, false, int_item).items
    });
    assert_eq!(items, vec![Some(1), Some(2)]);
    assert_eq!(codes, vec![Code::ExpectedComma]);
}

#[test]
fn finish_reports_first_leftover() {
    let (at_end, codes) = with_stream("a b c", |s| {
        s.next();
        s.finish();
        s.at_end()
    });
    assert!(at_end);
    assert_eq!(codes, vec![Code::UnexpectedToken]);
}

#[test]
fn ident_or_accepts_reserved_keyword_with_issue() {
    let (name, codes) = with_stream("trait", |s| {
        let ident = s.ident_or(Code::ExpectedIdent);
        s.text(ident.span).to_owned()
    });
    assert_eq!(name, "trait");
    assert_eq!(codes, vec![Code::ReservedKeyword]);
}

#[test]
fn sub_stream_ends_at_closer() {
    let (here, _) = with_stream("(a)", |s| {
        let group = s.match_group(TokenKind::LParen).unwrap();
        let mut sub = s.sub(group);
        sub.next();
        sub.here()
    });
    assert_eq!(here, Span::point(C, 2));
}
