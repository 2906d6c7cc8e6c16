#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn map_with(text: &str) -> (SourceMap, ChunkId) {
    let mut map = SourceMap::new();
    let id = map.add("main.ember", text);
    (map, id)
}

#[test]
fn line_col_is_one_based() {
    let (map, id) = map_with("let a = 1;\nlet b = 2;\n");
    let chunk = map.get(id).unwrap();
    assert_eq!(chunk.line_col(0), LineCol { line: 1, col: 1 });
    assert_eq!(chunk.line_col(4), LineCol { line: 1, col: 5 });
    assert_eq!(chunk.line_col(11), LineCol { line: 2, col: 1 });
    assert_eq!(chunk.line_col(15), LineCol { line: 2, col: 5 });
}

#[test]
fn line_col_clamps_past_end() {
    let (map, id) = map_with("ab");
    assert_eq!(
        map.get(id).unwrap().line_col(99),
        LineCol { line: 1, col: 3 }
    );
}

#[test]
fn line_text_strips_newline() {
    let (map, id) = map_with("first\r\nsecond\nthird");
    let chunk = map.get(id).unwrap();
    assert_eq!(chunk.line_count(), 3);
    assert_eq!(chunk.line_text(1), "first");
    assert_eq!(chunk.line_text(2), "second");
    assert_eq!(chunk.line_text(3), "third");
    assert_eq!(chunk.line_text(0), "");
    assert_eq!(chunk.line_text(4), "");
}

#[test]
fn slice_checks_chunk_identity() {
    let mut map = SourceMap::new();
    let a = map.add("a", "alpha");
    let b = map.add("b", "beta");
    assert_eq!(map.slice(Span::new(a, 0, 3)), "alp");
    assert_eq!(map.slice(Span::new(b, 1, 4)), "eta");
    assert_eq!(map.get(a).unwrap().slice(Span::new(b, 0, 2)), "");
    assert_eq!(map.slice(Span::VIRTUAL), "");
}

#[test]
fn location_formats_name_line_col() {
    let (map, id) = map_with("x\n  y");
    assert_eq!(map.location(Span::new(id, 4, 5)).as_deref(), Some("main.ember:2:3"));
    assert_eq!(map.location(Span::VIRTUAL), None);
}
