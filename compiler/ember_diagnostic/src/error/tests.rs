use super::*;
use ember_ir::ChunkId;

#[test]
fn display_names_the_kind() {
    assert_eq!(
        CompileError::issue("undefined variable `x`").to_string(),
        "error: undefined variable `x`"
    );
    assert_eq!(
        CompileError::todo("labels on glsl").to_string(),
        "not yet supported: labels on glsl"
    );
    assert_eq!(
        CompileError::bug("bad repr").to_string(),
        "internal compiler error: bad repr"
    );
}

#[test]
fn at_keeps_innermost_span() {
    let inner = Span::new(ChunkId::from_raw(0), 4, 5);
    let outer = Span::new(ChunkId::from_raw(0), 0, 10);
    let err = CompileError::issue("x").at(inner).at(outer);
    assert_eq!(err.span, Some(inner));
}

#[test]
fn at_ignores_virtual_spans() {
    let err = CompileError::issue("x").at(Span::VIRTUAL);
    assert_eq!(err.span, None);
    assert!(!err.is_bug());
    assert!(CompileError::bug("y").is_bug());
}
