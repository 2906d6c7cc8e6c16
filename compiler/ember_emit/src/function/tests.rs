#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn f(name: &str, params: Vec<ParamTy>, tag: i32) -> Rc<Function> {
    let params = params
        .into_iter()
        .enumerate()
        .map(|(i, ty)| Param::new(format!("p{i}"), ty))
        .collect();
    Rc::new(Function::new(name, params, ParamTy::Exact(Type::I32), move |_, _| Ok(Value::int(tag))))
}

fn sig(found: &Rc<Function>) -> String {
    found.signature()
}

#[test]
fn exact_beats_shape_beats_conversion() {
    let candidates: Vec<Candidate> = vec![
        (0, f("g", vec![ParamTy::Vector(ScalarKind::Float)], 1)),
        (0, f("g", vec![ParamTy::Exact(Type::I32)], 2)),
    ];
    let found = resolve("g", &candidates, &[Type::I32]).unwrap();
    assert_eq!(sig(found), "fn g(p0: i32) -> i32");
    let found = resolve("g", &candidates, &[Type::F32]).unwrap();
    assert_eq!(sig(found), "fn g(p0: vecN) -> i32");
}

#[test]
fn arity_filters_first() {
    let candidates: Vec<Candidate> = vec![
        (0, f("h", vec![ParamTy::Any], 1)),
        (0, f("h", vec![ParamTy::Any, ParamTy::Any], 2)),
    ];
    let found = resolve("h", &candidates, &[Type::BOOL, Type::I32]).unwrap();
    assert_eq!(found.params.len(), 2);
    let err = resolve("h", &candidates, &[]).unwrap_err();
    assert!(err.message.starts_with("no overload of `h` accepts ()"), "{}", err.message);
}

#[test]
fn int_vector_params_reject_floats() {
    let candidates: Vec<Candidate> = vec![(0, f("bits", vec![ParamTy::Vector(ScalarKind::Int)], 1))];
    assert!(resolve("bits", &candidates, &[Type::F32]).is_err());
    assert!(resolve("bits", &candidates, &[Type::I32]).is_ok());
}

#[test]
fn float_vector_params_accept_ints_by_conversion() {
    let candidates: Vec<Candidate> = vec![(0, f("s", vec![ParamTy::Vector(ScalarKind::Float)], 1))];
    assert!(resolve("s", &candidates, &[Type::I32]).is_ok());
    assert!(resolve("s", &candidates, &[Type::BOOL]).is_err());
}

#[test]
fn inner_scope_wins_ties() {
    let candidates: Vec<Candidate> = vec![
        (0, f("k", vec![ParamTy::Exact(Type::F32)], 1)),
        (1, f("k", vec![ParamTy::Exact(Type::F32)], 2)),
    ];
    let found = resolve("k", &candidates, &[Type::F32]).unwrap();
    assert!(Rc::ptr_eq(found, &candidates[0].1));
}

#[test]
fn same_scope_ties_are_ambiguous() {
    let candidates: Vec<Candidate> = vec![
        (0, f("m", vec![ParamTy::Any], 1)),
        (0, f("m", vec![ParamTy::Vector(ScalarKind::Int)], 2)),
    ];
    let err = resolve("m", &candidates, &[Type::I32]).unwrap_err();
    assert!(err.message.contains("ambiguous"), "{}", err.message);
    assert!(err.message.contains("fn m(p0: any) -> i32"));
    assert!(err.message.contains("fn m(p0: ivecN) -> i32"));
}

#[test]
fn resolution_is_deterministic() {
    let candidates: Vec<Candidate> = vec![
        (0, f("n", vec![ParamTy::Vector(ScalarKind::Float), ParamTy::Vector(ScalarKind::Float)], 1)),
        (0, f("n", vec![ParamTy::Vector(ScalarKind::Int), ParamTy::Vector(ScalarKind::Int)], 2)),
        (1, f("n", vec![ParamTy::Exact(Type::F32), ParamTy::Exact(Type::I32)], 3)),
    ];
    let args = [Type::F32, Type::I32];
    let first = resolve("n", &candidates, &args).unwrap();
    for _ in 0..10 {
        assert!(Rc::ptr_eq(first, resolve("n", &candidates, &args).unwrap()));
    }
}

#[test]
fn undefined_name() {
    let err = resolve("nope", &[], &[]).unwrap_err();
    assert_eq!(err.message, "`nope` is not defined");
}
