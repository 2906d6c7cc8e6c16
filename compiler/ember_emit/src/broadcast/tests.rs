#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::Program;
use ember_diagnostic::ErrorKind;
use ember_ir::StringInterner;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn with_emitter<T>(target: Target, f: impl FnOnce(&mut Emitter<'_>) -> T) -> T {
    let interner = StringInterner::new();
    let mut program = Program::new(&interner).unwrap();
    let mut e = program.emitter(target, &interner);
    f(&mut e)
}

fn vector_const(e: &Emitter<'_>, items: &[f32]) -> Value {
    let ty = e.vector_type(ScalarKind::Float, items.len() as u8).unwrap();
    if items.len() == 1 {
        return Value::float(items[0]);
    }
    Value::constant(Constant::Aggregate(items.iter().map(|v| Constant::Float(*v)).collect()), ty)
}

// === Folding ===

#[test]
fn int_arithmetic_wraps() {
    assert_eq!(
        ScalarOp::Add.fold(&[Constant::Int(i32::MAX), Constant::Int(1)]).unwrap(),
        Constant::Int(i32::MIN)
    );
    assert_eq!(
        ScalarOp::Mul.fold(&[Constant::Int(65536), Constant::Int(65536)]).unwrap(),
        Constant::Int(0)
    );
    assert_eq!(ScalarOp::Neg.fold(&[Constant::Int(i32::MIN)]).unwrap(), Constant::Int(i32::MIN));
}

#[test]
fn float_remainder_is_floored() {
    assert_eq!(
        ScalarOp::Rem.fold(&[Constant::Float(-1.0), Constant::Float(3.0)]).unwrap(),
        Constant::Float(2.0)
    );
    assert_eq!(
        ScalarOp::Rem.fold(&[Constant::Float(7.0), Constant::Float(3.0)]).unwrap(),
        Constant::Float(1.0)
    );
}

#[test]
fn constant_integer_division_by_zero_is_an_issue() {
    let err = ScalarOp::Div.fold(&[Constant::Int(1), Constant::Int(0)]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Issue);

    let err = with_emitter(Target::Js, |e| {
        e.map_op(ScalarOp::Rem, vec![Value::code("n", Type::I32), Value::int(0)])
            .unwrap_err()
    });
    assert_eq!(err.message, "integer division by zero");
}

#[test]
fn mismatched_kinds_do_not_fold() {
    let err = ScalarOp::Add.fold(&[Constant::Int(1), Constant::Float(1.0)]).unwrap_err();
    assert!(err.is_bug());
}

// === Broadcasting ===

#[test]
fn clamp_decomposes_on_js_and_stays_native_on_glsl() {
    let js = with_emitter(Target::Js, |e| {
        let vec3 = e.vector_type(ScalarKind::Float, 3).unwrap();
        let v = Value::code("v", vec3);
        let out = e.map_op(ScalarOp::Clamp, vec![v, Value::float(0.0), Value::float(1.0)]).unwrap();
        assert_eq!(e.pending_lines(), 0);
        e.text(&out).unwrap()
    });
    assert_eq!(js.matches("Math.min(Math.max(").count(), 3);
    assert_eq!(
        js,
        "[Math.min(Math.max(v[0], 0.0), 1.0), Math.min(Math.max(v[1], 0.0), 1.0), Math.min(Math.max(v[2], 0.0), 1.0)]"
    );

    let glsl = with_emitter(Target::Glsl, |e| {
        let vec3 = e.vector_type(ScalarKind::Float, 3).unwrap();
        let out = e
            .map_op(ScalarOp::Clamp, vec![Value::code("v", vec3), Value::float(0.0), Value::float(1.0)])
            .unwrap();
        e.text(&out).unwrap()
    });
    assert_eq!(glsl, "clamp(v, 0.0, 1.0)");
}

#[test]
fn glsl_splats_scalars_for_ops_without_mixed_forms() {
    let text = with_emitter(Target::Glsl, |e| {
        let vec2 = e.vector_type(ScalarKind::Float, 2).unwrap();
        let out = e
            .map_op(ScalarOp::Pow, vec![Value::code("v", vec2), Value::code("k", Type::F32)])
            .unwrap();
        e.text(&out).unwrap()
    });
    assert_eq!(text, "pow(v, vec2(k))");
}

#[test]
fn non_trivial_operands_are_cached_before_decomposition() {
    let (text, lines) = with_emitter(Target::Js, |e| {
        let vec2 = e.vector_type(ScalarKind::Float, 2).unwrap();
        let (out, lines) = e
            .scoped(|e| e.map_op(ScalarOp::Neg, vec![Value::code("f(x)", vec2)]))
            .unwrap();
        (e.text(&out).unwrap(), lines)
    });
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("const _t"));
    assert!(lines[0].ends_with(" = f(x);"));
    assert!(!text.contains("f(x)"));
}

#[test]
fn mismatched_vector_operands() {
    let err = with_emitter(Target::Js, |e| {
        let vec2 = e.vector_type(ScalarKind::Float, 2).unwrap();
        let vec3 = e.vector_type(ScalarKind::Float, 3).unwrap();
        e.map_op(ScalarOp::Add, vec![Value::code("a", vec2), Value::code("b", vec3)])
            .unwrap_err()
    });
    assert_eq!(err.message, "mismatched operand types `vec2` and `vec3`");
}

#[test]
fn comparison_results_are_bool_vectors() {
    with_emitter(Target::Js, |e| {
        let a = vector_const(e, &[1.0, 5.0]);
        let b = vector_const(e, &[2.0, 2.0]);
        let out = e.map_op(ScalarOp::Lt, vec![a, b]).unwrap();
        assert_eq!(out.ty.to_string(), "bvec2");
        assert_eq!(
            out.as_const(),
            Some(&Constant::Aggregate(vec![Constant::Bool(true), Constant::Bool(false)]))
        );
    });
}

// === Reductions ===

#[test]
fn equality_of_runtime_vectors() {
    let js = with_emitter(Target::Js, |e| {
        let vec2 = e.vector_type(ScalarKind::Float, 2).unwrap();
        let out = e
            .reduce(Reduce::Eq, vec![Value::code("a", vec2.clone()), Value::code("b", vec2)])
            .unwrap();
        e.text(&out).unwrap()
    });
    assert_eq!(js, "((a[0] === b[0]) && (a[1] === b[1]))");

    let glsl = with_emitter(Target::Glsl, |e| {
        let vec2 = e.vector_type(ScalarKind::Float, 2).unwrap();
        let out = e
            .reduce(Reduce::Ne, vec![Value::code("a", vec2.clone()), Value::code("b", vec2)])
            .unwrap();
        e.text(&out).unwrap()
    });
    assert_eq!(glsl, "(a != b)");
}

#[test]
fn approx_and_length_fold() {
    with_emitter(Target::Glsl, |e| {
        let near = e
            .reduce(Reduce::Approx, vec![Value::float(1.0), Value::float(1.0 + 1e-7)])
            .unwrap();
        assert_eq!(near.as_const(), Some(&Constant::Bool(true)));

        let v = vector_const(e, &[3.0, 4.0]);
        let len = e.reduce(Reduce::Length, vec![v]).unwrap();
        assert_eq!(len.as_const(), Some(&Constant::Float(5.0)));
    });
}

#[test]
fn count_of_vectors_and_arrays() {
    with_emitter(Target::Js, |e| {
        let vec4 = e.vector_type(ScalarKind::Int, 4).unwrap();
        assert_eq!(e.count(&Value::code("v", vec4)).unwrap().as_const(), Some(&Constant::Int(4)));
        let arr = Type::array(Type::F32, 7).unwrap();
        assert_eq!(e.count(&Value::code("a", arr)).unwrap().as_const(), Some(&Constant::Int(7)));
        assert!(e.count(&Value::bool(true)).is_ok());
    });
}

proptest! {
    /// Broadcasting a constant operation equals folding each component.
    #[test]
    fn broadcast_matches_per_component_fold(
        a in prop::collection::vec(-1000.0f32..1000.0, 1..=4),
        seed in -1000.0f32..1000.0,
        op_index in 0usize..5,
    ) {
        let ops = [ScalarOp::Add, ScalarOp::Sub, ScalarOp::Mul, ScalarOp::Min, ScalarOp::Max];
        let op = ops[op_index];
        let b: Vec<f32> = a.iter().map(|x| x * 0.5 + seed).collect();
        for target in Target::ALL {
            let folded = with_emitter(target, |e| {
                let va = vector_const(e, &a);
                let vb = vector_const(e, &b);
                e.map_op(op, vec![va, vb]).unwrap()
            });
            let expected: Vec<Constant> = a
                .iter()
                .zip(&b)
                .map(|(x, y)| op.fold(&[Constant::Float(*x), Constant::Float(*y)]).unwrap())
                .collect();
            let got = match folded.as_const().unwrap() {
                Constant::Aggregate(items) => items.clone(),
                scalar => vec![scalar.clone()],
            };
            prop_assert_eq!(got, expected);
        }
    }
}
