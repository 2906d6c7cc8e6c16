#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn glsl(c: Constant) -> String {
    c.render_scalar(Target::Glsl).unwrap()
}

fn js(c: Constant) -> String {
    c.render_scalar(Target::Js).unwrap()
}

#[test]
fn floats_always_read_as_floats() {
    assert_eq!(glsl(Constant::Float(1.0)), "1.0");
    assert_eq!(glsl(Constant::Float(0.5)), "0.5");
    assert_eq!(glsl(Constant::Float(0.1)), "0.1");
    assert_eq!(glsl(Constant::Float(-0.0)), "0.0");
    assert_eq!(glsl(Constant::Float(1e20)), "1e20");
}

#[test]
fn negatives_are_parenthesised() {
    assert_eq!(glsl(Constant::Float(-2.5)), "(-2.5)");
    assert_eq!(js(Constant::Int(-3)), "(-3)");
    assert_eq!(js(Constant::Int(i32::MIN)), "(-2147483648)");
    assert_eq!(glsl(Constant::Int(i32::MIN)), "(-2147483647 - 1)");
}

#[test]
fn non_finite_values() {
    assert_eq!(js(Constant::Float(f32::NAN)), "NaN");
    assert_eq!(js(Constant::Float(f32::NEG_INFINITY)), "(-Infinity)");
    assert_eq!(glsl(Constant::Float(f32::INFINITY)), "uintBitsToFloat(0x7f800000u)");
}

#[test]
fn aggregates_have_no_scalar_text() {
    assert_eq!(Constant::VOID.render_scalar(Target::Js), None);
    assert!(!Constant::Aggregate(vec![Constant::Bool(true)]).is_scalar());
    assert_eq!(js(Constant::Bool(false)), "false");
}
