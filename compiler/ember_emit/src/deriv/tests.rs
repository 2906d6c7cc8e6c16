#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ember_diagnostic::Issues;
use ember_ir::ChunkId;
use pretty_assertions::assert_eq;

/// Fully parenthesized rendering without spans.
fn show(e: &Expr, interner: &StringInterner) -> String {
    match &e.kind {
        ExprKind::Lit(Lit::Float(v)) => format!("{v}"),
        ExprKind::Lit(Lit::Int(v)) => format!("{v}"),
        ExprKind::Ident(name) => interner.lookup(*name).to_string(),
        ExprKind::Builtin(name) => format!("@{}", interner.lookup(*name)),
        ExprKind::Unary { op, operand } => format!("({op}{})", show(operand, interner)),
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({} {op} {})", show(lhs, interner), show(rhs, interner))
        }
        ExprKind::Call { callee, args, .. } => {
            let args: Vec<String> = args.iter().map(|a| show(a, interner)).collect();
            format!("{}({})", show(callee, interner), args.join(", "))
        }
        other => format!("{other:?}"),
    }
}

fn derive(source: &str) -> Result<String, CompileError> {
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let expr = ember_parse::parse_expr(source, ChunkId::from_raw(0), &interner, &mut issues);
    assert!(issues.is_ok(), "{source}: {:?}", issues.codes());
    let x = interner.intern("x");
    differentiate(&expr, x, &interner).map(|d| show(&d, &interner))
}

#[test]
fn constants_and_variables() {
    assert_eq!(derive("3").unwrap(), "0");
    assert_eq!(derive("x").unwrap(), "1");
    assert_eq!(derive("y").unwrap(), "0");
    assert_eq!(derive("$t").unwrap(), "0");
}

#[test]
fn sums_and_products_simplify() {
    assert_eq!(derive("x + 1").unwrap(), "1");
    assert_eq!(derive("2 * x").unwrap(), "2");
    assert_eq!(derive("x * y").unwrap(), "y");
    assert_eq!(derive("1 - x").unwrap(), "-1");
    assert_eq!(derive("-x").unwrap(), "-1");
}

#[test]
fn power_rule() {
    assert_eq!(derive("x ^ 3").unwrap(), "(3 * (x ^ (3 - 1)))");
    assert_eq!(derive("(2 * x) ^ 2").unwrap(), "((2 * ((2 * x) ^ (2 - 1))) * 2)");
}

#[test]
fn quotient_rule() {
    assert_eq!(derive("1 / x").unwrap(), "(-1 / (x * x))");
}

#[test]
fn chain_rule_through_prelude_functions() {
    assert_eq!(derive("sin(2 * x)").unwrap(), "(@cos((2 * x)) * 2)");
    assert_eq!(derive("ln(x)").unwrap(), "(1 / x)");
    assert_eq!(derive("sqrt(x)").unwrap(), "(1 / (2 * @sqrt(x)))");
}

#[test]
fn unsupported_forms_are_todo() {
    let err = derive("x ^ x").unwrap_err();
    assert!(err.message.contains("variable exponent"));
    let err = derive("floor(x)").unwrap_err();
    assert!(!err.is_bug());
    assert!(err.message.contains("derivative"));
}
