//! Malformed input: every missing element raises exactly the expected
//! issues and parsing carries on.

use super::*;
use ember_ir::ast::ItemKind;
use pretty_assertions::assert_eq;

fn expect(source: &str, expected: &[Code]) {
    assert_eq!(codes(source), expected, "for {source:?}");
}

// === Expressions ===

#[test]
fn missing_operands() {
    expect("fn f() { 1 + }", &[Code::ExpectedOperand]);
    expect("fn f() { -; }", &[Code::ExpectedOperand]);
    expect("fn f() { a ^ }", &[Code::ExpectedOperand]);
    expect("fn f() { d/dx }", &[Code::ExpectedDerivativeBody]);
}

#[test]
fn missing_semicolon_between_expressions() {
    expect("fn f() { a b }", &[Code::ExpectedSemicolon]);
    expect("fn f() { break 1; }", &[Code::ExpectedSemicolon]);
}

#[test]
fn marked_operator_outside_fn_name() {
    expect("fn f() { `+ }", &[Code::MarkedOperatorOutsideFn]);
}

#[test]
fn reserved_keywords_as_names() {
    expect("fn f() { while + 1 }", &[Code::ReservedKeyword]);
    expect("fn while() {}", &[Code::ReservedKeyword]);
}

#[test]
fn postfix_errors() {
    expect("fn f() { a. }", &[Code::ExpectedFieldAfterDot]);
    expect("fn f() { a[] }", &[Code::ExpectedIndex]);
    expect("fn f() { f<>(x) }", &[Code::EmptyTypeArgs]);
    expect("fn f() { f<i32> }", &[Code::ExpectedCallArgs]);
    expect("fn f() { (a b) }", &[Code::UnexpectedToken]);
}

#[test]
fn struct_literal_errors() {
    expect("fn f() { P { x: } }", &[Code::ExpectedFieldValue]);
    expect("fn f() { P { 1 } }", &[Code::ExpectedStructField]);
}

#[test]
fn integer_out_of_range() {
    expect("fn f() { 99999999999 }", &[Code::IntegerTooLarge]);
    expect("fn f() { 2147483648 }", &[Code::IntegerTooLarge]);
}

#[test]
fn control_flow_errors() {
    expect("fn f() { if x }", &[Code::ExpectedBlock]);
    expect("fn f() { if x { } else 1 }", &[Code::ExpectedElseBranch]);
    expect("fn f() { match x { } }", &[Code::EmptyMatch]);
    expect("fn f() { match x }", &[Code::ExpectedMatchBody]);
    expect("fn f() { match x { 1 2 } }", &[Code::ExpectedFatArrow]);
    expect("fn f() { for x xs { } }", &[Code::ExpectedIn]);
    expect("fn f() { for x in { } }", &[Code::ExpectedBlock]);
    expect(
        "fn f() { 'a x }",
        &[Code::ExpectedForAfterLabel, Code::ExpectedSemicolon],
    );
    expect("fn f() { source }", &[Code::ExpectedSourceBody]);
}

// === Statements ===

#[test]
fn statement_errors() {
    expect("fn f() { let = 1; }", &[Code::ExpectedLetPattern]);
    expect("fn f() { let x 1; }", &[Code::ExpectedEquals]);
    expect("fn f() { match x { - => 1 } }", &[Code::ExpectedLiteralAfterMinus]);
    expect("fn f() { x = ; }", &[Code::ExpectedAssignValue]);
    expect("fn f() { assert; }", &[Code::ExpectedAssertCondition]);
    expect("fn f() { let x = 1 }", &[Code::ExpectedSemicolon]);
}

#[test]
fn rest_only_where_allowed() {
    expect("fn f() { let [a, ..] = v; g(a, ..) }", &[Code::RestNotAllowed]);
}

// === Items ===

#[test]
fn function_header_errors() {
    expect("fn () {}", &[Code::ExpectedFnName]);
    expect("fn f {}", &[Code::ExpectedParamList]);
    expect("fn f()", &[Code::ExpectedFnBody]);
    expect("fn f() -> {}", &[Code::ExpectedReturnType]);
    expect("fn f<>() {}", &[Code::EmptyGenericParams]);
    expect("fn f(x) {}", &[Code::ExpectedColon, Code::ExpectedParamType]);
    expect("fn f(: f32) {}", &[Code::ExpectedParamName]);
}

#[test]
fn type_errors() {
    expect("fn f(x: [f32]) {}", &[Code::ExpectedArrayLength]);
    expect("fn f(x: A |) {}", &[Code::ExpectedType]);
    expect("const X: = 1;", &[Code::ExpectedType]);
}

#[test]
fn struct_errors() {
    expect("struct { x: f32 }", &[Code::ExpectedStructName]);
    expect("struct A;", &[Code::ExpectedStructBody]);
    expect("struct A { x f32 }", &[Code::ExpectedColon]);
    expect("struct A { x: }", &[Code::ExpectedFieldType]);
    expect("struct A { x: f32 } |", &[Code::ExpectedVariant]);
}

#[test]
fn other_item_errors() {
    expect("use ;", &[Code::ExpectedModuleName]);
    expect("const = 1;", &[Code::ExpectedConstName]);
    expect("const X = ;", &[Code::ExpectedExpression]);
    expect("param t: f32;", &[Code::ExpectedParamDecl]);
    expect("assert;", &[Code::ExpectedAssertCondition]);
}

#[test]
fn stray_tokens_skip_to_next_item() {
    expect("let x = 1; y + 2;", &[Code::ExpectedItem]);
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let script = parse_source("1 + 2; fn f() {}", C, &interner, &mut issues);
    assert_eq!(issues.codes(), vec![Code::ExpectedItem]);
    assert!(matches!(script.items[0].kind, ItemKind::Empty));
    assert!(matches!(script.items[1].kind, ItemKind::Fn(_)));
}

#[test]
fn errors_inside_groups_stay_inside() {
    // The bad argument does not swallow the rest of the function.
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let script = parse_source("fn f() { g(1 +, 2); }\nfn h() {}", C, &interner, &mut issues);
    assert_eq!(issues.codes(), vec![Code::ExpectedOperand]);
    assert_eq!(script.items.len(), 2);
}

#[test]
fn lexer_and_parser_issues_accumulate() {
    let found = codes("fn f() { let x = 1a; }");
    assert_eq!(found, vec![Code::LetterDirectlyAfterNumber, Code::ExpectedSemicolon]);
}
