//! Every form in every position it may appear in, plus property tests.

use super::*;
use ember_ir::ast::{Item, ItemKind, Stmt};
use proptest::prelude::*;

const TYPES: &[&str] = &[
    "f32",
    "vec2",
    "Pair<f32>",
    "Pair<Pair<f32>>",
    "Map<i32, vec3>",
    "[f32; 4]",
    "[vec2; N + 1]",
    "[[f32; 2]; 3]",
    "A | B",
    "A | B | C",
];

const PATTERNS: &[&str] = &[
    "_",
    "x",
    "mut x",
    "[a, b]",
    "[a, ..]",
    "[]",
    "P { x, y: _ }",
    "P { .. }",
    "P { x: [a, _], .. }",
];

const LITERAL_PATTERNS: &[&str] = &["1", "-2", "true", "0x10", "1.5", "-0.5"];

const EXPRESSIONS: &[&str] = &[
    "1",
    "a + b * c",
    "f(x)",
    "v.xy",
    "v.dot(w)",
    "[1, 2]",
    "P { x: 1 }",
    ":s { a: 1 }",
    "if a { 1 } else { 2 }",
    "match x { _ => 1 }",
    "{ 1 }",
    "-x ^ 2",
    "0..4",
    "@sin(x)",
    "$t",
    "d/dx x * x",
    "f<vec2>(v)",
    "(a)",
    "source js { x }",
];

fn assert_clean(source: &str) {
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    parse_source(source, C, &interner, &mut issues);
    assert!(issues.is_ok(), "{source:?} raised {:?}", issues.codes());
}

mod type_matrix {
    use super::*;

    #[test]
    fn types_in_parameters() {
        for ty in TYPES {
            assert_clean(&format!("fn f(x: {ty}) {{}}"));
        }
    }

    #[test]
    fn types_in_return_position() {
        for ty in TYPES {
            assert_clean(&format!("fn f() -> {ty} {{ x }}"));
        }
    }

    #[test]
    fn types_in_let_and_const() {
        for ty in TYPES {
            assert_clean(&format!("fn f() {{ let x: {ty} = v; }}"));
            assert_clean(&format!("const X: {ty} = v;"));
        }
    }

    #[test]
    fn types_in_fields_and_type_args() {
        for ty in TYPES {
            assert_clean(&format!("struct S {{ a: {ty}, b: f32 }}"));
            if !ty.contains('|') {
                assert_clean(&format!("fn f() {{ g<{ty}>(x) }}"));
            }
        }
    }
}

mod pattern_matrix {
    use super::*;

    #[test]
    fn patterns_in_let() {
        for pat in PATTERNS {
            assert_clean(&format!("fn f() {{ let {pat} = v; }}"));
        }
    }

    #[test]
    fn patterns_in_for() {
        for pat in PATTERNS {
            assert_clean(&format!("fn f() {{ for {pat} in xs {{ }} }}"));
        }
    }

    #[test]
    fn patterns_in_match_arms() {
        for pat in PATTERNS.iter().chain(LITERAL_PATTERNS) {
            assert_clean(&format!("fn f() {{ match v {{ {pat} => 1, _ => 2 }} }}"));
        }
    }
}

mod expression_matrix {
    use super::*;

    #[test]
    fn expressions_as_let_values() {
        for expr in EXPRESSIONS {
            assert_clean(&format!("fn f() {{ let y = {expr}; }}"));
        }
    }

    #[test]
    fn expressions_as_arguments_and_elements() {
        for expr in EXPRESSIONS {
            assert_clean(&format!("fn f() {{ g({expr}, 1) }}"));
            assert_clean(&format!("fn f() {{ [{expr}, 1] }}"));
            assert_clean(&format!("fn f() {{ a[{expr}] }}"));
        }
    }

    #[test]
    fn expressions_as_tails_and_items() {
        for expr in EXPRESSIONS {
            assert_clean(&format!("fn f() {{ {expr} }}"));
            assert_clean(&format!("const X = {expr};"));
        }
    }

    #[test]
    fn expressions_as_conditions() {
        for expr in EXPRESSIONS {
            // A bare struct literal would take the `if` body as its fields.
            if expr.contains(": 1 }") {
                continue;
            }
            assert_clean(&format!("fn f() {{ if {expr} {{ 1 }} else {{ 2 }} }}"));
        }
    }
}

// === Properties ===

/// Placeholder nodes left in a script.
fn placeholders(script: &Script) -> usize {
    script.items.iter().map(item_placeholders).sum()
}

fn item_placeholders(item: &Item) -> usize {
    match &item.kind {
        ItemKind::Empty => 1,
        ItemKind::Use(_) => 0,
        ItemKind::Fn(decl) => {
            decl.params.iter().map(|p| ty_placeholders(&p.ty)).sum::<usize>()
                + decl.ret.as_ref().map_or(0, ty_placeholders)
                + block_placeholders(&decl.body)
        }
        ItemKind::Struct(group) => group
            .variants
            .iter()
            .flat_map(|v| &v.fields)
            .map(|f| ty_placeholders(&f.ty))
            .sum(),
        ItemKind::Const(decl) => {
            decl.ty.as_ref().map_or(0, ty_placeholders) + expr_placeholders(&decl.value)
        }
        ItemKind::Param(decl) => ty_placeholders(&decl.ty),
        ItemKind::Assert(e) => expr_placeholders(e),
    }
}

fn ty_placeholders(ty: &Ty) -> usize {
    match &ty.kind {
        TyKind::Empty => 1,
        TyKind::Named { args, .. } => args.iter().map(ty_placeholders).sum(),
        TyKind::Array { of, len } => ty_placeholders(of) + expr_placeholders(len),
        TyKind::Alt(members) => members.iter().map(ty_placeholders).sum(),
    }
}

fn block_placeholders(block: &Block) -> usize {
    block.stmts.iter().map(stmt_placeholders).sum::<usize>()
        + block.tail.as_deref().map_or(0, expr_placeholders)
}

fn stmt_placeholders(stmt: &Stmt) -> usize {
    match &stmt.kind {
        StmtKind::Empty | StmtKind::Break(_) | StmtKind::Continue(_) => 0,
        StmtKind::Let { ty, value, .. } => {
            ty.as_ref().map_or(0, ty_placeholders) + expr_placeholders(value)
        }
        StmtKind::Assign { target, value, .. } => {
            expr_placeholders(target) + expr_placeholders(value)
        }
        StmtKind::Expr(e) | StmtKind::Assert(e) => expr_placeholders(e),
    }
}

fn expr_placeholders(expr: &Expr) -> usize {
    let all = |items: &[Expr]| items.iter().map(expr_placeholders).sum::<usize>();
    match &expr.kind {
        ExprKind::Empty => 1,
        ExprKind::Lit(_)
        | ExprKind::Ident(_)
        | ExprKind::Builtin(_)
        | ExprKind::Param(_)
        | ExprKind::Symbol(_) => 0,
        ExprKind::Binary { lhs, rhs, .. } => expr_placeholders(lhs) + expr_placeholders(rhs),
        ExprKind::Unary { operand: e, .. }
        | ExprKind::Deriv { body: e, .. }
        | ExprKind::Field { base: e, .. } => expr_placeholders(e),
        ExprKind::Range { start, end } => {
            start.as_deref().map_or(0, expr_placeholders)
                + end.as_deref().map_or(0, expr_placeholders)
        }
        ExprKind::Call {
            callee,
            type_args,
            args,
        } => {
            expr_placeholders(callee)
                + type_args.iter().map(ty_placeholders).sum::<usize>()
                + all(args)
        }
        ExprKind::MethodCall { receiver, args, .. } => expr_placeholders(receiver) + all(args),
        ExprKind::Index { base, index } => expr_placeholders(base) + expr_placeholders(index),
        ExprKind::StructLit { fields, .. } => {
            fields.iter().map(|f| expr_placeholders(&f.value)).sum()
        }
        ExprKind::Array(items) => all(items),
        ExprKind::Block(block) => block_placeholders(block),
        ExprKind::If {
            cond,
            then_block,
            else_branch,
        } => {
            expr_placeholders(cond)
                + block_placeholders(then_block)
                + else_branch.as_deref().map_or(0, expr_placeholders)
        }
        ExprKind::Match { subject, arms } => {
            expr_placeholders(subject)
                + arms.iter().map(|arm| expr_placeholders(&arm.body)).sum::<usize>()
        }
        ExprKind::For { iter, body, .. } => expr_placeholders(iter) + block_placeholders(body),
        ExprKind::Source(block) => block
            .parts
            .iter()
            .map(|part| match part {
                SourcePart::Text(_) => 0,
                SourcePart::Interp(e) => expr_placeholders(e),
            })
            .sum(),
    }
}

const FRAGMENTS: &[&str] = &[
    "fn", "f", "x", "(", ")", "{", "}", "[", "]", "1", "2.5", "+", "-", "*", "^", ";", ",", ":",
    "=", "let", "if", "else", "match", "=>", "for", "in", "struct", "|", "..", "<", ">", "`+",
    "@sin", "$t", ":sym", "'l", "\"m\"", "use", "const", "param", "source", "d/dx", "assert",
    "->", "_", "mut", "while", "#", "!", ".", "+=",
];

/// A parenthesised expression and its expected rendering.
fn arith() -> impl Strategy<Value = (String, String)> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["a", "b", "c"]).prop_map(|v| (v.to_owned(), v.to_owned())),
        (0..1000i32).prop_map(|n| (n.to_string(), n.to_string())),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "^", "==", "&&", "~", "<", "|"]),
                inner.clone(),
            )
                .prop_map(|((lt, le), op, (rt, re))| {
                    (format!("({lt} {op} {rt})"), format!("({op} {le} {re})"))
                }),
            inner.prop_map(|(t, e)| (format!("(-{t})"), format!("(- {e})"))),
        ]
    })
}

proptest! {
    #[test]
    fn placeholders_always_come_with_issues(
        parts in prop::collection::vec(prop::sample::select(FRAGMENTS.to_vec()), 0..40)
    ) {
        let source = parts.join(" ");
        let interner = StringInterner::new();
        let mut issues = Issues::new();
        let script = parse_source(&source, C, &interner, &mut issues);
        if placeholders(&script) > 0 {
            prop_assert!(!issues.is_empty(), "silent placeholder in {source:?}");
        }
    }

    #[test]
    fn parenthesised_expressions_round_trip((text, expected) in arith()) {
        prop_assert_eq!(sexpr(&text), expected);
    }
}
