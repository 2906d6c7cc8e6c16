//! Parser tests.
//!
//! - `parser`: expressions, statements and items that parse cleanly
//! - `recovery`: malformed input, checking the issue codes raised
//! - `compositional`: type and pattern matrices, plus property tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod compositional;
mod recovery;

use crate::{parse_expr, parse_source};
use ember_diagnostic::{Code, Issues};
use ember_ir::ast::{
    Block, Expr, ExprKind, Lit, PatKind, Pat, Script, SourcePart, StmtKind, StructHead, Ty, TyKind,
};
use ember_ir::{ChunkId, StringInterner};

const C: ChunkId = ChunkId::from_raw(0);

/// Parse a script that must be free of issues.
fn script_ok(source: &str) -> (Script, StringInterner) {
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let script = parse_source(source, C, &interner, &mut issues);
    assert!(issues.is_ok(), "unexpected issues for {source:?}: {issues:?}");
    (script, interner)
}

/// Issue codes raised while lexing and parsing `source`.
fn codes(source: &str) -> Vec<Code> {
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    parse_source(source, C, &interner, &mut issues);
    issues.codes()
}

/// S-expression rendering of a clean expression.
fn sexpr(source: &str) -> String {
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let expr = parse_expr(source, C, &interner, &mut issues);
    assert!(issues.is_ok(), "unexpected issues for {source:?}: {issues:?}");
    render(&expr, &interner)
}

/// Compact, span-free rendering used by the assertions.
fn render(expr: &Expr, i: &StringInterner) -> String {
    let list = |items: &[Expr]| -> String {
        items
            .iter()
            .map(|e| format!(" {}", render(e, i)))
            .collect()
    };
    match &expr.kind {
        ExprKind::Empty => "<err>".to_owned(),
        ExprKind::Lit(Lit::Int(v)) => v.to_string(),
        ExprKind::Lit(Lit::Float(v)) => format!("{v:?}"),
        ExprKind::Lit(Lit::Bool(v)) => v.to_string(),
        ExprKind::Ident(name) => i.lookup(*name).to_owned(),
        ExprKind::Builtin(name) => format!("@{}", i.lookup(*name)),
        ExprKind::Param(name) => format!("${}", i.lookup(*name)),
        ExprKind::Symbol(name) => format!(":{}", i.lookup(*name)),
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({op} {} {})", render(lhs, i), render(rhs, i))
        }
        ExprKind::Unary { op, operand } => format!("({op} {})", render(operand, i)),
        ExprKind::Deriv { var, body } => {
            format!("(d/d{} {})", i.lookup(var.name), render(body, i))
        }
        ExprKind::Range { start, end } => {
            let side = |e: &Option<Box<Expr>>| e.as_ref().map_or("_".to_owned(), |e| render(e, i));
            format!("(.. {} {})", side(start), side(end))
        }
        ExprKind::Call {
            callee,
            type_args,
            args,
        } => {
            let generics = if type_args.is_empty() {
                String::new()
            } else {
                let tys: Vec<_> = type_args.iter().map(|t| render_ty(t, i)).collect();
                format!("<{}>", tys.join(","))
            };
            format!("(call {}{generics}{})", render(callee, i), list(args))
        }
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => format!(
            "(.{} {}{})",
            i.lookup(method.name),
            render(receiver, i),
            list(args)
        ),
        ExprKind::Field { base, field } => {
            format!("(. {} {})", render(base, i), i.lookup(field.name))
        }
        ExprKind::Index { base, index } => {
            format!("(index {} {})", render(base, i), render(index, i))
        }
        ExprKind::StructLit { head, fields } => {
            let head = match head {
                StructHead::Named(name) => i.lookup(name.name).to_owned(),
                StructHead::Symbol(name) => format!(":{}", i.lookup(name.name)),
            };
            let fields: String = fields
                .iter()
                .map(|f| format!(" {}:{}", i.lookup(f.name.name), render(&f.value, i)))
                .collect();
            format!("(struct {head}{fields})")
        }
        ExprKind::Array(items) => format!("[{}]", list(items).trim_start()),
        ExprKind::Block(block) => render_block(block, i),
        ExprKind::If {
            cond,
            then_block,
            else_branch,
        } => {
            let else_part = else_branch
                .as_ref()
                .map_or(String::new(), |e| format!(" {}", render(e, i)));
            format!(
                "(if {} {}{else_part})",
                render(cond, i),
                render_block(then_block, i)
            )
        }
        ExprKind::Match { subject, arms } => {
            let arms: String = arms
                .iter()
                .map(|arm| format!(" [{} {}]", render_pat(&arm.pat, i), render(&arm.body, i)))
                .collect();
            format!("(match {}{arms})", render(subject, i))
        }
        ExprKind::For {
            label,
            pat,
            iter,
            body,
        } => {
            let label = label.map_or(String::new(), |l| format!("'{} ", i.lookup(l.name)));
            format!(
                "({label}for {} {} {})",
                render_pat(pat, i),
                render(iter, i),
                render_block(body, i)
            )
        }
        ExprKind::Source(block) => {
            let target = block
                .target
                .map_or(String::new(), |t| format!(" {}", i.lookup(t.name)));
            let parts: String = block
                .parts
                .iter()
                .map(|part| match part {
                    SourcePart::Text(text) => format!(" {text:?}"),
                    SourcePart::Interp(e) => format!(" ${{{}}}", render(e, i)),
                })
                .collect();
            format!("(source{target}{parts})")
        }
    }
}

fn render_block(block: &Block, i: &StringInterner) -> String {
    let mut out = String::from("{");
    for stmt in &block.stmts {
        let text = match &stmt.kind {
            StmtKind::Empty => ";".to_owned(),
            StmtKind::Let { pat, ty, value } => {
                let ty = ty
                    .as_ref()
                    .map_or(String::new(), |t| format!(":{}", render_ty(t, i)));
                format!("(let {}{ty} {})", render_pat(pat, i), render(value, i))
            }
            StmtKind::Assign { op, target, value } => {
                format!("({op:?} {} {})", render(target, i), render(value, i))
            }
            StmtKind::Expr(e) => render(e, i),
            StmtKind::Assert(e) => format!("(assert {})", render(e, i)),
            StmtKind::Break(label) => label.map_or("break".to_owned(), |l| {
                format!("break '{}", i.lookup(l.name))
            }),
            StmtKind::Continue(label) => label.map_or("continue".to_owned(), |l| {
                format!("continue '{}", i.lookup(l.name))
            }),
        };
        out.push(' ');
        out.push_str(&text);
    }
    if let Some(tail) = &block.tail {
        out.push_str(" => ");
        out.push_str(&render(tail, i));
    }
    out.push_str(" }");
    out
}

fn render_ty(ty: &Ty, i: &StringInterner) -> String {
    match &ty.kind {
        TyKind::Empty => "<err>".to_owned(),
        TyKind::Named { name, args } if args.is_empty() => i.lookup(name.name).to_owned(),
        TyKind::Named { name, args } => {
            let args: Vec<_> = args.iter().map(|t| render_ty(t, i)).collect();
            format!("{}<{}>", i.lookup(name.name), args.join(","))
        }
        TyKind::Array { of, len } => format!("[{}; {}]", render_ty(of, i), render(len, i)),
        TyKind::Alt(members) => {
            let members: Vec<_> = members.iter().map(|t| render_ty(t, i)).collect();
            members.join("|")
        }
    }
}

fn render_pat(pat: &Pat, i: &StringInterner) -> String {
    match &pat.kind {
        PatKind::Ignore => "_".to_owned(),
        PatKind::Bind { name, mutable } => {
            let prefix = if *mutable { "mut " } else { "" };
            format!("{prefix}{}", i.lookup(*name))
        }
        PatKind::Lit(Lit::Int(v)) => v.to_string(),
        PatKind::Lit(Lit::Float(v)) => format!("{v:?}"),
        PatKind::Lit(Lit::Bool(v)) => v.to_string(),
        PatKind::Struct { name, fields, rest } => {
            let mut parts: Vec<_> = fields
                .iter()
                .map(|f| format!("{}:{}", i.lookup(f.name.name), render_pat(&f.pat, i)))
                .collect();
            if *rest {
                parts.push("..".to_owned());
            }
            format!("{}{{{}}}", i.lookup(name.name), parts.join(" "))
        }
        PatKind::Array { items, rest } => {
            let mut parts: Vec<_> = items.iter().map(|p| render_pat(p, i)).collect();
            if *rest {
                parts.push("..".to_owned());
            }
            format!("[{}]", parts.join(" "))
        }
    }
}
