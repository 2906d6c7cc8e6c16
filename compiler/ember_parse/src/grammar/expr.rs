//! Operator precedence.
//!
//! Loosest to tightest: range, `||`, `&&`, `|`, `&`, equality, comparison,
//! concat, sum, product, then unary prefixes, then `^` (right associative,
//! binding tighter than a unary operator on its left), then postfix.
//! Each binary tier is a closure wrapping the next tighter one.

use super::primary::{at_expr_start, postfix};
use super::ExprContext;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{BinaryOp, Expr, ExprKind, Ident, UnaryOp};
use ember_ir::{Span, TokenKind, TokenNode};
use ember_stack::ensure_sufficient_stack;

type Tier = &'static [(TokenKind, BinaryOp)];

const OR: Tier = &[(TokenKind::OrOr, BinaryOp::Or)];
const AND: Tier = &[(TokenKind::AndAnd, BinaryOp::And)];
const BIT_OR: Tier = &[(TokenKind::Pipe, BinaryOp::BitOr)];
const BIT_AND: Tier = &[(TokenKind::Amp, BinaryOp::BitAnd)];
const EQUALITY: Tier = &[
    (TokenKind::EqEq, BinaryOp::Eq),
    (TokenKind::NotEq, BinaryOp::NotEq),
    (TokenKind::TildeEq, BinaryOp::Approx),
];
const COMPARE: Tier = &[
    (TokenKind::Lt, BinaryOp::Lt),
    (TokenKind::Gt, BinaryOp::Gt),
    (TokenKind::LtEq, BinaryOp::LtEq),
    (TokenKind::GtEq, BinaryOp::GtEq),
];
const CONCAT: Tier = &[
    (TokenKind::Tilde, BinaryOp::Concat),
    (TokenKind::Arrow, BinaryOp::Arrow),
];
const SUM: Tier = &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)];
const PRODUCT: Tier = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Rem),
    (TokenKind::Backslash, BinaryOp::LeftDiv),
];

/// Wrap `next` in a left-associative tier over `ops`.
fn left_assoc<F>(ops: Tier, next: F) -> impl Fn(&mut Stream<'_, '_>, ExprContext) -> Expr
where
    F: Fn(&mut Stream<'_, '_>, ExprContext) -> Expr,
{
    move |s: &mut Stream<'_, '_>, ctx: ExprContext| -> Expr {
        let mut lhs = next(s, ctx);
        while let Some(op) = s
            .peek_kind()
            .and_then(|kind| ops.iter().find(|(k, _)| *k == kind))
            .map(|&(_, op)| op)
        {
            s.next();
            let rhs = if at_expr_start(s) {
                next(s, ctx)
            } else {
                let here = s.here();
                s.raise(Code::ExpectedOperand, here);
                Expr::empty(here)
            };
            let span = lhs.span.merge(rhs.span).merge(s.last());
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        lhs
    }
}

/// Full expression, including ranges.
pub(crate) fn expr(s: &mut Stream<'_, '_>, ctx: ExprContext) -> Expr {
    ensure_sufficient_stack(|| {
        let or = left_assoc(
            OR,
            left_assoc(
                AND,
                left_assoc(
                    BIT_OR,
                    left_assoc(
                        BIT_AND,
                        left_assoc(
                            EQUALITY,
                            left_assoc(
                                COMPARE,
                                left_assoc(CONCAT, left_assoc(SUM, left_assoc(PRODUCT, unary))),
                            ),
                        ),
                    ),
                ),
            ),
        );
        range(s, ctx, &or)
    })
}

/// Expression if one can start here; otherwise raise `code` and return a
/// placeholder without consuming anything.
pub(crate) fn expr_or(s: &mut Stream<'_, '_>, ctx: ExprContext, code: Code) -> Expr {
    if at_expr_start(s) {
        expr(s, ctx)
    } else {
        let here = s.here();
        s.raise(code, here);
        Expr::empty(here)
    }
}

/// `a..b`, `a..`, `..b`, `..`
fn range(
    s: &mut Stream<'_, '_>,
    ctx: ExprContext,
    next: &impl Fn(&mut Stream<'_, '_>, ExprContext) -> Expr,
) -> Expr {
    let start = if s.at(TokenKind::DotDot) {
        None
    } else {
        let lhs = next(s, ctx);
        if !s.at(TokenKind::DotDot) {
            return lhs;
        }
        Some(Box::new(lhs))
    };
    let Some(dots) = s.match_(TokenKind::DotDot) else {
        return Expr::empty(s.here());
    };
    let end = if at_expr_start(s) && !s.at(TokenKind::DotDot) {
        Some(Box::new(next(s, ctx)))
    } else {
        None
    };
    let first = start.as_ref().map_or(dots.span, |e| e.span);
    let span = s.span_from(first);
    Expr::new(ExprKind::Range { start, end }, span)
}

/// Prefix operators and the derivative prefix.
pub(crate) fn unary(s: &mut Stream<'_, '_>, ctx: ExprContext) -> Expr {
    ensure_sufficient_stack(|| {
        if let Some((start, var)) = derivative_prefix(s) {
            let body = if at_expr_start(s) {
                unary(s, ctx)
            } else {
                let here = s.here();
                s.raise(Code::ExpectedDerivativeBody, here);
                Expr::empty(here)
            };
            let span = s.span_from(start);
            return Expr::new(
                ExprKind::Deriv {
                    var,
                    body: Box::new(body),
                },
                span,
            );
        }

        let Some(op) = s.peek_kind().and_then(UnaryOp::from_token) else {
            return power(s, ctx);
        };
        s.next();
        let start = s.last();
        let operand = if at_expr_start(s) {
            unary(s, ctx)
        } else {
            let here = s.here();
            s.raise(Code::ExpectedOperand, here);
            Expr::empty(here)
        };
        let span = start.merge(operand.span);
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    })
}

/// `postfix ('^' unary)?`; recursion through `unary` makes `^` right
/// associative.
fn power(s: &mut Stream<'_, '_>, ctx: ExprContext) -> Expr {
    let base = postfix(s, ctx);
    if s.match_(TokenKind::Caret).is_none() {
        return base;
    }
    let exponent = if at_expr_start(s) {
        unary(s, ctx)
    } else {
        let here = s.here();
        s.raise(Code::ExpectedOperand, here);
        Expr::empty(here)
    };
    let span = base.span.merge(exponent.span).merge(s.last());
    Expr::new(
        ExprKind::Binary {
            op: BinaryOp::Pow,
            lhs: Box::new(base),
            rhs: Box::new(exponent),
        },
        span,
    )
}

/// Consume `d/dx` (three glued tokens); returns the span of `d` and the
/// variable `x`.
fn derivative_prefix(s: &mut Stream<'_, '_>) -> Option<(Span, Ident)> {
    let (Some(TokenNode::Token(d)), Some(TokenNode::Token(slash)), Some(TokenNode::Token(dx))) =
        (s.peek(), s.peek_nth(1), s.peek_nth(2))
    else {
        return None;
    };
    let shape = d.kind == TokenKind::Ident
        && slash.kind == TokenKind::Slash
        && dx.kind == TokenKind::Ident
        && slash.is_glued()
        && dx.is_glued()
        && s.text(d.span) == "d"
        && s.text(dx.span).len() > 1
        && s.text(dx.span).starts_with('d');
    if !shape {
        return None;
    }
    let (start, dx) = (d.span, *dx);
    s.next();
    s.next();
    s.next();
    Some((start, s.ident_of(dx, 1)))
}
