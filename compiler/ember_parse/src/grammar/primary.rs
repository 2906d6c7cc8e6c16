//! Primary expressions, postfix chains and the block-like forms.

use super::expr::expr_or;
use super::pattern::pat_or;
use super::stmt::block;
use super::ty::ty_or;
use super::ExprContext;
use crate::recovery::EXPR_START;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{
    Block, Expr, ExprKind, FieldInit, Lit, MatchArm, SourceBlock, SourcePart, StructHead,
};
use ember_ir::{Span, Token, TokenGroup, TokenKind, TokenNode};

/// An expression can start at the next token. Marked operators and
/// reserved keywords count so that they get their own diagnostics.
pub(crate) fn at_expr_start(s: &Stream<'_, '_>) -> bool {
    s.at_set(EXPR_START)
        || s.peek_kind()
            .is_some_and(|kind| kind.is_marked() || kind.is_reserved())
}

/// Primary followed by calls, generic calls, field access, method calls
/// and indexing. Block-like primaries take no postfix.
pub(crate) fn postfix(s: &mut Stream<'_, '_>, ctx: ExprContext) -> Expr {
    let mut base = primary(s, ctx);
    if base.is_block_like() {
        return base;
    }
    loop {
        if let Some(group) = s.match_group(TokenKind::LParen) {
            let args = call_args(s, group);
            let span = base.span.merge(group.span());
            base = Expr::new(
                ExprKind::Call {
                    callee: Box::new(base),
                    type_args: Vec::new(),
                    args,
                },
                span,
            );
        } else if let Some(angle) = s.match_group(TokenKind::LAngle) {
            let type_args = s
                .comma_list(angle, Some(Code::EmptyTypeArgs), false, |s| {
                    ty_or(s, Code::ExpectedType)
                })
                .items;
            let args = match s.match_group(TokenKind::LParen) {
                Some(group) => call_args(s, group),
                None => {
                    let here = s.here();
                    s.raise(Code::ExpectedCallArgs, here);
                    Vec::new()
                }
            };
            let span = s.span_from(base.span);
            base = Expr::new(
                ExprKind::Call {
                    callee: Box::new(base),
                    type_args,
                    args,
                },
                span,
            );
        } else if s.match_(TokenKind::Dot).is_some() {
            let start = base.span;
            let field = s.ident_or(Code::ExpectedFieldAfterDot);
            let kind = match s.match_group(TokenKind::LParen) {
                Some(group) => ExprKind::MethodCall {
                    receiver: Box::new(base),
                    method: field,
                    args: call_args(s, group),
                },
                None => ExprKind::Field {
                    base: Box::new(base),
                    field,
                },
            };
            base = Expr::new(kind, s.span_from(start));
        } else if let Some(group) = s.match_group(TokenKind::LBracket) {
            let mut sub = s.sub(group);
            let index = expr_or(&mut sub, ExprContext::DEFAULT, Code::ExpectedIndex);
            sub.finish();
            let span = base.span.merge(group.span());
            base = Expr::new(
                ExprKind::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                },
                span,
            );
        } else {
            return base;
        }
    }
}

fn call_args<'t>(s: &mut Stream<'t, '_>, group: &'t TokenGroup) -> Vec<Expr> {
    s.comma_list(group, None, false, |s| {
        expr_or(s, ExprContext::DEFAULT, Code::ExpectedExpression)
    })
    .items
}

fn primary(s: &mut Stream<'_, '_>, ctx: ExprContext) -> Expr {
    let here = s.here();
    let Some(node) = s.peek() else {
        s.raise(Code::ExpectedExpression, here);
        return Expr::empty(here);
    };
    let token = match node {
        TokenNode::Group(group) => {
            s.next();
            return group_expr(s, group);
        }
        TokenNode::Token(token) => *token,
    };

    let kind = token.kind;
    match kind {
        TokenKind::Int | TokenKind::Hex | TokenKind::Float | TokenKind::KwTrue | TokenKind::KwFalse => {
            s.next();
            let lit = literal(s, token, false);
            Expr::new(ExprKind::Lit(lit), token.span)
        }
        TokenKind::Ident => {
            s.next();
            let ident = s.ident_of(token, 0);
            if ctx.struct_lit && s.at_group(TokenKind::LBrace) {
                return struct_lit(s, StructHead::Named(ident), token.span);
            }
            Expr::new(ExprKind::Ident(ident.name), token.span)
        }
        TokenKind::Symbol => {
            s.next();
            let ident = s.ident_of(token, 1);
            if ctx.struct_lit && s.at_group(TokenKind::LBrace) {
                return struct_lit(s, StructHead::Symbol(ident), token.span);
            }
            Expr::new(ExprKind::Symbol(ident.name), token.span)
        }
        TokenKind::Builtin => {
            s.next();
            let ident = s.ident_of(token, 1);
            Expr::new(ExprKind::Builtin(ident.name), token.span)
        }
        TokenKind::Param => {
            s.next();
            let ident = s.ident_of(token, 1);
            Expr::new(ExprKind::Param(ident.name), token.span)
        }
        TokenKind::KwIf => if_expr(s),
        TokenKind::KwMatch => match_expr(s),
        TokenKind::KwFor | TokenKind::Label => for_expr(s),
        TokenKind::KwSource => source_expr(s),
        _ if kind.is_marked() => {
            s.next();
            s.raise(Code::MarkedOperatorOutsideFn, token.span);
            Expr::empty(token.span)
        }
        _ if kind.is_reserved() => {
            s.next();
            s.raise(Code::ReservedKeyword, token.span);
            let ident = s.ident_of(token, 0);
            Expr::new(ExprKind::Ident(ident.name), token.span)
        }
        _ => {
            s.raise(Code::ExpectedExpression, here);
            Expr::empty(here)
        }
    }
}

/// Decode a literal token. `negate` folds a preceding `-` (patterns only),
/// which lets `-2147483648` through.
pub(crate) fn literal(s: &mut Stream<'_, '_>, token: Token, negate: bool) -> Lit {
    let text = s.text(token.span);
    match token.kind {
        TokenKind::KwTrue => Lit::Bool(true),
        TokenKind::KwFalse => Lit::Bool(false),
        TokenKind::Int => {
            let value = text
                .parse::<i64>()
                .ok()
                .map(|v| if negate { -v } else { v })
                .and_then(|v| i32::try_from(v).ok());
            value.map_or_else(
                || {
                    s.raise(Code::IntegerTooLarge, token.span);
                    Lit::Int(0)
                },
                Lit::Int,
            )
        }
        TokenKind::Hex => {
            let digits = text.get(2..).unwrap_or("");
            match u32::from_str_radix(digits, 16) {
                Ok(bits) => {
                    let value = i32::from_ne_bytes(bits.to_ne_bytes());
                    Lit::Int(if negate { value.wrapping_neg() } else { value })
                }
                Err(_) => {
                    s.raise(Code::IntegerTooLarge, token.span);
                    Lit::Int(0)
                }
            }
        }
        _ => match text.parse::<f64>() {
            Ok(value) => Lit::Float(if negate { -value } else { value }),
            Err(_) => {
                s.raise(Code::InvalidNumber, token.span);
                Lit::Float(0.0)
            }
        },
    }
}

/// `( expr )`, `[ a, b ]` or `{ block }`.
fn group_expr<'t>(s: &mut Stream<'t, '_>, group: &'t TokenGroup) -> Expr {
    let span = group.span();
    match group.open.kind {
        TokenKind::LParen => {
            let mut sub = s.sub(group);
            let mut inner = expr_or(&mut sub, ExprContext::DEFAULT, Code::ExpectedExpression);
            sub.finish();
            inner.span = span;
            inner
        }
        TokenKind::LBracket => {
            let items = s
                .comma_list(group, None, false, |s| {
                    expr_or(s, ExprContext::DEFAULT, Code::ExpectedExpression)
                })
                .items;
            Expr::new(ExprKind::Array(items), span)
        }
        TokenKind::LBrace => Expr::new(ExprKind::Block(Box::new(block(s, group))), span),
        _ => {
            s.raise(Code::ExpectedExpression, span);
            Expr::empty(span)
        }
    }
}

fn struct_lit(s: &mut Stream<'_, '_>, head: StructHead, start: Span) -> Expr {
    let Some(group) = s.match_group(TokenKind::LBrace) else {
        return Expr::empty(start);
    };
    let fields = s
        .comma_list(group, None, false, |s| {
            let name = s.ident_or(Code::ExpectedStructField);
            let value = if s.match_(TokenKind::Colon).is_some() {
                expr_or(s, ExprContext::DEFAULT, Code::ExpectedFieldValue)
            } else {
                Expr::new(ExprKind::Ident(name.name), name.span)
            };
            FieldInit { name, value }
        })
        .items;
    Expr::new(ExprKind::StructLit { head, fields }, s.span_from(start))
}

/// Brace-delimited body, or an empty block after `code`.
pub(crate) fn block_or(s: &mut Stream<'_, '_>, code: Code) -> Block {
    match s.match_group(TokenKind::LBrace) {
        Some(group) => block(s, group),
        None => {
            let here = s.here();
            s.raise(code, here);
            Block::empty(here)
        }
    }
}

fn if_expr(s: &mut Stream<'_, '_>) -> Expr {
    let start = s.match_or(TokenKind::KwIf, Code::UnexpectedToken).span;
    let cond = expr_or(s, ExprContext::CONDITION, Code::ExpectedCondition);
    let then_block = block_or(s, Code::ExpectedBlock);
    let else_branch = if s.match_(TokenKind::KwElse).is_some() {
        if s.at(TokenKind::KwIf) {
            Some(Box::new(if_expr(s)))
        } else if let Some(group) = s.match_group(TokenKind::LBrace) {
            let body = block(s, group);
            Some(Box::new(Expr::new(ExprKind::Block(Box::new(body)), group.span())))
        } else {
            let here = s.here();
            s.raise(Code::ExpectedElseBranch, here);
            None
        }
    } else {
        None
    };
    Expr::new(
        ExprKind::If {
            cond: Box::new(cond),
            then_block: Box::new(then_block),
            else_branch,
        },
        s.span_from(start),
    )
}

fn match_expr(s: &mut Stream<'_, '_>) -> Expr {
    let start = s.match_or(TokenKind::KwMatch, Code::UnexpectedToken).span;
    let subject = expr_or(s, ExprContext::CONDITION, Code::ExpectedExpression);
    let arms = match s.match_group(TokenKind::LBrace) {
        Some(group) => {
            s.comma_list(group, Some(Code::EmptyMatch), false, |s| {
                let pat = pat_or(s, Code::ExpectedPattern);
                s.match_or(TokenKind::FatArrow, Code::ExpectedFatArrow);
                let body = expr_or(s, ExprContext::DEFAULT, Code::ExpectedExpression);
                let span = pat.span.merge(body.span);
                MatchArm { pat, body, span }
            })
            .items
        }
        None => {
            let here = s.here();
            s.raise(Code::ExpectedMatchBody, here);
            Vec::new()
        }
    };
    Expr::new(
        ExprKind::Match {
            subject: Box::new(subject),
            arms,
        },
        s.span_from(start),
    )
}

/// `'label? for pat in iter { .. }`
fn for_expr(s: &mut Stream<'_, '_>) -> Expr {
    let start = s.here();
    let label = s.match_(TokenKind::Label).map(|token| s.ident_of(token, 1));
    if s.match_(TokenKind::KwFor).is_none() {
        let here = s.here();
        s.raise(Code::ExpectedForAfterLabel, here);
        return Expr::empty(s.span_from(start));
    }
    let pat = pat_or(s, Code::ExpectedPattern);
    s.match_or(TokenKind::KwIn, Code::ExpectedIn);
    let iter = expr_or(s, ExprContext::CONDITION, Code::ExpectedIterable);
    let body = block_or(s, Code::ExpectedBlock);
    Expr::new(
        ExprKind::For {
            label,
            pat,
            iter: Box::new(iter),
            body: Box::new(body),
        },
        s.span_from(start),
    )
}

/// `source target? { text ${expr} text }`
fn source_expr(s: &mut Stream<'_, '_>) -> Expr {
    let start = s.match_or(TokenKind::KwSource, Code::UnexpectedToken).span;
    let target = s.match_(TokenKind::Ident).map(|token| s.ident_of(token, 0));
    let Some(group) = s.match_group(TokenKind::LBrace) else {
        let here = s.here();
        s.raise(Code::ExpectedSourceBody, here);
        return Expr::new(
            ExprKind::Source(SourceBlock {
                target,
                parts: Vec::new(),
            }),
            s.span_from(start),
        );
    };
    let mut parts = Vec::new();
    let mut sub = s.sub(group);
    while let Some(node) = sub.next() {
        match node {
            TokenNode::Token(token) if token.kind == TokenKind::SourceText => {
                parts.push(SourcePart::Text(sub.text(token.span).to_owned()));
            }
            TokenNode::Group(interp) if interp.open.kind == TokenKind::InterpOpen => {
                let mut inner = sub.sub(interp);
                let value = expr_or(&mut inner, ExprContext::DEFAULT, Code::ExpectedExpression);
                inner.finish();
                parts.push(SourcePart::Interp(value));
            }
            other => {
                let span = other.span();
                sub.raise(Code::UnexpectedToken, span);
            }
        }
    }
    Expr::new(ExprKind::Source(SourceBlock { target, parts }), s.span_from(start))
}
