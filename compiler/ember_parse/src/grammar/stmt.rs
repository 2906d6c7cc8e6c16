//! Blocks and statements.

use super::expr::{expr, expr_or};
use super::pattern::pat_or;
use super::primary::at_expr_start;
use super::ty::ty_or;
use super::ExprContext;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{AssignOp, Block, Expr, Stmt, StmtKind};
use ember_ir::{TokenGroup, TokenKind};
use ember_stack::ensure_sufficient_stack;

/// Contents of a `{ .. }` group: statements and an optional tail.
pub(crate) fn block<'t>(s: &mut Stream<'t, '_>, group: &'t TokenGroup) -> Block {
    ensure_sufficient_stack(|| {
        let mut sub = s.sub(group);
        let mut stmts = Vec::new();
        let mut tail = None;
        while !sub.at_end() {
            let start = sub.here();
            let kind = match sub.peek_kind() {
                Some(TokenKind::Semi) => {
                    sub.next();
                    StmtKind::Empty
                }
                Some(TokenKind::KwLet) => let_stmt(&mut sub),
                Some(TokenKind::KwAssert) => {
                    sub.next();
                    let cond = expr_or(&mut sub, ExprContext::DEFAULT, Code::ExpectedAssertCondition);
                    sub.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
                    StmtKind::Assert(cond)
                }
                Some(TokenKind::KwBreak | TokenKind::KwContinue) => {
                    let keyword = sub.next().map(|node| node.kind());
                    let label = sub.match_(TokenKind::Label).map(|t| sub.ident_of(t, 1));
                    sub.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
                    if keyword == Some(TokenKind::KwBreak) {
                        StmtKind::Break(label)
                    } else {
                        StmtKind::Continue(label)
                    }
                }
                _ if at_expr_start(&sub) => {
                    let value = expr(&mut sub, ExprContext::DEFAULT);
                    match expr_stmt(&mut sub, value) {
                        Ok(kind) => kind,
                        Err(value) => {
                            tail = Some(Box::new(value));
                            break;
                        }
                    }
                }
                _ => {
                    let span = sub.next().map_or(start, |node| node.span());
                    sub.raise(Code::ExpectedExpression, span);
                    StmtKind::Empty
                }
            };
            stmts.push(Stmt::new(kind, sub.span_from(start)));
        }
        Block {
            stmts,
            tail,
            span: group.span(),
        }
    })
}

/// Finish a statement that began with an expression. Returns the
/// expression back when it is the block's tail.
fn expr_stmt(s: &mut Stream<'_, '_>, target: Expr) -> Result<StmtKind, Expr> {
    if let Some(op) = s.peek_kind().and_then(AssignOp::from_token) {
        s.next();
        let value = expr_or(s, ExprContext::DEFAULT, Code::ExpectedAssignValue);
        s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
        return Ok(StmtKind::Assign { op, target, value });
    }
    if s.match_(TokenKind::Semi).is_some() {
        return Ok(StmtKind::Expr(target));
    }
    if s.at_end() {
        return Err(target);
    }
    if !target.is_block_like() {
        let here = s.here();
        s.raise(Code::ExpectedSemicolon, here);
    }
    Ok(StmtKind::Expr(target))
}

/// `let pat (: T)? = value;`
fn let_stmt(s: &mut Stream<'_, '_>) -> StmtKind {
    s.next();
    let pat = pat_or(s, Code::ExpectedLetPattern);
    let ty = s
        .match_(TokenKind::Colon)
        .map(|_| ty_or(s, Code::ExpectedType));
    s.match_or(TokenKind::Assign, Code::ExpectedEquals);
    let value = expr_or(s, ExprContext::DEFAULT, Code::ExpectedExpression);
    s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
    StmtKind::Let { pat, ty, value }
}
