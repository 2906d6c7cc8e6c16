//! Type expressions.

use crate::recovery::TYPE_START;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{Expr, Ty, TyKind};
use ember_ir::TokenKind;

use super::expr::expr_or;
use super::ExprContext;

/// A type if one starts here; otherwise raise `code` and return a
/// placeholder.
pub(crate) fn ty_or(s: &mut Stream<'_, '_>, code: Code) -> Ty {
    if !s.at_set(TYPE_START) {
        let here = s.here();
        s.raise(code, here);
        return Ty::empty(here);
    }
    let first = atom(s);
    if !s.at(TokenKind::Pipe) {
        return first;
    }
    let start = first.span;
    let mut members = vec![first];
    while s.match_(TokenKind::Pipe).is_some() {
        members.push(atom_or(s));
    }
    Ty::new(TyKind::Alt(members), s.span_from(start))
}

fn atom_or(s: &mut Stream<'_, '_>) -> Ty {
    if s.at_set(TYPE_START) {
        atom(s)
    } else {
        let here = s.here();
        s.raise(Code::ExpectedType, here);
        Ty::empty(here)
    }
}

/// `Name`, `Name<T, ..>` or `[T; len]`.
fn atom(s: &mut Stream<'_, '_>) -> Ty {
    if let Some(group) = s.match_group(TokenKind::LBracket) {
        let mut sub = s.sub(group);
        let of = ty_or(&mut sub, Code::ExpectedType);
        let len = if sub.match_(TokenKind::Semi).is_some() {
            expr_or(&mut sub, ExprContext::DEFAULT, Code::ExpectedArrayLength)
        } else {
            let here = sub.here();
            sub.raise(Code::ExpectedArrayLength, here);
            Expr::empty(here)
        };
        sub.finish();
        return Ty::new(
            TyKind::Array {
                of: Box::new(of),
                len: Box::new(len),
            },
            group.span(),
        );
    }
    let name = s.ident_or(Code::ExpectedType);
    let args = match s.match_group(TokenKind::LAngle) {
        Some(group) => {
            s.comma_list(group, Some(Code::EmptyTypeArgs), false, |s| {
                ty_or(s, Code::ExpectedType)
            })
            .items
        }
        None => Vec::new(),
    };
    Ty::new(TyKind::Named { name, args }, s.span_from(name.span))
}
