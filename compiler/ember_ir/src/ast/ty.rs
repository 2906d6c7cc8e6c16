use super::{Expr, Ident};
use crate::Span;

/// Type expression.
#[derive(Clone, PartialEq, Debug)]
pub struct Ty {
    pub kind: TyKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TyKind {
    /// Placeholder after a parse error.
    Empty,
    /// `vec2`, `Pair<f32>`
    Named { name: Ident, args: Vec<Ty> },
    /// `[T; len]`; `len` must fold to a constant.
    Array { of: Box<Ty>, len: Box<Expr> },
    /// `A | B`: members of one struct group.
    Alt(Vec<Ty>),
}

impl Ty {
    #[inline]
    pub fn new(kind: TyKind, span: Span) -> Self {
        Ty { kind, span }
    }

    #[inline]
    pub fn empty(span: Span) -> Self {
        Ty {
            kind: TyKind::Empty,
            span,
        }
    }
}
