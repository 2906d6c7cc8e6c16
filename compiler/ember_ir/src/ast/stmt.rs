use super::{AssignOp, Expr, Ident, Pat, Ty};
use crate::Span;

#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Stray `;`, or the placeholder after a parse error.
    Empty,
    Let {
        pat: Pat,
        ty: Option<Ty>,
        value: Expr,
    },
    Assign {
        op: AssignOp,
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
    Assert(Expr),
    Break(Option<Ident>),
    Continue(Option<Ident>),
}

/// `{ stmt* tail? }`
#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// Trailing expression without `;`: the block's value.
    pub tail: Option<Box<Expr>>,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl Block {
    pub fn empty(span: Span) -> Self {
        Block {
            stmts: Vec::new(),
            tail: None,
            span,
        }
    }
}
