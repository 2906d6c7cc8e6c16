use super::{BinaryOp, Block, Ident, Lit, Pat, Ty, UnaryOp};
use crate::{Name, Span};

/// Expression node.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Placeholder after a parse error.
    Empty,
    Lit(Lit),
    Ident(Name),
    /// `@name`
    Builtin(Name),
    /// `$name`
    Param(Name),
    /// `:name`
    Symbol(Name),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `d/dx body`
    Deriv {
        var: Ident,
        body: Box<Expr>,
    },
    /// `a..b`, either side optional.
    Range {
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
    },
    /// `f(args)` or `f<T>(args)`.
    Call {
        callee: Box<Expr>,
        type_args: Vec<Ty>,
        args: Vec<Expr>,
    },
    /// `recv.method(args)`, sugar for `method(recv, args)`.
    MethodCall {
        receiver: Box<Expr>,
        method: Ident,
        args: Vec<Expr>,
    },
    Field {
        base: Box<Expr>,
        field: Ident,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    StructLit {
        head: StructHead,
        fields: Vec<FieldInit>,
    },
    Array(Vec<Expr>),
    Block(Box<Block>),
    If {
        cond: Box<Expr>,
        then_block: Box<Block>,
        /// A `Block` or a nested `If`.
        else_branch: Option<Box<Expr>>,
    },
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    For {
        label: Option<Ident>,
        pat: Pat,
        iter: Box<Expr>,
        body: Box<Block>,
    },
    Source(SourceBlock),
}

/// What a struct literal constructs.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StructHead {
    /// `Name { .. }`
    Named(Ident),
    /// `:sym { .. }`: anonymous struct tagged by a symbol.
    Symbol(Ident),
}

/// `name: value`, or shorthand `name` (value is the identifier itself).
#[derive(Clone, PartialEq, Debug)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Clone, PartialEq, Debug)]
pub struct MatchArm {
    pub pat: Pat,
    pub body: Expr,
    pub span: Span,
}

/// `source js { ... ${expr} ... }`
#[derive(Clone, PartialEq, Debug)]
pub struct SourceBlock {
    pub target: Option<Ident>,
    pub parts: Vec<SourcePart>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SourcePart {
    Text(String),
    Interp(Expr),
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    #[inline]
    pub fn empty(span: Span) -> Self {
        Expr {
            kind: ExprKind::Empty,
            span,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }

    /// Block-like expressions end a statement without a `;`.
    pub fn is_block_like(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Block(_)
                | ExprKind::If { .. }
                | ExprKind::Match { .. }
                | ExprKind::For { .. }
                | ExprKind::Source(_)
        )
    }
}
