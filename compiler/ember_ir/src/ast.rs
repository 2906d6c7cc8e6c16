//! Abstract syntax tree.
//!
//! Five closed node families ([`Expr`], [`Ty`], [`Pat`], [`Stmt`], [`Item`])
//! plus the small structures they share. Every node carries a span and owns
//! its children. The parser never returns a missing child: failures become
//! placeholder variants (`ExprKind::Empty`, `TyKind::Empty`,
//! `PatKind::Ignore`) next to an issue.

mod expr;
mod item;
mod operators;
mod pat;
mod stmt;
mod ty;

pub use expr::{Expr, ExprKind, FieldInit, MatchArm, SourceBlock, SourcePart, StructHead};
pub use item::{
    ConstDecl, FieldDecl, FnDecl, FnName, FnParam, Item, ItemKind, ParamDecl, Script, StructDecl,
    StructGroup, UseDecl,
};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use pat::{FieldPat, Pat, PatKind};
pub use stmt::{Block, Stmt, StmtKind};
pub use ty::{Ty, TyKind};

use crate::{Name, Span};

/// An identifier with its location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ident {
    pub name: Name,
    pub span: Span,
}

impl Ident {
    #[inline]
    pub const fn new(name: Name, span: Span) -> Self {
        Ident { name, span }
    }
}

/// Literal value, already decoded from its token text.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Lit {
    Int(i32),
    Float(f64),
    Bool(bool),
}
