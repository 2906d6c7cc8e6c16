use super::{Block, Expr, Ident, Ty};
use crate::{Span, TokenKind};

#[derive(Clone, PartialEq, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ItemKind {
    /// Placeholder after a parse error.
    Empty,
    Use(UseDecl),
    Fn(FnDecl),
    Struct(StructGroup),
    Const(ConstDecl),
    Param(ParamDecl),
    Assert(Expr),
}

/// `use "name";`
#[derive(Clone, PartialEq, Debug)]
pub struct UseDecl {
    /// Unescaped module name.
    pub name: String,
    pub name_span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FnDecl {
    pub name: FnName,
    /// Explicit type parameters; a non-empty list makes this a template.
    pub generics: Vec<Ident>,
    pub params: Vec<FnParam>,
    /// `None` means the function returns `void`.
    pub ret: Option<Ty>,
    pub body: Block,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FnName {
    Ident(Ident),
    /// `` fn `+(..) ``; holds the plain operator kind.
    Operator { op: TokenKind, span: Span },
}

impl FnName {
    pub fn span(self) -> Span {
        match self {
            FnName::Ident(ident) => ident.span,
            FnName::Operator { span, .. } => span,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FnParam {
    pub name: Ident,
    pub ty: Ty,
}

/// `struct A {..} | B {..};` or `matrix M {..};`
#[derive(Clone, PartialEq, Debug)]
pub struct StructGroup {
    pub matrix: bool,
    pub variants: Vec<StructDecl>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct StructDecl {
    pub name: Ident,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: Ty,
}

/// `const NAME: T = expr;`
#[derive(Clone, PartialEq, Debug)]
pub struct ConstDecl {
    pub name: Ident,
    pub ty: Option<Ty>,
    pub value: Expr,
}

/// `param $name: T;`
#[derive(Clone, PartialEq, Debug)]
pub struct ParamDecl {
    pub name: Ident,
    pub ty: Ty,
}

/// A parsed compilation unit.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Script {
    pub items: Vec<Item>,
}

impl Item {
    #[inline]
    pub fn new(kind: ItemKind, span: Span) -> Self {
        Item { kind, span }
    }
}
