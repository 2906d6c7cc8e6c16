use super::{Ident, Lit};
use crate::{Name, Span};

/// Pattern in `let`, `for` and `match`.
#[derive(Clone, PartialEq, Debug)]
pub struct Pat {
    pub kind: PatKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PatKind {
    /// `_`, and the placeholder after a parse error.
    Ignore,
    Bind { name: Name, mutable: bool },
    /// Literal, with `-` already folded in.
    Lit(Lit),
    /// `Name { a, b: pat, .. }`
    Struct {
        name: Ident,
        fields: Vec<FieldPat>,
        rest: bool,
    },
    /// `[a, b, ..]`
    Array { items: Vec<Pat>, rest: bool },
}

/// `field` or `field: pat`. The shorthand binds a local named after the field.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldPat {
    pub name: Ident,
    pub pat: Pat,
}

impl Pat {
    #[inline]
    pub fn new(kind: PatKind, span: Span) -> Self {
        Pat { kind, span }
    }

    #[inline]
    pub fn ignore(span: Span) -> Self {
        Pat {
            kind: PatKind::Ignore,
            span,
        }
    }

    /// Matches every value of its type.
    pub fn is_irrefutable(&self) -> bool {
        match &self.kind {
            PatKind::Ignore | PatKind::Bind { .. } => true,
            PatKind::Lit(_) => false,
            PatKind::Struct { fields, .. } => fields.iter().all(|f| f.pat.is_irrefutable()),
            PatKind::Array { items, .. } => items.iter().all(Pat::is_irrefutable),
        }
    }
}
