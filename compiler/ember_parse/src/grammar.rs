//! Grammar productions, one module per node family.
//!
//! Every production takes the stream it should read from and returns a
//! node; on failure it raises an issue and returns a placeholder.

mod expr;
mod item;
mod pattern;
mod primary;
mod stmt;
mod ty;

pub(crate) use expr::expr_or;
pub(crate) use item::script;

/// Expression-position flags threaded through the recursive descent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExprContext {
    /// `Name { .. }` and `:sym { .. }` parse as struct literals. Off in
    /// condition positions so `if x { .. }` keeps its block.
    pub struct_lit: bool,
}

impl ExprContext {
    pub const DEFAULT: ExprContext = ExprContext { struct_lit: true };
    pub const CONDITION: ExprContext = ExprContext { struct_lit: false };
}
