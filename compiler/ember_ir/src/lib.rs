//! Ember IR: the data shared by every compiler phase.
//!
//! - [`Span`] and [`SourceMap`] for source locations
//! - [`Name`] and [`StringInterner`] for identifiers
//! - [`Token`], [`TokenKind`] and the lexer's [`TokenTree`]
//! - the AST families in [`ast`]
//!
//! The AST is an owned tree (`Box` children). Nodes are built once by the
//! parser and read by the emitter; nothing is shared between nodes.

/// Compile-time assertion that a type has a specific size.
///
/// Guards the small, frequently copied types against layout regressions.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod source;
mod span;
mod token;
mod token_tree;

pub use ast::{BinaryOp, UnaryOp};
pub use interner::StringInterner;
pub use name::Name;
pub use source::{LineCol, SourceChunk, SourceMap};
pub use span::{ChunkId, Span};
pub use token::{Token, TokenFlags, TokenKind, KEYWORDS, OPERATORS, TOKEN_KIND_COUNT};
pub use token_tree::{TokenGroup, TokenNode, TokenTree};
