//! Token sets for error recovery and lookahead.

use ember_ir::{TokenKind, TOKEN_KIND_COUNT};

const _: () = assert!(TOKEN_KIND_COUNT <= 128);

/// Set of token kinds as a `u128` bitset, one bit per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    #[inline]
    pub const fn new() -> Self {
        TokenSet(0)
    }

    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1u128 << kind.index()))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u128 << kind.index()) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Tokens that begin an item; the parser skips to one of these after an
/// unrecognised item.
pub const ITEM_START: TokenSet = TokenSet::new()
    .with(TokenKind::KwFn)
    .with(TokenKind::KwStruct)
    .with(TokenKind::KwMatrix)
    .with(TokenKind::KwConst)
    .with(TokenKind::KwParam)
    .with(TokenKind::KwAssert)
    .with(TokenKind::KwUse);

const LITERALS: TokenSet = TokenSet::new()
    .with(TokenKind::Int)
    .with(TokenKind::Hex)
    .with(TokenKind::Float)
    .with(TokenKind::KwTrue)
    .with(TokenKind::KwFalse);

/// Tokens an expression can start with.
pub const EXPR_START: TokenSet = LITERALS
    .with(TokenKind::Ident)
    .with(TokenKind::Builtin)
    .with(TokenKind::Symbol)
    .with(TokenKind::Label)
    .with(TokenKind::Param)
    .with(TokenKind::LParen)
    .with(TokenKind::LBracket)
    .with(TokenKind::LBrace)
    .with(TokenKind::Minus)
    .with(TokenKind::Bang)
    .with(TokenKind::Hash)
    .with(TokenKind::DotDot)
    .with(TokenKind::KwIf)
    .with(TokenKind::KwMatch)
    .with(TokenKind::KwFor)
    .with(TokenKind::KwSource);

/// Tokens a pattern can start with.
pub const PAT_START: TokenSet = LITERALS
    .with(TokenKind::Ident)
    .with(TokenKind::Underscore)
    .with(TokenKind::KwMut)
    .with(TokenKind::Minus)
    .with(TokenKind::LBracket);

/// Tokens a type can start with.
pub const TYPE_START: TokenSet = TokenSet::new()
    .with(TokenKind::Ident)
    .with(TokenKind::LBracket);

#[cfg(test)]
mod tests;
