//! Tokens and the closed token-kind enumeration.
//!
//! Kinds are fieldless so a token stays `Copy` and 16 bytes; literal and
//! identifier text is read back from the span by whoever needs it.
//!
//! Every overloadable operator exists twice: the plain form used by the
//! expression grammar and a *marked* form (written with a leading backtick,
//! `` `+ ``) that names the operator in a function declaration without
//! triggering its parse rule.

use crate::Span;
use bitflags::bitflags;
use std::fmt;

/// Closed set of token kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Identifiers and literals
    Ident,
    /// `@name`: root-scope builtin reference.
    Builtin,
    /// `:name`
    Symbol,
    /// `'name`: loop label.
    Label,
    /// `$name`: external parameter.
    Param,
    Int,
    Hex,
    Float,
    Str,
    /// Opaque foreign text inside a source block.
    SourceText,
    /// `${` inside a source block.
    InterpOpen,

    // Brackets
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// `<` that opens a generic argument list.
    LAngle,
    /// `>` that closes a generic argument list.
    RAngle,

    // Punctuation
    Comma,
    Semi,
    Colon,
    Dot,
    DotDot,
    Assign,
    FatArrow,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    Underscore,

    // Overloadable operators, plain form
    Plus,
    Minus,
    Star,
    Slash,
    Hash,
    Caret,
    Tilde,
    Pipe,
    Amp,
    OrOr,
    AndAnd,
    Backslash,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
    Bang,
    Arrow,
    Percent,
    TildeEq,

    // Overloadable operators, marked form
    MarkedPlus,
    MarkedMinus,
    MarkedStar,
    MarkedSlash,
    MarkedHash,
    MarkedCaret,
    MarkedTilde,
    MarkedPipe,
    MarkedAmp,
    MarkedOrOr,
    MarkedAndAnd,
    MarkedBackslash,
    MarkedEqEq,
    MarkedNotEq,
    MarkedLtEq,
    MarkedGtEq,
    MarkedLt,
    MarkedGt,
    MarkedBang,
    MarkedArrow,
    MarkedPercent,
    MarkedTildeEq,

    // Keywords
    KwFn,
    KwLet,
    KwMut,
    KwConst,
    KwIf,
    KwElse,
    KwMatch,
    KwFor,
    KwIn,
    KwWhile,
    KwLoop,
    KwBreak,
    KwContinue,
    KwReturn,
    KwStruct,
    KwMatrix,
    KwUse,
    KwSource,
    KwAssert,
    KwTrue,
    KwFalse,
    KwPub,
    KwParam,
    KwType,
    KwAs,
    KwWhere,
    KwWith,
    KwAny,
    KwData,
    KwRule,
    KwSelf,
    KwEnum,
    KwTrait,
    KwImpl,
    KwDo,
    KwYield,
    KwImport,
    KwExport,
    KwInline,
    KwExtern,

    /// Unrecognised character; already reported by the lexer.
    Unknown,
}

/// Number of token kinds, for dense bitsets.
pub const TOKEN_KIND_COUNT: usize = TokenKind::Unknown as usize + 1;

/// `(plain, marked, text, export name)` for every overloadable operator.
pub const OPERATORS: [(TokenKind, TokenKind, &str, &str); 22] = {
    use TokenKind::*;
    [
        (Plus, MarkedPlus, "+", "_add"),
        (Minus, MarkedMinus, "-", "_sub"),
        (Star, MarkedStar, "*", "_mul"),
        (Slash, MarkedSlash, "/", "_div"),
        (Hash, MarkedHash, "#", "_hash"),
        (Caret, MarkedCaret, "^", "_pow"),
        (Tilde, MarkedTilde, "~", "_tilde"),
        (Pipe, MarkedPipe, "|", "_bitor"),
        (Amp, MarkedAmp, "&", "_bitand"),
        (OrOr, MarkedOrOr, "||", "_or"),
        (AndAnd, MarkedAndAnd, "&&", "_and"),
        (Backslash, MarkedBackslash, "\\", "_bslash"),
        (EqEq, MarkedEqEq, "==", "_eq"),
        (NotEq, MarkedNotEq, "!=", "_ne"),
        (LtEq, MarkedLtEq, "<=", "_le"),
        (GtEq, MarkedGtEq, ">=", "_ge"),
        (Lt, MarkedLt, "<", "_lt"),
        (Gt, MarkedGt, ">", "_gt"),
        (Bang, MarkedBang, "!", "_not"),
        (Arrow, MarkedArrow, "->", "_arrow"),
        (Percent, MarkedPercent, "%", "_rem"),
        (TildeEq, MarkedTildeEq, "~=", "_approx"),
    ]
};

/// Keyword spellings.
pub const KEYWORDS: [(&str, TokenKind); 40] = {
    use TokenKind::*;
    [
        ("fn", KwFn),
        ("let", KwLet),
        ("mut", KwMut),
        ("const", KwConst),
        ("if", KwIf),
        ("else", KwElse),
        ("match", KwMatch),
        ("for", KwFor),
        ("in", KwIn),
        ("while", KwWhile),
        ("loop", KwLoop),
        ("break", KwBreak),
        ("continue", KwContinue),
        ("return", KwReturn),
        ("struct", KwStruct),
        ("matrix", KwMatrix),
        ("use", KwUse),
        ("source", KwSource),
        ("assert", KwAssert),
        ("true", KwTrue),
        ("false", KwFalse),
        ("pub", KwPub),
        ("param", KwParam),
        ("type", KwType),
        ("as", KwAs),
        ("where", KwWhere),
        ("with", KwWith),
        ("any", KwAny),
        ("data", KwData),
        ("rule", KwRule),
        ("self", KwSelf),
        ("enum", KwEnum),
        ("trait", KwTrait),
        ("impl", KwImpl),
        ("do", KwDo),
        ("yield", KwYield),
        ("import", KwImport),
        ("export", KwExport),
        ("inline", KwInline),
        ("extern", KwExtern),
    ]
};

impl TokenKind {
    /// Keyword for an identifier-shaped word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|&(_, kind)| kind)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (TokenKind::KwFn..=TokenKind::KwExtern).contains(&self)
    }

    /// Keywords with no grammar rule; they cannot be used as identifiers.
    pub fn is_reserved(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwWhile
                | KwLoop
                | KwReturn
                | KwPub
                | KwType
                | KwAs
                | KwWhere
                | KwWith
                | KwAny
                | KwData
                | KwRule
                | KwSelf
                | KwEnum
                | KwTrait
                | KwImpl
                | KwDo
                | KwYield
                | KwImport
                | KwExport
                | KwInline
                | KwExtern
        )
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        (TokenKind::Plus..=TokenKind::TildeEq).contains(&self)
    }

    #[inline]
    pub fn is_marked(self) -> bool {
        (TokenKind::MarkedPlus..=TokenKind::MarkedTildeEq).contains(&self)
    }

    /// Marked form of a plain overloadable operator.
    pub fn marked(self) -> Option<TokenKind> {
        OPERATORS
            .iter()
            .find(|op| op.0 == self)
            .map(|op| op.1)
    }

    /// Plain form of a marked operator.
    pub fn unmarked(self) -> Option<TokenKind> {
        OPERATORS
            .iter()
            .find(|op| op.1 == self)
            .map(|op| op.0)
    }

    /// Canonical cross-module name of an overloadable operator, for either
    /// form (`+` and `` `+ `` both give `_add`).
    pub fn export_name(self) -> Option<&'static str> {
        OPERATORS
            .iter()
            .find(|op| op.0 == self || op.1 == self)
            .map(|op| op.3)
    }

    #[inline]
    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::LAngle
                | TokenKind::InterpOpen
        )
    }

    #[inline]
    pub fn is_close_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::RAngle
        )
    }

    /// Closing kind that matches an opening bracket.
    pub fn closing(self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LBrace | TokenKind::InterpOpen => Some(TokenKind::RBrace),
            TokenKind::LAngle => Some(TokenKind::RAngle),
            _ => None,
        }
    }

    /// Literal value or identifier-like: a following glued `:` is a type
    /// annotation colon rather than a symbol prefix.
    pub fn ends_value(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Ident
                | Builtin
                | Symbol
                | Param
                | Int
                | Hex
                | Float
                | Str
                | RParen
                | RBracket
                | RBrace
                | RAngle
                | KwTrue
                | KwFalse
        )
    }

    /// Fixed spelling, or a description for kinds with variable text.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        if let Some(op) = OPERATORS.iter().find(|op| op.0 == self) {
            return op.2;
        }
        if let Some(&(text, _)) = KEYWORDS.iter().find(|kw| kw.1 == self) {
            return text;
        }
        match self {
            Ident => "identifier",
            Builtin => "builtin",
            Symbol => "symbol",
            Label => "label",
            Param => "parameter",
            Int | Hex => "integer",
            Float => "float",
            Str => "string",
            SourceText => "source text",
            InterpOpen => "${",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            LAngle => "<",
            RAngle => ">",
            Comma => ",",
            Semi => ";",
            Colon => ":",
            Dot => ".",
            DotDot => "..",
            Assign => "=",
            FatArrow => "=>",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            Underscore => "_",
            k if k.is_marked() => "overloaded operator",
            _ => "unknown token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Per-token metadata.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// Synthesized for error recovery; not present in the source.
        const VIRTUAL = 1 << 0;
        /// No whitespace or comment separates this token from the previous one.
        const GLUED = 1 << 1;
    }
}

/// A lexical unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub flags: TokenFlags,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            flags: TokenFlags::empty(),
            span,
        }
    }

    /// Synthetic token placed at `span` for error recovery.
    #[inline]
    pub const fn virtual_at(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            flags: TokenFlags::VIRTUAL,
            span,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_virtual(self) -> bool {
        self.flags.contains(TokenFlags::VIRTUAL)
    }

    #[inline]
    pub fn is_glued(self) -> bool {
        self.flags.contains(TokenFlags::GLUED)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind, self.span)?;
        if self.is_virtual() {
            f.write_str("!")?;
        }
        Ok(())
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Token, TokenKind};
    crate::static_assert_size!(TokenKind, 1);
    crate::static_assert_size!(Token, 16);
}
