//! First-pass tokens produced by logos.
//!
//! Raw tokens are context free. Everything that depends on neighbours
//! (glued `<`, `x:f32` versus `:sym`, overload markers, keywords) is
//! resolved when the raw token is converted in [`crate::lexer`].

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    /// Identifier or keyword, including a lone `_`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Builtin,
    /// `:name`; may still turn out to be a colon plus an identifier.
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*")]
    ColonWord,
    #[regex(r"'[A-Za-z_][A-Za-z0-9_]*")]
    Label,
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Param,
    /// `@`, `'` or `$` with no name after it.
    #[token("@")]
    #[token("'")]
    #[token("$")]
    BarePrefix,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    Str,
    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    UnterminatedStr,

    /// Overload marker.
    #[token("`")]
    Backtick,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("=")]
    Assign,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("#")]
    Hash,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("\\")]
    Backslash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("->")]
    Arrow,
    #[token("%")]
    Percent,
    #[token("~=")]
    TildeEq,
}

impl RawToken {
    /// Token kind for raw tokens that map one to one.
    pub(crate) fn simple_kind(self) -> Option<ember_ir::TokenKind> {
        use ember_ir::TokenKind as K;
        Some(match self {
            RawToken::Hex => K::Hex,
            RawToken::Int => K::Int,
            RawToken::Float => K::Float,
            RawToken::Builtin => K::Builtin,
            RawToken::Label => K::Label,
            RawToken::Param => K::Param,
            RawToken::Comma => K::Comma,
            RawToken::Semi => K::Semi,
            RawToken::Colon => K::Colon,
            RawToken::Dot => K::Dot,
            RawToken::DotDot => K::DotDot,
            RawToken::Assign => K::Assign,
            RawToken::FatArrow => K::FatArrow,
            RawToken::PlusAssign => K::PlusAssign,
            RawToken::MinusAssign => K::MinusAssign,
            RawToken::StarAssign => K::StarAssign,
            RawToken::SlashAssign => K::SlashAssign,
            RawToken::Plus => K::Plus,
            RawToken::Minus => K::Minus,
            RawToken::Star => K::Star,
            RawToken::Slash => K::Slash,
            RawToken::Hash => K::Hash,
            RawToken::Caret => K::Caret,
            RawToken::Tilde => K::Tilde,
            RawToken::Pipe => K::Pipe,
            RawToken::Amp => K::Amp,
            RawToken::OrOr => K::OrOr,
            RawToken::AndAnd => K::AndAnd,
            RawToken::Backslash => K::Backslash,
            RawToken::EqEq => K::EqEq,
            RawToken::NotEq => K::NotEq,
            RawToken::LtEq => K::LtEq,
            RawToken::GtEq => K::GtEq,
            RawToken::Lt => K::Lt,
            RawToken::Gt => K::Gt,
            RawToken::Bang => K::Bang,
            RawToken::Arrow => K::Arrow,
            RawToken::Percent => K::Percent,
            RawToken::TildeEq => K::TildeEq,
            RawToken::LParen => K::LParen,
            RawToken::RParen => K::RParen,
            RawToken::LBracket => K::LBracket,
            RawToken::RBracket => K::RBracket,
            RawToken::LBrace => K::LBrace,
            RawToken::RBrace => K::RBrace,
            _ => return None,
        })
    }
}
