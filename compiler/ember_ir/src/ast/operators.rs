use crate::TokenKind;
use std::fmt;

/// Binary operators, including the right-associative `^`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    /// `\`
    LeftDiv,
    Add,
    Sub,
    /// `~`
    Concat,
    /// `->`
    Arrow,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    /// `~=`
    Approx,
    BitAnd,
    BitOr,
    And,
    Or,
    Pow,
}

impl BinaryOp {
    /// Operator spelled by a plain operator token.
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Backslash => BinaryOp::LeftDiv,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Tilde => BinaryOp::Concat,
            TokenKind::Arrow => BinaryOp::Arrow,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::TildeEq => BinaryOp::Approx,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::OrOr => BinaryOp::Or,
            TokenKind::Caret => BinaryOp::Pow,
            _ => return None,
        })
    }

    /// The plain token that spells this operator.
    pub fn token(self) -> TokenKind {
        match self {
            BinaryOp::Mul => TokenKind::Star,
            BinaryOp::Div => TokenKind::Slash,
            BinaryOp::Rem => TokenKind::Percent,
            BinaryOp::LeftDiv => TokenKind::Backslash,
            BinaryOp::Add => TokenKind::Plus,
            BinaryOp::Sub => TokenKind::Minus,
            BinaryOp::Concat => TokenKind::Tilde,
            BinaryOp::Arrow => TokenKind::Arrow,
            BinaryOp::Lt => TokenKind::Lt,
            BinaryOp::Gt => TokenKind::Gt,
            BinaryOp::LtEq => TokenKind::LtEq,
            BinaryOp::GtEq => TokenKind::GtEq,
            BinaryOp::Eq => TokenKind::EqEq,
            BinaryOp::NotEq => TokenKind::NotEq,
            BinaryOp::Approx => TokenKind::TildeEq,
            BinaryOp::BitAnd => TokenKind::Amp,
            BinaryOp::BitOr => TokenKind::Pipe,
            BinaryOp::And => TokenKind::AndAnd,
            BinaryOp::Or => TokenKind::OrOr,
            BinaryOp::Pow => TokenKind::Caret,
        }
    }

    #[inline]
    pub fn symbol(self) -> &'static str {
        self.token().as_str()
    }

    /// Name the operator's overload set is registered under (`_add`, ...).
    pub fn export_name(self) -> &'static str {
        self.token().export_name().unwrap_or("_unknown")
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
    /// `#x`: component count.
    Count,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Hash => Some(UnaryOp::Count),
            _ => None,
        }
    }

    pub fn token(self) -> TokenKind {
        match self {
            UnaryOp::Neg => TokenKind::Minus,
            UnaryOp::Not => TokenKind::Bang,
            UnaryOp::Count => TokenKind::Hash,
        }
    }

    #[inline]
    pub fn symbol(self) -> &'static str {
        self.token().as_str()
    }

    /// Shares the overload set of the binary spelling; arity tells them apart.
    pub fn export_name(self) -> &'static str {
        self.token().export_name().unwrap_or("_unknown")
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `=`, `+=`, `-=`, `*=`, `/=`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        match kind {
            TokenKind::Assign => Some(AssignOp::Set),
            TokenKind::PlusAssign => Some(AssignOp::Add),
            TokenKind::MinusAssign => Some(AssignOp::Sub),
            TokenKind::StarAssign => Some(AssignOp::Mul),
            TokenKind::SlashAssign => Some(AssignOp::Div),
            _ => None,
        }
    }

    /// Operator a compound assignment applies before storing.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
        }
    }
}
