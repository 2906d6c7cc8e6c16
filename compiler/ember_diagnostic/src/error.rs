use ember_ir::Span;
use std::fmt;
use thiserror::Error;

/// Severity convention for fail-fast errors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// The program is wrong.
    Issue,
    /// The program uses something the compiler does not support yet.
    Todo,
    /// The compiler broke one of its own invariants.
    Bug,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Issue => "error",
            ErrorKind::Todo => "not yet supported",
            ErrorKind::Bug => "internal compiler error",
        })
    }
}

/// First semantic error of a compilation; emission stops here.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

pub type CompileResult<T> = Result<T, CompileError>;

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CompileError {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn issue(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Issue, message)
    }

    pub fn todo(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Todo, message)
    }

    pub fn bug(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Bug, message)
    }

    /// Attach a location unless a more precise one is already set.
    /// Virtual spans are not locations.
    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_virtual() {
            self.span = Some(span);
        }
        self
    }

    #[inline]
    pub fn is_bug(&self) -> bool {
        self.kind == ErrorKind::Bug
    }
}

#[cfg(test)]
mod tests;
