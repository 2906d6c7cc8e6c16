//! Diagnostics for the Ember compiler.
//!
//! Two regimes, matching the two halves of the pipeline:
//!
//! - The lexer and parser are error tolerant. They push [`Issue`]s (a stable
//!   [`Code`] plus a span) into an [`Issues`] sink and keep going.
//! - Type resolution and emission fail fast with a [`CompileError`], whose
//!   [`ErrorKind`] separates user errors from unimplemented features and
//!   compiler defects.
//!
//! [`emitter`] renders both forms for a terminal.

mod code;
pub mod emitter;
mod error;
mod issue;

pub use code::Code;
pub use error::{CompileError, CompileResult, ErrorKind};
pub use issue::{Issue, Issues};
