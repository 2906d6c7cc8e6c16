//! Lexer for Ember.
//!
//! [`lex`] turns one source chunk into a [`TokenTree`]: brackets are matched
//! during the same scan that produces tokens, so every `(`, `[`, `{`, generic
//! `<` and interpolation `${` becomes a [`TokenGroup`](ember_ir::TokenGroup)
//! holding its contents. Lexing never fails; problems are pushed into the
//! caller's [`Issues`] and a best-effort token is kept so the parser can
//! continue.

mod escape;
mod lexer;
mod raw_token;

pub use escape::{string_body, unescape};

use ember_diagnostic::Issues;
use ember_ir::{ChunkId, TokenTree};
use tracing::debug;

/// Lex `source` (the text of chunk `chunk`) into a token tree.
#[tracing::instrument(level = "debug", skip_all, fields(chunk = chunk.raw(), bytes = source.len()))]
pub fn lex(source: &str, chunk: ChunkId, issues: &mut Issues) -> TokenTree {
    let before = issues.len();
    let tree = lexer::Lexer::new(source, chunk, issues).run();
    debug!(
        top_level = tree.nodes.len(),
        issues = issues.len() - before,
        "lexed"
    );
    tree
}
