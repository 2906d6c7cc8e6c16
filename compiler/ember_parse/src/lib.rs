//! Parser for Ember.
//!
//! The parser walks the [`TokenTree`] produced by `ember_lexer`. Brackets
//! are already matched, so every production that enters a group works on a
//! child [`Stream`] bounded by that group and cannot run past its closer.
//! Parsing never fails: each missing element raises an issue and leaves a
//! placeholder node, so the returned [`Script`] is always complete.

mod grammar;
mod recovery;
mod stream;

pub use recovery::TokenSet;
pub use stream::{CommaList, Src, Stream};

use ember_diagnostic::{Code, Issues};
use ember_ir::ast::{Expr, Script};
use ember_ir::{ChunkId, StringInterner, TokenTree};
use grammar::ExprContext;
use tracing::debug;

/// Parse a lexed chunk into a script.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.nodes.len()))]
pub fn parse(
    tree: &TokenTree,
    source: &str,
    interner: &StringInterner,
    issues: &mut Issues,
) -> Script {
    let before = issues.len();
    let src = Src {
        text: source,
        interner,
    };
    let mut stream = Stream::new(&tree.nodes, tree.end, src, issues);
    let script = grammar::script(&mut stream);
    debug!(
        items = script.items.len(),
        issues = issues.len() - before,
        "parsed"
    );
    script
}

/// Lex and parse one chunk.
pub fn parse_source(
    source: &str,
    chunk: ChunkId,
    interner: &StringInterner,
    issues: &mut Issues,
) -> Script {
    let tree = ember_lexer::lex(source, chunk, issues);
    parse(&tree, source, interner, issues)
}

/// Lex and parse a single expression; anything after it is reported.
pub fn parse_expr(
    source: &str,
    chunk: ChunkId,
    interner: &StringInterner,
    issues: &mut Issues,
) -> Expr {
    let tree = ember_lexer::lex(source, chunk, issues);
    let src = Src {
        text: source,
        interner,
    };
    let mut stream = Stream::new(&tree.nodes, tree.end, src, issues);
    let expr = grammar::expr_or(&mut stream, ExprContext::DEFAULT, Code::ExpectedExpression);
    stream.finish();
    expr
}

#[cfg(test)]
mod tests;
