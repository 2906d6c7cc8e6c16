//! Patterns for `let`, `for` and `match`.

use super::primary::literal;
use crate::recovery::PAT_START;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{FieldPat, Pat, PatKind};
use ember_ir::{TokenKind, TokenNode};

/// A pattern if one starts here; otherwise raise `code` and return `_`.
pub(crate) fn pat_or(s: &mut Stream<'_, '_>, code: Code) -> Pat {
    if s.at_set(PAT_START) {
        pat(s)
    } else {
        let here = s.here();
        s.raise(code, here);
        Pat::ignore(here)
    }
}

fn pat(s: &mut Stream<'_, '_>) -> Pat {
    let here = s.here();
    if let Some(group) = s.match_group(TokenKind::LBracket) {
        let list = s.comma_list(group, None, true, |s| pat_or(s, Code::ExpectedPattern));
        return Pat::new(
            PatKind::Array {
                items: list.items,
                rest: list.rest,
            },
            group.span(),
        );
    }
    let Some(TokenNode::Token(token)) = s.next() else {
        s.raise(Code::ExpectedPattern, here);
        return Pat::ignore(here);
    };
    let token = *token;
    match token.kind {
        TokenKind::Underscore => Pat::ignore(token.span),
        TokenKind::KwMut => {
            let name = s.ident_or(Code::ExpectedIdent);
            Pat::new(
                PatKind::Bind {
                    name: name.name,
                    mutable: true,
                },
                s.span_from(token.span),
            )
        }
        TokenKind::Ident => {
            let name = s.ident_of(token, 0);
            let Some(group) = s.match_group(TokenKind::LBrace) else {
                return Pat::new(
                    PatKind::Bind {
                        name: name.name,
                        mutable: false,
                    },
                    token.span,
                );
            };
            let list = s.comma_list(group, None, true, |s| {
                let field = s.ident_or(Code::ExpectedFieldName);
                let pat = if s.match_(TokenKind::Colon).is_some() {
                    pat_or(s, Code::ExpectedPattern)
                } else {
                    Pat::new(
                        PatKind::Bind {
                            name: field.name,
                            mutable: false,
                        },
                        field.span,
                    )
                };
                FieldPat { name: field, pat }
            });
            Pat::new(
                PatKind::Struct {
                    name,
                    fields: list.items,
                    rest: list.rest,
                },
                s.span_from(token.span),
            )
        }
        TokenKind::Minus => match s.match_any(&[TokenKind::Int, TokenKind::Hex, TokenKind::Float]) {
            Some(lit) => {
                let value = literal(s, lit, true);
                Pat::new(PatKind::Lit(value), s.span_from(token.span))
            }
            None => {
                let at = s.here();
                s.raise(Code::ExpectedLiteralAfterMinus, at);
                Pat::ignore(token.span)
            }
        },
        _ => {
            let value = literal(s, token, false);
            Pat::new(PatKind::Lit(value), token.span)
        }
    }
}
