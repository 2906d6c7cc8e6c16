//! Top-level items.

use super::expr::expr_or;
use super::primary::block_or;
use super::ty::ty_or;
use super::ExprContext;
use crate::recovery::ITEM_START;
use crate::stream::Stream;
use ember_diagnostic::Code;
use ember_ir::ast::{
    ConstDecl, FieldDecl, FnDecl, FnName, FnParam, Ident, Item, ItemKind, ParamDecl, Script,
    StructDecl, StructGroup, UseDecl,
};
use ember_ir::{Name, TokenKind, TokenNode};
use tracing::trace;

/// Every item up to the end of the stream.
pub(crate) fn script(s: &mut Stream<'_, '_>) -> Script {
    let mut items = Vec::new();
    while !s.at_end() {
        let start = s.here();
        let kind = match s.peek_kind() {
            Some(TokenKind::KwUse) => use_decl(s),
            Some(TokenKind::KwFn) => ItemKind::Fn(fn_decl(s)),
            Some(TokenKind::KwStruct | TokenKind::KwMatrix) => ItemKind::Struct(struct_group(s)),
            Some(TokenKind::KwConst) => const_decl(s),
            Some(TokenKind::KwParam) => param_decl(s),
            Some(TokenKind::KwAssert) => {
                s.next();
                let cond = expr_or(s, ExprContext::DEFAULT, Code::ExpectedAssertCondition);
                s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
                ItemKind::Assert(cond)
            }
            _ => {
                let span = s.next().map_or(start, TokenNode::span);
                s.raise(Code::ExpectedItem, span);
                s.skip_until(ITEM_START);
                ItemKind::Empty
            }
        };
        let item = Item::new(kind, s.span_from(start));
        trace!(span = ?item.span, "item");
        items.push(item);
    }
    Script { items }
}

/// `use "name";`
fn use_decl(s: &mut Stream<'_, '_>) -> ItemKind {
    s.next();
    let kind = match s.match_(TokenKind::Str) {
        Some(token) => ItemKind::Use(UseDecl {
            name: ember_lexer::unescape(ember_lexer::string_body(s.text(token.span))),
            name_span: token.span,
        }),
        None => {
            let here = s.here();
            s.raise(Code::ExpectedModuleName, here);
            ItemKind::Empty
        }
    };
    s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
    kind
}

fn fn_decl(s: &mut Stream<'_, '_>) -> FnDecl {
    s.next();
    let name = match s.peek() {
        Some(TokenNode::Token(token)) if token.kind.is_marked() => {
            s.next();
            FnName::Operator {
                op: token.kind.unmarked().unwrap_or(token.kind),
                span: token.span,
            }
        }
        _ => FnName::Ident(s.ident_or(Code::ExpectedFnName)),
    };
    let generics = match s.match_group(TokenKind::LAngle) {
        Some(group) => {
            s.comma_list(group, Some(Code::EmptyGenericParams), false, |s| {
                s.ident_or(Code::ExpectedGenericName)
            })
            .items
        }
        None => Vec::new(),
    };
    let params = match s.match_group(TokenKind::LParen) {
        Some(group) => {
            s.comma_list(group, None, false, |s| {
                let name = s.ident_or(Code::ExpectedParamName);
                s.match_or(TokenKind::Colon, Code::ExpectedColon);
                let ty = ty_or(s, Code::ExpectedParamType);
                FnParam { name, ty }
            })
            .items
        }
        None => {
            let here = s.here();
            s.raise(Code::ExpectedParamList, here);
            Vec::new()
        }
    };
    let ret = s
        .match_(TokenKind::Arrow)
        .map(|_| ty_or(s, Code::ExpectedReturnType));
    let body = block_or(s, Code::ExpectedFnBody);
    FnDecl {
        name,
        generics,
        params,
        ret,
        body,
    }
}

/// `struct A { .. } | B { .. };` or `matrix M { .. };`
fn struct_group(s: &mut Stream<'_, '_>) -> StructGroup {
    let matrix = s.next().is_some_and(|node| node.kind() == TokenKind::KwMatrix);
    let mut variants = Vec::new();
    loop {
        let name = s.ident_or(Code::ExpectedStructName);
        let fields = match s.match_group(TokenKind::LBrace) {
            Some(group) => {
                s.comma_list(group, None, false, |s| {
                    let name = s.ident_or(Code::ExpectedFieldName);
                    s.match_or(TokenKind::Colon, Code::ExpectedColon);
                    let ty = ty_or(s, Code::ExpectedFieldType);
                    FieldDecl { name, ty }
                })
                .items
            }
            None => {
                let here = s.here();
                s.raise(Code::ExpectedStructBody, here);
                Vec::new()
            }
        };
        variants.push(StructDecl {
            name,
            fields,
            span: s.span_from(name.span),
        });
        if s.match_(TokenKind::Pipe).is_none() {
            break;
        }
        if !s.at(TokenKind::Ident) {
            let here = s.here();
            s.raise(Code::ExpectedVariant, here);
            break;
        }
    }
    s.match_(TokenKind::Semi);
    StructGroup { matrix, variants }
}

/// `const NAME (: T)? = value;`
fn const_decl(s: &mut Stream<'_, '_>) -> ItemKind {
    s.next();
    let name = s.ident_or(Code::ExpectedConstName);
    let ty = s
        .match_(TokenKind::Colon)
        .map(|_| ty_or(s, Code::ExpectedType));
    s.match_or(TokenKind::Assign, Code::ExpectedEquals);
    let value = expr_or(s, ExprContext::DEFAULT, Code::ExpectedExpression);
    s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
    ItemKind::Const(ConstDecl { name, ty, value })
}

/// `param $name: T;`
fn param_decl(s: &mut Stream<'_, '_>) -> ItemKind {
    s.next();
    let name = match s.match_any(&[TokenKind::Param, TokenKind::Ident]) {
        Some(token) if token.kind == TokenKind::Param => s.ident_of(token, 1),
        Some(token) => {
            s.raise(Code::ExpectedParamDecl, token.span);
            s.ident_of(token, 0)
        }
        None => {
            let here = s.here();
            s.raise(Code::ExpectedParamDecl, here);
            Ident::new(Name::EMPTY, here)
        }
    };
    s.match_or(TokenKind::Colon, Code::ExpectedColon);
    let ty = ty_or(s, Code::ExpectedType);
    s.match_or(TokenKind::Semi, Code::ExpectedSemicolon);
    ItemKind::Param(ParamDecl { name, ty })
}
