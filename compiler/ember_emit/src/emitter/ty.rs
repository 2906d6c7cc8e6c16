//! Type expressions.

use crate::Emitter;
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{Expr, Ty, TyKind};
use ember_types::{Constant, Type};
use std::rc::Rc;

impl Emitter<'_> {
    /// Resolve a type expression in the current scope.
    pub fn resolve_ty(&mut self, ty: &Ty) -> CompileResult<Type> {
        self.resolve_ty_inner(ty).map_err(|e| e.at(ty.span))
    }

    fn resolve_ty_inner(&mut self, ty: &Ty) -> CompileResult<Type> {
        match &ty.kind {
            TyKind::Empty => Err(CompileError::bug("type placeholder reached emission")),
            TyKind::Named { name, args } => {
                let text = self.name(name.name);
                if !args.is_empty() {
                    return Err(CompileError::issue(format!("type `{text}` takes no type arguments")));
                }
                if let Some(bound) = self.frame.type_params.get(&name.name) {
                    return Ok(bound.clone());
                }
                self.program
                    .decls
                    .ty(name.name)
                    .cloned()
                    .ok_or_else(|| CompileError::issue(format!("unknown type `{text}`")))
            }
            TyKind::Array { of, len } => {
                let of = self.resolve_ty(of)?;
                let len = self.array_len(len)?;
                Type::array(of, len)
            }
            TyKind::Alt(members) => {
                let mut structs = Vec::new();
                for member in members {
                    match self.resolve_ty(member)? {
                        Type::Struct(s) => structs.push(s),
                        Type::Alt(alt) => structs.extend(alt.members.iter().map(Rc::clone)),
                        other => {
                            return Err(CompileError::issue(format!(
                                "alternatives must be structs, found `{other}`"
                            ))
                            .at(member.span))
                        }
                    }
                }
                Type::alt(structs)
            }
        }
    }

    /// Array lengths go through the normal emitter and must fold to a
    /// positive `i32` without emitting anything.
    fn array_len(&mut self, len: &Expr) -> CompileResult<u32> {
        let (value, lines) = self.scoped(|e| e.expr(len))?;
        match value.as_const() {
            Some(Constant::Int(n)) if lines.is_empty() && *n > 0 => Ok(n.unsigned_abs()),
            Some(Constant::Int(n)) if lines.is_empty() => {
                Err(CompileError::issue(format!("array length must be positive, found {n}")).at(len.span))
            }
            _ if value.ty != Type::I32 => {
                Err(CompileError::issue(format!("array length must be an `i32`, found `{}`", value.ty)).at(len.span))
            }
            _ => Err(CompileError::issue("array length must be a compile-time constant").at(len.span)),
        }
    }
}
