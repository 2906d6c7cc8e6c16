//! Statements, `let` patterns and loop jumps.

use crate::{Emitter, Payload, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{AssignOp, Block, Expr, Ident, Pat, PatKind, Stmt, StmtKind};
use ember_stack::ensure_sufficient_stack;
use ember_types::{Constant, StructType, Target, Type};
use std::rc::Rc;

impl Emitter<'_> {
    /// Emit the statements of `block` into the current scope and lower its
    /// tail (`void` without one).
    pub fn block_body(&mut self, block: &Block) -> CompileResult<Value> {
        for stmt in &block.stmts {
            self.stmt(stmt)?;
        }
        match &block.tail {
            Some(tail) => self.expr(tail),
            None => Ok(self.void_value()),
        }
    }

    pub fn stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        ensure_sufficient_stack(|| self.stmt_inner(stmt).map_err(|e| e.at(stmt.span)))
    }

    fn stmt_inner(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Empty => Ok(()),
            StmtKind::Let { pat, ty, value } => {
                let mut v = self.expr(value)?;
                if let Some(ty) = ty {
                    let ty = self.resolve_ty(ty)?;
                    v = self.expect(v, &ty, value.span)?;
                }
                if !pat.is_irrefutable() {
                    return Err(CompileError::issue("refutable pattern in `let`").at(pat.span));
                }
                self.bind_pattern(pat, v)
            }
            StmtKind::Assign { op, target, value } => self.assign(*op, target, value),
            StmtKind::Expr(expr) => {
                let v = self.expr(expr)?;
                self.discard(&v)
            }
            StmtKind::Assert(cond) => self.assert(cond),
            StmtKind::Break(label) => self.jump("break", *label),
            StmtKind::Continue(label) => self.jump("continue", *label),
        }
    }

    /// Evaluate a value only for its effects.
    pub(crate) fn discard(&mut self, value: &Value) -> CompileResult<()> {
        if let Payload::Code(text) = &value.payload {
            if !value.is_simple() {
                self.line(format!("{text};"));
            }
        }
        Ok(())
    }

    fn assign(&mut self, op: AssignOp, target: &Expr, value: &Expr) -> CompileResult<()> {
        let place = self.expr(target)?;
        let rhs = self.expr(value)?;
        if place.ty.is_void() {
            return self.discard(&rhs);
        }
        if !place.assignable {
            return Err(CompileError::issue("cannot assign to this expression").at(target.span));
        }
        let rhs = match op.binary() {
            Some(bin) => self.operator(bin.export_name(), bin.symbol(), vec![place.clone(), rhs], value.span)?,
            None => rhs,
        };
        let rhs = self.expect(rhs, &place.ty, value.span)?;
        let place_text = self.text(&place)?;
        let rhs_text = self.owned_text(&rhs)?;
        self.line(format!("{place_text} = {rhs_text};"));
        Ok(())
    }

    pub(crate) fn assert(&mut self, cond: &Expr) -> CompileResult<()> {
        let value = self.expr(cond)?;
        let value = self.expect(value, &Type::BOOL, cond.span)?;
        match value.as_const() {
            Some(Constant::Bool(true)) => Ok(()),
            Some(_) => Err(CompileError::issue("assertion failed").at(cond.span)),
            None => {
                if self.target == Target::Js {
                    let text = self.text(&value)?;
                    self.line(format!("if (!({text})) throw new Error(\"assertion failed\");"));
                }
                Ok(())
            }
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<Ident>) -> CompileResult<()> {
        let innermost = self.frame.loops.len().checked_sub(1);
        let found = match label {
            None => innermost,
            Some(label) => self.frame.loops.iter().rposition(|l| l.label == Some(label.name)),
        };
        let Some(index) = found else {
            return Err(match label {
                Some(label) => CompileError::issue(format!("no enclosing loop is labelled `'{}`", self.name(label.name))),
                None => CompileError::issue(format!("`{keyword}` outside of a loop")),
            });
        };
        if Some(index) == innermost {
            self.line(format!("{keyword};"));
            return Ok(());
        }
        match self.frame.loops[index].backend.clone() {
            Some(backend) => {
                self.line(format!("{keyword} {backend};"));
                Ok(())
            }
            None => Err(CompileError::todo(format!("labelled `{keyword}` on {}", self.target))),
        }
    }

    // === Patterns ===

    /// Bind the names of an irrefutable (or already tested) pattern.
    pub(crate) fn bind_pattern(&mut self, pat: &Pat, value: Value) -> CompileResult<()> {
        match &pat.kind {
            PatKind::Ignore => self.discard(&value),
            PatKind::Lit(_) => Ok(()),
            PatKind::Bind { name, mutable } => self.bind_local(*name, *mutable, value),
            PatKind::Struct { name, fields, rest } => {
                let strukt = self.pattern_struct(*name, &value.ty)?;
                if !rest {
                    self.check_fields_mentioned(&strukt, fields.iter().map(|f| f.name.name), pat)?;
                }
                let value = self.cache(value)?;
                for field in fields {
                    let index = self.pattern_field(&strukt, field.name)?;
                    let projected = self.field(&value, index)?;
                    self.bind_pattern(&field.pat, projected)?;
                }
                Ok(())
            }
            PatKind::Array { items, rest } => {
                self.check_array_pattern(&value.ty, items.len(), *rest)?;
                let value = self.cache(value)?;
                for (i, item) in items.iter().enumerate() {
                    let element = self.index(value.clone(), Value::int(i32::try_from(i).unwrap_or(i32::MAX)))?;
                    self.bind_pattern(item, element)?;
                }
                Ok(())
            }
        }
    }

    fn bind_local(&mut self, name: ember_ir::Name, mutable: bool, value: Value) -> CompileResult<()> {
        if value.ty.is_void() {
            let zero = self.zero(&value.ty);
            self.bind(name, Value::constant(zero, value.ty));
            return Ok(());
        }
        if !mutable && (value.is_const() || (value.is_simple() && !value.assignable)) {
            self.bind(name, value);
            return Ok(());
        }
        let stem = self.name(name);
        let backend = self.fresh(stem);
        let init = if mutable || value.assignable { self.owned_text(&value)? } else { self.text(&value)? };
        self.declare_var(&backend, &value.ty, Some(&init), mutable);
        let local = if mutable {
            Value::place(backend, value.ty)
        } else {
            Value::code(backend, value.ty)
        };
        self.bind(name, local);
        Ok(())
    }

    /// The struct a pattern names, which must be exactly the value's type.
    pub(crate) fn pattern_struct(&self, name: Ident, ty: &Type) -> CompileResult<Rc<StructType>> {
        match self.program.decls.ty(name.name) {
            Some(Type::Struct(s)) if Type::Struct(s.clone()) == *ty => Ok(s.clone()),
            Some(Type::Struct(s)) => Err(CompileError::issue(format!(
                "pattern of type `{}` cannot match a value of type `{ty}`",
                s.name
            ))
            .at(name.span)),
            Some(other) => Err(CompileError::issue(format!("`{other}` is not a struct")).at(name.span)),
            None => Err(CompileError::issue(format!("unknown type `{}`", self.name(name.name))).at(name.span)),
        }
    }

    pub(crate) fn pattern_field(&self, strukt: &StructType, field: Ident) -> CompileResult<usize> {
        strukt.field_index(field.name).ok_or_else(|| {
            CompileError::issue(format!("`{}` has no field `{}`", strukt.name, self.name(field.name))).at(field.span)
        })
    }

    fn check_fields_mentioned(
        &self,
        strukt: &StructType,
        mut mentioned: impl Iterator<Item = ember_ir::Name> + Clone,
        pat: &Pat,
    ) -> CompileResult<()> {
        for field in &strukt.fields {
            if !mentioned.clone().any(|n| n == field.name) {
                return Err(CompileError::issue(format!(
                    "pattern does not mention field `{}`; add `..` to ignore it",
                    self.name(field.name)
                ))
                .at(pat.span));
            }
        }
        if let Some(extra) = mentioned.find(|n| strukt.field_index(*n).is_none()) {
            return Err(CompileError::issue(format!("`{}` has no field `{}`", strukt.name, self.name(extra))).at(pat.span));
        }
        Ok(())
    }

    pub(crate) fn check_array_pattern(&self, ty: &Type, items: usize, rest: bool) -> CompileResult<()> {
        let Some(array) = ty.as_array() else {
            return Err(CompileError::issue(format!("array pattern cannot match a value of type `{ty}`")));
        };
        let len = array.len as usize;
        if items > len || (!rest && items != len) {
            return Err(CompileError::issue(format!(
                "array pattern with {items} element{} cannot match `{ty}`",
                if items == 1 { "" } else { "s" }
            )));
        }
        Ok(())
    }
}
