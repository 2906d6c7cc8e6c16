//! Expressions.

use crate::{deriv, CallArgs, Candidate, Emitter, ParamTy, Payload, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{Expr, ExprKind, FieldInit, Ident, Lit, StructHead, Ty};
use ember_ir::{Name, Span};
use ember_stack::ensure_sufficient_stack;
use ember_types::{Constant, Field, Repr, StructType, Target, Type};
use std::rc::Rc;

impl Emitter<'_> {
    /// Lower an expression to a value.
    pub fn expr(&mut self, expr: &Expr) -> CompileResult<Value> {
        ensure_sufficient_stack(|| self.expr_inner(expr).map_err(|e| e.at(expr.span)))
    }

    fn expr_inner(&mut self, expr: &Expr) -> CompileResult<Value> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Empty => Err(CompileError::bug("expression placeholder reached emission")),
            ExprKind::Lit(lit) => Ok(literal(*lit)),
            ExprKind::Ident(name) => self.ident(*name, span),
            ExprKind::Builtin(name) => self.builtin(*name, span),
            ExprKind::Param(name) => self.param(*name),
            ExprKind::Symbol(name) => {
                let ty = self.symbol_type(*name)?;
                Ok(Value::constant(Constant::VOID, ty))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                self.operator(op.export_name(), op.symbol(), vec![lhs, rhs], span)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.expr(operand)?;
                self.operator(op.export_name(), op.symbol(), vec![operand], span)
            }
            ExprKind::Deriv { var, body } => {
                let derivative = deriv::differentiate(body, var.name, self.interner)?;
                self.expr(&derivative)
            }
            ExprKind::Range { .. } => Err(CompileError::issue("a range is only allowed as a `for` iterable")),
            ExprKind::Call { callee, type_args, args } => self.call_expr(callee, type_args, args, span),
            ExprKind::MethodCall { receiver, method, args } => {
                let mut values = vec![self.expr(receiver)?];
                for arg in args {
                    values.push(self.expr(arg)?);
                }
                self.call(method.name, values, Vec::new(), span)
            }
            ExprKind::Field { base, field } => {
                let base = self.expr(base)?;
                self.field_expr(base, *field)
            }
            ExprKind::Index { base, index } => {
                let base = self.expr(base)?;
                let index = self.expr(index)?;
                self.index(base, index)
            }
            ExprKind::StructLit { head, fields } => self.struct_lit(*head, fields),
            ExprKind::Array(items) => self.array_lit(items),
            ExprKind::Block(block) => self.nested(|e| e.block_body(block)),
            ExprKind::If {
                cond,
                then_block,
                else_branch,
            } => self.if_expr(cond, then_block, else_branch.as_deref()),
            ExprKind::Match { subject, arms } => self.match_expr(subject, arms, span),
            ExprKind::For { label, pat, iter, body } => self.for_expr(*label, pat, iter, body),
            ExprKind::Source(_) => Err(CompileError::issue(
                "`source` blocks are only allowed as the whole body of a function",
            )),
        }
    }

    // === Names ===

    fn ident(&mut self, name: Name, span: Span) -> CompileResult<Value> {
        if let Some(value) = self.local(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.program.decls.constant(name) {
            return Ok(value.clone());
        }
        if self.program.decls.has_fn(name) {
            return self.call(name, Vec::new(), Vec::new(), span);
        }
        let text = self.name(name);
        if self.program.decls.ty(name).is_some() {
            return Err(CompileError::issue(format!("`{text}` is a type, not a value")));
        }
        Err(CompileError::issue(format!("undefined name `{text}`")))
    }

    /// `@name`: the prelude binding, whatever the program shadows.
    fn builtin(&mut self, name: Name, span: Span) -> CompileResult<Value> {
        let root = self.program.decls.root();
        if let Some(value) = root.constant(name) {
            return Ok(value.clone());
        }
        let candidates = root.candidates(name);
        let display = format!("@{}", self.name(name));
        self.dispatch(&display, &candidates, Vec::new(), Vec::new(), span)
    }

    /// `$name`: an external parameter, always runtime.
    fn param(&mut self, name: Name) -> CompileResult<Value> {
        let text = self.name(name);
        let ty = self
            .program
            .decls
            .param(name)
            .cloned()
            .ok_or_else(|| CompileError::issue(format!("undeclared parameter `${text}`")))?;
        Ok(match self.target {
            Target::Glsl => Value::code(format!("u_{text}"), ty),
            Target::Js => Value::code(format!("${text}"), ty),
        })
    }

    /// Zero-sized struct type of `:name`, created on first use.
    pub(crate) fn symbol_type(&mut self, name: Name) -> CompileResult<Type> {
        if let Some(ty) = self.program.decls.symbol(name) {
            return Ok(ty.clone());
        }
        let label = format!(":{}", self.name(name));
        let s = StructType::declare(label, Vec::new(), false, &mut self.program.ids)?;
        let ty = Type::Struct(s);
        self.program.decls.add_symbol(name, ty.clone());
        Ok(ty)
    }

    // === Calls ===

    fn call_expr(&mut self, callee: &Expr, type_args: &[Ty], args: &[Expr], span: Span) -> CompileResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.expr(arg)?);
        }
        let mut types = Vec::with_capacity(type_args.len());
        for ty in type_args {
            types.push(self.resolve_ty(ty)?);
        }
        match &callee.kind {
            ExprKind::Ident(name) => {
                if self.local(*name).is_some() && !self.program.decls.has_fn(*name) {
                    return Err(CompileError::issue(format!("`{}` is a local value, not a function", self.name(*name))));
                }
                self.call(*name, values, types, span)
            }
            ExprKind::Builtin(name) => {
                let candidates = self.program.decls.root().candidates(*name);
                let display = format!("@{}", self.name(*name));
                self.dispatch(&display, &candidates, values, types, span)
            }
            _ => Err(CompileError::issue("only named functions can be called").at(callee.span)),
        }
    }

    /// Call the overload set `name` visible from the current scope.
    pub fn call(&mut self, name: Name, args: Vec<Value>, type_args: Vec<Type>, span: Span) -> CompileResult<Value> {
        let candidates = self.program.decls.candidates(name);
        let display = self.name(name);
        self.dispatch(display, &candidates, args, type_args, span)
    }

    /// Call the operator overload set registered under `export`.
    pub fn operator(&mut self, export: &str, symbol: &str, args: Vec<Value>, span: Span) -> CompileResult<Value> {
        let candidates = self.program.decls.candidates(self.intern(export));
        self.dispatch(symbol, &candidates, args, Vec::new(), span)
    }

    fn dispatch(
        &mut self,
        display: &str,
        candidates: &[Candidate],
        args: Vec<Value>,
        type_args: Vec<Type>,
        span: Span,
    ) -> CompileResult<Value> {
        let types: Vec<Type> = args.iter().map(|a| a.ty.clone()).collect();
        let f = crate::resolve(display, candidates, &types)?.clone();
        if f.generics != type_args.len() {
            return Err(if f.generics == 0 {
                CompileError::issue(format!("`{display}` takes no type arguments"))
            } else {
                CompileError::issue(format!(
                    "`{display}` needs {} explicit type argument{}, found {}",
                    f.generics,
                    if f.generics == 1 { "" } else { "s" },
                    type_args.len()
                ))
            });
        }
        let mut converted = Vec::with_capacity(args.len());
        for (arg, param) in args.into_iter().zip(&f.params) {
            converted.push(match &param.ty {
                ParamTy::Exact(ty) => self.convert(arg, ty)?,
                ParamTy::Vector(kind) if arg.ty.vector_shape().map(|(k, _)| k) != Some(*kind) => {
                    self.convert(arg, &Type::Scalar(*kind))?
                }
                ParamTy::Vector(_) | ParamTy::Any => arg,
            });
        }
        f.call(
            self,
            CallArgs {
                args: converted,
                type_args,
                span,
            },
        )
    }

    // === Projections ===

    fn field_expr(&mut self, base: Value, field: Ident) -> CompileResult<Value> {
        if let Some((index, _)) = base.ty.field(field.name) {
            return self.field(&base, index);
        }
        let text = self.name(field.name);
        if let Some(indices) = swizzle_indices(text) {
            if let Some((_, width)) = base.ty.vector_shape() {
                if indices.iter().all(|&i| i < width) {
                    return self.swizzle(base, &indices);
                }
            }
        }
        Err(CompileError::issue(format!("`{}` has no field `{text}`", base.ty)).at(field.span))
    }

    /// `.xy`, `.zyx`, `.rgba`... on a vector-shaped value.
    pub fn swizzle(&mut self, base: Value, indices: &[u8]) -> CompileResult<Value> {
        let (kind, _) = base
            .ty
            .vector_shape()
            .ok_or_else(|| CompileError::bug("swizzle of a non-vector"))?;
        let width = u8::try_from(indices.len()).unwrap_or(u8::MAX);
        let ty = self.vector_type(kind, width)?;
        let native = matches!(base.ty.repr(self.target), Repr::Vector { width, .. } if width >= 2);
        if native && !base.is_const() {
            let letters: String = indices.iter().map(|&i| char::from(b"xyzw"[usize::from(i)])).collect();
            let text = self.text(&base)?;
            return Ok(Value::code(format!("{text}.{letters}"), ty));
        }
        let scalars = self.to_scalars(&base)?;
        let mut picked = Vec::with_capacity(indices.len());
        for &i in indices {
            let scalar = scalars
                .get(usize::from(i))
                .cloned()
                .ok_or_else(|| CompileError::bug("swizzle index out of range"))?;
            picked.push(scalar);
        }
        self.from_scalars(&ty, &mut picked.into_iter())
    }

    /// `base[index]` on an array.
    pub fn index(&mut self, base: Value, index: Value) -> CompileResult<Value> {
        let Some(array) = base.ty.as_array() else {
            return Err(CompileError::issue(format!("cannot index into `{}`", base.ty)));
        };
        let (of, len) = (array.of.clone(), array.len);
        let index = self.convert(index, &Type::I32)?;
        if let Some(Constant::Int(i)) = index.as_const() {
            if u32::try_from(*i).map_or(true, |i| i >= len) {
                return Err(CompileError::issue(format!("index {i} is out of bounds for `{}`", base.ty)));
            }
            if let Some(Constant::Aggregate(items)) = base.as_const() {
                let item = items
                    .get(i.unsigned_abs() as usize)
                    .cloned()
                    .ok_or_else(|| CompileError::bug("short array constant"))?;
                return Ok(Value::constant(item, of));
            }
        }
        let assignable = base.assignable;
        let base_text = self.cached_text(base)?;
        let index_text = self.text(&index)?;
        Ok(Value {
            payload: Payload::Code(format!("{base_text}[{index_text}]")),
            ty: of,
            assignable,
        })
    }

    // === Literals ===

    fn struct_lit(&mut self, head: StructHead, inits: &[FieldInit]) -> CompileResult<Value> {
        let mut values = Vec::with_capacity(inits.len());
        for init in inits {
            if values.iter().any(|(n, _): &(Ident, Value)| n.name == init.name.name) {
                return Err(CompileError::issue(format!("field `{}` is set twice", self.name(init.name.name)))
                    .at(init.name.span));
            }
            values.push((init.name, self.expr(&init.value)?));
        }
        let strukt = match head {
            StructHead::Named(name) => match self.program.decls.ty(name.name) {
                Some(Type::Struct(s)) => s.clone(),
                Some(other) => {
                    return Err(CompileError::issue(format!("`{other}` is not a struct")).at(name.span));
                }
                None => {
                    return Err(CompileError::issue(format!("unknown type `{}`", self.name(name.name))).at(name.span));
                }
            },
            StructHead::Symbol(symbol) => self.anon_struct(symbol, &values)?,
        };

        let mut fields: Vec<Option<Value>> = vec![None; strukt.fields.len()];
        for (name, value) in values {
            let index = strukt.field_index(name.name).ok_or_else(|| {
                CompileError::issue(format!("`{}` has no field `{}`", strukt.name, self.name(name.name))).at(name.span)
            })?;
            let ty = strukt.fields[index].ty.clone();
            fields[index] = Some(self.expect(value, &ty, name.span)?);
        }
        let mut complete = Vec::with_capacity(fields.len());
        for (slot, field) in fields.into_iter().zip(&strukt.fields) {
            complete.push(match slot {
                Some(value) => value,
                None if field.ty.is_void() => Value::constant(self.zero(&field.ty), field.ty.clone()),
                None => {
                    return Err(CompileError::issue(format!(
                        "missing field `{}` in `{}`",
                        self.name(field.name),
                        strukt.name
                    )))
                }
            });
        }
        self.construct(&strukt, complete)
    }

    /// Struct type of `:sym { a: .., b: .. }`, derived once per symbol,
    /// field names and field types.
    fn anon_struct(&mut self, symbol: Ident, values: &[(Ident, Value)]) -> CompileResult<Rc<StructType>> {
        let key = (
            symbol.name,
            values.iter().map(|(n, _)| n.name).collect::<Vec<_>>(),
            values.iter().map(|(_, v)| v.ty.clone()).collect::<Vec<_>>(),
        );
        if let Some(Type::Struct(s)) = self.program.decls.anon(&key) {
            return Ok(s.clone());
        }
        let fields: Vec<Field> = values
            .iter()
            .map(|(n, v)| Field {
                name: n.name,
                ty: v.ty.clone(),
            })
            .collect();
        let described: Vec<String> = fields
            .iter()
            .map(|f| format!("{}: {}", self.name(f.name), f.ty))
            .collect();
        let label = format!(":{} {{ {} }}", self.name(symbol.name), described.join(", "));
        let s = StructType::declare(label, fields, false, &mut self.program.ids)?;
        self.declare_glsl_struct(&s);
        self.program.decls.add_anon(key, Type::Struct(s.clone()));
        Ok(s)
    }

    /// Record the GLSL declaration of a struct-path layout.
    pub(crate) fn declare_glsl_struct(&mut self, s: &StructType) {
        if let Some(text) = s.layout(Target::Glsl).glsl_declaration() {
            self.program.output_mut(Target::Glsl).structs.push(text);
        }
    }

    fn array_lit(&mut self, items: &[Expr]) -> CompileResult<Value> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let value = self.expr(item)?;
            values.push(self.non_void(value, "array element").map_err(|e| e.at(item.span))?);
        }
        let Some(first) = values.first() else {
            return Err(CompileError::issue("an empty array literal has no type"));
        };
        let mut of = first.ty.clone();
        for value in &values[1..] {
            if of.can_convert_from(&value.ty) {
                continue;
            }
            if value.ty.can_convert_from(&of) {
                of = value.ty.clone();
            } else {
                return Err(CompileError::issue(format!(
                    "array elements have different types `{of}` and `{}`",
                    value.ty
                )));
            }
        }
        let ty = Type::array(of.clone(), u32::try_from(values.len()).unwrap_or(u32::MAX))?;
        let mut converted = Vec::with_capacity(values.len());
        for value in values {
            converted.push(self.convert(value, &of)?);
        }
        if converted.iter().all(Value::is_const) {
            let items = converted
                .into_iter()
                .filter_map(|v| v.as_const().cloned())
                .collect();
            return Ok(Value::constant(Constant::Aggregate(items), ty));
        }
        let texts = converted
            .iter()
            .map(|v| self.text(v))
            .collect::<CompileResult<Vec<_>>>()?;
        let text = self.array_text(&ty, &texts);
        Ok(Value::code(text, ty))
    }
}

pub(crate) fn literal(lit: Lit) -> Value {
    match lit {
        Lit::Int(v) => Value::int(v),
        Lit::Float(v) => Value::float(v as f32),
        Lit::Bool(v) => Value::bool(v),
    }
}

/// Component indices of a swizzle name drawn from one of `xyzw` or `rgba`.
fn swizzle_indices(text: &str) -> Option<Vec<u8>> {
    if text.is_empty() || text.len() > 4 {
        return None;
    }
    ["xyzw", "rgba"].iter().find_map(|set| {
        text.chars()
            .map(|c| set.find(c).and_then(|i| u8::try_from(i).ok()))
            .collect::<Option<Vec<u8>>>()
    })
}

#[cfg(test)]
mod tests {
    use super::swizzle_indices;

    #[test]
    fn swizzle_sets_do_not_mix() {
        assert_eq!(swizzle_indices("xy"), Some(vec![0, 1]));
        assert_eq!(swizzle_indices("bgr"), Some(vec![2, 1, 0]));
        assert_eq!(swizzle_indices("xg"), None);
        assert_eq!(swizzle_indices("xyzwx"), None);
        assert_eq!(swizzle_indices(""), None);
    }
}
