//! Top-level items: struct groups, consts, params, asserts and functions.

use super::CONST_DEPTH_LIMIT;
use crate::block::{indent_into, Frame};
use crate::{prelude, CallArgs, Emitter, Function, Param, ParamTy, Program, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{
    Block, ConstDecl, Expr, ExprKind, FnDecl, FnName, Item, ItemKind, ParamDecl, SourceBlock, SourcePart, StmtKind,
    StructGroup,
};
use ember_ir::StringInterner;
use ember_types::{Field, StructType, Target, Type};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

impl Program {
    /// Declare one item and emit it for each of `targets`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn item(&mut self, interner: &StringInterner, item: &Item, targets: &[Target]) -> CompileResult<()> {
        let result = match &item.kind {
            ItemKind::Empty => Err(CompileError::bug("item placeholder reached emission")),
            ItemKind::Use(_) => Err(CompileError::bug("`use` reached the emitter unresolved")),
            ItemKind::Struct(group) => self.struct_group(interner, group),
            ItemKind::Const(decl) => self.const_item(interner, decl),
            ItemKind::Param(decl) => self.param_item(interner, decl),
            ItemKind::Assert(cond) => {
                for &target in targets {
                    let mut e = self.emitter(target, interner);
                    let ((), lines) = e.scoped(|e| e.assert(cond))?;
                    if target == Target::Js {
                        self.output_mut(target).main.extend(lines);
                    }
                }
                Ok(())
            }
            ItemKind::Fn(decl) => self.fn_item(interner, decl, targets),
        };
        result.map_err(|e| e.at(item.span))
    }

    fn struct_group(&mut self, interner: &StringInterner, group: &StructGroup) -> CompileResult<()> {
        let mut variants = Vec::with_capacity(group.variants.len());
        let mut e = self.emitter(Target::Js, interner);
        for decl in &group.variants {
            let text = e.name(decl.name.name);
            if e.program.decls.has_own_type(decl.name.name) {
                return Err(CompileError::issue(format!("type `{text}` is already declared")).at(decl.name.span));
            }
            let mut fields: Vec<Field> = Vec::with_capacity(decl.fields.len());
            for field in &decl.fields {
                if fields.iter().any(|f| f.name == field.name.name) {
                    return Err(CompileError::issue(format!("duplicate field `{}`", e.name(field.name.name)))
                        .at(field.name.span));
                }
                let ty = e.resolve_ty(&field.ty)?;
                fields.push(Field {
                    name: field.name.name,
                    ty,
                });
            }
            variants.push((text.to_owned(), fields));
        }

        let structs = StructType::declare_group(variants, group.matrix, &mut self.ids)?;
        for (decl, s) in group.variants.iter().zip(&structs) {
            self.decls.add_type(decl.name.name, Type::Struct(s.clone()));
            self.decls.add_fn(decl.name.name, Rc::new(prelude::constructor(s, interner)));
        }
        if let Some(first) = structs.first() {
            if let Some(text) = first.layout(Target::Glsl).glsl_declaration() {
                self.output_mut(Target::Glsl).structs.push(text);
            }
        }
        Ok(())
    }

    fn const_item(&mut self, interner: &StringInterner, decl: &ConstDecl) -> CompileResult<()> {
        let mut e = self.emitter(Target::Js, interner);
        let (mut value, lines) = e.scoped(|e| e.expr(&decl.value))?;
        if let Some(ty) = &decl.ty {
            let ty = e.resolve_ty(ty)?;
            value = e.expect(value, &ty, decl.value.span)?;
        }
        if !value.is_const() || !lines.is_empty() {
            return Err(CompileError::issue("const value must be a compile-time constant").at(decl.value.span));
        }
        debug!(name = e.name(decl.name.name), ty = %value.ty, "const");
        self.decls.add_const(decl.name.name, value);
        Ok(())
    }

    fn param_item(&mut self, interner: &StringInterner, decl: &ParamDecl) -> CompileResult<()> {
        let mut e = self.emitter(Target::Glsl, interner);
        let ty = e.resolve_ty(&decl.ty)?;
        if ty.is_void() {
            return Err(CompileError::issue(format!("parameter `${}` has no value", e.name(decl.name.name))));
        }
        let uniform = format!("uniform {} u_{};", ty.glsl_name(), e.name(decl.name.name));
        self.output_mut(Target::Glsl).uniforms.push(uniform);
        self.decls.add_param(decl.name.name, ty);
        Ok(())
    }

    fn fn_item(&mut self, interner: &StringInterner, decl: &FnDecl, targets: &[Target]) -> CompileResult<()> {
        let (key, display, stem) = match decl.name {
            FnName::Ident(ident) => {
                let text = interner.lookup(ident.name);
                (ident.name, text.to_owned(), text.to_owned())
            }
            FnName::Operator { op, span } => {
                let export = op
                    .export_name()
                    .ok_or_else(|| CompileError::issue(format!("`{}` cannot be overloaded", op.as_str())).at(span))?;
                (interner.intern(export), op.as_str().to_owned(), export.to_owned())
            }
        };
        let generic = !decl.generics.is_empty();
        let backend = (!generic).then(|| self.ids.fresh(&stem));
        let user = Rc::new(UserFn {
            decl: decl.clone(),
            stem,
            backend,
            source: source_blocks(&decl.body)?,
            instances: RefCell::default(),
        });

        let (params, ret) = if generic {
            let params = decl
                .params
                .iter()
                .map(|p| Param::new(interner.lookup(p.name.name), ParamTy::Any))
                .collect();
            (params, ParamTy::Any)
        } else {
            let mut e = self.emitter(Target::Js, interner);
            let (params, ret) = user.signature(&mut e, &[])?;
            let params = decl
                .params
                .iter()
                .zip(params)
                .map(|(p, ty)| Param::new(interner.lookup(p.name.name), ParamTy::Exact(ty)))
                .collect();
            (params, ParamTy::Exact(ret))
        };
        let runner = user.clone();
        let function = Function::new(display, params, ret, move |e, call| runner.call(e, call))
            .with_generics(decl.generics.len());
        debug!(signature = %function.signature(), "declared function");
        self.decls.add_fn(key, Rc::new(function));

        if !generic {
            for &target in targets {
                let mut e = self.emitter(target, interner);
                user.instance(&mut e, &[])?;
            }
        }
        Ok(())
    }
}

/// A function declared by the program. Templates are instantiated per
/// target and type-argument list on first call.
struct UserFn {
    decl: FnDecl,
    stem: String,
    /// Backend name shared by both targets; templates mint one per instance.
    backend: Option<String>,
    /// The body as `source` blocks, if it is written that way.
    source: Option<Vec<SourceBlock>>,
    instances: RefCell<FxHashMap<(Target, Vec<Type>), Rc<Instance>>>,
}

struct Instance {
    backend: String,
    params: Vec<Type>,
    ret: Type,
}

impl UserFn {
    fn frame(&self, type_args: &[Type]) -> Frame {
        let mut frame = Frame::new();
        for (name, ty) in self.decl.generics.iter().zip(type_args) {
            frame.type_params.insert(name.name, ty.clone());
        }
        frame
    }

    /// Parameter and return types under `type_args`.
    fn signature(&self, e: &mut Emitter<'_>, type_args: &[Type]) -> CompileResult<(Vec<Type>, Type)> {
        let frame = self.frame(type_args);
        let (sig, _) = e.in_frame(frame, |e| {
            let mut params = Vec::with_capacity(self.decl.params.len());
            for param in &self.decl.params {
                params.push(e.resolve_ty(&param.ty)?);
            }
            let ret = match &self.decl.ret {
                Some(ty) => e.resolve_ty(ty)?,
                None => e.void_type(),
            };
            Ok((params, ret))
        })?;
        Ok(sig)
    }

    fn call(&self, e: &mut Emitter<'_>, call: CallArgs) -> CompileResult<Value> {
        let inst = self.instance(e, &call.type_args)?;
        let mut args = Vec::with_capacity(call.args.len());
        for (arg, ty) in call.args.into_iter().zip(&inst.params) {
            args.push(e.expect(arg, ty, call.span)?);
        }

        if self.source.is_none() && args.iter().all(Value::is_const) && e.const_depth < CONST_DEPTH_LIMIT {
            if let Some(value) = self.fold(e, &inst, &args, &call.type_args)? {
                return Ok(value);
            }
        }

        let mut texts = Vec::with_capacity(args.len());
        for (arg, ty) in args.iter().zip(&inst.params) {
            if !ty.is_void() {
                texts.push(e.text(arg)?);
            }
        }
        let text = format!("{}({})", inst.backend, texts.join(", "));
        if inst.ret.is_void() {
            e.line(format!("{text};"));
            return Ok(Value::constant(e.zero(&inst.ret), inst.ret.clone()));
        }
        Ok(Value::code(text, inst.ret.clone()))
    }

    /// Evaluate the body with constant arguments in a scratch frame; the
    /// result counts only if it is constant and nothing was emitted.
    fn fold(&self, e: &mut Emitter<'_>, inst: &Instance, args: &[Value], type_args: &[Type]) -> CompileResult<Option<Value>> {
        let frame = self.frame(type_args);
        e.const_depth += 1;
        let result = e.in_frame(frame, |e| {
            e.scoped(|e| {
                for (param, arg) in self.decl.params.iter().zip(args) {
                    e.bind(param.name.name, arg.clone());
                }
                let value = e.block_body(&self.decl.body)?;
                e.convert(value, &inst.ret)
            })
        });
        e.const_depth -= 1;
        let ((value, lines), _) = result?;
        if lines.is_empty() && value.is_const() {
            debug!(function = %self.stem, "folded call");
            return Ok(Some(value));
        }
        Ok(None)
    }

    /// The emitted backend function for the current target, emitting it on
    /// first use.
    fn instance(&self, e: &mut Emitter<'_>, type_args: &[Type]) -> CompileResult<Rc<Instance>> {
        let key = (e.target, type_args.to_vec());
        if let Some(inst) = self.instances.borrow().get(&key) {
            return Ok(inst.clone());
        }
        let (params, ret) = self.signature(e, type_args)?;
        let backend = match (&self.backend, type_args.is_empty()) {
            (Some(name), true) => name.clone(),
            _ => e.fresh(&self.stem),
        };
        let inst = Rc::new(Instance { backend, params, ret });
        self.instances.borrow_mut().insert(key, inst.clone());
        let text = self.emit(e, &inst, type_args)?;
        e.program.output_mut(e.target).functions.push(text);
        Ok(inst)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %inst.backend, target = %e.target))]
    fn emit(&self, e: &mut Emitter<'_>, inst: &Instance, type_args: &[Type]) -> CompileResult<String> {
        let frame = self.frame(type_args);
        let ((params, body), _) = e.in_frame(frame, |e| {
            let mut params = Vec::new();
            for (param, ty) in self.decl.params.iter().zip(&inst.params) {
                if ty.is_void() {
                    let zero = e.zero(ty);
                    e.bind(param.name.name, Value::constant(zero, ty.clone()));
                    continue;
                }
                let stem = e.name(param.name.name);
                let backend = e.fresh(stem);
                e.bind(param.name.name, Value::code(backend.clone(), ty.clone()));
                params.push((backend, ty.clone()));
            }
            let (ret, mut lines) = e.scoped(|e| match &self.source {
                Some(blocks) => source_body(e, blocks),
                None => {
                    let value = e.block_body(&self.decl.body)?;
                    let value = e.convert(value, &inst.ret).map_err(|err| match &self.decl.body.tail {
                        Some(tail) => err.at(tail.span),
                        None => err,
                    })?;
                    if inst.ret.is_void() {
                        e.discard(&value)?;
                        return Ok(None);
                    }
                    e.text(&value).map(|text| Some(format!("return {text};")))
                }
            })?;
            lines.extend(ret.iter().flat_map(|text| text.lines().map(str::to_owned)));
            Ok((params, lines))
        })?;

        let header = match e.target {
            Target::Glsl => {
                let params: Vec<String> = params.iter().map(|(n, ty)| format!("{} {n}", ty.glsl_name())).collect();
                format!("{} {}({}) {{", inst.ret.glsl_name(), inst.backend, params.join(", "))
            }
            Target::Js => {
                let params: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();
                format!("function {}({}) {{", inst.backend, params.join(", "))
            }
        };
        let mut out = vec![header];
        indent_into(&mut out, body);
        out.push("}".to_owned());
        Ok(out.join("\n"))
    }
}

/// The `source` blocks making up a function body, or `None` for an
/// ordinary body. Mixing the two is an error.
fn source_blocks(body: &Block) -> CompileResult<Option<Vec<SourceBlock>>> {
    let mut blocks = Vec::new();
    let mut other = false;
    for stmt in &body.stmts {
        match &stmt.kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Source(block),
                ..
            }) => blocks.push(block.clone()),
            StmtKind::Empty => {}
            _ => other = true,
        }
    }
    match body.tail.as_deref() {
        Some(Expr {
            kind: ExprKind::Source(block),
            ..
        }) => blocks.push(block.clone()),
        Some(_) => other = true,
        None => {}
    }
    match (blocks.is_empty(), other) {
        (true, _) => Ok(None),
        (false, false) => Ok(Some(blocks)),
        (false, true) => Err(CompileError::issue(
            "a function body written with `source` blocks cannot contain anything else",
        )
        .at(body.span)),
    }
}

/// Splice the block for the current target, with interpolations replaced by
/// the runtime text of their values.
fn source_body(e: &mut Emitter<'_>, blocks: &[SourceBlock]) -> CompileResult<Option<String>> {
    let target_name = e.target.name();
    let labelled = |b: &&SourceBlock| b.target.map(|t| e.name(t.name)) == Some(target_name);
    let chosen = blocks
        .iter()
        .find(labelled)
        .or_else(|| blocks.iter().find(|b| b.target.is_none()))
        .ok_or_else(|| CompileError::issue(format!("no `source` block for {target_name}")))?;
    let mut text = String::new();
    for part in &chosen.parts {
        match part {
            SourcePart::Text(t) => text.push_str(t),
            SourcePart::Interp(expr) => {
                let value = e.expr(expr)?;
                let value = e.non_void(value, "interpolated expression").map_err(|err| err.at(expr.span))?;
                text.push_str(&e.text(&value)?);
            }
        }
    }
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}
