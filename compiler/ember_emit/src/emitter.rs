//! The emitter: lowers AST nodes to [`Value`]s for one target.
//!
//! Submodules add the lowering of each node family; this file holds the
//! value plumbing they share: scopes and lines, caching, materialising
//! constants as text, conversions, field projection and the scalar
//! decomposition used by broadcasting.

mod control;
mod expr;
mod items;
mod stmt;
mod ty;

use crate::block::{Block, Frame};
use crate::{Payload, Program, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::{Name, StringInterner};
use ember_types::{Accessor, Constant, Ctor, ScalarKind, StructType, Target, Type};
use smallvec::SmallVec;
use std::rc::Rc;

/// Scalar components of a vector-shaped value.
pub type Scalars = SmallVec<[Value; 4]>;

/// Nesting limit of the constant path of user functions. Deeper calls are
/// emitted as runtime calls.
pub(crate) const CONST_DEPTH_LIMIT: u32 = 64;

pub struct Emitter<'a> {
    pub target: Target,
    pub interner: &'a StringInterner,
    pub(crate) program: &'a mut Program,
    pub(crate) frame: Frame,
    pub(crate) const_depth: u32,
}

impl<'a> Emitter<'a> {
    pub fn new(target: Target, interner: &'a StringInterner, program: &'a mut Program) -> Self {
        Emitter {
            target,
            interner,
            program,
            frame: Frame::new(),
            const_depth: 0,
        }
    }

    #[inline]
    pub fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn fresh(&mut self, stem: &str) -> String {
        self.program.ids.fresh(stem)
    }

    pub fn void_type(&self) -> Type {
        self.program.builtins.void.clone()
    }

    pub fn void_value(&self) -> Value {
        Value::constant(Constant::VOID, self.void_type())
    }

    /// Prelude vector type of `width` components (`f32` for width 1).
    pub fn vector_type(&self, kind: ScalarKind, width: u8) -> CompileResult<Type> {
        self.program.builtins.vector(kind, width)
    }

    // === Lines and scopes ===

    fn block_mut(&mut self) -> &mut Block {
        if self.frame.blocks.is_empty() {
            self.frame.blocks.push(Block::default());
        }
        let last = self.frame.blocks.len() - 1;
        &mut self.frame.blocks[last]
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.block_mut().lines.push(text.into());
    }

    pub fn lines(&mut self, lines: Vec<String>) {
        self.block_mut().lines.extend(lines);
    }

    /// Lines emitted so far into the innermost block.
    pub fn pending_lines(&self) -> usize {
        self.frame.blocks.last().map_or(0, |b| b.lines.len())
    }

    /// Run `f` in a fresh block and hand back its lines instead of
    /// appending them.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<(T, Vec<String>)> {
        let depth = self.frame.blocks.len();
        self.frame.blocks.push(Block::default());
        let result = f(self);
        let lines = self.frame.blocks.drain(depth..).flat_map(|b| b.lines).collect();
        result.map(|value| (value, lines))
    }

    /// Run `f` in a fresh block whose lines stay in the current one.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<T> {
        let (value, lines) = self.scoped(f)?;
        self.lines(lines);
        Ok(value)
    }

    /// Run `f` with a different function frame, restoring the current one
    /// afterwards.
    pub(crate) fn in_frame<T>(&mut self, frame: Frame, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<(T, Frame)> {
        let saved = std::mem::replace(&mut self.frame, frame);
        let result = f(self);
        let frame = std::mem::replace(&mut self.frame, saved);
        result.map(|value| (value, frame))
    }

    pub fn bind(&mut self, name: Name, value: Value) {
        self.block_mut().bind(name, value);
    }

    pub fn local(&self, name: Name) -> Option<&Value> {
        self.frame.lookup(name)
    }

    // === Declarations of backend variables ===

    /// Declare a backend variable; `init` may be omitted for temporaries
    /// assigned on every path later.
    pub fn declare_var(&mut self, name: &str, ty: &Type, init: Option<&str>, mutable: bool) {
        let line = match (self.target, init) {
            (Target::Glsl, Some(init)) => format!("{} {name} = {init};", ty.glsl_name()),
            (Target::Glsl, None) => format!("{} {name};", ty.glsl_name()),
            (Target::Js, Some(init)) => {
                format!("{} {name} = {init};", if mutable { "let" } else { "const" })
            }
            (Target::Js, None) => format!("let {name};"),
        };
        self.line(line);
    }

    /// Store a non-trivial runtime value in a temporary so its text can be
    /// repeated. Constants and simple texts come back unchanged.
    pub fn cache(&mut self, value: Value) -> CompileResult<Value> {
        if value.is_simple() || value.ty.is_void() {
            return Ok(value);
        }
        let text = self.text(&value)?;
        let temp = self.program.ids.temp();
        self.declare_var(&temp, &value.ty, Some(&text), false);
        Ok(Value::code(temp, value.ty))
    }

    /// Text of `value` that may be repeated and projected: constants that
    /// are not scalars are stored in a temporary first.
    pub fn cached_text(&mut self, value: Value) -> CompileResult<String> {
        match &value.payload {
            Payload::Const(c) if !c.is_scalar() => {
                let text = self.text(&value)?;
                let temp = self.program.ids.temp();
                self.declare_var(&temp, &value.ty, Some(&text), false);
                Ok(temp)
            }
            _ => {
                let value = self.cache(value)?;
                self.text(&value)
            }
        }
    }

    /// JavaScript shares arrays by reference; copying a composite out of
    /// a place keeps value semantics.
    pub(crate) fn owned_text(&mut self, value: &Value) -> CompileResult<String> {
        let text = self.text(value)?;
        let composite = !matches!(value.ty, Type::Scalar(_))
            && matches!(
                value.ty.repr(Target::Js),
                ember_types::Repr::Struct { .. } | ember_types::Repr::Array { .. }
            );
        if self.target == Target::Js && composite && value.as_code().is_some() && !text.starts_with('[') {
            Ok(format!("structuredClone({text})"))
        } else {
            Ok(text)
        }
    }

    // === Text ===

    /// Backend text of a value.
    pub fn text(&self, value: &Value) -> CompileResult<String> {
        match &value.payload {
            Payload::Code(text) => Ok(text.clone()),
            Payload::Const(c) => self.const_text(c, &value.ty),
        }
    }

    fn const_text(&self, c: &Constant, ty: &Type) -> CompileResult<String> {
        match ty {
            Type::Scalar(_) => c
                .render_scalar(self.target)
                .ok_or_else(|| CompileError::bug(format!("aggregate constant typed `{ty}`"))),
            Type::Struct(s) => {
                let items = aggregate(c, ty)?;
                let mut stored = Vec::new();
                for (i, accessor) in s.layout(self.target).accessors.iter().enumerate() {
                    if *accessor != Accessor::Zero {
                        let item = items.get(i).ok_or_else(|| CompileError::bug("short struct constant"))?;
                        stored.push(self.const_text(item, &s.fields[i].ty)?);
                    }
                }
                self.assemble(s, stored)
            }
            Type::Array(a) => {
                let items = aggregate(c, ty)?;
                let texts = items
                    .iter()
                    .map(|item| self.const_text(item, &a.of))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(self.array_text(ty, &texts))
            }
            Type::Alt(_) => Err(CompileError::bug("constant of an alternative type")),
        }
    }

    /// Build a struct from the texts of its stored fields.
    pub(crate) fn assemble(&self, s: &StructType, stored: Vec<String>) -> CompileResult<String> {
        match &s.layout(self.target).ctor {
            Ctor::Unit => Err(CompileError::bug(format!("void struct `{}` has no text", s.name))),
            Ctor::Forward => stored
                .into_iter()
                .next()
                .ok_or_else(|| CompileError::bug("transparent struct without a stored field")),
            Ctor::Call(name) => Ok(format!("{name}({})", stored.join(", "))),
            Ctor::Record => Ok(format!("[{}]", stored.join(", "))),
        }
    }

    pub(crate) fn array_text(&self, ty: &Type, items: &[String]) -> String {
        match self.target {
            Target::Glsl => format!("{}({})", ty.glsl_name(), items.join(", ")),
            Target::Js => format!("[{}]", items.join(", ")),
        }
    }

    // === Types and conversions ===

    /// The constant zero of `ty`.
    pub fn zero(&self, ty: &Type) -> Constant {
        match ty {
            Type::Scalar(kind) => kind.zero(),
            Type::Struct(s) => Constant::Aggregate(s.fields.iter().map(|f| self.zero(&f.ty)).collect()),
            Type::Array(a) => Constant::Aggregate(vec![self.zero(&a.of); a.len as usize]),
            Type::Alt(a) => self.zero(&Type::Struct(a.members[0].clone())),
        }
    }

    /// Convert `value` to `to`, or fail with a type mismatch.
    pub fn convert(&mut self, value: Value, to: &Type) -> CompileResult<Value> {
        if value.ty == *to {
            return Ok(value);
        }
        if !to.can_convert_from(&value.ty) {
            return Err(CompileError::issue(format!("expected `{to}`, found `{}`", value.ty)));
        }
        match (to, &value.payload) {
            (Type::Scalar(ScalarKind::Float), Payload::Const(Constant::Int(v))) => Ok(Value::float(*v as f32)),
            (Type::Scalar(ScalarKind::Float), Payload::Code(text)) => Ok(match self.target {
                Target::Glsl => Value::code(format!("float({text})"), Type::F32),
                Target::Js => Value::code(text.clone(), Type::F32),
            }),
            (Type::Alt(_), _) => {
                let text = self.text(&value)?;
                Ok(Value::code(text, to.clone()))
            }
            _ => Err(CompileError::bug(format!("no conversion from `{}` to `{to}`", value.ty))),
        }
    }

    /// [`convert`](Self::convert), locating errors at `span`.
    pub fn expect(&mut self, value: Value, to: &Type, span: ember_ir::Span) -> CompileResult<Value> {
        self.convert(value, to).map_err(|e| e.at(span))
    }

    /// Reject void values where a value is required.
    pub fn non_void(&self, value: Value, what: &str) -> CompileResult<Value> {
        if value.ty.is_void() {
            return Err(CompileError::issue(format!("{what} has no value (type `{}`)", value.ty)));
        }
        Ok(value)
    }

    // === Projections ===

    /// Read field `index` of a struct (or alternative) value.
    pub fn field(&mut self, base: &Value, index: usize) -> CompileResult<Value> {
        let strukt = match &base.ty {
            Type::Struct(s) => s.clone(),
            Type::Alt(a) => a.members[0].clone(),
            other => return Err(CompileError::bug(format!("field of non-struct `{other}`"))),
        };
        let ty = strukt
            .fields
            .get(index)
            .map(|f| f.ty.clone())
            .ok_or_else(|| CompileError::bug("field index out of range"))?;
        if let Payload::Const(c) = &base.payload {
            let item = aggregate(c, &base.ty)?
                .get(index)
                .cloned()
                .ok_or_else(|| CompileError::bug("short struct constant"))?;
            return Ok(Value::constant(item, ty));
        }
        let text = self.text(base)?;
        let payload = match &strukt.layout(self.target).accessors[index] {
            Accessor::Zero => return Ok(Value::constant(self.zero(&ty), ty)),
            Accessor::Identity => text,
            Accessor::Swizzle(letters) => format!("{text}.{letters}"),
            Accessor::Column(col) => format!("{text}[{col}]"),
            Accessor::Slot(slot) => match self.target {
                Target::Glsl => format!("{text}._{slot}"),
                Target::Js => format!("{text}[{slot}]"),
            },
        };
        Ok(Value {
            payload: Payload::Code(payload),
            ty,
            assignable: base.assignable,
        })
    }

    /// Build a struct value from all of its field values, in order.
    pub fn construct(&mut self, s: &Rc<StructType>, fields: Vec<Value>) -> CompileResult<Value> {
        let ty = Type::Struct(s.clone());
        if fields.iter().all(Value::is_const) {
            let items = fields
                .into_iter()
                .filter_map(|v| match v.payload {
                    Payload::Const(c) => Some(c),
                    Payload::Code(_) => None,
                })
                .collect();
            return Ok(Value::constant(Constant::Aggregate(items), ty));
        }
        let accessors = &s.layout(self.target).accessors;
        let mut stored = Vec::new();
        for (value, accessor) in fields.iter().zip(accessors) {
            if *accessor != Accessor::Zero {
                stored.push(self.text(value)?);
            }
        }
        let text = self.assemble(s, stored)?;
        Ok(Value::code(text, ty))
    }

    // === Scalar decomposition ===

    /// Scalar components of a vector-shaped value, in declaration order.
    /// Runtime values are cached first so each component is a projection.
    pub fn to_scalars(&mut self, value: &Value) -> CompileResult<Scalars> {
        match &value.ty {
            Type::Scalar(_) => Ok(SmallVec::from_elem(value.clone(), 1)),
            Type::Struct(s) if value.ty.vector_shape().is_some() => {
                let s = s.clone();
                let value = self.cache(value.clone())?;
                let mut out = Scalars::new();
                for (i, field) in s.fields.iter().enumerate() {
                    if field.ty.is_void() {
                        continue;
                    }
                    let component = self.field(&value, i)?;
                    out.extend(self.to_scalars(&component)?);
                }
                Ok(out)
            }
            other => Err(CompileError::bug(format!("`{other}` has no scalar components"))),
        }
    }

    /// Rebuild a vector-shaped value of type `ty` from scalars, consuming
    /// them in declaration order.
    pub fn from_scalars(&mut self, ty: &Type, scalars: &mut impl Iterator<Item = Value>) -> CompileResult<Value> {
        match ty {
            Type::Scalar(_) => scalars
                .next()
                .ok_or_else(|| CompileError::bug(format!("ran out of scalars building `{ty}`"))),
            Type::Struct(s) => {
                let mut fields = Vec::with_capacity(s.fields.len());
                for field in &s.fields {
                    if field.ty.is_void() {
                        fields.push(Value::constant(self.zero(&field.ty), field.ty.clone()));
                    } else {
                        fields.push(self.from_scalars(&field.ty, scalars)?);
                    }
                }
                self.construct(s, fields)
            }
            other => Err(CompileError::bug(format!("cannot build `{other}` from scalars"))),
        }
    }
}

fn aggregate<'c>(c: &'c Constant, ty: &Type) -> CompileResult<&'c [Constant]> {
    c.as_aggregate()
        .ok_or_else(|| CompileError::bug(format!("scalar constant typed `{ty}`")))
}
