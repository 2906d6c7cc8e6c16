//! Scalar operators and their broadcasting over vector-shaped values.
//!
//! Every built-in numeric operation is a [`ScalarOp`] declared once
//! against vector-shaped parameters. Constant arguments fold component by
//! component. At runtime GLSL applies the operator to whole vectors, since
//! its native types already broadcast; JavaScript decomposes each argument
//! into scalars, applies the scalar form per component and reassembles the
//! result.

use crate::{Emitter, Payload, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_types::{Constant, ScalarKind, Target, Type};

/// Tolerance of `~=`.
pub const APPROX_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Neg,
    Min,
    Max,
    Clamp,
    Mix,
    Abs,
    Fract,
    Floor,
    Sin,
    Cos,
    Exp,
    Sqrt,
    Ln,
    BitAnd,
    BitOr,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Not,
}

impl ScalarOp {
    pub fn arity(self) -> usize {
        use ScalarOp::*;
        match self {
            Neg | Abs | Fract | Floor | Sin | Cos | Exp | Sqrt | Ln | Not => 1,
            Clamp | Mix => 3,
            _ => 2,
        }
    }

    pub fn result_kind(self, kind: ScalarKind) -> ScalarKind {
        match self {
            ScalarOp::Lt | ScalarOp::Gt | ScalarOp::Le | ScalarOp::Ge => ScalarKind::Bool,
            _ => kind,
        }
    }

    /// GLSL accepts a scalar in place of a vector operand.
    fn glsl_mixes_scalars(self) -> bool {
        use ScalarOp::*;
        matches!(self, Add | Sub | Mul | Div | Rem | Min | Max | Clamp | Mix | BitAnd | BitOr)
    }

    /// Fold one component.
    pub fn fold(self, args: &[Constant]) -> CompileResult<Constant> {
        use Constant::{Bool, Float, Int};
        use ScalarOp::*;
        Ok(match (self, args) {
            (Add, [Float(a), Float(b)]) => Float(a + b),
            (Sub, [Float(a), Float(b)]) => Float(a - b),
            (Mul, [Float(a), Float(b)]) => Float(a * b),
            (Div, [Float(a), Float(b)]) => Float(a / b),
            (Rem, [Float(a), Float(b)]) => Float(a - b * (a / b).floor()),
            (Pow, [Float(a), Float(b)]) => Float(a.powf(*b)),
            (Neg, [Float(a)]) => Float(-a),
            (Min, [Float(a), Float(b)]) => Float(a.min(*b)),
            (Max, [Float(a), Float(b)]) => Float(a.max(*b)),
            (Clamp, [Float(x), Float(lo), Float(hi)]) => Float(x.max(*lo).min(*hi)),
            (Mix, [Float(a), Float(b), Float(t)]) => Float(a + (b - a) * t),
            (Abs, [Float(a)]) => Float(a.abs()),
            (Fract, [Float(a)]) => Float(a - a.floor()),
            (Floor, [Float(a)]) => Float(a.floor()),
            (Sin, [Float(a)]) => Float(a.sin()),
            (Cos, [Float(a)]) => Float(a.cos()),
            (Exp, [Float(a)]) => Float(a.exp()),
            (Sqrt, [Float(a)]) => Float(a.sqrt()),
            (Ln, [Float(a)]) => Float(a.ln()),

            (Add, [Int(a), Int(b)]) => Int(a.wrapping_add(*b)),
            (Sub, [Int(a), Int(b)]) => Int(a.wrapping_sub(*b)),
            (Mul, [Int(a), Int(b)]) => Int(a.wrapping_mul(*b)),
            (Div | Rem, [Int(_), Int(0)]) => {
                return Err(CompileError::issue("integer division by zero"));
            }
            (Div, [Int(a), Int(b)]) => Int(a.wrapping_div(*b)),
            (Rem, [Int(a), Int(b)]) => Int(a.wrapping_rem(*b)),
            (Neg, [Int(a)]) => Int(a.wrapping_neg()),
            (Min, [Int(a), Int(b)]) => Int(*a.min(b)),
            (Max, [Int(a), Int(b)]) => Int(*a.max(b)),
            (Clamp, [Int(x), Int(lo), Int(hi)]) => Int(*x.max(lo).min(hi)),
            (Abs, [Int(a)]) => Int(a.wrapping_abs()),
            (BitAnd, [Int(a), Int(b)]) => Int(a & b),
            (BitOr, [Int(a), Int(b)]) => Int(a | b),

            (Lt, [Float(a), Float(b)]) => Bool(a < b),
            (Gt, [Float(a), Float(b)]) => Bool(a > b),
            (Le, [Float(a), Float(b)]) => Bool(a <= b),
            (Ge, [Float(a), Float(b)]) => Bool(a >= b),
            (Lt, [Int(a), Int(b)]) => Bool(a < b),
            (Gt, [Int(a), Int(b)]) => Bool(a > b),
            (Le, [Int(a), Int(b)]) => Bool(a <= b),
            (Ge, [Int(a), Int(b)]) => Bool(a >= b),

            (And, [Bool(a), Bool(b)]) => Bool(*a && *b),
            (Or, [Bool(a), Bool(b)]) => Bool(*a || *b),
            (Not, [Bool(a)]) => Bool(!a),
            _ => return Err(CompileError::bug(format!("cannot fold {self:?} over {args:?}"))),
        })
    }

    /// Backend text of the operation on atomic operand texts.
    pub fn text(self, target: Target, kind: ScalarKind, args: &[String]) -> String {
        match target {
            Target::Glsl => self.glsl(kind, args),
            Target::Js => self.js(kind, args),
        }
    }

    fn glsl(self, kind: ScalarKind, args: &[String]) -> String {
        use ScalarOp::*;
        let a = |i: usize| args.get(i).map_or("", String::as_str);
        let call = |name: &str| format!("{name}({})", args.join(", "));
        match self {
            Add => format!("({} + {})", a(0), a(1)),
            Sub => format!("({} - {})", a(0), a(1)),
            Mul => format!("({} * {})", a(0), a(1)),
            Div => format!("({} / {})", a(0), a(1)),
            Rem if kind == ScalarKind::Int => format!("({} % {})", a(0), a(1)),
            Rem => call("mod"),
            Pow => call("pow"),
            Neg => format!("(-{})", a(0)),
            Min => call("min"),
            Max => call("max"),
            Clamp => call("clamp"),
            Mix => call("mix"),
            Abs => call("abs"),
            Fract => call("fract"),
            Floor => call("floor"),
            Sin => call("sin"),
            Cos => call("cos"),
            Exp => call("exp"),
            Sqrt => call("sqrt"),
            Ln => call("log"),
            BitAnd => format!("({} & {})", a(0), a(1)),
            BitOr => format!("({} | {})", a(0), a(1)),
            Lt => format!("({} < {})", a(0), a(1)),
            Gt => format!("({} > {})", a(0), a(1)),
            Le => format!("({} <= {})", a(0), a(1)),
            Ge => format!("({} >= {})", a(0), a(1)),
            And => format!("({} && {})", a(0), a(1)),
            Or => format!("({} || {})", a(0), a(1)),
            Not => format!("(!{})", a(0)),
        }
    }

    /// Operands that appear twice in the text must be simple.
    fn js(self, kind: ScalarKind, args: &[String]) -> String {
        use ScalarOp::*;
        let a = |i: usize| args.get(i).map_or("", String::as_str);
        let call = |name: &str| format!("Math.{name}({})", args.join(", "));
        let int = kind == ScalarKind::Int;
        match self {
            Add if int => format!("(({} + {}) | 0)", a(0), a(1)),
            Sub if int => format!("(({} - {}) | 0)", a(0), a(1)),
            Mul if int => format!("Math.imul({}, {})", a(0), a(1)),
            Div if int => format!("(({} / {}) | 0)", a(0), a(1)),
            Neg if int => format!("((-{}) | 0)", a(0)),
            Abs if int => format!("(Math.abs({}) | 0)", a(0)),
            Rem if int => format!("({} % {})", a(0), a(1)),
            Add => format!("({} + {})", a(0), a(1)),
            Sub => format!("({} - {})", a(0), a(1)),
            Mul => format!("({} * {})", a(0), a(1)),
            Div => format!("({} / {})", a(0), a(1)),
            Rem => format!("({0} - {1} * Math.floor({0} / {1}))", a(0), a(1)),
            Pow => call("pow"),
            Neg => format!("(-{})", a(0)),
            Min => call("min"),
            Max => call("max"),
            Clamp => format!("Math.min(Math.max({}, {}), {})", a(0), a(1), a(2)),
            Mix => format!("({0} + ({1} - {0}) * {2})", a(0), a(1), a(2)),
            Abs => call("abs"),
            Fract => format!("({0} - Math.floor({0}))", a(0)),
            Floor => call("floor"),
            Sin => call("sin"),
            Cos => call("cos"),
            Exp => call("exp"),
            Sqrt => call("sqrt"),
            Ln => call("log"),
            BitAnd => format!("({} & {})", a(0), a(1)),
            BitOr => format!("({} | {})", a(0), a(1)),
            Lt => format!("({} < {})", a(0), a(1)),
            Gt => format!("({} > {})", a(0), a(1)),
            Le => format!("({} <= {})", a(0), a(1)),
            Ge => format!("({} >= {})", a(0), a(1)),
            And => format!("({} && {})", a(0), a(1)),
            Or => format!("({} || {})", a(0), a(1)),
            Not => format!("(!{})", a(0)),
        }
    }
}

/// Reductions of vector-shaped values to one scalar.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Reduce {
    Eq,
    Ne,
    Approx,
    Dot,
    Length,
}

impl Emitter<'_> {
    /// Apply `op` to scalar operands: folds when all are constant.
    pub fn scalar_op(&mut self, op: ScalarOp, args: &[Value]) -> CompileResult<Value> {
        let kind = args
            .first()
            .and_then(|a| a.ty.scalar_kind())
            .ok_or_else(|| CompileError::bug(format!("{op:?} without scalar operands")))?;
        let result = Type::Scalar(op.result_kind(kind));
        if let Some(consts) = all_const(args) {
            return Ok(Value::constant(op.fold(&consts)?, result));
        }
        let texts = args.iter().map(|a| self.text(a)).collect::<CompileResult<Vec<_>>>()?;
        Ok(Value::code(op.text(self.target, kind, &texts), result))
    }

    /// Broadcast `op` over vector-shaped operands of one type; scalar
    /// operands are splatted.
    pub fn map_op(&mut self, op: ScalarOp, args: Vec<Value>) -> CompileResult<Value> {
        let shaped = shaped_type(&args)?;
        let (kind, width) = match &shaped {
            Some(ty) => ty.vector_shape(),
            None => args.first().and_then(|a| a.ty.vector_shape()),
        }
        .ok_or_else(|| CompileError::bug(format!("{op:?} over non-vector operands")))?;
        let in_ty = shaped.clone().unwrap_or(Type::Scalar(kind));
        let out_kind = op.result_kind(kind);
        let out_ty = if out_kind == kind {
            in_ty.clone()
        } else {
            self.vector_type(out_kind, width)?
        };

        if matches!(op, ScalarOp::Div | ScalarOp::Rem) && kind == ScalarKind::Int {
            if let Some(divisor) = args.get(1) {
                if divisor.is_const() && self.to_scalars(divisor)?.iter().any(|c| c.as_const() == Some(&Constant::Int(0))) {
                    return Err(CompileError::issue("integer division by zero"));
                }
            }
        }

        let runtime = !args.iter().all(Value::is_const);
        if runtime && self.target == Target::Glsl {
            let mut texts = Vec::with_capacity(args.len());
            for arg in &args {
                let text = self.text(arg)?;
                let splat = width > 1 && matches!(arg.ty, Type::Scalar(_)) && !op.glsl_mixes_scalars();
                texts.push(if splat { format!("{}({text})", in_ty.glsl_name()) } else { text });
            }
            return Ok(Value::code(op.text(Target::Glsl, kind, &texts), out_ty));
        }

        let mut components = Vec::with_capacity(args.len());
        for arg in args {
            let arg = self.cache(arg)?;
            components.push(self.to_scalars(&arg)?);
        }
        let mut results = Vec::with_capacity(usize::from(width));
        for i in 0..usize::from(width) {
            let operands: Vec<Value> = components
                .iter()
                .map(|c| if c.len() == 1 { c[0].clone() } else { c[i].clone() })
                .collect();
            results.push(self.scalar_op(op, &operands)?);
        }
        self.from_scalars(&out_ty, &mut results.into_iter())
    }

    /// Reduce vector-shaped operands of one type to a scalar.
    pub fn reduce(&mut self, reduce: Reduce, args: Vec<Value>) -> CompileResult<Value> {
        if let [a, b] = args.as_slice() {
            if a.ty != b.ty {
                return Err(CompileError::issue(format!(
                    "mismatched operand types `{}` and `{}`",
                    a.ty, b.ty
                )));
            }
        }
        let kind = args
            .first()
            .and_then(|a| a.ty.vector_shape())
            .map(|(k, _)| k)
            .ok_or_else(|| CompileError::bug(format!("{reduce:?} over non-vector operands")))?;
        let result_ty = match reduce {
            Reduce::Eq | Reduce::Ne | Reduce::Approx => Type::BOOL,
            Reduce::Dot | Reduce::Length => Type::F32,
        };

        let runtime = !args.iter().all(Value::is_const);
        if runtime && self.target == Target::Glsl {
            let texts = args.iter().map(|a| self.text(a)).collect::<CompileResult<Vec<_>>>()?;
            let scalar = args.iter().all(|a| matches!(a.ty, Type::Scalar(_)));
            let native = match (reduce, texts.as_slice()) {
                (Reduce::Eq, [a, b]) => Some(format!("({a} == {b})")),
                (Reduce::Ne, [a, b]) => Some(format!("({a} != {b})")),
                (Reduce::Dot, [a, b]) if scalar => Some(format!("({a} * {b})")),
                (Reduce::Dot, [a, b]) => Some(format!("dot({a}, {b})")),
                (Reduce::Length, [a]) => Some(format!("length({a})")),
                _ => None,
            };
            if let Some(text) = native {
                return Ok(Value::code(text, result_ty));
            }
        }

        let mut components = Vec::with_capacity(args.len());
        for arg in args {
            let arg = self.cache(arg)?;
            components.push(self.to_scalars(&arg)?);
        }
        let width = components.iter().map(|c| c.len()).max().unwrap_or(1);
        let pick = |c: &crate::Scalars, i: usize| if c.len() == 1 { c[0].clone() } else { c[i].clone() };

        let mut acc: Option<Value> = None;
        for i in 0..width {
            let term = match reduce {
                Reduce::Eq | Reduce::Ne => self.compare(pick(&components[0], i), pick(&components[1], i), kind)?,
                Reduce::Approx => {
                    let diff = self.scalar_op(ScalarOp::Sub, &[pick(&components[0], i), pick(&components[1], i)])?;
                    let abs = self.scalar_op(ScalarOp::Abs, &[diff])?;
                    self.scalar_op(ScalarOp::Lt, &[abs, Value::float(APPROX_EPSILON)])?
                }
                Reduce::Dot => self.scalar_op(ScalarOp::Mul, &[pick(&components[0], i), pick(&components[1], i)])?,
                Reduce::Length => {
                    let c = pick(&components[0], i);
                    self.scalar_op(ScalarOp::Mul, &[c.clone(), c])?
                }
            };
            let join = match reduce {
                Reduce::Dot | Reduce::Length => ScalarOp::Add,
                _ => ScalarOp::And,
            };
            acc = Some(match acc {
                None => term,
                Some(prev) => self.scalar_op(join, &[prev, term])?,
            });
        }
        let acc = acc.ok_or_else(|| CompileError::bug("reduction over zero components"))?;
        match reduce {
            Reduce::Ne => self.scalar_op(ScalarOp::Not, &[acc]),
            Reduce::Length => self.scalar_op(ScalarOp::Sqrt, &[acc]),
            _ => Ok(acc),
        }
    }

    /// Component equality; booleans compare with `==` on both backends.
    fn compare(&mut self, a: Value, b: Value, kind: ScalarKind) -> CompileResult<Value> {
        if let (Some(x), Some(y)) = (a.as_const(), b.as_const()) {
            return Ok(Value::bool(x == y));
        }
        let (a, b) = (self.text(&a)?, self.text(&b)?);
        let op = if self.target == Target::Js && kind != ScalarKind::Bool { "===" } else { "==" };
        Ok(Value::code(format!("({a} {op} {b})"), Type::BOOL))
    }

    /// `v / length(v)`.
    pub fn normalize(&mut self, v: Value) -> CompileResult<Value> {
        if self.target == Target::Glsl && !v.is_const() {
            let text = self.text(&v)?;
            return Ok(Value::code(format!("normalize({text})"), v.ty));
        }
        let v = self.cache(v)?;
        let length = self.reduce(Reduce::Length, vec![v.clone()])?;
        let length = self.cache(length)?;
        self.map_op(ScalarOp::Div, vec![v, length])
    }

    /// Matrix times column vector.
    pub fn mat_vec(&mut self, m: Value, v: Value) -> CompileResult<Value> {
        if self.target == Target::Glsl && !(m.is_const() && v.is_const()) {
            let (mt, vt) = (self.text(&m)?, self.text(&v)?);
            return Ok(Value::code(format!("({mt} * {vt})"), v.ty));
        }
        let Type::Struct(matrix) = &m.ty else {
            return Err(CompileError::bug("matrix operand is not a struct"));
        };
        let matrix = matrix.clone();
        let m = self.cache(m)?;
        let v = self.cache(v)?;
        let vs = self.to_scalars(&v)?;
        let mut columns = Vec::new();
        for (i, field) in matrix.fields.iter().enumerate() {
            if !field.ty.is_void() {
                let column = self.field(&m, i)?;
                columns.push(self.to_scalars(&column)?);
            }
        }
        let rows = columns.first().map_or(0, |c| c.len());
        let mut out = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut acc: Option<Value> = None;
            for (column, scale) in columns.iter().zip(&vs) {
                let term = self.scalar_op(ScalarOp::Mul, &[column[row].clone(), scale.clone()])?;
                acc = Some(match acc {
                    None => term,
                    Some(prev) => self.scalar_op(ScalarOp::Add, &[prev, term])?,
                });
            }
            out.push(acc.ok_or_else(|| CompileError::bug("matrix without columns"))?);
        }
        let ty = self.vector_type(ScalarKind::Float, u8::try_from(rows).unwrap_or(0))?;
        self.from_scalars(&ty, &mut out.into_iter())
    }

    /// `#x`: number of scalar components, or array length.
    pub fn count(&mut self, v: &Value) -> CompileResult<Value> {
        if let Some(array) = v.ty.as_array() {
            return Ok(Value::int(i32::try_from(array.len).unwrap_or(i32::MAX)));
        }
        match v.ty.vector_shape() {
            Some((_, width)) => Ok(Value::int(i32::from(width))),
            None => Err(CompileError::issue(format!("`#` needs a vector or an array, found `{}`", v.ty))),
        }
    }
}

/// The one non-scalar operand type, if any; every non-scalar operand must
/// have it.
fn shaped_type(args: &[Value]) -> CompileResult<Option<Type>> {
    let mut shaped: Option<Type> = None;
    for arg in args {
        if matches!(arg.ty, Type::Scalar(_)) {
            continue;
        }
        match &shaped {
            None => shaped = Some(arg.ty.clone()),
            Some(ty) if *ty == arg.ty => {}
            Some(ty) => {
                return Err(CompileError::issue(format!(
                    "mismatched operand types `{ty}` and `{}`",
                    arg.ty
                )))
            }
        }
    }
    Ok(shaped)
}

fn all_const(args: &[Value]) -> Option<Vec<Constant>> {
    args.iter()
        .map(|a| match &a.payload {
            Payload::Const(c) => Some(c.clone()),
            Payload::Code(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
