//! The root scope every program starts from: scalar, vector and matrix
//! types, operators and the built-in function library.

use crate::broadcast::{Reduce, ScalarOp};
use crate::{Declarations, Emitter, Function, Param, ParamTy, Payload, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::StringInterner;
use ember_types::{Constant, Field, IdGenerator, ScalarKind, StructType, Target, Type};
use rustc_hash::FxHashMap;
use std::rc::Rc;

const COMPONENTS: [&str; 4] = ["x", "y", "z", "w"];
const COLUMNS: [&str; 4] = ["c0", "c1", "c2", "c3"];
const ARG_NAMES: [&str; 3] = ["a", "b", "c"];

const FLOAT: &[ScalarKind] = &[ScalarKind::Float];
const NUMERIC: &[ScalarKind] = &[ScalarKind::Float, ScalarKind::Int];
const INT: &[ScalarKind] = &[ScalarKind::Int];

/// Prelude types the emitter needs by shape rather than by name.
#[derive(Debug)]
pub struct Builtins {
    pub void: Type,
    vectors: FxHashMap<(ScalarKind, u8), Type>,
    matrices: FxHashMap<u8, Type>,
}

impl Builtins {
    /// `f32`/`i32`/`bool` for width 1, `vecN`/`ivecN`/`bvecN` otherwise.
    pub fn vector(&self, kind: ScalarKind, width: u8) -> CompileResult<Type> {
        if width == 1 {
            return Ok(Type::Scalar(kind));
        }
        self.vectors
            .get(&(kind, width))
            .cloned()
            .ok_or_else(|| CompileError::issue(format!("there is no {width}-component vector of `{kind}`")))
    }

    pub fn matrix(&self, size: u8) -> Option<&Type> {
        self.matrices.get(&size)
    }
}

/// Build the prelude scope.
pub fn build(ids: &mut IdGenerator, interner: &StringInterner) -> CompileResult<(Declarations, Builtins)> {
    let mut decls = Declarations::new();
    for kind in ScalarKind::ALL {
        decls.add_type(interner.intern(kind.name()), Type::Scalar(kind));
    }

    let void = StructType::declare("void".into(), Vec::new(), false, ids)?;
    decls.add_type(interner.intern("void"), Type::Struct(void.clone()));

    let mut vectors = FxHashMap::default();
    for kind in ScalarKind::ALL {
        for width in 2..=4u8 {
            let name = kind.vector_name(width);
            let fields = COMPONENTS[..usize::from(width)]
                .iter()
                .map(|c| Field {
                    name: interner.intern(c),
                    ty: Type::Scalar(kind),
                })
                .collect();
            let s = StructType::declare(name.clone(), fields, false, ids)?;
            let key = interner.intern(&name);
            decls.add_type(key, Type::Struct(s.clone()));
            decls.add_fn(key, Rc::new(constructor(&s, interner)));
            decls.add_fn(key, Rc::new(splat(&s, kind)));
            vectors.insert((kind, width), Type::Struct(s));
        }
    }

    let mut matrices = FxHashMap::default();
    for size in 2..=4u8 {
        let column = vectors
            .get(&(ScalarKind::Float, size))
            .cloned()
            .ok_or_else(|| CompileError::bug("prelude vector missing"))?;
        let name = format!("mat{size}");
        let fields = COLUMNS[..usize::from(size)]
            .iter()
            .map(|c| Field {
                name: interner.intern(c),
                ty: column.clone(),
            })
            .collect();
        let s = StructType::declare(name.clone(), fields, true, ids)?;
        let key = interner.intern(&name);
        decls.add_type(key, Type::Struct(s.clone()));
        decls.add_fn(key, Rc::new(constructor(&s, interner)));
        let matrix = Type::Struct(s);
        decls.add_fn(interner.intern("_mul"), Rc::new(mat_vec(matrix.clone(), column)));
        matrices.insert(size, matrix);
    }

    let builtins = Builtins {
        void: Type::Struct(void),
        vectors,
        matrices,
    };
    register_operators(&mut decls, interner);
    register_library(&mut decls, interner);
    Ok((decls, builtins))
}

/// Positional constructor of a struct: one parameter per field.
pub fn constructor(s: &Rc<StructType>, interner: &StringInterner) -> Function {
    let params = s
        .fields
        .iter()
        .map(|f| Param::new(interner.lookup(f.name), ParamTy::Exact(f.ty.clone())))
        .collect();
    let strukt = s.clone();
    Function::new(s.name.clone(), params, ParamTy::Exact(Type::Struct(s.clone())), move |e, call| {
        e.construct(&strukt, call.args)
    })
}

/// `vec3(1.0)`: every component set to one scalar.
fn splat(s: &Rc<StructType>, kind: ScalarKind) -> Function {
    let ty = Type::Struct(s.clone());
    let ret = ty.clone();
    Function::new(
        s.name.clone(),
        vec![Param::new("v", ParamTy::Exact(Type::Scalar(kind)))],
        ParamTy::Exact(ret),
        move |e, call| {
            let v = call.args.into_iter().next().ok_or_else(|| CompileError::bug("splat without argument"))?;
            let v = e.cache(v)?;
            e.from_scalars(&ty, &mut std::iter::repeat(v))
        },
    )
}

fn mat_vec(matrix: Type, column: Type) -> Function {
    let params = vec![
        Param::new("m", ParamTy::Exact(matrix)),
        Param::new("v", ParamTy::Exact(column.clone())),
    ];
    Function::new("*", params, ParamTy::Exact(column), |e, call| {
        let mut args = call.args.into_iter();
        match (args.next(), args.next()) {
            (Some(m), Some(v)) => e.mat_vec(m, v),
            _ => Err(CompileError::bug("matrix product arity")),
        }
    })
}

fn map_fn(display: &str, op: ScalarOp, kind: ScalarKind) -> Function {
    let params = ARG_NAMES[..op.arity()]
        .iter()
        .map(|n| Param::new(*n, ParamTy::Vector(kind)))
        .collect();
    let ret = ParamTy::Vector(op.result_kind(kind));
    Function::new(display, params, ret, move |e, call| e.map_op(op, call.args))
}

/// Comparisons and logic take scalars only.
fn scalar_fn(display: &str, op: ScalarOp, kind: ScalarKind) -> Function {
    let params = ARG_NAMES[..op.arity()]
        .iter()
        .map(|n| Param::new(*n, ParamTy::Exact(Type::Scalar(kind))))
        .collect();
    let ret = ParamTy::Exact(Type::Scalar(op.result_kind(kind)));
    Function::new(display, params, ret, move |e, call| e.map_op(op, call.args))
}

fn reduce_fn(display: &str, reduce: Reduce, kind: ScalarKind, arity: usize) -> Function {
    let params = ARG_NAMES[..arity]
        .iter()
        .map(|n| Param::new(*n, ParamTy::Vector(kind)))
        .collect();
    let ret = match reduce {
        Reduce::Dot | Reduce::Length => Type::F32,
        Reduce::Eq | Reduce::Ne | Reduce::Approx => Type::BOOL,
    };
    Function::new(display, params, ParamTy::Exact(ret), move |e, call| e.reduce(reduce, call.args))
}

fn register_operators(decls: &mut Declarations, interner: &StringInterner) {
    let mut add = |export: &str, f: Function| decls.add_fn(interner.intern(export), Rc::new(f));

    let maps: [(&str, &str, ScalarOp, &[ScalarKind]); 8] = [
        ("_add", "+", ScalarOp::Add, NUMERIC),
        ("_sub", "-", ScalarOp::Sub, NUMERIC),
        ("_sub", "-", ScalarOp::Neg, NUMERIC),
        ("_mul", "*", ScalarOp::Mul, NUMERIC),
        ("_div", "/", ScalarOp::Div, NUMERIC),
        ("_rem", "%", ScalarOp::Rem, NUMERIC),
        ("_bitand", "&", ScalarOp::BitAnd, INT),
        ("_bitor", "|", ScalarOp::BitOr, INT),
    ];
    for (export, display, op, kinds) in maps {
        for &kind in kinds {
            add(export, map_fn(display, op, kind));
        }
    }
    add("_pow", map_fn("^", ScalarOp::Pow, ScalarKind::Float));

    for (export, display, op) in [
        ("_lt", "<", ScalarOp::Lt),
        ("_gt", ">", ScalarOp::Gt),
        ("_le", "<=", ScalarOp::Le),
        ("_ge", ">=", ScalarOp::Ge),
    ] {
        for &kind in NUMERIC {
            add(export, scalar_fn(display, op, kind));
        }
    }
    add("_and", scalar_fn("&&", ScalarOp::And, ScalarKind::Bool));
    add("_or", scalar_fn("||", ScalarOp::Or, ScalarKind::Bool));
    add("_not", scalar_fn("!", ScalarOp::Not, ScalarKind::Bool));

    for kind in ScalarKind::ALL {
        add("_eq", reduce_fn("==", Reduce::Eq, kind, 2));
        add("_ne", reduce_fn("!=", Reduce::Ne, kind, 2));
    }
    add("_approx", reduce_fn("~=", Reduce::Approx, ScalarKind::Float, 2));

    add(
        "_hash",
        Function::new("#", vec![Param::new("v", ParamTy::Any)], ParamTy::Exact(Type::I32), |e, call| {
            let v = call.args.first().ok_or_else(|| CompileError::bug("`#` without operand"))?;
            e.count(v)
        }),
    );
}

fn register_library(decls: &mut Declarations, interner: &StringInterner) {
    let mut add = |name: &str, f: Function| decls.add_fn(interner.intern(name), Rc::new(f));

    let maps: [(&str, ScalarOp, &[ScalarKind]); 12] = [
        ("min", ScalarOp::Min, NUMERIC),
        ("max", ScalarOp::Max, NUMERIC),
        ("clamp", ScalarOp::Clamp, NUMERIC),
        ("abs", ScalarOp::Abs, NUMERIC),
        ("mix", ScalarOp::Mix, FLOAT),
        ("fract", ScalarOp::Fract, FLOAT),
        ("floor", ScalarOp::Floor, FLOAT),
        ("sin", ScalarOp::Sin, FLOAT),
        ("cos", ScalarOp::Cos, FLOAT),
        ("exp", ScalarOp::Exp, FLOAT),
        ("sqrt", ScalarOp::Sqrt, FLOAT),
        ("ln", ScalarOp::Ln, FLOAT),
    ];
    for (name, op, kinds) in maps {
        for &kind in kinds {
            add(name, map_fn(name, op, kind));
        }
    }
    add("dot", reduce_fn("dot", Reduce::Dot, ScalarKind::Float, 2));
    add("length", reduce_fn("length", Reduce::Length, ScalarKind::Float, 1));
    add(
        "normalize",
        Function::new(
            "normalize",
            vec![Param::new("v", ParamTy::Vector(ScalarKind::Float))],
            ParamTy::Vector(ScalarKind::Float),
            |e, call| {
                let v = call.args.into_iter().next().ok_or_else(|| CompileError::bug("normalize arity"))?;
                e.normalize(v)
            },
        ),
    );

    add("f32", cast("f32", ScalarKind::Int, ScalarKind::Float));
    add("f32", cast("f32", ScalarKind::Float, ScalarKind::Float));
    add("i32", cast("i32", ScalarKind::Float, ScalarKind::Int));
    add("i32", cast("i32", ScalarKind::Int, ScalarKind::Int));
}

/// Explicit scalar conversion. `i32(x)` truncates toward zero.
fn cast(display: &str, from: ScalarKind, to: ScalarKind) -> Function {
    let params = vec![Param::new("x", ParamTy::Exact(Type::Scalar(from)))];
    Function::new(display, params, ParamTy::Exact(Type::Scalar(to)), move |e, call| {
        let x = call.args.into_iter().next().ok_or_else(|| CompileError::bug("cast arity"))?;
        if from == to {
            return Ok(x);
        }
        Ok(match (&x.payload, to) {
            (Payload::Const(Constant::Int(v)), ScalarKind::Float) => Value::float(*v as f32),
            (Payload::Const(Constant::Float(v)), ScalarKind::Int) => Value::int(v.trunc() as i32),
            (Payload::Code(text), _) => cast_text(e, text, to),
            _ => return Err(CompileError::bug(format!("cannot cast {x}"))),
        })
    })
}

fn cast_text(e: &Emitter<'_>, text: &str, to: ScalarKind) -> Value {
    let ty = Type::Scalar(to);
    match (e.target, to) {
        (Target::Glsl, _) => Value::code(format!("{}({text})", to.glsl_name()), ty),
        (Target::Js, ScalarKind::Int) => Value::code(format!("({text} | 0)"), ty),
        (Target::Js, _) => Value::code(text.to_owned(), ty),
    }
}
