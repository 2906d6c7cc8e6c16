//! Function declarations and overload resolution.

use crate::{Emitter, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::Span;
use ember_types::{ScalarKind, Type};
use std::fmt;
use std::rc::Rc;

/// What a parameter accepts.
#[derive(Clone, Debug)]
pub enum ParamTy {
    /// This type, or one that converts to it.
    Exact(Type),
    /// Any vector-shaped type (scalar or up to 4 components) of this kind.
    Vector(ScalarKind),
    /// Anything; the implementation checks.
    Any,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub ty: ParamTy,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamTy) -> Self {
        Param { name: name.into(), ty }
    }
}

/// Arguments of one call, already converted to the parameter types.
#[derive(Debug)]
pub struct CallArgs {
    pub args: Vec<Value>,
    pub type_args: Vec<Type>,
    pub span: Span,
}

type Run = dyn Fn(&mut Emitter<'_>, CallArgs) -> CompileResult<Value>;

/// A callable registered in [`Declarations`](crate::Declarations).
///
/// `run` decides per call between folding (every argument constant) and
/// emitting backend text.
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: ParamTy,
    /// Number of explicit type parameters; non-zero for templates.
    pub generics: usize,
    run: Rc<Run>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        ret: ParamTy,
        run: impl Fn(&mut Emitter<'_>, CallArgs) -> CompileResult<Value> + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            params,
            ret,
            generics: 0,
            run: Rc::new(run),
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: usize) -> Self {
        self.generics = generics;
        self
    }

    pub fn call(&self, emitter: &mut Emitter<'_>, args: CallArgs) -> CompileResult<Value> {
        (self.run)(emitter, args)
    }

    /// `fn name(a: T, b: U) -> R`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| format!("{}: {}", p.name, p.ty)).collect();
        format!("fn {}({}) -> {}", self.name, params.join(", "), self.ret)
    }

    /// Score of this function for the argument types, or `None` if it does
    /// not accept them. An exact parameter match scores 2, a shape match 1
    /// and an implicit conversion 0.
    pub fn score(&self, args: &[Type]) -> Option<u32> {
        if args.len() != self.params.len() {
            return None;
        }
        let mut total = 0;
        for (param, arg) in self.params.iter().zip(args) {
            total += match &param.ty {
                ParamTy::Exact(ty) if ty == arg => 2,
                ParamTy::Exact(ty) if ty.can_convert_from(arg) => 0,
                ParamTy::Vector(kind) => match arg.vector_shape() {
                    Some((k, _)) if k == *kind => 1,
                    _ if Type::Scalar(*kind).can_convert_from(arg) => 0,
                    _ => return None,
                },
                ParamTy::Any => 1,
                ParamTy::Exact(_) => return None,
            };
        }
        Some(total)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

impl fmt::Display for ParamTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamTy::Exact(ty) => write!(f, "{ty}"),
            ParamTy::Vector(kind) => write!(f, "{}vecN", kind.glsl_vector_prefix()),
            ParamTy::Any => f.write_str("any"),
        }
    }
}

/// One overload candidate with the depth of the scope it came from
/// (0 = innermost).
pub type Candidate = (usize, Rc<Function>);

/// Pick the best overload for `args`.
///
/// Highest total score wins; among equal scores the innermost scope wins.
/// Two best candidates from the same scope are ambiguous.
pub fn resolve<'c>(name: &str, candidates: &'c [Candidate], args: &[Type]) -> CompileResult<&'c Rc<Function>> {
    if candidates.is_empty() {
        return Err(CompileError::issue(format!("`{name}` is not defined")));
    }
    let mut best: Option<(u32, usize, &Rc<Function>)> = None;
    let mut ambiguous: Vec<&Rc<Function>> = Vec::new();
    for (depth, f) in candidates {
        let Some(score) = f.score(args) else { continue };
        match best {
            Some((s, d, _)) if score < s || (score == s && *depth > d) => {}
            Some((s, d, other)) if score == s && *depth == d => {
                if ambiguous.is_empty() {
                    ambiguous.push(other);
                }
                ambiguous.push(f);
            }
            _ => {
                best = Some((score, *depth, f));
                ambiguous.clear();
            }
        }
    }
    let arg_list: Vec<String> = args.iter().map(ToString::to_string).collect();
    match best {
        Some((_, _, f)) if ambiguous.is_empty() => Ok(f),
        Some(_) => Err(CompileError::issue(format!(
            "call to `{name}` with ({}) is ambiguous between:\n{}",
            arg_list.join(", "),
            list(ambiguous.iter().copied())
        ))),
        None => Err(CompileError::issue(format!(
            "no overload of `{name}` accepts ({}); candidates are:\n{}",
            arg_list.join(", "),
            list(candidates.iter().map(|(_, f)| f))
        ))),
    }
}

fn list<'a>(fns: impl Iterator<Item = &'a Rc<Function>>) -> String {
    fns.map(|f| format!("  {}", f.signature())).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests;
