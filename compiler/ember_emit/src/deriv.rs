//! Symbolic forward differentiation of `d/dx body`.
//!
//! The result is an ordinary expression that goes through normal emission.
//! Identifiers other than the variable count as constants.

use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{BinaryOp, Expr, ExprKind, Lit, UnaryOp};
use ember_ir::{Name, Span, StringInterner};
use ember_stack::ensure_sufficient_stack;

/// `d body / d var`.
pub fn differentiate(body: &Expr, var: Name, interner: &StringInterner) -> CompileResult<Expr> {
    Deriv { var, interner }.d(body)
}

struct Deriv<'a> {
    var: Name,
    interner: &'a StringInterner,
}

impl Deriv<'_> {
    fn d(&self, e: &Expr) -> CompileResult<Expr> {
        ensure_sufficient_stack(|| self.d_inner(e))
    }

    fn d_inner(&self, e: &Expr) -> CompileResult<Expr> {
        let span = e.span;
        Ok(match &e.kind {
            ExprKind::Lit(_) | ExprKind::Param(_) | ExprKind::Builtin(_) | ExprKind::Symbol(_) => float(0.0, span),
            ExprKind::Ident(name) => float(if *name == self.var { 1.0 } else { 0.0 }, span),
            ExprKind::Unary { op: UnaryOp::Neg, operand } => neg(self.d(operand)?),
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinaryOp::Add => add(self.d(lhs)?, self.d(rhs)?),
                BinaryOp::Sub => sub(self.d(lhs)?, self.d(rhs)?),
                BinaryOp::Mul => add(
                    mul(self.d(lhs)?, (**rhs).clone()),
                    mul((**lhs).clone(), self.d(rhs)?),
                ),
                BinaryOp::Div => div(
                    sub(
                        mul(self.d(lhs)?, (**rhs).clone()),
                        mul((**lhs).clone(), self.d(rhs)?),
                    ),
                    mul((**rhs).clone(), (**rhs).clone()),
                ),
                BinaryOp::Pow if !self.mentions(rhs) => {
                    let lowered = binary(BinaryOp::Pow, (**lhs).clone(), sub((**rhs).clone(), float(1.0, span)));
                    mul(mul((**rhs).clone(), lowered), self.d(lhs)?)
                }
                BinaryOp::Pow => {
                    return Err(CompileError::todo("derivative of a power with a variable exponent").at(span));
                }
                _ => return Err(unsupported(span)),
            },
            ExprKind::Call { callee, type_args, args } if type_args.is_empty() && args.len() == 1 => {
                let name = match callee.kind {
                    ExprKind::Ident(name) | ExprKind::Builtin(name) => self.interner.lookup(name),
                    _ => return Err(unsupported(span)),
                };
                let u = &args[0];
                let du = self.d(u)?;
                let outer = match name {
                    "sin" => self.call("cos", u.clone()),
                    "cos" => neg(self.call("sin", u.clone())),
                    "exp" => self.call("exp", u.clone()),
                    "sqrt" => return Ok(div(du, mul(float(2.0, span), self.call("sqrt", u.clone())))),
                    "ln" => return Ok(div(du, u.clone())),
                    _ => return Err(unsupported(span)),
                };
                mul(outer, du)
            }
            ExprKind::Block(block) if block.stmts.is_empty() => match &block.tail {
                Some(tail) => self.d(tail)?,
                None => return Err(unsupported(span)),
            },
            _ => return Err(unsupported(span)),
        })
    }

    /// Whether `e` may depend on the variable.
    fn mentions(&self, e: &Expr) -> bool {
        match &e.kind {
            ExprKind::Lit(_) | ExprKind::Param(_) | ExprKind::Builtin(_) | ExprKind::Symbol(_) => false,
            ExprKind::Ident(name) => *name == self.var,
            ExprKind::Unary { operand, .. } => self.mentions(operand),
            ExprKind::Binary { lhs, rhs, .. } => self.mentions(lhs) || self.mentions(rhs),
            ExprKind::Call { args, .. } => args.iter().any(|a| self.mentions(a)),
            _ => true,
        }
    }

    /// A call to the prelude function `name`, immune to user shadowing.
    fn call(&self, name: &str, arg: Expr) -> Expr {
        let span = arg.span;
        Expr::new(
            ExprKind::Call {
                callee: Box::new(Expr::new(ExprKind::Builtin(self.interner.intern(name)), span)),
                type_args: Vec::new(),
                args: vec![arg],
            },
            span,
        )
    }
}

fn unsupported(span: Span) -> CompileError {
    CompileError::todo("derivative of this expression").at(span)
}

// === Simplifying constructors ===

fn float(v: f64, span: Span) -> Expr {
    Expr::new(ExprKind::Lit(Lit::Float(v)), span)
}

fn literal_value(e: &Expr) -> Option<f64> {
    match e.kind {
        ExprKind::Lit(Lit::Float(v)) => Some(v),
        ExprKind::Lit(Lit::Int(v)) => Some(f64::from(v)),
        _ => None,
    }
}

fn is(e: &Expr, v: f64) -> bool {
    literal_value(e) == Some(v)
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span.merge(rhs.span);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}

fn add(a: Expr, b: Expr) -> Expr {
    if is(&a, 0.0) {
        b
    } else if is(&b, 0.0) {
        a
    } else {
        binary(BinaryOp::Add, a, b)
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    if is(&b, 0.0) {
        a
    } else if is(&a, 0.0) {
        neg(b)
    } else {
        binary(BinaryOp::Sub, a, b)
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    if is(&a, 0.0) || is(&b, 0.0) {
        float(0.0, a.span.merge(b.span))
    } else if is(&a, 1.0) {
        b
    } else if is(&b, 1.0) {
        a
    } else {
        binary(BinaryOp::Mul, a, b)
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    if is(&a, 0.0) || is(&b, 1.0) {
        a
    } else {
        binary(BinaryOp::Div, a, b)
    }
}

fn neg(a: Expr) -> Expr {
    if let Some(v) = literal_value(&a) {
        return float(-v, a.span);
    }
    let span = a.span;
    Expr::new(
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(a),
        },
        span,
    )
}

#[cfg(test)]
mod tests;
