//! `if`, `match` and `for`.

use super::expr::literal;
use crate::block::{indent_into, LoopFrame};
use crate::{Emitter, Value};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::ast::{Block, Expr, ExprKind, Ident, MatchArm, Pat, PatKind};
use ember_ir::Span;
use ember_types::{Constant, Target, Type};

/// Value of one branch plus the statements it emitted.
type Arm = (Value, Vec<String>);

impl Emitter<'_> {
    pub(crate) fn if_expr(&mut self, cond: &Expr, then_block: &Block, else_branch: Option<&Expr>) -> CompileResult<Value> {
        let c = self.expr(cond)?;
        let c = self.expect(c, &Type::BOOL, cond.span)?;
        if let Some(Constant::Bool(taken)) = c.as_const() {
            return match (taken, else_branch) {
                (true, _) => self.nested(|e| e.block_body(then_block)),
                (false, Some(other)) => self.expr(other),
                (false, None) => Ok(self.void_value()),
            };
        }
        let then_arm = self.scoped(|e| e.block_body(then_block))?;
        let else_arm = match else_branch {
            Some(other) => self.scoped(|e| e.expr(other))?,
            None => (self.void_value(), Vec::new()),
        };
        self.branch(&c, then_arm, else_arm, "`if`")
    }

    /// Join two runtime branches: a ternary when neither emitted anything,
    /// otherwise an `if`/`else` statement assigning a temporary.
    fn branch(&mut self, cond: &Value, then_arm: Arm, else_arm: Arm, what: &str) -> CompileResult<Value> {
        let (then_v, then_lines) = then_arm;
        let (else_v, else_lines) = else_arm;
        let ty = if then_v.ty.can_convert_from(&else_v.ty) {
            then_v.ty.clone()
        } else if else_v.ty.can_convert_from(&then_v.ty) {
            else_v.ty.clone()
        } else {
            return Err(CompileError::issue(format!(
                "{what} branches have different types `{}` and `{}`",
                then_v.ty, else_v.ty
            )));
        };
        let then_v = self.convert(then_v, &ty)?;
        let else_v = self.convert(else_v, &ty)?;
        let c = self.text(cond)?;

        if ty.is_void() {
            if !then_lines.is_empty() || !else_lines.is_empty() {
                self.if_else(&c, then_lines, else_lines);
            }
            return Ok(self.void_value());
        }
        if then_lines.is_empty() && else_lines.is_empty() && ty.as_array().is_none() {
            let a = self.text(&then_v)?;
            let b = self.text(&else_v)?;
            return Ok(Value::code(format!("({c} ? {a} : {b})"), ty));
        }

        let temp = self.program.ids.temp();
        self.declare_var(&temp, &ty, None, true);
        let mut then_lines = then_lines;
        then_lines.push(format!("{temp} = {};", self.text(&then_v)?));
        let mut else_lines = else_lines;
        else_lines.push(format!("{temp} = {};", self.text(&else_v)?));
        self.if_else(&c, then_lines, else_lines);
        Ok(Value::code(temp, ty))
    }

    fn if_else(&mut self, cond: &str, then_lines: Vec<String>, else_lines: Vec<String>) {
        let mut out = vec![format!("if ({cond}) {{")];
        indent_into(&mut out, then_lines);
        if !else_lines.is_empty() {
            out.push("} else {".into());
            indent_into(&mut out, else_lines);
        }
        out.push("}".into());
        self.lines(out);
    }

    // === match ===

    pub(crate) fn match_expr(&mut self, subject: &Expr, arms: &[MatchArm], span: Span) -> CompileResult<Value> {
        let subject = self.expr(subject)?;
        let subject = self.non_void(subject, "`match` subject")?;
        let subject = self.cache(subject)?;
        self.match_arms(&subject, arms, span)
    }

    fn match_arms(&mut self, subject: &Value, arms: &[MatchArm], span: Span) -> CompileResult<Value> {
        let Some((arm, rest)) = arms.split_first() else {
            return Err(CompileError::issue("match is not exhaustive").at(span));
        };
        let test = self
            .pattern_test(&arm.pat, subject)
            .map_err(|e| e.at(arm.pat.span))?;
        let run_arm = |e: &mut Self| {
            e.bind_pattern(&arm.pat, subject.clone())?;
            e.expr(&arm.body)
        };
        match test.as_const() {
            Some(Constant::Bool(true)) => return self.nested(run_arm),
            Some(_) => return self.match_arms(subject, rest, span),
            None => {}
        }
        let then_arm = self.scoped(run_arm)?;
        let else_arm = self.scoped(|e| e.match_arms(subject, rest, span))?;
        self.branch(&test, then_arm, else_arm, "`match`")
    }

    /// A `bool` value telling whether `value` matches `pat`.
    fn pattern_test(&mut self, pat: &Pat, value: &Value) -> CompileResult<Value> {
        match &pat.kind {
            PatKind::Ignore | PatKind::Bind { .. } => Ok(Value::bool(true)),
            PatKind::Lit(lit) => self.operator("_eq", "==", vec![value.clone(), literal(*lit)], pat.span),
            PatKind::Struct { name, fields, .. } => {
                let strukt = self.pattern_struct(*name, &value.ty)?;
                let mut all = Value::bool(true);
                for field in fields {
                    let index = self.pattern_field(&strukt, field.name)?;
                    let projected = self.field(value, index)?;
                    let test = self.pattern_test(&field.pat, &projected)?;
                    all = self.both(all, test, pat.span)?;
                }
                Ok(all)
            }
            PatKind::Array { items, rest } => {
                self.check_array_pattern(&value.ty, items.len(), *rest)?;
                let mut all = Value::bool(true);
                for (i, item) in items.iter().enumerate() {
                    let element = self.index(value.clone(), Value::int(i32::try_from(i).unwrap_or(i32::MAX)))?;
                    let test = self.pattern_test(item, &element)?;
                    all = self.both(all, test, pat.span)?;
                }
                Ok(all)
            }
        }
    }

    fn both(&mut self, a: Value, b: Value, span: Span) -> CompileResult<Value> {
        match (a.as_const(), b.as_const()) {
            (Some(Constant::Bool(true)), _) => Ok(b),
            (_, Some(Constant::Bool(true))) => Ok(a),
            (Some(Constant::Bool(false)), _) => Ok(a),
            (_, Some(Constant::Bool(false))) => Ok(b),
            _ => self.operator("_and", "&&", vec![a, b], span),
        }
    }

    // === for ===

    pub(crate) fn for_expr(&mut self, label: Option<Ident>, pat: &Pat, iter: &Expr, body: &Block) -> CompileResult<Value> {
        if !pat.is_irrefutable() {
            return Err(CompileError::issue("refutable pattern in `for`").at(pat.span));
        }
        let backend_label = match (label, self.target) {
            (Some(label), Target::Js) => {
                let stem = self.name(label.name);
                Some(self.fresh(stem))
            }
            (Some(label), Target::Glsl) => {
                return Err(CompileError::todo("loop labels on glsl").at(label.span));
            }
            (None, _) => None,
        };
        let int = match self.target {
            Target::Glsl => "int",
            Target::Js => "let",
        };

        let (header, element) = match &iter.kind {
            ExprKind::Range { start, end } => {
                let (Some(start), Some(end)) = (start, end) else {
                    return Err(CompileError::issue("a `for` range needs both bounds").at(iter.span));
                };
                let from = self.expr(start)?;
                let from = self.expect(from, &Type::I32, start.span)?;
                let to = self.expr(end)?;
                let to = self.expect(to, &Type::I32, end.span)?;
                let to = self.cache(to)?;
                let stem = match &pat.kind {
                    PatKind::Bind { name, .. } => self.name(*name),
                    _ => "i",
                };
                let var = self.fresh(stem);
                let header = format!(
                    "for ({int} {var} = {}; {var} < {}; {var}++)",
                    self.text(&from)?,
                    self.text(&to)?
                );
                (header, Value::code(var, Type::I32))
            }
            _ => {
                let array = self.expr(iter)?;
                let Some(of) = array.ty.as_array().map(|a| (a.of.clone(), a.len)) else {
                    return Err(CompileError::issue(format!("cannot iterate over `{}`", array.ty)).at(iter.span));
                };
                let text = self.cached_text(array)?;
                let index = self.program.ids.temp();
                let header = format!("for ({int} {index} = 0; {index} < {}; {index}++)", of.1);
                (header, Value::code(format!("{text}[{index}]"), of.0))
            }
        };

        self.frame.loops.push(LoopFrame {
            label: label.map(|l| l.name),
            backend: backend_label.clone(),
        });
        let result = self.scoped(|e| {
            e.bind_pattern(pat, element)?;
            let tail = e.block_body(body)?;
            e.discard(&tail)
        });
        self.frame.loops.pop();
        let ((), lines) = result?;

        let mut out = vec![match backend_label {
            Some(label) => format!("{label}: {header} {{"),
            None => format!("{header} {{"),
        }];
        indent_into(&mut out, lines);
        out.push("}".into());
        self.lines(out);
        Ok(self.void_value())
    }
}
