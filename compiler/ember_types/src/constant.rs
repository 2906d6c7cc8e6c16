use crate::Target;

/// A value known at compile time.
///
/// Structs and arrays are both `Aggregate`: one entry per language-level
/// field or element, void fields included. Physical layout is applied only
/// when a constant is materialised as backend text.
#[derive(Clone, PartialEq, Debug)]
pub enum Constant {
    Float(f32),
    Int(i32),
    Bool(bool),
    Aggregate(Vec<Constant>),
}

impl Constant {
    /// The value of every void-typed expression.
    pub const VOID: Constant = Constant::Aggregate(Vec::new());

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Constant::Float(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Constant::Int(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Constant::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&[Constant]> {
        match self {
            Constant::Aggregate(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Constant::Aggregate(_))
    }

    /// Literal text for a scalar constant. Negative values come wrapped in
    /// parentheses so the text is atomic in any operator position.
    pub fn render_scalar(&self, target: Target) -> Option<String> {
        Some(match *self {
            Constant::Float(v) => render_float(v, target),
            Constant::Int(v) => render_int(v, target),
            Constant::Bool(v) => v.to_string(),
            Constant::Aggregate(_) => return None,
        })
    }
}

fn render_float(v: f32, target: Target) -> String {
    if v.is_nan() {
        return match target {
            Target::Js => "NaN".to_owned(),
            Target::Glsl => "uintBitsToFloat(0x7fc00000u)".to_owned(),
        };
    }
    if v.is_infinite() {
        return match (target, v > 0.0) {
            (Target::Js, true) => "Infinity".to_owned(),
            (Target::Js, false) => "(-Infinity)".to_owned(),
            (Target::Glsl, true) => "uintBitsToFloat(0x7f800000u)".to_owned(),
            (Target::Glsl, false) => "uintBitsToFloat(0xff800000u)".to_owned(),
        };
    }
    // Debug always keeps a fractional part or an exponent, which GLSL needs
    // to read the literal as a float.
    let text = format!("{v:?}");
    if v.is_sign_negative() && v != 0.0 {
        format!("({text})")
    } else if v == 0.0 {
        "0.0".to_owned()
    } else {
        text
    }
}

fn render_int(v: i32, target: Target) -> String {
    match (v, target) {
        (i32::MIN, Target::Glsl) => "(-2147483647 - 1)".to_owned(),
        (v, _) if v < 0 => format!("({v})"),
        (v, _) => v.to_string(),
    }
}

#[cfg(test)]
mod tests;
