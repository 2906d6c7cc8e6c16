use ember_types::{Constant, Type};
use std::fmt;

/// Either a compile-time constant or backend source text.
#[derive(Clone, PartialEq, Debug)]
pub enum Payload {
    Const(Constant),
    /// Runtime expression. The text is always atomic: an identifier, a
    /// literal, a call, or parenthesised.
    Code(String),
}

/// Result of lowering one expression.
#[derive(Clone, PartialEq, Debug)]
pub struct Value {
    pub payload: Payload,
    pub ty: Type,
    /// The text names a place that can be assigned to.
    pub assignable: bool,
}

impl Value {
    #[inline]
    pub fn constant(constant: Constant, ty: Type) -> Self {
        Value {
            payload: Payload::Const(constant),
            ty,
            assignable: false,
        }
    }

    #[inline]
    pub fn code(text: impl Into<String>, ty: Type) -> Self {
        Value {
            payload: Payload::Code(text.into()),
            ty,
            assignable: false,
        }
    }

    /// A mutable local or a projection of one.
    #[inline]
    pub fn place(text: impl Into<String>, ty: Type) -> Self {
        Value {
            payload: Payload::Code(text.into()),
            ty,
            assignable: true,
        }
    }

    pub fn int(v: i32) -> Self {
        Value::constant(Constant::Int(v), Type::I32)
    }

    pub fn float(v: f32) -> Self {
        Value::constant(Constant::Float(v), Type::F32)
    }

    pub fn bool(v: bool) -> Self {
        Value::constant(Constant::Bool(v), Type::BOOL)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        matches!(self.payload, Payload::Const(_))
    }

    #[inline]
    pub fn as_const(&self) -> Option<&Constant> {
        match &self.payload {
            Payload::Const(c) => Some(c),
            Payload::Code(_) => None,
        }
    }

    #[inline]
    pub fn as_code(&self) -> Option<&str> {
        match &self.payload {
            Payload::Code(text) => Some(text),
            Payload::Const(_) => None,
        }
    }

    /// Runtime text that can be repeated without recomputation: an
    /// identifier, possibly projected (`p_3.xy`, `a_2[0]`).
    pub fn is_simple(&self) -> bool {
        match &self.payload {
            Payload::Const(_) => true,
            Payload::Code(text) => is_simple_text(text),
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = ty;
        self
    }
}

/// Identifiers with optional `.field` and constant `[n]` projections.
///
/// A bracket holding anything but digits reads a variable, so the text
/// can change meaning when that variable is reassigned.
pub(crate) fn is_simple_text(text: &str) -> bool {
    fn ident(bytes: &[u8], mut i: usize) -> Option<usize> {
        let start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'$')) {
            i += 1;
        }
        (i > start).then_some(i)
    }

    let bytes = text.as_bytes();
    match bytes.first() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, b'_' | b'$') => {}
        _ => return false,
    }
    let Some(mut i) = ident(bytes, 0) else {
        return false;
    };
    while i < bytes.len() {
        match bytes[i] {
            b'.' => match ident(bytes, i + 1) {
                Some(next) => i = next,
                None => return false,
            },
            b'[' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end == start || bytes.get(end) != Some(&b']') {
                    return false;
                }
                i = end + 1;
            }
            _ => return false,
        }
    }
    true
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Const(c) => write!(f, "{c:?}: {}", self.ty),
            Payload::Code(text) => write!(f, "`{text}`: {}", self.ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_text() {
        for text in ["x_3", "p_2.xy", "a_1[0]", "$t", "u_t._1"] {
            assert!(is_simple_text(text), "{text}");
        }
        for text in ["(a + b)", "f(x)", "1.0", "", "a_1[i_2 + 1]", "a_1[i_2]", "a_1[]", "p_2."] {
            assert!(!is_simple_text(text), "{text}");
        }
    }

    #[test]
    fn constants_are_simple() {
        assert!(Value::float(1.5).is_simple());
        assert!(Value::int(3).is_const());
        assert!(!Value::code("f(x)", Type::F32).is_simple());
        assert!(Value::place("x_1", Type::F32).assignable);
    }
}
