use crate::ScalarKind;
use std::fmt;

/// Physical representation of a value on one backend.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Repr {
    /// No runtime storage.
    Void,
    /// A scalar (`width == 1`) or native vector of 2 to 4 components.
    Vector { kind: ScalarKind, width: u8 },
    /// Native float matrix.
    Matrix { cols: u8, rows: u8 },
    /// Positional record; GLSL declares it as `struct _S{id}`, JS uses an
    /// array.
    Struct { id: u32 },
    Array { of: Box<Repr>, len: u32 },
}

impl Repr {
    #[inline]
    pub fn scalar(kind: ScalarKind) -> Repr {
        Repr::Vector { kind, width: 1 }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Repr::Void)
    }

    /// Element kind and width of a scalar or vector.
    pub fn vector(&self) -> Option<(ScalarKind, u8)> {
        match *self {
            Repr::Vector { kind, width } => Some((kind, width)),
            _ => None,
        }
    }

    /// GLSL spelling: `float`, `ivec2`, `mat3x2`, `_S4`, `vec2[3]`.
    pub fn glsl_name(&self) -> String {
        match self {
            Repr::Void => "void".to_owned(),
            Repr::Vector { kind, width: 1 } => kind.glsl_name().to_owned(),
            Repr::Vector { kind, width } => format!("{}vec{width}", kind.glsl_vector_prefix()),
            Repr::Matrix { cols, rows } if cols == rows => format!("mat{cols}"),
            Repr::Matrix { cols, rows } => format!("mat{cols}x{rows}"),
            Repr::Struct { id } => format!("_S{id}"),
            Repr::Array { of, len } => format!("{}[{len}]", of.glsl_name()),
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glsl_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn glsl_names() {
        let cases = [
            (Repr::Void, "void"),
            (Repr::scalar(ScalarKind::Float), "float"),
            (Repr::scalar(ScalarKind::Bool), "bool"),
            (Repr::Vector { kind: ScalarKind::Float, width: 3 }, "vec3"),
            (Repr::Vector { kind: ScalarKind::Int, width: 2 }, "ivec2"),
            (Repr::Vector { kind: ScalarKind::Bool, width: 4 }, "bvec4"),
            (Repr::Matrix { cols: 2, rows: 2 }, "mat2"),
            (Repr::Matrix { cols: 3, rows: 2 }, "mat3x2"),
            (Repr::Struct { id: 7 }, "_S7"),
            (
                Repr::Array { of: Box::new(Repr::Vector { kind: ScalarKind::Float, width: 2 }), len: 3 },
                "vec2[3]",
            ),
        ];
        for (repr, name) in cases {
            assert_eq!(repr.glsl_name(), name);
        }
    }
}
