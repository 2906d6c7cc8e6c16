use crate::Constant;
use std::fmt;

/// Element kind of scalars and native vectors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    Float,
    Int,
    Bool,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 3] = [ScalarKind::Float, ScalarKind::Int, ScalarKind::Bool];

    /// Source-level name.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Float => "f32",
            ScalarKind::Int => "i32",
            ScalarKind::Bool => "bool",
        }
    }

    pub fn glsl_name(self) -> &'static str {
        match self {
            ScalarKind::Float => "float",
            ScalarKind::Int => "int",
            ScalarKind::Bool => "bool",
        }
    }

    /// Prefix of the GLSL vector family: `vec3`, `ivec3`, `bvec3`.
    pub fn glsl_vector_prefix(self) -> &'static str {
        match self {
            ScalarKind::Float => "",
            ScalarKind::Int => "i",
            ScalarKind::Bool => "b",
        }
    }

    /// Name of the prelude vector type of `width` components.
    pub fn vector_name(self, width: u8) -> String {
        if width == 1 {
            self.name().to_owned()
        } else {
            format!("{}vec{width}", self.glsl_vector_prefix())
        }
    }

    pub fn zero(self) -> Constant {
        match self {
            ScalarKind::Float => Constant::Float(0.0),
            ScalarKind::Int => Constant::Int(0),
            ScalarKind::Bool => Constant::Bool(false),
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        self != ScalarKind::Bool
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
