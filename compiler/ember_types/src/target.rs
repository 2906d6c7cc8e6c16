use std::fmt;

/// Backend language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Target {
    /// General-purpose scripting form: JavaScript.
    Js,
    /// Shader form: GLSL ES 3.00.
    Glsl,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Js, Target::Glsl];

    /// Dense index for per-target tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Target::Js => 0,
            Target::Glsl => 1,
        }
    }

    /// Label used by `source <label> { .. }` blocks and `--target`.
    pub fn name(self) -> &'static str {
        match self {
            Target::Js => "js",
            Target::Glsl => "glsl",
        }
    }

    pub fn from_name(name: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The backend has native vector and matrix types.
    #[inline]
    pub fn has_native_vectors(self) -> bool {
        self == Target::Glsl
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
