//! Physical layout of structs.
//!
//! [`compute_layout`] is a pure function of the field reprs, the matrix tag
//! and the target. The paths are tried in a fixed order:
//!
//! 1. no stored fields: `Void`
//! 2. one stored field: `Transparent`, the struct is its field
//! 3. (GLSL) `matrix` tag: `Matrix`, one column per stored field
//! 4. (GLSL) stored fields are vectors of one kind, 2 to 4 components in
//!    total: `VectorMerge`, fields become swizzles
//! 5. otherwise `Struct`, positional slots
//!
//! JavaScript has no native vectors, so it only ever takes paths 1, 2 and 5.

use crate::{Repr, ScalarKind, Target};
use ember_diagnostic::{CompileError, CompileResult};

const SWIZZLE: &[u8; 4] = b"xyzw";

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LayoutPath {
    Void,
    Transparent,
    VectorMerge,
    Matrix,
    Struct,
}

/// How to read one language-level field out of the struct's repr.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Accessor {
    /// Void field: the value is the constant zero of its type.
    Zero,
    /// The struct value is the field value.
    Identity,
    /// `.xy`, `.z`, ...
    Swizzle(String),
    /// `m[i]`
    Column(u8),
    /// GLSL `s._i`, JavaScript `s[i]`.
    Slot(u32),
}

/// How to build the struct's repr from its stored field values.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ctor {
    /// Nothing is stored.
    Unit,
    /// The single stored value is the struct.
    Forward,
    /// Native constructor call: `vec4(a, b)`, `mat2(c0, c1)`, `_S7(a, b)`.
    Call(String),
    /// JavaScript array literal `[a, b]`.
    Record,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Layout {
    pub path: LayoutPath,
    pub repr: Repr,
    /// One per language-level field, void fields included.
    pub accessors: Vec<Accessor>,
    pub ctor: Ctor,
    /// Reprs of the stored slots, for the `Struct` path only.
    pub slots: Vec<Repr>,
}

impl Layout {
    fn new(path: LayoutPath, repr: Repr, accessors: Vec<Accessor>, ctor: Ctor) -> Self {
        Layout {
            path,
            repr,
            accessors,
            ctor,
            slots: Vec::new(),
        }
    }

    /// Layouts that can share one physical representation, as required of
    /// the variants of a struct group.
    pub fn is_compatible(&self, other: &Layout) -> bool {
        self.path == other.path && self.repr == other.repr && self.slots == other.slots
    }

    /// `struct _S7 {\n  vec2 _0;\n  float _1;\n};` for a GLSL struct layout.
    pub fn glsl_declaration(&self) -> Option<String> {
        let (LayoutPath::Struct, Repr::Struct { id }) = (self.path, &self.repr) else {
            return None;
        };
        let mut out = format!("struct _S{id} {{\n");
        for (i, slot) in self.slots.iter().enumerate() {
            out.push_str(&format!("  {} _{i};\n", slot.glsl_name()));
        }
        out.push_str("};");
        Some(out)
    }
}

/// Choose the layout for a struct with the given field reprs.
///
/// `id` is the struct id (shared by a whole group) used if the struct path
/// is taken.
pub fn compute_layout(fields: &[Repr], matrix: bool, target: Target, id: u32) -> CompileResult<Layout> {
    let stored: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, repr)| !repr.is_void())
        .map(|(i, _)| i)
        .collect();
    let mut accessors = vec![Accessor::Zero; fields.len()];

    match *stored.as_slice() {
        [] => return Ok(Layout::new(LayoutPath::Void, Repr::Void, accessors, Ctor::Unit)),
        [only] => {
            accessors[only] = Accessor::Identity;
            return Ok(Layout::new(
                LayoutPath::Transparent,
                fields[only].clone(),
                accessors,
                Ctor::Forward,
            ));
        }
        _ => {}
    }

    if target.has_native_vectors() {
        if matrix {
            return matrix_layout(fields, &stored, accessors);
        }
        if let Some(layout) = merge_layout(fields, &stored, &mut accessors) {
            return Ok(layout);
        }
    }

    let mut slots = Vec::with_capacity(stored.len());
    for (slot, &i) in (0u32..).zip(&stored) {
        accessors[i] = Accessor::Slot(slot);
        slots.push(fields[i].clone());
    }
    let ctor = match target {
        Target::Glsl => Ctor::Call(format!("_S{id}")),
        Target::Js => Ctor::Record,
    };
    Ok(Layout {
        path: LayoutPath::Struct,
        repr: Repr::Struct { id },
        accessors,
        ctor,
        slots,
    })
}

fn matrix_layout(fields: &[Repr], stored: &[usize], mut accessors: Vec<Accessor>) -> CompileResult<Layout> {
    let cols = u8::try_from(stored.len()).unwrap_or(u8::MAX);
    let mut rows = None;
    for (col, &i) in (0u8..).zip(stored) {
        match fields[i].vector() {
            Some((ScalarKind::Float, w)) if (2..=4).contains(&w) && rows.map_or(true, |r| r == w) => {
                rows = Some(w);
            }
            _ => return Err(CompileError::bug(format!("matrix column {col} is not a float vector"))),
        }
        accessors[i] = Accessor::Column(col);
    }
    let rows = match rows {
        Some(rows) if (2..=4).contains(&cols) => rows,
        _ => return Err(CompileError::bug(format!("matrix has {cols} columns"))),
    };
    let repr = Repr::Matrix { cols, rows };
    let ctor = Ctor::Call(repr.glsl_name());
    Ok(Layout::new(LayoutPath::Matrix, repr, accessors, ctor))
}

fn merge_layout(fields: &[Repr], stored: &[usize], accessors: &mut [Accessor]) -> Option<Layout> {
    let mut kind = None;
    let mut width = 0usize;
    for &i in stored {
        let (k, w) = fields[i].vector()?;
        if kind.is_some_and(|kind| kind != k) {
            return None;
        }
        kind = Some(k);
        width += usize::from(w);
    }
    if !(2..=4).contains(&width) {
        return None;
    }

    let mut offset = 0;
    for &i in stored {
        let w = usize::from(fields[i].vector()?.1);
        let letters = String::from_utf8_lossy(&SWIZZLE[offset..offset + w]).into_owned();
        accessors[i] = Accessor::Swizzle(letters);
        offset += w;
    }
    let repr = Repr::Vector {
        kind: kind?,
        width: u8::try_from(width).ok()?,
    };
    let ctor = Ctor::Call(repr.glsl_name());
    Some(Layout::new(LayoutPath::VectorMerge, repr, accessors.to_vec(), ctor))
}

#[cfg(test)]
mod tests;
