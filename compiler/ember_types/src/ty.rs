//! Language-level types.

use crate::layout::compute_layout;
use crate::{IdGenerator, Layout, LayoutPath, Repr, ScalarKind, Target};
use ember_diagnostic::{CompileError, CompileResult};
use ember_ir::Name;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use tracing::debug;

/// A language-level type.
///
/// Struct identity is nominal: two struct types are equal iff they come
/// from the same declaration (same `uid`).
#[derive(Clone, Debug)]
pub enum Type {
    Scalar(ScalarKind),
    Struct(Rc<StructType>),
    Array(Rc<ArrayType>),
    Alt(Rc<AltType>),
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: Name,
    pub ty: Type,
}

#[derive(Debug)]
pub struct StructType {
    pub uid: u32,
    /// Struct id shared by every variant of the declaring group.
    pub group: u32,
    pub name: String,
    pub fields: Vec<Field>,
    pub matrix: bool,
    layouts: [Layout; 2],
}

#[derive(Debug)]
pub struct ArrayType {
    pub of: Type,
    pub len: u32,
}

/// Union of structs from one group, members ordered by `uid`.
#[derive(Debug)]
pub struct AltType {
    pub members: Vec<Rc<StructType>>,
}

impl StructType {
    /// Declare the variants of one struct group together.
    ///
    /// Every variant gets its layouts now; a group is rejected unless all
    /// variants share one physical layout on every target.
    pub fn declare_group(
        variants: Vec<(String, Vec<Field>)>,
        matrix: bool,
        ids: &mut IdGenerator,
    ) -> CompileResult<Vec<Rc<StructType>>> {
        let group = ids.next_id();
        let mut out: Vec<Rc<StructType>> = Vec::with_capacity(variants.len());
        for (name, fields) in variants {
            if matrix {
                validate_matrix(&name, &fields)?;
            }
            let js = layout_for(&fields, matrix, Target::Js, group)?;
            let glsl = layout_for(&fields, matrix, Target::Glsl, group)?;
            if let Some(first) = out.first() {
                for (target, layout) in [(Target::Js, &js), (Target::Glsl, &glsl)] {
                    let expected = first.layout(target);
                    if !expected.is_compatible(layout) {
                        return Err(CompileError::issue(format!(
                            "struct group variants must share one layout, but `{}` is {:?} ({}) and `{name}` is {:?} ({}) on {target}",
                            first.name, expected.path, expected.repr, layout.path, layout.repr,
                        )));
                    }
                }
            }
            debug!(name = %name, group, js = ?js.path, glsl = ?glsl.path, "declared struct");
            out.push(Rc::new(StructType {
                uid: ids.next_id(),
                group,
                name,
                fields,
                matrix,
                layouts: [js, glsl],
            }));
        }
        Ok(out)
    }

    /// Declare a struct that is not part of a group.
    pub fn declare(name: String, fields: Vec<Field>, matrix: bool, ids: &mut IdGenerator) -> CompileResult<Rc<StructType>> {
        Self::declare_group(vec![(name, fields)], matrix, ids)?
            .pop()
            .ok_or_else(|| CompileError::bug("struct group produced no variant"))
    }

    #[inline]
    pub fn layout(&self, target: Target) -> &Layout {
        &self.layouts[target.index()]
    }

    pub fn is_void(&self) -> bool {
        self.layouts[0].path == LayoutPath::Void
    }

    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

fn layout_for(fields: &[Field], matrix: bool, target: Target, group: u32) -> CompileResult<Layout> {
    let reprs: Vec<Repr> = fields.iter().map(|f| f.ty.repr(target)).collect();
    compute_layout(&reprs, matrix, target, group)
}

fn validate_matrix(name: &str, fields: &[Field]) -> CompileResult<()> {
    let columns: Vec<&Field> = fields.iter().filter(|f| !f.ty.is_void()).collect();
    if !(2..=4).contains(&columns.len()) {
        return Err(CompileError::issue(format!(
            "matrix `{name}` needs 2 to 4 columns, found {}",
            columns.len()
        )));
    }
    let mut rows = None;
    for column in columns {
        match column.ty.vector_shape() {
            Some((ScalarKind::Float, w)) if (2..=4).contains(&w) && rows.map_or(true, |r| r == w) => {
                rows = Some(w);
            }
            _ => {
                return Err(CompileError::issue(format!(
                    "matrix `{name}` columns must be float vectors of one width, found `{}`",
                    column.ty
                )))
            }
        }
    }
    Ok(())
}

impl Type {
    pub const F32: Type = Type::Scalar(ScalarKind::Float);
    pub const I32: Type = Type::Scalar(ScalarKind::Int);
    pub const BOOL: Type = Type::Scalar(ScalarKind::Bool);

    pub fn array(of: Type, len: u32) -> CompileResult<Type> {
        if of.is_void() {
            return Err(CompileError::issue(format!("array elements cannot be void (`{of}`)")));
        }
        if len == 0 {
            return Err(CompileError::issue("array length must be positive"));
        }
        Ok(Type::Array(Rc::new(ArrayType { of, len })))
    }

    /// Union of structs declared in one group. A single distinct member is
    /// just that struct.
    pub fn alt(members: Vec<Rc<StructType>>) -> CompileResult<Type> {
        let mut members = members;
        members.sort_by_key(|m| m.uid);
        members.dedup_by_key(|m| m.uid);
        let Some(first) = members.first() else {
            return Err(CompileError::bug("empty alternative type"));
        };
        if let Some(stray) = members.iter().find(|m| m.group != first.group) {
            return Err(CompileError::issue(format!(
                "`{}` and `{}` were not declared in one struct group",
                first.name, stray.name
            )));
        }
        if members.len() == 1 {
            return Ok(Type::Struct(first.clone()));
        }
        Ok(Type::Alt(Rc::new(AltType { members })))
    }

    pub fn repr(&self, target: Target) -> Repr {
        match self {
            Type::Scalar(kind) => Repr::scalar(*kind),
            Type::Struct(s) => s.layout(target).repr.clone(),
            Type::Array(a) => Repr::Array {
                of: Box::new(a.of.repr(target)),
                len: a.len,
            },
            Type::Alt(a) => a.members[0].layout(target).repr.clone(),
        }
    }

    /// Backend spelling on GLSL.
    pub fn glsl_name(&self) -> String {
        self.repr(Target::Glsl).glsl_name()
    }

    pub fn is_void(&self) -> bool {
        match self {
            Type::Struct(s) => s.is_void(),
            Type::Alt(a) => a.members[0].is_void(),
            Type::Scalar(_) | Type::Array(_) => false,
        }
    }

    #[inline]
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match *self {
            Type::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Rc<StructType>> {
        match self {
            Type::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Type::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Element kind and component count when the type is a homogeneous
    /// vector of 1 to 4 scalars: a scalar, or a non-matrix struct whose
    /// stored fields are all vector shaped with one kind.
    pub fn vector_shape(&self) -> Option<(ScalarKind, u8)> {
        match self {
            Type::Scalar(kind) => Some((*kind, 1)),
            Type::Struct(s) if !s.matrix => {
                let mut kind = None;
                let mut width = 0u8;
                for field in s.fields.iter().filter(|f| !f.ty.is_void()) {
                    let (k, w) = field.ty.vector_shape()?;
                    if kind.is_some_and(|kind| kind != k) {
                        return None;
                    }
                    kind = Some(k);
                    width = width.saturating_add(w);
                }
                (1..=4).contains(&width).then_some((kind?, width))
            }
            _ => None,
        }
    }

    /// Position and type of a field readable on every value of this type.
    pub fn field(&self, name: Name) -> Option<(usize, Type)> {
        match self {
            Type::Struct(s) => s.field_index(name).map(|i| (i, s.fields[i].ty.clone())),
            Type::Alt(a) => {
                let first = &a.members[0];
                let index = first.field_index(name)?;
                let ty = &first.fields[index].ty;
                let shared = a.members.iter().all(|m| {
                    m.fields.get(index).is_some_and(|f| f.name == name && f.ty == *ty)
                        && Target::ALL
                            .iter()
                            .all(|&t| m.layout(t).accessors[index] == first.layout(t).accessors[index])
                });
                shared.then(|| (index, ty.clone()))
            }
            Type::Scalar(_) | Type::Array(_) => None,
        }
    }

    /// Whether a value of type `from` is accepted where `self` is expected.
    pub fn can_convert_from(&self, from: &Type) -> bool {
        if self == from {
            return true;
        }
        match (self, from) {
            (Type::Scalar(ScalarKind::Float), Type::Scalar(ScalarKind::Int)) => true,
            (Type::Alt(to), Type::Struct(s)) => to.contains(s.uid),
            (Type::Alt(to), Type::Alt(from)) => from.members.iter().all(|m| to.contains(m.uid)),
            _ => false,
        }
    }
}

impl AltType {
    pub fn contains(&self, uid: u32) -> bool {
        self.members.iter().any(|m| m.uid == uid)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Scalar(a), Type::Scalar(b)) => a == b,
            (Type::Struct(a), Type::Struct(b)) => a.uid == b.uid,
            (Type::Array(a), Type::Array(b)) => a.len == b.len && a.of == b.of,
            (Type::Alt(a), Type::Alt(b)) => {
                a.members.len() == b.members.len()
                    && a.members.iter().zip(&b.members).all(|(x, y)| x.uid == y.uid)
            }
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Type::Scalar(kind) => kind.hash(state),
            Type::Struct(s) => s.uid.hash(state),
            Type::Array(a) => {
                a.len.hash(state);
                a.of.hash(state);
            }
            Type::Alt(a) => {
                for m in &a.members {
                    m.uid.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(kind) => write!(f, "{kind}"),
            Type::Struct(s) => f.write_str(&s.name),
            Type::Array(a) => write!(f, "[{}; {}]", a.of, a.len),
            Type::Alt(a) => {
                for (i, m) in a.members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    f.write_str(&m.name)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests;
