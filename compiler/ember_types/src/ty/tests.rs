#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::Accessor;
use pretty_assertions::assert_eq;

fn name(raw: u32) -> Name {
    Name::from_raw(raw)
}

fn field(raw: u32, ty: &Type) -> Field {
    Field { name: name(raw), ty: ty.clone() }
}

fn strukt(ids: &mut IdGenerator, label: &str, fields: Vec<Field>) -> Type {
    Type::Struct(StructType::declare(label.into(), fields, false, ids).unwrap())
}

fn vec2(ids: &mut IdGenerator) -> Type {
    strukt(ids, "vec2", vec![field(1, &Type::F32), field(2, &Type::F32)])
}

fn void(ids: &mut IdGenerator) -> Type {
    strukt(ids, "void", vec![])
}

#[test]
fn vec2_pair_merges_to_vec4_on_glsl() {
    let mut ids = IdGenerator::new();
    let v2 = vec2(&mut ids);
    let pair = strukt(&mut ids, "Pair", vec![field(10, &v2), field(11, &v2)]);
    assert_eq!(pair.repr(Target::Glsl).glsl_name(), "vec4");
    let s = pair.as_struct().unwrap();
    assert_eq!(s.layout(Target::Glsl).accessors[1], Accessor::Swizzle("zw".into()));
    assert_eq!(s.layout(Target::Js).path, LayoutPath::Struct);
    assert_eq!(pair.vector_shape(), Some((ScalarKind::Float, 4)));
}

#[test]
fn vec2_with_void_field_is_transparent() {
    let mut ids = IdGenerator::new();
    let v2 = vec2(&mut ids);
    let unit = void(&mut ids);
    let tagged = strukt(&mut ids, "Tagged", vec![field(10, &v2), field(11, &unit)]);
    assert_eq!(tagged.repr(Target::Glsl), v2.repr(Target::Glsl));
    let s = tagged.as_struct().unwrap();
    assert_eq!(s.layout(Target::Glsl).accessors, vec![Accessor::Identity, Accessor::Zero]);
    assert!(unit.is_void());
    assert!(!tagged.is_void());
}

#[test]
fn void_structs_compose() {
    let mut ids = IdGenerator::new();
    let unit = void(&mut ids);
    let outer = strukt(&mut ids, "Outer", vec![field(1, &unit), field(2, &unit)]);
    assert!(outer.is_void());
    assert_eq!(outer.repr(Target::Js), Repr::Void);
}

#[test]
fn matrix_validation_is_target_independent() {
    let mut ids = IdGenerator::new();
    let v2 = vec2(&mut ids);
    let ok = StructType::declare("mat2".into(), vec![field(1, &v2), field(2, &v2)], true, &mut ids).unwrap();
    assert_eq!(ok.layout(Target::Glsl).repr, Repr::Matrix { cols: 2, rows: 2 });
    assert_eq!(ok.layout(Target::Js).path, LayoutPath::Struct);
    assert_eq!(Type::Struct(ok).vector_shape(), None);

    let err = StructType::declare("bad".into(), vec![field(1, &Type::F32), field(2, &Type::F32)], true, &mut ids)
        .unwrap_err();
    assert!(err.message.contains("columns must be float vectors"), "{}", err.message);
    let err = StructType::declare("thin".into(), vec![field(1, &v2)], true, &mut ids).unwrap_err();
    assert!(err.message.contains("2 to 4 columns"), "{}", err.message);
}

#[test]
fn group_variants_share_an_id() {
    let mut ids = IdGenerator::new();
    let group = StructType::declare_group(
        vec![
            ("Circle".into(), vec![field(1, &Type::F32), field(2, &Type::F32)]),
            ("Square".into(), vec![field(3, &Type::F32), field(4, &Type::F32)]),
        ],
        false,
        &mut ids,
    )
    .unwrap();
    assert_eq!(group[0].group, group[1].group);
    assert_ne!(group[0].uid, group[1].uid);
    assert_eq!(group[0].layout(Target::Js).repr, group[1].layout(Target::Js).repr);
}

#[test]
fn group_with_different_paths_is_rejected() {
    let mut ids = IdGenerator::new();
    let err = StructType::declare_group(
        vec![
            ("A".into(), vec![field(1, &Type::F32)]),
            ("B".into(), vec![field(2, &Type::F32), field(3, &Type::F32)]),
        ],
        false,
        &mut ids,
    )
    .unwrap_err();
    assert!(err.message.contains("share one layout"), "{}", err.message);
}

#[test]
fn alt_conversions_follow_subsets() {
    let mut ids = IdGenerator::new();
    let group = StructType::declare_group(
        vec![
            ("A".into(), vec![field(1, &Type::F32)]),
            ("B".into(), vec![field(1, &Type::F32)]),
            ("C".into(), vec![field(1, &Type::F32)]),
        ],
        false,
        &mut ids,
    )
    .unwrap();
    let a = Type::Struct(group[0].clone());
    let ab = Type::alt(vec![group[1].clone(), group[0].clone()]).unwrap();
    let abc = Type::alt(group.clone()).unwrap();
    assert_eq!(ab.to_string(), "A | B");
    assert!(ab.can_convert_from(&a));
    assert!(abc.can_convert_from(&ab));
    assert!(!ab.can_convert_from(&abc));
    assert!(!a.can_convert_from(&ab));
    assert_eq!(ab.field(name(1)).map(|(i, _)| i), Some(0));

    let only = Type::alt(vec![group[2].clone(), group[2].clone()]).unwrap();
    assert!(matches!(only, Type::Struct(_)));
}

#[test]
fn alt_across_groups_is_rejected() {
    let mut ids = IdGenerator::new();
    let a = StructType::declare("A".into(), vec![], false, &mut ids).unwrap();
    let b = StructType::declare("B".into(), vec![], false, &mut ids).unwrap();
    let err = Type::alt(vec![a, b]).unwrap_err();
    assert!(err.message.contains("one struct group"));
}

#[test]
fn scalar_conversions() {
    assert!(Type::F32.can_convert_from(&Type::I32));
    assert!(!Type::I32.can_convert_from(&Type::F32));
    assert!(!Type::BOOL.can_convert_from(&Type::I32));
}

#[test]
fn arrays() {
    let mut ids = IdGenerator::new();
    let arr = Type::array(Type::F32, 3).unwrap();
    assert_eq!(arr.to_string(), "[f32; 3]");
    assert_eq!(arr.glsl_name(), "float[3]");
    assert_eq!(arr, Type::array(Type::F32, 3).unwrap());
    assert_ne!(arr, Type::array(Type::F32, 4).unwrap());
    assert!(Type::array(void(&mut ids), 2).is_err());
    assert!(Type::array(Type::I32, 0).is_err());
}

#[test]
fn nominal_struct_identity() {
    let mut ids = IdGenerator::new();
    let a = vec2(&mut ids);
    let b = vec2(&mut ids);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}
