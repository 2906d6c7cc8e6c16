#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn vec(kind: ScalarKind, width: u8) -> Repr {
    Repr::Vector { kind, width }
}

fn f(width: u8) -> Repr {
    vec(ScalarKind::Float, width)
}

fn swizzles(layout: &Layout) -> Vec<String> {
    layout
        .accessors
        .iter()
        .map(|a| match a {
            Accessor::Swizzle(s) => s.clone(),
            other => format!("{other:?}"),
        })
        .collect()
}

// === Void and transparent ===

#[test]
fn no_fields_is_void() {
    for target in Target::ALL {
        let layout = compute_layout(&[], false, target, 1).unwrap();
        assert_eq!(layout.path, LayoutPath::Void);
        assert_eq!(layout.repr, Repr::Void);
        assert_eq!(layout.ctor, Ctor::Unit);
    }
}

#[test]
fn all_void_fields_is_void_with_zero_accessors() {
    let layout = compute_layout(&[Repr::Void, Repr::Void], false, Target::Glsl, 1).unwrap();
    assert_eq!(layout.path, LayoutPath::Void);
    assert_eq!(layout.accessors, vec![Accessor::Zero, Accessor::Zero]);
}

#[test]
fn single_stored_field_is_transparent() {
    for target in Target::ALL {
        let layout = compute_layout(&[f(2), Repr::Void], false, target, 1).unwrap();
        assert_eq!(layout.path, LayoutPath::Transparent);
        assert_eq!(layout.repr, f(2));
        assert_eq!(layout.accessors, vec![Accessor::Identity, Accessor::Zero]);
        assert_eq!(layout.ctor, Ctor::Forward);
    }
}

#[test]
fn transparent_over_a_struct_repr() {
    let inner = Repr::Struct { id: 3 };
    let layout = compute_layout(&[Repr::Void, inner.clone()], false, Target::Js, 9).unwrap();
    assert_eq!(layout.repr, inner);
}

// === Vector merge ===

#[test]
fn two_float_pairs_merge_into_vec4() {
    let layout = compute_layout(&[f(2), f(2)], false, Target::Glsl, 1).unwrap();
    assert_eq!(layout.path, LayoutPath::VectorMerge);
    assert_eq!(layout.repr, f(4));
    assert_eq!(swizzles(&layout), vec!["xy", "zw"]);
    assert_eq!(layout.ctor, Ctor::Call("vec4".into()));
}

#[test]
fn merge_skips_void_fields() {
    let layout = compute_layout(&[f(1), Repr::Void, f(2)], false, Target::Glsl, 1).unwrap();
    assert_eq!(layout.repr, f(3));
    assert_eq!(swizzles(&layout), vec!["x", "Zero", "yz"]);
}

#[test]
fn int_and_bool_scalars_merge() {
    let ints = compute_layout(&[vec(ScalarKind::Int, 1), vec(ScalarKind::Int, 1)], false, Target::Glsl, 1).unwrap();
    assert_eq!(ints.ctor, Ctor::Call("ivec2".into()));
    let bools = compute_layout(&[vec(ScalarKind::Bool, 1), vec(ScalarKind::Bool, 1), vec(ScalarKind::Bool, 1)], false, Target::Glsl, 1).unwrap();
    assert_eq!(bools.repr, vec(ScalarKind::Bool, 3));
}

#[test]
fn mixed_kinds_or_overflow_fall_back_to_struct() {
    let mixed = compute_layout(&[f(1), vec(ScalarKind::Int, 1)], false, Target::Glsl, 5).unwrap();
    assert_eq!(mixed.path, LayoutPath::Struct);
    let wide = compute_layout(&[f(3), f(2)], false, Target::Glsl, 5).unwrap();
    assert_eq!(wide.path, LayoutPath::Struct);
    assert_eq!(wide.slots, vec![f(3), f(2)]);
}

#[test]
fn javascript_never_merges() {
    let layout = compute_layout(&[f(1), f(1)], false, Target::Js, 4).unwrap();
    assert_eq!(layout.path, LayoutPath::Struct);
    assert_eq!(layout.ctor, Ctor::Record);
    assert_eq!(layout.accessors, vec![Accessor::Slot(0), Accessor::Slot(1)]);
}

// === Matrix ===

#[test]
fn matrix_tag_wins_over_merge() {
    let layout = compute_layout(&[f(2), f(2)], true, Target::Glsl, 1).unwrap();
    assert_eq!(layout.path, LayoutPath::Matrix);
    assert_eq!(layout.repr, Repr::Matrix { cols: 2, rows: 2 });
    assert_eq!(layout.accessors, vec![Accessor::Column(0), Accessor::Column(1)]);
    assert_eq!(layout.ctor, Ctor::Call("mat2".into()));
}

#[test]
fn non_square_matrix() {
    let layout = compute_layout(&[f(2), f(2), f(2)], true, Target::Glsl, 1).unwrap();
    assert_eq!(layout.repr.glsl_name(), "mat3x2");
}

#[test]
fn matrix_is_a_struct_on_javascript() {
    let layout = compute_layout(&[f(1), f(1)], true, Target::Js, 6).unwrap();
    assert_eq!(layout.path, LayoutPath::Struct);
}

#[test]
fn unvalidated_matrix_is_a_bug() {
    let err = compute_layout(&[f(2), f(3)], true, Target::Glsl, 1).unwrap_err();
    assert!(err.is_bug());
}

// === Struct ===

#[test]
fn struct_declaration_text() {
    let layout = compute_layout(&[f(2), Repr::Void, vec(ScalarKind::Int, 1)], false, Target::Glsl, 7).unwrap();
    assert_eq!(layout.ctor, Ctor::Call("_S7".into()));
    assert_eq!(
        layout.glsl_declaration().unwrap(),
        "struct _S7 {\n  vec2 _0;\n  int _1;\n};"
    );
    assert_eq!(layout.accessors[2], Accessor::Slot(1));
}

#[test]
fn only_struct_layouts_declare() {
    let layout = compute_layout(&[f(1), f(1)], false, Target::Glsl, 7).unwrap();
    assert_eq!(layout.glsl_declaration(), None);
}

// === Properties ===

fn repr_strategy() -> impl Strategy<Value = Repr> {
    let kind = prop_oneof![Just(ScalarKind::Float), Just(ScalarKind::Int), Just(ScalarKind::Bool)];
    prop_oneof![
        Just(Repr::Void),
        (kind, 1u8..=4).prop_map(|(kind, width)| Repr::Vector { kind, width }),
        (1u32..50).prop_map(|id| Repr::Struct { id }),
    ]
}

proptest! {
    #[test]
    fn layout_is_a_pure_function(
        fields in prop::collection::vec(repr_strategy(), 0..6),
        matrix in any::<bool>(),
        glsl in any::<bool>(),
    ) {
        let target = if glsl { Target::Glsl } else { Target::Js };
        let first = compute_layout(&fields, matrix, target, 42);
        let second = compute_layout(&fields, matrix, target, 42);
        prop_assert_eq!(&first, &second);
        if let Ok(layout) = first {
            prop_assert_eq!(layout.accessors.len(), fields.len());
            for (repr, accessor) in fields.iter().zip(&layout.accessors) {
                prop_assert_eq!(repr.is_void(), *accessor == Accessor::Zero);
            }
        }
    }
}
