use super::*;

const C: ChunkId = ChunkId::from_raw(0);

#[test]
fn merge_covers_both() {
    let merged = Span::new(C, 10, 20).merge(Span::new(C, 15, 30));
    assert_eq!(merged, Span::new(C, 10, 30));

    let reversed = Span::new(C, 20, 30).merge(Span::new(C, 0, 5));
    assert_eq!(reversed, Span::new(C, 0, 30));
}

#[test]
fn merge_ignores_virtual_side() {
    let real = Span::new(C, 4, 9);
    assert_eq!(Span::VIRTUAL.merge(real), real);
    assert_eq!(real.merge(Span::VIRTUAL), real);
    assert!(Span::VIRTUAL.merge(Span::VIRTUAL).is_virtual());
}

#[test]
fn merge_keeps_left_chunk_on_mismatch() {
    let a = Span::new(C, 1, 2);
    let b = Span::new(ChunkId::from_raw(1), 0, 50);
    assert_eq!(a.merge(b), a);
}

#[test]
fn point_and_end_point_are_zero_width() {
    let p = Span::point(C, 42);
    assert!(p.is_empty());
    assert_eq!(p.len(), 0);
    assert_eq!(Span::new(C, 3, 8).end_point(), Span::point(C, 8));
}

#[test]
fn contains_span_is_inclusive_at_both_ends() {
    let outer = Span::new(C, 10, 20);
    assert!(outer.contains_span(Span::new(C, 10, 20)));
    assert!(outer.contains_span(Span::point(C, 20)));
    assert!(!outer.contains_span(Span::new(C, 9, 12)));
    assert!(!outer.contains_span(Span::new(ChunkId::from_raw(3), 11, 12)));
}

#[test]
fn from_range_saturates() {
    let big = u32::MAX as usize + 10;
    let span = Span::from_range(C, 5..big);
    assert_eq!(span.start, 5);
    assert_eq!(span.end, u32::MAX);
}

#[test]
fn debug_format() {
    assert_eq!(format!("{:?}", Span::new(C, 100, 200)), "100..200");
    assert_eq!(format!("{}", Span::VIRTUAL), "<virtual>");
    assert_eq!(Span::default(), Span::VIRTUAL);
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn span() -> impl Strategy<Value = Span> {
        (0u32..1000, 0u32..1000).prop_map(|(a, b)| Span::new(ChunkId::from_raw(0), a.min(b), a.max(b)))
    }

    proptest! {
        #[test]
        fn merge_covers_both_sides(a in span(), b in span()) {
            let merged = a.merge(b);
            prop_assert!(merged.contains_span(a));
            prop_assert!(merged.contains_span(b));
            assert_eq!(merged, b.merge(a));
        }

        #[test]
        fn merge_with_virtual_is_identity(a in span()) {
            assert_eq!(a.merge(Span::VIRTUAL), a);
            assert_eq!(Span::VIRTUAL.merge(a), a);
        }
    }
}
