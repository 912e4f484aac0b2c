//! Property-based tests for shape agreement, beating and traversal.

use proptest::prelude::*;

use nray::{agree_shapes, for_each, Array, Ext, Ix, View};

// ===== Strategies =====

fn arb_ext() -> impl Strategy<Value = Ext> {
    prop_oneof![
        Just(Ext::Dead),
        Just(Ext::Unknown),
        (0usize..5).prop_map(Ext::Fixed),
    ]
}

fn arb_shape() -> impl Strategy<Value = Vec<Ext>> {
    prop::collection::vec(arb_ext(), 0..4)
}

fn arb_fixed_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..5, 0..4)
}

/// A span guaranteed to stay inside an axis of extent `n`.
fn arb_span(n: usize) -> impl Strategy<Value = (usize, isize, usize)> {
    (0..n).prop_flat_map(move |org| {
        let max_fwd = n - org;
        let max_back = org + 1;
        prop_oneof![
            (1..=max_fwd).prop_map(move |len| (org, 1isize, len)),
            (1..=max_back).prop_map(move |len| (org, -1isize, len)),
        ]
    })
}

fn arb_axis_and_span() -> impl Strategy<Value = (usize, (usize, isize, usize))> {
    (1usize..20).prop_flat_map(|n| (Just(n), arb_span(n)))
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_agreement_is_symmetric(a in arb_shape(), b in arb_shape()) {
        prop_assert_eq!(agree_shapes(&a, &b), agree_shapes(&b, &a));
    }

    #[test]
    fn prop_scalar_agrees_and_yields_the_other(a in arb_shape()) {
        prop_assert_eq!(agree_shapes(&a, &[]), Some(a.clone()));
    }

    #[test]
    fn prop_traversal_is_complete(shape in arb_fixed_shape()) {
        let size: usize = shape.iter().product();
        let a = Array::from_elem(&shape, 1u32);
        let mut calls = 0usize;
        for_each(a.view(), |_| calls += 1).unwrap();
        prop_assert_eq!(calls, size);
    }

    #[test]
    fn prop_transposed_traversal_is_complete(shape in prop::collection::vec(1usize..4, 2..4)) {
        let size: usize = shape.iter().product();
        let a = Array::from_elem(&shape, 1u32);
        let mut perm: Vec<usize> = (0..shape.len()).collect();
        perm.reverse();
        let mut calls = 0usize;
        for_each(a.view().transpose(&perm), |_| calls += 1).unwrap();
        prop_assert_eq!(calls, size);
    }

    #[test]
    fn prop_beaten_matches_gathered((n, (org, step, len)) in arb_axis_and_span()) {
        let data: Vec<i32> = (0..n as i32).collect();
        let v = View::new(&data, &[n]);
        let beaten = v.select(&[Ix::Span { org, step, len: Ext::Fixed(len) }]);
        let gathered = v.gather(0, nray::Iota::new(org as isize, step, Ext::Fixed(len)));
        let mut a = Vec::new();
        for_each(beaten, |x| a.push(x)).unwrap();
        let mut b = Vec::new();
        for_each(gathered, |x| b.push(x)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_collect_matches_direct_indexing(shape in prop::collection::vec(1usize..4, 1..4)) {
        let a = Array::from_fn(&shape, |ix| ix.iter().fold(0i64, |acc, &i| 7 * acc + i as i64));
        let b: Array<i64> = Array::from_expr(a.view()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_reversal_is_an_involution(n in 1usize..12) {
        let data: Vec<i32> = (0..n as i32).collect();
        let v = View::new(&data, &[n]);
        let rr = v.reversed(0).reversed(0);
        let mut out = Vec::new();
        for_each(rr, |x| out.push(x)).unwrap();
        prop_assert_eq!(out, data);
    }
}
