//! End-to-end scenarios exercising the public surface: broadcasting,
//! beating, assignment and reshape together.

use nray::{
    agree_shapes, for_each, indices, iota, pick, try_ply, Array, Error, Ext, Ix, Scalar, View,
    ViewMut, Walk,
};

#[test]
fn broadcast_product() {
    let a = Array::from_fn(&[4, 3], |ix| (ix[0] as i64) - (ix[1] as i64));
    let b = Array::from_fn(&[3], |ix| 1 - 2 * (ix[0] as i64));
    let c: Array<i64> = Array::from_expr(a.view() * b.view()).unwrap();
    assert_eq!(c.shape(), [4, 3]);
    for i in 0..4 {
        for j in 0..3 {
            let want = (i as i64 - j as i64) * (1 - 2 * j as i64);
            assert_eq!(c[&[i, j]], want, "at ({i}, {j})");
        }
    }
}

#[test]
fn agreement_is_symmetric_and_scalar_is_neutral() {
    let shapes: [&[Ext]; 4] = [
        &[],
        &[Ext::Fixed(3)],
        &[Ext::Fixed(4), Ext::Fixed(3)],
        &[Ext::Fixed(4), Ext::Fixed(1)],
    ];
    for a in shapes {
        for b in shapes {
            assert_eq!(agree_shapes(a, b), agree_shapes(b, a));
        }
        assert_eq!(agree_shapes(a, &[]), Some(a.to_vec()));
    }
}

#[test]
fn beating_never_allocates() {
    let data: Vec<i32> = (0..24).collect();
    let v = View::new(&data, &[2, 3, 4]);
    let s = v.select(&[
        Ix::At(1),
        Ix::Span { org: 2, step: -1, len: Ext::Fixed(3) },
        Ix::NewAxis,
    ]);
    // Same storage, offset computable from the folded subscripts.
    assert_eq!(s.offset(), 12 + 2 * 4);
    assert_eq!(s.shape(), [3, 1, 4]);
    assert_eq!(*s.at(&[0, 0, 0]), 20);
    assert_eq!(*s.at(&[2, 0, 3]), 15);
}

#[test]
fn assignment_broadcasts_into_rows() {
    let mut a: Array<isize> = Array::zeros(&[3, 4]);
    {
        let mut m = a.view_mut();
        m.update(indices(0) + Scalar(1), |d, v| *d = 10 * v).unwrap();
    }
    assert_eq!(a.data(), [10, 20, 30, 40, 10, 20, 30, 40, 10, 20, 30, 40]);
}

#[test]
fn pick_feeds_ordinary_arithmetic() {
    let sel = Array::new(&[4], vec![0usize, 1, 1, 0]);
    let pos = Array::from_fn(&[4], |ix| ix[0] as i64);
    let neg = Array::from_fn(&[4], |ix| -(ix[0] as i64));
    let chosen = pick(sel.view(), (pos.view(), neg.view())) * Scalar(2);
    let out: Array<i64> = Array::from_expr(chosen).unwrap();
    assert_eq!(out.data(), [0, -2, -4, 6]);
}

#[test]
fn reshape_free_or_copy() {
    let a = Array::from_fn(&[6], |ix| ix[0] as i32);
    let v = a.view();
    let free = v.reshape(&[2, 3]).unwrap();
    assert_eq!(free.offset(), v.offset());
    assert_eq!(*free.at(&[1, 2]), 5);

    // A transposed window is not stride-compatible: copy instead.
    let t = Array::from_fn(&[2, 3], |ix| (3 * ix[0] + ix[1]) as i32);
    let tv = t.view().transpose(&[1, 0]);
    assert!(tv.reshape(&[6]).is_none());
    let copied: Array<i32> = Array::from_expr(tv).unwrap();
    assert_eq!(copied.reshaped(&[6]).data(), [0, 3, 1, 4, 2, 5]);
}

#[test]
fn zero_length_selection_directions() {
    let data: Vec<i32> = (0..12).collect();
    let v = View::new(&data, &[12]);
    let back = v.select(&[Ix::Span { org: 10, step: -1, len: Ext::Fixed(0) }]);
    let fwd = v.select(&[Ix::Span { org: 10, step: 1, len: Ext::Fixed(0) }]);
    assert_eq!(back.offset(), v.offset());
    assert_eq!(fwd.offset(), v.offset());
    let empty: Array<i32> = Array::from_expr(back).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn whole_tree_failure_is_atomic() {
    // dst (2,3) <- (3,) + (4,): operand mismatch is deferred through a
    // placeholder and must surface before anything is written.
    let mut dst: Array<isize> = Array::from_elem(&[2, 3], 9);
    let bad = iota(3).zip(nray::Iota::new(0, 1, Ext::Unknown));
    let mut m = dst.view_mut();
    let mut e = bad;
    e.with_len(4);
    let r = m.update(e, |d, (x, y)| *d = x + y);
    assert_eq!(r, Err(Error::ShapeMismatch { axis: 0, a: 3, b: 4 }));
    drop(m);
    assert_eq!(dst.data(), [9, 9, 9, 9, 9, 9]);
}

#[test]
fn early_exit_search() {
    let a = Array::from_fn(&[100], |ix| ix[0] as i64);
    let mut visited = 0;
    let hit = try_ply(a.view().map(|x| { visited += 1; x }), |x| {
        if x == 7 { Some(x) } else { None }
    })
    .unwrap();
    assert_eq!(hit, Some(7));
    assert_eq!(visited, 8);
}

#[test]
fn cells_against_scalars() {
    // Row sums two ways: cell iteration and a plain element walk.
    let a = Array::from_fn(&[3, 4], |ix| (4 * ix[0] + ix[1]) as i64);
    let mut by_cells = Vec::new();
    a.view().each_cell(1, |row| {
        let mut s = 0;
        for_each(row.clone(), |x| s += x).unwrap();
        by_cells.push(s);
    });
    assert_eq!(by_cells, [6, 22, 38]);
}

#[test]
fn display_round_trip_texture() {
    let a = Array::from_fn(&[2, 2], |ix| 2 * ix[0] + ix[1]);
    assert_eq!(a.to_string(), "[[0, 1], [2, 3]]");
}

#[test]
fn gather_then_arithmetic() {
    let table = Array::from_fn(&[5], |ix| 100 + ix[0] as i64);
    let perm = iota(5).map(|i| 4 - i);
    let reversed_plus: Array<i64> =
        Array::from_expr(table.view().gather(0, perm) + Scalar(1)).unwrap();
    assert_eq!(reversed_plus.data(), [105, 104, 103, 102, 101]);
}

#[test]
fn viewmut_fill_and_direct_poke() {
    let mut data = vec![0u32; 6];
    let mut m = ViewMut::new(&mut data, &[2, 3]);
    m.fill(7);
    *m.at_mut(&[1, 1]) = 99;
    assert_eq!(data, [7, 7, 7, 7, 99, 7]);
}
