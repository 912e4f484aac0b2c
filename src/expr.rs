//! Composed expression nodes and frame matching.
//!
//! Shapes of unequal rank align at their trailing axes: the leading extra
//! axes of the higher-rank operand form the frame, and the lower-rank
//! operand is broadcast across it. An operand axis of extent 1 (or a dead
//! axis) broadcasts against any extent.

use std::marker::PhantomData;

use super::{Ext, Error, Result, Walk};
use super::ops::Binary;
use super::impl_ops_for_walk;

/// The operand's axis that corresponds to axis `k` of a rank-`nr` node,
/// if the operand reaches that far.
#[inline(always)]
pub(crate) fn sub_axis(nr: usize, wr: usize, k: usize) -> Option<usize> {
    (k + wr).checked_sub(nr)
}

/// The operand's extent at node axis `k`. Axes the operand does not reach
/// are dead.
pub(crate) fn ext_at<W: Walk>(w: &W, nr: usize, k: usize) -> Ext {
    match sub_axis(nr, w.rank(), k) {
        Some(ka) => w.len(ka),
        None => Ext::Dead,
    }
}

/// `Some(ka)` if the operand's cursor moves with node axis `k`, whose agreed
/// extent is `e`. A size-1 operand axis facing a larger frame extent is
/// broadcast and stays put; dead operand axes follow the frame.
pub(crate) fn follows<W: Walk>(w: &W, nr: usize, k: usize, e: Ext) -> Option<usize> {
    let ka = sub_axis(nr, w.rank(), k)?;
    match (w.len(ka), e) {
        (Ext::Fixed(1), Ext::Fixed(n)) if n > 1 => None,
        _ => Some(ka),
    }
}

pub(crate) fn adv_op<W: Walk>(w: &mut W, nr: usize, k: usize, e: Ext, d: isize) {
    if let Some(ka) = follows(&*w, nr, k, e) {
        w.adv(ka, d);
    }
}

pub(crate) fn zero_step_op<W: Walk>(w: &W, nr: usize, k: usize, e: Ext) -> bool {
    match follows(w, nr, k, e) {
        Some(ka) => w.zero_step(ka),
        None => true,
    }
}

pub(crate) fn keep_step_op<W: Walk>(
    w: &W, nr: usize, st: isize, z: usize, ez: Ext, j: usize, ej: Ext,
) -> bool {
    let fz = follows(w, nr, z, ez);
    match follows(w, nr, j, ej) {
        // The operand does not move on `j`, so its merged stride must be 0.
        None => fz.map_or(true, |za| w.zero_step(za)),
        Some(ja) => match fz {
            Some(za) => w.keep_step(st, za, ja),
            None => w.zero_step(ja),
        },
    }
}

/// The deferred extent comparisons between two operands of one node.
pub(crate) fn agree_check<A: Walk, B: Walk>(a: &A, b: &B) -> Result<()> {
    let nr = a.rank().max(b.rank());
    for k in 0..nr {
        let ea = ext_at(a, nr, k);
        let eb = ext_at(b, nr, k);
        if ea.agree(eb).is_none() {
            // Disagreement is only possible between two fixed extents.
            let (a, b) = match (ea.fixed(), eb.fixed()) {
                (Some(n), Some(m)) => (n, m),
                _ => (0, 0),
            };
            return Err(Error::ShapeMismatch { axis: k, a, b });
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------

/// A lazy node applying a function to every element of an operand.
/// Constructed by [`Walk::map()`].
#[derive(Clone)]
pub struct Map<A, F> {
    a: A,
    f: F,
}

impl<A, F> Map<A, F> {
    pub(crate) fn new(a: A, f: F) -> Self {
        Map { a, f }
    }
}

impl<A: Walk, F, R> Walk for Map<A, F> where F: FnMut(A::Item) -> R {
    type Item = R;
    type State = A::State;
    fn rank(&self) -> usize { self.a.rank() }
    fn len(&self, k: usize) -> Ext { self.a.len(k) }
    fn adv(&mut self, k: usize, d: isize) { self.a.adv(k, d) }
    fn save(&self) -> Self::State { self.a.save() }
    fn load(&mut self, state: Self::State) { self.a.load(state) }
    fn zero_step(&self, k: usize) -> bool { self.a.zero_step(k) }
    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        self.a.keep_step(st, z, j)
    }
    fn item(&mut self) -> R { (self.f)(self.a.item()) }
    fn check(&self) -> Result<()> { self.a.check() }
    fn with_len(&mut self, len: usize) { self.a.with_len(len) }
}

impl_ops_for_walk!(Map<A, F>);

// ----------------------------------------------------------------------------

/// A lazy node combining two operands pointwise through an operator tag `O`,
/// broadcasting as needed. Constructed by [`Walk::binary()`] and
/// [`Walk::zip()`], and by the arithmetic operators on every node type.
#[derive(Clone)]
pub struct Zip<A, B, O> {
    a: A,
    b: B,
    op: PhantomData<O>,
}

impl<A: Walk, B: Walk, O> Zip<A, B, O> {
    /// # Panics
    ///
    /// Panics if the operands' already-known extents disagree. Extents that
    /// are still deferred are re-checked when the node is traversed.
    pub fn new(a: A, b: B) -> Self {
        if let Err(e) = agree_check(&a, &b) {
            panic!("{}", e);
        }
        Zip { a, b, op: PhantomData }
    }
}

impl<A: Walk, B: Walk, O: Binary<A::Item, B::Item>> Walk for Zip<A, B, O> {
    type Item = O::Output;
    type State = (A::State, B::State);

    fn rank(&self) -> usize { self.a.rank().max(self.b.rank()) }

    fn len(&self, k: usize) -> Ext {
        let nr = self.rank();
        let ea = ext_at(&self.a, nr, k);
        let eb = ext_at(&self.b, nr, k);
        ea.agree(eb).unwrap_or(ea)
    }

    fn adv(&mut self, k: usize, d: isize) {
        let nr = self.rank();
        let e = self.len(k);
        adv_op(&mut self.a, nr, k, e, d);
        adv_op(&mut self.b, nr, k, e, d);
    }

    fn save(&self) -> Self::State { (self.a.save(), self.b.save()) }

    fn load(&mut self, state: Self::State) {
        self.a.load(state.0);
        self.b.load(state.1);
    }

    fn zero_step(&self, k: usize) -> bool {
        let nr = self.rank();
        let e = self.len(k);
        zero_step_op(&self.a, nr, k, e) && zero_step_op(&self.b, nr, k, e)
    }

    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        let nr = self.rank();
        let (ez, ej) = (self.len(z), self.len(j));
        keep_step_op(&self.a, nr, st, z, ez, j, ej)
            && keep_step_op(&self.b, nr, st, z, ez, j, ej)
    }

    fn item(&mut self) -> Self::Item { O::call(self.a.item(), self.b.item()) }

    fn check(&self) -> Result<()> {
        self.a.check()?;
        self.b.check()?;
        agree_check(&self.a, &self.b)
    }

    fn with_len(&mut self, len: usize) {
        self.a.with_len(len);
        self.b.with_len(len);
    }
}

impl_ops_for_walk!(Zip<A, B, O>);

#[cfg(test)]
mod tests {
    use super::super::{iota, indices, Scalar, for_each, ops};
    use super::*;

    #[test]
    fn zip_agrees_trailing() {
        let z: Zip<_, _, ops::Pair> = Zip::new(iota(3), Scalar(1));
        assert_eq!(z.rank(), 1);
        assert_eq!(z.len(0), Ext::Fixed(3));
    }

    #[test]
    #[should_panic(expected = "extent mismatch")]
    fn zip_rejects_known_mismatch() {
        let _: Zip<_, _, ops::Pair> = Zip::new(iota(3), iota(4));
    }

    #[test]
    fn tensor_index_follows_the_frame() {
        // indices(1) is dead on both its axes; iota(3) drives the last.
        let e = indices(1).zip(iota(3));
        assert_eq!(e.rank(), 2);
        assert_eq!(e.len(0), Ext::Dead);
        assert_eq!(e.len(1), Ext::Fixed(3));
    }

    #[test]
    fn tensor_index_is_driven() {
        let mut out = Vec::new();
        for_each(indices(0).zip(iota(3)), |p| out.push(p)).unwrap();
        assert_eq!(out, [(0, 0), (1, 1), (2, 2)]);
    }
}
