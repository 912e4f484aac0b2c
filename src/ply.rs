//! The traversal engine.
//!
//! A traversal first runs the tree's deferred checks and resolves every
//! axis extent, then visits each coordinate exactly once. Adjacent axes
//! whose steps stay linear under merging (per [`Walk::keep_step`]) are
//! collapsed into a single raveled loop; the rest are iterated as nested
//! loops, outermost frame axis first, restoring operand cursors with
//! [`Walk::save`]/[`Walk::load`] where broadcasting repeats a run.
//!
//! Traversal that stops descending at a configured cell rank lives on the
//! view side: see [`View::each_cell`](crate::View::each_cell).

use std::ops::ControlFlow;

use super::{Ext, Error, Result, Walk, ViewMut};
use super::expr::{ext_at, adv_op, zero_step_op, keep_step_op};

/// Runs the checks and resolves every extent, or says why not.
pub(crate) fn resolved_shape<W: Walk>(w: &W) -> Result<Vec<usize>> {
    w.check()?;
    let rank = w.rank();
    let mut shape = Vec::with_capacity(rank);
    for k in 0..rank {
        match w.len(k) {
            Ext::Fixed(n) => shape.push(n),
            Ext::Unknown => return Err(Error::UnresolvedLen),
            Ext::Dead => return Err(Error::Undriven { axis: k }),
        }
    }
    Ok(shape)
}

// The one loop nest everything else drives. Returns false if `f` broke out
// early. Coordinates are visited in row-major order; ravel merging only
// collapses bookkeeping, never reorders.
fn drive<W, F>(w: &mut W, f: &mut F) -> Result<bool> where
    W: Walk,
    F: FnMut(W::Item) -> ControlFlow<()>,
{
    let shape = resolved_shape(w)?;
    let rank = shape.len();
    if shape.iter().any(|&n| n == 0) {
        return Ok(true);
    }
    if rank == 0 {
        return Ok(f(w.item()).is_continue());
    }

    // Fold as many trailing axes as stay linear into one raveled run.
    let inner = rank - 1;
    let mut run = shape[inner];
    let mut orank = inner;
    while orank > 0 && w.keep_step(run as isize, inner, orank - 1) {
        run *= shape[orank - 1];
        orank -= 1;
    }

    let mut idx = vec![0usize; orank];
    loop {
        let mark = w.save();
        for _ in 0..run {
            if f(w.item()).is_break() {
                return Ok(false);
            }
            w.adv(inner, 1);
        }
        w.load(mark);
        let mut k = orank;
        loop {
            if k == 0 {
                return Ok(true);
            }
            k -= 1;
            idx[k] += 1;
            w.adv(k, 1);
            if idx[k] < shape[k] {
                break;
            }
            idx[k] = 0;
            w.adv(k, -(shape[k] as isize));
        }
    }
}

/// Evaluates `w` over its whole shape, applying `f` to every element in
/// row-major order.
///
/// ```
/// use nray::{iota, for_each};
/// let mut sum = 0;
/// for_each(iota(5), |x| sum += x).unwrap();
/// assert_eq!(sum, 10);
/// ```
pub fn for_each<W, F>(mut w: W, mut f: F) -> Result<()> where
    W: Walk,
    F: FnMut(W::Item),
{
    drive(&mut w, &mut |x| { f(x); ControlFlow::Continue(()) })?;
    Ok(())
}

/// Evaluates `w` until `f` returns `Some`, then stops without visiting the
/// remaining coordinates. The checks still run in full first.
///
/// ```
/// use nray::{iota, try_ply};
/// let found = try_ply(iota(100), |x| (x * x > 10).then(|| x)).unwrap();
/// assert_eq!(found, Some(4));
/// ```
pub fn try_ply<W, R, F>(mut w: W, mut f: F) -> Result<Option<R>> where
    W: Walk,
    F: FnMut(W::Item) -> Option<R>,
{
    let mut hit = None;
    drive(&mut w, &mut |x| match f(x) {
        Some(r) => {
            hit = Some(r);
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    })?;
    Ok(hit)
}

/// Evaluates `w` for its side effects, discarding the items.
pub fn ply<W: Walk>(w: W) -> Result<()> {
    for_each(w, |_| ())
}

// ----------------------------------------------------------------------------

// The assignment terminal: the destination view drives the frame and the
// source is broadcast into it.
struct Store<'v, 'a, T, W, F> {
    dst: &'v mut ViewMut<'a, T>,
    src: W,
    f: F,
}

impl<'v, 'a, T, W, F> Walk for Store<'v, 'a, T, W, F> where
    W: Walk,
    F: FnMut(&mut T, W::Item),
{
    type Item = ();
    type State = (isize, W::State);

    fn rank(&self) -> usize { self.dst.rank() }

    fn len(&self, k: usize) -> Ext { self.dst.dims()[k].len }

    fn adv(&mut self, k: usize, d: isize) {
        let nr = self.dst.rank();
        let e = self.dst.dims()[k].len;
        self.dst.adv(k, d);
        adv_op(&mut self.src, nr, k, e, d);
    }

    fn save(&self) -> Self::State { (self.dst.off, self.src.save()) }

    fn load(&mut self, state: Self::State) {
        self.dst.off = state.0;
        self.src.load(state.1);
    }

    fn zero_step(&self, k: usize) -> bool {
        let nr = self.dst.rank();
        let e = self.dst.dims()[k].len;
        self.dst.step(k) == 0 && zero_step_op(&self.src, nr, k, e)
    }

    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        let nr = self.dst.rank();
        let (ez, ej) = (self.dst.dims()[z].len, self.dst.dims()[j].len);
        st * self.dst.step(z) == self.dst.step(j)
            && keep_step_op(&self.src, nr, st, z, ez, j, ej)
    }

    fn item(&mut self) {
        let v = self.src.item();
        (self.f)(self.dst.poke(), v);
    }

    fn check(&self) -> Result<()> {
        self.src.check()?;
        let nr = self.dst.rank();
        for k in 0..nr {
            // The destination alone drives the frame, so a source axis
            // must either broadcast or hold the destination extent
            // exactly. Plain agreement is not enough: a unit destination
            // axis agreeing with a longer source would silently truncate
            // it.
            match ext_at(&self.src, nr, k) {
                Ext::Dead | Ext::Fixed(1) => {}
                Ext::Unknown => return Err(Error::UnresolvedLen),
                Ext::Fixed(n) => {
                    let ed = self.dst.dims()[k].len;
                    if ed.fixed() != Some(n) {
                        return Err(Error::ShapeMismatch {
                            axis: k,
                            a: ed.fixed().unwrap_or(1),
                            b: n,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn with_len(&mut self, len: usize) { self.src.with_len(len); }
}

impl<'a, T> ViewMut<'a, T> {
    /// Combines every destination element with the corresponding source
    /// element: `f(&mut dst, src)` once per coordinate. The source is
    /// broadcast across the destination's leading axes as needed.
    ///
    /// Reading the destination inside `f` is how in-place arithmetic such
    /// as `a = a + b` stays safe when source and destination share storage
    /// at the same positions.
    ///
    /// ```
    /// use nray::{ViewMut, iota};
    /// let mut data = [100, 100, 100];
    /// let mut m = ViewMut::new(&mut data, &[3]);
    /// m.update(iota(3), |d, v| *d += v).unwrap();
    /// assert_eq!(data, [100, 101, 102]);
    /// ```
    pub fn update<W, F>(&mut self, src: W, f: F) -> Result<()> where
        W: Walk,
        F: FnMut(&mut T, W::Item),
    {
        if src.rank() > self.rank() {
            return Err(Error::RankMismatch { dst: self.rank(), src: src.rank() });
        }
        ply(Store { dst: self, src, f })
    }

    /// Stores every element of `src` into this view.
    pub fn assign<W>(&mut self, src: W) -> Result<()> where
        W: Walk<Item = T>,
    {
        self.update(src, |d, v| *d = v)
    }
}
