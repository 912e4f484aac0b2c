//! Subscript beating.
//!
//! Indexing a view with scalars, affine spans and structural markers never
//! builds an expression: every such subscript folds into the view's offset
//! and steps ([`View::select`]). Only an arbitrary index expression is
//! unbeatable; it costs one indirect lookup per element ([`View::gather`]).

use super::{Axis, Ext, Walk, View};
use super::impl_ops_for_walk;

/// One subscript position of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ix {
    /// Pick one position: folds into the offset and drops the axis.
    At(usize),
    /// An affine span `org, org + step, ..` of `len` positions: composes
    /// with the axis's step. A deferred `len` resolves to the extent of the
    /// subscripted axis.
    Span { org: usize, step: isize, len: Ext },
    /// Keep one axis as-is.
    All,
    /// Keep `Some(m)` axes as-is, or with `None` however many are left over
    /// for the other subscripts. At most one open `Dots` per selection.
    Dots(Option<usize>),
    /// Insert a broadcast axis. Consumes no axis of the view.
    NewAxis,
}

impl Ix {
    /// The whole axis in order: `Span { org: 0, step: 1 }` with a deferred
    /// length. Equivalent to [`Ix::All`] except that it always produces a
    /// fixed extent.
    pub fn whole() -> Ix {
        Ix::Span { org: 0, step: 1, len: Ext::Unknown }
    }
}

impl<'a, T> View<'a, T> {
    /// Applies beatable subscripts, left to right. Axes beyond the last
    /// subscript are kept as-is. The result is a plain strided view over
    /// the same storage; nothing is copied.
    ///
    /// ```
    /// use nray::{View, Ix};
    /// let data = [1, 2, 3, 4, 5, 6];
    /// let v = View::new(&data, &[2, 3]);
    /// let row = v.select(&[Ix::At(1)]);
    /// assert_eq!(row.shape(), [3]);
    /// assert_eq!(*row.at(&[0]), 4);
    /// assert_eq!(row.offset(), 3);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the subscripts consume more axes than the view has, and,
    /// with the `bounds-check` feature, if a subscript is out of range.
    pub fn select(&self, subs: &[Ix]) -> View<'a, T> {
        let rank = self.rank();
        let mut consumed = 0usize;
        let mut open = false;
        for s in subs {
            match s {
                Ix::At(_) | Ix::Span { .. } | Ix::All => consumed += 1,
                Ix::Dots(Some(m)) => consumed += m,
                Ix::Dots(None) => {
                    assert!(!open, "at most one open Dots per selection");
                    open = true;
                }
                Ix::NewAxis => {}
            }
        }
        assert!(consumed <= rank, "selection consumes more axes than the view has");
        let rest = rank - consumed;

        let mut dims = Vec::with_capacity(rank + 1);
        let mut off = self.off;
        let mut a = 0usize;
        for s in subs {
            let extent = |a: usize| match self.dims[a].len {
                Ext::Fixed(n) => n,
                _ => 1,
            };
            match *s {
                Ix::At(i) => {
                    #[cfg(feature = "bounds-check")]
                    assert!(i < extent(a), "subscript {} out of range on axis {}", i, a);
                    off += i as isize * self.dims[a].step;
                    a += 1;
                }
                Ix::Span { org, step, len } => {
                    let n = match len {
                        Ext::Fixed(n) => n,
                        // A deferred length means the whole axis.
                        Ext::Unknown => extent(a),
                        Ext::Dead => panic!("dead extent in subscript"),
                    };
                    if n > 0 {
                        #[cfg(feature = "bounds-check")]
                        {
                            let last = org as isize + (n as isize - 1) * step;
                            assert!(org < extent(a),
                                "span origin {} out of range on axis {}", org, a);
                            assert!(last >= 0 && (last as usize) < extent(a),
                                "span end {} out of range on axis {}", last, a);
                        }
                        // A zero-length span must leave the base offset
                        // alone, whatever its direction.
                        off += org as isize * self.dims[a].step;
                    }
                    dims.push(Axis { len: Ext::Fixed(n), step: self.dims[a].step * step });
                    a += 1;
                }
                Ix::All => {
                    dims.push(self.dims[a]);
                    a += 1;
                }
                Ix::Dots(Some(m)) => {
                    for _ in 0..m {
                        dims.push(self.dims[a]);
                        a += 1;
                    }
                }
                Ix::Dots(None) => {
                    for _ in 0..rest {
                        dims.push(self.dims[a]);
                        a += 1;
                    }
                }
                Ix::NewAxis => dims.push(Axis::dead()),
            }
        }
        while a < rank {
            dims.push(self.dims[a]);
            a += 1;
        }
        View::from_dims(self.data, off, dims)
    }

    /// Indexes axis `k` by an arbitrary expression: the unbeatable case.
    /// Axis `k` is replaced by the axes of `idx`, and every element costs
    /// one indirect lookup. A deferred length in `idx` resolves to the
    /// extent of the subscripted axis. Beat everything beatable with
    /// [`select`](View::select) first; further unbeatable subscripts chain
    /// with [`Gather::gather`].
    ///
    /// ```
    /// use nray::{View, Walk, Array, iota};
    /// let data = [10, 20, 30, 40];
    /// let v = View::new(&data, &[4]);
    /// let picked = v.gather(0, iota(4).map(|i| 3 - i));
    /// let a: Array<i32> = Array::from_expr(picked).unwrap();
    /// assert_eq!(a.data(), [40, 30, 20, 10]);
    /// ```
    pub fn gather<W>(&self, k: usize, mut idx: W) -> Gather<View<'a, T>, W> where
        W: Walk<Item = isize>,
    {
        let ax = self.dims[k];
        let klen = ax.len.fixed().unwrap_or(1);
        idx.with_len(klen);
        let mut dims = self.dims.clone();
        dims.remove(k);
        Gather {
            base: View::from_dims(self.data, self.off, dims),
            kstep: ax.step,
            klen,
            idx,
            k,
        }
    }
}

// ----------------------------------------------------------------------------

/// A node that can sit under a [`Gather`]: its element can be read at a
/// signed displacement from the cursor, and an axis can be detached for
/// replacement by subscript axes. Implemented by [`View`] and by [`Gather`]
/// itself, which is what lets unbeatable subscripts compose.
pub trait Gatherable: Walk {
    /// The element at the cursor displaced by `extra` positions of storage.
    fn peek(&mut self, extra: isize) -> Self::Item;

    /// Removes axis `i`, returning its descriptor.
    fn detach(&mut self, i: usize) -> Axis;
}

impl<T: Clone> Gatherable for View<'_, T> {
    fn peek(&mut self, extra: isize) -> T {
        self.data[(self.off + extra) as usize].clone()
    }

    fn detach(&mut self, i: usize) -> Axis { self.dims.remove(i) }
}

// ----------------------------------------------------------------------------

/// A lazy node performing one indirect lookup per element: a base whose
/// axis has been replaced by the axes of an index expression. Constructed
/// by [`View::gather`]; [`Gather::gather`] stacks further lookups.
#[derive(Debug, Clone)]
pub struct Gather<B, W> {
    base: B,
    kstep: isize,
    #[cfg_attr(not(feature = "bounds-check"), allow(dead_code))]
    klen: usize,
    idx: W,
    k: usize,
}

enum Half {
    Base(usize),
    Idx(usize),
}

impl<B, W: Walk> Gather<B, W> {
    // Node axes: the base's axes below `k`, then the index expression's
    // axes, then the base's remaining axes.
    fn split(&self, i: usize) -> Half {
        let wr = self.idx.rank();
        if i < self.k {
            Half::Base(i)
        } else if i < self.k + wr {
            Half::Idx(i - self.k)
        } else {
            Half::Base(i - wr)
        }
    }
}

impl<B: Gatherable, W: Walk<Item = isize>> Gather<B, W> {
    /// Replaces one more base axis (node axis `i`) by a subscript
    /// expression, composing with the lookups already in place.
    ///
    /// ```
    /// use nray::{View, Walk, Array, iota};
    /// let data = [0, 1, 2, 3, 4, 5];
    /// let v = View::new(&data, &[2, 3]);
    /// let both = v.gather(0, iota(2)).gather(1, iota(3).map(|j| 2 - j));
    /// let a: Array<i32> = Array::from_expr(both).unwrap();
    /// assert_eq!(a.data(), [2, 1, 0, 5, 4, 3]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if node axis `i` was produced by an earlier subscript.
    pub fn gather<W2>(mut self, i: usize, mut idx: W2) -> Gather<Self, W2> where
        W2: Walk<Item = isize>,
    {
        let ax = self.detach(i);
        let klen = ax.len.fixed().unwrap_or(1);
        idx.with_len(klen);
        Gather { base: self, kstep: ax.step, klen, idx, k: i }
    }
}

impl<B: Gatherable, W: Walk<Item = isize>> Walk for Gather<B, W> {
    type Item = B::Item;
    type State = (B::State, W::State);

    fn rank(&self) -> usize { self.base.rank() + self.idx.rank() }

    fn len(&self, i: usize) -> Ext {
        match self.split(i) {
            Half::Base(b) => self.base.len(b),
            Half::Idx(w) => self.idx.len(w),
        }
    }

    fn adv(&mut self, i: usize, d: isize) {
        match self.split(i) {
            Half::Base(b) => self.base.adv(b, d),
            Half::Idx(w) => self.idx.adv(w, d),
        }
    }

    fn save(&self) -> Self::State { (self.base.save(), self.idx.save()) }

    fn load(&mut self, state: Self::State) {
        self.base.load(state.0);
        self.idx.load(state.1);
    }

    fn zero_step(&self, i: usize) -> bool {
        match self.split(i) {
            Half::Base(b) => self.base.zero_step(b),
            Half::Idx(w) => self.idx.zero_step(w),
        }
    }

    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        // Merging across the lookup boundary would mix pointer motion with
        // index-value motion; leave those loops nested.
        match (self.split(z), self.split(j)) {
            (Half::Base(bz), Half::Base(bj)) => self.base.keep_step(st, bz, bj),
            (Half::Idx(wz), Half::Idx(wj)) => self.idx.keep_step(st, wz, wj),
            _ => false,
        }
    }

    fn item(&mut self) -> B::Item { self.peek(0) }

    fn check(&self) -> super::Result<()> {
        self.base.check()?;
        self.idx.check()
    }

    fn with_len(&mut self, len: usize) {
        self.base.with_len(len);
        self.idx.with_len(len);
    }
}

impl<B: Gatherable, W: Walk<Item = isize>> Gatherable for Gather<B, W> {
    fn peek(&mut self, extra: isize) -> B::Item {
        let i = self.idx.item();
        #[cfg(feature = "bounds-check")]
        assert!(i >= 0 && (i as usize) < self.klen,
            "gathered subscript {} out of range on axis {}", i, self.k);
        self.base.peek(extra + i * self.kstep)
    }

    fn detach(&mut self, i: usize) -> Axis {
        match self.split(i) {
            Half::Base(b) => {
                if b < self.k {
                    self.k -= 1;
                }
                self.base.detach(b)
            }
            Half::Idx(_) => panic!("cannot gather an axis a subscript produced"),
        }
    }
}

impl_ops_for_walk!(Gather<B, W>);
