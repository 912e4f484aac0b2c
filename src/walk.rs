//! The iteration capability every expression node implements.

use super::{Ext, Result};
use super::expr::{Map, Zip};
use super::ops::{Binary, Pair};

/// Implemented by everything the traversal engine can drive: strided views,
/// constant and index-sequence leaves, and composed operation nodes.
///
/// A `Walk` is its own cursor: it sits on one coordinate of its shape, and
/// [`adv()`] moves the dereferenceable position along one axis. The engine
/// snapshots the cursor with [`save()`] and backs up with [`load()`] when it
/// has to repeat part of an axis under a different outer index, which is what
/// broadcasting across a frame axis requires.
///
/// ### Shapes
///
/// [`rank()`] is fixed for the life of the node. [`len()`] reports each
/// axis's extent as an [`Ext`], so an extent can be deferred
/// ([`Ext::Unknown`], resolved by [`with_len()`]) or dead ([`Ext::Dead`],
/// meaning the axis follows whatever drives it). [`check()`] performs the
/// deferred extent comparisons; the traversal entry points call it exactly
/// once, before touching any element.
///
/// ### Arithmetic
///
/// Every node type in this crate overloads the standard arithmetic operators
/// to mean pointwise arithmetic with broadcasting: `(v * w)` is a lazy node
/// whose elements are the products. Use [`impl_ops_for_walk`] to give your
/// own nodes the same surface.
///
/// ```
/// use nray::{Walk, iota, for_each};
/// let mut out = Vec::new();
/// for_each(iota(4).map(|i| i * 10), |x| out.push(x)).unwrap();
/// assert_eq!(out, [0, 10, 20, 30]);
/// ```
///
/// [`adv()`]: Walk::adv
/// [`save()`]: Walk::save
/// [`load()`]: Walk::load
/// [`rank()`]: Walk::rank
/// [`len()`]: Walk::len
/// [`check()`]: Walk::check
/// [`with_len()`]: Walk::with_len
/// [`impl_ops_for_walk`]: crate::impl_ops_for_walk
pub trait Walk {
    /// The element type produced at each coordinate.
    type Item;

    /// A cursor snapshot.
    type State: Clone;

    /// The number of axes. Never changes after construction.
    fn rank(&self) -> usize;

    /// The extent of axis `k`, `k < self.rank()`.
    fn len(&self, k: usize) -> Ext;

    /// Move the cursor `d` positions along axis `k`.
    fn adv(&mut self, k: usize, d: isize);

    /// Snapshot the cursor.
    fn save(&self) -> Self::State;

    /// Restore a snapshot taken from this node.
    fn load(&mut self, state: Self::State);

    /// Whether advancing along axis `k` moves nothing.
    fn zero_step(&self, k: usize) -> bool;

    /// Whether axis `j` can be collapsed into axis `z`, where `st` is the
    /// run length already merged at `z`: true iff stepping `z` a further
    /// `st` times lands exactly where one step of `j` would.
    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool;

    /// The element at the cursor. Terminal nodes apply their side effect
    /// here.
    fn item(&mut self) -> Self::Item;

    /// Deferred extent comparisons. Called once per traversal, never per
    /// element.
    fn check(&self) -> Result<()> { Ok(()) }

    /// Substitute `len` for every deferred length in this tree.
    fn with_len(&mut self, len: usize) { let _ = len; }

    /// A lazy node applying `f` to every element.
    fn map<F, R>(self, f: F) -> Map<Self, F> where
        Self: Sized,
        F: FnMut(Self::Item) -> R,
    {
        Map::new(self, f)
    }

    /// A lazy node combining `self` with `other` through the operator tag
    /// `O`, with broadcasting.
    ///
    /// # Panics
    ///
    /// Panics if the operands' already-known extents disagree.
    fn binary<W, O>(self, other: W) -> Zip<Self, W, O> where
        Self: Sized,
        W: Walk,
        O: Binary<Self::Item, W::Item>,
    {
        Zip::new(self, other)
    }

    /// A lazy node pairing up the elements of `self` and `other`.
    ///
    /// ```
    /// use nray::{Walk, iota, for_each};
    /// let mut out = Vec::new();
    /// for_each(iota(3).zip(iota(3).map(|i| -i)), |p| out.push(p)).unwrap();
    /// assert_eq!(out, [(0, 0), (1, -1), (2, -2)]);
    /// ```
    fn zip<W>(self, other: W) -> Zip<Self, W, Pair> where
        Self: Sized,
        W: Walk,
    {
        Zip::new(self, other)
    }
}
