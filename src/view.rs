//! Strided windows over externally-owned storage.
//!
//! A [`View`] is a dimension vector plus a base offset into a borrowed
//! slice; it never owns elements. All the axis surgery in this crate
//! (subscripts, transposition, reshape) manipulates the dimension vector
//! and the offset, leaving the storage alone.

use std::fmt;

use super::{Axis, Ext, Walk, packed};
use super::impl_ops_for_walk;

/// A read-only strided window over a borrowed slice.
///
/// The element at coordinate `(i0, .., in)` lives at slice position
/// `offset + i0 * step(0) + .. + in * step(n)`. Steps may be negative, so
/// the offset is not necessarily the smallest touched position.
///
/// `View` implements [`Walk`], so it composes directly with the expression
/// nodes:
///
/// ```
/// use nray::{View, Scalar, Array};
/// let data = [1, 2, 3, 4, 5, 6];
/// let v = View::new(&data, &[2, 3]);
/// let doubled: Array<i32> = Array::from_expr(v * Scalar(2)).unwrap();
/// assert_eq!(doubled.data(), [2, 4, 6, 8, 10, 12]);
/// ```
#[derive(Debug)]
pub struct View<'a, T> {
    pub(crate) data: &'a [T],
    pub(crate) off: isize,
    pub(crate) dims: Vec<Axis>,
}

// Not derived: the storage is a shared slice, so cloning the window must
// not require `T: Clone`.
impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        View { data: self.data, off: self.off, dims: self.dims.clone() }
    }
}

impl<'a, T> View<'a, T> {
    /// A row-major view of the whole of `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not hold exactly the product of `shape`.
    pub fn new(data: &'a [T], shape: &[usize]) -> Self {
        let size: usize = shape.iter().product();
        assert_eq!(data.len(), size, "storage does not match shape");
        View { data, off: 0, dims: packed(shape) }
    }

    pub(crate) fn from_dims(data: &'a [T], off: isize, dims: Vec<Axis>) -> Self {
        View { data, off, dims }
    }

    pub fn rank(&self) -> usize { self.dims.len() }

    /// The axis descriptors, extents and steps both.
    pub fn dims(&self) -> &[Axis] { &self.dims }

    /// The extents, with dead axes reported as size 1.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|a| match a.len {
            Ext::Fixed(n) => n,
            _ => 1,
        }).collect()
    }

    /// The number of elements addressed by this view.
    pub fn size(&self) -> usize { self.shape().iter().product() }

    pub fn is_empty(&self) -> bool { self.size() == 0 }

    /// The base offset into the underlying slice. Beating subscripts moves
    /// this; it never allocates.
    pub fn offset(&self) -> isize { self.off }

    /// The element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` has the wrong rank or is out of range.
    pub fn at(&self, index: &[usize]) -> &T {
        assert_eq!(index.len(), self.rank(), "index rank mismatch");
        let shape = self.shape();
        let mut o = self.off;
        for (k, &i) in index.iter().enumerate() {
            assert!(i < shape[k], "index {} out of range on axis {}", i, k);
            o += i as isize * self.dims[k].step;
        }
        &self.data[o as usize]
    }

    /// Reorders the axes: axis `i` of the result is axis `perm[i]` of
    /// `self`. No data moves.
    ///
    /// # Panics
    ///
    /// Panics if `perm` is not a permutation of `0..rank`.
    pub fn transpose(&self, perm: &[usize]) -> View<'a, T> {
        assert_eq!(perm.len(), self.rank(), "permutation rank mismatch");
        let mut seen = vec![false; perm.len()];
        let dims = perm.iter().map(|&p| {
            assert!(!std::mem::replace(&mut seen[p], true), "axis {} repeated", p);
            self.dims[p]
        }).collect();
        View { data: self.data, off: self.off, dims }
    }

    /// Runs axis `k` backward. No data moves; an empty axis leaves the
    /// offset untouched.
    pub fn reversed(&self, k: usize) -> View<'a, T> {
        let mut v = self.clone();
        let a = &mut v.dims[k];
        if let Ext::Fixed(n) = a.len {
            if n > 0 {
                v.off += (n as isize - 1) * a.step;
            }
        }
        v.dims[k].step = -v.dims[k].step;
        v
    }

    /// Reinterprets this view under `shape` without copying, when the
    /// existing steps permit it: shrinking the leading axis, tiling with
    /// new broadcast axes, or re-dividing a packed row-major ravel. `None`
    /// means the reshape needs a fresh copy (see [`Array::reshaped`]).
    ///
    /// [`Array::reshaped`]: super::Array::reshaped
    ///
    /// ```
    /// use nray::View;
    /// let data = [1, 2, 3, 4, 5, 6];
    /// let v = View::new(&data, &[6]);
    /// let m = v.reshape(&[2, 3]).unwrap();
    /// assert_eq!(*m.at(&[1, 0]), 4);
    /// assert_eq!(m.offset(), v.offset());
    /// ```
    pub fn reshape(&self, shape: &[usize]) -> Option<View<'a, T>> {
        let old = self.shape();
        // Shrink the leading axis, keeping every step.
        if shape.len() == old.len()
            && !shape.is_empty()
            && shape[1..] == old[1..]
            && shape[0] <= old[0]
        {
            let mut dims = self.dims.clone();
            dims[0].len = Ext::Fixed(shape[0]);
            return Some(View { data: self.data, off: self.off, dims });
        }
        // Tile: new leading axes broadcast over the whole of `self`.
        if shape.len() > old.len() && shape[shape.len() - old.len()..] == old[..] {
            let extra = shape.len() - old.len();
            let mut dims: Vec<Axis> = shape[..extra].iter()
                .map(|&n| Axis { len: Ext::Fixed(n), step: 0 })
                .collect();
            dims.extend_from_slice(&self.dims);
            return Some(View { data: self.data, off: self.off, dims });
        }
        // Re-divide a packed row-major ravel.
        let new_size: usize = shape.iter().product();
        if self.dims == packed(&old) && new_size <= self.size() {
            return Some(View { data: self.data, off: self.off, dims: packed(shape) });
        }
        None
    }

    /// Applies `f` once per rank-`cell_rank` cell, iterating the leading
    /// frame axes in row-major order. Every call receives the same sliding
    /// sub-view; only its base offset changes between calls.
    ///
    /// ```
    /// use nray::View;
    /// let data = [1, 2, 3, 4, 5, 6];
    /// let v = View::new(&data, &[3, 2]);
    /// let mut sums = Vec::new();
    /// v.each_cell(1, |row| sums.push(row.at(&[0]) + row.at(&[1])));
    /// assert_eq!(sums, [3, 7, 11]);
    /// ```
    pub fn each_cell(&self, cell_rank: usize, mut f: impl FnMut(&View<'_, T>)) {
        assert!(cell_rank <= self.rank(), "cell rank exceeds view rank");
        let frame = self.rank() - cell_rank;
        let full = self.shape();
        let shape = &full[..frame];
        if shape.iter().any(|&n| n == 0) {
            return;
        }
        let mut cell = View {
            data: self.data,
            off: self.off,
            dims: self.dims[frame..].to_vec(),
        };
        let mut idx = vec![0usize; frame];
        let mut off = self.off;
        loop {
            cell.off = off;
            f(&cell);
            let mut k = frame;
            loop {
                if k == 0 {
                    return;
                }
                k -= 1;
                idx[k] += 1;
                off += self.dims[k].step;
                if idx[k] < shape[k] {
                    break;
                }
                idx[k] = 0;
                off -= shape[k] as isize * self.dims[k].step;
            }
        }
    }
}

impl<T: Clone> Walk for View<'_, T> {
    type Item = T;
    type State = isize;
    fn rank(&self) -> usize { self.dims.len() }
    fn len(&self, k: usize) -> Ext { self.dims[k].len }
    fn adv(&mut self, k: usize, d: isize) { self.off += d * self.dims[k].step; }
    fn save(&self) -> isize { self.off }
    fn load(&mut self, state: isize) { self.off = state; }
    fn zero_step(&self, k: usize) -> bool { self.dims[k].step == 0 }
    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        st * self.dims[z].step == self.dims[j].step
    }
    fn item(&mut self) -> T { self.data[self.off as usize].clone() }
}

impl_ops_for_walk!(View<'a, T: Clone>);

impl<T: fmt::Display> fmt::Display for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn go<T: fmt::Display>(v: &View<'_, T>, f: &mut fmt::Formatter<'_>, k: usize, off: isize) -> fmt::Result {
            if k == v.rank() {
                return write!(f, "{}", v.data[off as usize]);
            }
            let n = v.shape()[k];
            write!(f, "[")?;
            for i in 0..n {
                if i > 0 {
                    write!(f, ", ")?;
                }
                go(v, f, k + 1, off + i as isize * v.dims[k].step)?;
            }
            write!(f, "]")
        }
        go(self, f, 0, self.off)
    }
}

// ----------------------------------------------------------------------------

/// A mutable strided window: the destination side of an assignment.
///
/// ```
/// use nray::{View, ViewMut, Scalar, iota};
/// let mut data = [0isize; 6];
/// let mut m = ViewMut::new(&mut data, &[2, 3]);
/// m.assign(iota(3) * Scalar(10)).unwrap();
/// assert_eq!(data, [0, 10, 20, 0, 10, 20]);
/// ```
#[derive(Debug)]
pub struct ViewMut<'a, T> {
    pub(crate) data: &'a mut [T],
    pub(crate) off: isize,
    pub(crate) dims: Vec<Axis>,
}

impl<'a, T> ViewMut<'a, T> {
    /// A row-major mutable view of the whole of `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not hold exactly the product of `shape`.
    pub fn new(data: &'a mut [T], shape: &[usize]) -> Self {
        let size: usize = shape.iter().product();
        assert_eq!(data.len(), size, "storage does not match shape");
        ViewMut { data, off: 0, dims: packed(shape) }
    }

    pub fn rank(&self) -> usize { self.dims.len() }

    pub fn dims(&self) -> &[Axis] { &self.dims }

    pub fn shape(&self) -> Vec<usize> { self.as_view().shape() }

    /// A read-only view of the same window.
    pub fn as_view(&self) -> View<'_, T> {
        View { data: self.data, off: self.off, dims: self.dims.clone() }
    }

    /// The element at `index`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index` has the wrong rank or is out of range.
    pub fn at_mut(&mut self, index: &[usize]) -> &mut T {
        assert_eq!(index.len(), self.rank(), "index rank mismatch");
        let shape = self.shape();
        let mut o = self.off;
        for (k, &i) in index.iter().enumerate() {
            assert!(i < shape[k], "index {} out of range on axis {}", i, k);
            o += i as isize * self.dims[k].step;
        }
        &mut self.data[o as usize]
    }

    /// Stores `t` at every coordinate.
    pub fn fill(&mut self, t: T) where T: Clone {
        // A fill cannot fail: the source is a scalar.
        let _ = self.update(super::Scalar(t), |d, v| *d = v);
    }

    // Cursor plumbing for the assignment node.
    pub(crate) fn step(&self, k: usize) -> isize { self.dims[k].step }
    pub(crate) fn adv(&mut self, k: usize, d: isize) { self.off += d * self.dims[k].step; }
    pub(crate) fn poke(&mut self) -> &mut T { &mut self.data[self.off as usize] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ([i32; 6], Vec<usize>) { ([1, 2, 3, 4, 5, 6], vec![2, 3]) }

    #[test]
    fn direct_indexing() {
        let (data, shape) = grid();
        let v = View::new(&data, &shape);
        assert_eq!(*v.at(&[0, 0]), 1);
        assert_eq!(*v.at(&[1, 2]), 6);
        assert_eq!(v.shape(), [2, 3]);
        assert_eq!(v.size(), 6);
    }

    #[test]
    fn transpose_swaps_steps() {
        let (data, shape) = grid();
        let t = View::new(&data, &shape).transpose(&[1, 0]);
        assert_eq!(t.shape(), [3, 2]);
        assert_eq!(*t.at(&[2, 1]), 6);
        assert_eq!(t.offset(), 0);
    }

    #[test]
    fn reversed_moves_base_not_data() {
        let (data, shape) = grid();
        let r = View::new(&data, &shape).reversed(1);
        assert_eq!(*r.at(&[0, 0]), 3);
        assert_eq!(*r.at(&[0, 2]), 1);
        assert_eq!(r.offset(), 2);
    }

    #[test]
    fn reshape_free_cases() {
        let data = [1, 2, 3, 4, 5, 6];
        let v = View::new(&data, &[6]);

        let m = v.reshape(&[3, 2]).unwrap();
        assert_eq!(*m.at(&[2, 0]), 5);
        assert_eq!(m.offset(), 0);

        let shrunk = View::new(&data, &[3, 2]).reshape(&[2, 2]).unwrap();
        assert_eq!(*shrunk.at(&[1, 1]), 4);

        let tiled = v.reshape(&[4, 6]).unwrap();
        assert_eq!(*tiled.at(&[3, 5]), 6);
        assert_eq!(tiled.offset(), 0);
    }

    #[test]
    fn reshape_incompatible_needs_copy() {
        let (data, shape) = grid();
        let t = View::new(&data, &shape).transpose(&[1, 0]);
        assert!(t.reshape(&[6]).is_none());
    }

    #[test]
    fn cells_share_the_window() {
        let (data, shape) = grid();
        let v = View::new(&data, &shape);
        let mut offs = Vec::new();
        v.each_cell(1, |row| {
            assert_eq!(row.shape(), [3]);
            offs.push(row.offset());
        });
        assert_eq!(offs, [0, 3]);
    }

    #[test]
    fn views_clone_without_cloning_elements() {
        struct Opaque;
        let data = [Opaque, Opaque, Opaque];
        let v = View::new(&data, &[3]).reversed(0);
        let w = v.clone();
        assert_eq!(w.offset(), 2);
        assert!(std::ptr::eq(v.data.as_ptr(), w.data.as_ptr()));
    }

    #[test]
    fn zero_extent_frame_runs_nothing() {
        let data: [i32; 0] = [];
        let v = View::new(&data, &[0, 3]);
        let mut calls = 0;
        v.each_cell(1, |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn display_nests_by_axis() {
        let (data, shape) = grid();
        let v = View::new(&data, &shape);
        assert_eq!(v.to_string(), "[[1, 2, 3], [4, 5, 6]]");
    }
}
