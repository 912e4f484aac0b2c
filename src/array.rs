//! A heap-backed, row-major owning container.

use num_traits::{One, Zero};

use super::{Result, View, ViewMut, Walk};
use super::ply::resolved_shape;
use super::ply::for_each;

/// A dense row-major array of `T`s.
///
/// The engine itself never owns storage; `Array` is the collaborator that
/// does. [`view()`] and [`view_mut()`] put it on either side of an
/// expression.
///
/// [`view()`]: Array::view
/// [`view_mut()`]: Array::view_mut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Array<T> {
    /// Constructs an `Array` of shape `shape` given its elements in
    /// row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not hold exactly the product of `shape`.
    pub fn new(shape: &[usize], data: Vec<T>) -> Self {
        let size: usize = shape.iter().product();
        assert_eq!(data.len(), size, "storage does not match shape");
        Array { shape: shape.to_vec(), data }
    }

    /// Constructs an `Array` from a function of the coordinate.
    ///
    /// ```
    /// use nray::Array;
    /// let a: Array<usize> = Array::from_fn(&[2, 3], |ix| 10 * ix[0] + ix[1]);
    /// assert_eq!(a.data(), [0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let size: usize = shape.iter().product();
        let mut data = Vec::with_capacity(size);
        if size > 0 {
            let mut idx = vec![0usize; shape.len()];
            'grid: loop {
                data.push(f(&idx));
                let mut k = shape.len();
                loop {
                    if k == 0 {
                        break 'grid;
                    }
                    k -= 1;
                    idx[k] += 1;
                    if idx[k] < shape[k] {
                        break;
                    }
                    idx[k] = 0;
                }
            }
        }
        Array { shape: shape.to_vec(), data }
    }

    /// Every element a clone of `t`.
    pub fn from_elem(shape: &[usize], t: T) -> Self where T: Clone {
        let size: usize = shape.iter().product();
        Array { shape: shape.to_vec(), data: vec![t; size] }
    }

    pub fn zeros(shape: &[usize]) -> Self where T: Zero + Clone {
        Self::from_elem(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self where T: One + Clone {
        Self::from_elem(shape, T::one())
    }

    /// Materializes an expression, in row-major order.
    ///
    /// ```
    /// use nray::{Array, Scalar, iota};
    /// let a: Array<isize> = Array::from_expr(iota(4) * Scalar(3)).unwrap();
    /// assert_eq!(a.shape(), [4]);
    /// assert_eq!(a.data(), [0, 3, 6, 9]);
    /// ```
    pub fn from_expr<W: Walk<Item = T>>(w: W) -> Result<Self> {
        let shape = resolved_shape(&w)?;
        let mut data = Vec::with_capacity(shape.iter().product());
        for_each(w, |t| data.push(t))?;
        Ok(Array { shape, data })
    }

    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn rank(&self) -> usize { self.shape.len() }

    pub fn size(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// The raw elements, row-major.
    pub fn data(&self) -> &[T] { &self.data }

    pub fn into_data(self) -> Vec<T> { self.data }

    /// A read-only view of the whole array.
    pub fn view(&self) -> View<'_, T> {
        View::new(&self.data, &self.shape)
    }

    /// A mutable view of the whole array: the destination of an
    /// assignment.
    ///
    /// ```
    /// use nray::{Array, indices};
    /// let mut a: Array<isize> = Array::zeros(&[2, 3]);
    /// a.view_mut().assign(indices(0) - indices(1)).unwrap();
    /// assert_eq!(a.data(), [0, 1, 2, -1, 0, 1]);
    /// ```
    pub fn view_mut(&mut self) -> ViewMut<'_, T> {
        ViewMut::new(&mut self.data, &self.shape)
    }

    /// The same elements under a new shape of equal size. This is the copy
    /// fallback for reshapes [`View::reshape`] cannot do for free.
    ///
    /// # Panics
    ///
    /// Panics if the sizes differ.
    pub fn reshaped(&self, shape: &[usize]) -> Array<T> where T: Clone {
        let size: usize = shape.iter().product();
        assert_eq!(size, self.size(), "reshape changes the element count");
        Array { shape: shape.to_vec(), data: self.data.clone() }
    }

    /// Appends an element to a rank-1 array, growing its extent by one.
    /// Rank never changes after construction.
    pub fn push(&mut self, t: T) {
        assert_eq!(self.rank(), 1, "push requires a rank-1 array");
        self.data.push(t);
        self.shape[0] += 1;
    }
}

impl<T> std::ops::Index<&[usize]> for Array<T> {
    type Output = T;
    fn index(&self, index: &[usize]) -> &T {
        assert_eq!(index.len(), self.rank(), "index rank mismatch");
        let mut o = 0usize;
        for (k, &i) in index.iter().enumerate() {
            assert!(i < self.shape[k], "index {} out of range on axis {}", i, k);
            o = o * self.shape[k] + i;
        }
        &self.data[o]
    }
}

impl<T> std::ops::IndexMut<&[usize]> for Array<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        assert_eq!(index.len(), self.rank(), "index rank mismatch");
        let mut o = 0usize;
        for (k, &i) in index.iter().enumerate() {
            assert!(i < self.shape[k], "index {} out of range on axis {}", i, k);
            o = o * self.shape[k] + i;
        }
        &mut self.data[o]
    }
}

impl<T: std::fmt::Display + Clone> std::fmt::Display for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.view().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{iota, Scalar};
    use super::*;

    #[test]
    fn indexing_is_row_major() {
        let a = Array::from_fn(&[2, 3], |ix| (ix[0], ix[1]));
        assert_eq!(a[&[0, 0]], (0, 0));
        assert_eq!(a[&[1, 2]], (1, 2));
    }

    #[test]
    fn from_expr_collects_row_major() {
        let a: Array<isize> = Array::from_expr(iota(3) + Scalar(5)).unwrap();
        assert_eq!(a.shape(), [3]);
        assert_eq!(a.data(), [5, 6, 7]);
    }

    #[test]
    fn reshaped_copies() {
        let a = Array::from_fn(&[2, 3], |ix| 10 * ix[0] + ix[1]);
        let b = a.reshaped(&[3, 2]);
        assert_eq!(b.data(), a.data());
        assert_eq!(b[&[2, 1]], 12);
    }

    #[test]
    fn push_grows_the_extent() {
        let mut a = Array::new(&[2], vec![1, 2]);
        a.push(3);
        assert_eq!(a.shape(), [3]);
        assert_eq!(a.data(), [1, 2, 3]);
    }

    #[test]
    fn rank_zero() {
        let a = Array::from_fn(&[], |_| 42);
        assert_eq!(a.size(), 1);
        let ix: &[usize] = &[];
        assert_eq!(a[ix], 42);
    }
}
