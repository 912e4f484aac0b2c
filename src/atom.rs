//! Leaf nodes: broadcast constants, affine index sequences, and the
//! deferred length placeholder.

use super::{Ext, Error, Result, Walk};
use super::impl_ops_for_walk;

/// A constant broadcast to any shape.
///
/// ```
/// use nray::{Walk, Scalar, iota, for_each};
/// let mut out = Vec::new();
/// for_each(iota(3) * Scalar(10), |x| out.push(x)).unwrap();
/// assert_eq!(out, [0, 10, 20]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar<T>(pub T);

impl<T: Clone> Walk for Scalar<T> {
    type Item = T;
    type State = ();
    fn rank(&self) -> usize { 0 }
    fn len(&self, _: usize) -> Ext { Ext::Dead }
    fn adv(&mut self, _: usize, _: isize) {}
    fn save(&self) {}
    fn load(&mut self, _: ()) {}
    fn zero_step(&self, _: usize) -> bool { true }
    fn keep_step(&self, _: isize, _: usize, _: usize) -> bool { true }
    fn item(&mut self) -> T { self.0.clone() }
}

impl_ops_for_walk!(Scalar<T: Clone>);

// ----------------------------------------------------------------------------

/// An affine sequence: `org`, `org + step`, `org + 2 * step`, ...
///
/// Its varying axis is its first; the `dead` trailing axes broadcast, so
/// under trailing-axis alignment an `Iota` built by [`indices()`] reports
/// the coordinate along the axis it names. The extent may be deferred
/// ([`Ext::Unknown`]) and substituted later with [`Walk::with_len()`].
#[derive(Debug, Clone, Copy)]
pub struct Iota {
    step: isize,
    len: Ext,
    dead: usize,
    cur: isize,
}

impl Iota {
    pub fn new(org: isize, step: isize, len: Ext) -> Self {
        Iota { step, len, dead: 0, cur: org }
    }
}

/// `0, 1, .., n-1` along one axis.
///
/// ```
/// use nray::{iota, for_each};
/// let mut out = Vec::new();
/// for_each(iota(4), |x| out.push(x)).unwrap();
/// assert_eq!(out, [0, 1, 2, 3]);
/// ```
pub fn iota(n: usize) -> Iota {
    Iota::new(0, 1, Ext::Fixed(n))
}

/// The coordinate along one axis, counted from the innermost: `indices(0)`
/// varies with the last axis of the expression it is zipped into,
/// `indices(1)` with the one before, and so on. It cannot drive an axis by
/// itself; some other operand must.
///
/// ```
/// use nray::{Walk, indices, Array};
/// let a = Array::from_elem(&[2, 3], 0isize);
/// let g: Array<isize> = Array::from_expr(a.view() + indices(1) * indices(0)).unwrap();
/// assert_eq!(g.data(), [0, 0, 0, 0, 1, 2]);
/// ```
pub fn indices(axis: usize) -> Iota {
    Iota { step: 1, len: Ext::Dead, dead: axis, cur: 0 }
}

impl Walk for Iota {
    type Item = isize;
    type State = isize;
    fn rank(&self) -> usize { 1 + self.dead }
    fn len(&self, k: usize) -> Ext {
        if k == 0 { self.len } else { Ext::Dead }
    }
    fn adv(&mut self, k: usize, d: isize) {
        if k == 0 {
            self.cur += d * self.step;
        }
    }
    fn save(&self) -> isize { self.cur }
    fn load(&mut self, state: isize) { self.cur = state; }
    fn zero_step(&self, k: usize) -> bool { k != 0 || self.step == 0 }
    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        let s = |k: usize| if k == 0 { self.step } else { 0 };
        st * s(z) == s(j)
    }
    fn item(&mut self) -> isize { self.cur }
    fn with_len(&mut self, len: usize) {
        if self.len == Ext::Unknown {
            self.len = Ext::Fixed(len);
        }
    }
}

impl_ops_for_walk!(Iota);

// ----------------------------------------------------------------------------

/// A placeholder for a length that is not known yet.
///
/// An expression can be written once and bound later against a concrete
/// axis length with [`Walk::with_len()`]; traversing it before that fails
/// with [`Error::UnresolvedLen`].
///
/// ```
/// use nray::{Walk, Len, Scalar, for_each};
/// let mut e = Len::new() * Scalar(2usize);
/// e.with_len(21);
/// let mut out = Vec::new();
/// for_each(e, |x| out.push(x)).unwrap();
/// assert_eq!(out, [42]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Len {
    resolved: Option<usize>,
}

impl Len {
    pub fn new() -> Self {
        Len { resolved: None }
    }
}

impl Walk for Len {
    type Item = usize;
    type State = ();
    fn rank(&self) -> usize { 0 }
    fn len(&self, _: usize) -> Ext { Ext::Dead }
    fn adv(&mut self, _: usize, _: isize) {}
    fn save(&self) {}
    fn load(&mut self, _: ()) {}
    fn zero_step(&self, _: usize) -> bool { true }
    fn keep_step(&self, _: isize, _: usize, _: usize) -> bool { true }
    fn item(&mut self) -> usize {
        match self.resolved {
            Some(n) => n,
            None => panic!("deferred length used before substitution"),
        }
    }
    fn check(&self) -> Result<()> {
        match self.resolved {
            Some(_) => Ok(()),
            None => Err(Error::UnresolvedLen),
        }
    }
    fn with_len(&mut self, len: usize) { self.resolved = Some(len); }
}

impl_ops_for_walk!(Len);

#[cfg(test)]
mod tests {
    use super::super::{for_each, try_ply};
    use super::*;

    #[test]
    fn iota_is_affine() {
        let mut out = Vec::new();
        for_each(Iota::new(10, -2, Ext::Fixed(4)), |x| out.push(x)).unwrap();
        assert_eq!(out, [10, 8, 6, 4]);
    }

    #[test]
    fn indices_cannot_drive_itself() {
        assert_eq!(for_each(indices(0), |_| ()), Err(Error::Undriven { axis: 0 }));
    }

    #[test]
    fn unresolved_len_is_reported() {
        let e = iota(3).zip(Iota::new(0, 1, Ext::Unknown));
        assert_eq!(for_each(e, |_| ()), Err(Error::UnresolvedLen));
    }

    #[test]
    fn resolved_len_agrees() {
        let mut e = iota(3).zip(Iota::new(0, 2, Ext::Unknown));
        e.with_len(3);
        let mut out = Vec::new();
        for_each(e, |p| out.push(p)).unwrap();
        assert_eq!(out, [(0, 0), (1, 2), (2, 4)]);
    }

    #[test]
    fn early_exit_stops() {
        let hit = try_ply(iota(10), |x| if x >= 3 { Some(x) } else { None }).unwrap();
        assert_eq!(hit, Some(3));
    }
}
