//! Runtime branch selection.
//!
//! A [`Pick`] node carries an index operand and a tuple of branch operands.
//! At each coordinate it dereferences the index first and then exactly the
//! selected branch; the untaken branches are advanced but never evaluated.
//! That is a correctness requirement, not an optimization: branch evaluation
//! may have side effects, or may be out of bounds for the untaken case.

use super::{Ext, Error, Result, Walk};
use super::expr::{ext_at, adv_op, zero_step_op, keep_step_op};
use super::impl_ops_for_walk;

/// A fixed tuple of candidate operands, all producing the same item type.
/// Implemented for 2- and 3-tuples of [`Walk`]s.
pub trait Branches {
    type Item;
    type State: Clone;

    /// How many branches there are.
    fn arity(&self) -> usize;
    fn rank(&self) -> usize;
    /// The agreed extent across all branches at node axis `k`.
    fn ext(&self, nr: usize, k: usize) -> Ext;
    /// The first pair of fixed extents that disagree at node axis `k`.
    fn mismatch(&self, nr: usize, k: usize) -> Option<(usize, usize)>;
    fn adv(&mut self, nr: usize, k: usize, e: Ext, d: isize);
    fn save(&self) -> Self::State;
    fn load(&mut self, state: Self::State);
    fn zero_step(&self, nr: usize, k: usize, e: Ext) -> bool;
    fn keep_step(&self, nr: usize, st: isize, z: usize, ez: Ext, j: usize, ej: Ext) -> bool;
    fn check(&self) -> Result<()>;
    fn with_len(&mut self, len: usize);
    /// Dereference branch `which` only.
    fn item_at(&mut self, which: usize) -> Self::Item;
}

macro_rules! impl_branches {
    ($n:expr; $($B:ident / $i:tt),*) => {
        impl<Item, $($B),*> Branches for ($($B,)*) where $($B: Walk<Item = Item>),* {
            type Item = Item;
            type State = ($($B::State,)*);

            fn arity(&self) -> usize { $n }

            fn rank(&self) -> usize {
                let mut r = 0;
                $( r = r.max(self.$i.rank()); )*
                r
            }

            fn ext(&self, nr: usize, k: usize) -> Ext {
                let mut e = Ext::Dead;
                $( e = e.agree(ext_at(&self.$i, nr, k)).unwrap_or(e); )*
                e
            }

            fn mismatch(&self, nr: usize, k: usize) -> Option<(usize, usize)> {
                let exts = [$(ext_at(&self.$i, nr, k)),*];
                let mut e = Ext::Dead;
                for b in exts {
                    match e.agree(b) {
                        Some(agreed) => e = agreed,
                        None => return match (e.fixed(), b.fixed()) {
                            (Some(n), Some(m)) => Some((n, m)),
                            _ => Some((0, 0)),
                        },
                    }
                }
                None
            }

            fn adv(&mut self, nr: usize, k: usize, e: Ext, d: isize) {
                $( adv_op(&mut self.$i, nr, k, e, d); )*
            }

            fn save(&self) -> Self::State { ($(self.$i.save(),)*) }

            fn load(&mut self, state: Self::State) {
                $( self.$i.load(state.$i); )*
            }

            fn zero_step(&self, nr: usize, k: usize, e: Ext) -> bool {
                true $(&& zero_step_op(&self.$i, nr, k, e))*
            }

            fn keep_step(&self, nr: usize, st: isize, z: usize, ez: Ext, j: usize, ej: Ext) -> bool {
                true $(&& keep_step_op(&self.$i, nr, st, z, ez, j, ej))*
            }

            fn check(&self) -> Result<()> {
                $( self.$i.check()?; )*
                Ok(())
            }

            fn with_len(&mut self, len: usize) {
                $( self.$i.with_len(len); )*
            }

            fn item_at(&mut self, which: usize) -> Item {
                match which {
                    $( $i => self.$i.item(), )*
                    _ => panic!("pick selected branch {} of {}", which, $n),
                }
            }
        }
    };
}

impl_branches!(2; B0 / 0, B1 / 1);
impl_branches!(3; B0 / 0, B1 / 1, B2 / 2);

// ----------------------------------------------------------------------------

/// A lazy node choosing among branch operands per coordinate.
/// Constructed by [`pick()`].
#[derive(Clone)]
pub struct Pick<I, B> {
    index: I,
    branches: B,
}

/// Builds a [`Pick`] node: at each coordinate, `index` selects which of the
/// `branches` supplies the element.
///
/// ```
/// use nray::{pick, View, for_each};
/// let sel = [0usize, 1, 0];
/// let a = [1, 2, 3];
/// let b = [10, 20, 30];
/// let p = pick(View::new(&sel, &[3]),
///              (View::new(&a, &[3]), View::new(&b, &[3])));
/// let mut out = Vec::new();
/// for_each(p, |x| out.push(x)).unwrap();
/// assert_eq!(out, [1, 20, 3]);
/// ```
///
/// # Panics
///
/// Panics if the already-known extents of the index and the branches
/// disagree. Extents still deferred are re-checked at traversal.
pub fn pick<I, B>(index: I, branches: B) -> Pick<I, B> where
    I: Walk<Item = usize>,
    B: Branches,
{
    let p = Pick { index, branches };
    if let Err(e) = p.cross_check() {
        panic!("{}", e);
    }
    p
}

impl<I: Walk<Item = usize>, B: Branches> Pick<I, B> {
    // Extent comparisons between the index and the branches, and among the
    // branches themselves. Subtrees are not checked here.
    fn cross_check(&self) -> Result<()> {
        let nr = self.rank();
        for k in 0..nr {
            if let Some((n, m)) = self.branches.mismatch(nr, k) {
                return Err(Error::ShapeMismatch { axis: k, a: n, b: m });
            }
            let ei = ext_at(&self.index, nr, k);
            let eb = self.branches.ext(nr, k);
            if ei.agree(eb).is_none() {
                let (a, b) = match (ei.fixed(), eb.fixed()) {
                    (Some(n), Some(m)) => (n, m),
                    _ => (0, 0),
                };
                return Err(Error::ShapeMismatch { axis: k, a, b });
            }
        }
        Ok(())
    }
}

impl<I: Walk<Item = usize>, B: Branches> Walk for Pick<I, B> {
    type Item = B::Item;
    type State = (I::State, B::State);

    fn rank(&self) -> usize { self.index.rank().max(self.branches.rank()) }

    fn len(&self, k: usize) -> Ext {
        let nr = self.rank();
        let ei = ext_at(&self.index, nr, k);
        let eb = self.branches.ext(nr, k);
        ei.agree(eb).unwrap_or(eb)
    }

    fn adv(&mut self, k: usize, d: isize) {
        let nr = self.rank();
        let e = self.len(k);
        adv_op(&mut self.index, nr, k, e, d);
        self.branches.adv(nr, k, e, d);
    }

    fn save(&self) -> Self::State { (self.index.save(), self.branches.save()) }

    fn load(&mut self, state: Self::State) {
        self.index.load(state.0);
        self.branches.load(state.1);
    }

    fn zero_step(&self, k: usize) -> bool {
        let nr = self.rank();
        let e = self.len(k);
        zero_step_op(&self.index, nr, k, e) && self.branches.zero_step(nr, k, e)
    }

    fn keep_step(&self, st: isize, z: usize, j: usize) -> bool {
        let nr = self.rank();
        let (ez, ej) = (self.len(z), self.len(j));
        keep_step_op(&self.index, nr, st, z, ez, j, ej)
            && self.branches.keep_step(nr, st, z, ez, j, ej)
    }

    fn item(&mut self) -> Self::Item {
        let which = self.index.item();
        self.branches.item_at(which)
    }

    fn check(&self) -> Result<()> {
        self.index.check()?;
        self.branches.check()?;
        self.cross_check()
    }

    fn with_len(&mut self, len: usize) {
        self.index.with_len(len);
        self.branches.with_len(len);
    }
}

impl_ops_for_walk!(Pick<I, B>);

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::super::{for_each, View, Scalar};
    use super::*;

    #[test]
    fn untaken_branches_are_never_evaluated() {
        let sel = [0usize, 1, 0];
        let a = [1, 2, 3];
        let b = [10, 20, 30];
        let count = Cell::new(0);
        let p = pick(
            View::new(&sel, &[3]),
            (
                View::new(&a, &[3]).map(|x| { count.set(count.get() + 1); x }),
                View::new(&b, &[3]).map(|x| { count.set(count.get() + 1); x }),
            ),
        );
        let mut out = Vec::new();
        for_each(p, |x| out.push(x)).unwrap();
        assert_eq!(out, [1, 20, 3]);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn three_branches() {
        let sel = [2usize, 0, 1, 2];
        let p = pick(
            View::new(&sel, &[4]),
            (Scalar(-1), Scalar(0), Scalar(1)),
        );
        let mut out = Vec::new();
        for_each(p, |x| out.push(x)).unwrap();
        assert_eq!(out, [1, -1, 0, 1]);
    }

    #[test]
    #[should_panic(expected = "extent mismatch")]
    fn branch_shapes_must_agree() {
        let sel = [0usize, 1];
        let a = [1, 2];
        let b = [1, 2, 3];
        let _ = pick(
            View::new(&sel, &[2]),
            (View::new(&a, &[2]), View::new(&b, &[3])),
        );
    }

    #[test]
    #[should_panic(expected = "extent mismatch")]
    fn last_branch_mismatch_is_reported() {
        let sel = [0usize, 1];
        let a = [1, 2];
        let c = [1, 2, 3];
        let _ = pick(
            View::new(&sel, &[2]),
            (View::new(&a, &[2]), View::new(&a, &[2]), View::new(&c, &[3])),
        );
    }

    #[test]
    #[should_panic(expected = "selected branch")]
    fn out_of_range_branch_panics() {
        let sel = [5usize];
        let p = pick(View::new(&sel, &[1]), (Scalar(0), Scalar(1)));
        let _ = for_each(p, |_| ());
    }
}
