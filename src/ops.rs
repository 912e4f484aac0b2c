//! Generic programming over binary arithmetic operators.
//!
//! For each supported operator in [`std::ops`] there is an uninstantiable
//! type of the same name implementing [`Binary`]. These tags are what
//! [`Walk::binary()`] is parameterized over, and what the [`std::ops`]
//! overloads on expression nodes expand to.
//!
//! [`Walk::binary()`]: super::Walk::binary()

/// A function that combines `T` with `U`.
///
/// This trait has no methods that take `self`; implement it for types that
/// cannot be instantiated, such as empty enumerations.
pub trait Binary<T, U> {
    type Output;

    fn call(t: T, u: U) -> Self::Output;
}

// ----------------------------------------------------------------------------

/// An implementation of [`Binary`] that constructs a pair.
pub enum Pair {}

impl<T, U> Binary<T, U> for Pair {
    type Output = (T, U);
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { (t, u) }
}

// ----------------------------------------------------------------------------

pub enum Add {}

impl<T, U> Binary<T, U> for Add where T: std::ops::Add<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.add(u) }
}

// ----------------------------------------------------------------------------

pub enum Sub {}

impl<T, U> Binary<T, U> for Sub where T: std::ops::Sub<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.sub(u) }
}

// ----------------------------------------------------------------------------

pub enum Mul {}

impl<T, U> Binary<T, U> for Mul where T: std::ops::Mul<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.mul(u) }
}

// ----------------------------------------------------------------------------

pub enum Div {}

impl<T, U> Binary<T, U> for Div where T: std::ops::Div<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.div(u) }
}

// ----------------------------------------------------------------------------

pub enum Rem {}

impl<T, U> Binary<T, U> for Rem where T: std::ops::Rem<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.rem(u) }
}

// ----------------------------------------------------------------------------

pub enum BitAnd {}

impl<T, U> Binary<T, U> for BitAnd where T: std::ops::BitAnd<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.bitand(u) }
}

// ----------------------------------------------------------------------------

pub enum BitOr {}

impl<T, U> Binary<T, U> for BitOr where T: std::ops::BitOr<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.bitor(u) }
}

// ----------------------------------------------------------------------------

/// Implement one of the [`std::ops`] traits for a type that implements
/// [`Walk`], as pointwise arithmetic with broadcasting.
///
/// You perhaps want to use [`impl_ops_for_walk`] instead, which calls this.
///
/// [`Walk`]: super::Walk
/// [`impl_ops_for_walk`]: crate::impl_ops_for_walk
#[macro_export]
macro_rules! impl_op_for_walk {
    ($op:ident for $v:ident { $method:ident }) => {
        impl<RHS: $crate::Walk> std::ops::$op<RHS> for $v where
            Self: $crate::Walk,
            <Self as $crate::Walk>::Item: std::ops::$op<RHS::Item>,
        {
            type Output = $crate::expr::Zip<Self, RHS, $crate::ops::$op>;
            fn $method(self, other: RHS) -> Self::Output {
                $crate::Walk::binary(self, other)
            }
        }
    };
    ($op:ident for $v:ident<$($a:lifetime,)? $($param:ident$(: $bound:path)?),*> { $method:ident }) => {
        impl<$($a,)? RHS: $crate::Walk, $($param$(: $bound)?),*> std::ops::$op<RHS> for $v<$($a,)? $($param),*> where
            Self: $crate::Walk,
            <Self as $crate::Walk>::Item: std::ops::$op<RHS::Item>,
        {
            type Output = $crate::expr::Zip<Self, RHS, $crate::ops::$op>;
            fn $method(self, other: RHS) -> Self::Output {
                $crate::Walk::binary(self, other)
            }
        }
    };
}

/// Implement all of the supported [`std::ops`] traits for a type that
/// implements [`Walk`]. The implementations call [`Walk::binary()`].
///
/// ```
/// use nray::{Walk, Ext, impl_ops_for_walk, for_each};
///
/// /// Counts upward forever; never drives an axis on its own.
/// #[derive(Clone)]
/// pub struct Count(isize);
///
/// impl Walk for Count {
///     type Item = isize;
///     type State = isize;
///     fn rank(&self) -> usize { 1 }
///     fn len(&self, _: usize) -> Ext { Ext::Dead }
///     fn adv(&mut self, _: usize, d: isize) { self.0 += d }
///     fn save(&self) -> isize { self.0 }
///     fn load(&mut self, s: isize) { self.0 = s }
///     fn zero_step(&self, _: usize) -> bool { false }
///     fn keep_step(&self, st: isize, _: usize, _: usize) -> bool { st == 1 }
///     fn item(&mut self) -> isize { self.0 }
/// }
///
/// impl_ops_for_walk!(Count);
///
/// let mut out = Vec::new();
/// for_each(Count(5) + nray::iota(3), |x| out.push(x)).unwrap();
/// assert_eq!(out, [5, 7, 9]);
/// ```
///
/// [`Walk`]: super::Walk
/// [`Walk::binary()`]: super::Walk::binary()
#[macro_export]
macro_rules! impl_ops_for_walk {
    ($v:ident$(<$($a:lifetime,)? $($param:ident$(: $bound:path)?),*>)?) => {
        $crate::impl_op_for_walk! { Add for $v$(<$($a,)? $($param$(: $bound)?),*>)? { add } }
        $crate::impl_op_for_walk! { Sub for $v$(<$($a,)? $($param$(: $bound)?),*>)? { sub } }
        $crate::impl_op_for_walk! { Mul for $v$(<$($a,)? $($param$(: $bound)?),*>)? { mul } }
        $crate::impl_op_for_walk! { Div for $v$(<$($a,)? $($param$(: $bound)?),*>)? { div } }
        $crate::impl_op_for_walk! { Rem for $v$(<$($a,)? $($param$(: $bound)?),*>)? { rem } }
        $crate::impl_op_for_walk! { BitAnd for $v$(<$($a,)? $($param$(: $bound)?),*>)? { bitand } }
        $crate::impl_op_for_walk! { BitOr for $v$(<$($a,)? $($param$(: $bound)?),*>)? { bitor } }
    };
}
