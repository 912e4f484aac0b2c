//! A rank-polymorphic array expression engine.
//!
//! `nray` builds lazy arithmetic over N-dimensional strided data, in the
//! spirit of the APL/J array languages: operands of different rank are
//! reconciled by broadcasting, expressions are trees of cheap nodes that
//! compute nothing until traversed, and subscripting is "beaten" into plain
//! pointer arithmetic whenever the subscript is affine.
//!
//! The central trait is [`Walk`]: everything that can sit in an expression
//! (a borrowed [`View`], a broadcast [`Scalar`], an affine sequence from
//! [`iota()`] or [`indices()`], a composed [`Map`], [`Zip`] or [`Pick`] node)
//! reports its shape as [`Ext`] extents, carries its own cursor, and is
//! driven by the traversal entry points ([`for_each()`], [`try_ply()`],
//! [`Array::from_expr`], [`ViewMut::assign`]). A traversal first settles
//! every deferred shape question, then visits each coordinate exactly once,
//! collapsing loop levels into a single ravel where the operands' steps
//! stay linear.
//!
//! ```
//! use nray::Array;
//! let a = Array::from_fn(&[4, 3], |ix| (ix[0] as i64) - (ix[1] as i64));
//! let b = Array::from_fn(&[3], |ix| 1 - 2 * (ix[0] as i64));
//! // Lazy product, broadcasting b across a's rows; nothing is computed
//! // until the collect.
//! let c: Array<i64> = Array::from_expr(a.view() * b.view()).unwrap();
//! assert_eq!(c.shape(), [4, 3]);
//! assert_eq!(c[&[2, 1]], (2 - 1) * (1 - 2));
//! ```
//!
//! Shapes may be partially unknown when an expression is built: an extent
//! can be deferred ([`Ext::Unknown`], the [`Len`] placeholder) and resolved
//! later with [`Walk::with_len()`], and axes inserted for broadcasting are
//! dead ([`Ext::Dead`]) rather than carrying a fake size. Mismatches that
//! are already decidable when a node is built panic there; everything else
//! is checked once per traversal and reported as an [`Error`] before any
//! element is touched.

mod dim;
pub use dim::{Ext, Axis, packed, agree_shapes};

mod error;
pub use error::{Error, Result};

mod walk;
pub use walk::Walk;

mod atom;
pub use atom::{Scalar, Iota, Len, iota, indices};

pub mod expr;
pub use expr::{Map, Zip};

mod pick;
pub use pick::{Pick, Branches, pick};

pub mod view;
pub use view::{View, ViewMut};

mod from;
pub use from::{Ix, Gather, Gatherable};

mod ply;
pub use ply::{for_each, try_ply, ply};

mod array;
pub use array::Array;

pub mod ops;
pub use ops::Binary;
