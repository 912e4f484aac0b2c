//! Axis descriptors and shape agreement.
//!
//! A shape is an ordered sequence of [`Axis`] descriptors. Each axis has an
//! extent, which may not be known yet, and a signed element stride. Extents
//! are a tagged type, [`Ext`], rather than out-of-band sentinel integers, so
//! an "unknown" or "dead" axis can never collide with a legitimate size.

/// The extent of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ext {
    /// Not known yet; resolved by length substitution before traversal.
    Unknown,
    /// A rank-inserted or collapsed axis. Counts as size 1 for agreement,
    /// follows whatever drives it, and must not be traversed on its own.
    Dead,
    /// A concrete extent.
    Fixed(usize),
}

impl Ext {
    /// Returns the concrete extent, if there is one.
    pub fn fixed(self) -> Option<usize> {
        match self { Ext::Fixed(n) => Some(n), _ => None }
    }

    /// The size this extent contributes to an element count. `Dead` is 1.
    pub fn size(self) -> Option<usize> {
        match self {
            Ext::Fixed(n) => Some(n),
            Ext::Dead => Some(1),
            Ext::Unknown => None,
        }
    }

    /// Reconciles two extents on the same logical axis.
    ///
    /// `Dead` yields the other side, size 1 yields the other side, equal
    /// fixed extents yield themselves, and an `Unknown` on either side makes
    /// the agreement provisional. `None` means the extents are irreconcilable.
    ///
    /// ```
    /// use nray::Ext;
    /// assert_eq!(Ext::Fixed(3).agree(Ext::Fixed(3)), Some(Ext::Fixed(3)));
    /// assert_eq!(Ext::Fixed(1).agree(Ext::Fixed(7)), Some(Ext::Fixed(7)));
    /// assert_eq!(Ext::Dead.agree(Ext::Fixed(7)), Some(Ext::Fixed(7)));
    /// assert_eq!(Ext::Fixed(3).agree(Ext::Fixed(4)), None);
    /// ```
    pub fn agree(self, other: Ext) -> Option<Ext> {
        match (self, other) {
            (Ext::Dead, e) | (e, Ext::Dead) => Some(e),
            (Ext::Unknown, _) | (_, Ext::Unknown) => Some(Ext::Unknown),
            (Ext::Fixed(1), e) | (e, Ext::Fixed(1)) => Some(e),
            (Ext::Fixed(n), Ext::Fixed(m)) if n == m => Some(Ext::Fixed(n)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Ext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ext::Unknown => write!(f, "?"),
            Ext::Dead => write!(f, "_"),
            Ext::Fixed(n) => write!(f, "{}", n),
        }
    }
}

// ----------------------------------------------------------------------------

/// One axis of a strided shape: an extent and a signed element stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    pub len: Ext,
    pub step: isize,
}

impl Axis {
    pub fn new(len: usize, step: isize) -> Self {
        Axis { len: Ext::Fixed(len), step }
    }

    /// A broadcast axis: size 1 for agreement, advancing it moves nothing.
    pub fn dead() -> Self {
        Axis { len: Ext::Dead, step: 0 }
    }
}

/// Row-major axes for `shape`: the last axis has stride 1.
///
/// ```
/// use nray::{Axis, packed};
/// assert_eq!(packed(&[4, 3]), vec![Axis::new(4, 3), Axis::new(3, 1)]);
/// ```
pub fn packed(shape: &[usize]) -> Vec<Axis> {
    let mut dims: Vec<Axis> = shape.iter().map(|&n| Axis::new(n, 0)).collect();
    let mut step = 1isize;
    for a in dims.iter_mut().rev() {
        a.step = step;
        step *= match a.len { Ext::Fixed(n) => n as isize, _ => 1 };
    }
    dims
}

/// Reconciles two whole shapes, aligning trailing axes.
///
/// The result has the larger rank; the leading extra axes of the longer
/// shape pass through unchanged. `None` reports the first irreconcilable
/// axis pair.
pub fn agree_shapes(a: &[Ext], b: &[Ext]) -> Option<Vec<Ext>> {
    let rank = a.len().max(b.len());
    let mut out = Vec::with_capacity(rank);
    for k in 0..rank {
        let ea = axis_ext(a, rank, k);
        let eb = axis_ext(b, rank, k);
        out.push(ea.agree(eb)?);
    }
    Some(out)
}

/// The extent of `shape` at axis `k` of a rank-`rank` frame, right-aligned.
/// Axes the shape does not reach are `Dead`.
pub(crate) fn axis_ext(shape: &[Ext], rank: usize, k: usize) -> Ext {
    match (k + shape.len()).checked_sub(rank) {
        Some(ka) => shape[ka],
        None => Ext::Dead,
    }
}
