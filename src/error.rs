//! Traversal-time failures.
//!
//! Disagreements that are already decidable when a node is built are
//! programming errors and panic there. Everything that can only be decided
//! once deferred lengths are resolved is reported through [`Error`] by the
//! traversal entry points, before any element is touched.

/// Why a traversal refused to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Two operands disagree on an axis extent, detected after deferred
    /// lengths were resolved.
    #[error("extent mismatch on axis {axis}: {a} vs {b}")]
    ShapeMismatch { axis: usize, a: usize, b: usize },

    /// A deferred length reached traversal without being substituted.
    #[error("deferred length was never resolved")]
    UnresolvedLen,

    /// No operand can supply an extent for this axis, e.g. a pure index
    /// generator asked to drive itself.
    #[error("no operand drives axis {axis}")]
    Undriven { axis: usize },

    /// The source of an assignment has more axes than the destination.
    #[error("cannot drive a rank-{src} source from a rank-{dst} destination")]
    RankMismatch { dst: usize, src: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
