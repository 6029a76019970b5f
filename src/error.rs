use geo::Coordinate;
use thiserror::Error;

use crate::chain::NodeId;

/// Errors raised while snap-rounding a ring.
///
/// Every failure is deterministic: re-running with the same input
/// yields the same error, so none of these are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapError {
    /// An intermediate of the exact integer arithmetic does not fit in
    /// an `i64`.
    #[error("coordinates too big: {lhs} {op} {rhs} overflows i64")]
    CoordinateOverflow {
        op: &'static str,
        lhs: i64,
        rhs: i64,
    },

    /// The input ring is rejected before any geometric work.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Two non-adjacent edges are collinear and overlap; only raised
    /// under [`CollinearOverlap::Reject`](crate::CollinearOverlap::Reject).
    #[error("collinear overlap between edges at {first:?} and {second:?}")]
    UnresolvedCollinearOverlap {
        first: (Coordinate<i64>, Coordinate<i64>),
        second: (Coordinate<i64>, Coordinate<i64>),
        edges: (NodeId, NodeId),
    },
}

pub type Result<T> = std::result::Result<T, SnapError>;
