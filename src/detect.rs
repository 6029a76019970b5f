//! Pairwise edge intersection search.
//!
//! Every edge queries the [`EdgeIndex`] for edges with overlapping
//! boxes. A candidate pair is only tested once, from its earlier edge,
//! and never when the two edges are neighbours on the ring: those share
//! an end point by construction.
use geo::Coordinate;
use log::{debug, trace};

use crate::{
    chain::{Chain, NodeId},
    config::{CollinearOverlap, Config, RoundingMode},
    error::{Result, SnapError},
    exact::{add, area, div_round, mul, sub},
    index::EdgeIndex,
};

/// A rounded crossing of two ring edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    /// The grid point the crossing rounds to.
    pub coord: Coordinate<i64>,
    /// Start nodes of the crossing edges, earlier edge first.
    pub edges: (NodeId, NodeId),
}

/// Outcome of the exact segment-pair test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRelation {
    Disjoint,
    /// The segments share at least one point and are not collinear.
    Crossing,
    /// Collinear with an overlap of positive length.
    CollinearOverlap,
}

#[inline]
fn same_strict_sign(a: i64, b: i64) -> bool {
    (a > 0 && b > 0) || (a < 0 && b < 0)
}

/// Classifies the segments `a0-a1` and `b0-b1`.
///
/// Collinear pairs that only touch, or do not meet at all, are
/// [`SegmentRelation::Disjoint`].
pub fn segments_relation(
    a0: Coordinate<i64>,
    a1: Coordinate<i64>,
    b0: Coordinate<i64>,
    b1: Coordinate<i64>,
) -> Result<SegmentRelation> {
    let x0 = area(a0, b0, b1)?;
    let y0 = area(a1, b0, b1)?;
    if same_strict_sign(x0, y0) {
        return Ok(SegmentRelation::Disjoint);
    }

    let x1 = area(b0, a0, a1)?;
    let y1 = area(b1, a0, a1)?;
    if same_strict_sign(x1, y1) {
        return Ok(SegmentRelation::Disjoint);
    }

    if x0 == 0 && y0 == 0 && x1 == 0 && y1 == 0 {
        return Ok(if collinear_overlap(a0, a1, b0, b1) {
            SegmentRelation::CollinearOverlap
        } else {
            SegmentRelation::Disjoint
        });
    }

    Ok(SegmentRelation::Crossing)
}

/// Whether the segments cross at a point interior to both.
pub fn segments_cross_properly(
    a0: Coordinate<i64>,
    a1: Coordinate<i64>,
    b0: Coordinate<i64>,
    b1: Coordinate<i64>,
) -> Result<bool> {
    let x0 = area(a0, b0, b1)?;
    let y0 = area(a1, b0, b1)?;
    let x1 = area(b0, a0, a1)?;
    let y1 = area(b1, a0, a1)?;
    Ok(x0 != 0
        && y0 != 0
        && x1 != 0
        && y1 != 0
        && !same_strict_sign(x0, y0)
        && !same_strict_sign(x1, y1))
}

// Pre-condition: all four points are collinear.
fn collinear_overlap(
    a0: Coordinate<i64>,
    a1: Coordinate<i64>,
    b0: Coordinate<i64>,
    b1: Coordinate<i64>,
) -> bool {
    let axis = |c: Coordinate<i64>| if a0.x != a1.x { c.x } else { c.y };
    let (a_lo, a_hi) = (axis(a0).min(axis(a1)), axis(a0).max(axis(a1)));
    let (b_lo, b_hi) = (axis(b0).min(axis(b1)), axis(b0).max(axis(b1)));
    a_lo.max(b_lo) < a_hi.min(b_hi)
}

/// Rounds the crossing of the lines through `a-b` and `c-d` to the grid.
///
/// The absolute coordinates of the crossing are rounded, never its
/// offset from `a`, so the pixel a point falls in does not depend on
/// the edge it was computed from. Returns `None` for parallel lines, and
/// for a rounded point equal to any of the four end points: that is an
/// end point touch, not a new hot pixel.
pub fn rounded_intersection(
    a: Coordinate<i64>,
    b: Coordinate<i64>,
    c: Coordinate<i64>,
    d: Coordinate<i64>,
    mode: RoundingMode,
) -> Result<Option<Coordinate<i64>>> {
    let d1x = sub(b.x, a.x)?;
    let d1y = sub(b.y, a.y)?;
    let d2x = sub(d.x, c.x)?;
    let d2y = sub(d.y, c.y)?;

    let cross = sub(mul(d1x, d2y)?, mul(d1y, d2x)?)?;
    if cross == 0 {
        return Ok(None);
    }
    let nom = sub(mul(sub(c.x, a.x)?, d2y)?, mul(sub(c.y, a.y)?, d2x)?)?;

    // a + d1 * nom / cross, as one fraction over `cross`.
    let p = Coordinate {
        x: div_round(add(mul(a.x, cross)?, mul(d1x, nom)?)?, cross, mode)?,
        y: div_round(add(mul(a.y, cross)?, mul(d1y, nom)?)?, cross, mode)?,
    };
    if p == a || p == b || p == c || p == d {
        return Ok(None);
    }
    Ok(Some(p))
}

/// Result of [`detect`].
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub intersections: Vec<Intersection>,
    /// Number of collinear overlapping pairs seen.
    pub overlaps: usize,
}

/// Finds the rounded crossings of all non-adjacent edge pairs.
///
/// Expects the chain as loaded from the input ring: edge order is given
/// by the input sequence index.
pub fn detect(chain: &Chain, index: &EdgeIndex, config: &Config) -> Result<Detection> {
    let mut detection = Detection::default();

    for e in chain.iter() {
        let node = chain.node(e);
        let (a, b) = chain.edge(e);

        index.overlapping(&node.bbox(), |q| {
            let other = chain.node(q.node);
            // Test each pair once, and skip ring neighbours.
            if node.seq() + 1 >= other.seq() || other.next() == e {
                return Ok(());
            }
            let (c, d) = chain.edge(q.node);

            match segments_relation(a, b, c, d)? {
                SegmentRelation::Disjoint => {}
                SegmentRelation::CollinearOverlap => {
                    debug!("collinear overlap: {a:?}-{b:?} with {c:?}-{d:?}");
                    if config.collinear == CollinearOverlap::Reject {
                        return Err(SnapError::UnresolvedCollinearOverlap {
                            first: (a, b),
                            second: (c, d),
                            edges: (e, q.node),
                        });
                    }
                    detection.overlaps += 1;
                }
                SegmentRelation::Crossing => {
                    if let Some(coord) = rounded_intersection(a, b, c, d, config.rounding)? {
                        trace!("intersection {coord:?} of {a:?}-{b:?} with {c:?}-{d:?}");
                        detection.intersections.push(Intersection {
                            coord,
                            edges: (e, q.node),
                        });
                    }
                }
            }
            Ok(())
        })?;
    }

    debug!(
        "detect: {n} intersections, {m} overlaps",
        n = detection.intersections.len(),
        m = detection.overlaps
    );
    Ok(detection)
}

/// Pairs of edges of `chain` that cross at a point interior to both.
///
/// `index` must hold exactly the current edges of `chain`.
pub fn proper_crossings(chain: &Chain, index: &EdgeIndex) -> Result<Vec<(NodeId, NodeId)>> {
    let mut found = vec![];
    for e in chain.iter() {
        let (a, b) = chain.edge(e);
        index.overlapping(&chain.node(e).bbox(), |q| {
            if q.node <= e {
                return Ok(());
            }
            let (c, d) = chain.edge(q.node);
            if segments_cross_properly(a, b, c, d)? {
                found.push((e, q.node));
            }
            Ok(())
        })?;
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i64, y: i64) -> Coordinate<i64> {
        Coordinate { x, y }
    }

    #[test]
    fn relation_cases() {
        use SegmentRelation::*;
        let rel = |a, b, p, q| segments_relation(a, b, p, q).unwrap();

        assert_eq!(rel(c(0, 0), c(10, 10), c(10, 0), c(0, 10)), Crossing);
        assert_eq!(rel(c(0, 0), c(10, 10), c(10, 0), c(6, 4)), Disjoint);
        // T-junction counts as meeting.
        assert_eq!(rel(c(0, 0), c(10, 0), c(5, 0), c(5, 5)), Crossing);
        assert_eq!(rel(c(0, 0), c(10, 0), c(0, 1), c(10, 1)), Disjoint);
        assert_eq!(rel(c(0, 0), c(10, 0), c(5, 0), c(15, 0)), CollinearOverlap);
        assert_eq!(rel(c(0, 0), c(0, 10), c(0, 12), c(0, 4)), CollinearOverlap);
        assert_eq!(rel(c(0, 0), c(10, 0), c(10, 0), c(15, 0)), Disjoint);
        assert_eq!(rel(c(0, 0), c(10, 0), c(11, 0), c(15, 0)), Disjoint);
    }

    #[test]
    fn proper_crossing_excludes_touches() {
        assert!(segments_cross_properly(c(0, 0), c(10, 10), c(10, 0), c(0, 10)).unwrap());
        assert!(!segments_cross_properly(c(0, 0), c(10, 0), c(5, 0), c(5, 5)).unwrap());
        assert!(!segments_cross_properly(c(0, 0), c(10, 0), c(5, 0), c(15, 0)).unwrap());
    }

    #[test]
    fn rounding_of_crossings() {
        let mode = RoundingMode::HalfUp;
        let p = rounded_intersection(c(0, 0), c(10, 10), c(10, 0), c(0, 10), mode).unwrap();
        assert_eq!(p, Some(c(5, 5)));

        // Exact crossing at (5, 0.5) rounds up.
        let p = rounded_intersection(c(0, 0), c(10, 1), c(5, 6), c(5, -4), mode).unwrap();
        assert_eq!(p, Some(c(5, 1)));

        // Exact crossing at (1, 1/3) rounds onto the end point (1, 0).
        let p = rounded_intersection(c(0, 0), c(3, 1), c(1, 0), c(1, 10), mode).unwrap();
        assert_eq!(p, None);

        let p = rounded_intersection(c(0, 0), c(10, 0), c(0, 1), c(10, 1), mode).unwrap();
        assert_eq!(p, None);
    }

    #[test]
    fn rounding_is_symmetric_in_the_pair() {
        let mode = RoundingMode::HalfUp;
        let (a, b, p, q) = (c(-7, 3), c(13, -4), c(2, -9), c(-1, 11));
        assert_eq!(
            rounded_intersection(a, b, p, q, mode).unwrap(),
            rounded_intersection(p, q, a, b, mode).unwrap(),
        );
    }

    #[test]
    fn rounding_ignores_the_start_point() {
        // Both pairs cross at (-2.5, 0), which is 3.5 to the right of
        // (-6, 0) and 0.5 to the right of (-3, -1).
        let (a, b, p, q) = (c(-6, 0), c(1, 0), c(-3, -1), c(-2, 1));
        for &(mode, want) in [
            (RoundingMode::HalfUp, c(-2, 0)),
            (RoundingMode::HalfAwayFromZero, c(-3, 0)),
        ]
        .iter()
        {
            assert_eq!(rounded_intersection(a, b, p, q, mode).unwrap(), Some(want));
            assert_eq!(rounded_intersection(p, q, a, b, mode).unwrap(), Some(want));
            assert_eq!(rounded_intersection(b, a, q, p, mode).unwrap(), Some(want));
        }
    }

    #[test]
    fn huge_coordinates_overflow() {
        let s = 10_000_000;
        let res = rounded_intersection(c(0, 0), c(s, s), c(s, 0), c(0, s), RoundingMode::HalfUp);
        assert!(matches!(res, Err(SnapError::CoordinateOverflow { .. })));
    }
}
