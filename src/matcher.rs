use geo::Coordinate;
use log::{debug, trace};

use crate::{
    chain::Chain,
    config::{Config, MatchMode, RoundingMode},
    error::Result,
    exact::{add, area, div_round, mul, sub},
    index::EdgeIndex,
    pixels::HotPixels,
};

/// Whether segment `a-b` crosses the unit square centered at `p`.
///
/// Tests where the segment's line meets the square's bottom, top, left
/// and right sides, rounding each meeting point to the grid. A side
/// counts when that rounds back onto `p`, which makes the square
/// half-open in the same way the crossing rounding is. A segment through
/// `p` itself always counts: with [`RoundingMode::HalfAwayFromZero`]
/// the pixels on the axes own none of their corners. Pixels at either
/// end point are excluded.
pub fn crosses_pixel(
    p: Coordinate<i64>,
    a: Coordinate<i64>,
    b: Coordinate<i64>,
    mode: RoundingMode,
) -> Result<bool> {
    if p == a || p == b {
        return Ok(false);
    }
    if on_segment(p, a, b)? {
        return Ok(true);
    }

    let dx = sub(b.x, a.x)?;
    let dy = sub(b.y, a.y)?;
    let px = sub(p.x, a.x)?;
    let py = sub(p.y, a.y)?;

    if dy != 0 {
        let den = mul(2, dy)?;
        for side in [-1, 1] {
            // x where the line meets y = p.y + side / 2
            let num = add(mul(a.x, den)?, mul(dx, add(mul(2, py)?, side)?)?)?;
            let x = div_round(num, den, mode)?;
            if x == p.x {
                return Ok(true);
            }
        }
    }
    if dx != 0 {
        let den = mul(2, dx)?;
        for side in [-1, 1] {
            // y where the line meets x = p.x + side / 2
            let num = add(mul(a.y, den)?, mul(dy, add(mul(2, px)?, side)?)?)?;
            let y = div_round(num, den, mode)?;
            if y == p.y {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Whether `p` lies strictly inside segment `a-b`.
pub fn on_segment(p: Coordinate<i64>, a: Coordinate<i64>, b: Coordinate<i64>) -> Result<bool> {
    if p == a || p == b || area(a, b, p)? != 0 {
        return Ok(false);
    }
    Ok(p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y))
}

/// Queues every hot pixel on every edge that must be routed through it.
///
/// Candidates come from a point query on the index; the exact test is
/// chosen by [`Config::matching`]. Returns the number of matches.
pub fn match_pixels(
    pixels: &HotPixels,
    chain: &mut Chain,
    index: &EdgeIndex,
    config: &Config,
) -> Result<usize> {
    let mut matches = 0;
    for p in pixels.coords() {
        index.containing(p, |q| {
            let (a, b) = chain.edge(q.node);
            let hit = match config.matching {
                MatchMode::Footprint => crosses_pixel(p, a, b, config.rounding)?,
                MatchMode::OnSegment => on_segment(p, a, b)?,
            };
            if hit {
                trace!("pixel {p:?} on edge {a:?}-{b:?}");
                chain.node_mut(q.node).pending.push(p);
                matches += 1;
            }
            Ok(())
        })?;
    }
    debug!("match: {matches} pixel-edge pairs");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i64, y: i64) -> Coordinate<i64> {
        Coordinate { x, y }
    }

    const MODE: RoundingMode = RoundingMode::HalfUp;

    #[test]
    fn near_miss_is_matched() {
        // The segment passes (5, 0.5): through the squares of both
        // (5, 0) and (5, 1), exactly through neither center.
        let (a, b) = (c(0, 0), c(10, 1));
        assert!(crosses_pixel(c(5, 0), a, b, MODE).unwrap());
        assert!(crosses_pixel(c(5, 1), a, b, MODE).unwrap());
        assert!(!crosses_pixel(c(5, 2), a, b, MODE).unwrap());
        assert!(!crosses_pixel(c(2, 1), a, b, MODE).unwrap());

        assert!(!on_segment(c(5, 1), a, b).unwrap());
    }

    #[test]
    fn end_points_are_never_matched() {
        let (a, b) = (c(0, 0), c(10, 10));
        assert!(!crosses_pixel(a, a, b, MODE).unwrap());
        assert!(!crosses_pixel(b, a, b, MODE).unwrap());
        assert!(!on_segment(a, a, b).unwrap());
    }

    #[test]
    fn pixels_on_the_segment_are_matched() {
        let cases = [
            (c(5, 5), c(0, 0), c(10, 10)),
            (c(5, 5), c(10, 10), c(0, 0)),
            (c(3, 0), c(0, 0), c(10, 0)),
            (c(0, -4), c(0, 2), c(0, -9)),
            (c(2, 1), c(-2, -1), c(8, 4)),
        ];
        for &(p, a, b) in cases.iter() {
            assert!(crosses_pixel(p, a, b, MODE).unwrap(), "{:?} on {:?}-{:?}", p, a, b);
            assert!(on_segment(p, a, b).unwrap());
        }
    }

    #[test]
    fn pixels_on_the_axes_in_half_away_mode() {
        let mode = RoundingMode::HalfAwayFromZero;
        // Corner to corner through the origin's square.
        assert!(crosses_pixel(c(0, 0), c(-1, -1), c(1, 1), mode).unwrap());
        assert!(crosses_pixel(c(0, 0), c(2, -2), c(-1, 1), mode).unwrap());
        // Both edges of a crossing at (-2.5, 0) reach the pixel it
        // rounds to.
        assert!(crosses_pixel(c(-3, 0), c(-6, 0), c(1, 0), mode).unwrap());
        assert!(crosses_pixel(c(-3, 0), c(-3, -1), c(-2, 1), mode).unwrap());
        assert!(!crosses_pixel(c(-2, 1), c(-6, 0), c(1, 0), mode).unwrap());
    }

    #[test]
    fn far_pixels_are_not_matched() {
        // Bow-tie corners against the opposite diagonal.
        let (a, b) = (c(10, 0), c(0, 10));
        assert!(!crosses_pixel(c(10, 10), a, b, MODE).unwrap());
        assert!(!crosses_pixel(c(0, 0), a, b, MODE).unwrap());
        // The crossing of (10, 1)-(5, 6) with x = 5 is far from (5, 1).
        assert!(!crosses_pixel(c(5, 1), c(10, 1), c(5, 6), MODE).unwrap());
    }
}
