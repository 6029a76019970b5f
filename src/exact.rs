//! Exact integer arithmetic on grid coordinates.
//!
//! All predicates and roundings of the snap-rounding engine are
//! evaluated on `i64` with checked operations. An overflow surfaces as
//! [`SnapError::CoordinateOverflow`] instead of wrapping, so a result
//! is either bit-identical on every platform or an error.
use geo::Coordinate;

use crate::{
    config::RoundingMode,
    error::{Result, SnapError},
};

#[inline]
pub(crate) fn mul(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_mul(rhs)
        .ok_or(SnapError::CoordinateOverflow { op: "*", lhs, rhs })
}

#[inline]
pub(crate) fn add(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_add(rhs)
        .ok_or(SnapError::CoordinateOverflow { op: "+", lhs, rhs })
}

#[inline]
pub(crate) fn sub(lhs: i64, rhs: i64) -> Result<i64> {
    lhs.checked_sub(rhs)
        .ok_or(SnapError::CoordinateOverflow { op: "-", lhs, rhs })
}

/// Floor of `n / d` for `d != 0`.
pub fn div_floor(n: i64, d: i64) -> Result<i64> {
    debug_assert_ne!(d, 0);
    // `i64::MIN / -1` is the only overflowing quotient.
    let q = n
        .checked_div(d)
        .ok_or(SnapError::CoordinateOverflow { op: "/", lhs: n, rhs: d })?;
    let r = n % d;
    if r != 0 && ((r < 0) != (d < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Rounds `n / d` to the nearest integer, resolving halves per `mode`.
///
/// [`RoundingMode::HalfUp`] computes `floor((2n + d) / (2d))`, which
/// sends halves toward positive infinity and commutes with integer
/// translation. [`RoundingMode::HalfAwayFromZero`] rounds the magnitude
/// and restores the sign.
pub fn div_round(n: i64, d: i64, mode: RoundingMode) -> Result<i64> {
    debug_assert_ne!(d, 0);
    match mode {
        RoundingMode::HalfUp => div_floor(add(mul(2, n)?, d)?, mul(2, d)?),
        RoundingMode::HalfAwayFromZero => {
            let negative = (n < 0) != (d < 0);
            let n = abs(n)?;
            let d = abs(d)?;
            let q = div_floor(add(mul(2, n)?, d)?, mul(2, d)?)?;
            Ok(if negative { -q } else { q })
        }
    }
}

fn abs(v: i64) -> Result<i64> {
    v.checked_abs()
        .ok_or(SnapError::CoordinateOverflow { op: "abs", lhs: v, rhs: 0 })
}

/// Twice the signed area of the triangle `(p, q, r)`.
///
/// Positive when `p -> q -> r` turns clockwise in a y-up frame; the
/// engine only ever compares signs.
pub fn area(p: Coordinate<i64>, q: Coordinate<i64>, r: Coordinate<i64>) -> Result<i64> {
    let lhs = mul(sub(q.y, p.y)?, sub(r.x, q.x)?)?;
    let rhs = mul(sub(q.x, p.x)?, sub(r.y, q.y)?)?;
    sub(lhs, rhs)
}

/// `|dx| + |dy|` between two grid points.
pub fn manhattan(a: Coordinate<i64>, b: Coordinate<i64>) -> Result<i64> {
    add(abs(sub(a.x, b.x)?)?, abs(sub(a.y, b.y)?)?)
}
