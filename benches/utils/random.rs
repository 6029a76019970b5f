use std::f64::consts::PI;

use geo::Coordinate;

use rand::Rng;
use rand_distr::{Distribution, Normal, Standard, Uniform};

// Drops consecutive repeats, including the wrap from last to first.
fn clean(mut ring: Vec<Coordinate<i64>>) -> Vec<Coordinate<i64>> {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn distinct(ring: &[Coordinate<i64>]) -> usize {
    let mut pts: Vec<_> = ring.iter().map(|c| (c.x, c.y)).collect();
    pts.sort_unstable();
    pts.dedup();
    pts.len()
}

/// A ring of at most `n` uniform grid points in `[0, size)^2`.
///
/// Heavily self-intersecting. Has no repeated consecutive vertex and at
/// least three distinct vertices; `n` must be at least 3 and `size` at
/// least 2.
#[inline]
pub fn random_ring<R: Rng>(rng: &mut R, n: usize, size: i64) -> Vec<Coordinate<i64>> {
    let dist = Uniform::new(0, size);
    loop {
        let ring = clean(
            (0..n)
                .map(|_| Coordinate {
                    x: dist.sample(rng),
                    y: dist.sample(rng),
                })
                .collect(),
        );
        if distinct(&ring) >= 3 {
            return ring;
        }
    }
}

/// A star shaped ring around the origin with `n` spikes.
///
/// Radii are normal around `radius`, so the rounded ring has many near
/// misses between neighbouring spikes but few true crossings.
#[inline]
#[allow(dead_code)]
pub fn star_ring<R: Rng>(rng: &mut R, n: usize, radius: f64) -> Vec<Coordinate<i64>> {
    let radii = Normal::new(radius, radius / 4.).unwrap();
    loop {
        let mut angles: Vec<f64> = (0..n)
            .map(|_| rng.sample::<f64, _>(Standard) * 2. * PI)
            .collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        let ring = clean(
            angles
                .into_iter()
                .map(|theta| {
                    let r = radii.sample(rng).abs();
                    Coordinate {
                        x: (r * theta.cos()).round() as i64,
                        y: (r * theta.sin()).round() as i64,
                    }
                })
                .collect(),
        );
        if distinct(&ring) >= 3 {
            return ring;
        }
    }
}
