use std::cmp::Ordering;

use geo::Coordinate;
use itertools::Itertools;
use log::debug;

use crate::topology::HalfEdgeId;

/// Index of a [`HotPixel`] in its [`HotPixels`] set.
pub type PixelId = usize;

/// Lexicographic `(x, y)` ordering of grid points.
#[inline]
pub fn cmp_grid(a: &Coordinate<i64>, b: &Coordinate<i64>) -> Ordering {
    a.x.cmp(&b.x).then_with(|| a.y.cmp(&b.y))
}

/// A grid cell that every edge passing through it is snapped to.
#[derive(Debug, Clone, PartialEq)]
pub struct HotPixel {
    coord: Coordinate<i64>,
    pub(crate) links: Option<HalfEdgeId>,
}

impl HotPixel {
    #[inline]
    pub fn coord(&self) -> Coordinate<i64> {
        self.coord
    }

    /// Some half-edge of this pixel's cycle, once topology is linked.
    #[inline]
    pub fn links(&self) -> Option<HalfEdgeId> {
        self.links
    }
}

/// Hot pixels, unique by coordinate and sorted by [`cmp_grid`].
#[derive(Debug, Clone, Default)]
pub struct HotPixels {
    pixels: Vec<HotPixel>,
}

impl HotPixels {
    /// Sorts `coords` and collapses duplicates.
    pub fn from_coords(mut coords: Vec<Coordinate<i64>>) -> Self {
        let total = coords.len();
        coords.sort_unstable_by(cmp_grid);
        let pixels: Vec<_> = coords
            .into_iter()
            .dedup()
            .map(|coord| HotPixel { coord, links: None })
            .collect();
        debug!("hot pixels: {n} unique of {total}", n = pixels.len());
        HotPixels { pixels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn get(&self, id: PixelId) -> &HotPixel {
        &self.pixels[id]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: PixelId) -> &mut HotPixel {
        &mut self.pixels[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &HotPixel> + '_ {
        self.pixels.iter()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coordinate<i64>> + '_ {
        self.pixels.iter().map(|p| p.coord)
    }

    /// Binary search for the pixel at `coord`.
    pub fn position(&self, coord: Coordinate<i64>) -> Option<PixelId> {
        self.pixels
            .binary_search_by(|p| cmp_grid(&p.coord, &coord))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_and_unique() {
        let coords: Vec<Coordinate<i64>> = vec![
            [5, 5].into(),
            [0, 10].into(),
            [0, 0].into(),
            [5, 5].into(),
            [10, 0].into(),
            [0, 10].into(),
            [5, -1].into(),
        ];
        let pixels = HotPixels::from_coords(coords);
        let got: Vec<_> = pixels.coords().collect();
        let want: Vec<Coordinate<i64>> = vec![
            [0, 0].into(),
            [0, 10].into(),
            [5, -1].into(),
            [5, 5].into(),
            [10, 0].into(),
        ];
        assert_eq!(got, want);
        for win in got.windows(2) {
            assert_eq!(cmp_grid(&win[0], &win[1]), Ordering::Less);
        }
    }

    #[test]
    fn lookup() {
        let pixels = HotPixels::from_coords(vec![[3, 1].into(), [1, 3].into(), [2, 2].into()]);
        assert_eq!(pixels.position([1, 3].into()), Some(0));
        assert_eq!(pixels.position([3, 1].into()), Some(2));
        assert_eq!(pixels.position([3, 3].into()), None);
        assert!(pixels.iter().all(|p| p.links().is_none()));
    }
}
