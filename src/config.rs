/// How `n / d` is rounded to the grid when a quotient lies exactly
/// halfway between two integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// `floor((2n + d) / (2d))`: halves go toward positive infinity.
    ///
    /// The default. Every pixel is then the same half-open unit square
    /// `[x - 1/2, x + 1/2) x [y - 1/2, y + 1/2)`, wherever it lies, so
    /// rounding commutes with integer translation.
    HalfUp,
    /// Halves go away from zero.
    ///
    /// Pixels left of or below the origin own their opposite sides, and
    /// the pixels on the axes own none of their corners.
    HalfAwayFromZero,
}

/// Which edges a hot pixel is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Every edge crossing the pixel's unit square.
    Footprint,
    /// Only edges passing exactly through the pixel center.
    OnSegment,
}

/// Treatment of two non-adjacent edges that are collinear and overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollinearOverlap {
    /// Route each edge through the other's interior endpoints.
    Resolve,
    /// Fail with [`SnapError::UnresolvedCollinearOverlap`](crate::SnapError::UnresolvedCollinearOverlap).
    Reject,
}

/// Strategy selection for a [`SnapRounder`](crate::SnapRounder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub rounding: RoundingMode,
    pub matching: MatchMode,
    pub collinear: CollinearOverlap,
    pub link_topology: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rounding: RoundingMode::HalfUp,
            matching: MatchMode::Footprint,
            collinear: CollinearOverlap::Resolve,
            link_topology: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    #[must_use]
    pub fn matching(mut self, matching: MatchMode) -> Self {
        self.matching = matching;
        self
    }

    #[must_use]
    pub fn collinear(mut self, collinear: CollinearOverlap) -> Self {
        self.collinear = collinear;
        self
    }

    /// Also build the per-pixel half-edge cycles after subdivision.
    #[must_use]
    pub fn link_topology(mut self, link: bool) -> Self {
        self.link_topology = link;
        self
    }
}
