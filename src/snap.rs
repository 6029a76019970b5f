use std::time::{Duration, Instant};

use geo::{Coordinate, LineString};
use log::debug;

use crate::{
    chain::{Chain, NodeId},
    config::Config,
    detect::{detect, proper_crossings, Intersection},
    error::Result,
    index::EdgeIndex,
    matcher::match_pixels,
    pixels::HotPixels,
    subdivide::subdivide,
    topology::Topology,
};

/// Stages of a [`SnapRounder`] run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Linking the chain and bulk loading the index.
    Load,
    /// Searching rounded edge crossings.
    Detect,
    /// Sorting and deduplicating hot pixels.
    Dedup,
    /// Routing hot pixels onto edges.
    Match,
    /// Splicing routed pixels into the chain.
    Subdivide,
    /// Building per-pixel half-edge cycles.
    Link,
}

/// Handed to the observer after each [`Phase`].
#[derive(Debug, Clone, Copy)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Phase specific count: edges loaded, intersections found, unique
    /// hot pixels, pixel-edge matches, nodes inserted, half-edges built.
    pub items: usize,
    pub elapsed: Duration,
}

type Observer<'a> = Box<dyn FnMut(&PhaseReport) + 'a>;

/// Snap rounds closed integer rings.
///
/// ```rust
/// use geo::Coordinate;
/// use geo_snap_round::{Config, SnapRounder};
///
/// let bowtie: Vec<Coordinate<i64>> =
///     vec![[0, 0].into(), [10, 10].into(), [10, 0].into(), [0, 10].into()];
/// let mut phases = vec![];
/// let out = SnapRounder::new(Config::default())
///     .with_observer(|report| phases.push(report.phase))
///     .run(&bowtie)
///     .unwrap();
/// assert_eq!(out.coords().len(), 6);
/// assert_eq!(phases.len(), 5);
/// ```
pub struct SnapRounder<'a> {
    config: Config,
    observer: Option<Observer<'a>>,
}

impl Default for SnapRounder<'_> {
    fn default() -> Self {
        SnapRounder::new(Config::default())
    }
}

impl<'a> SnapRounder<'a> {
    pub fn new(config: Config) -> Self {
        SnapRounder {
            config,
            observer: None,
        }
    }

    /// Calls `observer` with a [`PhaseReport`] after every phase.
    #[must_use]
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&PhaseReport) + 'a,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn report(&mut self, phase: Phase, items: usize, start: Instant) {
        let report = PhaseReport {
            phase,
            items,
            elapsed: start.elapsed(),
        };
        debug!("{phase:?}: {items} in {elapsed:?}", elapsed = report.elapsed);
        if let Some(observer) = self.observer.as_mut() {
            observer(&report);
        }
    }

    /// Snap rounds the open ring `ring`.
    ///
    /// The ring closes implicitly from its last point back to the
    /// first, so the two must differ.
    pub fn run(&mut self, ring: &[Coordinate<i64>]) -> Result<SnapRounding> {
        let start = Instant::now();
        let mut chain = Chain::from_ring(ring)?;
        let edges: Vec<NodeId> = chain.iter().collect();
        let mut index = EdgeIndex::load(&chain);
        self.report(Phase::Load, edges.len(), start);

        let start = Instant::now();
        let detection = detect(&chain, &index, &self.config)?;
        self.report(Phase::Detect, detection.intersections.len(), start);

        let start = Instant::now();
        let coords = ring
            .iter()
            .copied()
            .chain(detection.intersections.iter().map(|ixn| ixn.coord))
            .collect();
        let mut pixels = HotPixels::from_coords(coords);
        self.report(Phase::Dedup, pixels.len(), start);

        let start = Instant::now();
        let matches = match_pixels(&pixels, &mut chain, &index, &self.config)?;
        self.report(Phase::Match, matches, start);

        let start = Instant::now();
        let inserted = subdivide(&mut chain, &mut index, &edges)?;
        self.report(Phase::Subdivide, inserted, start);

        let topology = if self.config.link_topology {
            let start = Instant::now();
            let topology = Topology::link(&mut chain, &mut pixels)?;
            self.report(Phase::Link, topology.len(), start);
            Some(topology)
        } else {
            None
        };

        debug!(
            "snap: {n} vertices in, {m} out",
            n = ring.len(),
            m = chain.len()
        );
        Ok(SnapRounding {
            chain,
            index,
            pixels,
            intersections: detection.intersections,
            overlaps: detection.overlaps,
            topology,
        })
    }
}

/// Output of [`SnapRounder::run`].
pub struct SnapRounding {
    chain: Chain,
    index: EdgeIndex,
    pixels: HotPixels,
    intersections: Vec<Intersection>,
    overlaps: usize,
    topology: Option<Topology>,
}

impl SnapRounding {
    /// The rounded ring, starting at the first input vertex.
    pub fn coords(&self) -> Vec<Coordinate<i64>> {
        self.chain.coords()
    }

    /// The rounded ring, closed.
    pub fn ring(&self) -> LineString<i64> {
        self.chain.to_line_string()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Index over the final edges.
    pub fn index(&self) -> &EdgeIndex {
        &self.index
    }

    pub fn hot_pixels(&self) -> &HotPixels {
        &self.pixels
    }

    /// Accepted rounded crossings of input edges, before deduplication.
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Number of collinear overlapping input edge pairs.
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }

    /// Half-edge cycles, when [`Config::link_topology`] was set.
    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    /// Pairs of output edges that cross at a point interior to both.
    ///
    /// Empty for a correctly snap-rounded ring.
    pub fn crossings(&self) -> Result<Vec<(NodeId, NodeId)>> {
        proper_crossings(&self.chain, &self.index)
    }
}

/// Snap rounds an open ring with the default [`Config`].
pub fn snap_round(ring: &[Coordinate<i64>]) -> Result<Vec<Coordinate<i64>>> {
    Ok(SnapRounder::default().run(ring)?.coords())
}

/// Snap rounds a [`LineString`] ring with the default [`Config`].
///
/// A closing coordinate equal to the first is dropped before rounding;
/// the returned ring is closed.
pub fn snap_round_ring(ring: &LineString<i64>) -> Result<LineString<i64>> {
    let coords = match ring.0.split_last() {
        Some((last, rest)) if ring.0.len() > 1 && Some(last) == ring.0.first() => rest,
        _ => &ring.0[..],
    };
    Ok(SnapRounder::default().run(coords)?.ring())
}
