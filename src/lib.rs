//! Snap rounding of polygon rings on the integer grid.
//!
//! 1. [Usage](#usage)
//! 1. [Algorithm](#algorithm)
//! 1. [Topology](#topology)
//!
//! Snap rounding turns a ring whose edges may cross each other anywhere
//! into one whose vertices all lie on integer grid points ("hot
//! pixels"), and whose edges only meet at those vertices. Every input
//! vertex survives, in order; extra vertices are spliced in where the
//! ring passes close to a hot pixel.
//!
//! # Usage
//!
//! The simplest entry point is [`snap_round`], which takes an open ring
//! (the closing edge from the last point back to the first is
//! implicit) and returns the rounded ring, starting at the same vertex.
//!
//! ```rust
//! use geo::Coordinate;
//! use geo_snap_round::snap_round;
//!
//! let bowtie: Vec<Coordinate<i64>> =
//!     vec![[0, 0].into(), [10, 10].into(), [10, 0].into(), [0, 10].into()];
//! let out = snap_round(&bowtie).unwrap();
//! let want: Vec<Coordinate<i64>> = vec![
//!     [0, 0].into(),
//!     [5, 5].into(),
//!     [10, 10].into(),
//!     [10, 0].into(),
//!     [5, 5].into(),
//!     [0, 10].into(),
//! ];
//! assert_eq!(out, want);
//! ```
//!
//! [`snap_round_ring`] does the same for closed [`LineString`]s. For
//! rounding options, per-phase timings, or access to the hot pixels and
//! the crossings found, configure a [`SnapRounder`] with a [`Config`].
//!
//! # Algorithm
//!
//! The ring is loaded into a circular [`Chain`] and its edges into an
//! R-tree ([`EdgeIndex`]). Every pair of non-adjacent edges with
//! overlapping boxes is tested for a proper crossing; the crossing is
//! rounded to the grid in exact integer arithmetic and, unless it lands
//! on one of the pair's end points, becomes a hot pixel along with every
//! input vertex. Each hot pixel is then matched against the edges whose
//! box contains it, and an edge passing through the pixel's unit square
//! is routed through the pixel center. The routed pixels of each edge
//! are spliced into the chain, nearest first.
//!
//! All arithmetic is on `i64` and checked: inputs large enough to
//! overflow an intermediate product fail with
//! [`SnapError::CoordinateOverflow`] rather than producing a wrong ring.
//!
//! # Topology
//!
//! With [`Config::link_topology`] set, the rounder also builds a
//! [`Topology`]: at every hot pixel, the edges of the output ring that
//! meet there, sorted counter-clockwise. See the [`topology`] module.
//!
//! [`LineString`]: geo::LineString
mod error;
pub use error::{Result, SnapError};

pub mod exact;

mod config;
pub use config::{CollinearOverlap, Config, MatchMode, RoundingMode};

mod chain;
pub use chain::{BBox, Chain, Node, NodeId};

mod index;
pub use index::{EdgeIndex, EdgeRecord};

pub mod detect;
pub use detect::{Detection, Intersection, SegmentRelation};

mod pixels;
pub use pixels::{HotPixel, HotPixels, PixelId};

pub mod matcher;

mod subdivide;

pub mod topology;
pub use topology::{pseudo_angle, Direction, HalfEdge, HalfEdgeId, Topology};

mod snap;
pub use snap::{snap_round, snap_round_ring, Phase, PhaseReport, SnapRounder, SnapRounding};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
