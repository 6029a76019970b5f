//! Cyclic order of the edges around each hot pixel.
//!
//! After subdivision every ring vertex sits on a hot pixel. Each visit
//! of the ring through a pixel contributes two half-edges there: one
//! pointing back at the predecessor and one pointing on to the
//! successor. The half-edges of a pixel form a circular doubly linked
//! list, sorted counter-clockwise by [`pseudo_angle`].
mod sort;

use geo::Coordinate;
use log::{debug, warn};
use slab::Slab;

use crate::{
    chain::{Chain, NodeId},
    error::Result,
    exact::sub,
    pixels::{HotPixel, HotPixels, PixelId},
};

/// Stable key of a [`HalfEdge`] in its [`Topology`].
pub type HalfEdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Points from the node back at its predecessor.
    Incoming,
    /// Points from the node on to its successor.
    Outgoing,
}

/// A direction leaving a hot pixel along one ring edge.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pixel: PixelId,
    node: NodeId,
    direction: Direction,
    target: Coordinate<i64>,
    angle: f64,
    twin: HalfEdgeId,
    prev: HalfEdgeId,
    next: HalfEdgeId,
}

impl HalfEdge {
    /// The pixel this half-edge leaves from.
    pub fn pixel(&self) -> PixelId {
        self.pixel
    }

    /// The ring node at the pixel this half-edge was created for.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The neighbouring vertex this half-edge points at.
    pub fn target(&self) -> Coordinate<i64> {
        self.target
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The half-edge of the same ring edge at its other end.
    pub fn twin(&self) -> HalfEdgeId {
        self.twin
    }
}

/// A monotone stand-in for `atan2(dy, dx)`, in `[0, 4)`.
///
/// Increases counter-clockwise from the positive x-axis: `0` along
/// `+x`, `1` along `+y`, `2` along `-x`, `3` along `-y`.
pub fn pseudo_angle(dx: i64, dy: i64) -> f64 {
    let norm = (dx.unsigned_abs() as f64) + (dy.unsigned_abs() as f64);
    if norm == 0. {
        return 0.;
    }
    let p = dx as f64 / norm;
    if dy >= 0 {
        1. - p
    } else {
        3. + p
    }
}

/// Half-edges of a linked ring; see the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct Topology {
    half_edges: Slab<HalfEdge>,
}

impl Topology {
    /// Builds and sorts the half-edge cycle of every pixel.
    ///
    /// Records the cycles on `pixels` and the half-edges of each node
    /// on `chain`. Fails if a half-edge direction overflows `i64`.
    pub fn link(chain: &mut Chain, pixels: &mut HotPixels) -> Result<Self> {
        let mut topology = Topology {
            half_edges: Slab::with_capacity(2 * chain.len()),
        };

        let nodes: Vec<NodeId> = chain.iter().collect();
        for &id in nodes.iter() {
            let node = chain.node(id);
            let coord = node.coord();
            let pixel = match pixels.position(coord) {
                Some(pixel) => pixel,
                None => {
                    warn!("link: vertex {coord:?} is not a hot pixel");
                    continue;
                }
            };
            let before = chain.node(node.prev()).coord();
            let after = chain.node(node.next()).coord();

            let incoming =
                topology.attach(pixels.get_mut(pixel), pixel, id, Direction::Incoming, coord, before)?;
            let outgoing =
                topology.attach(pixels.get_mut(pixel), pixel, id, Direction::Outgoing, coord, after)?;
            let node = chain.node_mut(id);
            node.incoming = Some(incoming);
            node.outgoing = Some(outgoing);
        }

        for &id in nodes.iter() {
            let node = chain.node(id);
            if let (Some(out), Some(back)) = (node.outgoing, chain.node(node.next()).incoming) {
                topology.half_edges[out].twin = back;
                topology.half_edges[back].twin = out;
            }
        }

        let mut linked = 0;
        for pixel in 0..pixels.len() {
            let slot = &mut pixels.get_mut(pixel).links;
            if let Some(head) = *slot {
                *slot = Some(sort::sort_cycle(&mut topology.half_edges, head));
                linked += 1;
            }
        }
        debug!(
            "link: {n} half-edges around {linked} pixels",
            n = topology.half_edges.len()
        );
        Ok(topology)
    }

    // Appends a half-edge at the tail of the pixel's cycle.
    fn attach(
        &mut self,
        pixel: &mut HotPixel,
        pixel_id: PixelId,
        node: NodeId,
        direction: Direction,
        from: Coordinate<i64>,
        target: Coordinate<i64>,
    ) -> Result<HalfEdgeId> {
        let angle = pseudo_angle(sub(target.x, from.x)?, sub(target.y, from.y)?);
        let id = self.half_edges.vacant_key();
        let (prev, next) = match pixel.links {
            Some(head) => (self.half_edges[head].prev, head),
            None => (id, id),
        };
        let key = self.half_edges.insert(HalfEdge {
            pixel: pixel_id,
            node,
            direction,
            target,
            angle,
            twin: id,
            prev,
            next,
        });
        debug_assert_eq!(key, id);
        if let Some(head) = pixel.links {
            self.half_edges[prev].next = id;
            self.half_edges[head].prev = id;
        } else {
            pixel.links = Some(id);
        }
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.half_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }

    pub fn get(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id]
    }

    /// The half-edge following `id` counter-clockwise around its pixel.
    pub fn next_around(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[id].next
    }

    /// The half-edge preceding `id` counter-clockwise around its pixel.
    pub fn prev_around(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[id].prev
    }

    /// Half-edges of `pixel` in counter-clockwise order.
    pub fn around<'a>(&'a self, pixel: &HotPixel) -> Around<'a> {
        Around {
            topology: self,
            head: pixel.links,
            curr: pixel.links,
        }
    }

    /// Number of half-edges at `pixel`.
    pub fn degree(&self, pixel: &HotPixel) -> usize {
        self.around(pixel).count()
    }
}

pub struct Around<'a> {
    topology: &'a Topology,
    head: Option<HalfEdgeId>,
    curr: Option<HalfEdgeId>,
}

impl<'a> Iterator for Around<'a> {
    type Item = (HalfEdgeId, &'a HalfEdge);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.curr?;
        let topology = self.topology;
        let half_edge = &topology.half_edges[id];
        self.curr = Some(half_edge.next).filter(|&next| Some(next) != self.head);
        Some((id, half_edge))
    }
}
