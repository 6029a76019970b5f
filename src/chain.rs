use geo::{Coordinate, LineString};
use itertools::Itertools;
use log::trace;
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    error::{Result, SnapError},
    topology::HalfEdgeId,
};

/// Stable key of a [`Node`] in its [`Chain`].
pub type NodeId = usize;

pub(crate) type Pending = SmallVec<[Coordinate<i64>; 4]>;

/// Axis-aligned bounding box on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BBox {
    /// The box spanned by two points.
    pub fn of(a: Coordinate<i64>, b: Coordinate<i64>) -> Self {
        BBox {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Closed-box overlap; touching boxes overlap.
    #[inline]
    pub fn overlaps(&self, other: &BBox) -> bool {
        other.min_x <= self.max_x
            && other.min_y <= self.max_y
            && other.max_x >= self.min_x
            && other.max_y >= self.min_y
    }

    #[inline]
    pub fn contains(&self, p: Coordinate<i64>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// A vertex of the ring, and the origin of the directed edge to its
/// successor.
#[derive(Debug, Clone)]
pub struct Node {
    coord: Coordinate<i64>,
    seq: usize,
    prev: NodeId,
    next: NodeId,
    bbox: BBox,
    pub(crate) pending: Pending,
    pub(crate) incoming: Option<HalfEdgeId>,
    pub(crate) outgoing: Option<HalfEdgeId>,
}

impl Node {
    #[inline]
    pub fn coord(&self) -> Coordinate<i64> {
        self.coord
    }

    /// Index of the input edge this node descends from.
    #[inline]
    pub fn seq(&self) -> usize {
        self.seq
    }

    #[inline]
    pub fn prev(&self) -> NodeId {
        self.prev
    }

    #[inline]
    pub fn next(&self) -> NodeId {
        self.next
    }

    /// Bounding box of the edge `(self, self.next)`.
    #[inline]
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Hot pixels waiting to be spliced into this edge.
    pub fn pending(&self) -> &[Coordinate<i64>] {
        &self.pending
    }

    /// Half-edge pointing back at the predecessor, once linked.
    pub fn incoming(&self) -> Option<HalfEdgeId> {
        self.incoming
    }

    /// Half-edge pointing at the successor, once linked.
    pub fn outgoing(&self) -> Option<HalfEdgeId> {
        self.outgoing
    }
}

/// Circular doubly linked ring of [`Node`]s kept in an arena.
///
/// Nodes are never removed: subdivision only splices new nodes in, so
/// every [`NodeId`] handed out stays valid for the life of the chain.
#[derive(Debug, Clone)]
pub struct Chain {
    nodes: Slab<Node>,
    head: NodeId,
}

impl Chain {
    /// Links an open ring (no repeated closing point) into a chain.
    pub fn from_ring(ring: &[Coordinate<i64>]) -> Result<Self> {
        check_ring(ring)?;

        let mut nodes = Slab::with_capacity(ring.len());
        let entry = nodes.vacant_entry();
        let head = entry.key();
        entry.insert(Node::new(ring[0], 0, head));

        let mut chain = Chain { nodes, head };
        let mut last = head;
        for (i, &coord) in ring.iter().enumerate().skip(1) {
            last = chain.insert_after(last, coord, i);
        }
        let ids: Vec<_> = chain.nodes.iter().map(|(id, _)| id).collect();
        for id in ids {
            chain.update_bbox(id);
        }
        Ok(chain)
    }

    #[inline]
    pub fn head(&self) -> NodeId {
        self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// End points of the edge starting at `id`.
    #[inline]
    pub fn edge(&self, id: NodeId) -> (Coordinate<i64>, Coordinate<i64>) {
        let node = &self.nodes[id];
        (node.coord, self.nodes[node.next].coord)
    }

    /// Whether the edges starting at `a` and `b` share a ring vertex.
    #[inline]
    pub fn adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a].next == b || self.nodes[b].next == a
    }

    /// Splices a new node between `prev` and its successor.
    ///
    /// The caller refreshes the boxes of `prev` and the new node.
    pub(crate) fn insert_after(&mut self, prev: NodeId, coord: Coordinate<i64>, seq: usize) -> NodeId {
        let next = self.nodes[prev].next;
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        let mut node = Node::new(coord, seq, id);
        node.prev = prev;
        node.next = next;
        entry.insert(node);

        self.nodes[next].prev = id;
        self.nodes[prev].next = id;
        trace!("splice {id} ({coord:?}) between {prev} and {next}");
        id
    }

    /// Recomputes the box of the edge starting at `id`.
    pub(crate) fn update_bbox(&mut self, id: NodeId) -> BBox {
        let (a, b) = self.edge(id);
        let bbox = BBox::of(a, b);
        self.nodes[id].bbox = bbox;
        bbox
    }

    /// Walks the ring once, starting at the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            curr: Some(self.head),
        }
    }

    pub fn coords(&self) -> Vec<Coordinate<i64>> {
        self.iter().map(|id| self.nodes[id].coord).collect()
    }

    /// The ring as a closed [`LineString`].
    pub fn to_line_string(&self) -> LineString<i64> {
        let mut coords = self.coords();
        coords.push(self.nodes[self.head].coord);
        LineString(coords)
    }
}

pub struct Iter<'a> {
    chain: &'a Chain,
    curr: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.curr?;
        let next = self.chain.nodes[id].next;
        self.curr = if next == self.chain.head { None } else { Some(next) };
        Some(id)
    }
}

impl Node {
    fn new(coord: Coordinate<i64>, seq: usize, id: NodeId) -> Self {
        Node {
            coord,
            seq,
            prev: id,
            next: id,
            bbox: BBox::of(coord, coord),
            pending: Pending::new(),
            incoming: None,
            outgoing: None,
        }
    }
}

fn check_ring(ring: &[Coordinate<i64>]) -> Result<()> {
    if ring.is_empty() {
        return Err(SnapError::DegenerateInput("empty ring".into()));
    }
    if ring.len() > 1 {
        let repeated = ring
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .find(|&(a, b)| a == b);
        if let Some((a, _)) = repeated {
            return Err(SnapError::DegenerateInput(format!(
                "zero-length edge at {:?}",
                a
            )));
        }
    }
    let distinct = ring.iter().map(|c| (c.x, c.y)).sorted().dedup().count();
    if distinct < 3 {
        return Err(SnapError::DegenerateInput(format!(
            "ring has {} distinct vertices, need at least 3",
            distinct
        )));
    }
    Ok(())
}
