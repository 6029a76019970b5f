use geo::Coordinate;
use log::trace;
use rstar::{Envelope, ParentNode, RTree, RTreeNode, RTreeObject, AABB};
use smallvec::SmallVec;

use crate::{
    chain::{BBox, Chain, NodeId},
    error::Result,
};

/// Leaf record of the [`EdgeIndex`]: an edge handle and its box.
///
/// The index only ever stores handles into the [`Chain`] arena, so
/// splicing the chain never invalidates a leaf; the subdivider swaps
/// records explicitly instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub node: NodeId,
    pub bbox: BBox,
}

impl RTreeObject for EdgeRecord {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(&self.bbox)
    }
}

fn envelope(bbox: &BBox) -> AABB<[i64; 2]> {
    AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y])
}

const STACK_SIZE: usize = 32;

/// Bounding-box tree over the edges of a [`Chain`].
pub struct EdgeIndex {
    tree: RTree<EdgeRecord>,
}

impl EdgeIndex {
    /// Bulk loads one record per edge of `chain`.
    pub fn load(chain: &Chain) -> Self {
        let records = chain
            .iter()
            .map(|node| EdgeRecord {
                node,
                bbox: chain.node(node).bbox(),
            })
            .collect();
        EdgeIndex {
            tree: RTree::bulk_load(records),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn insert(&mut self, record: EdgeRecord) {
        trace!("index: insert {record:?}");
        self.tree.insert(record);
    }

    pub fn remove(&mut self, record: &EdgeRecord) -> Option<EdgeRecord> {
        trace!("index: remove {record:?}");
        self.tree.remove(record)
    }

    /// Depth-first walk with an explicit stack.
    ///
    /// Descends into every subtree whose envelope satisfies `enter`
    /// and calls `visit` on every leaf record that satisfies it too.
    /// The first error returned by `visit` stops the walk.
    pub fn walk<F, V, E>(&self, mut enter: F, mut visit: V) -> std::result::Result<(), E>
    where
        F: FnMut(&AABB<[i64; 2]>) -> bool,
        V: FnMut(&EdgeRecord) -> std::result::Result<(), E>,
    {
        let mut stack: SmallVec<[&ParentNode<EdgeRecord>; STACK_SIZE]> = SmallVec::new();
        stack.push(self.tree.root());

        while let Some(node) = stack.pop() {
            for child in node.children() {
                match child {
                    RTreeNode::Parent(parent) => {
                        if enter(&parent.envelope()) {
                            stack.push(parent);
                        }
                    }
                    RTreeNode::Leaf(record) => {
                        if enter(&record.envelope()) {
                            visit(record)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Visits every record whose box overlaps `bbox`.
    pub fn overlapping<V>(&self, bbox: &BBox, visit: V) -> Result<()>
    where
        V: FnMut(&EdgeRecord) -> Result<()>,
    {
        let query = envelope(bbox);
        self.walk(|env| env.intersects(&query), visit)
    }

    /// Visits every record whose box contains `p`.
    pub fn containing<V>(&self, p: Coordinate<i64>, visit: V) -> Result<()>
    where
        V: FnMut(&EdgeRecord) -> Result<()>,
    {
        let point = [p.x, p.y];
        self.walk(|env| env.contains_point(&point), visit)
    }
}
