use std::mem;

use geo::Coordinate;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    chain::{Chain, NodeId},
    error::Result,
    exact::{add, manhattan, mul, sub},
    index::{EdgeIndex, EdgeRecord},
};

// Position of `p` along the direction of `a-b`, scaled by |b - a|.
fn projection(a: Coordinate<i64>, b: Coordinate<i64>, p: Coordinate<i64>) -> Result<i64> {
    add(
        mul(sub(p.x, a.x)?, sub(b.x, a.x)?)?,
        mul(sub(p.y, a.y)?, sub(b.y, a.y)?)?,
    )
}

/// Splices the pending hot pixels of each edge in `edges` into the
/// chain.
///
/// Pixels are ordered by Manhattan distance from the edge start, ties
/// broken by their projection on the edge, then by grid order. New
/// nodes inherit the edge's sequence index. The index is updated to
/// hold the resulting pieces in place of the original edge. Returns the
/// number of nodes inserted.
pub fn subdivide(chain: &mut Chain, index: &mut EdgeIndex, edges: &[NodeId]) -> Result<usize> {
    let mut inserted = 0;

    for &e in edges {
        let pending = mem::take(&mut chain.node_mut(e).pending);
        if pending.is_empty() {
            continue;
        }
        let (a, b) = chain.edge(e);
        let mut keyed = pending
            .into_iter()
            .map(|p| Ok((manhattan(a, p)?, projection(a, b, p)?, p)))
            .collect::<Result<SmallVec<[_; 4]>>>()?;
        keyed.sort_unstable_by_key(|&(dist, proj, p)| (dist, proj, p.x, p.y));

        let old = EdgeRecord {
            node: e,
            bbox: chain.node(e).bbox(),
        };
        let removed = index.remove(&old);
        debug_assert!(removed.is_some(), "edge {} missing from index", e);

        let seq = chain.node(e).seq();
        let mut last = e;
        for &(_, _, p) in keyed.iter() {
            last = chain.insert_after(last, p, seq);
        }
        trace!("subdivide {a:?}-{b:?} into {n} pieces", n = keyed.len() + 1);
        inserted += keyed.len();

        let mut id = e;
        loop {
            let bbox = chain.update_bbox(id);
            index.insert(EdgeRecord { node: id, bbox });
            if id == last {
                break;
            }
            id = chain.node(id).next();
        }
    }

    debug!("subdivide: {inserted} nodes inserted");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::BBox;

    #[test]
    fn splices_in_distance_order() {
        let ring: Vec<Coordinate<i64>> = vec![[0, 0].into(), [10, 0].into(), [10, 10].into()];
        let mut chain = Chain::from_ring(&ring).unwrap();
        let mut index = EdgeIndex::load(&chain);
        let edges: Vec<_> = chain.iter().collect();
        let head = chain.head();

        let pending = &mut chain.node_mut(head).pending;
        pending.push([7, 0].into());
        pending.push([2, 0].into());
        pending.push([5, 0].into());

        let inserted = subdivide(&mut chain, &mut index, &edges).unwrap();
        assert_eq!(inserted, 3);

        let want: Vec<Coordinate<i64>> = vec![
            [0, 0].into(),
            [2, 0].into(),
            [5, 0].into(),
            [7, 0].into(),
            [10, 0].into(),
            [10, 10].into(),
        ];
        assert_eq!(chain.coords(), want);
        for id in chain.iter() {
            let (a, b) = chain.edge(id);
            assert_eq!(chain.node(id).bbox(), BBox::of(a, b));
            assert!(chain.node(id).pending().is_empty());
        }
        assert!(chain.iter().take(4).all(|id| chain.node(id).seq() == 0));
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn ties_follow_the_edge_direction() {
        // (1, 0) and (0, 1) are equally far from the start; (0, 1)
        // projects nearer to it on the edge.
        let ring: Vec<Coordinate<i64>> = vec![[0, 0].into(), [10, 3].into(), [0, 10].into()];
        let mut chain = Chain::from_ring(&ring).unwrap();
        let mut index = EdgeIndex::load(&chain);
        let edges: Vec<_> = chain.iter().collect();
        let head = chain.head();

        chain.node_mut(head).pending.push([0, 1].into());
        chain.node_mut(head).pending.push([1, 0].into());
        subdivide(&mut chain, &mut index, &edges).unwrap();

        let coords = chain.coords();
        assert_eq!(coords[1], [0, 1].into());
        assert_eq!(coords[2], [1, 0].into());
    }
}
