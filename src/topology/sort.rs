use std::cmp::Ordering;

use slab::Slab;

use super::{HalfEdge, HalfEdgeId};

/// Sorts the circular list through `head` by angle, in place.
///
/// Bottom-up merge sort on the linked list itself: each pass merges
/// neighbouring runs of length `run` into runs of `2 * run`, relinking
/// `prev`/`next` as it goes, and the sort ends after a pass that did a
/// single merge. Stable. Returns the new head, which has the least
/// angle.
pub(super) fn sort_cycle(edges: &mut Slab<HalfEdge>, head: HalfEdgeId) -> HalfEdgeId {
    let mut list = head;
    let mut run = 1;

    loop {
        let old_head = list;
        // Successor in the unsorted part of this pass; `None` past the
        // end of the cycle.
        let step = |edges: &Slab<HalfEdge>, id: HalfEdgeId| {
            Some(edges[id].next).filter(|&next| next != old_head)
        };

        let mut p = Some(old_head);
        let mut new_head = None;
        let mut tail: Option<HalfEdgeId> = None;
        let mut merges = 0;

        while let Some(start) = p {
            merges += 1;

            let mut q = Some(start);
            let mut p_size = 0;
            while let Some(id) = q {
                if p_size == run {
                    break;
                }
                p_size += 1;
                q = step(edges, id);
            }
            let mut q_size = run;
            let mut p_cur = Some(start);

            loop {
                let from_p = p_cur.filter(|_| p_size > 0);
                let from_q = q.filter(|_| q_size > 0);
                let e = match (from_p, from_q) {
                    (Some(a), Some(b)) => {
                        if edges[a].angle.total_cmp(&edges[b].angle) != Ordering::Greater {
                            p_cur = step(edges, a);
                            p_size -= 1;
                            a
                        } else {
                            q = step(edges, b);
                            q_size -= 1;
                            b
                        }
                    }
                    (Some(a), None) => {
                        p_cur = step(edges, a);
                        p_size -= 1;
                        a
                    }
                    (None, Some(b)) => {
                        q = step(edges, b);
                        q_size -= 1;
                        b
                    }
                    (None, None) => break,
                };

                match tail {
                    Some(t) => {
                        edges[t].next = e;
                        edges[e].prev = t;
                    }
                    None => new_head = Some(e),
                }
                tail = Some(e);
            }
            p = q;
        }

        let (first, last) = match (new_head, tail) {
            (Some(first), Some(last)) => (first, last),
            _ => return head,
        };
        edges[last].next = first;
        edges[first].prev = last;

        if merges <= 1 {
            return first;
        }
        list = first;
        run *= 2;
    }
}
