//! Frontier common ancestors.
//!
//! Walk upward from each term recording, per reached ancestor, the edges the
//! walk arrived through. Where the two walks arrive through different edges
//! the ancestries diverge, and that ancestor is on the frontier.

use ontosim_core::{NodeIndex, TermGraph};

pub(super) fn frontier_ancestors(graph: &TermGraph, a: NodeIndex, b: NodeIndex) -> Vec<NodeIndex> {
    let left = graph.edge_reach(a);
    let right = graph.edge_reach(b);
    left.iter()
        .filter_map(|(node, left_edges)| {
            right
                .get(node)
                .filter(|right_edges| *right_edges != left_edges)
                .map(|_| *node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontosim_core::{Namespace, RelationshipPolicy, TermRecord};

    #[test]
    fn shared_upper_edges_are_not_frontier() {
        // root ← mid ← {x, y}
        let ns = Namespace::BiologicalProcess;
        let records = vec![
            TermRecord::new("root", ns),
            TermRecord::new("mid", ns).is_a("root"),
            TermRecord::new("x", ns).is_a("mid"),
            TermRecord::new("y", ns).is_a("mid"),
        ];
        let g = TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph");
        let (x, y) = (g.index_of("x").expect("x"), g.index_of("y").expect("y"));
        let found = frontier_ancestors(&g, x, y);
        assert_eq!(g.labels(found), ["mid"].into_iter().collect());
    }
}
