//! Exclusively inherited common ancestors.
//!
//! A common ancestor belongs to the set when one of its immediate children
//! is a self-ancestor of exactly one of the two terms: that is where the two
//! ancestries stop coinciding.

use ontosim_core::{NodeIndex, TermGraph};

pub(super) fn exclusively_inherited(graph: &TermGraph, a: NodeIndex, b: NodeIndex) -> Vec<NodeIndex> {
    let left = graph.self_ancestors(a);
    let right = graph.self_ancestors(b);
    left.intersection(&right)
        .copied()
        .filter(|&ancestor| {
            graph
                .children(ancestor)
                .any(|child| left.contains(&child) != right.contains(&child))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use ontosim_core::{Namespace, RelationshipPolicy, TermRecord};

    fn graph() -> TermGraph {
        let ns = Namespace::MolecularFunction;
        let records = vec![
            TermRecord::new("root", ns),
            TermRecord::new("a", ns).is_a("root"),
            TermRecord::new("b", ns).is_a("root"),
            TermRecord::new("c", ns).is_a("a").is_a("b"),
            TermRecord::new("d", ns).is_a("c"),
            TermRecord::new("e", ns).is_a("b"),
        ];
        TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph")
    }

    fn run(g: &TermGraph, a: &str, b: &str) -> BTreeSet<String> {
        let (ia, ib) = (g.index_of(a).expect("a"), g.index_of(b).expect("b"));
        exclusively_inherited(g, ia, ib)
            .into_iter()
            .filter_map(|n| g.term_id(n).map(str::to_string))
            .collect()
    }

    #[test]
    fn every_divergence_point_is_admitted() {
        let g = graph();
        // b splits into c and e; root splits into a (d only) and b (both)
        assert_eq!(
            run(&g, "d", "e"),
            BTreeSet::from(["b".to_string(), "root".to_string()])
        );
    }

    #[test]
    fn ancestor_of_the_other_term_is_admitted() {
        let g = graph();
        assert_eq!(run(&g, "c", "d"), BTreeSet::from(["c".to_string()]));
    }
}
