//! Closure traversals over the term graph.
//!
//! Every traversal uses an explicit stack or queue and returns the set it
//! visited, so the result is a plain value and a term reached through several
//! paths is expanded once.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::TermGraph;

impl TermGraph {
    /// Depth-first closure from `start` along `direction`, excluding `start`
    /// unless a path leads back to it.
    fn closure(&self, start: NodeIndex, direction: Direction) -> HashSet<NodeIndex> {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.graph.neighbors_directed(start, direction).collect();
        while let Some(node) = stack.pop() {
            if visited.insert(node) {
                stack.extend(
                    self.graph
                        .neighbors_directed(node, direction)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
        visited
    }

    /// Every term reachable along child → parent edges.
    #[must_use]
    pub fn ancestors(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        self.closure(idx, Direction::Outgoing)
    }

    /// [`Self::ancestors`] plus the term itself.
    #[must_use]
    pub fn self_ancestors(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        let mut set = self.ancestors(idx);
        if self.graph.node_weight(idx).is_some() {
            set.insert(idx);
        }
        set
    }

    /// Every term reachable along parent → child edges.
    #[must_use]
    pub fn descendants(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        self.closure(idx, Direction::Incoming)
    }

    /// [`Self::descendants`] plus the term itself.
    #[must_use]
    pub fn self_descendants(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        let mut set = self.descendants(idx);
        if self.graph.node_weight(idx).is_some() {
            set.insert(idx);
        }
        set
    }

    /// Union of the self-ancestor closures of `nodes`.
    ///
    /// A shared visited set means overlapping closures are walked once.
    pub fn extended<I>(&self, nodes: I) -> HashSet<NodeIndex>
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeIndex> = nodes
            .into_iter()
            .filter(|&idx| self.graph.node_weight(idx).is_some())
            .collect();
        while let Some(node) = stack.pop() {
            if visited.insert(node) {
                stack.extend(
                    self.graph
                        .neighbors_directed(node, Direction::Outgoing)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
        visited
    }

    /// Breadth-first walk upward from `start`, recording for every reached
    /// term the set of edges the walk used to reach it.
    ///
    /// `start` maps to an empty edge set. Each term is expanded once, so every
    /// edge out of the walked closure is recorded exactly once.
    #[must_use]
    pub fn edge_reach(&self, start: NodeIndex) -> HashMap<NodeIndex, HashSet<EdgeIndex>> {
        let mut reach: HashMap<NodeIndex, HashSet<EdgeIndex>> = HashMap::new();
        if self.graph.node_weight(start).is_none() {
            return reach;
        }
        reach.insert(start, HashSet::new());

        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for (edge, parent) in self.parent_edges(node) {
                let first_visit = !reach.contains_key(&parent);
                reach.entry(parent).or_default().insert(edge);
                if first_visit {
                    queue.push_back(parent);
                }
            }
        }
        reach
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::TermGraph;
    use crate::policy::RelationshipPolicy;
    use crate::term::{Namespace, TermRecord};

    fn ladder() -> TermGraph {
        // root ← a ← c, root ← b ← c, c ← d
        let ns = Namespace::CellularComponent;
        let records = vec![
            TermRecord::new("root", ns),
            TermRecord::new("a", ns).is_a("root"),
            TermRecord::new("b", ns).is_a("root"),
            TermRecord::new("c", ns).is_a("a").is_a("b"),
            TermRecord::new("d", ns).is_a("c"),
        ];
        TermGraph::from_records(&records, RelationshipPolicy::default()).expect("valid graph")
    }

    #[test]
    fn edge_reach_counts_each_incoming_edge_once() {
        let g = ladder();
        let d = g.index_of("d").expect("d");
        let reach = g.edge_reach(d);

        assert_eq!(reach.len(), 5);
        assert!(reach[&d].is_empty());
        let root = g.index_of("root").expect("root");
        assert_eq!(reach[&root].len(), 2, "root is reached via a and via b");
        let c = g.index_of("c").expect("c");
        assert_eq!(reach[&c].len(), 1);
    }

    #[test]
    fn extended_of_nothing_is_empty() {
        let g = ladder();
        assert!(g.extended(std::iter::empty()).is_empty());
    }

    #[test]
    fn self_closures_include_start() {
        let g = ladder();
        let c = g.index_of("c").expect("c");
        assert!(g.self_ancestors(c).contains(&c));
        assert!(g.self_descendants(c).contains(&c));
        assert!(!g.ancestors(c).contains(&c));
    }
}
