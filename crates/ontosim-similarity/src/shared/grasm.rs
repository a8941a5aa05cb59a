//! Couto GraSM common disjoint ancestors.
//!
//! Two ancestors `a1`, `a2` of a term `c` (with `IC(a1) ≤ IC(a2)`) are
//! disjoint with respect to `c` when some path from `a1` down to `c` avoids
//! `a2`. With path counts that is
//!
//! ```text
//! paths(a1, c)  ≥  paths(a1, a2) × paths(a2, c)      GraSM
//! paths(a1, c)  >  paths(a1, a2) × paths(a2, c)      GraSM adjusted
//! ```
//!
//! Candidates are visited from the most to the least informative and kept
//! when they are disjoint, with respect to either compared term, from every
//! candidate kept so far.

use std::cmp::Ordering;
use std::collections::HashMap;

use ontosim_core::{InformationContent, NodeIndex};

use super::common_ancestors;

/// Common disjoint ancestors of `a` and `b`. `strict` selects the adjusted
/// inequality.
pub(super) fn common_disjoint_ancestors(
    ic: &InformationContent,
    a: NodeIndex,
    b: NodeIndex,
    strict: bool,
) -> Vec<NodeIndex> {
    let graph = ic.graph();
    let mut candidates: Vec<NodeIndex> = common_ancestors(graph, a, b).into_iter().collect();
    candidates.sort_by(|&x, &y| {
        ic.information_at(y)
            .total_cmp(&ic.information_at(x))
            .then_with(|| graph.depth_at(y).cmp(&graph.depth_at(x)))
            .then_with(|| compare_ids(ic, x, y))
    });

    let mut counter = PathCounter::new(ic);
    let mut accepted: Vec<NodeIndex> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let disjoint_from_all = accepted.iter().all(|&kept| {
            counter.disjoint(a, candidate, kept, strict) || counter.disjoint(b, candidate, kept, strict)
        });
        if disjoint_from_all {
            accepted.push(candidate);
        }
    }
    accepted
}

fn compare_ids(ic: &InformationContent, x: NodeIndex, y: NodeIndex) -> Ordering {
    let graph = ic.graph();
    graph.term_id(x).cmp(&graph.term_id(y))
}

// ---------------------------------------------------------------------------
// PathCounter
// ---------------------------------------------------------------------------

/// Directed path counts, memoized per target term for the lifetime of one
/// comparison.
pub(super) struct PathCounter<'a> {
    ic: &'a InformationContent,
    /// target → (ancestor → number of paths from ancestor down to target)
    tables: HashMap<NodeIndex, HashMap<NodeIndex, u64>>,
}

impl<'a> PathCounter<'a> {
    pub(super) fn new(ic: &'a InformationContent) -> Self {
        Self {
            ic,
            tables: HashMap::new(),
        }
    }

    /// Number of distinct paths from `from` down to `to`.
    ///
    /// 0 when `from` is more informative than `to` or not one of its
    /// self-ancestors; 1 when they are the same term.
    pub(super) fn paths(&mut self, from: NodeIndex, to: NodeIndex) -> u64 {
        if self.ic.information_at(from) > self.ic.information_at(to) {
            return 0;
        }
        let ic = self.ic;
        self.tables
            .entry(to)
            .or_insert_with(|| path_table(ic, to))
            .get(&from)
            .copied()
            .unwrap_or(0)
    }

    /// Whether `a1` and `a2` are disjoint ancestors with respect to `c`.
    /// Terms from different namespaces are never disjoint.
    pub(super) fn disjoint(&mut self, c: NodeIndex, a1: NodeIndex, a2: NodeIndex, strict: bool) -> bool {
        let graph = self.ic.graph();
        if !graph.same_namespace(a1, a2) || !graph.same_namespace(a1, c) {
            return false;
        }
        let (a1, a2) = if self.ic.information_at(a1) > self.ic.information_at(a2) {
            (a2, a1)
        } else {
            (a1, a2)
        };

        let direct = self.paths(a1, c);
        let through = self.paths(a1, a2).saturating_mul(self.paths(a2, c));
        if strict { direct > through } else { direct >= through }
    }
}

/// Path counts from every self-ancestor of `to` down to `to`.
///
/// The closure is processed deepest first. A child is always strictly
/// deeper than its parent, so every child's count is final before the
/// parent sums it.
fn path_table(ic: &InformationContent, to: NodeIndex) -> HashMap<NodeIndex, u64> {
    let graph = ic.graph();
    let closure = graph.self_ancestors(to);
    let mut order: Vec<NodeIndex> = closure.iter().copied().collect();
    order.sort_by_key(|&n| std::cmp::Reverse(graph.depth_at(n)));

    let mut counts: HashMap<NodeIndex, u64> = HashMap::with_capacity(order.len());
    for node in order {
        let count = if node == to {
            1
        } else {
            graph
                .children(node)
                .filter(|child| closure.contains(child))
                .map(|child| counts.get(&child).copied().unwrap_or(0))
                .fold(0u64, u64::saturating_add)
        };
        counts.insert(node, count);
    }
    counts
}
