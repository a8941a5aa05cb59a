//! Ontology term graph.
//!
//! # Overview
//!
//! A [`TermGraph`] is an arena of terms stored in a petgraph [`DiGraph`],
//! addressed by dense [`NodeIndex`] values. Edges point from the more specific
//! term to the more general one (child → parent), so a namespace root is the
//! unique term of its namespace without outgoing edges.
//!
//! ## Pipeline
//!
//! ```text
//! TermRecord stream (OBO reader, JSON, hand-built)
//!        ↓  build::TermGraphBuilder (policy filter, stubs for forward refs)
//! TermGraph (DAG, one root per namespace, depths, content hash)
//!        ↓  information::InformationContent::new()
//! InformationContent
//! ```
//!
//! ## Two query surfaces
//!
//! - String queries ([`TermGraph::ancestor_terms`], …) take term ids and
//!   return sorted `&str` sets. Unknown ids give empty sets or `false`.
//! - Index queries ([`TermGraph::ancestors`], …) take [`NodeIndex`] values and
//!   return hash sets. The similarity engines run on these.
//!
//! The graph is immutable after [`TermGraphBuilder::build`], so it can be
//! shared behind an `Arc` and queried from many threads at once.

pub mod build;
mod traverse;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::OntologyError;
use crate::policy::RelationshipPolicy;
use crate::term::{Namespace, RelationshipKind, Term, TermRecord};

pub use build::TermGraphBuilder;

// ---------------------------------------------------------------------------
// TermGraph
// ---------------------------------------------------------------------------

/// The ontology DAG.
#[derive(Debug)]
pub struct TermGraph {
    /// Nodes are terms; an edge `A → B` means "A is a B" (or another allowed
    /// relationship kind).
    graph: DiGraph<Term, RelationshipKind>,
    node_map: HashMap<String, NodeIndex>,
    /// Alternate id → canonical term.
    alt_ids: HashMap<String, NodeIndex>,
    roots: BTreeMap<Namespace, NodeIndex>,
    /// Longest path length from the namespace root, by node index.
    depth: Vec<usize>,
    /// First declared parent, by node index.
    primary_parent: Vec<Option<NodeIndex>>,
    content_hash: String,
}

impl TermGraph {
    /// Build a graph from a slice of records under `policy`.
    ///
    /// # Errors
    ///
    /// Any construction error from [`TermGraphBuilder`].
    pub fn from_records(
        records: &[TermRecord],
        policy: RelationshipPolicy,
    ) -> Result<Self, OntologyError> {
        let mut builder = TermGraphBuilder::new(policy)?;
        for record in records {
            builder.insert_record(record)?;
        }
        builder.build()
    }

    // -- sizes and metadata -------------------------------------------------

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// BLAKE3 hash of the sorted term and edge lists.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.index_of(id).and_then(|idx| self.graph.node_weight(idx))
    }

    #[must_use]
    pub fn namespace_of(&self, id: &str) -> Option<Namespace> {
        self.term(id).map(|t| t.namespace)
    }

    /// Namespaces that hold at least one term.
    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.roots.keys().copied()
    }

    /// Iterate over every term in index order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.graph.node_weights()
    }

    // -- index surface ------------------------------------------------------

    /// Resolve a term id (or alternate id) to its node index.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map
            .get(id)
            .or_else(|| self.alt_ids.get(id))
            .copied()
    }

    #[must_use]
    pub fn term_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|t| t.id.as_str())
    }

    #[must_use]
    pub fn namespace_at(&self, idx: NodeIndex) -> Option<Namespace> {
        self.graph.node_weight(idx).map(|t| t.namespace)
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Immediate parents of a node.
    pub fn parents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Immediate children of a node.
    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Outgoing `(edge, parent)` pairs of a node.
    pub fn parent_edges(
        &self,
        idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
    }

    /// Relationship kind of an edge.
    #[must_use]
    pub fn relationship(&self, edge: EdgeIndex) -> Option<&RelationshipKind> {
        self.graph.edge_weight(edge)
    }

    /// Longest path length from the namespace root (0 for out-of-range).
    #[must_use]
    pub fn depth_at(&self, idx: NodeIndex) -> usize {
        self.depth.get(idx.index()).copied().unwrap_or(0)
    }

    /// First declared parent of a node, followed by tree propagation.
    #[must_use]
    pub fn primary_parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.primary_parent.get(idx.index()).copied().flatten()
    }

    #[must_use]
    pub fn root_index(&self, namespace: Namespace) -> Option<NodeIndex> {
        self.roots.get(&namespace).copied()
    }

    /// Both nodes exist and share a namespace.
    #[must_use]
    pub fn same_namespace(&self, a: NodeIndex, b: NodeIndex) -> bool {
        match (self.namespace_at(a), self.namespace_at(b)) {
            (Some(na), Some(nb)) => na == nb,
            _ => false,
        }
    }

    /// Map a collection of indices to their sorted term ids.
    pub fn labels<I>(&self, nodes: I) -> BTreeSet<&str>
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        nodes
            .into_iter()
            .filter_map(|idx| self.term_id(idx))
            .collect()
    }

    // -- string surface -----------------------------------------------------

    #[must_use]
    pub fn parent_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.parents(idx)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn child_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.children(idx)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn ancestor_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.ancestors(idx)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn self_ancestor_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.self_ancestors(idx)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn descendant_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.descendants(idx)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn self_descendant_terms(&self, id: &str) -> BTreeSet<&str> {
        self.index_of(id)
            .map(|idx| self.labels(self.self_descendants(idx)))
            .unwrap_or_default()
    }

    /// Union of the self-ancestor closures of every known term in `ids`.
    pub fn extended_term_set<'a, I>(&self, ids: I) -> BTreeSet<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let nodes: Vec<NodeIndex> = ids.into_iter().filter_map(|id| self.index_of(id)).collect();
        self.labels(self.extended(nodes))
    }

    /// Root of the namespace `id` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnknownTerm`] if `id` is not in the graph.
    pub fn term_root(&self, id: &str) -> Result<&str, OntologyError> {
        self.namespace_of(id)
            .and_then(|ns| self.root_term(ns))
            .ok_or_else(|| OntologyError::UnknownTerm(id.to_string()))
    }

    /// Root term of a namespace, if the namespace is populated.
    #[must_use]
    pub fn root_term(&self, namespace: Namespace) -> Option<&str> {
        self.root_index(namespace).and_then(|idx| self.term_id(idx))
    }

    /// `true` if the term has no children. Unknown terms are not leaves.
    #[must_use]
    pub fn is_leaf(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|idx| self.children(idx).next().is_none())
    }

    /// Every term of a namespace: the root's self-descendants.
    #[must_use]
    pub fn ontology_terms(&self, namespace: Namespace) -> BTreeSet<&str> {
        self.root_index(namespace)
            .map(|root| self.labels(self.self_descendants(root)))
            .unwrap_or_default()
    }

    /// Longest path length from the namespace root.
    #[must_use]
    pub fn term_depth(&self, id: &str) -> Option<usize> {
        self.index_of(id).map(|idx| self.depth_at(idx))
    }

    /// Both terms are known and belong to the same namespace.
    #[must_use]
    pub fn validate_terms(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.same_namespace(ia, ib),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
