//! Term graph construction.
//!
//! # Overview
//!
//! [`TermGraphBuilder`] accepts terms and relationships in any order and
//! materializes a petgraph [`DiGraph`] once everything is known. Parents that
//! are referenced before their own record is seen are kept as stubs and
//! completed when the record arrives.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **is a more specific** B": edges point from child
//! to parent, so a namespace root is the unique node without outgoing edges.
//!
//! ## Build-time checks
//!
//! [`TermGraphBuilder::build`] rejects stubs that never received a record,
//! cycles, and namespaces with more than one parentless term. Relationships
//! that cross namespaces are dropped with a warning.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, instrument, trace, warn};

use super::TermGraph;
use crate::error::OntologyError;
use crate::policy::RelationshipPolicy;
use crate::term::{Namespace, RelationshipKind, Term, TermRecord};

// ---------------------------------------------------------------------------
// TermGraphBuilder
// ---------------------------------------------------------------------------

/// A term slot before the graph is materialized. `namespace == None` marks a
/// stub inserted only as the parent end of a relationship.
#[derive(Debug)]
struct TermSlot {
    id: String,
    namespace: Option<Namespace>,
    name: Option<String>,
    definition: Option<String>,
}

#[derive(Debug)]
struct PendingEdge {
    child: usize,
    parent: usize,
    kind: RelationshipKind,
}

/// Incremental builder for a [`TermGraph`].
#[derive(Debug)]
pub struct TermGraphBuilder {
    policy: RelationshipPolicy,
    slots: Vec<TermSlot>,
    slot_map: HashMap<String, usize>,
    alt_ids: Vec<(String, String)>,
    edges: Vec<PendingEdge>,
    edge_keys: HashSet<(usize, usize)>,
    skipped_obsolete: usize,
    filtered_edges: usize,
}

impl TermGraphBuilder {
    /// Create a builder applying `policy` to every relationship.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::EmptyPolicy`] if the policy allows nothing.
    pub fn new(policy: RelationshipPolicy) -> Result<Self, OntologyError> {
        policy.validate()?;
        Ok(Self {
            policy,
            slots: Vec::new(),
            slot_map: HashMap::new(),
            alt_ids: Vec::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
            skipped_obsolete: 0,
            filtered_edges: 0,
        })
    }

    /// Insert a term, or complete a stub created by an earlier relationship.
    ///
    /// Re-inserting a known term with the same namespace is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::NamespaceConflict`] if the term already exists
    /// under another namespace.
    pub fn insert_term(&mut self, id: &str, namespace: Namespace) -> Result<(), OntologyError> {
        self.upsert(id, namespace).map(|_| ())
    }

    /// Insert a `child → parent` edge of the given kind.
    ///
    /// Returns `Ok(false)` when the policy filters the kind out or the edge
    /// already exists. An unknown parent is inserted as a stub.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnknownTerm`] if `child` was never inserted and
    /// [`OntologyError::CycleDetected`] for a self-loop.
    pub fn insert_relationship(
        &mut self,
        child: &str,
        parent: &str,
        kind: RelationshipKind,
    ) -> Result<bool, OntologyError> {
        if !self.policy.allows(&kind) {
            trace!(child, parent, %kind, "relationship filtered by policy");
            self.filtered_edges += 1;
            return Ok(false);
        }

        let child_slot = *self
            .slot_map
            .get(child)
            .ok_or_else(|| OntologyError::UnknownTerm(child.to_string()))?;
        if child == parent {
            return Err(OntologyError::CycleDetected(child.to_string()));
        }
        let parent_slot = self.slot_or_stub(parent);

        if !self.edge_keys.insert((child_slot, parent_slot)) {
            return Ok(false);
        }
        self.edges.push(PendingEdge {
            child: child_slot,
            parent: parent_slot,
            kind,
        });
        Ok(true)
    }

    /// Insert a full record: the term, its display metadata, alternate ids,
    /// and every relation. Obsolete records are skipped.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::insert_term`] and
    /// [`Self::insert_relationship`].
    pub fn insert_record(&mut self, record: &TermRecord) -> Result<(), OntologyError> {
        if record.obsolete {
            trace!(id = %record.id, "skipping obsolete term");
            self.skipped_obsolete += 1;
            return Ok(());
        }

        let slot = self.upsert(&record.id, record.namespace)?;
        let entry = &mut self.slots[slot];
        if record.name.is_some() {
            entry.name.clone_from(&record.name);
        }
        if record.definition.is_some() {
            entry.definition.clone_from(&record.definition);
        }
        for alt in &record.alt_ids {
            self.alt_ids.push((alt.clone(), record.id.clone()));
        }

        for relation in &record.relations {
            self.insert_relationship(&record.id, &relation.target, relation.kind.clone())?;
        }
        Ok(())
    }

    /// Materialize the graph.
    ///
    /// # Errors
    ///
    /// - [`OntologyError::UnresolvedTerm`] if a stub never got a record.
    /// - [`OntologyError::CycleDetected`] if the relationships are cyclic.
    /// - [`OntologyError::AmbiguousRoot`] if a namespace has several roots.
    #[instrument(skip(self), fields(terms = self.slots.len(), relationships = self.edges.len()))]
    pub fn build(self) -> Result<TermGraph, OntologyError> {
        let mut graph = DiGraph::<Term, RelationshipKind>::with_capacity(
            self.slots.len(),
            self.edges.len(),
        );
        let mut node_map = HashMap::with_capacity(self.slots.len());

        // Slots become nodes in insertion order, so slot i is NodeIndex i.
        for slot in self.slots {
            let Some(namespace) = slot.namespace else {
                return Err(OntologyError::UnresolvedTerm(slot.id));
            };
            let idx = graph.add_node(Term {
                id: slot.id.clone(),
                namespace,
                name: slot.name,
                definition: slot.definition,
            });
            node_map.insert(slot.id, idx);
        }

        let mut cross_namespace = 0usize;
        for edge in self.edges {
            let child = NodeIndex::new(edge.child);
            let parent = NodeIndex::new(edge.parent);
            if graph[child].namespace != graph[parent].namespace {
                debug!(
                    child = %graph[child].id,
                    parent = %graph[parent].id,
                    "dropping cross-namespace relationship"
                );
                cross_namespace += 1;
                continue;
            }
            graph.add_edge(child, parent, edge.kind);
        }
        if cross_namespace > 0 {
            warn!(cross_namespace, "dropped relationships spanning two namespaces");
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| OntologyError::CycleDetected(graph[cycle.node_id()].id.clone()))?;

        let roots = find_roots(&graph)?;
        let depth = longest_depths(&graph, &order);
        let primary_parent = primary_parents(&graph);

        let alt_ids = self
            .alt_ids
            .into_iter()
            .filter(|(alt, _)| !node_map.contains_key(alt))
            .filter_map(|(alt, canonical)| node_map.get(&canonical).map(|&idx| (alt, idx)))
            .collect();

        let content_hash = compute_content_hash(&graph);

        info!(
            terms = graph.node_count(),
            relationships = graph.edge_count(),
            obsolete = self.skipped_obsolete,
            filtered = self.filtered_edges,
            "term graph built"
        );

        Ok(TermGraph {
            graph,
            node_map,
            alt_ids,
            roots,
            depth,
            primary_parent,
            content_hash,
        })
    }

    fn upsert(&mut self, id: &str, namespace: Namespace) -> Result<usize, OntologyError> {
        if let Some(&slot) = self.slot_map.get(id) {
            let entry = &mut self.slots[slot];
            match entry.namespace {
                None => entry.namespace = Some(namespace),
                Some(existing) if existing != namespace => {
                    return Err(OntologyError::NamespaceConflict {
                        term: id.to_string(),
                        existing,
                        requested: namespace,
                    });
                }
                Some(_) => {}
            }
            return Ok(slot);
        }

        Ok(self.push_slot(id, Some(namespace)))
    }

    fn slot_or_stub(&mut self, id: &str) -> usize {
        match self.slot_map.get(id) {
            Some(&slot) => slot,
            None => self.push_slot(id, None),
        }
    }

    fn push_slot(&mut self, id: &str, namespace: Option<Namespace>) -> usize {
        let slot = self.slots.len();
        self.slots.push(TermSlot {
            id: id.to_string(),
            namespace,
            name: None,
            definition: None,
        });
        self.slot_map.insert(id.to_string(), slot);
        slot
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Map each populated namespace to its single parentless term.
fn find_roots(
    graph: &DiGraph<Term, RelationshipKind>,
) -> Result<BTreeMap<Namespace, NodeIndex>, OntologyError> {
    let mut candidates: BTreeMap<Namespace, Vec<NodeIndex>> = BTreeMap::new();
    for idx in graph.node_indices() {
        if graph
            .neighbors_directed(idx, Direction::Outgoing)
            .next()
            .is_none()
        {
            candidates.entry(graph[idx].namespace).or_default().push(idx);
        }
    }

    let mut roots = BTreeMap::new();
    for (namespace, nodes) in candidates {
        if let [root] = nodes.as_slice() {
            roots.insert(namespace, *root);
        } else {
            let mut ids: Vec<String> = nodes.iter().map(|&n| graph[n].id.clone()).collect();
            ids.sort_unstable();
            return Err(OntologyError::AmbiguousRoot {
                namespace,
                candidates: ids,
            });
        }
    }
    Ok(roots)
}

/// Longest path length from the namespace root, per node.
///
/// `order` is a topological order of the child → parent graph, so parents
/// appear after their children; walking it backwards visits parents first.
fn longest_depths(graph: &DiGraph<Term, RelationshipKind>, order: &[NodeIndex]) -> Vec<usize> {
    let mut depth = vec![0usize; graph.node_count()];
    for &idx in order.iter().rev() {
        depth[idx.index()] = graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|parent| depth[parent.index()] + 1)
            .max()
            .unwrap_or(0);
    }
    depth
}

/// The target of each node's first inserted outgoing edge.
fn primary_parents(graph: &DiGraph<Term, RelationshipKind>) -> Vec<Option<NodeIndex>> {
    let mut primary = vec![None; graph.node_count()];
    for edge in graph.raw_edges() {
        let slot = &mut primary[edge.source().index()];
        if slot.is_none() {
            *slot = Some(edge.target());
        }
    }
    primary
}

/// BLAKE3 hash over sorted terms and sorted edges.
fn compute_content_hash(graph: &DiGraph<Term, RelationshipKind>) -> String {
    let mut terms: Vec<(&str, &str)> = graph
        .node_weights()
        .map(|t| (t.id.as_str(), t.namespace.as_str()))
        .collect();
    terms.sort_unstable();

    let mut edges: Vec<(&str, &str, &str)> = graph
        .raw_edges()
        .iter()
        .map(|e| {
            (
                graph[e.source()].id.as_str(),
                graph[e.target()].id.as_str(),
                e.weight.as_str(),
            )
        })
        .collect();
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for (id, namespace) in terms {
        hasher.update(id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(namespace.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for (child, parent, kind) in edges {
        hasher.update(child.as_bytes());
        hasher.update(b"\x00");
        hasher.update(parent.as_bytes());
        hasher.update(b"\x00");
        hasher.update(kind.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
