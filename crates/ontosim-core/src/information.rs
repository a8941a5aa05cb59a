//! Annotation-propagated information content.
//!
//! # Overview
//!
//! An annotation to a term implies annotations to everything above it, so raw
//! counts are propagated upward before probabilities are taken:
//!
//! ```text
//! p(t)  = propagated(t) / propagated(root of t's namespace)
//! IC(t) = -ln p(t)            (0 when p(t) = 0)
//! ```
//!
//! # Propagation
//!
//! - [`Propagation::Dag`]: a named entity counts once at every term in the
//!   extended set of its annotations; an anonymous count reaches every
//!   self-ancestor once.
//! - [`Propagation::Tree`]: propagation follows each term's primary parent
//!   only, treating the ontology as the spanning tree of first-declared
//!   parents. Entities are still deduplicated along the union of their
//!   chains.
//!
//! Under tree propagation a term can carry less mass than one of its
//! descendants reached through a secondary parent.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::annotation::AnnotationCorpus;
use crate::error::OntologyError;
use crate::graph::TermGraph;
use crate::term::Namespace;

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// How annotation counts flow from a term to its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    /// Follow primary parents only.
    Tree,
    /// Follow every parent; each ancestor is credited once.
    #[default]
    Dag,
}

impl Propagation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Dag => "dag",
        }
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Propagation {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" | "simple" => Ok(Self::Tree),
            "dag" | "graph" => Ok(Self::Dag),
            _ => Err(OntologyError::InvalidValue {
                what: "propagation",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// InformationContent
// ---------------------------------------------------------------------------

/// Per-term information record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermInformation {
    /// Propagated annotation count.
    pub annotation_count: u64,
    pub probability: f64,
    pub information_content: f64,
    /// Largest IC among terms of the same namespace.
    pub max_information_content: f64,
}

/// Information content of every term of a [`TermGraph`] under one corpus.
///
/// Computed once and read-only afterwards. Holds the graph through an `Arc`
/// so strategies built on top can reach both.
#[derive(Debug)]
pub struct InformationContent {
    graph: Arc<TermGraph>,
    propagation: Propagation,
    counts: Vec<u64>,
    probability: Vec<f64>,
    information: Vec<f64>,
    max_information: BTreeMap<Namespace, f64>,
}

impl InformationContent {
    /// Propagate `corpus` over `graph` and derive probabilities and IC.
    ///
    /// Annotations to terms the graph does not know are skipped.
    #[must_use]
    #[instrument(skip(graph, corpus), fields(terms = graph.term_count(), entities = corpus.entity_count()))]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(graph: Arc<TermGraph>, corpus: &AnnotationCorpus, propagation: Propagation) -> Self {
        let mut counts = vec![0u64; graph.term_count()];
        let mut unknown = 0usize;

        for (entity, terms) in corpus.entities() {
            let mut nodes = Vec::with_capacity(terms.len());
            for term in terms {
                if let Some(idx) = graph.index_of(term) {
                    nodes.push(idx);
                } else {
                    debug!(entity, term = %term, "annotation to unknown term");
                    unknown += 1;
                }
            }
            for target in propagation_targets(&graph, propagation, nodes) {
                let slot = &mut counts[target.index()];
                *slot = slot.saturating_add(1);
            }
        }

        for (term, n) in corpus.counts() {
            let Some(idx) = graph.index_of(term) else {
                debug!(term, "count for unknown term");
                unknown += 1;
                continue;
            };
            // Saturate so an ancestor never ends up below its descendants.
            for target in propagation_targets(&graph, propagation, [idx]) {
                let slot = &mut counts[target.index()];
                *slot = slot.saturating_add(n);
            }
        }

        if unknown > 0 {
            warn!(unknown, "skipped annotations to terms outside the graph");
        }

        let mut probability = vec![0.0; counts.len()];
        let mut information = vec![0.0; counts.len()];
        let mut max_information: BTreeMap<Namespace, f64> = BTreeMap::new();

        for idx in graph.node_indices() {
            let Some(namespace) = graph.namespace_at(idx) else {
                continue;
            };
            let total = graph
                .root_index(namespace)
                .map_or(0, |root| counts[root.index()]);
            let i = idx.index();
            if total == 0 || counts[i] == 0 {
                continue;
            }
            let p = counts[i] as f64 / total as f64;
            probability[i] = p;
            information[i] = if p < 1.0 { -p.ln() } else { 0.0 };

            let max = max_information.entry(namespace).or_insert(0.0);
            if information[i] > *max {
                *max = information[i];
            }
        }

        Self {
            graph,
            propagation,
            counts,
            probability,
            information,
            max_information,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        &self.graph
    }

    /// A new handle on the underlying graph.
    #[must_use]
    pub fn shared_graph(&self) -> Arc<TermGraph> {
        Arc::clone(&self.graph)
    }

    #[must_use]
    pub const fn propagation(&self) -> Propagation {
        self.propagation
    }

    // -- index surface ------------------------------------------------------

    /// IC of a node; 0 for unknown nodes.
    #[must_use]
    pub fn information_at(&self, idx: NodeIndex) -> f64 {
        self.information.get(idx.index()).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn probability_at(&self, idx: NodeIndex) -> f64 {
        self.probability.get(idx.index()).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn count_at(&self, idx: NodeIndex) -> u64 {
        self.counts.get(idx.index()).copied().unwrap_or(0)
    }

    /// Largest IC in the node's namespace; 0 for unknown nodes.
    #[must_use]
    pub fn max_information_at(&self, idx: NodeIndex) -> f64 {
        self.graph
            .namespace_at(idx)
            .map_or(0.0, |ns| self.max_information_for(ns))
    }

    /// Both nodes exist and share a namespace.
    #[must_use]
    pub fn validate_indices(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.same_namespace(a, b)
    }

    // -- string surface -----------------------------------------------------

    /// IC of a term; 0 for unknown or unannotated terms.
    #[must_use]
    pub fn term_information(&self, id: &str) -> f64 {
        self.graph
            .index_of(id)
            .map_or(0.0, |idx| self.information_at(idx))
    }

    #[must_use]
    pub fn probability(&self, id: &str) -> f64 {
        self.graph
            .index_of(id)
            .map_or(0.0, |idx| self.probability_at(idx))
    }

    /// Propagated annotation count of a term.
    #[must_use]
    pub fn annotation_count(&self, id: &str) -> u64 {
        self.graph.index_of(id).map_or(0, |idx| self.count_at(idx))
    }

    /// IC of the rarest annotated term sharing `id`'s namespace.
    #[must_use]
    pub fn max_information_content(&self, id: &str) -> f64 {
        self.graph
            .index_of(id)
            .map_or(0.0, |idx| self.max_information_at(idx))
    }

    #[must_use]
    pub fn max_information_for(&self, namespace: Namespace) -> f64 {
        self.max_information.get(&namespace).copied().unwrap_or(0.0)
    }

    /// `true` iff both terms are known and share a namespace. Every
    /// similarity entry point checks this and scores invalid pairs `0.0`.
    #[must_use]
    pub fn validate_terms(&self, a: &str, b: &str) -> bool {
        self.graph.validate_terms(a, b)
    }

    /// Full information record of a term.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<TermInformation> {
        let idx = self.graph.index_of(id)?;
        Some(TermInformation {
            annotation_count: self.count_at(idx),
            probability: self.probability_at(idx),
            information_content: self.information_at(idx),
            max_information_content: self.max_information_at(idx),
        })
    }
}

/// Terms credited by annotations to `nodes` under `propagation`.
fn propagation_targets<I>(
    graph: &TermGraph,
    propagation: Propagation,
    nodes: I,
) -> HashSet<NodeIndex>
where
    I: IntoIterator<Item = NodeIndex>,
{
    match propagation {
        Propagation::Dag => graph.extended(nodes),
        Propagation::Tree => {
            let mut chain = HashSet::new();
            for start in nodes {
                let mut current = Some(start);
                while let Some(node) = current {
                    if !chain.insert(node) {
                        break;
                    }
                    current = graph.primary_parent(node);
                }
            }
            chain
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RelationshipPolicy;
    use crate::term::TermRecord;

    const BP: Namespace = Namespace::BiologicalProcess;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    /// Root ← Mid ← {Leaf1, Leaf2}
    fn toy() -> Arc<TermGraph> {
        let records = vec![
            TermRecord::new("Root", BP),
            TermRecord::new("Mid", BP).is_a("Root"),
            TermRecord::new("Leaf1", BP).is_a("Mid"),
            TermRecord::new("Leaf2", BP).is_a("Mid"),
        ];
        Arc::new(TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph"))
    }

    /// root ← a, root ← b, c is_a a (primary) and b
    fn diamond() -> Arc<TermGraph> {
        let records = vec![
            TermRecord::new("root", BP),
            TermRecord::new("a", BP).is_a("root"),
            TermRecord::new("b", BP).is_a("root"),
            TermRecord::new("c", BP).is_a("a").is_a("b"),
        ];
        Arc::new(TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph"))
    }

    #[test]
    fn toy_ontology_information_content() {
        let corpus = AnnotationCorpus::from_counts([("Leaf1", 4), ("Leaf2", 6)]);
        for propagation in [Propagation::Dag, Propagation::Tree] {
            let ic = InformationContent::new(toy(), &corpus, propagation);
            assert_eq!(ic.annotation_count("Root"), 10);
            assert_eq!(ic.annotation_count("Mid"), 10);
            assert!(close(ic.term_information("Root"), 0.0));
            assert!(close(ic.term_information("Mid"), 0.0));
            assert!(close(ic.term_information("Leaf1"), -(0.4f64.ln())));
            assert!(close(ic.term_information("Leaf2"), -(0.6f64.ln())));
            assert!(close(ic.max_information_content("Mid"), -(0.4f64.ln())));
        }
    }

    #[test]
    fn huge_anonymous_counts_saturate_at_shared_ancestors() {
        let half = u64::MAX / 2 + 1;
        let corpus = AnnotationCorpus::from_counts([("Leaf1", half), ("Leaf2", half)]);
        for propagation in [Propagation::Dag, Propagation::Tree] {
            let ic = InformationContent::new(toy(), &corpus, propagation);
            assert_eq!(ic.annotation_count("Root"), u64::MAX);
            assert_eq!(ic.annotation_count("Mid"), u64::MAX);
            assert_eq!(ic.annotation_count("Leaf1"), half);
            assert!(close(ic.term_information("Root"), 0.0));
            assert!(ic.probability("Leaf1") <= 1.0);
            assert!((ic.term_information("Leaf1") - 2f64.ln()).abs() < 1e-9);
        }
    }

    #[test]
    fn root_information_is_positive_zero() {
        let corpus = AnnotationCorpus::from_counts([("Leaf1", 1)]);
        let ic = InformationContent::new(toy(), &corpus, Propagation::Dag);
        assert!(ic.term_information("Root").is_sign_positive());
    }

    #[test]
    fn unannotated_terms_have_zero_information() {
        let corpus = AnnotationCorpus::from_counts([("Leaf1", 5)]);
        let ic = InformationContent::new(toy(), &corpus, Propagation::Dag);
        assert_eq!(ic.probability("Leaf2"), 0.0);
        assert_eq!(ic.term_information("Leaf2"), 0.0);
        assert_eq!(ic.term_information("nope"), 0.0);
    }

    #[test]
    fn dag_propagation_credits_each_ancestor_once() {
        let corpus = AnnotationCorpus::from_counts([("c", 3)]);
        let ic = InformationContent::new(diamond(), &corpus, Propagation::Dag);
        assert_eq!(ic.annotation_count("root"), 3);
        assert_eq!(ic.annotation_count("a"), 3);
        assert_eq!(ic.annotation_count("b"), 3);
    }

    #[test]
    fn tree_propagation_follows_primary_parent() {
        let corpus = AnnotationCorpus::from_annotations([("g1", "c"), ("g2", "b")]);

        let dag = InformationContent::new(diamond(), &corpus, Propagation::Dag);
        assert_eq!(dag.annotation_count("root"), 2);
        assert_eq!(dag.annotation_count("a"), 1);
        assert_eq!(dag.annotation_count("b"), 2);

        let tree = InformationContent::new(diamond(), &corpus, Propagation::Tree);
        assert_eq!(tree.annotation_count("root"), 2);
        assert_eq!(tree.annotation_count("a"), 1);
        assert_eq!(tree.annotation_count("b"), 1);
        assert_eq!(tree.annotation_count("c"), 1);
    }

    #[test]
    fn entities_are_deduplicated_at_shared_ancestors() {
        let corpus = AnnotationCorpus::from_annotations([("g1", "a"), ("g1", "b"), ("g2", "c")]);
        for propagation in [Propagation::Dag, Propagation::Tree] {
            let ic = InformationContent::new(diamond(), &corpus, propagation);
            assert_eq!(ic.annotation_count("root"), 2, "{propagation}");
        }
    }

    #[test]
    fn unknown_annotations_are_skipped() {
        let corpus = AnnotationCorpus::from_annotations([("g1", "Leaf1"), ("g1", "GO:missing")]);
        let ic = InformationContent::new(toy(), &corpus, Propagation::Dag);
        assert_eq!(ic.annotation_count("Root"), 1);
    }

    #[test]
    fn entry_reports_all_fields() {
        let corpus = AnnotationCorpus::from_counts([("Leaf1", 4), ("Leaf2", 6)]);
        let ic = InformationContent::new(toy(), &corpus, Propagation::Dag);
        let entry = ic.entry("Leaf2").expect("known term");
        assert_eq!(entry.annotation_count, 6);
        assert!(close(entry.probability, 0.6));
        assert!(close(entry.max_information_content, -(0.4f64.ln())));
        assert!(ic.entry("nope").is_none());
    }

    #[test]
    fn propagation_parses() {
        assert_eq!("DAG".parse::<Propagation>(), Ok(Propagation::Dag));
        assert_eq!("simple".parse::<Propagation>(), Ok(Propagation::Tree));
        assert!("bushy".parse::<Propagation>().is_err());
    }
}
