//! Shared-information strategies.
//!
//! # Overview
//!
//! Every strategy picks a set of common ancestors of two terms and scores
//! the pair with the mean IC of that set:
//!
//! | Kind | Term set |
//! |------|----------|
//! | [`SharedInformationKind::AncestorMean`] | every common self-ancestor |
//! | [`SharedInformationKind::CoutoGraSm`] | common disjoint ancestors, `≥` test |
//! | [`SharedInformationKind::CoutoGraSmAdjusted`] | common disjoint ancestors, `>` test |
//! | [`SharedInformationKind::ExclusiveInherited`] | common ancestors with a child inherited by one side only |
//! | [`SharedInformationKind::Frontier`] | common ancestors reached through different edges |
//!
//! Invalid pairs (unknown term, different namespaces) score `0.0`, and so
//! does an empty set. A term compared with itself always yields `{term}`.
//!
//! Exclusive-Inherited and Frontier are two linear-time formulations of the
//! same set; the tests check they agree.

mod exclusive;
mod frontier;
mod grasm;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ontosim_core::{InformationContent, NodeIndex, OntologyError, TermGraph};
use serde::{Deserialize, Serialize};
use tracing::trace;

// ---------------------------------------------------------------------------
// SharedInformationKind
// ---------------------------------------------------------------------------

/// Selectable shared-information strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SharedInformationKind {
    AncestorMean,
    #[default]
    #[serde(rename = "couto-grasm")]
    CoutoGraSm,
    #[serde(rename = "couto-grasm-adjusted")]
    CoutoGraSmAdjusted,
    ExclusiveInherited,
    Frontier,
}

impl SharedInformationKind {
    pub const ALL: [Self; 5] = [
        Self::AncestorMean,
        Self::CoutoGraSm,
        Self::CoutoGraSmAdjusted,
        Self::ExclusiveInherited,
        Self::Frontier,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AncestorMean => "ancestor-mean",
            Self::CoutoGraSm => "couto-grasm",
            Self::CoutoGraSmAdjusted => "couto-grasm-adjusted",
            Self::ExclusiveInherited => "exclusive-inherited",
            Self::Frontier => "frontier",
        }
    }
}

impl fmt::Display for SharedInformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharedInformationKind {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "ancestor-mean" | "ancestors" => Ok(Self::AncestorMean),
            "couto-grasm" | "grasm" => Ok(Self::CoutoGraSm),
            "couto-grasm-adjusted" | "grasm-adjusted" => Ok(Self::CoutoGraSmAdjusted),
            "exclusive-inherited" | "exclusive" => Ok(Self::ExclusiveInherited),
            "frontier" => Ok(Self::Frontier),
            _ => Err(OntologyError::InvalidValue {
                what: "shared-information strategy",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SharedInformation
// ---------------------------------------------------------------------------

/// A shared-information strategy bound to an information content model.
///
/// Cheap to clone; the model is behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SharedInformation {
    kind: SharedInformationKind,
    ic: Arc<InformationContent>,
}

impl SharedInformation {
    #[must_use]
    pub const fn new(kind: SharedInformationKind, ic: Arc<InformationContent>) -> Self {
        Self { kind, ic }
    }

    #[must_use]
    pub const fn kind(&self) -> SharedInformationKind {
        self.kind
    }

    #[must_use]
    pub fn information(&self) -> &InformationContent {
        &self.ic
    }

    /// A new handle on the information content model.
    #[must_use]
    pub fn shared_information_content(&self) -> Arc<InformationContent> {
        Arc::clone(&self.ic)
    }

    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        self.ic.graph()
    }

    /// Mean IC of the strategy's ancestor set for two term ids.
    #[must_use]
    pub fn shared_information(&self, a: &str, b: &str) -> f64 {
        let graph = self.graph();
        match (graph.index_of(a), graph.index_of(b)) {
            (Some(ia), Some(ib)) => self.shared_information_at(ia, ib),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn shared_information_at(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        let nodes = self.common_disjoint_ancestors_at(a, b);
        mean_information(&self.ic, &nodes)
    }

    /// The ancestor set the strategy scores, as sorted term ids. For
    /// Ancestor-Mean this is the full common self-ancestor set.
    #[must_use]
    pub fn common_disjoint_ancestors(&self, a: &str, b: &str) -> BTreeSet<&str> {
        let graph = self.graph();
        match (graph.index_of(a), graph.index_of(b)) {
            (Some(ia), Some(ib)) => graph.labels(self.common_disjoint_ancestors_at(ia, ib)),
            _ => BTreeSet::new(),
        }
    }

    /// Index form of [`Self::common_disjoint_ancestors`], sorted by index.
    #[must_use]
    pub fn common_disjoint_ancestors_at(&self, a: NodeIndex, b: NodeIndex) -> Vec<NodeIndex> {
        if !self.ic.validate_indices(a, b) {
            return Vec::new();
        }
        if a == b {
            return vec![a];
        }

        let graph = self.graph();
        let mut nodes = match self.kind {
            SharedInformationKind::AncestorMean => common_ancestors(graph, a, b).into_iter().collect(),
            SharedInformationKind::CoutoGraSm => grasm::common_disjoint_ancestors(&self.ic, a, b, false),
            SharedInformationKind::CoutoGraSmAdjusted => {
                grasm::common_disjoint_ancestors(&self.ic, a, b, true)
            }
            SharedInformationKind::ExclusiveInherited => exclusive::exclusively_inherited(graph, a, b),
            SharedInformationKind::Frontier => frontier::frontier_ancestors(graph, a, b),
        };
        nodes.sort_unstable();
        trace!(kind = %self.kind, size = nodes.len(), "ancestor set");
        nodes
    }
}

/// Self-ancestors shared by `a` and `b`.
pub(crate) fn common_ancestors(graph: &TermGraph, a: NodeIndex, b: NodeIndex) -> HashSet<NodeIndex> {
    let left = graph.self_ancestors(a);
    let right = graph.self_ancestors(b);
    left.intersection(&right).copied().collect()
}

/// Mean IC of `nodes`; 0 for an empty slice.
#[allow(clippy::cast_precision_loss)]
fn mean_information(ic: &InformationContent, nodes: &[NodeIndex]) -> f64 {
    if nodes.is_empty() {
        return 0.0;
    }
    let total: f64 = nodes.iter().map(|&n| ic.information_at(n)).sum();
    total / nodes.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
