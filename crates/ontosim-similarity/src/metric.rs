//! Term-pair similarity metrics.
//!
//! | Metric | Score |
//! |--------|-------|
//! | Resnik | `s` |
//! | Lin | `2s / (IC(a) + IC(b))` |
//! | Jiang-Conrath | `1 / (1 + IC(a) + IC(b) − 2s)` |
//! | Relevance | `Lin · (1 − e^−s)` |
//! | Pekar-Staab | `depth(L) / (depth(a) + depth(b) − depth(L))` |
//!
//! `s` is the shared information of the pair under the chosen strategy and
//! `L` the deepest common self-ancestor. Pekar-Staab reads graph depth only.
//! Invalid pairs score `0.0` under every metric.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ontosim_core::{NodeIndex, OntologyError, TermGraph};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::shared::{SharedInformation, common_ancestors};

/// Selectable term similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermMetricKind {
    Resnik,
    #[default]
    Lin,
    JiangConrath,
    Relevance,
    PekarStaab,
}

impl TermMetricKind {
    pub const ALL: [Self; 5] = [
        Self::Resnik,
        Self::Lin,
        Self::JiangConrath,
        Self::Relevance,
        Self::PekarStaab,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resnik => "resnik",
            Self::Lin => "lin",
            Self::JiangConrath => "jiang-conrath",
            Self::Relevance => "relevance",
            Self::PekarStaab => "pekar-staab",
        }
    }

    /// Whether the metric reads information content at all.
    #[must_use]
    pub const fn uses_information(self) -> bool {
        !matches!(self, Self::PekarStaab)
    }
}

impl fmt::Display for TermMetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermMetricKind {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "resnik" => Ok(Self::Resnik),
            "lin" => Ok(Self::Lin),
            "jiang-conrath" | "jiang" | "jc" => Ok(Self::JiangConrath),
            "relevance" | "rel" => Ok(Self::Relevance),
            "pekar-staab" | "pekar" => Ok(Self::PekarStaab),
            _ => Err(OntologyError::InvalidValue {
                what: "term metric",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TermSimilarity
// ---------------------------------------------------------------------------

/// A term similarity metric with everything it needs to score pairs.
#[derive(Debug, Clone)]
pub enum TermSimilarity {
    Resnik(SharedInformation),
    Lin(SharedInformation),
    JiangConrath(SharedInformation),
    Relevance(SharedInformation),
    PekarStaab(Arc<TermGraph>),
}

impl TermSimilarity {
    /// Bind `kind` to a strategy. Pekar-Staab keeps only the strategy's
    /// graph.
    #[must_use]
    pub fn new(kind: TermMetricKind, shared: SharedInformation) -> Self {
        match kind {
            TermMetricKind::Resnik => Self::Resnik(shared),
            TermMetricKind::Lin => Self::Lin(shared),
            TermMetricKind::JiangConrath => Self::JiangConrath(shared),
            TermMetricKind::Relevance => Self::Relevance(shared),
            TermMetricKind::PekarStaab => {
                Self::PekarStaab(shared.shared_information_content().shared_graph())
            }
        }
    }

    /// Pekar-Staab needs no annotation data.
    #[must_use]
    pub const fn pekar_staab(graph: Arc<TermGraph>) -> Self {
        Self::PekarStaab(graph)
    }

    #[must_use]
    pub const fn kind(&self) -> TermMetricKind {
        match self {
            Self::Resnik(_) => TermMetricKind::Resnik,
            Self::Lin(_) => TermMetricKind::Lin,
            Self::JiangConrath(_) => TermMetricKind::JiangConrath,
            Self::Relevance(_) => TermMetricKind::Relevance,
            Self::PekarStaab(_) => TermMetricKind::PekarStaab,
        }
    }

    /// The strategy behind an IC metric; `None` for Pekar-Staab.
    #[must_use]
    pub const fn shared(&self) -> Option<&SharedInformation> {
        match self {
            Self::Resnik(s) | Self::Lin(s) | Self::JiangConrath(s) | Self::Relevance(s) => Some(s),
            Self::PekarStaab(_) => None,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        match self {
            Self::Resnik(s) | Self::Lin(s) | Self::JiangConrath(s) | Self::Relevance(s) => s.graph(),
            Self::PekarStaab(g) => g.as_ref(),
        }
    }

    /// Similarity of two term ids; `0.0` for invalid pairs.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let graph = self.graph();
        match (graph.index_of(a), graph.index_of(b)) {
            (Some(ia), Some(ib)) => self.similarity_at(ia, ib),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn similarity_at(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        match self {
            Self::Resnik(shared) => shared.shared_information_at(a, b),
            Self::Lin(shared) => {
                let Some((ia, ib, s)) = information_triple(shared, a, b) else {
                    return 0.0;
                };
                lin(ia, ib, s)
            }
            Self::JiangConrath(shared) => {
                let Some((ia, ib, s)) = information_triple(shared, a, b) else {
                    return 0.0;
                };
                1.0 / (1.0 + (ia + ib - 2.0 * s).max(0.0))
            }
            Self::Relevance(shared) => {
                let Some((ia, ib, s)) = information_triple(shared, a, b) else {
                    return 0.0;
                };
                lin(ia, ib, s) * (1.0 - (-s).exp())
            }
            Self::PekarStaab(graph) => pekar_staab(graph, a, b),
        }
    }

    /// Similarity scaled into `[0, 1]`.
    ///
    /// Resnik is divided by the largest IC of the namespace. The other
    /// metrics are clamped; only a term without annotations, whose IC is 0
    /// while its ancestors' is not, can push Lin or Relevance past 1.
    #[must_use]
    pub fn normalized_similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            Self::Resnik(shared) => {
                let max = shared.information().max_information_content(a);
                if max <= 0.0 {
                    return 0.0;
                }
                (shared.shared_information(a, b) / max).clamp(0.0, 1.0)
            }
            _ => self.similarity(a, b).clamp(0.0, 1.0),
        }
    }

    /// Raw `|a| × |b|` score matrix, rows in `a` order, columns in `b`
    /// order. Duplicates are scored, not removed.
    #[must_use]
    #[instrument(skip_all, fields(metric = %self.kind(), rows = a.len(), cols = b.len()))]
    pub fn similarity_matrix<T: AsRef<str>>(&self, a: &[T], b: &[T]) -> Vec<Vec<f64>> {
        let graph = self.graph();
        let columns: Vec<Option<NodeIndex>> = b.iter().map(|id| graph.index_of(id.as_ref())).collect();
        a.iter()
            .map(|row| {
                let row = graph.index_of(row.as_ref());
                columns
                    .iter()
                    .map(|col| match (row, col) {
                        (Some(r), Some(c)) => self.similarity_at(r, *c),
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect()
    }
}

/// `(IC(a), IC(b), shared)` for a valid pair.
fn information_triple(shared: &SharedInformation, a: NodeIndex, b: NodeIndex) -> Option<(f64, f64, f64)> {
    let ic = shared.information();
    if !ic.validate_indices(a, b) {
        return None;
    }
    Some((
        ic.information_at(a),
        ic.information_at(b),
        shared.shared_information_at(a, b),
    ))
}

fn lin(ia: f64, ib: f64, shared: f64) -> f64 {
    let denominator = ia + ib;
    if denominator <= 0.0 {
        return 0.0;
    }
    2.0 * shared / denominator
}

#[allow(clippy::cast_precision_loss)]
fn pekar_staab(graph: &TermGraph, a: NodeIndex, b: NodeIndex) -> f64 {
    if !graph.same_namespace(a, b) {
        return 0.0;
    }
    let deepest = common_ancestors(graph, a, b).into_iter().max_by(|&x, &y| {
        graph
            .depth_at(x)
            .cmp(&graph.depth_at(y))
            .then_with(|| graph.term_id(y).cmp(&graph.term_id(x)))
    });
    let Some(lca) = deepest else {
        return 0.0;
    };

    let shared = graph.depth_at(lca);
    let denominator = graph.depth_at(a) + graph.depth_at(b) - shared;
    if denominator == 0 {
        return 0.0;
    }
    shared as f64 / denominator as f64
}
