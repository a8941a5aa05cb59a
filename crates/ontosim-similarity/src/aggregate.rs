//! Set-to-set similarity.
//!
//! # Overview
//!
//! Aggregators score two term sets, e.g. the annotations of two gene
//! products. They come in three groups:
//!
//! - **Matrix reductions** score every pair with a [`TermSimilarity`] and
//!   reduce the matrix: best-match-average, average-best-match,
//!   all-pairs-max, all-pairs-average.
//! - **Set overlap**: Jaccard on the sets as given, Gentleman SimUI on their
//!   extended (ancestor-closed) sets. Both resolve alternate ids to their
//!   canonical term and drop ids the ontology does not know.
//! - **IC-weighted overlap** on extended sets: Mazandu SimDIC and SimUIC,
//!   Pesquita SimGIC.
//!
//! Inputs are deduplicated first. An empty set on either side scores `0.0`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ontosim_core::{InformationContent, OntologyError, TermGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::metric::TermSimilarity;

/// Selectable set aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetAggregatorKind {
    #[default]
    BestMatchAverage,
    AverageBestMatch,
    AllPairsMax,
    AllPairsAverage,
    Jaccard,
    #[serde(rename = "gentleman-simui")]
    GentlemanSimUi,
    #[serde(rename = "mazandu-simdic")]
    MazanduSimDic,
    #[serde(rename = "mazandu-simuic")]
    MazanduSimUic,
    #[serde(rename = "pesquita-simgic")]
    PesquitaSimGic,
}

impl SetAggregatorKind {
    pub const ALL: [Self; 9] = [
        Self::BestMatchAverage,
        Self::AverageBestMatch,
        Self::AllPairsMax,
        Self::AllPairsAverage,
        Self::Jaccard,
        Self::GentlemanSimUi,
        Self::MazanduSimDic,
        Self::MazanduSimUic,
        Self::PesquitaSimGic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BestMatchAverage => "best-match-average",
            Self::AverageBestMatch => "average-best-match",
            Self::AllPairsMax => "all-pairs-max",
            Self::AllPairsAverage => "all-pairs-average",
            Self::Jaccard => "jaccard",
            Self::GentlemanSimUi => "gentleman-simui",
            Self::MazanduSimDic => "mazandu-simdic",
            Self::MazanduSimUic => "mazandu-simuic",
            Self::PesquitaSimGic => "pesquita-simgic",
        }
    }

    /// Whether the aggregator scores pairs with a term metric.
    #[must_use]
    pub const fn uses_term_metric(self) -> bool {
        matches!(
            self,
            Self::BestMatchAverage | Self::AverageBestMatch | Self::AllPairsMax | Self::AllPairsAverage
        )
    }
}

impl fmt::Display for SetAggregatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetAggregatorKind {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "best-match-average" | "bma" => Ok(Self::BestMatchAverage),
            "average-best-match" | "abm" => Ok(Self::AverageBestMatch),
            "all-pairs-max" | "max" => Ok(Self::AllPairsMax),
            "all-pairs-average" | "avg" => Ok(Self::AllPairsAverage),
            "jaccard" => Ok(Self::Jaccard),
            "gentleman-simui" | "simui" => Ok(Self::GentlemanSimUi),
            "mazandu-simdic" | "simdic" => Ok(Self::MazanduSimDic),
            "mazandu-simuic" | "simuic" => Ok(Self::MazanduSimUic),
            "pesquita-simgic" | "simgic" => Ok(Self::PesquitaSimGic),
            _ => Err(OntologyError::InvalidValue {
                what: "set aggregator",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SetSimilarity
// ---------------------------------------------------------------------------

/// A set aggregator with the model it reads.
#[derive(Debug, Clone)]
pub enum SetSimilarity {
    BestMatchAverage(TermSimilarity),
    AverageBestMatch(TermSimilarity),
    AllPairsMax(TermSimilarity),
    AllPairsAverage(TermSimilarity),
    Jaccard(Arc<TermGraph>),
    GentlemanSimUi(Arc<TermGraph>),
    MazanduSimDic(Arc<InformationContent>),
    MazanduSimUic(Arc<InformationContent>),
    PesquitaSimGic(Arc<InformationContent>),
}

impl SetSimilarity {
    /// Build `kind`, taking from `metric` and `ic` whatever it needs.
    #[must_use]
    pub fn new(kind: SetAggregatorKind, metric: TermSimilarity, ic: Arc<InformationContent>) -> Self {
        match kind {
            SetAggregatorKind::BestMatchAverage => Self::BestMatchAverage(metric),
            SetAggregatorKind::AverageBestMatch => Self::AverageBestMatch(metric),
            SetAggregatorKind::AllPairsMax => Self::AllPairsMax(metric),
            SetAggregatorKind::AllPairsAverage => Self::AllPairsAverage(metric),
            SetAggregatorKind::Jaccard => Self::Jaccard(ic.shared_graph()),
            SetAggregatorKind::GentlemanSimUi => Self::GentlemanSimUi(ic.shared_graph()),
            SetAggregatorKind::MazanduSimDic => Self::MazanduSimDic(ic),
            SetAggregatorKind::MazanduSimUic => Self::MazanduSimUic(ic),
            SetAggregatorKind::PesquitaSimGic => Self::PesquitaSimGic(ic),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SetAggregatorKind {
        match self {
            Self::BestMatchAverage(_) => SetAggregatorKind::BestMatchAverage,
            Self::AverageBestMatch(_) => SetAggregatorKind::AverageBestMatch,
            Self::AllPairsMax(_) => SetAggregatorKind::AllPairsMax,
            Self::AllPairsAverage(_) => SetAggregatorKind::AllPairsAverage,
            Self::Jaccard(_) => SetAggregatorKind::Jaccard,
            Self::GentlemanSimUi(_) => SetAggregatorKind::GentlemanSimUi,
            Self::MazanduSimDic(_) => SetAggregatorKind::MazanduSimDic,
            Self::MazanduSimUic(_) => SetAggregatorKind::MazanduSimUic,
            Self::PesquitaSimGic(_) => SetAggregatorKind::PesquitaSimGic,
        }
    }

    /// The pair metric of a matrix reduction.
    #[must_use]
    pub const fn metric(&self) -> Option<&TermSimilarity> {
        match self {
            Self::BestMatchAverage(m)
            | Self::AverageBestMatch(m)
            | Self::AllPairsMax(m)
            | Self::AllPairsAverage(m) => Some(m),
            _ => None,
        }
    }

    /// Similarity of two term sets.
    #[must_use]
    #[instrument(skip_all, fields(aggregator = %self.kind(), left = a.len(), right = b.len()))]
    pub fn similarity<T: AsRef<str>>(&self, a: &[T], b: &[T]) -> f64 {
        let left: BTreeSet<&str> = a.iter().map(|id| id.as_ref()).collect();
        let right: BTreeSet<&str> = b.iter().map(|id| id.as_ref()).collect();
        if left.is_empty() || right.is_empty() {
            debug!("empty term set");
            return 0.0;
        }

        match self {
            Self::BestMatchAverage(m) => best_match_average(&matrix(m, &left, &right)),
            Self::AverageBestMatch(m) => average_best_match(&matrix(m, &left, &right)),
            Self::AllPairsMax(m) => matrix(m, &left, &right)
                .iter()
                .flatten()
                .copied()
                .fold(0.0, f64::max),
            Self::AllPairsAverage(m) => mean(matrix(m, &left, &right).iter().flatten().copied()),
            Self::Jaccard(graph) => {
                let left = canonical_set(graph, &left);
                let right = canonical_set(graph, &right);
                jaccard(&left, &right)
            }
            Self::GentlemanSimUi(graph) => {
                let left = graph.extended_term_set(left.iter().copied());
                let right = graph.extended_term_set(right.iter().copied());
                jaccard(&left, &right)
            }
            Self::MazanduSimDic(ic) => {
                let sums = InformationSums::new(ic, &left, &right);
                ratio(2.0 * sums.shared, sums.left + sums.right)
            }
            Self::MazanduSimUic(ic) => {
                let sums = InformationSums::new(ic, &left, &right);
                ratio(sums.shared, sums.left.max(sums.right))
            }
            Self::PesquitaSimGic(ic) => {
                let sums = InformationSums::new(ic, &left, &right);
                ratio(sums.shared, sums.union)
            }
        }
    }
}

fn matrix(metric: &TermSimilarity, left: &BTreeSet<&str>, right: &BTreeSet<&str>) -> Vec<Vec<f64>> {
    let left: Vec<&str> = left.iter().copied().collect();
    let right: Vec<&str> = right.iter().copied().collect();
    metric.similarity_matrix(&left, &right)
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

fn row_maxima(matrix: &[Vec<f64>]) -> impl Iterator<Item = f64> + '_ {
    matrix.iter().map(|row| row.iter().copied().fold(0.0, f64::max))
}

fn column_maxima(matrix: &[Vec<f64>]) -> Vec<f64> {
    let width = matrix.first().map_or(0, Vec::len);
    let mut maxima = vec![0.0f64; width];
    for row in matrix {
        for (best, &value) in maxima.iter_mut().zip(row) {
            *best = best.max(value);
        }
    }
    maxima
}

/// Mean of the two directional best-match averages.
fn best_match_average(matrix: &[Vec<f64>]) -> f64 {
    let forward = mean(row_maxima(matrix));
    let backward = mean(column_maxima(matrix));
    (forward + backward) / 2.0
}

/// One mean over every row and column best match.
fn average_best_match(matrix: &[Vec<f64>]) -> f64 {
    mean(row_maxima(matrix).chain(column_maxima(matrix)))
}

#[allow(clippy::cast_precision_loss)]
fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn canonical_set<'g>(graph: &'g TermGraph, ids: &BTreeSet<&str>) -> BTreeSet<&'g str> {
    ids.iter()
        .filter_map(|id| graph.index_of(id).and_then(|idx| graph.term_id(idx)))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn jaccard(left: &BTreeSet<&str>, right: &BTreeSet<&str>) -> f64 {
    let union = left.union(right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / union as f64
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 { 0.0 } else { numerator / denominator }
}

/// IC totals over the extended sets of two term sets.
struct InformationSums {
    left: f64,
    right: f64,
    shared: f64,
    union: f64,
}

impl InformationSums {
    fn new(ic: &InformationContent, left: &BTreeSet<&str>, right: &BTreeSet<&str>) -> Self {
        let graph = ic.graph();
        let left = graph.extended_term_set(left.iter().copied());
        let right = graph.extended_term_set(right.iter().copied());
        Self {
            left: total_information(ic, left.iter()),
            right: total_information(ic, right.iter()),
            shared: total_information(ic, left.intersection(&right)),
            union: total_information(ic, left.union(&right)),
        }
    }
}

fn total_information<'a, I>(ic: &InformationContent, ids: I) -> f64
where
    I: Iterator<Item = &'a &'a str>,
{
    ids.map(|id| ic.term_information(id)).sum()
}
