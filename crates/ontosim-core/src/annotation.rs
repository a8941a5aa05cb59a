//! Annotation corpus: which entities are annotated to which terms.
//!
//! A corpus can hold two kinds of evidence at once:
//!
//! - **Named annotations** `(entity, term)`. Propagation deduplicates by
//!   entity, so an entity annotated to two terms with a shared ancestor
//!   counts once at that ancestor.
//! - **Anonymous counts** `term → n`, for corpora that were aggregated
//!   before they reached us. These cannot be deduplicated and are added as is.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Raw, unpropagated annotations keyed by term id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationCorpus {
    /// Anonymous per-term counts.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    counts: BTreeMap<String, u64>,
    /// Entity → the terms it is annotated with.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    annotations: BTreeMap<String, BTreeSet<String>>,
}

impl AnnotationCorpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus of anonymous per-term counts.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut corpus = Self::new();
        for (term, n) in counts {
            corpus.add_count(term, n);
        }
        corpus
    }

    /// Corpus of `(entity, term)` pairs.
    pub fn from_annotations<I, E, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, T)>,
        E: Into<String>,
        T: Into<String>,
    {
        let mut corpus = Self::new();
        for (entity, term) in pairs {
            corpus.annotate(entity, term);
        }
        corpus
    }

    /// Add `n` anonymous annotations to `term`.
    pub fn add_count(&mut self, term: impl Into<String>, n: u64) {
        let count = self.counts.entry(term.into()).or_insert(0);
        *count = count.saturating_add(n);
    }

    /// Record that `entity` is annotated with `term`. Repeats are ignored.
    pub fn annotate(&mut self, entity: impl Into<String>, term: impl Into<String>) {
        self.annotations
            .entry(entity.into())
            .or_default()
            .insert(term.into());
    }

    /// Anonymous counts, by term.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(term, &n)| (term.as_str(), n))
    }

    /// Named annotations, by entity.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.annotations
            .iter()
            .map(|(entity, terms)| (entity.as_str(), terms))
    }

    /// Terms an entity is annotated with.
    #[must_use]
    pub fn terms_of(&self, entity: &str) -> Option<&BTreeSet<String>> {
        self.annotations.get(entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&n| n == 0) && self.annotations.is_empty()
    }

    /// Unpropagated annotation total for `term`: its anonymous count plus
    /// the number of distinct entities annotated with it.
    #[must_use]
    pub fn direct_count(&self, term: &str) -> u64 {
        let anonymous = self.counts.get(term).copied().unwrap_or(0);
        let named = self
            .annotations
            .values()
            .filter(|terms| terms.contains(term))
            .count() as u64;
        anonymous.saturating_add(named)
    }
}
