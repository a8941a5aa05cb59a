//! Error types for ontology construction and lookup.
//!
//! Structural problems found while building the graph are fatal and surface
//! as [`OntologyError`]. Per-query anomalies (unknown terms, cross-namespace
//! pairs) never reach this type: queries return empty sets or `0.0` instead.
//! The only read operation that reports an error is a single-value lookup such
//! as [`crate::graph::TermGraph::term_root`].

use crate::term::Namespace;

/// Errors raised while building or indexing a [`crate::graph::TermGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OntologyError {
    /// The relationship policy allows no relationship kinds at all.
    #[error("relationship policy allows no relationship kinds")]
    EmptyPolicy,

    /// A term was re-inserted under a different namespace.
    #[error("term {term} already belongs to {existing}, cannot move it to {requested}")]
    NamespaceConflict {
        term: String,
        existing: Namespace,
        requested: Namespace,
    },

    /// A lookup or relationship referenced a term the graph does not hold.
    #[error("unknown term: {0}")]
    UnknownTerm(String),

    /// A parent was referenced by a relationship but never described.
    #[error("term {0} is referenced as a parent but has no record")]
    UnresolvedTerm(String),

    /// The relationships form a cycle through the given term.
    #[error("relationship cycle detected through term {0}")]
    CycleDetected(String),

    /// A namespace has more than one parentless term.
    #[error("namespace {namespace} has {} candidate roots: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousRoot {
        namespace: Namespace,
        candidates: Vec<String>,
    },

    /// A namespace, relationship kind, or strategy name failed to parse.
    #[error("invalid {what} value: {value}")]
    InvalidValue { what: &'static str, value: String },
}

impl OntologyError {
    /// Stable code identifier (`O####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyPolicy => "O1001",
            Self::InvalidValue { .. } => "O1002",
            Self::NamespaceConflict { .. } => "O2001",
            Self::UnresolvedTerm(_) => "O2002",
            Self::CycleDetected(_) => "O2003",
            Self::AmbiguousRoot { .. } => "O2004",
            Self::UnknownTerm(_) => "O3001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyPolicy => Some("Allow at least `is_a` in [graph].relationships."),
            Self::NamespaceConflict { .. } => {
                Some("Check the ontology file for duplicate records with different namespaces.")
            }
            Self::UnresolvedTerm(_) => {
                Some("The ontology file is truncated or references a term from another release.")
            }
            Self::CycleDetected(_) => {
                Some("Narrow the relationship policy; some relationship kinds are not acyclic.")
            }
            Self::AmbiguousRoot { .. } => Some(
                "Every namespace needs exactly one parentless term under the chosen relationship policy.",
            ),
            Self::InvalidValue { .. } => Some("Run `osim --help` for the accepted names."),
            Self::UnknownTerm(_) => None,
        }
    }
}
