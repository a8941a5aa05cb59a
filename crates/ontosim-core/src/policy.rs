//! Relationship filtering policy.
//!
//! The policy decides which relationship kinds become graph edges. Edges of
//! any other kind are dropped before they reach the graph, so closures,
//! depths, and path counts only ever see allowed kinds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::OntologyError;
use crate::term::RelationshipKind;

/// The set of relationship kinds allowed into a term graph.
///
/// Defaults to `{is_a}`. An empty policy is rejected by
/// [`RelationshipPolicy::new`] and by
/// [`crate::graph::TermGraphBuilder::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipPolicy {
    allowed: BTreeSet<RelationshipKind>,
}

impl RelationshipPolicy {
    /// Build a policy from the given kinds.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::EmptyPolicy`] when `kinds` is empty.
    pub fn new<I, K>(kinds: I) -> Result<Self, OntologyError>
    where
        I: IntoIterator<Item = K>,
        K: Into<RelationshipKind>,
    {
        let policy = Self {
            allowed: kinds.into_iter().map(Into::into).collect(),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// `is_a` and `part_of`, the usual choice for GO semantic similarity.
    #[must_use]
    pub fn is_a_part_of() -> Self {
        Self {
            allowed: [RelationshipKind::IsA, RelationshipKind::PartOf]
                .into_iter()
                .collect(),
        }
    }

    /// Check the policy is usable. Deserialized policies bypass
    /// [`RelationshipPolicy::new`], so the builder calls this again.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::EmptyPolicy`] when no kind is allowed.
    pub fn validate(&self) -> Result<(), OntologyError> {
        if self.allowed.is_empty() {
            return Err(OntologyError::EmptyPolicy);
        }
        Ok(())
    }

    #[must_use]
    pub fn allows(&self, kind: &RelationshipKind) -> bool {
        self.allowed.contains(kind)
    }

    pub fn allowed(&self) -> impl Iterator<Item = &RelationshipKind> {
        self.allowed.iter()
    }
}

impl Default for RelationshipPolicy {
    fn default() -> Self {
        Self {
            allowed: std::iter::once(RelationshipKind::IsA).collect(),
        }
    }
}
