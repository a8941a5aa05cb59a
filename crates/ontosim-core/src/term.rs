//! Term records, namespaces, and relationship kinds.
//!
//! A [`TermRecord`] is what an ontology reader hands to the graph builder:
//! one term with its namespace, display metadata, and outgoing relations.
//! Records are plain data and carry no graph state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OntologyError;

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// One of the three disjoint top-level categories of the ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Namespace {
    BiologicalProcess,
    MolecularFunction,
    CellularComponent,
}

impl Namespace {
    /// All namespaces in a stable order.
    pub const ALL: [Self; 3] = [
        Self::BiologicalProcess,
        Self::MolecularFunction,
        Self::CellularComponent,
    ];

    /// Canonical OBO spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BiologicalProcess => "biological_process",
            Self::MolecularFunction => "molecular_function",
            Self::CellularComponent => "cellular_component",
        }
    }

    /// Two-letter abbreviation used in GO tooling.
    #[must_use]
    pub const fn short(self) -> &'static str {
        match self {
            Self::BiologicalProcess => "BP",
            Self::MolecularFunction => "MF",
            Self::CellularComponent => "CC",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biological_process" | "bp" | "process" | "p" => Ok(Self::BiologicalProcess),
            "molecular_function" | "mf" | "function" | "f" => Ok(Self::MolecularFunction),
            "cellular_component" | "cc" | "component" | "c" => Ok(Self::CellularComponent),
            _ => Err(OntologyError::InvalidValue {
                what: "namespace",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Namespace {
    type Error = OntologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// RelationshipKind
// ---------------------------------------------------------------------------

/// The tag on a child → parent edge.
///
/// Kinds outside the well-known GO set are kept verbatim in
/// [`RelationshipKind::Other`] so a policy can still name them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    IsA,
    PartOf,
    Regulates,
    PositivelyRegulates,
    NegativelyRegulates,
    HasPart,
    OccursIn,
    Other(String),
}

impl RelationshipKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::IsA => "is_a",
            Self::PartOf => "part_of",
            Self::Regulates => "regulates",
            Self::PositivelyRegulates => "positively_regulates",
            Self::NegativelyRegulates => "negatively_regulates",
            Self::HasPart => "has_part",
            Self::OccursIn => "occurs_in",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RelationshipKind {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "is_a" | "isa" => Self::IsA,
            "part_of" => Self::PartOf,
            "regulates" => Self::Regulates,
            "positively_regulates" => Self::PositivelyRegulates,
            "negatively_regulates" => Self::NegativelyRegulates,
            "has_part" => Self::HasPart,
            "occurs_in" => Self::OccursIn,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for RelationshipKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RelationshipKind> for String {
    fn from(value: RelationshipKind) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One outgoing relation of a term record: `kind` edge to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub target: String,
    pub kind: RelationshipKind,
}

impl Relation {
    pub fn new(target: impl Into<String>, kind: impl Into<RelationshipKind>) -> Self {
        Self {
            target: target.into(),
            kind: kind.into(),
        }
    }

    pub fn is_a(target: impl Into<String>) -> Self {
        Self::new(target, RelationshipKind::IsA)
    }
}

/// A parsed ontology term, as produced by an ontology reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: String,
    pub namespace: Namespace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_ids: Vec<String>,
    #[serde(default)]
    pub obsolete: bool,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl TermRecord {
    pub fn new(id: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            id: id.into(),
            namespace,
            name: None,
            definition: None,
            alt_ids: Vec::new(),
            obsolete: false,
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Shorthand for adding an `is_a` relation.
    #[must_use]
    pub fn is_a(self, parent: impl Into<String>) -> Self {
        self.with_relation(Relation::is_a(parent))
    }
}

/// A term as stored in a built graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub id: String,
    pub namespace: Namespace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}
