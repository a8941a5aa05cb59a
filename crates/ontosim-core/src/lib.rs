#![forbid(unsafe_code)]
//! ontosim-core library.
//!
//! The ontology graph and the information content model that every
//! similarity measure in `ontosim-similarity` is built on.
//!
//! # Conventions
//!
//! - **Errors**: construction errors are [`OntologyError`]; queries return
//!   sentinels (empty sets, `false`, `0.0`) instead of failing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! ```rust
//! use std::sync::Arc;
//! use ontosim_core::{
//!     AnnotationCorpus, InformationContent, Namespace, Propagation, RelationshipPolicy,
//!     TermGraph, TermRecord,
//! };
//!
//! let bp = Namespace::BiologicalProcess;
//! let records = vec![
//!     TermRecord::new("Root", bp),
//!     TermRecord::new("Mid", bp).is_a("Root"),
//!     TermRecord::new("Leaf1", bp).is_a("Mid"),
//!     TermRecord::new("Leaf2", bp).is_a("Mid"),
//! ];
//! let graph = Arc::new(TermGraph::from_records(&records, RelationshipPolicy::default())?);
//! let corpus = AnnotationCorpus::from_counts([("Leaf1", 4), ("Leaf2", 6)]);
//! let ic = InformationContent::new(graph, &corpus, Propagation::Dag);
//!
//! assert!((ic.term_information("Leaf1") + 0.4f64.ln()).abs() < 1e-12);
//! # Ok::<(), ontosim_core::OntologyError>(())
//! ```

pub mod annotation;
pub mod error;
pub mod graph;
pub mod information;
pub mod obo;
pub mod policy;
pub mod term;

pub use annotation::AnnotationCorpus;
pub use error::OntologyError;
pub use graph::{TermGraph, TermGraphBuilder};
pub use information::{InformationContent, Propagation, TermInformation};
pub use obo::{OboError, parse_obo};
pub use policy::RelationshipPolicy;
pub use term::{Namespace, Relation, RelationshipKind, Term, TermRecord};

/// Node handle used by the index-level graph API.
pub use petgraph::graph::NodeIndex;
