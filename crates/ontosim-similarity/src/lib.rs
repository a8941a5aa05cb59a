#![forbid(unsafe_code)]
//! ontosim-similarity library.
//!
//! Semantic similarity on top of an [`ontosim_core::InformationContent`]
//! model, in three layers:
//!
//! 1. [`shared`]: shared-information strategies (which common ancestors
//!    count, and their mean IC).
//! 2. [`metric`]: term-pair metrics built on a strategy.
//! 3. [`aggregate`]: set-to-set aggregators built on a metric or directly
//!    on the IC model.
//!
//! Every layer is selected by a kind enum that parses from its kebab-case
//! name, and every scorer is `Send + Sync` so batches can fan out across
//! threads over one shared model.
//!
//! # Conventions
//!
//! - **Errors**: scoring never fails; invalid pairs and empty sets score
//!   `0.0`. Kind parsing returns [`ontosim_core::OntologyError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! ```rust
//! use std::sync::Arc;
//! use ontosim_core::{
//!     AnnotationCorpus, InformationContent, Namespace, Propagation, RelationshipPolicy,
//!     TermGraph, TermRecord,
//! };
//! use ontosim_similarity::{
//!     SetAggregatorKind, SetSimilarity, SharedInformation, SharedInformationKind,
//!     TermMetricKind, TermSimilarity,
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
//! let ic = Arc::new(InformationContent::new(graph, &corpus, Propagation::Dag));
//!
//! let shared = SharedInformation::new(SharedInformationKind::AncestorMean, Arc::clone(&ic));
//! let resnik = TermSimilarity::new(TermMetricKind::Resnik, shared);
//! assert_eq!(resnik.similarity("Leaf1", "Leaf2"), 0.0);
//!
//! let simui = SetSimilarity::new(SetAggregatorKind::GentlemanSimUi, resnik, ic);
//! assert!((simui.similarity(&["Leaf1"], &["Leaf2"]) - 0.5).abs() < 1e-12);
//! # Ok::<(), ontosim_core::OntologyError>(())
//! ```

pub mod aggregate;
pub mod metric;
pub mod shared;

pub use aggregate::{SetAggregatorKind, SetSimilarity};
pub use metric::{TermMetricKind, TermSimilarity};
pub use shared::{SharedInformation, SharedInformationKind};
