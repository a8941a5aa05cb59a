//! Reading ontology and corpus files into core types.

use anyhow::{Context, Result};
use ontosim_core::{
    AnnotationCorpus, InformationContent, Propagation, RelationshipPolicy, TermGraph, TermRecord,
    parse_obo,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read term records: JSON arrays for `.json` files, OBO otherwise.
pub fn read_records(path: &Path) -> Result<Vec<TermRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse term records in {}", path.display()))
    } else {
        parse_obo(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Build a term graph from an ontology file.
#[instrument(skip(policy), fields(path = %path.display()))]
pub fn load_graph(path: &Path, policy: RelationshipPolicy) -> Result<Arc<TermGraph>> {
    let records = read_records(path)?;
    let graph = TermGraph::from_records(&records, policy)
        .with_context(|| format!("building term graph from {}", path.display()))?;
    info!(
        terms = graph.term_count(),
        relationships = graph.relationship_count(),
        "ontology loaded"
    );
    Ok(Arc::new(graph))
}

/// Read an annotation corpus. No path means an empty corpus, under which
/// every term has zero information content.
pub fn load_corpus(path: Option<&Path>) -> Result<AnnotationCorpus> {
    let Some(path) = path else {
        warn!("no corpus given; information content is zero for every term");
        return Ok(AnnotationCorpus::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let corpus: AnnotationCorpus = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus {}", path.display()))?;
    if corpus.is_empty() {
        warn!(path = %path.display(), "corpus holds no annotations");
    }
    Ok(corpus)
}

/// Graph plus information content, the input of every similarity command.
pub fn load_model(
    ontology: &Path,
    corpus: Option<&Path>,
    policy: RelationshipPolicy,
    propagation: Propagation,
) -> Result<Arc<InformationContent>> {
    let graph = load_graph(ontology, policy)?;
    let corpus = load_corpus(corpus)?;
    Ok(Arc::new(InformationContent::new(graph, &corpus, propagation)))
}
