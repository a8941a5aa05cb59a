//! Similarity on small hand-built ontologies with hand-computed answers.

use std::collections::BTreeSet;
use std::sync::Arc;

use ontosim_core::{
    AnnotationCorpus, InformationContent, Namespace, Propagation, RelationshipPolicy, TermGraph,
    TermRecord,
};
use ontosim_similarity::{
    SetAggregatorKind, SetSimilarity, SharedInformation, SharedInformationKind, TermMetricKind,
    TermSimilarity,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const BP: Namespace = Namespace::BiologicalProcess;
const MF: Namespace = Namespace::MolecularFunction;
const EPSILON: f64 = 1e-12;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// `Root ← Mid ← {Leaf1, Leaf2}` with Leaf1=4, Leaf2=6, plus an MF root.
fn toy(propagation: Propagation) -> Arc<InformationContent> {
    let records = vec![
        TermRecord::new("Root", BP),
        TermRecord::new("Mid", BP).is_a("Root"),
        TermRecord::new("Leaf1", BP).is_a("Mid"),
        TermRecord::new("Leaf2", BP).is_a("Mid"),
        TermRecord::new("Binding", MF),
    ];
    let graph = Arc::new(TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph"));
    let corpus = AnnotationCorpus::from_counts([("Leaf1", 4), ("Leaf2", 6), ("Binding", 3)]);
    Arc::new(InformationContent::new(graph, &corpus, propagation))
}

/// Two branches joined by a shared child:
///
/// ```text
/// a, b  is_a root
/// ab    is_a a, b
/// x     is_a a
/// y     is_a b
/// p     is_a x, ab
/// q     is_a y, ab
/// ```
///
/// One entity annotated to each term.
fn braided() -> Arc<InformationContent> {
    let records = vec![
        TermRecord::new("root", BP),
        TermRecord::new("a", BP).is_a("root"),
        TermRecord::new("b", BP).is_a("root"),
        TermRecord::new("ab", BP).is_a("a").is_a("b"),
        TermRecord::new("x", BP).is_a("a"),
        TermRecord::new("y", BP).is_a("b"),
        TermRecord::new("p", BP).is_a("x").is_a("ab"),
        TermRecord::new("q", BP).is_a("y").is_a("ab"),
    ];
    let graph = Arc::new(TermGraph::from_records(&records, RelationshipPolicy::default()).expect("graph"));
    let corpus = AnnotationCorpus::from_annotations([
        ("g1", "p"),
        ("g2", "q"),
        ("g3", "x"),
        ("g4", "y"),
        ("g5", "ab"),
        ("g6", "a"),
        ("g7", "b"),
        ("g8", "root"),
    ]);
    Arc::new(InformationContent::new(graph, &corpus, Propagation::Dag))
}

fn cda(ic: &Arc<InformationContent>, kind: SharedInformationKind, a: &str, b: &str) -> BTreeSet<String> {
    SharedInformation::new(kind, Arc::clone(ic))
        .common_disjoint_ancestors(a, b)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Toy ontology
// ---------------------------------------------------------------------------

#[test]
fn toy_information_content_under_both_propagations() {
    for propagation in [Propagation::Dag, Propagation::Tree] {
        let ic = toy(propagation);
        assert!(close(ic.term_information("Root"), 0.0));
        assert!(close(ic.term_information("Mid"), 0.0));
        assert!(close(ic.term_information("Leaf1"), -(0.4f64.ln())));
        assert!(close(ic.term_information("Leaf2"), -(0.6f64.ln())));
    }
}

#[test]
fn toy_leaves_share_no_information() {
    let ic = toy(Propagation::Dag);
    let shared = SharedInformation::new(SharedInformationKind::AncestorMean, Arc::clone(&ic));
    assert_eq!(shared.shared_information("Leaf1", "Leaf2"), 0.0);

    for kind in SharedInformationKind::ALL {
        let resnik = TermSimilarity::new(
            TermMetricKind::Resnik,
            SharedInformation::new(kind, Arc::clone(&ic)),
        );
        assert!(close(resnik.similarity("Leaf1", "Leaf2"), 0.0), "{kind}");
    }
}

#[test]
fn toy_extended_jaccard_is_one_half() {
    let ic = toy(Propagation::Dag);
    let metric = TermSimilarity::new(
        TermMetricKind::Lin,
        SharedInformation::new(SharedInformationKind::CoutoGraSm, Arc::clone(&ic)),
    );
    let simui = SetSimilarity::new(SetAggregatorKind::GentlemanSimUi, metric, ic);
    assert!(close(simui.similarity(&["Leaf1"], &["Leaf2"]), 0.5));
}

#[test]
fn cross_namespace_pairs_score_zero_everywhere() {
    let ic = toy(Propagation::Dag);
    assert!(!ic.validate_terms("Leaf1", "Binding"));
    for strategy in SharedInformationKind::ALL {
        let shared = SharedInformation::new(strategy, Arc::clone(&ic));
        assert_eq!(shared.shared_information("Leaf1", "Binding"), 0.0);
        for metric in TermMetricKind::ALL {
            let m = TermSimilarity::new(metric, shared.clone());
            assert_eq!(m.similarity("Leaf1", "Binding"), 0.0, "{strategy}/{metric}");
            assert_eq!(m.similarity("Binding", "Leaf1"), 0.0, "{strategy}/{metric}");
        }
    }
}

// ---------------------------------------------------------------------------
// Braided ontology
// ---------------------------------------------------------------------------

#[test]
fn braided_information_content() {
    let ic = braided();
    assert_eq!(ic.annotation_count("root"), 8);
    assert_eq!(ic.annotation_count("a"), 5); // p, q, x, ab, a
    assert_eq!(ic.annotation_count("b"), 5); // p, q, y, ab, b
    assert_eq!(ic.annotation_count("ab"), 3); // p, q, ab
}

#[test]
fn braided_ancestor_mean_takes_everything_shared() {
    let ic = braided();
    assert_eq!(
        cda(&ic, SharedInformationKind::AncestorMean, "p", "q"),
        set(&["a", "ab", "b", "root"])
    );
}

#[test]
fn braided_grasm_keeps_branches_with_independent_paths() {
    let ic = braided();
    // ab first; a and b each reach p around ab through x (or q through y),
    // root reaches both through several paths.
    assert_eq!(
        cda(&ic, SharedInformationKind::CoutoGraSm, "p", "q"),
        set(&["a", "ab", "b", "root"])
    );
    assert_eq!(
        cda(&ic, SharedInformationKind::CoutoGraSmAdjusted, "p", "q"),
        set(&["a", "ab", "b", "root"])
    );
}

#[test]
fn braided_linear_strategies_find_the_divergence_points() {
    let ic = braided();
    for kind in [SharedInformationKind::ExclusiveInherited, SharedInformationKind::Frontier] {
        // ab has children p and q; a has x (p only); b has y (q only).
        assert_eq!(cda(&ic, kind, "p", "q"), set(&["a", "ab", "b"]), "{kind}");
    }
}

#[test]
fn adjusted_grasm_drops_an_ancestor_covered_by_a_chain() {
    let ic = braided();
    // every path from root down to a or to x passes through a
    assert_eq!(
        cda(&ic, SharedInformationKind::CoutoGraSm, "x", "a"),
        set(&["a", "root"])
    );
    assert_eq!(
        cda(&ic, SharedInformationKind::CoutoGraSmAdjusted, "x", "a"),
        set(&["a"])
    );
}

#[test]
fn pekar_staab_on_the_braid() {
    let ic = braided();
    let metric = TermSimilarity::pekar_staab(ic.shared_graph());
    // depth: root 0, a/b 1, ab/x/y 2, p/q 3; deepest common ancestor of p,q is ab
    assert!(close(metric.similarity("p", "q"), 2.0 / (3.0 + 3.0 - 2.0)));
    assert!(close(metric.normalized_similarity("p", "q"), 0.5));
}

#[test]
fn set_aggregators_on_the_braid() {
    let ic = braided();
    let metric = TermSimilarity::new(
        TermMetricKind::Lin,
        SharedInformation::new(SharedInformationKind::CoutoGraSm, Arc::clone(&ic)),
    );
    let lin_pq = metric.similarity("p", "q");
    let lin_xq = metric.similarity("x", "q");

    let bma = SetSimilarity::new(SetAggregatorKind::BestMatchAverage, metric.clone(), Arc::clone(&ic));
    // rows {p, x} vs column {q}: row maxima lin_pq, lin_xq; column max max(lin_pq, lin_xq)
    let expected = ((lin_pq + lin_xq) / 2.0 + lin_pq.max(lin_xq)) / 2.0;
    assert!(close(bma.similarity(&["p", "x"], &["q"]), expected));

    let all_max = SetSimilarity::new(SetAggregatorKind::AllPairsMax, metric, Arc::clone(&ic));
    assert!(close(all_max.similarity(&["p", "x"], &["q"]), lin_pq.max(lin_xq)));
}
