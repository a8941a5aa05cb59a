//! Property tests for strategies, metrics, and aggregators on random DAGs.

use std::sync::Arc;

use proptest::prelude::*;

use ontosim_core::Propagation;
use ontosim_similarity::{
    SetAggregatorKind, SetSimilarity, SharedInformation, SharedInformationKind, TermMetricKind,
    TermSimilarity,
};

use generators::*;

const EPSILON: f64 = 1e-9;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    #[test]
    fn self_shared_information_is_own_information(o in arb_ontology(), tree in any::<bool>()) {
        let propagation = if tree { Propagation::Tree } else { Propagation::Dag };
        let ic = o.model(propagation);
        for i in 0..o.term_count() {
            let id = term_id(i);
            for kind in SharedInformationKind::ALL {
                let shared = SharedInformation::new(kind, Arc::clone(&ic));
                let got = shared.shared_information(&id, &id);
                prop_assert!((got - ic.term_information(&id)).abs() < EPSILON, "{} {}", kind, id);
            }
        }
    }

    #[test]
    fn resnik_never_exceeds_an_annotated_term((o, i, j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let (a, b) = (term_id(i), term_id(j));
        // Unannotated terms have IC 0 and do not bound their ancestors.
        let annotated: Vec<f64> = [&a, &b]
            .into_iter()
            .filter(|id| ic.annotation_count(id) > 0)
            .map(|id| ic.term_information(id))
            .collect();
        let common_max = o
            .ancestors_or_self(i)
            .intersection(&o.ancestors_or_self(j))
            .map(|&t| ic.term_information(&term_id(t)))
            .fold(0.0, f64::max);
        let bound = annotated.into_iter().fold(common_max, f64::min);
        for kind in SharedInformationKind::ALL {
            let resnik = TermSimilarity::new(TermMetricKind::Resnik, SharedInformation::new(kind, Arc::clone(&ic)));
            let got = resnik.similarity(&a, &b);
            prop_assert!(got >= 0.0, "{}: {}", kind, got);
            prop_assert!(got <= bound + EPSILON, "{}: {} > {}", kind, got, bound);
        }
    }

    #[test]
    fn bounded_metrics_stay_in_unit_interval((o, i, j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let (a, b) = (term_id(i), term_id(j));
        for strategy in SharedInformationKind::ALL {
            let shared = SharedInformation::new(strategy, Arc::clone(&ic));
            for metric in TermMetricKind::ALL {
                let m = TermSimilarity::new(metric, shared.clone());
                let score = m.normalized_similarity(&a, &b);
                prop_assert!((-EPSILON..=1.0 + EPSILON).contains(&score), "{}/{}: {}", strategy, metric, score);
            }
        }
    }

    #[test]
    fn lin_of_an_informative_term_with_itself_is_one(o in arb_ontology()) {
        let ic = o.model(Propagation::Dag);
        let lin = TermSimilarity::new(
            TermMetricKind::Lin,
            SharedInformation::new(SharedInformationKind::CoutoGraSm, Arc::clone(&ic)),
        );
        for i in 0..o.term_count() {
            let id = term_id(i);
            if ic.term_information(&id) > 0.0 {
                prop_assert!((lin.similarity(&id, &id) - 1.0).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn frontier_and_exclusive_inheritance_agree((o, i, j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let (a, b) = (term_id(i), term_id(j));
        let frontier = SharedInformation::new(SharedInformationKind::Frontier, Arc::clone(&ic));
        let exclusive = SharedInformation::new(SharedInformationKind::ExclusiveInherited, Arc::clone(&ic));
        prop_assert_eq!(
            frontier.common_disjoint_ancestors(&a, &b),
            exclusive.common_disjoint_ancestors(&a, &b)
        );
    }

    #[test]
    fn adjusted_grasm_admits_a_subset_of_grasm((o, i, j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let (a, b) = (term_id(i), term_id(j));
        let weak = SharedInformation::new(SharedInformationKind::CoutoGraSm, Arc::clone(&ic));
        let strict = SharedInformation::new(SharedInformationKind::CoutoGraSmAdjusted, Arc::clone(&ic));
        let ancestors = SharedInformation::new(SharedInformationKind::AncestorMean, Arc::clone(&ic));
        let all = ancestors.common_disjoint_ancestors(&a, &b);
        prop_assert!(weak.common_disjoint_ancestors(&a, &b).is_subset(&all));
        prop_assert!(strict.common_disjoint_ancestors(&a, &b).is_subset(&all));
    }

    #[test]
    fn cross_namespace_terms_score_zero((o, i, _j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let a = term_id(i);
        prop_assert!(!ic.validate_terms(&a, "F0"));
        for strategy in SharedInformationKind::ALL {
            let shared = SharedInformation::new(strategy, Arc::clone(&ic));
            for metric in TermMetricKind::ALL {
                let m = TermSimilarity::new(metric, shared.clone());
                prop_assert_eq!(m.similarity(&a, "F0"), 0.0);
            }
        }
    }

    #[test]
    fn set_similarity_is_symmetric((o, i, j) in arb_pair()) {
        let ic = o.model(Propagation::Dag);
        let left = [term_id(i), term_id(j)];
        let right = [term_id(j), term_id(0)];
        let metric = TermSimilarity::new(
            TermMetricKind::Lin,
            SharedInformation::new(SharedInformationKind::ExclusiveInherited, Arc::clone(&ic)),
        );
        for kind in SetAggregatorKind::ALL {
            let agg = SetSimilarity::new(kind, metric.clone(), Arc::clone(&ic));
            let forward = agg.similarity(&left, &right);
            let backward = agg.similarity(&right, &left);
            prop_assert!((forward - backward).abs() < EPSILON, "{}", kind);
        }
    }
}
