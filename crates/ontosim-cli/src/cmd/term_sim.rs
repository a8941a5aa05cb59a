//! `osim term-sim`: similarity of two terms.
//!
//! Invalid pairs (unknown terms, different namespaces) are not errors: they
//! report `valid: false` and score zero.

use super::{MetricArgs, ModelArgs};
use crate::config::OsimConfig;
use crate::output::{OutputMode, field, heading, render_mode, rule, score};
use clap::Args;
use ontosim_similarity::SharedInformation;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub struct TermSimArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub metric: MetricArgs,

    /// First term id.
    pub a: String,

    /// Second term id.
    pub b: String,
}

#[derive(Debug, Serialize)]
pub struct TermSimReport {
    pub a: String,
    pub b: String,
    pub valid: bool,
    pub strategy: String,
    pub metric: String,
    pub shared_information: f64,
    pub similarity: f64,
    pub normalized: f64,
    pub common_disjoint_ancestors: Vec<String>,
}

pub fn run_term_sim(
    args: &TermSimArgs,
    config: &OsimConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let ic = args.model.load(config, output)?;
    let metric = args.metric.build(config, &ic);
    let strategy = args.metric.strategy.unwrap_or(config.similarity.strategy);
    let shared = SharedInformation::new(strategy, Arc::clone(&ic));

    let valid = ic.validate_terms(&args.a, &args.b);
    if !valid {
        warn!(a = %args.a, b = %args.b, "pair is unknown or spans namespaces; scoring 0");
    }

    let report = TermSimReport {
        a: args.a.clone(),
        b: args.b.clone(),
        valid,
        strategy: strategy.to_string(),
        metric: metric.kind().to_string(),
        shared_information: shared.shared_information(&args.a, &args.b),
        similarity: metric.similarity(&args.a, &args.b),
        normalized: metric.normalized_similarity(&args.a, &args.b),
        common_disjoint_ancestors: shared
            .common_disjoint_ancestors(&args.a, &args.b)
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    render_mode(
        output,
        &report,
        |report, w| {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                report.a, report.b, report.similarity, report.normalized, report.shared_information
            )
        },
        |report, w| {
            heading(w, &format!("{} vs {}", report.a, report.b))?;
            field(w, "Valid", if report.valid { "yes" } else { "no" })?;
            field(w, "Strategy", &report.strategy)?;
            field(w, "Metric", &report.metric)?;
            field(w, "Shared IC", score(report.shared_information))?;
            field(w, "Similarity", score(report.similarity))?;
            field(w, "Normalized", score(report.normalized))?;
            field(w, "Ancestors", report.common_disjoint_ancestors.join(", "))?;
            rule(w)
        },
    )
}
