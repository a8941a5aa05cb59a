//! `osim set-sim`: similarity of two term sets.

use super::{MetricArgs, ModelArgs};
use crate::config::OsimConfig;
use crate::output::{OutputMode, field, heading, render_mode, rule, score};
use clap::Args;
use ontosim_similarity::{SetAggregatorKind, SetSimilarity};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub struct SetSimArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub metric: MetricArgs,

    /// First term set, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub set_a: Vec<String>,

    /// Second term set, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub set_b: Vec<String>,

    /// Set aggregator (best-match-average, average-best-match, all-pairs-max,
    /// all-pairs-average, jaccard, gentleman-simui, mazandu-simdic,
    /// mazandu-simuic, pesquita-simgic).
    #[arg(long)]
    pub aggregator: Option<SetAggregatorKind>,

    /// Include the pairwise score matrix (metric aggregators only).
    #[arg(long)]
    pub matrix: bool,
}

#[derive(Debug, Serialize)]
pub struct SetSimReport {
    pub set_a: Vec<String>,
    pub set_b: Vec<String>,
    pub aggregator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<f64>>>,
}

pub fn run_set_sim(args: &SetSimArgs, config: &OsimConfig, output: OutputMode) -> anyhow::Result<()> {
    let ic = args.model.load(config, output)?;
    let kind = args.aggregator.unwrap_or(config.similarity.aggregator);
    let aggregator = SetSimilarity::new(kind, args.metric.build(config, &ic), Arc::clone(&ic));

    let graph = ic.graph();
    let unknown: Vec<&str> = args
        .set_a
        .iter()
        .chain(&args.set_b)
        .map(String::as_str)
        .filter(|id| !graph.contains(id))
        .collect();
    if !unknown.is_empty() {
        warn!(?unknown, "terms not in the ontology contribute nothing");
    }

    let matrix = if args.matrix {
        aggregator
            .metric()
            .map(|metric| metric.similarity_matrix(&args.set_a, &args.set_b))
    } else {
        None
    };

    let report = SetSimReport {
        set_a: args.set_a.clone(),
        set_b: args.set_b.clone(),
        aggregator: kind.to_string(),
        metric: aggregator.metric().map(|m| m.kind().to_string()),
        similarity: aggregator.similarity(&args.set_a, &args.set_b),
        matrix,
    };

    render_mode(
        output,
        &report,
        |report, w| {
            writeln!(w, "{}\t{}", report.aggregator, report.similarity)?;
            if let Some(matrix) = &report.matrix {
                for row in matrix {
                    let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                    writeln!(w, "{}", cells.join("\t"))?;
                }
            }
            Ok(())
        },
        |report, w| {
            heading(w, "Set similarity")?;
            field(w, "Set A", report.set_a.join(", "))?;
            field(w, "Set B", report.set_b.join(", "))?;
            field(w, "Aggregator", &report.aggregator)?;
            if let Some(metric) = &report.metric {
                field(w, "Metric", metric)?;
            }
            field(w, "Similarity", score(report.similarity))?;
            if let Some(matrix) = &report.matrix {
                writeln!(w)?;
                heading(w, "Matrix")?;
                write!(w, "{:<14}", "")?;
                for col in &report.set_b {
                    write!(w, " {col:>12}")?;
                }
                writeln!(w)?;
                for (row_id, row) in report.set_a.iter().zip(matrix) {
                    write!(w, "{row_id:<14}")?;
                    for value in row {
                        write!(w, " {value:>12.6}")?;
                    }
                    writeln!(w)?;
                }
            }
            rule(w)
        },
    )
}
