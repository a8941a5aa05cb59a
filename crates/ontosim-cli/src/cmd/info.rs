//! `osim info`: summary of an ontology file.

use crate::config::OsimConfig;
use crate::load;
use crate::output::{CliError, OutputMode, field, heading, render_error, render_mode, rule};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Ontology file (OBO, or a JSON array of term records).
    #[arg(long)]
    pub ontology: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub terms: usize,
    pub relationships: usize,
    pub relationship_kinds: Vec<String>,
    pub content_hash: String,
    pub namespaces: Vec<NamespaceSummary>,
}

#[derive(Debug, Serialize)]
pub struct NamespaceSummary {
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub terms: usize,
}

pub fn run_info(args: &InfoArgs, config: &OsimConfig, output: OutputMode) -> anyhow::Result<()> {
    let loaded = config.policy().and_then(|policy| {
        let graph = load::load_graph(&args.ontology, policy.clone())?;
        Ok((graph, policy))
    });
    let (graph, policy) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err);
        }
    };

    let namespaces = graph
        .namespaces()
        .map(|ns| NamespaceSummary {
            namespace: ns.to_string(),
            root: graph.root_term(ns).map(str::to_string),
            terms: graph.ontology_terms(ns).len(),
        })
        .collect();

    let report = InfoReport {
        terms: graph.term_count(),
        relationships: graph.relationship_count(),
        relationship_kinds: policy.allowed().map(ToString::to_string).collect(),
        content_hash: graph.content_hash().to_string(),
        namespaces,
    };

    render_mode(
        output,
        &report,
        |report, w| {
            writeln!(
                w,
                "{}\t{}\t{}",
                report.terms, report.relationships, report.content_hash
            )?;
            for ns in &report.namespaces {
                writeln!(
                    w,
                    "{}\t{}\t{}",
                    ns.namespace,
                    ns.root.as_deref().unwrap_or("-"),
                    ns.terms
                )?;
            }
            Ok(())
        },
        |report, w| {
            heading(w, "Ontology")?;
            field(w, "Terms", report.terms.to_string())?;
            field(w, "Edges", report.relationships.to_string())?;
            field(w, "Kinds", report.relationship_kinds.join(", "))?;
            field(w, "Hash", &report.content_hash)?;
            writeln!(w)?;
            heading(w, "Namespaces")?;
            for ns in &report.namespaces {
                writeln!(
                    w,
                    "{:<20} {:<14} {:>8}",
                    ns.namespace,
                    ns.root.as_deref().unwrap_or("-"),
                    ns.terms
                )?;
            }
            rule(w)
        },
    )
}
