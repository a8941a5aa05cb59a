//! `osim term`: display one term of an ontology.
//!
//! Alternate ids resolve to their canonical term; the report always shows
//! the canonical id.

use crate::config::OsimConfig;
use crate::load;
use crate::output::{
    CliError, OutputMode, field, heading, render_error, render_mode, rule, score,
};
use clap::Args;
use ontosim_core::{InformationContent, Propagation, TermInformation};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TermArgs {
    /// Ontology file (OBO, or a JSON array of term records).
    pub ontology: PathBuf,

    /// Term id or alternate id.
    pub term: String,

    /// Annotation corpus (JSON); adds information content to the report.
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Annotation propagation: tree or dag.
    #[arg(long)]
    pub propagation: Option<Propagation>,
}

#[derive(Debug, Serialize)]
pub struct TermReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub namespace: String,
    pub root: String,
    pub depth: usize,
    pub is_leaf: bool,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub ancestors: usize,
    pub descendants: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<TermInformation>,
}

pub fn run_term(args: &TermArgs, config: &OsimConfig, output: OutputMode) -> anyhow::Result<()> {
    let loaded = config
        .policy()
        .and_then(|policy| load::load_graph(&args.ontology, policy));
    let graph = match loaded {
        Ok(graph) => graph,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err);
        }
    };

    let (Some(term), Ok(root), Some(depth)) = (
        graph.term(&args.term),
        graph.term_root(&args.term),
        graph.term_depth(&args.term),
    ) else {
        render_error(
            output,
            &CliError::new(
                "unknown_term",
                format!("term '{}' not found", args.term),
                format!("check the id against {}", args.ontology.display()),
            ),
        )?;
        anyhow::bail!("term '{}' not found", args.term);
    };

    let information = if args.corpus.is_some() {
        let corpus = match load::load_corpus(args.corpus.as_deref()) {
            Ok(corpus) => corpus,
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                return Err(err);
            }
        };
        let propagation = args.propagation.unwrap_or(config.information.propagation);
        let ic = InformationContent::new(std::sync::Arc::clone(&graph), &corpus, propagation);
        ic.entry(&term.id)
    } else {
        None
    };

    let to_vec = |ids: BTreeSet<&str>| ids.into_iter().map(str::to_string).collect::<Vec<_>>();
    let report = TermReport {
        id: term.id.clone(),
        name: term.name.clone(),
        definition: term.definition.clone(),
        namespace: term.namespace.to_string(),
        root: root.to_string(),
        depth,
        is_leaf: graph.is_leaf(&term.id),
        parents: to_vec(graph.parent_terms(&term.id)),
        children: to_vec(graph.child_terms(&term.id)),
        ancestors: graph.ancestor_terms(&term.id).len(),
        descendants: graph.descendant_terms(&term.id).len(),
        information,
    };

    render_mode(
        output,
        &report,
        |report, w| {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                report.id,
                report.namespace,
                report.depth,
                report.name.as_deref().unwrap_or("")
            )?;
            for parent in &report.parents {
                writeln!(w, "parent\t{parent}")?;
            }
            for child in &report.children {
                writeln!(w, "child\t{child}")?;
            }
            if let Some(info) = &report.information {
                writeln!(
                    w,
                    "ic\t{}\t{}\t{}",
                    info.annotation_count, info.probability, info.information_content
                )?;
            }
            Ok(())
        },
        |report, w| {
            heading(w, &format!("{} {}", report.id, report.name.as_deref().unwrap_or("")))?;
            field(w, "Namespace", &report.namespace)?;
            field(w, "Root", &report.root)?;
            field(w, "Depth", report.depth.to_string())?;
            field(w, "Leaf", if report.is_leaf { "yes" } else { "no" })?;
            field(w, "Ancestors", report.ancestors.to_string())?;
            field(w, "Descendants", report.descendants.to_string())?;
            if let Some(definition) = &report.definition {
                writeln!(w)?;
                writeln!(w, "{definition}")?;
            }
            if !report.parents.is_empty() {
                writeln!(w)?;
                heading(w, "Parents")?;
                for parent in &report.parents {
                    writeln!(w, "  {parent}")?;
                }
            }
            if !report.children.is_empty() {
                writeln!(w)?;
                heading(w, "Children")?;
                for child in &report.children {
                    writeln!(w, "  {child}")?;
                }
            }
            if let Some(info) = &report.information {
                writeln!(w)?;
                heading(w, "Information")?;
                field(w, "Annotations", info.annotation_count.to_string())?;
                field(w, "Probability", score(info.probability))?;
                field(w, "IC", score(info.information_content))?;
                field(w, "Max IC", score(info.max_information_content))?;
            }
            rule(w)
        },
    )
}
