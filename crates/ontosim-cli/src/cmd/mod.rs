pub mod info;
pub mod set_sim;
pub mod term;
pub mod term_sim;

use crate::config::OsimConfig;
use crate::load;
use crate::output::{CliError, OutputMode, render_error};
use clap::Args;
use ontosim_core::{InformationContent, Propagation};
use ontosim_similarity::{SharedInformation, SharedInformationKind, TermMetricKind, TermSimilarity};
use std::path::PathBuf;
use std::sync::Arc;

/// Ontology and corpus inputs shared by the similarity commands.
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Ontology file (OBO, or a JSON array of term records).
    #[arg(long)]
    pub ontology: PathBuf,

    /// Annotation corpus (JSON). Without one every term has zero IC.
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Annotation propagation: tree or dag.
    #[arg(long)]
    pub propagation: Option<Propagation>,
}

impl ModelArgs {
    /// Load the information content model, rendering failures in `output`.
    pub fn load(
        &self,
        config: &OsimConfig,
        output: OutputMode,
    ) -> anyhow::Result<Arc<InformationContent>> {
        let propagation = self
            .propagation
            .unwrap_or(config.information.propagation);
        let loaded = config.policy().and_then(|policy| {
            load::load_model(&self.ontology, self.corpus.as_deref(), policy, propagation)
        });
        match loaded {
            Ok(ic) => Ok(ic),
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                Err(err)
            }
        }
    }
}

/// Term metric options shared by `term-sim` and `set-sim`.
#[derive(Args, Debug)]
pub struct MetricArgs {
    /// Shared-information strategy (ancestor-mean, couto-grasm,
    /// couto-grasm-adjusted, exclusive-inherited, frontier).
    #[arg(long)]
    pub strategy: Option<SharedInformationKind>,

    /// Term metric (resnik, lin, jiang-conrath, relevance, pekar-staab).
    #[arg(long)]
    pub metric: Option<TermMetricKind>,
}

impl MetricArgs {
    pub fn build(&self, config: &OsimConfig, ic: &Arc<InformationContent>) -> TermSimilarity {
        let strategy = self.strategy.unwrap_or(config.similarity.strategy);
        let metric = self.metric.unwrap_or(config.similarity.metric);
        TermSimilarity::new(metric, SharedInformation::new(strategy, Arc::clone(ic)))
    }
}
