//! `ontosim.toml` configuration.
//!
//! Every section is optional. Command-line flags override what the file
//! says, and the file overrides the built-in defaults.
//!
//! ```toml
//! [graph]
//! relationships = ["is_a", "part_of"]
//!
//! [information]
//! propagation = "dag"
//!
//! [similarity]
//! strategy = "couto-grasm"
//! metric = "lin"
//! aggregator = "best-match-average"
//! ```

use anyhow::{Context, Result};
use ontosim_core::{Propagation, RelationshipPolicy};
use ontosim_similarity::{SetAggregatorKind, SharedInformationKind, TermMetricKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "ontosim.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsimConfig {
    pub graph: GraphConfig,
    pub information: InformationConfig,
    pub similarity: SimilarityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Relationship kinds that become graph edges.
    pub relationships: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            relationships: vec!["is_a".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InformationConfig {
    pub propagation: Propagation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub strategy: SharedInformationKind,
    pub metric: TermMetricKind,
    pub aggregator: SetAggregatorKind,
}

impl OsimConfig {
    /// Relationship policy for graph construction.
    pub fn policy(&self) -> Result<RelationshipPolicy> {
        RelationshipPolicy::new(self.graph.relationships.iter().cloned())
            .context("invalid [graph].relationships")
    }
}

/// Load configuration from `explicit`, or from `ontosim.toml` in `cwd`.
///
/// A missing implicit file yields the defaults; a missing explicit file is
/// an error.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<OsimConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = cwd.join(CONFIG_FILE);
            if !path.exists() {
                return Ok(OsimConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<OsimConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
