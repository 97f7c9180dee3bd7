//! Algorithm settings loaded from TOML.
//!
//! ```toml
//! [iteration]
//! initial_history = 2
//! growth_interval = 500
//! max_iterations = 1000000
//!
//! [pagerank]
//! damping = 0.15
//! epsilon = 1e-7
//!
//! [degroot]
//! epsilon = 1e-7
//!
//! [hits]
//! epsilon = 1e-7
//! ```
//!
//! Every section and every key is optional; missing ones take the defaults
//! shown above. `max_iterations = 0` removes the iteration ceiling.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::centrality::{DeGrootConfig, HitsConfig, PageRankConfig};
use crate::iterate::IterationConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub iteration: IterationConfig,
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub degroot: DeGrootConfig,
    #[serde(default)]
    pub hits: HitsConfig,
}

impl AnalyticsConfig {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first section's [`sway_core::GraphError::InvalidArgument`].
    pub fn validate(&self) -> sway_core::Result<()> {
        self.iteration.validate()?;
        self.pagerank.validate()?;
        self.degroot.validate()?;
        self.hits.validate()
    }
}

/// Parse and validate a configuration document.
///
/// # Errors
///
/// Fails on malformed TOML or out-of-range values.
pub fn parse_config(text: &str) -> Result<AnalyticsConfig> {
    let config: AnalyticsConfig = toml::from_str(text).context("Failed to parse config")?;
    config.validate().context("Invalid config")?;
    Ok(config)
}

/// Load configuration from `path`, or defaults if the file does not exist.
///
/// # Errors
///
/// Fails if the file exists but cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<AnalyticsConfig> {
    if !path.exists() {
        return Ok(AnalyticsConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to load {}", path.display()))
}
