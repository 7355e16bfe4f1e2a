//! Engine configuration
//!
//! Loaded from YAML or the environment:
//!
//! ```yaml
//! max_rewrite_steps: 10000   # omit for unbounded rewriting
//! pretty_print: true
//! ```
//!
//! Environment overrides:
//! 1. `ADT_MAX_REWRITE_STEPS` (a positive integer)
//! 2. `ADT_PRETTY_PRINT` (`true` / `false`)

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rewrite::StepBudget;

pub const MAX_REWRITE_STEPS_VAR: &str = "ADT_MAX_REWRITE_STEPS";
pub const PRETTY_PRINT_VAR: &str = "ADT_PRETTY_PRINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Axiom firings allowed per normalization; `None` rewrites without bound.
    pub max_rewrite_steps: Option<u64>,
    /// Render through registered pretty printers.
    pub pretty_print: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rewrite_steps: None,
            pretty_print: true,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse engine configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Defaults overridden by `ADT_MAX_REWRITE_STEPS` and `ADT_PRETTY_PRINT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(steps) = lookup(MAX_REWRITE_STEPS_VAR) {
            let steps = steps
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {}: '{}'", MAX_REWRITE_STEPS_VAR, steps))?;
            config.max_rewrite_steps = Some(steps);
        }

        if let Some(pretty) = lookup(PRETTY_PRINT_VAR) {
            config.pretty_print = pretty
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid {}: '{}'", PRETTY_PRINT_VAR, pretty))?;
        }

        Ok(config)
    }

    pub fn step_budget(&self) -> StepBudget {
        StepBudget::new(self.max_rewrite_steps)
    }
}
