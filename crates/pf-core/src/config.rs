//! Analysis configuration.
//!
//! License-tier decisions (model caps, recommendation visibility) arrive here
//! as plain configuration inputs; the engine never consults the environment.

use crate::error::{CoreError, CoreResult};
use crate::model_name::EnvironmentName;
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which member of a redundant-compute group is kept when estimating
/// consolidation savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicy {
    /// Keep the member with the highest attributed cost, assumed to be the
    /// most complete computation. This is a modeling assumption, not a
    /// measured fact.
    #[default]
    HighestCost,
    /// Keep the lexicographically first member
    FirstByName,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Cost share above which a terminal model is flagged as a zombie,
    /// as a fraction of total spend
    #[serde(default = "default_zombie_threshold")]
    pub zombie_threshold_pct: f64,

    /// Analyze only the first N models in name order; `None` = unbounded.
    /// The number of excluded models is reported in the result summary.
    #[serde(default)]
    pub max_models: Option<usize>,

    /// Populate per-issue recommendation text
    #[serde(default = "default_true")]
    pub recommendations_enabled: bool,

    /// Dollar-per-credit rate per execution environment; unknown environments
    /// bill at 1.0
    #[serde(default)]
    pub environment_rates: BTreeMap<EnvironmentName, f64>,

    /// Keep policy for redundant-compute groups
    #[serde(default)]
    pub redundancy_keep_policy: KeepPolicy,

    /// How many models to list per month in the monthly breakdown
    #[serde(default = "default_monthly_top_n")]
    pub monthly_top_n: usize,
}

fn default_zombie_threshold() -> f64 {
    0.05
}

fn default_monthly_top_n() -> usize {
    10
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            zombie_threshold_pct: default_zombie_threshold(),
            max_models: None,
            recommendations_enabled: true,
            environment_rates: BTreeMap::new(),
            redundancy_keep_policy: KeepPolicy::default(),
            monthly_top_n: default_monthly_top_n(),
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CoreError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Dollar-per-credit rate for an execution environment.
    pub fn rate_for(&self, environment: &str) -> f64 {
        self.environment_rates
            .get(environment)
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
