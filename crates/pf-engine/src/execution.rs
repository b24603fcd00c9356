//! Query execution records and per-model aggregation.

use chrono::{DateTime, Duration, Utc};
use pf_core::{EnvironmentName, ModelGraph, ModelName, Warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One executed transformation run from the warehouse query log.
///
/// Immutable once ingested. Field aliases accept the UPPERCASE column
/// spellings produced by warehouse-native history exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExecution {
    /// Model the run belongs to (may not resolve against the manifest)
    #[serde(alias = "MODEL_NAME")]
    pub model_name: ModelName,

    /// Compute credits consumed by the run
    #[serde(alias = "CREDITS_USED")]
    pub credits_used: f64,

    /// Run start timestamp
    #[serde(alias = "START_TIME")]
    pub start_time: DateTime<Utc>,

    /// Execution environment (warehouse) identifier
    #[serde(default = "default_environment", alias = "WAREHOUSE_NAME")]
    pub environment: EnvironmentName,
}

fn default_environment() -> EnvironmentName {
    EnvironmentName::new("default")
}

impl QueryExecution {
    /// Create a record in the default environment.
    pub fn new(
        model_name: impl Into<ModelName>,
        credits_used: f64,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            credits_used,
            start_time,
            environment: default_environment(),
        }
    }

    /// Set the execution environment.
    pub fn in_environment(mut self, environment: impl Into<EnvironmentName>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// Aggregated execution data for a single model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionAggregate {
    /// Total credits across all runs
    pub total_credits: f64,

    /// Number of runs
    pub run_count: usize,

    /// Run start times, ascending
    pub timestamps: Vec<DateTime<Utc>>,

    /// Credits broken down by execution environment, for rate conversion
    pub credits_by_environment: BTreeMap<EnvironmentName, f64>,
}

impl ExecutionAggregate {
    fn record(&mut self, exec: &QueryExecution) {
        self.total_credits += exec.credits_used;
        self.run_count += 1;
        self.timestamps.push(exec.start_time);
        *self
            .credits_by_environment
            .entry(exec.environment.clone())
            .or_insert(0.0) += exec.credits_used;
    }

    /// Mean spacing between consecutive runs, when at least two were observed.
    pub fn mean_run_interval(&self) -> Option<Duration> {
        if self.timestamps.len() < 2 {
            return None;
        }
        let first = self.timestamps.first()?;
        let last = self.timestamps.last()?;
        Some((*last - *first) / (self.timestamps.len() as i32 - 1))
    }
}

/// Spend that could not be matched to any known model.
///
/// Kept exact rather than dropped: total spend accounting must balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnattributedBucket {
    /// Total unresolved credits
    pub total_credits: f64,

    /// Number of unresolved records
    pub count: usize,

    /// Unresolved credits broken down by execution environment
    pub credits_by_environment: BTreeMap<EnvironmentName, f64>,
}

impl UnattributedBucket {
    fn record(&mut self, exec: &QueryExecution) {
        self.total_credits += exec.credits_used;
        self.count += 1;
        *self
            .credits_by_environment
            .entry(exec.environment.clone())
            .or_insert(0.0) += exec.credits_used;
    }
}

/// Resolve each execution record against the graph and aggregate per model.
///
/// Record order is irrelevant: timestamps are sorted after ingestion and the
/// output map iterates in name order. Unresolved records accumulate into the
/// unattributed bucket with a warning each.
pub fn aggregate(
    graph: &ModelGraph,
    executions: &[QueryExecution],
) -> (
    BTreeMap<ModelName, ExecutionAggregate>,
    UnattributedBucket,
    Vec<Warning>,
) {
    let mut per_model: BTreeMap<ModelName, ExecutionAggregate> = BTreeMap::new();
    let mut unattributed = UnattributedBucket::default();
    let mut warnings = Vec::new();

    for exec in executions {
        if graph.contains(exec.model_name.as_str()) {
            per_model
                .entry(exec.model_name.clone())
                .or_default()
                .record(exec);
        } else {
            log::debug!(
                "execution of unknown model '{}' ({} credits)",
                exec.model_name,
                exec.credits_used
            );
            unattributed.record(exec);
            warnings.push(Warning::UnresolvedExecution {
                model: exec.model_name.clone(),
                credits: exec.credits_used,
            });
        }
    }

    for agg in per_model.values_mut() {
        agg.timestamps.sort_unstable();
    }

    (per_model, unattributed, warnings)
}

#[cfg(test)]
#[path = "execution_test.rs"]
mod tests;
