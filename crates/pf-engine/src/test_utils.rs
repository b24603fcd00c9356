//! Shared fixtures for engine unit tests.

use crate::attribution::{attribute, AttributionTotals, CostAttribution};
use crate::context::AnalysisContext;
use crate::execution::{aggregate, ExecutionAggregate, QueryExecution, UnattributedBucket};
use chrono::{DateTime, TimeZone, Utc};
use pf_core::{AnalysisConfig, Model, ModelGraph, ModelName};
use std::collections::BTreeMap;

/// Timestamp `hours` after the fixed test epoch (2024-01-15 00:00 UTC).
pub fn ts(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() + chrono::Duration::hours(hours)
}

/// Build a model map from `(name, deps)` pairs.
pub fn models_of(entries: &[(&str, &[&str])]) -> BTreeMap<ModelName, Model> {
    entries
        .iter()
        .map(|(name, deps)| {
            let mut m = Model::new(*name);
            m.depends_on = deps.iter().map(|d| ModelName::new(*d)).collect();
            (m.name.clone(), m)
        })
        .collect()
}

/// Build just the graph from `(name, deps)` pairs.
pub fn graph_of(entries: &[(&str, &[&str])]) -> ModelGraph {
    let (graph, _) = ModelGraph::build(&models_of(entries)).unwrap();
    graph
}

/// Everything a detector needs, built through the real pipeline stages.
pub struct Fixture {
    pub models: BTreeMap<ModelName, Model>,
    pub graph: ModelGraph,
    pub aggregates: BTreeMap<ModelName, ExecutionAggregate>,
    pub unattributed: UnattributedBucket,
    pub attributions: Vec<CostAttribution>,
    pub totals: AttributionTotals,
    pub config: AnalysisConfig,
}

impl Fixture {
    pub fn new(
        models: BTreeMap<ModelName, Model>,
        executions: &[QueryExecution],
        config: AnalysisConfig,
    ) -> Self {
        let (graph, _) = ModelGraph::build(&models).unwrap();
        let (aggregates, unattributed, _) = aggregate(&graph, executions);
        let (attributions, totals) = attribute(&aggregates, &unattributed, &config).unwrap();
        Self {
            models,
            graph,
            aggregates,
            unattributed,
            attributions,
            totals,
            config,
        }
    }

    pub fn ctx(&self) -> AnalysisContext<'_> {
        AnalysisContext::new(
            &self.models,
            &self.graph,
            &self.aggregates,
            &self.attributions,
            &self.totals,
            &self.config,
        )
    }
}
