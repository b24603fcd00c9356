//! Analysis context — immutable attributed-graph data shared by all detectors.

use crate::attribution::{AttributionTotals, CostAttribution};
use crate::execution::ExecutionAggregate;
use pf_core::{AnalysisConfig, Model, ModelGraph, ModelName};
use std::collections::{BTreeMap, HashMap};

/// Context object passed to detectors.
///
/// Everything here is read-only; detectors never mutate shared state, so any
/// detector execution order yields the same issues.
pub struct AnalysisContext<'a> {
    models: &'a BTreeMap<ModelName, Model>,
    graph: &'a ModelGraph,
    aggregates: &'a BTreeMap<ModelName, ExecutionAggregate>,
    attributions: &'a [CostAttribution],
    totals: &'a AttributionTotals,
    config: &'a AnalysisConfig,
    attribution_index: HashMap<&'a str, &'a CostAttribution>,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context.
    pub fn new(
        models: &'a BTreeMap<ModelName, Model>,
        graph: &'a ModelGraph,
        aggregates: &'a BTreeMap<ModelName, ExecutionAggregate>,
        attributions: &'a [CostAttribution],
        totals: &'a AttributionTotals,
        config: &'a AnalysisConfig,
    ) -> Self {
        let attribution_index = attributions
            .iter()
            .map(|a| (a.model_name.as_str(), a))
            .collect();
        Self {
            models,
            graph,
            aggregates,
            attributions,
            totals,
            config,
            attribution_index,
        }
    }

    /// The analyzed models, keyed and iterated in name order
    pub fn models(&self) -> &BTreeMap<ModelName, Model> {
        self.models
    }

    /// The model dependency graph
    pub fn graph(&self) -> &ModelGraph {
        self.graph
    }

    /// Per-model attributions, cost descending
    pub fn attributions(&self) -> &[CostAttribution] {
        self.attributions
    }

    /// Totals across the whole attribution
    pub fn totals(&self) -> &AttributionTotals {
        self.totals
    }

    /// Engine configuration
    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Attribution record for a model, if any of its runs resolved
    pub fn attribution(&self, model: &str) -> Option<&CostAttribution> {
        self.attribution_index.get(model).copied()
    }

    /// Dollar cost attributed to a model (0.0 when it never ran)
    pub fn cost_of(&self, model: &str) -> f64 {
        self.attribution(model).map_or(0.0, |a| a.total_cost)
    }

    /// Aggregated execution data for a model, if any of its runs resolved
    pub fn aggregate(&self, model: &str) -> Option<&ExecutionAggregate> {
        self.aggregates.get(model)
    }

    /// Recommendation text, produced only when recommendations are enabled.
    pub fn recommendation(&self, build: impl FnOnce() -> String) -> Option<String> {
        if self.config.recommendations_enabled {
            Some(build())
        } else {
            None
        }
    }
}
