//! The engine entry point: one synchronous pass from manifest + execution log
//! to a complete analysis result.

use crate::attribution::{attribute, CostAttribution};
use crate::context::AnalysisContext;
use crate::detector::{DetectorSuite, Issue, IssueKind};
use crate::error::EngineResult;
use crate::execution::{aggregate, QueryExecution};
use crate::monthly::{monthly_breakdown, MonthlySummary};
use crate::savings::{estimate_portfolio, SavingsEstimate};
use pf_core::{AnalysisConfig, ManifestDocument, Model, ModelGraph, ModelName, Warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary totals for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Number of models analyzed
    pub model_count: usize,

    /// Number of declared models excluded by the `max_models` cap
    pub models_excluded: usize,

    /// Grand total credits, resolved plus unattributed
    pub total_credits: f64,

    /// Grand total dollar spend
    pub total_cost: f64,

    /// Credits that matched no model
    pub unattributed_credits: f64,

    /// Dollar spend that matched no model
    pub unattributed_cost: f64,

    /// Number of execution records that matched no model
    pub unattributed_count: usize,

    /// Unattributed share of grand total spend, in percent
    pub unattributed_pct_share: f64,

    /// Zombie issues detected
    pub zombie_count: usize,

    /// Over-scheduled issues detected
    pub over_scheduled_count: usize,

    /// Redundant-compute groups detected
    pub redundant_group_count: usize,

    /// Portfolio-level recoverable-spend estimate
    pub savings: SavingsEstimate,
}

/// Complete result of one analysis run. Owns everything it reports; nothing
/// is shared with the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analyzed models in name order, downstream sets derived and dependency
    /// sets pruned to resolvable models
    pub models: Vec<Model>,

    /// Per-model cost attributions, cost descending
    pub attributions: Vec<CostAttribution>,

    /// Detected issues, high-bound savings descending
    pub issues: Vec<Issue>,

    /// Summary totals
    pub summary: AnalysisSummary,

    /// Calendar-month spend breakdown
    pub monthly: Vec<MonthlySummary>,
}

/// Analysis result plus the recoverable warnings gathered along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The analysis result
    pub result: AnalysisResult,

    /// Recoverable anomalies encountered while building it
    pub warnings: Vec<Warning>,
}

/// Analyze a manifest and execution log under the given configuration.
///
/// Fatal errors (cycle, duplicate model, zero usable execution records) stop
/// the pipeline before attribution and return no partial result. Recoverable
/// anomalies come back as warnings beside the full result.
pub fn analyze(
    manifest: &ManifestDocument,
    executions: &[QueryExecution],
    config: &AnalysisConfig,
) -> EngineResult<AnalysisOutput> {
    let mut models = manifest.build_models()?;

    // License-tier cap: keep the lexicographically first N models
    let declared = models.len();
    if let Some(cap) = config.max_models {
        if declared > cap {
            log::warn!("model cap in effect: analyzing first {cap} of {declared} models");
            models = models.into_iter().take(cap).collect();
        }
    }
    let models_excluded = declared - models.len();

    let (graph, mut warnings) = ModelGraph::build(&models)?;
    derive_edges(&mut models, &graph);

    let (aggregates, unattributed, execution_warnings) = aggregate(&graph, executions);
    warnings.extend(execution_warnings);

    let (attributions, totals) = attribute(&aggregates, &unattributed, config)?;

    let ctx = AnalysisContext::new(&models, &graph, &aggregates, &attributions, &totals, config);
    let issues = DetectorSuite::with_defaults().run(&ctx);

    let savings = estimate_portfolio(&issues, totals.total_cost);
    let monthly = monthly_breakdown(&graph, executions, config.monthly_top_n);

    let summary = AnalysisSummary {
        model_count: models.len(),
        models_excluded,
        total_credits: totals.total_credits,
        total_cost: totals.total_cost,
        unattributed_credits: totals.unattributed_credits,
        unattributed_cost: totals.unattributed_cost,
        unattributed_count: totals.unattributed_count,
        unattributed_pct_share: totals.unattributed_pct_share,
        zombie_count: count_kind(&issues, |k| matches!(k, IssueKind::ZombieModel { .. })),
        over_scheduled_count: count_kind(&issues, |k| matches!(k, IssueKind::OverScheduled { .. })),
        redundant_group_count: count_kind(&issues, |k| {
            matches!(k, IssueKind::RedundantComputeGroup { .. })
        }),
        savings,
    };

    Ok(AnalysisOutput {
        result: AnalysisResult {
            models: models.into_values().collect(),
            attributions,
            issues,
            summary,
            monthly,
        },
        warnings,
    })
}

/// Fill each model's derived downstream set and prune its dependency set to
/// the edges that survived graph construction.
fn derive_edges(models: &mut BTreeMap<ModelName, Model>, graph: &ModelGraph) {
    for (name, model) in models.iter_mut() {
        model.depends_on = graph.dependencies(name.as_str()).into_iter().collect();
        model.downstream = graph.dependents(name.as_str()).into_iter().collect();
    }
}

fn count_kind(issues: &[Issue], matches: impl Fn(&IssueKind) -> bool) -> usize {
    issues.iter().filter(|i| matches(&i.kind)).count()
}
