//! Cost attribution — converting aggregated credits into ranked dollar spend.

use crate::error::{EngineError, EngineResult};
use crate::execution::{ExecutionAggregate, UnattributedBucket};
use pf_core::{AnalysisConfig, ModelName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attributed cost for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAttribution {
    /// Model name
    pub model_name: ModelName,

    /// Total credits across all of the model's runs
    pub total_credits: f64,

    /// Number of runs
    pub run_count: usize,

    /// Dollar cost: credits × per-environment rate
    pub total_cost: f64,

    /// Share of grand total spend, in percent
    pub pct_share: f64,
}

/// Totals across one attribution run.
///
/// Grand totals include the unattributed bucket, so per-model shares plus the
/// unattributed share always sum to 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionTotals {
    /// Grand total credits, resolved plus unattributed
    pub total_credits: f64,

    /// Grand total dollar spend, resolved plus unattributed
    pub total_cost: f64,

    /// Credits that matched no model
    pub unattributed_credits: f64,

    /// Dollar spend that matched no model
    pub unattributed_cost: f64,

    /// Number of records that matched no model
    pub unattributed_count: usize,

    /// Unattributed share of grand total spend, in percent
    pub unattributed_pct_share: f64,
}

/// Convert per-model aggregates into attributions ranked by cost descending
/// (ties by model name).
///
/// Fails with [`EngineError::NoExecutionData`] iff zero records resolved to
/// any model — an empty log and a log that is 100% unresolved are equally
/// unusable. The unattributed bucket gets no record of its own; it is
/// reported through the totals.
pub fn attribute(
    aggregates: &BTreeMap<ModelName, ExecutionAggregate>,
    unattributed: &UnattributedBucket,
    config: &AnalysisConfig,
) -> EngineResult<(Vec<CostAttribution>, AttributionTotals)> {
    if aggregates.is_empty() {
        return Err(EngineError::NoExecutionData);
    }

    let unattributed_cost = bucket_cost(&unattributed.credits_by_environment, config);

    let mut attributions: Vec<CostAttribution> = aggregates
        .iter()
        .map(|(name, agg)| CostAttribution {
            model_name: name.clone(),
            total_credits: agg.total_credits,
            run_count: agg.run_count,
            total_cost: bucket_cost(&agg.credits_by_environment, config),
            pct_share: 0.0,
        })
        .collect();

    let resolved_credits: f64 = attributions.iter().map(|a| a.total_credits).sum();
    let resolved_cost: f64 = attributions.iter().map(|a| a.total_cost).sum();
    let total_cost = resolved_cost + unattributed_cost;

    for attr in &mut attributions {
        attr.pct_share = pct_of(attr.total_cost, total_cost);
    }

    attributions.sort_by(|a, b| {
        b.total_cost
            .total_cmp(&a.total_cost)
            .then_with(|| a.model_name.cmp(&b.model_name))
    });

    let totals = AttributionTotals {
        total_credits: resolved_credits + unattributed.total_credits,
        total_cost,
        unattributed_credits: unattributed.total_credits,
        unattributed_cost,
        unattributed_count: unattributed.count,
        unattributed_pct_share: pct_of(unattributed_cost, total_cost),
    };

    Ok((attributions, totals))
}

fn bucket_cost(credits_by_environment: &BTreeMap<pf_core::EnvironmentName, f64>, config: &AnalysisConfig) -> f64 {
    credits_by_environment
        .iter()
        .map(|(env, credits)| credits * config.rate_for(env.as_str()))
        .sum()
}

fn pct_of(cost: f64, total: f64) -> f64 {
    if total > 0.0 {
        cost / total * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "attribution_test.rs"]
mod tests;
