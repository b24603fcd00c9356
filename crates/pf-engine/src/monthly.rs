//! Monthly spend breakdown — calendar-month cost buckets ranked by spend.

use crate::execution::QueryExecution;
use pf_core::{ModelGraph, ModelName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One model's share of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyModelCost {
    /// Model name
    pub model_name: ModelName,
    /// Credits the model consumed in this month
    pub credits: f64,
    /// Percent of the month's total credits
    pub pct: f64,
}

/// Credits consumed in one calendar month, with the top spenders ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar month key, `YYYY-MM`
    pub month: String,
    /// Total resolved credits in the month
    pub total_credits: f64,
    /// Top models by credits, descending (ties by name)
    pub top_models: Vec<MonthlyModelCost>,
}

/// Bucket resolved executions by calendar month and rank each month's top
/// spenders. Months ascend; unresolved records are excluded (they carry no
/// model to rank).
pub fn monthly_breakdown(
    graph: &ModelGraph,
    executions: &[QueryExecution],
    top_n: usize,
) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, BTreeMap<ModelName, f64>> = BTreeMap::new();

    for exec in executions {
        if !graph.contains(exec.model_name.as_str()) {
            continue;
        }
        let month = exec.start_time.format("%Y-%m").to_string();
        *months
            .entry(month)
            .or_default()
            .entry(exec.model_name.clone())
            .or_insert(0.0) += exec.credits_used;
    }

    months
        .into_iter()
        .map(|(month, by_model)| {
            let total_credits: f64 = by_model.values().sum();
            let mut ranked: Vec<MonthlyModelCost> = by_model
                .into_iter()
                .map(|(model_name, credits)| MonthlyModelCost {
                    model_name,
                    credits,
                    pct: if total_credits > 0.0 {
                        credits / total_credits * 100.0
                    } else {
                        0.0
                    },
                })
                .collect();
            ranked.sort_by(|a, b| {
                b.credits
                    .total_cmp(&a.credits)
                    .then_with(|| a.model_name.cmp(&b.model_name))
            });
            ranked.truncate(top_n);
            MonthlySummary {
                month,
                total_credits,
                top_models: ranked,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{graph_of, ts};
    use chrono::Duration;

    #[test]
    fn test_buckets_by_month_and_ranks() {
        let graph = graph_of(&[("a", &[]), ("b", &[])]);
        let feb = ts(0) + Duration::days(20); // 2024-02-04
        let executions = vec![
            QueryExecution::new("a", 1.0, ts(0)),
            QueryExecution::new("a", 2.0, ts(1)),
            QueryExecution::new("b", 9.0, ts(2)),
            QueryExecution::new("a", 4.0, feb),
        ];

        let breakdown = monthly_breakdown(&graph, &executions, 10);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].month, "2024-01");
        assert_eq!(breakdown[1].month, "2024-02");

        let jan = &breakdown[0];
        assert_eq!(jan.total_credits, 12.0);
        assert_eq!(jan.top_models[0].model_name, "b");
        assert_eq!(jan.top_models[0].credits, 9.0);
        assert!((jan.top_models[0].pct - 75.0).abs() < 1e-9);

        assert_eq!(breakdown[1].total_credits, 4.0);
    }

    #[test]
    fn test_top_n_truncates() {
        let graph = graph_of(&[("a", &[]), ("b", &[]), ("c", &[])]);
        let executions = vec![
            QueryExecution::new("a", 1.0, ts(0)),
            QueryExecution::new("b", 2.0, ts(0)),
            QueryExecution::new("c", 3.0, ts(0)),
        ];
        let breakdown = monthly_breakdown(&graph, &executions, 2);
        assert_eq!(breakdown[0].top_models.len(), 2);
        assert_eq!(breakdown[0].top_models[0].model_name, "c");
        // Month total still counts the truncated tail
        assert_eq!(breakdown[0].total_credits, 6.0);
    }

    #[test]
    fn test_unresolved_records_excluded() {
        let graph = graph_of(&[("a", &[])]);
        let executions = vec![
            QueryExecution::new("a", 1.0, ts(0)),
            QueryExecution::new("ghost", 100.0, ts(0)),
        ];
        let breakdown = monthly_breakdown(&graph, &executions, 10);
        assert_eq!(breakdown[0].total_credits, 1.0);
    }
}
