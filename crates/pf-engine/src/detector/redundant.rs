//! Redundant-compute detector — models recomputing structurally equivalent work.

use crate::context::AnalysisContext;
use crate::detector::{Detector, Issue, IssueKind, SavingsRange, Severity};
use pf_core::{Fingerprint, KeepPolicy, ModelName};
use std::collections::BTreeMap;

/// Groups models by exact structural-fingerprint equality and flags every
/// group with two or more members. Grouping is fingerprint-keyed
/// (O(models log models)), never pairwise. Models without a fingerprint never
/// group.
pub struct RedundantComputeDetector;

impl Detector for RedundantComputeDetector {
    fn name(&self) -> &'static str {
        "redundant_compute"
    }

    fn description(&self) -> &'static str {
        "Detects groups of models with identical structural fingerprints"
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<Issue> {
        let mut groups: BTreeMap<&Fingerprint, Vec<&ModelName>> = BTreeMap::new();
        for (name, model) in ctx.models() {
            if let Some(fp) = &model.fingerprint {
                groups.entry(fp).or_default().push(name);
            }
        }

        let mut issues = Vec::new();
        for (fingerprint, members) in groups {
            if members.len() < 2 {
                continue;
            }
            // members iterate in name order; keep selection must stay
            // deterministic under cost ties as well
            let keep = match ctx.config().redundancy_keep_policy {
                KeepPolicy::HighestCost => members.iter().copied().max_by(|a, b| {
                    ctx.cost_of(a.as_str())
                        .total_cmp(&ctx.cost_of(b.as_str()))
                        .then_with(|| b.as_str().cmp(a.as_str()))
                }),
                KeepPolicy::FirstByName => members.first().copied(),
            };
            let Some(keep) = keep else {
                continue;
            };

            let group_cost: f64 = members.iter().map(|m| ctx.cost_of(m.as_str())).sum();
            let redundant_cost = group_cost - ctx.cost_of(keep.as_str());

            let total = ctx.totals().total_cost;
            let severity = if total > 0.0 {
                (redundant_cost / total).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let savings = SavingsRange::from_point(redundant_cost, total);

            let keep_note = match ctx.config().redundancy_keep_policy {
                KeepPolicy::HighestCost => {
                    "keeping the highest-cost member assumes it is the most complete computation"
                }
                KeepPolicy::FirstByName => "keep candidate chosen by name order",
            };
            let rationale = format!(
                "{} models share one structural fingerprint, spending ${:.1} on duplicate work; \
                 consolidate into '{}' ({})",
                members.len(),
                redundant_cost,
                keep,
                keep_note
            );
            let member_list: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
            let recommendation = ctx.recommendation(|| {
                format!(
                    "Consolidate {} into '{}' and retire the rest",
                    member_list.join(", "),
                    keep
                )
            });

            issues.push(Issue {
                kind: IssueKind::RedundantComputeGroup {
                    models: members.iter().map(|m| (*m).clone()).collect(),
                    keep: keep.clone(),
                    fingerprint: fingerprint.clone(),
                },
                severity,
                level: Severity::for_score(severity),
                rationale,
                recommendation,
                savings,
                detector: self.name().to_string(),
            });
        }

        issues
    }
}

#[cfg(test)]
#[path = "redundant_test.rs"]
mod tests;
