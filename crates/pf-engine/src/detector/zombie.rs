//! Zombie detector — terminal models consuming a disproportionate cost share.

use crate::context::AnalysisContext;
use crate::detector::{Detector, Issue, IssueKind, SavingsRange, Severity};

/// Flags terminal models (no downstream consumers) whose cost share meets the
/// configured threshold. Compute spent producing an output nothing consumes
/// is the clearest recoverable waste.
pub struct ZombieDetector;

impl Detector for ZombieDetector {
    fn name(&self) -> &'static str {
        "zombie"
    }

    fn description(&self) -> &'static str {
        "Detects terminal models whose cost share meets the zombie threshold"
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<Issue> {
        let threshold_pct = ctx.config().zombie_threshold_pct * 100.0;
        let mut issues = Vec::new();

        for attr in ctx.attributions() {
            if !ctx.graph().is_terminal(attr.model_name.as_str()) {
                continue;
            }
            // Small terminal costs are not actionable waste
            if attr.pct_share < threshold_pct {
                continue;
            }

            let severity = (attr.pct_share / 100.0).clamp(0.0, 1.0);
            let savings = SavingsRange::from_point(attr.total_cost, ctx.totals().total_cost);
            let rationale = format!(
                "'{}' costs {:.1}% of total spend ({:.1} credits) and no downstream model consumes it",
                attr.model_name, attr.pct_share, attr.total_credits
            );
            let recommendation = ctx.recommendation(|| {
                format!(
                    "Archive or deprecate '{}' to recover up to ${:.2} per analysis period",
                    attr.model_name, attr.total_cost
                )
            });

            issues.push(Issue {
                kind: IssueKind::ZombieModel {
                    model: attr.model_name.clone(),
                    cost_share_pct: attr.pct_share,
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
#[path = "zombie_test.rs"]
mod tests;
