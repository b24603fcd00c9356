//! Over-schedule detector — refresh cadence finer than the source-freshness
//! requirement.

use crate::context::AnalysisContext;
use crate::detector::{Detector, Issue, IssueKind, SavingsRange, Severity};
use chrono::Duration;

/// Savings fractions are clipped here; a 100% estimate is never plausible.
const MAX_SAVINGS_FRACTION: f64 = 0.9;

/// Flags models whose declared refresh cadence is strictly finer-grained than
/// their declared source-freshness requirement (e.g. hourly refresh against a
/// daily-updating source). Models missing either declaration are skipped:
/// insufficient information, not waste.
pub struct OverScheduleDetector;

impl Detector for OverScheduleDetector {
    fn name(&self) -> &'static str {
        "over_schedule"
    }

    fn description(&self) -> &'static str {
        "Detects models refreshed more often than their source data changes"
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (name, model) in ctx.models() {
            let (Some(refresh), Some(freshness)) = (model.refresh_cadence, model.source_freshness)
            else {
                continue;
            };
            if refresh.num_seconds() <= 0 || freshness.num_seconds() <= 0 {
                continue;
            }
            if refresh >= freshness {
                continue;
            }

            let savings_fraction = (1.0
                - refresh.num_seconds() as f64 / freshness.num_seconds() as f64)
                .clamp(0.0, MAX_SAVINGS_FRACTION);

            let cost = ctx.cost_of(name.as_str());
            let savings = SavingsRange::from_point(cost * savings_fraction, ctx.totals().total_cost);

            let mut rationale = format!(
                "'{}' refreshes every {} against a source that only changes every {}",
                name,
                fmt_interval(refresh),
                fmt_interval(freshness)
            );
            if let Some(observed) = ctx.aggregate(name.as_str()).and_then(|a| a.mean_run_interval())
            {
                rationale.push_str(&format!(", observed runs ~{} apart", fmt_interval(observed)));
            }

            let recommendation = ctx.recommendation(|| {
                format!(
                    "Align '{}' refresh with its {} source freshness to save up to {:.0}% of its spend",
                    name,
                    fmt_interval(freshness),
                    savings_fraction * 100.0
                )
            });

            issues.push(Issue {
                kind: IssueKind::OverScheduled {
                    model: name.clone(),
                    refresh_interval_seconds: refresh.num_seconds(),
                    freshness_interval_seconds: freshness.num_seconds(),
                    savings_fraction,
                },
                severity: savings_fraction,
                level: Severity::for_score(savings_fraction),
                rationale,
                recommendation,
                savings,
                detector: self.name().to_string(),
            });
        }

        issues
    }
}

/// Render an interval as hours when it divides evenly, minutes otherwise.
fn fmt_interval(d: Duration) -> String {
    let secs = d.num_seconds();
    if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}m", secs / 60)
    }
}

#[cfg(test)]
#[path = "over_schedule_test.rs"]
mod tests;
