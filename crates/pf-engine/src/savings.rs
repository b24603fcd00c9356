//! Portfolio-level savings estimation.

use crate::detector::Issue;
use serde::{Deserialize, Serialize};

/// Caveat attached to every portfolio estimate. Issue ranges are summed
/// independently, so a model implicated in more than one issue is counted in
/// each of them.
pub const ESTIMATE_NOTE: &str =
    "Issue savings ranges are summed independently; a model implicated in more \
     than one issue is counted in each, so the bounds can overstate overlap.";

/// Aggregate savings estimate across all detected issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    /// Low-bound recoverable dollars
    pub low_cost: f64,
    /// High-bound recoverable dollars
    pub high_cost: f64,
    /// Low bound as percent of grand total spend
    pub low_pct: f64,
    /// High bound as percent of grand total spend
    pub high_pct: f64,
    /// Caveat describing how the bounds were combined
    pub estimate_note: String,
}

/// Sum each issue's dollar range independently into portfolio bounds.
pub fn estimate_portfolio(issues: &[Issue], total_cost: f64) -> SavingsEstimate {
    let low_cost: f64 = issues.iter().map(|i| i.savings.low_cost).sum();
    let high_cost: f64 = issues.iter().map(|i| i.savings.high_cost).sum();
    let (low_pct, high_pct) = if total_cost > 0.0 {
        (low_cost / total_cost * 100.0, high_cost / total_cost * 100.0)
    } else {
        (0.0, 0.0)
    };
    SavingsEstimate {
        low_cost,
        high_cost,
        low_pct,
        high_pct,
        estimate_note: ESTIMATE_NOTE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Issue, IssueKind, SavingsRange, Severity};
    use pf_core::ModelName;

    fn issue(model: &str, low: f64, high: f64) -> Issue {
        Issue {
            kind: IssueKind::ZombieModel {
                model: ModelName::new(model),
                cost_share_pct: 0.0,
            },
            severity: 0.5,
            level: Severity::Warning,
            rationale: String::new(),
            recommendation: None,
            savings: SavingsRange {
                low_cost: low,
                high_cost: high,
                low_pct: 0.0,
                high_pct: 0.0,
            },
            detector: "zombie".to_string(),
        }
    }

    #[test]
    fn test_ranges_summed_independently() {
        let issues = vec![issue("a", 1.0, 2.0), issue("b", 3.0, 5.0)];
        let estimate = estimate_portfolio(&issues, 100.0);
        assert_eq!(estimate.low_cost, 4.0);
        assert_eq!(estimate.high_cost, 7.0);
        assert_eq!(estimate.low_pct, 4.0);
        assert_eq!(estimate.high_pct, 7.0);
        assert!(!estimate.estimate_note.is_empty());
    }

    #[test]
    fn test_no_issues_zero_estimate() {
        let estimate = estimate_portfolio(&[], 100.0);
        assert_eq!(estimate.low_cost, 0.0);
        assert_eq!(estimate.high_cost, 0.0);
    }

    #[test]
    fn test_zero_total_spend_guards_percentages() {
        let estimate = estimate_portfolio(&[issue("a", 1.0, 2.0)], 0.0);
        assert_eq!(estimate.low_pct, 0.0);
        assert_eq!(estimate.high_pct, 0.0);
    }
}
