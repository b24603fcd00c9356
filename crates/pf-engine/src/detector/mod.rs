//! Detector infrastructure — independent waste heuristics over the attributed graph.

pub mod over_schedule;
pub mod redundant;
pub mod zombie;

use crate::context::AnalysisContext;
use pf_core::{Fingerprint, ModelName};
use serde::{Deserialize, Serialize};

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational — no action required
    Info,
    /// Warning — worth reviewing
    Warning,
    /// Critical — significant recoverable spend
    Critical,
}

impl Severity {
    /// Map a [0, 1] severity score onto a display level.
    pub fn for_score(score: f64) -> Self {
        if score >= 0.05 {
            Severity::Critical
        } else if score >= 0.01 {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Fraction of a point estimate used as the savings low bound.
const LOW_BOUND_FRACTION: f64 = 0.5;

/// Estimated savings range for an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRange {
    /// Low-bound dollar savings
    pub low_cost: f64,
    /// High-bound dollar savings
    pub high_cost: f64,
    /// Low bound as percent of grand total spend
    pub low_pct: f64,
    /// High bound as percent of grand total spend
    pub high_pct: f64,
}

impl SavingsRange {
    /// Build a range from a point estimate: high = point, low = half the point.
    pub fn from_point(point_cost: f64, total_cost: f64) -> Self {
        let low_cost = point_cost * LOW_BOUND_FRACTION;
        let (low_pct, high_pct) = if total_cost > 0.0 {
            (
                low_cost / total_cost * 100.0,
                point_cost / total_cost * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            low_cost,
            high_cost: point_cost,
            low_pct,
            high_pct,
        }
    }
}

/// Variant-specific payload of a detected issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// Terminal model consuming a disproportionate share of total spend
    ZombieModel {
        model: ModelName,
        cost_share_pct: f64,
    },
    /// Model refreshed more often than its source data changes
    OverScheduled {
        model: ModelName,
        refresh_interval_seconds: i64,
        freshness_interval_seconds: i64,
        savings_fraction: f64,
    },
    /// Models independently recomputing structurally equivalent work
    RedundantComputeGroup {
        models: Vec<ModelName>,
        keep: ModelName,
        fingerprint: Fingerprint,
    },
}

impl IssueKind {
    /// Model name used for deterministic tie-breaking and display.
    ///
    /// For a redundant group this is the first member in name order.
    pub fn primary_model(&self) -> &ModelName {
        match self {
            IssueKind::ZombieModel { model, .. } => model,
            IssueKind::OverScheduled { model, .. } => model,
            IssueKind::RedundantComputeGroup { models, keep, .. } => {
                models.first().unwrap_or(keep)
            }
        }
    }
}

/// A detected waste pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Variant-specific payload
    #[serde(flatten)]
    pub kind: IssueKind,

    /// Severity score in [0, 1]
    pub severity: f64,

    /// Display level derived from the severity score
    pub level: Severity,

    /// What was observed and why it matters
    pub rationale: String,

    /// Suggested action (None when recommendations are disabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    /// Estimated savings range
    pub savings: SavingsRange,

    /// Name of the detector that produced this issue
    pub detector: String,
}

/// A waste-detection heuristic.
///
/// Detectors are pure functions over the context: no shared mutable state,
/// no ordering dependencies between detectors.
pub trait Detector: Send + Sync {
    /// Detector name (used for filtering and display)
    fn name(&self) -> &'static str;
    /// Human-readable description
    fn description(&self) -> &'static str;
    /// Run the detector over the attributed graph
    fn run(&self, ctx: &AnalysisContext) -> Vec<Issue>;
}

/// Manages and runs waste detectors.
pub struct DetectorSuite {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorSuite {
    /// Create a suite with all built-in detectors registered.
    pub fn with_defaults() -> Self {
        Self {
            detectors: vec![
                Box::new(zombie::ZombieDetector),
                Box::new(over_schedule::OverScheduleDetector),
                Box::new(redundant::RedundantComputeDetector),
            ],
        }
    }

    /// Run all detectors and return one deterministically ordered issue list.
    ///
    /// Issues sort by high-bound savings descending, ties broken by the
    /// implicated model name then detector name, so the result does not
    /// depend on registration order.
    pub fn run(&self, ctx: &AnalysisContext) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .detectors
            .iter()
            .flat_map(|d| d.run(ctx))
            .collect();
        sort_issues(&mut issues);
        issues
    }

    /// List all registered detector names.
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }
}

pub(crate) fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        b.savings
            .high_cost
            .total_cmp(&a.savings.high_cost)
            .then_with(|| a.kind.primary_model().cmp(b.kind.primary_model()))
            .then_with(|| a.detector.cmp(&b.detector))
    });
}
