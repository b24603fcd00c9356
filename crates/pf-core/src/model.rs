//! Model records — the nodes of the dependency graph.

use crate::fingerprint::Fingerprint;
use crate::model_name::ModelName;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a model is materialized in the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    /// View (default)
    #[default]
    View,
    /// Physical table
    Table,
    /// Incrementally-maintained table
    Incremental,
    /// Inlined into downstream queries, never materialized
    Ephemeral,
}

impl Materialization {
    /// Parse a manifest config value, defaulting to `View` for unknown values.
    pub fn from_config(value: &str) -> Self {
        match value {
            "table" => Materialization::Table,
            "incremental" => Materialization::Incremental,
            "ephemeral" => Materialization::Ephemeral,
            _ => Materialization::View,
        }
    }
}

impl std::fmt::Display for Materialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Materialization::View => write!(f, "view"),
            Materialization::Table => write!(f, "table"),
            Materialization::Incremental => write!(f, "incremental"),
            Materialization::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// A named data-transformation model and node in the dependency graph.
///
/// `depends_on` is declared input; `downstream` is derived once from the edge
/// transpose during graph construction and is empty on freshly-parsed models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Unique model name (graph key)
    pub name: ModelName,

    /// Names of upstream models this model reads from
    #[serde(default)]
    pub depends_on: BTreeSet<ModelName>,

    /// Names of downstream models that read from this model (derived)
    #[serde(default)]
    pub downstream: BTreeSet<ModelName>,

    /// Materialization declared in the manifest
    #[serde(default)]
    pub materialization: Materialization,

    /// Declared refresh cadence, if any
    #[serde(
        default,
        rename = "refresh_cadence_seconds",
        with = "crate::serde_helpers::opt_duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_cadence: Option<Duration>,

    /// Declared source-freshness requirement, if any
    #[serde(
        default,
        rename = "source_freshness_seconds",
        with = "crate::serde_helpers::opt_duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_freshness: Option<Duration>,

    /// Opaque structural fingerprint of the defining query, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl Model {
    /// Create a model with no dependencies and no declared metadata.
    pub fn new(name: impl Into<ModelName>) -> Self {
        Self {
            name: name.into(),
            depends_on: BTreeSet::new(),
            downstream: BTreeSet::new(),
            materialization: Materialization::default(),
            refresh_cadence: None,
            source_freshness: None,
            fingerprint: None,
        }
    }

    /// True if no downstream model consumes this model's output.
    ///
    /// Only meaningful after `downstream` has been derived from the graph.
    pub fn is_terminal(&self) -> bool {
        self.downstream.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_new_defaults() {
        let m = Model::new("stg_orders");
        assert_eq!(m.name, "stg_orders");
        assert!(m.depends_on.is_empty());
        assert!(m.is_terminal());
        assert_eq!(m.materialization, Materialization::View);
        assert!(m.fingerprint.is_none());
    }

    #[test]
    fn test_materialization_from_config() {
        assert_eq!(Materialization::from_config("table"), Materialization::Table);
        assert_eq!(
            Materialization::from_config("incremental"),
            Materialization::Incremental
        );
        assert_eq!(Materialization::from_config("bogus"), Materialization::View);
    }

    #[test]
    fn test_model_serde_durations_as_seconds() {
        let mut m = Model::new("fct_orders");
        m.refresh_cadence = Some(Duration::hours(1));
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""refresh_cadence_seconds":3600"#));

        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back.refresh_cadence, Some(Duration::hours(1)));
        assert_eq!(back.source_freshness, None);
    }
}
