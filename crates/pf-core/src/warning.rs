//! Recoverable warnings accumulated during analysis.

use crate::model_name::ModelName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable input anomaly.
///
/// Warnings never abort the pipeline; they are collected and returned
/// alongside the analysis result so callers can surface them without losing
/// the otherwise-valid analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A model declares a dependency that does not exist in the manifest.
    /// The edge is dropped; the model keeps a known-incomplete dependency set.
    DanglingReference {
        model: ModelName,
        dependency: ModelName,
    },

    /// An execution record's model name has no graph match. The record's
    /// credits land in the unattributed bucket.
    UnresolvedExecution { model: ModelName, credits: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DanglingReference { model, dependency } => {
                write!(f, "model '{model}' depends on unknown model '{dependency}'")
            }
            Warning::UnresolvedExecution { model, credits } => {
                write!(f, "execution of unknown model '{model}' ({credits} credits)")
            }
        }
    }
}
