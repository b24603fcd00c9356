//! Input manifest document describing models and their dependencies.
//!
//! The engine consumes an already-parsed [`ManifestDocument`]; the loaders
//! here are caller-side conveniences for the two shapes seen in the wild:
//! the native Pennyflow shape and dbt's `manifest.json`.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::Fingerprint;
use crate::model::{Materialization, Model};
use crate::model_name::ModelName;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The manifest handed to the engine: all declared models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDocument {
    /// All models declared in the manifest
    pub models: Vec<Model>,
}

impl ManifestDocument {
    /// Build a manifest from a list of models.
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    /// Parse the native JSON shape (`{"models": [...]}`).
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::ManifestParse {
            message: e.to_string(),
        })
    }

    /// Parse a dbt `manifest.json`.
    ///
    /// Keeps `nodes` entries with `resource_type == "model"`. Dependency
    /// paths like `model.proj.stg_orders` are reduced to their final segment.
    /// The raw SQL (`raw_sql`, falling back to `raw_code`) is hashed into the
    /// structural fingerprint; refresh cadence and source freshness are read
    /// from `config.meta.refresh_interval_seconds` /
    /// `config.meta.freshness_interval_seconds` when declared.
    pub fn from_dbt_json_str(json: &str) -> CoreResult<Self> {
        let doc: serde_json::Value =
            serde_json::from_str(json).map_err(|e| CoreError::ManifestParse {
                message: e.to_string(),
            })?;
        let Some(nodes) = doc.get("nodes").and_then(|n| n.as_object()) else {
            return Err(CoreError::ManifestParse {
                message: "dbt manifest missing 'nodes' object".to_string(),
            });
        };

        let mut models = Vec::new();
        for node in nodes.values() {
            if node.get("resource_type").and_then(|v| v.as_str()) != Some("model") {
                continue;
            }

            let name = node.get("name").and_then(|v| v.as_str()).unwrap_or_default();
            let name = ModelName::try_new(name).ok_or_else(|| CoreError::EmptyName {
                context: "model name in dbt manifest".to_string(),
            })?;

            let depends_on: BTreeSet<ModelName> = node
                .pointer("/depends_on/nodes")
                .and_then(|v| v.as_array())
                .map(|deps| {
                    deps.iter()
                        .filter_map(|d| d.as_str())
                        .filter_map(|path| path.rsplit('.').next())
                        .filter_map(ModelName::try_new)
                        .collect()
                })
                .unwrap_or_default();

            let fingerprint = node
                .get("raw_sql")
                .or_else(|| node.get("raw_code"))
                .and_then(|v| v.as_str())
                .filter(|sql| !sql.is_empty())
                .map(Fingerprint::of_sql);

            let materialization = node
                .pointer("/config/materialized")
                .and_then(|v| v.as_str())
                .map(Materialization::from_config)
                .unwrap_or_default();

            let refresh_cadence = node
                .pointer("/config/meta/refresh_interval_seconds")
                .and_then(|v| v.as_i64())
                .map(Duration::seconds);
            let source_freshness = node
                .pointer("/config/meta/freshness_interval_seconds")
                .and_then(|v| v.as_i64())
                .map(Duration::seconds);

            models.push(Model {
                name,
                depends_on,
                downstream: BTreeSet::new(),
                materialization,
                refresh_cadence,
                source_freshness,
                fingerprint,
            });
        }

        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { models })
    }

    /// Load the native JSON shape from a file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Load a dbt `manifest.json` from a file.
    pub fn load_dbt(path: &Path) -> CoreResult<Self> {
        Self::from_dbt_json_str(&read_file(path)?)
    }

    /// Index the declared models by name. A repeated name is fatal.
    pub fn build_models(&self) -> CoreResult<BTreeMap<ModelName, Model>> {
        let mut map = BTreeMap::new();
        for model in &self.models {
            if map.insert(model.name.clone(), model.clone()).is_some() {
                return Err(CoreError::DuplicateModel {
                    name: model.name.to_string(),
                });
            }
        }
        Ok(map)
    }

    /// Total number of declared models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

fn read_file(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
