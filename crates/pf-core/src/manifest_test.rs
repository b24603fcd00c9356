use super::*;

const DBT_MANIFEST: &str = r#"{
  "nodes": {
    "model.proj.stg_users": {
      "resource_type": "model",
      "name": "stg_users",
      "config": {"materialized": "view"},
      "raw_sql": "SELECT * FROM raw.users",
      "depends_on": {"nodes": []}
    },
    "model.proj.dim_users": {
      "resource_type": "model",
      "name": "dim_users",
      "config": {
        "materialized": "table",
        "meta": {"refresh_interval_seconds": 3600, "freshness_interval_seconds": 86400}
      },
      "raw_sql": "SELECT * FROM {{ ref('stg_users') }}",
      "depends_on": {"nodes": ["model.proj.stg_users"]}
    },
    "test.proj.not_null": {
      "resource_type": "test",
      "name": "not_null"
    }
  }
}"#;

#[test]
fn test_from_dbt_json_filters_non_models() {
    let manifest = ManifestDocument::from_dbt_json_str(DBT_MANIFEST).unwrap();
    assert_eq!(manifest.model_count(), 2);

    let names: Vec<&str> = manifest.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["dim_users", "stg_users"]);
}

#[test]
fn test_from_dbt_json_dependency_paths_reduced() {
    let manifest = ManifestDocument::from_dbt_json_str(DBT_MANIFEST).unwrap();
    let dim = manifest.models.iter().find(|m| m.name == "dim_users").unwrap();
    assert!(dim.depends_on.contains("stg_users"));
    assert_eq!(dim.materialization, Materialization::Table);
}

#[test]
fn test_from_dbt_json_meta_intervals() {
    let manifest = ManifestDocument::from_dbt_json_str(DBT_MANIFEST).unwrap();
    let dim = manifest.models.iter().find(|m| m.name == "dim_users").unwrap();
    assert_eq!(dim.refresh_cadence, Some(Duration::hours(1)));
    assert_eq!(dim.source_freshness, Some(Duration::hours(24)));

    let stg = manifest.models.iter().find(|m| m.name == "stg_users").unwrap();
    assert_eq!(stg.refresh_cadence, None);
}

#[test]
fn test_from_dbt_json_fingerprints_raw_sql() {
    let manifest = ManifestDocument::from_dbt_json_str(DBT_MANIFEST).unwrap();
    let stg = manifest.models.iter().find(|m| m.name == "stg_users").unwrap();
    assert_eq!(
        stg.fingerprint,
        Some(Fingerprint::of_sql("SELECT * FROM raw.users"))
    );
}

#[test]
fn test_from_dbt_json_missing_nodes_is_parse_error() {
    let err = ManifestDocument::from_dbt_json_str("{}").err().unwrap();
    assert!(matches!(err, CoreError::ManifestParse { .. }));
}

#[test]
fn test_native_json_roundtrip() {
    let mut model = Model::new("fct_orders");
    model.depends_on.insert(ModelName::new("stg_orders"));
    let manifest = ManifestDocument::new(vec![model]);

    let json = serde_json::to_string(&manifest).unwrap();
    let back = ManifestDocument::from_json_str(&json).unwrap();
    assert_eq!(back.model_count(), 1);
    assert_eq!(back.models[0].name, "fct_orders");
}

#[test]
fn test_build_models_rejects_duplicates() {
    let manifest = ManifestDocument::new(vec![Model::new("a"), Model::new("a")]);
    let err = manifest.build_models().err().unwrap();
    assert!(matches!(err, CoreError::DuplicateModel { name } if name == "a"));
}

#[test]
fn test_load_from_file() {
    use std::io::Write as _;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    let manifest = ManifestDocument::new(vec![Model::new("stg_orders")]);
    write!(file, "{}", serde_json::to_string(&manifest).unwrap()).unwrap();

    let loaded = ManifestDocument::load(file.path()).unwrap();
    assert_eq!(loaded.model_count(), 1);
}

#[test]
fn test_load_dbt_from_file() {
    use std::io::Write as _;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", DBT_MANIFEST).unwrap();

    let loaded = ManifestDocument::load_dbt(file.path()).unwrap();
    assert_eq!(loaded.model_count(), 2);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = ManifestDocument::load(Path::new("/nonexistent/manifest.json"))
        .err()
        .unwrap();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}
