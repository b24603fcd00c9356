use super::*;
use crate::detector::Detector;
use crate::execution::QueryExecution;
use crate::test_utils::{models_of, ts, Fixture};
use pf_core::{AnalysisConfig, Model};

fn fingerprinted(models: &mut std::collections::BTreeMap<ModelName, Model>, name: &str, sql: &str) {
    models.get_mut(name).unwrap().fingerprint = Some(Fingerprint::of_sql(sql));
}

fn revenue_fixture(config: AnalysisConfig) -> Fixture {
    let mut models = models_of(&[
        ("revenue_v1", &[]),
        ("revenue_v2", &[]),
        ("costs", &[]),
    ]);
    fingerprinted(&mut models, "revenue_v1", "SELECT * FROM revenue");
    fingerprinted(&mut models, "revenue_v2", "SELECT * FROM revenue");
    fingerprinted(&mut models, "costs", "SELECT * FROM costs");

    let executions = vec![
        QueryExecution::new("revenue_v1", 10.0, ts(0)),
        QueryExecution::new("revenue_v2", 4.0, ts(0)),
        QueryExecution::new("costs", 5.0, ts(0)),
    ];
    Fixture::new(models, &executions, config)
}

#[test]
fn test_identical_fingerprints_grouped_savings_exclude_keeper() {
    let fixture = revenue_fixture(AnalysisConfig::default());
    let issues = RedundantComputeDetector.run(&fixture.ctx());

    assert_eq!(issues.len(), 1);
    let IssueKind::RedundantComputeGroup { models, keep, .. } = &issues[0].kind else {
        panic!("expected RedundantComputeGroup issue");
    };
    assert_eq!(
        models,
        &vec![ModelName::new("revenue_v1"), ModelName::new("revenue_v2")]
    );
    // The 10.0-cost member is kept; savings are exactly the 4.0 member
    assert_eq!(*keep, "revenue_v1");
    assert_eq!(issues[0].savings.high_cost, 4.0);
}

#[test]
fn test_unique_fingerprints_not_flagged() {
    let fixture = revenue_fixture(AnalysisConfig::default());
    let issues = RedundantComputeDetector.run(&fixture.ctx());
    assert!(!issues.iter().any(|i| matches!(
        &i.kind,
        IssueKind::RedundantComputeGroup { models, .. } if models.iter().any(|m| *m == "costs")
    )));
}

#[test]
fn test_missing_fingerprints_never_group() {
    let models = models_of(&[("a", &[]), ("b", &[])]);
    let executions = vec![
        QueryExecution::new("a", 1.0, ts(0)),
        QueryExecution::new("b", 1.0, ts(0)),
    ];
    let fixture = Fixture::new(models, &executions, AnalysisConfig::default());
    assert!(RedundantComputeDetector.run(&fixture.ctx()).is_empty());
}

#[test]
fn test_cost_tie_keeps_first_by_name() {
    let mut models = models_of(&[("dup_b", &[]), ("dup_a", &[])]);
    fingerprinted(&mut models, "dup_a", "SELECT 1");
    fingerprinted(&mut models, "dup_b", "SELECT 1");
    let executions = vec![
        QueryExecution::new("dup_a", 3.0, ts(0)),
        QueryExecution::new("dup_b", 3.0, ts(0)),
    ];
    let fixture = Fixture::new(models, &executions, AnalysisConfig::default());

    let issues = RedundantComputeDetector.run(&fixture.ctx());
    let IssueKind::RedundantComputeGroup { keep, .. } = &issues[0].kind else {
        panic!("expected RedundantComputeGroup issue");
    };
    assert_eq!(*keep, "dup_a");
}

#[test]
fn test_first_by_name_keep_policy() {
    let mut models = models_of(&[("dup_a", &[]), ("dup_b", &[])]);
    fingerprinted(&mut models, "dup_a", "SELECT 1");
    fingerprinted(&mut models, "dup_b", "SELECT 1");
    // dup_b is the expensive one, but name order wins under this policy
    let executions = vec![
        QueryExecution::new("dup_a", 2.0, ts(0)),
        QueryExecution::new("dup_b", 8.0, ts(0)),
    ];
    let mut config = AnalysisConfig::default();
    config.redundancy_keep_policy = KeepPolicy::FirstByName;
    let fixture = Fixture::new(models, &executions, config);

    let issues = RedundantComputeDetector.run(&fixture.ctx());
    let IssueKind::RedundantComputeGroup { keep, .. } = &issues[0].kind else {
        panic!("expected RedundantComputeGroup issue");
    };
    assert_eq!(*keep, "dup_a");
    assert_eq!(issues[0].savings.high_cost, 8.0);
}

#[test]
fn test_three_member_group_savings() {
    let mut models = models_of(&[("v1", &[]), ("v2", &[]), ("v3", &[])]);
    for name in ["v1", "v2", "v3"] {
        fingerprinted(&mut models, name, "SELECT * FROM shared");
    }
    let executions = vec![
        QueryExecution::new("v1", 10.0, ts(0)),
        QueryExecution::new("v2", 10.0, ts(0)),
        QueryExecution::new("v3", 10.0, ts(0)),
    ];
    let fixture = Fixture::new(models, &executions, AnalysisConfig::default());

    let issues = RedundantComputeDetector.run(&fixture.ctx());
    assert_eq!(issues.len(), 1);
    // All but one member is recoverable
    assert_eq!(issues[0].savings.high_cost, 20.0);
}
