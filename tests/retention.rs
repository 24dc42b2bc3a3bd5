// ABOUTME: Property and scenario tests for the retention evaluator and plan.
// ABOUTME: Untagged versions go, recent versions stay, protected tags exempt stale versions.

use arsweep::retention::*;
use arsweep::types::{ImageRecord, RepositoryPath};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn evaluator() -> Evaluator {
    Evaluator::new(
        RepositoryPath::new("acme", "europe-west4", "images").unwrap(),
        RetentionPolicy::keep_days(30, now()),
    )
}

fn record(digest: &str, tags: &[&str], age_days: i64) -> ImageRecord {
    ImageRecord::new(
        format!("projects/acme/locations/europe-west4/repositories/images/dockerImages/api@sha256:{digest}"),
        tags.iter().map(|t| t.to_string()).collect(),
        now() - Duration::days(age_days),
    )
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9.-]{1,12}"
}

/// Tags that cannot contain "latest".
fn unprotected_tag_strategy() -> impl Strategy<Value = String> {
    "v[0-9]{1,3}(\\.[0-9]{1,3}){0,2}"
}

proptest! {
    #[test]
    fn untagged_versions_are_always_deleted(age_secs in -1_000_000_000i64..1_000_000_000i64) {
        let record = ImageRecord::new(
            "dockerImages/api@sha256:00",
            vec![],
            now() - Duration::seconds(age_secs),
        );
        let decision = evaluator().evaluate(&record).unwrap();
        prop_assert!(decision.is_delete());
    }

    #[test]
    fn recent_versions_are_always_kept(
        tags in prop::collection::vec(tag_strategy(), 1..6),
        secs_after_cutoff in 0i64..100_000_000i64,
    ) {
        let cutoff = evaluator().policy().cutoff();
        let record = ImageRecord::new(
            "dockerImages/api@sha256:00",
            tags,
            cutoff + Duration::seconds(secs_after_cutoff),
        );
        prop_assert_eq!(
            evaluator().evaluate(&record).unwrap(),
            Decision::Keep(KeepReason::Recent)
        );
    }

    #[test]
    fn stale_versions_with_marker_substring_are_kept(
        mut tags in prop::collection::vec(unprotected_tag_strategy(), 0..5),
        prefix in "[a-z0-9-]{0,5}",
        suffix in "[a-z0-9-]{0,5}",
        position in any::<prop::sample::Index>(),
        age_days in 31i64..3650,
    ) {
        let protected = format!("{prefix}latest{suffix}");
        let at = position.index(tags.len() + 1);
        tags.insert(at, protected.clone());

        let record = ImageRecord::new(
            "dockerImages/api@sha256:00",
            tags,
            now() - Duration::days(age_days),
        );
        let decision = evaluator().evaluate(&record).unwrap();
        let is_protected_keep = matches!(decision, Decision::Keep(KeepReason::Protected { ref tag, .. }) if *tag == protected);
        prop_assert!(is_protected_keep);
    }

    #[test]
    fn stale_unprotected_versions_delete_every_tag(
        tags in prop::collection::vec(unprotected_tag_strategy(), 1..8),
        age_days in 31i64..3650,
    ) {
        let record = ImageRecord::new(
            "dockerImages/api@sha256:00",
            tags.clone(),
            now() - Duration::days(age_days),
        );
        let Decision::Delete(targets) = evaluator().evaluate(&record).unwrap() else {
            return Err(TestCaseError::fail("expected delete"));
        };
        prop_assert_eq!(targets.reason, DeleteReason::Stale);
        let deleted: Vec<String> = targets
            .tags
            .iter()
            .map(|t| t.as_str().rsplit("/tags/").next().unwrap().to_string())
            .collect();
        prop_assert_eq!(deleted, tags);
    }
}

#[test]
fn stale_version_with_two_tags_yields_two_tag_targets() {
    let Decision::Delete(targets) = evaluator().evaluate(&record("aa", &["v1", "v2"], 40)).unwrap()
    else {
        panic!("expected delete");
    };

    let prefix = "projects/acme/locations/europe-west4/repositories/images/packages/api";
    assert_eq!(
        targets.tags.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        vec![format!("{prefix}/tags/v1"), format!("{prefix}/tags/v2")]
    );
    assert_eq!(
        targets.version.as_str(),
        format!("{prefix}/versions/sha256:aa")
    );
}

#[test]
fn exactly_at_cutoff_is_kept() {
    let cutoff = evaluator().policy().cutoff();
    let mut at_cutoff = record("aa", &["v1"], 0);
    at_cutoff.upload_time = cutoff;
    assert_eq!(
        evaluator().evaluate(&at_cutoff).unwrap(),
        Decision::Keep(KeepReason::Recent)
    );
}

#[test]
fn thirty_day_scenario_builds_expected_plan() {
    let records = vec![
        record("01", &[], 40),
        record("02", &["latest"], 40),
        record("03", &["v2"], 40),
        record("04", &["v3"], 10),
    ];

    let evaluator = evaluator();
    let mut plan = DeletionPlan::new();
    for r in &records {
        plan.record(evaluator.evaluate(r).unwrap());
    }

    let prefix = "projects/acme/locations/europe-west4/repositories/images/packages/api";
    assert_eq!(
        plan.version_targets()
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>(),
        vec![
            format!("{prefix}/versions/sha256:01"),
            format!("{prefix}/versions/sha256:03"),
        ]
    );
    assert_eq!(
        plan.tag_targets()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>(),
        vec![format!("{prefix}/tags/v2")]
    );
}

#[test]
fn custom_marker_protects_instead_of_latest() {
    let markers = nonempty::NonEmpty::new("release".to_string());
    let evaluator = Evaluator::new(
        RepositoryPath::new("acme", "europe-west4", "images").unwrap(),
        RetentionPolicy::keep_days(30, now()).with_markers(markers),
    );

    assert!(evaluator.evaluate(&record("aa", &["latest"], 40)).unwrap().is_delete());
    assert!(!evaluator.evaluate(&record("bb", &["release-7"], 40)).unwrap().is_delete());
}
