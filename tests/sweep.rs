// ABOUTME: End-to-end sweep tests against the in-memory registry.
// ABOUTME: Covers failure isolation, the tag-before-version barrier, dry runs, and fatal errors.

use std::time::Duration;

use arsweep::diagnostics::FailureKind;
use arsweep::registry::{MemoryRegistry, RegistryCall};
use arsweep::retention::RetentionPolicy;
use arsweep::sweep::{self, Sweep, SweepErrorKind, SweepOptions};
use arsweep::types::{ImageRecord, RepositoryPath};
use chrono::{DateTime, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

const PACKAGES: &str = "projects/acme/locations/europe-west4/repositories/images/packages/api";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn repository() -> RepositoryPath {
    RepositoryPath::new("acme", "europe-west4", "images").unwrap()
}

fn options() -> SweepOptions {
    SweepOptions::new(repository(), RetentionPolicy::keep_days(30, now()))
}

fn record(digest: &str, tags: &[&str], age_days: i64) -> ImageRecord {
    ImageRecord::new(
        format!("projects/acme/locations/europe-west4/repositories/images/dockerImages/api@sha256:{digest}"),
        tags.iter().map(|t| t.to_string()).collect(),
        now() - chrono::Duration::days(age_days),
    )
}

fn tag(name: &str) -> String {
    format!("{PACKAGES}/tags/{name}")
}

fn version(digest: &str) -> String {
    format!("{PACKAGES}/versions/sha256:{digest}")
}

/// Records from the 30 day scenario: one untagged, one protected, one stale, one recent.
fn scenario() -> Vec<ImageRecord> {
    vec![
        record("01", &[], 40),
        record("02", &["latest"], 40),
        record("03", &["v2"], 40),
        record("04", &["v3"], 10),
    ]
}

/// Many stale versions with two tags each.
fn stale_inventory(count: usize) -> Vec<ImageRecord> {
    (0..count)
        .map(|n| {
            let a = format!("a{n}");
            let b = format!("b{n}");
            record(&format!("{n:02}"), &[a.as_str(), b.as_str()], 60)
        })
        .collect()
}

#[tokio::test]
async fn scenario_deletes_stale_and_untagged_versions() {
    let registry = MemoryRegistry::new(scenario());
    let report = sweep::run(&registry, options(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(registry.deleted_tags(), vec![tag("v2")]);
    let mut versions = registry.deleted_versions();
    versions.sort();
    assert_eq!(versions, vec![version("01"), version("03")]);

    assert_eq!(report.summary.listed, 4);
    assert_eq!(report.summary.kept_recent, 1);
    assert_eq!(report.summary.kept_protected, 1);
    assert_eq!(report.summary.deleted_untagged, 1);
    assert_eq!(report.summary.deleted_stale, 1);
    assert!(!report.has_failures());
    assert!(!report.cancelled);
}

#[tokio::test]
async fn dry_run_issues_no_delete_calls() {
    let registry = MemoryRegistry::new(scenario());
    let report = sweep::run(&registry, options().dry_run(true), &CancellationToken::new())
        .await
        .unwrap();

    assert!(registry.calls().is_empty());
    assert!(report.dry_run);
    assert_eq!(report.tag_targets, 1);
    assert_eq!(report.version_targets, 2);
    assert!(report.tags.is_none());
    assert!(report.versions.is_none());
    assert_eq!(report.plan.version_targets().len(), 2);
}

#[tokio::test]
async fn every_tag_is_deleted_before_any_version() {
    let registry = MemoryRegistry::new(stale_inventory(12)).with_latency(Duration::from_millis(2));
    let report = sweep::run(&registry, options().concurrency(4), &CancellationToken::new())
        .await
        .unwrap();

    let calls = registry.calls();
    let last_tag = calls
        .iter()
        .rposition(|c| matches!(c, RegistryCall::DeleteTag(_)))
        .unwrap();
    let first_version = calls
        .iter()
        .position(|c| matches!(c, RegistryCall::DeleteVersion(_)))
        .unwrap();
    assert!(last_tag < first_version);

    assert_eq!(registry.deleted_tags().len(), 24);
    assert_eq!(registry.deleted_versions().len(), 12);
    assert_eq!(report.tags.as_ref().unwrap().workers, 4);
}

#[tokio::test]
async fn each_version_is_waited_on_before_the_next_in_its_partition() {
    let registry = MemoryRegistry::new(stale_inventory(3));
    sweep::run(&registry, options().concurrency(1), &CancellationToken::new())
        .await
        .unwrap();

    let version_calls: Vec<RegistryCall> = registry
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, RegistryCall::DeleteTag(_)))
        .collect();
    let expected: Vec<RegistryCall> = (0..3)
        .flat_map(|n| {
            let target = version(&format!("{n:02}"));
            [
                RegistryCall::DeleteVersion(target.clone()),
                RegistryCall::WaitOperation(target),
            ]
        })
        .collect();
    assert_eq!(version_calls, expected);
}

#[tokio::test]
async fn failed_tag_does_not_stop_its_partition() {
    // six tags across two workers: [a0, b0, a1] and [b1, a2, b2]
    let registry = MemoryRegistry::new(stale_inventory(3)).fail_tag(tag("a0"));
    let report = sweep::run(&registry, options().concurrency(2), &CancellationToken::new())
        .await
        .unwrap();

    let mut deleted = registry.deleted_tags();
    deleted.sort();
    let mut expected: Vec<String> = ["a0", "a1", "a2", "b0", "b1", "b2"]
        .iter()
        .map(|t| tag(t))
        .collect();
    expected.sort();
    assert_eq!(deleted, expected);
    assert_eq!(registry.deleted_versions().len(), 3);

    let tags = report.tags.as_ref().unwrap();
    assert_eq!(tags.workers, 2);
    assert_eq!(tags.attempted, 6);
    assert_eq!(tags.failed(), 1);
    assert_eq!(tags.succeeded(), 5);
    assert_eq!(tags.failed_targets().collect::<Vec<_>>(), vec![tag("a0")]);
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn submit_and_wait_failures_are_reported_separately() {
    let registry = MemoryRegistry::new(stale_inventory(3))
        .fail_version_submit(version("00"))
        .fail_version_wait(version("01"));
    let report = sweep::run(&registry, options().concurrency(2), &CancellationToken::new())
        .await
        .unwrap();

    let kinds: Vec<(FailureKind, String)> = report
        .failures()
        .map(|f| (f.kind, f.target.clone()))
        .collect();
    assert!(kinds.contains(&(FailureKind::VersionSubmit, version("00"))));
    assert!(kinds.contains(&(FailureKind::VersionWait, version("01"))));
    assert_eq!(kinds.len(), 2);

    // A rejected submission has no operation to wait on.
    assert!(
        !registry
            .calls()
            .contains(&RegistryCall::WaitOperation(version("00")))
    );
    assert_eq!(report.versions.as_ref().unwrap().succeeded(), 1);
}

#[tokio::test]
async fn listing_failure_is_fatal_and_deletes_nothing() {
    let registry = MemoryRegistry::new(scenario()).fail_listing_after(2);
    let err = sweep::run(&registry, options(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SweepErrorKind::Inventory);
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn malformed_identifier_of_deleted_record_is_fatal() {
    let mut records = scenario();
    records.push(ImageRecord::new("dockerImages/no-digest", vec![], now()));
    let registry = MemoryRegistry::new(records);

    let err = sweep::run(&registry, options(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SweepErrorKind::Decision);
    assert!(err.to_string().contains("dockerImages/no-digest"));
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn unavailable_registry_fails_before_deleting() {
    let registry = MemoryRegistry::new(scenario()).unavailable();
    let err = sweep::run(&registry, options(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SweepErrorKind::Client);
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn unavailable_registry_still_allows_dry_run() {
    let registry = MemoryRegistry::new(scenario()).unavailable();
    let report = sweep::run(&registry, options().dry_run(true), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.version_targets, 2);
}

#[tokio::test]
async fn empty_plan_completes_without_calls() {
    let registry = MemoryRegistry::new(vec![record("04", &["v3"], 1)]);
    let report = sweep::run(&registry, options(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(registry.calls().is_empty());
    assert_eq!(report.tags.as_ref().unwrap().workers, 0);
    assert_eq!(report.versions.as_ref().unwrap().total, 0);
}

#[tokio::test]
async fn cancelled_before_listing_is_fatal() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let registry = MemoryRegistry::new(scenario());

    let err = sweep::run(&registry, options(), &cancel).await.unwrap_err();
    assert_eq!(err.kind(), SweepErrorKind::Cancelled);
}

#[tokio::test]
async fn cancelled_after_planning_skips_remaining_work() {
    let registry = MemoryRegistry::new(stale_inventory(5));
    let cancel = CancellationToken::new();

    let planned = Sweep::new(options().concurrency(2))
        .evaluate(&registry, &cancel)
        .await
        .unwrap();
    assert_eq!(planned.plan().version_targets().len(), 5);

    cancel.cancel();
    let completed = planned
        .delete_tags(&registry, &cancel)
        .await
        .unwrap()
        .delete_versions(&registry, &cancel)
        .await;

    let report = completed.report();
    assert!(report.cancelled);
    assert!(registry.calls().is_empty());
    assert_eq!(report.tags.as_ref().unwrap().skipped, 10);
    assert_eq!(report.versions.as_ref().unwrap().skipped, 5);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn cancellation_during_wait_abandons_the_operation() {
    let registry = MemoryRegistry::new(stale_inventory(2)).with_latency(Duration::from_millis(200));
    let cancel = CancellationToken::new();

    let tags_deleted = Sweep::new(options().concurrency(1))
        .evaluate(&registry, &cancel)
        .await
        .unwrap()
        .delete_tags(&registry, &cancel)
        .await
        .unwrap();
    assert_eq!(tags_deleted.tag_report().succeeded(), 4);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let completed = tags_deleted.delete_versions(&registry, &cancel).await;
    let versions = completed.report().versions.clone().unwrap();

    // submit takes 200ms, the wait is cut short at 300ms, the second version never starts
    assert_eq!(versions.attempted, 1);
    assert_eq!(versions.abandoned, 1);
    assert_eq!(versions.skipped, 1);
    assert_eq!(versions.succeeded(), 0);
    assert!(completed.report().cancelled);
}

#[tokio::test]
async fn cancellation_after_all_work_is_not_reported() {
    let registry = MemoryRegistry::new(vec![record("04", &["v3"], 1)]);
    let cancel = CancellationToken::new();

    let planned = Sweep::new(options())
        .evaluate(&registry, &cancel)
        .await
        .unwrap();
    assert!(planned.plan().is_empty());

    cancel.cancel();
    let completed = planned
        .delete_tags(&registry, &cancel)
        .await
        .unwrap()
        .delete_versions(&registry, &cancel)
        .await;

    assert!(!completed.report().cancelled);
}
