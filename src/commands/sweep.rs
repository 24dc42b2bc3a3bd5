// ABOUTME: Sweep command implementation.
// ABOUTME: Connects to Artifact Registry, drives the sweep phases, and applies the failure policy.

use arsweep::config::{Config, FailurePolicy};
use arsweep::error::{Error, Result};
use arsweep::output::Output;
use arsweep::registry::ArtifactRegistryClient;
use arsweep::sweep::{Sweep, SweepReport};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// Run one sweep against the configured repository.
///
/// Drives the transitions behind `arsweep::sweep::run` step by step to report progress.
pub async fn sweep(config: Config, mut output: Output) -> Result<()> {
    let options = config.sweep_options(Utc::now())?;
    let client = ArtifactRegistryClient::new(config.access_token()?, config.client_settings())?;

    let cancel = CancellationToken::new();
    let _ctrl_c = spawn_ctrl_c_handler(cancel.clone());

    output.start_timer();
    output.progress("start artifact registry management");
    output.progress(&format!(
        "will delete docker images older than {} or without tag",
        options.policy.cutoff()
    ));

    let planned = Sweep::new(options).evaluate(&client, &cancel).await?;

    let report = if planned.options().dry_run {
        output.plan(planned.plan());
        planned.report_dry_run().into_report()
    } else {
        output.progress("will delete tags and images");
        output.progress(&format!(
            "will delete {} docker tags",
            planned.plan().tag_targets().len()
        ));
        let tags_deleted = planned.delete_tags(&client, &cancel).await?;
        output.phase(tags_deleted.tag_report());

        output.progress(&format!(
            "will delete {} docker images",
            tags_deleted.plan().version_targets().len()
        ));
        let completed = tags_deleted.delete_versions(&client, &cancel).await;
        if let Some(versions) = &completed.report().versions {
            output.phase(versions);
        }
        completed.into_report()
    };

    output.summary(&report);
    output.progress("end artifact registry management");

    outcome(&report, config.on_failure)
}

/// Decide the command result from a finished sweep.
fn outcome(report: &SweepReport, policy: FailurePolicy) -> Result<()> {
    if report.cancelled {
        return Err(Error::Cancelled);
    }
    match policy {
        FailurePolicy::Fail if report.has_failures() => Err(Error::DeletionFailures(report.failed())),
        _ => Ok(()),
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after in-flight deletions");
            cancel.cancel();
        }
    })
}
