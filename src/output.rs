// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::retention::DeletionPlan;
use crate::sweep::{PhaseReport, SweepReport};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print the targets a dry run would delete.
    pub fn plan(&self, plan: &DeletionPlan) {
        match self.mode {
            OutputMode::Normal => {
                for tag in plan.tag_targets() {
                    println!("  tag: {tag}");
                }
                for version in plan.version_targets() {
                    println!("  version: {version}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent::Plan { plan }),
        }
    }

    /// Report one finished deletion phase.
    pub fn phase(&self, report: &PhaseReport) {
        match self.mode {
            OutputMode::Normal => {
                println!(
                    "  {} deletion: {} succeeded, {} failed, {} skipped",
                    report.kind,
                    report.succeeded(),
                    report.failed(),
                    report.skipped + report.abandoned
                );
                for failure in &report.failures {
                    println!("    failed {}: {}", failure.target, failure.message);
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent::Phase { report }),
        }
    }

    /// Print the final sweep summary with optional timing.
    pub fn summary(&self, report: &SweepReport) {
        let line = summary_line(report);
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{line} ({:.1}s)", elapsed);
                } else {
                    println!("{line}");
                }
            }
            OutputMode::Quiet => println!("{line}"),
            OutputMode::Json => emit(&JsonEvent::Summary {
                report,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent::Error {
                    message,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn summary_line(report: &SweepReport) -> String {
    if report.dry_run {
        return format!(
            "Dry run: {} versions listed, {} kept, would delete {} tags and {} versions",
            report.summary.listed,
            report.summary.kept(),
            report.tag_targets,
            report.version_targets
        );
    }
    format!(
        "Sweep complete: {} versions listed, {} kept, {} tags and {} versions targeted, {} failed",
        report.summary.listed,
        report.summary.kept(),
        report.tag_targets,
        report.version_targets,
        report.failed()
    )
}

fn emit(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum JsonEvent<'a> {
    Plan {
        plan: &'a DeletionPlan,
    },
    Phase {
        #[serde(flatten)]
        report: &'a PhaseReport,
    },
    Summary {
        #[serde(flatten)]
        report: &'a SweepReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
    Error {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
}
