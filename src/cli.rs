// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Sweep flags at the top level, plus an init subcommand.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use arsweep::config::{FailurePolicy, Overrides};

#[derive(Parser)]
#[command(name = "arsweep")]
#[command(about = "Delete obsolete container images from Google Artifact Registry")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Configuration file (default: arsweep.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the final summary
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a template arsweep.yml
    Init {
        /// GCP project id
        #[arg(long)]
        project: Option<String>,

        /// Repository name
        #[arg(long)]
        repository: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Default)]
pub struct SweepArgs {
    /// GCP project id
    #[arg(long)]
    pub project: Option<String>,

    /// Artifact registry location
    #[arg(long)]
    pub location: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repository: Option<String>,

    /// Number of days to keep docker images
    #[arg(long = "days-to-keep", alias = "daysToKeep")]
    pub days_to_keep: Option<u32>,

    /// Tag substring protecting a version from deletion (repeatable)
    #[arg(long = "protect", value_name = "MARKER")]
    pub protect: Vec<String>,

    /// Dry run: report what would be deleted
    #[arg(long)]
    pub dry: bool,

    /// Concurrent workers per deletion phase
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// What to do when some deletions fail: ignore or fail
    #[arg(long = "on-failure", value_name = "POLICY")]
    pub on_failure: Option<FailurePolicy>,
}

impl SweepArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            project: self.project.clone(),
            location: self.location.clone(),
            repository: self.repository.clone(),
            days_to_keep: self.days_to_keep,
            protected_markers: self.protect.clone(),
            concurrency: self.concurrency,
            dry_run: self.dry,
            on_failure: self.on_failure,
        }
    }
}
