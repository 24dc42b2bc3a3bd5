// ABOUTME: Library root for arsweep - exposes the retention engine and sweep executor.
// ABOUTME: The command-line binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod registry;
pub mod retention;
pub mod sweep;
pub mod types;
