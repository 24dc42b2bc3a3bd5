// ABOUTME: Command module aggregator for the arsweep CLI.
// ABOUTME: Re-exports the sweep command handler.

mod sweep;

pub use sweep::sweep;
