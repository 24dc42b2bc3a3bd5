// ABOUTME: Sealed trait pattern for the registry client trait.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only the registry clients in this crate can implement `RegistryOps`,
/// so methods can be added without breaking downstream code.
pub trait Sealed {}
