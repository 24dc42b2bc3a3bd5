// ABOUTME: Registry client capability trait and its implementations.
// ABOUTME: Artifact Registry over REST for production, in-memory for tests.

mod artifact;
mod auth;
mod memory;
mod models;
mod ops;
pub(crate) mod sealed;

pub use artifact::{ArtifactRegistryClient, ClientSettings, DEFAULT_ENDPOINT};
pub use auth::{AccessToken, ACCESS_TOKEN_ENV, METADATA_TOKEN_URL};
pub use memory::{MemoryRegistry, RegistryCall};
pub use ops::{InventoryStream, Operation, RegistryError, RegistryOps};
