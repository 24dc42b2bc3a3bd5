// ABOUTME: Registry domain types: image records, repository coordinates, deletion targets.
// ABOUTME: Uses phantom types so tag and version targets cannot be confused.

mod image_record;
mod repository;
mod target;

pub use image_record::{ImageName, ImageRecord, ParseImageNameError};
pub use repository::{RepositoryPath, RepositoryPathError};
pub use target::{TagTarget, Target, VersionTarget};
