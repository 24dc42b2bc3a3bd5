// ABOUTME: Phantom-typed deletion targets for compile-time type safety.
// ABOUTME: Prevents passing a tag reference where a version reference is expected.

use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum TagMarker {}
pub enum VersionMarker {}

/// A fully-qualified registry reference submitted for deletion.
///
/// The marker parameter keeps tag references and version references apart:
/// a `TagTarget` cannot be handed to an operation expecting a `VersionTarget`.
#[must_use = "targets reference registry resources and should not be ignored"]
pub struct Target<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Target<T> {
    pub fn new(value: String) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// Manual impls so T needs no bounds; it is only a marker.

impl<T> std::fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Target").field(&self.value).finish()
    }
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Target<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Target<T> {}

impl<T> Hash for Target<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Target<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Target<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

pub type TagTarget = Target<TagMarker>;
pub type VersionTarget = Target<VersionMarker>;
