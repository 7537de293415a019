//! Per-file metadata access.
//!
//! The organizer only needs `get(tag) -> Option<String>` from a parsed file; this
//! module defines that seam ([`TagStore`]), the reader that produces one per
//! path ([`DatasetReader`]) and the DICOM-backed implementation.

mod dicom;
mod memory;

use dicom_core::Tag;
use std::path::Path;

use crate::errors::DatasetError;

pub use dicom::{DicomReader, DicomTagStore};
pub use memory::MapTagStore;

/// Read-only view over one file's tags.
pub trait TagStore {
    /// First value of `tag` as text, or None if the tag is absent or empty.
    fn get(&self, tag: Tag) -> Option<String>;
}

impl<T: TagStore + ?Sized> TagStore for &T {
    fn get(&self, tag: Tag) -> Option<String> {
        (**self).get(tag)
    }
}

/// Opens a source file and exposes its tags. Shared by all workers.
pub trait DatasetReader: Send + Sync {
    type Store: TagStore;

    fn read(&self, path: &Path) -> Result<Self::Store, DatasetError>;
}

/// Normalize a raw element value: first of a multi-valued element, padding trimmed.
pub(crate) fn first_value(raw: &str) -> Option<String> {
    let first = raw.split('\\').next().unwrap_or_default();
    let trimmed = first.trim_end_matches([' ', '\0']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
