//! DICOM Part 10 reader built on `dicom-object`.
//! Parsing stops before PixelData so large images are never loaded.

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::{DefaultDicomObject, OpenFileOptions};
use std::fs;
use std::path::Path;
use tracing::trace;

use super::{DatasetReader, TagStore, first_value};
use crate::errors::DatasetError;

#[derive(Debug, Clone, Copy, Default)]
pub struct DicomReader;

impl DatasetReader for DicomReader {
    type Store = DicomTagStore;

    fn read(&self, path: &Path) -> Result<DicomTagStore, DatasetError> {
        // Distinguish "cannot open" from "opened but not DICOM".
        fs::File::open(path).map_err(|source| DatasetError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let object = OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| DatasetError::NotDicom {
                path: path.to_path_buf(),
                source: e.to_string().into(),
            })?;
        trace!(path = %path.display(), "parsed DICOM header");
        Ok(DicomTagStore { object })
    }
}

/// Tags of one parsed DICOM file.
pub struct DicomTagStore {
    object: DefaultDicomObject,
}

impl TagStore for DicomTagStore {
    fn get(&self, tag: Tag) -> Option<String> {
        let element = self.object.element(tag).ok()?;
        let text = element.to_str().ok()?;
        first_value(&text)
    }
}
