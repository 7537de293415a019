use dicom_core::Tag;
use std::collections::HashMap;

use super::{TagStore, first_value};

/// In-memory tag store. Useful for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct MapTagStore {
    values: HashMap<Tag, String>,
}

impl MapTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, tag: Tag, value: impl Into<String>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn insert(&mut self, tag: Tag, value: impl Into<String>) {
        self.values.insert(tag, value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TagStore for MapTagStore {
    fn get(&self, tag: Tag) -> Option<String> {
        self.values.get(&tag).and_then(|v| first_value(v))
    }
}

impl<V: Into<String>> FromIterator<(Tag, V)> for MapTagStore {
    fn from_iter<I: IntoIterator<Item = (Tag, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (tag, value) in iter {
            store.insert(tag, value);
        }
        store
    }
}
