use std::collections::BTreeMap;
use std::sync::Arc;

use rki_core::corpus::CorpusMetadata;
use rki_core::entities::Entry;

use crate::validate::EntryLookup;

/// An immutable view of the store at one point in time.
///
/// Shares entry storage with the store; later store mutations copy the map
/// instead of touching this view.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(super) entries: Arc<BTreeMap<String, Arc<Entry>>>,
    pub(super) metadata: CorpusMetadata,
}

impl Snapshot {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().map(AsRef::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub const fn metadata(&self) -> &CorpusMetadata {
        &self.metadata
    }
}

impl EntryLookup for Snapshot {
    fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}
