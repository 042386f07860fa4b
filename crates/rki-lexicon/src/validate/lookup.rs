//! Id membership views used for uniqueness and reference checks.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use rki_core::entities::Entry;

/// Answers "is this entry id known?" for the validator.
pub trait EntryLookup {
    fn contains_id(&self, id: &str) -> bool;
}

impl EntryLookup for BTreeMap<String, Arc<Entry>> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl EntryLookup for BTreeSet<String> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl EntryLookup for HashSet<String> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// No ids at all.
impl EntryLookup for () {
    fn contains_id(&self, _id: &str) -> bool {
        false
    }
}

/// A base lookup extended with ids from a pending batch.
pub struct WithBatch<'a, L: ?Sized> {
    pub base: &'a L,
    pub batch: &'a HashSet<String>,
}

impl<L: EntryLookup + ?Sized> EntryLookup for WithBatch<'_, L> {
    fn contains_id(&self, id: &str) -> bool {
        self.batch.contains(id) || self.base.contains_id(id)
    }
}
