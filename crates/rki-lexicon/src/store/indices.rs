//! Secondary indices over the primary id map.

use std::collections::{BTreeMap, BTreeSet};

use rki_core::entities::Entry;
use rki_core::enums::PartOfSpeech;
use rki_core::tables::dialect_key;

/// Gloss, dialect, and part-of-speech indices, each mapping a key to entry ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indices {
    by_gloss: BTreeMap<String, BTreeSet<String>>,
    by_dialect: BTreeMap<String, BTreeSet<String>>,
    by_pos: BTreeMap<PartOfSpeech, BTreeSet<String>>,
}

/// Lookup keys for a gloss: the whole gloss and each comma/semicolon part, lowercased.
pub fn gloss_keys(gloss: &str) -> BTreeSet<String> {
    let whole = gloss.trim().to_lowercase();
    let mut keys: BTreeSet<String> = whole
        .split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();
    if !whole.is_empty() {
        keys.insert(whole);
    }
    keys
}

impl Indices {
    pub fn rebuild<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut indices = Self::default();
        for entry in entries {
            indices.add(entry);
        }
        indices
    }

    pub fn add(&mut self, entry: &Entry) {
        for key in entry.glosses().flat_map(gloss_keys) {
            self.by_gloss.entry(key).or_default().insert(entry.id.clone());
        }
        for key in entry.dialects().map(dialect_key) {
            self.by_dialect
                .entry(key)
                .or_default()
                .insert(entry.id.clone());
        }
        self.by_pos
            .entry(entry.pos)
            .or_default()
            .insert(entry.id.clone());
    }

    pub fn remove(&mut self, entry: &Entry) {
        for key in entry.glosses().flat_map(gloss_keys) {
            detach(&mut self.by_gloss, &key, &entry.id);
        }
        for key in entry.dialects().map(dialect_key) {
            detach(&mut self.by_dialect, &key, &entry.id);
        }
        detach(&mut self.by_pos, &entry.pos, &entry.id);
    }

    pub fn gloss(&self, gloss: &str) -> impl Iterator<Item = &str> {
        ids(self.by_gloss.get(&gloss.trim().to_lowercase()))
    }

    pub fn dialect(&self, dialect: &str) -> impl Iterator<Item = &str> {
        ids(self.by_dialect.get(&dialect_key(dialect)))
    }

    pub fn pos(&self, pos: PartOfSpeech) -> impl Iterator<Item = &str> {
        ids(self.by_pos.get(&pos))
    }
}

fn ids(set: Option<&BTreeSet<String>>) -> impl Iterator<Item = &str> {
    set.into_iter().flatten().map(String::as_str)
}

fn detach<K: Ord>(index: &mut BTreeMap<K, BTreeSet<String>>, key: &K, id: &str) {
    if let Some(set) = index.get_mut(key) {
        set.remove(id);
        if set.is_empty() {
            index.remove(key);
        }
    }
}
