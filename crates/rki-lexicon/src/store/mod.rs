//! Canonical entry store.
//!
//! `Lexicon` exclusively owns committed entries. The primary map is held
//! behind an `Arc` and mutated copy-on-write, so a [`Snapshot`] taken for
//! export or parallel validation never observes later mutations. Secondary
//! indices are maintained incrementally on every commit and removal.

mod indices;
mod snapshot;

pub use indices::{Indices, gloss_keys};
pub use snapshot::Snapshot;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;

use rki_config::LexiconConfig;
use rki_core::corpus::CorpusMetadata;
use rki_core::entities::{Entry, EntryDraft};
use rki_core::enums::{EntryState, ErrorKind, PartOfSpeech};
use rki_core::findings::ValidationReport;

use crate::error::StoreError;
use crate::normalize::Normalizer;
use crate::validate::{EntryLookup, Pipeline, Uniqueness, Validated};

/// The in-memory lexicon: entries by id, secondary indices, and lifecycle state.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Arc<BTreeMap<String, Arc<Entry>>>,
    indices: Indices,
    /// Stored, Exported, or Deleted (tombstone) per id ever committed.
    states: HashMap<String, EntryState>,
    metadata: CorpusMetadata,
    pipeline: Pipeline,
}

impl EntryLookup for Lexicon {
    fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}

impl Lexicon {
    #[must_use]
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            pipeline: Pipeline::new(normalizer),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_config(config: &LexiconConfig) -> Self {
        Self::new(Normalizer::from_config(&config.normalize))
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[must_use]
    pub const fn metadata(&self) -> &CorpusMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: CorpusMetadata) {
        self.metadata = metadata;
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Normalize, validate, and commit a new entry.
    ///
    /// With `overwrite`, an existing entry with the same id is replaced.
    /// Returns the validation report, which may carry warnings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id exists and `overwrite` is
    /// false, or `StoreError::Rejected` for any other Fatal finding. The store
    /// is unchanged in both cases.
    pub fn insert(
        &mut self,
        draft: &EntryDraft,
        overwrite: bool,
    ) -> Result<ValidationReport, StoreError> {
        let uniqueness = if overwrite {
            Uniqueness::AllowExisting
        } else {
            Uniqueness::RequireNew
        };
        let validated = self.pipeline.run(draft, uniqueness, self, self);
        self.accept(validated)
    }

    /// Replace an existing entry wholesale, re-running full validation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no entry has the draft's id, or
    /// `StoreError::Rejected` if the new record has a Fatal finding.
    pub fn replace(&mut self, draft: &EntryDraft) -> Result<ValidationReport, StoreError> {
        let id = draft.id.as_deref().map(str::trim).unwrap_or_default();
        if !self.entries.contains_key(id) {
            return Err(StoreError::NotFound(draft.label().to_string()));
        }
        let validated = self
            .pipeline
            .run(draft, Uniqueness::AllowExisting, self, self);
        self.accept(validated)
    }

    /// Remove an entry. References to it elsewhere are left in place and
    /// surface as `ReferenceError` warnings on the next [`Self::revalidate`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is not stored.
    pub fn delete(&mut self, id: &str) -> Result<Arc<Entry>, StoreError> {
        if !self.entries.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let state = self.state_of(id).unwrap_or(EntryState::Stored);
        let next = state.transition(id, EntryState::Deleted)?;
        let entry = Arc::make_mut(&mut self.entries)
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.indices.remove(&entry);
        self.states.insert(id.to_string(), next);
        tracing::debug!(id, "store: deleted entry");
        Ok(entry)
    }

    /// Record that the entries in `snapshot` were exported.
    ///
    /// Entries replaced or deleted since the snapshot was taken are skipped.
    pub fn mark_exported(&mut self, snapshot: &Snapshot) {
        for entry in snapshot.iter() {
            let current = self.entries.get(&entry.id);
            if current.is_some_and(|c| c.as_ref() == entry) {
                self.states
                    .insert(entry.id.clone(), EntryState::Exported);
            }
        }
    }

    fn accept(&mut self, validated: Validated) -> Result<ValidationReport, StoreError> {
        let Validated { report, entry } = validated;
        match entry {
            Some(entry) => {
                self.commit(entry)?;
                Ok(report)
            }
            None => {
                let id = report.entry_id.clone();
                tracing::warn!(
                    id = %id,
                    fatal = report.fatal_count(),
                    "store: entry rejected"
                );
                if report
                    .findings
                    .iter()
                    .any(|f| f.is_fatal() && f.kind == ErrorKind::DuplicateId)
                {
                    Err(StoreError::DuplicateId {
                        id,
                        report: Box::new(report),
                    })
                } else {
                    Err(StoreError::Rejected {
                        id,
                        report: Box::new(report),
                    })
                }
            }
        }
    }

    /// Single-writer commit of an accepted entry.
    pub(crate) fn commit(&mut self, entry: Entry) -> Result<(), StoreError> {
        let next = match self.states.get(&entry.id) {
            Some(&state) if state != EntryState::Deleted => {
                state.transition(&entry.id, EntryState::Stored)?
            }
            _ => EntryState::Accepted.transition(&entry.id, EntryState::Stored)?,
        };

        let id = entry.id.clone();
        let entries = Arc::make_mut(&mut self.entries);
        if let Some(previous) = entries.insert(id.clone(), Arc::new(entry)) {
            self.indices.remove(&previous);
        }
        if let Some(stored) = entries.get(&id) {
            self.indices.add(stored);
        }
        self.states.insert(id.clone(), next);
        tracing::debug!(id = %id, "store: committed entry");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries with a gloss (or gloss list item) equal to `gloss`, ignoring case.
    #[must_use]
    pub fn by_gloss(&self, gloss: &str) -> Vec<&Entry> {
        self.resolve(self.indices.gloss(gloss))
    }

    /// Entries tagged with `dialect` at the top level or on any sense.
    #[must_use]
    pub fn by_dialect(&self, dialect: &str) -> Vec<&Entry> {
        self.resolve(self.indices.dialect(dialect))
    }

    #[must_use]
    pub fn by_pos(&self, pos: PartOfSpeech) -> Vec<&Entry> {
        self.resolve(self.indices.pos(pos))
    }

    /// Case-insensitive substring search over script, romanization, and glosses.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .values()
            .map(AsRef::as_ref)
            .filter(|entry: &&Entry| {
                entry.script.contains(&needle)
                    || entry.romanization.contains(&needle)
                    || entry
                        .glosses()
                        .any(|g| g.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Lifecycle state of `id`, including tombstones for deleted entries.
    #[must_use]
    pub fn state_of(&self, id: &str) -> Option<EntryState> {
        self.states.get(id).copied()
    }

    /// An immutable view of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: Arc::clone(&self.entries),
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuild the secondary indices from the primary map and compare.
    #[must_use]
    pub fn verify_indices(&self) -> bool {
        let rebuilt = Indices::rebuild(self.entries.values().map(AsRef::as_ref));
        let consistent = rebuilt == self.indices;
        if !consistent {
            tracing::warn!("store: secondary indices diverged from primary map");
        }
        consistent
    }

    /// Re-run validation for every stored entry against the current store.
    ///
    /// Returns only reports with findings, in id order. Dangling references
    /// left by deletions show up here as `ReferenceError` warnings.
    #[must_use]
    pub fn revalidate(&self) -> Vec<ValidationReport> {
        let snapshot = self.snapshot();
        let reports: Vec<ValidationReport> = snapshot
            .entries
            .par_iter()
            .map(|(_, entry)| {
                let draft = EntryDraft::from(entry.as_ref());
                self.pipeline
                    .run(&draft, Uniqueness::AllowExisting, &snapshot, &snapshot)
                    .report
            })
            .filter(|report| !report.findings.is_empty())
            .collect();
        tracing::info!(
            checked = snapshot.len(),
            flagged = reports.len(),
            "store: revalidated entries"
        );
        reports
    }

    fn resolve<'a>(&'a self, ids: impl Iterator<Item = &'a str>) -> Vec<&'a Entry> {
        ids.filter_map(|id| self.get(id)).collect()
    }
}
