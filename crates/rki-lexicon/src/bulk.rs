//! Batch loading.
//!
//! Every draft in a batch is normalized and validated in parallel against a
//! snapshot of the store. Cross-references may point at ids elsewhere in the
//! same batch; a reference to a sibling that was rejected is flagged like any
//! other unknown id. Commits then happen on the calling thread according to the
//! [`BulkMode`]: `Atomic` commits nothing if any draft was rejected,
//! `BestEffort` commits every accepted draft.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use rki_core::entities::EntryDraft;
use rki_core::enums::{BulkMode, ErrorKind, RefRelation};
use rki_core::findings::{Finding, ValidationReport};

use crate::error::StoreError;
use crate::store::Lexicon;
use crate::validate::{EntryLookup, Uniqueness, Validated, WithBatch};

/// One batch item: a parsed draft, or a record already rejected upstream
/// (for example by the corpus schema check).
#[derive(Debug, Clone)]
pub enum BatchItem {
    Draft(EntryDraft),
    Rejected(ValidationReport),
}

impl From<EntryDraft> for BatchItem {
    fn from(draft: EntryDraft) -> Self {
        Self::Draft(draft)
    }
}

/// Aggregate outcome of a batch load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub mode: BulkMode,
    /// Ids committed to the store, in batch order.
    pub committed: Vec<String>,
    /// One report per batch item, in batch order.
    pub reports: Vec<ValidationReport>,
}

impl BulkReport {
    #[must_use]
    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ValidationReport> {
        self.reports.iter().filter(|r| !r.accepted)
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected().count()
    }

    /// True when no item in the batch was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected_count() == 0
    }
}

impl Lexicon {
    /// Load a batch of drafts with the given commit policy.
    ///
    /// # Errors
    ///
    /// In `Atomic` mode, returns `StoreError::BatchRolledBack` carrying the
    /// full report if any draft has a Fatal finding; the store is unchanged.
    pub fn bulk_load(
        &mut self,
        drafts: Vec<EntryDraft>,
        mode: BulkMode,
    ) -> Result<BulkReport, StoreError> {
        self.bulk_load_items(drafts.into_iter().map(BatchItem::from).collect(), mode)
    }

    /// Like [`Self::bulk_load`], with some items already rejected.
    ///
    /// # Errors
    ///
    /// Same as [`Self::bulk_load`].
    pub fn bulk_load_items(
        &mut self,
        items: Vec<BatchItem>,
        mode: BulkMode,
    ) -> Result<BulkReport, StoreError> {
        let validated = self.validate_batch(&items);

        let mut report = BulkReport {
            mode,
            committed: Vec::new(),
            reports: Vec::with_capacity(validated.len()),
        };
        let mut accepted = Vec::new();
        for Validated { report: r, entry } in validated {
            report.reports.push(r);
            accepted.extend(entry);
        }

        if mode == BulkMode::Atomic && !report.is_clean() {
            tracing::warn!(
                items = report.reports.len(),
                rejected = report.rejected_count(),
                "bulk: atomic batch rolled back"
            );
            return Err(StoreError::BatchRolledBack {
                report: Box::new(report),
            });
        }

        for entry in accepted {
            let id = entry.id.clone();
            self.commit(entry)?;
            report.committed.push(id);
        }

        tracing::info!(
            mode = %mode,
            committed = report.committed_count(),
            rejected = report.rejected_count(),
            "bulk: batch loaded"
        );
        Ok(report)
    }

    /// Parallel normalize + validate against a snapshot. Read-only.
    fn validate_batch(&self, items: &[BatchItem]) -> Vec<Validated> {
        let snapshot = self.snapshot();
        let batch_ids: HashSet<String> = items.iter().filter_map(item_id).collect();
        let repeats = repeated_positions(items);
        let known = WithBatch {
            base: &snapshot,
            batch: &batch_ids,
        };
        let pipeline = self.pipeline();

        let mut validated: Vec<Validated> = items
            .par_iter()
            .enumerate()
            .map(|(position, item)| match item {
                BatchItem::Rejected(report) => Validated {
                    report: report.clone(),
                    entry: None,
                },
                BatchItem::Draft(draft) => {
                    let mut validated =
                        pipeline.run(draft, Uniqueness::RequireNew, &snapshot, &known);
                    if let Some(first) = repeats.get(&position) {
                        validated.reject(Finding::fatal(
                            "id",
                            ErrorKind::DuplicateId,
                            format!(
                                "id repeats batch item {} in the same batch",
                                first + 1
                            ),
                        ));
                    }
                    validated
                }
            })
            .collect();

        // Batch ids that will not reach the store.
        let accepted: HashSet<&str> = validated
            .iter()
            .filter_map(|v| v.entry.as_ref())
            .map(|e| e.id.as_str())
            .collect();
        let dropped: HashSet<String> = batch_ids
            .iter()
            .filter(|id| !accepted.contains(id.as_str()) && !snapshot.contains_id(id))
            .cloned()
            .collect();
        if !dropped.is_empty() {
            for v in &mut validated {
                flag_dropped_references(v, &dropped);
            }
        }
        validated
    }
}

/// Warn about accepted entries that point at rejected batch siblings.
fn flag_dropped_references(validated: &mut Validated, dropped: &HashSet<String>) {
    let Some(entry) = &validated.entry else {
        return;
    };
    let mut findings = Vec::new();
    for relation in RefRelation::ALL {
        for (index, reference) in entry.refs(relation).iter().enumerate() {
            if dropped.contains(reference.as_str()) {
                findings.push(Finding::warning(
                    format!("{}[{index}]", relation.field()),
                    ErrorKind::Reference,
                    format!("{relation} reference to {reference}, rejected in the same batch"),
                ));
            }
        }
    }
    validated.report.extend(findings);
}

fn item_id(item: &BatchItem) -> Option<String> {
    match item {
        BatchItem::Draft(draft) => draft
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from),
        BatchItem::Rejected(_) => None,
    }
}

/// Positions whose id already appeared earlier in the batch, mapped to the
/// position of the first occurrence.
fn repeated_positions(items: &[BatchItem]) -> HashMap<usize, usize> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut repeats = HashMap::new();
    for (position, item) in items.iter().enumerate() {
        if let Some(id) = item_id(item) {
            match first_seen.get(&id) {
                Some(&first) => {
                    repeats.insert(position, first);
                }
                None => {
                    first_seen.insert(id, position);
                }
            }
        }
    }
    repeats
}
