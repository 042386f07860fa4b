//! # rki-lexicon
//!
//! The contributor pipeline for the Rakhine lexicon.
//!
//! A raw [`EntryDraft`](rki_core::entities::EntryDraft) flows through the
//! [`Normalizer`](normalize::Normalizer), then the
//! [`Validator`](validate::Validator), and only an accepted entry is committed
//! to the [`Lexicon`](store::Lexicon) store. The store hands out immutable
//! [`Snapshot`](store::Snapshot)s for export and parallel reads. The
//! [`AudioLinker`](audio::AudioLinker) indexes recordings against store ids
//! without owning any entries.
//!
//! Batches are normalized and validated in parallel with rayon against a
//! snapshot; commits happen afterwards on the calling thread.

pub mod audio;
pub mod bulk;
pub mod corpus;
pub mod error;
pub mod normalize;
pub mod report;
pub mod store;
pub mod validate;

#[cfg(test)]
mod test_support;
