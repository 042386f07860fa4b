//! Error types for the lexicon pipeline.
//!
//! Per-entry problems are reported as findings, not errors. These enums cover
//! the cases where an operation as a whole cannot complete.

use thiserror::Error;

use rki_config::ConfigError;
use rki_core::errors::CoreError;
use rki_core::findings::{Finding, ValidationReport};
use rki_schema::SchemaError;

use crate::bulk::BulkReport;

/// Normalization could not produce a trustworthy record.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// One or more fields contain invalid Unicode.
    #[error("EncodingError in {entry}: {} field(s) contain invalid text", findings.len())]
    Encoding {
        entry: String,
        findings: Vec<Finding>,
    },
}

/// Errors from store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id is already taken and overwriting was not requested.
    #[error("DuplicateIdError: entry {id} already exists")]
    DuplicateId {
        id: String,
        report: Box<ValidationReport>,
    },

    /// The entry has at least one Fatal finding.
    #[error("Entry {id} rejected with {} fatal finding(s)", report.fatal_count())]
    Rejected {
        id: String,
        report: Box<ValidationReport>,
    },

    /// No entry with this id is stored.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// An atomic batch had a Fatal finding, so nothing was committed.
    #[error("Atomic batch rolled back: {} of {} entries rejected", report.rejected_count(), report.reports.len())]
    BatchRolledBack { report: Box<BulkReport> },

    /// Lifecycle or parse error from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// The validation report behind a per-entry rejection, if any.
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::DuplicateId { report, .. } | Self::Rejected { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Errors from loading or linking audio metadata.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Reading the metadata file failed.
    #[error("Audio metadata I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is neither a JSON array nor JSON Lines.
    #[error("Audio metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema registry could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors from reading a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid UTF-8.
    #[error("EncodingError: corpus is not valid UTF-8 (first bad byte at offset {offset})")]
    Encoding { offset: usize },

    #[error("Corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not have the `{metadata, lexicon}` shape.
    #[error("Malformed corpus: {0}")]
    Malformed(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A config-driven load needs `store.bulk_mode`.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
