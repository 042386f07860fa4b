//! Corpus file loading.
//!
//! A corpus is a JSON document `{metadata, lexicon: [...]}` (`entries` is
//! accepted for `lexicon`). Each item is checked against the `entry_draft`
//! schema before deserialization; items that fail become pre-rejected batch
//! items so the whole file is reported in one pass and an atomic load still
//! rolls back.

use std::path::Path;

use serde_json::Value;

use rki_config::LexiconConfig;
use rki_core::corpus::CorpusMetadata;
use rki_core::entities::EntryDraft;
use rki_core::enums::{BulkMode, ErrorKind};
use rki_core::findings::{Finding, ValidationReport};
use rki_schema::{SchemaError, SchemaRegistry};

use crate::bulk::{BatchItem, BulkReport};
use crate::error::CorpusError;
use crate::store::Lexicon;

/// A parsed corpus, ready for [`Lexicon::bulk_load_items`].
#[derive(Debug, Clone)]
pub struct Corpus {
    pub metadata: CorpusMetadata,
    pub items: Vec<BatchItem>,
}

impl Corpus {
    /// Parse a corpus from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Encoding` for invalid UTF-8, `CorpusError::Json`
    /// for invalid JSON, and `CorpusError::Malformed` when the document lacks
    /// the `{metadata, lexicon}` shape. Per-item problems are not errors.
    pub fn parse(bytes: &[u8], registry: &SchemaRegistry) -> Result<Self, CorpusError> {
        let text = std::str::from_utf8(bytes).map_err(|e| CorpusError::Encoding {
            offset: e.valid_up_to(),
        })?;
        let document: Value = serde_json::from_str(text)?;
        let Some(object) = document.as_object() else {
            return Err(CorpusError::Malformed(
                "top level must be an object".to_string(),
            ));
        };

        let metadata = match object.get("metadata") {
            None | Some(Value::Null) => CorpusMetadata::default(),
            Some(value) => {
                registry
                    .validate("corpus_metadata", value)
                    .map_err(|e| CorpusError::Malformed(format!("metadata: {e}")))?;
                serde_json::from_value(value.clone())?
            }
        };

        let Some(records) = object
            .get("lexicon")
            .or_else(|| object.get("entries"))
            .and_then(Value::as_array)
        else {
            return Err(CorpusError::Malformed(
                "missing `lexicon` array".to_string(),
            ));
        };

        let items = records
            .iter()
            .enumerate()
            .map(|(position, record)| parse_item(position, record, registry))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(items = items.len(), "corpus: parsed");
        Ok(Self { metadata, items })
    }

    /// Read and parse a corpus file.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Io` if the file cannot be read, otherwise as
    /// [`Self::parse`].
    pub fn read(path: &Path, registry: &SchemaRegistry) -> Result<Self, CorpusError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes, registry)
    }
}

fn parse_item(
    position: usize,
    record: &Value,
    registry: &SchemaRegistry,
) -> Result<BatchItem, CorpusError> {
    let label = record
        .get("id")
        .and_then(Value::as_str)
        .map_or_else(|| format!("<item {}>", position + 1), String::from);

    match registry.validate("entry_draft", record) {
        Ok(()) => {}
        Err(err @ SchemaError::ValidationFailed { .. }) => {
            return Ok(BatchItem::Rejected(rejected(label, schema_findings(&err))));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(match serde_json::from_value::<EntryDraft>(record.clone()) {
        Ok(draft) => BatchItem::Draft(draft),
        Err(err) => BatchItem::Rejected(rejected(
            label,
            vec![Finding::fatal("", ErrorKind::Schema, err.to_string())],
        )),
    })
}

fn rejected(label: String, findings: Vec<Finding>) -> ValidationReport {
    tracing::warn!(entry = %label, "corpus: record failed schema check");
    let mut report = ValidationReport::new(label);
    report.extend(findings);
    report
}

/// Convert schema validation errors into Fatal `SchemaError` findings.
///
/// Messages are prefixed with a JSON pointer such as `/senses/0/gloss_en`;
/// that becomes the finding's field (`senses.0.gloss_en`).
pub(crate) fn schema_findings(err: &SchemaError) -> Vec<Finding> {
    match err {
        SchemaError::ValidationFailed { errors } => errors
            .iter()
            .map(|message| {
                let (field, text) = message
                    .strip_prefix('/')
                    .and_then(|rest| rest.split_once(": "))
                    .unwrap_or(("", message.as_str()));
                Finding::fatal(field.replace('/', "."), ErrorKind::Schema, text)
            })
            .collect(),
        other => vec![Finding::fatal("", ErrorKind::Schema, other.to_string())],
    }
}

impl Lexicon {
    /// Load a corpus file into the store. On success the file's metadata
    /// replaces the store's.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Store(StoreError::BatchRolledBack)` when an
    /// atomic load has any rejected record, plus every error of
    /// [`Corpus::read`].
    pub fn load_corpus(
        &mut self,
        path: &Path,
        mode: BulkMode,
        registry: &SchemaRegistry,
    ) -> Result<BulkReport, CorpusError> {
        let corpus = Corpus::read(path, registry)?;
        let report = self.bulk_load_items(corpus.items, mode)?;
        self.set_metadata(corpus.metadata);
        tracing::info!(
            path = %path.display(),
            committed = report.committed_count(),
            rejected = report.rejected_count(),
            "corpus: loaded"
        );
        Ok(report)
    }

    /// [`Self::load_corpus`] with the mode taken from `store.bulk_mode`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Config` if `store.bulk_mode` is not set.
    pub fn load_corpus_with_config(
        &mut self,
        path: &Path,
        config: &LexiconConfig,
        registry: &SchemaRegistry,
    ) -> Result<BulkReport, CorpusError> {
        let mode = config.bulk_mode()?;
        self.load_corpus(path, mode, registry)
    }
}
