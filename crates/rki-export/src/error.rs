//! Export error types.

use std::fmt;

use thiserror::Error;

use rki_config::ConfigError;
use rki_core::enums::ErrorKind;
use rki_core::findings::Finding;
use rki_lexicon::error::CorpusError;
use rki_schema::SchemaError;

use crate::format::ExportFormat;

/// One value that could not be written losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub format: ExportFormat,
    pub entry_id: String,
    /// Field path, e.g. `senses[1].gloss_en` or `synonyms[0]`.
    pub field: String,
    pub message: String,
}

impl ExportFailure {
    /// The failure as a Fatal `FormatError` finding.
    #[must_use]
    pub fn finding(&self) -> Finding {
        Finding::fatal(
            self.field.clone(),
            ErrorKind::Format,
            format!("{}: {}", self.format, self.message),
        )
    }
}

impl fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}: {}",
            self.format, self.entry_id, self.field, self.message
        )
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// Values that cannot be represented in the target format. Every failing
    /// entry and field is listed.
    #[error("FormatError: {} value(s) cannot be exported (first: {})", failures.len(), first(failures))]
    Format { failures: Vec<ExportFailure> },

    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Re-importing a structured document failed.
    #[error(transparent)]
    Import(#[from] CorpusError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Export settings that no writer can honor.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExportError {
    /// Per-value failures, empty for I/O and serialization errors.
    #[must_use]
    pub fn failures(&self) -> &[ExportFailure] {
        match self {
            Self::Format { failures } => failures,
            _ => &[],
        }
    }
}

fn first(failures: &[ExportFailure]) -> String {
    failures
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

/// Accumulates failures while a writer walks the snapshot.
#[derive(Debug)]
pub(crate) struct Failures {
    format: ExportFormat,
    list: Vec<ExportFailure>,
}

impl Failures {
    pub(crate) const fn new(format: ExportFormat) -> Self {
        Self {
            format,
            list: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        entry_id: &str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.list.push(ExportFailure {
            format: self.format,
            entry_id: entry_id.to_string(),
            field: field.into(),
            message: message.into(),
        });
    }

    /// `Ok(output)` if nothing failed.
    pub(crate) fn finish<T>(self, output: T) -> Result<T, ExportError> {
        if self.list.is_empty() {
            Ok(output)
        } else {
            tracing::warn!(
                format = %self.format,
                failures = self.list.len(),
                "export: values cannot be represented"
            );
            Err(ExportError::Format {
                failures: self.list,
            })
        }
    }
}
