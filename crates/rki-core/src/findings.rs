//! Validation findings and per-entry reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ErrorKind, Severity};

/// A single problem found in an entry or audio record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Finding {
    /// Dotted field path, e.g. `romanization` or `senses[1].dialect`.
    pub field: String,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn fatal(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            severity: Severity::Fatal,
            message: message.into(),
        }
    }

    pub fn warning(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

/// Outcome of validating one record. Accepted iff no finding is Fatal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationReport {
    /// Entry id as submitted (or a placeholder label when it is missing).
    pub entry_id: String,
    pub accepted: bool,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(entry_id: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            accepted: true,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        if finding.is_fatal() {
            self.accepted = false;
        }
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.push(finding);
        }
    }

    #[must_use]
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    /// Findings of `kind` reported against `field`.
    pub fn findings_for<'a>(
        &'a self,
        field: &'a str,
        kind: ErrorKind,
    ) -> impl Iterator<Item = &'a Finding> {
        self.findings
            .iter()
            .filter(move |f| f.field == field && f.kind == kind)
    }

    #[must_use]
    pub fn fatal_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_fatal()).count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.fatal_count()
    }
}
