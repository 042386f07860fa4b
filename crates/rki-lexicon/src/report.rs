//! Validation report rendering.
//!
//! Collects per-entry [`ValidationReport`]s into one listing grouped by entry
//! id, printable for contributors and serializable as JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use rki_core::findings::{Finding, ValidationReport};

use crate::bulk::BulkReport;

/// Findings for one entry id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryFindings {
    pub accepted: bool,
    pub findings: Vec<Finding>,
}

/// Findings grouped by entry id, in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusReport {
    pub entries: BTreeMap<String, EntryFindings>,
}

impl CorpusReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one report. Reports for the same id accumulate; the id counts as
    /// accepted only if every report for it was.
    pub fn add(&mut self, report: &ValidationReport) {
        let slot = self
            .entries
            .entry(report.entry_id.clone())
            .or_insert_with(|| EntryFindings {
                accepted: true,
                findings: Vec::new(),
            });
        slot.accepted &= report.accepted;
        slot.findings.extend(report.findings.iter().cloned());
    }

    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.entries.values().filter(|e| e.accepted).count()
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.entries.len() - self.accepted_count()
    }

    #[must_use]
    pub fn finding_count(&self) -> usize {
        self.entries.values().map(|e| e.findings.len()).sum()
    }

    /// Serialize as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot happen for this type in
    /// practice.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl<'a> FromIterator<&'a ValidationReport> for CorpusReport {
    fn from_iter<I: IntoIterator<Item = &'a ValidationReport>>(iter: I) -> Self {
        let mut report = Self::new();
        for r in iter {
            report.add(r);
        }
        report
    }
}

impl From<&BulkReport> for CorpusReport {
    fn from(bulk: &BulkReport) -> Self {
        bulk.reports.iter().collect()
    }
}

/// Entries without findings are counted but not listed.
impl fmt::Display for CorpusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} entries: {} accepted, {} rejected, {} findings",
            self.entries.len(),
            self.accepted_count(),
            self.rejected_count(),
            self.finding_count()
        )?;
        for (id, entry) in &self.entries {
            if entry.findings.is_empty() {
                continue;
            }
            let status = if entry.accepted { "accepted" } else { "rejected" };
            writeln!(f, "\n{id} ({status})")?;
            for finding in &entry.findings {
                let field = if finding.field.is_empty() {
                    "-"
                } else {
                    finding.field.as_str()
                };
                writeln!(
                    f,
                    "  {:<7} {:<16} {field}: {}",
                    finding.severity.as_str(),
                    finding.kind.as_str(),
                    finding.message
                )?;
            }
        }
        Ok(())
    }
}
