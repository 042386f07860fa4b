//! Audio metadata linker.
//!
//! Indexes recording metadata by filename and by entry id. The linker never
//! owns entries: it only asks an [`EntryLookup`] whether an id exists. A
//! recording whose entry is missing stays linked and is flagged as an orphan
//! so it is never silently dropped.
//!
//! Filenames follow `<entry_id>_<speaker>[_<dialect>][_<m|f|x>].<ext>`, for
//! example `rki_0001_spk01_sittwe_m.wav`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use serde_jsonlines::JsonLinesReader;

use rki_config::AudioConfig;
use rki_core::entities::{AudioMetadata, AudioSummary};
use rki_core::enums::ErrorKind;
use rki_core::findings::Finding;
use rki_core::ids::is_entry_id;
use rki_core::tables::dialect_key;
use rki_schema::SchemaRegistry;

use crate::corpus::schema_findings;
use crate::error::AudioError;
use crate::store::Lexicon;
use crate::validate::EntryLookup;

// ---------------------------------------------------------------------------
// Filename
// ---------------------------------------------------------------------------

/// The parts encoded in a recording filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFilename {
    pub entry_id: String,
    pub speaker_id: String,
    pub dialect: Option<String>,
    pub gender: Option<char>,
    pub extension: String,
}

impl AudioFilename {
    /// Parse `filename` against the recording naming pattern.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first part that does not match.
    pub fn parse(filename: &str, config: &AudioConfig) -> Result<Self, String> {
        let (stem, extension) = filename
            .rsplit_once('.')
            .ok_or_else(|| format!("'{filename}' has no file extension"))?;
        if !config.accepts(extension) {
            return Err(format!(
                "extension '.{extension}' is not one of {}",
                config.extensions.join(", ")
            ));
        }

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 3 {
            return Err(format!(
                "'{filename}' does not match <entry_id>_<speaker>[_<dialect>][_<m|f|x>].<ext>"
            ));
        }

        let entry_id = format!("{}_{}", parts[0], parts[1]);
        if !is_entry_id(&entry_id) {
            return Err(format!("'{entry_id}' is not a valid entry id"));
        }

        let speaker_id = parts[2];
        if !is_name_part(speaker_id) {
            return Err(format!("speaker id '{speaker_id}' is empty or malformed"));
        }

        let mut rest = &parts[3..];
        let mut gender = None;
        if let Some((last, init)) = rest.split_last() {
            if let Some(g) = gender_code(last) {
                gender = Some(g);
                rest = init;
            }
        }

        let dialect = match rest {
            [] => None,
            [dialect] if is_name_part(dialect) => Some((*dialect).to_string()),
            _ => {
                return Err(format!(
                    "unexpected segments after speaker id in '{filename}'"
                ));
            }
        };

        Ok(Self {
            entry_id,
            speaker_id: speaker_id.to_string(),
            dialect,
            gender,
            extension: extension.to_ascii_lowercase(),
        })
    }
}

fn is_name_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn gender_code(part: &str) -> Option<char> {
    match part {
        "m" => Some('m'),
        "f" => Some('f'),
        "x" => Some('x'),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Link results
// ---------------------------------------------------------------------------

/// Outcome of linking one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub filename: String,
    pub linked: bool,
    pub orphan: bool,
    pub findings: Vec<Finding>,
}

impl LinkReport {
    fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            linked: false,
            orphan: false,
            findings: Vec::new(),
        }
    }

    fn has_fatal(&self) -> bool {
        self.findings.iter().any(Finding::is_fatal)
    }
}

// ---------------------------------------------------------------------------
// Linker
// ---------------------------------------------------------------------------

/// Filename → recording index with per-entry grouping and orphan tracking.
pub struct AudioLinker {
    config: AudioConfig,
    registry: SchemaRegistry,
    records: BTreeMap<String, AudioMetadata>,
    by_entry: BTreeMap<String, BTreeSet<String>>,
    orphans: BTreeSet<String>,
}

impl AudioLinker {
    /// # Errors
    ///
    /// Returns `AudioError::Schema` if the schema registry cannot be built.
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        Ok(Self {
            config: config.clone(),
            registry: SchemaRegistry::new()?,
            records: BTreeMap::new(),
            by_entry: BTreeMap::new(),
            orphans: BTreeSet::new(),
        })
    }

    /// Number of linked recordings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Link one recording. Fatal findings leave the linker unchanged.
    pub fn link(&mut self, record: AudioMetadata, store: &impl EntryLookup) -> LinkReport {
        let mut report = LinkReport::new(&record.filename);

        match AudioFilename::parse(&record.filename, &self.config) {
            Ok(parsed) => {
                if parsed.entry_id != record.entry_id {
                    report.findings.push(Finding::fatal(
                        "entry_id",
                        ErrorKind::Schema,
                        format!(
                            "filename names entry {} but the record says {}",
                            parsed.entry_id, record.entry_id
                        ),
                    ));
                }
            }
            Err(message) => {
                report
                    .findings
                    .push(Finding::fatal("filename", ErrorKind::Format, message));
            }
        }

        if !(1..=5).contains(&record.quality_rating) {
            report.findings.push(Finding::fatal(
                "quality_rating",
                ErrorKind::Schema,
                format!("quality rating {} is outside 1..=5", record.quality_rating),
            ));
        }

        if self.records.contains_key(&record.filename) {
            report.findings.push(Finding::fatal(
                "filename",
                ErrorKind::DuplicateId,
                format!("recording {} is already linked", record.filename),
            ));
        }

        if report.has_fatal() {
            tracing::debug!(filename = %record.filename, "audio: recording rejected");
            return report;
        }

        if !store.contains_id(&record.entry_id) {
            tracing::warn!(
                filename = %record.filename,
                entry_id = %record.entry_id,
                "audio: orphan recording"
            );
            report.findings.push(Finding::warning(
                "entry_id",
                ErrorKind::Reference,
                format!("entry {} is not in the lexicon", record.entry_id),
            ));
            report.orphan = true;
            self.orphans.insert(record.filename.clone());
        }

        self.by_entry
            .entry(record.entry_id.clone())
            .or_default()
            .insert(record.filename.clone());
        self.records.insert(record.filename.clone(), record);
        report.linked = true;
        report
    }

    /// Check a raw JSON record against the `audio_metadata` schema, then link it.
    pub fn link_value(&mut self, value: &Value, store: &impl EntryLookup) -> LinkReport {
        let filename = value
            .get("filename")
            .and_then(Value::as_str)
            .unwrap_or("<no filename>")
            .to_string();

        if let Err(err) = self.registry.validate("audio_metadata", value) {
            let mut report = LinkReport::new(filename);
            report.findings = schema_findings(&err);
            return report;
        }

        match serde_json::from_value::<AudioMetadata>(value.clone()) {
            Ok(record) => self.link(record, store),
            Err(err) => {
                let mut report = LinkReport::new(filename);
                report
                    .findings
                    .push(Finding::fatal("", ErrorKind::Schema, err.to_string()));
                report
            }
        }
    }

    /// Load an audio metadata file: a JSON array or JSON Lines.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::Io` if the file cannot be read and
    /// `AudioError::Json` if a JSON array file does not parse. In JSON Lines
    /// files every line stands alone: a line that is not JSON becomes a
    /// `FormatError` report and the remaining lines are still linked. Other
    /// per-record problems are findings in the returned reports.
    pub fn load_file(
        &mut self,
        path: &Path,
        store: &impl EntryLookup,
    ) -> Result<Vec<LinkReport>, AudioError> {
        let content = std::fs::read_to_string(path)?;
        let reports: Vec<LinkReport> = if content.trim_start().starts_with('[') {
            let values: Vec<Value> = serde_json::from_str(&content)?;
            values.iter().map(|v| self.link_value(v, store)).collect()
        } else {
            JsonLinesReader::new(content.as_bytes())
                .read_all::<Value>()
                .enumerate()
                .map(|(index, line)| match line {
                    Ok(value) => self.link_value(&value, store),
                    Err(err) => unreadable_line(index + 1, &err),
                })
                .collect()
        };

        tracing::info!(
            path = %path.display(),
            records = reports.len(),
            linked = reports.iter().filter(|r| r.linked).count(),
            orphans = reports.iter().filter(|r| r.orphan).count(),
            "audio: metadata file loaded"
        );
        Ok(reports)
    }

    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&AudioMetadata> {
        self.records.get(filename)
    }

    /// Recordings of `entry_id`, in filename order.
    #[must_use]
    pub fn recordings_for(&self, entry_id: &str) -> Vec<&AudioMetadata> {
        self.by_entry
            .get(entry_id)
            .into_iter()
            .flatten()
            .filter_map(|filename| self.records.get(filename))
            .collect()
    }

    /// Recordings whose dialect matches `dialect`, case-insensitively.
    #[must_use]
    pub fn recordings_by_dialect(&self, dialect: &str) -> Vec<&AudioMetadata> {
        let key = dialect_key(dialect);
        self.records
            .values()
            .filter(|r| self.dialect_of(r).is_some_and(|d| dialect_key(&d) == key))
            .collect()
    }

    /// Linked recordings whose entry id is not in the store.
    #[must_use]
    pub fn orphans(&self) -> Vec<&AudioMetadata> {
        self.orphans
            .iter()
            .filter_map(|filename| self.records.get(filename))
            .collect()
    }

    /// Recompute orphan flags after store mutations. Returns the orphan count.
    pub fn relink(&mut self, store: &impl EntryLookup) -> usize {
        let orphans: BTreeSet<String> = self
            .records
            .values()
            .filter(|r| !store.contains_id(&r.entry_id))
            .map(|r| r.filename.clone())
            .collect();
        for filename in orphans.difference(&self.orphans) {
            tracing::warn!(filename = %filename, "audio: recording became orphan");
        }
        self.orphans = orphans;
        self.orphans.len()
    }

    /// Completeness summary for every stored entry and every entry with
    /// recordings, in id order. Stored entries without audio appear with zero
    /// counts.
    #[must_use]
    pub fn summaries(&self, store: &Lexicon) -> Vec<AudioSummary> {
        let ids: BTreeSet<&str> = store
            .ids()
            .chain(self.by_entry.keys().map(String::as_str))
            .collect();
        ids.into_iter()
            .map(|id| self.summary(id, store.contains(id)))
            .collect()
    }

    fn summary(&self, entry_id: &str, stored: bool) -> AudioSummary {
        let recordings = self.recordings_for(entry_id);
        let speakers: BTreeSet<&str> = recordings.iter().map(|r| r.speaker_id.as_str()).collect();
        let dialects: BTreeSet<String> = recordings
            .iter()
            .filter_map(|r| self.dialect_of(r))
            .map(|d| dialect_key(&d))
            .collect();
        AudioSummary {
            entry_id: entry_id.to_string(),
            recording_count: recordings.len(),
            speaker_count: speakers.len(),
            dialects: dialects.into_iter().collect(),
            orphan: !stored,
        }
    }

    /// The record's dialect, falling back to the one in its filename.
    fn dialect_of(&self, record: &AudioMetadata) -> Option<String> {
        record.dialect.clone().or_else(|| {
            AudioFilename::parse(&record.filename, &self.config)
                .ok()
                .and_then(|parsed| parsed.dialect)
        })
    }
}

/// Report for a JSON Lines line that did not parse.
fn unreadable_line(line: usize, err: &std::io::Error) -> LinkReport {
    tracing::warn!(line, error = %err, "audio: skipping unreadable line");
    let mut report = LinkReport::new(format!("<line {line}>"));
    report.findings.push(Finding::fatal(
        "",
        ErrorKind::Format,
        format!("line {line} is not a JSON record: {err}"),
    ));
    report
}
