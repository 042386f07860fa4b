//! Corpus file envelope: `{metadata, lexicon: [...]}`.
//!
//! The envelope is generic over the record type so the same shape serves
//! contributor drafts on the way in and validated entries on the way out.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Descriptive metadata carried at the top of a corpus file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CorpusMetadata {
    pub language: String,
    pub iso_code: String,
    pub script: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sources: Vec<String>,
    /// ISO 8601 timestamp. Kept as text so older files with naive timestamps load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl Default for CorpusMetadata {
    fn default() -> Self {
        Self {
            language: "Rakhine".to_string(),
            iso_code: "rki".to_string(),
            script: "Myanmar".to_string(),
            version: "1.0.0".to_string(),
            description: "Digital lexicon for the Rakhine language".to_string(),
            sources: Vec::new(),
            created: None,
            modified: None,
        }
    }
}

impl CorpusMetadata {
    /// Stamp `modified` (and `created`, if unset) with the current time.
    pub fn touch(&mut self) {
        let now = Utc::now().to_rfc3339();
        if self.created.is_none() {
            self.created = Some(now.clone());
        }
        self.modified = Some(now);
    }
}

/// A whole corpus document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CorpusFile<E> {
    #[serde(default)]
    pub metadata: CorpusMetadata,
    #[serde(alias = "entries")]
    pub lexicon: Vec<E>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntryDraft;

    #[test]
    fn missing_metadata_defaults_to_rakhine() {
        let corpus: CorpusFile<EntryDraft> =
            serde_json::from_str(r#"{"lexicon": []}"#).unwrap();
        assert_eq!(corpus.metadata.iso_code, "rki");
        assert!(corpus.lexicon.is_empty());
    }

    #[test]
    fn entries_alias_accepted() {
        let corpus: CorpusFile<EntryDraft> =
            serde_json::from_str(r#"{"entries": [{"id": "rki_0001"}]}"#).unwrap();
        assert_eq!(corpus.lexicon[0].id.as_deref(), Some("rki_0001"));
    }

    #[test]
    fn touch_sets_both_timestamps_once() {
        let mut meta = CorpusMetadata::default();
        meta.touch();
        let created = meta.created.clone();
        meta.touch();
        assert_eq!(meta.created, created);
        assert!(meta.modified.is_some());
    }
}
