use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Entry, Etymology, Sense};

/// A contributor-submitted record before normalization and validation.
///
/// Every field is optional and string-typed so that malformed submissions
/// still deserialize and the validator can report every problem at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "rakhine", skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    /// Declared transcription type (`phonemic` or `phonetic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipa_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss_my: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_my: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<Etymology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub senses: Vec<Sense>,
}

impl EntryDraft {
    /// Label used in reports before the id is known to be valid.
    #[must_use]
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }
}

/// Re-submitting a stored entry goes through the same pipeline as a new one.
impl From<&Entry> for EntryDraft {
    fn from(entry: &Entry) -> Self {
        let refs = |list: &[super::LexRef]| list.iter().map(ToString::to_string).collect();
        Self {
            id: Some(entry.id.clone()),
            script: Some(entry.script.clone()),
            romanization: Some(entry.romanization.clone()),
            ipa: entry.ipa.as_ref().map(ToString::to_string),
            ipa_type: None,
            pos: Some(entry.pos.as_str().to_string()),
            gloss_en: entry.gloss_en.clone(),
            gloss_my: entry.gloss_my.clone(),
            definition_en: entry.definition_en.clone(),
            definition_my: entry.definition_my.clone(),
            example: entry.example.clone(),
            example_translation: entry.example_translation.clone(),
            synonyms: refs(&entry.synonyms),
            antonyms: refs(&entry.antonyms),
            see_also: refs(&entry.see_also),
            dialect: entry.dialect.clone(),
            etymology: entry.etymology.clone(),
            notes: entry.notes.clone(),
            source: entry.source.clone(),
            senses: entry.senses.clone(),
        }
    }
}
