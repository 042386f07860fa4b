use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Etymology, Sense, Transcription};
use crate::enums::{PartOfSpeech, RefRelation};
use crate::ids::is_entry_id;

/// A cross-reference: either another entry's id or free text.
///
/// Serialized as a plain string; strings shaped like an entry id are ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LexRef {
    Id(String),
    Text(String),
}

impl LexRef {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if is_entry_id(s) {
            Self::Id(s.to_string())
        } else {
            Self::Text(s.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(s) | Self::Text(s) => s,
        }
    }

    /// The referenced entry id, if this is an id reference.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for LexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LexRef {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<LexRef> for String {
    fn from(value: LexRef) -> Self {
        match value {
            LexRef::Id(s) | LexRef::Text(s) => s,
        }
    }
}

/// A validated lexicon headword. Only the validation engine constructs these
/// from drafts; the store owns every committed instance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    /// Headword in Myanmar script.
    #[serde(alias = "rakhine")]
    pub script: String,
    pub romanization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub ipa: Option<Transcription>,
    pub pos: PartOfSpeech,
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
    #[schemars(with = "Vec<String>")]
    pub synonyms: Vec<LexRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(with = "Vec<String>")]
    pub antonyms: Vec<LexRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(with = "Vec<String>")]
    pub see_also: Vec<LexRef>,
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

impl Entry {
    /// Whether the entry carries a top-level gloss in either language.
    #[must_use]
    pub const fn has_gloss(&self) -> bool {
        self.gloss_en.is_some() || self.gloss_my.is_some()
    }

    /// The reference list for `relation`.
    #[must_use]
    pub fn refs(&self, relation: RefRelation) -> &[LexRef] {
        match relation {
            RefRelation::Synonym => &self.synonyms,
            RefRelation::Antonym => &self.antonyms,
            RefRelation::SeeAlso => &self.see_also,
        }
    }

    /// Every cross-reference with its relation, in field order.
    pub fn references(&self) -> impl Iterator<Item = (RefRelation, &LexRef)> {
        RefRelation::ALL
            .into_iter()
            .flat_map(move |relation| self.refs(relation).iter().map(move |r| (relation, r)))
    }

    /// Every gloss on the entry and its senses, in both languages.
    pub fn glosses(&self) -> impl Iterator<Item = &str> {
        [&self.gloss_en, &self.gloss_my]
            .into_iter()
            .chain(
                self.senses
                    .iter()
                    .flat_map(|s| [&s.gloss_en, &s.gloss_my]),
            )
            .filter_map(Option::as_deref)
    }

    /// Dialect tags on the entry and its senses.
    pub fn dialects(&self) -> impl Iterator<Item = &str> {
        self.dialect
            .as_deref()
            .into_iter()
            .chain(self.senses.iter().filter_map(|s| s.dialect.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Entry {
        Entry {
            id: "rki_0001".into(),
            script: "ရေ".into(),
            romanization: "re".into(),
            ipa: None,
            pos: PartOfSpeech::Noun,
            gloss_en: Some("water".into()),
            gloss_my: None,
            definition_en: None,
            definition_my: None,
            example: None,
            example_translation: None,
            synonyms: vec![LexRef::parse("rki_0002"), LexRef::parse("ရည်")],
            antonyms: vec![],
            see_also: vec![],
            dialect: Some("sittwe".into()),
            etymology: None,
            notes: None,
            source: None,
            senses: vec![Sense {
                gloss_en: Some("liquid".into()),
                dialect: Some("ramree".into()),
                ..Sense::default()
            }],
        }
    }

    #[test]
    fn lexref_distinguishes_ids_from_text() {
        assert_eq!(LexRef::parse("rki_0002").id(), Some("rki_0002"));
        assert_eq!(LexRef::parse("water").id(), None);
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(water()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("ipa"));
        assert!(!obj.contains_key("antonyms"));
        assert_eq!(obj["synonyms"], serde_json::json!(["rki_0002", "ရည်"]));
    }

    #[test]
    fn rakhine_alias_accepted() {
        let entry: Entry = serde_json::from_value(serde_json::json!({
            "id": "rki_0001",
            "rakhine": "ရေ",
            "romanization": "re",
            "pos": "noun",
            "gloss_en": "water"
        }))
        .unwrap();
        assert_eq!(entry.script, "ရေ");
    }

    #[test]
    fn glosses_and_dialects_include_senses() {
        let entry = water();
        assert_eq!(entry.glosses().collect::<Vec<_>>(), vec!["water", "liquid"]);
        assert_eq!(entry.dialects().collect::<Vec<_>>(), vec!["sittwe", "ramree"]);
        assert_eq!(entry.references().count(), 2);
    }
}
