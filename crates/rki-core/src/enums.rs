//! Parts of speech, finding kinds, policies, and the entry lifecycle.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `EntryState` provides `allowed_next_states()` to enforce valid lifecycle
//! transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// PartOfSpeech
// ---------------------------------------------------------------------------

/// Approved part-of-speech tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Particle,
    Classifier,
    Interjection,
    Conjunction,
    Numeral,
    Preposition,
    Postposition,
    Auxiliary,
}

impl PartOfSpeech {
    pub const ALL: [Self; 13] = [
        Self::Noun,
        Self::Verb,
        Self::Adjective,
        Self::Adverb,
        Self::Pronoun,
        Self::Particle,
        Self::Classifier,
        Self::Interjection,
        Self::Conjunction,
        Self::Numeral,
        Self::Preposition,
        Self::Postposition,
        Self::Auxiliary,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Pronoun => "pronoun",
            Self::Particle => "particle",
            Self::Classifier => "classifier",
            Self::Interjection => "interjection",
            Self::Conjunction => "conjunction",
            Self::Numeral => "numeral",
            Self::Preposition => "preposition",
            Self::Postposition => "postposition",
            Self::Auxiliary => "auxiliary",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| CoreError::Parse(format!("unknown part of speech '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// TranscriptionKind
// ---------------------------------------------------------------------------

/// IPA transcription type, determined by its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionKind {
    /// `/…/`
    Phonemic,
    /// `[…]`
    Phonetic,
}

impl TranscriptionKind {
    #[must_use]
    pub const fn delimiters(self) -> (char, char) {
        match self {
            Self::Phonemic => ('/', '/'),
            Self::Phonetic => ('[', ']'),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phonemic => "phonemic",
            Self::Phonetic => "phonetic",
        }
    }
}

impl fmt::Display for TranscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranscriptionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phonemic" => Ok(Self::Phonemic),
            "phonetic" => Ok(Self::Phonetic),
            other => Err(CoreError::Parse(format!(
                "unknown transcription type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Whether a finding blocks acceptance of its entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Fatal,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Category of a validation, normalization, linking, or export finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Encoding,
    MixedScript,
    Schema,
    Charset,
    Reference,
    DuplicateId,
    Format,
}

impl ErrorKind {
    /// Name used in human-readable reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encoding => "EncodingError",
            Self::MixedScript => "MixedScriptError",
            Self::Schema => "SchemaError",
            Self::Charset => "CharsetError",
            Self::Reference => "ReferenceError",
            Self::DuplicateId => "DuplicateIdError",
            Self::Format => "FormatError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScriptStrictness
// ---------------------------------------------------------------------------

/// How characters outside the Myanmar script blocks are treated in script fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStrictness {
    /// Not checked.
    Off,
    /// Recorded as a Warning finding.
    #[default]
    Warn,
    /// Recorded as a Fatal finding.
    Reject,
}

impl ScriptStrictness {
    /// Severity of a mixed-script finding, or `None` when the check is off.
    #[must_use]
    pub const fn severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(Severity::Warning),
            Self::Reject => Some(Severity::Fatal),
        }
    }
}

// ---------------------------------------------------------------------------
// BulkMode
// ---------------------------------------------------------------------------

/// Commit policy for a batch of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkMode {
    /// Any Fatal finding in any entry rolls back the whole batch.
    Atomic,
    /// Every entry that validates on its own is committed.
    BestEffort,
}

impl BulkMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::BestEffort => "best_effort",
        }
    }
}

impl fmt::Display for BulkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TabularEscaping
// ---------------------------------------------------------------------------

/// Escaping rule for tabular export cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TabularEscaping {
    /// `\\`, `\t`, `\n`, `\r`, and the list separator as `\;` inside list items.
    #[default]
    Backslash,
    /// Any value that would need escaping is a `FormatError`.
    Reject,
}

// ---------------------------------------------------------------------------
// RefRelation
// ---------------------------------------------------------------------------

/// Relation carried by an entry's cross-reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefRelation {
    Synonym,
    Antonym,
    SeeAlso,
}

impl RefRelation {
    pub const ALL: [Self; 3] = [Self::Synonym, Self::Antonym, Self::SeeAlso];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Synonym => "synonym",
            Self::Antonym => "antonym",
            Self::SeeAlso => "see_also",
        }
    }

    /// Field name of the list carrying this relation.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Synonym => "synonyms",
            Self::Antonym => "antonyms",
            Self::SeeAlso => "see_also",
        }
    }
}

impl fmt::Display for RefRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntryState
// ---------------------------------------------------------------------------

/// Lifecycle of a contributed entry.
///
/// ```text
/// draft → normalized → accepted → stored → exported
///                    → rejected → draft (returned to contributor)
///                                 stored → deleted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Draft,
    Normalized,
    Accepted,
    Rejected,
    Stored,
    Exported,
    Deleted,
}

impl EntryState {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Normalized, Self::Rejected],
            Self::Normalized => &[Self::Accepted, Self::Rejected],
            Self::Accepted => &[Self::Stored],
            Self::Rejected => &[Self::Draft],
            Self::Stored => &[Self::Exported, Self::Stored, Self::Deleted],
            Self::Exported => &[Self::Stored, Self::Deleted],
            Self::Deleted => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Check a transition, naming the entry in the error.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if `next` is not reachable from `self`.
    pub fn transition(self, id: &str, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                id: id.to_string(),
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Normalized => "normalized",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Stored => "stored",
            Self::Exported => "exported",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
