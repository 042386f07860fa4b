use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::TranscriptionKind;
use crate::errors::CoreError;

/// An IPA transcription with its delimiters checked.
///
/// Serialized as the delimited string (`/lăm/`, `[lăm]`), so the canonical
/// JSON form is the same text a contributor submits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Transcription {
    kind: TranscriptionKind,
    body: String,
}

impl Transcription {
    /// Split a delimited transcription into its kind and body.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Parse` if the text is not enclosed in `/…/` or `[…]`.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let kind = Self::kind_of(text).ok_or_else(|| {
            CoreError::Parse(format!(
                "IPA '{text}' must be enclosed in /…/ (phonemic) or […] (phonetic)"
            ))
        })?;
        Ok(Self {
            kind,
            body: text[1..text.len() - 1].to_string(),
        })
    }

    /// The transcription type implied by the delimiters, if they are well-formed.
    #[must_use]
    pub fn kind_of(text: &str) -> Option<TranscriptionKind> {
        [TranscriptionKind::Phonemic, TranscriptionKind::Phonetic]
            .into_iter()
            .find(|kind| {
                let (open, close) = kind.delimiters();
                text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close)
            })
    }

    #[must_use]
    pub const fn kind(&self) -> TranscriptionKind {
        self.kind
    }

    /// Text between the delimiters.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.kind.delimiters();
        write!(f, "{open}{}{close}", self.body)
    }
}

impl TryFrom<String> for Transcription {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Transcription> for String {
    fn from(value: Transcription) -> Self {
        value.to_string()
    }
}
