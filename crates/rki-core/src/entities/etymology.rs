use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Origin of a word.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Etymology {
    /// Source language, e.g. `Pali`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Form in the source language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cognates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Etymology {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.original.is_none()
            && self.cognates.is_empty()
            && self.notes.is_none()
    }
}
