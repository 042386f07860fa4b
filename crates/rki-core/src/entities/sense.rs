use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One meaning of a polysemous entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Sense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss_en: Option<String>,
    /// Gloss in Burmese (Myanmar script).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss_my: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_my: Option<String>,
    /// Example sentence in Myanmar script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Semantic domain, e.g. `anatomy` or `agriculture`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Sense {
    /// Whether the sense carries a gloss in either language.
    #[must_use]
    pub const fn has_gloss(&self) -> bool {
        self.gloss_en.is_some() || self.gloss_my.is_some()
    }
}
