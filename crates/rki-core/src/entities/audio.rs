use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata for one recording of an entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AudioMetadata {
    /// e.g. `rki_0001_spk01_sittwe_m.wav`.
    pub filename: String,
    pub entry_id: String,
    pub speaker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microphone: Option<String>,
    /// 1 (unusable) to 5 (studio quality).
    pub quality_rating: u8,
    pub recording_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Audio completeness for a single entry, consumed by external analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AudioSummary {
    pub entry_id: String,
    pub recording_count: usize,
    pub speaker_count: usize,
    /// Distinct dialects covered, lowercased and sorted.
    pub dialects: Vec<String>,
    /// True when the entry id is not in the store.
    pub orphan: bool,
}
