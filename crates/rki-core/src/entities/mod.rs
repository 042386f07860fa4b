//! Entity structs for the lexicon data model.
//!
//! `Entry`, `Sense`, `Etymology`, and `AudioMetadata` are the canonical records
//! held by the store and written by the exporters. `EntryDraft` is the raw
//! contributor record consumed by normalization. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod audio;
mod draft;
mod entry;
mod etymology;
mod sense;
mod transcription;

pub use audio::{AudioMetadata, AudioSummary};
pub use draft::EntryDraft;
pub use entry::{Entry, LexRef};
pub use etymology::Etymology;
pub use sense::Sense;
pub use transcription::Transcription;
