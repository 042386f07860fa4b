//! Shared builders for unit tests.

use rki_core::entities::{EntryDraft, Sense};

/// A minimal draft with the required fields and a top-level English gloss.
pub fn draft(id: &str, script: &str, romanization: &str, pos: &str, gloss_en: &str) -> EntryDraft {
    EntryDraft {
        id: Some(id.into()),
        script: Some(script.into()),
        romanization: Some(romanization.into()),
        pos: Some(pos.into()),
        gloss_en: Some(gloss_en.into()),
        ..EntryDraft::default()
    }
}

/// `rki_0001` "water".
pub fn water() -> EntryDraft {
    draft("rki_0001", "ရေ", "re", "noun", "water")
}

/// A polysemous entry with two senses and no top-level gloss.
pub fn road(id: &str) -> EntryDraft {
    EntryDraft {
        gloss_en: None,
        ipa: Some("/lăm/".into()),
        dialect: Some("sittwe".into()),
        senses: vec![
            Sense {
                gloss_en: Some("road, path".into()),
                dialect: Some("sittwe".into()),
                ..Sense::default()
            },
            Sense {
                gloss_en: Some("way, method".into()),
                domain: Some("abstract".into()),
                ..Sense::default()
            },
        ],
        ..draft(id, "လမ်", "lam", "noun", "")
    }
}
