//! Structured-document export: `{metadata, lexicon: [...]}`.
//!
//! Entries are written in id order with their fields in declaration order and
//! absent optional fields omitted. [`import`] reads the document back through
//! the full normalize and validate pipeline.

use rki_core::corpus::CorpusFile;
use rki_core::entities::Entry;
use rki_core::enums::BulkMode;
use rki_lexicon::corpus::Corpus;
use rki_lexicon::error::CorpusError;
use rki_lexicon::normalize::Normalizer;
use rki_lexicon::store::{Lexicon, Snapshot};
use rki_schema::SchemaRegistry;

use crate::error::ExportError;

/// Render the snapshot as a corpus document.
///
/// # Errors
///
/// Returns `ExportError::Json` if serialization fails.
pub fn render(snapshot: &Snapshot, pretty: bool) -> Result<String, ExportError> {
    let document = CorpusFile {
        metadata: snapshot.metadata().clone(),
        lexicon: snapshot.iter().collect::<Vec<&Entry>>(),
    };
    let mut text = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    text.push('\n');
    Ok(text)
}

/// Rebuild a store from a structured document.
///
/// Every record is re-normalized and re-validated; the load is atomic, so a
/// document with any rejected record yields an error instead of a partial
/// store.
///
/// # Errors
///
/// Returns `ExportError::Import` wrapping the corpus error (including an
/// atomic rollback with its full report).
pub fn import(
    text: &str,
    normalizer: Normalizer,
    registry: &SchemaRegistry,
) -> Result<Lexicon, ExportError> {
    let corpus = Corpus::parse(text.as_bytes(), registry)?;
    let mut store = Lexicon::new(normalizer);
    store
        .bulk_load_items(corpus.items, BulkMode::Atomic)
        .map_err(CorpusError::from)?;
    store.set_metadata(corpus.metadata);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use rki_core::entities::EntryDraft;

    use super::*;

    fn store() -> Lexicon {
        let mut store = Lexicon::default();
        for (id, script, rom, gloss) in [
            ("rki_0002", "သောက်", "thauk", "drink"),
            ("rki_0001", "ရေ", "re", "water"),
        ] {
            let draft = EntryDraft {
                id: Some(id.into()),
                script: Some(script.into()),
                romanization: Some(rom.into()),
                pos: Some("noun".into()),
                gloss_en: Some(gloss.into()),
                ..EntryDraft::default()
            };
            store.insert(&draft, false).unwrap();
        }
        store
    }

    #[test]
    fn entries_in_id_order_with_metadata() {
        let text = render(&store().snapshot(), false).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["metadata"]["iso_code"], "rki");
        let ids: Vec<_> = value["lexicon"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["rki_0001", "rki_0002"]);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let text = render(&store().snapshot(), true).unwrap();
        assert!(!text.contains("gloss_my"));
        assert!(!text.contains("null"));
    }

    #[test]
    fn import_rebuilds_store() {
        let original = store();
        let text = render(&original.snapshot(), true).unwrap();
        let registry = SchemaRegistry::new().unwrap();
        let imported = import(&text, Normalizer::default(), &registry).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported.get("rki_0001"), original.get("rki_0001"));
    }
}
