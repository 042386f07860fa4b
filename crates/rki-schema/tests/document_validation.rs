//! Validation of hand-written JSON documents as contributors submit them.

use pretty_assertions::assert_eq;
use rki_schema::{SchemaError, SchemaRegistry};
use serde_json::json;

fn errors(result: Result<(), SchemaError>) -> Vec<String> {
    match result {
        Err(SchemaError::ValidationFailed { errors }) => errors,
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn all_expected_schemas_present() {
    let reg = SchemaRegistry::new().unwrap();
    for name in [
        "entry",
        "entry_draft",
        "sense",
        "etymology",
        "audio_metadata",
        "audio_summary",
        "finding",
        "validation_report",
        "corpus_metadata",
        "corpus_file",
        "corpus_draft_file",
    ] {
        assert!(reg.get(name).is_some(), "Missing expected schema: {name}");
    }
}

#[test]
fn draft_with_only_strings_is_valid() {
    let reg = SchemaRegistry::new().unwrap();
    let draft = json!({
        "id": "rki_0001",
        "rakhine": "ရေ",
        "romanization": "re",
        "pos": "NOUN",
        "ipa": "sʰa"
    });
    assert!(reg.validate("entry_draft", &draft).is_ok());
}

#[test]
fn draft_with_numeric_pos_is_rejected_with_path() {
    let reg = SchemaRegistry::new().unwrap();
    let draft = json!({"id": "rki_0001", "pos": 5});
    let errors = errors(reg.validate("entry_draft", &draft));
    assert!(errors.iter().any(|e| e.starts_with("/pos")), "{errors:?}");
}

#[test]
fn audio_record_requires_date_and_rating() {
    let reg = SchemaRegistry::new().unwrap();
    let valid = json!({
        "filename": "rki_0001_spk01.wav",
        "entry_id": "rki_0001",
        "speaker_id": "spk01",
        "quality_rating": 3,
        "recording_date": "2024-03-01"
    });
    assert!(reg.validate("audio_metadata", &valid).is_ok());

    let missing = json!({
        "filename": "rki_0001_spk01.wav",
        "entry_id": "rki_0001",
        "speaker_id": "spk01"
    });
    assert_eq!(errors(reg.validate("audio_metadata", &missing)).len(), 2);
}

#[test]
fn canonical_entry_requires_core_fields() {
    let reg = SchemaRegistry::new().unwrap();
    let entry = json!({
        "id": "rki_0001",
        "script": "ရေ",
        "romanization": "re",
        "pos": "noun",
        "gloss_en": "water"
    });
    assert!(reg.validate("entry", &entry).is_ok());

    let bad_pos = json!({
        "id": "rki_0001",
        "script": "ရေ",
        "romanization": "re",
        "pos": "gerund"
    });
    assert!(reg.validate("entry", &bad_pos).is_err());
}

#[test]
fn corpus_file_without_metadata_is_valid() {
    let reg = SchemaRegistry::new().unwrap();
    let corpus = json!({"lexicon": []});
    assert!(reg.validate("corpus_draft_file", &corpus).is_ok());
}
