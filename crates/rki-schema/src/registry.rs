//! Central schema registry for all lexicon interchange types.
//!
//! The `SchemaRegistry` builds JSON Schemas from rki-core types at construction
//! time using [`schemars::schema_for!`] and validates JSON values via `jsonschema`.
//! Validators are compiled once per schema and reused.

use std::collections::HashMap;

use jsonschema::Validator;
use schemars::schema_for;
use serde_json::Value;

use rki_core::corpus::{CorpusFile, CorpusMetadata};
use rki_core::entities::{AudioMetadata, AudioSummary, Entry, EntryDraft, Etymology, Sense};
use rki_core::findings::{Finding, ValidationReport};

use crate::error::SchemaError;

struct Registered {
    schema: Value,
    validator: Validator,
}

/// Central store of all JSON Schemas for the lexicon.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Registered>,
}

/// Generate the schema for `$ty`, compile it, and insert both under `$name`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {{
        let schema = Value::from(schema_for!($ty));
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| SchemaError::Generation(format!("{}: {e}", $name)))?;
        $map.insert($name, Registered { schema, validator });
    }};
}

impl SchemaRegistry {
    /// Build a registry of every entity, envelope, and report schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if a generated schema fails to compile.
    pub fn new() -> Result<Self, SchemaError> {
        let mut schemas = HashMap::new();

        // --- Entity types (6) ---
        register!(schemas, "entry", Entry);
        register!(schemas, "entry_draft", EntryDraft);
        register!(schemas, "sense", Sense);
        register!(schemas, "etymology", Etymology);
        register!(schemas, "audio_metadata", AudioMetadata);
        register!(schemas, "audio_summary", AudioSummary);

        // --- Reports (2) ---
        register!(schemas, "finding", Finding);
        register!(schemas, "validation_report", ValidationReport);

        // --- Corpus envelope (3) ---
        register!(schemas, "corpus_metadata", CorpusMetadata);
        register!(schemas, "corpus_file", CorpusFile<Entry>);
        register!(schemas, "corpus_draft_file", CorpusFile<EntryDraft>);

        Ok(Self { schemas })
    }

    /// Generated schema registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name).map(|r| &r.schema)
    }

    /// Check `instance` against the schema registered as `name`. Every
    /// violation is collected, each prefixed with its instance path.
    ///
    /// # Errors
    ///
    /// `SchemaError::NotFound` for an unregistered name,
    /// `SchemaError::ValidationFailed` listing the violations otherwise.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let registered = self
            .schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let errors: Vec<String> = registered
            .validator
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
