//! # rki-schema
//!
//! JSON Schema generation, validation, and registry for the Rakhine lexicon.
//!
//! Entity types are defined in `rki-core` with `#[derive(JsonSchema)]`.
//! This crate imports those types and provides the registry and validation
//! layer. `rki-lexicon` validates incoming audio metadata and corpus records
//! against it before deserializing them.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
