//! # rki-core
//!
//! Core types, orthography tables, and error types for the Rakhine lexicon.
//!
//! This crate provides the foundational types shared across all lexicon crates:
//! - Entity structs for the canonical data model (entries, senses, etymology, audio metadata)
//! - Loosely-typed drafts as submitted by contributors
//! - Enums for parts of speech, finding kinds, severities, and the entry lifecycle
//! - Static orthography and charset tables
//! - Validation findings and reports
//! - The corpus file envelope

pub mod corpus;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod findings;
pub mod ids;
pub mod tables;
