//! Cross-cutting error types for the lexicon crates.
//!
//! Domain-specific errors (e.g., `StoreError`, `ExportError`) are defined in
//! their respective crates.

use thiserror::Error;

/// Errors that can be raised by any lexicon crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entry lookup returned no result.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A lifecycle transition was attempted that is not allowed.
    #[error("Invalid state transition for {id}: {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// A value could not be parsed into a core type.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
