//! Registry and validation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no schema named '{0}'")]
    NotFound(String),

    /// The instance broke one or more schema rules.
    #[error("schema validation failed: {}", errors.join("; "))]
    ValidationFailed {
        /// Individual error messages from the validator, prefixed with the instance path.
        errors: Vec<String>,
    },

    #[error("schema did not compile: {0}")]
    Generation(String),
}
