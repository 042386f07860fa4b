//! Errors raised while loading `LexiconConfig`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config: {0}")]
    Figment(#[from] figment::Error),

    /// A setting that has no default was never set.
    #[error("config: '{key}' is not set and has no default")]
    NotConfigured { key: String },

    /// A value parsed but is unusable.
    #[error("config: bad value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
