//! Export settings.

use rki_core::enums::TabularEscaping;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

const fn default_list_separator() -> char {
    ';'
}

const fn default_pretty_json() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Joins list-valued fields in tabular rows.
    #[serde(default = "default_list_separator")]
    pub list_separator: char,

    #[serde(default)]
    pub tabular_escaping: TabularEscaping,

    /// Indent the structured-document artifact.
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// Directory `export_to_dir` writes into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            list_separator: default_list_separator(),
            tabular_escaping: TabularEscaping::default(),
            pretty_json: default_pretty_json(),
            output_dir: default_output_dir(),
        }
    }
}

/// Check that `separator` survives backslash escaping in tabular cells.
///
/// Whitespace, control characters, and the backslash collide with cell
/// escapes, as do `t`, `n`, and `r`: an escaped `\n` separator would decode
/// as a newline.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a separator that cannot be escaped
/// unambiguously.
pub fn check_list_separator(separator: char) -> Result<(), ConfigError> {
    if separator == '\\'
        || separator.is_whitespace()
        || separator.is_control()
        || matches!(separator, 't' | 'n' | 'r')
    {
        return Err(ConfigError::InvalidValue {
            field: "export.list_separator".to_string(),
            reason: format!("{separator:?} collides with tabular escaping"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ExportConfig::default();
        assert_eq!(config.list_separator, ';');
        assert_eq!(config.tabular_escaping, TabularEscaping::Backslash);
        assert!(config.pretty_json);
        assert_eq!(config.output_dir, PathBuf::from("exports"));
    }

    #[test]
    fn separators_that_name_escapes_are_refused() {
        for separator in ['t', 'n', 'r', '\\', '\t', ' ', '\u{1}'] {
            assert!(check_list_separator(separator).is_err(), "{separator:?}");
        }
        for separator in [';', '|', ',', 'x'] {
            assert!(check_list_separator(separator).is_ok(), "{separator:?}");
        }
    }
}
