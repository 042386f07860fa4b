//! # rki-config
//!
//! Layered configuration loading for the Rakhine lexicon using figment.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `~/.config/rki-lexicon/config.toml`
//! 3. `.rki/config.toml` in the working directory
//! 4. `RKI_*` environment variables, with `__` between section and key
//!
//! # Environment
//!
//! For example `RKI_NORMALIZE__MIXED_SCRIPT` -> `normalize.mixed_script`,
//! `RKI_STORE__BULK_MODE` -> `store.bulk_mode`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rki_config::LexiconConfig;
//!
//! let config = LexiconConfig::load_with_dotenv().expect("config");
//! let mode = config.bulk_mode().expect("store.bulk_mode must be set");
//! println!("bulk mode: {mode}");
//! ```

mod audio;
mod error;
mod export;
mod normalize;
mod store;

pub use audio::AudioConfig;
pub use error::ConfigError;
pub use export::{ExportConfig, check_list_separator};
pub use normalize::NormalizeConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rki_core::enums::BulkMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl LexiconConfig {
    /// Merge defaults, both TOML layers and the environment.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse, or
    /// `ConfigError::InvalidValue` if the merged values are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Like [`Self::load`], reading a `.env` file into the environment first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and check a config from an arbitrary provider chain.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// The provider chain used by [`Self::load`].
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user) = Self::user_config_path().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(user));
        }

        let project = PathBuf::from(".rki/config.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        // env wins over both files
        figment.merge(Env::prefixed("RKI_").split("__"))
    }

    /// The configured bulk-load mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `store.bulk_mode` is unset.
    pub fn bulk_mode(&self) -> Result<BulkMode, ConfigError> {
        self.store.bulk_mode.ok_or_else(|| ConfigError::NotConfigured {
            key: "store.bulk_mode".to_string(),
        })
    }

    fn check(&self) -> Result<(), ConfigError> {
        check_list_separator(self.export.list_separator)?;
        if self.audio.extensions.iter().any(|ext| ext.is_empty() || ext.contains('.')) {
            return Err(ConfigError::InvalidValue {
                field: "audio.extensions".to_string(),
                reason: "extensions must be non-empty and given without the dot".to_string(),
            });
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rki-lexicon").join("config.toml"))
    }

    /// Load `.env` from the workspace root, walking up from `CARGO_MANIFEST_DIR`.
    /// Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rki_core::enums::ScriptStrictness;

    #[test]
    fn defaults_match_documented_values() {
        let config = LexiconConfig::default();
        assert_eq!(config.normalize.mixed_script, ScriptStrictness::Warn);
        assert!(config.store.bulk_mode.is_none());
        assert_eq!(config.export.list_separator, ';');
        assert_eq!(config.audio.extensions.len(), 4);
    }

    #[test]
    fn bulk_mode_has_no_default() {
        let err = LexiconConfig::default().bulk_mode().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref key } if key == "store.bulk_mode"));
    }

    #[test]
    fn load_without_files_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = LexiconConfig::load().expect("should extract defaults");
            assert!(config.export.pretty_json);
            assert!(!config.normalize.romanization_digraphs);
            Ok(())
        });
    }
}
