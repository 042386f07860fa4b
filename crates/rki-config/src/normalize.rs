//! Normalization settings.

use rki_core::enums::ScriptStrictness;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NormalizeConfig {
    /// Treatment of non-Myanmar characters in script fields.
    #[serde(default)]
    pub mixed_script: ScriptStrictness,

    /// Fold `ng`/`ny`/`sh` into `ṅ`/`ñ`/`ś` in romanizations.
    #[serde(default)]
    pub romanization_digraphs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_warn_and_keep_digraphs() {
        let config = NormalizeConfig::default();
        assert_eq!(config.mixed_script, ScriptStrictness::Warn);
        assert!(!config.romanization_digraphs);
    }
}
