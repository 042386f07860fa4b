//! Audio linker settings.

use serde::{Deserialize, Serialize};

fn default_extensions() -> Vec<String> {
    ["wav", "flac", "mp3", "m4a"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    /// Accepted recording file extensions, lowercase, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl AudioConfig {
    /// Whether `ext` (any case) is an accepted extension.
    #[must_use]
    pub fn accepts(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_default_extensions_case_insensitively() {
        let config = AudioConfig::default();
        assert!(config.accepts("wav"));
        assert!(config.accepts("FLAC"));
        assert!(!config.accepts("ogg"));
    }
}
