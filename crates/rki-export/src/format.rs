use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rki_core::errors::CoreError;

/// Target representation of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// `{metadata, lexicon}` JSON document.
    Json,
    /// Tab-separated values, one row per sense.
    Tabular,
    /// XML.
    Markup,
    /// SQL script.
    Relational,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Json, Self::Tabular, Self::Markup, Self::Relational];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Tabular => "tabular",
            Self::Markup => "markup",
            Self::Relational => "relational",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Tabular => "tsv",
            Self::Markup => "xml",
            Self::Relational => "sql",
        }
    }

    /// Artifact file name written by `export_to_dir`, e.g. `lexicon.tsv`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("lexicon.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the format name or its file extension.
impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.extension() == s)
            .ok_or_else(|| CoreError::Parse(format!("unknown export format '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("json", ExportFormat::Json)]
    #[case("TSV", ExportFormat::Tabular)]
    #[case("markup", ExportFormat::Markup)]
    #[case("sql", ExportFormat::Relational)]
    fn parses_names_and_extensions(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn file_names() {
        let names: Vec<_> = ExportFormat::ALL.map(ExportFormat::file_name).into();
        assert_eq!(
            names,
            vec!["lexicon.json", "lexicon.tsv", "lexicon.xml", "lexicon.sql"]
        );
    }
}
