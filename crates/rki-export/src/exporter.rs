//! Export orchestration over a store snapshot.

use std::path::{Path, PathBuf};

use rki_config::{ExportConfig, LexiconConfig};
use rki_lexicon::store::{Lexicon, Snapshot};

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::tabular::TabularWriter;
use crate::{json, markup, relational};

/// One rendered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub content: String,
}

impl Artifact {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    #[must_use]
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn from_config(config: &LexiconConfig) -> Self {
        Self::new(config.export.clone())
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render one format.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Format` listing every value the format cannot
    /// represent, or `ExportError::Json` if serialization fails.
    pub fn export(&self, snapshot: &Snapshot, format: ExportFormat) -> Result<Artifact, ExportError> {
        let content = match format {
            ExportFormat::Json => json::render(snapshot, self.config.pretty_json)?,
            ExportFormat::Tabular => TabularWriter::from_config(&self.config)?.render(snapshot)?,
            ExportFormat::Markup => markup::render(snapshot)?,
            ExportFormat::Relational => relational::render(snapshot)?,
        };
        tracing::debug!(
            format = %format,
            entries = snapshot.len(),
            bytes = content.len(),
            "export: rendered artifact"
        );
        Ok(Artifact { format, content })
    }

    /// Render several formats. Failures from every format are reported
    /// together and no artifact is returned if any format failed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::export`]; `ExportError::Format` carries the failures of
    /// all formats.
    pub fn export_all(
        &self,
        snapshot: &Snapshot,
        formats: &[ExportFormat],
    ) -> Result<Vec<Artifact>, ExportError> {
        let mut artifacts = Vec::with_capacity(formats.len());
        let mut failures = Vec::new();
        for &format in formats {
            match self.export(snapshot, format) {
                Ok(artifact) => artifacts.push(artifact),
                Err(ExportError::Format { failures: mut f }) => failures.append(&mut f),
                Err(other) => return Err(other),
            }
        }
        if failures.is_empty() {
            Ok(artifacts)
        } else {
            Err(ExportError::Format { failures })
        }
    }

    /// Write every format into `dir` (or `export.output_dir`) as
    /// `lexicon.{json,tsv,xml,sql}`. Nothing is written unless all formats
    /// render.
    ///
    /// # Errors
    ///
    /// Returns the render error of [`Self::export_all`] or `ExportError::Io`.
    pub fn export_to_dir(
        &self,
        snapshot: &Snapshot,
        dir: Option<&Path>,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let dir = dir.unwrap_or(self.config.output_dir.as_path());
        let artifacts = self.export_all(snapshot, &ExportFormat::ALL)?;

        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let path = dir.join(artifact.file_name());
            std::fs::write(&path, &artifact.content)?;
            written.push(path);
        }

        tracing::info!(
            dir = %dir.display(),
            entries = snapshot.len(),
            artifacts = written.len(),
            "export: wrote artifacts"
        );
        Ok(written)
    }

    /// Snapshot `store`, write every format, and mark the exported entries.
    ///
    /// # Errors
    ///
    /// Same as [`Self::export_to_dir`]; entries are only marked on success.
    pub fn export_store(
        &self,
        store: &mut Lexicon,
        dir: Option<&Path>,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let snapshot = store.snapshot();
        let written = self.export_to_dir(&snapshot, dir)?;
        store.mark_exported(&snapshot);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use rki_core::entities::EntryDraft;
    use rki_core::enums::EntryState;

    use super::*;

    fn water() -> EntryDraft {
        EntryDraft {
            id: Some("rki_0001".into()),
            script: Some("ရေ".into()),
            romanization: Some("re".into()),
            pos: Some("noun".into()),
            gloss_en: Some("water".into()),
            ..EntryDraft::default()
        }
    }

    #[test]
    fn writes_four_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Lexicon::default();
        store.insert(&water(), false).unwrap();

        let written = Exporter::default()
            .export_store(&mut store, Some(dir.path()))
            .unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["lexicon.json", "lexicon.tsv", "lexicon.xml", "lexicon.sql"]
        );
        assert!(written.iter().all(|p| p.exists()));
        assert_eq!(store.state_of("rki_0001"), Some(EntryState::Exported));
    }

    #[test]
    fn format_failures_block_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut store = Lexicon::default();
        let mut d = water();
        d.synonyms = vec!["rain;river".into()];
        store.insert(&d, false).unwrap();

        let config = ExportConfig {
            tabular_escaping: rki_core::enums::TabularEscaping::Reject,
            ..ExportConfig::default()
        };
        let err = Exporter::new(config)
            .export_store(&mut store, Some(out.as_path()))
            .unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].format, ExportFormat::Tabular);
        assert!(!out.exists());
        assert_eq!(store.state_of("rki_0001"), Some(EntryState::Stored));
    }

    #[test]
    fn compact_json_when_not_pretty() {
        let mut store = Lexicon::default();
        store.insert(&water(), false).unwrap();
        let config = ExportConfig {
            pretty_json: false,
            ..ExportConfig::default()
        };
        let artifact = Exporter::new(config)
            .export(&store.snapshot(), ExportFormat::Json)
            .unwrap();
        assert_eq!(artifact.content.lines().count(), 1);
    }
}
