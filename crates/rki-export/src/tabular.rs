//! Tabular export: UTF-8, TAB-delimited, fixed header.
//!
//! One row per (entry, sense) pair; an entry without senses gets exactly one
//! row with empty sense columns. Entry-level columns repeat on every row of
//! the entry. List-valued columns join their items with the configured
//! separator.

use rki_config::{ExportConfig, check_list_separator};
use rki_core::entities::{Entry, Sense};
use rki_core::enums::{RefRelation, TabularEscaping};
use rki_lexicon::store::Snapshot;

use crate::error::{ExportError, Failures};
use crate::format::ExportFormat;

/// Column names, in order.
pub const HEADER: [&str; 30] = [
    "id",
    "script",
    "romanization",
    "ipa",
    "pos",
    "gloss_en",
    "gloss_my",
    "definition_en",
    "definition_my",
    "example",
    "example_translation",
    "synonyms",
    "antonyms",
    "see_also",
    "dialect",
    "etymology_source",
    "etymology_original",
    "etymology_cognates",
    "etymology_notes",
    "notes",
    "source",
    "sense_index",
    "sense_gloss_en",
    "sense_gloss_my",
    "sense_definition_en",
    "sense_definition_my",
    "sense_example",
    "sense_example_translation",
    "sense_dialect",
    "sense_domain",
];

/// Number of sense columns, including `sense_index`.
const SENSE_COLUMNS: usize = 9;

#[derive(Debug, Clone, Copy)]
pub struct TabularWriter {
    separator: char,
    escaping: TabularEscaping,
}

impl Default for TabularWriter {
    fn default() -> Self {
        Self {
            separator: ';',
            escaping: TabularEscaping::Backslash,
        }
    }
}

impl TabularWriter {
    /// # Errors
    ///
    /// Returns `ExportError::Config` if `separator` cannot be escaped
    /// unambiguously (see [`check_list_separator`]).
    pub fn new(separator: char, escaping: TabularEscaping) -> Result<Self, ExportError> {
        check_list_separator(separator)?;
        Ok(Self {
            separator,
            escaping,
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        Self::new(config.list_separator, config.tabular_escaping)
    }

    /// Render every entry in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Format` listing every value that cannot be
    /// written losslessly under the configured escaping rule.
    pub fn render(&self, snapshot: &Snapshot) -> Result<String, ExportError> {
        let mut failures = Failures::new(ExportFormat::Tabular);
        let mut out = HEADER.join("\t");
        out.push('\n');

        for entry in snapshot.iter() {
            let shared = self.entry_cells(entry, &mut failures);
            if entry.senses.is_empty() {
                push_row(&mut out, &shared, &vec![String::new(); SENSE_COLUMNS]);
                continue;
            }
            for (index, sense) in entry.senses.iter().enumerate() {
                let cells = self.sense_cells(&entry.id, index, sense, &mut failures);
                push_row(&mut out, &shared, &cells);
            }
        }

        failures.finish(out)
    }

    fn entry_cells(&self, entry: &Entry, failures: &mut Failures) -> Vec<String> {
        let etymology = entry.etymology.as_ref();
        let ipa = entry.ipa.as_ref().map(ToString::to_string);
        let mut row = Row::new(self, &entry.id, failures);
        row.scalar("id", Some(entry.id.as_str()));
        row.scalar("script", Some(entry.script.as_str()));
        row.scalar("romanization", Some(entry.romanization.as_str()));
        row.scalar("ipa", ipa.as_deref());
        row.scalar("pos", Some(entry.pos.as_str()));
        row.scalar("gloss_en", entry.gloss_en.as_deref());
        row.scalar("gloss_my", entry.gloss_my.as_deref());
        row.scalar("definition_en", entry.definition_en.as_deref());
        row.scalar("definition_my", entry.definition_my.as_deref());
        row.scalar("example", entry.example.as_deref());
        row.scalar("example_translation", entry.example_translation.as_deref());
        for relation in RefRelation::ALL {
            row.list(
                relation.field(),
                entry.refs(relation).iter().map(|r| r.as_str()),
            );
        }
        row.scalar("dialect", entry.dialect.as_deref());
        row.scalar(
            "etymology.source",
            etymology.and_then(|e| e.source.as_deref()),
        );
        row.scalar(
            "etymology.original",
            etymology.and_then(|e| e.original.as_deref()),
        );
        row.list(
            "etymology.cognates",
            etymology
                .into_iter()
                .flat_map(|e| e.cognates.iter().map(String::as_str)),
        );
        row.scalar("etymology.notes", etymology.and_then(|e| e.notes.as_deref()));
        row.scalar("notes", entry.notes.as_deref());
        row.scalar("source", entry.source.as_deref());
        row.cells
    }

    fn sense_cells(
        &self,
        entry_id: &str,
        index: usize,
        sense: &Sense,
        failures: &mut Failures,
    ) -> Vec<String> {
        let field = |name: &str| format!("senses[{index}].{name}");
        let mut row = Row::new(self, entry_id, failures);
        row.cells.push((index + 1).to_string());
        row.scalar(&field("gloss_en"), sense.gloss_en.as_deref());
        row.scalar(&field("gloss_my"), sense.gloss_my.as_deref());
        row.scalar(&field("definition_en"), sense.definition_en.as_deref());
        row.scalar(&field("definition_my"), sense.definition_my.as_deref());
        row.scalar(&field("example"), sense.example.as_deref());
        row.scalar(
            &field("example_translation"),
            sense.example_translation.as_deref(),
        );
        row.scalar(&field("dialect"), sense.dialect.as_deref());
        row.scalar(&field("domain"), sense.domain.as_deref());
        row.cells
    }

    /// Escape one value. `in_list` values also escape the separator.
    fn encode(&self, value: &str, in_list: bool) -> Result<String, String> {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            let is_separator = in_list && c == self.separator;
            match self.escaping {
                TabularEscaping::Backslash => match c {
                    '\\' => out.push_str("\\\\"),
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    _ if is_separator => {
                        out.push('\\');
                        out.push(c);
                    }
                    _ if c.is_control() => return Err(control_message(c)),
                    _ => out.push(c),
                },
                TabularEscaping::Reject => match c {
                    '\t' => return Err("value contains a TAB".to_string()),
                    '\n' | '\r' => return Err("value contains a line break".to_string()),
                    _ if is_separator => {
                        return Err(format!(
                            "list item contains the separator '{}'",
                            self.separator
                        ));
                    }
                    _ if c.is_control() => return Err(control_message(c)),
                    _ => out.push(c),
                },
            }
        }
        Ok(out)
    }
}

fn control_message(c: char) -> String {
    format!(
        "control character U+{:04X} cannot be represented",
        u32::from(c)
    )
}

fn push_row(out: &mut String, shared: &[String], sense: &[String]) {
    let cells: Vec<&str> = shared
        .iter()
        .chain(sense)
        .map(String::as_str)
        .collect();
    out.push_str(&cells.join("\t"));
    out.push('\n');
}

/// Cells of one row under construction.
struct Row<'a> {
    writer: &'a TabularWriter,
    entry_id: &'a str,
    failures: &'a mut Failures,
    cells: Vec<String>,
}

impl<'a> Row<'a> {
    fn new(writer: &'a TabularWriter, entry_id: &'a str, failures: &'a mut Failures) -> Self {
        Self {
            writer,
            entry_id,
            failures,
            cells: Vec::new(),
        }
    }

    fn scalar(&mut self, field: &str, value: Option<&str>) {
        let cell = match value.map(|v| self.writer.encode(v, false)) {
            None => String::new(),
            Some(Ok(cell)) => cell,
            Some(Err(message)) => {
                self.failures.push(self.entry_id, field, message);
                String::new()
            }
        };
        self.cells.push(cell);
    }

    fn list<'v>(&mut self, field: &str, items: impl Iterator<Item = &'v str>) {
        let mut encoded = Vec::new();
        for (index, item) in items.enumerate() {
            let path = format!("{field}[{index}]");
            if item.is_empty() {
                self.failures
                    .push(self.entry_id, path, "empty list item cannot be represented");
                continue;
            }
            match self.writer.encode(item, true) {
                Ok(cell) => encoded.push(cell),
                Err(message) => self.failures.push(self.entry_id, path, message),
            }
        }
        let separator = self.writer.separator.to_string();
        self.cells.push(encoded.join(separator.as_str()));
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Undo backslash escaping of a scalar cell.
#[must_use]
pub fn decode_cell(cell: &str) -> String {
    let mut parts = decode(cell, None);
    parts.pop().unwrap_or_default()
}

/// Split and unescape a backslash-escaped list cell.
#[must_use]
pub fn decode_list(cell: &str, separator: char) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    decode(cell, Some(separator))
}

fn decode(cell: &str, separator: Option<char>) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('t') => current.push('\t'),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => current.push(other),
                None => current.push('\\'),
            }
        } else if Some(c) == separator {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    items.push(current);
    items
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use rki_core::entities::EntryDraft;
    use rki_lexicon::store::Lexicon;

    use super::*;

    fn draft(id: &str, gloss: &str) -> EntryDraft {
        EntryDraft {
            id: Some(id.into()),
            script: Some("ရေ".into()),
            romanization: Some("re".into()),
            pos: Some("noun".into()),
            gloss_en: Some(gloss.into()),
            ..EntryDraft::default()
        }
    }

    fn snapshot_of(drafts: &[EntryDraft]) -> Snapshot {
        let mut store = Lexicon::default();
        for d in drafts {
            store.insert(d, false).unwrap();
        }
        store.snapshot()
    }

    fn rows(text: &str) -> Vec<Vec<&str>> {
        text.lines().skip(1).map(|l| l.split('\t').collect()).collect()
    }

    #[test]
    fn header_is_fixed() {
        let text = TabularWriter::default().render(&snapshot_of(&[])).unwrap();
        assert_eq!(text, format!("{}\n", HEADER.join("\t")));
    }

    #[test]
    fn entry_without_senses_has_one_row() {
        let text = TabularWriter::default()
            .render(&snapshot_of(&[draft("rki_0001", "water")]))
            .unwrap();
        let rows = rows(&text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), HEADER.len());
        assert_eq!(rows[0][0], "rki_0001");
        assert_eq!(rows[0][21], "");
    }

    #[test]
    fn one_row_per_sense_sharing_entry_fields() {
        let mut d = draft("rki_0001", "water");
        d.senses = vec![
            Sense {
                gloss_en: Some("water".into()),
                ..Sense::default()
            },
            Sense {
                gloss_en: Some("liquid".into()),
                domain: Some("nature".into()),
                ..Sense::default()
            },
        ];
        let text = TabularWriter::default().render(&snapshot_of(&[d])).unwrap();
        let rows = rows(&text);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r[0] == "rki_0001" && r[5] == "water"));
        assert_eq!(rows[1][21], "2");
        assert_eq!(rows[1][22], "liquid");
        assert_eq!(rows[1][29], "nature");
    }

    #[test]
    fn lists_join_with_separator_and_escape_it() {
        let mut d = draft("rki_0001", "water");
        d.see_also = vec!["rain; river".into(), "rki_0002".into()];
        let text = TabularWriter::default().render(&snapshot_of(&[d])).unwrap();
        let cell = rows(&text)[0][13];
        assert_eq!(cell, "rain\\; river;rki_0002");
        assert_eq!(decode_list(cell, ';'), vec!["rain; river", "rki_0002"]);
    }

    #[test]
    fn backslash_escaping_is_reversible() {
        let writer = TabularWriter::default();
        let cell = writer.encode("line one\nline\\two\tend", false).unwrap();
        assert_eq!(cell, "line one\\nline\\\\two\\tend");
        assert_eq!(decode_cell(&cell), "line one\nline\\two\tend");
    }

    #[test]
    fn stored_backslashes_are_escaped() {
        let mut d = draft("rki_0001", "water");
        d.notes = Some("see C:\\notes".into());
        let text = TabularWriter::default().render(&snapshot_of(&[d])).unwrap();
        let cell = rows(&text)[0][19];
        assert_eq!(cell, "see C:\\\\notes");
        assert_eq!(decode_cell(cell), "see C:\\notes");
    }

    #[rstest]
    #[case("a\tb", false)]
    #[case("a\nb", false)]
    #[case("a;b", true)]
    fn reject_mode_refuses_values_needing_escapes(#[case] value: &str, #[case] in_list: bool) {
        let writer = TabularWriter::new(';', TabularEscaping::Reject).unwrap();
        assert!(writer.encode(value, in_list).is_err());
    }

    #[test]
    fn reject_mode_reports_entry_and_field() {
        let mut d = draft("rki_0001", "water");
        d.synonyms = vec!["a;b".into()];
        let writer = TabularWriter::new(';', TabularEscaping::Reject).unwrap();
        let err = writer.render(&snapshot_of(&[d])).unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].entry_id, "rki_0001");
        assert_eq!(failures[0].field, "synonyms[0]");
    }

    #[test]
    fn other_control_characters_fail_in_both_modes() {
        for escaping in [TabularEscaping::Backslash, TabularEscaping::Reject] {
            let writer = TabularWriter::new(';', escaping).unwrap();
            assert!(writer.encode("bell\u{7}", false).is_err());
        }
    }

    #[rstest]
    #[case('n')]
    #[case('t')]
    #[case('\\')]
    fn separator_naming_an_escape_is_refused(#[case] separator: char) {
        let err = TabularWriter::new(separator, TabularEscaping::Backslash).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }

    #[test]
    fn custom_separator_round_trips_through_decode() {
        let mut d = draft("rki_0001", "water");
        d.synonyms = vec!["a|b".into(), "c".into()];
        let writer = TabularWriter::new('|', TabularEscaping::Backslash).unwrap();
        let text = writer.render(&snapshot_of(&[d])).unwrap();
        let cell = text.lines().nth(1).unwrap().split('\t').nth(11).unwrap();
        assert_eq!(decode_list(cell, '|'), vec!["a|b".to_string(), "c".to_string()]);
    }

    #[test]
    fn semicolons_in_scalars_are_left_alone() {
        let writer = TabularWriter::default();
        assert_eq!(writer.encode("a;b", false).unwrap(), "a;b");
    }
}
