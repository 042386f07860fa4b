//! Relational export: an SQL script (SQLite dialect).
//!
//! Four tables keyed by entry id. Child rows are emitted while walking their
//! parent entry, so every foreign key resolves. Synonym, antonym, and
//! see-also references share the `synonyms` table, told apart by `relation`.
//! Etymology cognates are stored as a JSON array in a text column.

use rki_core::entities::{Entry, Etymology, Sense};
use rki_core::enums::RefRelation;
use rki_lexicon::store::Snapshot;

use crate::error::{ExportError, Failures};
use crate::format::ExportFormat;

const SCHEMA: &str = "\
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    script TEXT NOT NULL,
    romanization TEXT NOT NULL,
    ipa TEXT,
    pos TEXT NOT NULL,
    gloss_en TEXT,
    gloss_my TEXT,
    definition_en TEXT,
    definition_my TEXT,
    example TEXT,
    example_translation TEXT,
    dialect TEXT,
    notes TEXT,
    source TEXT
);

CREATE TABLE IF NOT EXISTS senses (
    entry_id TEXT NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    sense_index INTEGER NOT NULL,
    gloss_en TEXT,
    gloss_my TEXT,
    definition_en TEXT,
    definition_my TEXT,
    example TEXT,
    example_translation TEXT,
    dialect TEXT,
    domain TEXT,
    PRIMARY KEY (entry_id, sense_index)
);

CREATE TABLE IF NOT EXISTS synonyms (
    entry_id TEXT NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    relation TEXT NOT NULL CHECK (relation IN ('synonym', 'antonym', 'see_also')),
    position INTEGER NOT NULL,
    target TEXT NOT NULL,
    PRIMARY KEY (entry_id, relation, position)
);

CREATE TABLE IF NOT EXISTS etymology (
    entry_id TEXT PRIMARY KEY REFERENCES entries(id) ON DELETE CASCADE,
    source TEXT,
    original TEXT,
    cognates TEXT NOT NULL DEFAULT '[]',
    notes TEXT
);

CREATE INDEX IF NOT EXISTS senses_entry_idx ON senses(entry_id);
CREATE INDEX IF NOT EXISTS synonyms_target_idx ON synonyms(target);
";

const ENTRY_COLUMNS: [&str; 14] = [
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
    "dialect",
    "notes",
    "source",
];

const SENSE_COLUMNS: [&str; 10] = [
    "entry_id",
    "sense_index",
    "gloss_en",
    "gloss_my",
    "definition_en",
    "definition_my",
    "example",
    "example_translation",
    "dialect",
    "domain",
];

/// Render the snapshot as a schema plus one transaction of inserts.
///
/// # Errors
///
/// Returns `ExportError::Format` for text containing NUL, which SQL string
/// literals cannot carry.
pub fn render(snapshot: &Snapshot) -> Result<String, ExportError> {
    let mut failures = Failures::new(ExportFormat::Relational);
    let mut out = String::from(SCHEMA);
    out.push_str("\nBEGIN TRANSACTION;\n");

    for entry in snapshot.iter() {
        let mut rows = Rows::new(&entry.id, &mut failures);
        rows.entry(entry);
        for (index, sense) in entry.senses.iter().enumerate() {
            rows.sense(index, sense);
        }
        for relation in RefRelation::ALL {
            for (position, reference) in entry.refs(relation).iter().enumerate() {
                rows.reference(relation, position, reference.as_str());
            }
        }
        if let Some(etymology) = &entry.etymology {
            rows.etymology(etymology)?;
        }
        out.push_str(&rows.sql);
    }

    out.push_str("COMMIT;\n");
    failures.finish(out)
}

/// Insert statements for one entry and its children.
struct Rows<'a> {
    entry_id: &'a str,
    failures: &'a mut Failures,
    sql: String,
}

impl<'a> Rows<'a> {
    fn new(entry_id: &'a str, failures: &'a mut Failures) -> Self {
        Self {
            entry_id,
            failures,
            sql: String::new(),
        }
    }

    fn entry(&mut self, entry: &Entry) {
        let ipa = entry.ipa.as_ref().map(ToString::to_string);
        let values = [
            ("id", Some(entry.id.as_str())),
            ("script", Some(entry.script.as_str())),
            ("romanization", Some(entry.romanization.as_str())),
            ("ipa", ipa.as_deref()),
            ("pos", Some(entry.pos.as_str())),
            ("gloss_en", entry.gloss_en.as_deref()),
            ("gloss_my", entry.gloss_my.as_deref()),
            ("definition_en", entry.definition_en.as_deref()),
            ("definition_my", entry.definition_my.as_deref()),
            ("example", entry.example.as_deref()),
            ("example_translation", entry.example_translation.as_deref()),
            ("dialect", entry.dialect.as_deref()),
            ("notes", entry.notes.as_deref()),
            ("source", entry.source.as_deref()),
        ]
        .map(|(field, value)| self.literal(field, value));
        self.insert("entries", &ENTRY_COLUMNS, &values);
    }

    fn sense(&mut self, index: usize, sense: &Sense) {
        let field = |name: &str| format!("senses[{index}].{name}");
        let mut values = vec![self.literal("id", Some(self.entry_id)), (index + 1).to_string()];
        for (name, value) in [
            ("gloss_en", sense.gloss_en.as_deref()),
            ("gloss_my", sense.gloss_my.as_deref()),
            ("definition_en", sense.definition_en.as_deref()),
            ("definition_my", sense.definition_my.as_deref()),
            ("example", sense.example.as_deref()),
            ("example_translation", sense.example_translation.as_deref()),
            ("dialect", sense.dialect.as_deref()),
            ("domain", sense.domain.as_deref()),
        ] {
            values.push(self.literal(&field(name), value));
        }
        self.insert("senses", &SENSE_COLUMNS, &values);
    }

    fn reference(&mut self, relation: RefRelation, position: usize, target: &str) {
        let values = [
            self.literal("id", Some(self.entry_id)),
            format!("'{}'", relation.as_str()),
            position.to_string(),
            self.literal(&format!("{}[{position}]", relation.field()), Some(target)),
        ];
        self.insert(
            "synonyms",
            &["entry_id", "relation", "position", "target"],
            &values,
        );
    }

    fn etymology(&mut self, etymology: &Etymology) -> Result<(), ExportError> {
        let cognates = serde_json::to_string(&etymology.cognates)?;
        let values = [
            self.literal("id", Some(self.entry_id)),
            self.literal("etymology.source", etymology.source.as_deref()),
            self.literal("etymology.original", etymology.original.as_deref()),
            self.literal("etymology.cognates", Some(cognates.as_str())),
            self.literal("etymology.notes", etymology.notes.as_deref()),
        ];
        self.insert(
            "etymology",
            &["entry_id", "source", "original", "cognates", "notes"],
            &values,
        );
        Ok(())
    }

    fn insert(&mut self, table: &str, columns: &[&str], values: &[String]) {
        self.sql.push_str(&format!(
            "INSERT INTO {table} ({}) VALUES ({});\n",
            columns.join(", "),
            values.join(", ")
        ));
    }

    /// SQL literal for `value`, or `NULL`. Records a failure for NUL.
    fn literal(&mut self, field: &str, value: Option<&str>) -> String {
        match value {
            None => "NULL".to_string(),
            Some(text) if text.contains('\0') => {
                self.failures
                    .push(self.entry_id, field, "NUL cannot appear in an SQL string literal");
                "NULL".to_string()
            }
            Some(text) => format!("'{}'", text.replace('\'', "''")),
        }
    }
}
