//! Validation engine.
//!
//! The validator runs every check against a normalized draft and returns the
//! complete finding set in one pass. A typed [`Entry`] is built only when no
//! finding is Fatal.

mod lookup;

pub use lookup::{EntryLookup, WithBatch};

use std::str::FromStr;

use rki_core::entities::{Entry, EntryDraft, LexRef, Sense, Transcription};
use rki_core::enums::{ErrorKind, PartOfSpeech, RefRelation, TranscriptionKind};
use rki_core::findings::{Finding, ValidationReport};
use rki_core::ids::{MIN_ID_DIGITS, PREFIX_ENTRY, is_entry_id};
use rki_core::tables::{Orthography, is_myanmar_letter};

use crate::error::NormalizeError;
use crate::normalize::{Normalized, Normalizer};

/// Whether an id already present in the store is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    /// Plain insert: an existing id is a `DuplicateIdError`.
    RequireNew,
    /// Replace, or insert with overwrite.
    AllowExisting,
}

/// Outcome of validating one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub report: ValidationReport,
    /// Present iff `report.accepted`.
    pub entry: Option<Entry>,
}

impl Validated {
    /// Mark the draft rejected with an extra Fatal finding, dropping the entry.
    pub fn reject(&mut self, finding: Finding) {
        self.report.push(finding);
        self.entry = None;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Validator {
    tables: &'static Orthography,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Orthography::shared(),
        }
    }

    /// Validate a normalized draft.
    ///
    /// `existing` is consulted for id uniqueness, `known` for cross-reference
    /// resolution. They differ during a batch load, where references may point
    /// at other entries of the same batch.
    pub fn validate<E, K>(
        &self,
        normalized: Normalized,
        uniqueness: Uniqueness,
        existing: &E,
        known: &K,
    ) -> Validated
    where
        E: EntryLookup + ?Sized,
        K: EntryLookup + ?Sized,
    {
        let Normalized { draft, findings } = normalized;
        let mut report = ValidationReport::new(draft.label());
        report.extend(findings);

        Self::check_required(&draft, &mut report);
        Self::check_id(&draft, uniqueness, existing, &mut report);
        let pos = Self::check_pos(&draft, &mut report);
        Self::check_script(&draft, &mut report);
        self.check_romanization(&draft, &mut report);
        let ipa = self.check_ipa(&draft, &mut report);
        self.check_dialect("dialect", draft.dialect.as_deref(), &mut report);
        Self::check_references(&draft, known, &mut report);
        for (index, sense) in draft.senses.iter().enumerate() {
            self.check_sense(index, sense, &mut report);
        }

        let entry = if report.accepted {
            build_entry(draft, pos, ipa)
        } else {
            None
        };

        tracing::debug!(
            entry = %report.entry_id,
            accepted = report.accepted,
            fatal = report.fatal_count(),
            warnings = report.warning_count(),
            "validate: checked entry"
        );

        Validated { report, entry }
    }

    fn check_required(d: &EntryDraft, report: &mut ValidationReport) {
        let required = [
            ("id", d.id.is_some()),
            ("script", d.script.is_some()),
            ("romanization", d.romanization.is_some()),
            ("pos", d.pos.is_some()),
        ];
        for (field, present) in required {
            if !present {
                report.push(Finding::fatal(
                    field,
                    ErrorKind::Schema,
                    format!("missing required field '{field}'"),
                ));
            }
        }

        let has_gloss = d.gloss_en.is_some() || d.gloss_my.is_some();
        if !has_gloss && d.senses.is_empty() {
            report.push(Finding::fatal(
                "gloss",
                ErrorKind::Schema,
                "missing gloss: provide gloss_en or gloss_my, or at least one sense",
            ));
        }
    }

    fn check_id<E: EntryLookup + ?Sized>(
        d: &EntryDraft,
        uniqueness: Uniqueness,
        existing: &E,
        report: &mut ValidationReport,
    ) {
        let Some(id) = d.id.as_deref() else {
            return;
        };
        if !is_entry_id(id) {
            report.push(Finding::fatal(
                "id",
                ErrorKind::Schema,
                format!(
                    "id '{id}' must be '{PREFIX_ENTRY}' followed by at least {MIN_ID_DIGITS} digits"
                ),
            ));
            return;
        }
        if uniqueness == Uniqueness::RequireNew && existing.contains_id(id) {
            report.push(Finding::fatal(
                "id",
                ErrorKind::DuplicateId,
                format!("entry {id} already exists"),
            ));
        }
    }

    fn check_pos(d: &EntryDraft, report: &mut ValidationReport) -> Option<PartOfSpeech> {
        let pos = d.pos.as_deref()?;
        match PartOfSpeech::from_str(pos) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                let allowed = PartOfSpeech::ALL.map(PartOfSpeech::as_str).join(", ");
                report.push(Finding::fatal(
                    "pos",
                    ErrorKind::Schema,
                    format!("invalid part of speech '{pos}' (allowed: {allowed})"),
                ));
                None
            }
        }
    }

    fn check_script(d: &EntryDraft, report: &mut ValidationReport) {
        if let Some(script) = d.script.as_deref() {
            if !script.chars().any(is_myanmar_letter) {
                report.push(Finding::fatal(
                    "script",
                    ErrorKind::Charset,
                    format!("invalid Myanmar script '{script}': no Myanmar letter"),
                ));
            }
        }
    }

    fn check_romanization(&self, d: &EntryDraft, report: &mut ValidationReport) {
        let Some(romanization) = d.romanization.as_deref() else {
            return;
        };
        for c in distinct(romanization.chars().filter(|&c| !self.tables.is_romanization_char(c))) {
            report.push(Finding::fatal(
                "romanization",
                ErrorKind::Charset,
                format!(
                    "invalid romanization character '{c}' (U+{:04X})",
                    u32::from(c)
                ),
            ));
        }
    }

    fn check_ipa(&self, d: &EntryDraft, report: &mut ValidationReport) -> Option<Transcription> {
        let declared = d.ipa_type.as_deref().and_then(|declared| {
            let kind = TranscriptionKind::from_str(declared).ok();
            if kind.is_none() {
                report.push(Finding::fatal(
                    "ipa_type",
                    ErrorKind::Schema,
                    format!("invalid IPA type '{declared}' (allowed: phonemic, phonetic)"),
                ));
            }
            kind
        });

        let ipa = d.ipa.as_deref()?;
        let Ok(transcription) = Transcription::parse(ipa) else {
            let expected = match declared {
                Some(TranscriptionKind::Phonetic) => "[…]",
                _ => "/…/",
            };
            report.push(Finding::fatal(
                "ipa",
                ErrorKind::Format,
                format!(
                    "IPA '{ipa}' is missing {expected} delimiters (phonemic /…/, phonetic […])"
                ),
            ));
            return None;
        };

        let mut valid = true;
        if let Some(kind) = declared {
            if kind != transcription.kind() {
                let (open, close) = kind.delimiters();
                report.push(Finding::fatal(
                    "ipa",
                    ErrorKind::Format,
                    format!("{kind} IPA must be enclosed in {open}…{close}, got '{ipa}'"),
                ));
                valid = false;
            }
        }

        if transcription.body().trim().is_empty() {
            report.push(Finding::fatal(
                "ipa",
                ErrorKind::Format,
                format!("IPA '{ipa}' has no transcription between its delimiters"),
            ));
            valid = false;
        }

        for c in distinct(
            transcription
                .body()
                .chars()
                .filter(|&c| !self.tables.is_ipa_symbol(c)),
        ) {
            report.push(Finding::fatal(
                "ipa",
                ErrorKind::Charset,
                format!("invalid IPA character '{c}' (U+{:04X})", u32::from(c)),
            ));
            valid = false;
        }

        valid.then_some(transcription)
    }

    fn check_dialect(&self, field: &str, dialect: Option<&str>, report: &mut ValidationReport) {
        if let Some(dialect) = dialect {
            if !self.tables.is_known_dialect(dialect) {
                let known = self.tables.dialects().collect::<Vec<_>>().join(", ");
                report.push(Finding::warning(
                    field,
                    ErrorKind::Schema,
                    format!("unknown dialect '{dialect}' (known: {known})"),
                ));
            }
        }
    }

    fn check_references<K: EntryLookup + ?Sized>(
        d: &EntryDraft,
        known: &K,
        report: &mut ValidationReport,
    ) {
        for relation in RefRelation::ALL {
            let list = match relation {
                RefRelation::Synonym => &d.synonyms,
                RefRelation::Antonym => &d.antonyms,
                RefRelation::SeeAlso => &d.see_also,
            };
            for (index, reference) in list.iter().enumerate() {
                if is_entry_id(reference) && !known.contains_id(reference) {
                    report.push(Finding::warning(
                        format!("{}[{index}]", relation.field()),
                        ErrorKind::Reference,
                        format!("{relation} reference to unknown entry {reference}"),
                    ));
                }
            }
        }
    }

    fn check_sense(&self, index: usize, sense: &Sense, report: &mut ValidationReport) {
        if !sense.has_gloss() {
            report.push(Finding::fatal(
                format!("senses[{index}].gloss"),
                ErrorKind::Schema,
                format!("sense {} has no gloss_en or gloss_my", index + 1),
            ));
        }
        self.check_dialect(
            &format!("senses[{index}].dialect"),
            sense.dialect.as_deref(),
            report,
        );
    }
}

/// Normalize then validate, turning encoding failures into a rejection report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    pub normalizer: Normalizer,
    pub validator: Validator,
}

impl Pipeline {
    #[must_use]
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            validator: Validator::new(),
        }
    }

    pub fn run<E, K>(
        &self,
        draft: &EntryDraft,
        uniqueness: Uniqueness,
        existing: &E,
        known: &K,
    ) -> Validated
    where
        E: EntryLookup + ?Sized,
        K: EntryLookup + ?Sized,
    {
        match self.normalizer.normalize(draft) {
            Ok(normalized) => self
                .validator
                .validate(normalized, uniqueness, existing, known),
            Err(NormalizeError::Encoding { entry, findings }) => {
                let mut report = ValidationReport::new(entry);
                report.extend(findings);
                Validated {
                    report,
                    entry: None,
                }
            }
        }
    }
}

/// Items of `iter` in first-seen order, without repeats.
fn distinct(iter: impl Iterator<Item = char>) -> Vec<char> {
    let mut seen = Vec::new();
    for c in iter {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

fn build_entry(
    d: EntryDraft,
    pos: Option<PartOfSpeech>,
    ipa: Option<Transcription>,
) -> Option<Entry> {
    let refs = |list: Vec<String>| list.into_iter().map(LexRef::from).collect();
    Some(Entry {
        id: d.id?,
        script: d.script?,
        romanization: d.romanization?,
        ipa,
        pos: pos?,
        gloss_en: d.gloss_en,
        gloss_my: d.gloss_my,
        definition_en: d.definition_en,
        definition_my: d.definition_my,
        example: d.example,
        example_translation: d.example_translation,
        synonyms: refs(d.synonyms),
        antonyms: refs(d.antonyms),
        see_also: refs(d.see_also),
        dialect: d.dialect,
        etymology: d.etymology,
        notes: d.notes,
        source: d.source,
        senses: d.senses,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use pretty_assertions::assert_eq;
    use rki_core::enums::Severity;
    use rstest::rstest;

    use crate::test_support::{draft, road, water};

    fn run(d: &EntryDraft) -> Validated {
        Pipeline::default().run(d, Uniqueness::RequireNew, &(), &())
    }

    fn run_with(d: &EntryDraft, existing: &BTreeSet<String>) -> Validated {
        Pipeline::default().run(d, Uniqueness::RequireNew, existing, existing)
    }

    #[test]
    fn clean_entry_has_no_findings() {
        let v = run(&water());
        assert!(v.report.accepted);
        assert!(v.report.findings.is_empty());
        let entry = v.entry.unwrap();
        assert_eq!(entry.id, "rki_0001");
        assert_eq!(entry.pos, PartOfSpeech::Noun);
    }

    #[rstest]
    #[case("id")]
    #[case("script")]
    #[case("romanization")]
    #[case("pos")]
    fn missing_required_field_yields_one_schema_error(#[case] field: &str) {
        let mut d = water();
        match field {
            "id" => d.id = None,
            "script" => d.script = None,
            "romanization" => d.romanization = None,
            _ => d.pos = None,
        }
        let v = run(&d);
        assert!(!v.report.accepted);
        assert_eq!(v.report.findings_for(field, ErrorKind::Schema).count(), 1);
        assert!(v.entry.is_none());
    }

    #[test]
    fn missing_gloss_without_senses_is_fatal() {
        let mut d = water();
        d.gloss_en = None;
        let v = run(&d);
        assert_eq!(v.report.findings_for("gloss", ErrorKind::Schema).count(), 1);
        assert!(!v.report.accepted);
    }

    #[test]
    fn senses_replace_top_level_gloss() {
        let v = run(&road("rki_0010"));
        assert!(v.report.accepted, "{:?}", v.report.findings);
        assert_eq!(v.report.fatal_count(), 0);
        assert_eq!(v.entry.unwrap().senses.len(), 2);
    }

    #[test]
    fn sense_without_gloss_is_fatal() {
        let mut d = road("rki_0010");
        d.senses[1].gloss_en = None;
        let v = run(&d);
        assert_eq!(
            v.report.findings_for("senses[1].gloss", ErrorKind::Schema).count(),
            1
        );
        assert!(!v.report.accepted);
    }

    #[rstest]
    #[case("rki_1")]
    #[case("RKI_0001")]
    #[case("word")]
    fn malformed_id_is_schema_error(#[case] id: &str) {
        let mut d = water();
        d.id = Some(id.into());
        let v = run(&d);
        assert_eq!(v.report.findings_for("id", ErrorKind::Schema).count(), 1);
    }

    #[test]
    fn existing_id_depends_on_uniqueness_mode() {
        let existing: BTreeSet<String> = ["rki_0001".to_string()].into();
        let v = run_with(&water(), &existing);
        assert_eq!(v.report.findings_for("id", ErrorKind::DuplicateId).count(), 1);

        let v = Pipeline::default().run(&water(), Uniqueness::AllowExisting, &existing, &existing);
        assert!(v.report.accepted);
    }

    #[test]
    fn unknown_pos_lists_allowed_values() {
        let v = run(&draft("rki_0001", "ရေ", "re", "gerund", "water"));
        let finding = v.report.findings_for("pos", ErrorKind::Schema).next().unwrap();
        assert!(finding.message.contains("postposition"));
    }

    #[test]
    fn romanization_charset_names_each_character() {
        let v = run(&draft("rki_0001", "ရေ", "re2x!2", "noun", "water"));
        let messages: Vec<_> = v
            .report
            .findings_for("romanization", ErrorKind::Charset)
            .map(|f| f.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "invalid romanization character '2' (U+0032)",
                "invalid romanization character '!' (U+0021)",
            ]
        );
    }

    #[test]
    fn ipa_without_delimiters_is_format_error() {
        let mut d = water();
        d.ipa = Some("sʰa".into());
        let v = run(&d);
        let finding = v.report.findings_for("ipa", ErrorKind::Format).next().unwrap();
        assert!(finding.message.contains("/…/"));
        assert!(!v.report.accepted);
    }

    #[test]
    fn declared_ipa_type_must_match_delimiters() {
        let mut d = water();
        d.ipa = Some("/re/".into());
        d.ipa_type = Some("phonetic".into());
        let v = run(&d);
        assert_eq!(v.report.findings_for("ipa", ErrorKind::Format).count(), 1);

        d.ipa = Some("[re]".into());
        assert!(run(&d).report.accepted);
    }

    #[test]
    fn ipa_symbols_checked_against_inventory() {
        let mut d = water();
        d.ipa = Some("/r3/".into());
        let v = run(&d);
        assert_eq!(v.report.findings_for("ipa", ErrorKind::Charset).count(), 1);

        d.ipa = Some("/sʰaŋ ˈlăm/".into());
        let v = run(&d);
        assert!(v.report.accepted, "{:?}", v.report.findings);
        assert_eq!(
            v.entry.unwrap().ipa.unwrap().kind(),
            TranscriptionKind::Phonemic
        );
    }

    #[test]
    fn script_needs_a_myanmar_letter() {
        let v = run(&draft("rki_0001", "၁၂", "re", "noun", "twelve"));
        assert_eq!(v.report.findings_for("script", ErrorKind::Charset).count(), 1);
    }

    #[test]
    fn unknown_dialect_is_a_warning() {
        let mut d = water();
        d.dialect = Some("yangon".into());
        let v = run(&d);
        assert!(v.report.accepted);
        let finding = v.report.findings_for("dialect", ErrorKind::Schema).next().unwrap();
        assert_eq!(finding.severity, Severity::Warning);
    }

    #[test]
    fn dangling_synonym_is_a_warning() {
        let mut d = water();
        d.synonyms = vec!["rki_9999".into(), "liquid".into()];
        let v = run(&d);
        assert!(v.report.accepted);
        assert_eq!(v.report.warning_count(), 1);
        assert_eq!(
            v.report.findings_for("synonyms[0]", ErrorKind::Reference).count(),
            1
        );
        assert_eq!(
            v.entry.unwrap().synonyms,
            vec![LexRef::Id("rki_9999".into()), LexRef::Text("liquid".into())]
        );
    }

    #[test]
    fn all_problems_reported_in_one_pass() {
        let mut d = draft("bad", "abc", "Re9", "gerund", "water");
        d.ipa = Some("re".into());
        d.dialect = Some("nowhere".into());
        let v = run(&d);
        for kind in [
            ErrorKind::Schema,
            ErrorKind::Charset,
            ErrorKind::Format,
            ErrorKind::MixedScript,
        ] {
            assert!(v.report.has_kind(kind), "missing {kind}");
        }
    }

    #[test]
    fn encoding_error_becomes_rejection() {
        let mut d = water();
        d.gloss_en = Some("wa\u{FFFD}ter".into());
        let v = run(&d);
        assert!(!v.report.accepted);
        assert_eq!(v.report.findings_for("gloss_en", ErrorKind::Encoding).count(), 1);
    }
}
