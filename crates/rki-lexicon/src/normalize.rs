//! Normalization of contributor drafts.
//!
//! Every text field is brought to NFC, trimmed, and has whitespace runs
//! collapsed. Script fields additionally get Myanmar punctuation standardized,
//! English fields get list-comma spacing fixed, and `romanization`/`pos` are
//! lowercased. Empty strings become absent. Normalizing a normalized draft is
//! a no-op.
//!
//! Invalid Unicode aborts normalization with [`NormalizeError::Encoding`].
//! Foreign characters in script fields are reported as `MixedScriptError`
//! findings with the configured severity and do not abort.

use unicode_normalization::UnicodeNormalization;

use rki_config::NormalizeConfig;
use rki_core::entities::{EntryDraft, Etymology, Sense};
use rki_core::enums::{ErrorKind, ScriptStrictness, Severity};
use rki_core::findings::Finding;
use rki_core::tables::{MYANMAR_FULL_STOP, MYANMAR_SECTION, Orthography, is_myanmar};

use crate::error::NormalizeError;

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

/// A normalized draft plus any non-fatal normalization findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub draft: EntryDraft,
    pub findings: Vec<Finding>,
}

/// How a field is treated beyond the common NFC/whitespace pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldClass {
    /// Ids, tags, transcriptions, free-form references.
    Plain,
    /// The Myanmar headword: no ASCII allowed.
    Headword,
    /// Other Myanmar-script text: ASCII digits and punctuation tolerated.
    Script,
    /// English prose.
    English,
    Romanization,
    Pos,
}

/// Canonicalizes drafts. Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    strictness: ScriptStrictness,
    digraphs: bool,
    tables: &'static Orthography,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(ScriptStrictness::default(), false)
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(strictness: ScriptStrictness, digraphs: bool) -> Self {
        Self {
            strictness,
            digraphs,
            tables: Orthography::shared(),
        }
    }

    #[must_use]
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::new(config.mixed_script, config.romanization_digraphs)
    }

    /// Normalize every field of `draft`.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::Encoding` listing every field that contains a
    /// replacement character, a control character other than tab or newline,
    /// or a Unicode noncharacter.
    pub fn normalize(&self, draft: &EntryDraft) -> Result<Normalized, NormalizeError> {
        let mut pass = Pass {
            normalizer: self,
            encoding: Vec::new(),
            findings: Vec::new(),
        };
        let normalized = pass.draft(draft);

        if pass.encoding.is_empty() {
            Ok(Normalized {
                draft: normalized,
                findings: pass.findings,
            })
        } else {
            tracing::debug!(
                entry = draft.label(),
                fields = pass.encoding.len(),
                "normalize: encoding errors"
            );
            Err(NormalizeError::Encoding {
                entry: draft.label().to_string(),
                findings: pass.encoding,
            })
        }
    }

    fn romanization(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        if self.digraphs {
            self.tables.apply_digraphs(&lowered)
        } else {
            lowered
        }
    }
}

/// State for one draft: collects findings while rebuilding fields.
struct Pass<'n> {
    normalizer: &'n Normalizer,
    encoding: Vec<Finding>,
    findings: Vec<Finding>,
}

impl Pass<'_> {
    fn draft(&mut self, d: &EntryDraft) -> EntryDraft {
        use FieldClass::{English, Headword, Plain, Pos, Romanization, Script};

        EntryDraft {
            id: self.opt("id", d.id.as_deref(), Plain),
            script: self.opt("script", d.script.as_deref(), Headword),
            romanization: self.opt("romanization", d.romanization.as_deref(), Romanization),
            ipa: self.opt("ipa", d.ipa.as_deref(), Plain),
            ipa_type: self.opt("ipa_type", d.ipa_type.as_deref(), Pos),
            pos: self.opt("pos", d.pos.as_deref(), Pos),
            gloss_en: self.opt("gloss_en", d.gloss_en.as_deref(), English),
            gloss_my: self.opt("gloss_my", d.gloss_my.as_deref(), Script),
            definition_en: self.opt("definition_en", d.definition_en.as_deref(), English),
            definition_my: self.opt("definition_my", d.definition_my.as_deref(), Script),
            example: self.opt("example", d.example.as_deref(), Script),
            example_translation: self.opt(
                "example_translation",
                d.example_translation.as_deref(),
                English,
            ),
            synonyms: self.list("synonyms", &d.synonyms),
            antonyms: self.list("antonyms", &d.antonyms),
            see_also: self.list("see_also", &d.see_also),
            dialect: self.opt("dialect", d.dialect.as_deref(), Plain),
            etymology: d.etymology.as_ref().and_then(|e| self.etymology(e)),
            notes: self.opt("notes", d.notes.as_deref(), English),
            source: self.opt("source", d.source.as_deref(), English),
            senses: d
                .senses
                .iter()
                .enumerate()
                .map(|(i, s)| self.sense(i, s))
                .collect(),
        }
    }

    fn sense(&mut self, index: usize, s: &Sense) -> Sense {
        use FieldClass::{English, Plain, Script};

        let path = |field: &str| format!("senses[{index}].{field}");
        Sense {
            gloss_en: self.opt(&path("gloss_en"), s.gloss_en.as_deref(), English),
            gloss_my: self.opt(&path("gloss_my"), s.gloss_my.as_deref(), Script),
            definition_en: self.opt(&path("definition_en"), s.definition_en.as_deref(), English),
            definition_my: self.opt(&path("definition_my"), s.definition_my.as_deref(), Script),
            example: self.opt(&path("example"), s.example.as_deref(), Script),
            example_translation: self.opt(
                &path("example_translation"),
                s.example_translation.as_deref(),
                English,
            ),
            dialect: self.opt(&path("dialect"), s.dialect.as_deref(), Plain),
            domain: self.opt(&path("domain"), s.domain.as_deref(), English),
        }
    }

    fn etymology(&mut self, e: &Etymology) -> Option<Etymology> {
        let etymology = Etymology {
            source: self.opt("etymology.source", e.source.as_deref(), FieldClass::English),
            original: self.opt("etymology.original", e.original.as_deref(), FieldClass::Script),
            cognates: self.list("etymology.cognates", &e.cognates),
            notes: self.opt("etymology.notes", e.notes.as_deref(), FieldClass::English),
        };
        (!etymology.is_empty()).then_some(etymology)
    }

    fn list(&mut self, field: &str, items: &[String]) -> Vec<String> {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                self.opt(&format!("{field}[{i}]"), Some(item), FieldClass::Plain)
            })
            .collect()
    }

    fn opt(&mut self, field: &str, value: Option<&str>, class: FieldClass) -> Option<String> {
        let raw = value?;
        if let Some(reason) = encoding_problem(raw) {
            self.encoding
                .push(Finding::fatal(field, ErrorKind::Encoding, reason));
            return None;
        }

        let script = matches!(class, FieldClass::Headword | FieldClass::Script);
        // joiners go first so NFC and whitespace collapsing see the final text
        let text: String = if script {
            raw.chars().filter(|c| !matches!(*c, ZWJ | ZWNJ)).nfc().collect()
        } else {
            raw.nfc().collect()
        };
        let text = collapse_whitespace(&text);
        let text = match class {
            FieldClass::Plain => text,
            FieldClass::Headword | FieldClass::Script => script_punctuation(&text),
            FieldClass::English => english_punctuation(&text),
            FieldClass::Romanization => self.normalizer.romanization(&text),
            FieldClass::Pos => text.to_lowercase(),
        };

        if script {
            self.check_script(field, &text, class == FieldClass::Headword);
        }

        (!text.is_empty()).then_some(text)
    }

    fn check_script(&mut self, field: &str, text: &str, headword: bool) {
        let Some(severity) = self.normalizer.strictness.severity() else {
            return;
        };

        let mut foreign: Vec<char> = Vec::new();
        for c in text.chars() {
            let allowed = is_myanmar(c)
                || c.is_whitespace()
                || (!headword && (c.is_ascii_punctuation() || c.is_ascii_digit()));
            if !allowed && !foreign.contains(&c) {
                foreign.push(c);
            }
        }
        if foreign.is_empty() {
            return;
        }

        let listed = foreign
            .iter()
            .map(|c| format!("'{c}' (U+{:04X})", u32::from(*c)))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("characters outside the Myanmar script blocks: {listed}");
        self.findings.push(match severity {
            Severity::Fatal => Finding::fatal(field, ErrorKind::MixedScript, message),
            Severity::Warning => Finding::warning(field, ErrorKind::MixedScript, message),
        });
    }
}

fn is_noncharacter(c: char) -> bool {
    let cp = u32::from(c);
    (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE
}

/// Describe the first invalid character in `text`, if any.
fn encoding_problem(text: &str) -> Option<String> {
    text.chars().enumerate().find_map(|(pos, c)| {
        let what = if c == char::REPLACEMENT_CHARACTER {
            "replacement character"
        } else if c.is_control() && c != '\t' && c != '\n' {
            "control character"
        } else if is_noncharacter(c) {
            "noncharacter"
        } else {
            return None;
        };
        Some(format!(
            "{what} U+{:04X} at position {pos}",
            u32::from(c)
        ))
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Myanmar character that can end a word (not a digit or punctuation mark).
fn ends_myanmar_word(c: char) -> bool {
    is_myanmar(c) && !('\u{1040}'..='\u{104F}').contains(&c)
}

fn script_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for c in text.chars() {
        let c = match c {
            ',' if prev.is_some_and(ends_myanmar_word) => MYANMAR_SECTION,
            '.' if prev.is_some_and(ends_myanmar_word) => MYANMAR_FULL_STOP,
            other => other,
        };
        if (c == MYANMAR_SECTION || c == MYANMAR_FULL_STOP) && out.ends_with(' ') {
            out.pop();
        }
        if c == MYANMAR_SECTION && out.ends_with(MYANMAR_SECTION) {
            out.pop();
            out.push(MYANMAR_FULL_STOP);
            prev = Some(MYANMAR_FULL_STOP);
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn english_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if (c == ',' || c == ';') && out.ends_with(' ') {
            out.pop();
        }
        out.push(c);
        if c == ',' {
            match chars.peek() {
                Some(next) if !next.is_whitespace() && !next.is_ascii_digit() => out.push(' '),
                _ => {}
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::test_support::draft;

    fn normalize(d: &EntryDraft) -> Normalized {
        Normalizer::default().normalize(d).unwrap()
    }

    #[rstest]
    #[case("ရေ  ။", "ရေ။")]
    #[case("ရေ,", "ရေ၊")]
    #[case("ရေ.", "ရေ။")]
    #[case("ရေ၊၊", "ရေ။")]
    #[case("ရေ ၊ ၊", "ရေ။")]
    #[case("ရ\u{200D}ေ", "ရေ")]
    #[case("ရေ \u{200D} သောက်", "ရေ သောက်")]
    #[case("1.5", "1.5")]
    fn script_fields_standardize_punctuation(#[case] input: &str, #[case] expected: &str) {
        let mut d = draft("rki_0001", "ရေ", "re", "noun", "water");
        d.example = Some(input.to_string());
        assert_eq!(normalize(&d).draft.example.as_deref(), Some(expected));
    }

    #[rstest]
    #[case("water ,  liquid", "water, liquid")]
    #[case("water,liquid;drink", "water, liquid;drink")]
    #[case("1,000 grains", "1,000 grains")]
    #[case("  road  ", "road")]
    fn english_fields_fix_comma_spacing(#[case] input: &str, #[case] expected: &str) {
        let d = draft("rki_0001", "ရေ", "re", "noun", input);
        assert_eq!(normalize(&d).draft.gloss_en.as_deref(), Some(expected));
    }

    #[test]
    fn romanization_and_pos_lowercased() {
        let d = draft("rki_0001", "ရေ", " Nga ", " NOUN ", "fish");
        let n = normalize(&d).draft;
        assert_eq!(n.romanization.as_deref(), Some("nga"));
        assert_eq!(n.pos.as_deref(), Some("noun"));
    }

    #[test]
    fn digraphs_applied_when_enabled() {
        let d = draft("rki_0001", "ငါး", "Nga", "noun", "fish");
        let n = Normalizer::new(ScriptStrictness::Warn, true)
            .normalize(&d)
            .unwrap();
        assert_eq!(n.draft.romanization.as_deref(), Some("ṅa"));
    }

    #[test]
    fn nfc_composes_decomposed_input() {
        let d = draft("rki_0001", "ရေ", "la\u{0306}m", "noun", "road");
        assert_eq!(normalize(&d).draft.romanization.as_deref(), Some("lăm"));
    }

    #[test]
    fn empty_strings_become_absent() {
        let mut d = draft("rki_0001", "ရေ", "re", "noun", "water");
        d.notes = Some("   ".into());
        d.synonyms = vec![String::new(), " rki_0002 ".into()];
        d.etymology = Some(Etymology {
            source: Some(" ".into()),
            ..Etymology::default()
        });
        let n = normalize(&d).draft;
        assert_eq!(n.notes, None);
        assert_eq!(n.synonyms, vec!["rki_0002".to_string()]);
        assert_eq!(n.etymology, None);
    }

    #[rstest]
    #[case("ရေ သောက် ,ပါ ၊၊")]
    #[case("ရေ \u{200D} သောက်")]
    #[case("ရေ\u{200C} ။")]
    #[case("က\u{103A}\u{200D}\u{1037}")]
    fn normalization_is_idempotent(#[case] example: &str) {
        let mut d = draft("rki_0001", " ရေ ", "RE", "Noun", "water ,liquid");
        d.example = Some(example.into());
        d.senses = vec![Sense {
            gloss_en: Some("drink ,  beverage".into()),
            ..Sense::default()
        }];
        let once = normalize(&d).draft;
        let twice = normalize(&once).draft;
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case("ရေ\u{FFFD}")]
    #[case("ရေ\u{0007}")]
    #[case("ရေ\u{FDD0}")]
    #[case("ရေ\u{FFFF}")]
    fn invalid_unicode_is_an_encoding_error(#[case] script: &str) {
        let d = draft("rki_0001", script, "re", "noun", "water");
        let err = Normalizer::default().normalize(&d).unwrap_err();
        let NormalizeError::Encoding { entry, findings } = err;
        assert_eq!(entry, "rki_0001");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "script");
        assert_eq!(findings[0].kind, ErrorKind::Encoding);
    }

    #[test]
    fn tab_and_newline_are_not_encoding_errors() {
        let mut d = draft("rki_0001", "ရေ", "re", "noun", "water");
        d.definition_en = Some("line one\nline\ttwo".into());
        assert_eq!(
            normalize(&d).draft.definition_en.as_deref(),
            Some("line one line two")
        );
    }

    #[rstest]
    #[case(ScriptStrictness::Off, None)]
    #[case(ScriptStrictness::Warn, Some(Severity::Warning))]
    #[case(ScriptStrictness::Reject, Some(Severity::Fatal))]
    fn mixed_script_follows_strictness(
        #[case] strictness: ScriptStrictness,
        #[case] expected: Option<Severity>,
    ) {
        let d = draft("rki_0001", "ရေa", "re", "noun", "water");
        let n = Normalizer::new(strictness, false).normalize(&d).unwrap();
        assert_eq!(n.findings.first().map(|f| f.severity), expected);
        if let Some(f) = n.findings.first() {
            assert_eq!(f.kind, ErrorKind::MixedScript);
            assert!(f.message.contains("U+0061"));
        }
    }

    #[test]
    fn ascii_digits_allowed_outside_headword() {
        let mut d = draft("rki_0001", "ရေ", "re", "noun", "water");
        d.example = Some("ရေ 2 ခွက်!".into());
        assert!(normalize(&d).findings.is_empty());
    }
}
