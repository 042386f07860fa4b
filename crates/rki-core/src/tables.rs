//! Static orthography and charset tables.
//!
//! Built once on first use and shared read-only by every normalizer and
//! validator, including the parallel validation workers.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Myanmar little section mark (phrase delimiter).
pub const MYANMAR_SECTION: char = '\u{104A}';
/// Myanmar section mark (sentence delimiter).
pub const MYANMAR_FULL_STOP: char = '\u{104B}';

/// Unicode blocks accepted as Myanmar script.
pub const MYANMAR_BLOCKS: [(char, char); 3] = [
    ('\u{1000}', '\u{109F}'),
    ('\u{AA60}', '\u{AA7F}'),
    ('\u{A9E0}', '\u{A9FF}'),
];

/// Precomposed Latin letters allowed in romanization (ISO 15919 plus tone marks).
const ROMANIZATION_EXTRA: &str = "āīūēōṅñṭḍṇḷṃṁḥśṣṛṝḹăĕĭŏŭàáâèéêìíîòóôùúûǎěǐǒǔäëïöü";

/// Separators allowed in romanization.
const ROMANIZATION_SEPARATORS: &str = " -'.\u{02BB}";

const IPA_LETTERS: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ɑæɐβɓʙçɕɖðɗəɘɛɜɝɞɟʄɡɠɢɣɤɥɦɧħɨɪʝɭɬɫɮʟɱɯɰɲŋɳɴøɵɸθœɶʘɺɻɽɾʀʁɹʃʂʈʊʋⱱʌʍʏʑʐʒʔʡʕʢǀǁǂǃɚʧʤʦʣ",
    "ăĕĭŏŭàèìòùáéíóúâêîôûǎěǐǒǔäëïöüãẽĩõũȧėȯḁḙḭṵ",
);

const IPA_SUPRASEGMENTALS: &str = "ˈˌːˑʼʴʰʱʲʷˠˤ˞↓↑→↗↘˥˦˧˨˩";

/// Separators tolerated inside a transcription.
const IPA_SEPARATORS: &str = " .;,-";

/// Combining diacritical marks block.
const COMBINING: (char, char) = ('\u{0300}', '\u{036F}');

/// Known Rakhine dialects, in canonical key form (see [`dialect_key`]).
const DIALECTS: [&str; 8] = [
    "sittwe",
    "kyaukphyu",
    "ramree",
    "thandwe",
    "mrauk-u",
    "manaung",
    "marma",
    "standard",
];

/// Romanization digraphs folded to single ISO 15919 letters.
const DIGRAPHS: [(&str, &str); 3] = [("ng", "ṅ"), ("ny", "ñ"), ("sh", "ś")];

/// Whether `c` lies in one of the Myanmar script blocks.
#[must_use]
pub fn is_myanmar(c: char) -> bool {
    MYANMAR_BLOCKS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Whether `c` is a Myanmar letter or vowel sign (not a digit or punctuation).
#[must_use]
pub fn is_myanmar_letter(c: char) -> bool {
    is_myanmar(c) && c.is_alphabetic()
}

/// Canonical comparison key for a dialect tag: lowercase, `_`/space → `-`.
#[must_use]
pub fn dialect_key(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Immutable lookup tables for romanization, IPA, and dialects.
#[derive(Debug)]
pub struct Orthography {
    romanization: HashSet<char>,
    ipa: HashSet<char>,
    dialects: BTreeSet<&'static str>,
}

static SHARED: LazyLock<Orthography> = LazyLock::new(Orthography::build);

impl Orthography {
    /// The process-wide tables.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    fn build() -> Self {
        let romanization = ('a'..='z')
            .chain(ROMANIZATION_EXTRA.chars())
            .chain(ROMANIZATION_SEPARATORS.chars())
            .collect();
        let ipa = IPA_LETTERS
            .chars()
            .chain(IPA_SUPRASEGMENTALS.chars())
            .chain(IPA_SEPARATORS.chars())
            .collect();
        Self {
            romanization,
            ipa,
            dialects: DIALECTS.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_romanization_char(&self, c: char) -> bool {
        self.romanization.contains(&c)
    }

    #[must_use]
    pub fn is_ipa_symbol(&self, c: char) -> bool {
        self.ipa.contains(&c) || (COMBINING.0..=COMBINING.1).contains(&c)
    }

    #[must_use]
    pub fn is_known_dialect(&self, tag: &str) -> bool {
        self.dialects.contains(dialect_key(tag).as_str())
    }

    pub fn dialects(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dialects.iter().copied()
    }

    /// Fold romanization digraphs (`ng` → `ṅ`, `ny` → `ñ`, `sh` → `ś`).
    #[must_use]
    pub fn apply_digraphs(&self, romanization: &str) -> String {
        DIGRAPHS
            .iter()
            .fold(romanization.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('က', true)]
    #[case('ရ', true)]
    #[case('၊', true)]
    #[case('a', false)]
    #[case('ก', false)]
    fn myanmar_block_membership(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_myanmar(c), expected);
    }

    #[test]
    fn myanmar_digits_are_not_letters() {
        assert!(is_myanmar_letter('ရ'));
        assert!(!is_myanmar_letter('၁'));
        assert!(!is_myanmar_letter(MYANMAR_FULL_STOP));
    }

    #[test]
    fn romanization_charset() {
        let t = Orthography::shared();
        for c in "lam ṅa-śwe".chars() {
            assert!(t.is_romanization_char(c), "{c} should be allowed");
        }
        assert!(!t.is_romanization_char('L'));
        assert!(!t.is_romanization_char('3'));
        assert!(!t.is_romanization_char('ရ'));
    }

    #[test]
    fn ipa_inventory_accepts_aspiration_and_combining_marks() {
        let t = Orthography::shared();
        for c in "sʰaŋ ˈlăm".chars() {
            assert!(t.is_ipa_symbol(c), "{c} should be allowed");
        }
        assert!(t.is_ipa_symbol('\u{0325}'));
        assert!(!t.is_ipa_symbol('/'));
        assert!(!t.is_ipa_symbol('7'));
    }

    #[rstest]
    #[case("Sittwe", true)]
    #[case("MRAUK_U", true)]
    #[case("mrauk u", true)]
    #[case("yangon", false)]
    fn dialect_lookup(#[case] tag: &str, #[case] known: bool) {
        assert_eq!(Orthography::shared().is_known_dialect(tag), known);
    }

    #[rstest]
    #[case("nga", "ṅa")]
    #[case("nya", "ña")]
    #[case("shwe", "śwe")]
    #[case("lam", "lam")]
    fn digraphs_fold(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Orthography::shared().apply_digraphs(input), expected);
    }
}
