//! Entry id prefix and format helpers.
//!
//! Entry ids look like `rki_0001`: the ISO 639-3 code, an underscore, and at
//! least four ASCII digits.

/// Prefix shared by every entry id.
pub const PREFIX_ENTRY: &str = "rki_";

/// Minimum number of digits after the prefix.
pub const MIN_ID_DIGITS: usize = 4;

/// Check whether `s` is a well-formed entry id.
#[must_use]
pub fn is_entry_id(s: &str) -> bool {
    s.strip_prefix(PREFIX_ENTRY).is_some_and(|digits| {
        digits.len() >= MIN_ID_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Format the entry id for sequence number `n`, e.g. `7` → `rki_0007`.
#[must_use]
pub fn format_entry_id(n: u32) -> String {
    format!("{PREFIX_ENTRY}{n:0width$}", width = MIN_ID_DIGITS)
}

/// Numeric part of an entry id, if it is well-formed.
#[must_use]
pub fn entry_number(id: &str) -> Option<u32> {
    if !is_entry_id(id) {
        return None;
    }
    id[PREFIX_ENTRY.len()..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rki_0001", true)]
    #[case("rki_12345", true)]
    #[case("rki_001", false)]
    #[case("rki_00a1", false)]
    #[case("RKI_0001", false)]
    #[case("0001", false)]
    #[case("", false)]
    fn entry_id_format(#[case] id: &str, #[case] expected: bool) {
        assert_eq!(is_entry_id(id), expected);
    }

    #[test]
    fn format_pads_to_four_digits() {
        assert_eq!(format_entry_id(7), "rki_0007");
        assert_eq!(format_entry_id(12345), "rki_12345");
    }

    #[test]
    fn entry_number_roundtrip() {
        assert_eq!(entry_number(&format_entry_id(42)), Some(42));
        assert_eq!(entry_number("rki_x"), None);
    }
}
