//! Egyptian mobile number extraction.
//!
//! A valid number is exactly 11 digits starting with 010, 011, 012 or
//! 015. Matching anchors on whole digit runs: a 12-digit sequence that
//! happens to contain a valid 11-digit substring yields nothing.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

/// Valid Egyptian mobile prefixes.
pub const MOBILE_PREFIXES: [&str; 4] = ["010", "011", "012", "015"];

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").expect("digit run pattern is valid");
}

/// Extract every valid mobile number from free text.
///
/// Spaces and hyphens are stripped before matching, so "010 1234-5678"
/// is found. Each number appears once, in first-appearance order, and
/// extraction is idempotent.
pub fn extract_phones(text: &str) -> Vec<String> {
    let stripped: String = text.chars().filter(|c| !matches!(c, ' ' | '-')).collect();

    let mut found: IndexSet<String> = IndexSet::new();
    for run in DIGIT_RUN.find_iter(&stripped) {
        let digits = run.as_str();
        if is_normalized_phone(digits) {
            found.insert(digits.to_string());
        }
    }
    found.into_iter().collect()
}

/// Whether `raw` contains a valid mobile number once every non-digit is
/// removed. Used by request validation.
pub fn is_valid_phone(raw: &str) -> bool {
    normalize_phone(raw).is_some()
}

/// Normalize `raw` to the canonical 11-digit storage form, or `None`
/// when it is not a valid mobile number.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if is_normalized_phone(&digits) {
        Some(digits)
    } else {
        None
    }
}

fn is_normalized_phone(digits: &str) -> bool {
    digits.len() == 11 && MOBILE_PREFIXES.iter().any(|p| digits.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_plain_number() {
        let phones = extract_phones("مطلوب شقة في التجمع الخامس 01012345678");
        assert_eq!(phones, vec!["01012345678"]);
    }

    #[test]
    fn strips_spaces_and_hyphens() {
        let phones = extract_phones("call 010 1234-5678 now");
        assert_eq!(phones, vec!["01012345678"]);
    }

    #[test]
    fn deduplicates_repeated_numbers() {
        let phones = extract_phones("01012345678 او 010-1234-5678");
        assert_eq!(phones, vec!["01012345678"]);
    }

    #[test]
    fn preserves_first_appearance_order() {
        let phones = extract_phones("أولا 01500000001 ثم 01000000002");
        assert_eq!(phones, vec!["01500000001", "01000000002"]);
    }

    #[test]
    fn rejects_ten_digit_numbers() {
        assert!(extract_phones("رقمي 0101234567").is_empty());
    }

    #[test]
    fn rejects_numbers_embedded_in_longer_runs() {
        // 12 digits containing a valid 11-digit suffix
        assert!(extract_phones("901012345678").is_empty());
        // and with the country code folded in
        assert!(extract_phones("+201012345678").is_empty());
    }

    #[test]
    fn rejects_landline_prefixes() {
        assert!(extract_phones("02123456789").is_empty());
        assert!(extract_phones("01312345678").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "01012345678 و 01198765432 و 0109999";
        assert_eq!(extract_phones(text), extract_phones(text));
    }

    #[test]
    fn every_result_is_normalized() {
        let phones = extract_phones("x 011-2223-3444 y 01012345678 z 12345");
        for phone in &phones {
            assert_eq!(phone.len(), 11);
            assert!(MOBILE_PREFIXES.iter().any(|p| phone.starts_with(p)));
        }
    }

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(
            normalize_phone("(010) 1234 5678").as_deref(),
            Some("01012345678")
        );
        assert_eq!(normalize_phone("123"), None);
    }
}
