// File: src/validators.rs
// Purpose: Leaf predicates used by rule schemas

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a calendar date as posted by `<input type="date">` (YYYY-MM-DD)
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok()
}

/// Length in characters, not bytes
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn has_min_length(value: &str, min: usize) -> bool {
    char_len(value) >= min
}

pub fn has_max_length(value: &str, max: usize) -> bool {
    char_len(value) <= max
}

pub fn is_one_of<S: AsRef<str>>(value: &str, allowed: &[S]) -> bool {
    allowed.iter().any(|candidate| candidate.as_ref() == value)
}

/// Check a MIME type against an `accept`-style list (`image/*`, `application/pdf`, `.pdf`)
pub fn matches_accept<S: AsRef<str>>(file_name: &str, content_type: Option<&str>, accept: &[S]) -> bool {
    accept.iter().map(AsRef::as_ref).any(|pattern| {
        if let Some(ext) = pattern.strip_prefix('.') {
            return file_name
                .rsplit_once('.')
                .map(|(_, file_ext)| file_ext.eq_ignore_ascii_case(ext))
                .unwrap_or(false);
        }
        let Some(content_type) = content_type else {
            return false;
        };
        match pattern.strip_suffix("/*") {
            Some(major) => content_type
                .split_once('/')
                .map(|(ct_major, _)| ct_major.eq_ignore_ascii_case(major))
                .unwrap_or(false),
            None => content_type.eq_ignore_ascii_case(pattern),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("", false)]
    #[case("user@", false)]
    #[case("user@example", false)]
    #[case("no-at-sign.com", false)]
    fn test_email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected);
    }

    #[rstest]
    #[case("2024-02-29", true)]
    #[case("2023-02-29", false)]
    #[case("1990-12-01", true)]
    #[case("", false)]
    #[case("12/01/1990", false)]
    fn test_date(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_date(input), expected);
    }

    #[test]
    fn test_lengths_count_chars() {
        assert!(has_min_length("é", 1));
        assert!(has_max_length("héllo", 5));
        assert!(!has_min_length("", 1));
    }

    #[test]
    fn test_one_of() {
        assert!(is_one_of("films", &["football", "films"]));
        assert!(!is_one_of("chess", &["football", "films"]));
    }

    #[rstest]
    #[case("photo.png", Some("image/png"), &["image/*"], true)]
    #[case("cv.pdf", Some("application/pdf"), &["image/*"], false)]
    #[case("cv.PDF", None, &[".pdf"], true)]
    #[case("cv.pdf", Some("application/pdf"), &["application/pdf"], true)]
    #[case("blob", None, &["image/*"], false)]
    fn test_accept(
        #[case] name: &str,
        #[case] content_type: Option<&str>,
        #[case] accept: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(matches_accept(name, content_type, accept), expected);
    }
}
