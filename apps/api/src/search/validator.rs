use thiserror::Error;

use crate::search::models::{SearchMode, SITE_MARKER};

pub const MIN_INPUT_CHARS: usize = 3;
pub const MAX_INPUT_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input is too short. Describe the candidate in at least 3 characters.")]
    TooShort,

    #[error("Input is too long. Keep the description to 5000 characters or fewer.")]
    TooLong,
}

/// Checks raw user input before anything is sent to the model.
///
/// Only length is checked: the trimmed text must have at least 3 characters and the
/// raw text at most 5000.
pub fn validate_input(text: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() < MIN_INPUT_CHARS {
        return Err(ValidationError::TooShort);
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}

/// Syntactic sanity check on a model-produced query. Not a Boolean grammar parser.
///
/// PASS requires all of:
/// - a whole-word `AND`, `OR` or `NOT`
/// - at least one of `(`, `)`, `"`
/// - `site:` present in xray mode, absent in native mode
pub fn validate_query(query: &str, mode: SearchMode) -> bool {
    let has_operator = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| matches!(word, "AND" | "OR" | "NOT"));

    let has_grouping = query.contains(['(', ')', '"']);

    let has_site = query.contains(SITE_MARKER);
    let site_ok = match mode {
        SearchMode::Xray => has_site,
        SearchMode::Native => !has_site,
    };

    has_operator && has_grouping && site_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_too_short_after_trim() {
        assert_eq!(validate_input(""), Err(ValidationError::TooShort));
        assert_eq!(validate_input("  ab   "), Err(ValidationError::TooShort));
    }

    #[test]
    fn test_input_boundaries() {
        assert!(validate_input("abc").is_ok());
        assert!(validate_input(&"a".repeat(5000)).is_ok());
        assert_eq!(
            validate_input(&"a".repeat(5001)),
            Err(ValidationError::TooLong)
        );
    }

    #[test]
    fn test_input_length_counts_characters_not_bytes() {
        // 5000 multi-byte characters stay within the limit
        assert!(validate_input(&"é".repeat(5000)).is_ok());
    }

    #[test]
    fn test_xray_query_requires_site_marker() {
        let q = r#"site:linkedin.com/in ("java developer" OR "java engineer") AND amsterdam"#;
        assert!(validate_query(q, SearchMode::Xray));
        assert!(!validate_query(q, SearchMode::Native));

        let no_site = r#"("java developer" OR "java engineer") AND amsterdam"#;
        assert!(!validate_query(no_site, SearchMode::Xray));
        assert!(validate_query(no_site, SearchMode::Native));
    }

    #[test]
    fn test_operator_must_be_whole_word() {
        // "ANDROID" and "ORACLE" contain operators only as substrings
        assert!(!validate_query(r#""ANDROID" ORACLE"#, SearchMode::Native));
        assert!(validate_query(r#""ANDROID" OR ORACLE"#, SearchMode::Native));
    }

    #[test]
    fn test_lowercase_operators_do_not_count() {
        assert!(!validate_query(r#"(java and spring)"#, SearchMode::Native));
    }

    #[test]
    fn test_query_without_grouping_is_rejected() {
        assert!(!validate_query("java AND spring", SearchMode::Native));
        assert!(validate_query(r#"java AND "spring boot""#, SearchMode::Native));
    }
}
