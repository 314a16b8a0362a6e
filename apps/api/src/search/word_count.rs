/// Counts words the way the search engine does for its 32-word limit.
///
/// Quotes and parentheses are removed first; every remaining whitespace-separated
/// token counts, including operators and `site:` filters.
pub fn count_query_words(query: &str) -> usize {
    query
        .replace(['"', '(', ')'], "")
        .split_whitespace()
        .count()
}

pub fn is_query_too_long(query: &str, max_words: usize) -> bool {
    count_query_words(query) > max_words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_characters_are_not_words() {
        let q = r#"site:linkedin.com/in ("a" OR "b") AND c"#;
        assert_eq!(count_query_words(q), 6);
    }

    #[test]
    fn test_quoted_phrase_counts_each_word() {
        assert_eq!(count_query_words(r#""senior software engineer""#), 3);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(count_query_words(""), 0);
        assert_eq!(count_query_words(r#" ( "" ) "#), 0);
    }

    #[test]
    fn test_too_long_is_strictly_greater_than_limit() {
        let at_limit = vec!["w"; 32].join(" ");
        let over_limit = vec!["w"; 33].join(" ");
        assert!(!is_query_too_long(&at_limit, 32));
        assert!(is_query_too_long(&over_limit, 32));
    }
}
