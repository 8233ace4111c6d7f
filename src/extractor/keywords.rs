//! Keyword frequency ranking

use crate::page::KeywordInfo;
use std::collections::HashMap;

/// Maximum number of ranked keywords kept per page
pub const MAX_KEYWORDS: usize = 20;

/// Tokens this short or shorter are ignored
const MIN_TOKEN_LEN: usize = 3;

// Only words longer than MIN_TOKEN_LEN need listing
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "because", "been", "before", "being",
    "below", "between", "both", "cannot", "could", "does", "doing", "down", "during", "each",
    "even", "every", "from", "further", "have", "having", "here", "hers", "herself", "himself",
    "into", "itself", "just", "like", "many", "more", "most", "much", "must", "myself", "only",
    "other", "ought", "ours", "ourselves", "over", "same", "shall", "should", "some", "such",
    "than", "that", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "under", "until", "upon", "very", "want", "were", "what",
    "when", "where", "which", "while", "whom", "will", "with", "within", "without", "would",
    "your", "yours", "yourself", "yourselves",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Rank the words of `text` by frequency.
///
/// Text is lowercased and stripped of punctuation before splitting on whitespace. Density is
/// the share of *all* tokens (stop words and short words included), as a percentage. Words with
/// equal counts keep the order in which they first appear.
pub fn extract_keywords(text: &str) -> Vec<KeywordInfo> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let total = tokens.len();
    if total == 0 {
        return Vec::new();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        if token.chars().count() <= MIN_TOKEN_LEN || is_stop_word(token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|w| (w, counts[w])).collect();
    // sort_by is stable, so ties stay in first-occurrence order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_KEYWORDS);

    ranked
        .into_iter()
        .map(|(word, count)| KeywordInfo {
            word: word.to_string(),
            count,
            density: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ranks_by_count() {
        let keywords = extract_keywords("Coffee beans, coffee grinder. COFFEE! Grinder reviews.");
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["coffee", "grinder", "beans", "reviews"]);
        assert_eq!(keywords[0].count, 3);
    }

    #[test]
    fn test_density_uses_all_tokens() {
        // 10 tokens, "guide" appears twice
        let keywords = extract_keywords("the guide is a guide to all of it ok");
        let guide = keywords.iter().find(|k| k.word == "guide").unwrap();
        assert_eq!(guide.count, 2);
        assert!((guide.density - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_and_stop_words_are_dropped() {
        let keywords = extract_keywords("this that with from the and cat dogs");
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["dogs"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let keywords = extract_keywords("zebra apple mango apple zebra mango");
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_caps_at_twenty() {
        let text: String = (0..40).map(|i| format!("word{i:02} ")).collect();
        assert_eq!(extract_keywords(&text).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("  ... !!! ").is_empty());
    }

    proptest! {
        #[test]
        fn prop_keywords_ranked_and_bounded(text in "[a-zA-Z .,!]{0,400}") {
            let keywords = extract_keywords(&text);
            prop_assert!(keywords.len() <= MAX_KEYWORDS);
            for pair in keywords.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
            for k in &keywords {
                prop_assert!(k.word.chars().count() > MIN_TOKEN_LEN);
                prop_assert!(k.density > 0.0 && k.density <= 100.0);
            }
        }
    }
}
