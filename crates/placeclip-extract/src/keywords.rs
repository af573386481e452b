//! Frequency-based fallback takeaways.
//!
//! A backup signal for when the generator returns no takeaways. It only
//! counts words; it does not understand them.

use std::collections::HashMap;

/// Number of keywords returned when the caller has no preference.
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// Tokens this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 4;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "your", "you", "are", "was", "were",
    "but", "have", "has", "had", "not", "just", "they", "their", "them", "then", "out", "all",
    "about", "into", "when", "what", "where", "which", "will", "would", "could", "should", "here",
    "there", "over", "under", "after", "before", "been", "much", "more", "very", "than", "also",
    "onto", "off", "our", "one", "two", "three", "four", "these", "those", "some", "such", "only",
    "really",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Up to `k` lowercase keywords from `text`, most frequent first.
///
/// Every non-alphanumeric character separates tokens. Ties keep the order
/// in which tokens first appeared.
pub fn fallback_takeaways(text: &str, k: usize) -> Vec<String> {
    let lowered = text.to_lowercase();

    // token -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let tokens = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(t));

    for (position, token) in tokens.enumerate() {
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(k)
        .map(|(token, _, _)| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_first() {
        let keywords = fallback_takeaways("The great wall and the great view, the great food", 5);
        assert_eq!(keywords, vec!["great", "wall", "view", "food"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let keywords = fallback_takeaways("sunset views; ramen, sunset! ramen? views", 3);
        assert_eq!(keywords, vec!["sunset", "views", "ramen"]);
    }

    #[test]
    fn test_short_tokens_and_stopwords_excluded() {
        assert!(fallback_takeaways("the and but was off one two", 5).is_empty());
        assert!(fallback_takeaways("", 5).is_empty());
        assert_eq!(fallback_takeaways("cat dogs", 5), vec!["dogs"]);
    }

    #[test]
    fn test_punctuation_separates_tokens() {
        let keywords = fallback_takeaways("must-order:tonkotsu/ramen", 5);
        assert_eq!(keywords, vec!["must", "order", "tonkotsu", "ramen"]);
    }

    #[test]
    fn test_respects_k() {
        let text = "alpha alpha alpha bravo bravo charlie delta";
        assert_eq!(fallback_takeaways(text, 2), vec!["alpha", "bravo"]);
        assert!(fallback_takeaways(text, 0).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "Tacos tacos salsa margaritas salsa patio tacos patio";
        let first = fallback_takeaways(text, DEFAULT_KEYWORD_COUNT);
        for _ in 0..10 {
            assert_eq!(fallback_takeaways(text, DEFAULT_KEYWORD_COUNT), first);
        }
        assert_eq!(first, vec!["tacos", "salsa", "patio", "margaritas"]);
    }
}
