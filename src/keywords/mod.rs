//! Frequency-ranked keyword extraction for the word cloud.

use std::collections::HashMap;

/// Tokens shorter than this are never keywords
const MIN_KEYWORD_CHARS: usize = 3;

/// Function words that would otherwise dominate every cloud
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "his", "how", "its", "may", "who", "did", "yet", "she", "him",
    "they", "them", "their", "there", "then", "than", "that", "this", "these", "those", "with",
    "from", "into", "onto", "over", "were", "been", "being", "have", "what", "when", "where",
    "which", "while", "will", "would", "should", "could", "about", "also", "some", "such", "very",
    "just", "only", "your", "more", "most", "other",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Extract the `max` most frequent words of `text`.
///
/// Characters that are not alphanumeric, `_` or whitespace are removed before
/// splitting, so `fox.` and `fox` count as the same token. Tokens of two
/// characters or fewer and common English function words are skipped. Ties
/// keep the order in which the words first appeared.
///
/// # Examples
///
/// ```
/// use briefly::keywords::extract_top_keywords;
///
/// let top = extract_top_keywords("The quick brown fox jumps. The fox runs.", 3);
/// assert_eq!(top[0].word, "fox");
/// assert_eq!(top[0].count, 2);
/// ```
pub fn extract_top_keywords(text: &str, max: usize) -> Vec<Keyword> {
    if text.is_empty() || max == 0 {
        return Vec::new();
    }

    let cleaned: String =
        text.chars().filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace()).collect();

    // Insertion-ordered counts: `order` remembers first appearance
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in cleaned.split_whitespace() {
        let word = token.to_lowercase();
        if word.chars().count() < MIN_KEYWORD_CHARS || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<Keyword> =
        order.into_iter().map(|word| Keyword { count: counts[&word], word }).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(max);
    ranked
}
