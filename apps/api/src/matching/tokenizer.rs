//! Whitespace normalization and lexeme splitting.
//!
//! A lexeme is a lower-cased run of `[a-z0-9+#.]`, at least two characters
//! long, that is not a stopword. Trailing dots are sentence punctuation, not part
//! of the lexeme ("docker." is "docker", "node.js." is "node.js").

use std::collections::HashSet;
use std::sync::LazyLock;

const MIN_LEXEME_LEN: usize = 2;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "you",
        "your", "we", "our", "they", "their", "or", "not", "this", "these", "those", "i", "me",
        "my", "mine", "us", "them", "but", "if", "then", "than", "so", "such",
    ]
    .into_iter()
    .collect()
});

/// Collapses every whitespace run to a single space and trims both ends.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Characters that may appear inside a lexeme.
pub fn is_lexeme_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '.')
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Splits text into lexemes, in order of appearance (duplicates kept).
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .to_lowercase()
        .split(|c: char| !is_lexeme_char(c))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| token.len() >= MIN_LEXEME_LEN && !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Unique lexemes, preserving first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_runs() {
        assert_eq!(normalize("  Rust \n\n and\tGo  "), "Rust and Go");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(" a\r\n b  c ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_tokenize_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Python, Docker/Kubernetes; C++ & C#!");
        assert_eq!(tokens, vec!["python", "docker", "kubernetes", "c++", "c#"]);
    }

    #[test]
    fn test_tokenize_keeps_dots_inside_tokens() {
        let tokens = tokenize("Built with Node.js and Next.js");
        assert!(tokens.contains(&"node.js".to_string()));
        assert!(tokens.contains(&"next.js".to_string()));
    }

    #[test]
    fn test_tokenize_strips_sentence_final_dots() {
        let tokens = tokenize("Experience with Docker. Also Node.js...");
        assert_eq!(tokens, vec!["experience", "docker", "also", "node.js"]);
    }

    #[test]
    fn test_tokenize_drops_short_tokens_and_stopwords() {
        let tokens = tokenize("I am a dev with R and the Go toolchain");
        assert_eq!(tokens, vec!["am", "dev", "go", "toolchain"]);
    }

    #[test]
    fn test_tokenize_splits_hyphenated_words() {
        assert_eq!(tokenize("scikit-learn"), vec!["scikit", "learn"]);
    }

    #[test]
    fn test_tokenize_non_ascii_is_a_separator() {
        assert_eq!(tokenize("café rust"), vec!["caf", "rust"]);
    }

    #[test]
    fn test_extract_keywords_dedups_in_first_seen_order() {
        let keywords = extract_keywords("rust go rust python go");
        assert_eq!(keywords, vec!["rust", "go", "python"]);
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Senior Python engineer; AWS, Docker, and Kubernetes.";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
