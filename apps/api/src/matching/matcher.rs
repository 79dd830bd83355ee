//! Term Matcher: decides whether a dictionary term is present in a document.

use std::collections::HashSet;

use crate::matching::dictionary::{Term, TermDictionary, TermKind};
use crate::matching::tokenizer::{normalize, tokenize};

/// A document prepared for term lookups: normalized lower-case text plus its lexeme set.
/// Built once per document, then queried for every dictionary term.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    text_lower: String,
    lexemes: HashSet<String>,
}

impl DocumentIndex {
    pub fn new(text: &str) -> Self {
        let text_lower = normalize(text).to_lowercase();
        let lexemes = tokenize(&text_lower).into_iter().collect();
        Self {
            text_lower,
            lexemes,
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        term_present(&self.text_lower, &self.lexemes, term)
    }
}

pub fn term_present(document_text_lower: &str, lexemes: &HashSet<String>, term: &Term) -> bool {
    match term.kind() {
        TermKind::Phrase => document_text_lower.contains(term.text()),
        TermKind::Symbolic(pattern) => pattern.is_match(document_text_lower),
        TermKind::Plain => lexemes.contains(term.text()),
    }
}

/// Terms found in `text`, in dictionary order, each reported once.
pub fn extract_terms(dictionary: &TermDictionary, text: &str) -> Vec<String> {
    let document = DocumentIndex::new(text);
    let mut found: Vec<String> = Vec::new();

    for term in dictionary.terms() {
        if document.contains(term) && !found.iter().any(|f| f == term.text()) {
            found.push(term.text().to_string());
        }
    }

    found
}
