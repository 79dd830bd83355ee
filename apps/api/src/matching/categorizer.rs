//! Assigns each term to exactly one category bucket.
//!
//! Priority is an explicit, ordered rule list built from `CATEGORIZATION_ORDER`.
//! The first rule whose category lists the term wins; unknown terms are dropped.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::matching::dictionary::{Category, TermDictionary, CATEGORIZATION_ORDER};

/// One `(category, predicate)` step of the priority chain.
#[derive(Debug, Clone)]
struct CategoryRule {
    category: Category,
    members: HashSet<String>,
}

impl CategoryRule {
    fn matches(&self, term_lower: &str) -> bool {
        self.members.contains(term_lower)
    }
}

#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

/// Category → terms, each bucket in first-seen input order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedTerms {
    buckets: BTreeMap<Category, Vec<String>>,
}

impl CategorizedTerms {
    pub fn get(&self, category: Category) -> &[String] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

impl Categorizer {
    pub fn new(dictionary: &TermDictionary) -> Self {
        let rules = CATEGORIZATION_ORDER
            .iter()
            .map(|&category| CategoryRule {
                category,
                members: dictionary
                    .terms_for(category)
                    .iter()
                    .map(|t| t.text().to_string())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// The category a term lands in, if any.
    pub fn category_of(&self, term: &str) -> Option<Category> {
        let term_lower = term.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&term_lower))
            .map(|rule| rule.category)
    }

    pub fn categorize<S: AsRef<str>>(&self, terms: &[S]) -> CategorizedTerms {
        let mut categorized = CategorizedTerms::default();

        for term in terms {
            let term = term.as_ref();
            let Some(category) = self.category_of(term) else {
                continue;
            };
            let bucket = categorized.buckets.entry(category).or_default();
            if !bucket.iter().any(|t| t == term) {
                bucket.push(term.to_string());
            }
        }

        categorized
    }
}
