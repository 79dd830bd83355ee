//! Term Dictionary — the immutable catalogue of recognized terms, grouped by category.
//!
//! The vocabulary is data: `TermDictionary::builtin()` ships the curated list,
//! `TermDictionary::load()` reads a replacement from JSON. Either way each term is
//! lower-cased and classified exactly once, at construction.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::tokenizer::{is_lexeme_char, normalize};

/// Skill category. Declaration order is the extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Languages,
    Frameworks,
    Tools,
    Cloud,
    Databases,
    Data,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Languages,
        Category::Frameworks,
        Category::Tools,
        Category::Cloud,
        Category::Databases,
        Category::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Languages => "languages",
            Category::Frameworks => "frameworks",
            Category::Tools => "tools",
            Category::Cloud => "cloud",
            Category::Databases => "databases",
            Category::Data => "data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First-match-wins priority used when bucketing terms for suggestions.
/// Tools deliberately outrank frameworks here.
pub const CATEGORIZATION_ORDER: [Category; 6] = [
    Category::Languages,
    Category::Tools,
    Category::Frameworks,
    Category::Cloud,
    Category::Databases,
    Category::Data,
];

const BUILTIN_VOCABULARY: &[(Category, &[&str])] = &[
    (
        Category::Languages,
        &[
            "python", "java", "javascript", "typescript", "r", "sql", "scala", "c++", "c#", "go",
            "rust", "php", "ruby", "kotlin",
        ],
    ),
    (
        Category::Frameworks,
        &[
            "react", "angular", "vue", "svelte", "next.js", "node.js", "express", "spring",
            "django", "fastapi", "flask", "nestjs", "laravel", "rails", "asp.net",
        ],
    ),
    (
        Category::Tools,
        &[
            "git", "docker", "kubernetes", "jenkins", "tableau", "power bi", "excel", "jira",
            "confluence", "postman", "figma",
        ],
    ),
    (
        Category::Cloud,
        &["aws", "azure", "gcp", "google cloud", "ec2", "s3", "lambda", "rds", "cloudwatch"],
    ),
    (
        Category::Databases,
        &[
            "mysql", "postgres", "postgresql", "mongodb", "cassandra", "redis", "elasticsearch",
            "sqlite",
        ],
    ),
    (
        Category::Data,
        &[
            "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "spark", "hadoop",
            "airflow", "kafka",
        ],
    ),
];

static BUILTIN: LazyLock<Result<Arc<TermDictionary>, DictionaryError>> = LazyLock::new(|| {
    let entries = BUILTIN_VOCABULARY
        .iter()
        .map(|(category, terms)| (*category, terms.iter().map(|t| t.to_string()).collect()))
        .collect();
    TermDictionary::new(entries).map(Arc::new)
});

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("category '{0}' is listed more than once")]
    DuplicateCategory(Category),

    #[error("category '{0}' contains an empty term")]
    EmptyTerm(Category),

    #[error("failed to compile pattern for term '{term}': {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

/// How a term is tested against a document.
#[derive(Debug, Clone)]
pub enum TermKind {
    /// Contains a space; substring of the normalized document text.
    Phrase,
    /// Contains punctuation; must be flanked by non-alphanumerics or string edges.
    Symbolic(Regex),
    /// Exact lexeme membership.
    Plain,
}

#[derive(Debug, Clone)]
pub struct Term {
    text: String,
    kind: TermKind,
}

impl Term {
    fn new(raw: &str) -> Result<Self, regex::Error> {
        let text = normalize(raw).to_lowercase();
        let kind = if text.contains(' ') {
            TermKind::Phrase
        } else if text.chars().any(|c| !is_lexeme_char(c) || matches!(c, '.' | '+' | '#')) {
            // Anything the tokenizer would split on (e.g. '-') can never be a lexeme,
            // so it is matched with the boundary pattern as well.
            TermKind::Symbolic(boundary_pattern(&text)?)
        } else {
            TermKind::Plain
        };
        Ok(Self { text, kind })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TermKind {
        &self.kind
    }
}

fn boundary_pattern(term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:^|[^a-z0-9]){}(?:[^a-z0-9]|$)",
        regex::escape(term)
    ))
}

#[derive(Debug, Clone)]
pub struct CategoryTerms {
    pub category: Category,
    pub terms: Vec<Term>,
}

/// On-disk shape of one dictionary section.
#[derive(Debug, Deserialize)]
struct DictionarySection {
    category: Category,
    terms: Vec<String>,
}

/// Ordered mapping of category to terms. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct TermDictionary {
    sections: Vec<CategoryTerms>,
}

impl TermDictionary {
    /// Builds a dictionary from `(category, terms)` pairs, keeping their order.
    pub fn new(entries: Vec<(Category, Vec<String>)>) -> Result<Self, DictionaryError> {
        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(entries.len());

        for (category, raw_terms) in entries {
            if !seen.insert(category) {
                return Err(DictionaryError::DuplicateCategory(category));
            }

            let mut terms = Vec::with_capacity(raw_terms.len());
            for raw in &raw_terms {
                if raw.trim().is_empty() {
                    return Err(DictionaryError::EmptyTerm(category));
                }
                let term = Term::new(raw).map_err(|source| DictionaryError::Pattern {
                    term: raw.clone(),
                    source,
                })?;
                terms.push(term);
            }

            sections.push(CategoryTerms { category, terms });
        }

        Ok(Self { sections })
    }

    /// The curated vocabulary, built once per process.
    pub fn builtin() -> Result<Arc<TermDictionary>, &'static DictionaryError> {
        BUILTIN.as_ref().map(Arc::clone)
    }

    /// Parses `[{"category": "languages", "terms": ["rust", ...]}, ...]`.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let sections: Vec<DictionarySection> = serde_json::from_str(json)?;
        Self::new(
            sections
                .into_iter()
                .map(|s| (s.category, s.terms))
                .collect(),
        )
    }

    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn sections(&self) -> &[CategoryTerms] {
        &self.sections
    }

    /// Terms of one category; empty when the category is absent.
    pub fn terms_for(&self, category: Category) -> &[Term] {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.terms.as_slice())
            .unwrap_or(&[])
    }

    /// Every term in extraction order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.sections.iter().flat_map(|s| s.terms.iter())
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
