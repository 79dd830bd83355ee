//! Compares the candidate's terms against the requirement's terms.
//!
//! score = min(100, round(100 × matched / max(required, 1)))

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::dictionary::TermDictionary;
use crate::matching::matcher::extract_terms;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32, // 0 – 100
    pub matched_terms: Vec<String>,
    pub missing_terms: Vec<String>,
}

pub fn score(dictionary: &TermDictionary, candidate_text: &str, requirement_text: &str) -> ScoreReport {
    let required_terms = extract_terms(dictionary, requirement_text);
    let candidate_terms: HashSet<String> = extract_terms(dictionary, candidate_text)
        .into_iter()
        .collect();

    let (matched_terms, missing_terms): (Vec<String>, Vec<String>) = required_terms
        .into_iter()
        .partition(|term| candidate_terms.contains(term));

    let score = match_percentage(matched_terms.len(), matched_terms.len() + missing_terms.len());

    ScoreReport {
        score,
        matched_terms,
        missing_terms,
    }
}

/// Integer round-half-up of `100 × matched / required`, capped at 100.
/// Zero required terms scores 0.
pub fn match_percentage(matched: usize, required: usize) -> u32 {
    let denominator = required.max(1) as u64;
    let rounded = (200 * matched as u64 + denominator) / (2 * denominator);
    rounded.min(100) as u32
}
