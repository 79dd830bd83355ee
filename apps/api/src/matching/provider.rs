//! Suggestion Provider — pluggable, trait-based source of generative suggestions.
//!
//! Default when no API key is configured: `DisabledSuggestionProvider`.
//! With a key: `LlmSuggestionProvider`, backed by the shared `LlmClient`.
//!
//! `AppState` holds an `Arc<dyn SuggestionProvider>`, chosen once at startup.
//! `None` from `suggest` means "unavailable": callers fall back to the rule-based list.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::llm_client::LlmClient;
use crate::matching::prompts::{SUGGESTION_PROMPT_TEMPLATE, SUGGESTION_SYSTEM};

/// Only the first N matched/missing terms are shown to the provider.
pub const PROVIDER_TERM_LIMIT: usize = 20;
/// Characters of each document included in the prompt.
pub const EXCERPT_CHARS: usize = 1000;

/// Everything a provider may look at.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionRequest<'a> {
    pub candidate_text: &'a str,
    pub requirement_text: &'a str,
    pub matched_terms: &'a [String],
    pub missing_terms: &'a [String],
}

impl<'a> SuggestionRequest<'a> {
    pub fn new(
        candidate_text: &'a str,
        requirement_text: &'a str,
        matched_terms: &'a [String],
        missing_terms: &'a [String],
    ) -> Self {
        Self {
            candidate_text,
            requirement_text,
            matched_terms: head(matched_terms, PROVIDER_TERM_LIMIT),
            missing_terms: head(missing_terms, PROVIDER_TERM_LIMIT),
        }
    }
}

fn head<T>(items: &[T], n: usize) -> &[T] {
    &items[..items.len().min(n)]
}

/// First `max_chars` characters, never splitting a UTF-8 sequence.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest<'_>) -> Option<Vec<String>>;

    /// Label for logs.
    fn name(&self) -> &'static str;
}

/// Always unavailable. Installed when the generative backend is not configured.
pub struct DisabledSuggestionProvider;

#[async_trait]
impl SuggestionProvider for DisabledSuggestionProvider {
    async fn suggest(&self, _request: &SuggestionRequest<'_>) -> Option<Vec<String>> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

pub struct LlmSuggestionProvider(pub LlmClient);

#[async_trait]
impl SuggestionProvider for LlmSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest<'_>) -> Option<Vec<String>> {
        let prompt = build_prompt(request);

        match self.0.call_json::<Vec<String>>(&prompt, SUGGESTION_SYSTEM).await {
            Ok(raw) => {
                let suggestions = clean_suggestions(raw);
                debug!("LLM returned {} suggestions", suggestions.len());
                if suggestions.is_empty() {
                    None
                } else {
                    Some(suggestions)
                }
            }
            Err(e) => {
                warn!("LLM suggestion error: {e}");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

fn build_prompt(request: &SuggestionRequest<'_>) -> String {
    let matched = request.matched_terms.join(", ");
    let missing = request.missing_terms.join(", ");
    fill_template(
        SUGGESTION_PROMPT_TEMPLATE,
        &[
            ("matched_skills", matched.as_str()),
            ("missing_skills", missing.as_str()),
            ("jd_excerpt", excerpt(request.requirement_text, EXCERPT_CHARS)),
            ("resume_excerpt", excerpt(request.candidate_text, EXCERPT_CHARS)),
        ],
    )
}

/// Replaces `{name}` placeholders in one left-to-right pass. Substituted values
/// are never rescanned, and unknown `{...}` text is copied through unchanged.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Trims entries and drops blank ones.
fn clean_suggestions(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
