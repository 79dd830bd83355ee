//! Analysis Pipeline — normalize, score, categorize the gaps, build suggestions.
//!
//! `Analyzer::analyze` is pure and synchronous. `analyze_with_provider` adds the
//! optional generative provider on top, bounded by a timeout, and falls back to
//! the rule-based suggestions whenever the provider is unavailable.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::matching::categorizer::Categorizer;
use crate::matching::dictionary::TermDictionary;
use crate::matching::provider::{SuggestionProvider, SuggestionRequest};
use crate::matching::scorer::score;
use crate::matching::suggestions::build_suggestions;
use crate::matching::tokenizer::normalize;

/// Result of matching a candidate document against a requirement document.
///
/// `matched_terms` and `missing_terms` partition the requirement's extracted terms,
/// both in dictionary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub matched_terms: Vec<String>,
    pub missing_terms: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Where the final suggestion list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Rules,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedAnalysis {
    pub result: AnalysisResult,
    pub source: SuggestionSource,
}

/// Owns a dictionary and the categorizer derived from it. Shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Analyzer {
    dictionary: Arc<TermDictionary>,
    categorizer: Categorizer,
}

impl Analyzer {
    pub fn new(dictionary: Arc<TermDictionary>) -> Self {
        let categorizer = Categorizer::new(&dictionary);
        Self {
            dictionary,
            categorizer,
        }
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    pub fn analyze(&self, candidate_text: &str, requirement_text: &str) -> AnalysisResult {
        let candidate = normalize(candidate_text);
        let requirement = normalize(requirement_text);

        let report = score(&self.dictionary, &candidate, &requirement);
        let suggestions = build_suggestions(&self.categorizer, &report.missing_terms, &requirement);

        debug!(
            "Analysis: score={}, matched={}, missing={}",
            report.score,
            report.matched_terms.len(),
            report.missing_terms.len()
        );

        AnalysisResult {
            score: report.score,
            matched_terms: report.matched_terms,
            missing_terms: report.missing_terms,
            suggestions,
        }
    }
}

/// Runs the engine, then lets `provider` replace the suggestions.
///
/// Provider output, when present, fully replaces the rule-based list. On `None`,
/// or when `timeout` elapses first, the rule-based list is kept.
pub async fn analyze_with_provider(
    analyzer: &Analyzer,
    provider: &dyn SuggestionProvider,
    timeout: Duration,
    candidate_text: &str,
    requirement_text: &str,
) -> ProvidedAnalysis {
    let candidate = normalize(candidate_text);
    let requirement = normalize(requirement_text);
    let mut result = analyzer.analyze(&candidate, &requirement);

    let request = SuggestionRequest::new(
        &candidate,
        &requirement,
        &result.matched_terms,
        &result.missing_terms,
    );

    let provided = match tokio::time::timeout(timeout, provider.suggest(&request)).await {
        Ok(provided) => provided,
        Err(_) => {
            warn!(
                "Suggestion provider '{}' timed out after {}ms; using rule-based suggestions",
                provider.name(),
                timeout.as_millis()
            );
            None
        }
    };

    match provided {
        Some(suggestions) if !suggestions.is_empty() => {
            info!(
                "Using {} suggestions from provider '{}'",
                suggestions.len(),
                provider.name()
            );
            result.suggestions = suggestions;
            ProvidedAnalysis {
                result,
                source: SuggestionSource::Provider,
            }
        }
        _ => ProvidedAnalysis {
            result,
            source: SuggestionSource::Rules,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::matching::dictionary::Category;
    use crate::matching::matcher::extract_terms;
    use crate::matching::provider::DisabledSuggestionProvider;
    use crate::matching::suggestions::{FULL_MATCH_SUGGESTION, TERMINOLOGY_SUGGESTION};

    const JD: &str = "Looking for Python and AWS experience with Docker.";
    const RESUME: &str = "Experienced Python developer using Docker daily.";

    fn builtin_analyzer() -> Analyzer {
        Analyzer::new(TermDictionary::builtin().unwrap())
    }

    struct FixedProvider(Option<Vec<String>>);

    #[async_trait]
    impl SuggestionProvider for FixedProvider {
        async fn suggest(&self, _request: &SuggestionRequest<'_>) -> Option<Vec<String>> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    /// Records what it was asked, then answers.
    struct RecordingProvider {
        seen: Mutex<Vec<(usize, usize)>>,
    }

    #[async_trait]
    impl SuggestionProvider for RecordingProvider {
        async fn suggest(&self, request: &SuggestionRequest<'_>) -> Option<Vec<String>> {
            self.seen
                .lock()
                .unwrap()
                .push((request.matched_terms.len(), request.missing_terms.len()));
            Some(vec!["from provider".to_string()])
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl SuggestionProvider for SlowProvider {
        async fn suggest(&self, _request: &SuggestionRequest<'_>) -> Option<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Some(vec!["too late".to_string()])
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[test]
    fn test_example_scenario() {
        let result = builtin_analyzer().analyze(RESUME, JD);
        assert_eq!(result.score, 67);
        assert_eq!(result.matched_terms, vec!["python", "docker"]);
        assert_eq!(result.missing_terms, vec!["aws"]);
        assert!(result.suggestions.iter().any(|s| s.contains("cloud platform") && s.contains("aws")));
        assert_eq!(result.suggestions.last().map(String::as_str), Some(TERMINOLOGY_SUGGESTION));
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let analyzer = builtin_analyzer();
        let a = analyzer.analyze(RESUME, JD);
        let b = analyzer.analyze(RESUME, JD);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_requirement_boundary() {
        let result = builtin_analyzer().analyze("anything", "");
        assert_eq!(result.score, 0);
        assert!(result.matched_terms.is_empty());
        assert!(result.missing_terms.is_empty());
    }

    #[test]
    fn test_full_match_boundary() {
        let result = builtin_analyzer().analyze(
            "Python, AWS, Docker and Kubernetes in production",
            "Python and AWS with Docker",
        );
        assert_eq!(result.score, 100);
        assert!(result.missing_terms.is_empty());
        assert_eq!(result.suggestions, vec![FULL_MATCH_SUGGESTION.to_string()]);
    }

    #[test]
    fn test_empty_candidate_misses_all_requirement_terms() {
        let analyzer = builtin_analyzer();
        let result = analyzer.analyze("", JD);
        assert!(result.matched_terms.is_empty());
        assert_eq!(result.missing_terms, extract_terms(analyzer.dictionary(), JD));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_suggestion_order_for_languages_tools_cloud() {
        let result = builtin_analyzer().analyze("", "Rust, Jenkins and Azure");
        assert!(result.suggestions[0].contains("rust"));
        assert!(result.suggestions[1].contains("jenkins"));
        assert!(result.suggestions[2].contains("azure"));
        assert_eq!(result.suggestions.last().map(String::as_str), Some(TERMINOLOGY_SUGGESTION));
    }

    #[test]
    fn test_invariants_hold_over_varied_inputs() {
        let analyzer = builtin_analyzer();
        let documents = [
            "",
            "   ",
            "ongoing going gone",
            "xc++y and objc#",
            "C++, C#, Go, Rust, Node.js, ASP.NET, Power BI, Google Cloud",
            "pandas numpy scikit-learn tensorflow pytorch spark hadoop airflow kafka",
            "Statistical analysis with Tableau and Excel on GCP with BigQuery",
            "Kubernetes\n\n\tdocker   git jira confluence postman figma",
        ];

        for candidate in documents {
            for requirement in documents {
                let result = analyzer.analyze(candidate, requirement);
                assert!(result.score <= 100);

                let required: HashSet<String> =
                    extract_terms(analyzer.dictionary(), requirement).into_iter().collect();
                let matched: HashSet<String> = result.matched_terms.iter().cloned().collect();
                let missing: HashSet<String> = result.missing_terms.iter().cloned().collect();
                assert!(matched.is_disjoint(&missing));
                assert_eq!(&matched | &missing, required);
            }
        }
    }

    #[test]
    fn test_word_boundaries_in_pipeline() {
        let analyzer = builtin_analyzer();

        let result = analyzer.analyze("An ongoing effort", "Go developer");
        assert_eq!(result.missing_terms, vec!["go"]);

        let result = analyzer.analyze("Modern c++ codebase", "C++ engineer");
        assert_eq!(result.matched_terms, vec!["c++"]);

        let result = analyzer.analyze("xc++y", "C++ engineer");
        assert_eq!(result.missing_terms, vec!["c++"]);
    }

    #[test]
    fn test_substituted_dictionary() {
        let dictionary = TermDictionary::new(vec![(
            Category::Databases,
            vec!["snowflake".to_string(), "bigquery".to_string()],
        )])
        .unwrap();
        let analyzer = Analyzer::new(Arc::new(dictionary));
        let result = analyzer.analyze("Snowflake warehouse", "Snowflake or BigQuery, plus Python");
        assert_eq!(result.matched_terms, vec!["snowflake"]);
        assert_eq!(result.missing_terms, vec!["bigquery"]);
        assert_eq!(result.score, 50);
        assert!(result.suggestions[0].contains("bigquery"));
    }

    #[tokio::test]
    async fn test_provider_output_replaces_rule_suggestions() {
        let analyzer = builtin_analyzer();
        let provider = FixedProvider(Some(vec!["1. Add AWS".to_string(), "2. Quantify".to_string()]));
        let provided =
            analyze_with_provider(&analyzer, &provider, Duration::from_secs(5), RESUME, JD).await;

        assert_eq!(provided.source, SuggestionSource::Provider);
        assert_eq!(provided.result.suggestions, vec!["1. Add AWS", "2. Quantify"]);
        assert_eq!(provided.result.score, 67);
    }

    #[tokio::test]
    async fn test_unavailable_provider_falls_back_to_rules() {
        let analyzer = builtin_analyzer();
        let provided = analyze_with_provider(
            &analyzer,
            &DisabledSuggestionProvider,
            Duration::from_secs(5),
            RESUME,
            JD,
        )
        .await;

        assert_eq!(provided.source, SuggestionSource::Rules);
        assert_eq!(provided.result, analyzer.analyze(RESUME, JD));
    }

    #[tokio::test]
    async fn test_empty_provider_output_falls_back_to_rules() {
        let analyzer = builtin_analyzer();
        let provided = analyze_with_provider(
            &analyzer,
            &FixedProvider(Some(vec![])),
            Duration::from_secs(5),
            RESUME,
            JD,
        )
        .await;
        assert_eq!(provided.source, SuggestionSource::Rules);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out_to_rules() {
        let analyzer = builtin_analyzer();
        let provided = analyze_with_provider(
            &analyzer,
            &SlowProvider,
            Duration::from_secs(20),
            RESUME,
            JD,
        )
        .await;

        assert_eq!(provided.source, SuggestionSource::Rules);
        assert_eq!(provided.result.suggestions, analyzer.analyze(RESUME, JD).suggestions);
    }

    #[tokio::test]
    async fn test_provider_receives_capped_term_lists() {
        let analyzer = builtin_analyzer();
        let provider = RecordingProvider {
            seen: Mutex::new(Vec::new()),
        };
        let everything: Vec<&str> = analyzer.dictionary().terms().map(|t| t.text()).collect();
        let requirement = everything.join(", ");

        analyze_with_provider(&analyzer, &provider, Duration::from_secs(5), "", &requirement)
            .await;

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(0usize, 20usize)]);
    }
}
