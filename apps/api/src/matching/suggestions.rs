//! Suggestion Builder — rule-based recommendations from the missing terms.
//!
//! Rules run in a fixed order and each appends at most one suggestion:
//! one per non-empty category bucket, then the analytics rule, then the
//! terminology reminder which is always last.

use crate::matching::categorizer::Categorizer;
use crate::matching::dictionary::Category;

pub const FULL_MATCH_SUGGESTION: &str = "Excellent match! Your resume aligns well with the job description. Focus on quantifying achievements and impact.";

pub const ANALYTICS_SUGGESTION: &str = "Highlight statistical analysis, A/B testing, or data-driven decision-making experience from past projects.";

pub const TERMINOLOGY_SUGGESTION: &str = "Review the job description carefully and adjust your resume to use the same language and terminology for better keyword matching.";

const VISUALIZATION_KEYWORDS: &[&str] = &["tableau", "power bi"];
const ANALYTICS_KEYWORDS: &[&str] = &["statistical", "analysis", "analytics"];

/// One category-driven rule: how many terms to name, how to join them, how to phrase it.
struct CategoryRule {
    category: Category,
    limit: usize,
    separator: &'static str,
    render: fn(&str, &str) -> String,
}

const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Languages,
        limit: 3,
        separator: ", ",
        render: render_languages,
    },
    CategoryRule {
        category: Category::Frameworks,
        limit: 3,
        separator: ", ",
        render: render_frameworks,
    },
    CategoryRule {
        category: Category::Tools,
        limit: 3,
        separator: ", ",
        render: render_tools,
    },
    CategoryRule {
        category: Category::Cloud,
        limit: 2,
        separator: " and ",
        render: render_cloud,
    },
    CategoryRule {
        category: Category::Databases,
        limit: 2,
        separator: " and ",
        render: render_databases,
    },
    CategoryRule {
        category: Category::Data,
        limit: 3,
        separator: ", ",
        render: render_data_stack,
    },
];

fn render_languages(names: &str, _requirement_lower: &str) -> String {
    format!(
        "Add programming language experience: {names}. Highlight any projects or work experience using these languages, especially in relevant domains like data processing or backend development."
    )
}

fn render_frameworks(names: &str, _requirement_lower: &str) -> String {
    format!(
        "Include framework expertise: {names}. Add specific projects where you used these frameworks with measurable outcomes."
    )
}

fn render_tools(names: &str, requirement_lower: &str) -> String {
    if mentions_any(requirement_lower, VISUALIZATION_KEYWORDS) {
        format!(
            "Include data visualization projects using {names}. Provide examples of dashboards or reports you created and their business impact."
        )
    } else {
        format!(
            "Add proficiency with tools: {names}. Mention how you used these in past projects or workflows."
        )
    }
}

fn render_cloud(names: &str, _requirement_lower: &str) -> String {
    format!(
        "Highlight cloud platform experience with {names}. Document any infrastructure, deployment, or scaling work you have completed."
    )
}

fn render_databases(names: &str, _requirement_lower: &str) -> String {
    format!(
        "Mention database expertise: {names}. Include experience with data modeling, optimization, or large-scale data handling."
    )
}

fn render_data_stack(names: &str, _requirement_lower: &str) -> String {
    format!(
        "Highlight data stack experience: {names}. Add concrete examples where you used these tools to deliver measurable results."
    )
}

fn mentions_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text_lower.contains(k))
}

pub fn build_suggestions<S: AsRef<str>>(
    categorizer: &Categorizer,
    missing_terms: &[S],
    requirement_text: &str,
) -> Vec<String> {
    if missing_terms.is_empty() {
        return vec![FULL_MATCH_SUGGESTION.to_string()];
    }

    let categorized = categorizer.categorize(missing_terms);
    let requirement_lower = requirement_text.to_lowercase();
    let mut suggestions = Vec::new();

    for rule in CATEGORY_RULES {
        let bucket = categorized.get(rule.category);
        if bucket.is_empty() {
            continue;
        }
        let names = bucket
            .iter()
            .take(rule.limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(rule.separator);
        suggestions.push((rule.render)(&names, &requirement_lower));
    }

    if mentions_any(&requirement_lower, ANALYTICS_KEYWORDS) {
        suggestions.push(ANALYTICS_SUGGESTION.to_string());
    }

    suggestions.push(TERMINOLOGY_SUGGESTION.to_string());
    suggestions
}
