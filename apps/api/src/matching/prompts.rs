// Prompt constants for the generative suggestion provider.

/// System prompt for suggestion generation. Enforces JSON-only output.
pub const SUGGESTION_SYSTEM: &str = "You are a professional resume coach and recruiter. \
    You MUST respond with valid JSON only — a JSON array of strings. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Suggestion prompt template.
/// Replace: {matched_skills}, {missing_skills}, {jd_excerpt}, {resume_excerpt}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"Analyze the resume and job description to provide specific, actionable improvement suggestions.

MATCHED SKILLS (found in both resume and JD):
{matched_skills}

MISSING SKILLS (required in JD but not in resume):
{missing_skills}

JOB DESCRIPTION EXCERPT:
{jd_excerpt}

RESUME EXCERPT:
{resume_excerpt}

Provide 4-5 specific, actionable improvement suggestions for the resume. Each suggestion should:
1. Be concrete and easy to implement
2. Focus on closing the gap between the resume and job description
3. Highlight specific skills or experiences to add
4. Be professional and encouraging in tone

Return a JSON ARRAY of suggestion strings, most important first:
["First suggestion", "Second suggestion"]"#;
