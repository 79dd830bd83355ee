//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::extraction::extract_pdf_text;
use crate::documents::intake::read_document_pair;
use crate::documents::storage::store_upload;
use crate::errors::AppError;
use crate::matching::pipeline::{analyze_with_provider, AnalysisResult};
use crate::matching::store::{get_analysis, save_analysis};
use crate::models::analysis::AnalysisRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub jd_text: String,
}

/// Outward shape of an analysis. Term lists are exposed as "skills".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AnalyzeResponse {
    fn from_result(id: Option<i64>, result: AnalysisResult) -> Self {
        Self {
            id,
            score: result.score,
            matched_skills: result.matched_terms,
            missing_skills: result.missing_terms,
            suggestions: result.suggestions,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetailResponse {
    pub id: i64,
    pub resume_upload_id: i64,
    pub jd_upload_id: i64,
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for AnalysisDetailResponse {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            resume_upload_id: row.resume_upload_id,
            jd_upload_id: row.jd_upload_id,
            score: row.score,
            matched_skills: row.matched_skills.0,
            missing_skills: row.missing_skills.0,
            suggestions: row.suggestions.0,
            created_at: row.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Multipart form with one `resume` and one `jd` PDF.
/// Store → extract → analyze (+ provider) → persist.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let documents = read_document_pair(multipart).await?;

    let (resume_upload, jd_upload) = tokio::try_join!(
        store_upload(&state.s3, &state.config.s3_bucket, &documents.resume),
        store_upload(&state.s3, &state.config.s3_bucket, &documents.jd),
    )?;

    let (resume_text, jd_text) = tokio::try_join!(
        extract_pdf_text(documents.resume.bytes.clone()),
        extract_pdf_text(documents.jd.bytes.clone()),
    )?;

    let provided = analyze_with_provider(
        &state.analyzer,
        state.suggestion_provider.as_ref(),
        state.config.suggestion_timeout,
        &resume_text,
        &jd_text,
    )
    .await;

    let analysis_id =
        save_analysis(&state.db, &resume_upload, &jd_upload, &provided.result).await?;

    info!(
        "Analysis {analysis_id}: score={} suggestions={:?}",
        provided.result.score, provided.source
    );

    Ok(Json(AnalyzeResponse::from_result(
        Some(analysis_id),
        provided.result,
    )))
}

/// POST /api/analyze/text
///
/// Same analysis on already-extracted text. Nothing is stored.
/// Empty texts are valid input: an empty `jd_text` scores 0 with no terms.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let provided = analyze_with_provider(
        &state.analyzer,
        state.suggestion_provider.as_ref(),
        state.config.suggestion_timeout,
        &request.resume_text,
        &request.jd_text,
    )
    .await;

    Ok(Json(AnalyzeResponse::from_result(None, provided.result)))
}

/// GET /api/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AnalysisDetailResponse>, AppError> {
    let row = get_analysis(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    Ok(Json(row.into()))
}
