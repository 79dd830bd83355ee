//! Persistence for uploads and finished analyses. Insert-only; rows are never updated.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::documents::storage::StoredUpload;
use crate::matching::pipeline::AnalysisResult;
use crate::models::analysis::AnalysisRow;

/// Writes both upload rows and the analysis in one transaction, so a failed
/// analysis insert leaves no orphaned uploads behind.
pub async fn save_analysis(
    pool: &PgPool,
    resume: &StoredUpload,
    jd: &StoredUpload,
    result: &AnalysisResult,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let resume_upload_id = insert_upload(&mut tx, resume).await?;
    let jd_upload_id = insert_upload(&mut tx, jd).await?;
    let analysis_id = insert_analysis(&mut tx, resume_upload_id, jd_upload_id, result).await?;

    tx.commit().await?;
    Ok(analysis_id)
}

pub async fn insert_upload(
    conn: &mut PgConnection,
    upload: &StoredUpload,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO uploads (kind, original_name, stored_name, path, mime_type, size, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(upload.kind.as_str())
    .bind(&upload.original_name)
    .bind(&upload.stored_name)
    .bind(&upload.path)
    .bind(&upload.mime_type)
    .bind(upload.size)
    .bind(upload.uploaded_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Records an analysis. `result.suggestions` must already be the final list
/// (provider output when it was used).
pub async fn insert_analysis(
    conn: &mut PgConnection,
    resume_upload_id: i64,
    jd_upload_id: i64,
    result: &AnalysisResult,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO analyses
            (resume_upload_id, jd_upload_id, score, matched_skills, missing_skills, suggestions)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(resume_upload_id)
    .bind(jd_upload_id)
    .bind(result.score as i32)
    .bind(Json(&result.matched_terms))
    .bind(Json(&result.missing_terms))
    .bind(Json(&result.suggestions))
    .fetch_one(&mut *conn)
    .await?;

    info!("Inserted analysis {id} (resume upload {resume_upload_id}, jd upload {jd_upload_id})");
    Ok(id)
}

pub async fn get_analysis(pool: &PgPool, id: i64) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
