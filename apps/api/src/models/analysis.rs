use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub resume_upload_id: i64,
    pub jd_upload_id: i64,
    pub score: i32,
    pub matched_skills: Json<Vec<String>>,
    pub missing_skills: Json<Vec<String>>,
    pub suggestions: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

