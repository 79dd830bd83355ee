use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::matching::pipeline::Analyzer;
use crate::matching::provider::SuggestionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Matching engine over the process-wide, read-only term dictionary.
    pub analyzer: Arc<Analyzer>,
    /// Pluggable suggestion source. Disabled unless ANTHROPIC_API_KEY is set.
    pub suggestion_provider: Arc<dyn SuggestionProvider>,
}
