mod config;
mod db;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::dictionary::TermDictionary;
use crate::matching::pipeline::Analyzer;
use crate::matching::provider::{
    DisabledSuggestionProvider, LlmSuggestionProvider, SuggestionProvider,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Load term dictionary (builtin unless TERM_DICTIONARY_PATH is set)
    let dictionary = match &config.term_dictionary_path {
        Some(path) => {
            let dictionary = Arc::new(TermDictionary::load(path)?);
            info!(
                "Loaded term dictionary from {} ({} terms)",
                path.display(),
                dictionary.len()
            );
            dictionary
        }
        None => TermDictionary::builtin()
            .map_err(|e| anyhow::anyhow!("built-in term dictionary is invalid: {e}"))?,
    };
    if dictionary.is_empty() {
        warn!("Term dictionary has no terms; every analysis will score 0");
    }
    let analyzer = Arc::new(Analyzer::new(dictionary));

    // Initialize suggestion provider
    let suggestion_provider = build_suggestion_provider(&config)?;
    info!(
        "Suggestion provider: {} (timeout {:?})",
        suggestion_provider.name(),
        config.suggestion_timeout
    );

    // Build app state
    let state = AppState {
        db,
        s3,
        config: config.clone(),
        analyzer,
        suggestion_provider,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict CORS origins once the frontend host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_suggestion_provider(config: &Config) -> Result<Arc<dyn SuggestionProvider>> {
    match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.suggestion_timeout)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmSuggestionProvider(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, using rule-based suggestions only");
            Ok(Arc::new(DisabledSuggestionProvider))
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "skillmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
