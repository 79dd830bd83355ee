use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SUGGESTION_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Optional: without it the generative suggestion provider is disabled.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the generative provider call before falling back to rules.
    pub suggestion_timeout: Duration,
    /// Replacement vocabulary; the built-in dictionary is used when unset.
    pub term_dictionary_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: parse_env("PORT", DEFAULT_PORT).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            suggestion_timeout: Duration::from_secs(
                parse_env("SUGGESTION_TIMEOUT_SECS", DEFAULT_SUGGESTION_TIMEOUT_SECS)
                    .context("SUGGESTION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            term_dictionary_path: optional_env("TERM_DICTIONARY_PATH").map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("SKILLMATCH_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(value, 5000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SKILLMATCH_TEST_BAD_TIMEOUT", "soon");
        let result: Result<u64> = parse_env("SKILLMATCH_TEST_BAD_TIMEOUT", 20);
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_env_treats_blank_as_absent() {
        std::env::set_var("SKILLMATCH_TEST_BLANK_KEY", "   ");
        assert_eq!(optional_env("SKILLMATCH_TEST_BLANK_KEY"), None);
    }

    #[test]
    fn test_require_env_names_missing_variable() {
        let err = require_env("SKILLMATCH_TEST_MISSING_URL").unwrap_err();
        assert!(err.to_string().contains("SKILLMATCH_TEST_MISSING_URL"));
    }
}
