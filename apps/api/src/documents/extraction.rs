//! PDF text extraction via `pdf-extract`.
//!
//! Parsing is CPU-bound and the parser can panic on malformed input, so it runs
//! inside `tokio::task::spawn_blocking` and a panic is reported as an extraction
//! failure rather than taking the request down.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::matching::tokenizer::normalize;

/// Extracts plain text from a PDF and normalizes its whitespace.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let size = bytes.len();

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Extraction("PDF parser panicked on malformed input".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
            }
        })?
        .map_err(|e| AppError::Extraction(e.to_string()))?;

    let text = normalize(&text);
    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_an_extraction_error() {
        let result = extract_pdf_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_empty_input_is_an_extraction_error() {
        let result = extract_pdf_text(Bytes::new()).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
