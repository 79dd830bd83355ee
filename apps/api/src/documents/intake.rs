//! Pulls the `resume` and `jd` PDFs out of a multipart request.

use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const ONLY_PDF_MESSAGE: &str = "Only PDF files are allowed.";
pub const BOTH_REQUIRED_MESSAGE: &str = "Both resume and job description PDFs are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    #[serde(rename = "jd")]
    JobDescription,
}

impl DocumentKind {
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "resume" => Some(DocumentKind::Resume),
            "jd" => Some(DocumentKind::JobDescription),
            _ => None,
        }
    }

    /// Value stored in `uploads.kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::JobDescription => "jd",
        }
    }

    /// Object-store folder for this kind.
    pub fn folder(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resumes",
            DocumentKind::JobDescription => "jds",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct DocumentPair {
    pub resume: UploadedDocument,
    pub jd: UploadedDocument,
}

/// Both the extension and the declared content type must say PDF.
pub fn is_pdf(file_name: &str, content_type: &str) -> bool {
    let is_pdf_ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    is_pdf_ext && content_type == PDF_MIME
}

/// `{stem}-{id}.pdf`, with any directory part of the client-supplied name dropped.
pub fn stored_name(original_name: &str, id: Uuid) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    format!("{stem}-{id}.pdf")
}

/// Reads exactly one `resume` and one `jd` PDF from the form.
pub async fn read_document_pair(mut multipart: Multipart) -> Result<DocumentPair, AppError> {
    let mut resume = None;
    let mut jd = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        let kind = DocumentKind::from_field(&field_name)
            .ok_or_else(|| AppError::Validation(format!("Unexpected field '{field_name}'")))?;

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_pdf(&original_name, &content_type) {
            return Err(AppError::Validation(ONLY_PDF_MESSAGE.to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{field_name}': {e}")))?;

        debug!(
            "Received {} upload '{}' ({} bytes)",
            kind.as_str(),
            original_name,
            bytes.len()
        );

        let slot = match kind {
            DocumentKind::Resume => &mut resume,
            DocumentKind::JobDescription => &mut jd,
        };
        if slot.is_some() {
            return Err(AppError::Validation(format!(
                "Only one file is allowed for '{field_name}'"
            )));
        }
        *slot = Some(UploadedDocument {
            kind,
            original_name,
            content_type,
            bytes,
        });
    }

    match (resume, jd) {
        (Some(resume), Some(jd)) => Ok(DocumentPair { resume, jd }),
        _ => Err(AppError::Validation(BOTH_REQUIRED_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_requires_extension_and_mime() {
        assert!(is_pdf("resume.pdf", "application/pdf"));
        assert!(is_pdf("Resume.PDF", "application/pdf"));
        assert!(!is_pdf("resume.pdf", "text/plain"));
        assert!(!is_pdf("resume.docx", "application/pdf"));
        assert!(!is_pdf("resume", "application/pdf"));
    }

    #[test]
    fn test_stored_name_keeps_stem_and_adds_id() {
        let id = Uuid::nil();
        assert_eq!(
            stored_name("Jane Doe.pdf", id),
            "Jane Doe-00000000-0000-0000-0000-000000000000.pdf"
        );
    }

    #[test]
    fn test_stored_name_drops_directories() {
        let name = stored_name("../../etc/passwd.pdf", Uuid::nil());
        assert!(name.starts_with("passwd-"));
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_stored_name_falls_back_for_empty_stem() {
        assert!(stored_name("", Uuid::nil()).starts_with("upload-"));
    }

    #[test]
    fn test_field_names_map_to_kinds() {
        assert_eq!(DocumentKind::from_field("resume"), Some(DocumentKind::Resume));
        assert_eq!(DocumentKind::from_field("jd"), Some(DocumentKind::JobDescription));
        assert_eq!(DocumentKind::from_field("cover_letter"), None);
        assert_eq!(DocumentKind::JobDescription.folder(), "jds");
        assert_eq!(
            serde_json::to_string(&DocumentKind::JobDescription).unwrap(),
            r#""jd""#
        );
    }
}
