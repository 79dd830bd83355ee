use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::documents::intake::{stored_name, DocumentKind, UploadedDocument};
use crate::errors::AppError;

/// Where an upload ended up. Mirrors a row of `uploads`.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub kind: DocumentKind,
    pub original_name: String,
    pub stored_name: String,
    pub path: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

pub fn object_key(kind: DocumentKind, stored_name: &str) -> String {
    format!("uploads/{}/{}", kind.folder(), stored_name)
}

/// Uploads the original PDF to the bucket under `uploads/{resumes|jds}/`.
pub async fn store_upload(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    document: &UploadedDocument,
) -> Result<StoredUpload, AppError> {
    let stored_name = stored_name(&document.original_name, Uuid::new_v4());
    let key = object_key(document.kind, &stored_name);

    s3.put_object()
        .bucket(s3_bucket)
        .key(&key)
        .body(ByteStream::from(document.bytes.clone()))
        .content_type(document.content_type.as_str())
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!("Stored {} upload at s3://{}/{}", document.kind.as_str(), s3_bucket, key);

    Ok(StoredUpload {
        kind: document.kind,
        original_name: document.original_name.clone(),
        stored_name,
        path: key,
        mime_type: document.content_type.clone(),
        size: document.bytes.len() as i64,
        uploaded_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_uses_kind_folder() {
        assert_eq!(
            object_key(DocumentKind::Resume, "cv-1.pdf"),
            "uploads/resumes/cv-1.pdf"
        );
        assert_eq!(
            object_key(DocumentKind::JobDescription, "role-2.pdf"),
            "uploads/jds/role-2.pdf"
        );
    }
}
