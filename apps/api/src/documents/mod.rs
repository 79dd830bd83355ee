// Document intake: multipart upload validation, PDF text extraction, object storage.
// The matching engine only ever sees the extracted text.

pub mod extraction;
pub mod intake;
pub mod storage;
