use serde::Serialize;
use uuid::Uuid;

use crate::application::use_cases::upload_document::UploadDocumentResponse;

#[derive(Debug, Serialize)]
pub struct UploadDocumentDto {
    pub document_id: Uuid,
    pub content_hash: String,
    pub already_existed: bool,
}

impl From<UploadDocumentResponse> for UploadDocumentDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            content_hash: response.content_hash,
            already_existed: response.already_existed,
        }
    }
}
