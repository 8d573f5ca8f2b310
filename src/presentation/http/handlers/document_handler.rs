use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::UploadDocumentUseCase;
use crate::application::use_cases::upload_document::UploadDocumentError;
use crate::presentation::http::dto::{ApiResponse, UploadDocumentDto};

pub struct DocumentHandler {
    upload_document_use_case: Arc<UploadDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(upload_document_use_case: Arc<UploadDocumentUseCase>) -> Self {
        Self {
            upload_document_use_case,
        }
    }

    pub async fn upload(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        let mut file: Option<(String, Vec<u8>)> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            if field.name() == Some("file") {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.pdf")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| StatusCode::BAD_REQUEST)?;
                file = Some((file_name, data.to_vec()));
            }
        }

        let Some((file_name, data)) = file else {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<UploadDocumentDto>::error(
                    "MISSING_FILE",
                    "Multipart field 'file' is required",
                )),
            ));
        };

        match handler.upload_document_use_case.execute(&file_name, &data).await {
            Ok(response) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(UploadDocumentDto::from(response))),
            )),
            Err(e @ (UploadDocumentError::UnsupportedFormat(_) | UploadDocumentError::EmptyFile)) => {
                Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("INVALID_UPLOAD", e.to_string())),
                ))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("UPLOAD_FAILED", e.to_string())),
            )),
        }
    }
}
