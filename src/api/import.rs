use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::import::{self, ImportSettings};
use crate::store::LeaveStore;

/// Name of the form field carrying the workbook.
pub const FILE_FIELD: &str = "file";

/// Upload form accepted by the import endpoint.
#[derive(ToSchema)]
pub struct UploadForm {
    /// `.xlsx` workbook; the part's Content-Type must name a spreadsheet
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// The `file` part of a multipart body.
struct Upload {
    content_type: String,
    bytes: Vec<u8>,
}

/// Reads parts until the `file` field, draining the others.
async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<Upload, AppError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        let is_file = field.content_disposition().get_name() == Some(FILE_FIELD);
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?
        {
            if !is_file {
                continue;
            }
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::UploadTooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_file {
            return Ok(Upload {
                content_type,
                bytes,
            });
        }
    }
    Err(AppError::MissingFile)
}

/// Import a leave spreadsheet
#[utoipa::path(
    post,
    path = "/api/import-excel",
    request_body(
        content = UploadForm,
        description = "Multipart form whose `file` field is an .xlsx workbook; the first sheet must carry the nine required headers",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Rows imported", body = Object, example = json!({
            "status": "success",
            "message": "Excel imported successfully",
            "imported": 42,
            "skipped": 0
        })),
        (status = 400, description = "Malformed form, no `file` field, not a readable workbook, or no sheets"),
        (status = 413, description = "Upload larger than MAX_UPLOAD_BYTES"),
        (status = 415, description = "The `file` part is not a spreadsheet"),
        (status = 422, description = "Required header missing", body = Object, example = json!({
            "status": "error",
            "message": "file is missing required field(s): 授課教師信箱"
        })),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn import_excel<S: LeaveStore + 'static>(
    mut payload: Multipart,
    store: web::Data<S>,
    settings: web::Data<ImportSettings>,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(&mut payload, settings.max_upload_bytes).await?;
    if !upload.content_type.contains("spreadsheet") {
        return Err(AppError::UnsupportedMedia(upload.content_type));
    }

    tracing::info!(bytes = upload.bytes.len(), "Workbook upload received");

    // calamine decoding is blocking
    let bytes = upload.bytes;
    let rows = web::block(move || import::to_rows(&bytes))
        .await
        .map_err(|e| AppError::Blocking(e.to_string()))??;

    let summary = import::load_rows(store.get_ref(), &rows, settings.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Excel imported successfully",
        "imported": summary.imported,
        "skipped": summary.skipped
    })))
}
