use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Result alias used by the import and notify pipelines.
pub type Result<T> = std::result::Result<T, AppError>;

/// Every way an import or a notify request can fail.
#[derive(Debug, Error)]
pub enum AppError {
    /// The uploaded bytes are not a workbook calamine can decode.
    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("no sheets found in Excel file")]
    NoSheets,

    #[error("uploaded file is empty")]
    EmptyUpload,

    /// The multipart body could not be read.
    #[error("malformed upload: {0}")]
    Upload(String),

    #[error("form field 'file' is missing")]
    MissingFile,

    #[error("upload exceeds {0} bytes")]
    UploadTooLarge(usize),

    #[error("unsupported media type '{0}', expected a spreadsheet")]
    UnsupportedMedia(String),

    /// Raised before any data row is read.
    #[error("file is missing required field(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("teacher_email is required")]
    MissingTeacherEmail,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure encoding or decoding the comma-separated hand-off between importer and loader.
    #[error("intermediate row encoding error: {0}")]
    Intermediate(#[from] csv::Error),

    #[error("record store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("mail delivery failed: {0}")]
    Delivery(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Blocking(String),
}

impl AppError {
    pub fn delivery<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        AppError::Delivery(err.into())
    }

    /// Message shown to the caller. Server-side failures stay generic.
    fn public_message(&self) -> String {
        match self {
            AppError::Io(_)
            | AppError::Intermediate(_)
            | AppError::Store(_)
            | AppError::Config(_)
            | AppError::Blocking(_) => "Internal server error".to_string(),
            AppError::Delivery(_) => "Failed to send email".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Spreadsheet(_)
            | AppError::NoSheets
            | AppError::EmptyUpload
            | AppError::Upload(_)
            | AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::MissingColumns(_) | AppError::MissingTeacherEmail => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Delivery(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_)
            | AppError::Intermediate(_)
            | AppError::Store(_)
            | AppError::Config(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }

        HttpResponse::build(status).json(json!({
            "status": "error",
            "message": self.public_message()
        }))
    }
}
