use crate::api::import::UploadForm;
use crate::api::notify::NotifyRequest;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Notifier API",
        version = "0.1.0",
        description = r#"
## Student Leave Notifier

Imports student leave/absence spreadsheets and mails each teacher a digest of the
students who will miss their classes.

### Endpoints
- **Import**: upload an `.xlsx` workbook as the `file` field of a multipart form; the first sheet's header row must name the nine
  required columns, in any order
- **Notify**: send one teacher the digest of every stored record carrying their email

### Response Format
- `{"status": "success" | "error", "message": ...}` JSON bodies
- Both endpoints are rate limited per client IP
"#,
    ),
    paths(
        crate::api::import::import_excel,
        crate::api::notify::send_email
    ),
    components(
        schemas(
            UploadForm,
            NotifyRequest
        )
    ),
    tags(
        (name = "Leave", description = "Leave spreadsheet import and teacher notification"),
    )
)]
pub struct ApiDoc;
