use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::mail::MailTransport;
use crate::notify::{self, NotifySettings};
use crate::store::LeaveStore;

#[derive(Deserialize, ToSchema)]
pub struct NotifyRequest {
    /// Teacher to notify; matched exactly against imported records
    #[schema(example = "wang@school.edu")]
    pub teacher_email: String,
}

/// Send a teacher the digest of their students' leave records
#[utoipa::path(
    post,
    path = "/api/send-email",
    request_body(
        content = NotifyRequest,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Digest sent", body = Object, example = json!({
            "status": "success",
            "message": "Email sent successfully",
            "records": 3
        })),
        (status = 400, description = "Malformed form body"),
        (status = 422, description = "teacher_email missing"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Record lookup failed"),
        (status = 502, description = "Mail relay refused or unreachable", body = Object, example = json!({
            "status": "error",
            "message": "Failed to send email"
        }))
    ),
    tag = "Leave"
)]
pub async fn send_email<S, M>(
    form: web::Form<NotifyRequest>,
    store: web::Data<S>,
    mailer: web::Data<M>,
    settings: web::Data<NotifySettings>,
) -> Result<HttpResponse, AppError>
where
    S: LeaveStore + 'static,
    M: MailTransport + 'static,
{
    let records = notify::send_digest(
        store.get_ref(),
        mailer.get_ref(),
        settings.get_ref(),
        &form.teacher_email,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Email sent successfully",
        "records": records
    })))
}
