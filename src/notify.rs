use crate::digest::DigestTemplate;
use crate::error::{AppError, Result};
use crate::mail::MailTransport;
use crate::store::LeaveStore;

pub const DEFAULT_SUBJECT: &str = "學生請假名單";

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub subject: String,
    pub template: DigestTemplate,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            template: DigestTemplate::default(),
        }
    }
}

/// Looks up every record for `teacher_email`, renders the digest and mails it to that address.
/// Returns how many records the digest listed.
pub async fn send_digest<S, M>(
    store: &S,
    mailer: &M,
    settings: &NotifySettings,
    teacher_email: &str,
) -> Result<usize>
where
    S: LeaveStore,
    M: MailTransport,
{
    if teacher_email.trim().is_empty() {
        return Err(AppError::MissingTeacherEmail);
    }

    let records = store.find_by_teacher_email(teacher_email).await?;
    let body = settings.template.compose(&records);

    mailer.send(teacher_email, &settings.subject, &body).await?;

    tracing::info!(teacher_email, records = records.len(), "Digest delivered");
    Ok(records.len())
}
