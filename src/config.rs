use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dotenvy::dotenv;

use crate::digest::DigestTemplate;
use crate::error::{AppError, Result};
use crate::import::{DEFAULT_MAX_UPLOAD_BYTES, ImportPolicy, ImportSettings};
use crate::mail::SmtpSettings;
use crate::model::ColumnLabels;
use crate::notify::{DEFAULT_SUBJECT, NotifySettings};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub api_prefix: String,

    pub smtp: SmtpSettings,
    pub import: ImportSettings,
    pub notify: NotifySettings,

    // Rate limiting
    pub rate_import_per_min: u32,
    pub rate_notify_per_min: u32,

    pub log_dir: PathBuf,
    pub log_level: tracing::Level,
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::Config(format!("{key} must be set")))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}='{raw}' is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let labels = match env::var("COLUMN_LABELS_FILE") {
            Ok(path) => ColumnLabels::from_json_file(Path::new(&path))?,
            Err(_) => ColumnLabels::default(),
        };
        let template = match env::var("DIGEST_TEMPLATE_FILE") {
            Ok(path) => DigestTemplate::from_json_file(Path::new(&path))?,
            Err(_) => DigestTemplate::default(),
        };
        let policy = if parsed_or("IMPORT_ATOMIC", false)? {
            ImportPolicy::Atomic
        } else {
            ImportPolicy::RowByRow
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            smtp: SmtpSettings {
                host: required("SMTP_HOST")?,
                port: parsed_or("SMTP_PORT", 587)?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from: required("MAIL_FROM")?,
            },
            import: ImportSettings {
                labels,
                policy,
                max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            notify: NotifySettings {
                subject: env::var("DIGEST_SUBJECT").unwrap_or_else(|_| DEFAULT_SUBJECT.to_string()),
                template,
            },

            rate_import_per_min: parsed_or("RATE_IMPORT_PER_MIN", 30)?,
            rate_notify_per_min: parsed_or("RATE_NOTIFY_PER_MIN", 10)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()).into(),
            log_level: parsed_or("LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}
