//! Spreadsheet import: xlsx bytes are decoded to comma-separated rows, validated against the
//! configured header labels, and written to the record store.

pub mod loader;
pub mod workbook;

use std::io::Cursor;

use serde::Serialize;

pub use loader::{ImportPolicy, ParsedRows, SkippedRow};

use crate::error::{AppError, Result};
use crate::model::ColumnLabels;
use crate::store::LeaveStore;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20; // 10 MiB

/// Import-time settings shared with the upload handler.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub labels: ColumnLabels,
    pub policy: ImportPolicy,
    /// Uploads larger than this are refused before decoding.
    pub max_upload_bytes: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            labels: ColumnLabels::default(),
            policy: ImportPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Decodes a workbook into the intermediate row encoding. Blocking; run it off the reactor.
pub fn to_rows(workbook: &[u8]) -> Result<Vec<u8>> {
    if workbook.is_empty() {
        return Err(AppError::EmptyUpload);
    }
    let mut rows = Vec::new();
    workbook::convert(Cursor::new(workbook), &mut rows)?;
    Ok(rows)
}

/// Validates intermediate rows and persists every readable data row.
pub async fn load_rows<S: LeaveStore>(
    store: &S,
    rows: &[u8],
    settings: &ImportSettings,
) -> Result<ImportSummary> {
    let parsed = loader::parse_rows(rows, &settings.labels)?;
    let imported = loader::persist(store, &parsed.records, settings.policy).await?;

    tracing::info!(
        imported,
        skipped = parsed.skipped.len(),
        policy = ?settings.policy,
        "Import finished"
    );

    Ok(ImportSummary {
        imported,
        skipped: parsed.skipped.len(),
    })
}

/// Full import of an uploaded workbook.
pub async fn import_workbook<S: LeaveStore>(
    store: &S,
    workbook: &[u8],
    settings: &ImportSettings,
) -> Result<ImportSummary> {
    let rows = to_rows(workbook)?;
    load_rows(store, &rows, settings).await
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_xlsxwriter::Workbook;

    /// Builds an xlsx workbook whose first sheet holds `rows`.
    pub fn workbook(rows: &[Vec<String>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet
                    .write_string(r as u32, c as u16, value.as_str())
                    .expect("cell written");
            }
        }
        workbook.save_to_buffer().expect("workbook saved")
    }

    pub fn header() -> Vec<String> {
        ["學號", "姓名", "學生信箱", "學生班級", "科目", "上課校區", "上課教室", "上課時間", "授課教師信箱"]
            .map(String::from)
            .to_vec()
    }

    pub fn student(id: &str, teacher_email: &str) -> Vec<String> {
        vec![
            id.to_string(),
            format!("Student {id}"),
            format!("{id}@students.school.edu"),
            "CS1A".to_string(),
            "Operating Systems".to_string(),
            "Main".to_string(),
            "E301".to_string(),
            "Wed 10:10".to_string(),
            teacher_email.to_string(),
        ]
    }
}
