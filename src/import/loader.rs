use std::collections::HashMap;
use std::io::Read;

use strum::IntoEnumIterator;

use crate::error::{AppError, Result};
use crate::model::{ColumnLabels, LeaveField, NewLeaveRecord};
use crate::store::LeaveStore;

/// How a batch of parsed rows reaches the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Each row is its own insert. A store error stops the batch; rows already written stay.
    #[default]
    RowByRow,
    /// One transaction for the whole batch. A store error leaves nothing behind.
    Atomic,
}

/// A data row that could not be read and was left out of the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the intermediate rows, header being line 1.
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedRows {
    pub records: Vec<NewLeaveRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Reads comma-separated rows, checks the header carries every label in `labels`, and
/// maps each data row to a record by header position.
pub fn parse_rows<R: Read>(source: R, labels: &ColumnLabels) -> Result<ParsedRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(source);

    let header = reader.headers()?.clone();
    tracing::debug!(header = ?header, "Read header row");

    let columns = column_indexes(&header, labels)?;

    let mut parsed = ParsedRows::default();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                tracing::warn!(line, error = %e, "Skipping unreadable row");
                parsed.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if row.iter().all(|cell| cell.trim().is_empty()) {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            tracing::warn!(line, "Skipping blank row");
            parsed.skipped.push(SkippedRow {
                line,
                reason: "blank row".to_string(),
            });
            continue;
        }

        let mut record = NewLeaveRecord::default();
        for (field, index) in &columns {
            record.set(*field, row.get(*index).unwrap_or_default().to_string());
        }
        parsed.records.push(record);
    }

    Ok(parsed)
}

fn column_indexes(
    header: &csv::StringRecord,
    labels: &ColumnLabels,
) -> Result<HashMap<LeaveField, usize>> {
    let mut columns = HashMap::new();
    let mut missing = Vec::new();

    for field in LeaveField::iter() {
        let label = labels.label(field);
        match header.iter().position(|name| name == label) {
            Some(index) => {
                columns.insert(field, index);
            }
            None => missing.push(label.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }
    Ok(columns)
}

/// Writes parsed records to the store and returns how many were inserted.
pub async fn persist<S: LeaveStore>(
    store: &S,
    records: &[NewLeaveRecord],
    policy: ImportPolicy,
) -> Result<usize> {
    match policy {
        ImportPolicy::Atomic => Ok(store.insert_all(records).await?.len()),
        ImportPolicy::RowByRow => {
            for (inserted, record) in records.iter().enumerate() {
                if let Err(e) = store.insert(record).await {
                    tracing::error!(error = %e, inserted, "Insert failed, aborting import");
                    return Err(e);
                }
            }
            Ok(records.len())
        }
    }
}
