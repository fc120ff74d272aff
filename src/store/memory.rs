use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::model::{LeaveRecord, NewLeaveRecord};
use crate::store::LeaveStore;

/// In-process store for tests. `failing_after(n)` rejects every insert once `n` rows exist;
/// `failing_queries()` rejects every lookup.
#[derive(Default)]
pub struct MemoryLeaveStore {
    rows: Mutex<Vec<LeaveRecord>>,
    fail_after: Option<usize>,
    fail_queries: bool,
}

impl MemoryLeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(limit: usize) -> Self {
        Self {
            fail_after: Some(limit),
            ..Self::default()
        }
    }

    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<LeaveRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn push(&self, rows: &mut Vec<LeaveRecord>, record: &NewLeaveRecord) -> Result<String> {
        if self.fail_after.is_some_and(|limit| rows.len() >= limit) {
            return Err(AppError::Store(sqlx::Error::PoolTimedOut));
        }
        let id = Uuid::new_v4().to_string();
        rows.push(record.clone().with_id(id.clone()));
        Ok(id)
    }
}

impl LeaveStore for MemoryLeaveStore {
    async fn insert(&self, record: &NewLeaveRecord) -> Result<String> {
        let mut rows = self.rows.lock().unwrap();
        self.push(&mut rows, record)
    }

    async fn insert_all(&self, records: &[NewLeaveRecord]) -> Result<Vec<String>> {
        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        let ids = records
            .iter()
            .map(|record| self.push(&mut staged, record))
            .collect::<Result<Vec<_>>>()?;
        *rows = staged;
        Ok(ids)
    }

    async fn find_by_teacher_email(&self, teacher_email: &str) -> Result<Vec<LeaveRecord>> {
        if self.fail_queries {
            return Err(AppError::Store(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.teacher_email == teacher_email)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: &str, teacher_email: &str) -> NewLeaveRecord {
        NewLeaveRecord {
            student_id: student_id.into(),
            teacher_email: teacher_email.into(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn query_returns_exactly_the_matching_subset() {
        let store = MemoryLeaveStore::new();
        for (student, teacher) in [
            ("s1", "wang@school.edu"),
            ("s2", "lin@school.edu"),
            ("s3", "wang@school.edu"),
            ("s4", "Wang@school.edu"),
        ] {
            store.insert(&record(student, teacher)).await.expect("inserted");
        }

        let mut found: Vec<String> = store
            .find_by_teacher_email("wang@school.edu")
            .await
            .expect("queried")
            .into_iter()
            .map(|r| r.student_id)
            .collect();
        found.sort();

        assert_eq!(found, vec!["s1", "s3"]);
    }

    #[actix_web::test]
    async fn generated_ids_are_unique() {
        let store = MemoryLeaveStore::new();
        let a = store.insert(&record("s1", "t")).await.expect("inserted");
        let b = store.insert(&record("s1", "t")).await.expect("inserted");
        assert_ne!(a, b);
        assert_eq!(store.records().len(), 2);
    }

    #[actix_web::test]
    async fn insert_all_is_all_or_nothing() {
        let store = MemoryLeaveStore::failing_after(2);
        let batch = vec![record("s1", "t"), record("s2", "t"), record("s3", "t")];

        let err = store.insert_all(&batch).await.expect_err("third row rejected");
        assert!(matches!(err, AppError::Store(_)));
        assert!(store.records().is_empty());
    }
}
