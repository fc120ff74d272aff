pub mod mysql;

#[cfg(test)]
pub mod memory;

pub use mysql::MySqlLeaveStore;

use crate::error::Result;
use crate::model::{LeaveRecord, NewLeaveRecord};

/// Persistence for leave records. Handed to handlers as actix `Data`, never held globally.
#[allow(async_fn_in_trait)]
pub trait LeaveStore {
    /// Inserts one record and returns the id the store generated for it.
    async fn insert(&self, record: &NewLeaveRecord) -> Result<String>;

    /// Inserts every record or none of them.
    async fn insert_all(&self, records: &[NewLeaveRecord]) -> Result<Vec<String>>;

    /// Exact, case-sensitive match on the teacher email. Order is unspecified.
    async fn find_by_teacher_email(&self, teacher_email: &str) -> Result<Vec<LeaveRecord>>;
}
