use sqlx::{MySqlExecutor, MySqlPool};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{LeaveRecord, NewLeaveRecord};
use crate::store::LeaveStore;

#[derive(Clone)]
pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

async fn insert_row<'e, E>(executor: E, record: &NewLeaveRecord) -> Result<String>
where
    E: MySqlExecutor<'e>,
{
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (lr_id, student_id, s_name, s_email, s_dept, course_name,
             class_room, class_time, class_campus, t_email)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&record.student_id)
    .bind(&record.student_name)
    .bind(&record.student_email)
    .bind(&record.student_dept)
    .bind(&record.course_name)
    .bind(&record.class_room)
    .bind(&record.class_time)
    .bind(&record.class_campus)
    .bind(&record.teacher_email)
    .execute(executor)
    .await?;

    Ok(id)
}

impl LeaveStore for MySqlLeaveStore {
    async fn insert(&self, record: &NewLeaveRecord) -> Result<String> {
        insert_row(&self.pool, record).await
    }

    async fn insert_all(&self, records: &[NewLeaveRecord]) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            // dropping `tx` on the early return rolls the batch back
            ids.push(insert_row(&mut *tx, record).await?);
        }

        tx.commit().await?;
        Ok(ids)
    }

    async fn find_by_teacher_email(&self, teacher_email: &str) -> Result<Vec<LeaveRecord>> {
        let records = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT lr_id, student_id, s_name, s_email, s_dept, course_name,
                   class_room, class_time, class_campus, t_email
            FROM leave_requests
            WHERE t_email = ?
            "#,
        )
        .bind(teacher_email)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(teacher_email, count = records.len(), "Fetched leave records");
        Ok(records)
    }
}
