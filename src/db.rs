use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Creates `leave_requests` when it does not exist yet. `t_email` uses a binary collation so
/// lookups by teacher email are exact.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            lr_id        CHAR(36)     NOT NULL PRIMARY KEY,
            student_id   VARCHAR(64)  NOT NULL,
            s_name       VARCHAR(255) NOT NULL,
            s_email      VARCHAR(255) NOT NULL,
            s_dept       VARCHAR(255) NOT NULL,
            course_name  VARCHAR(255) NOT NULL,
            class_room   VARCHAR(255) NOT NULL,
            class_time   VARCHAR(255) NOT NULL,
            class_campus VARCHAR(255) NOT NULL,
            t_email      VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
            INDEX idx_leave_requests_t_email (t_email)
        ) DEFAULT CHARSET = utf8mb4
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("leave_requests table ready");
    Ok(())
}
