//! 操作日志仓库
//!
//! 将管理员操作写入 `activity_logs` 表

use crate::models::audit_log::AuditLogEntry;
use crate::repositories::traits::AuditLogRepositoryTrait;
use crate::DatabaseResult;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AuditLogRepositoryTrait for AuditLogRepository {
    async fn log(&self, entry: AuditLogEntry) -> DatabaseResult<()> {
        debug!("📝 写入操作日志: {:?}", entry);

        sqlx::query(
            r#"
            INSERT INTO activity_logs (action, entity_type, entity_id, message, created_at)
            VALUES ($1, $2, $3, $4, now())
            "#,
        )
        .bind(entry.action.as_str())
        .bind(entry.entity_type.as_str())
        .bind(entry.entity_id)
        .bind(entry.message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
