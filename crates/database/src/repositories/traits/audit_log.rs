//! 操作日志仓库 trait 定义

use crate::models::audit_log::AuditLogEntry;
use crate::DatabaseResult;

/// 操作日志写入接口
///
/// 管理员修改项目状态后调用，记录动作类型、实体类型、实体 ID 以及可读的描述信息。
#[async_trait::async_trait]
pub trait AuditLogRepositoryTrait: Send + Sync + 'static {
    /// 写入一条操作日志
    async fn log(&self, entry: AuditLogEntry) -> DatabaseResult<()>;
}
