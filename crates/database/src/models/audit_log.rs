//! 操作日志数据库模型

use shared_lib::{EntityType, LogAction};

/// 一条待写入的操作日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub action: LogAction,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub message: String,
}

impl AuditLogEntry {
    pub fn new(action: LogAction, entity_type: EntityType, entity_id: i64, message: impl Into<String>) -> Self {
        Self {
            action,
            entity_type,
            entity_id,
            message: message.into(),
        }
    }
}
