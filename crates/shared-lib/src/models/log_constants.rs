//! 操作日志常量定义模块
//!
//! 统一管理写入操作日志时使用的动作类型和实体类型，
//! 确保整个系统中写入的日志数据保持一致。

/// 操作日志的动作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    /// 管理员审核通过
    Approved,
    /// 管理员拒绝（软删除）
    Rejected,
    /// 管理员直接修改状态
    StatusChanged,
}

impl LogAction {
    /// 写入日志表时使用的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Approved => "approved",
            LogAction::Rejected => "rejected",
            LogAction::StatusChanged => "status_changed",
        }
    }
}

/// 操作日志关联的实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    /// 待投票项目
    Project,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Project => "project",
        }
    }
}
