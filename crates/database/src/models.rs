//! 数据库模型模块
//!
//! 这里定义与数据库表对应的结构体和相关操作

pub mod audit_log;
pub mod project;
pub mod vote;

// 重新导出具体的模型
pub use audit_log::AuditLogEntry;
pub use project::{
    ProjectCounts, ProjectListQuery, ProjectPage, ProjectRecord, ProjectSort, ProjectStatus, SortColumn, SortDirection,
};
pub use vote::{VoteMode, VoteType, VoterRecord};
