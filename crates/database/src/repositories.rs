//! 数据库仓库模块
//!
//! 这里定义数据库操作的Repository层

pub mod audit_log;
pub mod project;
pub mod query;
pub mod traits;

// 重新导出具体的类型
pub use audit_log::AuditLogRepository;
pub use project::ProjectRepository;
pub use traits::{AuditLogRepositoryTrait, ProjectRepositoryTrait};
