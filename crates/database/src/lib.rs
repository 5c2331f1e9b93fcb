//! 数据库操作模块
//!
//! 这个模块提供了数据库连接、迁移、查询等功能

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{create_pool, initialize_database, run_migrations, DatabasePool};
pub use error::DatabaseError;
pub use models::{
    AuditLogEntry, ProjectCounts, ProjectListQuery, ProjectPage, ProjectRecord, ProjectSort, ProjectStatus, SortColumn,
    SortDirection, VoteMode, VoteType, VoterRecord,
};
pub use repositories::{AuditLogRepository, AuditLogRepositoryTrait, ProjectRepository, ProjectRepositoryTrait};

/// 数据库操作结果类型
pub type DatabaseResult<T> = Result<T, DatabaseError>;
