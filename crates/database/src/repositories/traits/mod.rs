//! 数据库仓库 trait 定义
//!
//! 这里定义了各种数据库仓库的抽象接口
//!
//! ## Repository Trait 设计模式 🎯
//!
//! 所有 Repository trait 都遵循统一的约束：
//!
//! ```rust,ignore
//! #[async_trait::async_trait]
//! pub trait XxxRepositoryTrait: Send + Sync + 'static {
//!     // 异步方法定义...
//! }
//! ```
//!
//! ### Trait 约束说明 📚
//!
//! #### `Send` trait 🚀
//! - **作用**：表示类型可以安全地在线程间转移所有权
//! - **场景**：Web 服务器中，不同的请求可能在不同线程处理
//!
//! #### `Sync` trait 🔄
//! - **作用**：表示类型可以安全地在多个线程间共享引用
//! - **场景**：多个并发请求同时访问同一个 Repository 实例
//!
//! #### `'static` 生命周期 ⏰
//! - **作用**：表示类型不包含非静态引用，可以在程序整个生命周期中存活
//! - **场景**：作为 axum 共享状态长期存在
//!
//! ### 实际应用场景 💡
//!
//! ```rust,ignore
//! // 1. 服务层使用泛型持有仓库，编译期确定具体实现
//! pub struct ProjectService<PR: ProjectRepositoryTrait, AL: AuditLogRepositoryTrait> {
//!     project_repository: PR,
//!     audit_log: AL,
//! }
//!
//! // 2. 应用启动时使用 PostgreSQL 实现
//! let service = ProjectService::new(
//!     ProjectRepository::new(pool.clone()),
//!     AuditLogRepository::new(pool.clone()),
//! );
//!
//! // 3. 测试时替换为内存实现，不需要数据库
//! let service = ProjectService::new(InMemoryProjects::default(), RecordingAuditLog::default());
//! ```
//!
//! ### 最佳实践 ✅
//!
//! 1. **统一约束**：所有 Repository trait 都使用相同的 trait 约束
//! 2. **异步优先**：所有数据库操作方法都是异步的
//! 3. **错误处理**：使用统一的 `DatabaseResult<T>` 类型进行错误处理
//! 4. **接口简洁**：只负责数据访问，渲染和业务规则放在服务层

pub mod audit_log;
pub mod project;

// 重新导出
pub use audit_log::AuditLogRepositoryTrait;
pub use project::ProjectRepositoryTrait;
