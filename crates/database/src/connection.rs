use crate::{DatabaseError, DatabaseResult};
use shared_lib::{AppConfig, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 数据库连接池
pub type DatabasePool = Pool<Postgres>;

/// 获取连接的超时时间
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);
/// 空闲连接保留时间
const IDLE_TIMEOUT: Duration = Duration::from_secs(3600);
/// 单个连接最长存活时间，到期后强制重建
const MAX_LIFETIME: Duration = Duration::from_secs(3600 * 6);

/// 按配置创建连接池
///
/// pool 内部已经是引用计数的智能指针，`.clone()` 之后可以安全地跨线程使用。
pub async fn create_pool(config: &DatabaseConfig) -> DatabaseResult<DatabasePool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
        .connect(&config.postgresql_conn_str)
        .await
        .map_err(|e| DatabaseError::connection(format!("连接PostgreSQL数据库失败: {e}")))?;

    info!(
        "🗄️ 数据库连接池创建成功 (min={}, max={})",
        config.min_connections, config.max_connections
    );
    Ok(pool)
}

/// 执行 `migrations/` 目录下的全部迁移
pub async fn run_migrations(pool: &DatabasePool) -> DatabaseResult<()> {
    info!("🔄 开始执行数据库迁移...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::migration(format!("数据库迁移失败: {e}")))?;

    info!("✅ 数据库迁移完成");
    Ok(())
}

/// 创建连接池并执行迁移，服务启动时调用
pub async fn initialize_database(config: Arc<AppConfig>) -> DatabaseResult<DatabasePool> {
    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
