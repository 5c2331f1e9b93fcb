//! Web服务模块
//!
//! 提供 HTTP API 接口和文档服务

use color_eyre::Result;
use database::{AuditLogRepository, ProjectRepository};
use services::{ProjectService, ProjectServiceTrait};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tokio::sync::watch::Receiver;
use tracing::{info, warn};

pub mod models;
pub mod routes;
pub mod services;

/// 应用共享状态
///
/// 服务层以 trait 对象的形式保存，测试时可以替换为内存实现。
#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<dyn ProjectServiceTrait>,
}

impl AppState {
    pub fn new(project_service: impl ProjectServiceTrait) -> Self {
        Self {
            project_service: Arc::new(project_service),
        }
    }

    /// 基于 PostgreSQL 仓库创建状态
    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self::new(ProjectService::new(
            ProjectRepository::new(pool.clone()),
            AuditLogRepository::new(pool),
        ))
    }
}

/// 启动 Web 服务
///
/// 收到 `shutdown_rx` 的关闭信号后优雅退出。
pub async fn start_web_service(pool: Pool<Postgres>, bind_addr: &str, mut shutdown_rx: Receiver<bool>) -> Result<()> {
    let router = routes::create_app_router(AppState::from_pool(pool));

    info!("🚀 启动 Web Service 在 {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            if shutdown_rx.changed().await.is_err() {
                warn!("⚠️ 关闭信号发送端已释放");
            }
            info!("🛑 Web Service 正在关闭...");
        })
        .await?;

    Ok(())
}
