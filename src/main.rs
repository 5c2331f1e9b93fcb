//! Backlog 项目管理后台
//!
//! 启动流程：加载配置 -> 初始化日志 -> 创建数据库连接池并迁移 -> 启动 Web 服务，
//! 收到 Ctrl-C 后通知 Web 服务优雅退出。

use color_eyre::Result;
use database::initialize_database;
use shared_lib::AppConfig;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // 通过 RUST_LOG 调整日志级别，默认 info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 启动 Backlog Admin...");

    let config = AppConfig::load()?;
    let pool = initialize_database(config.clone()).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("🛑 收到退出信号"),
            Err(err) => error!("❌ 监听退出信号失败: {err}"),
        }
        let _ = shutdown_tx.send(true);
    });

    web_service::start_web_service(pool, &config.bind_addr, shutdown_rx).await?;

    info!("👋 Backlog Admin 已退出");
    Ok(())
}
